//! Type-safe identifier wrappers around [`Uuid`].
//!
//! The host engine addresses players and attribute modifiers by UUID. The
//! newtypes here prevent accidental mixing of the two at compile time.
//! `PlayerId` uses UUID v7 (time-ordered) when generated app-side;
//! `ModifierId` is usually a fixed constant so the host can remove and
//! re-apply the same modifier across sessions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create an identifier from a fixed 128-bit constant.
            ///
            /// Used for modifier identities that must be stable across
            /// sessions (the host removes a modifier by its UUID before
            /// re-applying the upgraded one).
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player whose equipment this library tracks.
    PlayerId
}

define_id! {
    /// Stable identity of one attribute modifier, as seen by the host's
    /// attribute system.
    ModifierId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let player = PlayerId::new();
        let modifier = ModifierId::new();
        // These are different types -- the compiler enforces no mixing.
        assert_ne!(player.into_inner(), Uuid::nil());
        assert_ne!(modifier.into_inner(), Uuid::nil());
    }

    #[test]
    fn fixed_ids_are_stable() {
        let a = ModifierId::from_u128(0x5f2a);
        let b = ModifierId::from_u128(0x5f2a);
        assert_eq!(a, b);
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = PlayerId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<PlayerId, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = PlayerId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
