//! Factory registries for reconstructing upgrades and trackers from saves.
//!
//! Persisted upgrades carry only a key, a level, and an opaque payload; the
//! codec turns them back into live objects through the factories registered
//! here. Trackers are rebuilt from the full registered set so a session
//! always starts with every known tracker type, whether or not the save
//! mentioned it.
//!
//! Registration happens once at process start (`wardplate-kit` installs the
//! stock set); there is no runtime type discovery.

use std::collections::BTreeMap;

use tracing::warn;
use wardplate_types::TagCompound;

use crate::error::WardplateError;
use crate::tracker::StatTracker;
use crate::upgrade::Upgrade;

/// Builds an upgrade from its persisted level and payload.
pub type UpgradeFactory =
    fn(level: u32, payload: &TagCompound) -> Result<Box<dyn Upgrade>, WardplateError>;

/// Builds a fresh tracker in its default state.
pub type TrackerFactory = fn() -> Result<Box<dyn StatTracker>, WardplateError>;

/// Upgrade and tracker factories, keyed by their stable identifiers.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
    upgrades: BTreeMap<String, UpgradeFactory>,
    trackers: BTreeMap<String, TrackerFactory>,
}

impl FactoryRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            upgrades: BTreeMap::new(),
            trackers: BTreeMap::new(),
        }
    }

    /// Register an upgrade factory under `key`, replacing (with a warning)
    /// any factory previously registered there.
    pub fn register_upgrade(&mut self, key: impl Into<String>, factory: UpgradeFactory) {
        let key = key.into();
        if self.upgrades.insert(key.clone(), factory).is_some() {
            warn!(key, "upgrade factory re-registered, previous one replaced");
        }
    }

    /// Register a tracker factory under `key`, replacing (with a warning)
    /// any factory previously registered there.
    pub fn register_tracker(&mut self, key: impl Into<String>, factory: TrackerFactory) {
        let key = key.into();
        if self.trackers.insert(key.clone(), factory).is_some() {
            warn!(key, "tracker factory re-registered, previous one replaced");
        }
    }

    /// Whether an upgrade factory exists for `key`.
    pub fn has_upgrade(&self, key: &str) -> bool {
        self.upgrades.contains_key(key)
    }

    /// Whether a tracker factory exists for `key`.
    pub fn has_tracker(&self, key: &str) -> bool {
        self.trackers.contains_key(key)
    }

    /// The registered tracker keys, in order.
    pub fn tracker_keys(&self) -> impl Iterator<Item = &str> {
        self.trackers.keys().map(String::as_str)
    }

    /// Build an upgrade from a persisted record.
    pub fn build_upgrade(
        &self,
        key: &str,
        level: u32,
        payload: &TagCompound,
    ) -> Result<Box<dyn Upgrade>, WardplateError> {
        let factory = self
            .upgrades
            .get(key)
            .ok_or_else(|| WardplateError::UnknownUpgradeKey {
                key: key.to_owned(),
            })?;
        factory(level, payload)
    }

    /// Build a tracker in its default state.
    pub fn build_tracker(&self, key: &str) -> Result<Box<dyn StatTracker>, WardplateError> {
        let factory = self
            .trackers
            .get(key)
            .ok_or_else(|| WardplateError::UnknownTrackerKey {
                key: key.to_owned(),
            })?;
        factory()
    }
}
