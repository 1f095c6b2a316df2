//! Shared type definitions for the Wardplate living-equipment system.
//!
//! This crate is the single source of truth for the data model shared between
//! the logic layer (`wardplate-core`), the stock content (`wardplate-kit`),
//! and the host engine integration.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers ([`PlayerId`], [`ModifierId`])
//! - [`attribute`] -- Attribute modifiers and the aggregated [`ModifierMap`]
//! - [`tag`] -- The tagged key-value save tree ([`Tag`], [`TagCompound`])
//! - [`snapshot`] -- The host-provided per-tick [`PlayerSnapshot`]

pub mod attribute;
pub mod ids;
pub mod snapshot;
pub mod tag;

// Re-export all public types at crate root for convenience.
pub use attribute::{AttributeModifier, ModifierMap, ModifierOp};
pub use ids::{ModifierId, PlayerId};
pub use snapshot::PlayerSnapshot;
pub use tag::{Tag, TagCompound};
