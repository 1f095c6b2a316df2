//! Upgrade bookkeeping for living player equipment.
//!
//! The host game engine owns the player, the world, and the save files; this
//! crate owns the growth of one player's equipment: which upgrades are
//! admitted under the point budget, which behavioural trackers are counting
//! toward the next one, and how both survive a save/load cycle.
//!
//! Control flow per simulation step: the host's tick driver calls
//! [`ArmourSession::on_tick`] with a [`PlayerSnapshot`]; trackers update and
//! may emit candidate upgrades; the [`UpgradeRegistry`] admits or rejects
//! them against the budget; on save, the [`codec`] writes everything into
//! the host's tagged save tree.
//!
//! Everything is single-threaded and synchronous by design -- one session is
//! only ever touched from the host's per-player tick thread.
//!
//! # Modules
//!
//! - [`upgrade`] -- The [`Upgrade`] trait and budget-enforced [`UpgradeRegistry`]
//! - [`tracker`] -- The [`StatTracker`] trait and per-session [`TrackerSet`]
//! - [`factory`] -- Explicit factory registries for save reconstruction
//! - [`session`] -- Per-player [`ArmourSession`] and the tick entry point
//! - [`codec`] -- Persistence to and from the tagged save tree
//! - [`config`] -- YAML-loadable tunables ([`WardplateConfig`])
//! - [`error`] -- Error types ([`WardplateError`])
//!
//! [`PlayerSnapshot`]: wardplate_types::PlayerSnapshot

pub mod codec;
pub mod config;
pub mod error;
pub mod factory;
pub mod session;
pub mod tracker;
pub mod upgrade;

// Re-export primary types at crate root for convenience.
pub use codec::{UPGRADES_KEY, WriteMode, deserialize, serialize};
pub use config::{ConfigError, WardplateConfig};
pub use error::WardplateError;
pub use factory::{FactoryRegistry, TrackerFactory, UpgradeFactory};
pub use session::{ArmourSession, TickReport};
pub use tracker::{StatTracker, TrackerSet};
pub use upgrade::{DEFAULT_MAX_BUDGET, Upgrade, UpgradeRegistry};
