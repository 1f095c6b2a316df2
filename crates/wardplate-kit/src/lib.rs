//! Stock tracker and upgrade content for the Wardplate system.
//!
//! Five tracker/upgrade pairs covering the common behaviours a host engine
//! reports each tick:
//!
//! - [`digging`] -- blocks broken earn faster block breaking
//! - [`health`] -- healing received earns a larger health pool
//! - [`sprint`] -- sprinting ticks earn faster movement
//! - [`tough`] -- damage taken earns armour and knockback resistance
//! - [`soft_fall`] -- fall distance earns reduced fall damage
//!
//! Every pair follows the same shape: a monotone threshold table drives the
//! tracker, a monotone cost table prices the levels (so level-ups always
//! satisfy the registry's non-negative cost delta rule), and the upgrade
//! either contributes attribute modifiers or exposes a query helper the host
//! calls directly.
//!
//! Call [`register_defaults`] once at process start to install the whole
//! set into a [`FactoryRegistry`].

pub mod digging;
pub mod health;
pub mod soft_fall;
pub mod sprint;
pub mod tables;
pub mod tough;

use wardplate_core::FactoryRegistry;

pub use digging::{DiggingTracker, DiggingUpgrade};
pub use health::{HealthTracker, HealthUpgrade};
pub use soft_fall::{SoftFallTracker, SoftFallUpgrade};
pub use sprint::{QuickFeetUpgrade, SprintTracker};
pub use tough::{ToughTracker, ToughUpgrade};

/// Register every stock upgrade and tracker factory.
///
/// Idempotent in effect: re-registering replaces the factories under the
/// same keys (with a warning from the registry).
pub fn register_defaults(registry: &mut FactoryRegistry) {
    registry.register_upgrade(digging::DIGGING_UPGRADE_KEY, digging::upgrade_factory);
    registry.register_tracker(digging::DIGGING_TRACKER_KEY, digging::tracker_factory);

    registry.register_upgrade(health::HEALTH_UPGRADE_KEY, health::upgrade_factory);
    registry.register_tracker(health::HEALTH_TRACKER_KEY, health::tracker_factory);

    registry.register_upgrade(sprint::QUICK_FEET_UPGRADE_KEY, sprint::upgrade_factory);
    registry.register_tracker(sprint::SPRINT_TRACKER_KEY, sprint::tracker_factory);

    registry.register_upgrade(tough::TOUGH_UPGRADE_KEY, tough::upgrade_factory);
    registry.register_tracker(tough::TOUGH_TRACKER_KEY, tough::tracker_factory);

    registry.register_upgrade(soft_fall::SOFT_FALL_UPGRADE_KEY, soft_fall::upgrade_factory);
    registry.register_tracker(soft_fall::SOFT_FALL_TRACKER_KEY, soft_fall::tracker_factory);
}
