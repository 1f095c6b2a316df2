//! Health: get healed, grow a larger health pool.
//!
//! The tracker accumulates healing received (natural regeneration counts).
//! Each level of the resulting upgrade adds a flat bonus to the player's
//! maximum-health attribute under a fixed modifier identity, so the host can
//! remove the old modifier and apply the replacement on level-up.

use rust_decimal::Decimal;
use wardplate_core::{StatTracker, Upgrade, WardplateError};
use wardplate_types::{AttributeModifier, ModifierId, ModifierOp, PlayerSnapshot, TagCompound};

use crate::tables;

/// Save-tree key of the health tracker.
pub const HEALTH_TRACKER_KEY: &str = "wardplate.tracker.health";

/// Registry key of the health upgrade.
pub const HEALTH_UPGRADE_KEY: &str = "wardplate.upgrade.health";

/// Attribute the upgrade modifies.
pub const MAX_HEALTH_ATTRIBUTE: &str = "generic.max_health";

/// Healing received (in health points) required for each level.
pub const HEALTH_THRESHOLDS: [u32; 5] = [50, 150, 400, 1000, 2500];

/// Budget cost of each level.
pub const HEALTH_COSTS: [u32; 5] = [5, 9, 14, 20, 27];

/// Extra maximum health granted per level.
const HEALTH_PER_LEVEL: Decimal = Decimal::TWO;

/// Fixed identity of the max-health modifier in the host attribute system.
const HEALTH_MODIFIER_ID: ModifierId =
    ModifierId::from_u128(0x77ab_52d1_9c04_41e8_8f33_0b62_d5a1_4c70);

/// Accumulates healing received and proposes [`HealthUpgrade`] levels.
#[derive(Debug)]
pub struct HealthTracker {
    healed: Decimal,
    scale_pct: u32,
    dirty: bool,
}

impl HealthTracker {
    /// A fresh tracker with no progress.
    pub const fn new() -> Self {
        Self {
            healed: Decimal::ZERO,
            scale_pct: 100,
            dirty: false,
        }
    }

    /// Total healing received so far, in health points.
    pub const fn healed(&self) -> Decimal {
        self.healed
    }

    fn reached(&self) -> u32 {
        tables::reached_level_decimal(&HEALTH_THRESHOLDS, self.healed, self.scale_pct)
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTracker for HealthTracker {
    fn key(&self) -> &str {
        HEALTH_TRACKER_KEY
    }

    fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> bool {
        if snapshot.healing_received <= Decimal::ZERO {
            return false;
        }
        let before = self.reached();
        self.healed = self
            .healed
            .checked_add(snapshot.healing_received)
            .unwrap_or(self.healed);
        self.dirty = true;
        self.reached() > before
    }

    fn candidates(&self) -> Vec<Box<dyn Upgrade>> {
        (1..=self.reached())
            .filter_map(HealthUpgrade::new)
            .map(|u| Box::new(u) as Box<dyn Upgrade>)
            .collect()
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn reset_dirty(&mut self) {
        self.dirty = false;
    }

    fn scale_thresholds(&mut self, pct: u32) {
        self.scale_pct = pct;
    }

    fn write_tag(&self) -> TagCompound {
        let mut tag = TagCompound::new();
        tag.set_decimal("healed", self.healed);
        tag
    }

    fn read_tag(&mut self, tag: &TagCompound) {
        if let Some(healed) = tag.get_decimal("healed") {
            self.healed = healed;
        }
    }
}

/// A larger health pool, `+2` maximum health per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthUpgrade {
    level: u32,
}

impl HealthUpgrade {
    /// Create the upgrade at `level`. `None` when the level is 0 or past
    /// the cost table.
    pub fn new(level: u32) -> Option<Self> {
        tables::value_for(&HEALTH_COSTS, level).map(|_| Self { level })
    }

    /// The flat max-health bonus at this level.
    pub fn health_bonus(&self) -> Decimal {
        HEALTH_PER_LEVEL
            .checked_mul(Decimal::from(self.level))
            .unwrap_or(Decimal::ZERO)
    }
}

impl Upgrade for HealthUpgrade {
    fn key(&self) -> &str {
        HEALTH_UPGRADE_KEY
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn cost(&self) -> u32 {
        tables::value_for(&HEALTH_COSTS, self.level).unwrap_or(0)
    }

    fn attribute_modifiers(&self) -> Vec<(String, AttributeModifier)> {
        vec![(
            String::from(MAX_HEALTH_ATTRIBUTE),
            AttributeModifier::new(
                HEALTH_MODIFIER_ID,
                HEALTH_UPGRADE_KEY,
                self.health_bonus(),
                ModifierOp::Add,
            ),
        )]
    }
}

/// Factory for persisted health upgrades.
pub(crate) fn upgrade_factory(
    level: u32,
    _payload: &TagCompound,
) -> Result<Box<dyn Upgrade>, WardplateError> {
    HealthUpgrade::new(level)
        .map(|u| Box::new(u) as Box<dyn Upgrade>)
        .ok_or_else(|| WardplateError::MalformedRecord {
            context: format!("health upgrade level {level} out of range"),
        })
}

/// Factory for fresh health trackers.
pub(crate) fn tracker_factory() -> Result<Box<dyn StatTracker>, WardplateError> {
    Ok(Box::new(HealthTracker::new()))
}

#[cfg(test)]
mod tests {
    use wardplate_types::PlayerId;

    use super::*;

    fn snapshot_with_healing(points: Decimal) -> PlayerSnapshot {
        let mut snapshot = PlayerSnapshot::idle(PlayerId::new(), 1);
        snapshot.healing_received = points;
        snapshot
    }

    #[test]
    fn accumulates_fractional_healing() {
        let mut tracker = HealthTracker::new();
        // 2.5 healing per tick; 20 ticks = 50, exactly the first threshold.
        for _ in 0..19 {
            assert!(!tracker.on_tick(&snapshot_with_healing(Decimal::new(25, 1))));
        }
        assert!(tracker.on_tick(&snapshot_with_healing(Decimal::new(25, 1))));
        assert_eq!(tracker.healed(), Decimal::from(50));
    }

    #[test]
    fn negative_or_zero_healing_is_ignored() {
        let mut tracker = HealthTracker::new();
        assert!(!tracker.on_tick(&snapshot_with_healing(Decimal::ZERO)));
        assert!(!tracker.on_tick(&snapshot_with_healing(Decimal::from(-5))));
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.healed(), Decimal::ZERO);
    }

    #[test]
    fn modifier_targets_max_health_with_fixed_id() {
        let modifiers = HealthUpgrade::new(3)
            .map(|u| u.attribute_modifiers())
            .unwrap_or_default();
        assert_eq!(modifiers.len(), 1);

        let first = modifiers.first();
        assert_eq!(first.map(|(a, _)| a.as_str()), Some(MAX_HEALTH_ATTRIBUTE));
        assert_eq!(first.map(|(_, m)| m.amount), Some(Decimal::from(6)));
        assert_eq!(first.map(|(_, m)| m.op), Some(ModifierOp::Add));
        assert_eq!(first.map(|(_, m)| m.id), Some(HEALTH_MODIFIER_ID));
    }

    #[test]
    fn payload_roundtrip_preserves_decimal() {
        let mut tracker = HealthTracker::new();
        let _ = tracker.on_tick(&snapshot_with_healing(Decimal::new(375, 1)));

        let tag = tracker.write_tag();
        let mut restored = HealthTracker::new();
        restored.read_tag(&tag);
        assert_eq!(restored.healed(), Decimal::new(375, 1));
    }

    #[test]
    fn costs_are_monotone_non_decreasing() {
        assert!(HEALTH_COSTS.windows(2).all(|w| w.first() <= w.last()));
    }
}
