//! Soft fall: fall far, land lighter.
//!
//! The tracker accumulates fall distance from completed landings. The
//! upgrade carries no attribute modifiers; the host queries
//! [`SoftFallUpgrade::fall_damage_multiplier`] when resolving fall damage.

use rust_decimal::Decimal;
use wardplate_core::{StatTracker, Upgrade, WardplateError};
use wardplate_types::{PlayerSnapshot, TagCompound};

use crate::tables;

/// Save-tree key of the soft-fall tracker.
pub const SOFT_FALL_TRACKER_KEY: &str = "wardplate.tracker.soft_fall";

/// Registry key of the soft-fall upgrade.
pub const SOFT_FALL_UPGRADE_KEY: &str = "wardplate.upgrade.soft_fall";

/// Blocks fallen required for each level.
pub const SOFT_FALL_THRESHOLDS: [u32; 5] = [25, 75, 200, 500, 1200];

/// Budget cost of each level.
pub const SOFT_FALL_COSTS: [u32; 5] = [2, 5, 9, 14, 20];

/// Fall-damage reduction per level, as a fraction.
const REDUCTION_PER_LEVEL: Decimal = Decimal::from_parts(15, 0, 0, false, 2); // 0.15

/// The multiplier never drops below this floor.
const MULTIPLIER_FLOOR: Decimal = Decimal::from_parts(25, 0, 0, false, 2); // 0.25

/// Accumulates fall distance and proposes [`SoftFallUpgrade`] levels.
#[derive(Debug)]
pub struct SoftFallTracker {
    blocks_fallen: Decimal,
    scale_pct: u32,
    dirty: bool,
}

impl SoftFallTracker {
    /// A fresh tracker with no progress.
    pub const fn new() -> Self {
        Self {
            blocks_fallen: Decimal::ZERO,
            scale_pct: 100,
            dirty: false,
        }
    }

    /// Total blocks fallen so far.
    pub const fn blocks_fallen(&self) -> Decimal {
        self.blocks_fallen
    }

    fn reached(&self) -> u32 {
        tables::reached_level_decimal(&SOFT_FALL_THRESHOLDS, self.blocks_fallen, self.scale_pct)
    }
}

impl Default for SoftFallTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTracker for SoftFallTracker {
    fn key(&self) -> &str {
        SOFT_FALL_TRACKER_KEY
    }

    fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> bool {
        if snapshot.fall_distance <= Decimal::ZERO {
            return false;
        }
        let before = self.reached();
        self.blocks_fallen = self
            .blocks_fallen
            .checked_add(snapshot.fall_distance)
            .unwrap_or(self.blocks_fallen);
        self.dirty = true;
        self.reached() > before
    }

    fn candidates(&self) -> Vec<Box<dyn Upgrade>> {
        (1..=self.reached())
            .filter_map(SoftFallUpgrade::new)
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
        tag.set_decimal("blocks_fallen", self.blocks_fallen);
        tag
    }

    fn read_tag(&mut self, tag: &TagCompound) {
        if let Some(blocks) = tag.get_decimal("blocks_fallen") {
            self.blocks_fallen = blocks;
        }
    }
}

/// Softer landings, `-15%` fall damage per level with a `0.25` floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftFallUpgrade {
    level: u32,
}

impl SoftFallUpgrade {
    /// Create the upgrade at `level`. `None` when the level is 0 or past
    /// the cost table.
    pub fn new(level: u32) -> Option<Self> {
        tables::value_for(&SOFT_FALL_COSTS, level).map(|_| Self { level })
    }

    /// The factor the host multiplies fall damage by at this level.
    pub fn fall_damage_multiplier(&self) -> Decimal {
        let reduction = REDUCTION_PER_LEVEL
            .checked_mul(Decimal::from(self.level))
            .unwrap_or(Decimal::ZERO);
        Decimal::ONE
            .checked_sub(reduction)
            .unwrap_or(MULTIPLIER_FLOOR)
            .max(MULTIPLIER_FLOOR)
    }
}

impl Upgrade for SoftFallUpgrade {
    fn key(&self) -> &str {
        SOFT_FALL_UPGRADE_KEY
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn cost(&self) -> u32 {
        tables::value_for(&SOFT_FALL_COSTS, self.level).unwrap_or(0)
    }
}

/// Factory for persisted soft-fall upgrades.
pub(crate) fn upgrade_factory(
    level: u32,
    _payload: &TagCompound,
) -> Result<Box<dyn Upgrade>, WardplateError> {
    SoftFallUpgrade::new(level)
        .map(|u| Box::new(u) as Box<dyn Upgrade>)
        .ok_or_else(|| WardplateError::MalformedRecord {
            context: format!("soft fall upgrade level {level} out of range"),
        })
}

/// Factory for fresh soft-fall trackers.
pub(crate) fn tracker_factory() -> Result<Box<dyn StatTracker>, WardplateError> {
    Ok(Box::new(SoftFallTracker::new()))
}
