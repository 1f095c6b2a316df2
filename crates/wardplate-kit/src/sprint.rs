//! Quick feet: sprint a lot, move faster.
//!
//! The tracker counts ticks spent sprinting. The upgrade multiplies the
//! movement-speed attribute's base value, so the bonus stacks the way the
//! host's attribute math expects.

use rust_decimal::Decimal;
use wardplate_core::{StatTracker, Upgrade, WardplateError};
use wardplate_types::{AttributeModifier, ModifierId, ModifierOp, PlayerSnapshot, TagCompound};

use crate::tables;

/// Save-tree key of the sprint tracker.
pub const SPRINT_TRACKER_KEY: &str = "wardplate.tracker.sprint";

/// Registry key of the quick-feet upgrade.
pub const QUICK_FEET_UPGRADE_KEY: &str = "wardplate.upgrade.quick_feet";

/// Attribute the upgrade modifies.
pub const MOVEMENT_SPEED_ATTRIBUTE: &str = "generic.movement_speed";

/// Ticks spent sprinting required for each level.
pub const SPRINT_THRESHOLDS: [u32; 5] = [400, 1200, 2800, 6000, 12000];

/// Budget cost of each level.
pub const QUICK_FEET_COSTS: [u32; 5] = [3, 6, 10, 15, 21];

/// Movement-speed bonus per level, as a fraction of base speed.
const SPEED_PER_LEVEL: Decimal = Decimal::from_parts(1, 0, 0, false, 1); // 0.1

/// Fixed identity of the movement-speed modifier.
const QUICK_FEET_MODIFIER_ID: ModifierId =
    ModifierId::from_u128(0x1fd6_9a20_73b5_4e0c_a8d1_44f7_02e9_b83a);

/// Counts sprinting ticks and proposes [`QuickFeetUpgrade`] levels.
#[derive(Debug)]
pub struct SprintTracker {
    sprint_ticks: u32,
    scale_pct: u32,
    dirty: bool,
}

impl SprintTracker {
    /// A fresh tracker with no progress.
    pub const fn new() -> Self {
        Self {
            sprint_ticks: 0,
            scale_pct: 100,
            dirty: false,
        }
    }

    /// Total ticks spent sprinting so far.
    pub const fn sprint_ticks(&self) -> u32 {
        self.sprint_ticks
    }

    fn reached(&self) -> u32 {
        tables::reached_level(&SPRINT_THRESHOLDS, self.sprint_ticks, self.scale_pct)
    }
}

impl Default for SprintTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTracker for SprintTracker {
    fn key(&self) -> &str {
        SPRINT_TRACKER_KEY
    }

    fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> bool {
        if !snapshot.sprinting {
            return false;
        }
        let before = self.reached();
        self.sprint_ticks = self.sprint_ticks.saturating_add(1);
        self.dirty = true;
        self.reached() > before
    }

    fn candidates(&self) -> Vec<Box<dyn Upgrade>> {
        (1..=self.reached())
            .filter_map(QuickFeetUpgrade::new)
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
        tag.set_u32("sprint_ticks", self.sprint_ticks);
        tag
    }

    fn read_tag(&mut self, tag: &TagCompound) {
        if let Some(ticks) = tag.get_u32("sprint_ticks") {
            self.sprint_ticks = ticks;
        }
    }
}

/// Faster movement, `+10%` of base speed per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickFeetUpgrade {
    level: u32,
}

impl QuickFeetUpgrade {
    /// Create the upgrade at `level`. `None` when the level is 0 or past
    /// the cost table.
    pub fn new(level: u32) -> Option<Self> {
        tables::value_for(&QUICK_FEET_COSTS, level).map(|_| Self { level })
    }

    /// The movement-speed bonus at this level, as a fraction of base speed.
    pub fn speed_bonus(&self) -> Decimal {
        SPEED_PER_LEVEL
            .checked_mul(Decimal::from(self.level))
            .unwrap_or(Decimal::ZERO)
    }
}

impl Upgrade for QuickFeetUpgrade {
    fn key(&self) -> &str {
        QUICK_FEET_UPGRADE_KEY
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn cost(&self) -> u32 {
        tables::value_for(&QUICK_FEET_COSTS, self.level).unwrap_or(0)
    }

    fn attribute_modifiers(&self) -> Vec<(String, AttributeModifier)> {
        vec![(
            String::from(MOVEMENT_SPEED_ATTRIBUTE),
            AttributeModifier::new(
                QUICK_FEET_MODIFIER_ID,
                QUICK_FEET_UPGRADE_KEY,
                self.speed_bonus(),
                ModifierOp::MultiplyBase,
            ),
        )]
    }
}

/// Factory for persisted quick-feet upgrades.
pub(crate) fn upgrade_factory(
    level: u32,
    _payload: &TagCompound,
) -> Result<Box<dyn Upgrade>, WardplateError> {
    QuickFeetUpgrade::new(level)
        .map(|u| Box::new(u) as Box<dyn Upgrade>)
        .ok_or_else(|| WardplateError::MalformedRecord {
            context: format!("quick feet upgrade level {level} out of range"),
        })
}

/// Factory for fresh sprint trackers.
pub(crate) fn tracker_factory() -> Result<Box<dyn StatTracker>, WardplateError> {
    Ok(Box::new(SprintTracker::new()))
}
