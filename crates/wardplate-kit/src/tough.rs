//! Tough: take hits, shrug more of them off.
//!
//! The tracker accumulates damage taken. The upgrade grants two modifiers
//! per level: flat armour and a small knockback-resistance bonus, each under
//! its own fixed modifier identity.

use rust_decimal::Decimal;
use wardplate_core::{StatTracker, Upgrade, WardplateError};
use wardplate_types::{AttributeModifier, ModifierId, ModifierOp, PlayerSnapshot, TagCompound};

use crate::tables;

/// Save-tree key of the tough tracker.
pub const TOUGH_TRACKER_KEY: &str = "wardplate.tracker.tough";

/// Registry key of the tough upgrade.
pub const TOUGH_UPGRADE_KEY: &str = "wardplate.upgrade.tough";

/// Armour attribute the upgrade modifies.
pub const ARMOR_ATTRIBUTE: &str = "generic.armor";

/// Knockback-resistance attribute the upgrade modifies.
pub const KNOCKBACK_RESISTANCE_ATTRIBUTE: &str = "generic.knockback_resistance";

/// Damage taken (in health points) required for each level.
pub const TOUGH_THRESHOLDS: [u32; 5] = [30, 80, 200, 500, 1200];

/// Budget cost of each level.
pub const TOUGH_COSTS: [u32; 5] = [3, 7, 12, 18, 25];

/// Knockback resistance per level (the host caps the attribute at 1).
const KNOCKBACK_PER_LEVEL: Decimal = Decimal::from_parts(5, 0, 0, false, 2); // 0.05

/// Fixed identity of the armour modifier.
const ARMOR_MODIFIER_ID: ModifierId =
    ModifierId::from_u128(0xc4e8_1b96_5f72_4d3a_9ac0_6e15_88d2_703f);

/// Fixed identity of the knockback-resistance modifier.
const KNOCKBACK_MODIFIER_ID: ModifierId =
    ModifierId::from_u128(0x2b90_e7c3_a614_48fb_b5d8_19a4_c06e_527d);

/// Accumulates damage taken and proposes [`ToughUpgrade`] levels.
#[derive(Debug)]
pub struct ToughTracker {
    damage_taken: Decimal,
    scale_pct: u32,
    dirty: bool,
}

impl ToughTracker {
    /// A fresh tracker with no progress.
    pub const fn new() -> Self {
        Self {
            damage_taken: Decimal::ZERO,
            scale_pct: 100,
            dirty: false,
        }
    }

    /// Total damage received so far, in health points.
    pub const fn damage_taken(&self) -> Decimal {
        self.damage_taken
    }

    fn reached(&self) -> u32 {
        tables::reached_level_decimal(&TOUGH_THRESHOLDS, self.damage_taken, self.scale_pct)
    }
}

impl Default for ToughTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTracker for ToughTracker {
    fn key(&self) -> &str {
        TOUGH_TRACKER_KEY
    }

    fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> bool {
        if snapshot.damage_taken <= Decimal::ZERO {
            return false;
        }
        let before = self.reached();
        self.damage_taken = self
            .damage_taken
            .checked_add(snapshot.damage_taken)
            .unwrap_or(self.damage_taken);
        self.dirty = true;
        self.reached() > before
    }

    fn candidates(&self) -> Vec<Box<dyn Upgrade>> {
        (1..=self.reached())
            .filter_map(ToughUpgrade::new)
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
        tag.set_decimal("damage_taken", self.damage_taken);
        tag
    }

    fn read_tag(&mut self, tag: &TagCompound) {
        if let Some(damage) = tag.get_decimal("damage_taken") {
            self.damage_taken = damage;
        }
    }
}

/// Hardened plating: `+1` armour and `+0.05` knockback resistance per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToughUpgrade {
    level: u32,
}

impl ToughUpgrade {
    /// Create the upgrade at `level`. `None` when the level is 0 or past
    /// the cost table.
    pub fn new(level: u32) -> Option<Self> {
        tables::value_for(&TOUGH_COSTS, level).map(|_| Self { level })
    }
}

impl Upgrade for ToughUpgrade {
    fn key(&self) -> &str {
        TOUGH_UPGRADE_KEY
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn cost(&self) -> u32 {
        tables::value_for(&TOUGH_COSTS, self.level).unwrap_or(0)
    }

    fn attribute_modifiers(&self) -> Vec<(String, AttributeModifier)> {
        let knockback = KNOCKBACK_PER_LEVEL
            .checked_mul(Decimal::from(self.level))
            .unwrap_or(Decimal::ZERO);
        vec![
            (
                String::from(ARMOR_ATTRIBUTE),
                AttributeModifier::new(
                    ARMOR_MODIFIER_ID,
                    TOUGH_UPGRADE_KEY,
                    Decimal::from(self.level),
                    ModifierOp::Add,
                ),
            ),
            (
                String::from(KNOCKBACK_RESISTANCE_ATTRIBUTE),
                AttributeModifier::new(
                    KNOCKBACK_MODIFIER_ID,
                    TOUGH_UPGRADE_KEY,
                    knockback,
                    ModifierOp::Add,
                ),
            ),
        ]
    }
}

/// Factory for persisted tough upgrades.
pub(crate) fn upgrade_factory(
    level: u32,
    _payload: &TagCompound,
) -> Result<Box<dyn Upgrade>, WardplateError> {
    ToughUpgrade::new(level)
        .map(|u| Box::new(u) as Box<dyn Upgrade>)
        .ok_or_else(|| WardplateError::MalformedRecord {
            context: format!("tough upgrade level {level} out of range"),
        })
}

/// Factory for fresh tough trackers.
pub(crate) fn tracker_factory() -> Result<Box<dyn StatTracker>, WardplateError> {
    Ok(Box::new(ToughTracker::new()))
}
