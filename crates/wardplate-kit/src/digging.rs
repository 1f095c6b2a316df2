//! Digging: break blocks, mine faster.
//!
//! The tracker counts blocks broken across the session. Each threshold
//! earns a level of the digging upgrade, which carries no attribute
//! modifiers -- the host queries [`DiggingUpgrade::dig_speed_multiplier`]
//! directly when computing break speed.

use rust_decimal::Decimal;
use wardplate_core::{StatTracker, Upgrade, WardplateError};
use wardplate_types::{PlayerSnapshot, TagCompound};

use crate::tables;

/// Save-tree key of the digging tracker.
pub const DIGGING_TRACKER_KEY: &str = "wardplate.tracker.digging";

/// Registry key of the digging upgrade.
pub const DIGGING_UPGRADE_KEY: &str = "wardplate.upgrade.digging";

/// Blocks broken required for each level.
pub const DIGGING_THRESHOLDS: [u32; 5] = [128, 512, 1024, 2048, 4096];

/// Budget cost of each level.
pub const DIGGING_COSTS: [u32; 5] = [1, 3, 6, 10, 15];

/// Counts blocks broken and proposes [`DiggingUpgrade`] levels.
#[derive(Debug)]
pub struct DiggingTracker {
    blocks_broken: u32,
    scale_pct: u32,
    dirty: bool,
}

impl DiggingTracker {
    /// A fresh tracker with no progress.
    pub const fn new() -> Self {
        Self {
            blocks_broken: 0,
            scale_pct: 100,
            dirty: false,
        }
    }

    /// Total blocks broken so far.
    pub const fn blocks_broken(&self) -> u32 {
        self.blocks_broken
    }

    fn reached(&self) -> u32 {
        tables::reached_level(&DIGGING_THRESHOLDS, self.blocks_broken, self.scale_pct)
    }
}

impl Default for DiggingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTracker for DiggingTracker {
    fn key(&self) -> &str {
        DIGGING_TRACKER_KEY
    }

    fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> bool {
        if snapshot.blocks_broken == 0 {
            return false;
        }
        let before = self.reached();
        self.blocks_broken = self.blocks_broken.saturating_add(snapshot.blocks_broken);
        self.dirty = true;
        self.reached() > before
    }

    fn candidates(&self) -> Vec<Box<dyn Upgrade>> {
        (1..=self.reached())
            .filter_map(DiggingUpgrade::new)
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
        tag.set_u32("blocks_broken", self.blocks_broken);
        tag
    }

    fn read_tag(&mut self, tag: &TagCompound) {
        if let Some(blocks) = tag.get_u32("blocks_broken") {
            self.blocks_broken = blocks;
        }
    }
}

/// Faster block breaking, one level per digging threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiggingUpgrade {
    level: u32,
}

impl DiggingUpgrade {
    /// Create the upgrade at `level`. `None` when the level is 0 or past
    /// the cost table.
    pub fn new(level: u32) -> Option<Self> {
        tables::value_for(&DIGGING_COSTS, level).map(|_| Self { level })
    }

    /// Break-speed multiplier the host applies: `1 + 0.15 * level`.
    pub fn dig_speed_multiplier(&self) -> Decimal {
        Decimal::new(15, 2)
            .checked_mul(Decimal::from(self.level))
            .and_then(|bonus| Decimal::ONE.checked_add(bonus))
            .unwrap_or(Decimal::ONE)
    }
}

impl Upgrade for DiggingUpgrade {
    fn key(&self) -> &str {
        DIGGING_UPGRADE_KEY
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn cost(&self) -> u32 {
        tables::value_for(&DIGGING_COSTS, self.level).unwrap_or(0)
    }
}

/// Factory for persisted digging upgrades.
pub(crate) fn upgrade_factory(
    level: u32,
    _payload: &TagCompound,
) -> Result<Box<dyn Upgrade>, WardplateError> {
    DiggingUpgrade::new(level)
        .map(|u| Box::new(u) as Box<dyn Upgrade>)
        .ok_or_else(|| WardplateError::MalformedRecord {
            context: format!("digging upgrade level {level} out of range"),
        })
}

/// Factory for fresh digging trackers.
pub(crate) fn tracker_factory() -> Result<Box<dyn StatTracker>, WardplateError> {
    Ok(Box::new(DiggingTracker::new()))
}
