//! The per-player session: owned registries plus the tick entry point.
//!
//! One [`ArmourSession`] exists per player wearing the equipment, created at
//! load and dropped at unload. All state is owned by the session and passed
//! explicitly -- there are no ambient globals. The host's tick driver calls
//! [`ArmourSession::on_tick`] once per player per simulation step; everything
//! in that path is a synchronous, single-step computation.

use tracing::{debug, info, warn};
use wardplate_types::{ModifierMap, PlayerId, PlayerSnapshot};

use crate::config::WardplateConfig;
use crate::factory::FactoryRegistry;
use crate::tracker::TrackerSet;
use crate::upgrade::UpgradeRegistry;

/// Summary of one tick's admissions and rejections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// The tick number this report covers.
    pub tick: u64,
    /// `(key, level)` of every upgrade admitted this tick.
    pub admitted: Vec<(String, u32)>,
    /// Number of candidates the registry rejected this tick.
    pub rejected: u32,
}

impl TickReport {
    /// Whether anything was admitted this tick.
    pub fn changed(&self) -> bool {
        !self.admitted.is_empty()
    }
}

/// One player's living-equipment state: admitted upgrades and stat trackers.
#[derive(Debug)]
pub struct ArmourSession {
    player: PlayerId,
    upgrades: UpgradeRegistry,
    trackers: TrackerSet,
}

impl ArmourSession {
    /// Create a fresh session with no upgrades and the complete default
    /// tracker set from `factories`.
    ///
    /// A tracker whose factory fails is logged and omitted for this session;
    /// the others are unaffected.
    pub fn new(player: PlayerId, config: &WardplateConfig, factories: &FactoryRegistry) -> Self {
        Self {
            player,
            upgrades: UpgradeRegistry::new(config.max_budget),
            trackers: build_tracker_set(player, config, factories),
        }
    }

    /// Assemble a session from already-built parts. Used by the persistence
    /// codec and by tests.
    pub const fn from_parts(
        player: PlayerId,
        upgrades: UpgradeRegistry,
        trackers: TrackerSet,
    ) -> Self {
        Self {
            player,
            upgrades,
            trackers,
        }
    }

    /// The player this session belongs to.
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// The admitted upgrades.
    pub const fn upgrades(&self) -> &UpgradeRegistry {
        &self.upgrades
    }

    /// Mutable access to the admitted upgrades.
    pub const fn upgrades_mut(&mut self) -> &mut UpgradeRegistry {
        &mut self.upgrades
    }

    /// The stat trackers.
    pub const fn trackers(&self) -> &TrackerSet {
        &self.trackers
    }

    /// Mutable access to the stat trackers.
    pub const fn trackers_mut(&mut self) -> &mut TrackerSet {
        &mut self.trackers
    }

    /// The aggregated attribute-modifier multimap the host applies to the
    /// player. Pure read.
    pub fn aggregate_modifiers(&self) -> ModifierMap {
        self.upgrades.aggregate_modifiers()
    }

    /// One simulation step for this player.
    ///
    /// Ticks every admitted upgrade, then every tracker; candidates emitted
    /// by trackers whose threshold newly holds are forwarded to the upgrade
    /// registry. Admissions are logged at `info`, rejections at `debug`.
    pub fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> TickReport {
        self.upgrades.tick_all(snapshot);

        let candidates = self.trackers.on_tick(snapshot);

        let mut admitted = Vec::new();
        let mut rejected: u32 = 0;
        for candidate in candidates {
            let key = candidate.key().to_owned();
            let level = candidate.level();
            if self.upgrades.apply(candidate) {
                info!(
                    player = %self.player,
                    key,
                    level,
                    total_cost = self.upgrades.total_cost(),
                    "living equipment upgraded"
                );
                admitted.push((key, level));
            } else {
                debug!(player = %self.player, key, level, "upgrade candidate rejected");
                rejected = rejected.saturating_add(1);
            }
        }

        TickReport {
            tick: snapshot.tick,
            admitted,
            rejected,
        }
    }
}

/// Build the complete registered tracker set for one session, applying the
/// configured threshold scale.
///
/// The single construction path shared by [`ArmourSession::new`] and the
/// persistence codec: a tracker whose factory fails is logged and omitted,
/// the others are unaffected.
pub(crate) fn build_tracker_set(
    player: PlayerId,
    config: &WardplateConfig,
    factories: &FactoryRegistry,
) -> TrackerSet {
    let mut trackers = TrackerSet::new();
    for key in factories.tracker_keys() {
        match factories.build_tracker(key) {
            Ok(mut tracker) => {
                if config.threshold_scale_pct != 100 {
                    tracker.scale_thresholds(config.threshold_scale_pct);
                }
                trackers.insert(tracker);
            }
            Err(error) => {
                warn!(%player, key, %error, "tracker construction failed, omitting");
            }
        }
    }
    trackers
}
