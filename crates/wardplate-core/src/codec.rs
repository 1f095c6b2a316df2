//! Persistence codec: sessions to and from the tagged save tree.
//!
//! # Persisted layout
//!
//! ```text
//! {
//!   "upgrades": [ { "key": ..., "level": ..., "upgrade": {...} }, ... ],
//!   "<tracker key>": { ...opaque tracker payload... },
//!   ...
//! }
//! ```
//!
//! One record per admitted upgrade, one top-level compound per tracker.
//! [`WriteMode::Dirty`] writes only trackers with unsaved changes;
//! [`WriteMode::Full`] writes all of them. Both clear the dirty flag on the
//! trackers they write.
//!
//! Reading is lenient end to end: unknown upgrade keys, malformed records,
//! and records that would break the budget invariant are skipped with a
//! warning, and a failed tracker factory omits just that tracker. Nothing
//! in here is fatal to the host.

use tracing::warn;
use wardplate_types::{PlayerId, Tag, TagCompound};

use crate::config::WardplateConfig;
use crate::factory::FactoryRegistry;
use crate::session::ArmourSession;
use crate::upgrade::UpgradeRegistry;

/// Top-level key holding the upgrade record list.
pub const UPGRADES_KEY: &str = "upgrades";

/// Record field: the upgrade's stable key.
const RECORD_KEY: &str = "key";
/// Record field: the upgrade's level.
const RECORD_LEVEL: &str = "level";
/// Record field: the upgrade's opaque payload.
const RECORD_PAYLOAD: &str = "upgrade";

/// Which trackers to include when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write every tracker unconditionally. Used for full saves.
    Full,
    /// Write only trackers whose dirty flag is set. Used for incremental
    /// saves; an idle player contributes nothing.
    Dirty,
}

/// Serialize a session into a save-tree compound.
///
/// Takes the session mutably because writing a tracker clears its dirty
/// flag.
pub fn serialize(session: &mut ArmourSession, mode: WriteMode) -> TagCompound {
    let mut root = TagCompound::new();

    let mut records = Vec::new();
    for (key, upgrade) in session.upgrades().iter() {
        let mut record = TagCompound::new();
        record.set_text(RECORD_KEY, key);
        record.set_u32(RECORD_LEVEL, upgrade.level());
        record.set_compound(RECORD_PAYLOAD, upgrade.write_tag());
        records.push(Tag::Compound(record));
    }
    root.set_list(UPGRADES_KEY, records);

    for tracker in session.trackers_mut().iter_mut() {
        if mode == WriteMode::Full || tracker.is_dirty() {
            root.set_compound(tracker.key().to_owned(), tracker.write_tag());
            tracker.reset_dirty();
        }
    }

    root
}

/// Reconstruct a session from a save-tree compound.
///
/// Upgrades are rebuilt through the registered factories; trackers are
/// rebuilt from the complete registered set (so a session always starts with
/// every known tracker type) and persisted payloads are overlaid where
/// present. See the module docs for the failure policy.
pub fn deserialize(
    player: PlayerId,
    tag: &TagCompound,
    factories: &FactoryRegistry,
    config: &WardplateConfig,
) -> ArmourSession {
    let mut upgrades = UpgradeRegistry::new(config.max_budget);
    let empty_payload = TagCompound::new();

    if let Some(records) = tag.get_list(UPGRADES_KEY) {
        for record in records {
            let Tag::Compound(record) = record else {
                warn!(%player, "skipping non-compound upgrade record");
                continue;
            };
            let Some(key) = record.get_text(RECORD_KEY) else {
                warn!(%player, "skipping upgrade record without a key");
                continue;
            };
            let Some(level) = record.get_u32(RECORD_LEVEL) else {
                warn!(%player, key, "skipping upgrade record without a valid level");
                continue;
            };
            let payload = record.get_compound(RECORD_PAYLOAD).unwrap_or(&empty_payload);

            match factories.build_upgrade(key, level, payload) {
                Ok(upgrade) => {
                    if !upgrades.apply(upgrade) {
                        warn!(
                            %player,
                            key,
                            level,
                            "skipping persisted upgrade that violates budget or level rules"
                        );
                    }
                }
                Err(error) => {
                    warn!(%player, key, level, %error, "skipping unusable persisted upgrade");
                }
            }
        }
    }

    let mut trackers = crate::session::build_tracker_set(player, config, factories);
    for tracker in trackers.iter_mut() {
        if let Some(payload) = tag.get_compound(tracker.key()) {
            tracker.read_tag(payload);
        }
    }

    ArmourSession::from_parts(player, upgrades, trackers)
}

#[cfg(test)]
mod tests {
    use wardplate_types::PlayerSnapshot;

    use super::*;
    use crate::error::WardplateError;
    use crate::tracker::StatTracker;
    use crate::upgrade::Upgrade;

    const UPGRADE_KEY: &str = "test.upgrade.stub";
    const TRACKER_KEY: &str = "test.tracker.counter";

    #[derive(Debug)]
    struct StubUpgrade {
        level: u32,
    }

    impl Upgrade for StubUpgrade {
        fn key(&self) -> &str {
            UPGRADE_KEY
        }

        fn level(&self) -> u32 {
            self.level
        }

        fn cost(&self) -> u32 {
            // 10 points per level keeps deltas positive.
            self.level.saturating_mul(10)
        }
    }

    #[derive(Debug)]
    struct CounterTracker {
        count: u32,
        dirty: bool,
    }

    impl StatTracker for CounterTracker {
        fn key(&self) -> &str {
            TRACKER_KEY
        }

        fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> bool {
            if snapshot.blocks_broken > 0 {
                self.count = self.count.saturating_add(snapshot.blocks_broken);
                self.dirty = true;
            }
            false
        }

        fn candidates(&self) -> Vec<Box<dyn Upgrade>> {
            Vec::new()
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

        fn write_tag(&self) -> TagCompound {
            let mut tag = TagCompound::new();
            tag.set_u32("count", self.count);
            tag
        }

        fn read_tag(&mut self, tag: &TagCompound) {
            if let Some(count) = tag.get_u32("count") {
                self.count = count;
            }
        }
    }

    fn stub_upgrade(
        level: u32,
        _payload: &TagCompound,
    ) -> Result<Box<dyn Upgrade>, WardplateError> {
        if level == 0 {
            return Err(WardplateError::MalformedRecord {
                context: String::from("upgrade level must be >= 1"),
            });
        }
        Ok(Box::new(StubUpgrade { level }))
    }

    fn counter_tracker() -> Result<Box<dyn StatTracker>, WardplateError> {
        Ok(Box::new(CounterTracker {
            count: 0,
            dirty: false,
        }))
    }

    fn broken_tracker() -> Result<Box<dyn StatTracker>, WardplateError> {
        Err(WardplateError::TrackerConstruction {
            key: String::from("test.tracker.broken"),
            reason: String::from("deliberate test failure"),
        })
    }

    fn test_factories() -> FactoryRegistry {
        let mut factories = FactoryRegistry::new();
        factories.register_upgrade(UPGRADE_KEY, stub_upgrade);
        factories.register_tracker(TRACKER_KEY, counter_tracker);
        factories
    }

    fn session_with_level(level: u32) -> ArmourSession {
        let factories = test_factories();
        let mut session = ArmourSession::new(
            PlayerId::new(),
            &WardplateConfig::default(),
            &factories,
        );
        assert!(session.upgrades_mut().apply(Box::new(StubUpgrade { level })));
        session
    }

    #[test]
    fn roundtrip_reproduces_registry() {
        let factories = test_factories();
        let mut session = session_with_level(3);

        let tree = serialize(&mut session, WriteMode::Full);
        let restored = deserialize(
            session.player(),
            &tree,
            &factories,
            &WardplateConfig::default(),
        );

        assert_eq!(restored.upgrades().level_of(UPGRADE_KEY), Some(3));
        assert_eq!(restored.upgrades().cost_of(UPGRADE_KEY), Some(30));
        assert_eq!(restored.upgrades().total_cost(), session.upgrades().total_cost());
    }

    #[test]
    fn roundtrip_restores_tracker_counters() {
        let factories = test_factories();
        let player = PlayerId::new();
        let mut session =
            ArmourSession::new(player, &WardplateConfig::default(), &factories);

        let mut snapshot = PlayerSnapshot::idle(player, 1);
        snapshot.blocks_broken = 17;
        let _ = session.on_tick(&snapshot);

        let tree = serialize(&mut session, WriteMode::Full);
        let restored = deserialize(player, &tree, &factories, &WardplateConfig::default());

        let payload = restored
            .trackers()
            .get(TRACKER_KEY)
            .map(StatTracker::write_tag);
        assert_eq!(payload.and_then(|t| t.get_u32("count")), Some(17));
        // Freshly loaded state is clean.
        assert_eq!(
            restored.trackers().get(TRACKER_KEY).map(StatTracker::is_dirty),
            Some(false)
        );
    }

    #[test]
    fn dirty_mode_skips_clean_trackers() {
        let mut session = session_with_level(1);
        // No tracker activity: nothing dirty.
        let tree = serialize(&mut session, WriteMode::Dirty);
        assert!(!tree.contains_key(TRACKER_KEY));
        // Upgrade records are always written.
        assert!(tree.get_list(UPGRADES_KEY).is_some());
    }

    #[test]
    fn full_mode_writes_clean_trackers_too() {
        let mut session = session_with_level(1);
        let tree = serialize(&mut session, WriteMode::Full);
        assert!(tree.contains_key(TRACKER_KEY));
    }

    #[test]
    fn writing_clears_dirty_flags() {
        let factories = test_factories();
        let player = PlayerId::new();
        let mut session =
            ArmourSession::new(player, &WardplateConfig::default(), &factories);

        let mut snapshot = PlayerSnapshot::idle(player, 1);
        snapshot.blocks_broken = 4;
        let _ = session.on_tick(&snapshot);
        assert_eq!(
            session.trackers().get(TRACKER_KEY).map(StatTracker::is_dirty),
            Some(true)
        );

        let tree = serialize(&mut session, WriteMode::Dirty);
        assert!(tree.contains_key(TRACKER_KEY));
        assert_eq!(
            session.trackers().get(TRACKER_KEY).map(StatTracker::is_dirty),
            Some(false)
        );

        // A second incremental save writes nothing for the tracker.
        let tree = serialize(&mut session, WriteMode::Dirty);
        assert!(!tree.contains_key(TRACKER_KEY));
    }

    #[test]
    fn unknown_upgrade_key_is_skipped() {
        let factories = test_factories();

        let mut record = TagCompound::new();
        record.set_text("key", "removed.upgrade.key");
        record.set_u32("level", 2);
        let mut tree = TagCompound::new();
        tree.set_list(UPGRADES_KEY, vec![Tag::Compound(record)]);

        let restored = deserialize(
            PlayerId::new(),
            &tree,
            &factories,
            &WardplateConfig::default(),
        );
        assert!(restored.upgrades().is_empty());
        // The default tracker set is still complete.
        assert!(restored.trackers().contains(TRACKER_KEY));
    }

    #[test]
    fn malformed_records_are_skipped() {
        let factories = test_factories();

        let mut no_key = TagCompound::new();
        no_key.set_u32("level", 1);
        let mut no_level = TagCompound::new();
        no_level.set_text("key", UPGRADE_KEY);
        let mut good = TagCompound::new();
        good.set_text("key", UPGRADE_KEY);
        good.set_u32("level", 2);

        let mut tree = TagCompound::new();
        tree.set_list(
            UPGRADES_KEY,
            vec![
                Tag::Compound(no_key),
                Tag::Compound(no_level),
                Tag::Int(9),
                Tag::Compound(good),
            ],
        );

        let restored = deserialize(
            PlayerId::new(),
            &tree,
            &factories,
            &WardplateConfig::default(),
        );
        assert_eq!(restored.upgrades().len(), 1);
        assert_eq!(restored.upgrades().level_of(UPGRADE_KEY), Some(2));
    }

    #[test]
    fn overbudget_persisted_upgrade_is_skipped() {
        let factories = test_factories();

        let mut record = TagCompound::new();
        record.set_text("key", UPGRADE_KEY);
        record.set_u32("level", 3); // cost 30
        let mut tree = TagCompound::new();
        tree.set_list(UPGRADES_KEY, vec![Tag::Compound(record)]);

        let config = WardplateConfig {
            max_budget: 20,
            threshold_scale_pct: 100,
        };
        let restored = deserialize(PlayerId::new(), &tree, &factories, &config);
        assert!(restored.upgrades().is_empty());
        assert_eq!(restored.upgrades().total_cost(), 0);
    }

    #[test]
    fn failed_tracker_factory_is_omitted_on_load() {
        let mut factories = test_factories();
        factories.register_tracker("test.tracker.broken", broken_tracker);

        let player = PlayerId::new();
        let mut session =
            ArmourSession::new(player, &WardplateConfig::default(), &factories);
        let mut snapshot = PlayerSnapshot::idle(player, 1);
        snapshot.blocks_broken = 8;
        let _ = session.on_tick(&snapshot);

        let tree = serialize(&mut session, WriteMode::Full);
        let restored = deserialize(player, &tree, &factories, &WardplateConfig::default());

        // The failing factory leaves a gap; the working tracker still loads
        // with its persisted payload overlaid.
        assert_eq!(restored.trackers().len(), 1);
        assert!(!restored.trackers().contains("test.tracker.broken"));
        let payload = restored
            .trackers()
            .get(TRACKER_KEY)
            .map(StatTracker::write_tag);
        assert_eq!(payload.and_then(|t| t.get_u32("count")), Some(8));
    }

    #[test]
    fn empty_tree_yields_default_tracker_set() {
        let factories = test_factories();
        let restored = deserialize(
            PlayerId::new(),
            &TagCompound::new(),
            &factories,
            &WardplateConfig::default(),
        );
        assert!(restored.upgrades().is_empty());
        assert_eq!(restored.trackers().len(), 1);
    }
}
