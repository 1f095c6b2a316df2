//! Stat trackers: per-player behavioural counters that propose upgrades.
//!
//! A tracker watches one aspect of player behaviour through the per-tick
//! [`PlayerSnapshot`] (blocks broken, damage taken, ...). When its internal
//! threshold condition *newly* holds, its tick hook returns `true` and the
//! caller collects the tracker's candidate upgrades, forwarding them to the
//! upgrade registry. A tracker emits exactly one candidate set per tick in
//! which a threshold is newly crossed, and never before the threshold holds.
//!
//! # Dirty flags
//!
//! Trackers flag themselves dirty whenever their counters change. The
//! persistence codec writes only dirty trackers in incremental mode and
//! clears the flag on write, so an idle player's save stays small.

use std::collections::BTreeMap;
use std::fmt;

use wardplate_types::{PlayerSnapshot, TagCompound};

use crate::upgrade::Upgrade;

/// A per-player behavioural counter that proposes upgrades once a threshold
/// is crossed.
pub trait StatTracker: fmt::Debug {
    /// Stable identifier, unique across all tracker types
    /// (e.g. `"wardplate.tracker.digging"`). Doubles as the tracker's
    /// top-level key in the save tree.
    fn key(&self) -> &str;

    /// Update counters from this tick's snapshot.
    ///
    /// Returns `true` when the threshold condition newly holds, meaning
    /// [`candidates`](Self::candidates) should be collected this tick.
    fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> bool;

    /// The candidate upgrades this tracker currently justifies.
    ///
    /// Called only on ticks where [`on_tick`](Self::on_tick) returned
    /// `true`. Returns every justified level; the registry's admission rule
    /// keeps the highest affordable one.
    fn candidates(&self) -> Vec<Box<dyn Upgrade>>;

    /// Whether this tracker has unsaved counter changes.
    fn is_dirty(&self) -> bool;

    /// Flag the tracker as having unsaved changes.
    fn mark_dirty(&mut self);

    /// Clear the unsaved-changes flag. Called by the codec after writing.
    fn reset_dirty(&mut self);

    /// Scale this tracker's thresholds to the given percentage of their
    /// defaults (100 = unchanged). Default: no-op, for trackers without
    /// tunable thresholds.
    fn scale_thresholds(&mut self, _pct: u32) {}

    /// Persist the tracker's counters as an opaque payload.
    fn write_tag(&self) -> TagCompound;

    /// Restore counters from a persisted payload. Must not set the dirty
    /// flag -- freshly loaded state is clean by definition.
    fn read_tag(&mut self, tag: &TagCompound);
}

/// The set of trackers attached to one player's session, keyed by tracker id.
#[derive(Debug, Default)]
pub struct TrackerSet {
    trackers: BTreeMap<String, Box<dyn StatTracker>>,
}

impl TrackerSet {
    /// Create an empty tracker set.
    pub const fn new() -> Self {
        Self {
            trackers: BTreeMap::new(),
        }
    }

    /// Number of trackers in the set.
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Whether the set holds no trackers.
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Whether a tracker with the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.trackers.contains_key(key)
    }

    /// Look up a tracker by key.
    pub fn get(&self, key: &str) -> Option<&dyn StatTracker> {
        self.trackers.get(key).map(Box::as_ref)
    }

    /// Insert a tracker under its own key, replacing any previous one.
    pub fn insert(&mut self, tracker: Box<dyn StatTracker>) {
        self.trackers.insert(tracker.key().to_owned(), tracker);
    }

    /// Iterate over `(key, tracker)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn StatTracker)> {
        self.trackers.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Mutably iterate over the trackers in key order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn StatTracker>> {
        self.trackers.values_mut()
    }

    /// Tick every tracker and collect the candidates of those whose
    /// threshold newly holds.
    ///
    /// Iteration is best-effort and independent: every tracker is ticked
    /// regardless of what the others return.
    pub fn on_tick(&mut self, snapshot: &PlayerSnapshot) -> Vec<Box<dyn Upgrade>> {
        let mut candidates = Vec::new();
        for tracker in self.trackers.values_mut() {
            if tracker.on_tick(snapshot) {
                candidates.extend(tracker.candidates());
            }
        }
        candidates
    }
}
