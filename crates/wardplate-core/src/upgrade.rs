//! Upgrades and the budget-enforced upgrade registry.
//!
//! A player's equipment holds at most one upgrade per key. Each upgrade has a
//! level and a point cost, and the registry enforces a total cost budget
//! (default [`DEFAULT_MAX_BUDGET`] = 100 points).
//!
//! # Admission rule
//!
//! [`UpgradeRegistry::apply`] admits a candidate when:
//!
//! - the key is new and `total_cost + cost <= max_budget`, or
//! - the key exists, the candidate's level is strictly higher, its cost is
//!   not lower than the current entry's (non-negative delta), and
//!   `total_cost + delta <= max_budget`.
//!
//! The level comparison is exactly `next > current` -- a level-3 candidate
//! replaces a level-1 entry in one step, and a zero cost delta is allowed.
//! Rejection has no side effects and is reported by the boolean return, not
//! an error.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;
use wardplate_types::{AttributeModifier, ModifierMap, PlayerSnapshot, TagCompound};

/// Default total cost budget for one player's equipment.
pub const DEFAULT_MAX_BUDGET: u32 = 100;

/// One named, leveled perk occupying budget points.
///
/// Implementations are immutable once constructed as far as key, level, and
/// cost are concerned; a level-up replaces the entry wholesale rather than
/// mutating it. The optional hooks ([`on_tick`](Upgrade::on_tick), the tag
/// payload) exist for upgrades that carry per-session state; most stock
/// upgrades keep the defaults.
pub trait Upgrade: fmt::Debug {
    /// Stable identifier, unique across all upgrade types
    /// (e.g. `"wardplate.upgrade.digging"`).
    fn key(&self) -> &str;

    /// Level of this candidate, starting at 1.
    fn level(&self) -> u32;

    /// Budget points this upgrade consumes at its level.
    fn cost(&self) -> u32;

    /// Attribute modifiers this upgrade grants, as
    /// `(attribute name, modifier)` pairs. Default: none.
    fn attribute_modifiers(&self) -> Vec<(String, AttributeModifier)> {
        Vec::new()
    }

    /// Per-tick hook for upgrades with active behaviour. Default: no-op.
    fn on_tick(&mut self, _snapshot: &PlayerSnapshot) {}

    /// Opaque persisted payload. Default: empty compound.
    fn write_tag(&self) -> TagCompound {
        TagCompound::new()
    }

    /// Restore per-session state from a persisted payload. Default: no-op.
    fn read_tag(&mut self, _tag: &TagCompound) {}
}

/// The set of admitted upgrades for one player, under a total cost budget.
///
/// Invariant: `total_cost` equals the sum of the entries' costs and never
/// exceeds `max_budget`.
#[derive(Debug)]
pub struct UpgradeRegistry {
    /// Upgrade key to admitted upgrade.
    entries: BTreeMap<String, Box<dyn Upgrade>>,
    /// Sum of the admitted upgrades' costs.
    total_cost: u32,
    /// Maximum total cost this player may hold.
    max_budget: u32,
}

impl UpgradeRegistry {
    /// Create an empty registry with the given budget.
    pub const fn new(max_budget: u32) -> Self {
        Self {
            entries: BTreeMap::new(),
            total_cost: 0,
            max_budget,
        }
    }

    /// Current total cost of all admitted upgrades.
    pub const fn total_cost(&self) -> u32 {
        self.total_cost
    }

    /// The budget ceiling.
    pub const fn max_budget(&self) -> u32 {
        self.max_budget
    }

    /// Number of admitted upgrades.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no upgrades are admitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an upgrade with the given key is admitted.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Current level of the upgrade at `key`, if admitted.
    pub fn level_of(&self, key: &str) -> Option<u32> {
        self.entries.get(key).map(|u| u.level())
    }

    /// Current cost of the upgrade at `key`, if admitted.
    pub fn cost_of(&self, key: &str) -> Option<u32> {
        self.entries.get(key).map(|u| u.cost())
    }

    /// Iterate over `(key, upgrade)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Upgrade)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Try to admit a candidate upgrade.
    ///
    /// Returns whether the candidate was admitted. Rejection leaves the
    /// registry untouched. See the module docs for the admission rule.
    pub fn apply(&mut self, candidate: Box<dyn Upgrade>) -> bool {
        let key = candidate.key().to_owned();
        let next_level = candidate.level();
        let next_cost = candidate.cost();

        let new_total = if let Some(existing) = self.entries.get(&key) {
            let current_level = existing.level();
            if next_level <= current_level {
                debug!(
                    key,
                    next_level, current_level, "upgrade rejected: level not higher"
                );
                return false;
            }
            // Non-negative cost delta: checked_sub fails exactly when the
            // candidate is cheaper than the current entry.
            let Some(delta) = next_cost.checked_sub(existing.cost()) else {
                debug!(key, "upgrade rejected: cost lower than current entry");
                return false;
            };
            let Some(total) = self.total_cost.checked_add(delta) else {
                debug!(key, "upgrade rejected: cost delta overflows total");
                return false;
            };
            total
        } else {
            let Some(total) = self.total_cost.checked_add(next_cost) else {
                debug!(key, "upgrade rejected: cost overflows total");
                return false;
            };
            total
        };

        if new_total > self.max_budget {
            debug!(
                key,
                new_total,
                max_budget = self.max_budget,
                "upgrade rejected: over budget"
            );
            return false;
        }

        self.total_cost = new_total;
        self.entries.insert(key, candidate);
        true
    }

    /// Union of all attribute modifiers across admitted upgrades,
    /// duplicates allowed. Pure read; the host applies the result to the
    /// player's attribute system.
    pub fn aggregate_modifiers(&self) -> ModifierMap {
        let mut map: BTreeMap<String, Vec<AttributeModifier>> = BTreeMap::new();
        for upgrade in self.entries.values() {
            for (attribute, modifier) in upgrade.attribute_modifiers() {
                map.entry(attribute).or_default().push(modifier);
            }
        }
        map
    }

    /// Run the per-tick hook of every admitted upgrade.
    pub fn tick_all(&mut self, snapshot: &PlayerSnapshot) {
        for upgrade in self.entries.values_mut() {
            upgrade.on_tick(snapshot);
        }
    }
}

impl Default for UpgradeRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use wardplate_types::{ModifierId, ModifierOp};

    use super::*;

    /// Minimal upgrade for registry tests: key, level, cost, one modifier.
    #[derive(Debug)]
    struct Stub {
        key: &'static str,
        level: u32,
        cost: u32,
    }

    impl Stub {
        fn boxed(key: &'static str, level: u32, cost: u32) -> Box<dyn Upgrade> {
            Box::new(Self { key, level, cost })
        }
    }

    impl Upgrade for Stub {
        fn key(&self) -> &str {
            self.key
        }

        fn level(&self) -> u32 {
            self.level
        }

        fn cost(&self) -> u32 {
            self.cost
        }

        fn attribute_modifiers(&self) -> Vec<(String, AttributeModifier)> {
            vec![(
                String::from("generic.armor"),
                AttributeModifier::new(
                    ModifierId::from_u128(0xBEEF),
                    self.key,
                    Decimal::from(self.level),
                    ModifierOp::Add,
                ),
            )]
        }
    }

    #[test]
    fn admit_new_upgrade_within_budget() {
        let mut registry = UpgradeRegistry::default();
        assert!(registry.apply(Stub::boxed("a", 1, 40)));
        assert_eq!(registry.total_cost(), 40);
        assert_eq!(registry.level_of("a"), Some(1));
    }

    #[test]
    fn reject_new_upgrade_over_budget() {
        let mut registry = UpgradeRegistry::new(30);
        assert!(!registry.apply(Stub::boxed("a", 1, 40)));
        assert_eq!(registry.total_cost(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn level_up_delta_then_budget_exhaustion() {
        // Budget 100. A(1, 40) accepted -> 40. A(2, 70) accepted: delta 30,
        // total 70 <= 100. B(1, 40) rejected: 70 + 40 > 100.
        let mut registry = UpgradeRegistry::default();
        assert!(registry.apply(Stub::boxed("a", 1, 40)));
        assert_eq!(registry.total_cost(), 40);

        assert!(registry.apply(Stub::boxed("a", 2, 70)));
        assert_eq!(registry.total_cost(), 70);
        assert_eq!(registry.level_of("a"), Some(2));

        assert!(!registry.apply(Stub::boxed("b", 1, 40)));
        assert_eq!(registry.total_cost(), 70);
        assert!(!registry.contains("b"));
    }

    #[test]
    fn reject_equal_or_lower_level() {
        let mut registry = UpgradeRegistry::default();
        assert!(registry.apply(Stub::boxed("a", 2, 10)));
        assert!(!registry.apply(Stub::boxed("a", 2, 20)));
        assert!(!registry.apply(Stub::boxed("a", 1, 5)));
        assert_eq!(registry.level_of("a"), Some(2));
        assert_eq!(registry.total_cost(), 10);
    }

    #[test]
    fn reject_negative_cost_delta() {
        let mut registry = UpgradeRegistry::default();
        assert!(registry.apply(Stub::boxed("a", 1, 10)));
        // Higher level but cheaper: rejected, no side effects.
        assert!(!registry.apply(Stub::boxed("a", 2, 5)));
        assert_eq!(registry.level_of("a"), Some(1));
        assert_eq!(registry.total_cost(), 10);
    }

    #[test]
    fn zero_cost_delta_replacement_is_allowed() {
        let mut registry = UpgradeRegistry::default();
        assert!(registry.apply(Stub::boxed("a", 1, 10)));
        assert!(registry.apply(Stub::boxed("a", 2, 10)));
        assert_eq!(registry.level_of("a"), Some(2));
        assert_eq!(registry.total_cost(), 10);
    }

    #[test]
    fn level_skip_is_allowed() {
        // The rule is exactly `next > current`, not `next == current + 1`.
        let mut registry = UpgradeRegistry::default();
        assert!(registry.apply(Stub::boxed("a", 1, 10)));
        assert!(registry.apply(Stub::boxed("a", 4, 25)));
        assert_eq!(registry.level_of("a"), Some(4));
        assert_eq!(registry.total_cost(), 25);
    }

    #[test]
    fn level_up_rejected_when_delta_breaks_budget() {
        let mut registry = UpgradeRegistry::new(50);
        assert!(registry.apply(Stub::boxed("a", 1, 30)));
        assert!(registry.apply(Stub::boxed("b", 1, 15)));
        // Delta 20 would push 45 -> 65 past the 50 budget.
        assert!(!registry.apply(Stub::boxed("a", 2, 50)));
        assert_eq!(registry.level_of("a"), Some(1));
        assert_eq!(registry.total_cost(), 45);
    }

    #[test]
    fn total_never_exceeds_budget_under_mixed_sequences() {
        // A mix of admissions, level-ups, downgrades, and over-budget
        // candidates; the invariant must hold after every single call.
        let sequence: &[(&'static str, u32, u32)] = &[
            ("a", 1, 40),
            ("b", 1, 30),
            ("a", 2, 55),
            ("c", 1, 20),
            ("b", 1, 10),
            ("c", 3, 20),
            ("d", 1, 90),
            ("a", 3, 60),
            ("b", 2, 35),
            ("a", 2, 10),
            ("d", 1, 5),
            ("c", 4, 25),
            ("b", 3, 35),
            ("a", 4, 61),
            ("d", 2, 6),
        ];

        let mut registry = UpgradeRegistry::default();
        for &(key, level, cost) in sequence {
            let _ = registry.apply(Stub::boxed(key, level, cost));
            assert!(registry.total_cost() <= registry.max_budget());
            let sum: u32 = registry.iter().map(|(_, u)| u.cost()).sum();
            assert_eq!(sum, registry.total_cost());
        }
    }

    #[test]
    fn aggregate_modifiers_unions_all_entries() {
        let mut registry = UpgradeRegistry::default();
        assert!(registry.apply(Stub::boxed("a", 1, 5)));
        assert!(registry.apply(Stub::boxed("b", 3, 5)));

        let map = registry.aggregate_modifiers();
        let modifiers = map.get("generic.armor").map(Vec::as_slice);
        assert_eq!(modifiers.map(<[AttributeModifier]>::len), Some(2));

        let amounts: Vec<Decimal> = modifiers
            .unwrap_or(&[])
            .iter()
            .map(|m| m.amount)
            .collect();
        assert!(amounts.contains(&Decimal::from(1)));
        assert!(amounts.contains(&Decimal::from(3)));
    }

    #[test]
    fn aggregate_on_empty_registry_is_empty() {
        let registry = UpgradeRegistry::default();
        assert!(registry.aggregate_modifiers().is_empty());
    }
}
