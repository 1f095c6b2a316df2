//! Attribute modifiers produced for the host's attribute system.
//!
//! An admitted upgrade can contribute modifiers to named player attributes
//! ("generic.max\_health", "generic.movement\_speed", ...). The host owns the
//! attribute math; this library only aggregates the modifiers and hands the
//! multimap over each time equipment changes.
//!
//! Modifier identity matters: the host removes a modifier by its
//! [`ModifierId`] before re-applying a replacement, so stock upgrades use
//! fixed IDs rather than random ones.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::ModifierId;

/// How a modifier combines with the attribute's base value.
///
/// Matches the host engine's three-operation scheme: flat addition, then
/// additive percentage of base, then multiplicative percentage of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOp {
    /// `value += amount`
    Add,
    /// `value += base * amount`
    MultiplyBase,
    /// `value *= 1 + amount`
    MultiplyTotal,
}

/// One modifier applied to one named attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeModifier {
    /// Stable identity of this modifier in the host's attribute system.
    pub id: ModifierId,
    /// Human-readable name, conventionally the upgrade key that granted it.
    pub name: String,
    /// The modifier amount, fixed-point.
    pub amount: Decimal,
    /// How the amount combines with the attribute value.
    pub op: ModifierOp,
}

impl AttributeModifier {
    /// Convenience constructor.
    pub fn new(id: ModifierId, name: impl Into<String>, amount: Decimal, op: ModifierOp) -> Self {
        Self {
            id,
            name: name.into(),
            amount,
            op,
        }
    }
}

/// Attribute name to modifiers, duplicates allowed -- the union the host
/// applies to the player. Ordered so aggregation output is deterministic.
pub type ModifierMap = BTreeMap<String, Vec<AttributeModifier>>;
