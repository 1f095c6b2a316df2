//! The per-tick view of one player handed in by the host engine.
//!
//! The tick driver lives in the host: once per simulation step it assembles a
//! [`PlayerSnapshot`] and calls into the session. Counter fields are deltas
//! for that tick only (blocks broken this tick, damage taken this tick), not
//! running totals -- the trackers own the accumulation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// Everything the trackers may observe about one player for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// The player this snapshot describes.
    pub player: PlayerId,
    /// The host's simulation tick number.
    pub tick: u64,
    /// Current health.
    pub health: Decimal,
    /// Current maximum health (after attribute modifiers).
    pub max_health: Decimal,
    /// Blocks the player broke during this tick.
    pub blocks_broken: u32,
    /// Damage the player received during this tick, in health points.
    pub damage_taken: Decimal,
    /// Healing the player received during this tick, in health points.
    pub healing_received: Decimal,
    /// Whether the player was sprinting during this tick.
    pub sprinting: bool,
    /// Distance fallen on a landing that completed this tick, in blocks.
    /// Zero when the player did not land.
    pub fall_distance: Decimal,
}

impl PlayerSnapshot {
    /// A snapshot for a player who did nothing this tick.
    ///
    /// Tests and hosts start from this and set the fields that apply.
    pub fn idle(player: PlayerId, tick: u64) -> Self {
        Self {
            player,
            tick,
            health: Decimal::from(20),
            max_health: Decimal::from(20),
            blocks_broken: 0,
            damage_taken: Decimal::ZERO,
            healing_received: Decimal::ZERO,
            sprinting: false,
            fall_distance: Decimal::ZERO,
        }
    }
}
