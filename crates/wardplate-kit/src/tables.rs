//! Threshold and cost table helpers shared by the stock trackers.
//!
//! Every stock tracker follows the same shape: a monotone threshold table
//! (how much behaviour earns each level) and a monotone cost table (what
//! each level costs against the budget). Thresholds can be scaled per
//! session via the config's `threshold_scale_pct`; costs never scale.
//!
//! Levels are 1-based; a table of length N supports levels `1..=N`.

use rust_decimal::Decimal;

/// The threshold for `index`, scaled to `scale_pct` percent (minimum 1).
fn scaled_threshold(threshold: u32, scale_pct: u32) -> u32 {
    let scaled = u64::from(threshold)
        .saturating_mul(u64::from(scale_pct))
        .checked_div(100)
        .unwrap_or(0);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Highest level justified by `value` against a scaled threshold table.
///
/// Returns 0 when no threshold is met.
pub fn reached_level(thresholds: &[u32], value: u32, scale_pct: u32) -> u32 {
    let count = thresholds
        .iter()
        .filter(|t| value >= scaled_threshold(**t, scale_pct))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// [`reached_level`] for trackers that accumulate a [`Decimal`] stat.
pub fn reached_level_decimal(thresholds: &[u32], value: Decimal, scale_pct: u32) -> u32 {
    let count = thresholds
        .iter()
        .filter(|t| value >= Decimal::from(scaled_threshold(**t, scale_pct)))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Table entry for a 1-based level. `None` when the level is 0 or past the
/// end of the table.
pub fn value_for(table: &[u32], level: u32) -> Option<u32> {
    let index = usize::try_from(level.checked_sub(1)?).ok()?;
    table.get(index).copied()
}
