//! Pure budget math for quote versions (PRD-21).
//!
//! Pool budget, editing hours, shot-hour totals, and the clamps that keep
//! user input inside documented ranges. No side effects, no error paths:
//! out-of-range input is clamped, and a negative remaining budget simply
//! signals over-budget.

use crate::shot::BuilderShot;

// ---------------------------------------------------------------------------
// Clamp bounds
// ---------------------------------------------------------------------------

/// Minimum efficiency multiplier a shot may carry.
pub const MIN_EFFICIENCY: f64 = 0.1;

/// Maximum efficiency multiplier a shot may carry.
pub const MAX_EFFICIENCY: f64 = 5.0;

/// Minimum film duration in seconds.
pub const MIN_DURATION_SECS: i32 = 1;

/// Maximum film duration in seconds (10 minutes).
pub const MAX_DURATION_SECS: i32 = 600;

/// Editing effort is billed in chunks of this many seconds of film.
pub const EDITING_CHUNK_SECS: i32 = 30;

// ---------------------------------------------------------------------------
// Budget functions
// ---------------------------------------------------------------------------

/// Total hours the pool allows for a film of the given duration.
pub fn pool_budget_hours(duration_secs: i32, hours_per_second: f64) -> f64 {
    duration_secs as f64 * hours_per_second
}

/// Post-production editing hours for a film of the given duration.
///
/// Billed per started 30-second chunk: any partial chunk counts as a full
/// one (ceiling, not floor).
pub fn editing_hours(duration_secs: i32, editing_hours_per_30s: f64) -> f64 {
    if duration_secs <= 0 {
        return 0.0;
    }
    let chunks = (duration_secs + EDITING_CHUNK_SECS - 1) / EDITING_CHUNK_SECS;
    chunks as f64 * editing_hours_per_30s
}

/// Sum of adjusted hours across a shot list (companion rows included).
pub fn total_shot_hours(shots: &[BuilderShot]) -> f64 {
    shots.iter().map(|s| s.adjusted_hours()).sum()
}

/// Total consumed hours: shot work plus editing.
pub fn total_hours(shot_hours: f64, editing_hours: f64) -> f64 {
    shot_hours + editing_hours
}

/// Hours left in the pool. Negative means over-budget, not an error.
pub fn remaining_budget(pool: f64, total: f64) -> f64 {
    pool - total
}

// ---------------------------------------------------------------------------
// Clamps
// ---------------------------------------------------------------------------

/// Clamp an efficiency multiplier into `[MIN_EFFICIENCY, MAX_EFFICIENCY]`.
pub fn clamp_efficiency(value: f64) -> f64 {
    value.clamp(MIN_EFFICIENCY, MAX_EFFICIENCY)
}

/// Clamp a duration into `[MIN_DURATION_SECS, MAX_DURATION_SECS]`.
pub fn clamp_duration(duration_secs: i32) -> i32 {
    duration_secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
}

/// Clamp a percentage into `[0, 100]`.
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to 2 decimal places, the precision persisted for derived hour
/// values.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Pool budget --

    #[test]
    fn pool_budget_scales_with_duration() {
        assert!((pool_budget_hours(60, 2.0) - 120.0).abs() < f64::EPSILON);
        assert!((pool_budget_hours(1, 0.5) - 0.5).abs() < f64::EPSILON);
    }

    // -- Editing hours (ceiling over 30s chunks) --

    #[test]
    fn editing_partial_chunk_counts_as_full() {
        assert!((editing_hours(45, 8.0) - 16.0).abs() < f64::EPSILON);
        assert!((editing_hours(1, 8.0) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn editing_whole_chunks() {
        assert!((editing_hours(30, 8.0) - 8.0).abs() < f64::EPSILON);
        assert!((editing_hours(60, 8.0) - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn editing_zero_duration() {
        assert!((editing_hours(0, 8.0) - 0.0).abs() < f64::EPSILON);
    }

    // -- Shot hour totals --

    #[test]
    fn total_shot_hours_sums_adjusted() {
        let mut a = BuilderShot::new("Wide", 3.0);
        a.quantity = 4;
        let mut b = BuilderShot::new("Close", 2.0);
        b.quantity = 2;
        b.efficiency_multiplier = 1.5;
        // 4*3*1.0 + 2*2*1.5 = 12 + 6
        assert!((total_shot_hours(&[a, b]) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn total_and_remaining() {
        let total = total_hours(18.0, 16.0);
        assert!((total - 34.0).abs() < f64::EPSILON);
        assert!((remaining_budget(120.0, total) - 86.0).abs() < f64::EPSILON);
        // Over-budget is a negative remainder, not an error.
        assert!(remaining_budget(30.0, total) < 0.0);
    }

    // -- Clamps --

    #[test]
    fn efficiency_clamp_boundaries() {
        assert!((clamp_efficiency(0.0) - 0.1).abs() < f64::EPSILON);
        assert!((clamp_efficiency(-1.0) - 0.1).abs() < f64::EPSILON);
        assert!((clamp_efficiency(6.0) - 5.0).abs() < f64::EPSILON);
        assert!((clamp_efficiency(2.5) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn duration_clamp_boundaries() {
        assert_eq!(clamp_duration(0), 1);
        assert_eq!(clamp_duration(-10), 1);
        assert_eq!(clamp_duration(601), 600);
        assert_eq!(clamp_duration(90), 90);
    }

    #[test]
    fn percentage_clamp_boundaries() {
        assert!((clamp_percentage(-5.0) - 0.0).abs() < f64::EPSILON);
        assert!((clamp_percentage(150.0) - 100.0).abs() < f64::EPSILON);
        assert!((clamp_percentage(42.5) - 42.5).abs() < f64::EPSILON);
        assert!((clamp_percentage(f64::NAN) - 0.0).abs() < f64::EPSILON);
    }

    // -- Rounding --

    #[test]
    fn round2_to_pennies() {
        assert!((round2(26.666_666) - 26.67).abs() < 1e-9);
        assert!((round2(80.009_999) - 80.01).abs() < 1e-9);
        assert!((round2(12.0) - 12.0).abs() < f64::EPSILON);
    }
}
