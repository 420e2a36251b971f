//! Percentage-to-quantity apportionment for shot breakdowns (PRD-22).
//!
//! Largest-remainder method: floor every fractional share, then hand out the
//! leftover units to the largest remainders first. Ties break on base hours
//! (larger wins a leftover unit, smaller loses a trimmed one) and are
//! otherwise stable on input order. Output always sums exactly to the target
//! and preserves input order; no input panics.

// ---------------------------------------------------------------------------
// Input share
// ---------------------------------------------------------------------------

/// One shot's claim on the target count.
#[derive(Debug, Clone, Copy)]
pub struct DistributionShare {
    /// Target share of the total shot count, 0-100.
    pub percentage: f64,
    /// Base hours of the shot type, used only as a tie-break key.
    pub base_hours_each: f64,
}

// ---------------------------------------------------------------------------
// Apportionment
// ---------------------------------------------------------------------------

/// Distribute `total_target_count` units across `shares` by largest
/// remainder. Returns one quantity per share, in input order, summing to
/// the target whenever the target is non-negative.
pub fn distribute(total_target_count: i64, shares: &[DistributionShare]) -> Vec<u32> {
    let mut quantities = vec![0u32; shares.len()];
    if total_target_count <= 0 || shares.is_empty() {
        return quantities;
    }

    let target = total_target_count;
    let mut floors = vec![0i64; shares.len()];
    let mut remainders = vec![0f64; shares.len()];
    let mut allocated: i64 = 0;

    for (i, share) in shares.iter().enumerate() {
        let raw = target as f64 * share.percentage / 100.0;
        // Guard against NaN/negative inputs: treat as a zero claim.
        let raw = if raw.is_finite() && raw > 0.0 { raw } else { 0.0 };
        let floor = raw.floor();
        floors[i] = floor as i64;
        remainders[i] = raw - floor;
        allocated += floors[i];
    }

    if allocated > target {
        // Floating point edge (or shares summing past 100%): trim excess one
        // unit at a time from the smallest remainders, smaller base hours
        // losing first. Stable sort keeps input order on full ties.
        let mut ranking: Vec<usize> = (0..shares.len()).collect();
        ranking.sort_by(|&a, &b| {
            remainders[a]
                .total_cmp(&remainders[b])
                .then(shares[a].base_hours_each.total_cmp(&shares[b].base_hours_each))
        });

        let mut idx = 0;
        while allocated > target {
            let i = ranking[idx % ranking.len()];
            if floors[i] > 0 {
                floors[i] -= 1;
                allocated -= 1;
            }
            idx += 1;
        }
    } else if allocated < target {
        // Hand out the deficit by descending remainder, larger base hours
        // winning ties. Wrap via modulo if the deficit exceeds the share
        // count (degenerate percentage sets).
        let mut ranking: Vec<usize> = (0..shares.len()).collect();
        ranking.sort_by(|&a, &b| {
            remainders[b]
                .total_cmp(&remainders[a])
                .then(shares[b].base_hours_each.total_cmp(&shares[a].base_hours_each))
        });

        let deficit = target - allocated;
        for n in 0..deficit {
            let i = ranking[(n as usize) % ranking.len()];
            floors[i] += 1;
        }
    }

    for (i, &floor) in floors.iter().enumerate() {
        quantities[i] = floor.max(0) as u32;
    }
    quantities
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn share(percentage: f64, base_hours_each: f64) -> DistributionShare {
        DistributionShare {
            percentage,
            base_hours_each,
        }
    }

    fn total(quantities: &[u32]) -> i64 {
        quantities.iter().map(|&q| q as i64).sum()
    }

    // -- Exact-sum guarantee --

    #[test]
    fn sums_exactly_for_even_split() {
        let shares = vec![share(50.0, 3.0), share(50.0, 2.0)];
        assert_eq!(distribute(12, &shares), vec![6, 6]);
    }

    #[test]
    fn sums_exactly_across_targets_and_odd_percentages() {
        let shares = vec![
            share(33.3, 3.0),
            share(33.3, 2.0),
            share(16.7, 4.0),
            share(16.7, 1.0),
        ];
        for n in 0..=50 {
            let quantities = distribute(n, &shares);
            assert_eq!(total(&quantities), n, "target {n}");
        }
    }

    #[test]
    fn sums_exactly_when_percentages_do_not_reach_100() {
        let shares = vec![share(10.0, 3.0), share(20.0, 2.0)];
        let quantities = distribute(10, &shares);
        assert_eq!(total(&quantities), 10);
    }

    // -- Trivial inputs --

    #[test]
    fn zero_target_yields_zeros() {
        let shares = vec![share(60.0, 3.0), share(40.0, 2.0)];
        assert_eq!(distribute(0, &shares), vec![0, 0]);
    }

    #[test]
    fn negative_target_yields_zeros() {
        let shares = vec![share(60.0, 3.0)];
        assert_eq!(distribute(-3, &shares), vec![0]);
    }

    #[test]
    fn empty_shares_yield_empty() {
        assert!(distribute(10, &[]).is_empty());
    }

    // -- Remainder ranking --

    #[test]
    fn largest_remainder_wins_the_leftover_unit() {
        // 10 * 55% = 5.5, 10 * 45% = 4.5: floors 5+4, one unit left, equal
        // remainders broken by base hours below; make them unequal here.
        let shares = vec![share(56.0, 1.0), share(44.0, 9.0)];
        // raws 5.6 and 4.4: remainder 0.6 beats 0.4 despite smaller hours.
        assert_eq!(distribute(10, &shares), vec![6, 4]);
    }

    #[test]
    fn remainder_tie_goes_to_larger_base_hours() {
        // raws 5.5 and 4.5: equal remainders, second shot has larger hours.
        let shares = vec![share(55.0, 2.0), share(45.0, 6.0)];
        assert_eq!(distribute(10, &shares), vec![5, 5]);
    }

    #[test]
    fn full_tie_is_stable_on_input_order() {
        // Identical shares: the earlier shot wins the odd unit.
        let shares = vec![share(50.0, 3.0), share(50.0, 3.0)];
        assert_eq!(distribute(5, &shares), vec![3, 2]);
    }

    // -- Over-allocation trim --

    #[test]
    fn trims_when_percentages_exceed_100() {
        // raws 6.0 and 6.0: floors already sum to 12 > 10. Both remainders
        // are 0; the smaller base hours loses a unit first, then the trim
        // walks on to the next shot.
        let shares = vec![share(60.0, 5.0), share(60.0, 2.0)];
        assert_eq!(distribute(10, &shares), vec![5, 5]);
    }

    #[test]
    fn trim_never_goes_negative() {
        let shares = vec![share(300.0, 1.0), share(0.0, 2.0)];
        let quantities = distribute(4, &shares);
        assert_eq!(total(&quantities), 4);
        assert_eq!(quantities, vec![4, 0]);
    }

    // -- Deficit wrap --

    #[test]
    fn deficit_larger_than_share_count_wraps() {
        // All-zero percentages: every unit comes from the deficit pass,
        // cycling through the ranking without going out of bounds.
        let shares = vec![share(0.0, 3.0), share(0.0, 2.0)];
        let quantities = distribute(5, &shares);
        assert_eq!(total(&quantities), 5);
        assert_eq!(quantities, vec![3, 2]);
    }

    // -- Order preservation --

    #[test]
    fn output_preserves_input_order() {
        // Internal ranking would visit the last share first; output must not.
        let shares = vec![share(10.0, 1.0), share(20.0, 2.0), share(70.0, 3.0)];
        let quantities = distribute(10, &shares);
        assert_eq!(quantities, vec![1, 2, 7]);
    }

    // -- Hostile numeric input --

    #[test]
    fn nan_percentage_treated_as_zero_claim() {
        let shares = vec![share(f64::NAN, 3.0), share(100.0, 2.0)];
        let quantities = distribute(8, &shares);
        assert_eq!(total(&quantities), 8);
        assert_eq!(quantities[1], 8);
    }

    #[test]
    fn negative_percentage_treated_as_zero_claim() {
        let shares = vec![share(-50.0, 3.0), share(100.0, 2.0)];
        let quantities = distribute(6, &shares);
        assert_eq!(quantities, vec![0, 6]);
    }
}
