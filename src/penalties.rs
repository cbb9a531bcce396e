//! Quality-indexed penalty tables.
//!
//! Each of the four scalar weights (match, mismatch, gap-open+extend,
//! gap-extend) is expanded into a table indexed by PHRED quality. A base
//! called with quality `q` carries the error-probability weight
//! `w(q) = 1 − 10^(−(q + qN)/10)`, where `qN` is the quality contribution of
//! a fully ambiguous call (error probability 0.75). The table entry is then
//! `10 + round(w(q) · weight)`, so low-quality positions are cheap to edit,
//! high-quality positions expensive, and no entry reaches zero at `q = 0`.

/// Number of valid Sanger PHRED scores (0 through 93).
pub const PHRED_RANGE: usize = 94;

/// Cost floor added to every table entry.
const BASE_COST: i32 = 10;

/// The four quality-indexed cost tables used by the dynamic program.
///
/// Tables are immutable once built; [`PenaltyTables::new`] is a pure function
/// of the four scalars and is re-run whenever they change.
#[derive(Debug, Clone)]
pub struct PenaltyTables {
    match_cost: [i32; PHRED_RANGE],
    mismatch_cost: [i32; PHRED_RANGE],
    gap_open_cost: [i32; PHRED_RANGE],
    gap_extend_cost: [i32; PHRED_RANGE],
}

impl PenaltyTables {
    /// Build the four tables from the scalar weights.
    pub fn new(
        match_weight: i32,
        mismatch_weight: i32,
        gap_open_extend_weight: i32,
        gap_extend_weight: i32,
    ) -> Self {
        // P(error | N) = 0.75
        let ambig_quality = -10.0 * 0.75f64.log10();

        let mut tables = Self {
            match_cost: [0; PHRED_RANGE],
            mismatch_cost: [0; PHRED_RANGE],
            gap_open_cost: [0; PHRED_RANGE],
            gap_extend_cost: [0; PHRED_RANGE],
        };
        for q in 0..PHRED_RANGE {
            let weight = 1.0 - 10f64.powf(-(q as f64 + ambig_quality) / 10.0);
            tables.match_cost[q] = BASE_COST + (weight * f64::from(match_weight)).round() as i32;
            tables.mismatch_cost[q] =
                BASE_COST + (weight * f64::from(mismatch_weight)).round() as i32;
            tables.gap_open_cost[q] =
                BASE_COST + (weight * f64::from(gap_open_extend_weight)).round() as i32;
            tables.gap_extend_cost[q] =
                BASE_COST + (weight * f64::from(gap_extend_weight)).round() as i32;
        }
        tables
    }

    #[inline(always)]
    pub fn match_cost(&self, q: usize) -> i32 {
        self.match_cost[q]
    }

    #[inline(always)]
    pub fn mismatch_cost(&self, q: usize) -> i32 {
        self.mismatch_cost[q]
    }

    #[inline(always)]
    pub fn gap_open_cost(&self, q: usize) -> i32 {
        self.gap_open_cost[q]
    }

    #[inline(always)]
    pub fn gap_extend_cost(&self, q: usize) -> i32 {
        self.gap_extend_cost[q]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    fn default_tables() -> PenaltyTables {
        PenaltyTables::new(
            defaults::MATCH_WEIGHT,
            defaults::MISMATCH_WEIGHT,
            defaults::GAP_OPEN_EXTEND_WEIGHT,
            defaults::GAP_EXTEND_WEIGHT,
        )
    }

    #[test]
    fn zero_quality_entries() {
        // w(0) = 1 - 10^(-qN/10) = 1 - 0.75 = 0.25 exactly
        let t = default_tables();
        assert_eq!(t.match_cost(0), 7); // 10 + round(0.25 * -10)
        assert_eq!(t.mismatch_cost(0), 18); // 10 + round(0.25 * 30)
        assert_eq!(t.gap_open_cost(0), 23); // 10 + round(0.25 * 50)
        assert_eq!(t.gap_extend_cost(0), 15); // 10 + round(0.25 * 20)
    }

    #[test]
    fn high_quality_entries_approach_full_weight() {
        let t = default_tables();
        assert_eq!(t.match_cost(93), 0);
        assert_eq!(t.mismatch_cost(93), 40);
        assert_eq!(t.gap_open_cost(93), 60);
        assert_eq!(t.gap_extend_cost(93), 30);
    }

    #[test]
    fn positive_weights_are_monotone_in_quality() {
        let t = default_tables();
        for q in 1..PHRED_RANGE {
            assert!(t.mismatch_cost(q) >= t.mismatch_cost(q - 1));
            assert!(t.gap_open_cost(q) >= t.gap_open_cost(q - 1));
            assert!(t.gap_extend_cost(q) >= t.gap_extend_cost(q - 1));
            // Negative match weight runs the other way.
            assert!(t.match_cost(q) <= t.match_cost(q - 1));
        }
    }

    #[test]
    fn gap_open_dominates_gap_extend_everywhere() {
        // The DP's run-length accounting relies on opening never being
        // cheaper than extending at the same quality.
        let t = default_tables();
        for q in 0..PHRED_RANGE {
            assert!(t.gap_open_cost(q) > t.gap_extend_cost(q), "q={q}");
        }
    }
}
