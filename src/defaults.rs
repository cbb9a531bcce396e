// src/defaults.rs

// Scoring constants (inverse-score convention: every weight is a cost to
// minimize). The match weight is negative so that confident matches pull the
// running total down; all four are rescaled per base quality in `penalties`.
pub const MATCH_WEIGHT: i32 = -10;
pub const MISMATCH_WEIGHT: i32 = 30;
pub const GAP_OPEN_EXTEND_WEIGHT: i32 = 50;
pub const GAP_EXTEND_WEIGHT: i32 = 20;

// Quality encoding constants
pub const PHRED_OFFSET: u8 = 33;
pub const ASSUMED_PHRED: u8 = 93;

/// Reference base treated as a wildcard during comparison. A query `N` is
/// compared literally and never rewarded as a match.
pub const AMBIGUOUS_BASE: u8 = b'N';
