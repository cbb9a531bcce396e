//! The alignment engine object.
//!
//! [`Aligner`] is a long-lived object reused across many (reference, query)
//! pairs. It owns the penalty tables, copies of the current sequence windows,
//! and all working buffers: the rolling score/insertion rows, the full trace
//! matrix, and the CIGAR scratch window. Buffers grow to a high-water mark
//! through fallible reservation and are never shrunk, so a warm engine
//! allocates nothing on a stream of similar-sized reads.

use crate::alignment::cigar::PackedOp;
use crate::defaults;
use crate::error::{AlignError, Result};
use crate::penalties::{PenaltyTables, PHRED_RANGE};

/// Alignment mode along the reference axis. The query is always consumed
/// end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignMode {
    /// The alignment must consume the reference window from its start:
    /// leading reference bases not covered by the query are charged as
    /// deletions.
    Global,
    /// The alignment may begin at any reference column without penalty.
    SemiGlobal,
}

/// Fully materialised trace matrix, row-major over
/// `(subquery_len + 1) × (subdb_len + 1)` packed cells.
///
/// Score rows are rolling, but traceback jumps by variable run lengths, so
/// the trace must keep every row. This is the engine's dominant memory cost.
#[derive(Debug, Default)]
pub(crate) struct TraceMatrix {
    cells: Vec<PackedOp>,
    cols: usize,
}

impl TraceMatrix {
    /// Resize to `rows × cols`, reusing the existing allocation when it is
    /// large enough.
    fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        let needed = rows * cols;
        if needed > self.cells.len() {
            self.cells.try_reserve(needed - self.cells.len())?;
        }
        self.cells.resize(needed, PackedOp(0));
        self.cols = cols;
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn get(&self, row: usize, col: usize) -> PackedOp {
        self.cells[row * self.cols + col]
    }

    #[inline(always)]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [PackedOp] {
        let start = row * self.cols;
        &mut self.cells[start..start + self.cols]
    }
}

/// Quality-aware affine-gap aligner with an inverse-score (lower is better)
/// formulation.
///
/// Typical pipeline:
///
/// ```
/// use pyroalign::{AlignMode, Aligner};
///
/// let mut al = Aligner::with_defaults();
/// al.prepare(b"AAAACGT", b"TGCA", b"!!!!", 0, 0)?;
/// let score = al.align(AlignMode::Global)?;
/// al.trace()?;
/// assert_eq!(score, 60);
/// assert_eq!(al.show_cigar(), "3I 1=");
/// # Ok::<(), pyroalign::AlignError>(())
/// ```
pub struct Aligner {
    pub(crate) penalties: PenaltyTables,
    pub(crate) gap_open_extend: i32,
    pub(crate) gap_extend: i32,
    pub(crate) phred_offset: u8,

    // Owned copies of the current reference and query; the aligned windows
    // are the interiors left after the head/tail clips.
    pub(crate) db: Vec<u8>,
    pub(crate) db_head: usize,
    pub(crate) db_tail: usize,
    pub(crate) query: Vec<u8>,
    pub(crate) qual: Vec<u8>,
    pub(crate) query_head: usize,
    pub(crate) query_tail: usize,

    // Rolling score rows (length subdb_len + 1). After the sweep the
    // "previous" buffers hold the final row.
    pub(crate) pen_prev: Vec<i32>,
    pub(crate) pen_cur: Vec<i32>,
    pub(crate) ins_prev: Vec<i32>,
    pub(crate) ins_cur: Vec<i32>,
    // Per-column length of the insertion run ending in the cell above.
    pub(crate) ins_run_prev: Vec<u32>,
    pub(crate) ins_run_cur: Vec<u32>,

    pub(crate) trace: TraceMatrix,

    pub(crate) opt_score: i32,
    pub(crate) opt_score_col: usize,

    // CIGAR scratch; the live segment is the window [cigar_begin, cigar_end),
    // which the post-processing transforms shrink and grow in place.
    pub(crate) cigar_buf: Vec<PackedOp>,
    pub(crate) cigar_begin: usize,
    pub(crate) cigar_end: usize,

    /// Column in the reference window where the alignment begins.
    pub(crate) offset: usize,
}

impl Aligner {
    /// Create an engine from the four scalar weights (costs to minimize;
    /// the match weight is typically negative).
    pub fn new(
        match_weight: i32,
        mismatch_weight: i32,
        gap_open_extend: i32,
        gap_extend: i32,
    ) -> Self {
        Self {
            penalties: PenaltyTables::new(
                match_weight,
                mismatch_weight,
                gap_open_extend,
                gap_extend,
            ),
            gap_open_extend,
            gap_extend,
            phred_offset: defaults::PHRED_OFFSET,
            db: Vec::new(),
            db_head: 0,
            db_tail: 0,
            query: Vec::new(),
            qual: Vec::new(),
            query_head: 0,
            query_tail: 0,
            pen_prev: Vec::new(),
            pen_cur: Vec::new(),
            ins_prev: Vec::new(),
            ins_cur: Vec::new(),
            ins_run_prev: Vec::new(),
            ins_run_cur: Vec::new(),
            trace: TraceMatrix::default(),
            opt_score: 0,
            opt_score_col: 0,
            cigar_buf: Vec::new(),
            cigar_begin: 0,
            cigar_end: 0,
            offset: 0,
        }
    }

    /// Engine with the stock pyrosequencing weights.
    pub fn with_defaults() -> Self {
        Self::new(
            defaults::MATCH_WEIGHT,
            defaults::MISMATCH_WEIGHT,
            defaults::GAP_OPEN_EXTEND_WEIGHT,
            defaults::GAP_EXTEND_WEIGHT,
        )
    }

    /// Rebuild the penalty tables from new scalar weights. Prepared
    /// sequences and buffers are retained.
    pub fn set_penalties(
        &mut self,
        match_weight: i32,
        mismatch_weight: i32,
        gap_open_extend: i32,
        gap_extend: i32,
    ) {
        self.penalties = PenaltyTables::new(
            match_weight,
            mismatch_weight,
            gap_open_extend,
            gap_extend,
        );
        self.gap_open_extend = gap_open_extend;
        self.gap_extend = gap_extend;
    }

    /// Set the ASCII offset subtracted from quality bytes (33 for Sanger
    /// FASTQ). Applied when [`align`](Self::align) runs, not at preparation.
    pub fn set_phred_offset(&mut self, offset: u8) {
        self.phred_offset = offset;
    }

    /// Assign the reference window. `head_clip`/`tail_clip` bases are
    /// trimmed from the ends; the engine aligns against the interior.
    pub fn prepare_ref(&mut self, db: &[u8], head_clip: usize, tail_clip: usize) -> Result<()> {
        check_clips("reference", db.len(), head_clip, tail_clip)?;
        copy_into(&mut self.db, db)?;
        self.db_head = head_clip;
        self.db_tail = tail_clip;
        self.resize_buffers()
    }

    /// Assign the query and its per-base qualities. `qual` must be at least
    /// as long as `query`; surplus quality bytes are ignored.
    pub fn prepare_query(
        &mut self,
        query: &[u8],
        qual: &[u8],
        head_clip: usize,
        tail_clip: usize,
    ) -> Result<()> {
        check_clips("query", query.len(), head_clip, tail_clip)?;
        if qual.len() < query.len() {
            return Err(AlignError::InvalidInput(format!(
                "quality string ({} bytes) shorter than query ({} bases)",
                qual.len(),
                query.len()
            )));
        }
        if qual.len() > query.len() {
            log::warn!(
                "quality string ({} bytes) longer than query ({} bases); surplus ignored",
                qual.len(),
                query.len()
            );
        }
        copy_into(&mut self.query, query)?;
        copy_into(&mut self.qual, &qual[..query.len()])?;
        self.query_head = head_clip;
        self.query_tail = tail_clip;
        self.resize_buffers()
    }

    /// Assign the query with a uniform assumed quality instead of a quality
    /// string. `assumed_phred` must lie in the Sanger range `[0, 94)`.
    pub fn prepare_query_assumed(
        &mut self,
        query: &[u8],
        assumed_phred: u8,
        head_clip: usize,
        tail_clip: usize,
    ) -> Result<()> {
        if usize::from(assumed_phred) >= PHRED_RANGE {
            return Err(AlignError::InvalidInput(format!(
                "assumed PHRED score {assumed_phred} outside valid range 0-{}",
                PHRED_RANGE - 1
            )));
        }
        check_clips("query", query.len(), head_clip, tail_clip)?;
        let byte = assumed_phred.checked_add(self.phred_offset).ok_or_else(|| {
            AlignError::InvalidInput(format!(
                "assumed PHRED score {assumed_phred} does not fit the ASCII offset {}",
                self.phred_offset
            ))
        })?;
        copy_into(&mut self.query, query)?;
        fill_into(&mut self.qual, byte, query.len())?;
        self.query_head = head_clip;
        self.query_tail = tail_clip;
        self.resize_buffers()
    }

    /// Assign both sequences in one call, applying the same clip pair to
    /// each end of each sequence.
    pub fn prepare(
        &mut self,
        db: &[u8],
        query: &[u8],
        qual: &[u8],
        head_clip: usize,
        tail_clip: usize,
    ) -> Result<()> {
        self.prepare_ref(db, head_clip, tail_clip)?;
        self.prepare_query(query, qual, head_clip, tail_clip)
    }

    /// Grow the rolling rows and the trace matrix to the current window
    /// dimensions. Grow-only: a shrinking window reuses the allocation.
    fn resize_buffers(&mut self) -> Result<()> {
        let rows = self.subquery_len() + 1;
        let cols = self.subdb_len() + 1;

        for row in [&mut self.pen_prev, &mut self.pen_cur, &mut self.ins_prev, &mut self.ins_cur] {
            if cols > row.len() {
                row.try_reserve(cols - row.len())?;
            }
            row.resize(cols, 0);
        }
        for row in [&mut self.ins_run_prev, &mut self.ins_run_cur] {
            if cols > row.len() {
                row.try_reserve(cols - row.len())?;
            }
            row.resize(cols, 0);
        }
        self.trace.resize(rows, cols)?;
        log::trace!("buffers sized for {rows}x{cols} cells");
        Ok(())
    }

    // ---- window accessors -------------------------------------------------

    #[inline]
    pub(crate) fn subdb_len(&self) -> usize {
        self.db.len() - self.db_head - self.db_tail
    }

    #[inline]
    pub(crate) fn subquery_len(&self) -> usize {
        self.query.len() - self.query_head - self.query_tail
    }

    #[inline]
    pub(crate) fn subdb(&self) -> &[u8] {
        &self.db[self.db_head..self.db.len() - self.db_tail]
    }

    #[inline]
    pub(crate) fn subquery(&self) -> &[u8] {
        &self.query[self.query_head..self.query.len() - self.query_tail]
    }

    #[inline]
    pub(crate) fn subqual(&self) -> &[u8] {
        &self.qual[self.query_head..self.qual.len() - self.query_tail]
    }

    // ---- results ----------------------------------------------------------

    /// The CIGAR produced by [`trace`](Self::trace) and reshaped by the
    /// post-processing transforms. Empty before the first traceback.
    pub fn cigar(&self) -> &[PackedOp] {
        &self.cigar_buf[self.cigar_begin..self.cigar_end]
    }

    /// Text rendering of the current CIGAR, e.g. `"3I 1="`.
    pub fn show_cigar(&self) -> String {
        crate::alignment::cigar::to_string(self.cigar())
    }

    /// Column in the reference window where the alignment begins.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Minimum score found in the final row by the last
    /// [`align`](Self::align) call.
    pub fn opt_score(&self) -> i32 {
        self.opt_score
    }

    /// Column of the final row holding the minimum score.
    pub fn opt_score_col(&self) -> usize {
        self.opt_score_col
    }

    /// Absolute start of the alignment in an outer coordinate system:
    /// `max(0, base) + offset + head-clip of the reference window`.
    pub fn alignment_start(&self, base: i32) -> i64 {
        i64::from(base.max(0)) + self.offset as i64 + self.db_head as i64
    }
}

fn check_clips(what: &str, len: usize, head_clip: usize, tail_clip: usize) -> Result<()> {
    if head_clip + tail_clip > len {
        return Err(AlignError::InvalidInput(format!(
            "{what} clips ({head_clip} + {tail_clip}) exceed sequence length {len}"
        )));
    }
    Ok(())
}

/// Replace `dst` contents with `src`, growing fallibly.
fn copy_into(dst: &mut Vec<u8>, src: &[u8]) -> Result<()> {
    dst.clear();
    dst.try_reserve(src.len())?;
    dst.extend_from_slice(src);
    Ok(())
}

/// Replace `dst` contents with `len` copies of `byte`, growing fallibly.
fn fill_into(dst: &mut Vec<u8>, byte: u8, len: usize) -> Result<()> {
    dst.clear();
    dst.try_reserve(len)?;
    dst.resize(len, byte);
    Ok(())
}
