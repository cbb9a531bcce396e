//! Dynamic program: row-0 seeding, the quality-weighted affine-gap sweep,
//! and the final-row minimum scan.
//!
//! The recurrence is the Gotoh three-matrix formulation in the inverse-score
//! convention: every move adds a cost and the optimum is a minimum. Scores
//! live in two rolling row pairs; only the trace matrix is kept in full. The
//! deletion score needs no row of its own: a deletion depends only on the
//! cell to its left, so a single scalar swept across the row suffices.

use std::mem;

use crate::alignment::cigar::{CigarOp, PackedOp};
use crate::alignment::engine::{AlignMode, Aligner};
use crate::defaults::AMBIGUOUS_BASE;
use crate::error::{AlignError, Result};
use crate::penalties::PHRED_RANGE;

/// Asymmetric base comparison: only a reference `N` is a wildcard.
#[inline(always)]
fn is_match(reference: u8, query: u8) -> bool {
    query == reference || reference == AMBIGUOUS_BASE
}

impl Aligner {
    /// Run the alignment over the prepared windows and return the minimum
    /// score found in the final row.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::InvalidInput`] if either window is empty, or if
    /// any window quality byte falls outside the PHRED range under the
    /// current ASCII offset.
    pub fn align(&mut self, mode: AlignMode) -> Result<i32> {
        let m = self.subquery().len();
        let n = self.subdb().len();
        if m == 0 || n == 0 {
            return Err(AlignError::InvalidInput(
                "cannot align over an empty sequence window".into(),
            ));
        }
        self.check_qualities()?;

        self.seed_top_row(mode);
        self.sweep();
        let score = self.locate_min();
        log::debug!(
            "{mode:?} alignment of {m}x{n} window: score {score} at column {}",
            self.opt_score_col
        );
        Ok(score)
    }

    /// Qualities are interpreted with the offset in force now, not at
    /// preparation time, so the range check belongs here.
    fn check_qualities(&self) -> Result<()> {
        let offset = self.phred_offset;
        for (i, &byte) in self.subqual().iter().enumerate() {
            let q = i32::from(byte) - i32::from(offset);
            if q < 0 || q >= PHRED_RANGE as i32 {
                return Err(AlignError::InvalidInput(format!(
                    "quality byte {byte} at window position {i} is outside \
                     the PHRED range for ASCII offset {offset}"
                )));
            }
        }
        Ok(())
    }

    /// Seed the virtual row 0 of the score and trace matrices.
    ///
    /// Global mode charges one gap-extend per skipped reference column, so
    /// the alignment must consume the reference from its start. Semiglobal
    /// leaves the whole row at zero. Both record `(n, D)` trace cells so a
    /// traceback entering row 0 off-column can reconstruct the skipped
    /// prefix.
    fn seed_top_row(&mut self, mode: AlignMode) {
        let n = self.subdb_len();
        let q0 = usize::from(self.subqual()[0] - self.phred_offset);
        // An insertion descending into row 1 must pay the full open cost on
        // its first extend step.
        let ins_seed = self.penalties.gap_open_cost(q0) - self.penalties.gap_extend_cost(q0);

        let row = self.trace.row_mut(0);
        row[0] = PackedOp::new(0, CigarOp::Eq);
        for n1 in 1..=n {
            row[n1] = PackedOp::new(n1 as u32, CigarOp::D);
        }

        match mode {
            AlignMode::Global => {
                self.pen_prev[0] = 0;
                let mut del = self.gap_open_extend - self.gap_extend;
                for n1 in 1..=n {
                    del += self.gap_extend;
                    self.pen_prev[n1] = del;
                }
            }
            AlignMode::SemiGlobal => {
                self.pen_prev[..=n].fill(0);
            }
        }
        for n1 in 0..=n {
            self.ins_prev[n1] = self.pen_prev[n1] + ins_seed;
        }
        self.ins_run_prev[..=n].fill(0);
    }

    /// Sweep the matrix row by row, writing scores into the rolling buffers
    /// and one packed (run-length, opcode) cell per position into the trace
    /// matrix. After the final swap the "previous" buffers hold the last row.
    fn sweep(&mut self) {
        let m = self.subquery_len();
        let n = self.subdb_len();
        let db_start = self.db_head;
        let q_start = self.query_head;
        let phred_offset = self.phred_offset;
        let gap_open_extend = self.gap_open_extend;
        let gap_extend = self.gap_extend;

        let Aligner {
            penalties,
            db,
            query,
            qual,
            pen_prev,
            pen_cur,
            ins_prev,
            ins_cur,
            ins_run_prev,
            ins_run_cur,
            trace,
            ..
        } = self;
        let subdb = &db[db_start..db_start + n];

        for m1 in 1..=m {
            let cq = query[q_start + m1 - 1];
            let q = usize::from(qual[q_start + m1 - 1] - phred_offset);
            let match_cost = penalties.match_cost(q);
            let mismatch_cost = penalties.mismatch_cost(q);
            let gap_open_cost = penalties.gap_open_cost(q);
            let gap_extend_cost = penalties.gap_extend_cost(q);

            let row = trace.row_mut(m1);
            let mut del_run: u32 = 0;

            // Leftmost column: only a vertical move is possible.
            let ins = ins_prev[0] + gap_extend_cost;
            let ins_run = ins_run_prev[0] + 1;
            ins_cur[0] = ins;
            ins_run_cur[0] = ins_run;
            row[0] = PackedOp::new(ins_run, CigarOp::I);
            pen_cur[0] = ins;
            // Seed the swept deletion state so an opening into column 1 pays
            // the correct one-step cost.
            let mut stored_del = ins + (gap_open_extend - gap_extend);

            for n1 in 1..=n {
                let matched = is_match(subdb[n1 - 1], cq);

                // deletion: horizontal move
                let del_open = pen_cur[n1 - 1] + gap_open_extend;
                let del_extend = stored_del + gap_extend;

                // insertion: vertical move
                let ins_open = pen_prev[n1] + gap_open_cost;
                let ins_extend = ins_prev[n1] + gap_extend_cost;

                // Given equal scores, prefer extending an existing gap to
                // opening a new one.
                let del = if del_open < del_extend {
                    del_run = 1;
                    del_open
                } else {
                    del_run += 1;
                    del_extend
                };
                stored_del = del;

                let (ins, ins_run) = if ins_open < ins_extend {
                    (ins_open, 1)
                } else {
                    (ins_extend, ins_run_prev[n1] + 1)
                };
                ins_cur[n1] = ins;
                ins_run_cur[n1] = ins_run;

                let (diag, diag_op) = if matched {
                    (pen_prev[n1 - 1] + match_cost, CigarOp::Eq)
                } else {
                    (pen_prev[n1 - 1] + mismatch_cost, CigarOp::X)
                };

                // Order of preference on ties: diagonal, insertion, deletion.
                if ins < diag {
                    if del < ins {
                        row[n1] = PackedOp::new(del_run, CigarOp::D);
                        pen_cur[n1] = del;
                    } else {
                        row[n1] = PackedOp::new(ins_run, CigarOp::I);
                        pen_cur[n1] = ins;
                    }
                } else if del < diag {
                    row[n1] = PackedOp::new(del_run, CigarOp::D);
                    pen_cur[n1] = del;
                } else {
                    row[n1] = PackedOp::new(1, diag_op);
                    pen_cur[n1] = diag;
                }
            }

            mem::swap(pen_prev, pen_cur);
            mem::swap(ins_prev, ins_cur);
            mem::swap(ins_run_prev, ins_run_cur);
        }
    }

    /// Scan the final row left to right for its minimum; the first
    /// occurrence wins ties.
    fn locate_min(&mut self) -> i32 {
        let n = self.subdb_len();
        let last_row = &self.pen_prev;
        let mut best = last_row[0];
        let mut col = 0;
        for (n1, &score) in last_row.iter().enumerate().take(n + 1).skip(1) {
            if score < best {
                best = score;
                col = n1;
            }
        }
        self.opt_score = best;
        self.opt_score_col = col;
        best
    }
}
