//! Traceback: walk the trace matrix from the optimum cell back to row 0,
//! emitting a run-length CIGAR.
//!
//! Emission goes through a reverse cursor into the pre-sized scratch buffer,
//! so the finished CIGAR is the forward window `[cigar_begin, cigar_end)`
//! with slack slots on both flanks for the clip transforms to grow into.

use crate::alignment::cigar::{CigarOp, PackedOp};
use crate::alignment::engine::Aligner;
use crate::error::{AlignError, Result};

impl Aligner {
    /// Reconstruct the CIGAR for the last [`align`](Self::align) call and
    /// record the reference column where the alignment begins.
    ///
    /// # Errors
    ///
    /// [`AlignError::InvalidInput`] if the windows are empty or no alignment
    /// has been computed for them; [`AlignError::CorruptTrace`] if the walk
    /// meets an opcode outside the known set (an internal bug, fatal for
    /// this call only).
    pub fn trace(&mut self) -> Result<()> {
        let m = self.subquery().len();
        let n = self.subdb().len();
        if m == 0 || n == 0 {
            return Err(AlignError::InvalidInput(
                "cannot trace over an empty sequence window".into(),
            ));
        }
        if self.opt_score_col > n {
            return Err(AlignError::InvalidInput(
                "no alignment computed for the current windows".into(),
            ));
        }

        // Query-consuming elements absorb at least one query base each and
        // deletion elements at least one reference base, so m + n bounds the
        // element count for any penalty configuration. Two slack slots per
        // flank let the clip transforms grow the window in place.
        let buf_len = m + n + 6;
        if buf_len > self.cigar_buf.len() {
            self.cigar_buf.try_reserve(buf_len - self.cigar_buf.len())?;
        }
        self.cigar_buf.resize(buf_len, PackedOp(0));

        let mut m1 = m;
        let mut n1 = self.opt_score_col;
        // Reverse cursor; the two topmost slots stay free for appended clips.
        let mut rc = buf_len - 3;
        let corrupt = |cell: PackedOp, m1: usize, n1: usize| {
            log::error!(
                "unknown CIGAR operation {} at trace cell ({m1}, {n1})",
                cell.code()
            );
            AlignError::CorruptTrace(cell.code())
        };

        let mut cell = self.trace.get(m1, n1);
        while m1 > 0 {
            match cell.op() {
                Some(op @ (CigarOp::Eq | CigarOp::X)) => {
                    // Absorb the whole run of identical diagonal cells into
                    // one element.
                    let mut run: u32 = 0;
                    loop {
                        let step = cell.len() as usize;
                        run += cell.len();
                        m1 = m1.checked_sub(step).ok_or_else(|| corrupt(cell, m1, n1))?;
                        n1 = n1.checked_sub(step).ok_or_else(|| corrupt(cell, m1, n1))?;
                        cell = self.trace.get(m1, n1);
                        if m1 == 0 || cell.op() != Some(op) {
                            break;
                        }
                    }
                    self.cigar_buf[rc] = PackedOp::new(run, op);
                    rc -= 1;
                }
                Some(CigarOp::D) => {
                    self.cigar_buf[rc] = cell;
                    rc -= 1;
                    n1 = n1
                        .checked_sub(cell.len() as usize)
                        .ok_or_else(|| corrupt(cell, m1, n1))?;
                    cell = self.trace.get(m1, n1);
                }
                Some(CigarOp::I) => {
                    self.cigar_buf[rc] = cell;
                    rc -= 1;
                    m1 = m1
                        .checked_sub(cell.len() as usize)
                        .ok_or_else(|| corrupt(cell, m1, n1))?;
                    cell = self.trace.get(m1, n1);
                }
                _ => return Err(corrupt(cell, m1, n1)),
            }
        }

        self.offset = n1;
        self.cigar_begin = rc + 1;
        self.cigar_end = buf_len - 2;
        log::debug!(
            "traceback: {} ops, reference offset {}",
            self.cigar_end - self.cigar_begin,
            self.offset
        );
        Ok(())
    }
}
