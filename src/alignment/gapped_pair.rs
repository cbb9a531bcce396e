//! Expansion of a traced alignment into two gap-annotated sequence rows.

use crate::alignment::cigar::CigarOp;
use crate::alignment::engine::Aligner;
use crate::error::{AlignError, Result};

/// A pairwise alignment materialised as two rows of equal length, with `-`
/// marking gap columns. Coordinates are half-open over the aligned windows.
#[derive(Debug, Clone)]
pub struct GappedPair {
    /// Reference side of the alignment.
    pub ref_row: Vec<u8>,
    /// Query side of the alignment.
    pub query_row: Vec<u8>,
    /// First reference column covered (equals the alignment offset).
    pub ref_start: usize,
    /// One past the last reference column covered.
    pub ref_end: usize,
    /// First query position covered.
    pub query_start: usize,
    /// One past the last query position covered.
    pub query_end: usize,
    /// Minimum score of the alignment.
    pub score: i32,
}

impl Aligner {
    /// Materialise the current CIGAR as two gapped rows.
    ///
    /// Soft-clipped columns advance the query cursor without emitting; hard
    /// clips emit nothing. Call this on the traceback or on its
    /// [`softclip_trace`](Self::softclip_trace) or
    /// [`compact_trace`](Self::compact_trace) forms, before outer clip
    /// regions are attached.
    ///
    /// # Errors
    ///
    /// [`AlignError::CorruptTrace`] on an opcode outside the known set, and
    /// [`AlignError::InvalidInput`] if the CIGAR walks outside the prepared
    /// sequences.
    pub fn gapped_pair(&self) -> Result<GappedPair> {
        let cigar = self.cigar();
        let columns: usize = cigar.iter().map(|c| c.len() as usize).sum();
        let mut ref_row = Vec::with_capacity(columns);
        let mut query_row = Vec::with_capacity(columns);

        let mut ri = self.db_head + self.offset;
        let mut qi = self.query_head;
        for &elem in cigar {
            let len = elem.len() as usize;
            match elem.op() {
                Some(CigarOp::H | CigarOp::P) => {}
                Some(CigarOp::S) => qi += len,
                Some(CigarOp::M | CigarOp::Eq | CigarOp::X) => {
                    let r = slice(&self.db, ri, len)?;
                    let q = slice(&self.query, qi, len)?;
                    ref_row.extend_from_slice(r);
                    query_row.extend_from_slice(q);
                    ri += len;
                    qi += len;
                }
                Some(CigarOp::I) => {
                    let q = slice(&self.query, qi, len)?;
                    ref_row.resize(ref_row.len() + len, b'-');
                    query_row.extend_from_slice(q);
                    qi += len;
                }
                Some(CigarOp::D | CigarOp::N) => {
                    let r = slice(&self.db, ri, len)?;
                    ref_row.extend_from_slice(r);
                    query_row.resize(query_row.len() + len, b'-');
                    ri += len;
                }
                None => return Err(AlignError::CorruptTrace(elem.code())),
            }
        }

        Ok(GappedPair {
            ref_row,
            query_row,
            ref_start: self.offset,
            ref_end: self.opt_score_col,
            query_start: 0,
            query_end: self.subquery_len(),
            score: self.opt_score,
        })
    }
}

fn slice(seq: &[u8], from: usize, len: usize) -> Result<&[u8]> {
    seq.get(from..from + len).ok_or_else(|| {
        AlignError::InvalidInput("CIGAR extends beyond the prepared sequences".into())
    })
}
