//! CIGAR post-processing: end soft-clipping, attachment of pre-existing
//! clip regions, and match/mismatch compaction.
//!
//! All four transforms rewrite the CIGAR window `[cigar_begin, cigar_end)`
//! in place, moving the endpoints into the scratch buffer's slack slots
//! when they prepend or append.

use crate::alignment::cigar::{CigarOp, PackedOp};
use crate::alignment::engine::Aligner;

impl Aligner {
    /// Replace non-matching edits at either end of the alignment with soft
    /// clips.
    ///
    /// From each end, the run of operations up to the first exact match is
    /// folded into a single `S` whose length is the query bases it consumed;
    /// deletions and hard clips in that run consume no query and are
    /// dropped. On the leading side `offset` advances by the reference
    /// bases the folded run consumed; the trailing side never moves the
    /// alignment start.
    pub fn softclip_trace(&mut self) {
        if self.cigar_begin == self.cigar_end {
            return;
        }
        let stop_front = self.cigar_begin as isize - 1;

        // Trailing side: scan backwards to the last exact match.
        //                   |<-----
        // 5= 1X 2D 20= 1I 30= 3I 1X
        let mut idx = self.cigar_end as isize - 1;
        let mut clip3: u32 = 0;
        while idx != stop_front {
            let elem = self.cigar_buf[idx as usize];
            match elem.op() {
                Some(CigarOp::Eq) => break,
                Some(CigarOp::D | CigarOp::H) => {}
                _ => clip3 += elem.len(),
            }
            idx -= 1;
        }
        if clip3 > 0 {
            idx += 1;
            self.cigar_buf[idx as usize] = PackedOp::new(clip3, CigarOp::S);
        }
        let new_end = (idx + 1) as usize;

        // Leading side: scan forward to the first exact match, advancing
        // `offset` past the reference bases the folded run consumed.
        // --->|
        // 1X 5= 2D 20= 1I 30= 3I 1X
        let mut idx = self.cigar_begin as isize;
        let mut clip5: u32 = 0;
        let mut offset = self.offset;
        while idx != new_end as isize {
            let elem = self.cigar_buf[idx as usize];
            match elem.op() {
                Some(CigarOp::Eq) => break,
                Some(CigarOp::H) | None => {}
                Some(op) => {
                    if op.consumes_query() {
                        clip5 += elem.len();
                    }
                    if op.consumes_ref() {
                        offset += elem.len() as usize;
                    }
                }
            }
            idx += 1;
        }
        if clip5 > 0 {
            idx -= 1;
            self.cigar_buf[idx as usize] = PackedOp::new(clip5, CigarOp::S);
        }

        self.offset = offset;
        self.cigar_begin = idx as usize;
        self.cigar_end = new_end;
    }

    /// Attach the head/tail clip regions recorded at preparation time as
    /// soft clips.
    ///
    /// An existing boundary `S` is extended. A boundary match operation is
    /// first *contracted*: clipped query bases are re-compared against the
    /// reference just outside the alignment, and every literal match grows
    /// the match run instead of the clip (moving `offset` back on the
    /// leading side). Whatever clip remains is attached as a single `S`.
    pub fn append_softclip(&mut self) {
        if self.cigar_begin == self.cigar_end {
            return;
        }

        let mut clip_head = self.query_head as u32;
        if clip_head > 0 {
            let first = self.cigar_buf[self.cigar_begin];
            match first.op() {
                Some(CigarOp::S) => {
                    self.cigar_buf[self.cigar_begin] = first.with_len(first.len() + clip_head);
                }
                Some(CigarOp::Eq | CigarOp::M) => {
                    // Walk backwards into the clipped prefix, bounded by the
                    // reference bases available before the alignment start.
                    let mut grown: u32 = 0;
                    while clip_head > 0 {
                        let Some(rel) = self.offset.checked_sub(1 + grown as usize) else {
                            break;
                        };
                        let qi = self.query_head - 1 - grown as usize;
                        if self.query[qi] != self.db[self.db_head + rel] {
                            break;
                        }
                        grown += 1;
                        clip_head -= 1;
                    }
                    if grown > 0 {
                        self.cigar_buf[self.cigar_begin] = first.with_len(first.len() + grown);
                        self.offset -= grown as usize;
                    }
                    if clip_head > 0 {
                        self.cigar_begin -= 1;
                        self.cigar_buf[self.cigar_begin] = PackedOp::new(clip_head, CigarOp::S);
                    }
                }
                _ => {
                    self.cigar_begin -= 1;
                    self.cigar_buf[self.cigar_begin] = PackedOp::new(clip_head, CigarOp::S);
                }
            }
        }

        let mut clip_tail = self.query_tail as u32;
        if clip_tail > 0 {
            let last = self.cigar_buf[self.cigar_end - 1];
            match last.op() {
                Some(CigarOp::S) => {
                    self.cigar_buf[self.cigar_end - 1] = last.with_len(last.len() + clip_tail);
                }
                Some(CigarOp::Eq | CigarOp::M) => {
                    // Walk forwards into the clipped suffix against the
                    // reference past the aligned window.
                    let q_from = self.query.len() - self.query_tail;
                    let d_from = self.db_head + self.offset + self.subdb_len();
                    let mut grown: u32 = 0;
                    while clip_tail > 0 {
                        let qi = q_from + grown as usize;
                        let di = d_from + grown as usize;
                        if di >= self.db.len() || self.query[qi] != self.db[di] {
                            break;
                        }
                        grown += 1;
                        clip_tail -= 1;
                    }
                    if grown > 0 {
                        self.cigar_buf[self.cigar_end - 1] = last.with_len(last.len() + grown);
                    }
                    if clip_tail > 0 {
                        self.cigar_buf[self.cigar_end] = PackedOp::new(clip_tail, CigarOp::S);
                        self.cigar_end += 1;
                    }
                }
                _ => {
                    self.cigar_buf[self.cigar_end] = PackedOp::new(clip_tail, CigarOp::S);
                    self.cigar_end += 1;
                }
            }
        }
    }

    /// Attach externally recorded hard-clip lengths. Hard clips consume no
    /// query bases and are never contracted: an existing boundary `H` is
    /// extended, anything else gets a new `H` outside it.
    pub fn append_hardclip(&mut self, clip_head: u32, clip_tail: u32) {
        if self.cigar_begin == self.cigar_end {
            return;
        }
        if clip_head > 0 {
            let first = self.cigar_buf[self.cigar_begin];
            if first.op() == Some(CigarOp::H) {
                self.cigar_buf[self.cigar_begin] = first.with_len(first.len() + clip_head);
            } else {
                self.cigar_begin -= 1;
                self.cigar_buf[self.cigar_begin] = PackedOp::new(clip_head, CigarOp::H);
            }
        }
        if clip_tail > 0 {
            let last = self.cigar_buf[self.cigar_end - 1];
            if last.op() == Some(CigarOp::H) {
                self.cigar_buf[self.cigar_end - 1] = last.with_len(last.len() + clip_tail);
            } else {
                self.cigar_buf[self.cigar_end] = PackedOp::new(clip_tail, CigarOp::H);
                self.cigar_end += 1;
            }
        }
    }

    /// Collapse every maximal run of `=`/`X` elements into a single `M`,
    /// leaving `I`, `D`, `S`, `H` untouched. One right-to-left pass.
    pub fn compact_trace(&mut self) {
        if self.cigar_begin == self.cigar_end {
            return;
        }
        let stop = self.cigar_begin as isize - 1;
        let mut write = self.cigar_end as isize - 1;
        let mut read = self.cigar_end as isize - 1;

        while read != stop {
            let pending;
            let mut run: u32 = 0;
            loop {
                let elem = self.cigar_buf[read as usize];
                read -= 1;
                match elem.op() {
                    Some(CigarOp::Eq | CigarOp::X) => {
                        run += elem.len();
                        if read == stop {
                            pending = PackedOp::new(run, CigarOp::M);
                            break;
                        }
                    }
                    _ => {
                        if run > 0 {
                            self.cigar_buf[write as usize] = PackedOp::new(run, CigarOp::M);
                            write -= 1;
                        }
                        pending = elem;
                        break;
                    }
                }
            }
            self.cigar_buf[write as usize] = pending;
            write -= 1;
        }
        self.cigar_begin = (write + 1) as usize;
    }
}
