//! Quality-aware pairwise realignment of short reads against a reference
//! window.
//!
//! The engine computes an optimal affine-gap alignment under an
//! inverse-score model (lower is better) in which match, mismatch, and gap
//! costs are modulated by the per-base PHRED quality of the query: cheap to
//! edit where the base caller was unsure, expensive where it was confident.
//! Results come out as a run-length CIGAR in the packed SAM/BAM wire format,
//! together with the reference offset where the alignment begins.
//!
//! One [`Aligner`] is meant to be reused across a stream of reads; its
//! working buffers grow to a high-water mark and later alignments allocate
//! nothing.
//!
//! # Quick start
//!
//! ```
//! use pyroalign::{AlignMode, Aligner};
//!
//! let mut al = Aligner::with_defaults();
//! al.prepare(b"AAAACGT", b"TGCA", b"!!!!", 0, 0)?;
//! let score = al.align(AlignMode::Global)?;
//! al.trace()?;
//! assert_eq!(score, 60);
//! assert_eq!(al.show_cigar(), "3I 1=");
//! # Ok::<(), pyroalign::AlignError>(())
//! ```

pub mod alignment;
pub mod defaults;
pub mod error;
pub mod penalties;

pub use alignment::cigar::{self, CigarOp, PackedOp};
pub use alignment::{AlignMode, Aligner, GappedPair};
pub use error::{AlignError, Result};
pub use penalties::{PenaltyTables, PHRED_RANGE};
