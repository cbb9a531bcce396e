//! The alignment engine and its CIGAR plumbing.
//!
//! [`engine`] holds the reusable [`Aligner`] object; the dynamic program,
//! traceback, and post-processing transforms live in sibling modules as
//! further `impl` blocks on it.

pub mod cigar;
pub mod engine;

mod clipping;
mod dp;
mod gapped_pair;
mod traceback;

pub use engine::{AlignMode, Aligner};
pub use gapped_pair::GappedPair;
