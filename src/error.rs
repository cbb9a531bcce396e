//! Structured error type for alignment operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors surfaced by the alignment engine.
///
/// Allocation and invalid-input failures are recoverable: the engine stays
/// usable (and re-preparable) after either. A corrupt trace cell indicates an
/// internal inconsistency and aborts the current traceback only.
#[derive(Debug, Error)]
pub enum AlignError {
    /// A working buffer could not be grown to the requested dimensions.
    #[error("allocation failure: {0}")]
    Alloc(#[from] TryReserveError),

    /// The requested operation is not valid for the current inputs or state.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The trace matrix contained an opcode outside the known CIGAR set.
    #[error("corrupt trace cell: unknown CIGAR opcode {0}")]
    CorruptTrace(u32),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AlignError>;
