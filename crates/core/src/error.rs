//! Error types for the ratefile codec.
//!
//! Every decode and encode operation returns a structured error instead of
//! panicking. Variants carry the offsets and sizes needed to diagnose a bad
//! file without re-running the codec under a debugger.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Decode-side failures:
/// - `TruncatedStream`: the input ends before a fixed field or run count
/// - `SizeMismatch`: decompressed payload disagrees with the header
/// - `OffsetOutOfRange`: a stored offset/count points outside the payload
///
/// Encode-side failures:
/// - `FieldOverflow`: a value does not fit its fixed-width slot
/// - `MissingField`: the structured input is incomplete
/// - `OverlappingRegions`: two tables would be written over each other
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer ended before `needed` bytes could be read at `offset`
    #[error("truncated stream at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedStream {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Decompressed payload length differs from the header's declared size
    #[error("payload size mismatch: header declares {expected} bytes, decompressed {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A table record falls partially or fully outside the payload
    #[error("{table} record at offset {offset} (len {len}) exceeds payload of {available} bytes")]
    OffsetOutOfRange {
        table: &'static str,
        offset: usize,
        len: usize,
        available: usize,
    },

    /// Two table regions claim the same payload bytes
    #[error("{first} region overlaps {second} region")]
    OverlappingRegions {
        first: &'static str,
        second: &'static str,
    },

    /// A value exceeds the width of its on-disk field
    #[error("field {field} overflows: {value} > {max}")]
    FieldOverflow {
        field: String,
        value: usize,
        max: usize,
    },

    /// Structured input omits a value the encoder needs
    #[error("missing field: {field}")]
    MissingField { field: String },
}

impl Error {
    pub(crate) fn overflow(field: impl Into<String>, value: usize, max: usize) -> Self {
        Error::FieldOverflow {
            field: field.into(),
            value,
            max,
        }
    }
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
