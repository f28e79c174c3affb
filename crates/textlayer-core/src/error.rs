//! Error types for textlayer-core.
//!
//! Uses [`thiserror`] for derivation. Normalization and match location never
//! fail as a whole; errors surface only from constructors that validate
//! caller input and from per-occurrence text measurement.

use thiserror::Error;

/// Errors raised when building viewports and other validated inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Rotation is not a multiple of 90 degrees.
    #[error("invalid rotation: {0} (expected a multiple of 90 degrees)")]
    InvalidRotation(i32),

    /// Page size must be positive and finite.
    #[error("invalid page size: {width}x{height}")]
    InvalidPageSize { width: f64, height: f64 },

    /// Scale factor must be positive and finite.
    #[error("invalid scale: {0}")]
    InvalidScale(f64),

    /// Text measurement failed.
    #[error(transparent)]
    Measure(#[from] MeasureError),
}

/// Failure to measure a sub-range of a rendered text span.
///
/// Mirrors what a live layout engine can report when a span is measured
/// while it is being re-rendered: the occurrence is skipped, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// The range extends past the end of the span text.
    #[error("range {start}..{end} out of bounds for span of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// A range endpoint splits a UTF-8 sequence.
    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),

    /// The measured geometry no longer matches the span text.
    #[error("stale layout: {chars} characters but {rects} measured boxes")]
    StaleLayout { chars: usize, rects: usize },
}
