use thiserror::Error;

/// Errors raised by the smoothing and alignment routines.
///
/// Everything here is deterministic, so nothing is worth retrying: callers
/// abort the chart that needed the series and report the failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    /// Malformed input: non-finite samples, bad smoothing parameters,
    /// negative pad counts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The series is shorter than the smoothing window.
    #[error("insufficient data: series has {len} values, smoothing window needs {window}")]
    InsufficientData { len: usize, window: usize },
}

pub type AlignResult<T> = std::result::Result<T, AlignError>;
