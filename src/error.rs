use thiserror::Error;

/// Pipeline error taxonomy. Only `Io` on a missing prerequisite input is
/// fatal for a phase; everything else is recovered locally and shows up in
/// aggregate counts.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Timeouts, connection failures, non-success status. Retried with
    /// backoff; the page is skipped when retries exhaust.
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected HTML structure or a missing required field. The record or
    /// page is skipped.
    #[error("parse error: {0}")]
    Parse(String),

    /// A required field is missing or invalid after cleaning. The record is
    /// marked invalid and kept in quality counts.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing prerequisite input file or failed write. Fatal for the phase.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Network failures are worth another attempt; everything else is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Network(_))
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        PipelineError::Network(e.to_string())
    }
}
