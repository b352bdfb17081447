use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Failures of a benchmark comparison request.
///
/// `DataSourceUnavailable` and `UnknownCohort` abort the whole request; the
/// lookup errors only affect the metric being resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchmarkError {
    #[error("benchmark data unavailable for '{cohort}' ({}): {reason}", .path.display())]
    DataSourceUnavailable {
        cohort: String,
        path: PathBuf,
        reason: String,
    },

    #[error("unknown cohort '{0}'")]
    UnknownCohort(String),

    #[error("row '{label}' not found for vintage {vintage}")]
    RowNotFound { label: String, vintage: i32 },

    #[error("vintage {vintage} is not a column of the benchmark table")]
    ColumnNotFound { vintage: i32 },
}

impl BenchmarkError {
    /// Whether the error prevents every metric of the request from rendering.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BenchmarkError::DataSourceUnavailable { .. } | BenchmarkError::UnknownCohort(_)
        )
    }
}
