use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from Polars Series operations
    #[error("Series error: {0}")]
    Series(String),

    /// Error from date operations
    #[error("Date error: {0}")]
    Date(String),

    /// The training frame has too few rows to fit a trend.
    #[error("not enough data to fit a model: {rows} row(s), need at least 2")]
    InsufficientData { rows: usize },

    /// Error from model fitting
    #[error("model fit error: {0}")]
    Fit(String),
}

impl From<polars::error::PolarsError> for ComputeError {
    fn from(err: polars::error::PolarsError) -> Self {
        let compute_error = match err {
            polars::error::PolarsError::NoData(_)
            | polars::error::PolarsError::ShapeMismatch(_)
            | polars::error::PolarsError::SchemaMismatch(_)
            | polars::error::PolarsError::ComputeError(_)
            | polars::error::PolarsError::OutOfBounds(_) => {
                ComputeError::DataFrame(err.to_string())
            }
            _ => ComputeError::Series(err.to_string()),
        };
        error!(?compute_error, "polars operation failed");
        compute_error
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
