use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input table is missing one or more required columns
    #[error("Schema error: missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A statistic is undefined because the column holds no data
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_columns() {
        let err = PipelineError::Schema {
            missing: vec!["County".to_string(), "Revenue".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Schema error: missing required column(s): County, Revenue"
        );
    }
}
