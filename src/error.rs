use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog file has no entries: {0}")]
    CatalogEmpty(String),

    #[error("Input file has no recognizable header row")]
    MissingHeader,

    #[error("Invalid run date (expected YYYY-MM-DD): {0}")]
    InvalidRunDate(String),

    #[error("No input file selected")]
    NoInputSelected,

    #[error("No output file selected")]
    NoOutputSelected,

    #[error("Run aborted by operator")]
    Aborted,
}

pub type Result<T> = std::result::Result<T, BillingError>;
