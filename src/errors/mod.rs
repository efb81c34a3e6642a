/// Unified error handling module
use thiserror::Error;

/// Failure to parse a vendor-supplied delay string.
///
/// Scoped to a single motor: callers log it and keep the motor's original
/// `delays` value rather than aborting the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelayError {
    #[error("unrecognized delay value {token:?} in {input:?}")]
    UnrecognizedToken { token: String, input: String },
    #[error("unexpectedly large delay range: {input:?}")]
    RangeTooLarge { input: String },
}

/// Failure to retrieve motor or sample data from the catalog API.
///
/// Fatal: there is no partial-catalog mode, so this propagates to the top
/// of the run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog API error: {0}")]
    Api(String),
}

/// Type alias for catalog fetch results
pub type CatalogResult<T> = Result<T, CatalogError>;
