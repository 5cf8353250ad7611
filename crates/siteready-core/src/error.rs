//! Error types for the audit engine.
//!
//! - `FetchFailure`: why a single page request produced no response
//! - `AuditError`: the caller-visible failures of `audit_site`

use thiserror::Error;

/// Reason a page fetch produced no usable response.
///
/// The crawler never surfaces these; each one becomes a zero-signal page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchFailure {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}

/// Errors returned from an audit request.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Input could not be turned into an origin to audit
    #[error("invalid site: {0}")]
    InvalidSeed(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
