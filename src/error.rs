//! Error types for the wallboard crate.
//!
//! All errors use stable string messages suitable for display and
//! programmatic handling. API keys and volunteer contact details never
//! appear in error messages.

/// Errors that can occur during shift aggregation.
///
/// `Clone` is derived because volunteer enrichment failures travel back
/// through the shared cache as `Arc<BoardError>` and are unwrapped at the
/// call site.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BoardError {
    /// The upstream rota API could not be reached (transport failure).
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream rota API responded with a non-success status.
    #[error("upstream rejected request with status {status}")]
    UpstreamRejected {
        /// The HTTP status code returned by the upstream API.
        status: u16,
    },

    /// A shift or volunteer payload was missing a required field or
    /// carried an unparseable value.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Invalid board configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for wallboard results.
pub type Result<T> = std::result::Result<T, BoardError>;
