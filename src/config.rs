//! Board configuration with sensible defaults.
//!
//! [`BoardConfig`] controls the upstream endpoint, credentials, rota
//! filtering, and the fetch-window policy. The defaults point at the
//! public rota API and show every rota.

use crate::error::BoardError;

/// How the aggregation orchestrator computes its fetch window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Fetch yesterday through tomorrow and rebuild every entry each
    /// poll. Covers boards watched through the night, where the most
    /// recent shift may have started the previous day.
    FullReclassify,
    /// Fetch today through tomorrow and rebuild an entry only when its
    /// shift's occupant set changed since the last observation.
    OccupantDiff,
}

/// Configuration for the shift aggregation engine.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for a specific deployment.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Base URL of the rota management API.
    pub base_url: String,
    /// API key sent as `Authorization: APIKEY <key>`.
    pub api_key: String,
    /// Identifying User-Agent. The rota API asks callers to identify
    /// themselves, so this is required and never rotated.
    pub user_agent: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Rota ids to drop entirely — duties nobody watching the board
    /// cares about (holiday markers, room bookings and the like).
    pub ignored_rota_ids: Vec<u64>,
    /// Rota ids promoted to the special section above everything else.
    pub special_rota_ids: Vec<u64>,
    /// Which fetch-window strategy the orchestrator uses.
    pub fetch_policy: FetchPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.3r.org.uk".into(),
            api_key: String::new(),
            user_agent: "wallboard/0.1".into(),
            timeout_seconds: 10,
            ignored_rota_ids: vec![],
            special_rota_ids: vec![],
            fetch_policy: FetchPolicy::FullReclassify,
        }
    }
}

impl BoardConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` must parse as an absolute URL
    /// - `api_key` must not be empty
    /// - `user_agent` must not be empty
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), BoardError> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(BoardError::Config(format!(
                "base_url is not a valid URL: {}",
                self.base_url
            )));
        }
        if self.api_key.is_empty() {
            return Err(BoardError::Config("api_key must not be empty".into()));
        }
        if self.user_agent.is_empty() {
            return Err(BoardError::Config("user_agent must not be empty".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(BoardError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
