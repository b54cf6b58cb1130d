//! Authenticated HTTP client for the rota management API.
//!
//! Provides a configured [`reqwest::Client`] plus typed fetchers for the
//! two upstream endpoints: the time-ranged shift list and the per-volunteer
//! detail record. Payloads are parsed and validated into the typed entities
//! in [`crate::types`]; a missing required field surfaces as
//! [`BoardError::MalformedRecord`] instead of failing deep inside
//! classification. No retry happens here — retry policy belongs to the
//! caller of the orchestrator.

use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::types::{Contact, ShiftRecord, VolunteerDetail};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Accepted `start_datetime` formats, tried in order. The upstream sends
/// free-text dates; these cover every shape observed in practice.
const START_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Longest credible shift: one year. The upstream sends duration as an
/// unbounded integer; anything above this cannot be a real duty and
/// would overflow window arithmetic downstream.
const MAX_DURATION_SECONDS: u64 = 366 * 24 * 60 * 60;

/// Typed client for the upstream rota API.
pub struct RotaClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl RotaClient {
    /// Build a client from the board configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] if the configuration is invalid and
    /// [`BoardError::UpstreamUnavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BoardError::Config(format!("base_url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BoardError::UpstreamUnavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch all shifts between two calendar dates (inclusive).
    ///
    /// # Errors
    ///
    /// [`BoardError::UpstreamUnavailable`] if the request does not complete,
    /// [`BoardError::UpstreamRejected`] on a non-success status, and
    /// [`BoardError::MalformedRecord`] if the payload cannot be validated.
    pub async fn fetch_shifts(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ShiftRecord>> {
        let url = self
            .base_url
            .join("shift.json")
            .map_err(|e| BoardError::Config(format!("shift endpoint: {e}")))?;
        tracing::trace!(%start_date, %end_date, "fetching shift list");

        let body = self
            .get(url, &[
                ("start_date", start_date.format("%Y-%m-%d").to_string()),
                ("end_date", end_date.format("%Y-%m-%d").to_string()),
            ])
            .await?;

        let records = parse_shift_list(&body)?;
        tracing::debug!(count = records.len(), "shift list fetched");
        Ok(records)
    }

    /// Fetch one volunteer's contact details.
    ///
    /// Applies the property filter: codes starting with `telephone` become
    /// contacts labelled with the property name, a "Friendly Name" property
    /// overrides the display name, everything else is dropped.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`RotaClient::fetch_shifts`].
    pub async fn fetch_volunteer(&self, id: u64) -> Result<VolunteerDetail> {
        let url = self
            .base_url
            .join(&format!("directory/{id}"))
            .map_err(|e| BoardError::Config(format!("volunteer endpoint: {e}")))?;
        tracing::trace!(volunteer_id = id, "fetching volunteer detail");

        let body = self.get(url, &[("format", "json".to_string())]).await?;
        parse_volunteer(&body)
    }

    /// Issue an authenticated GET and return the response body.
    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<String> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header("Authorization", format!("APIKEY {}", self.api_key))
            .send()
            .await
            .map_err(|e| BoardError::UpstreamUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardError::UpstreamRejected {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| BoardError::UpstreamUnavailable(format!("response read failed: {e}")))
    }
}

// ── Wire formats ─────────────────────────────────────────────────────────
//
// Every field is optional at the serde layer; `into_record` /
// `parse_volunteer` validate explicitly so the error names the missing
// field and the offending record.

#[derive(Debug, Deserialize)]
struct ShiftListWire {
    shifts: Option<Vec<ShiftWire>>,
}

#[derive(Debug, Deserialize)]
struct ShiftWire {
    id: Option<u64>,
    rota: Option<RotaWire>,
    #[serde(default)]
    title: Option<String>,
    start_datetime: Option<String>,
    duration: Option<u64>,
    #[serde(default)]
    volunteer_shifts: Vec<SignupWire>,
}

#[derive(Debug, Deserialize)]
struct RotaWire {
    id: Option<u64>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignupWire {
    volunteer: Option<VolunteerRefWire>,
}

#[derive(Debug, Deserialize)]
struct VolunteerRefWire {
    id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct VolunteerEnvelopeWire {
    volunteer: Option<VolunteerWire>,
}

#[derive(Debug, Deserialize)]
struct VolunteerWire {
    id: Option<u64>,
    name: Option<String>,
    #[serde(default)]
    volunteer_properties: Vec<PropertyWire>,
}

#[derive(Debug, Deserialize)]
struct PropertyWire {
    code: Option<String>,
    name: Option<String>,
    value: Option<String>,
}

impl ShiftWire {
    fn into_record(self) -> Result<ShiftRecord> {
        let id = self
            .id
            .ok_or_else(|| BoardError::MalformedRecord("shift missing id".into()))?;
        let missing = |field: &str| BoardError::MalformedRecord(format!("shift {id} missing {field}"));

        let rota = self.rota.ok_or_else(|| missing("rota"))?;
        let rota_id = rota.id.ok_or_else(|| missing("rota.id"))?;
        let rota_name = rota.name.ok_or_else(|| missing("rota.name"))?;
        let raw_start = self.start_datetime.ok_or_else(|| missing("start_datetime"))?;
        let start = parse_start(&raw_start).ok_or_else(|| {
            BoardError::MalformedRecord(format!("shift {id} has unparseable start_datetime: {raw_start}"))
        })?;
        let duration_seconds = self.duration.ok_or_else(|| missing("duration"))?;
        if duration_seconds > MAX_DURATION_SECONDS {
            return Err(BoardError::MalformedRecord(format!(
                "shift {id} has implausible duration: {duration_seconds}s"
            )));
        }

        let mut occupant_ids = Vec::with_capacity(self.volunteer_shifts.len());
        for signup in self.volunteer_shifts {
            let vid = signup
                .volunteer
                .and_then(|v| v.id)
                .ok_or_else(|| missing("volunteer_shifts[].volunteer.id"))?;
            occupant_ids.push(vid);
        }

        Ok(ShiftRecord {
            id,
            rota_id,
            rota_name,
            title: self.title.filter(|t| !t.is_empty()),
            start,
            duration_seconds,
            occupant_ids,
        })
    }
}

/// Parse the upstream free-text start instant, trying each known format.
fn parse_start(raw: &str) -> Option<NaiveDateTime> {
    START_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
}

/// Parse a shift list payload into validated records.
///
/// Extracted as a separate function for testability with mock JSON.
pub(crate) fn parse_shift_list(body: &str) -> Result<Vec<ShiftRecord>> {
    let wire: ShiftListWire = serde_json::from_str(body)
        .map_err(|e| BoardError::MalformedRecord(format!("shift list is not valid JSON: {e}")))?;
    let shifts = wire
        .shifts
        .ok_or_else(|| BoardError::MalformedRecord("shift list missing shifts array".into()))?;
    shifts.into_iter().map(ShiftWire::into_record).collect()
}

/// Parse a volunteer payload and apply the property filter.
pub(crate) fn parse_volunteer(body: &str) -> Result<VolunteerDetail> {
    let wire: VolunteerEnvelopeWire = serde_json::from_str(body)
        .map_err(|e| BoardError::MalformedRecord(format!("volunteer record is not valid JSON: {e}")))?;
    let volunteer = wire
        .volunteer
        .ok_or_else(|| BoardError::MalformedRecord("volunteer record missing volunteer object".into()))?;
    let id = volunteer
        .id
        .ok_or_else(|| BoardError::MalformedRecord("volunteer record missing id".into()))?;
    let name = volunteer
        .name
        .ok_or_else(|| BoardError::MalformedRecord(format!("volunteer {id} missing name")))?;

    let mut display_name = name;
    let mut contacts = Vec::new();
    for prop in volunteer.volunteer_properties {
        let (Some(code), Some(prop_name), Some(value)) = (prop.code, prop.name, prop.value) else {
            // A partial property is dropped rather than failing the record.
            continue;
        };
        if code.starts_with("telephone") {
            contacts.push(Contact {
                label: prop_name,
                value,
            });
        } else if prop_name == "Friendly Name" {
            display_name = value;
        }
    }

    Ok(VolunteerDetail {
        id,
        display_name,
        contacts,
    })
}
