//! One poll cycle: fetch, classify, select, enrich, assemble.
//!
//! The [`Aggregator`] owns all shared mutable state — the volunteer cache,
//! the version tracker, and the assembled-entry cache — and is shared by
//! the surrounding web layer as an `Arc`, one `run` per inbound poll.
//! Nothing here is cancellable mid-flight; a run that fails upstream
//! leaves every cache unchanged.

use crate::cache::VolunteerCache;
use crate::classify::classify;
use crate::client::RotaClient;
use crate::config::{BoardConfig, FetchPolicy};
use crate::error::Result;
use crate::orchestrator::label::{display_name, time_label};
use crate::select::{select, SelectedWindow};
use crate::types::{AggregationResult, BoardEntry, VolunteerDetail};
use crate::version::VersionTracker;
use chrono::{Duration, NaiveDateTime};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// The shift window aggregation engine.
pub struct Aggregator {
    client: RotaClient,
    ignored_rotas: HashSet<u64>,
    special_rotas: HashSet<u64>,
    fetch_policy: FetchPolicy,
    volunteers: VolunteerCache,
    tracker: VersionTracker,
    /// Assembled entries by shift id, reused under [`FetchPolicy::OccupantDiff`]
    /// when a shift's occupant set has not changed.
    assembled: Mutex<HashMap<u64, BoardEntry>>,
}

impl Aggregator {
    /// Build an aggregator from the board configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BoardError::Config`] if the configuration is
    /// invalid.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        let client = RotaClient::new(config)?;
        Ok(Self {
            client,
            ignored_rotas: config.ignored_rota_ids.iter().copied().collect(),
            special_rotas: config.special_rota_ids.iter().copied().collect(),
            fetch_policy: config.fetch_policy,
            volunteers: VolunteerCache::new(),
            tracker: VersionTracker::new(),
            assembled: Mutex::new(HashMap::new()),
        })
    }

    /// Drive one poll cycle and assemble the board.
    ///
    /// # Pipeline
    ///
    /// 1. Compute the fetch window from the configured [`FetchPolicy`]
    /// 2. Fetch raw shift records from the upstream client
    /// 3. Classify each record relative to `now`
    /// 4. Select the bounded representative set per rota
    /// 5. Observe each shift's occupant set against the version tracker;
    ///    reuse the previously assembled entry when nothing changed
    ///    (occupant-diff deployments only), otherwise enrich and rebuild
    /// 6. Return entries with the current version counter
    ///
    /// # Errors
    ///
    /// Upstream client errors propagate unmodified — a broken shift list
    /// cannot be safely classified, and no retry happens here. A failed
    /// enrichment for a single volunteer degrades that volunteer to an
    /// empty contact list instead of aborting the run.
    pub async fn run(&self, now: NaiveDateTime) -> Result<AggregationResult> {
        let (start_date, end_date) = match self.fetch_policy {
            FetchPolicy::FullReclassify => (
                (now - Duration::days(1)).date(),
                (now + Duration::days(1)).date(),
            ),
            FetchPolicy::OccupantDiff => (now.date(), (now + Duration::days(1)).date()),
        };

        let records = self.client.fetch_shifts(start_date, end_date).await?;
        let windows = classify(records, now, &self.ignored_rotas);
        let selected = select(windows, &self.special_rotas);
        tracing::debug!(count = selected.len(), "windows selected");

        let mut entries = Vec::with_capacity(selected.len());
        let mut live = HashSet::with_capacity(selected.len());
        for picked in selected {
            let shift_id = picked.window.shift.id;
            live.insert(shift_id);
            let changed = self
                .tracker
                .observe(shift_id, &picked.window.shift.occupant_ids);

            if !changed && self.fetch_policy == FetchPolicy::OccupantDiff {
                let reusable = self
                    .assembled
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .get(&shift_id)
                    .cloned();
                if let Some(entry) = reusable {
                    tracing::trace!(shift_id, "reusing assembled entry");
                    entries.push(entry);
                    continue;
                }
            }

            let entry = self.assemble(&picked, now).await;
            if self.fetch_policy == FetchPolicy::OccupantDiff {
                self.assembled
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(shift_id, entry.clone());
            }
            entries.push(entry);
        }

        // Shift ids are fresh every day; drop state for shifts that can
        // no longer be selected so both maps stay bounded.
        self.tracker.retain(&live);
        self.assembled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|id, _| live.contains(id));

        Ok(AggregationResult {
            version: self.tracker.version(),
            entries,
        })
    }

    /// Build one board entry, enriching occupants through the cache.
    ///
    /// Occupants are fetched concurrently; the cache coalesces duplicate
    /// ids, and day leaders doing back-to-back shifts hit it outright.
    /// Results keep upstream occupant order.
    async fn assemble(&self, selected: &SelectedWindow, now: NaiveDateTime) -> BoardEntry {
        let shift = &selected.window.shift;
        let lookups: Vec<_> = shift
            .occupant_ids
            .iter()
            .map(|&id| async move { (id, self.volunteers.get(&self.client, id).await) })
            .collect();
        let outcomes = futures::future::join_all(lookups).await;

        let mut volunteers = Vec::with_capacity(shift.occupant_ids.len());
        for (id, outcome) in outcomes {
            match outcome {
                Ok(detail) => volunteers.push(detail),
                Err(err) => {
                    // Partial degradation beats an empty board: show the
                    // volunteer without contact details and move on.
                    tracing::warn!(volunteer_id = id, error = %err, "enrichment failed");
                    volunteers.push(VolunteerDetail {
                        id,
                        display_name: format!("Volunteer {id}"),
                        contacts: vec![],
                    });
                }
            }
        }
        BoardEntry {
            rota_id: shift.rota_id,
            name: display_name(shift, now),
            category: selected.category,
            time_label: time_label(&selected.window),
            volunteers,
        }
    }
}
