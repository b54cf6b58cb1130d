//! Shift classification: raw records to duty windows.
//!
//! Pure and time-deterministic — the reference instant is always passed
//! in, never read from the system clock, so every poll reclassifies from
//! scratch and tests can pin `now` exactly.

use crate::types::{Relation, ShiftRecord, ShiftWindow};
use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;

/// Classify raw shift records relative to `now`.
///
/// Records are dropped when their rota id is in `ignored_rotas`, or when
/// their end falls on a calendar date strictly before `now`'s date — a
/// hygiene filter that keeps yesterday's finished duties off the board,
/// independent of the Past/Current/Future relation.
///
/// Relation rule: `Future` if `now < start`; `Current` if
/// `start <= now < end`; otherwise `Past`. A zero-duration shift
/// (`start == end`, an all-day duty) is `Current` for any `now >= start`:
/// it must not vanish from the board at its literal start instant, and the
/// hygiene filter retires it the next calendar day.
pub fn classify(
    records: Vec<ShiftRecord>,
    now: NaiveDateTime,
    ignored_rotas: &HashSet<u64>,
) -> Vec<ShiftWindow> {
    let today = now.date();
    records
        .into_iter()
        .filter_map(|shift| {
            if ignored_rotas.contains(&shift.rota_id) {
                tracing::trace!(shift_id = shift.id, rota_id = shift.rota_id, "rota ignored");
                return None;
            }
            let start = shift.start;
            let Some(end) = window_end(start, shift.duration_seconds) else {
                tracing::warn!(
                    shift_id = shift.id,
                    duration = shift.duration_seconds,
                    "duration overflows window arithmetic, dropped"
                );
                return None;
            };
            if end.date() < today {
                tracing::trace!(shift_id = shift.id, "ended before today, dropped");
                return None;
            }
            let relation = relation_of(start, end, now);
            Some(ShiftWindow {
                shift,
                start,
                end,
                relation,
            })
        })
        .collect()
}

/// Compute `start + duration` without wrapping or panicking.
///
/// The client rejects implausible durations at parse time, but `classify`
/// also accepts caller-built records, so the invariant `end >= start`
/// is enforced here too. `None` means the duration cannot be represented.
fn window_end(start: NaiveDateTime, duration_seconds: u64) -> Option<NaiveDateTime> {
    let seconds = i64::try_from(duration_seconds).ok()?;
    let delta = Duration::try_seconds(seconds)?;
    start.checked_add_signed(delta)
}

fn relation_of(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> Relation {
    if now < start {
        Relation::Future
    } else if now < end || start == end {
        Relation::Current
    } else {
        Relation::Past
    }
}
