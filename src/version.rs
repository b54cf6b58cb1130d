//! Process-wide version tracking for cheap client-side change detection.
//!
//! Clients poll and compare the version against the last value they saw;
//! a difference means the board content changed and should be re-rendered.
//! The counter bumps exactly once per observed change to a tracked shift's
//! occupant set.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Monotonic change counter plus the last-seen occupant set per shift.
///
/// A single mutex guards both, so concurrent observation of the same shift
/// cannot double-increment: the compare and the bump happen under one
/// critical section, and nothing awaits while it is held.
pub struct VersionTracker {
    state: Mutex<TrackerState>,
}

struct TrackerState {
    version: u64,
    seen: HashMap<u64, Vec<u64>>,
}

impl VersionTracker {
    /// Create a tracker with version 0 and no observed shifts.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TrackerState {
                version: 0,
                seen: HashMap::new(),
            }),
        }
    }

    /// Record the occupant set for a shift, returning whether this call
    /// caused a version bump.
    ///
    /// Bumps when the shift id is new or its occupant sequence differs
    /// (order-sensitive) from the stored one.
    pub fn observe(&self, shift_id: u64, occupant_ids: &[u64]) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.seen.get(&shift_id) {
            Some(previous) if previous.as_slice() == occupant_ids => false,
            _ => {
                state.seen.insert(shift_id, occupant_ids.to_vec());
                state.version += 1;
                tracing::debug!(shift_id, version = state.version, "occupant set changed");
                true
            }
        }
    }

    /// Drop tracking state for shifts not in `live`.
    ///
    /// Shift ids are fresh every day, so the last-seen map would grow for
    /// the life of the process without this. The counter itself is never
    /// touched — pruning cannot move the version backwards.
    pub fn retain(&self, live: &HashSet<u64>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.seen.retain(|id, _| live.contains(id));
    }

    /// The current counter value. Never decreases while the process runs.
    pub fn version(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).version
    }
}

impl Default for VersionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(VersionTracker::new().version(), 0);
    }

    #[test]
    fn first_observation_bumps() {
        let tracker = VersionTracker::new();
        assert!(tracker.observe(1, &[42]));
        assert_eq!(tracker.version(), 1);
    }

    #[test]
    fn unchanged_occupants_do_not_bump() {
        let tracker = VersionTracker::new();
        assert!(tracker.observe(1, &[42]));
        assert!(!tracker.observe(1, &[42]));
        assert_eq!(tracker.version(), 1);
    }

    #[test]
    fn changed_occupants_bump_once() {
        let tracker = VersionTracker::new();
        tracker.observe(1, &[42]);
        assert!(tracker.observe(1, &[42, 7]));
        assert_eq!(tracker.version(), 2);
    }

    #[test]
    fn occupant_order_is_significant() {
        let tracker = VersionTracker::new();
        tracker.observe(1, &[42, 7]);
        assert!(tracker.observe(1, &[7, 42]));
        assert_eq!(tracker.version(), 2);
    }

    #[test]
    fn shifts_tracked_independently() {
        let tracker = VersionTracker::new();
        assert!(tracker.observe(1, &[42]));
        assert!(tracker.observe(2, &[42]));
        assert!(!tracker.observe(1, &[42]));
        assert_eq!(tracker.version(), 2);
    }

    #[test]
    fn empty_occupant_set_observed() {
        let tracker = VersionTracker::new();
        assert!(tracker.observe(1, &[]));
        assert!(!tracker.observe(1, &[]));
        assert!(tracker.observe(1, &[9]));
        assert_eq!(tracker.version(), 2);
    }

    #[test]
    fn retain_forgets_stale_shifts_and_keeps_live_ones() {
        let tracker = VersionTracker::new();
        tracker.observe(1, &[42]);
        tracker.observe(2, &[7]);
        tracker.retain(&[2].into());
        // Shift 1 was forgotten, so re-observing it counts as new.
        assert!(tracker.observe(1, &[42]));
        // Shift 2 survived the prune; unchanged occupants stay quiet.
        assert!(!tracker.observe(2, &[7]));
        assert_eq!(tracker.version(), 3);
    }

    #[test]
    fn retain_never_moves_version() {
        let tracker = VersionTracker::new();
        tracker.observe(1, &[42]);
        tracker.observe(2, &[7]);
        tracker.retain(&HashSet::new());
        assert_eq!(tracker.version(), 2);
    }

    #[test]
    fn version_monotonic_over_many_observations() {
        let tracker = VersionTracker::new();
        let mut last = tracker.version();
        for i in 0..50u64 {
            tracker.observe(i % 5, &[i]);
            let v = tracker.version();
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn concurrent_observation_increments_once() {
        use std::sync::Arc;

        let tracker = Arc::new(VersionTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.observe(1, &[42]))
            })
            .collect();
        // All threads race on the same shift id with the same occupants;
        // exactly one of them may claim the bump.
        let bumps = handles
            .into_iter()
            .map(|h| h.join().expect("observer thread panicked"))
            .filter(|bumped| *bumped)
            .count();
        assert_eq!(bumps, 1);
        assert_eq!(tracker.version(), 1);
    }
}
