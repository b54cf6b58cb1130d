//! Window selection: bound the classified set to what the board shows.
//!
//! Per rota the board wants "who just left, who's on now, who's up next":
//! the latest-start `Past` window, every `Current` window, and the
//! earliest-start `Future` window. Windows of a rota sharing the exact
//! pick instant are all kept — the tie is deliberately not broken further,
//! so selection stays deterministic regardless of upstream list order.

use crate::types::{Category, Relation, ShiftWindow};
use std::collections::{HashMap, HashSet};

/// A window that survived selection, with its display category resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedWindow {
    /// The classified window.
    pub window: ShiftWindow,
    /// Final category, after special-rota promotion.
    pub category: Category,
}

/// Apply the per-rota selection policy and resolve display order.
///
/// Any rota id in `special_rotas` is re-labelled [`Category::Special`]
/// regardless of its computed relation and is presented ahead of all
/// other categories. Output ordering: special, past, current, future;
/// within a category ascending start, then shift id.
///
/// Idempotent: the same input and `now` always yield the same output,
/// order included.
pub fn select(windows: Vec<ShiftWindow>, special_rotas: &HashSet<u64>) -> Vec<SelectedWindow> {
    let mut by_rota: HashMap<u64, Vec<ShiftWindow>> = HashMap::new();
    for window in windows {
        by_rota.entry(window.shift.rota_id).or_default().push(window);
    }

    let mut selected = Vec::new();
    for group in by_rota.into_values() {
        let latest_past = group
            .iter()
            .filter(|w| w.relation == Relation::Past)
            .map(|w| w.start)
            .max();
        let earliest_future = group
            .iter()
            .filter(|w| w.relation == Relation::Future)
            .map(|w| w.start)
            .min();

        for window in group {
            let keep = match window.relation {
                Relation::Current => true,
                Relation::Past => Some(window.start) == latest_past,
                Relation::Future => Some(window.start) == earliest_future,
            };
            if !keep {
                continue;
            }
            let category = if special_rotas.contains(&window.shift.rota_id) {
                Category::Special
            } else {
                match window.relation {
                    Relation::Past => Category::Past,
                    Relation::Current => Category::Current,
                    Relation::Future => Category::Future,
                }
            };
            selected.push(SelectedWindow { window, category });
        }
    }

    selected.sort_by_key(|s| (s.category.rank(), s.window.start, s.window.shift.id));
    selected
}
