//! Timeline construction: the per-round execution order.
//!
//! Each side is filtered to living combatants and sorted descending by
//! initiative (ties broken ascending by character id), then the two sides
//! are interleaved ally-first so neither side acts twice before the other
//! gets a chance. The remainder of the longer side is appended in its
//! sorted order. Construction is fully deterministic.

use std::collections::HashSet;

use crate::combatant::{CombatantId, CombatantState};
use crate::data::Team;

/// Builds the execution order for one round. Rebuilt fresh every round.
pub fn build_timeline(roster: &[CombatantState]) -> Vec<CombatantId> {
    let allies = sorted_side(roster, Team::Ally);
    let enemies = sorted_side(roster, Team::Enemy);
    interleave(&allies, &enemies)
}

/// Living members of one side, descending by initiative, ties ascending by
/// character id.
fn sorted_side(roster: &[CombatantState], team: Team) -> Vec<CombatantId> {
    let mut side: Vec<&CombatantState> = roster
        .iter()
        .filter(|c| c.team() == team && c.alive())
        .collect();
    side.sort_by(|a, b| {
        b.initiative()
            .cmp(&a.initiative())
            .then(a.def_id().cmp(&b.def_id()))
    });
    side.into_iter().map(|c| c.id()).collect()
}

/// Alternates entries from both sides, then appends the longer remainder.
fn interleave(a: &[CombatantId], b: &[CombatantId]) -> Vec<CombatantId> {
    let mut order = Vec::with_capacity(a.len() + b.len());
    let common = a.len().min(b.len());
    for i in 0..common {
        order.push(a[i]);
        order.push(b[i]);
    }
    order.extend_from_slice(&a[common..]);
    order.extend_from_slice(&b[common..]);
    order
}

/// True if no combatant appears more than once.
pub fn is_duplicate_free(timeline: &[CombatantId]) -> bool {
    let mut seen = HashSet::with_capacity(timeline.len());
    timeline.iter().all(|id| seen.insert(*id))
}
