//! Layered round execution.
//!
//! A round is a sequence of layers. In each layer, every combatant that is
//! alive, still has a pending step, and has not already acted in the layer
//! executes exactly one step, in timeline order. Layers repeat until a full
//! pass performs no actions, or one side is eliminated, which halts the
//! round immediately, mid-layer if necessary.

use rand::Rng;
use tracing::warn;

use crate::combatant::{CombatantId, CombatantState};
use crate::data::{ActionKind, Team};
use crate::events::CombatSink;
use crate::timeline::is_duplicate_free;

/// Summary of one executed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundReport {
    /// Steps executed before the round ended.
    pub actions: u32,
    /// Layers started before the round ended.
    pub layers: u32,
    /// True if the round was cut short by a side being eliminated.
    pub halted_on_elimination: bool,
}

/// Returns the number of living combatants on `team`.
pub fn living_count(roster: &[CombatantState], team: Team) -> usize {
    roster
        .iter()
        .filter(|c| c.team() == team && c.alive())
        .count()
}

fn side_eliminated(roster: &[CombatantState]) -> bool {
    living_count(roster, Team::Ally) == 0 || living_count(roster, Team::Enemy) == 0
}

/// Executes one round over the given timeline.
///
/// The timeline is expected to be duplicate-free; a malformed one is
/// reported and executed anyway, with the per-layer acted guard preventing
/// double actions. Elimination is checked before each layer and after every
/// single action.
pub fn execute_round(
    roster: &mut [CombatantState],
    timeline: &[CombatantId],
    rng: &mut impl Rng,
    sink: &mut dyn CombatSink,
) -> RoundReport {
    if !is_duplicate_free(timeline) {
        warn!("timeline contains duplicate combatants; executing with acted guard");
    }

    let mut report = RoundReport::default();

    'round: loop {
        if side_eliminated(roster) {
            report.halted_on_elimination = true;
            break;
        }

        report.layers += 1;
        let mut acted = vec![false; roster.len()];
        let mut layer_actions = 0u32;

        for &id in timeline {
            let Some(combatant) = roster.get(id.0) else {
                warn!(combatant = %id, "timeline entry outside roster; skipping");
                continue;
            };
            if acted[id.0] || !combatant.alive() || !combatant.has_pending_action() {
                continue;
            }
            acted[id.0] = true;

            perform_step(roster, id, rng, sink);
            layer_actions += 1;
            report.actions += 1;

            if side_eliminated(roster) {
                report.halted_on_elimination = true;
                break 'round;
            }
        }

        if layer_actions == 0 {
            break;
        }
    }

    for combatant in roster.iter().filter(|c| c.alive()) {
        sink.idle(combatant.id());
    }
    sink.active_actor_changed(None);

    report
}

/// Executes the actor's current step and advances its cursor.
fn perform_step(
    roster: &mut [CombatantState],
    actor_id: CombatantId,
    rng: &mut impl Rng,
    sink: &mut dyn CombatSink,
) {
    let actor = &roster[actor_id.0];
    let Some(step) = actor.current_step().cloned() else {
        return;
    };
    // Only the enemy side rolls value variance.
    let allow_random = actor.team() == Team::Enemy;

    sink.active_actor_changed(Some(actor_id));
    sink.step_visual(actor_id, step.sprite_index);

    let kind = concrete_kind(step.kind, rng);
    let value = step.value.resolve(rng, allow_random);

    match kind {
        ActionKind::Attack => {
            // Resolve (and rebind) the target before announcing the action.
            match resolve_target(roster, actor_id, rng) {
                Some(target_id) => {
                    roster[actor_id.0].set_target(Some(target_id));
                    sink.action_performed(actor_id, kind, value, Some(target_id));
                    apply_attack(roster, target_id, value, sink);
                }
                None => {
                    warn!(actor = %actor_id, "attack step with no living target; skipping");
                }
            }
        }
        ActionKind::Block => {
            sink.action_performed(actor_id, kind, value, None);
            let actor = &mut roster[actor_id.0];
            actor.apply_armor(value);
            let (hp, armor) = (actor.hp(), actor.armor());
            sink.health_changed(actor_id, hp, armor);
        }
        ActionKind::Heal => {
            sink.action_performed(actor_id, kind, value, None);
            let actor = &mut roster[actor_id.0];
            actor.heal(value);
            let (hp, armor) = (actor.hp(), actor.armor());
            sink.health_changed(actor_id, hp, armor);
        }
        // concrete_kind never returns Random; skip the step if it does.
        ActionKind::Random => {
            warn!(actor = %actor_id, "unresolved random action kind; skipping step");
        }
    }

    roster[actor_id.0].advance_step();
}

/// Resolves `Random` into a concrete kind with a uniform roll, independent
/// of the value's own randomness.
fn concrete_kind(kind: ActionKind, rng: &mut impl Rng) -> ActionKind {
    match kind {
        ActionKind::Random => match rng.gen_range(0..3u8) {
            0 => ActionKind::Attack,
            1 => ActionKind::Block,
            _ => ActionKind::Heal,
        },
        other => other,
    }
}

/// Applies attack damage to a living target, with death handling.
fn apply_attack(
    roster: &mut [CombatantState],
    target_id: CombatantId,
    value: i32,
    sink: &mut dyn CombatSink,
) {
    let outcome = roster[target_id.0].receive_damage(value);
    let target = &roster[target_id.0];
    let (hp, armor, died) = (target.hp(), target.armor(), !target.alive());

    sink.damage_feedback(target_id, outcome);
    sink.health_changed(target_id, hp, armor);
    if died {
        sink.death(target_id);
    }
}

/// Prefers the actor's pre-selected target while it lives; otherwise picks
/// uniformly among living members of the opposing team.
fn resolve_target(
    roster: &[CombatantState],
    actor_id: CombatantId,
    rng: &mut impl Rng,
) -> Option<CombatantId> {
    let actor = &roster[actor_id.0];
    if let Some(t) = actor.target() {
        if roster.get(t.0).is_some_and(|c| c.alive()) {
            return Some(t);
        }
    }
    let foes: Vec<CombatantId> = roster
        .iter()
        .filter(|c| c.team() == actor.team().opposite() && c.alive())
        .map(|c| c.id())
        .collect();
    if foes.is_empty() {
        None
    } else {
        Some(foes[rng.gen_range(0..foes.len())])
    }
}
