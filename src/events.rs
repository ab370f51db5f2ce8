//! Notification seam between the combat core and its presentation layers.
//!
//! The core fires visual, UI, and camera notifications through `CombatSink`
//! and never waits on them. `NullSink` discards everything; `EventLog`
//! records everything in order and backs the integration tests and the
//! demo binary.

use crate::combatant::{CombatantId, DamageOutcome};
use crate::data::ActionKind;

/// Where the camera layer is asked to look. Purely advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFocus {
    /// Frame a single combatant's slot.
    Combatant(CombatantId),
    /// Frame the whole battlefield.
    Center,
}

/// Final outcome of a battle, from the ally side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Victory,
    Defeat,
}

/// Sink for everything the core wants presentation layers to show.
///
/// All methods default to no-ops so implementors only override what they
/// render. Every call is fire-and-forget; the core does not consume return
/// values or await playback.
pub trait CombatSink {
    /// A new round has entered preparation.
    fn round_started(&mut self, _round: u32) {}

    /// A combatant is about to perform the step with this sprite cue.
    fn step_visual(&mut self, _id: CombatantId, _sprite_index: u8) {}

    /// A step finished executing with its resolved kind, value, and target.
    fn action_performed(
        &mut self,
        _actor: CombatantId,
        _kind: ActionKind,
        _value: i32,
        _target: Option<CombatantId>,
    ) {
    }

    /// A combatant took a hit (floating-number feedback).
    fn damage_feedback(&mut self, _id: CombatantId, _outcome: DamageOutcome) {}

    /// A combatant's health or armor display needs a refresh.
    fn health_changed(&mut self, _id: CombatantId, _hp: i32, _armor: i32) {}

    /// A combatant just died.
    fn death(&mut self, _id: CombatantId) {}

    /// A combatant returned to its idle pose.
    fn idle(&mut self, _id: CombatantId) {}

    /// The active-actor panel should highlight this combatant, or nobody.
    fn active_actor_changed(&mut self, _id: Option<CombatantId>) {}

    /// The camera layer is asked to re-frame.
    fn camera_focus(&mut self, _focus: CameraFocus) {}

    /// The battle ended; show the result popup.
    fn result_popup(&mut self, _result: BattleResult) {}
}

/// Sink that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CombatSink for NullSink {}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    RoundStarted {
        round: u32,
    },
    StepVisual {
        id: CombatantId,
        sprite_index: u8,
    },
    ActionPerformed {
        actor: CombatantId,
        kind: ActionKind,
        value: i32,
        target: Option<CombatantId>,
    },
    DamageFeedback {
        id: CombatantId,
        outcome: DamageOutcome,
    },
    HealthChanged {
        id: CombatantId,
        hp: i32,
        armor: i32,
    },
    Death {
        id: CombatantId,
    },
    Idle {
        id: CombatantId,
    },
    ActiveActorChanged {
        id: Option<CombatantId>,
    },
    CameraFocus {
        focus: CameraFocus,
    },
    ResultPopup {
        result: BattleResult,
    },
}

/// Sink that records every notification in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The performed actions, in execution order.
    pub fn actions(&self) -> Vec<&CombatEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, CombatEvent::ActionPerformed { .. }))
            .collect()
    }

    /// The recorded deaths, in order.
    pub fn deaths(&self) -> Vec<CombatantId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::Death { id } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl CombatSink for EventLog {
    fn round_started(&mut self, round: u32) {
        self.events.push(CombatEvent::RoundStarted { round });
    }

    fn step_visual(&mut self, id: CombatantId, sprite_index: u8) {
        self.events.push(CombatEvent::StepVisual { id, sprite_index });
    }

    fn action_performed(
        &mut self,
        actor: CombatantId,
        kind: ActionKind,
        value: i32,
        target: Option<CombatantId>,
    ) {
        self.events.push(CombatEvent::ActionPerformed {
            actor,
            kind,
            value,
            target,
        });
    }

    fn damage_feedback(&mut self, id: CombatantId, outcome: DamageOutcome) {
        self.events.push(CombatEvent::DamageFeedback { id, outcome });
    }

    fn health_changed(&mut self, id: CombatantId, hp: i32, armor: i32) {
        self.events.push(CombatEvent::HealthChanged { id, hp, armor });
    }

    fn death(&mut self, id: CombatantId) {
        self.events.push(CombatEvent::Death { id });
    }

    fn idle(&mut self, id: CombatantId) {
        self.events.push(CombatEvent::Idle { id });
    }

    fn active_actor_changed(&mut self, id: Option<CombatantId>) {
        self.events.push(CombatEvent::ActiveActorChanged { id });
    }

    fn camera_focus(&mut self, focus: CameraFocus) {
        self.events.push(CombatEvent::CameraFocus { focus });
    }

    fn result_popup(&mut self, result: BattleResult) {
        self.events.push(CombatEvent::ResultPopup { result });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_log_records_in_order() {
        let mut log = EventLog::new();
        log.round_started(1);
        log.step_visual(CombatantId(0), 2);
        log.death(CombatantId(3));
        assert_eq!(
            log.events,
            vec![
                CombatEvent::RoundStarted { round: 1 },
                CombatEvent::StepVisual {
                    id: CombatantId(0),
                    sprite_index: 2
                },
                CombatEvent::Death { id: CombatantId(3) },
            ]
        );
        assert_eq!(log.deaths(), vec![CombatantId(3)]);
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mut sink = NullSink;
        sink.round_started(1);
        sink.result_popup(BattleResult::Victory);
    }
}
