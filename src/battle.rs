//! Battle orchestration: the phase state machine.
//!
//! A `BattleController` owns the roster and drives the
//! Preparation -> Resolution -> Finished flow: sequential ally card and
//! target selection with validation gates, cyclical AI rotation assignment
//! for the enemy side, round resolution, and post-round cleanup with
//! win/loss detection. All mutation during a battle flows through this
//! type and the round executor it calls.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::debug;

use crate::combatant::{CombatantId, CombatantState};
use crate::config::BattleConfig;
use crate::data::{CharacterDef, CharacterDefError, Team};
use crate::events::{BattleResult, CameraFocus, CombatSink};
use crate::resolve::{execute_round, living_count};
use crate::timeline::build_timeline;

/// The phase of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Cards and targets are being selected.
    Preparation,
    /// A round is ready to execute.
    Resolution,
    /// One side has no survivors. Terminal.
    Finished,
}

/// What happened after a round resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Both sides still stand; the next preparation has begun.
    Continue,
    /// One side was eliminated.
    Finished(BattleResult),
}

/// Rejected inputs at the controller's validation gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selections are only accepted during preparation")]
    NotPreparing,

    #[error("combatant {0} is not the ally awaiting a rotation")]
    NotAwaitingRotation(CombatantId),

    #[error("card index {0} is out of range")]
    CardOutOfRange(usize),

    #[error("card {0} has already been used")]
    CardAlreadyUsed(usize),

    #[error("no ally is awaiting a target")]
    NoTargetAwaited,

    #[error("combatant {0} is not part of this battle")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is not on the enemy side")]
    NotAnEnemy(CombatantId),

    #[error("combatant {0} is dead and cannot be targeted")]
    DeadTarget(CombatantId),

    #[error("no round is ready for resolution")]
    NotResolving,
}

/// Errors raised when assembling a battle roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster has no ally characters")]
    NoAllies,

    #[error("roster has no enemy characters")]
    NoEnemies,

    #[error(transparent)]
    Definition(#[from] CharacterDefError),
}

/// What the controller is waiting for during preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    Rotation(CombatantId),
    Target(CombatantId),
}

/// Drives one battle from construction to a terminal result.
#[derive(Debug)]
pub struct BattleController {
    defs: Vec<CharacterDef>,
    roster: Vec<CombatantState>,
    config: BattleConfig,
    phase: BattlePhase,
    rng: SmallRng,
    ai_cycle: usize,
    round: u32,
    awaiting: Option<Awaiting>,
}

impl BattleController {
    /// Builds a battle from validated definitions and a seed.
    ///
    /// The seed fixes every random decision of the battle (enemy value
    /// rolls, random-kind resolution, re-rolled targets), so a battle is
    /// reproducible given the same definitions and inputs.
    pub fn new(
        defs: Vec<CharacterDef>,
        config: BattleConfig,
        seed: u64,
    ) -> Result<Self, RosterError> {
        for def in &defs {
            def.validate()?;
        }
        if !defs.iter().any(|d| d.team == Team::Ally) {
            return Err(RosterError::NoAllies);
        }
        if !defs.iter().any(|d| d.team == Team::Enemy) {
            return Err(RosterError::NoEnemies);
        }

        let roster = defs
            .iter()
            .enumerate()
            .map(|(i, d)| CombatantState::new(CombatantId(i), d))
            .collect();

        Ok(BattleController {
            defs,
            roster,
            config,
            phase: BattlePhase::Preparation,
            rng: SmallRng::seed_from_u64(seed),
            ai_cycle: 0,
            round: 0,
            awaiting: None,
        })
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Rounds started so far. Zero before `start`.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn roster(&self) -> &[CombatantState] {
        &self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantState> {
        self.roster.get(id.0)
    }

    /// The ally whose rotation choice is currently awaited, if any.
    pub fn awaiting_rotation(&self) -> Option<CombatantId> {
        match self.awaiting {
            Some(Awaiting::Rotation(id)) => Some(id),
            _ => None,
        }
    }

    /// The ally whose target choice is currently awaited, if any.
    pub fn awaiting_target(&self) -> Option<CombatantId> {
        match self.awaiting {
            Some(Awaiting::Target(id)) => Some(id),
            _ => None,
        }
    }

    /// Living members of `team`, in roster order.
    pub fn living(&self, team: Team) -> Vec<CombatantId> {
        self.roster
            .iter()
            .filter(|c| c.team() == team && c.alive())
            .map(|c| c.id())
            .collect()
    }

    /// Enters the first preparation phase. Call once after construction.
    pub fn start(&mut self, sink: &mut dyn CombatSink) {
        self.begin_preparation(sink);
    }

    /// Inbound entry point: the player picked card `card_index` for `ally`.
    ///
    /// Rejected unless the battle is preparing, `ally` is the combatant
    /// currently awaited, the index addresses an owned card, and that card
    /// has not been used this pool cycle. On success the controller either
    /// awaits a target (more than one living enemy) or auto-binds the sole
    /// survivor and moves on.
    pub fn choose_rotation(
        &mut self,
        ally: CombatantId,
        card_index: usize,
        sink: &mut dyn CombatSink,
    ) -> Result<(), SelectionError> {
        if self.phase != BattlePhase::Preparation {
            return Err(SelectionError::NotPreparing);
        }
        match self.awaiting {
            Some(Awaiting::Rotation(id)) if id == ally => {}
            _ => {
                debug!(combatant = %ally, "rotation signal while not awaited");
                return Err(SelectionError::NotAwaitingRotation(ally));
            }
        }

        let def = &self.defs[ally.0];
        let rotation = def
            .rotations
            .get(card_index)
            .ok_or(SelectionError::CardOutOfRange(card_index))?
            .clone();
        if self.roster[ally.0].card_used(card_index) {
            return Err(SelectionError::CardAlreadyUsed(card_index));
        }

        self.roster[ally.0].choose_card(card_index, rotation);

        let foes = self.living(Team::Enemy);
        if foes.len() > 1 {
            self.awaiting = Some(Awaiting::Target(ally));
            sink.camera_focus(CameraFocus::Center);
        } else {
            // Zero living enemies cannot happen during preparation; the
            // battle would already be finished.
            self.roster[ally.0].set_target(foes.first().copied());
            self.advance_selection(sink);
        }
        Ok(())
    }

    /// Inbound entry point: the player picked an enemy to attack.
    ///
    /// Rejected if no ally is awaiting a target, or the proposed target is
    /// unknown, friendly, or dead.
    pub fn choose_target(
        &mut self,
        target: CombatantId,
        sink: &mut dyn CombatSink,
    ) -> Result<(), SelectionError> {
        if self.phase != BattlePhase::Preparation {
            return Err(SelectionError::NotPreparing);
        }
        let Some(Awaiting::Target(ally)) = self.awaiting else {
            debug!(combatant = %target, "target signal while none awaited");
            return Err(SelectionError::NoTargetAwaited);
        };

        let proposed = self
            .roster
            .get(target.0)
            .ok_or(SelectionError::UnknownCombatant(target))?;
        if proposed.team() != Team::Enemy {
            return Err(SelectionError::NotAnEnemy(target));
        }
        if !proposed.alive() {
            return Err(SelectionError::DeadTarget(target));
        }

        self.roster[ally.0].set_target(Some(target));
        self.awaiting = None;
        self.advance_selection(sink);
        Ok(())
    }

    /// Executes the prepared round, then applies post-round cleanup and
    /// checks win/loss. Only legal once every ally is ready.
    pub fn run_resolution(
        &mut self,
        sink: &mut dyn CombatSink,
    ) -> Result<RoundOutcome, SelectionError> {
        if self.phase != BattlePhase::Resolution {
            return Err(SelectionError::NotResolving);
        }

        let timeline = build_timeline(&self.roster);
        execute_round(&mut self.roster, &timeline, &mut self.rng, sink);
        Ok(self.finish_round(sink))
    }

    /// Resets round-scoped state, assigns AI rotations, and starts the
    /// sequential ally selection.
    fn begin_preparation(&mut self, sink: &mut dyn CombatSink) {
        self.phase = BattlePhase::Preparation;
        self.round += 1;

        for combatant in self.roster.iter_mut().filter(|c| c.alive()) {
            combatant.reset_round_state();
        }
        self.assign_ai_rotations();
        self.ai_cycle += 1;

        sink.round_started(self.round);
        self.advance_selection(sink);
    }

    /// Round-robins each living enemy through its rotation list. The cycle
    /// counter advances once per round so AI card choice varies over time.
    /// AI targets are left unbound; the executor resolves them at attack
    /// time.
    fn assign_ai_rotations(&mut self) {
        for combatant in self.roster.iter_mut() {
            if combatant.team() != Team::Enemy || !combatant.alive() {
                continue;
            }
            let rotations = &self.defs[combatant.id().0].rotations;
            let pick = self.ai_cycle % rotations.len();
            combatant.choose_card(pick, rotations[pick].clone());
        }
    }

    /// Moves the awaited selection to the next living ally without a
    /// rotation, or enters resolution when everyone is ready.
    fn advance_selection(&mut self, sink: &mut dyn CombatSink) {
        let next = self
            .roster
            .iter()
            .find(|c| c.team() == Team::Ally && c.alive() && c.rotation().is_none())
            .map(|c| c.id());

        match next {
            Some(id) => {
                self.awaiting = Some(Awaiting::Rotation(id));
                sink.active_actor_changed(Some(id));
                sink.camera_focus(CameraFocus::Combatant(id));
            }
            None => {
                self.awaiting = None;
                self.phase = BattlePhase::Resolution;
                sink.active_actor_changed(None);
                sink.camera_focus(CameraFocus::Center);
            }
        }
    }

    /// Post-round bookkeeping: temporary armor decays, the card policy is
    /// applied, and the outcome is decided. Simultaneous elimination of
    /// both sides counts as a defeat.
    fn finish_round(&mut self, sink: &mut dyn CombatSink) -> RoundOutcome {
        for combatant in self.roster.iter_mut() {
            combatant.clear_armor();
            combatant.end_round(self.config.consume_cards);
            if self.config.auto_reset_pool
                && combatant.team() == Team::Ally
                && combatant.all_cards_used()
            {
                combatant.reset_used_cards();
            }
        }

        if living_count(&self.roster, Team::Ally) == 0 {
            self.phase = BattlePhase::Finished;
            sink.result_popup(BattleResult::Defeat);
            RoundOutcome::Finished(BattleResult::Defeat)
        } else if living_count(&self.roster, Team::Enemy) == 0 {
            self.phase = BattlePhase::Finished;
            sink.result_popup(BattleResult::Victory);
            RoundOutcome::Finished(BattleResult::Victory)
        } else {
            self.begin_preparation(sink);
            RoundOutcome::Continue
        }
    }
}
