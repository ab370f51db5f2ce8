//! Per-combat mutable state of a single character.
//!
//! A `CombatantState` is created from a `CharacterDef` at battle start and
//! destroyed at battle end. It tracks health, armor, and energy, the
//! round-scoped card/target selection and step cursor, and the persistent
//! used-card pool for the player side.

use std::fmt;

use crate::data::{CharacterDef, Rotation, Team, MAX_ROTATIONS};

/// Stable identity of a combatant within a battle roster.
///
/// External tables (UI widgets, camera slots) key off this index instead of
/// holding references into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombatantId(pub usize);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Damage split returned by `receive_damage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    /// Portion absorbed by armor.
    pub blocked: i32,
    /// Portion applied to health, capped by the health available.
    pub applied_to_health: i32,
}

/// Mutable combat state of one character.
#[derive(Debug, Clone)]
pub struct CombatantState {
    id: CombatantId,
    def_id: u32,
    name: String,
    team: Team,
    hp_max: i32,
    initiative: i32,
    card_count: usize,
    hp: i32,
    armor: i32,
    energy: i32,
    rotation: Option<Rotation>,
    step_index: usize,
    target: Option<CombatantId>,
    card_index: Option<usize>,
    used_cards: [bool; MAX_ROTATIONS],
}

impl CombatantState {
    /// Creates the combat state for one character at full health.
    pub fn new(id: CombatantId, def: &CharacterDef) -> Self {
        CombatantState {
            id,
            def_id: def.id,
            name: def.name.clone(),
            team: def.team,
            hp_max: def.hp_max,
            initiative: def.initiative,
            card_count: def.rotations.len(),
            hp: def.hp_max,
            armor: 0,
            energy: def.energy_base,
            rotation: None,
            step_index: 0,
            target: None,
            card_index: None,
            used_cards: [false; MAX_ROTATIONS],
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn def_id(&self) -> u32 {
        self.def_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn hp_max(&self) -> i32 {
        self.hp_max
    }

    pub fn armor(&self) -> i32 {
        self.armor
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    /// Number of cards (rotations) the character owns.
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// A combatant is alive exactly while its health is positive.
    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    pub fn rotation(&self) -> Option<&Rotation> {
        self.rotation.as_ref()
    }

    pub fn card_index(&self) -> Option<usize> {
        self.card_index
    }

    pub fn target(&self) -> Option<CombatantId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<CombatantId>) {
        self.target = target;
    }

    /// Selects a card for the round and rewinds the step cursor.
    pub fn choose_card(&mut self, index: usize, rotation: Rotation) {
        self.rotation = Some(rotation);
        self.card_index = Some(index);
        self.step_index = 0;
    }

    /// True iff a rotation is chosen and the cursor still addresses a step.
    pub fn has_pending_action(&self) -> bool {
        self.rotation
            .as_ref()
            .is_some_and(|r| r.step(self.step_index).is_some())
    }

    /// The step the cursor currently addresses, if any.
    pub fn current_step(&self) -> Option<&crate::data::ActionStep> {
        self.rotation.as_ref().and_then(|r| r.step(self.step_index))
    }

    /// Moves the cursor to the next step. Does not wrap or validate bounds;
    /// callers check `has_pending_action` first.
    pub fn advance_step(&mut self) {
        self.step_index += 1;
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Applies incoming damage: armor absorbs first, the remainder reduces
    /// health, floored at zero. Negative amounts are treated as zero.
    pub fn receive_damage(&mut self, amount: i32) -> DamageOutcome {
        let amount = amount.max(0);
        let blocked = amount.min(self.armor);
        self.armor -= blocked;
        let applied_to_health = (amount - blocked).min(self.hp);
        self.hp -= applied_to_health;
        DamageOutcome {
            blocked,
            applied_to_health,
        }
    }

    /// Restores health, capped at `hp_max`. Negative amounts are ignored;
    /// extreme amounts saturate instead of overflowing.
    pub fn heal(&mut self, amount: i32) {
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.hp_max);
    }

    /// Adds temporary armor, saturating at `i32::MAX`. There is no upper
    /// cap; armor is cleared at the end of every round.
    pub fn apply_armor(&mut self, amount: i32) {
        self.armor = self.armor.saturating_add(amount.max(0));
    }

    /// Drops all remaining armor (end-of-round decay).
    pub fn clear_armor(&mut self) {
        self.armor = 0;
    }

    /// Clears the round-scoped selection: rotation, cursor, target, card.
    pub fn reset_round_state(&mut self) {
        self.rotation = None;
        self.step_index = 0;
        self.target = None;
        self.card_index = None;
    }

    /// Ends the round for this combatant. For the player side, with
    /// `consume_card` set and a card chosen, the card is marked used.
    /// The round-scoped selection is always cleared afterward.
    pub fn end_round(&mut self, consume_card: bool) {
        if self.team == Team::Ally && consume_card {
            if let Some(index) = self.card_index {
                if index < MAX_ROTATIONS {
                    self.used_cards[index] = true;
                }
            }
        }
        self.reset_round_state();
    }

    /// True if the card at `index` has been used this pool cycle.
    pub fn card_used(&self, index: usize) -> bool {
        index < MAX_ROTATIONS && self.used_cards[index]
    }

    /// True once every card the character owns has been used.
    pub fn all_cards_used(&self) -> bool {
        self.used_cards.iter().take(self.card_count).all(|u| *u)
    }

    /// Makes the whole card pool selectable again.
    pub fn reset_used_cards(&mut self) {
        self.used_cards = [false; MAX_ROTATIONS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ActionKind, ActionStep, ActionValue, CharacterDef};

    fn rotation(steps: usize) -> Rotation {
        let steps = (0..steps)
            .map(|_| ActionStep {
                sprite_index: 0,
                kind: ActionKind::Attack,
                value: ActionValue::Fixed(5),
            })
            .collect();
        Rotation::new("strike", steps).unwrap()
    }

    fn def(team: Team, rotations: usize) -> CharacterDef {
        CharacterDef {
            id: 1,
            name: "Mirein".to_string(),
            team,
            hp_max: 30,
            initiative: 10,
            energy_base: 3,
            rotations: (0..rotations).map(|_| rotation(1)).collect(),
        }
    }

    fn combatant(team: Team) -> CombatantState {
        CombatantState::new(CombatantId(0), &def(team, 4))
    }

    #[test]
    fn starts_at_full_health_with_no_selection() {
        let c = combatant(Team::Ally);
        assert_eq!(c.hp(), 30);
        assert_eq!(c.armor(), 0);
        assert_eq!(c.energy(), 3);
        assert!(c.alive());
        assert!(c.rotation().is_none());
        assert!(c.target().is_none());
        assert!(c.card_index().is_none());
        assert!(!c.has_pending_action());
    }

    #[test]
    fn armor_absorbs_before_health() {
        let mut c = combatant(Team::Enemy);
        c.apply_armor(4);
        let outcome = c.receive_damage(10);
        assert_eq!(outcome.blocked, 4);
        assert_eq!(outcome.applied_to_health, 6);
        assert_eq!(c.armor(), 0);
        assert_eq!(c.hp(), 24);
    }

    #[test]
    fn damage_fully_blocked_leaves_health_untouched() {
        let mut c = combatant(Team::Enemy);
        c.apply_armor(12);
        let outcome = c.receive_damage(10);
        assert_eq!(outcome.blocked, 10);
        assert_eq!(outcome.applied_to_health, 0);
        assert_eq!(c.armor(), 2);
        assert_eq!(c.hp(), 30);
    }

    #[test]
    fn overkill_damage_floors_at_zero() {
        let mut c = combatant(Team::Enemy);
        c.apply_armor(3);
        let outcome = c.receive_damage(100);
        assert_eq!(outcome.blocked, 3);
        assert_eq!(outcome.applied_to_health, 30);
        assert_eq!(c.hp(), 0);
        assert!(!c.alive());
        // Sum-consistency: blocked + applied never exceeds available buffer.
        assert_eq!(outcome.blocked + outcome.applied_to_health, 33);
    }

    #[test]
    fn negative_damage_is_a_no_op() {
        let mut c = combatant(Team::Enemy);
        let outcome = c.receive_damage(-5);
        assert_eq!(outcome, DamageOutcome::default());
        assert_eq!(c.hp(), 30);
    }

    #[test]
    fn heal_caps_at_hp_max() {
        let mut c = combatant(Team::Ally);
        c.receive_damage(10);
        c.heal(4);
        assert_eq!(c.hp(), 24);
        c.heal(100);
        assert_eq!(c.hp(), 30);
        c.heal(-5);
        assert_eq!(c.hp(), 30);
    }

    #[test]
    fn heal_saturates_on_extreme_amounts() {
        // validate() accepts Fixed(i32::MAX) steps, so the mutators must
        // tolerate them without overflowing.
        let mut c = combatant(Team::Ally);
        c.receive_damage(10);
        c.heal(i32::MAX);
        assert_eq!(c.hp(), 30);
        assert!(c.alive());
    }

    #[test]
    fn armor_saturates_on_extreme_amounts() {
        let mut c = combatant(Team::Ally);
        c.apply_armor(i32::MAX);
        c.apply_armor(i32::MAX);
        assert_eq!(c.armor(), i32::MAX);
        let outcome = c.receive_damage(10);
        assert_eq!(outcome.blocked, 10);
        assert_eq!(c.hp(), 30);
    }

    #[test]
    fn armor_accumulates_without_cap() {
        let mut c = combatant(Team::Ally);
        let mut last = 0;
        for _ in 0..10 {
            c.apply_armor(1000);
            assert!(c.armor() > last);
            last = c.armor();
        }
        assert_eq!(c.armor(), 10_000);
        c.clear_armor();
        assert_eq!(c.armor(), 0);
    }

    #[test]
    fn step_cursor_walks_the_rotation() {
        let mut c = combatant(Team::Ally);
        c.choose_card(0, rotation(2));
        assert!(c.has_pending_action());
        assert_eq!(c.step_index(), 0);
        c.advance_step();
        assert!(c.has_pending_action());
        c.advance_step();
        assert!(!c.has_pending_action());
        assert!(c.current_step().is_none());
    }

    #[test]
    fn choose_card_rewinds_cursor() {
        let mut c = combatant(Team::Ally);
        c.choose_card(0, rotation(2));
        c.advance_step();
        c.choose_card(1, rotation(1));
        assert_eq!(c.step_index(), 0);
        assert_eq!(c.card_index(), Some(1));
    }

    #[test]
    fn end_round_consumes_card_for_allies() {
        let mut c = combatant(Team::Ally);
        c.choose_card(2, rotation(1));
        c.set_target(Some(CombatantId(3)));
        c.end_round(true);
        assert!(c.card_used(2));
        assert!(c.rotation().is_none());
        assert!(c.target().is_none());
        assert!(c.card_index().is_none());
        assert_eq!(c.step_index(), 0);
    }

    #[test]
    fn end_round_without_consumption_keeps_pool() {
        let mut c = combatant(Team::Ally);
        c.choose_card(2, rotation(1));
        c.end_round(false);
        assert!(!c.card_used(2));
        assert!(c.rotation().is_none());
    }

    #[test]
    fn end_round_never_consumes_for_enemies() {
        let mut c = combatant(Team::Enemy);
        c.choose_card(0, rotation(1));
        c.end_round(true);
        assert!(!c.card_used(0));
    }

    #[test]
    fn all_cards_used_respects_pool_size() {
        let mut c = CombatantState::new(CombatantId(0), &def(Team::Ally, 2));
        assert!(!c.all_cards_used());
        c.choose_card(0, rotation(1));
        c.end_round(true);
        assert!(!c.all_cards_used());
        c.choose_card(1, rotation(1));
        c.end_round(true);
        assert!(c.all_cards_used());
        c.reset_used_cards();
        assert!(!c.all_cards_used());
        assert!(!c.card_used(0));
    }
}
