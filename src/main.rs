//! Dear Rotten Land -- seeded auto-battle demo.
//!
//! Plays one battle to its conclusion with a scripted player (first unused
//! card, first living enemy) and prints every combat event. Usage:
//!
//!     rotten-combat [roster.json] [seed]
//!
//! Without arguments a built-in roster and seed 42 are used.

use std::fs;
use std::process::ExitCode;

use rotten_combat::battle::{BattleController, BattlePhase, RoundOutcome};
use rotten_combat::combatant::CombatantId;
use rotten_combat::config::BattleConfig;
use rotten_combat::data::{ActionKind, ActionStep, ActionValue, CharacterDef, Rotation, Team};
use rotten_combat::events::{CombatEvent, EventLog};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let defs = match args.next() {
        Some(path) => match load_roster(&path) {
            Ok(defs) => defs,
            Err(e) => {
                eprintln!("failed to load roster from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => demo_roster(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    let mut battle = match BattleController::new(defs, BattleConfig::default(), seed) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("invalid roster: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut log = EventLog::new();
    battle.start(&mut log);

    // Scripted player: first unused card, first living enemy.
    while battle.phase() != BattlePhase::Finished {
        while let Some(ally) = battle.awaiting_rotation() {
            let card = first_unused_card(&battle, ally);
            if battle.choose_rotation(ally, card, &mut log).is_err() {
                eprintln!("scripted player failed to pick a card; aborting");
                return ExitCode::FAILURE;
            }
            if battle.awaiting_target().is_some() {
                let target = battle.living(Team::Enemy)[0];
                if battle.choose_target(target, &mut log).is_err() {
                    eprintln!("scripted player failed to pick a target; aborting");
                    return ExitCode::FAILURE;
                }
            }
        }
        match battle.run_resolution(&mut log) {
            Ok(RoundOutcome::Finished(result)) => {
                print_events(&battle, &log.events);
                println!("result: {:?} after {} rounds", result, battle.round());
                return ExitCode::SUCCESS;
            }
            Ok(RoundOutcome::Continue) => {}
            Err(e) => {
                eprintln!("resolution rejected: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Picks the first card the ally has not used this pool cycle.
fn first_unused_card(battle: &BattleController, ally: CombatantId) -> usize {
    let combatant = battle.combatant(ally).expect("awaited ally exists");
    (0..combatant.card_count())
        .find(|&i| !combatant.card_used(i))
        .unwrap_or(0)
}

fn load_roster(path: &str) -> Result<Vec<CharacterDef>, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let defs: Vec<CharacterDef> = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    for def in &defs {
        def.validate().map_err(|e| e.to_string())?;
    }
    Ok(defs)
}

fn print_events(battle: &BattleController, events: &[CombatEvent]) {
    let name = |id: CombatantId| {
        battle
            .combatant(id)
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    for event in events {
        match event {
            CombatEvent::RoundStarted { round } => println!("-- round {} --", round),
            CombatEvent::ActionPerformed {
                actor,
                kind,
                value,
                target,
            } => match target {
                Some(t) => println!("{} {:?} {} -> {}", name(*actor), kind, value, name(*t)),
                None => println!("{} {:?} {}", name(*actor), kind, value),
            },
            CombatEvent::HealthChanged { id, hp, armor } => {
                println!("  {} now {} hp, {} armor", name(*id), hp, armor)
            }
            CombatEvent::Death { id } => println!("  {} dies", name(*id)),
            CombatEvent::ResultPopup { result } => println!("== {:?} ==", result),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotten_combat::events::NullSink;

    fn blocker(id: u32, team: Team, cards: usize) -> CharacterDef {
        let rotations = (0..cards)
            .map(|i| {
                Rotation::new(
                    format!("guard{}", i),
                    vec![ActionStep {
                        sprite_index: 0,
                        kind: ActionKind::Block,
                        value: ActionValue::Fixed(1),
                    }],
                )
                .unwrap()
            })
            .collect();
        CharacterDef {
            id,
            name: format!("c{}", id),
            team,
            hp_max: 100,
            initiative: 5,
            energy_base: 0,
            rotations,
        }
    }

    #[test]
    fn first_unused_card_stays_within_the_owned_pool() {
        // A two-card ally with consumption on and no auto reset: the
        // scripted pick must never address a card the ally does not own.
        let defs = vec![blocker(1, Team::Ally, 2), blocker(2, Team::Enemy, 1)];
        let config = BattleConfig {
            consume_cards: true,
            auto_reset_pool: false,
        };
        let mut battle = BattleController::new(defs, config, 1).unwrap();
        battle.start(&mut NullSink);

        let ally = battle.awaiting_rotation().unwrap();
        assert_eq!(first_unused_card(&battle, ally), 0);
        battle.choose_rotation(ally, 0, &mut NullSink).unwrap();
        battle.run_resolution(&mut NullSink).unwrap();

        let ally = battle.awaiting_rotation().unwrap();
        let card = first_unused_card(&battle, ally);
        assert_eq!(card, 1);
        assert!(battle.choose_rotation(ally, card, &mut NullSink).is_ok());
    }
}

/// A small built-in roster: two allies against two enemies.
fn demo_roster() -> Vec<CharacterDef> {
    let step = |sprite_index, kind, value| ActionStep {
        sprite_index,
        kind,
        value,
    };
    vec![
        CharacterDef {
            id: 1,
            name: "Mirein".to_string(),
            team: Team::Ally,
            hp_max: 32,
            initiative: 10,
            energy_base: 3,
            rotations: vec![
                Rotation::new(
                    "twin cuts",
                    vec![
                        step(0, ActionKind::Attack, ActionValue::Fixed(6)),
                        step(0, ActionKind::Attack, ActionValue::Fixed(6)),
                    ],
                )
                .unwrap(),
                Rotation::new(
                    "guarded slash",
                    vec![
                        step(1, ActionKind::Block, ActionValue::Fixed(5)),
                        step(0, ActionKind::Attack, ActionValue::Fixed(8)),
                    ],
                )
                .unwrap(),
            ],
        },
        CharacterDef {
            id: 2,
            name: "Tolm".to_string(),
            team: Team::Ally,
            hp_max: 40,
            initiative: 5,
            energy_base: 2,
            rotations: vec![
                Rotation::new(
                    "mend",
                    vec![
                        step(2, ActionKind::Heal, ActionValue::Fixed(7)),
                        step(1, ActionKind::Block, ActionValue::Fixed(4)),
                    ],
                )
                .unwrap(),
                Rotation::new(
                    "club",
                    vec![step(0, ActionKind::Attack, ActionValue::Fixed(9))],
                )
                .unwrap(),
            ],
        },
        CharacterDef {
            id: 3,
            name: "Bogwitch".to_string(),
            team: Team::Enemy,
            hp_max: 28,
            initiative: 8,
            energy_base: 0,
            rotations: vec![
                Rotation::new(
                    "hex",
                    vec![step(3, ActionKind::Attack, ActionValue::Range { min: 3, max: 8 })],
                )
                .unwrap(),
                Rotation::new(
                    "writhe",
                    vec![
                        step(1, ActionKind::Block, ActionValue::Set(vec![2, 4, 6])),
                        step(3, ActionKind::Attack, ActionValue::Range { min: 2, max: 5 }),
                    ],
                )
                .unwrap(),
            ],
        },
        CharacterDef {
            id: 4,
            name: "Rotling".to_string(),
            team: Team::Enemy,
            hp_max: 18,
            initiative: 3,
            energy_base: 0,
            rotations: vec![Rotation::new(
                "gnaw",
                vec![step(0, ActionKind::Random, ActionValue::Range { min: 1, max: 6 })],
            )
            .unwrap()],
        },
    ]
}
