//! Rotations: the pre-authored action sequences selectable as cards.
//!
//! A rotation is a named sequence of one to four steps. Each step carries a
//! sprite cue for the intention display, an action kind, and a value spec.
//! Rotations are owned by character definitions and never mutated once
//! selected for a round.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value::ActionValue;

/// Number of sprite cues available to a step.
pub const SPRITE_INDEX_COUNT: u8 = 4;

/// Maximum number of steps in a rotation.
pub const MAX_ROTATION_STEPS: usize = 4;

/// What a single step does when it executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Resolved into one of the three concrete kinds at execution time.
    Random,
    Attack,
    Block,
    Heal,
}

/// One step of a rotation: a sprite cue, an action kind, and a value spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub sprite_index: u8,
    pub kind: ActionKind,
    pub value: ActionValue,
}

/// Errors raised when validating authored rotation data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    #[error("rotation '{0}' has no steps")]
    Empty(String),

    #[error("rotation '{0}' has {1} steps, maximum is 4")]
    TooManySteps(String, usize),

    #[error("rotation '{0}' step {1} has sprite index {2}, must be below 4")]
    SpriteIndexOutOfRange(String, usize, u8),
}

/// A named, immutable sequence of 1-4 action steps: one selectable card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub name: String,
    pub steps: Vec<ActionStep>,
}

impl Rotation {
    /// Builds a rotation, validating step count and sprite indices.
    pub fn new(name: impl Into<String>, steps: Vec<ActionStep>) -> Result<Self, RotationError> {
        let rotation = Rotation { name: name.into(), steps };
        rotation.validate()?;
        Ok(rotation)
    }

    /// Checks the rotation invariants. Deserialized data should be passed
    /// through this before use.
    pub fn validate(&self) -> Result<(), RotationError> {
        if self.steps.is_empty() {
            return Err(RotationError::Empty(self.name.clone()));
        }
        if self.steps.len() > MAX_ROTATION_STEPS {
            return Err(RotationError::TooManySteps(self.name.clone(), self.steps.len()));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if step.sprite_index >= SPRITE_INDEX_COUNT {
                return Err(RotationError::SpriteIndexOutOfRange(
                    self.name.clone(),
                    i,
                    step.sprite_index,
                ));
            }
        }
        Ok(())
    }

    /// Number of steps in the rotation.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the rotation has no steps. Never true for a validated rotation.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step at `index`, if within bounds.
    pub fn step(&self, index: usize) -> Option<&ActionStep> {
        self.steps.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack_step(value: i32) -> ActionStep {
        ActionStep {
            sprite_index: 0,
            kind: ActionKind::Attack,
            value: ActionValue::Fixed(value),
        }
    }

    #[test]
    fn new_accepts_one_to_four_steps() {
        for n in 1..=4 {
            let steps = (0..n).map(|_| attack_step(1)).collect();
            assert!(Rotation::new("strike", steps).is_ok(), "{} steps should be valid", n);
        }
    }

    #[test]
    fn new_rejects_empty() {
        let err = Rotation::new("hollow", Vec::new()).unwrap_err();
        assert_eq!(err, RotationError::Empty("hollow".to_string()));
    }

    #[test]
    fn new_rejects_five_steps() {
        let steps = (0..5).map(|_| attack_step(1)).collect();
        let err = Rotation::new("greedy", steps).unwrap_err();
        assert_eq!(err, RotationError::TooManySteps("greedy".to_string(), 5));
    }

    #[test]
    fn new_rejects_sprite_index_out_of_range() {
        let steps = vec![ActionStep {
            sprite_index: 4,
            kind: ActionKind::Heal,
            value: ActionValue::Fixed(3),
        }];
        let err = Rotation::new("glitch", steps).unwrap_err();
        assert_eq!(
            err,
            RotationError::SpriteIndexOutOfRange("glitch".to_string(), 0, 4)
        );
    }

    #[test]
    fn step_lookup() {
        let rotation = Rotation::new("strike", vec![attack_step(2), attack_step(5)]).unwrap();
        assert_eq!(rotation.len(), 2);
        assert_eq!(rotation.step(1).unwrap().value, ActionValue::Fixed(5));
        assert!(rotation.step(2).is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let rotation = Rotation::new(
            "feint",
            vec![
                attack_step(2),
                ActionStep {
                    sprite_index: 3,
                    kind: ActionKind::Random,
                    value: ActionValue::Range { min: 1, max: 4 },
                },
            ],
        )
        .unwrap();
        let json = serde_json::to_string(&rotation).unwrap();
        let back: Rotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rotation);
        assert!(back.validate().is_ok());
    }
}
