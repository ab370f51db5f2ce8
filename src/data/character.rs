//! Character definitions: the read-only authored stats and card lists.
//!
//! A definition carries everything static about a character: identity,
//! team, stat block, and up to four named rotations. The combat core only
//! reads this data; authoring and import pipelines live elsewhere.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rotation::{Rotation, RotationError};

/// Which side a character fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Ally,
    Enemy,
}

impl Team {
    /// Returns the opposing team.
    pub const fn opposite(self) -> Team {
        match self {
            Team::Ally => Team::Enemy,
            Team::Enemy => Team::Ally,
        }
    }
}

/// Maximum number of rotations (cards) a character may carry.
pub const MAX_ROTATIONS: usize = 4;

/// Errors raised when validating a character definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterDefError {
    #[error("character '{0}' has non-positive max hp {1}")]
    NonPositiveHp(String, i32),

    #[error("character '{0}' has no rotations")]
    NoRotations(String),

    #[error("character '{0}' has {1} rotations, maximum is 4")]
    TooManyRotations(String, usize),

    #[error("character '{name}': {source}")]
    Rotation {
        name: String,
        #[source]
        source: RotationError,
    },
}

/// Static definition of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDef {
    pub id: u32,
    pub name: String,
    pub team: Team,
    pub hp_max: i32,
    pub initiative: i32,
    #[serde(default)]
    pub energy_base: i32,
    pub rotations: Vec<Rotation>,
}

impl CharacterDef {
    /// Checks the definition invariants, including those of each rotation.
    /// Deserialized data should be passed through this before use.
    pub fn validate(&self) -> Result<(), CharacterDefError> {
        if self.hp_max <= 0 {
            return Err(CharacterDefError::NonPositiveHp(self.name.clone(), self.hp_max));
        }
        if self.rotations.is_empty() {
            return Err(CharacterDefError::NoRotations(self.name.clone()));
        }
        if self.rotations.len() > MAX_ROTATIONS {
            return Err(CharacterDefError::TooManyRotations(
                self.name.clone(),
                self.rotations.len(),
            ));
        }
        for rotation in &self.rotations {
            rotation.validate().map_err(|source| CharacterDefError::Rotation {
                name: self.name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
