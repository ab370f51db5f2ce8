//! Definition data for characters and their action cards.
//!
//! Contains the read-only authored data the combat core consumes: action
//! value specs, rotation steps, rotations (cards), and character
//! definitions.

pub mod character;
pub mod rotation;
pub mod value;

pub use character::{CharacterDef, CharacterDefError, Team, MAX_ROTATIONS};
pub use rotation::{
    ActionKind, ActionStep, Rotation, RotationError, MAX_ROTATION_STEPS, SPRITE_INDEX_COUNT,
};
pub use value::ActionValue;
