//! Dear Rotten Land combat resolution core.
//!
//! Exposes the definition data model, combatant state, timeline builder,
//! round executor, and battle controller for use by integration tests and
//! the binary entry point. Presentation layers (visuals, UI, camera) hang
//! off the `events::CombatSink` seam.

pub mod battle;
pub mod combatant;
pub mod config;
pub mod data;
pub mod events;
pub mod resolve;
pub mod timeline;
