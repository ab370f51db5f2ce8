//! Round resolution.
//!
//! Executes a built timeline layer by layer, applying attack, block, and
//! heal effects until every rotation is exhausted or one side has been
//! eliminated.

pub mod executor;

pub use executor::{execute_round, living_count, RoundReport};
