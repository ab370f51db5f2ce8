//! Action value specifications and their resolution.
//!
//! A step's numeric value is authored either as a fixed literal, an
//! inclusive range, or a discrete set of options. Only the enemy side ever
//! rolls variance; ally-side resolution is fully deterministic.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The numeric value of an action step, as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionValue {
    /// A fixed literal: always the same value.
    Fixed(i32),
    /// A uniform roll in the closed interval `[min, max]`.
    Range { min: i32, max: i32 },
    /// A uniform pick among discrete options.
    Set(Vec<i32>),
}

impl ActionValue {
    /// Resolves the spec into a concrete value.
    ///
    /// With `allow_random` set, `Range` rolls uniformly in `[min, max]`
    /// (inverted bounds are swapped rather than rejected) and `Set` picks
    /// a uniform element. Without it, resolution is deterministic: the
    /// literal for `Fixed`, the lower bound for `Range`, the first option
    /// for `Set`. An empty set degrades to 0 either way. Never panics.
    pub fn resolve(&self, rng: &mut impl Rng, allow_random: bool) -> i32 {
        match self {
            ActionValue::Fixed(v) => *v,
            ActionValue::Range { min, max } => {
                let (lo, hi) = if min <= max { (*min, *max) } else { (*max, *min) };
                if allow_random {
                    rng.gen_range(lo..=hi)
                } else {
                    lo
                }
            }
            ActionValue::Set(options) => {
                if options.is_empty() {
                    return 0;
                }
                if allow_random {
                    options[rng.gen_range(0..options.len())]
                } else {
                    options[0]
                }
            }
        }
    }
}
