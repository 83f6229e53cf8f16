//! Update rules
//!
//! Rules are run-invariant configuration. Each carries a stable id that is
//! mixed into every lock, so changing the rule always changes the digest.

use crate::error::LockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed local update rule over the 8-cell toroidal neighbourhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Classic B3/S23. First order: the next generation depends only on the
    /// current one. Seeded tori settle into short cycles, so it is kept as a
    /// reference rule rather than a work function.
    Life,
    /// Second-order B3/S23: `next = life(current) XOR previous`.
    ///
    /// Invertible, so the trajectory has no attractor to fall into and cells
    /// keep toggling for the whole run.
    #[default]
    ReversibleLife,
}

impl Rule {
    /// Stable identifier mixed into the lock serialization
    pub const fn id(self) -> u8 {
        match self {
            Rule::Life => 1,
            Rule::ReversibleLife => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Rule::Life),
            2 => Some(Rule::ReversibleLife),
            _ => None,
        }
    }

    /// Whether the rule reads the previous generation
    pub const fn is_second_order(self) -> bool {
        matches!(self, Rule::ReversibleLife)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Rule::Life => "life",
            Rule::ReversibleLife => "reversible-life",
        }
    }

    /// Conway survival/birth: alive with 2 or 3 neighbours, born with 3
    #[inline]
    pub fn life(alive: bool, neighbors: u8) -> bool {
        matches!((alive, neighbors), (true, 2) | (_, 3))
    }

    /// Next state of one cell
    #[inline]
    pub fn apply(self, alive: bool, neighbors: u8, previous: bool) -> bool {
        match self {
            Rule::Life => Self::life(alive, neighbors),
            Rule::ReversibleLife => Self::life(alive, neighbors) ^ previous,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = LockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "life" => Ok(Rule::Life),
            "reversible-life" => Ok(Rule::ReversibleLife),
            other => Err(LockError::config(format!("unknown rule '{}'", other))),
        }
    }
}
