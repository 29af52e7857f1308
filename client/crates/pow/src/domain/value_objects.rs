//! Domain Value Objects
//!
//! Immutable value types for the puzzle domain.

use std::fmt;
use std::str::FromStr;

/// Difficulty of an admission challenge
///
/// Number of leading `'0'` characters required in the hex form of the
/// SHA-256 digest, so at most 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const DEFAULT: Difficulty = Difficulty(4);
    pub const MIN: u32 = 0;
    pub const MAX: u32 = 64; // hex digits in a SHA-256 digest

    pub fn new(zeros: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&zeros) {
            Some(Self(zeros as u8))
        } else {
            None
        }
    }

    pub fn zeros(&self) -> u32 {
        self.0 as u32
    }

    /// Expected number of trials for a uniform digest: `16^difficulty`
    pub fn expected_attempts(&self) -> f64 {
        16f64.powi(self.0 as i32)
    }

    /// The required hex prefix, e.g. `"0000"` for difficulty 4
    pub fn prefix(&self) -> String {
        "0".repeat(self.0 as usize)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Difficulty> for u32 {
    fn from(d: Difficulty) -> Self {
        d.zeros()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A solved counter value
///
/// Sent to the server in decimal string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    pub const fn new(counter: u64) -> Self {
        Self(counter)
    }

    pub const fn counter(&self) -> u64 {
        self.0
    }

    /// Number of candidates tried by a sequential search that stopped here
    pub const fn attempts(&self) -> u64 {
        self.0.saturating_add(1)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Nonce {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Nonce)
    }
}
