use serde::{Deserialize, Serialize};
use std::fmt;

/// A numbered wire protocol generation.
///
/// Generations are ordered; each one owns its own type-code table and makes
/// no compatibility promise beyond what that table shares with its
/// predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u32);

impl Generation {
    /// First generation carried by this crate
    pub const V50: Generation = Generation(50);
    /// Adds explicit bucket spaces and the document-ignored reply
    pub const V51: Generation = Generation(51);

    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Generation {
    fn from(number: u32) -> Self {
        Self(number)
    }
}
