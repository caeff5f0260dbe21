//! Match outcomes and what a button displays

use serde::{Deserialize, Serialize};

use crate::constants::{STATE_ACTIVE, STATE_INACTIVE};

/// How a button relates to the running entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    None,
    Exact,
    Fallback,
}

impl MatchResult {
    /// Whether the button claims the entry.
    pub fn is_match(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Host button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Active,
    Inactive,
}

impl ButtonState {
    /// Host state index.
    pub fn code(self) -> u8 {
        match self {
            Self::Active => STATE_ACTIVE,
            Self::Inactive => STATE_INACTIVE,
        }
    }

    /// State for a host index; anything but active is inactive.
    pub fn from_code(code: u8) -> Self {
        if code == STATE_ACTIVE {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

impl Serialize for ButtonState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ButtonState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_code(u8::deserialize(deserializer)?))
    }
}

/// State and title pushed to a button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonVisual {
    pub state: ButtonState,
    pub title: String,
}
