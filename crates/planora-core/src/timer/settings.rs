use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn other(self) -> Phase {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }
}

/// Focus and break lengths in minutes. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    focus_minutes: u32,
    break_minutes: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
        }
    }
}

impl TimerSettings {
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Result<Self, ValidationError> {
        if focus_minutes == 0 {
            return Err(ValidationError::invalid("focus_minutes", "must be positive"));
        }
        if break_minutes == 0 {
            return Err(ValidationError::invalid("break_minutes", "must be positive"));
        }
        Ok(Self {
            focus_minutes,
            break_minutes,
        })
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_minutes,
            Phase::Break => self.break_minutes,
        }
    }

    /// Phase length in seconds.
    pub fn secs(&self, phase: Phase) -> u64 {
        u64::from(self.minutes(phase)) * 60
    }

    /// Returns false (and changes nothing) for zero.
    pub(crate) fn set(&mut self, phase: Phase, minutes: u32) -> bool {
        if minutes == 0 {
            return false;
        }
        match phase {
            Phase::Focus => self.focus_minutes = minutes,
            Phase::Break => self.break_minutes = minutes,
        }
        true
    }
}

/// Parse user-typed minutes, keeping `previous` for anything that is not a
/// positive whole number.
pub fn parse_minutes(input: &str, previous: u32) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => minutes,
        _ => previous,
    }
}

/// `MM:SS`, minutes zero-padded to at least two digits.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
