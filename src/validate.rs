// Parameter Validation
//
// Pure range checks, run before the handle lock is taken or the engine is
// touched. A rejected value therefore has no side effects at all.

use std::fmt;

use crate::agc_config::{TARGET_MAX, TARGET_MIN, VAD_PROB_MAX, VAD_PROB_MIN};
use crate::error::{AgcError, Result};

/// Configurable engine parameters. Values live inside the native instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Target linear PCM amplitude (1..32768)
    Target,
    /// Maximum gain that may be applied, in dB (>= 0)
    MaxGain,
    /// Maximum gain increase in dB/second (>= 0)
    Increment,
    /// Maximum gain decrease in dB/second (<= 0)
    Decrement,
    /// Probability (%) required to enter the speech state (0..100)
    VadProbStart,
    /// Probability (%) required to stay in the speech state (0..100)
    VadProbContinue,
}

impl Param {
    pub const ALL: [Param; 6] = [
        Param::Target,
        Param::MaxGain,
        Param::Increment,
        Param::Decrement,
        Param::VadProbStart,
        Param::VadProbContinue,
    ];

    /// Human readable name, used in engine error messages
    pub fn name(self) -> &'static str {
        match self {
            Param::Target => "target",
            Param::MaxGain => "max gain",
            Param::Increment => "increment",
            Param::Decrement => "decrement",
            Param::VadProbStart => "VAD start probability",
            Param::VadProbContinue => "VAD continue probability",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check `value` against the legal range of `param`.
pub fn validate(param: Param, value: i32) -> Result<()> {
    match param {
        Param::Target => validate_target(value),
        Param::MaxGain => validate_max_gain(value),
        Param::Increment => validate_increment(value),
        Param::Decrement => validate_decrement(value),
        Param::VadProbStart => validate_vad_prob_start(value),
        Param::VadProbContinue => validate_vad_prob_continue(value),
    }
}

pub fn validate_target(value: i32) -> Result<()> {
    if (TARGET_MIN..=TARGET_MAX).contains(&value) {
        Ok(())
    } else {
        Err(AgcError::invalid("Invalid target (must be 1..32768)"))
    }
}

pub fn validate_max_gain(value: i32) -> Result<()> {
    if value >= 0 {
        Ok(())
    } else {
        Err(AgcError::invalid("Invalid max gain (must be >= 0)"))
    }
}

pub fn validate_increment(value: i32) -> Result<()> {
    if value >= 0 {
        Ok(())
    } else {
        Err(AgcError::invalid("Invalid increment (must be >= 0)"))
    }
}

pub fn validate_decrement(value: i32) -> Result<()> {
    if value <= 0 {
        Ok(())
    } else {
        Err(AgcError::invalid("Invalid decrement (must be <= 0)"))
    }
}

pub fn validate_vad_prob_start(value: i32) -> Result<()> {
    if (VAD_PROB_MIN..=VAD_PROB_MAX).contains(&value) {
        Ok(())
    } else {
        Err(AgcError::invalid("Invalid VAD start probability (must be 0..100)"))
    }
}

pub fn validate_vad_prob_continue(value: i32) -> Result<()> {
    if (VAD_PROB_MIN..=VAD_PROB_MAX).contains(&value) {
        Ok(())
    } else {
        Err(AgcError::invalid("Invalid VAD continue probability (must be 0..100)"))
    }
}
