//! Fault taxonomy of the control core.
//!
//! Configuration, range and hardware faults are recoverable: the module that
//! hits one logs it and carries on with its previous values. A [`FatalFault`]
//! is never handled inside the core and ends the control loop.

use core::fmt;

use crate::state::ChannelGroup;

/// Invalid configuration: unknown names, malformed animations or settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationFault {
    /// Led name is not owned by the channel group.
    UnknownLed(ChannelGroup),
    /// Animation name is not present in the catalog.
    UnknownAnimation,
    /// Keyframe has a zero duration or a brightness outside `[0, 1]`.
    InvalidKeyframe { led: usize, index: usize },
    /// Keyframe sequence does not fit into the fixed storage.
    TooManyKeyframes { led: usize },
    /// Animation or channel group has more leds than supported.
    TooManyLeds,
    /// Catalog has more animations than supported.
    TooManyAnimations,
    /// Brightness modifier or level outside `[0, 1]`.
    InvalidModifier,
    /// Tick length or transition step is zero.
    InvalidTick,
}

/// Brightness value outside `[0, 1]` presented for output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFault {
    pub value: f32,
}

/// I/O failure of the hardware adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareFault {
    /// The bus or pin access failed.
    Io,
    /// The device did not answer in time.
    Timeout,
    /// The device is not present or not initialised.
    Unavailable,
}

/// Internal invariant violation. Terminates the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalFault {
    /// A controller and its shared state disagree on the set of leds.
    StateMismatch(ChannelGroup),
}

/// Any fault a single operation can report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    Configuration(ConfigurationFault),
    Range(RangeFault),
    Hardware(HardwareFault),
    Fatal(FatalFault),
}

impl From<ConfigurationFault> for Fault {
    fn from(fault: ConfigurationFault) -> Self {
        Self::Configuration(fault)
    }
}

impl From<RangeFault> for Fault {
    fn from(fault: RangeFault) -> Self {
        Self::Range(fault)
    }
}

impl From<HardwareFault> for Fault {
    fn from(fault: HardwareFault) -> Self {
        Self::Hardware(fault)
    }
}

impl From<FatalFault> for Fault {
    fn from(fault: FatalFault) -> Self {
        Self::Fatal(fault)
    }
}

impl fmt::Display for ConfigurationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLed(group) => write!(f, "unknown led in {} group", group.as_str()),
            Self::UnknownAnimation => f.write_str("unknown animation"),
            Self::InvalidKeyframe { led, index } => {
                write!(f, "invalid keyframe {} of led {}", index, led)
            }
            Self::TooManyKeyframes { led } => write!(f, "too many keyframes for led {}", led),
            Self::TooManyLeds => f.write_str("too many leds"),
            Self::TooManyAnimations => f.write_str("too many animations"),
            Self::InvalidModifier => f.write_str("brightness modifier outside [0, 1]"),
            Self::InvalidTick => f.write_str("tick length must be positive"),
        }
    }
}

impl fmt::Display for RangeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brightness {} outside [0, 1]", self.value)
    }
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => f.write_str("hardware i/o error"),
            Self::Timeout => f.write_str("hardware timeout"),
            Self::Unavailable => f.write_str("hardware unavailable"),
        }
    }
}

impl fmt::Display for FatalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateMismatch(group) => {
                write!(f, "{} controller and state disagree on leds", group.as_str())
            }
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(fault) => write!(f, "configuration fault: {}", fault),
            Self::Range(fault) => write!(f, "range fault: {}", fault),
            Self::Hardware(fault) => write!(f, "hardware fault: {}", fault),
            Self::Fatal(fault) => write!(f, "fatal fault: {}", fault),
        }
    }
}

/// Check that a brightness value lies in `[0, 1]`.
pub(crate) fn check_unit(value: f32) -> Result<f32, RangeFault> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(RangeFault { value })
    }
}
