//! Declarative keyframe animations
//!
//! An animation is a list of keyframe sequences, one per led. A keyframe
//! holds its brightness for its duration. Sequences of the same animation
//! may have different lengths.

mod catalog;
mod engine;

use embassy_time::Duration;
use heapless::Vec;

pub use catalog::{AnimationCatalog, AnimationSource, DEFAULT_ANIMATIONS, MAX_ANIMATIONS};
pub use engine::AnimationEngine;

use crate::error::ConfigurationFault;
use crate::state::MAX_GROUP_LEDS;

/// Maximum number of led sequences in one animation.
pub const MAX_ANIMATION_LEDS: usize = MAX_GROUP_LEDS;

/// Maximum number of keyframes per led, after extension.
pub const MAX_KEYFRAMES: usize = 48;

/// One segment of a led animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// How long the brightness is held
    pub duration: Duration,
    /// Target brightness in `[0, 1]`
    pub brightness: f32,
}

impl Keyframe {
    pub const fn new(duration: Duration, brightness: f32) -> Self {
        Self {
            duration,
            brightness,
        }
    }

    pub const fn from_millis(millis: u64, brightness: f32) -> Self {
        Self::new(Duration::from_millis(millis), brightness)
    }
}

/// Keyframes of a single led
pub type KeyframeSequence = Vec<Keyframe, MAX_KEYFRAMES>;

/// Immutable animation template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationDefinition {
    leds: Vec<KeyframeSequence, MAX_ANIMATION_LEDS>,
}

impl AnimationDefinition {
    /// Build a definition from per-led keyframe slices.
    ///
    /// Every keyframe must have a positive duration and a brightness in
    /// `[0, 1]`.
    pub fn new(leds: &[&[Keyframe]]) -> Result<Self, ConfigurationFault> {
        let mut definition = Self::default();
        for (led, keyframes) in leds.iter().enumerate() {
            for (index, keyframe) in keyframes.iter().enumerate() {
                let valid = keyframe.duration.as_ticks() > 0
                    && (0.0..=1.0).contains(&keyframe.brightness);
                if !valid {
                    return Err(ConfigurationFault::InvalidKeyframe { led, index });
                }
            }
            let sequence = KeyframeSequence::from_slice(keyframes)
                .map_err(|()| ConfigurationFault::TooManyKeyframes { led })?;
            definition
                .leds
                .push(sequence)
                .map_err(|_| ConfigurationFault::TooManyLeds)?;
        }
        Ok(definition)
    }

    pub fn led_count(&self) -> usize {
        self.leds.len()
    }

    /// Keyframes of one led, empty if the led is not animated
    pub fn sequence(&self, led: usize) -> &[Keyframe] {
        self.leds.get(led).map_or(&[], |sequence| sequence.as_slice())
    }

    /// Total playback time: the longest per-led sum of durations
    pub fn duration(&self) -> Duration {
        self.leds
            .iter()
            .map(|sequence| {
                sequence
                    .iter()
                    .fold(Duration::from_ticks(0), |total, keyframe| {
                        total + keyframe.duration
                    })
            })
            .max()
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Replace every transition between two keyframes with a linear ramp.
    ///
    /// A transition into a keyframe of duration `T` becomes `floor(T / step)`
    /// keyframes of length `step`, stepping in equal increments from the
    /// previous brightness up to the target, followed by one keyframe holding
    /// the target for the remainder `T mod step` when it is not zero. The
    /// first keyframe of each led is kept as is, so total duration does not
    /// change.
    pub fn extended(&self, step: Duration) -> Result<Self, ConfigurationFault> {
        if step.as_ticks() == 0 {
            return Err(ConfigurationFault::InvalidTick);
        }

        let mut definition = Self::default();
        for (led, sequence) in self.leds.iter().enumerate() {
            let mut extended = KeyframeSequence::new();
            if let Some(first) = sequence.first() {
                extended
                    .push(*first)
                    .map_err(|_| ConfigurationFault::TooManyKeyframes { led })?;
            }
            for pair in sequence.windows(2) {
                push_ramp(&mut extended, pair[0].brightness, pair[1], step)
                    .map_err(|_| ConfigurationFault::TooManyKeyframes { led })?;
            }
            definition
                .leds
                .push(extended)
                .map_err(|_| ConfigurationFault::TooManyLeds)?;
        }
        Ok(definition)
    }
}

#[allow(clippy::cast_precision_loss)]
fn push_ramp(
    sequence: &mut KeyframeSequence,
    start: f32,
    target: Keyframe,
    step: Duration,
) -> Result<(), Keyframe> {
    let total = target.duration.as_ticks();
    let steps = total / step.as_ticks();
    let remainder = total % step.as_ticks();

    if steps > 0 {
        let increment = (target.brightness - start) / steps as f32;
        let low = libm::fminf(start, target.brightness);
        let high = libm::fmaxf(start, target.brightness);
        for i in 1..=steps {
            let brightness = if i == steps {
                target.brightness
            } else {
                // Keep float error from leaving the segment
                libm::fminf(libm::fmaxf(start + increment * i as f32, low), high)
            };
            sequence.push(Keyframe::new(step, brightness))?;
        }
    }

    if remainder > 0 {
        sequence.push(Keyframe::new(
            Duration::from_ticks(remainder),
            target.brightness,
        ))?;
    }
    Ok(())
}
