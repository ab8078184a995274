//! Keyframe playback
//!
//! Turns an [`AnimationDefinition`] into one brightness frame per tick.

use embassy_time::Duration;
use heapless::Vec;

use super::{AnimationDefinition, MAX_ANIMATION_LEDS};

/// Playback cursor of one led
#[derive(Debug, Clone, Copy, Default)]
struct LedPlayback {
    /// Index of the keyframe being played
    cursor: usize,
    /// Elapsed time at which the current keyframe ends
    target_time: Duration,
    finished: bool,
}

/// Plays one animation, frame by frame.
///
/// Keyframe durations of the working copy are zeroed once they have been
/// added to a led's target time, so reading the same keyframe on later ticks
/// does not extend it. [`AnimationEngine::reset`] restores the template.
#[derive(Debug, Clone)]
pub struct AnimationEngine {
    tick: Duration,
    template: AnimationDefinition,
    keyframes: AnimationDefinition,
    playback: Vec<LedPlayback, MAX_ANIMATION_LEDS>,
    frame: Vec<f32, MAX_ANIMATION_LEDS>,
    elapsed: Duration,
}

impl AnimationEngine {
    /// Create an idle engine advancing by `tick` per frame
    pub fn new(tick: Duration) -> Self {
        Self {
            tick,
            template: AnimationDefinition::default(),
            keyframes: AnimationDefinition::default(),
            playback: Vec::new(),
            frame: Vec::new(),
            elapsed: Duration::from_ticks(0),
        }
    }

    /// Replace the current playback with a fresh copy of `definition`
    pub fn set_animation(&mut self, definition: &AnimationDefinition) {
        self.template.clone_from(definition);
        self.reset();
    }

    /// Restart playback from the first keyframe of the template
    pub fn reset(&mut self) {
        self.keyframes.clone_from(&self.template);
        self.playback.clear();
        self.frame.clear();
        for sequence in &self.template.leds {
            // Both vectors share the template's led capacity
            let _ = self.playback.push(LedPlayback::default());
            let _ = self
                .frame
                .push(sequence.first().map_or(0.0, |keyframe| keyframe.brightness));
        }
        self.elapsed = Duration::from_ticks(0);
    }

    /// Produce the next frame, one brightness per animated led.
    ///
    /// Must be called exactly once per tick while the animation plays.
    pub fn generate_frame(&mut self) -> &[f32] {
        let elapsed = self.elapsed;
        let leds = self
            .keyframes
            .leds
            .iter_mut()
            .zip(self.playback.iter_mut())
            .zip(self.frame.iter_mut());

        for ((sequence, led), output) in leds {
            let len = sequence.len();
            let Some(keyframe) = sequence.get_mut(led.cursor) else {
                led.finished = true;
                continue;
            };

            *output = keyframe.brightness;
            led.target_time += keyframe.duration;
            keyframe.duration = Duration::from_ticks(0);

            if elapsed >= led.target_time {
                if led.cursor + 1 < len {
                    led.cursor += 1;
                } else {
                    led.finished = true;
                }
            }
        }

        self.elapsed += self.tick;
        &self.frame
    }

    /// The last generated frame
    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    /// `true` once every led has played its last keyframe
    pub fn is_finished(&self) -> bool {
        self.playback.iter().all(|led| led.finished)
    }

    /// Playback time accumulated so far
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn led_count(&self) -> usize {
        self.playback.len()
    }

    pub const fn tick(&self) -> Duration {
        self.tick
    }
}
