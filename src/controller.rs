//! Channel group output
//!
//! A [`ChannelController`] owns the leds of one channel group. It takes
//! requested brightness either from its animation engine or from a static
//! value, scales it by the auto and hardware brightness modifiers and writes
//! the result to the hardware, skipping writes that would not change anything.

use embassy_time::Duration;
use heapless::Vec;

use crate::HardwareAdapter;
use crate::animation::{AnimationDefinition, AnimationEngine};
use crate::error::{ConfigurationFault, FatalFault, Fault, RangeFault, check_unit};
use crate::logging::{log_debug, log_error, log_warn};
use crate::state::{AnimationMode, ChannelGroup, ChannelGroupState, MAX_GROUP_LEDS};

/// Output stage of one channel group
#[derive(Debug, Clone)]
pub struct ChannelController {
    group: ChannelGroup,
    leds: Vec<&'static str, MAX_GROUP_LEDS>,
    requested: Vec<f32, MAX_GROUP_LEDS>,
    published: Vec<Option<f32>, MAX_GROUP_LEDS>,
    auto_brightness_modifier: f32,
    hardware_brightness_modifier: f32,
    enabled: bool,
    engine: AnimationEngine,
    /// Loop mode of the animation driving the group, if any
    animation: Option<AnimationMode>,
}

impl ChannelController {
    /// Create a controller for the leds of `state`.
    ///
    /// The hardware brightness modifier is taken from the state and never
    /// changes afterwards.
    pub fn new(group: ChannelGroup, state: &ChannelGroupState, tick: Duration) -> Self {
        let mut leds = Vec::new();
        let mut requested = Vec::new();
        let mut published = Vec::new();
        // The state holds at most MAX_GROUP_LEDS leds
        for (name, brightness) in state.leds() {
            let _ = leds.push(name);
            let _ = requested.push(brightness);
            let _ = published.push(None);
        }

        Self {
            group,
            leds,
            requested,
            published,
            auto_brightness_modifier: 1.0,
            hardware_brightness_modifier: state.hardware_brightness_modifier(),
            enabled: true,
            engine: AnimationEngine::new(tick),
            animation: None,
        }
    }

    pub const fn group(&self) -> ChannelGroup {
        self.group
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub const fn auto_brightness_modifier(&self) -> f32 {
        self.auto_brightness_modifier
    }

    pub const fn hardware_brightness_modifier(&self) -> f32 {
        self.hardware_brightness_modifier
    }

    /// Requested (unscaled) brightness of every led
    pub fn requested(&self) -> &[f32] {
        &self.requested
    }

    /// Set the per-tick auto brightness modifier.
    ///
    /// Takes effect on the next publish.
    pub fn set_auto_brightness_modifier(&mut self, modifier: f32) -> Result<(), RangeFault> {
        self.auto_brightness_modifier = check_unit(modifier)?;
        Ok(())
    }

    /// Start `definition` from its first keyframe, replacing any playback
    pub fn play(
        &mut self,
        name: &'static str,
        definition: &AnimationDefinition,
        mode: AnimationMode,
        state: &mut ChannelGroupState,
    ) {
        log_debug!("{}: playing {} ({})", self.group.as_str(), name, mode.as_str());
        self.engine.set_animation(definition);
        self.animation = Some(mode);
        state.animation_playing = Some(name);
        state.animation_mode = mode;
        state.animation_finished = false;
    }

    /// Stop producing animation frames. Leds keep their last brightness.
    pub fn stop_animation(&mut self, state: &mut ChannelGroupState) {
        self.animation = None;
        state.animation_playing = None;
        state.animation_finished = false;
    }

    /// Hold every led at a static brightness, bypassing the animation engine
    pub fn hold_brightness<H: HardwareAdapter>(
        &mut self,
        brightness: f32,
        state: &mut ChannelGroupState,
        hardware: &H,
    ) -> Result<(), Fault> {
        let brightness = check_unit(brightness)?;
        self.stop_animation(state);
        self.requested.iter_mut().for_each(|value| *value = brightness);
        if self.enabled {
            self.publish_all(state, hardware)?;
        }
        Ok(())
    }

    /// Request a brightness for a single led
    pub fn set_led_brightness<H: HardwareAdapter>(
        &mut self,
        led: &str,
        brightness: f32,
        state: &mut ChannelGroupState,
        hardware: &H,
    ) -> Result<(), Fault> {
        let brightness = check_unit(brightness)?;
        let index = self
            .leds
            .iter()
            .position(|name| *name == led)
            .ok_or(ConfigurationFault::UnknownLed(self.group))?;

        if let Some(value) = self.requested.get_mut(index) {
            *value = brightness;
        }
        if self.enabled {
            self.publish_all(state, hardware)?;
        }
        Ok(())
    }

    /// Enable or disable the group.
    ///
    /// Disabling publishes zero to every led right away and ignores frames
    /// until the group is enabled again.
    pub fn set_enabled<H: HardwareAdapter>(
        &mut self,
        enabled: bool,
        state: &mut ChannelGroupState,
        hardware: &H,
    ) -> Result<(), FatalFault> {
        self.enabled = enabled;
        if enabled {
            self.publish_all(state, hardware)
        } else {
            self.publish_dark(state, hardware)
        }
    }

    /// Advance the animation by one frame and publish the result
    pub fn update<H: HardwareAdapter>(
        &mut self,
        state: &mut ChannelGroupState,
        hardware: &H,
    ) -> Result<(), FatalFault> {
        if !self.enabled {
            // Retries zero writes that failed on disable
            return self.publish_dark(state, hardware);
        }

        if let Some(mode) = self.animation {
            if !self.engine.is_finished() {
                self.apply_frame();
            }
            if self.engine.is_finished() {
                match mode {
                    AnimationMode::Repeat => self.engine.reset(),
                    AnimationMode::Once => state.animation_finished = true,
                }
            }
        }

        self.publish_all(state, hardware)
    }

    fn apply_frame(&mut self) {
        let frame = self.engine.generate_frame();
        // Animations may drive fewer or more leds than the group owns
        for (requested, value) in self.requested.iter_mut().zip(frame) {
            match check_unit(*value) {
                Ok(value) => *requested = value,
                Err(fault) => log_error!("{}: {}", self.group.as_str(), fault),
            }
        }
    }

    fn publish_all<H: HardwareAdapter>(
        &mut self,
        state: &mut ChannelGroupState,
        hardware: &H,
    ) -> Result<(), FatalFault> {
        let scale = self.auto_brightness_modifier * self.hardware_brightness_modifier;
        let leds = self
            .leds
            .iter()
            .zip(&self.requested)
            .zip(self.published.iter_mut());
        for ((led, requested), published) in leds {
            publish(self.group, *led, requested * scale, published, state, hardware)?;
        }
        Ok(())
    }

    fn publish_dark<H: HardwareAdapter>(
        &mut self,
        state: &mut ChannelGroupState,
        hardware: &H,
    ) -> Result<(), FatalFault> {
        let leds = self.leds.iter().zip(self.published.iter_mut());
        for (led, published) in leds {
            publish(self.group, *led, 0.0, published, state, hardware)?;
        }
        Ok(())
    }
}

/// Write one led unless it already shows `value`.
///
/// A hardware failure keeps the last published value so the write is
/// retried on the next publish.
fn publish<H: HardwareAdapter>(
    group: ChannelGroup,
    led: &'static str,
    value: f32,
    published: &mut Option<f32>,
    state: &mut ChannelGroupState,
    hardware: &H,
) -> Result<(), FatalFault> {
    if *published == Some(value) {
        return Ok(());
    }

    match hardware.set_channel_brightness(led, value) {
        Ok(()) => {
            *published = Some(value);
            if !state.set_brightness(led, value) {
                return Err(FatalFault::StateMismatch(group));
            }
        }
        Err(fault) => log_warn!("{}: writing {} failed: {}", group.as_str(), led, fault),
    }
    Ok(())
}
