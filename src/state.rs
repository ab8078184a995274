//! Shared state of the light.
//!
//! One [`SharedState`] value is built at startup and owned by the control
//! core. Every module reads and writes only its own subtree: one
//! [`ChannelGroupState`] per channel group, one [`SensorState`] for the light
//! sensor and one [`ButtonState`] for the button.

use embassy_time::Duration;
use heapless::LinearMap;

use crate::error::{ConfigurationFault, check_unit};

/// Maximum number of leds in one channel group.
pub const MAX_GROUP_LEDS: usize = 6;

const GROUP_NAME_TAIL: &str = "tail";
const GROUP_NAME_FRONT: &str = "front";
const GROUP_NAME_STATUS: &str = "status";

const ANIMATION_MODE_ONCE: &str = "once";
const ANIMATION_MODE_REPEAT: &str = "repeat";

/// Named set of leds controlled together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelGroup {
    Tail,
    Front,
    Status,
}

impl ChannelGroup {
    pub const ALL: [Self; 3] = [Self::Tail, Self::Front, Self::Status];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tail => GROUP_NAME_TAIL,
            Self::Front => GROUP_NAME_FRONT,
            Self::Status => GROUP_NAME_STATUS,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            GROUP_NAME_TAIL => Some(Self::Tail),
            GROUP_NAME_FRONT => Some(Self::Front),
            GROUP_NAME_STATUS => Some(Self::Status),
            _ => None,
        }
    }
}

/// How an animation behaves once its last keyframe has played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationMode {
    /// Stop on the last frame and report the animation as finished.
    Once,
    /// Start over from the first keyframe.
    #[default]
    Repeat,
}

impl AnimationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => ANIMATION_MODE_ONCE,
            Self::Repeat => ANIMATION_MODE_REPEAT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ANIMATION_MODE_ONCE => Some(Self::Once),
            ANIMATION_MODE_REPEAT => Some(Self::Repeat),
            _ => None,
        }
    }
}

/// Physical layout of one channel group.
#[derive(Debug, Clone, Copy)]
pub struct GroupLayout {
    /// Hardware led names, in animation order.
    pub leds: &'static [&'static str],
    /// Fixed scale compensating the efficiency of this group's leds.
    pub hardware_brightness_modifier: f32,
}

/// Layout and initial values of the whole shared state.
#[derive(Debug, Clone, Copy)]
pub struct StateLayout {
    pub tail: GroupLayout,
    pub front: GroupLayout,
    pub status: GroupLayout,
    /// Interval between two light sensor readings.
    pub light_update_interval: Duration,
    /// Initial brightness of every led.
    pub default_brightness: f32,
    /// Light level assumed until the first sensor reading.
    pub default_light_level: f32,
}

/// Board layout of the reference light.
pub const DEFAULT_LAYOUT: StateLayout = StateLayout {
    tail: GroupLayout {
        leds: &["tail_bars", "top_v", "mid_v", "low_x"],
        hardware_brightness_modifier: 1.0,
    },
    front: GroupLayout {
        leds: &["front_bars", "segment_edge", "segment_mid", "segment_center"],
        hardware_brightness_modifier: 0.85,
    },
    status: GroupLayout {
        leds: &["status"],
        hardware_brightness_modifier: 0.4,
    },
    light_update_interval: Duration::from_secs(1),
    default_brightness: 0.5,
    default_light_level: 0.5,
};

impl Default for StateLayout {
    fn default() -> Self {
        DEFAULT_LAYOUT
    }
}

/// State of one channel group.
#[derive(Debug, Clone)]
pub struct ChannelGroupState {
    leds: LinearMap<&'static str, f32, MAX_GROUP_LEDS>,
    /// Name of the animation assigned to the group, if any.
    pub animation_playing: Option<&'static str>,
    pub animation_mode: AnimationMode,
    /// Set once a `once` animation has played its last keyframe on every led.
    pub animation_finished: bool,
    hardware_brightness_modifier: f32,
}

impl ChannelGroupState {
    pub fn new(layout: &GroupLayout, default_brightness: f32) -> Result<Self, ConfigurationFault> {
        let hardware_brightness_modifier = check_unit(layout.hardware_brightness_modifier)
            .map_err(|_| ConfigurationFault::InvalidModifier)?;
        let default_brightness =
            check_unit(default_brightness).map_err(|_| ConfigurationFault::InvalidModifier)?;

        let mut leds = LinearMap::new();
        for name in layout.leds {
            leds.insert(*name, default_brightness)
                .map_err(|_| ConfigurationFault::TooManyLeds)?;
        }

        Ok(Self {
            leds,
            animation_playing: None,
            animation_mode: AnimationMode::default(),
            animation_finished: false,
            hardware_brightness_modifier,
        })
    }

    /// Last published brightness of a led
    pub fn brightness(&self, led: &str) -> Option<f32> {
        self.leds.get(led).copied()
    }

    /// Iterate over `(led name, brightness)` pairs in layout order
    pub fn leds(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.leds.iter().map(|(name, brightness)| (*name, *brightness))
    }

    pub fn led_count(&self) -> usize {
        self.leds.len()
    }

    pub const fn hardware_brightness_modifier(&self) -> f32 {
        self.hardware_brightness_modifier
    }

    /// Record a published brightness.
    ///
    /// Returns `false` if the led does not belong to this group.
    pub(crate) fn set_brightness(&mut self, led: &str, brightness: f32) -> bool {
        match self.leds.get_mut(led) {
            Some(value) => {
                *value = brightness;
                true
            }
            None => false,
        }
    }
}

/// State of the ambient light sensor.
#[derive(Debug, Clone, Copy)]
pub struct SensorState {
    /// Last sampled light level in `[0, 1]`.
    pub value: f32,
    pub update_interval: Duration,
}

/// Click kinds produced by the button classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickEvent {
    SingleClick,
    DoubleClick,
    LongClick,
}

impl ClickEvent {
    /// Dispatch order of pending events.
    pub const ALL: [Self; 3] = [Self::SingleClick, Self::DoubleClick, Self::LongClick];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleClick => "single_click",
            Self::DoubleClick => "double_click",
            Self::LongClick => "long_click",
        }
    }
}

/// Pending click events of one button.
///
/// Each kind is a sticky flag: the classifier raises it and the dispatch
/// phase consumes it exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    single_click: bool,
    double_click: bool,
    long_click: bool,
}

impl ButtonState {
    const fn flag(&mut self, event: ClickEvent) -> &mut bool {
        match event {
            ClickEvent::SingleClick => &mut self.single_click,
            ClickEvent::DoubleClick => &mut self.double_click,
            ClickEvent::LongClick => &mut self.long_click,
        }
    }

    /// Mark an event as pending.
    ///
    /// Returns `false` if the same event was still waiting for dispatch.
    pub fn raise(&mut self, event: ClickEvent) -> bool {
        let flag = self.flag(event);
        let was_pending = *flag;
        *flag = true;
        !was_pending
    }

    /// Consume a pending event
    pub fn take(&mut self, event: ClickEvent) -> bool {
        core::mem::take(self.flag(event))
    }

    pub const fn is_pending(&self, event: ClickEvent) -> bool {
        match event {
            ClickEvent::SingleClick => self.single_click,
            ClickEvent::DoubleClick => self.double_click,
            ClickEvent::LongClick => self.long_click,
        }
    }

    pub const fn has_events(&self) -> bool {
        self.single_click || self.double_click || self.long_click
    }
}

/// The single mutable record shared by all modules.
#[derive(Debug, Clone)]
pub struct SharedState {
    pub tail: ChannelGroupState,
    pub front: ChannelGroupState,
    pub status: ChannelGroupState,
    pub light: SensorState,
    pub button1: ButtonState,
}

impl SharedState {
    pub fn new(layout: &StateLayout) -> Result<Self, ConfigurationFault> {
        let default_light_level = check_unit(layout.default_light_level)
            .map_err(|_| ConfigurationFault::InvalidModifier)?;
        if layout.light_update_interval.as_ticks() == 0 {
            return Err(ConfigurationFault::InvalidTick);
        }

        Ok(Self {
            tail: ChannelGroupState::new(&layout.tail, layout.default_brightness)?,
            front: ChannelGroupState::new(&layout.front, layout.default_brightness)?,
            status: ChannelGroupState::new(&layout.status, layout.default_brightness)?,
            light: SensorState {
                value: default_light_level,
                update_interval: layout.light_update_interval,
            },
            button1: ButtonState::default(),
        })
    }

    pub const fn group(&self, group: ChannelGroup) -> &ChannelGroupState {
        match group {
            ChannelGroup::Tail => &self.tail,
            ChannelGroup::Front => &self.front,
            ChannelGroup::Status => &self.status,
        }
    }

    pub const fn group_mut(&mut self, group: ChannelGroup) -> &mut ChannelGroupState {
        match group {
            ChannelGroup::Tail => &mut self.tail,
            ChannelGroup::Front => &mut self.front,
            ChannelGroup::Status => &mut self.status,
        }
    }
}
