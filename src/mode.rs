//! Operating modes
//!
//! The set of modes is closed: every mode is a variant of [`Mode`] and
//! describes itself through a static [`ModeProfile`]. Switching modes
//! replaces the active variant; the control core then applies the new
//! profile's entry effects.

use crate::state::{AnimationMode, ChannelGroup, ClickEvent, SharedState};

const MODE_NAME_STARTUP: &str = "startup";
const MODE_NAME_NORMAL: &str = "normal";
const MODE_NAME_STATIC: &str = "static";
const MODE_NAME_POWEROFF: &str = "poweroff";

const ACTION_NAME_NOTHING: &str = "";
const ACTION_NAME_TOGGLE_BRIGHTNESS: &str = "toggle_brightness";

/// Operating mode of the light
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Power-on animation, then [`Mode::Normal`]
    Startup,
    /// Looping animations on every group
    Normal,
    /// Every group holds a fixed brightness
    Static,
    /// Leds and sensor off, only the button listens
    Poweroff,
}

/// What a channel group does in a mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelAssignment {
    /// Play a catalog animation
    Animation {
        name: &'static str,
        mode: AnimationMode,
    },
    /// Hold every led at a fixed brightness
    Brightness(f32),
    /// Neither animate nor change brightness
    Off,
}

/// Which modules run their periodic work
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleFlags {
    pub tail: bool,
    pub front: bool,
    pub status: bool,
    pub light_sensor: bool,
    pub button: bool,
}

impl ModuleFlags {
    pub const ALL: Self = Self {
        tail: true,
        front: true,
        status: true,
        light_sensor: true,
        button: true,
    };

    pub const fn channel(self, group: ChannelGroup) -> bool {
        match group {
            ChannelGroup::Tail => self.tail,
            ChannelGroup::Front => self.front,
            ChannelGroup::Status => self.status,
        }
    }
}

/// Reaction to a click event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// No action, the event is only logged
    Nothing,
    /// Cycle the brightness selector
    ToggleBrightness,
    /// Switch to another mode
    Enter(Mode),
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nothing => ACTION_NAME_NOTHING,
            Self::ToggleBrightness => ACTION_NAME_TOGGLE_BRIGHTNESS,
            Self::Enter(mode) => mode.as_str(),
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ACTION_NAME_NOTHING => Some(Self::Nothing),
            ACTION_NAME_TOGGLE_BRIGHTNESS => Some(Self::ToggleBrightness),
            _ => Mode::parse_from_str(s).map(Self::Enter),
        }
    }
}

/// Click event to action table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonActions {
    pub single_click: Action,
    pub double_click: Action,
    pub long_click: Action,
}

impl ButtonActions {
    pub const fn get(&self, event: ClickEvent) -> Action {
        match event {
            ClickEvent::SingleClick => self.single_click,
            ClickEvent::DoubleClick => self.double_click,
            ClickEvent::LongClick => self.long_click,
        }
    }
}

/// Static description of a mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeProfile {
    pub tail: ChannelAssignment,
    pub front: ChannelAssignment,
    pub status: ChannelAssignment,
    pub modules: ModuleFlags,
    /// Follow the light sensor when the automatic brightness level is selected
    pub auto_brightness: bool,
    pub button_actions: ButtonActions,
}

impl ModeProfile {
    pub const fn channel(&self, group: ChannelGroup) -> ChannelAssignment {
        match group {
            ChannelGroup::Tail => self.tail,
            ChannelGroup::Front => self.front,
            ChannelGroup::Status => self.status,
        }
    }
}

const STARTUP_PROFILE: ModeProfile = ModeProfile {
    tail: ChannelAssignment::Animation {
        name: "startup",
        mode: AnimationMode::Once,
    },
    front: ChannelAssignment::Animation {
        name: "startup",
        mode: AnimationMode::Once,
    },
    status: ChannelAssignment::Animation {
        name: "startup",
        mode: AnimationMode::Once,
    },
    modules: ModuleFlags::ALL,
    auto_brightness: true,
    button_actions: ButtonActions {
        single_click: Action::Nothing,
        double_click: Action::Nothing,
        long_click: Action::Enter(Mode::Poweroff),
    },
};

const NORMAL_PROFILE: ModeProfile = ModeProfile {
    tail: ChannelAssignment::Animation {
        name: "normal",
        mode: AnimationMode::Repeat,
    },
    front: ChannelAssignment::Animation {
        name: "steady",
        mode: AnimationMode::Repeat,
    },
    status: ChannelAssignment::Animation {
        name: "heartbeat",
        mode: AnimationMode::Repeat,
    },
    modules: ModuleFlags::ALL,
    auto_brightness: true,
    button_actions: ButtonActions {
        single_click: Action::Enter(Mode::Static),
        double_click: Action::ToggleBrightness,
        long_click: Action::Enter(Mode::Poweroff),
    },
};

const STATIC_PROFILE: ModeProfile = ModeProfile {
    tail: ChannelAssignment::Brightness(1.0),
    front: ChannelAssignment::Brightness(1.0),
    status: ChannelAssignment::Brightness(0.3),
    modules: ModuleFlags::ALL,
    auto_brightness: true,
    button_actions: ButtonActions {
        single_click: Action::Enter(Mode::Normal),
        double_click: Action::ToggleBrightness,
        long_click: Action::Enter(Mode::Poweroff),
    },
};

const POWEROFF_PROFILE: ModeProfile = ModeProfile {
    tail: ChannelAssignment::Off,
    front: ChannelAssignment::Off,
    status: ChannelAssignment::Off,
    modules: ModuleFlags {
        tail: false,
        front: false,
        status: false,
        light_sensor: false,
        button: true,
    },
    auto_brightness: false,
    button_actions: ButtonActions {
        single_click: Action::Nothing,
        double_click: Action::Nothing,
        long_click: Action::Enter(Mode::Startup),
    },
};

impl Mode {
    /// Mode entered on power-up
    pub const INITIAL: Self = Self::Startup;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => MODE_NAME_STARTUP,
            Self::Normal => MODE_NAME_NORMAL,
            Self::Static => MODE_NAME_STATIC,
            Self::Poweroff => MODE_NAME_POWEROFF,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_STARTUP => Some(Self::Startup),
            MODE_NAME_NORMAL => Some(Self::Normal),
            MODE_NAME_STATIC => Some(Self::Static),
            MODE_NAME_POWEROFF => Some(Self::Poweroff),
            _ => None,
        }
    }

    pub const fn profile(self) -> &'static ModeProfile {
        match self {
            Self::Startup => &STARTUP_PROFILE,
            Self::Normal => &NORMAL_PROFILE,
            Self::Static => &STATIC_PROFILE,
            Self::Poweroff => &POWEROFF_PROFILE,
        }
    }

    /// Transition predicate, evaluated once per tick while the mode is active
    pub fn check_events(self, state: &SharedState) -> Option<Self> {
        match self {
            Self::Startup if state.tail.animation_finished && state.front.animation_finished => {
                Some(Self::Normal)
            }
            Self::Startup | Self::Normal | Self::Static | Self::Poweroff => None,
        }
    }
}
