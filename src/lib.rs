#![no_std]

pub mod animation;
pub mod brightness;
pub mod button;
pub mod control;
pub mod controller;
pub mod error;
pub(crate) mod logging;
pub mod mode;
pub mod pacer;
pub mod request;
pub mod sensor;
pub mod state;

pub use animation::{
    AnimationCatalog, AnimationDefinition, AnimationEngine, AnimationSource, DEFAULT_ANIMATIONS,
    Keyframe,
};
pub use brightness::{AutoBrightnessConfig, BrightnessLevel, BrightnessSelector};
pub use button::{ButtonClassifier, ButtonTimings};
pub use control::{ControlConfig, ControlCore};
pub use controller::ChannelController;
pub use error::{ConfigurationFault, FatalFault, Fault, HardwareFault, RangeFault};
pub use mode::{Action, Mode};
pub use pacer::TickPacer;
pub use request::{ControlRequest, QueueFull, RequestQueue};
pub use sensor::SensorSampler;
pub use state::{AnimationMode, ChannelGroup, ClickEvent, SharedState, StateLayout};

pub use embassy_time::{Duration, Instant};

/// Board access used by the control core
///
/// Implement this trait to run the core on real hardware or against a test
/// double. Methods take `&self` because the module units of one tick share
/// the adapter; implementations use interior mutability where they need it.
pub trait HardwareAdapter {
    /// Write the brightness of one led, already scaled to `[0, 1]`.
    ///
    /// An unknown led name should be ignored with a warning.
    fn set_channel_brightness(&self, led: &str, brightness: f32) -> Result<(), HardwareFault>;

    /// Read the ambient light level in `[0, 1]`
    fn read_light_level(&self) -> Result<f32, HardwareFault>;

    /// Read the raw, undebounced button input
    fn read_button_pressed(&self) -> Result<bool, HardwareFault>;
}

impl<T: HardwareAdapter + ?Sized> HardwareAdapter for &T {
    fn set_channel_brightness(&self, led: &str, brightness: f32) -> Result<(), HardwareFault> {
        (**self).set_channel_brightness(led, brightness)
    }

    fn read_light_level(&self) -> Result<f32, HardwareFault> {
        (**self).read_light_level()
    }

    fn read_button_pressed(&self) -> Result<bool, HardwareFault> {
        (**self).read_button_pressed()
    }
}
