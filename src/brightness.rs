//! Auto brightness modifier
//!
//! Each tick the control core derives one modifier for all channel groups:
//! either from the ambient light level or from a fixed level the user picked
//! with the `toggle_brightness` action.

use heapless::Vec;

use crate::error::{ConfigurationFault, check_unit};

/// Maximum number of fixed brightness levels.
pub const MAX_BRIGHTNESS_LEVELS: usize = 4;

/// Configuration of the brightness selector
#[derive(Debug, Clone, Copy)]
pub struct AutoBrightnessConfig {
    /// Fixed levels cycled after the automatic one
    pub levels: &'static [f32],
    /// Modifier used in complete darkness; full light maps to 1.0
    pub min_auto: f32,
}

pub const DEFAULT_AUTO_BRIGHTNESS: AutoBrightnessConfig = AutoBrightnessConfig {
    levels: &[0.25, 0.6, 1.0],
    min_auto: 0.2,
};

impl Default for AutoBrightnessConfig {
    fn default() -> Self {
        DEFAULT_AUTO_BRIGHTNESS
    }
}

/// Currently selected brightness source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BrightnessLevel {
    /// Follow the light sensor
    #[default]
    Auto,
    /// Fixed level by index
    Fixed(usize),
}

/// Discrete brightness selector
#[derive(Debug, Clone)]
pub struct BrightnessSelector {
    levels: Vec<f32, MAX_BRIGHTNESS_LEVELS>,
    min_auto: f32,
    selected: BrightnessLevel,
}

impl BrightnessSelector {
    pub fn new(config: &AutoBrightnessConfig) -> Result<Self, ConfigurationFault> {
        let min_auto = check_unit(config.min_auto).map_err(|_| ConfigurationFault::InvalidModifier)?;
        let mut levels = Vec::new();
        for level in config.levels {
            let level = check_unit(*level).map_err(|_| ConfigurationFault::InvalidModifier)?;
            levels
                .push(level)
                .map_err(|_| ConfigurationFault::InvalidModifier)?;
        }

        Ok(Self {
            levels,
            min_auto,
            selected: BrightnessLevel::Auto,
        })
    }

    pub const fn selected(&self) -> BrightnessLevel {
        self.selected
    }

    /// Select a level directly
    pub fn select(&mut self, level: BrightnessLevel) -> Result<(), ConfigurationFault> {
        if let BrightnessLevel::Fixed(index) = level {
            if index >= self.levels.len() {
                return Err(ConfigurationFault::InvalidModifier);
            }
        }
        self.selected = level;
        Ok(())
    }

    /// Move to the next level: automatic, then each fixed level, then back
    pub fn cycle(&mut self) -> BrightnessLevel {
        self.selected = match self.selected {
            BrightnessLevel::Auto if !self.levels.is_empty() => BrightnessLevel::Fixed(0),
            BrightnessLevel::Fixed(index) if index + 1 < self.levels.len() => {
                BrightnessLevel::Fixed(index + 1)
            }
            _ => BrightnessLevel::Auto,
        };
        self.selected
    }

    /// Modifier for the current tick.
    ///
    /// Without automatic brightness in the active mode the automatic level
    /// means full scale.
    pub fn modifier(&self, auto_enabled: bool, light_level: f32) -> f32 {
        match self.selected {
            BrightnessLevel::Fixed(index) => self.levels.get(index).copied().unwrap_or(1.0),
            BrightnessLevel::Auto if auto_enabled => {
                let light = libm::fminf(libm::fmaxf(light_level, 0.0), 1.0);
                libm::fminf(self.min_auto + (1.0 - self.min_auto) * light, 1.0)
            }
            BrightnessLevel::Auto => 1.0,
        }
    }
}
