//! Named animation table
//!
//! Animations are declared as static keyframe tables and loaded once, at
//! which point the ones flagged for extension are smoothed into small ramps.

use embassy_time::Duration;
use heapless::Vec;

use super::{AnimationDefinition, Keyframe};
use crate::error::ConfigurationFault;

/// Maximum number of animations in a catalog.
pub const MAX_ANIMATIONS: usize = 6;

/// Static declaration of an animation
#[derive(Debug, Clone, Copy)]
pub struct AnimationSource {
    pub name: &'static str,
    /// Smooth transitions between keyframes into linear ramps on load
    pub extend: bool,
    /// One keyframe sequence per led
    pub leds: &'static [&'static [Keyframe]],
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    name: &'static str,
    definition: AnimationDefinition,
}

/// Loaded animations, looked up by name
#[derive(Debug, Clone, Default)]
pub struct AnimationCatalog {
    entries: Vec<CatalogEntry, MAX_ANIMATIONS>,
}

impl AnimationCatalog {
    /// Validate and load every source.
    ///
    /// `transition_step` is the ramp step used for extended animations.
    pub fn load(
        sources: &[AnimationSource],
        transition_step: Duration,
    ) -> Result<Self, ConfigurationFault> {
        let mut catalog = Self::default();
        for source in sources {
            let mut definition = AnimationDefinition::new(source.leds)?;
            if source.extend {
                definition = definition.extended(transition_step)?;
            }
            catalog
                .entries
                .push(CatalogEntry {
                    name: source.name,
                    definition,
                })
                .map_err(|_| ConfigurationFault::TooManyAnimations)?;
        }
        Ok(catalog)
    }

    /// Find an animation, returning its catalog name and definition
    pub fn get(
        &self,
        name: &str,
    ) -> Result<(&'static str, &AnimationDefinition), ConfigurationFault> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| (entry.name, &entry.definition))
            .ok_or(ConfigurationFault::UnknownAnimation)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
}

const STARTUP_1: &[Keyframe] = &[
    Keyframe::from_millis(100, 0.0),
    Keyframe::from_millis(400, 1.0),
    Keyframe::from_millis(1100, 1.0),
];
const STARTUP_2: &[Keyframe] = &[
    Keyframe::from_millis(300, 0.0),
    Keyframe::from_millis(400, 1.0),
    Keyframe::from_millis(900, 1.0),
];
const STARTUP_3: &[Keyframe] = &[
    Keyframe::from_millis(500, 0.0),
    Keyframe::from_millis(400, 1.0),
    Keyframe::from_millis(700, 1.0),
];
const STARTUP_4: &[Keyframe] = &[
    Keyframe::from_millis(700, 0.0),
    Keyframe::from_millis(400, 1.0),
    Keyframe::from_millis(500, 1.0),
];

const BREATHE: &[Keyframe] = &[
    Keyframe::from_millis(100, 0.6),
    Keyframe::from_millis(1400, 1.0),
    Keyframe::from_millis(1400, 0.6),
];

const STEADY: &[Keyframe] = &[Keyframe::from_millis(1000, 1.0)];

const HEARTBEAT: &[Keyframe] = &[
    Keyframe::from_millis(100, 1.0),
    Keyframe::from_millis(900, 0.0),
];

const SLOW_HEARTBEAT: &[Keyframe] = &[
    Keyframe::from_millis(100, 1.0),
    Keyframe::from_millis(2900, 0.0),
];

/// Animations of the reference light
pub const DEFAULT_ANIMATIONS: &[AnimationSource] = &[
    AnimationSource {
        name: "startup",
        extend: true,
        leds: &[STARTUP_1, STARTUP_2, STARTUP_3, STARTUP_4],
    },
    AnimationSource {
        name: "normal",
        extend: true,
        leds: &[BREATHE, BREATHE, BREATHE, BREATHE],
    },
    AnimationSource {
        name: "steady",
        extend: false,
        leds: &[STEADY, STEADY, STEADY, STEADY],
    },
    AnimationSource {
        name: "heartbeat",
        extend: false,
        leds: &[HEARTBEAT],
    },
    AnimationSource {
        name: "slow_heartbeat",
        extend: false,
        leds: &[SLOW_HEARTBEAT],
    },
];
