//! Ambient light sampling
//!
//! The light sensor is read at its own interval, independent of the tick
//! length, so slow or noisy sensor I/O stays out of most ticks.

use embassy_time::Duration;

use crate::HardwareAdapter;
use crate::error::{FatalFault, check_unit};
use crate::logging::{log_debug, log_warn};
use crate::state::SensorState;

/// Periodic reader of the ambient light level
#[derive(Debug, Clone)]
pub struct SensorSampler {
    tick: Duration,
    accumulated: Duration,
    enabled: bool,
}

impl SensorSampler {
    pub const fn new(tick: Duration) -> Self {
        Self {
            tick,
            accumulated: Duration::from_ticks(0),
            enabled: true,
        }
    }

    /// Suspend or resume sampling. Accumulated time is kept.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Time accumulated since the last reading
    pub const fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Count one tick and read the sensor once the update interval is reached.
    ///
    /// A failed or out of range reading keeps the previous value.
    pub fn update<H: HardwareAdapter>(
        &mut self,
        state: &mut SensorState,
        hardware: &H,
    ) -> Result<(), FatalFault> {
        if !self.enabled {
            return Ok(());
        }

        self.accumulated += self.tick;
        if self.accumulated < state.update_interval {
            return Ok(());
        }
        self.accumulated = Duration::from_ticks(0);

        match hardware.read_light_level().map(check_unit) {
            Ok(Ok(value)) => {
                log_debug!("light level: {}", value);
                state.value = value;
            }
            Ok(Err(fault)) => log_warn!("light sensor: {}", fault),
            Err(fault) => log_warn!("light sensor read failed: {}", fault),
        }
        Ok(())
    }
}
