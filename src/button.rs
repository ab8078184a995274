//! Click classification
//!
//! Turns one raw pressed/released sample per tick into single, double and
//! long clicks. Long clicks fire while the button is still held; single and
//! double clicks resolve on or after release.

use embassy_time::Duration;

use crate::HardwareAdapter;
use crate::error::FatalFault;
use crate::logging::{log_info, log_warn};
use crate::state::{ButtonState, ClickEvent};

/// Timing thresholds of the classifier
#[derive(Debug, Clone, Copy)]
pub struct ButtonTimings {
    /// Presses shorter than this are treated as bounce
    pub min_click: Duration,
    /// Longest release gap that still turns two clicks into a double click
    pub double_click_max_gap: Duration,
    /// Continuous press that produces a long click
    pub long_click: Duration,
}

pub const DEFAULT_BUTTON_TIMINGS: ButtonTimings = ButtonTimings {
    min_click: Duration::from_millis(30),
    double_click_max_gap: Duration::from_millis(200),
    long_click: Duration::from_secs(2),
};

impl Default for ButtonTimings {
    fn default() -> Self {
        DEFAULT_BUTTON_TIMINGS
    }
}

/// Debounce and click state machine for one button
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    tick: Duration,
    timings: ButtonTimings,
    enabled: bool,

    pressed: bool,
    pressed_ticks: u32,
    /// Idle ticks since the last valid release, while waiting for a second press
    release_ticks: u32,
    awaiting_second_press: bool,
    double_click_possible: bool,
    long_click_possible: bool,
    click_handled: bool,
}

impl ButtonClassifier {
    pub const fn new(tick: Duration, timings: ButtonTimings) -> Self {
        Self {
            tick,
            timings,
            enabled: true,
            pressed: false,
            pressed_ticks: 0,
            release_ticks: 0,
            awaiting_second_press: false,
            double_click_possible: false,
            long_click_possible: false,
            click_handled: false,
        }
    }

    /// Suspend or resume sampling. The classification state is kept.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Read the button once and raise any classified click in `state`.
    ///
    /// A failed read skips this tick without touching the classifier.
    pub fn update<H: HardwareAdapter>(
        &mut self,
        state: &mut ButtonState,
        hardware: &H,
    ) -> Result<(), FatalFault> {
        if !self.enabled {
            return Ok(());
        }

        let pressed = match hardware.read_button_pressed() {
            Ok(pressed) => pressed,
            Err(fault) => {
                log_warn!("button read failed: {}", fault);
                return Ok(());
            }
        };

        if let Some(event) = self.sample(pressed) {
            log_info!("button event: {}", event.as_str());
            if !state.raise(event) {
                log_warn!("{} raised again before dispatch", event.as_str());
            }
        }
        Ok(())
    }

    /// Feed one raw sample, returning the click it completes, if any
    pub fn sample(&mut self, pressed: bool) -> Option<ClickEvent> {
        match (pressed, self.pressed) {
            (true, true) => self.on_held(),
            (true, false) => {
                self.on_press();
                None
            }
            (false, true) => self.on_release(),
            (false, false) => self.on_idle(),
        }
    }

    fn on_held(&mut self) -> Option<ClickEvent> {
        self.pressed_ticks = self.pressed_ticks.saturating_add(1);

        if self.long_click_possible && self.ticks_reach(self.pressed_ticks, self.timings.long_click)
        {
            self.long_click_possible = false;
            self.click_handled = true;
            return Some(ClickEvent::LongClick);
        }
        None
    }

    fn on_press(&mut self) {
        if self.awaiting_second_press {
            self.double_click_possible = true;
        } else {
            self.long_click_possible = true;
            self.click_handled = false;
        }
        self.pressed = true;
        self.pressed_ticks = 1;
    }

    fn on_release(&mut self) -> Option<ClickEvent> {
        self.pressed = false;
        self.long_click_possible = false;

        if !self.ticks_reach(self.pressed_ticks, self.timings.min_click) {
            // Bounce: a pending first click stays pending
            self.double_click_possible = false;
            return None;
        }

        if self.double_click_possible {
            self.double_click_possible = false;
            self.awaiting_second_press = false;
            self.click_handled = true;
            return Some(ClickEvent::DoubleClick);
        }

        if !self.click_handled {
            self.awaiting_second_press = true;
            self.release_ticks = 0;
        }
        None
    }

    fn on_idle(&mut self) -> Option<ClickEvent> {
        if !self.awaiting_second_press {
            return None;
        }

        self.release_ticks = self.release_ticks.saturating_add(1);
        if self.tick * self.release_ticks > self.timings.double_click_max_gap {
            self.awaiting_second_press = false;
            if !self.click_handled {
                self.click_handled = true;
                return Some(ClickEvent::SingleClick);
            }
        }
        None
    }

    fn ticks_reach(&self, ticks: u32, threshold: Duration) -> bool {
        self.tick * ticks >= threshold
    }
}
