#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use copilot_light_core::{HardwareAdapter, HardwareFault};

/// In-memory board recording every led write
pub struct MockBoard {
    levels: RefCell<HashMap<String, f32>>,
    writes: RefCell<Vec<(String, f32)>>,
    light: Cell<f32>,
    light_reads: Cell<usize>,
    pressed: Cell<bool>,
    fail_writes: Cell<bool>,
    fail_reads: Cell<bool>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            levels: RefCell::new(HashMap::new()),
            writes: RefCell::new(Vec::new()),
            light: Cell::new(0.5),
            light_reads: Cell::new(0),
            pressed: Cell::new(false),
            fail_writes: Cell::new(false),
            fail_reads: Cell::new(false),
        }
    }

    pub fn set_light(&self, level: f32) {
        self.light.set(level);
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.set(pressed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Last value written to `led`
    pub fn brightness(&self, led: &str) -> Option<f32> {
        self.levels.borrow().get(led).copied()
    }

    pub fn writes(&self) -> Vec<(String, f32)> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self, led: &str) -> usize {
        self.writes.borrow().iter().filter(|(name, _)| name == led).count()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    pub fn light_reads(&self) -> usize {
        self.light_reads.get()
    }
}

impl HardwareAdapter for MockBoard {
    fn set_channel_brightness(&self, led: &str, brightness: f32) -> Result<(), HardwareFault> {
        if self.fail_writes.get() {
            return Err(HardwareFault::Io);
        }
        self.levels.borrow_mut().insert(led.to_string(), brightness);
        self.writes.borrow_mut().push((led.to_string(), brightness));
        Ok(())
    }

    fn read_light_level(&self) -> Result<f32, HardwareFault> {
        if self.fail_reads.get() {
            return Err(HardwareFault::Timeout);
        }
        self.light_reads.set(self.light_reads.get() + 1);
        Ok(self.light.get())
    }

    fn read_button_pressed(&self) -> Result<bool, HardwareFault> {
        if self.fail_reads.get() {
            return Err(HardwareFault::Timeout);
        }
        Ok(self.pressed.get())
    }
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}
