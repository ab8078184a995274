//! External control requests
//!
//! Tasks and interrupt handlers hand [`ControlRequest`]s to the control core
//! through a shared [`RequestQueue`]. The core empties the queue once per
//! tick, right after the button events, and handles requests oldest first.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use heapless::Deque;

use crate::brightness::BrightnessLevel;
use crate::mode::Action;

/// Default capacity of a request queue.
pub const DEFAULT_REQUEST_QUEUE_SIZE: usize = 4;

/// Request handled by the control core between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Run an action as if a click had triggered it.
    Perform(Action),
    /// Select a brightness level directly.
    SelectLevel(BrightnessLevel),
}

/// The queue had no room left; the rejected request is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull(pub ControlRequest);

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request queue is full, dropped {:?}", self.0)
    }
}

/// Bounded request queue, safe to share with interrupt handlers
///
/// Place it in a `static` and pass a reference to the control core and to
/// every producer.
pub struct RequestQueue<const SIZE: usize> {
    pending: Mutex<RefCell<Deque<ControlRequest, SIZE>>>,
}

impl<const SIZE: usize> RequestQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Queue `request` for the next tick
    pub fn push(&self, request: ControlRequest) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            self.pending
                .borrow_ref_mut(cs)
                .push_back(request)
                .map_err(QueueFull)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.pending.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand every queued request to `handle`, oldest first.
    ///
    /// The queue is emptied inside one critical section and `handle` runs
    /// after it, so a request pushed from `handle` waits for the next drain.
    pub fn drain(&self, mut handle: impl FnMut(ControlRequest)) {
        let mut pending =
            critical_section::with(|cs| self.pending.borrow(cs).replace(Deque::new()));
        while let Some(request) = pending.pop_front() {
            handle(request);
        }
    }
}

impl<const SIZE: usize> Default for RequestQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
