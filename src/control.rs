//! Control loop
//!
//! [`ControlCore`] owns the shared state, one controller per channel group,
//! the sensor sampler and the button classifier. Every tick it
//!
//! 1. derives the auto brightness modifier and pushes it into the enabled
//!    channel controllers,
//! 2. runs every module unit concurrently, each on its own subtree of
//!    [`SharedState`], and waits for all of them and for the tick deadline,
//! 3. dispatches pending clicks and queued requests, then evaluates the mode
//!    transition predicate.

use embassy_futures::join::{join, join5};
use embassy_time::{Duration, Instant, Timer};

use crate::HardwareAdapter;
use crate::animation::{AnimationCatalog, AnimationSource, DEFAULT_ANIMATIONS};
use crate::brightness::{AutoBrightnessConfig, BrightnessSelector, DEFAULT_AUTO_BRIGHTNESS};
use crate::button::{ButtonClassifier, ButtonTimings, DEFAULT_BUTTON_TIMINGS};
use crate::controller::ChannelController;
use crate::error::{ConfigurationFault, FatalFault, Fault};
use crate::logging::{log_error, log_info, log_warn};
use crate::mode::{Action, ChannelAssignment, Mode};
use crate::pacer::TickPacer;
use crate::request::{ControlRequest, RequestQueue};
use crate::sensor::SensorSampler;
use crate::state::{
    ChannelGroup, ChannelGroupState, ClickEvent, DEFAULT_LAYOUT, SharedState, StateLayout,
};

/// Runtime configuration of the control core
#[derive(Debug, Clone, Copy)]
pub struct ControlConfig {
    /// Length of one control tick
    pub tick: Duration,
    /// Ramp step of extended animations, in ticks.
    ///
    /// Smaller steps need more keyframes. The default catalog fits
    /// [`MAX_KEYFRAMES`](crate::animation::MAX_KEYFRAMES) for a scale of 7 or
    /// more at the default tick; below that [`ControlCore::new`] fails with
    /// `TooManyKeyframes`.
    pub transition_scale: u32,
    pub button: ButtonTimings,
    pub layout: StateLayout,
    pub brightness: AutoBrightnessConfig,
    pub animations: &'static [AnimationSource],
}

impl ControlConfig {
    pub const DEFAULT: Self = Self {
        tick: Duration::from_millis(10),
        transition_scale: 10,
        button: DEFAULT_BUTTON_TIMINGS,
        layout: DEFAULT_LAYOUT,
        brightness: DEFAULT_AUTO_BRIGHTNESS,
        animations: DEFAULT_ANIMATIONS,
    };

    /// Step length of the extend transform
    pub fn transition_step(&self) -> Duration {
        self.tick * self.transition_scale
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fixed rate scheduler of the light
pub struct ControlCore<'a, H: HardwareAdapter, const QUEUE_SIZE: usize> {
    hardware: H,
    requests: &'a RequestQueue<QUEUE_SIZE>,
    catalog: AnimationCatalog,
    state: SharedState,
    mode: Mode,

    tail: ChannelController,
    front: ChannelController,
    status: ChannelController,
    sensor: SensorSampler,
    button: ButtonClassifier,
    brightness: BrightnessSelector,
    pacer: TickPacer,
}

impl<'a, H: HardwareAdapter, const QUEUE_SIZE: usize> ControlCore<'a, H, QUEUE_SIZE> {
    /// Validate `config`, build the runtime and enter the initial mode.
    pub fn new(
        hardware: H,
        requests: &'a RequestQueue<QUEUE_SIZE>,
        config: &ControlConfig,
    ) -> Result<Self, Fault> {
        if config.tick.as_ticks() == 0 || config.transition_scale == 0 {
            return Err(ConfigurationFault::InvalidTick.into());
        }

        let catalog = AnimationCatalog::load(config.animations, config.transition_step())?;
        let state = SharedState::new(&config.layout)?;
        let brightness = BrightnessSelector::new(&config.brightness)?;

        let mut core = Self {
            tail: ChannelController::new(ChannelGroup::Tail, &state.tail, config.tick),
            front: ChannelController::new(ChannelGroup::Front, &state.front, config.tick),
            status: ChannelController::new(ChannelGroup::Status, &state.status, config.tick),
            sensor: SensorSampler::new(config.tick),
            button: ButtonClassifier::new(config.tick, config.button),
            pacer: TickPacer::new(config.tick),
            hardware,
            requests,
            catalog,
            state,
            mode: Mode::INITIAL,
            brightness,
        };
        core.enter_mode(Mode::INITIAL)?;
        Ok(core)
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn state(&self) -> &SharedState {
        &self.state
    }

    pub const fn hardware(&self) -> &H {
        &self.hardware
    }

    pub const fn brightness(&self) -> &BrightnessSelector {
        &self.brightness
    }

    pub const fn catalog(&self) -> &AnimationCatalog {
        &self.catalog
    }

    pub const fn controller(&self, group: ChannelGroup) -> &ChannelController {
        match group {
            ChannelGroup::Tail => &self.tail,
            ChannelGroup::Front => &self.front,
            ChannelGroup::Status => &self.status,
        }
    }

    pub const fn button(&self) -> &ButtonClassifier {
        &self.button
    }

    pub const fn sensor(&self) -> &SensorSampler {
        &self.sensor
    }

    /// Run one tick without waiting for its deadline.
    pub fn step(&mut self) -> Result<(), FatalFault> {
        self.prepare_tick();
        embassy_futures::block_on(self.update_modules())?;
        self.complete_tick()
    }

    /// Run one tick and wait until the next one is due.
    pub async fn tick(&mut self) -> Result<(), FatalFault> {
        let deadline = self.pacer.advance(Instant::now());
        self.prepare_tick();
        let (updated, ()) = join(self.update_modules(), Timer::at(deadline.next_deadline)).await;
        updated?;
        self.complete_tick()
    }

    /// Run ticks until a fatal fault stops the loop.
    pub async fn run(&mut self) -> FatalFault {
        log_info!("control loop started in {} mode", self.mode.as_str());
        self.pacer.reset();
        loop {
            if let Err(fault) = self.tick().await {
                log_error!("control loop stopped: {}", fault);
                return fault;
            }
        }
    }

    fn prepare_tick(&mut self) {
        self.push_modifier(false);
    }

    /// Push the auto brightness modifier of the current mode into the
    /// controllers, skipping disabled ones unless `all` is set
    fn push_modifier(&mut self, all: bool) {
        let auto_enabled = self.mode.profile().auto_brightness;
        let modifier = self.brightness.modifier(auto_enabled, self.state.light.value);
        for controller in [&mut self.tail, &mut self.front, &mut self.status] {
            if !all && !controller.is_enabled() {
                continue;
            }
            if let Err(fault) = controller.set_auto_brightness_modifier(modifier) {
                log_error!("{}: {}", controller.group().as_str(), fault);
            }
        }
    }

    async fn update_modules(&mut self) -> Result<(), FatalFault> {
        let Self {
            hardware,
            state,
            tail,
            front,
            status,
            sensor,
            button,
            ..
        } = self;
        let SharedState {
            tail: tail_state,
            front: front_state,
            status: status_state,
            light,
            button1,
        } = state;
        let hardware = &*hardware;

        let (tail, front, status, sensor, button) = join5(
            async move { tail.update(tail_state, hardware) },
            async move { front.update(front_state, hardware) },
            async move { status.update(status_state, hardware) },
            async move { sensor.update(light, hardware) },
            async move { button.update(button1, hardware) },
        )
        .await;

        tail.and(front).and(status).and(sensor).and(button)
    }

    fn complete_tick(&mut self) -> Result<(), FatalFault> {
        let mut next = None;

        let actions = self.mode.profile().button_actions;
        for event in ClickEvent::ALL {
            if self.state.button1.take(event) {
                let action = actions.get(event);
                if action == Action::Nothing {
                    log_info!("{}: no action in {} mode", event.as_str(), self.mode.as_str());
                    continue;
                }
                log_info!("{}: {}", event.as_str(), action.as_str());
                self.perform(action, &mut next);
            }
        }

        let requests = self.requests;
        requests.drain(|request| match request {
            ControlRequest::Perform(action) => self.perform(action, &mut next),
            ControlRequest::SelectLevel(level) => {
                if let Err(fault) = self.brightness.select(level) {
                    log_warn!("brightness request rejected: {}", fault);
                }
            }
        });

        let next = next.or_else(|| self.mode.check_events(&self.state));
        if let Some(mode) = next {
            self.enter_mode(mode)?;
        }
        Ok(())
    }

    fn perform(&mut self, action: Action, next: &mut Option<Mode>) {
        match action {
            Action::Nothing => {}
            Action::ToggleBrightness => {
                let level = self.brightness.cycle();
                log_info!("brightness level: {:?}", level);
            }
            Action::Enter(mode) => {
                if let Some(pending) = *next {
                    log_info!(
                        "ignoring switch to {}, already switching to {}",
                        mode.as_str(),
                        pending.as_str()
                    );
                } else {
                    *next = Some(mode);
                }
            }
        }
    }

    fn enter_mode(&mut self, mode: Mode) -> Result<(), FatalFault> {
        log_info!("mode: {} -> {}", self.mode.as_str(), mode.as_str());
        self.mode = mode;
        let profile = mode.profile();
        // Groups enabled by this mode publish right away
        self.push_modifier(true);

        let Self {
            hardware,
            catalog,
            state,
            tail,
            front,
            status,
            ..
        } = self;
        let (hardware, catalog) = (&*hardware, &*catalog);
        let groups = [
            (tail, &mut state.tail),
            (front, &mut state.front),
            (status, &mut state.status),
        ];
        for (controller, group_state) in groups {
            let group = controller.group();
            enter_channel(
                controller,
                group_state,
                profile.channel(group),
                profile.modules.channel(group),
                catalog,
                hardware,
            )?;
        }

        self.sensor.set_enabled(profile.modules.light_sensor);
        self.button.set_enabled(profile.modules.button);
        Ok(())
    }
}

/// Apply one channel group's entry effects
fn enter_channel<H: HardwareAdapter>(
    controller: &mut ChannelController,
    state: &mut ChannelGroupState,
    assignment: ChannelAssignment,
    enabled: bool,
    catalog: &AnimationCatalog,
    hardware: &H,
) -> Result<(), FatalFault> {
    let group = controller.group().as_str();
    match assignment {
        ChannelAssignment::Animation { name, mode } => match catalog.get(name) {
            Ok((name, definition)) => controller.play(name, definition, mode, state),
            Err(fault) => log_error!("{}: {} '{}'", group, fault, name),
        },
        ChannelAssignment::Brightness(brightness) => {
            match controller.hold_brightness(brightness, state, hardware) {
                Ok(()) => {}
                Err(Fault::Fatal(fault)) => return Err(fault),
                Err(fault) => log_error!("{}: {}", group, fault),
            }
        }
        ChannelAssignment::Off => controller.stop_animation(state),
    }
    controller.set_enabled(enabled, state, hardware)
}
