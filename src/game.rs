use std::thread::sleep;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::{Board, Config};
use crate::error::Result;
use crate::sim::{advance, MoveResult, SimulationState};
use crate::snake::Direction;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Turn(Direction),
}

/// Whatever shows the game and collects the player's keys.
pub trait Presentation {
    /// Next queued input event, if any. Must not block.
    fn poll_input(&mut self) -> Result<Option<InputEvent>>;

    fn render(&mut self, state: &SimulationState) -> Result<()>;
}

pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        sleep(duration)
    }
}

/// Holds the last direction asked for since the previous tick.
///
/// Nothing is filtered here: turning straight back is accepted and then
/// refused by the simulation step when the neck is in the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectionLatch {
    requested: Option<Direction>,
}

impl DirectionLatch {
    pub fn set(&mut self, direction: Direction) {
        self.requested = Some(direction);
    }

    pub fn take(&mut self) -> Option<Direction> {
        self.requested.take()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    Stopped,
}

/// Owns the game state and paces it against the clock.
pub struct Driver<P, C = SystemClock, R = StdRng> {
    board: Board,
    tick_interval: Duration,
    poll_interval: Duration,
    state: SimulationState,
    latch: DirectionLatch,
    next_tick: Instant,
    ticks: u64,
    status: LoopStatus,
    presentation: P,
    clock: C,
    rng: R,
}

impl<P: Presentation> Driver<P> {
    pub fn new(config: &Config, presentation: P) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Driver::with_parts(config, SimulationState::initial(config.board), presentation, SystemClock, rng)
    }
}

impl<P: Presentation, C: Clock, R: Rng> Driver<P, C, R> {
    pub fn with_parts(config: &Config, state: SimulationState, presentation: P, clock: C, rng: R) -> Self {
        let next_tick = clock.now() + config.tick_interval;

        Driver {
            board: config.board,
            tick_interval: config.tick_interval,
            poll_interval: config.poll_interval,
            state,
            latch: DirectionLatch::default(),
            next_tick,
            ticks: 0,
            status: LoopStatus::Running,
            presentation,
            clock,
            rng,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn into_presentation(self) -> P {
        self.presentation
    }

    /// Draws the current state and runs until the player quits.
    pub fn run(&mut self) -> Result<()> {
        info!(
            width = self.board.width,
            height = self.board.height,
            tick_ms = self.tick_interval.as_millis() as u64,
            "game started"
        );
        self.presentation.render(&self.state)?;

        while self.iterate()? == LoopStatus::Running {}

        info!(ticks = self.ticks, len = self.state.body.len(), "game stopped");
        Ok(())
    }

    /// One pass of the loop: drain input, then step and render if the
    /// tick deadline has passed, otherwise wait a little.
    ///
    /// At most one step happens per pass. The deadline moves forward by
    /// exactly one interval each step, so a late loop catches up one tick
    /// per pass instead of drifting.
    pub fn iterate(&mut self) -> Result<LoopStatus> {
        if self.status == LoopStatus::Stopped {
            return Ok(LoopStatus::Stopped);
        }

        while let Some(event) = self.presentation.poll_input()? {
            match event {
                InputEvent::Quit => {
                    debug!("quit requested");
                    self.status = LoopStatus::Stopped;
                    return Ok(LoopStatus::Stopped);
                }
                InputEvent::Turn(direction) => self.latch.set(direction),
            }
        }

        let now = self.clock.now();
        if now >= self.next_tick {
            self.tick();
            self.presentation.render(&self.state)?;
            self.next_tick += self.tick_interval;
        } else {
            let wait = (self.next_tick - now).min(self.poll_interval);
            self.clock.sleep(wait);
        }

        Ok(LoopStatus::Running)
    }

    fn tick(&mut self) -> MoveResult {
        if let Some(direction) = self.latch.take() {
            self.state.direction = direction;
        }

        let res = advance(self.board, &mut self.state, &mut self.rng);
        self.ticks += 1;
        trace!(tick = self.ticks, result = ?res, "tick");
        res
    }
}
