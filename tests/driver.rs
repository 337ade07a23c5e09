use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use grid_snake::config::{Board, Config};
use grid_snake::game::{Clock, Driver, InputEvent, LoopStatus, Presentation};
use grid_snake::sim::SimulationState;
use grid_snake::snake::{Body, Direction, GridCell};
use grid_snake::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

const TICK: Duration = Duration::from_millis(200);

#[derive(Clone)]
struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    fn new() -> Self {
        ManualClock { now: Rc::new(Cell::new(Instant::now())) }
    }

    fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[derive(Default)]
struct Script {
    inputs: VecDeque<InputEvent>,
    frames: Vec<SimulationState>,
    quit_after_frames: Option<usize>,
}

#[derive(Clone, Default)]
struct ScriptedPresentation {
    script: Rc<RefCell<Script>>,
}

impl ScriptedPresentation {
    fn press(&self, event: InputEvent) {
        self.script.borrow_mut().inputs.push_back(event);
    }

    fn frames(&self) -> Vec<SimulationState> {
        self.script.borrow().frames.clone()
    }
}

impl Presentation for ScriptedPresentation {
    fn poll_input(&mut self) -> Result<Option<InputEvent>> {
        let mut script = self.script.borrow_mut();
        if let Some(limit) = script.quit_after_frames {
            if script.frames.len() >= limit {
                return Ok(Some(InputEvent::Quit));
            }
        }
        Ok(script.inputs.pop_front())
    }

    fn render(&mut self, state: &SimulationState) -> Result<()> {
        self.script.borrow_mut().frames.push(state.clone());
        Ok(())
    }
}

type TestDriver = Driver<ScriptedPresentation, ManualClock, StdRng>;

fn driver_with(state: SimulationState) -> (TestDriver, ScriptedPresentation, ManualClock) {
    let config = Config::with_board(Board::new(10, 10));
    let presentation = ScriptedPresentation::default();
    let clock = ManualClock::new();
    let driver = Driver::with_parts(&config, state, presentation.clone(), clock.clone(), StdRng::seed_from_u64(5));
    (driver, presentation, clock)
}

fn snake(cells: &[(i32, i32)], direction: Direction) -> SimulationState {
    let body = Body::from_cells(cells.iter().map(|&(row, col)| GridCell::new(row, col))).unwrap();
    SimulationState::new(body, GridCell::new(9, 9), direction)
}

#[test]
fn nothing_happens_before_the_first_deadline() {
    let (mut driver, presentation, clock) = driver_with(snake(&[(0, 0)], Direction::Right));
    let start = clock.now();

    assert_eq!(driver.iterate().unwrap(), LoopStatus::Running);

    assert_eq!(driver.ticks(), 0);
    assert!(presentation.frames().is_empty());
    // Idle wait is capped at the poll interval
    assert_eq!(clock.now(), start + Duration::from_millis(10));
}

#[test]
fn one_step_and_one_frame_per_tick() {
    let (mut driver, presentation, clock) = driver_with(snake(&[(0, 0)], Direction::Right));
    let first_deadline = driver.next_tick();

    clock.advance(TICK);
    driver.iterate().unwrap();

    assert_eq!(driver.ticks(), 1);
    assert_eq!(driver.state().body.head(), GridCell::new(0, 1));
    assert_eq!(presentation.frames(), vec![driver.state().clone()]);
    assert_eq!(driver.next_tick(), first_deadline + TICK);
}

#[test]
fn late_loop_catches_up_one_tick_per_pass() {
    let (mut driver, presentation, clock) = driver_with(snake(&[(0, 0)], Direction::Right));
    let first_deadline = driver.next_tick();

    // Three and a bit intervals go by before the loop looks at the clock
    clock.advance(TICK * 3 + Duration::from_millis(50));

    driver.iterate().unwrap();
    assert_eq!(driver.ticks(), 1);
    assert_eq!(driver.next_tick(), first_deadline + TICK);

    driver.iterate().unwrap();
    driver.iterate().unwrap();
    assert_eq!(driver.ticks(), 3);
    assert_eq!(presentation.frames().len(), 3);
    assert_eq!(driver.next_tick(), first_deadline + TICK * 3);

    driver.iterate().unwrap();
    assert_eq!(driver.ticks(), 3);
}

#[test]
fn latched_turn_applies_on_the_next_tick() {
    let (mut driver, presentation, clock) = driver_with(snake(&[(0, 0)], Direction::Right));

    presentation.press(InputEvent::Turn(Direction::Up));
    presentation.press(InputEvent::Turn(Direction::Down));
    driver.iterate().unwrap();

    // Latched but not yet applied
    assert_eq!(driver.state().direction, Direction::Right);

    clock.advance(TICK);
    driver.iterate().unwrap();

    assert_eq!(driver.state().direction, Direction::Down);
    assert_eq!(driver.state().body.head(), GridCell::new(1, 0));

    // The heading sticks without further input
    clock.advance(TICK);
    driver.iterate().unwrap();
    assert_eq!(driver.state().body.head(), GridCell::new(2, 0));
}

#[test]
fn reversal_is_latched_then_refused_by_the_step() {
    let (mut driver, presentation, clock) = driver_with(snake(&[(5, 5), (5, 4)], Direction::Right));
    let before = driver.state().body.clone();

    presentation.press(InputEvent::Turn(Direction::Left));
    clock.advance(TICK);
    driver.iterate().unwrap();

    assert_eq!(driver.state().direction, Direction::Left);
    assert_eq!(driver.state().body, before);

    presentation.press(InputEvent::Turn(Direction::Up));
    clock.advance(TICK);
    driver.iterate().unwrap();

    assert_eq!(driver.state().body.head(), GridCell::new(4, 5));
}

#[test]
fn quit_stops_the_loop_for_good() {
    let (mut driver, presentation, clock) = driver_with(snake(&[(0, 0)], Direction::Right));

    presentation.press(InputEvent::Quit);
    presentation.press(InputEvent::Turn(Direction::Down));
    clock.advance(TICK);

    assert_eq!(driver.iterate().unwrap(), LoopStatus::Stopped);
    assert_eq!(driver.iterate().unwrap(), LoopStatus::Stopped);
    assert_eq!(driver.status(), LoopStatus::Stopped);
    assert_eq!(driver.ticks(), 0);
    assert!(presentation.frames().is_empty());
}

#[test]
fn run_draws_the_start_and_every_tick_until_quit() {
    let (mut driver, presentation, _clock) = driver_with(snake(&[(0, 0)], Direction::Right));
    presentation.script.borrow_mut().quit_after_frames = Some(4);

    driver.run().unwrap();

    let frames = presentation.frames();
    assert_eq!(frames.len(), 4);
    assert_eq!(driver.ticks(), 3);
    assert_eq!(frames[0].body.head(), GridCell::new(0, 0));
    assert_eq!(frames[3].body.head(), GridCell::new(0, 3));
}
