use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Board;
use crate::snake::{Body, Direction, GridCell};
use MoveResult::*;

/// Rejection-sampling draws per board cell before falling back to
/// enumerating the free cells.
const SAMPLES_PER_CELL: usize = 4;

/// Everything that changes from one tick to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub body: Body,
    pub target: GridCell,
    pub direction: Direction,
}

impl SimulationState {
    pub fn new(body: Body, target: GridCell, direction: Direction) -> Self {
        SimulationState { body, target, direction }
    }

    /// A one-cell snake in the top-left corner heading right, with the
    /// target in the middle of the board.
    pub fn initial(board: Board) -> Self {
        SimulationState::new(Body::new(GridCell::new(0, 0)), board.center(), Direction::Right)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Head advanced and the tail gave up `old_tail`.
    Moved { new_head: GridCell, old_tail: Option<GridCell> },
    /// Head advanced onto the target; the body kept its tail.
    Grew { new_head: GridCell, new_target: GridCell },
    /// The next cell is off the board. Nothing changed.
    HitWall,
    /// The next cell belongs to the body. Nothing changed.
    HitSelf,
}

impl MoveResult {
    pub fn is_blocked(&self) -> bool {
        matches!(self, HitWall | HitSelf)
    }
}

/// Advances `state` by one tick in place.
///
/// Walls and the snake's own body do not end the game: a blocked move
/// leaves the state exactly as it was, and the snake stays put until a
/// direction with a free cell is chosen.
pub fn advance<R: Rng + ?Sized>(board: Board, state: &mut SimulationState, rng: &mut R) -> MoveResult {
    let new_head = state.body.head().neighbour(state.direction);

    if !board.contains(new_head) {
        trace!(head = %state.body.head(), direction = ?state.direction, "blocked by wall");
        return HitWall;
    }

    // Covers turning straight back onto the second segment too
    if state.body.contains(&new_head) {
        trace!(head = %state.body.head(), direction = ?state.direction, "blocked by body");
        return HitSelf;
    }

    state.body.push_head(new_head);

    if new_head == state.target {
        if let Some(target) = relocate_target(board, &state.body, rng) {
            state.target = target;
        }
        debug!(len = state.body.len(), target = %state.target, "target consumed");
        return Grew { new_head, new_target: state.target };
    }

    let old_tail = state.body.pop_tail();
    Moved { new_head, old_tail }
}

/// By-value form of [`advance`].
pub fn step<R: Rng + ?Sized>(board: Board, mut state: SimulationState, rng: &mut R) -> SimulationState {
    advance(board, &mut state, rng);
    state
}

/// Picks a uniformly random cell of `board` that `body` does not cover.
///
/// Draws random cells until one is free. After a bounded number of misses
/// (the board is nearly full) it lists the free cells and picks one of
/// those instead. Returns `None` when the body covers the whole board.
pub fn relocate_target<R: Rng + ?Sized>(board: Board, body: &Body, rng: &mut R) -> Option<GridCell> {
    if body.len() >= board.area() {
        debug!(len = body.len(), "board is full, nowhere to put the target");
        return None;
    }

    for _ in 0..board.area() * SAMPLES_PER_CELL {
        let cell = GridCell::new(
            rng.gen_range(0..board.height as i32),
            rng.gen_range(0..board.width as i32),
        );
        if !body.contains(&cell) {
            return Some(cell);
        }
    }

    let free: Vec<GridCell> = board.cells().filter(|cell| !body.contains(cell)).collect();
    debug!(free = free.len(), "rejection sampling exhausted, choosing from free cells");
    free.choose(rng).copied()
}
