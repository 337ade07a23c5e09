use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll, read};
use tracing::debug;

use crate::config::{Board, Config, Screen};
use crate::error::{Error, Result};
use crate::game::{InputEvent, Presentation};
use crate::sim::SimulationState;
use crate::snake::{Direction, GridCell};

const BACKGROUND_COLOR: Color = Color::Black;
const SNAKE_COLOR: Color = Color::Red;
const TARGET_COLOR: Color = Color::Green;

/// Terminal front end: the board is drawn inside a border in the top-left
/// corner, one block of `tile` cells per board tile.
pub struct TermManager {
    stdout: Stdout,
    board: Board,
    screen: Screen,
    tile: Coords,
    active: bool,
}

impl TermManager {
    pub fn new(config: &Config) -> Self {
        TermManager {
            stdout: stdout(),
            board: config.board,
            screen: config.screen,
            tile: config.tile_size(),
            active: false,
        }
    }

    /// Takes over the terminal. Fails if it can't, or if it is too small
    /// to hold the screen plus its border.
    pub fn setup(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        let (needed_cols, needed_rows) = (self.screen.cols + 2, self.screen.rows + 2);
        if cols < needed_cols || rows < needed_rows {
            return Err(Error::TerminalTooSmall { cols, rows, needed_cols, needed_rows });
        }

        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        self.draw_borders()?;

        debug!(cols, rows, "terminal ready");
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (width, height) = (self.screen.cols + 2, self.screen.rows + 2);
        let (end_x, end_y) = (width - 1, height - 1);

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    fn fill_tile(&mut self, cell: GridCell, color: Color) -> Result<()> {
        if !self.board.contains(cell) {
            return Ok(());
        }

        let (tile_w, tile_h) = self.tile;
        let x = 1 + cell.col as TermInt * tile_w;
        let y = 1 + cell.row as TermInt * tile_h;
        let blank = " ".repeat(tile_w as usize);

        queue!(self.stdout, style::SetBackgroundColor(color))?;
        for dy in 0..tile_h {
            queue!(self.stdout, cursor::MoveTo(x, y + dy), style::Print(&blank))?;
        }

        Ok(())
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Presentation for TermManager {
    fn poll_input(&mut self) -> Result<Option<InputEvent>> {
        while poll(Duration::ZERO)? {
            if let Event::Key(ev) = read()? {
                if let Some(input) = map_key(&ev) {
                    return Ok(Some(input));
                }
            }
        }

        Ok(None)
    }

    fn render(&mut self, state: &SimulationState) -> Result<()> {
        let blank = " ".repeat(self.screen.cols as usize);
        queue!(self.stdout, style::SetBackgroundColor(BACKGROUND_COLOR))?;
        for y in 0..self.screen.rows {
            queue!(self.stdout, cursor::MoveTo(1, 1 + y), style::Print(&blank))?;
        }

        for cell in state.body.iter() {
            self.fill_tile(*cell, SNAKE_COLOR)?;
        }
        self.fill_tile(state.target, TARGET_COLOR)?;

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Arrows and WASD turn; q, Esc and Ctrl+C quit. Key releases are ignored.
pub fn map_key(ev: &KeyEvent) -> Option<InputEvent> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }

    if is_ctrl_c(ev) {
        return Some(InputEvent::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(InputEvent::Turn(Direction::Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(InputEvent::Turn(Direction::Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(InputEvent::Turn(Direction::Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(InputEvent::Turn(Direction::Right)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(map_key(&key(KeyCode::Up)), Some(InputEvent::Turn(Direction::Up)));
        assert_eq!(map_key(&key(KeyCode::Down)), Some(InputEvent::Turn(Direction::Down)));
        assert_eq!(map_key(&key(KeyCode::Left)), Some(InputEvent::Turn(Direction::Left)));
        assert_eq!(map_key(&key(KeyCode::Right)), Some(InputEvent::Turn(Direction::Right)));

        assert_eq!(map_key(&key(KeyCode::Char('w'))), Some(InputEvent::Turn(Direction::Up)));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), Some(InputEvent::Turn(Direction::Left)));
        assert_eq!(map_key(&key(KeyCode::Char('s'))), Some(InputEvent::Turn(Direction::Down)));
        assert_eq!(map_key(&key(KeyCode::Char('D'))), Some(InputEvent::Turn(Direction::Right)));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(&key(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(map_key(&key(KeyCode::Esc)), Some(InputEvent::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), Some(InputEvent::Quit));
    }

    #[test]
    fn plain_c_and_other_keys_do_nothing() {
        assert_eq!(map_key(&key(KeyCode::Char('c'))), None);
        assert_eq!(map_key(&key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent::new_with_kind(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(map_key(&release), None);
    }
}
