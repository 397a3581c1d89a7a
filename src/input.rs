use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(dx, dy)` step for one cell of movement. `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Quit,
    Confirm,
}

/// Translates terminal key events into [`GameInput`]s.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for a key press and maps it.
    ///
    /// Returns `Ok(None)` on timeout and for keys the game does not use.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

/// Maps a single key event to a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => {
            GameInput::Direction(Direction::Right)
        }
        KeyCode::Char('p' | 'P' | ' ') => GameInput::Pause,
        KeyCode::Enter => GameInput::Confirm,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

/// Maximum number of turns buffered between two ticks.
pub const INTENT_QUEUE_DEPTH: usize = 2;

/// Buffers turns pressed faster than the tick rate so quick
/// double-turns are not lost.
///
/// One intent is handed to the engine per tick. Entries that repeat or
/// reverse the last queued direction are dropped; the engine applies its
/// own reversal guard against the snake's actual heading on top of this.
#[derive(Debug, Clone, Default)]
pub struct IntentQueue {
    pending: VecDeque<Direction>,
}

impl IntentQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `direction` relative to `current`, the snake's heading.
    pub fn push(&mut self, current: Direction, direction: Direction) {
        // When full, the last slot is overwritten (last input wins), so the
        // new turn is checked against the slot before it.
        let slot = self.pending.len().min(INTENT_QUEUE_DEPTH - 1);
        let previous = match slot {
            0 => current,
            _ => self.pending[slot - 1],
        };

        if direction == previous || !direction_change_is_valid(previous, direction) {
            return;
        }

        self.pending.truncate(slot);
        self.pending.push_back(direction);
    }

    /// Takes the intent for the next tick; `None` keeps the current heading.
    pub fn next_intent(&mut self) -> Option<Direction> {
        self.pending.pop_front()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{Direction, GameInput, IntentQueue, direction_change_is_valid, map_key};

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn opposite_deltas_cancel_out() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn only_exact_reversals_are_invalid() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(
            Direction::Left,
            Direction::Right
        ));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Left, Direction::Up));
        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
    }

    #[test]
    fn arrow_and_wasd_keys_map_to_directions() {
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        let a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);

        assert_eq!(map_key(up), Some(GameInput::Direction(Direction::Up)));
        assert_eq!(map_key(a), Some(GameInput::Direction(Direction::Left)));
    }

    #[test]
    fn control_keys_map_to_commands() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let p = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

        assert_eq!(map_key(ctrl_c), Some(GameInput::Quit));
        assert_eq!(map_key(esc), Some(GameInput::Quit));
        assert_eq!(map_key(p), Some(GameInput::Pause));
        assert_eq!(map_key(enter), Some(GameInput::Confirm));
        assert_eq!(map_key(x), None);
    }

    #[test]
    fn intent_queue_hands_out_one_turn_per_tick() {
        let mut queue = IntentQueue::new();

        queue.push(Direction::Right, Direction::Up);
        queue.push(Direction::Right, Direction::Left);

        assert_eq!(queue.next_intent(), Some(Direction::Up));
        assert_eq!(queue.next_intent(), Some(Direction::Left));
        assert_eq!(queue.next_intent(), None);
    }

    #[test]
    fn intent_queue_drops_repeats_and_reversals() {
        let mut queue = IntentQueue::new();

        queue.push(Direction::Right, Direction::Right);
        queue.push(Direction::Right, Direction::Left);
        assert!(queue.is_empty());

        queue.push(Direction::Right, Direction::Down);
        queue.push(Direction::Right, Direction::Up);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn intent_queue_second_slot_uses_last_input() {
        let mut queue = IntentQueue::new();

        queue.push(Direction::Down, Direction::Right);
        queue.push(Direction::Down, Direction::Up);
        queue.push(Direction::Down, Direction::Down);

        assert_eq!(queue.next_intent(), Some(Direction::Right));
        assert_eq!(queue.next_intent(), Some(Direction::Down));
    }
}
