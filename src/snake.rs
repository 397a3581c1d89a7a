use std::collections::VecDeque;

use crate::config::{ConfigError, GridSize};
use crate::input::{Direction, direction_change_is_valid};
use crate::level::Rgb;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The player's snake: body cells (head first), heading, pending growth
/// and the colours of the current level.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    growth_pending: u32,
    head_color: Rgb,
    body_color: Rgb,
}

impl Snake {
    /// Creates a straight snake of `length` segments with the head at
    /// `start`, trailing to the left and heading right.
    pub fn new(start: Position, length: u16) -> Result<Self, ConfigError> {
        if length == 0 {
            return Err(ConfigError::ZeroSnakeLength);
        }

        let body = (0..i32::from(length))
            .map(|offset| Position {
                x: start.x - offset,
                y: start.y,
            })
            .collect();

        Ok(Self::from_body(body, Direction::Right))
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(
            !segments.is_empty(),
            "snake needs at least one segment"
        );
        Self::from_body(VecDeque::from(segments), direction)
    }

    fn from_body(body: VecDeque<Position>, direction: Direction) -> Self {
        Self {
            body,
            direction,
            growth_pending: 0,
            head_color: Rgb::WHITE,
            body_color: Rgb::WHITE,
        }
    }

    /// Changes heading unless `direction` reverses the current one.
    ///
    /// Returns whether the new heading was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.direction = direction;
        true
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.direction)
    }

    /// Moves one cell forward and returns the new head.
    ///
    /// The tail is kept (net growth of one) while growth is pending.
    pub fn advance(&mut self) -> Position {
        let next_head = self.next_head_position();
        self.body.push_front(next_head);

        if self.growth_pending > 0 {
            self.growth_pending -= 1;
        } else {
            let _ = self.body.pop_back();
        }

        next_head
    }

    /// Queues `segments` cells of growth for the coming moves.
    pub fn grow(&mut self, segments: u32) {
        self.growth_pending = self.growth_pending.saturating_add(segments);
    }

    /// Returns true if `position` is part of the body, optionally ignoring
    /// the head.
    #[must_use]
    pub fn contains(&self, position: Position, exclude_head: bool) -> bool {
        let skip = usize::from(exclude_head);
        self.body.iter().skip(skip).any(|segment| *segment == position)
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.contains(position, false)
    }

    /// Returns true when moving the head to `next_head` would hit the body.
    ///
    /// The tail cell is ignored when it is about to be vacated by this move.
    #[must_use]
    pub fn would_bite_itself(&self, next_head: Position) -> bool {
        let keep = if self.growth_pending > 0 {
            self.body.len()
        } else {
            self.body.len() - 1
        };

        self.body.iter().take(keep).any(|segment| *segment == next_head)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false: a snake keeps at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn growth_pending(&self) -> u32 {
        self.growth_pending
    }

    #[must_use]
    pub fn head_color(&self) -> Rgb {
        self.head_color
    }

    #[must_use]
    pub fn body_color(&self) -> Rgb {
        self.body_color
    }

    pub fn set_colors(&mut self, head: Rgb, body: Rgb) {
        self.head_color = head;
        self.body_color = body;
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
