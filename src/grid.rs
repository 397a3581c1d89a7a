use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{ConfigError, GridSize};
use crate::level::Rgb;
use crate::snake::Position;

/// What a grid cell holds. The snake is tracked separately.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Occupant {
    Empty,
    Fruit(Rgb),
    Wall,
}

impl Occupant {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    #[must_use]
    pub fn is_fruit(self) -> bool {
        matches!(self, Self::Fruit(_))
    }
}

/// Fixed-size board of fruit and walls, stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Occupant>,
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new(size: GridSize) -> Result<Self, ConfigError> {
        if size.width == 0 || size.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: size.width,
                height: size.height,
            });
        }

        Ok(Self {
            size,
            cells: vec![Occupant::Empty; size.total_cells()],
        })
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the occupant at `position`; cells outside the grid read as empty.
    #[must_use]
    pub fn occupant_at(&self, position: Position) -> Occupant {
        self.index(position)
            .map_or(Occupant::Empty, |index| self.cells[index])
    }

    /// Stores `occupant` at `position`. Returns false when out of bounds.
    pub fn set(&mut self, position: Position, occupant: Occupant) -> bool {
        let Some(index) = self.index(position) else {
            return false;
        };

        self.cells[index] = occupant;
        true
    }

    /// Empties the cell at `position`.
    pub fn clear(&mut self, position: Position) {
        let _ = self.set(position, Occupant::Empty);
    }

    /// Places `occupant` on a uniformly chosen cell that is empty and not
    /// excluded. Returns `None` when no such cell exists (a full board).
    pub fn place_random<R, F>(
        &mut self,
        rng: &mut R,
        occupant: Occupant,
        is_excluded: F,
    ) -> Option<Position>
    where
        R: Rng + ?Sized,
        F: Fn(Position) -> bool,
    {
        let candidates: Vec<Position> = self
            .positions()
            .filter(|position| self.occupant_at(*position).is_empty())
            .filter(|position| !is_excluded(*position))
            .collect();

        let position = *candidates.choose(rng)?;
        self.set(position, occupant);
        Some(position)
    }

    /// Iterates over all non-empty cells.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Occupant)> + '_ {
        self.positions()
            .map(|position| (position, self.occupant_at(position)))
            .filter(|(_, occupant)| !occupant.is_empty())
    }

    #[must_use]
    pub fn fruit_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_fruit()).count()
    }

    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Occupant::Wall)
            .count()
    }

    fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let width = i32::from(self.size.width);
        let height = i32::from(self.size.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position { x, y }))
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !position.is_within_bounds(self.size) {
            return None;
        }

        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        Some(y * usize::from(self.size.width) + x)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::level::Rgb;
    use crate::snake::{Position, Snake};

    use super::{Grid, Occupant};

    const RED: Rgb = Rgb(255, 0, 0);

    fn grid(width: u16, height: u16) -> Grid {
        Grid::new(GridSize { width, height }).expect("grid dimensions are valid")
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = grid(4, 3);

        assert_eq!(grid.occupied().count(), 0);
        assert_eq!(grid.occupant_at(Position::new(3, 2)), Occupant::Empty);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(
            Grid::new(GridSize {
                width: 0,
                height: 5
            })
            .is_err()
        );
    }

    #[test]
    fn set_and_clear_round_trip_through_occupant_at() {
        let mut grid = grid(4, 4);
        let cell = Position::new(2, 1);

        assert!(grid.set(cell, Occupant::Wall));
        assert_eq!(grid.occupant_at(cell), Occupant::Wall);

        grid.clear(cell);
        assert_eq!(grid.occupant_at(cell), Occupant::Empty);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut grid = grid(4, 4);

        assert!(!grid.set(Position::new(4, 0), Occupant::Wall));
        assert!(!grid.set(Position::new(0, -1), Occupant::Wall));
        assert_eq!(grid.occupied().count(), 0);
    }

    #[test]
    fn random_placement_never_overlaps_snake_or_occupants() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
            ],
            Direction::Left,
        );
        let mut grid = grid(8, 6);
        grid.set(Position::new(5, 5), Occupant::Wall);

        for _ in 0..40 {
            let placed = grid
                .place_random(&mut rng, Occupant::Fruit(RED), |cell| snake.occupies(cell))
                .expect("board has room");
            assert!(!snake.occupies(placed));
            assert_ne!(placed, Position::new(5, 5));
        }

        assert_eq!(grid.fruit_count(), 40);
        assert_eq!(grid.wall_count(), 1);
    }

    #[test]
    fn placement_on_full_board_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = grid(2, 1);
        grid.set(Position::new(0, 0), Occupant::Wall);

        let placed = grid.place_random(&mut rng, Occupant::Wall, |cell| {
            cell == Position::new(1, 0)
        });

        assert_eq!(placed, None);
        assert_eq!(grid.wall_count(), 1);
    }

    #[test]
    fn placement_fills_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = grid(3, 1);
        grid.set(Position::new(0, 0), Occupant::Wall);
        grid.set(Position::new(2, 0), Occupant::Wall);

        let placed = grid.place_random(&mut rng, Occupant::Fruit(RED), |_| false);

        assert_eq!(placed, Some(Position::new(1, 0)));
    }
}
