use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    CELL_WIDTH, GLYPH_FRUIT, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN, GLYPH_SNAKE_HEAD_LEFT,
    GLYPH_SNAKE_HEAD_RIGHT, GLYPH_SNAKE_HEAD_UP, GLYPH_WALL, GridSize,
};
use crate::game::{Game, GameStatus};
use crate::grid::Occupant;
use crate::input::Direction;
use crate::level::Rgb;
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu, render_won_menu};

/// Driver-level screen state layered on top of the engine status.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Overlay {
    None,
    Start,
    Paused,
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, game: &Game, overlay: Overlay) {
    let area = frame.area();
    let field_area = render_hud(frame, area, game);
    let play_area = centered_board(field_area, game.grid.size());

    let block = Block::bordered().border_style(Style::new().fg(Color::Gray));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_grid(frame, inner, game);
    render_snake(frame, inner, game);

    match (overlay, game.status()) {
        (Overlay::Start, _) => render_start_menu(frame, play_area, game),
        (_, GameStatus::GameOver(reason)) => render_game_over_menu(frame, play_area, game, reason),
        (_, GameStatus::Won) => render_won_menu(frame, play_area, game),
        (Overlay::Paused, GameStatus::Running) => render_pause_menu(frame, play_area),
        (Overlay::None, GameStatus::Running) => {}
    }
}

/// Converts an engine colour to a terminal colour.
#[must_use]
pub fn to_color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(r, g, b)
}

fn centered_board(area: Rect, size: GridSize) -> Rect {
    let width = size.width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = size.height.saturating_add(2);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);

    board
}

fn render_grid(frame: &mut Frame<'_>, inner: Rect, game: &Game) {
    let bounds = game.grid.size();
    let buffer = frame.buffer_mut();

    for (position, occupant) in game.grid.occupied() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, position) else {
            continue;
        };

        match occupant {
            Occupant::Wall => {
                buffer.set_string(x, y, GLYPH_WALL, Style::new().fg(Color::White));
            }
            Occupant::Fruit(color) => {
                buffer.set_string(
                    x,
                    y,
                    GLYPH_FRUIT,
                    Style::new().fg(to_color(color)).add_modifier(Modifier::BOLD),
                );
            }
            Occupant::Empty => {}
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, game: &Game) {
    let snake = &game.snake;
    let bounds = game.grid.size();
    let head_style = Style::new()
        .fg(to_color(snake.head_color()))
        .add_modifier(Modifier::BOLD);
    let body_style = Style::new().fg(to_color(snake.body_color()));

    let buffer = frame.buffer_mut();
    for (index, segment) in snake.segments().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(x, y, head_glyph(snake.direction()), head_style);
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, body_style);
        }
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
