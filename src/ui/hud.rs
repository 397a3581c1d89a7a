use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::{GLYPH_HUD_SEPARATOR, PLAY_AREA_MARGIN_X};
use crate::game::Game;
use crate::renderer::to_color;

/// Values shown on the HUD row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HudValues {
    pub level: u32,
    pub max_level: u32,
    pub score: u32,
    pub threshold: u32,
    pub length: usize,
    pub tick_ms: u128,
}

impl HudValues {
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        let settings = game.settings();
        Self {
            level: game.level(),
            max_level: game.config().levels.max_level,
            score: game.score,
            threshold: settings.threshold,
            length: game.snake.len(),
            tick_ms: settings.tick_interval.as_millis(),
        }
    }
}

/// Renders the HUD row under the play area and returns the area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, game: &Game) -> Rect {
    let [play_area, hud_area, _bottom_margin] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let hud_area = inset_horizontal(hud_area, PLAY_AREA_MARGIN_X);
    let values = HudValues::from_game(game);
    let accent = to_color(game.settings().palette.body);

    frame.render_widget(
        Paragraph::new(info_line(values, usize::from(hud_area.width), accent))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        hud_area,
    );

    play_area
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}

struct Labels {
    level: &'static str,
    score: &'static str,
    length: &'static str,
    speed: &'static str,
}

const FULL_LABELS: Labels = Labels {
    level: "Level",
    score: "Score",
    length: "Length",
    speed: "Tick",
};

const COMPACT_LABELS: Labels = Labels {
    level: "V",
    score: "S",
    length: "L",
    speed: "T",
};

fn fields(values: HudValues, labels: &Labels) -> [(String, String); 4] {
    [
        (
            labels.level.to_owned(),
            format!("{}/{}", values.level, values.max_level),
        ),
        (
            labels.score.to_owned(),
            format!("{}/{}", values.score, values.threshold),
        ),
        (labels.length.to_owned(), values.length.to_string()),
        (labels.speed.to_owned(), format!("{}ms", values.tick_ms)),
    ]
}

/// Display width of the HUD row for the given labels.
fn info_width(values: HudValues, labels: &Labels) -> usize {
    let sep_width = format!(" {GLYPH_HUD_SEPARATOR} ").width();
    let fields = fields(values, labels);
    let text_width: usize = fields
        .iter()
        .map(|(label, value)| format!("{label}: {value}").width())
        .sum();

    text_width + sep_width * (fields.len() - 1)
}

fn info_line(values: HudValues, available_width: usize, accent: Color) -> Line<'static> {
    let labels = if info_width(values, &FULL_LABELS) > available_width {
        &COMPACT_LABELS
    } else {
        &FULL_LABELS
    };

    let value_style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    for (index, (label, value)) in fields(values, labels).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(format!(" {GLYPH_HUD_SEPARATOR} ")));
        }
        spans.push(Span::raw(format!("{label}: ")));
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}
