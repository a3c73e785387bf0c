use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Bounds, EndReason, LevelConfig, Position, Snapshot};
use crate::metrics::GameMetrics;

/// What the level menu needs to draw itself
pub struct MenuView<'a> {
    pub levels: &'a [LevelConfig],
    pub selected: usize,
    pub high_score: u32,
    pub games_played: u32,
    pub food_eaten: u32,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        bounds: &Bounds,
        metrics: &GameMetrics,
        paused: bool,
    ) {
        let chunks = Self::split_screen(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(snapshot, metrics, paused);
        frame.render_widget(stats, chunks[0]);

        let game_area = Self::center_column(chunks[1]);

        // Render game grid or game over screen
        if snapshot.terminal {
            let game_over = self.render_game_over(snapshot);
            frame.render_widget(game_over, game_area);
        } else {
            let grid = self.render_grid(snapshot, bounds);
            frame.render_widget(grid, game_area);
        }

        // Render footer with controls
        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    pub fn render_menu(&self, frame: &mut Frame, menu: &MenuView) {
        let chunks = Self::split_screen(frame.area());

        let title = Paragraph::new(vec![Line::from(vec![
            Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(menu.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(menu.games_played.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Food eaten: ", Style::default().fg(Color::Yellow)),
            Span::styled(menu.food_eaten.to_string(), Style::default().fg(Color::White)),
        ])])
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let mut lines = vec![Line::from("")];
        for (index, level) in menu.levels.iter().enumerate() {
            let selected = index == menu.selected;
            let marker = if selected { "▶ " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{}{}. {}", marker, index + 1, level.name), style),
                Span::styled(
                    format!(
                        "  ({} ms/tick, {} obstacles)",
                        level.tick_interval_ms,
                        level.obstacles.len()
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        let list = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Choose a level "),
        );
        frame.render_widget(list, Self::center_column(chunks[1]));

        let help = Paragraph::new(vec![Line::from(vec![
            Span::styled("↑↓", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("1-9", Style::default().fg(Color::Cyan)),
            Span::raw(" to choose | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" to start | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])])
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }

    fn split_screen(area: Rect) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(area)
            .to_vec()
    }

    fn center_column(area: Rect) -> Rect {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(area)[1]
    }

    fn render_grid(&self, snapshot: &Snapshot, bounds: &Bounds) -> Paragraph<'_> {
        let body: HashSet<Position> = snapshot.snake.iter().copied().collect();
        let obstacles: HashSet<Position> = snapshot.obstacles.iter().copied().collect();
        let head = snapshot.snake.first().copied();

        let mut lines = Vec::new();

        for y in bounds.min_row..bounds.height {
            let mut spans = Vec::new();

            for x in 0..bounds.width {
                let pos = Position::new(x, y);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if obstacles.contains(&pos) {
                    Span::styled("▓ ", Style::default().fg(Color::Gray))
                } else if Some(pos) == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(format!(" Snake · {} ", snapshot.level)),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics, paused: bool) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(snapshot.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(snapshot.snake.len().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        if paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if snapshot.heading.is_none() && !snapshot.terminal {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "press a direction to start",
                Style::default().fg(Color::Gray),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let (title, color) = match snapshot.end_reason {
            Some(EndReason::BoardFilled) => ("YOU WIN", Color::Green),
            _ => ("GAME OVER", Color::Red),
        };
        let reason = snapshot
            .end_reason
            .map(|reason| format!("The snake {}", reason.describe()))
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![Span::styled(reason, Style::default().fg(Color::Gray))]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "M",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for levels or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Magenta)),
            Span::raw(" to pause | "),
            Span::styled("M", Style::default().fg(Color::Cyan)),
            Span::raw(" for levels | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
