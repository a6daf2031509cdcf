use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::grid::footprint;
use crate::game::{CollisionType, Outcome, Position, RivalPalette, Snapshot, Status};
use crate::metrics::GameMetrics;

/// What a single grid cell shows, topmost entity first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    PlayerHead,
    PlayerBody,
    RivalHead(RivalPalette),
    RivalBody(RivalPalette),
    Obstacle,
    Food,
    BigFood,
    SlowFood,
}

impl Cell {
    fn span(self) -> Span<'static> {
        match self {
            Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
            Cell::PlayerHead => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::PlayerBody => Span::styled("□ ", Style::default().fg(Color::Green)),
            Cell::RivalHead(palette) => Span::styled(
                "■ ",
                Style::default()
                    .fg(rgb(palette.head))
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::RivalBody(palette) => Span::styled("□ ", Style::default().fg(rgb(palette.body))),
            Cell::Obstacle => Span::styled("▓▓", Style::default().fg(Color::Gray)),
            Cell::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Cell::BigFood => Span::styled(
                "@@",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::SlowFood => Span::styled(
                "S ",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

/// Row-major cell map of a snapshot; snakes are drawn over food and obstacles
pub fn cells(snapshot: &Snapshot) -> Vec<Cell> {
    let size = snapshot.grid_size.max(0);
    let mut cells = vec![Cell::Empty; (size * size) as usize];
    let mut put = |pos: Position, cell: Cell| {
        if pos.x >= 0 && pos.y >= 0 && pos.x < size && pos.y < size {
            cells[(pos.y * size + pos.x) as usize] = cell;
        }
    };

    for obstacle in snapshot.obstacles {
        put(obstacle.position, Cell::Obstacle);
    }
    for food in snapshot.foods {
        put(food.position, Cell::Food);
    }
    if let Some(anchor) = snapshot.big_food {
        for pos in footprint(anchor) {
            put(pos, Cell::BigFood);
        }
    }
    if let Some(pos) = snapshot.slow_food {
        put(pos, Cell::SlowFood);
    }
    for rival in snapshot.rivals {
        for &pos in rival.body().iter().skip(1) {
            put(pos, Cell::RivalBody(rival.palette));
        }
        put(rival.head(), Cell::RivalHead(rival.palette));
    }
    for &pos in snapshot.player.body().iter().skip(1) {
        put(pos, Cell::PlayerBody);
    }
    put(snapshot.player.head(), Cell::PlayerHead);

    cells
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame. `banner` is shown over the board during intermissions.
    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        banner: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.status {
            Status::Ready if banner.is_none() => {
                frame.render_widget(self.render_ready(snapshot), game_area);
            }
            Status::Ended(outcome) => {
                frame.render_widget(self.render_game_over(snapshot, outcome, metrics), game_area);
            }
            _ => {
                let title = match (banner, snapshot.status) {
                    (Some(text), _) => format!(" {text} "),
                    (None, Status::Paused) => " PAUSED ".to_string(),
                    _ => " Snake ".to_string(),
                };
                frame.render_widget(self.render_grid(snapshot, title), game_area);
            }
        }

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, title: String) -> Paragraph<'_> {
        let size = snapshot.grid_size.max(0) as usize;
        let cells = cells(snapshot);
        let lines: Vec<Line> = cells
            .chunks(size.max(1))
            .map(|row| Line::from(row.iter().map(|cell| cell.span()).collect::<Vec<_>>()))
            .collect();

        let border = if snapshot.status == Status::Paused {
            Color::Yellow
        } else {
            Color::White
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, _area: Rect, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);
        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(
                format!("{} ({}/{})", snapshot.level, snapshot.score, snapshot.target_score),
                value,
            ),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(snapshot.tick_rate.to_string(), value),
            Span::raw("    "),
            Span::styled("High: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Plays: ", label),
            Span::styled(metrics.play_count.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_ready(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                format!("LEVEL {}", snapshot.level),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Reach ", Style::default().fg(Color::Gray)),
                Span::styled(
                    snapshot.target_score.to_string(),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(" points", Style::default().fg(Color::Gray)),
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
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
    }

    fn render_game_over(
        &self,
        snapshot: &Snapshot,
        outcome: Outcome,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let (headline, color, detail) = match outcome {
            Outcome::Won => ("YOU WIN", Color::Green, "Target score reached"),
            Outcome::Lost(CollisionType::SelfCollision) => {
                ("GAME OVER", Color::Red, "You ran into yourself")
            }
            Outcome::Lost(CollisionType::Obstacle) => ("GAME OVER", Color::Red, "You hit an obstacle"),
            Outcome::Lost(CollisionType::Rival) => ("GAME OVER", Color::Red, "You hit a rival"),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(detail, Style::default().fg(Color::Gray))),
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
                Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
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
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
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

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" start | "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" pause | "),
            Span::styled("O", Style::default().fg(Color::Magenta)),
            Span::raw(" restart | "),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Entities, GameState, PlayerSnake, Rival};
    use crate::game::state::Session;
    use ratatui::{Terminal, backend::TestBackend};

    fn state() -> GameState {
        let player = PlayerSnake::new(Position::new(5, 5), Direction::Right, 3);
        let mut entities = Entities::new(10, player);
        entities.add_obstacle(Position::new(1, 1));
        entities.add_food(Position::new(8, 8), 10);
        entities.set_big_food(Position::new(0, 8));
        entities.set_slow_food(Position::new(9, 0));
        entities.add_rival(Rival::new(1, Position::new(7, 2), Direction::Down, 2));
        GameState::new(Session::new(1, 100, 4), entities)
    }

    fn at(cells: &[Cell], x: i32, y: i32) -> Cell {
        cells[(y * 10 + x) as usize]
    }

    #[test]
    fn test_cell_map() {
        let state = state();
        let cells = cells(&state.snapshot());
        let palette = RivalPalette::for_id(1);

        assert_eq!(at(&cells, 5, 5), Cell::PlayerHead);
        assert_eq!(at(&cells, 3, 5), Cell::PlayerBody);
        assert_eq!(at(&cells, 7, 2), Cell::RivalHead(palette));
        assert_eq!(at(&cells, 7, 1), Cell::RivalBody(palette));
        assert_eq!(at(&cells, 1, 1), Cell::Obstacle);
        assert_eq!(at(&cells, 8, 8), Cell::Food);
        assert_eq!(at(&cells, 1, 9), Cell::BigFood);
        assert_eq!(at(&cells, 9, 0), Cell::SlowFood);
        assert_eq!(at(&cells, 4, 4), Cell::Empty);
    }

    #[test]
    fn test_renders_overlays() {
        let mut state = state();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        let screen = |terminal: &Terminal<TestBackend>| {
            let buffer = terminal.backend().buffer();
            buffer
                .content()
                .iter()
                .map(|cell| cell.symbol())
                .collect::<String>()
        };

        terminal
            .draw(|frame| renderer.render(frame, &state.snapshot(), &metrics, None))
            .unwrap();
        assert!(screen(&terminal).contains("to start"));

        state.session.status = Status::Paused;
        terminal
            .draw(|frame| renderer.render(frame, &state.snapshot(), &metrics, None))
            .unwrap();
        assert!(screen(&terminal).contains("PAUSED"));

        state.session.status = Status::Ended(Outcome::Lost(CollisionType::Obstacle));
        terminal
            .draw(|frame| renderer.render(frame, &state.snapshot(), &metrics, None))
            .unwrap();
        assert!(screen(&terminal).contains("GAME OVER"));
    }
}
