use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::game::{Action, GameEngine, GameEvent, GameState, Status};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{GameMetrics, StatsStore};
use crate::render::Renderer;
use crate::scheduler::TickScheduler;

/// Pause between levels while the banner is up
pub const INTERMISSION: Duration = Duration::from_secs(2);

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    store: StatsStore,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Level banner, shown until the first tick after the intermission
    banner: Option<String>,
}

impl HumanMode {
    /// Lay out level 1 and load the stored stats
    pub fn new(mut engine: GameEngine, store: StatsStore) -> Result<Self> {
        let state = engine.reset();
        let stats = store.load()?;
        info!(
            high_score = stats.high_score,
            play_count = stats.play_count,
            "stats loaded"
        );

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::from_stats(stats),
            store,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            banner: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut scheduler = TickScheduler::new(self.state.session.tick_rate);
        self.sync_scheduler(&mut scheduler);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut scheduler);
                    }
                }

                // Game logic tick
                _ = scheduler.tick() => {
                    self.update_game(&mut scheduler);
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.state.is_running() {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            &self.state.snapshot(),
                            &self.metrics,
                            self.banner.as_deref(),
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, scheduler: &mut TickScheduler) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::GameAction(action) => self.apply_action(action, scheduler),
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn apply_action(&mut self, action: Action, scheduler: &mut TickScheduler) {
        let was_ended = self.state.is_ended();
        let was_ready = self.state.session.status == Status::Ready;
        if !self.engine.apply(&mut self.state, action) {
            return;
        }

        match action {
            Action::Start if was_ready || was_ended => self.metrics.on_game_start(),
            Action::Restart => self.banner = None,
            _ => {}
        }
        self.sync_scheduler(scheduler);
    }

    fn update_game(&mut self, scheduler: &mut TickScheduler) {
        self.banner = None;
        let result = self.engine.step(&mut self.state);
        self.metrics.on_score(self.state.session.score);

        for event in &result.events {
            match *event {
                GameEvent::LevelComplete { next_level, score } => {
                    self.metrics.on_score(score);
                    self.banner = Some(format!("LEVEL {next_level}"));
                }
                GameEvent::AllLevelsCleared { score } => {
                    self.metrics.on_score(score);
                    self.banner = Some("ALL LEVELS CLEARED".to_string());
                }
                GameEvent::GameOver { outcome, score } => {
                    self.metrics.on_game_over(score);
                    info!(?outcome, score, best = self.metrics.run_best, "game over");
                    if let Err(err) = self.store.save(&self.metrics.stats()) {
                        warn!(error = %err, "could not save stats");
                    }
                }
                GameEvent::Milestone(milestone) => info!(milestone, "milestone"),
                GameEvent::RivalDecomposed { id, cause, food } => {
                    debug!(id, ?cause, food, "rival turned into food");
                }
                _ => {}
            }
        }

        self.sync_scheduler(scheduler);
        if result.info.level_changed && self.state.is_running() {
            scheduler.delay(INTERMISSION);
        }
    }

    /// Match the timer to the session: ticking only while running, at its rate
    fn sync_scheduler(&self, scheduler: &mut TickScheduler) {
        scheduler.set_rate(self.state.session.tick_rate);
        if self.state.is_running() {
            scheduler.resume();
        } else {
            scheduler.pause();
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
