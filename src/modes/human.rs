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
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::game::GameEngine;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{MenuView, Renderer};

/// Which screen the shell is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu { selected: usize },
    Playing,
}

/// Keyboard-driven terminal front end around a `GameEngine`
pub struct HumanMode {
    engine: GameEngine,
    screen: Screen,
    paused: bool,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    /// Start on the level menu
    pub fn with_menu(engine: GameEngine) -> Self {
        let selected = Self::level_index(&engine);
        Self::build(engine, Screen::Menu { selected })
    }

    /// Start playing the engine's current level right away
    pub fn playing(engine: GameEngine) -> Self {
        Self::build(engine, Screen::Playing)
    }

    fn build(engine: GameEngine, screen: Screen) -> Self {
        Self {
            engine,
            screen,
            paused: false,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    fn level_index(engine: &GameEngine) -> usize {
        let current = engine.level().name.as_str();
        engine
            .board()
            .level_names()
            .position(|name| name == current)
            .unwrap_or(0)
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

    fn tick_timer(period: Duration) -> Interval {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks at the level's pace
        let mut tick_timer = Self::tick_timer(self.engine.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => log::warn!("Failed to read terminal event: {}", err),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| self.draw(frame)).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // A different level may have been picked
            if tick_timer.period() != self.engine.tick_interval() {
                tick_timer = Self::tick_timer(self.engine.tick_interval());
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        match self.screen {
            Screen::Menu { selected } => {
                let menu = MenuView {
                    levels: &self.engine.board().levels,
                    selected,
                    high_score: self.engine.high_score(),
                    games_played: self.metrics.games_played,
                    food_eaten: self.metrics.food_eaten,
                };
                self.renderer.render_menu(frame, &menu);
            }
            Screen::Playing => {
                let bounds = self.engine.board().bounds();
                self.renderer.render(
                    frame,
                    &self.engine.snapshot(),
                    &bounds,
                    &self.metrics,
                    self.paused,
                );
            }
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.screen {
                Screen::Menu { selected } => {
                    let action = self.input_handler.handle_menu_key_event(key);
                    self.handle_menu_action(action, selected)?;
                }
                Screen::Playing => {
                    let action = self.input_handler.handle_key_event(key);
                    self.handle_game_action(action)?;
                }
            }
        }

        Ok(())
    }

    fn handle_menu_action(&mut self, action: KeyAction, selected: usize) -> Result<()> {
        let level_count = self.engine.board().levels.len();

        match action {
            KeyAction::MenuUp => {
                let selected = (selected + level_count - 1) % level_count;
                self.screen = Screen::Menu { selected };
            }
            KeyAction::MenuDown => {
                let selected = (selected + 1) % level_count;
                self.screen = Screen::Menu { selected };
            }
            KeyAction::Confirm => self.start_level(selected)?,
            KeyAction::SelectLevel(number) if (1..=level_count).contains(&number) => {
                self.start_level(number - 1)?
            }
            KeyAction::Quit => self.should_quit = true,
            _ => {}
        }

        Ok(())
    }

    fn handle_game_action(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::Turn(direction) => {
                if !self.paused {
                    // Reversals are dropped by the engine
                    self.engine.set_pending_direction(direction);
                }
            }
            KeyAction::Pause => self.toggle_pause(),
            KeyAction::Restart => {
                let level = self.engine.level().name.clone();
                self.reset_game(&level)?;
            }
            KeyAction::Menu => {
                self.paused = false;
                self.metrics.stop_clock();
                self.screen = Screen::Menu {
                    selected: Self::level_index(&self.engine),
                };
            }
            KeyAction::Quit => self.should_quit = true,
            _ => {}
        }

        Ok(())
    }

    fn toggle_pause(&mut self) {
        if self.engine.is_terminal() {
            return;
        }
        self.paused = !self.paused;
        if self.paused {
            self.metrics.stop_clock();
        } else {
            self.metrics.resume_clock();
        }
        log::debug!("Paused: {}", self.paused);
    }

    fn start_level(&mut self, index: usize) -> Result<()> {
        let level = self
            .engine
            .board()
            .levels
            .get(index)
            .map(|level| level.name.clone())
            .context("Selected level does not exist")?;
        self.reset_game(&level)?;
        self.screen = Screen::Playing;
        Ok(())
    }

    fn update_game(&mut self) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }

        let result = self.engine.step();

        // Reported by the ending tick only
        if result.info.end_reason.is_some() {
            self.metrics.on_game_over(result.snapshot.score);
        }
    }

    fn reset_game(&mut self, level: &str) -> Result<()> {
        self.engine.reset(level)?;
        self.paused = false;
        self.metrics.on_game_start();
        Ok(())
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
