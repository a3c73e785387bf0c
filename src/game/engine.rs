use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use super::{
    config::{BoardConfig, LevelConfig},
    direction::Direction,
    food,
    rules::{self, TickOutcome},
    state::{EndReason, GameState, GameStatus, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the head moved this step
    pub moved: bool,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set only on the step that ended the session
    pub end_reason: Option<EndReason>,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    /// Obstacles of the active level, sorted row-major
    pub obstacles: Vec<Position>,
    pub score: u32,
    pub high_score: u32,
    pub terminal: bool,
    pub end_reason: Option<EndReason>,
    pub heading: Option<Direction>,
    pub level: String,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session is over after this step
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
    pub snapshot: Snapshot,
}

/// One play session on a board: the only thing a front end drives.
///
/// Input only latches a pending direction; `step` consumes it at the tick
/// boundary, so two key presses between ticks can never add up to a reversal.
pub struct GameEngine {
    board: BoardConfig,
    level: LevelConfig,
    state: GameState,
    pending_direction: Option<Direction>,
    high_score: u32,
    rng: StdRng,
}

impl GameEngine {
    /// Start a session on `level` with an entropy-seeded food generator
    pub fn new(board: BoardConfig, level: &str) -> Result<Self> {
        Self::with_rng(board, level, StdRng::from_entropy())
    }

    /// Start a session whose food placement is reproducible
    pub fn with_seed(board: BoardConfig, level: &str, seed: u64) -> Result<Self> {
        Self::with_rng(board, level, StdRng::seed_from_u64(seed))
    }

    fn with_rng(board: BoardConfig, level: &str, mut rng: StdRng) -> Result<Self> {
        board.validate()?;
        let level = Self::find_level(&board, level)?;
        let state = Self::fresh_state(&board, &level, &mut rng)?;
        log::info!("Session started on level '{}'", level.name);

        Ok(Self {
            board,
            level,
            state,
            pending_direction: None,
            high_score: 0,
            rng,
        })
    }

    fn find_level(board: &BoardConfig, name: &str) -> Result<LevelConfig> {
        board.level(name).cloned().with_context(|| {
            let known: Vec<_> = board.level_names().collect();
            format!("Unknown level '{}' (available: {})", name, known.join(", "))
        })
    }

    fn fresh_state(board: &BoardConfig, level: &LevelConfig, rng: &mut StdRng) -> Result<GameState> {
        let [head, tail] = board.spawn_cells();
        let snake = Snake::from_cells(vec![head, tail], None)
            .context("Spawn must provide two cells")?;
        let obstacles = board.obstacle_cells(level);
        let bounds = board.bounds();

        let mut state = GameState::new(snake, None, obstacles, bounds);
        let food = food::place(rng, &bounds, &state.occupied_cells())
            .with_context(|| format!("Level '{}' has no free cell for food", level.name))?;
        state.food = Some(food);
        Ok(state)
    }

    /// Start a new session on `level`, keeping the high score.
    ///
    /// An unknown level is an error and leaves the current session untouched.
    pub fn reset(&mut self, level: &str) -> Result<()> {
        let level = Self::find_level(&self.board, level)?;
        self.state = Self::fresh_state(&self.board, &level, &mut self.rng)?;
        self.level = level;
        self.pending_direction = None;
        log::info!(
            "Session reset on level '{}' (high score {})",
            self.level.name,
            self.high_score
        );
        Ok(())
    }

    /// Latch `direction` for the next tick.
    ///
    /// Returns false, changing nothing, when it would reverse the snake or the
    /// session is already over.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if self.state.status.is_terminal() || !rules::accepts_turn(&self.state.snake, direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Execute one tick of the game
    pub fn step(&mut self) -> StepResult {
        if self.state.status.is_terminal() {
            return self.result(StepInfo::default());
        }

        if let Some(direction) = self.pending_direction.take()
            && rules::accepts_turn(&self.state.snake, direction)
        {
            self.state.snake.heading = Some(direction);
        }

        // Nothing moves until the player picks a first direction
        let Some(direction) = self.state.snake.heading else {
            return self.result(StepInfo::default());
        };

        let next_head = rules::next_head(&self.state.snake, direction);
        let outcome = rules::classify(
            next_head,
            &self.state.snake,
            &self.state.obstacles,
            &self.state.bounds,
            self.state.food,
        );
        self.state.steps += 1;

        let info = match outcome {
            TickOutcome::GameOver(reason) => {
                self.finish(reason);
                StepInfo {
                    moved: false,
                    ate_food: false,
                    end_reason: Some(reason),
                }
            }
            TickOutcome::Move { eaten } => {
                self.state.snake.advance(next_head, eaten);

                let mut end_reason = None;
                if eaten {
                    self.state.score += 1;
                    self.high_score = self.high_score.max(self.state.score);
                    self.state.food =
                        food::place(&mut self.rng, &self.state.bounds, &self.state.occupied_cells());
                    if self.state.food.is_none() {
                        self.finish(EndReason::BoardFilled);
                        end_reason = Some(EndReason::BoardFilled);
                    }
                }

                StepInfo {
                    moved: true,
                    ate_food: eaten,
                    end_reason,
                }
            }
        };

        self.result(info)
    }

    fn finish(&mut self, reason: EndReason) {
        self.state.status = GameStatus::GameOver(reason);
        self.pending_direction = None;
        log::info!(
            "Game over on level '{}': {} after {} steps, score {} (high score {})",
            self.level.name,
            reason.describe(),
            self.state.steps,
            self.state.score,
            self.high_score
        );
    }

    fn result(&self, info: StepInfo) -> StepResult {
        StepResult {
            terminated: self.state.status.is_terminal(),
            info,
            snapshot: self.snapshot(),
        }
    }

    /// Current state in render-ready form
    pub fn snapshot(&self) -> Snapshot {
        let mut obstacles: Vec<_> = self.state.obstacles.iter().copied().collect();
        obstacles.sort_by_key(|pos| (pos.y, pos.x));

        Snapshot {
            snake: self.state.snake.cells().to_vec(),
            food: self.state.food,
            obstacles,
            score: self.state.score,
            high_score: self.high_score,
            terminal: self.state.status.is_terminal(),
            end_reason: self.state.status.end_reason(),
            heading: self.state.snake.heading,
            level: self.level.name.clone(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn tick_interval(&self) -> Duration {
        self.level.tick_interval()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn is_terminal(&self) -> bool {
        self.state.status.is_terminal()
    }
}
