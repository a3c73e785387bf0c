//! Board and level configuration
//!
//! Boards are described in pixels, the way a canvas-based front end lays them
//! out, and converted to grid cells on load. Every length and coordinate must be
//! an exact multiple of `cell_size`.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::state::{Bounds, Position};

/// Shortest accepted tick interval
pub const MIN_TICK_INTERVAL_MS: u64 = 20;
/// Longest accepted tick interval
pub const MAX_TICK_INTERVAL_MS: u64 = 2000;

const MIN_COLUMNS: i32 = 4;
const MIN_PLAYABLE_ROWS: i32 = 2;

/// One difficulty level: its speed and its obstacle layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Name shown in the level menu and accepted by `--level`
    pub name: String,
    /// Delay between two ticks
    pub tick_interval_ms: u64,
    /// Obstacle top-left corners in pixels
    #[serde(default)]
    pub obstacles: Vec<[i32; 2]>,
}

impl LevelConfig {
    pub fn new(name: &str, tick_interval_ms: u64, obstacles: Vec<[i32; 2]>) -> Self {
        Self {
            name: name.to_string(),
            tick_interval_ms,
            obstacles,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Board description loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Board width in pixels
    pub board_width: i32,
    /// Board height in pixels, header band included
    pub board_height: i32,
    /// Side of one square cell in pixels
    pub cell_size: i32,
    /// Height of the score band at the top of the board, in pixels
    #[serde(default)]
    pub header_height: i32,
    /// Levels in menu order
    pub levels: Vec<LevelConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_width: 800,
            board_height: 840,
            cell_size: 40,
            header_height: 40,
            levels: vec![
                LevelConfig::new("easy", 150, Vec::new()),
                LevelConfig::new(
                    "normal",
                    130,
                    vec![[400, 200], [400, 240], [400, 280], [400, 600], [400, 640], [400, 680]],
                ),
                LevelConfig::new(
                    "hard",
                    110,
                    vec![
                        [160, 200], [200, 200], [240, 200], [280, 200],
                        [520, 200], [560, 200], [600, 200], [640, 200],
                        [160, 680], [200, 680], [240, 680], [280, 680],
                        [520, 680], [560, 680], [600, 680], [640, 680],
                        [400, 360], [400, 400], [400, 440], [400, 480],
                    ],
                ),
            ],
        }
    }
}

impl BoardConfig {
    /// An obstacle-free board of `columns` x `rows` cells with a single level
    pub fn open(columns: i32, rows: i32) -> Self {
        Self {
            board_width: columns,
            board_height: rows,
            cell_size: 1,
            header_height: 0,
            levels: vec![LevelConfig::new("open", 130, Vec::new())],
        }
    }

    /// Read, parse and validate a JSON board file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board file {:?}", path))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid board file {:?}", path))
    }

    /// Parse and validate a JSON board description
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: BoardConfig =
            serde_json::from_str(content).context("Failed to parse board description")?;
        config.validate()?;
        Ok(config)
    }

    pub fn columns(&self) -> i32 {
        self.board_width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.board_height / self.cell_size
    }

    pub fn header_rows(&self) -> i32 {
        self.header_height / self.cell_size
    }

    /// Playable area in cell units
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.columns(), self.rows(), self.header_rows())
    }

    pub fn level(&self, name: &str) -> Option<&LevelConfig> {
        self.levels.iter().find(|level| level.name == name)
    }

    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|level| level.name.as_str())
    }

    /// Obstacles of `level` converted to grid cells
    pub fn obstacle_cells(&self, level: &LevelConfig) -> HashSet<Position> {
        level
            .obstacles
            .iter()
            .map(|[x, y]| Position::new(x / self.cell_size, y / self.cell_size))
            .collect()
    }

    /// Canonical two-cell starting body: head first, facing right, on the middle playable row
    pub fn spawn_cells(&self) -> [Position; 2] {
        let bounds = self.bounds();
        let head = Position::new(
            (bounds.width / 4).max(1),
            bounds.min_row + bounds.playable_rows() / 2,
        );
        [head, head.moved_in_direction(Direction::Left)]
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.cell_size > 0, "cell_size must be positive, got {}", self.cell_size);

        for (field, value) in [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("header_height", self.header_height),
        ] {
            ensure!(value >= 0, "{} must not be negative, got {}", field, value);
            ensure!(
                value % self.cell_size == 0,
                "{} ({}) is not a multiple of cell_size ({})",
                field,
                value,
                self.cell_size
            );
        }

        let bounds = self.bounds();
        ensure!(
            bounds.width >= MIN_COLUMNS,
            "board must be at least {} cells wide, got {}",
            MIN_COLUMNS,
            bounds.width
        );
        ensure!(
            bounds.playable_rows() >= MIN_PLAYABLE_ROWS,
            "board must have at least {} playable rows below the header, got {}",
            MIN_PLAYABLE_ROWS,
            bounds.playable_rows()
        );

        ensure!(!self.levels.is_empty(), "board defines no levels");

        let spawn = self.spawn_cells();
        let mut names = HashSet::new();
        for level in &self.levels {
            ensure!(!level.name.trim().is_empty(), "level names must not be empty");
            ensure!(
                names.insert(level.name.as_str()),
                "level '{}' is defined more than once",
                level.name
            );
            ensure!(
                (MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&level.tick_interval_ms),
                "level '{}': tick_interval_ms must be in {}..={}, got {}",
                level.name,
                MIN_TICK_INTERVAL_MS,
                MAX_TICK_INTERVAL_MS,
                level.tick_interval_ms
            );

            for [x, y] in &level.obstacles {
                if x % self.cell_size != 0 || y % self.cell_size != 0 {
                    bail!(
                        "level '{}': obstacle ({}, {}) is not aligned to cell_size {}",
                        level.name,
                        x,
                        y,
                        self.cell_size
                    );
                }
                let cell = Position::new(x / self.cell_size, y / self.cell_size);
                ensure!(
                    bounds.contains(cell),
                    "level '{}': obstacle ({}, {}) lies outside the playable area",
                    level.name,
                    x,
                    y
                );
                ensure!(
                    !spawn.contains(&cell),
                    "level '{}': obstacle ({}, {}) covers the snake spawn",
                    level.name,
                    x,
                    y
                );
            }

            let blocked = self.obstacle_cells(level).len() + spawn.len();
            ensure!(
                blocked < bounds.cell_count(),
                "level '{}' leaves no free cell for food",
                level.name
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "board_width": 400,
        "board_height": 440,
        "cell_size": 40,
        "header_height": 40,
        "levels": [
            { "name": "easy", "tick_interval_ms": 150 },
            { "name": "hard", "tick_interval_ms": 110, "obstacles": [[0, 40], [360, 400]] }
        ]
    }"#;

    #[test]
    fn test_default_config_is_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns(), 20);
        assert_eq!(config.rows(), 21);
        assert_eq!(config.header_rows(), 1);
        let names: Vec<_> = config.level_names().collect();
        assert_eq!(names, vec!["easy", "normal", "hard"]);
    }

    #[test]
    fn test_open_board() {
        let config = BoardConfig::open(20, 20);
        assert!(config.validate().is_ok());
        assert_eq!(config.bounds(), Bounds::new(20, 20, 0));
        assert_eq!(config.spawn_cells(), [Position::new(5, 10), Position::new(4, 10)]);
    }

    #[test]
    fn test_parse_sample() {
        let config = BoardConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.bounds(), Bounds::new(10, 11, 1));

        let hard = config.level("hard").unwrap();
        assert_eq!(hard.tick_interval(), Duration::from_millis(110));
        let obstacles = config.obstacle_cells(hard);
        assert!(obstacles.contains(&Position::new(0, 1)));
        assert!(obstacles.contains(&Position::new(9, 10)));

        assert!(config.level("easy").unwrap().obstacles.is_empty());
        assert!(config.level("missing").is_none());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let err = BoardConfig::from_json_str(r#"{ "board_width": 400, "cell_size": 40, "levels": [] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_non_integer_coordinates_are_rejected() {
        let json = r#"{
            "board_width": 400, "board_height": 400, "cell_size": 40,
            "levels": [{ "name": "x", "tick_interval_ms": 100, "obstacles": [[40.5, 80]] }]
        }"#;
        assert!(BoardConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let json = r#"{
            "board_width": 400, "board_height": 400, "cell_size": 40, "speed": 3,
            "levels": [{ "name": "x", "tick_interval_ms": 100 }]
        }"#;
        assert!(BoardConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_misaligned_obstacle_is_rejected() {
        let mut config = BoardConfig::default();
        config.levels[0].obstacles.push([41, 80]);
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("not aligned"), "{}", message);
    }

    #[test]
    fn test_obstacle_in_header_is_rejected() {
        let mut config = BoardConfig::default();
        config.levels[0].obstacles.push([80, 0]);
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("outside"), "{}", message);
    }

    #[test]
    fn test_obstacle_on_spawn_is_rejected() {
        let mut config = BoardConfig::open(10, 10);
        let [head, _] = config.spawn_cells();
        config.levels[0].obstacles.push([head.x, head.y]);
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("spawn"), "{}", message);
    }

    #[test]
    fn test_misaligned_board_is_rejected() {
        let mut config = BoardConfig::default();
        config.board_width = 810;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_interval_range() {
        let mut config = BoardConfig::open(10, 10);
        config.levels[0].tick_interval_ms = 5;
        assert!(config.validate().is_err());
        config.levels[0].tick_interval_ms = MAX_TICK_INTERVAL_MS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_levels_are_rejected() {
        let mut config = BoardConfig::open(10, 10);
        config.levels.push(LevelConfig::new("open", 100, Vec::new()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_levels_is_rejected() {
        let mut config = BoardConfig::open(10, 10);
        config.levels.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_board_without_room_for_food_is_rejected() {
        let mut config = BoardConfig::open(4, 2);
        let spawn = config.spawn_cells();
        let obstacles = config
            .bounds()
            .cells()
            .filter(|cell| !spawn.contains(cell))
            .map(|cell| [cell.x, cell.y])
            .collect();
        config.levels[0].obstacles = obstacles;
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("no free cell"), "{}", message);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = BoardConfig::load(file.path()).unwrap();
        assert_eq!(config.levels.len(), 2);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = BoardConfig::load(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_bundled_board_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("boards/classic.json");
        let config = BoardConfig::load(&path).unwrap();
        assert!(config.level("easy").is_some());
    }
}
