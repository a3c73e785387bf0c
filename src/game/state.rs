use std::collections::HashSet;

use super::direction::Direction;

/// A cell on the game grid, in (column, row) units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Playable area of the board.
///
/// Rows above `min_row` belong to the header band and are out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
    pub min_row: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32, min_row: i32) -> Self {
        Self {
            width,
            height,
            min_row,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= self.min_row && pos.y < self.height
    }

    pub fn playable_rows(&self) -> i32 {
        self.height - self.min_row
    }

    /// Number of cells inside the playable area
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.playable_rows().max(0) as usize)
    }

    /// All playable cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min_row..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
    /// Current heading; `None` until the first direction is latched
    pub heading: Option<Direction>,
}

impl Snake {
    /// Create a snake whose head faces `facing`, with `length` segments laid out behind it
    pub fn new(head: Position, facing: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = facing.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length.max(2) {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self {
            body,
            heading: None,
        }
    }

    /// Build a snake from explicit cells, head first.
    ///
    /// Returns `None` when fewer than two cells are given.
    pub fn from_cells(cells: Vec<Position>, heading: Option<Direction>) -> Option<Self> {
        if cells.len() < 2 {
            return None;
        }
        Some(Self {
            body: cells,
            heading,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Segment right behind the head
    pub fn neck(&self) -> Option<Position> {
        self.body.get(1).copied()
    }

    /// Direction from the neck to the head, used while no heading is set
    pub fn implied_heading(&self) -> Option<Direction> {
        let neck = self.neck()?;
        let head = self.head();
        Direction::from_delta(head.x - neck.x, head.y - neck.y)
    }

    /// All cells, head first
    pub fn cells(&self) -> &[Position] {
        &self.body
    }

    /// Check if position is taken by any segment behind the head.
    ///
    /// The tail counts even though a plain move would vacate it this tick.
    pub fn occupies_excluding_head(&self, pos: Position) -> bool {
        self.body[1..].contains(&pos)
    }

    /// Prepend `next_head`, keeping the tail only when `grows` is set
    pub fn advance(&mut self, next_head: Position, grows: bool) {
        self.body.insert(0, next_head);

        if !grows {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Snake left the playable area
    Wall,
    /// Snake ran into its own body
    SelfCollision,
    /// Snake hit an obstacle
    Obstacle,
    /// No free cell was left for food
    BoardFilled,
}

impl EndReason {
    pub fn describe(&self) -> &'static str {
        match self {
            EndReason::Wall => "hit the wall",
            EndReason::SelfCollision => "bit itself",
            EndReason::Obstacle => "crashed into an obstacle",
            EndReason::BoardFilled => "filled the board",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver(EndReason),
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self {
            GameStatus::Running => None,
            GameStatus::GameOver(reason) => Some(*reason),
        }
    }
}

/// Complete state of one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the board has been filled
    pub food: Option<Position>,
    pub obstacles: HashSet<Position>,
    pub bounds: Bounds,
    pub score: u32,
    pub steps: u32,
    pub status: GameStatus,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Option<Position>,
        obstacles: HashSet<Position>,
        bounds: Bounds,
    ) -> Self {
        Self {
            snake,
            food,
            obstacles,
            bounds,
            score: 0,
            steps: 0,
            status: GameStatus::Running,
        }
    }

    /// Cells food must avoid: every snake segment and every obstacle
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.snake
            .cells()
            .iter()
            .copied()
            .chain(self.obstacles.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_in_direction(Direction::Left), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 2);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));
        assert_eq!(snake.heading, None);
        assert_eq!(snake.implied_heading(), Some(Direction::Right));
    }

    #[test]
    fn test_snake_never_shorter_than_two() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 1);
        assert_eq!(snake.len(), 2);
        assert!(Snake::from_cells(vec![Position::new(1, 1)], None).is_none());
    }

    #[test]
    fn test_advance_without_growth() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_advance_with_growth() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        snake.advance(Position::new(6, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_occupies_excluding_head() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(!snake.occupies_excluding_head(Position::new(5, 5))); // head
        assert!(snake.occupies_excluding_head(Position::new(4, 5))); // body
        assert!(snake.occupies_excluding_head(Position::new(3, 5))); // tail
        assert!(!snake.occupies_excluding_head(Position::new(10, 10))); // empty
    }

    #[test]
    fn test_bounds_checking() {
        let bounds = Bounds::new(20, 20, 0);
        assert!(bounds.contains(Position::new(0, 0)));
        assert!(bounds.contains(Position::new(19, 19)));
        assert!(!bounds.contains(Position::new(-1, 0)));
        assert!(!bounds.contains(Position::new(20, 0)));
        assert!(!bounds.contains(Position::new(0, 20)));
    }

    #[test]
    fn test_header_band_is_out_of_bounds() {
        let bounds = Bounds::new(10, 10, 2);
        assert!(!bounds.contains(Position::new(3, 1)));
        assert!(bounds.contains(Position::new(3, 2)));
        assert_eq!(bounds.cell_count(), 80);
        assert_eq!(bounds.cells().count(), 80);
        assert_eq!(bounds.cells().next(), Some(Position::new(0, 2)));
    }
}
