//! Tick classification and turn validation.
//!
//! Everything here is pure: callers own the state and apply the outcome.

use std::collections::HashSet;

use super::direction::Direction;
use super::state::{Bounds, EndReason, Position, Snake};

/// What a single tick does to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The head moves to the proposed cell
    Move { eaten: bool },
    /// The session ends; nothing moves
    GameOver(EndReason),
}

/// Cell the head would occupy after one step in `direction`
pub fn next_head(snake: &Snake, direction: Direction) -> Position {
    snake.head().moved_in_direction(direction)
}

/// Classify the move of the head onto `next_head`.
///
/// Checks run in order wall, self, obstacle. Self-collision is strict: every
/// segment behind the head counts, including the tail that a plain move
/// would vacate.
pub fn classify(
    next_head: Position,
    snake: &Snake,
    obstacles: &HashSet<Position>,
    bounds: &Bounds,
    food: Option<Position>,
) -> TickOutcome {
    if !bounds.contains(next_head) {
        return TickOutcome::GameOver(EndReason::Wall);
    }

    if snake.occupies_excluding_head(next_head) {
        return TickOutcome::GameOver(EndReason::SelfCollision);
    }

    if obstacles.contains(&next_head) {
        return TickOutcome::GameOver(EndReason::Obstacle);
    }

    TickOutcome::Move {
        eaten: food == Some(next_head),
    }
}

/// Whether `requested` may replace the heading of `snake`.
///
/// A reversal is refused. Before the first move the heading is unset and the
/// direction the body points in (neck to head) stands in for it.
pub fn accepts_turn(snake: &Snake, requested: Direction) -> bool {
    if snake.len() < 2 {
        return true;
    }

    match snake.heading.or_else(|| snake.implied_heading()) {
        Some(current) => !current.is_opposite(requested),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(points: &[(i32, i32)]) -> Vec<Position> {
        points.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    fn snake(points: &[(i32, i32)], heading: Direction) -> Snake {
        Snake::from_cells(cells(points), Some(heading)).unwrap()
    }

    #[test]
    fn test_free_move() {
        let snake = snake(&[(5, 10), (6, 10), (7, 10)], Direction::Left);
        let head = next_head(&snake, Direction::Left);
        assert_eq!(head, Position::new(4, 10));

        let outcome = classify(head, &snake, &HashSet::new(), &Bounds::new(20, 20, 0), None);
        assert_eq!(outcome, TickOutcome::Move { eaten: false });
    }

    #[test]
    fn test_eating() {
        let snake = snake(&[(5, 10), (6, 10)], Direction::Left);
        let food = Some(Position::new(4, 10));
        let outcome = classify(
            Position::new(4, 10),
            &snake,
            &HashSet::new(),
            &Bounds::new(20, 20, 0),
            food,
        );
        assert_eq!(outcome, TickOutcome::Move { eaten: true });
    }

    #[test]
    fn test_wall_on_every_side() {
        let bounds = Bounds::new(20, 20, 0);
        let obstacles = HashSet::new();
        let cases = [
            ((0, 10), (1, 10), Direction::Left),
            ((19, 10), (18, 10), Direction::Right),
            ((10, 0), (10, 1), Direction::Up),
            ((10, 19), (10, 18), Direction::Down),
        ];

        for (head, neck, direction) in cases {
            let snake = snake(&[head, neck], direction);
            let outcome = classify(next_head(&snake, direction), &snake, &obstacles, &bounds, None);
            assert_eq!(outcome, TickOutcome::GameOver(EndReason::Wall), "{:?}", direction);
        }
    }

    #[test]
    fn test_header_band_counts_as_wall() {
        let bounds = Bounds::new(20, 20, 2);
        let snake = snake(&[(5, 2), (5, 3)], Direction::Up);
        let outcome = classify(
            next_head(&snake, Direction::Up),
            &snake,
            &HashSet::new(),
            &bounds,
            None,
        );
        assert_eq!(outcome, TickOutcome::GameOver(EndReason::Wall));
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,10) turning up lands on (5,9), which is part of the body
        let snake = snake(
            &[(5, 10), (6, 10), (6, 9), (5, 9), (4, 9)],
            Direction::Left,
        );
        let outcome = classify(
            next_head(&snake, Direction::Up),
            &snake,
            &HashSet::new(),
            &Bounds::new(20, 20, 0),
            None,
        );
        assert_eq!(outcome, TickOutcome::GameOver(EndReason::SelfCollision));
    }

    #[test]
    fn test_moving_into_vacating_tail_is_a_collision() {
        // A 2x2 loop: the head chases the tail cell
        let snake = snake(&[(5, 10), (6, 10), (6, 11), (5, 11)], Direction::Left);
        let outcome = classify(
            next_head(&snake, Direction::Down),
            &snake,
            &HashSet::new(),
            &Bounds::new(20, 20, 0),
            None,
        );
        assert_eq!(outcome, TickOutcome::GameOver(EndReason::SelfCollision));
    }

    #[test]
    fn test_obstacle_collision() {
        let snake = snake(&[(5, 10), (6, 10)], Direction::Left);
        let obstacles: HashSet<_> = cells(&[(4, 10)]).into_iter().collect();
        let outcome = classify(
            next_head(&snake, Direction::Left),
            &snake,
            &obstacles,
            &Bounds::new(20, 20, 0),
            Some(Position::new(4, 10)),
        );
        assert_eq!(outcome, TickOutcome::GameOver(EndReason::Obstacle));
    }

    #[test]
    fn test_reverse_turn_rejected() {
        let snake = snake(&[(5, 10), (6, 10)], Direction::Left);
        assert!(!accepts_turn(&snake, Direction::Right));
        assert!(accepts_turn(&snake, Direction::Left));
        assert!(accepts_turn(&snake, Direction::Up));
        assert!(accepts_turn(&snake, Direction::Down));
    }

    #[test]
    fn test_unset_heading_uses_body_orientation() {
        let snake = Snake::new(Position::new(5, 10), Direction::Right, 2);
        assert_eq!(snake.heading, None);
        assert!(!accepts_turn(&snake, Direction::Left));
        assert!(accepts_turn(&snake, Direction::Right));
        assert!(accepts_turn(&snake, Direction::Up));
    }
}
