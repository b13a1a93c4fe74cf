use crate::games::SessionRng;
use super::game_state::SnakeGameState;
use super::types::{Direction, Point};

/// Greedy autopilot: heads for the food along safe cells.
pub struct BotController;

impl BotController {
    /// Move to feed into `request_direction`, or `None` outside a live run.
    pub fn calculate_move(state: &SnakeGameState, rng: &mut SessionRng) -> Option<Direction> {
        if state.is_terminal() || !state.is_active() {
            return None;
        }

        let current = state.direction();
        let food = state.food();
        let safe_moves: Vec<(Direction, Point)> = Self::get_valid_directions(current)
            .into_iter()
            .filter_map(|dir| Self::safe_target(state, dir).map(|target| (dir, target)))
            .collect();

        let Some(best_distance) = safe_moves
            .iter()
            .map(|(_, target)| target.manhattan_distance(food))
            .min()
        else {
            return Some(current);
        };

        let best: Vec<Direction> = safe_moves
            .iter()
            .filter(|(_, target)| target.manhattan_distance(food) == best_distance)
            .map(|(dir, _)| *dir)
            .collect();

        Some(best[rng.random_index(best.len())])
    }

    fn get_valid_directions(current: Direction) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| *d == current || d.is_perpendicular(&current))
            .collect()
    }

    fn safe_target(state: &SnakeGameState, direction: Direction) -> Option<Point> {
        state
            .head()
            .step(direction, state.field_size())
            .filter(|target| !state.snake().occupies(*target))
    }
}
