use std::time::Duration;

use super::types::{Direction, FieldSize, Point};

pub const GRID_SIZE: usize = 20;
pub const SCORE_PER_FOOD: u32 = 10;
pub const INITIAL_SNAKE: [Point; 5] = [
    Point::new(10, 10),
    Point::new(10, 11),
    Point::new(10, 12),
    Point::new(10, 13),
    Point::new(10, 14),
];
pub const INITIAL_SNAKE_LENGTH: usize = INITIAL_SNAKE.len();
pub const INITIAL_FOOD: Point = Point::new(15, 15);
pub const INITIAL_DIRECTION: Direction = Direction::Up;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(150);
pub const DEFAULT_FOOD_PLACEMENT_ATTEMPTS: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeSessionSettings {
    pub tick_interval: Duration,
    /// Random draws before food placement falls back to a full scan.
    pub food_placement_attempts: usize,
    pub seed: Option<u64>,
    /// Let the bot steer before every tick.
    pub autopilot: bool,
}

impl SnakeSessionSettings {
    pub fn field_size(&self) -> FieldSize {
        FieldSize::square(GRID_SIZE)
    }
}

impl Default for SnakeSessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            food_placement_attempts: DEFAULT_FOOD_PLACEMENT_ATTEMPTS,
            seed: None,
            autopilot: false,
        }
    }
}
