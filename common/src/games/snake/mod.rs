mod bot_controller;
mod broadcaster;
mod food;
mod game_state;
mod input;
mod session;
mod settings;
mod snake;
mod types;

pub use bot_controller::BotController;
pub use broadcaster::{GameBroadcaster, GameOverSummary, GameSnapshot};
pub use food::place_food;
pub use game_state::{SnakeGameState, StepOutcome};
pub use input::{direction_from_key, next_direction};
pub use session::GameController;
pub use settings::{
    DEFAULT_FOOD_PLACEMENT_ATTEMPTS, DEFAULT_TICK_INTERVAL, GRID_SIZE, INITIAL_DIRECTION,
    INITIAL_FOOD, INITIAL_SNAKE, INITIAL_SNAKE_LENGTH, SCORE_PER_FOOD, SnakeSessionSettings,
};
pub use snake::Snake;
pub use types::{Direction, FieldSize, GameEndReason, GamePhase, Point};
