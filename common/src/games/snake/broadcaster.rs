use std::future::Future;

use crate::scores::ScoreReport;
use super::game_state::SnakeGameState;
use super::types::{Direction, GameEndReason, GamePhase, Point};

/// Read-only copy of the game handed to renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub snake: Vec<Point>,
    pub food: Point,
    pub direction: Direction,
    pub score: u32,
    pub terminal: bool,
    pub active: bool,
    pub phase: GamePhase,
    pub end_reason: Option<GameEndReason>,
}

impl GameSnapshot {
    pub fn capture(state: &SnakeGameState, phase: GamePhase) -> Self {
        Self {
            snake: state.snake().cells().collect(),
            food: state.food(),
            direction: state.direction(),
            score: state.score(),
            terminal: state.is_terminal(),
            active: state.is_active(),
            phase,
            end_reason: state.end_reason(),
        }
    }

    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: u32,
    pub reason: GameEndReason,
    /// Outcome of the score report; an `Err` only affects what is shown.
    pub high_score: Result<ScoreReport, String>,
}

/// Rendering side of the controller.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, summary: GameOverSummary) -> impl Future<Output = ()> + Send;
}
