use crate::games::SessionRng;
use crate::log;
use super::food::place_food;
use super::input::next_direction;
use super::settings::{
    INITIAL_DIRECTION, INITIAL_FOOD, INITIAL_SNAKE, SCORE_PER_FOOD, SnakeSessionSettings,
};
use super::snake::Snake;
use super::types::{Direction, FieldSize, GameEndReason, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Terminal or inactive; nothing changed.
    Skipped,
    Moved,
    AteFood { new_food: Point },
    Ended(GameEndReason),
}

/// Authoritative state of one run. Mutated only by `step` and
/// `request_direction` (plus `set_active` for pausing).
#[derive(Clone, Debug)]
pub struct SnakeGameState {
    snake: Snake,
    food: Point,
    direction: Direction,
    score: u32,
    food_eaten: u32,
    terminal: bool,
    active: bool,
    end_reason: Option<GameEndReason>,
    field_size: FieldSize,
    food_placement_attempts: usize,
}

impl SnakeGameState {
    /// Fresh run in the fixed starting layout, already active.
    pub fn new(settings: &SnakeSessionSettings) -> Self {
        let field_size = settings.field_size();
        let snake = Snake::new(&INITIAL_SNAKE, &field_size)
            .expect("Initial snake should fit the field");

        Self {
            snake,
            food: INITIAL_FOOD,
            direction: INITIAL_DIRECTION,
            score: 0,
            food_eaten: 0,
            terminal: false,
            active: true,
            end_reason: None,
            field_size,
            food_placement_attempts: settings.food_placement_attempts,
        }
    }

    /// Active run with an arbitrary layout, e.g. to set up a position in tests
    /// or replays.
    pub fn from_layout(
        snake_cells: &[Point],
        direction: Direction,
        food: Point,
        field_size: FieldSize,
        food_placement_attempts: usize,
    ) -> Result<Self, String> {
        let snake = Snake::new(snake_cells, &field_size)?;
        if !field_size.contains(food) {
            return Err(format!("Food {} is outside the field", food));
        }
        if snake.occupies(food) {
            return Err(format!("Food {} is placed on the snake", food));
        }

        Ok(Self {
            snake,
            food,
            direction,
            score: 0,
            food_eaten: 0,
            terminal: false,
            active: true,
            end_reason: None,
            field_size,
            food_placement_attempts,
        })
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Point {
        self.snake.head()
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn end_reason(&self) -> Option<GameEndReason> {
        self.end_reason
    }

    pub fn field_size(&self) -> &FieldSize {
        &self.field_size
    }

    /// Pauses or resumes the run. Ignored once terminal.
    pub fn set_active(&mut self, active: bool) {
        if !self.terminal {
            self.active = active;
        }
    }

    /// Applies a turn if the run is live and the turn changes axis.
    /// Returns whether the direction changed.
    ///
    /// The accepted turn replaces the direction right away, so two turns
    /// between ticks compare against each other and only the last one is
    /// seen by the next `step`.
    pub fn request_direction(&mut self, requested: Direction) -> bool {
        if self.terminal || !self.active {
            return false;
        }

        let next = next_direction(self.direction, requested);
        let changed = next != self.direction;
        self.direction = next;
        changed
    }

    /// Advances one tick. Checks run wall, then self, then food.
    pub fn step(&mut self, rng: &mut SessionRng) -> StepOutcome {
        if self.terminal || !self.active {
            return StepOutcome::Skipped;
        }

        let Some(next_head) = self.snake.head().step(self.direction, &self.field_size) else {
            return self.finish(GameEndReason::WallCollision);
        };

        // The tail still counts: it has not moved yet.
        if self.snake.occupies(next_head) {
            return self.finish(GameEndReason::SelfCollision);
        }

        if next_head != self.food {
            self.snake.advance_to(next_head);
            return StepOutcome::Moved;
        }

        self.snake.grow_to(next_head);
        self.score += SCORE_PER_FOOD;
        self.food_eaten += 1;
        log!("Ate food at {}. Score: {}", next_head, self.score);

        match place_food(&self.snake, &self.field_size, rng, self.food_placement_attempts) {
            Some(new_food) => {
                self.food = new_food;
                StepOutcome::AteFood { new_food }
            }
            None => self.finish(GameEndReason::BoardFilled),
        }
    }

    fn finish(&mut self, reason: GameEndReason) -> StepOutcome {
        self.terminal = true;
        self.active = false;
        self.end_reason = Some(reason);
        log!("Game over: snake {} with score {}", reason, self.score);
        StepOutcome::Ended(reason)
    }
}
