use crate::games::SessionRng;
use super::snake::Snake;
use super::types::{FieldSize, Point};

/// Picks a free cell for food, or `None` when the snake covers the field.
///
/// Draws uniformly from the whole field up to `max_attempts` times, then
/// falls back to a row-major scan so a crowded board still terminates.
pub fn place_food(
    snake: &Snake,
    field_size: &FieldSize,
    rng: &mut SessionRng,
    max_attempts: usize,
) -> Option<Point> {
    if snake.len() >= field_size.cell_count() {
        return None;
    }

    for _ in 0..max_attempts {
        let candidate = rng.random_point(field_size);
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    (0..field_size.height)
        .flat_map(|y| (0..field_size.width).map(move |x| Point::new(x, y)))
        .find(|&cell| !snake.occupies(cell))
}
