use super::types::Direction;

/// Turn filter: only a change of axis is accepted, anything along the
/// current axis (repeat or reversal) keeps `current`.
pub fn next_direction(current: Direction, requested: Direction) -> Direction {
    if requested.is_perpendicular(&current) {
        requested
    } else {
        current
    }
}

/// Maps arrow-key names and WASD to directions. Unknown keys are `None`.
pub fn direction_from_key(key: &str) -> Option<Direction> {
    match key.trim().to_ascii_lowercase().as_str() {
        "arrowup" | "up" | "w" => Some(Direction::Up),
        "arrowdown" | "down" | "s" => Some(Direction::Down),
        "arrowleft" | "left" | "a" => Some(Direction::Left),
        "arrowright" | "right" | "d" => Some(Direction::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_direction_from_up() {
        assert_eq!(next_direction(Direction::Up, Direction::Down), Direction::Up);
        assert_eq!(next_direction(Direction::Up, Direction::Up), Direction::Up);
        assert_eq!(next_direction(Direction::Up, Direction::Left), Direction::Left);
        assert_eq!(next_direction(Direction::Up, Direction::Right), Direction::Right);
    }

    #[test]
    fn test_next_direction_from_left() {
        assert_eq!(next_direction(Direction::Left, Direction::Right), Direction::Left);
        assert_eq!(next_direction(Direction::Left, Direction::Down), Direction::Down);
    }

    #[test]
    fn test_direction_from_key() {
        assert_eq!(direction_from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(direction_from_key("D"), Some(Direction::Right));
        assert_eq!(direction_from_key(" left\n"), Some(Direction::Left));
        assert_eq!(direction_from_key("Escape"), None);
        assert_eq!(direction_from_key(""), None);
    }
}
