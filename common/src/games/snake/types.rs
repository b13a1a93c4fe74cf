use std::fmt;

/// Grid cell. `y` grows downward, so `Up` decreases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell in `direction`, or `None` when it falls off the field.
    pub fn step(&self, direction: Direction, field_size: &FieldSize) -> Option<Point> {
        let (dx, dy) = direction.delta();
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        let next = Point::new(x, y);
        field_size.contains(next).then_some(next)
    }

    pub fn manhattan_distance(&self, other: Point) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit vector; never zero.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_perpendicular(&self, other: &Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEndReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameEndReason::WallCollision => "hit the wall",
            GameEndReason::SelfCollision => "ran into itself",
            GameEndReason::BoardFilled => "filled the board",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSize {
    pub width: usize,
    pub height: usize,
}

impl FieldSize {
    pub const fn square(size: usize) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}
