use std::collections::{HashSet, VecDeque};

use super::types::{Direction, FieldSize, Point};

/// Snake body, head first. `body_set` mirrors `body` so occupancy checks are
/// O(1) and duplicate cells are rejected.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

// Never empty, so there is no `is_empty`.
#[allow(clippy::len_without_is_empty)]
impl Snake {
    pub fn new(cells: &[Point], field_size: &FieldSize) -> Result<Self, String> {
        if cells.is_empty() {
            return Err("Snake must have at least one segment".to_string());
        }

        let mut body = VecDeque::with_capacity(cells.len());
        let mut body_set = HashSet::with_capacity(cells.len());

        for &cell in cells {
            if !field_size.contains(cell) {
                return Err(format!(
                    "Segment {} is outside the {}x{} field",
                    cell, field_size.width, field_size.height
                ));
            }
            if !body_set.insert(cell) {
                return Err(format!("Segment {} appears twice", cell));
            }
            body.push_back(cell);
        }

        Ok(Self { body, body_set })
    }

    /// Straight snake with its head at `head`, trailing away from `direction`.
    pub fn straight(
        head: Point,
        direction: Direction,
        length: usize,
        field_size: &FieldSize,
    ) -> Result<Self, String> {
        let behind = direction.opposite();
        let mut cells = Vec::with_capacity(length);
        let mut current = head;
        for i in 0..length {
            if i > 0 {
                current = current.step(behind, field_size).ok_or_else(|| {
                    format!("Snake of length {} at {} does not fit the field", length, head)
                })?;
            }
            cells.push(current);
        }
        Self::new(&cells, field_size)
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, point: Point) -> bool {
        self.body_set.contains(&point)
    }

    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    /// Adds `head` in front and keeps the tail.
    pub(super) fn grow_to(&mut self, head: Point) {
        debug_assert!(!self.body_set.contains(&head));
        self.body.push_front(head);
        self.body_set.insert(head);
    }

    /// Adds `head` in front and drops the tail, keeping the length.
    pub(super) fn advance_to(&mut self, head: Point) {
        let tail = self
            .body
            .pop_back()
            .expect("Snake body should never be empty");
        self.body_set.remove(&tail);
        self.grow_to(head);
    }
}
