use itertools::iproduct;

/// A grid coordinate. Signed so that positions off the grid edge are
/// representable; `Grid::cell` filters those out during neighbor scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 8 surrounding positions, unchecked against any grid bounds.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        iproduct!(-1..=1, -1..=1)
            .filter(|&offset| offset != (0, 0))
            .map(move |(dx, dy)| Position::new(self.x + dx, self.y + dy))
    }
}
