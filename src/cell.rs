use crate::Position;

/// One grid square. All mutation goes through the owning [`Grid`](crate::Grid);
/// the presentation layer only sees the read accessors.
#[derive(Debug, Clone)]
pub struct Cell {
    position: Position,
    is_mine: bool,
    covered: bool,
    flagged: bool,
    exploded: bool,
}

impl Cell {
    pub(crate) fn new(position: Position) -> Self {
        Self {
            position,
            is_mine: false,
            covered: true,
            flagged: false,
            exploded: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Only meaningful for display once the game is over.
    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub fn is_covered(&self) -> bool {
        self.covered
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// True only for the single mine whose reveal ended the game.
    pub fn has_exploded(&self) -> bool {
        self.exploded
    }

    // Set at most once, during mine placement. Never unset.
    pub(crate) fn set_mine(&mut self) {
        self.is_mine = true;
    }

    // Monotone: an uncovered cell never covers again.
    pub(crate) fn uncover(&mut self) {
        self.covered = false;
    }

    pub(crate) fn set_flag(&mut self, flagged: bool) {
        self.flagged = flagged;
    }

    pub(crate) fn mark_exploded(&mut self) {
        self.exploded = true;
    }
}
