use crate::Position;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Board dimensions {width}x{height} must both be positive")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Too many mines ({mines}) for board size {width}x{height}")]
    TooManyMines { width: u32, height: u32, mines: u32 },
    #[error("Only {available} cells left outside the safe zone for {mines} mines")]
    InsufficientSafeArea { available: usize, mines: u32 },
    #[error("Mine position {0:?} is out of bounds")]
    MineOutOfBounds(Position),
}
