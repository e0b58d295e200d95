pub mod cell;
pub mod error;
pub mod grid;
pub mod position;

pub use cell::Cell;
pub use error::GameError;
pub use grid::{GameState, Grid, RevealOutcome};
pub use position::Position;
