pub mod state;

pub use state::{BoardState, Defect, Replay, STARTING_FEN};
