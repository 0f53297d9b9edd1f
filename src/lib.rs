// FEN list -> engine-annotated PGN collection
pub mod board;
pub mod convert;
pub mod engine;
pub mod error;
pub mod input;
pub mod pgn;
pub mod summary;
pub mod wdl;

pub use convert::{ConvertOptions, Converter};
pub use error::ConvertError;
