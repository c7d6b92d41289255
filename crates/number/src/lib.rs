//! Fixed-point quantities used by the auction houses.

pub mod math;
mod serialization;
mod wad;

pub use wad::{ParseError, Wad};
