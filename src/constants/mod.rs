//! Tuning constants, split by domain.

mod dungeon;
mod world;

pub use dungeon::*;
pub use world::*;
