//! Grid and exploration constants.

/// World-space size of one tile in pixels
pub const TILE_SIZE: f32 = 32.0;

/// Radius of the neighborhood uncovered around a revealing entity (1 = 3x3)
pub const REVEAL_RADIUS: i32 = 1;

/// Minimum number of tiles in a wall loop for it to enclose anything
pub const MIN_ENCLOSING_CYCLE: usize = 4;
