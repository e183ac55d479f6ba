//! Dungeon generation constants.

/// Minimum room size (including walls)
pub const DUNGEON_MIN_ROOM_SIZE: i32 = 4;
/// Maximum room size (including walls)
pub const DUNGEON_MAX_ROOM_SIZE: i32 = 10;
/// Number of rectangular rooms a default level tries to place
pub const DUNGEON_DEFAULT_ROOM_COUNT: usize = 12;
/// Default dungeon width
pub const DUNGEON_DEFAULT_WIDTH: usize = 80;
/// Default dungeon height
pub const DUNGEON_DEFAULT_HEIGHT: usize = 50;
/// Random origins tried for a prefab before accepting one that overlaps a room
pub const DUNGEON_PREFAB_TRIES: usize = 20;

/// Lower bound of a biome seed's weight
pub const BIOME_MIN_WEIGHT: f32 = 1.0;
/// Upper bound of a biome seed's weight
pub const BIOME_MAX_WEIGHT: f32 = 3.0;

/// Offsets (relative to the requested origin) tried in order when a
/// floorplan doesn't fit, before falling back to a clamped origin.
pub const FLOORPLAN_FALLBACK_OFFSETS: [(i32, i32); 2] = [(-5, -5), (10, 10)];
