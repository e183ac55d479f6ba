//! Error types for world construction, editing, and persistence.

use crate::room::RoomId;
use hecs::Entity;
use thiserror::Error;

/// Why a floorplan could not be turned into a room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FloorplanError {
    #[error("Floorplan has no rows")]
    Empty,

    #[error("Floorplan row {row} is {found} cells wide, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unknown floorplan symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },

    #[error("Floorplan of {width}x{height} does not fit near ({x}, {y})")]
    DoesNotFit {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Why an object could not be put on a tile
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("({0}, {1}) is outside the grid")]
    OutOfBounds(i32, i32),

    #[error("({0}, {1}) is blocked")]
    Blocked(i32, i32),

    #[error("({0}, {1}) already holds an item")]
    Occupied(i32, i32),

    #[error("Object {0:?} no longer exists")]
    Despawned(Entity),
}

/// Why a player-driven terrain edit was refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerrainError {
    #[error("({0}, {1}) is outside the grid")]
    OutOfBounds(i32, i32),

    #[error("({0}, {1}) cannot be altered")]
    Unbreakable(i32, i32),

    #[error("({0}, {1}) is occupied")]
    Occupied(i32, i32),
}

/// Fatal problems while generating a level. These indicate a configuration or
/// content bug rather than an unlucky roll.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid generation config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse generation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No rooms could be placed")]
    NoRooms,

    #[error("Stairs could not be placed in any room")]
    StairsUnplaced,

    #[error("Prefab {name:?} is malformed: {source}")]
    Floorplan {
        name: String,
        #[source]
        source: FloorplanError,
    },
}

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Incompatible snapshot version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Snapshot holds {found} tiles for a {width}x{height} grid")]
    DimensionMismatch {
        width: usize,
        height: usize,
        found: usize,
    },
}

/// A broken world invariant, as reported by `Environment::check_integrity`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    #[error("Room {room} has no tiles")]
    EmptyRoom { room: RoomId },

    #[error("Room {room} lists wall ({x}, {y}) that is not one of its tiles")]
    WallOutsideRoom { room: RoomId, x: i32, y: i32 },

    #[error("Room {room} lists corner ({x}, {y}) that is not one of its walls")]
    CornerNotWall { room: RoomId, x: i32, y: i32 },

    #[error("Room {room} non-corner walls disagree with walls minus corners")]
    NonCornerMismatch { room: RoomId },

    #[error("Tile ({x}, {y}) references missing room {room}")]
    DanglingRoom { room: RoomId, x: i32, y: i32 },

    #[error("Tile ({x}, {y}) is blocked but holds an entity")]
    EntityOnBlocked { x: i32, y: i32 },

    #[error("Edge tile ({x}, {y}) is passable or breakable")]
    OpenEdge { x: i32, y: i32 },
}
