//! Tile-grid world model for a roguelike: levels, rooms, biomes, corridors,
//! player-built enclosures and fog of war.
//!
//! A level is an [`Environment`]: a fixed grid of [`Tile`]s, the [`Room`]s
//! carved into it, and a `hecs::World` holding the items and entities that
//! stand on tiles. [`generate_level`] builds one from a [`GenerationConfig`];
//! a [`Session`] then drives gameplay-time changes (movement, exploration,
//! building and digging).

pub mod biome;
pub mod boundary;
pub mod components;
pub mod config;
pub mod constants;
pub mod dungeon_gen;
pub mod environment;
pub mod error;
pub mod exploration;
pub mod floorplan;
pub mod merge;
pub mod placement;
pub mod room;
pub mod session;
pub mod snapshot;
pub mod tile;
pub mod tunnel;

pub use biome::{assign_biomes, assign_biomes_with_seeds, BiomeSeed, Region};
pub use boundary::{build_wall, dig, resolve_boundary};
pub use config::{GenerationConfig, Prefab};
pub use dungeon_gen::generate_level;
pub use environment::{Environment, Fill};
pub use error::{
    FloorplanError, GenerationError, IntegrityViolation, PlacementError, SnapshotError, TerrainError,
};
pub use exploration::{ExplorationTracker, Reveal};
pub use merge::combine_rooms;
pub use placement::{place_object, remove_object};
pub use room::{Rect, Room, RoomId, RoomOptions};
pub use session::Session;
pub use snapshot::EnvironmentSnapshot;
pub use tile::{tile_ids, Sprite, SpriteCategory, Style, Tile};
