use crate::constants::TILE_SIZE;
use crate::room::RoomId;
use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Image categories the renderer groups tile art into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpriteCategory {
    Floors,
    Walls,
    Roofs,
    Doors,
    Stairs,
    Furniture,
}

/// Visual identifier of a tile: the category plus a variant index inside it.
/// Always assigned as a whole so the renderer never sees a mixed pair.
pub type Sprite = (SpriteCategory, u32);

/// Named sprites used by the generator and the floorplan vocabulary
pub mod tile_ids {
    use super::{Sprite, SpriteCategory};

    // Floors
    pub const DIRT: Sprite = (SpriteCategory::Floors, 0);
    pub const STONE_FLOOR: Sprite = (SpriteCategory::Floors, 1);
    pub const WOOD_FLOOR: Sprite = (SpriteCategory::Floors, 2);
    pub const GRASS: Sprite = (SpriteCategory::Floors, 3);
    pub const SAND: Sprite = (SpriteCategory::Floors, 4);
    pub const MOSS: Sprite = (SpriteCategory::Floors, 5);

    // Walls
    pub const ROCK: Sprite = (SpriteCategory::Walls, 0); // solid fill between rooms
    pub const STONE_WALL: Sprite = (SpriteCategory::Walls, 1);
    pub const BRICK_WALL: Sprite = (SpriteCategory::Walls, 2);
    pub const WOOD_WALL: Sprite = (SpriteCategory::Walls, 3);
    pub const BEDROCK: Sprite = (SpriteCategory::Walls, 4); // grid edge

    // Roofs
    pub const THATCH_ROOF: Sprite = (SpriteCategory::Roofs, 0);
    pub const SLATE_ROOF: Sprite = (SpriteCategory::Roofs, 1);

    // Structures
    pub const DOOR: Sprite = (SpriteCategory::Doors, 0);
    pub const STAIRS_DOWN: Sprite = (SpriteCategory::Stairs, 0);

    // Furniture
    pub const BED: Sprite = (SpriteCategory::Furniture, 0);
    pub const TABLE: Sprite = (SpriteCategory::Furniture, 1);
    pub const CHAIR: Sprite = (SpriteCategory::Furniture, 2);
    pub const CHEST: Sprite = (SpriteCategory::Furniture, 3);
    pub const SHELF: Sprite = (SpriteCategory::Furniture, 4);
    pub const ALTAR: Sprite = (SpriteCategory::Furniture, 5);
}

/// Floor/wall/roof sprites shared by a room, or used as an environment's
/// defaults for tiles outside any room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub floor: Sprite,
    pub wall: Sprite,
    #[serde(default)]
    pub roof: Option<Sprite>,
}

impl Style {
    pub const fn new(floor: Sprite, wall: Sprite, roof: Option<Sprite>) -> Self {
        Self { floor, wall, roof }
    }

    /// Sprite drawn over a room's interior while it is seen from outside.
    pub fn interior(&self) -> Sprite {
        self.roof.unwrap_or(self.floor)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(tile_ids::STONE_FLOOR, tile_ids::STONE_WALL, None)
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    /// World-space position of the tile's top-left corner
    pub position: Vec2,
    pub sprite: Sprite,
    /// Index into the environment's region list, once biomes are assigned
    pub region: Option<usize>,
    /// Impassable terrain
    pub blocked: bool,
    /// Not yet explored
    pub hidden: bool,
    /// Immune to player-driven terrain edits
    pub unbreakable: bool,
    /// Built by the player rather than the generator
    pub placed: bool,
    pub room: Option<RoomId>,
    pub item: Option<Entity>,
    pub entity: Option<Entity>,
}

impl Tile {
    pub fn new(x: i32, y: i32, sprite: Sprite, blocked: bool) -> Self {
        Self {
            x,
            y,
            position: Vec2::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE),
            sprite,
            region: None,
            blocked,
            hidden: true,
            unbreakable: false,
            placed: false,
            room: None,
            item: None,
            entity: None,
        }
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Make the tile passable with the given sprite.
    pub fn open(&mut self, sprite: Sprite) {
        self.blocked = false;
        self.sprite = sprite;
    }

    /// Make the tile impassable with the given sprite. The caller is
    /// responsible for clearing any occupying entity first.
    pub fn close(&mut self, sprite: Sprite) {
        debug_assert!(self.entity.is_none(), "closing an occupied tile");
        self.blocked = true;
        self.sprite = sprite;
    }
}
