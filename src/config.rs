//! Runtime parameters for level generation.

use crate::biome::Region;
use crate::constants::*;
use crate::error::GenerationError;
use crate::floorplan::Floorplan;
use crate::tile::{tile_ids, Style};
use serde::{Deserialize, Serialize};

/// A hand-drawn room the generator drops into the level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    pub rows: Vec<String>,
    #[serde(default)]
    pub style: Style,
}

impl Prefab {
    pub fn new(name: impl Into<String>, rows: &[&str], style: Style) -> Self {
        Self {
            name: name.into(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    /// Rectangular rooms to attempt; overlapping ones get merged
    pub room_count: usize,
    /// Room side lengths, walls included
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub regions: Vec<Region>,
    /// Sprites for rock and corridors outside any room
    pub style: Style,
    /// Walls and roof for generated rooms; the floor comes from the biome
    pub room_style: Style,
    pub unbreakable_rooms: bool,
    pub prefabs: Vec<Prefab>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            room_count: DUNGEON_DEFAULT_ROOM_COUNT,
            min_room_size: DUNGEON_MIN_ROOM_SIZE,
            max_room_size: DUNGEON_MAX_ROOM_SIZE,
            regions: vec![
                Region::new("halls", tile_ids::STONE_FLOOR),
                Region::new("caves", tile_ids::DIRT),
                Region::new("grotto", tile_ids::MOSS),
            ],
            style: Style::new(tile_ids::DIRT, tile_ids::ROCK, None),
            room_style: Style::new(tile_ids::STONE_FLOOR, tile_ids::STONE_WALL, None),
            unbreakable_rooms: false,
            prefabs: vec![Prefab::new(
                "cottage",
                &[
                    "-------",
                    "-b...x-",
                    "|..t..-",
                    "-c...s-",
                    "-------",
                ],
                Style::new(tile_ids::WOOD_FLOOR, tile_ids::WOOD_WALL, Some(tile_ids::THATCH_ROOF)),
            )],
        }
    }
}

impl GenerationConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GenerationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configs that can't produce a playable level.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: String| Err(GenerationError::InvalidConfig(msg));

        if self.min_room_size < 3 {
            return invalid(format!(
                "min_room_size {} leaves no floor inside the walls",
                self.min_room_size
            ));
        }
        if self.min_room_size > self.max_room_size {
            return invalid(format!(
                "min_room_size {} exceeds max_room_size {}",
                self.min_room_size, self.max_room_size
            ));
        }
        // Rooms must fit between the edge walls
        let limit = self.width.min(self.height) as i32 - 2;
        if self.max_room_size > limit {
            return invalid(format!(
                "max_room_size {} does not fit a {}x{} grid",
                self.max_room_size, self.width, self.height
            ));
        }
        if self.room_count == 0 && self.prefabs.is_empty() {
            return invalid("no rooms or prefabs requested".to_string());
        }

        for prefab in &self.prefabs {
            Floorplan::parse(prefab.rows.as_slice()).map_err(|source| GenerationError::Floorplan {
                name: prefab.name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
