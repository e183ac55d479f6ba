//! Saving and restoring a level's terrain and rooms.
//!
//! Only the spatial state is captured. Items and entities live in the
//! `hecs::World` and are saved by whoever owns them; a restored level starts
//! with an empty world and unoccupied tiles.

use crate::biome::Region;
use crate::environment::Environment;
use crate::error::SnapshotError;
use crate::room::{Rect, Room, RoomId};
use crate::tile::{Sprite, Style, Tile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub sprite: Sprite,
    pub region: Option<usize>,
    pub blocked: bool,
    pub hidden: bool,
    pub unbreakable: bool,
    pub placed: bool,
    pub room: Option<RoomId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub name: String,
    pub rect: Rect,
    pub hidden: bool,
    pub style: Style,
    pub roof_shown: bool,
    pub tiles: BTreeSet<(i32, i32)>,
    pub walls: BTreeSet<(i32, i32)>,
    pub corners: BTreeSet<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub version: u32,
    pub width: usize,
    pub height: usize,
    pub center: (i32, i32),
    pub style: Style,
    pub regions: Vec<Region>,
    /// Row-major, `width * height` entries
    pub tiles: Vec<TileSnapshot>,
    pub rooms: Vec<RoomSnapshot>,
}

impl Environment {
    pub fn snapshot(&self) -> EnvironmentSnapshot {
        let tiles = self
            .tiles
            .iter()
            .map(|t| TileSnapshot {
                sprite: t.sprite,
                region: t.region,
                blocked: t.blocked,
                hidden: t.hidden,
                unbreakable: t.unbreakable,
                placed: t.placed,
                room: t.room,
            })
            .collect();

        let rooms = self
            .rooms
            .iter()
            .map(|r| RoomSnapshot {
                id: r.id,
                name: r.name.clone(),
                rect: r.rect,
                hidden: r.hidden,
                style: r.style,
                roof_shown: r.roof_shown,
                tiles: r.tiles.clone(),
                walls: r.walls.clone(),
                corners: r.corners.clone(),
            })
            .collect();

        EnvironmentSnapshot {
            version: SNAPSHOT_VERSION,
            width: self.width,
            height: self.height,
            center: self.center,
            style: self.style,
            regions: self.regions.clone(),
            tiles,
            rooms,
        }
    }

    pub fn from_snapshot(snapshot: EnvironmentSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::IncompatibleVersion {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        let (width, height) = (snapshot.width, snapshot.height);
        if snapshot.tiles.len() != width * height {
            return Err(SnapshotError::DimensionMismatch {
                width,
                height,
                found: snapshot.tiles.len(),
            });
        }

        let tiles = snapshot
            .tiles
            .into_iter()
            .enumerate()
            .map(|(i, saved)| {
                let (x, y) = ((i % width) as i32, (i / width) as i32);
                let mut tile = Tile::new(x, y, saved.sprite, saved.blocked);
                tile.region = saved.region;
                tile.hidden = saved.hidden;
                tile.unbreakable = saved.unbreakable;
                tile.placed = saved.placed;
                tile.room = saved.room;
                tile
            })
            .collect();

        let rooms = snapshot
            .rooms
            .into_iter()
            .map(|saved| {
                let mut room = Room::new(saved.id, saved.name, saved.rect, saved.style);
                room.hidden = saved.hidden;
                room.roof_shown = saved.roof_shown;
                room.tiles = saved.tiles;
                room.walls = saved.walls;
                room.corners = saved.corners;
                room.refresh_non_corners();
                room
            })
            .collect();

        Ok(Environment::from_parts(
            width,
            height,
            tiles,
            rooms,
            snapshot.style,
            snapshot.regions,
            snapshot.center,
        ))
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: EnvironmentSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }
}
