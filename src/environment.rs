//! One level's tile grid, its rooms, and the objects standing on it.

use crate::biome::Region;
use crate::components::BlocksMovement;
use crate::error::IntegrityViolation;
use crate::room::{Room, RoomId};
use crate::tile::{Sprite, Style, Tile};
use hecs::World;
use std::collections::BTreeSet;

/// How the interior of a fresh environment starts out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Passable floor everywhere (overworld, player-built areas)
    Open,
    /// Blocked rock everywhere, opened up by rooms and tunnels
    Solid,
}

pub struct Environment {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
    pub rooms: Vec<Room>,
    /// Sprites for tiles outside any room
    pub style: Style,
    pub regions: Vec<Region>,
    /// Anchor for placing the player and level features
    pub center: (i32, i32),
    /// Items and entities occupying tiles
    pub world: World,
    next_room_id: u32,
}

impl Environment {
    /// Allocate every tile. Edge tiles are blocked and unbreakable so nothing
    /// can leave the grid.
    pub fn new(width: usize, height: usize, style: Style, fill: Fill) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let edge = x == 0 || y == 0 || x == width as i32 - 1 || y == height as i32 - 1;
                let tile = if edge || fill == Fill::Solid {
                    let mut tile = Tile::new(x, y, style.wall, true);
                    tile.unbreakable = edge;
                    tile
                } else {
                    Tile::new(x, y, style.floor, false)
                };
                tiles.push(tile);
            }
        }

        Self {
            width,
            height,
            tiles,
            rooms: Vec::new(),
            style,
            regions: Vec::new(),
            center: (width as i32 / 2, height as i32 / 2),
            world: World::new(),
            next_room_id: 0,
        }
    }

    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        tiles: Vec<Tile>,
        rooms: Vec<Room>,
        style: Style,
        regions: Vec<Region>,
        center: (i32, i32),
    ) -> Self {
        let next_room_id = rooms.iter().map(|r| r.id.0 + 1).max().unwrap_or(0);
        Self {
            width,
            height,
            tiles,
            rooms,
            style,
            regions,
            center,
            world: World::new(),
            next_room_id,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    pub fn is_edge(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x == self.width as i32 - 1 || y == self.height as i32 - 1
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(&self.tiles[y as usize * self.width + x as usize])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(&mut self.tiles[y as usize * self.width + x as usize])
    }

    /// In-bounds 8-connected neighbors of (x, y).
    pub fn neighbors(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (x + dx, y + dy)))
            .filter(move |&(nx, ny)| (nx, ny) != (x, y) && self.in_bounds(nx, ny))
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == id)
    }

    /// Room owning the tile at (x, y), if any.
    pub fn room_at(&self, x: i32, y: i32) -> Option<&Room> {
        self.get(x, y)
            .and_then(|t| t.room)
            .and_then(|id| self.room(id))
    }

    pub(crate) fn next_room_id(&mut self) -> RoomId {
        let id = RoomId(self.next_room_id);
        self.next_room_id += 1;
        id
    }

    /// Floor sprite a tile should get when opened: its room's floor, or the
    /// environment default.
    pub fn floor_sprite_at(&self, x: i32, y: i32) -> Sprite {
        self.room_at(x, y)
            .map(|r| r.style.floor)
            .unwrap_or(self.style.floor)
    }

    /// Despawn the entity standing on (x, y).
    pub fn clear_entity(&mut self, x: i32, y: i32) {
        let Some(tile) = self.get_mut(x, y) else {
            return;
        };
        if let Some(entity) = tile.entity.take() {
            let _ = self.world.despawn(entity);
        }
    }

    /// Despawn the item lying on (x, y). Terrain flags are left to the caller.
    pub fn clear_item(&mut self, x: i32, y: i32) {
        let Some(tile) = self.get_mut(x, y) else {
            return;
        };
        if let Some(item) = tile.item.take() {
            let _ = self.world.despawn(item);
        }
    }

    /// True if the item on (x, y) blocks movement.
    pub fn blocking_item_at(&self, x: i32, y: i32) -> bool {
        self.get(x, y)
            .and_then(|t| t.item)
            .is_some_and(|item| self.world.get::<&BlocksMovement>(item).is_ok())
    }

    /// Despawn the item on (x, y) only if it blocks movement.
    pub fn clear_blocking_item(&mut self, x: i32, y: i32) {
        if self.blocking_item_at(x, y) {
            self.clear_item(x, y);
        }
    }

    pub fn clear_occupants(&mut self, x: i32, y: i32) {
        self.clear_entity(x, y);
        self.clear_item(x, y);
    }

    /// Take (x, y) away from the room that currently owns it, keeping that
    /// room's wall/corner sets consistent.
    pub(crate) fn detach_tile(&mut self, x: i32, y: i32) {
        let Some(owner) = self.get(x, y).and_then(|t| t.room) else {
            return;
        };
        if let Some(room) = self.room_mut(owner) {
            room.remove_tile((x, y));
        }
        if let Some(tile) = self.get_mut(x, y) {
            tile.room = None;
        }
    }

    /// Drop rooms that lost every tile to another room.
    pub(crate) fn drop_empty_rooms(&mut self) {
        self.rooms.retain(|room| {
            if room.tiles.is_empty() {
                log::debug!("Room {} has no tiles left, dropping it", room.id);
            }
            !room.tiles.is_empty()
        });
    }

    /// Walk every room and tile and report broken invariants.
    pub fn check_integrity(&self) -> Vec<IntegrityViolation> {
        let mut violations = Vec::new();

        for room in &self.rooms {
            if room.tiles.is_empty() {
                violations.push(IntegrityViolation::EmptyRoom { room: room.id });
            }
            for &(x, y) in &room.walls {
                if !room.tiles.contains(&(x, y)) {
                    violations.push(IntegrityViolation::WallOutsideRoom { room: room.id, x, y });
                }
            }
            for &(x, y) in &room.corners {
                if !room.walls.contains(&(x, y)) {
                    violations.push(IntegrityViolation::CornerNotWall { room: room.id, x, y });
                }
            }
            let expected: BTreeSet<_> = room.walls.difference(&room.corners).copied().collect();
            if expected != room.non_corners {
                violations.push(IntegrityViolation::NonCornerMismatch { room: room.id });
            }
        }

        for tile in &self.tiles {
            if let Some(id) = tile.room {
                if self.room(id).is_none() {
                    violations.push(IntegrityViolation::DanglingRoom {
                        room: id,
                        x: tile.x,
                        y: tile.y,
                    });
                }
            }
            if tile.blocked && tile.entity.is_some() {
                violations.push(IntegrityViolation::EntityOnBlocked { x: tile.x, y: tile.y });
            }
            if self.is_edge(tile.x, tile.y) && (!tile.blocked || !tile.unbreakable) {
                violations.push(IntegrityViolation::OpenEdge { x: tile.x, y: tile.y });
            }
        }

        violations
    }
}
