//! Components for objects that occupy tiles.
//!
//! Gameplay collaborators attach their own components (stats, inventory, AI);
//! the spatial core only reads the ones declared here.

use crate::tile::{tile_ids, Sprite};

/// Position component - grid coordinates of the occupied tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Item component - the object sits in a tile's item slot rather than its
/// entity slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub sprite: Sprite,
}

impl Item {
    pub fn new(sprite: Sprite) -> Self {
        Self { sprite }
    }
}

/// Actor marker component (player, NPCs, monsters)
#[derive(Debug, Clone, Copy)]
pub struct Actor;

/// Marker: occupant prevents movement onto its tile
#[derive(Debug, Clone, Copy)]
pub struct BlocksMovement;

/// Door component - always passable furniture sitting in a wall gap
#[derive(Debug, Clone, Copy, Default)]
pub struct Door {
    pub is_open: bool,
}

impl Door {
    pub fn new() -> Self {
        Self { is_open: false }
    }
}

/// Stairs marker component
#[derive(Debug, Clone, Copy)]
pub struct Stairs;

/// Furniture kinds a floorplan can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FurnitureKind {
    Bed,
    Table,
    Chair,
    Chest,
    Shelf,
    Altar,
}

impl FurnitureKind {
    /// Floorplan letter for this furniture
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'b' => Some(FurnitureKind::Bed),
            't' => Some(FurnitureKind::Table),
            'c' => Some(FurnitureKind::Chair),
            'x' => Some(FurnitureKind::Chest),
            's' => Some(FurnitureKind::Shelf),
            'a' => Some(FurnitureKind::Altar),
            _ => None,
        }
    }

    pub fn sprite(&self) -> Sprite {
        match self {
            FurnitureKind::Bed => tile_ids::BED,
            FurnitureKind::Table => tile_ids::TABLE,
            FurnitureKind::Chair => tile_ids::CHAIR,
            FurnitureKind::Chest => tile_ids::CHEST,
            FurnitureKind::Shelf => tile_ids::SHELF,
            FurnitureKind::Altar => tile_ids::ALTAR,
        }
    }

    pub fn blocks_movement(&self) -> bool {
        matches!(
            self,
            FurnitureKind::Table | FurnitureKind::Shelf | FurnitureKind::Altar
        )
    }
}

/// Furniture component
#[derive(Debug, Clone, Copy)]
pub struct Furniture {
    pub kind: FurnitureKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_furniture_symbols() {
        assert_eq!(FurnitureKind::from_symbol('b'), Some(FurnitureKind::Bed));
        assert_eq!(FurnitureKind::from_symbol('x'), Some(FurnitureKind::Chest));
        assert_eq!(FurnitureKind::from_symbol('.'), None);
        assert_eq!(FurnitureKind::from_symbol('B'), None);
    }

    #[test]
    fn test_only_heavy_furniture_blocks() {
        assert!(FurnitureKind::Table.blocks_movement());
        assert!(!FurnitureKind::Chair.blocks_movement());
        assert!(!FurnitureKind::Bed.blocks_movement());
    }
}
