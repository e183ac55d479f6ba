//! Putting items and entities onto tiles.
//!
//! Objects are `hecs` entities. Anything carrying an `Item` component goes in
//! a tile's item slot, everything else in its entity slot. Tile occupancy and
//! the object's `Position` are always updated together.

use crate::components::{BlocksMovement, Item, Position};
use crate::environment::Environment;
use crate::error::PlacementError;
use crate::tile::Tile;
use hecs::Entity;

/// True if nothing can step onto the tile.
pub fn is_blocked(tile: &Tile) -> bool {
    tile.blocked || tile.entity.is_some()
}

/// Put `obj` on the tile at `loc`, moving it off its previous tile if it had
/// one.
pub fn place_object(env: &mut Environment, obj: Entity, loc: (i32, i32)) -> Result<(), PlacementError> {
    let (x, y) = loc;
    if !env.world.contains(obj) {
        return Err(PlacementError::Despawned(obj));
    }
    let is_item = env.world.get::<&Item>(obj).is_ok();
    let blocks = env.world.get::<&BlocksMovement>(obj).is_ok();
    let previous = env.world.get::<&Position>(obj).ok().map(|p| (p.x, p.y));

    let tile = env.get(x, y).ok_or(PlacementError::OutOfBounds(x, y))?;
    if is_item {
        if tile.item.is_some_and(|i| i != obj) {
            return Err(PlacementError::Occupied(x, y));
        }
        if blocks && tile.item != Some(obj) && is_blocked(tile) {
            return Err(PlacementError::Blocked(x, y));
        }
    } else if tile.entity != Some(obj) && is_blocked(tile) {
        return Err(PlacementError::Blocked(x, y));
    }

    if let Some((px, py)) = previous {
        vacate(env, obj, (px, py), is_item, blocks);
    }

    env.world
        .insert_one(obj, Position::new(x, y))
        .map_err(|_| PlacementError::Despawned(obj))?;

    if let Some(tile) = env.get_mut(x, y) {
        if is_item {
            tile.item = Some(obj);
            if blocks {
                tile.blocked = true;
            }
        } else {
            tile.entity = Some(obj);
        }
    }
    Ok(())
}

/// Take `obj` off the grid and despawn it.
pub fn remove_object(env: &mut Environment, obj: Entity) -> Result<(), PlacementError> {
    if !env.world.contains(obj) {
        return Err(PlacementError::Despawned(obj));
    }
    let is_item = env.world.get::<&Item>(obj).is_ok();
    let blocks = env.world.get::<&BlocksMovement>(obj).is_ok();
    let previous = env.world.get::<&Position>(obj).ok().map(|p| (p.x, p.y));

    if let Some(loc) = previous {
        vacate(env, obj, loc, is_item, blocks);
    }
    env.world
        .despawn(obj)
        .map_err(|_| PlacementError::Despawned(obj))
}

fn vacate(env: &mut Environment, obj: Entity, loc: (i32, i32), is_item: bool, blocks: bool) {
    let Some(tile) = env.get_mut(loc.0, loc.1) else {
        return;
    };
    if is_item && tile.item == Some(obj) {
        tile.item = None;
        // Blocking items are only ever placed on open terrain
        if blocks {
            tile.blocked = false;
        }
    } else if !is_item && tile.entity == Some(obj) {
        tile.entity = None;
    }
}
