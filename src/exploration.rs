//! Fog of war.
//!
//! Moving onto a tile uncovers its immediate surroundings, and stepping into
//! an unexplored room uncovers all of it. Roofed rooms show their roof from
//! outside and their floor while someone is inside.

use crate::constants::REVEAL_RADIUS;
use crate::environment::Environment;
use crate::room::RoomId;
use hecs::Entity;
use std::collections::HashMap;

/// What a single reveal changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reveal {
    /// Room uncovered for the first time
    pub revealed_room: Option<RoomId>,
    /// Room the entity walked into
    pub entered: Option<RoomId>,
    /// Room the entity walked out of
    pub left: Option<RoomId>,
}

/// Remembers which room each tracked entity was last in, so room entry and
/// exit can be detected. A roof stays off while anyone tracked is inside.
#[derive(Debug, Default)]
pub struct ExplorationTracker {
    last_room: HashMap<Entity, Option<RoomId>>,
    occupants: HashMap<RoomId, usize>,
}

impl ExplorationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called whenever `entity` arrives at `loc`.
    pub fn reveal(&mut self, env: &mut Environment, entity: Entity, loc: (i32, i32)) -> Reveal {
        let (x, y) = loc;
        let mut result = Reveal::default();

        for dy in -REVEAL_RADIUS..=REVEAL_RADIUS {
            for dx in -REVEAL_RADIUS..=REVEAL_RADIUS {
                if let Some(tile) = env.get_mut(x + dx, y + dy) {
                    tile.hidden = false;
                }
            }
        }

        let current = env.get(x, y).and_then(|t| t.room);
        if let Some(id) = current {
            if uncover_room(env, id) {
                result.revealed_room = Some(id);
            }
        }

        let previous = self.last_room.insert(entity, current);
        // First sighting counts as a transition from nowhere
        let transition = match previous {
            None => true,
            Some(prev) => prev != current,
        };
        if transition {
            if let Some(prev) = previous.flatten() {
                self.leave(env, prev);
                result.left = Some(prev);
            }
            if let Some(id) = current {
                *self.occupants.entry(id).or_insert(0) += 1;
                show_roof(env, id, false);
                result.entered = Some(id);
            }
        }

        result
    }

    /// Stop tracking an entity (it died or left the level). Its room gets
    /// its roof back if nobody else is inside.
    pub fn forget(&mut self, env: &mut Environment, entity: Entity) {
        if let Some(Some(room)) = self.last_room.remove(&entity) {
            self.leave(env, room);
        }
    }

    /// Number of tracked entities currently inside `room`.
    pub fn occupants(&self, room: RoomId) -> usize {
        self.occupants.get(&room).copied().unwrap_or(0)
    }

    fn leave(&mut self, env: &mut Environment, room: RoomId) {
        let Some(count) = self.occupants.get_mut(&room) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.occupants.remove(&room);
            show_roof(env, room, true);
        }
    }

    pub fn last_room(&self, entity: Entity) -> Option<RoomId> {
        self.last_room.get(&entity).copied().flatten()
    }
}

/// Unhide a hidden room and all of its tiles. Returns false if it was
/// already explored.
fn uncover_room(env: &mut Environment, id: RoomId) -> bool {
    let Some(room) = env.room_mut(id) else {
        return false;
    };
    if !room.hidden {
        return false;
    }
    room.hidden = false;
    let tiles: Vec<_> = room.tiles.iter().copied().collect();

    for (x, y) in tiles {
        if let Some(tile) = env.get_mut(x, y) {
            tile.hidden = false;
        }
    }
    log::debug!("Room {} explored", id);
    true
}

/// Draw a roofed room's interior with its roof (`shown`) or its floor.
/// Rooms without a roof are left alone.
fn show_roof(env: &mut Environment, id: RoomId, shown: bool) {
    let Some(room) = env.room_mut(id) else {
        return;
    };
    let Some(roof) = room.style.roof else {
        return;
    };
    if room.roof_shown == shown {
        return;
    }
    room.roof_shown = shown;
    let sprite = if shown { roof } else { room.style.floor };
    let interior: Vec<_> = room.interior().collect();

    for (x, y) in interior {
        if let Some(tile) = env.get_mut(x, y) {
            tile.sprite = sprite;
        }
    }
}
