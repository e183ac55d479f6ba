//! Fusing overlapping rooms after a generation batch.
//!
//! Rooms that only touch along a shared wall stay separate. Rooms whose
//! areas really overlap become one: the earlier room is absorbed into the
//! later one and the walls running through the overlap are knocked out.

use crate::environment::Environment;
use crate::room::Room;
use std::collections::BTreeSet;

/// Tiles of `room` inside `other`'s rectangle that are not walls of both.
fn intrusion(room: &Room, other: &Room, shared: &BTreeSet<(i32, i32)>) -> BTreeSet<(i32, i32)> {
    room.tiles
        .iter()
        .filter(|&&(x, y)| other.rect.contains(x, y) && !shared.contains(&(x, y)))
        .copied()
        .collect()
}

fn shared_walls(a: &Room, b: &Room) -> BTreeSet<(i32, i32)> {
    a.walls.intersection(&b.walls).copied().collect()
}

/// True if the rooms overlap beyond a common wall.
pub fn overlaps(a: &Room, b: &Room) -> bool {
    let shared = shared_walls(a, b);
    !intrusion(a, b, &shared).is_empty() && !intrusion(b, a, &shared).is_empty()
}

/// Merge overlapping rooms until no overlapping pair remains. Returns how
/// many rooms were absorbed.
pub fn combine_rooms(env: &mut Environment) -> usize {
    puffin::profile_function!();

    let mut total = 0;
    loop {
        let merged = merge_pass(env);
        if merged == 0 {
            break;
        }
        total += merged;
    }
    if total > 0 {
        log::debug!("Merged {} overlapping rooms, {} remain", total, env.rooms.len());
    }
    total
}

/// Check every pair once. A room grown by absorbing another may now overlap
/// a room it was already checked against, hence the outer loop.
fn merge_pass(env: &mut Environment) -> usize {
    let count = env.rooms.len();
    let mut absorbed = vec![false; count];

    for i in 0..count {
        for j in (i + 1)..count {
            if absorbed[i] {
                break;
            }
            if absorbed[j] || !overlaps(&env.rooms[i], &env.rooms[j]) {
                continue;
            }
            absorb(env, i, j);
            absorbed[i] = true;
        }
    }

    let mut index = 0;
    env.rooms.retain(|_| {
        let keep = !absorbed[index];
        index += 1;
        keep
    });
    absorbed.iter().filter(|a| **a).count()
}

/// Fold room `from` into room `into`. `from` is left in the list for the
/// caller to drop.
fn absorb(env: &mut Environment, from: usize, into: usize) {
    let (source, target) = (&env.rooms[from], &env.rooms[into]);
    let shared = shared_walls(source, target);
    let opened = intrusion(source, target, &shared);
    let floor = target.style.floor;
    let survivor = target.id;
    let source = source.clone();

    log::debug!(
        "Room {} absorbed into {} ({} tiles opened)",
        source.id,
        survivor,
        opened.len()
    );

    for &(x, y) in &opened {
        env.clear_item(x, y);
        if let Some(tile) = env.get_mut(x, y) {
            tile.open(floor);
        }
    }
    for &(x, y) in &source.tiles {
        if let Some(tile) = env.get_mut(x, y) {
            tile.room = Some(survivor);
        }
    }

    let target = &mut env.rooms[into];
    target.tiles.extend(source.tiles.iter().copied());
    target.walls = target
        .walls
        .union(&source.walls)
        .filter(|p| !opened.contains(p))
        .copied()
        .collect();
    target.corners = target
        .corners
        .union(&source.corners)
        .filter(|p| !opened.contains(p))
        .copied()
        .collect();
    target.refresh_non_corners();
    target.rect = target.rect.union(&source.rect);
    target.hidden = target.hidden && source.hidden;
}
