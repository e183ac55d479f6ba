use crate::biome::assign_biomes;
use crate::components::{Item, Stairs};
use crate::config::{GenerationConfig, Prefab};
use crate::constants::DUNGEON_PREFAB_TRIES;
use crate::environment::{Environment, Fill};
use crate::error::{FloorplanError, GenerationError};
use crate::floorplan::Floorplan;
use crate::merge::combine_rooms;
use crate::placement::place_object;
use crate::room::{Rect, Room, RoomOptions};
use crate::tile::{tile_ids, Style};
use rand::Rng;

/// Generate a complete level: biomes, rooms, prefabs, merging, corridors and
/// a staircase down.
pub fn generate_level(config: &GenerationConfig, rng: &mut impl Rng) -> Result<Environment, GenerationError> {
    puffin::profile_function!();
    config.validate()?;

    let mut env = Environment::new(config.width, config.height, config.style, Fill::Solid);
    if !config.regions.is_empty() {
        assign_biomes(&mut env, &config.regions, rng);
    }

    let options = RoomOptions {
        unbreakable: config.unbreakable_rooms,
        ..Default::default()
    };

    // Random rectangular rooms, floored with whatever biome they sit in
    for _ in 0..config.room_count {
        let rect = random_room_rect(&env, config, rng);
        let (cx, cy) = rect.center();
        let floor = env
            .get(cx, cy)
            .and_then(|t| t.region)
            .and_then(|r| env.regions.get(r))
            .map(|r| r.floor)
            .unwrap_or(config.room_style.floor);
        let style = Style {
            floor,
            ..config.room_style
        };
        Room::from_size(&mut env, "chamber", rect, style, options);
    }

    for prefab in &config.prefabs {
        place_prefab(&mut env, prefab, options, rng)?;
    }

    combine_rooms(&mut env);
    if env.rooms.is_empty() {
        return Err(GenerationError::NoRooms);
    }

    // Connect rooms in order with L-shaped corridors
    let anchors: Vec<(i32, i32)> = env.rooms.iter().filter_map(|room| anchor(&env, room)).collect();
    for pair in anchors.windows(2) {
        env.carve_l(pair[0], pair[1], rng.gen_bool(0.5));
    }
    log::debug!("Carved {} corridors", anchors.len().saturating_sub(1));

    // Stairs down in the last room, or the closest room to it that has space
    let stairs_at = env
        .rooms
        .iter()
        .rev()
        .find_map(|room| anchor(&env, room))
        .ok_or(GenerationError::StairsUnplaced)?;
    let stairs = env.world.spawn((Item::new(tile_ids::STAIRS_DOWN), Stairs));
    place_object(&mut env, stairs, stairs_at).map_err(|err| {
        log::warn!("Stairs rejected at {:?}: {}", stairs_at, err);
        GenerationError::StairsUnplaced
    })?;

    if let Some(start) = env.rooms.first().and_then(|room| anchor(&env, room)) {
        env.center = start;
    }

    log::debug!(
        "Generated {}x{} level with {} rooms, stairs at {:?}",
        env.width,
        env.height,
        env.rooms.len(),
        stairs_at
    );
    Ok(env)
}

/// Random room rectangle that stays off the grid edge.
fn random_room_rect(env: &Environment, config: &GenerationConfig, rng: &mut impl Rng) -> Rect {
    let width = rng.gen_range(config.min_room_size..=config.max_room_size);
    let height = rng.gen_range(config.min_room_size..=config.max_room_size);
    let x = rng.gen_range(1..=env.width as i32 - 1 - width);
    let y = rng.gen_range(1..=env.height as i32 - 1 - height);
    Rect::new(x, y, width, height)
}

/// Drop a prefab somewhere it doesn't overlap an existing room if possible.
/// A prefab too large for the grid is skipped with a warning.
fn place_prefab(
    env: &mut Environment,
    prefab: &Prefab,
    options: RoomOptions,
    rng: &mut impl Rng,
) -> Result<(), GenerationError> {
    let plan = Floorplan::parse(prefab.rows.as_slice()).map_err(|source| GenerationError::Floorplan {
        name: prefab.name.clone(),
        source,
    })?;
    let max_x = env.width as i32 - 1 - plan.width as i32;
    let max_y = env.height as i32 - 1 - plan.height as i32;
    if max_x < 1 || max_y < 1 {
        log::warn!("Prefab {:?} is larger than the level, skipping", prefab.name);
        return Ok(());
    }

    let mut origin = (1, 1);
    for _ in 0..DUNGEON_PREFAB_TRIES {
        origin = (rng.gen_range(1..=max_x), rng.gen_range(1..=max_y));
        let footprint = Rect::new(origin.0, origin.1, plan.width as i32, plan.height as i32);
        if !env.rooms.iter().any(|r| r.rect.intersects(&footprint)) {
            break;
        }
    }

    match Room::from_plan(env, prefab.name.as_str(), prefab.rows.as_slice(), origin, prefab.style, options) {
        Ok(_) => Ok(()),
        Err(err @ FloorplanError::DoesNotFit { .. }) => {
            log::warn!("Prefab {:?} skipped: {}", prefab.name, err);
            Ok(())
        }
        Err(source) => Err(GenerationError::Floorplan {
            name: prefab.name.clone(),
            source,
        }),
    }
}

/// Open, empty interior tile of `room` closest to its rectangle's center.
fn anchor(env: &Environment, room: &Room) -> Option<(i32, i32)> {
    let (cx, cy) = room.rect.center();
    room.interior()
        .filter(|&(x, y)| {
            env.get(x, y)
                .is_some_and(|t| !t.blocked && t.item.is_none() && t.entity.is_none())
        })
        .min_by_key(|&(x, y)| (x - cx).abs() + (y - cy).abs())
}
