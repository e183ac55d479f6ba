//! Rooms drawn as text.
//!
//! Symbol vocabulary, one character per tile:
//!
//! | symbol | meaning                                   |
//! |--------|-------------------------------------------|
//! | ` `    | outside the room, left untouched          |
//! | `-`    | wall                                      |
//! | `\|`   | doorway: a passable wall holding a door   |
//! | `.`    | floor                                     |
//! | letter | floor with furniture (see `FurnitureKind`) |

use crate::components::{BlocksMovement, Door, Furniture, FurnitureKind, Item};
use crate::constants::FLOORPLAN_FALLBACK_OFFSETS;
use crate::environment::Environment;
use crate::error::FloorplanError;
use crate::placement::place_object;
use crate::room::{outline_corners, Rect, Room, RoomId, RoomOptions};
use crate::tile::{tile_ids, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanCell {
    Outside,
    Wall,
    Door,
    Floor,
    Furniture(FurnitureKind),
}

impl PlanCell {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            ' ' => Some(PlanCell::Outside),
            '-' => Some(PlanCell::Wall),
            '|' => Some(PlanCell::Door),
            '.' => Some(PlanCell::Floor),
            c => FurnitureKind::from_symbol(c).map(PlanCell::Furniture),
        }
    }

    fn is_wall(&self) -> bool {
        matches!(self, PlanCell::Wall | PlanCell::Door)
    }
}

/// A parsed, rectangular floorplan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floorplan {
    pub width: usize,
    pub height: usize,
    cells: Vec<PlanCell>,
}

impl Floorplan {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, FloorplanError> {
        let width = rows
            .first()
            .map(|r| r.as_ref().chars().count())
            .ok_or(FloorplanError::Empty)?;
        if width == 0 {
            return Err(FloorplanError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(FloorplanError::RaggedRows {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let cell = PlanCell::from_symbol(symbol)
                    .ok_or(FloorplanError::UnknownSymbol { symbol, row, col })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Non-outside cells with their offsets from the plan origin.
    pub fn cells(&self) -> impl Iterator<Item = ((i32, i32), PlanCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell != PlanCell::Outside)
            .map(move |(i, cell)| (((i % self.width) as i32, (i / self.width) as i32), *cell))
    }

    /// Every drawn cell lands inside the grid and off its edge.
    pub fn fits(&self, env: &Environment, origin: (i32, i32)) -> bool {
        self.cells().all(|((dx, dy), _)| {
            let (x, y) = (origin.0 + dx, origin.1 + dy);
            env.in_bounds(x, y) && !env.is_edge(x, y)
        })
    }

    /// Origins to try, in order: the requested one, the fixed fallback
    /// offsets, then the requested origin clamped so the plan sits inside
    /// the grid's interior.
    pub fn candidate_origins(&self, env: &Environment, origin: (i32, i32)) -> Vec<(i32, i32)> {
        let mut origins = vec![origin];
        origins.extend(
            FLOORPLAN_FALLBACK_OFFSETS
                .iter()
                .map(|(dx, dy)| (origin.0 + dx, origin.1 + dy)),
        );

        let max_x = env.width as i32 - 1 - self.width as i32;
        let max_y = env.height as i32 - 1 - self.height as i32;
        if max_x >= 1 && max_y >= 1 {
            origins.push((origin.0.clamp(1, max_x), origin.1.clamp(1, max_y)));
        }
        origins
    }
}

impl Room {
    /// Build a room from text rows placed with their top-left at `origin`.
    /// Nothing is touched unless a fitting origin is found.
    pub fn from_plan<S: AsRef<str>>(
        env: &mut Environment,
        name: impl Into<String>,
        rows: &[S],
        origin: (i32, i32),
        style: Style,
        options: RoomOptions,
    ) -> Result<RoomId, FloorplanError> {
        let plan = Floorplan::parse(rows)?;

        let Some(placed_at) = plan
            .candidate_origins(env, origin)
            .into_iter()
            .find(|o| plan.fits(env, *o))
        else {
            return Err(FloorplanError::DoesNotFit {
                x: origin.0,
                y: origin.1,
                width: plan.width,
                height: plan.height,
            });
        };
        if placed_at != origin {
            log::warn!(
                "Floorplan did not fit at {:?}, placed at {:?} instead",
                origin,
                placed_at
            );
        }

        Ok(build_plan(env, name.into(), &plan, placed_at, style, options))
    }
}

fn build_plan(
    env: &mut Environment,
    name: String,
    plan: &Floorplan,
    origin: (i32, i32),
    style: Style,
    options: RoomOptions,
) -> RoomId {
    let id = env.next_room_id();
    let rect = Rect::new(origin.0, origin.1, plan.width as i32, plan.height as i32);
    let mut room = Room::new(id, name, rect, style);
    room.hidden = options.hidden;

    for ((dx, dy), cell) in plan.cells() {
        let (x, y) = (origin.0 + dx, origin.1 + dy);
        if !options.objects {
            env.clear_occupants(x, y);
        }
        // Doors and furniture replace whatever item was there
        if matches!(cell, PlanCell::Door | PlanCell::Furniture(_)) {
            env.clear_item(x, y);
        }

        match cell {
            PlanCell::Wall => {
                env.clear_entity(x, y);
                if let Some(tile) = env.get_mut(x, y) {
                    tile.close(style.wall);
                    tile.unbreakable = options.unbreakable;
                }
            }
            PlanCell::Door => {
                if let Some(tile) = env.get_mut(x, y) {
                    tile.open(style.floor);
                    tile.unbreakable = options.unbreakable;
                }
                let door = env.world.spawn((Item::new(tile_ids::DOOR), Door::new()));
                place_furnishing(env, door, (x, y));
            }
            PlanCell::Floor => {
                // Kept furniture still blocks
                let blocking_item = env.blocking_item_at(x, y);
                if let Some(tile) = env.get_mut(x, y) {
                    tile.open(style.interior());
                    tile.blocked = blocking_item;
                }
            }
            PlanCell::Furniture(kind) => {
                if let Some(tile) = env.get_mut(x, y) {
                    tile.open(style.interior());
                }
                let furniture = if kind.blocks_movement() {
                    if env.get(x, y).is_some_and(|t| t.entity.is_some()) {
                        env.clear_entity(x, y);
                    }
                    env.world
                        .spawn((Item::new(kind.sprite()), Furniture { kind }, BlocksMovement))
                } else {
                    env.world.spawn((Item::new(kind.sprite()), Furniture { kind }))
                };
                place_furnishing(env, furniture, (x, y));
            }
            PlanCell::Outside => continue,
        }

        if cell.is_wall() {
            room.walls.insert((x, y));
        }
        if let Some(tile) = env.get_mut(x, y) {
            tile.room = Some(id);
            if !options.hidden {
                tile.hidden = false;
            }
        }
        room.tiles.insert((x, y));
    }

    room.corners = outline_corners(&room.walls);
    room.refresh_non_corners();

    log::debug!(
        "Room {} {:?} built from a {}x{} floorplan at {:?}",
        id,
        room.name,
        plan.width,
        plan.height,
        origin
    );
    env.rooms.push(room);
    id
}

fn place_furnishing(env: &mut Environment, object: hecs::Entity, loc: (i32, i32)) {
    if let Err(err) = place_object(env, object, loc) {
        log::warn!("Could not furnish {:?}: {}", loc, err);
        let _ = env.world.despawn(object);
    }
}
