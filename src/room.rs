use crate::environment::Environment;
use crate::tile::Style;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable handle to a room. Survives other rooms being merged away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rectangle of tiles; `width` and `height` count tiles, walls included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest rect covering both corners (inclusive).
    pub fn from_corners(min: (i32, i32), max: (i32, i32)) -> Self {
        Self::new(min.0, min.1, max.0 - min.0 + 1, max.1 - min.1 + 1)
    }

    /// Bounding box of a set of points, or `None` when empty.
    pub fn bounding(points: impl IntoIterator<Item = (i32, i32)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let (mut min, mut max) = ((x, y), (x, y));
        for (x, y) in iter {
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
        Some(Self::from_corners(min, max))
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn on_border(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && (x == self.x || y == self.y || x == self.right() || y == self.bottom())
    }

    pub fn is_corner(&self, x: i32, y: i32) -> bool {
        (x == self.x || x == self.right()) && (y == self.y || y == self.bottom())
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(
            (self.x.min(other.x), self.y.min(other.y)),
            (self.right().max(other.right()), self.bottom().max(other.bottom())),
        )
    }

    /// Every point in the rectangle, row by row.
    pub fn points(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, x1) = (self.x, self.x + self.width);
        (self.y..self.y + self.height).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Construction flags for a room
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomOptions {
    /// Walls resist player edits
    pub unbreakable: bool,
    /// Keep items and entities already standing inside the room
    pub objects: bool,
    /// Room starts unexplored
    pub hidden: bool,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            unbreakable: false,
            objects: false,
            hidden: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Spatial hint only; irregular rooms don't fill it
    pub rect: Rect,
    pub hidden: bool,
    pub style: Style,
    /// Interior currently drawn with the roof sprite
    pub roof_shown: bool,
    pub tiles: BTreeSet<(i32, i32)>,
    pub walls: BTreeSet<(i32, i32)>,
    pub corners: BTreeSet<(i32, i32)>,
    pub non_corners: BTreeSet<(i32, i32)>,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>, rect: Rect, style: Style) -> Self {
        Self {
            id,
            name: name.into(),
            rect,
            hidden: true,
            style,
            roof_shown: style.roof.is_some(),
            tiles: BTreeSet::new(),
            walls: BTreeSet::new(),
            corners: BTreeSet::new(),
            non_corners: BTreeSet::new(),
        }
    }

    /// Carve a rectangular room: the border becomes wall, everything inside
    /// becomes floor, and every tile points back at the new room.
    pub fn from_size(
        env: &mut Environment,
        name: impl Into<String>,
        rect: Rect,
        style: Style,
        options: RoomOptions,
    ) -> RoomId {
        let id = env.next_room_id();
        let mut room = Room::new(id, name, rect, style);
        room.hidden = options.hidden;

        for (x, y) in rect.points() {
            // Grid edges stay bedrock
            if !env.in_bounds(x, y) || env.is_edge(x, y) {
                continue;
            }
            if !options.objects {
                env.clear_occupants(x, y);
            }

            if rect.on_border(x, y) {
                env.clear_entity(x, y);
                let Some(tile) = env.get_mut(x, y) else {
                    continue;
                };
                tile.close(style.wall);
                tile.unbreakable = options.unbreakable;
                room.walls.insert((x, y));
                if rect.is_corner(x, y) {
                    room.corners.insert((x, y));
                }
            } else {
                let blocking_item = env.blocking_item_at(x, y);
                let Some(tile) = env.get_mut(x, y) else {
                    continue;
                };
                tile.open(style.interior());
                tile.blocked = blocking_item;
            }

            if let Some(tile) = env.get_mut(x, y) {
                tile.room = Some(id);
                if !options.hidden {
                    tile.hidden = false;
                }
            }
            room.tiles.insert((x, y));
        }
        room.refresh_non_corners();

        log::debug!(
            "Room {} {:?} built at ({}, {}) {}x{}",
            id,
            room.name,
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
        env.rooms.push(room);
        id
    }

    /// Member tiles that are not walls.
    pub fn interior(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.tiles.difference(&self.walls).copied()
    }

    pub fn refresh_non_corners(&mut self) {
        self.non_corners = self.walls.difference(&self.corners).copied().collect();
    }

    pub(crate) fn remove_tile(&mut self, pos: (i32, i32)) {
        self.tiles.remove(&pos);
        self.walls.remove(&pos);
        self.corners.remove(&pos);
        self.non_corners.remove(&pos);
    }
}

/// Corners of an irregular wall outline: wall tiles with a wall neighbor both
/// horizontally and vertically.
pub fn outline_corners(walls: &BTreeSet<(i32, i32)>) -> BTreeSet<(i32, i32)> {
    walls
        .iter()
        .filter(|&&(x, y)| {
            let horizontal = walls.contains(&(x - 1, y)) || walls.contains(&(x + 1, y));
            let vertical = walls.contains(&(x, y - 1)) || walls.contains(&(x, y + 1));
            horizontal && vertical
        })
        .copied()
        .collect()
}
