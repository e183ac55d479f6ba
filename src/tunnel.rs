//! Straight corridors cut through the grid.

use crate::environment::Environment;
use crate::tile::Sprite;

impl Environment {
    /// Open every tile from `x1` to `x2` (inclusive, either order) on row `y`.
    pub fn carve_horizontal(&mut self, x1: i32, x2: i32, y: i32, style: Option<Sprite>) {
        let start = x1.min(x2);
        let end = x1.max(x2);

        for x in start..=end {
            self.carve_tile(x, y, style);
        }
    }

    /// Open every tile from `y1` to `y2` (inclusive, either order) on column `x`.
    pub fn carve_vertical(&mut self, y1: i32, y2: i32, x: i32, style: Option<Sprite>) {
        let start = y1.min(y2);
        let end = y1.max(y2);

        for y in start..=end {
            self.carve_tile(x, y, style);
        }
    }

    /// Connect two points with an L-shaped corridor, horizontal leg first if
    /// `horizontal_first`.
    pub fn carve_l(&mut self, from: (i32, i32), to: (i32, i32), horizontal_first: bool) {
        let ((x1, y1), (x2, y2)) = (from, to);
        if horizontal_first {
            self.carve_horizontal(x1, x2, y1, None);
            self.carve_vertical(y1, y2, x2, None);
        } else {
            self.carve_vertical(y1, y2, x1, None);
            self.carve_horizontal(x1, x2, y2, None);
        }
    }

    fn carve_tile(&mut self, x: i32, y: i32, style: Option<Sprite>) {
        // Speculative coordinates are common; the grid edge never opens
        if !self.in_bounds(x, y) || self.is_edge(x, y) {
            return;
        }
        let sprite = style.unwrap_or_else(|| self.floor_sprite_at(x, y));
        self.clear_entity(x, y);
        // Furniture in the way is smashed; loose items stay
        self.clear_blocking_item(x, y);
        if let Some(tile) = self.get_mut(x, y) {
            tile.open(sprite);
        }
    }
}
