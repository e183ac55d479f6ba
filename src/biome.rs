//! Biome assignment by weighted nearest seed.
//!
//! Each region gets one seed point and a weight; a tile belongs to the region
//! whose seed is closest by Manhattan distance (in world space) divided by
//! the seed's weight. Heavier seeds claim larger areas.

use crate::constants::{BIOME_MAX_WEIGHT, BIOME_MIN_WEIGHT};
use crate::environment::Environment;
use crate::tile::Sprite;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A labelled region and the floor sprite its open tiles start with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub floor: Sprite,
}

impl Region {
    pub fn new(name: impl Into<String>, floor: Sprite) -> Self {
        Self {
            name: name.into(),
            floor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeSeed {
    pub center: Vec2,
    pub weight: f32,
}

/// One random seed per region, centred on a random tile.
pub fn random_seeds(env: &Environment, count: usize, rng: &mut impl Rng) -> Vec<BiomeSeed> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..env.width as i32);
            let y = rng.gen_range(0..env.height as i32);
            let center = env
                .get(x, y)
                .map(|t| t.position)
                .unwrap_or(Vec2::ZERO);
            BiomeSeed {
                center,
                weight: rng.gen_range(BIOME_MIN_WEIGHT..=BIOME_MAX_WEIGHT),
            }
        })
        .collect()
}

/// Index of the seed with the smallest weighted distance. Exact ties go to
/// the lower index.
pub fn nearest_seed(position: Vec2, seeds: &[BiomeSeed]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, seed) in seeds.iter().enumerate() {
        let distance = (position - seed.center).abs().element_sum() / seed.weight;
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Partition the level into `regions` with freshly rolled seeds. Returns the
/// seeds so the same partition can be reproduced.
pub fn assign_biomes(env: &mut Environment, regions: &[Region], rng: &mut impl Rng) -> Vec<BiomeSeed> {
    let seeds = random_seeds(env, regions.len(), rng);
    assign_biomes_with_seeds(env, regions, &seeds);
    seeds
}

/// Label every tile with its region. Open tiles also take the region's floor
/// sprite; blocked tiles keep theirs so sprite and passability agree.
pub fn assign_biomes_with_seeds(env: &mut Environment, regions: &[Region], seeds: &[BiomeSeed]) {
    puffin::profile_function!();
    debug_assert_eq!(regions.len(), seeds.len());
    let count = regions.len().min(seeds.len());
    let seeds = &seeds[..count];

    let mut sizes = vec![0usize; count];
    for tile in env.tiles.iter_mut() {
        let Some(region) = nearest_seed(tile.position, seeds) else {
            tile.region = None;
            continue;
        };
        tile.region = Some(region);
        sizes[region] += 1;
        if !tile.blocked {
            tile.sprite = regions[region].floor;
        }
    }
    env.regions = regions[..count].to_vec();

    for (region, size) in regions.iter().zip(&sizes) {
        if *size == 0 {
            log::warn!("Region {:?} received no tiles", region.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Fill;
    use crate::tile::{tile_ids, Style};

    fn regions() -> Vec<Region> {
        vec![
            Region::new("meadow", tile_ids::GRASS),
            Region::new("desert", tile_ids::SAND),
            Region::new("bog", tile_ids::MOSS),
        ]
    }

    #[test]
    fn test_weighted_distance_picks_nearest() {
        let seeds = [
            BiomeSeed { center: Vec2::new(0.0, 0.0), weight: 1.0 },
            BiomeSeed { center: Vec2::new(100.0, 0.0), weight: 1.0 },
        ];
        assert_eq!(nearest_seed(Vec2::new(10.0, 5.0), &seeds), Some(0));
        assert_eq!(nearest_seed(Vec2::new(90.0, 5.0), &seeds), Some(1));
    }

    #[test]
    fn test_heavier_seed_claims_more() {
        let seeds = [
            BiomeSeed { center: Vec2::new(0.0, 0.0), weight: 1.0 },
            BiomeSeed { center: Vec2::new(100.0, 0.0), weight: 3.0 },
        ];
        // 40 from seed 0, 60 / 3 = 20 from seed 1
        assert_eq!(nearest_seed(Vec2::new(40.0, 0.0), &seeds), Some(1));
    }

    #[test]
    fn test_tie_goes_to_lower_index() {
        let seeds = [
            BiomeSeed { center: Vec2::new(0.0, 0.0), weight: 1.0 },
            BiomeSeed { center: Vec2::new(20.0, 0.0), weight: 1.0 },
        ];
        assert_eq!(nearest_seed(Vec2::new(10.0, 0.0), &seeds), Some(0));
        assert_eq!(nearest_seed(Vec2::ZERO, &[]), None);
    }

    #[test]
    fn test_every_tile_labelled() {
        let mut env = Environment::new(20, 15, Style::default(), Fill::Open);
        let mut rng = rand::thread_rng();
        assign_biomes(&mut env, &regions(), &mut rng);

        assert_eq!(env.regions.len(), 3);
        for tile in &env.tiles {
            let region = tile.region.unwrap();
            if !tile.blocked {
                assert_eq!(tile.sprite, env.regions[region].floor);
            }
        }
    }

    #[test]
    fn test_same_seeds_same_labels() {
        let mut env = Environment::new(20, 15, Style::default(), Fill::Open);
        let seeds = assign_biomes(&mut env, &regions(), &mut rand::thread_rng());
        let first: Vec<_> = env.tiles.iter().map(|t| t.region).collect();

        assign_biomes_with_seeds(&mut env, &regions(), &seeds);
        let second: Vec<_> = env.tiles.iter().map(|t| t.region).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_weights_in_range() {
        let env = Environment::new(20, 15, Style::default(), Fill::Open);
        let mut rng = rand::thread_rng();
        for seed in random_seeds(&env, 50, &mut rng) {
            assert!((BIOME_MIN_WEIGHT..=BIOME_MAX_WEIGHT).contains(&seed.weight));
        }
    }

    #[test]
    fn test_shadowed_region_stays_empty() {
        let mut env = Environment::new(20, 15, Style::default(), Fill::Open);
        let seeds = [
            BiomeSeed { center: Vec2::new(50.0, 50.0), weight: 1.0 },
            BiomeSeed { center: Vec2::new(50.0, 50.0), weight: 1.0 },
        ];
        assign_biomes_with_seeds(&mut env, &regions()[..2], &seeds);

        // The duplicate seed loses every tie, so its region gets nothing
        assert_eq!(env.regions.len(), 2);
        assert!(env.tiles.iter().all(|t| t.region == Some(0)));
    }
}
