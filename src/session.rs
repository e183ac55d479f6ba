//! The active level and the state that travels with it.

use crate::boundary;
use crate::components::Actor;
use crate::config::GenerationConfig;
use crate::dungeon_gen::generate_level;
use crate::environment::Environment;
use crate::error::{GenerationError, PlacementError, TerrainError};
use crate::exploration::{ExplorationTracker, Reveal};
use crate::placement::place_object;
use crate::room::RoomId;
use crate::tile::Sprite;
use hecs::Entity;
use rand::Rng;

/// Owns the current environment and fog-of-war bookkeeping. Every gameplay
/// mutation of the level goes through here.
pub struct Session {
    pub environment: Environment,
    pub explorer: ExplorationTracker,
}

impl Session {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            explorer: ExplorationTracker::new(),
        }
    }

    /// Generate a fresh level and start a session on it.
    pub fn generate(config: &GenerationConfig, rng: &mut impl Rng) -> Result<Self, GenerationError> {
        Ok(Self::new(generate_level(config, rng)?))
    }

    /// Spawn an actor at `loc` and reveal its surroundings.
    pub fn spawn_actor(&mut self, loc: (i32, i32)) -> Result<Entity, PlacementError> {
        let actor = self.environment.world.spawn((Actor,));
        if let Err(err) = place_object(&mut self.environment, actor, loc) {
            let _ = self.environment.world.despawn(actor);
            return Err(err);
        }
        self.explorer.reveal(&mut self.environment, actor, loc);
        Ok(actor)
    }

    /// Move an entity and update exploration.
    pub fn move_entity(&mut self, entity: Entity, loc: (i32, i32)) -> Result<Reveal, PlacementError> {
        place_object(&mut self.environment, entity, loc)?;
        Ok(self.explorer.reveal(&mut self.environment, entity, loc))
    }

    pub fn build_wall(&mut self, loc: (i32, i32), sprite: Sprite) -> Result<Option<RoomId>, TerrainError> {
        boundary::build_wall(&mut self.environment, loc, sprite)
    }

    pub fn dig(&mut self, loc: (i32, i32)) -> Result<(), TerrainError> {
        boundary::dig(&mut self.environment, loc)
    }

    /// Swap in another level, e.g. after taking the stairs. Entity tracking
    /// from the old level is dropped.
    pub fn replace_environment(&mut self, environment: Environment) -> Environment {
        self.explorer = ExplorationTracker::new();
        std::mem::replace(&mut self.environment, environment)
    }
}
