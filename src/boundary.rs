//! Turning player-built walls into rooms.
//!
//! Placed wall tiles are linked into an 8-connected graph. A loop of at least
//! `MIN_ENCLOSING_CYCLE` walls may enclose space; whatever the outside can't
//! reach by 4-connected flood fill becomes the new room's floor.

use crate::constants::MIN_ENCLOSING_CYCLE;
use crate::environment::Environment;
use crate::error::TerrainError;
use crate::room::{outline_corners, Rect, Room, RoomId};
use crate::tile::{Sprite, Style};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Grow the graph of placed tiles connected to `origin`, breadth first.
pub fn placed_graph(env: &Environment, origin: (i32, i32)) -> UnGraph<(i32, i32), ()> {
    let mut graph = UnGraph::new_undirected();
    if !env.get(origin.0, origin.1).is_some_and(|t| t.placed) {
        return graph;
    }

    let mut nodes: HashMap<(i32, i32), NodeIndex> = HashMap::new();
    nodes.insert(origin, graph.add_node(origin));
    let mut queue = VecDeque::from([origin]);

    while let Some(pos) = queue.pop_front() {
        let from = nodes[&pos];
        for neighbor in env.neighbors(pos.0, pos.1) {
            if !env.get(neighbor.0, neighbor.1).is_some_and(|t| t.placed) {
                continue;
            }
            let to = *nodes.entry(neighbor).or_insert_with(|| {
                queue.push_back(neighbor);
                graph.add_node(neighbor)
            });
            graph.update_edge(from, to, ());
        }
    }

    graph
}

struct Frame {
    node: NodeIndex,
    parent: Option<NodeIndex>,
    unexplored: Vec<NodeIndex>,
}

/// Depth-first search for a cycle of at least `min_len` nodes. Back edges to
/// the immediate parent don't count, and shorter cycles are ignored.
///
/// Which back edges a single DFS sees depends on where it starts (two
/// triangles sharing an edge hide their 4-cycle from some roots), so every
/// node gets a turn as the root.
pub fn has_cycle_of_length<N, E>(graph: &UnGraph<N, E>, min_len: usize) -> bool {
    graph
        .node_indices()
        .any(|start| cycle_from(graph, start, min_len))
}

fn cycle_from<N, E>(graph: &UnGraph<N, E>, start: NodeIndex, min_len: usize) -> bool {
    let mut visited = vec![false; graph.node_count()];
    // Position on the current path, while the node is on it
    let mut depth: Vec<Option<usize>> = vec![None; graph.node_count()];

    visited[start.index()] = true;
    depth[start.index()] = Some(0);
    let mut path = vec![Frame {
        node: start,
        parent: None,
        unexplored: graph.neighbors(start).collect(),
    }];

    while let Some(frame) = path.last_mut() {
        match frame.unexplored.pop() {
            None => {
                depth[frame.node.index()] = None;
                path.pop();
            }
            Some(next) if Some(next) == frame.parent => {}
            Some(next) => {
                let node = frame.node;
                if let Some(d) = depth[next.index()] {
                    if path.len() - d >= min_len {
                        return true;
                    }
                } else if !visited[next.index()] {
                    visited[next.index()] = true;
                    depth[next.index()] = Some(path.len());
                    path.push(Frame {
                        node: next,
                        parent: Some(node),
                        unexplored: graph.neighbors(next).collect(),
                    });
                }
            }
        }
    }

    false
}

/// Check whether the placed tile at `origin` closes a loop of walls, and if
/// so build a room from what it encloses.
pub fn resolve_boundary(
    env: &mut Environment,
    origin: (i32, i32),
    name: &str,
    style: Style,
) -> Option<RoomId> {
    let graph = placed_graph(env, origin);
    if !has_cycle_of_length(&graph, MIN_ENCLOSING_CYCLE) {
        return None;
    }

    let boundary: BTreeSet<(i32, i32)> = graph.node_weights().copied().collect();
    let bounds = Rect::bounding(boundary.iter().copied())?;
    let id = Room::from_boundary(env, name, &boundary, bounds, style);
    if let Some(id) = id {
        log::debug!(
            "Walls around {:?} enclose room {} ({} boundary tiles)",
            origin,
            id,
            boundary.len()
        );
    }
    id
}

impl Room {
    /// Build a room from a closed set of boundary tiles inside `bounds`.
    /// Cells of the box that the outside can't reach become floor, and the
    /// boundary tiles next to that floor become walls. Rooms already lying
    /// wholly inside the loop and unbreakable cells are left as they are.
    /// Returns `None` if nothing new is enclosed.
    pub fn from_boundary(
        env: &mut Environment,
        name: impl Into<String>,
        boundary: &BTreeSet<(i32, i32)>,
        bounds: Rect,
        style: Style,
    ) -> Option<RoomId> {
        let mut floor = enclosed_cells(env, boundary, bounds);
        let settled = settled_tiles(env, &floor, boundary);
        floor.retain(|&(x, y)| {
            !settled.contains(&(x, y)) && env.get(x, y).is_some_and(|t| !t.unbreakable)
        });
        if floor.is_empty() {
            return None;
        }

        // Tail walls that don't face the new floor stay unowned
        let walls: BTreeSet<(i32, i32)> = boundary
            .iter()
            .filter(|&&(x, y)| {
                !settled.contains(&(x, y)) && env.neighbors(x, y).any(|n| floor.contains(&n))
            })
            .copied()
            .collect();
        let rect = Rect::bounding(floor.iter().chain(walls.iter()).copied())?;

        let id = env.next_room_id();
        let mut room = Room::new(id, name, rect, style);
        room.hidden = false;
        room.roof_shown = false;

        for &(x, y) in floor.iter().chain(walls.iter()) {
            env.detach_tile(x, y);
        }
        for &(x, y) in &floor {
            let blocking_item = env.blocking_item_at(x, y);
            if let Some(tile) = env.get_mut(x, y) {
                tile.open(style.floor);
                tile.blocked = blocking_item;
                tile.room = Some(id);
                tile.hidden = false;
            }
            room.tiles.insert((x, y));
        }
        for &(x, y) in &walls {
            if let Some(tile) = env.get_mut(x, y) {
                tile.room = Some(id);
                tile.hidden = false;
            }
            room.tiles.insert((x, y));
            room.walls.insert((x, y));
        }
        room.corners = outline_corners(&room.walls);
        room.refresh_non_corners();

        env.rooms.push(room);
        env.drop_empty_rooms();
        Some(id)
    }
}

/// Tiles of every room that lies entirely within `enclosed` and `boundary`.
/// Such a room is already closed off by this loop, e.g. an earlier enclosure
/// that just grew a tail, or a vault the player walled around.
fn settled_tiles(
    env: &Environment,
    enclosed: &BTreeSet<(i32, i32)>,
    boundary: &BTreeSet<(i32, i32)>,
) -> BTreeSet<(i32, i32)> {
    let owners: BTreeSet<RoomId> = enclosed
        .iter()
        .filter_map(|&(x, y)| env.get(x, y).and_then(|t| t.room))
        .collect();

    owners
        .into_iter()
        .filter_map(|id| env.room(id))
        .filter(|room| {
            room.tiles
                .iter()
                .all(|p| enclosed.contains(p) || boundary.contains(p))
        })
        .flat_map(|room| room.tiles.iter().copied())
        .collect()
}

/// Cells of `bounds` that are neither boundary nor reachable from the box's
/// perimeter through open (non-placed) cells.
fn enclosed_cells(
    env: &Environment,
    boundary: &BTreeSet<(i32, i32)>,
    bounds: Rect,
) -> BTreeSet<(i32, i32)> {
    // Out-of-grid and player-built cells stop the fill
    let passable = |x: i32, y: i32| {
        !boundary.contains(&(x, y)) && env.get(x, y).is_some_and(|t| !t.placed)
    };

    let mut reached: HashSet<(i32, i32)> = HashSet::new();
    let mut queue: VecDeque<(i32, i32)> = bounds
        .points()
        .filter(|&(x, y)| bounds.on_border(x, y) && passable(x, y))
        .collect();
    reached.extend(queue.iter().copied());

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in ORTHOGONAL {
            let next = (x + dx, y + dy);
            if bounds.contains(next.0, next.1) && passable(next.0, next.1) && reached.insert(next) {
                queue.push_back(next);
            }
        }
    }

    bounds
        .points()
        .filter(|p| !reached.contains(p) && passable(p.0, p.1))
        .collect()
}

/// Player builds a wall. Refuses unbreakable or occupied tiles. Returns the
/// room the new wall closed off, if any.
pub fn build_wall(
    env: &mut Environment,
    loc: (i32, i32),
    sprite: Sprite,
) -> Result<Option<RoomId>, TerrainError> {
    let (x, y) = loc;
    let tile = env.get_mut(x, y).ok_or(TerrainError::OutOfBounds(x, y))?;
    if tile.unbreakable {
        return Err(TerrainError::Unbreakable(x, y));
    }
    if tile.entity.is_some() || tile.item.is_some() {
        return Err(TerrainError::Occupied(x, y));
    }
    tile.close(sprite);
    tile.placed = true;

    let style = Style::new(env.style.floor, sprite, None);
    Ok(resolve_boundary(env, loc, "enclosure", style))
}

/// Player knocks a tile open. Refuses unbreakable tiles. Furniture on the
/// tile keeps it blocked.
pub fn dig(env: &mut Environment, loc: (i32, i32)) -> Result<(), TerrainError> {
    let (x, y) = loc;
    let tile = env.get(x, y).ok_or(TerrainError::OutOfBounds(x, y))?;
    if tile.unbreakable {
        return Err(TerrainError::Unbreakable(x, y));
    }
    let sprite = env.floor_sprite_at(x, y);
    let blocking_item = env.blocking_item_at(x, y);
    if let Some(tile) = env.get_mut(x, y) {
        tile.open(sprite);
        tile.blocked = blocking_item;
        tile.placed = false;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Actor, BlocksMovement, Item};
    use crate::environment::Fill;
    use crate::placement::place_object;
    use crate::room::RoomOptions;
    use crate::tile::tile_ids;

    fn open_env() -> Environment {
        Environment::new(20, 15, Style::default(), Fill::Open)
    }

    fn build_all(env: &mut Environment, walls: &[(i32, i32)]) -> Option<RoomId> {
        let mut last = None;
        for &loc in walls {
            last = build_wall(env, loc, tile_ids::WOOD_WALL).unwrap();
        }
        last
    }

    /// Outline of `rect`, ordered so the middle of the left side closes it.
    fn border(rect: Rect) -> Vec<(i32, i32)> {
        let last = (rect.x, rect.y + rect.height / 2);
        let mut tiles: Vec<_> = rect
            .points()
            .filter(|&(x, y)| rect.on_border(x, y) && (x, y) != last)
            .collect();
        tiles.push(last);
        tiles
    }

    fn assert_rooms_have_tiles(env: &Environment) {
        for room in &env.rooms {
            assert!(!room.tiles.is_empty(), "room {} is empty", room.id);
        }
        assert!(env.check_integrity().is_empty(), "{:?}", env.check_integrity());
    }

    #[test]
    fn test_diamond_loop_encloses_one_tile() {
        let mut env = open_env();
        let id = build_all(&mut env, &[(5, 4), (4, 5), (6, 5), (5, 6)]).unwrap();
        let room = env.room(id).unwrap();

        assert_eq!(room.interior().collect::<Vec<_>>(), vec![(5, 5)]);
        assert_eq!(room.walls.len(), 4);
        let center = env.get(5, 5).unwrap();
        assert!(!center.blocked);
        assert_eq!(center.room, Some(id));
        assert_eq!(center.sprite, env.style.floor);
        assert_eq!(env.get(5, 4).unwrap().sprite, tile_ids::WOOD_WALL);
        assert!(env.check_integrity().is_empty());
    }

    #[test]
    fn test_ring_encloses_center() {
        let mut env = open_env();
        let ring = [(3, 3), (4, 3), (5, 3), (5, 4), (5, 5), (4, 5), (3, 5), (3, 4)];
        let id = build_all(&mut env, &ring).unwrap();
        let room = env.room(id).unwrap();
        assert_eq!(room.interior().collect::<Vec<_>>(), vec![(4, 4)]);
        assert_eq!(room.tiles.len(), 9);
        assert!(room.corners.contains(&(3, 3)));
        assert!(room.corners.contains(&(5, 5)));
    }

    #[test]
    fn test_no_room_until_loop_closes() {
        let mut env = open_env();
        let ring = [(3, 3), (4, 3), (5, 3), (5, 4), (5, 5), (4, 5), (3, 5)];
        assert!(build_all(&mut env, &ring).is_none());
        assert!(env.rooms.is_empty());

        let id = build_wall(&mut env, (3, 4), tile_ids::WOOD_WALL).unwrap();
        assert!(id.is_some());
    }

    #[test]
    fn test_l_shape_is_rejected() {
        let mut env = open_env();
        assert!(build_all(&mut env, &[(5, 5), (6, 5), (5, 6)]).is_none());
        assert!(env.rooms.is_empty());

        let graph = placed_graph(&env, (5, 5));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(has_cycle_of_length(&graph, 3));
        assert!(!has_cycle_of_length(&graph, MIN_ENCLOSING_CYCLE));
    }

    #[test]
    fn test_four_cycle_behind_shared_triangles() {
        // a-b-c and b-c-d share the edge b-c; a-b-d-c-a is the 4-cycle
        let mut graph: UnGraph<(), ()> = UnGraph::new_undirected();
        let [a, b, c, d] = [(); 4].map(|_| graph.add_node(()));
        for (u, v) in [(a, b), (a, c), (b, c), (b, d), (c, d)] {
            graph.add_edge(u, v, ());
        }
        assert!(has_cycle_of_length(&graph, 4));
        assert!(!has_cycle_of_length(&graph, 5));
    }

    #[test]
    fn test_solid_block_encloses_nothing() {
        let mut env = open_env();
        assert!(build_all(&mut env, &[(5, 5), (6, 5), (5, 6), (6, 6)]).is_none());
        assert!(env.rooms.is_empty());
    }

    #[test]
    fn test_open_u_shape_is_not_enclosed() {
        let mut env = open_env();
        let u = [(3, 3), (3, 4), (3, 5), (4, 5), (5, 5), (5, 4), (5, 3)];
        assert!(build_all(&mut env, &u).is_none());
    }

    #[test]
    fn test_graph_only_follows_placed_tiles() {
        let env = open_env();
        // Edge walls are blocked but never placed
        assert_eq!(placed_graph(&env, (0, 0)).node_count(), 0);
    }

    #[test]
    fn test_build_wall_refusals() {
        let mut env = open_env();
        assert_eq!(
            build_wall(&mut env, (0, 3), tile_ids::WOOD_WALL),
            Err(TerrainError::Unbreakable(0, 3))
        );
        assert_eq!(
            build_wall(&mut env, (30, 3), tile_ids::WOOD_WALL),
            Err(TerrainError::OutOfBounds(30, 3))
        );

        let actor = env.world.spawn((Actor,));
        place_object(&mut env, actor, (4, 4)).unwrap();
        assert_eq!(
            build_wall(&mut env, (4, 4), tile_ids::WOOD_WALL),
            Err(TerrainError::Occupied(4, 4))
        );
    }

    #[test]
    fn test_dig_reopens_placed_wall() {
        let mut env = open_env();
        build_wall(&mut env, (4, 4), tile_ids::WOOD_WALL).unwrap();
        assert!(env.get(4, 4).unwrap().blocked);

        dig(&mut env, (4, 4)).unwrap();
        let tile = env.get(4, 4).unwrap();
        assert!(!tile.blocked);
        assert!(!tile.placed);
        assert_eq!(dig(&mut env, (0, 0)), Err(TerrainError::Unbreakable(0, 0)));
    }

    #[test]
    fn test_enclosing_inside_a_room_moves_tiles() {
        let mut env = open_env();
        let outer = Room::from_size(
            &mut env,
            "hall",
            Rect::new(2, 2, 10, 10),
            Style::default(),
            Default::default(),
        );
        let inner = build_all(&mut env, &[(6, 5), (5, 6), (7, 6), (6, 7)]).unwrap();

        assert_eq!(env.get(6, 6).unwrap().room, Some(inner));
        assert!(!env.room(outer).unwrap().tiles.contains(&(6, 6)));
        assert!(env.check_integrity().is_empty());
    }

    #[test]
    fn test_walls_added_to_closed_ring_make_no_new_room() {
        let mut env = open_env();
        let ring = [(3, 3), (4, 3), (5, 3), (5, 4), (5, 5), (4, 5), (3, 5), (3, 4)];
        let id = build_all(&mut env, &ring).unwrap();

        assert_eq!(build_wall(&mut env, (6, 3), tile_ids::WOOD_WALL), Ok(None));
        assert_eq!(build_wall(&mut env, (7, 3), tile_ids::WOOD_WALL), Ok(None));

        assert_eq!(env.rooms.len(), 1);
        let room = env.room(id).unwrap();
        assert_eq!(room.walls.len(), 8);
        assert_eq!(room.tiles.len(), 9);
        assert_eq!(env.get(6, 3).unwrap().room, None);
        assert_rooms_have_tiles(&env);
    }

    #[test]
    fn test_second_loop_beside_first_builds_its_own_room() {
        let mut env = open_env();
        let first = build_all(&mut env, &border(Rect::new(3, 3, 3, 3))).unwrap();
        // Shares the column x = 5 with the first ring
        let second = build_all(&mut env, &[(6, 3), (7, 3), (7, 4), (7, 5), (6, 5)]).unwrap();

        assert_ne!(first, second);
        assert_eq!(env.rooms.len(), 2);
        assert_eq!(env.get(4, 4).unwrap().room, Some(first));
        assert_eq!(env.get(6, 4).unwrap().room, Some(second));
        assert_eq!(env.room(first).unwrap().tiles.len(), 9);
        assert_rooms_have_tiles(&env);
    }

    #[test]
    fn test_walling_in_an_unbreakable_vault() {
        let mut env = open_env();
        let options = RoomOptions {
            unbreakable: true,
            ..Default::default()
        };
        let vault = Room::from_size(&mut env, "vault", Rect::new(5, 5, 3, 3), Style::default(), options);

        // Snug ring: nothing new is enclosed
        assert!(build_all(&mut env, &border(Rect::new(4, 4, 5, 5))).is_none());
        assert_eq!(env.rooms.len(), 1);
        let corner = env.get(5, 5).unwrap();
        assert!(corner.blocked);
        assert!(corner.unbreakable);
        assert_eq!(corner.room, Some(vault));
        assert_rooms_have_tiles(&env);
    }

    #[test]
    fn test_enclosure_around_vault_leaves_it_whole() {
        let mut env = open_env();
        let options = RoomOptions {
            unbreakable: true,
            ..Default::default()
        };
        let vault = Room::from_size(&mut env, "vault", Rect::new(5, 5, 3, 3), Style::default(), options);
        let pillar = env.get_mut(4, 6).unwrap();
        pillar.blocked = true;
        pillar.unbreakable = true;

        let yard = build_all(&mut env, &border(Rect::new(3, 3, 7, 7))).unwrap();

        assert_eq!(env.rooms.len(), 2);
        assert_eq!(env.room(vault).unwrap().tiles.len(), 9);
        for (x, y) in Rect::new(5, 5, 3, 3).points() {
            assert_eq!(env.get(x, y).unwrap().room, Some(vault));
        }
        assert!(env.get(5, 5).unwrap().blocked);
        // The loose unbreakable pillar stays as it was
        let pillar = env.get(4, 6).unwrap();
        assert!(pillar.blocked);
        assert_eq!(pillar.room, None);
        // 25 cells inside the ring, minus the vault and the pillar
        let room = env.room(yard).unwrap();
        assert_eq!(room.interior().count(), 15);
        assert_eq!(room.walls.len(), 24);
        assert_rooms_have_tiles(&env);
    }

    #[test]
    fn test_enclosed_furniture_keeps_blocking() {
        let mut env = open_env();
        let table = env.world.spawn((Item::new(tile_ids::TABLE), BlocksMovement));
        place_object(&mut env, table, (5, 5)).unwrap();

        build_all(&mut env, &[(5, 4), (4, 5), (6, 5), (5, 6)]).unwrap();

        let tile = env.get(5, 5).unwrap();
        assert!(tile.blocked);
        assert_eq!(tile.item, Some(table));
    }

    #[test]
    fn test_dig_keeps_furniture_blocking() {
        let mut env = open_env();
        let table = env.world.spawn((Item::new(tile_ids::TABLE), BlocksMovement));
        place_object(&mut env, table, (4, 4)).unwrap();

        dig(&mut env, (4, 4)).unwrap();

        let tile = env.get(4, 4).unwrap();
        assert!(tile.blocked);
        assert_eq!(tile.item, Some(table));
        assert!(env.check_integrity().is_empty());
    }
}
