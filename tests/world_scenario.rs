use grid_dungeon::{
    build_wall, combine_rooms, Environment, ExplorationTracker, Fill, Rect, Room, RoomOptions, Session, Style,
};
use grid_dungeon::components::Actor;
use grid_dungeon::tile_ids;

#[test]
fn rectangular_room_then_reveal_from_center() {
    let mut env = Environment::new(20, 15, Style::default(), Fill::Open);
    let rect = Rect::new(2, 2, 6, 4);
    let id = Room::from_size(&mut env, "hall", rect, Style::default(), RoomOptions::default());

    for (x, y) in rect.points() {
        let tile = env.get(x, y).unwrap();
        let on_perimeter = x == 2 || x == 7 || y == 2 || y == 5;
        assert_eq!(tile.blocked, on_perimeter, "tile ({x}, {y})");
        assert_eq!(tile.room, Some(id));
    }
    let room = env.room(id).unwrap();
    assert_eq!(room.walls.len(), 16);
    assert_eq!(room.interior().count(), 8);

    let player = env.world.spawn((Actor,));
    let mut tracker = ExplorationTracker::new();
    tracker.reveal(&mut env, player, rect.center());

    for (x, y) in rect.points() {
        assert!(!env.get(x, y).unwrap().hidden, "tile ({x}, {y}) still hidden");
    }
    assert!(!env.room(id).unwrap().hidden);
    assert!(env.check_integrity().is_empty());
}

#[test]
fn player_walls_off_a_closet() {
    let mut session = Session::new(Environment::new(20, 15, Style::default(), Fill::Open));
    let player = session.spawn_actor((2, 2)).unwrap();

    // Ring around (10, 7); the last wall closes it
    let ring = [(9, 6), (10, 6), (11, 6), (11, 7), (11, 8), (10, 8), (9, 8), (9, 7)];
    let mut created = None;
    for (i, &loc) in ring.iter().enumerate() {
        created = session.build_wall(loc, tile_ids::BRICK_WALL).unwrap();
        if i + 1 < ring.len() {
            assert!(created.is_none());
        }
    }
    let id = created.expect("closing the ring makes a room");

    let env = &session.environment;
    assert_eq!(env.room(id).unwrap().interior().collect::<Vec<_>>(), vec![(10, 7)]);
    assert!(!env.get(10, 7).unwrap().blocked);

    // The closet can't be walked into; knock a wall down first
    assert!(session.move_entity(player, (9, 7)).is_err());
    session.dig((9, 7)).unwrap();
    let reveal = session.move_entity(player, (9, 7)).unwrap();
    assert_eq!(reveal.entered, Some(id));
    let reveal = session.move_entity(player, (10, 7)).unwrap();
    assert_eq!(reveal.entered, None);
}

#[test]
fn touching_and_overlapping_rooms() {
    let mut env = Environment::new(30, 20, Style::default(), Fill::Solid);
    Room::from_size(&mut env, "west", Rect::new(2, 2, 5, 5), Style::default(), RoomOptions::default());
    Room::from_size(&mut env, "east", Rect::new(6, 2, 5, 5), Style::default(), RoomOptions::default());
    Room::from_size(&mut env, "south", Rect::new(12, 10, 6, 6), Style::default(), RoomOptions::default());
    Room::from_size(&mut env, "annex", Rect::new(15, 12, 6, 6), Style::default(), RoomOptions::default());

    assert_eq!(combine_rooms(&mut env), 1);
    assert_eq!(env.rooms.len(), 3);
    assert!(env.get(6, 4).unwrap().blocked);
    assert!(!env.get(15, 13).unwrap().blocked);
    assert!(env.check_integrity().is_empty());

    // The merged room is still solid to a wall builder afterwards
    let loc = (24, 3);
    assert_eq!(build_wall(&mut env, loc, tile_ids::STONE_WALL).unwrap(), None);
}
