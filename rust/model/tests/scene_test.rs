// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene queries across two rooms separated by a shared wall.

use approx::assert_relative_eq;
use floorsnap_geometry::{Loop, PointPosition};
use floorsnap_model::{
    Beam, EntityKey, Error, Hole, Room, Scene, Structure, StructureKind, Wall, BOUNDARY_TOL,
};
use nalgebra::{Point2, Vector2};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Loop {
    Loop::from_points(&[
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ])
    .unwrap()
}

/// Two 4 x 4 rooms side by side, the middle wall centered on x = 4.1
fn two_rooms() -> Scene {
    let mut scene = Scene::new();
    let outer = [
        (Point2::new(-0.1, -0.1), Point2::new(8.3, -0.1)),
        (Point2::new(8.3, -0.1), Point2::new(8.3, 4.1)),
        (Point2::new(8.3, 4.1), Point2::new(-0.1, 4.1)),
        (Point2::new(-0.1, 4.1), Point2::new(-0.1, -0.1)),
        (Point2::new(4.1, -0.1), Point2::new(4.1, 4.1)),
    ];
    for (a, b) in outer {
        scene.add_wall(Wall::line(a, b, 0.2)).unwrap();
    }
    scene.add_room(Room::new(rect(0.0, 0.0, 4.0, 4.0)));
    scene.add_room(Room::new(rect(4.2, 0.0, 8.2, 4.0)));
    scene
}

#[test]
fn shared_wall_bounds_both_rooms() {
    let scene = two_rooms();
    let rooms: Vec<_> = scene.rooms().map(|(k, _)| k).collect();
    let middle = scene
        .walls()
        .find(|(_, w)| w.curve.start_pt() == Point2::new(4.1, -0.1))
        .map(|(k, _)| k)
        .unwrap();
    let left = scene.room_walls(rooms[0]).unwrap();
    let right = scene.room_walls(rooms[1]).unwrap();
    assert_eq!(left.len(), 4);
    assert_eq!(right.len(), 4);
    assert!(left.contains(&middle) && right.contains(&middle));
    // the long top and bottom walls run along both rooms
    assert_eq!(left.iter().filter(|w| right.contains(w)).count(), 3);
}

#[test]
fn content_follows_its_room() {
    let mut scene = two_rooms();
    let rooms: Vec<_> = scene.rooms().map(|(k, _)| k).collect();
    let column: EntityKey = scene
        .add_structure(Structure::new(
            StructureKind::Flue,
            Point2::new(1.0, 1.0),
            0.3,
            0.3,
        ))
        .unwrap()
        .into();
    assert_eq!(scene.room_containing(column).unwrap(), Some(rooms[0]));

    scene.translate(column, &Vector2::new(5.0, 0.0)).unwrap();
    assert_eq!(scene.room_containing(column).unwrap(), Some(rooms[1]));

    scene.translate(column, &Vector2::new(10.0, 0.0)).unwrap();
    assert_eq!(scene.room_containing(column).unwrap(), None);
}

#[test]
fn beam_across_the_shared_wall_spans_both_rooms() {
    let mut scene = two_rooms();
    let beam = scene
        .add_beam(Beam::from_centerline(Point2::new(2.0, 2.0), Point2::new(6.0, 2.0), 0.2))
        .unwrap();
    assert_eq!(scene.rooms_spanned_by(beam).unwrap().len(), 2);

    scene.set_length_scale(beam, 0.25).unwrap();
    // now from x = 3.5 to 4.5: still touches both rooms
    assert_eq!(scene.rooms_spanned_by(beam).unwrap().len(), 2);
    assert!(matches!(
        scene.set_length_scale(beam, 0.0),
        Err(Error::InvalidDimension(_))
    ));
}

#[test]
fn hole_profile_includes_frame() {
    let mut scene = two_rooms();
    let (wall, _) = scene.walls().next().unwrap();
    let hole = scene
        .add_hole(Hole::new(wall, Point2::new(2.0, -0.1), 0.0, 0.9, 0.2).with_frame(0.05))
        .unwrap();
    let outline = scene.outline(hole.into()).unwrap();
    assert_relative_eq!(outline.area(), 1.0 * 0.2, epsilon = 1e-12);
    assert_eq!(
        outline.point_position(&Point2::new(2.49, -0.1), BOUNDARY_TOL),
        PointPosition::In
    );

    scene.remove(wall.into()).unwrap();
    assert!(!scene.contains(hole.into()));
}
