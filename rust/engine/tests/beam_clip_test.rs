// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beam clipping across rooms, other beams and cache lifetimes.

use approx::assert_relative_eq;
use floorsnap_engine::{BeamClipper, ClipConfig, ElementMove, NoopVisualizer, SnapConfig};
use floorsnap_geometry::{loop_to_loop, Loop, LoopPosition};
use floorsnap_model::{Beam, Room, RoomKey, Scene, Wall, BOUNDARY_TOL};
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

/// Full-height walls whose inner faces bound [0, w] x [0, h]
fn enclose(scene: &mut Scene, w: f64, h: f64) {
    let pts = [
        Point2::new(-0.1, -0.1),
        Point2::new(w + 0.1, -0.1),
        Point2::new(w + 0.1, h + 0.1),
        Point2::new(-0.1, h + 0.1),
    ];
    for i in 0..4 {
        scene
            .add_wall(Wall::line(pts[i], pts[(i + 1) % 4], 0.2))
            .unwrap();
    }
}

fn single_room() -> (Scene, RoomKey) {
    let mut scene = Scene::new();
    enclose(&mut scene, 4.0, 4.0);
    let room = scene.add_room(Room::new(rect(0.0, 0.0, 4.0, 4.0)));
    (scene, room)
}

#[test]
fn clipped_beam_stays_inside_room() {
    let (mut scene, room) = single_room();
    let beam = scene
        .add_beam(Beam::from_centerline(Point2::new(1.0, 1.0), Point2::new(2.0, 2.0), 0.2))
        .unwrap();

    let mut clipper = BeamClipper::new(ClipConfig::default());
    let r = clipper.clip_beam(&mut scene, beam, 0.5).unwrap();
    assert_eq!(r.room, room);
    assert!(r.length > 4.0);

    let profile = scene.beam(beam).unwrap().profile().unwrap();
    let boundary = &scene.room(room).unwrap().boundary;
    assert_eq!(loop_to_loop(&profile, boundary, BOUNDARY_TOL), LoopPosition::In);
}

#[test]
fn tightest_room_wins() {
    let mut scene = Scene::new();
    enclose(&mut scene, 6.0, 4.0);
    let left = scene.add_room(Room::new(rect(0.0, 0.0, 3.0, 4.0)));
    let right = scene.add_room(Room::new(rect(3.0, 0.0, 6.0, 4.0)));
    // only the right room holds this cross beam
    scene
        .add_beam(Beam::from_centerline(Point2::new(4.5, 0.0), Point2::new(4.5, 4.0), 0.2))
        .unwrap();
    let beam = scene
        .add_beam(Beam::from_centerline(Point2::new(2.0, 2.0), Point2::new(4.0, 2.0), 0.2))
        .unwrap();

    let mut clipper = BeamClipper::default();
    let r = clipper.compute(&scene, beam, 1.0).unwrap().unwrap();
    assert_eq!(r.room, right);
    assert_ne!(r.room, left);
    assert_relative_eq!(r.start_param, -2.0, epsilon = 1e-6);
    assert_relative_eq!(r.end_param, 2.4, epsilon = 1e-6);
    assert_relative_eq!(r.length, 4.4, epsilon = 1e-6);
    assert_relative_eq!(r.length_scale, 2.2, epsilon = 1e-6);
    assert_eq!(clipper.cached_rooms(), 2);
}

#[test]
fn cache_holds_until_cleared() {
    let (mut scene, _) = single_room();
    let beam = scene
        .add_beam(Beam::from_centerline(Point2::new(1.0, 2.0), Point2::new(3.0, 2.0), 0.2))
        .unwrap();

    let mut clipper = BeamClipper::default();
    let before = clipper.compute(&scene, beam, 1.0).unwrap().unwrap();
    assert_relative_eq!(before.length, 4.0, epsilon = 1e-6);

    // a new partition splits the room region
    scene
        .add_wall(Wall::line(Point2::new(3.5, -0.1), Point2::new(3.5, 4.1), 0.2))
        .unwrap();
    let stale = clipper.compute(&scene, beam, 1.0).unwrap().unwrap();
    assert_relative_eq!(stale.length, before.length, epsilon = 1e-9);

    clipper.clear_cache();
    assert_eq!(clipper.cached_rooms(), 0);
    let fresh = clipper.compute(&scene, beam, 1.0).unwrap().unwrap();
    assert_relative_eq!(fresh.end_param, 2.4, epsilon = 1e-6);
    assert_relative_eq!(fresh.length, 3.4, epsilon = 1e-6);
}

#[test]
fn height_editable_walls_do_not_stop_beams() {
    let (mut scene, _) = single_room();
    let mut low = Wall::line(Point2::new(3.5, -0.1), Point2::new(3.5, 4.1), 0.2);
    low.height_editable = true;
    scene.add_wall(low).unwrap();
    let beam = scene
        .add_beam(Beam::from_centerline(Point2::new(1.0, 2.0), Point2::new(3.0, 2.0), 0.2))
        .unwrap();

    let r = BeamClipper::default().compute(&scene, beam, 1.0).unwrap().unwrap();
    assert_relative_eq!(r.length, 4.0, epsilon = 1e-6);
}

#[test]
fn dragging_a_beam_reclips_it() {
    let (mut scene, _) = single_room();
    let beam = scene
        .add_beam(Beam::from_centerline(Point2::new(1.0, 2.0), Point2::new(3.0, 2.0), 0.2))
        .unwrap();
    let mut clipper = BeamClipper::default();

    let mut gesture = ElementMove::begin(
        &scene,
        beam.into(),
        Point2::new(2.0, 2.0),
        &SnapConfig::default().with_intensity(0.05),
        Some(&mut clipper),
        NoopVisualizer,
    )
    .unwrap();
    let frame = gesture.update(&mut scene, Vector2::new(0.0, 0.5)).unwrap();
    gesture.finish();

    let clip = frame.clip.unwrap();
    assert_relative_eq!(clip.length, 4.0, epsilon = 1e-6);
    let b = scene.beam(beam).unwrap();
    assert_relative_eq!(b.position, Point2::new(2.0, 2.5), epsilon = 1e-6);
    assert_relative_eq!(b.effective_length(), 4.0, epsilon = 1e-6);
    assert_eq!(clipper.cached_rooms(), 1);
}
