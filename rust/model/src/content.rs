// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room membership and outline queries.
//!
//! An element is content of a room when its reference point lies inside or
//! on the room boundary. A wall bounds a room when one of the room's
//! boundary curves runs along a face of the wall for more than the
//! boundary tolerance.

use std::f64::consts::TAU;

use floorsnap_geometry::tolerance::PARALLEL_CROSS_EPS;
use floorsnap_geometry::{clip_line, Curve2d, Loop, Polygon};
use nalgebra::Point2;
use smallvec::SmallVec;

use crate::entities::{Wall, BOUNDARY_TOL};
use crate::error::{Error, Result};
use crate::keys::*;
use crate::scene::Scene;

impl Scene {
    /// Point used for room membership: the element position, a wall's
    /// midpoint or a room's centroid
    pub fn reference_point(&self, key: EntityKey) -> Result<Point2<f64>> {
        match key {
            EntityKey::Wall(k) => Ok(self.wall(k)?.mid_pt()),
            EntityKey::Structure(k) => Ok(self.structure(k)?.position),
            EntityKey::Beam(k) => Ok(self.beam(k)?.position),
            EntityKey::Hole(k) => Ok(self.hole(k)?.position),
            EntityKey::Room(k) => Ok(self.room(k)?.boundary.centroid()),
        }
    }

    /// Closed outline of an entity
    pub fn outline(&self, key: EntityKey) -> Result<Loop> {
        match key {
            EntityKey::Wall(k) => self.wall(k)?.footprint(),
            EntityKey::Structure(k) => self.structure(k)?.profile(),
            EntityKey::Beam(k) => self.beam(k)?.profile(),
            EntityKey::Hole(k) => self.hole(k)?.front_profile(),
            EntityKey::Room(k) => Ok(self.room(k)?.boundary.clone()),
        }
    }

    /// Current rotation in degrees of a movable element
    pub fn rotation(&self, key: EntityKey) -> Result<f64> {
        match key {
            EntityKey::Structure(k) => Ok(self.structure(k)?.rotation),
            EntityKey::Beam(k) => Ok(self.beam(k)?.rotation),
            EntityKey::Hole(k) => Ok(self.hole(k)?.rotation),
            EntityKey::Wall(_) | EntityKey::Room(_) => Err(Error::NotMovable(key)),
        }
    }

    pub fn is_content_in_room(&self, key: EntityKey, room: RoomKey) -> Result<bool> {
        let p = self.reference_point(key)?;
        Ok(self.room(room)?.contains_point(&p))
    }

    /// First room, in storage order, containing the element
    pub fn room_containing(&self, key: EntityKey) -> Result<Option<RoomKey>> {
        let p = self.reference_point(key)?;
        Ok(self
            .rooms
            .iter()
            .find(|(_, room)| room.contains_point(&p))
            .map(|(k, _)| k))
    }

    pub fn structures_in_room(&self, room: RoomKey) -> Result<SmallVec<[StructureKey; 8]>> {
        let room = self.room(room)?;
        Ok(self
            .structures
            .iter()
            .filter(|(_, s)| room.contains_point(&s.position))
            .map(|(k, _)| k)
            .collect())
    }

    pub fn beams_in_room(&self, room: RoomKey) -> Result<SmallVec<[BeamKey; 8]>> {
        let room = self.room(room)?;
        Ok(self
            .beams
            .iter()
            .filter(|(_, b)| room.contains_point(&b.position))
            .map(|(k, _)| k)
            .collect())
    }

    /// Walls whose faces carry part of the room boundary. A room side built
    /// from several collinear walls yields every one of them.
    pub fn room_walls(&self, room: RoomKey) -> Result<Vec<WallKey>> {
        let room = self.room(room)?;
        let curves = room.boundary.curves();
        Ok(self
            .walls
            .iter()
            .filter(|(_, wall)| curves.iter().any(|c| runs_along(wall, c)))
            .map(|(k, _)| k)
            .collect())
    }

    /// Holes hosted by any of `walls`
    pub fn holes_on(&self, walls: &[WallKey]) -> Vec<HoleKey> {
        self.holes
            .iter()
            .filter(|(_, h)| walls.contains(&h.host))
            .map(|(k, _)| k)
            .collect()
    }

    /// Rooms whose interior the beam's centerline passes through
    pub fn rooms_spanned_by(&self, beam: BeamKey) -> Result<Vec<RoomKey>> {
        let centerline = self.beam(beam)?.centerline();
        Ok(self
            .rooms
            .iter()
            .filter(|(_, room)| {
                let region = [Polygon::from_loop(room.boundary.clone())];
                !clip_line(&centerline, &region, BOUNDARY_TOL).is_empty()
            })
            .map(|(k, _)| k)
            .collect())
    }
}

const FACE_SAMPLES: usize = 16;

/// True when `boundary` follows a face of `wall` over more than the
/// boundary tolerance
fn runs_along(wall: &Wall, boundary: &Curve2d) -> bool {
    let reach = wall.half_width() + BOUNDARY_TOL;
    let near = |p: Point2<f64>| wall.curve.distance_to_point(&p) <= reach;
    match (boundary, &wall.curve) {
        (Curve2d::Line(b), Curve2d::Line(w)) => {
            if b.is_degenerate()
                || !b.is_parallel_to(w, PARALLEL_CROSS_EPS)
                || b.distance_to_line(&w.start) > reach
            {
                return false;
            }
            let (t0, t1) = (b.param_at(&w.start), b.param_at(&w.end));
            t0.max(t1).min(b.length()) - t0.min(t1).max(0.0) > BOUNDARY_TOL
        }
        // interior samples only, so touching an end point is not enough
        (Curve2d::Line(b), _) => {
            sample_fractions().any(|f| near(b.point_at(b.length() * f)))
        }
        (Curve2d::Arc(a), _) => {
            sample_fractions().any(|f| near(a.point_at_angle(a.start_angle + a.sweep * f)))
        }
        (Curve2d::Circle(c), _) => sample_fractions().any(|f| near(c.point_at_angle(TAU * f))),
    }
}

fn sample_fractions() -> impl Iterator<Item = f64> {
    (0..FACE_SAMPLES).map(|i| (i as f64 + 0.5) / FACE_SAMPLES as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Beam, Room, Structure, StructureKind, Wall};

    fn square_room(x0: f64, size: f64) -> Room {
        Room::new(
            Loop::from_points(&[
                Point2::new(x0, 0.0),
                Point2::new(x0 + size, 0.0),
                Point2::new(x0 + size, size),
                Point2::new(x0, size),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn structure_membership() {
        let mut scene = Scene::new();
        let room = scene.add_room(square_room(0.0, 4.0));
        let inside = scene
            .add_structure(Structure::new(
                StructureKind::SquareColumn,
                Point2::new(1.0, 1.0),
                0.4,
                0.4,
            ))
            .unwrap();
        let outside = scene
            .add_structure(Structure::new(
                StructureKind::SquareColumn,
                Point2::new(9.0, 1.0),
                0.4,
                0.4,
            ))
            .unwrap();

        assert!(scene.is_content_in_room(inside.into(), room).unwrap());
        assert!(!scene.is_content_in_room(outside.into(), room).unwrap());
        assert_eq!(scene.room_containing(inside.into()).unwrap(), Some(room));
        assert_eq!(scene.room_containing(outside.into()).unwrap(), None);
        assert_eq!(scene.structures_in_room(room).unwrap().as_slice(), &[inside]);
    }

    #[test]
    fn bounding_walls_are_found() {
        let mut scene = Scene::new();
        // room boundary sits on the inner faces of 0.2 walls
        let room = scene.add_room(square_room(0.1, 3.8));
        let south = scene
            .add_wall(Wall::line(Point2::new(0.0, -0.1), Point2::new(4.0, -0.1), 0.2))
            .unwrap();
        let far = scene
            .add_wall(Wall::line(Point2::new(10.0, 0.0), Point2::new(14.0, 0.0), 0.2))
            .unwrap();

        let walls = scene.room_walls(room).unwrap();
        assert!(walls.contains(&south));
        assert!(!walls.contains(&far));
    }

    #[test]
    fn side_split_into_several_walls() {
        let mut scene = Scene::new();
        let room = scene.add_room(square_room(0.0, 4.0));
        let segments = [
            (Point2::new(-0.1, -0.1), Point2::new(1.0, -0.1)),
            (Point2::new(1.0, -0.1), Point2::new(3.0, -0.1)),
            (Point2::new(3.0, -0.1), Point2::new(4.1, -0.1)),
            (Point2::new(4.1, -0.1), Point2::new(4.1, 4.1)),
            (Point2::new(4.1, 4.1), Point2::new(-0.1, 4.1)),
            (Point2::new(-0.1, 4.1), Point2::new(-0.1, -0.1)),
        ];
        let bounding: Vec<_> = segments
            .iter()
            .map(|&(a, b)| scene.add_wall(Wall::line(a, b, 0.2)).unwrap())
            .collect();
        // continues the bottom side past the corner
        let beyond = scene
            .add_wall(Wall::line(Point2::new(4.1, -0.1), Point2::new(8.0, -0.1), 0.2))
            .unwrap();

        let walls = scene.room_walls(room).unwrap();
        assert_eq!(walls.len(), 6);
        assert!(bounding.iter().all(|w| walls.contains(w)));
        assert!(!walls.contains(&beyond));
    }

    #[test]
    fn beam_spans_two_rooms() {
        let mut scene = Scene::new();
        let left = scene.add_room(square_room(0.0, 4.0));
        let right = scene.add_room(square_room(4.0, 4.0));
        let far = scene.add_room(square_room(20.0, 4.0));
        let beam = scene
            .add_beam(Beam::from_centerline(
                Point2::new(1.0, 2.0),
                Point2::new(7.0, 2.0),
                0.3,
            ))
            .unwrap();

        let spanned = scene.rooms_spanned_by(beam).unwrap();
        assert!(spanned.contains(&left));
        assert!(spanned.contains(&right));
        assert!(!spanned.contains(&far));
    }

    #[test]
    fn walls_have_no_rotation() {
        let mut scene = Scene::new();
        let wall = scene
            .add_wall(Wall::line(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), 0.2))
            .unwrap();
        assert!(matches!(
            scene.rotation(wall.into()),
            Err(Error::NotMovable(_))
        ));
    }
}
