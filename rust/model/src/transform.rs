// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pose setters for movable elements.
//!
//! Structures, beams and holes are placed by a position and a rotation in
//! degrees; these setters are what the move driver calls once per frame.
//! Walls and rooms are rejected with [`Error::NotMovable`].

use floorsnap_geometry::rotate_point;
use nalgebra::{Point2, Vector2};

use crate::error::{Error, Result};
use crate::keys::*;
use crate::scene::Scene;

impl Scene {
    fn pose_mut(&mut self, key: EntityKey) -> Result<(&mut Point2<f64>, &mut f64)> {
        match key {
            EntityKey::Structure(k) => {
                let s = self.structure_mut(k)?;
                Ok((&mut s.position, &mut s.rotation))
            }
            EntityKey::Beam(k) => {
                let b = self.beam_mut(k)?;
                Ok((&mut b.position, &mut b.rotation))
            }
            EntityKey::Hole(k) => {
                let h = self.hole_mut(k)?;
                Ok((&mut h.position, &mut h.rotation))
            }
            EntityKey::Wall(_) | EntityKey::Room(_) => Err(Error::NotMovable(key)),
        }
    }

    pub fn set_position(&mut self, key: EntityKey, position: Point2<f64>) -> Result<()> {
        let (p, _) = self.pose_mut(key)?;
        *p = position;
        Ok(())
    }

    pub fn translate(&mut self, key: EntityKey, delta: &Vector2<f64>) -> Result<()> {
        let (p, _) = self.pose_mut(key)?;
        *p += *delta;
        Ok(())
    }

    pub fn set_rotation(&mut self, key: EntityKey, degrees: f64) -> Result<()> {
        let (_, r) = self.pose_mut(key)?;
        *r = degrees;
        Ok(())
    }

    /// Rotates the element about `center` by `degrees`, counter-clockwise
    pub fn rotate_about(&mut self, key: EntityKey, degrees: f64, center: &Point2<f64>) -> Result<()> {
        let (p, r) = self.pose_mut(key)?;
        *p = rotate_point(p, degrees.to_radians(), center);
        *r += degrees;
        Ok(())
    }

    pub fn set_length_scale(&mut self, beam: BeamKey, scale: f64) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidDimension(format!(
                "beam length scale must be positive, got {}",
                scale
            )));
        }
        self.beam_mut(beam)?.length_scale = scale;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Beam, Structure, StructureKind, Wall};
    use approx::assert_relative_eq;

    #[test]
    fn rotate_about_moves_position_and_angle() {
        let mut scene = Scene::new();
        let key: EntityKey = scene
            .add_structure(Structure::new(
                StructureKind::Riser,
                Point2::new(2.0, 0.0),
                0.5,
                0.5,
            ))
            .unwrap()
            .into();

        scene.rotate_about(key, 90.0, &Point2::origin()).unwrap();
        let EntityKey::Structure(k) = key else { unreachable!() };
        let s = scene.structure(k).unwrap();
        assert_relative_eq!(s.position, Point2::new(0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(s.rotation, 90.0);
    }

    #[test]
    fn translate_and_scale_beam() {
        let mut scene = Scene::new();
        let beam = scene
            .add_beam(Beam::new(Point2::new(1.0, 1.0), 0.0, 0.3, 4.0))
            .unwrap();

        scene.translate(beam.into(), &Vector2::new(0.5, -1.0)).unwrap();
        scene.set_length_scale(beam, 0.5).unwrap();
        assert!(scene.set_length_scale(beam, 0.0).is_err());

        let b = scene.beam(beam).unwrap();
        assert_relative_eq!(b.position, Point2::new(1.5, 0.0));
        assert_relative_eq!(b.effective_length(), 2.0);
    }

    #[test]
    fn walls_are_not_movable() {
        let mut scene = Scene::new();
        let wall = scene
            .add_wall(Wall::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), 0.2))
            .unwrap();
        assert!(matches!(
            scene.set_position(wall.into(), Point2::origin()),
            Err(Error::NotMovable(_))
        ));
    }
}
