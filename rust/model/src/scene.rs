// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for plan entities.
//!
//! The [`Scene`] owns every wall, structure, beam, hole and room in slot
//! maps with stable, generational keys. Holes reference their host wall by
//! key; removing a wall removes the holes it hosts.

use floorsnap_geometry::Curve2d;
use slotmap::SlotMap;

use crate::entities::{Beam, Hole, Room, Structure, Wall};
use crate::error::{Error, Result};
use crate::keys::*;

fn check_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidDimension(format!(
            "{} must be positive, got {}",
            what, value
        )))
    }
}

/// The floor-plan scene.
///
/// # Example
///
/// ```
/// use floorsnap_model::{Scene, Wall};
/// use nalgebra::Point2;
///
/// let mut scene = Scene::new();
/// let wall = scene
///     .add_wall(Wall::line(Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), 0.2))
///     .unwrap();
///
/// assert_eq!(scene.wall_count(), 1);
/// assert!(scene.wall(wall).is_ok());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Scene {
    pub(crate) walls: SlotMap<WallKey, Wall>,
    pub(crate) structures: SlotMap<StructureKey, Structure>,
    pub(crate) beams: SlotMap<BeamKey, Beam>,
    pub(crate) holes: SlotMap<HoleKey, Hole>,
    pub(crate) rooms: SlotMap<RoomKey, Room>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    pub fn add_wall(&mut self, wall: Wall) -> Result<WallKey> {
        check_positive("wall width", wall.width)?;
        if matches!(wall.curve, Curve2d::Circle(_)) || wall.curve.is_degenerate() {
            return Err(Error::InvalidDimension(
                "wall centerline must be a non-degenerate line or arc".to_string(),
            ));
        }
        Ok(self.walls.insert(wall))
    }

    pub fn add_structure(&mut self, structure: Structure) -> Result<StructureKey> {
        check_positive("structure x size", structure.x_size)?;
        check_positive("structure y size", structure.y_size)?;
        Ok(self.structures.insert(structure))
    }

    pub fn add_beam(&mut self, beam: Beam) -> Result<BeamKey> {
        check_positive("beam width", beam.width)?;
        check_positive("beam length", beam.length)?;
        check_positive("beam length scale", beam.length_scale)?;
        Ok(self.beams.insert(beam))
    }

    /// Adds a hole; its host wall must exist
    pub fn add_hole(&mut self, hole: Hole) -> Result<HoleKey> {
        if !self.walls.contains_key(hole.host) {
            return Err(Error::NotFound(EntityKey::Wall(hole.host)));
        }
        check_positive("hole width", hole.width)?;
        check_positive("hole depth", hole.depth)?;
        if hole.frame_width < 0.0 || !hole.frame_width.is_finite() {
            return Err(Error::InvalidDimension(format!(
                "hole frame width must not be negative, got {}",
                hole.frame_width
            )));
        }
        Ok(self.holes.insert(hole))
    }

    pub fn add_room(&mut self, room: Room) -> RoomKey {
        self.rooms.insert(room)
    }

    /// Removes an entity. Removing a wall also removes its holes.
    pub fn remove(&mut self, key: EntityKey) -> Result<()> {
        let removed = match key {
            EntityKey::Wall(k) => {
                let found = self.walls.remove(k).is_some();
                if found {
                    self.holes.retain(|_, h| h.host != k);
                }
                found
            }
            EntityKey::Structure(k) => self.structures.remove(k).is_some(),
            EntityKey::Beam(k) => self.beams.remove(k).is_some(),
            EntityKey::Hole(k) => self.holes.remove(k).is_some(),
            EntityKey::Room(k) => self.rooms.remove(k).is_some(),
        };
        if removed {
            Ok(())
        } else {
            Err(Error::NotFound(key))
        }
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        match key {
            EntityKey::Wall(k) => self.walls.contains_key(k),
            EntityKey::Structure(k) => self.structures.contains_key(k),
            EntityKey::Beam(k) => self.beams.contains_key(k),
            EntityKey::Hole(k) => self.holes.contains_key(k),
            EntityKey::Room(k) => self.rooms.contains_key(k),
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn wall(&self, key: WallKey) -> Result<&Wall> {
        self.walls.get(key).ok_or(Error::NotFound(EntityKey::Wall(key)))
    }

    pub fn structure(&self, key: StructureKey) -> Result<&Structure> {
        self.structures
            .get(key)
            .ok_or(Error::NotFound(EntityKey::Structure(key)))
    }

    pub fn beam(&self, key: BeamKey) -> Result<&Beam> {
        self.beams.get(key).ok_or(Error::NotFound(EntityKey::Beam(key)))
    }

    pub fn hole(&self, key: HoleKey) -> Result<&Hole> {
        self.holes.get(key).ok_or(Error::NotFound(EntityKey::Hole(key)))
    }

    pub fn room(&self, key: RoomKey) -> Result<&Room> {
        self.rooms.get(key).ok_or(Error::NotFound(EntityKey::Room(key)))
    }

    pub fn wall_mut(&mut self, key: WallKey) -> Result<&mut Wall> {
        self.walls
            .get_mut(key)
            .ok_or(Error::NotFound(EntityKey::Wall(key)))
    }

    pub fn structure_mut(&mut self, key: StructureKey) -> Result<&mut Structure> {
        self.structures
            .get_mut(key)
            .ok_or(Error::NotFound(EntityKey::Structure(key)))
    }

    pub fn beam_mut(&mut self, key: BeamKey) -> Result<&mut Beam> {
        self.beams
            .get_mut(key)
            .ok_or(Error::NotFound(EntityKey::Beam(key)))
    }

    pub fn hole_mut(&mut self, key: HoleKey) -> Result<&mut Hole> {
        self.holes
            .get_mut(key)
            .ok_or(Error::NotFound(EntityKey::Hole(key)))
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    pub fn walls(&self) -> impl Iterator<Item = (WallKey, &Wall)> {
        self.walls.iter()
    }

    pub fn structures(&self) -> impl Iterator<Item = (StructureKey, &Structure)> {
        self.structures.iter()
    }

    pub fn beams(&self) -> impl Iterator<Item = (BeamKey, &Beam)> {
        self.beams.iter()
    }

    pub fn holes(&self) -> impl Iterator<Item = (HoleKey, &Hole)> {
        self.holes.iter()
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomKey, &Room)> {
        self.rooms.iter()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn structure_count(&self) -> usize {
        self.structures.len()
    }

    pub fn beam_count(&self) -> usize {
        self.beams.len()
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::StructureKind;
    use nalgebra::Point2;

    #[test]
    fn rejects_bad_dimensions() {
        let mut scene = Scene::new();
        let wall = Wall::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), 0.0);
        assert!(matches!(scene.add_wall(wall), Err(Error::InvalidDimension(_))));

        let column = Structure::new(StructureKind::Flue, Point2::origin(), -1.0, 1.0);
        assert!(matches!(
            scene.add_structure(column),
            Err(Error::InvalidDimension(_))
        ));

        let degenerate = Wall::line(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0), 0.2);
        assert!(scene.add_wall(degenerate).is_err());
    }

    #[test]
    fn hole_requires_host() {
        let mut scene = Scene::new();
        let wall = scene
            .add_wall(Wall::line(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), 0.2))
            .unwrap();
        scene.remove(EntityKey::Wall(wall)).unwrap();

        let hole = Hole::new(wall, Point2::new(2.0, 0.0), 0.0, 0.9, 0.2);
        assert!(matches!(scene.add_hole(hole), Err(Error::NotFound(_))));
    }

    #[test]
    fn removing_wall_removes_holes() {
        let mut scene = Scene::new();
        let wall = scene
            .add_wall(Wall::line(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), 0.2))
            .unwrap();
        let hole = scene
            .add_hole(Hole::new(wall, Point2::new(2.0, 0.0), 0.0, 0.9, 0.2))
            .unwrap();

        scene.remove(wall.into()).unwrap();
        assert_eq!(scene.hole_count(), 0);
        assert!(!scene.contains(hole.into()));
        assert!(matches!(scene.remove(wall.into()), Err(Error::NotFound(_))));
    }
}
