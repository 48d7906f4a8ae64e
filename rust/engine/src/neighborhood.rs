// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Neighborhood of the dragged element.
//!
//! Inside a room: the room's bounding walls, the structures and beams the
//! room contains, and holes hosted by those walls. Outside every room: all
//! walls, structures and beams not contained in any room, and all holes.
//! The dragged element itself is never part of its neighborhood.

use floorsnap_model::{BeamKey, EntityKey, HoleKey, RoomKey, Scene, StructureKey, WallKey};
use rustc_hash::FxHashSet;
use std::hash::Hash;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionEntities {
    pub walls: Vec<WallKey>,
    pub structures: Vec<StructureKey>,
    pub beams: Vec<BeamKey>,
    pub holes: Vec<HoleKey>,
    pub room: Option<RoomKey>,
}

fn dedup_keys<K: Copy + Eq + Hash>(keys: impl IntoIterator<Item = K>, skip: Option<K>) -> Vec<K> {
    let mut seen = FxHashSet::default();
    keys.into_iter()
        .filter(|k| Some(*k) != skip && seen.insert(*k))
        .collect()
}

impl PositionEntities {
    /// Gather the neighborhood of `element`
    pub fn collect(scene: &Scene, element: EntityKey) -> Result<Self> {
        let skip_structure = match element {
            EntityKey::Structure(k) => Some(k),
            _ => None,
        };
        let skip_beam = match element {
            EntityKey::Beam(k) => Some(k),
            _ => None,
        };
        let skip_hole = match element {
            EntityKey::Hole(k) => Some(k),
            _ => None,
        };
        let skip_wall = match element {
            EntityKey::Wall(k) => Some(k),
            _ => None,
        };

        let entities = match scene.room_containing(element)? {
            Some(room) => {
                let walls = dedup_keys(scene.room_walls(room)?, skip_wall);
                Self {
                    holes: dedup_keys(scene.holes_on(&walls), skip_hole),
                    structures: dedup_keys(scene.structures_in_room(room)?, skip_structure),
                    beams: dedup_keys(scene.beams_in_room(room)?, skip_beam),
                    walls,
                    room: Some(room),
                }
            }
            None => {
                let in_any_room = |key: EntityKey| -> Result<bool> {
                    Ok(scene.room_containing(key)?.is_some())
                };
                let mut structures = Vec::new();
                for (k, _) in scene.structures() {
                    if !in_any_room(k.into())? {
                        structures.push(k);
                    }
                }
                let mut beams = Vec::new();
                for (k, _) in scene.beams() {
                    if !in_any_room(k.into())? {
                        beams.push(k);
                    }
                }
                Self {
                    walls: dedup_keys(scene.walls().map(|(k, _)| k), skip_wall),
                    structures: dedup_keys(structures, skip_structure),
                    beams: dedup_keys(beams, skip_beam),
                    holes: dedup_keys(scene.holes().map(|(k, _)| k), skip_hole),
                    room: None,
                }
            }
        };

        tracing::trace!(
            walls = entities.walls.len(),
            structures = entities.structures.len(),
            beams = entities.beams.len(),
            holes = entities.holes.len(),
            in_room = entities.room.is_some(),
            "Collected neighborhood"
        );
        Ok(entities)
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
            && self.structures.is_empty()
            && self.beams.is_empty()
            && self.holes.is_empty()
            && self.room.is_none()
    }
}
