// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene key types for arena-based storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid while other
//! entities are added or removed (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for a wall.
    pub struct WallKey;

    /// Key for a free-standing or wall-embedded structure.
    pub struct StructureKey;

    /// Key for a structural beam.
    pub struct BeamKey;

    /// Key for an opening hosted by a wall.
    pub struct HoleKey;

    /// Key for a room.
    pub struct RoomKey;
}

/// A key that can reference any scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Wall(WallKey),
    Structure(StructureKey),
    Beam(BeamKey),
    Hole(HoleKey),
    Room(RoomKey),
}

impl EntityKey {
    /// Returns the entity type of this key.
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKey::Wall(_) => EntityType::Wall,
            EntityKey::Structure(_) => EntityType::Structure,
            EntityKey::Beam(_) => EntityType::Beam,
            EntityKey::Hole(_) => EntityType::Hole,
            EntityKey::Room(_) => EntityType::Room,
        }
    }

    /// Structures, beams and holes can be dragged
    pub fn is_movable(&self) -> bool {
        matches!(
            self,
            EntityKey::Structure(_) | EntityKey::Beam(_) | EntityKey::Hole(_)
        )
    }
}

impl From<WallKey> for EntityKey {
    fn from(k: WallKey) -> Self {
        EntityKey::Wall(k)
    }
}

impl From<StructureKey> for EntityKey {
    fn from(k: StructureKey) -> Self {
        EntityKey::Structure(k)
    }
}

impl From<BeamKey> for EntityKey {
    fn from(k: BeamKey) -> Self {
        EntityKey::Beam(k)
    }
}

impl From<HoleKey> for EntityKey {
    fn from(k: HoleKey) -> Self {
        EntityKey::Hole(k)
    }
}

impl From<RoomKey> for EntityKey {
    fn from(k: RoomKey) -> Self {
        EntityKey::Room(k)
    }
}

/// Discriminant for scene entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    Wall = 0,
    Structure = 1,
    Beam = 2,
    Hole = 3,
    Room = 4,
}

impl EntityType {
    /// Returns the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Wall => "Wall",
            EntityType::Structure => "Structure",
            EntityType::Beam => "Beam",
            EntityType::Hole => "Hole",
            EntityType::Room => "Room",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
