// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorsnap Model
//!
//! Arena-backed floor-plan scene. Walls, structures, beams, holes and
//! rooms live in slot maps with stable keys; queries answer which elements
//! a room contains and which walls bound it, and pose setters move the
//! dragged element frame by frame.

pub mod content;
pub mod entities;
pub mod error;
pub mod keys;
pub mod scene;
pub mod transform;

pub use entities::{axis_at, axis_line, Beam, Hole, Room, Structure, StructureKind, Wall, BOUNDARY_TOL};
pub use error::{Error, Result};
pub use keys::{BeamKey, EntityKey, EntityType, HoleKey, RoomKey, StructureKey, WallKey};
pub use scene::Scene;
