// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Candidate constraints and the resolved transform.

use floorsnap_geometry::tolerance::OFFSET_EPS;
use floorsnap_geometry::Loop;
use nalgebra::{Point2, Vector2};
use std::fmt;

use crate::anchor::{Anchor, AnchorId};

/// Constraint type. Declaration order is priority order: a lower ordinal
/// wins when candidates are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapType {
    Colline = 1,
    Overlap = 2,
    CollineRotation = 3,
    Tangent = 4,
    Parallel = 5,
    Point = 6,
    Border = 7,
    ArcLength = 8,
    ArcHeight = 9,
    MidPoint = 10,
    AuxiliaryLine = 11,
    FootPoint = 12,
}

impl SnapType {
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Types whose break re-evaluation is skipped when it repeats the
    /// primary's offset
    pub fn is_contact(&self) -> bool {
        matches!(self, SnapType::Colline | SnapType::Overlap | SnapType::Tangent)
    }
}

/// A rotation always carries its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationDelta {
    /// Degrees, counter-clockwise positive
    pub angle_deg: f64,
    pub center: Point2<f64>,
}

/// `master/client` anchor pair identifying a candidate across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateId {
    pub master: AnchorId,
    pub client: AnchorId,
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.master, self.client)
    }
}

/// Correction implied by one (master, client) anchor pair
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,
    pub snap_type: SnapType,
    pub master: Anchor,
    pub client: Anchor,
    pub dx: f64,
    pub dy: f64,
    pub rotation: Option<RotationDelta>,
    /// Loop the rotation glues the element to
    pub reference_loop: Option<Loop>,
}

impl Candidate {
    pub fn translation(snap_type: SnapType, master: Anchor, client: Anchor, offset: Vector2<f64>) -> Self {
        Self {
            id: CandidateId {
                master: master.id,
                client: client.id,
            },
            snap_type,
            master,
            client,
            dx: offset.x,
            dy: offset.y,
            rotation: None,
            reference_loop: None,
        }
    }

    pub fn with_rotation(mut self, rotation: RotationDelta, reference_loop: Loop) -> Self {
        self.rotation = Some(rotation);
        self.reference_loop = Some(reference_loop);
        self
    }

    pub fn offset(&self) -> Vector2<f64> {
        Vector2::new(self.dx, self.dy)
    }

    pub fn drotation(&self) -> f64 {
        self.rotation.map_or(0.0, |r| r.angle_deg)
    }

    pub fn has_rotation(&self) -> bool {
        self.rotation.is_some()
    }

    /// Offsets agree within [`OFFSET_EPS`] on both axes
    pub fn same_offset(&self, other: &Candidate) -> bool {
        (self.dx - other.dx).abs() < OFFSET_EPS && (self.dy - other.dy).abs() < OFFSET_EPS
    }
}

/// Merged correction for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub dx: f64,
    pub dy: f64,
    pub rotation: Option<RotationDelta>,
}

impl Transform {
    pub fn offset(&self) -> Vector2<f64> {
        Vector2::new(self.dx, self.dy)
    }

    pub fn rotation_only(rotation: RotationDelta) -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            rotation: Some(rotation),
        }
    }
}

impl From<&Candidate> for Transform {
    fn from(c: &Candidate) -> Self {
        Self {
            dx: c.dx,
            dy: c.dy,
            rotation: c.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order() {
        assert!(SnapType::Colline < SnapType::Overlap);
        assert!(SnapType::Overlap < SnapType::CollineRotation);
        assert!(SnapType::CollineRotation < SnapType::Tangent);
        assert!(SnapType::Tangent < SnapType::FootPoint);
        assert_eq!(SnapType::Colline.ordinal(), 1);
    }

    #[test]
    fn contact_types() {
        assert!(SnapType::Colline.is_contact());
        assert!(SnapType::Tangent.is_contact());
        assert!(!SnapType::CollineRotation.is_contact());
    }
}
