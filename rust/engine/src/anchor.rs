// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed comparison primitives extracted from plan entities.

use floorsnap_geometry::{Arc2d, Circle2d, Curve2d, Line2d, Loop};
use floorsnap_model::EntityKey;
use nalgebra::{Point2, Vector2};
use rustc_hash::FxHashMap;
use std::fmt;

/// Geometric kind of an anchor, the key of the predicate dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Point,
    Line,
    Arc,
    Circle,
}

/// What part of its owner an anchor was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorRole {
    CenterPoint,
    CornerPoint,
    CenterLine,
    LineEdge,
    CircleEdge,
    ArcEdge,
}

impl AnchorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorRole::CenterPoint => "center-point",
            AnchorRole::CornerPoint => "corner-point",
            AnchorRole::CenterLine => "center-line",
            AnchorRole::LineEdge => "line-edge",
            AnchorRole::CircleEdge => "circle-edge",
            AnchorRole::ArcEdge => "arc-edge",
        }
    }

    /// Edge role matching a boundary curve's type
    pub fn edge_for(curve: &Curve2d) -> Self {
        match curve {
            Curve2d::Line(_) => AnchorRole::LineEdge,
            Curve2d::Arc(_) => AnchorRole::ArcEdge,
            Curve2d::Circle(_) => AnchorRole::CircleEdge,
        }
    }
}

/// Reproducible anchor identity: the same source curve yields the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId {
    pub owner: EntityKey,
    pub role: AnchorRole,
    pub index: u32,
}

impl AnchorId {
    pub fn new(owner: EntityKey, role: AnchorRole, index: u32) -> Self {
        Self { owner, role, index }
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}/{}", self.owner, self.role.as_str(), self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorGeometry {
    Point(Point2<f64>),
    Line(Line2d),
    Arc(Arc2d),
    Circle(Circle2d),
}

impl AnchorGeometry {
    pub fn kind(&self) -> AnchorKind {
        match self {
            AnchorGeometry::Point(_) => AnchorKind::Point,
            AnchorGeometry::Line(_) => AnchorKind::Line,
            AnchorGeometry::Arc(_) => AnchorKind::Arc,
            AnchorGeometry::Circle(_) => AnchorKind::Circle,
        }
    }

    /// Representative point: the point itself, a line's midpoint, a center
    pub fn key_point(&self) -> Point2<f64> {
        match self {
            AnchorGeometry::Point(p) => *p,
            AnchorGeometry::Line(l) => l.mid_pt(),
            AnchorGeometry::Arc(a) => a.center,
            AnchorGeometry::Circle(c) => c.center,
        }
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Self {
        match self {
            AnchorGeometry::Point(p) => AnchorGeometry::Point(p + v),
            AnchorGeometry::Line(l) => AnchorGeometry::Line(l.translated(v)),
            AnchorGeometry::Arc(a) => AnchorGeometry::Arc(a.translated(v)),
            AnchorGeometry::Circle(c) => AnchorGeometry::Circle(c.translated(v)),
        }
    }
}

impl From<Curve2d> for AnchorGeometry {
    fn from(curve: Curve2d) -> Self {
        match curve {
            Curve2d::Line(l) => AnchorGeometry::Line(l),
            Curve2d::Arc(a) => AnchorGeometry::Arc(a),
            Curve2d::Circle(c) => AnchorGeometry::Circle(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub id: AnchorId,
    pub geometry: AnchorGeometry,
}

impl Anchor {
    pub fn new(id: AnchorId, geometry: AnchorGeometry) -> Self {
        Self { id, geometry }
    }

    pub fn kind(&self) -> AnchorKind {
        self.geometry.kind()
    }

    pub fn role(&self) -> AnchorRole {
        self.id.role
    }

    pub fn owner(&self) -> EntityKey {
        self.id.owner
    }

    pub fn as_line(&self) -> Option<&Line2d> {
        match &self.geometry {
            AnchorGeometry::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&Point2<f64>> {
        match &self.geometry {
            AnchorGeometry::Point(p) => Some(p),
            _ => None,
        }
    }
}

/// Flat anchor list plus the closed outline of every owner that has one
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
    outlines: FxHashMap<EntityKey, Loop>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, anchor: Anchor) {
        self.anchors.push(anchor);
    }

    pub fn set_outline(&mut self, owner: EntityKey, outline: Loop) {
        self.outlines.insert(owner, outline);
    }

    pub fn outline(&self, owner: EntityKey) -> Option<&Loop> {
        self.outlines.get(&owner)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Anchor> {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn find(&self, id: &AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == *id)
    }

    /// Appends another set; anchors keep their order
    pub fn extend(&mut self, other: AnchorSet) {
        self.anchors.extend(other.anchors);
        self.outlines.extend(other.outlines);
    }
}

impl<'a> IntoIterator for &'a AnchorSet {
    type Item = &'a Anchor;
    type IntoIter = std::slice::Iter<'a, Anchor>;

    fn into_iter(self) -> Self::IntoIter {
        self.anchors.iter()
    }
}
