// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan entities and the outline geometry derived from them.
//!
//! Rotations are stored in degrees, counter-clockwise. Local x of a
//! structure, beam or hole is its length direction.

use floorsnap_geometry::{Arc2d, Circle2d, Curve2d, Line2d, Loop};
use nalgebra::{Point2, Vector2};

use crate::error::{Error, Result};
use crate::keys::WallKey;

/// Tolerance used for room membership and boundary tests
pub const BOUNDARY_TOL: f64 = 1e-3;

/// Unit vector at `deg` degrees from the x axis
pub fn axis_at(deg: f64) -> Vector2<f64> {
    let (s, c) = deg.to_radians().sin_cos();
    Vector2::new(c, s)
}

/// Segment of `length` through `center` along `axis`
pub fn axis_line(center: &Point2<f64>, axis: &Vector2<f64>, length: f64) -> Line2d {
    let half = axis * (length * 0.5);
    Line2d::new(center - half, center + half)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    /// Centerline, a line or an arc
    pub curve: Curve2d,
    pub width: f64,
    /// Walls with an editable height do not bound rooms for beam clipping
    pub height_editable: bool,
}

impl Wall {
    pub fn new(curve: Curve2d, width: f64) -> Self {
        Self {
            curve,
            width,
            height_editable: false,
        }
    }

    pub fn line(start: Point2<f64>, end: Point2<f64>, width: f64) -> Self {
        Self::new(Curve2d::Line(Line2d::new(start, end)), width)
    }

    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Left and right face curves, both running with the centerline
    pub fn side_faces(&self) -> [Curve2d; 2] {
        let h = self.half_width();
        match &self.curve {
            Curve2d::Line(l) => [Curve2d::Line(l.offset(h)), Curve2d::Line(l.offset(-h))],
            Curve2d::Arc(a) => {
                // left of a counter-clockwise arc is toward its center
                let inward = if a.sweep >= 0.0 { -h } else { h };
                [
                    Curve2d::Arc(Arc2d::with_sweep(a.center, a.radius + inward, a.start_angle, a.sweep)),
                    Curve2d::Arc(Arc2d::with_sweep(a.center, a.radius - inward, a.start_angle, a.sweep)),
                ]
            }
            Curve2d::Circle(c) => [
                Curve2d::Circle(Circle2d::new(c.center, c.radius - h)),
                Curve2d::Circle(Circle2d::new(c.center, c.radius + h)),
            ],
        }
    }

    /// Closed footprint: left face, end cap, right face reversed, start cap
    pub fn footprint(&self) -> Result<Loop> {
        if matches!(self.curve, Curve2d::Circle(_)) {
            return Err(Error::InvalidDimension(
                "wall centerline must be a line or an arc".to_string(),
            ));
        }
        let [left, right] = self.side_faces();
        Ok(Loop::new(vec![
            left,
            Curve2d::Line(Line2d::new(left.end_pt(), right.end_pt())),
            right.reversed(),
            Curve2d::Line(Line2d::new(right.start_pt(), left.start_pt())),
        ])?)
    }

    pub fn corners(&self) -> [Point2<f64>; 4] {
        let [left, right] = self.side_faces();
        [left.start_pt(), left.end_pt(), right.end_pt(), right.start_pt()]
    }

    pub fn mid_pt(&self) -> Point2<f64> {
        self.curve.mid_pt()
    }

    /// Segment across the wall through its midpoint; radial for arc walls
    pub fn cross_line(&self) -> Line2d {
        let h = self.half_width();
        match &self.curve {
            Curve2d::Line(l) => {
                let mid = l.mid_pt();
                let n = l.left_normal();
                Line2d::new(mid - n * h, mid + n * h)
            }
            Curve2d::Arc(a) => {
                let angle = a.start_angle + a.sweep * 0.5;
                let u = Vector2::new(angle.cos(), angle.sin());
                Line2d::new(a.center + u * (a.radius - h), a.center + u * (a.radius + h))
            }
            Curve2d::Circle(c) => {
                let u = Vector2::new(1.0, 0.0);
                Line2d::new(c.center + u * (c.radius - h), c.center + u * (c.radius + h))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    SquareColumn,
    Flue,
    Riser,
    CircleColumn,
    Outlet,
}

impl StructureKind {
    pub fn is_circular(&self) -> bool {
        matches!(self, StructureKind::CircleColumn | StructureKind::Outlet)
    }
}

/// Column, flue, riser or outlet placed on the plan
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub kind: StructureKind,
    pub position: Point2<f64>,
    pub x_size: f64,
    pub y_size: f64,
    /// Degrees, counter-clockwise
    pub rotation: f64,
    /// Embedded in a wall; bounds rooms like a wall does
    pub wall_part: bool,
}

impl Structure {
    pub fn new(kind: StructureKind, position: Point2<f64>, x_size: f64, y_size: f64) -> Self {
        Self {
            kind,
            position,
            x_size,
            y_size,
            rotation: 0.0,
            wall_part: false,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn as_wall_part(mut self) -> Self {
        self.wall_part = true;
        self
    }

    pub fn x_axis(&self) -> Vector2<f64> {
        axis_at(self.rotation)
    }

    pub fn y_axis(&self) -> Vector2<f64> {
        axis_at(self.rotation + 90.0)
    }

    pub fn profile_circle(&self) -> Option<Circle2d> {
        self.kind
            .is_circular()
            .then(|| Circle2d::new(self.position, self.x_size * 0.5))
    }

    pub fn profile(&self) -> Result<Loop> {
        match self.profile_circle() {
            Some(circle) => Ok(Loop::new(vec![Curve2d::Circle(circle)])?),
            None => Ok(Loop::rectangle(
                self.position,
                self.x_size,
                self.y_size,
                self.rotation.to_radians(),
            )?),
        }
    }

    /// Local x axis through the center, spanning the profile
    pub fn position_curve(&self) -> Line2d {
        axis_line(&self.position, &self.x_axis(), self.x_size)
    }

    /// Local y axis through the center, spanning the profile
    pub fn cross_line(&self) -> Line2d {
        axis_line(&self.position, &self.y_axis(), self.y_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    /// Midpoint of the centerline
    pub position: Point2<f64>,
    /// Degrees, counter-clockwise
    pub rotation: f64,
    /// Cross-section width
    pub width: f64,
    /// Profile length before scaling
    pub length: f64,
    pub length_scale: f64,
}

impl Beam {
    pub fn new(position: Point2<f64>, rotation: f64, width: f64, length: f64) -> Self {
        Self {
            position,
            rotation,
            width,
            length,
            length_scale: 1.0,
        }
    }

    /// Beam whose centerline runs from `start` to `end`
    pub fn from_centerline(start: Point2<f64>, end: Point2<f64>, width: f64) -> Self {
        let v = end - start;
        let rotation = v.y.atan2(v.x).to_degrees();
        let position = Point2::from((start.coords + end.coords) * 0.5);
        Self::new(position, rotation, width, v.norm())
    }

    pub fn effective_length(&self) -> f64 {
        self.length * self.length_scale
    }

    pub fn x_axis(&self) -> Vector2<f64> {
        axis_at(self.rotation)
    }

    pub fn y_axis(&self) -> Vector2<f64> {
        axis_at(self.rotation + 90.0)
    }

    pub fn centerline(&self) -> Line2d {
        axis_line(&self.position, &self.x_axis(), self.effective_length())
    }

    pub fn cross_line(&self) -> Line2d {
        axis_line(&self.position, &self.y_axis(), self.width)
    }

    pub fn profile(&self) -> Result<Loop> {
        Ok(Loop::rectangle(
            self.position,
            self.effective_length(),
            self.width,
            self.rotation.to_radians(),
        )?)
    }
}

/// Opening in a wall
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub host: WallKey,
    pub position: Point2<f64>,
    /// Degrees, counter-clockwise
    pub rotation: f64,
    pub width: f64,
    /// Extent across the wall
    pub depth: f64,
    pub frame_width: f64,
}

impl Hole {
    pub fn new(host: WallKey, position: Point2<f64>, rotation: f64, width: f64, depth: f64) -> Self {
        Self {
            host,
            position,
            rotation,
            width,
            depth,
            frame_width: 0.0,
        }
    }

    pub fn with_frame(mut self, frame_width: f64) -> Self {
        self.frame_width = frame_width;
        self
    }

    /// Opening width including the frame on both sides
    pub fn front_width(&self) -> f64 {
        self.width + 2.0 * self.frame_width
    }

    pub fn front_profile(&self) -> Result<Loop> {
        Ok(Loop::rectangle(
            self.position,
            self.front_width(),
            self.depth,
            self.rotation.to_radians(),
        )?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub boundary: Loop,
    /// Internal division curves drawn inside the room
    pub split_curves: Vec<Curve2d>,
}

impl Room {
    pub fn new(boundary: Loop) -> Self {
        Self {
            boundary,
            split_curves: Vec::new(),
        }
    }

    pub fn with_split_curves(mut self, curves: Vec<Curve2d>) -> Self {
        self.split_curves = curves;
        self
    }

    /// Inside or on the boundary
    pub fn contains_point(&self, p: &Point2<f64>) -> bool {
        self.boundary.point_position(p, BOUNDARY_TOL) != floorsnap_geometry::PointPosition::Out
    }
}
