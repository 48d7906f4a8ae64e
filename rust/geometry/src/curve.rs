// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D curve primitives: line segments, arcs and full circles.
//!
//! Lines are parametrized by arc length from their start point, so a
//! parameter is a signed distance along [`Line2d::direction`]. Parameters
//! outside `[0, length]` address the infinite carrier line.

use nalgebra::{Point2, Rotation2, Vector2};
use std::f64::consts::TAU;

use crate::tolerance::{ANGLE_EPS, ARC_SEGMENTS_PER_TURN, DIST_EPS};

/// 2D cross product (z-component of the 3D cross product)
#[inline]
pub fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Normalize an angle into `[0, 2π)`
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Rotate `p` counter-clockwise by `angle` radians about `center`
#[inline]
pub fn rotate_point(p: &Point2<f64>, angle: f64, center: &Point2<f64>) -> Point2<f64> {
    let rot = Rotation2::new(angle);
    center + rot * (p - center)
}

/// Discriminant for curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Line,
    Arc,
    Circle,
}

/// Line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2d {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Line2d {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start_pt(&self) -> Point2<f64> {
        self.start
    }

    #[inline]
    pub fn end_pt(&self) -> Point2<f64> {
        self.end
    }

    pub fn mid_pt(&self) -> Point2<f64> {
        Point2::from((self.start.coords + self.end.coords) * 0.5)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// True for segments shorter than [`DIST_EPS`]
    pub fn is_degenerate(&self) -> bool {
        self.length() <= DIST_EPS
    }

    /// Unit direction, or the zero vector for a degenerate segment
    pub fn direction(&self) -> Vector2<f64> {
        let v = self.end - self.start;
        let len = v.norm();
        if len <= DIST_EPS {
            Vector2::zeros()
        } else {
            v / len
        }
    }

    pub fn left_normal(&self) -> Vector2<f64> {
        let d = self.direction();
        Vector2::new(-d.y, d.x)
    }

    pub fn right_normal(&self) -> Vector2<f64> {
        let d = self.direction();
        Vector2::new(d.y, -d.x)
    }

    /// Signed distance of the projection of `p` from the start point
    pub fn param_at(&self, p: &Point2<f64>) -> f64 {
        (p - self.start).dot(&self.direction())
    }

    /// Point on the carrier line at parameter `t`
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + self.direction() * t
    }

    /// Orthogonal projection of `p` on the carrier line
    pub fn projected_pt(&self, p: &Point2<f64>) -> Point2<f64> {
        self.point_at(self.param_at(p))
    }

    pub fn contains_param(&self, t: f64, tol: f64) -> bool {
        t >= -tol && t <= self.length() + tol
    }

    /// True when `p` lies on the segment within `tol`
    pub fn contains_point(&self, p: &Point2<f64>, tol: f64) -> bool {
        self.distance_to_point(p) <= tol
    }

    /// Distance from `p` to the segment
    pub fn distance_to_point(&self, p: &Point2<f64>) -> f64 {
        let v = self.end - self.start;
        let w = p - self.start;

        let c1 = w.dot(&v);
        if c1 <= 0.0 {
            return (p - self.start).norm();
        }

        let c2 = v.dot(&v);
        if c2 <= c1 {
            return (p - self.end).norm();
        }

        let b = c1 / c2;
        let pb = self.start + v * b;
        (p - pb).norm()
    }

    /// Distance from `p` to the infinite carrier line
    pub fn distance_to_line(&self, p: &Point2<f64>) -> f64 {
        if self.is_degenerate() {
            return (p - self.start).norm();
        }
        cross(&self.direction(), &(p - self.start)).abs()
    }

    pub fn is_parallel_to(&self, other: &Line2d, tol: f64) -> bool {
        cross(&self.direction(), &other.direction()).abs() <= tol
    }

    /// Parallel and on the same carrier line
    pub fn is_collinear_with(&self, other: &Line2d, tol: f64) -> bool {
        self.is_parallel_to(other, ANGLE_EPS.max(tol * 1e-3))
            && self.distance_to_line(&other.start) <= tol
            && self.distance_to_line(&other.end) <= tol
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Extend both ends by `distance`
    pub fn extended_double(&self, distance: f64) -> Self {
        let d = self.direction();
        Self::new(self.start - d * distance, self.end + d * distance)
    }

    /// Shift along the left normal (negative values shift right)
    pub fn offset(&self, distance: f64) -> Self {
        self.translated(&(self.left_normal() * distance))
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Self {
        Self::new(self.start + v, self.end + v)
    }

    pub fn rotated(&self, angle: f64, center: &Point2<f64>) -> Self {
        Self::new(
            rotate_point(&self.start, angle, center),
            rotate_point(&self.end, angle, center),
        )
    }

    /// Sub-segment between two carrier-line parameters
    pub fn with_range(&self, t0: f64, t1: f64) -> Self {
        Self::new(self.point_at(t0), self.point_at(t1))
    }

    /// Parameters `(t, u)` of the crossing of both carrier lines,
    /// `t` on `self` and `u` on `other`. `None` for parallel lines.
    pub fn intersect_params(&self, other: &Line2d) -> Option<(f64, f64)> {
        let d1 = self.direction();
        let d2 = other.direction();
        let denom = cross(&d1, &d2);
        if denom.abs() <= ANGLE_EPS {
            return None;
        }
        let w = other.start - self.start;
        let t = cross(&w, &d2) / denom;
        let u = cross(&w, &d1) / denom;
        Some((t, u))
    }

    /// Crossing point of two segments
    pub fn intersect(&self, other: &Line2d, tol: f64) -> Option<Point2<f64>> {
        let (t, u) = self.intersect_params(other)?;
        if self.contains_param(t, tol) && other.contains_param(u, tol) {
            Some(self.point_at(t))
        } else {
            None
        }
    }
}

/// Circular arc. A positive sweep runs counter-clockwise from `start_angle`,
/// a negative one clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2d {
    pub center: Point2<f64>,
    pub radius: f64,
    /// Start angle (radians)
    pub start_angle: f64,
    /// Signed sweep angle (radians)
    pub sweep: f64,
}

impl Arc2d {
    /// Counter-clockwise arc from `start_angle` to `end_angle`
    pub fn new(center: Point2<f64>, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        let mut sweep = normalize_angle(end_angle - start_angle);
        if sweep <= ANGLE_EPS {
            sweep = TAU;
        }
        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    pub fn with_sweep(center: Point2<f64>, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2<f64> {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn start_pt(&self) -> Point2<f64> {
        self.point_at_angle(self.start_angle)
    }

    pub fn end_pt(&self) -> Point2<f64> {
        self.point_at_angle(self.end_angle())
    }

    pub fn mid_pt(&self) -> Point2<f64> {
        self.point_at_angle(self.start_angle + self.sweep * 0.5)
    }

    pub fn length(&self) -> f64 {
        self.sweep.abs() * self.radius
    }

    /// Check whether a polar angle falls inside the swept range
    pub fn contains_angle(&self, angle: f64) -> bool {
        let (lo, span) = if self.sweep >= 0.0 {
            (self.start_angle, self.sweep)
        } else {
            (self.start_angle + self.sweep, -self.sweep)
        };
        let d = normalize_angle(angle - lo);
        d <= span + ANGLE_EPS || d >= TAU - ANGLE_EPS
    }

    pub fn contains_point(&self, p: &Point2<f64>, tol: f64) -> bool {
        let r = (p - self.center).norm();
        if (r - self.radius).abs() > tol {
            return false;
        }
        let angle = (p.y - self.center.y).atan2(p.x - self.center.x);
        self.contains_angle(angle)
            || (p - self.start_pt()).norm() <= tol
            || (p - self.end_pt()).norm() <= tol
    }

    pub fn distance_to_point(&self, p: &Point2<f64>) -> f64 {
        let angle = (p.y - self.center.y).atan2(p.x - self.center.x);
        if self.contains_angle(angle) {
            ((p - self.center).norm() - self.radius).abs()
        } else {
            let d1 = (p - self.start_pt()).norm();
            let d2 = (p - self.end_pt()).norm();
            d1.min(d2)
        }
    }

    pub fn circle(&self) -> Circle2d {
        Circle2d::new(self.center, self.radius)
    }

    pub fn reversed(&self) -> Self {
        Self::with_sweep(self.center, self.radius, self.end_angle(), -self.sweep)
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Self {
        Self::with_sweep(self.center + v, self.radius, self.start_angle, self.sweep)
    }

    pub fn rotated(&self, angle: f64, center: &Point2<f64>) -> Self {
        Self::with_sweep(
            rotate_point(&self.center, angle, center),
            self.radius,
            self.start_angle + angle,
            self.sweep,
        )
    }

    /// Polyline approximation including both end points
    pub fn tessellate(&self) -> Vec<Point2<f64>> {
        let steps = ((self.sweep.abs() / TAU) * ARC_SEGMENTS_PER_TURN as f64)
            .ceil()
            .max(1.0) as usize;
        (0..=steps)
            .map(|i| self.point_at_angle(self.start_angle + self.sweep * i as f64 / steps as f64))
            .collect()
    }
}

/// Full circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle2d {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle2d {
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2<f64> {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    /// Closest point on the circle; the start point for the center itself
    pub fn projected_pt(&self, p: &Point2<f64>) -> Point2<f64> {
        let v = p - self.center;
        let len = v.norm();
        if len <= DIST_EPS {
            return self.point_at_angle(0.0);
        }
        self.center + v * (self.radius / len)
    }

    pub fn contains_point(&self, p: &Point2<f64>, tol: f64) -> bool {
        self.distance_to_point(p) <= tol
    }

    pub fn distance_to_point(&self, p: &Point2<f64>) -> f64 {
        ((p - self.center).norm() - self.radius).abs()
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Self {
        Self::new(self.center + v, self.radius)
    }

    pub fn rotated(&self, angle: f64, center: &Point2<f64>) -> Self {
        Self::new(rotate_point(&self.center, angle, center), self.radius)
    }

    /// Closed ring approximation, first point not repeated
    pub fn tessellate(&self) -> Vec<Point2<f64>> {
        (0..ARC_SEGMENTS_PER_TURN)
            .map(|i| self.point_at_angle(TAU * i as f64 / ARC_SEGMENTS_PER_TURN as f64))
            .collect()
    }
}

/// Closed set of curve types the kernel works with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve2d {
    Line(Line2d),
    Arc(Arc2d),
    Circle(Circle2d),
}

impl Curve2d {
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve2d::Line(_) => CurveKind::Line,
            Curve2d::Arc(_) => CurveKind::Arc,
            Curve2d::Circle(_) => CurveKind::Circle,
        }
    }

    pub fn start_pt(&self) -> Point2<f64> {
        match self {
            Curve2d::Line(l) => l.start_pt(),
            Curve2d::Arc(a) => a.start_pt(),
            Curve2d::Circle(c) => c.point_at_angle(0.0),
        }
    }

    pub fn end_pt(&self) -> Point2<f64> {
        match self {
            Curve2d::Line(l) => l.end_pt(),
            Curve2d::Arc(a) => a.end_pt(),
            Curve2d::Circle(c) => c.point_at_angle(0.0),
        }
    }

    pub fn mid_pt(&self) -> Point2<f64> {
        match self {
            Curve2d::Line(l) => l.mid_pt(),
            Curve2d::Arc(a) => a.mid_pt(),
            Curve2d::Circle(c) => c.point_at_angle(std::f64::consts::PI),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Curve2d::Line(l) => l.length(),
            Curve2d::Arc(a) => a.length(),
            Curve2d::Circle(c) => c.length(),
        }
    }

    pub fn contains_point(&self, p: &Point2<f64>, tol: f64) -> bool {
        match self {
            Curve2d::Line(l) => l.contains_point(p, tol),
            Curve2d::Arc(a) => a.contains_point(p, tol),
            Curve2d::Circle(c) => c.contains_point(p, tol),
        }
    }

    pub fn distance_to_point(&self, p: &Point2<f64>) -> f64 {
        match self {
            Curve2d::Line(l) => l.distance_to_point(p),
            Curve2d::Arc(a) => a.distance_to_point(p),
            Curve2d::Circle(c) => c.distance_to_point(p),
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Curve2d::Line(l) => Curve2d::Line(l.reversed()),
            Curve2d::Arc(a) => Curve2d::Arc(a.reversed()),
            Curve2d::Circle(c) => Curve2d::Circle(*c),
        }
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Self {
        match self {
            Curve2d::Line(l) => Curve2d::Line(l.translated(v)),
            Curve2d::Arc(a) => Curve2d::Arc(a.translated(v)),
            Curve2d::Circle(c) => Curve2d::Circle(c.translated(v)),
        }
    }

    pub fn rotated(&self, angle: f64, center: &Point2<f64>) -> Self {
        match self {
            Curve2d::Line(l) => Curve2d::Line(l.rotated(angle, center)),
            Curve2d::Arc(a) => Curve2d::Arc(a.rotated(angle, center)),
            Curve2d::Circle(c) => Curve2d::Circle(c.rotated(angle, center)),
        }
    }

    /// Polyline approximation in traversal order. Lines and arcs include
    /// both end points; circles return an open ring.
    pub fn tessellate(&self) -> Vec<Point2<f64>> {
        match self {
            Curve2d::Line(l) => vec![l.start, l.end],
            Curve2d::Arc(a) => a.tessellate(),
            Curve2d::Circle(c) => c.tessellate(),
        }
    }

    pub fn as_line(&self) -> Option<&Line2d> {
        match self {
            Curve2d::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() <= DIST_EPS
    }
}

impl From<Line2d> for Curve2d {
    fn from(line: Line2d) -> Self {
        Curve2d::Line(line)
    }
}

impl From<Arc2d> for Curve2d {
    fn from(arc: Arc2d) -> Self {
        Curve2d::Arc(arc)
    }
}

impl From<Circle2d> for Curve2d {
    fn from(circle: Circle2d) -> Self {
        Curve2d::Circle(circle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn line_param_and_projection() {
        let line = Line2d::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let p = Point2::new(4.0, 3.0);

        assert_relative_eq!(line.param_at(&p), 4.0);
        assert_relative_eq!(line.projected_pt(&p), Point2::new(4.0, 0.0));
        assert_relative_eq!(line.distance_to_line(&p), 3.0);
        assert_relative_eq!(line.param_at(&Point2::new(-2.0, 1.0)), -2.0);
    }

    #[test]
    fn line_offset_goes_left() {
        let line = Line2d::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let left = line.offset(0.5);
        let right = line.offset(-0.5);

        assert_relative_eq!(left.start.y, 0.5);
        assert_relative_eq!(right.start.y, -0.5);
    }

    #[test]
    fn extended_line_keeps_direction() {
        let line = Line2d::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let ext = line.extended_double(10.0);

        assert_relative_eq!(ext.start.x, -10.0);
        assert_relative_eq!(ext.end.x, 11.0);
        assert_relative_eq!(ext.direction(), line.direction());
    }

    #[test]
    fn segment_intersection() {
        let a = Line2d::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let b = Line2d::new(Point2::new(0.0, 2.0), Point2::new(2.0, 0.0));
        let c = Line2d::new(Point2::new(5.0, 0.0), Point2::new(6.0, 1.0));

        let p = a.intersect(&b, 1e-9).unwrap();
        assert_relative_eq!(p, Point2::new(1.0, 1.0), epsilon = 1e-12);
        assert!(a.intersect(&c, 1e-9).is_none());
    }

    #[test]
    fn collinear_lines() {
        let a = Line2d::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let b = Line2d::new(Point2::new(3.0, 0.0), Point2::new(5.0, 0.0));
        let c = Line2d::new(Point2::new(3.0, 0.1), Point2::new(5.0, 0.1));

        assert!(a.is_collinear_with(&b, 1e-6));
        assert!(!a.is_collinear_with(&c, 1e-6));
        assert!(a.is_parallel_to(&c, 1e-9));
    }

    #[test]
    fn rotate_line_about_center() {
        let line = Line2d::new(Point2::new(1.0, 0.0), Point2::new(2.0, 0.0));
        let rotated = line.rotated(FRAC_PI_2, &Point2::origin());

        assert_relative_eq!(rotated.start, Point2::new(0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(rotated.end, Point2::new(0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn arc_contains_angle_both_orientations() {
        let ccw = Arc2d::new(Point2::origin(), 1.0, 0.0, FRAC_PI_2);
        assert!(ccw.contains_angle(PI / 4.0));
        assert!(!ccw.contains_angle(PI));

        let cw = ccw.reversed();
        assert!(cw.contains_angle(PI / 4.0));
        assert!(!cw.contains_angle(PI));
        assert_relative_eq!(cw.start_pt(), ccw.end_pt(), epsilon = 1e-12);
    }

    #[test]
    fn arc_length_and_points() {
        let arc = Arc2d::new(Point2::new(1.0, 1.0), 2.0, 0.0, PI);
        assert_relative_eq!(arc.length(), 2.0 * PI);
        assert_relative_eq!(arc.mid_pt(), Point2::new(1.0, 3.0), epsilon = 1e-12);
        assert!(arc.contains_point(&Point2::new(-1.0, 1.0), 1e-9));
        assert!(!arc.contains_point(&Point2::new(1.0, -1.0), 1e-9));
    }

    #[test]
    fn arc_tessellation_hits_end_points() {
        let arc = Arc2d::new(Point2::origin(), 1.0, 0.0, FRAC_PI_2);
        let pts = arc.tessellate();
        assert_relative_eq!(pts[0], arc.start_pt(), epsilon = 1e-12);
        assert_relative_eq!(*pts.last().unwrap(), arc.end_pt(), epsilon = 1e-12);
    }

    #[test]
    fn circle_projection() {
        let circle = Circle2d::new(Point2::new(0.0, 0.0), 2.0);
        assert_relative_eq!(
            circle.projected_pt(&Point2::new(0.0, 5.0)),
            Point2::new(0.0, 2.0)
        );
        assert_relative_eq!(circle.distance_to_point(&Point2::new(0.0, 5.0)), 3.0);
    }
}
