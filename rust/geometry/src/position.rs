// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Positional relations between points, curves and loops.

use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

use crate::curve::{cross, Circle2d, Curve2d, Line2d};
use crate::loops::Loop;
use crate::tolerance::{ANGLE_EPS, DIST_EPS};

/// Where a point sits relative to a closed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointPosition {
    In,
    Out,
    On,
}

/// Relation of loop `a` to loop `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopPosition {
    /// `a` lies inside `b`
    In,
    /// Disjoint interiors, no contact
    Out,
    /// Disjoint interiors touching along the boundary
    On,
    /// Boundaries cross
    Intersect,
    /// `b` lies inside `a`
    Contains,
}

/// Relation between two curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurvePosition {
    NotIntersect,
    Intersect,
    Overlap,
}

/// Intersection points, at most two for the supported curve pairs
pub type Intersections = SmallVec<[Point2<f64>; 2]>;

pub fn point_to_loop(p: &Point2<f64>, lp: &Loop, tol: f64) -> PointPosition {
    lp.point_position(p, tol)
}

/// Classify loop `a` against loop `b` by sampling vertices and edge
/// midpoints of both contours, then checking edge crossings
pub fn loop_to_loop(a: &Loop, b: &Loop, tol: f64) -> LoopPosition {
    let a_samples = boundary_samples(a);
    let b_samples = boundary_samples(b);

    let (a_in, a_out, a_on) = classify(&a_samples, b, tol);
    if a_in && a_out {
        return LoopPosition::Intersect;
    }
    if !a_out {
        // every sample of `a` is in or on `b`; coincident loops count as inside
        return LoopPosition::In;
    }

    let (b_in, b_out, b_on) = classify(&b_samples, a, tol);
    if b_in {
        return if b_out {
            LoopPosition::Intersect
        } else {
            LoopPosition::Contains
        };
    }
    if a_on || b_on {
        return LoopPosition::On;
    }
    if contours_cross(&a.to_contour(), &b.to_contour(), tol) {
        LoopPosition::Intersect
    } else {
        LoopPosition::Out
    }
}

/// Classify two curves. Collinear line pairs sharing a stretch overlap.
pub fn curve_to_curve(a: &Curve2d, b: &Curve2d, tol: f64) -> CurvePosition {
    match (a, b) {
        (Curve2d::Line(la), Curve2d::Line(lb)) if la.is_collinear_with(lb, tol) => {
            let t0 = la.param_at(&lb.start);
            let t1 = la.param_at(&lb.end);
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            let overlap = hi.min(la.length()) - lo.max(0.0);
            if overlap > tol {
                CurvePosition::Overlap
            } else if overlap >= -tol {
                CurvePosition::Intersect
            } else {
                CurvePosition::NotIntersect
            }
        }
        (Curve2d::Circle(ca), Curve2d::Circle(cb))
            if (ca.center - cb.center).norm() <= tol && (ca.radius - cb.radius).abs() <= tol =>
        {
            CurvePosition::Overlap
        }
        _ => {
            if intersect_curves(a, b, tol).is_empty() {
                CurvePosition::NotIntersect
            } else {
                CurvePosition::Intersect
            }
        }
    }
}

/// Intersection points of two curves. Overlapping collinear lines and
/// coincident circles yield no points.
pub fn intersect_curves(a: &Curve2d, b: &Curve2d, tol: f64) -> Intersections {
    match (a, b) {
        (Curve2d::Line(la), Curve2d::Line(lb)) => la.intersect(lb, tol).into_iter().collect(),
        (Curve2d::Line(l), other) | (other, Curve2d::Line(l)) => {
            let circle = carrier_circle(other);
            line_circle_points(l, &circle, tol)
                .into_iter()
                .filter(|p| other.contains_point(p, tol.max(DIST_EPS)))
                .collect()
        }
        _ => {
            let ca = carrier_circle(a);
            let cb = carrier_circle(b);
            circle_circle_points(&ca, &cb, tol)
                .into_iter()
                .filter(|p| a.contains_point(p, tol.max(DIST_EPS)) && b.contains_point(p, tol.max(DIST_EPS)))
                .collect()
        }
    }
}

fn carrier_circle(curve: &Curve2d) -> Circle2d {
    match curve {
        Curve2d::Arc(a) => a.circle(),
        Curve2d::Circle(c) => *c,
        Curve2d::Line(l) => Circle2d::new(l.mid_pt(), 0.0),
    }
}

/// Intersections of a segment with a full circle
fn line_circle_points(line: &Line2d, circle: &Circle2d, tol: f64) -> Intersections {
    let mut out = Intersections::new();
    if line.is_degenerate() {
        return out;
    }
    let d = line.direction();
    let f = line.start - circle.center;
    let b = f.dot(&d);
    let c = f.dot(&f) - circle.radius * circle.radius;
    let disc = b * b - c;
    let dist = line.distance_to_line(&circle.center);
    if dist > circle.radius + tol {
        return out;
    }
    let s = disc.max(0.0).sqrt();
    for t in [-b - s, -b + s] {
        if line.contains_param(t, tol) {
            let p = line.point_at(t);
            if out.iter().all(|q| (q - p).norm() > DIST_EPS) {
                out.push(p);
            }
        }
    }
    out
}

fn circle_circle_points(a: &Circle2d, b: &Circle2d, tol: f64) -> Intersections {
    let mut out = Intersections::new();
    let v = b.center - a.center;
    let d = v.norm();
    if d <= DIST_EPS || d > a.radius + b.radius + tol || d < (a.radius - b.radius).abs() - tol {
        return out;
    }
    let along = (a.radius * a.radius - b.radius * b.radius + d * d) / (2.0 * d);
    let h = (a.radius * a.radius - along * along).max(0.0).sqrt();
    let u = v / d;
    let base = a.center + u * along;
    let perp = Vector2::new(-u.y, u.x);
    out.push(base + perp * h);
    if h > DIST_EPS {
        out.push(base - perp * h);
    }
    out
}

/// Shortest distance from a point to a curve
pub fn point_to_curve_distance(p: &Point2<f64>, curve: &Curve2d) -> f64 {
    curve.distance_to_point(p)
}

fn boundary_samples(lp: &Loop) -> Vec<Point2<f64>> {
    let contour = lp.to_contour();
    let n = contour.len();
    let mut samples = Vec::with_capacity(n * 2);
    for i in 0..n {
        let p = contour[i];
        let q = contour[(i + 1) % n];
        samples.push(p);
        samples.push(Point2::from((p.coords + q.coords) * 0.5));
    }
    samples
}

fn classify(samples: &[Point2<f64>], lp: &Loop, tol: f64) -> (bool, bool, bool) {
    let (mut has_in, mut has_out, mut has_on) = (false, false, false);
    for p in samples {
        match lp.point_position(p, tol) {
            PointPosition::In => has_in = true,
            PointPosition::Out => has_out = true,
            PointPosition::On => has_on = true,
        }
    }
    (has_in, has_out, has_on)
}

/// True when two contours have edges crossing at interior points
fn contours_cross(a: &[Point2<f64>], b: &[Point2<f64>], tol: f64) -> bool {
    let edges = |c: &[Point2<f64>]| -> Vec<Line2d> {
        let n = c.len();
        (0..n).map(|i| Line2d::new(c[i], c[(i + 1) % n])).collect()
    };
    let ea = edges(a);
    let eb = edges(b);
    ea.iter().any(|la| {
        eb.iter().any(|lb| {
            if cross(&la.direction(), &lb.direction()).abs() <= ANGLE_EPS {
                return false;
            }
            la.intersect(lb, -tol).is_some()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Arc2d;
    use std::f64::consts::PI;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Loop {
        Loop::from_points(&[
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
        .unwrap()
    }

    #[test]
    fn loop_inside_and_contains() {
        let big = rect(0.0, 0.0, 10.0, 10.0);
        let small = rect(2.0, 2.0, 4.0, 4.0);
        assert_eq!(loop_to_loop(&small, &big, 1e-6), LoopPosition::In);
        assert_eq!(loop_to_loop(&big, &small, 1e-6), LoopPosition::Contains);
    }

    #[test]
    fn loop_touching_is_on() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(2.0, 0.0, 4.0, 2.0);
        assert_eq!(loop_to_loop(&a, &b, 1e-6), LoopPosition::On);
    }

    #[test]
    fn loop_apart_is_out() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(3.0, 0.0, 4.0, 2.0);
        assert_eq!(loop_to_loop(&a, &b, 1e-6), LoopPosition::Out);
    }

    #[test]
    fn overlapping_loops_intersect() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.0, 1.0, 3.0, 3.0);
        assert_eq!(loop_to_loop(&a, &b, 1e-6), LoopPosition::Intersect);
    }

    #[test]
    fn crossing_bars_intersect() {
        let a = rect(0.0, 4.0, 10.0, 6.0);
        let b = rect(4.0, 0.0, 6.0, 10.0);
        assert_eq!(loop_to_loop(&a, &b, 1e-6), LoopPosition::Intersect);
    }

    #[test]
    fn collinear_lines_overlap() {
        let a = Curve2d::Line(Line2d::new(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)));
        let b = Curve2d::Line(Line2d::new(Point2::new(2.0, 0.0), Point2::new(6.0, 0.0)));
        let c = Curve2d::Line(Line2d::new(Point2::new(5.0, 0.0), Point2::new(6.0, 0.0)));
        assert_eq!(curve_to_curve(&a, &b, 1e-6), CurvePosition::Overlap);
        assert_eq!(curve_to_curve(&a, &c, 1e-6), CurvePosition::NotIntersect);
    }

    #[test]
    fn line_crosses_arc_once() {
        let arc = Curve2d::Arc(Arc2d::new(Point2::origin(), 1.0, 0.0, PI));
        let line = Curve2d::Line(Line2d::new(Point2::new(0.0, -2.0), Point2::new(0.0, 2.0)));
        let pts = intersect_curves(&line, &arc, 1e-9);
        assert_eq!(pts.len(), 1);
        assert!((pts[0] - Point2::new(0.0, 1.0)).norm() < 1e-9);
        assert_eq!(curve_to_curve(&arc, &line, 1e-9), CurvePosition::Intersect);
    }

    #[test]
    fn separate_circles_do_not_intersect() {
        let a = Curve2d::Circle(Circle2d::new(Point2::origin(), 1.0));
        let b = Curve2d::Circle(Circle2d::new(Point2::new(5.0, 0.0), 1.0));
        assert_eq!(curve_to_curve(&a, &b, 1e-9), CurvePosition::NotIntersect);
    }
}
