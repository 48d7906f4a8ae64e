// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed loops of curves and polygons with holes.

use nalgebra::{Point2, Vector2};

use crate::bool2d::{compute_signed_area, contour_bounds, point_in_contour};
use crate::curve::{Curve2d, Line2d};
use crate::error::{Error, Result};
use crate::position::PointPosition;
use crate::tolerance::DIST_EPS;

/// Closed chain of curves. The end of each curve meets the start of the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    curves: Vec<Curve2d>,
}

impl Loop {
    /// Build a loop from curves already chained end to start
    pub fn new(curves: Vec<Curve2d>) -> Result<Self> {
        let curves: Vec<Curve2d> = curves.into_iter().filter(|c| !c.is_degenerate()).collect();
        if curves.is_empty() {
            return Err(Error::InvalidContour("loop has no curves".to_string()));
        }
        let single_circle = curves.len() == 1 && matches!(curves[0], Curve2d::Circle(_));
        if curves.len() < 2 && !single_circle {
            return Err(Error::InvalidContour(
                "open chain cannot form a loop".to_string(),
            ));
        }
        Ok(Self { curves })
    }

    /// Closed polyline through `points`; the closing edge is implied
    pub fn from_points(points: &[Point2<f64>]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InvalidContour(format!(
                "polygon needs at least 3 vertices, got {}",
                points.len()
            )));
        }
        let n = points.len();
        let curves = (0..n)
            .map(|i| Curve2d::Line(Line2d::new(points[i], points[(i + 1) % n])))
            .collect();
        Self::new(curves)
    }

    /// Axis-aligned rectangle centered at `center`, rotated by `angle` radians
    pub fn rectangle(center: Point2<f64>, x_size: f64, y_size: f64, angle: f64) -> Result<Self> {
        if x_size <= DIST_EPS || y_size <= DIST_EPS {
            return Err(Error::InvalidContour(format!(
                "rectangle sizes must be positive ({} x {})",
                x_size, y_size
            )));
        }
        let (hx, hy) = (x_size * 0.5, y_size * 0.5);
        let (s, c) = angle.sin_cos();
        let corner = |x: f64, y: f64| Point2::new(center.x + x * c - y * s, center.y + x * s + y * c);
        Self::from_points(&[
            corner(-hx, -hy),
            corner(hx, -hy),
            corner(hx, hy),
            corner(-hx, hy),
        ])
    }

    pub fn curves(&self) -> &[Curve2d] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Start points of each curve
    pub fn points(&self) -> Vec<Point2<f64>> {
        self.curves.iter().map(|c| c.start_pt()).collect()
    }

    /// Flattened contour without a closing duplicate
    pub fn to_contour(&self) -> Vec<Point2<f64>> {
        let mut contour = Vec::new();
        for curve in &self.curves {
            let pts = curve.tessellate();
            match curve {
                Curve2d::Circle(_) => contour.extend(pts),
                _ => contour.extend(pts.iter().take(pts.len().saturating_sub(1))),
            }
        }
        contour
    }

    pub fn signed_area(&self) -> f64 {
        compute_signed_area(&self.to_contour())
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_anticlockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reversed(&self) -> Self {
        Self {
            curves: self.curves.iter().rev().map(|c| c.reversed()).collect(),
        }
    }

    /// Same loop, counter-clockwise
    pub fn to_anticlockwise(&self) -> Self {
        if self.is_anticlockwise() {
            self.clone()
        } else {
            self.reversed()
        }
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Self {
        Self {
            curves: self.curves.iter().map(|c| c.translated(v)).collect(),
        }
    }

    pub fn rotated(&self, angle: f64, center: &Point2<f64>) -> Self {
        Self {
            curves: self.curves.iter().map(|c| c.rotated(angle, center)).collect(),
        }
    }

    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        contour_bounds(&self.to_contour())
    }

    /// Position of `p` relative to the loop, `On` within `tol` of any curve
    pub fn point_position(&self, p: &Point2<f64>, tol: f64) -> PointPosition {
        if self.curves.iter().any(|c| c.contains_point(p, tol)) {
            return PointPosition::On;
        }
        if point_in_contour(p, &self.to_contour()) {
            PointPosition::In
        } else {
            PointPosition::Out
        }
    }

    pub fn centroid(&self) -> Point2<f64> {
        let contour = self.to_contour();
        let n = contour.len().max(1) as f64;
        let sum = contour
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords);
        Point2::from(sum / n)
    }
}

/// Region bounded by an outer loop, minus any holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub outer: Loop,
    pub holes: Vec<Loop>,
}

impl Polygon {
    pub fn new(outer: Loop, holes: Vec<Loop>) -> Self {
        Self { outer, holes }
    }

    pub fn from_loop(outer: Loop) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Every boundary curve, outer loop first
    pub fn all_curves(&self) -> impl Iterator<Item = &Curve2d> {
        self.outer
            .curves()
            .iter()
            .chain(self.holes.iter().flat_map(|h| h.curves().iter()))
    }

    pub fn loops(&self) -> impl Iterator<Item = &Loop> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(|h| h.area()).sum::<f64>()
    }

    pub fn point_position(&self, p: &Point2<f64>, tol: f64) -> PointPosition {
        match self.outer.point_position(p, tol) {
            PointPosition::Out => PointPosition::Out,
            PointPosition::On => PointPosition::On,
            PointPosition::In => {
                for hole in &self.holes {
                    match hole.point_position(p, tol) {
                        PointPosition::In => return PointPosition::Out,
                        PointPosition::On => return PointPosition::On,
                        PointPosition::Out => {}
                    }
                }
                PointPosition::In
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn square(size: f64) -> Loop {
        Loop::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ])
        .unwrap()
    }

    #[test]
    fn square_orientation_and_area() {
        let sq = square(2.0);
        assert!(sq.is_anticlockwise());
        assert_relative_eq!(sq.area(), 4.0);

        let rev = sq.reversed();
        assert!(!rev.is_anticlockwise());
        assert_relative_eq!(rev.signed_area(), -4.0);
        assert!(rev.to_anticlockwise().is_anticlockwise());
    }

    #[test]
    fn too_few_points_is_rejected() {
        let err = Loop::from_points(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(matches!(err, Err(Error::InvalidContour(_))));
    }

    #[test]
    fn point_positions() {
        let sq = square(2.0);
        assert_eq!(sq.point_position(&Point2::new(1.0, 1.0), 1e-6), PointPosition::In);
        assert_eq!(sq.point_position(&Point2::new(3.0, 1.0), 1e-6), PointPosition::Out);
        assert_eq!(sq.point_position(&Point2::new(2.0, 1.0), 1e-6), PointPosition::On);
    }

    #[test]
    fn rotated_rectangle_corners() {
        let rect = Loop::rectangle(Point2::new(0.0, 0.0), 4.0, 2.0, FRAC_PI_2).unwrap();
        let (min, max) = rect.bounds().unwrap();
        assert_relative_eq!(min, Point2::new(-1.0, -2.0), epsilon = 1e-12);
        assert_relative_eq!(max, Point2::new(1.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(rect.area(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn polygon_hole_excludes_points() {
        let outer = square(10.0);
        let hole = Loop::from_points(&[
            Point2::new(4.0, 4.0),
            Point2::new(4.0, 6.0),
            Point2::new(6.0, 6.0),
            Point2::new(6.0, 4.0),
        ])
        .unwrap();
        let poly = Polygon::new(outer, vec![hole]);

        assert_eq!(poly.point_position(&Point2::new(5.0, 5.0), 1e-6), PointPosition::Out);
        assert_eq!(poly.point_position(&Point2::new(2.0, 2.0), 1e-6), PointPosition::In);
        assert_eq!(poly.point_position(&Point2::new(4.0, 5.0), 1e-6), PointPosition::On);
        assert_relative_eq!(poly.area(), 96.0);
        assert_eq!(poly.all_curves().count(), 8);
    }
}
