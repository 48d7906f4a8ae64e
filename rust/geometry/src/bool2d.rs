// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Room Regions and Beam Rails
//!
//! Wall footprints are unioned with the i_overlay crate; the holes of the
//! union are the regions enclosed by walls. Beam footprints are subtracted
//! from those regions, and straight rails are clipped against the result.

use crate::curve::Line2d;
use crate::error::{Error, Result};
use crate::loops::{Loop, Polygon};
use crate::position::PointPosition;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Union footprints and return the regions they fully enclose
///
/// Each hole of the union becomes a counter-clockwise region. Islands of
/// the union lying inside a region are carried as its holes.
pub fn enclosed_regions(footprints: &[Vec<Point2<f64>>]) -> Result<Vec<Polygon>> {
    let shapes = union_shapes(footprints);
    if shapes.is_empty() {
        return Err(Error::EmptyBoolean(
            "footprint union is empty".to_string(),
        ));
    }

    let outers: Vec<Vec<Point2<f64>>> = shapes
        .iter()
        .filter_map(|shape| shape.first().cloned())
        .collect();

    let mut regions = Vec::new();
    for shape in &shapes {
        for hole in shape.iter().skip(1) {
            if !is_valid_contour(hole) {
                continue;
            }
            let outer = Loop::from_points(&ensure_ccw(hole))?;
            let hole_area = compute_signed_area(hole).abs();

            // islands: other outers strictly inside this hole
            let mut islands = Vec::new();
            for island in &outers {
                if compute_signed_area(island).abs() >= hole_area {
                    continue;
                }
                if contour_inside_contour(island, hole) {
                    islands.push(Loop::from_points(&ensure_cw(island))?);
                }
            }
            regions.push(Polygon::new(outer, islands));
        }
    }

    Ok(regions)
}

/// Subtract cutter contours from every subject polygon
pub fn subtract_contours(subjects: &[Polygon], cutters: &[Vec<Point2<f64>>]) -> Vec<Polygon> {
    let clip: Vec<Vec<[f64; 2]>> = cutters
        .iter()
        .filter(|c| is_valid_contour(c))
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    if clip.is_empty() || subjects.is_empty() {
        return subjects.to_vec();
    }

    let subject: Vec<Vec<[f64; 2]>> = subjects.iter().flat_map(polygon_to_paths).collect();

    // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
    let result = subject.overlay(&clip, OverlayRule::Difference, FillRule::NonZero);

    shapes_to_polygons(&to_point_shapes(result))
}

/// Parts of `line` lying inside or on any of `polygons`, ordered along
/// the line and with touching parts merged
pub fn clip_line(line: &Line2d, polygons: &[Polygon], tol: f64) -> Vec<Line2d> {
    let length = line.length();
    if length <= tol || polygons.is_empty() {
        return Vec::new();
    }

    let mut params = vec![0.0, length];
    for poly in polygons {
        for lp in poly.loops() {
            let contour = lp.to_contour();
            let n = contour.len();
            for i in 0..n {
                let edge = Line2d::new(contour[i], contour[(i + 1) % n]);
                if let Some((t, u)) = line.intersect_params(&edge) {
                    if t > 0.0 && t < length && edge.contains_param(u, tol) {
                        params.push(t);
                    }
                } else {
                    // collinear edges contribute their end points
                    if line.distance_to_line(&edge.start) <= tol {
                        for p in [edge.start, edge.end] {
                            let t = line.param_at(&p);
                            if t > 0.0 && t < length {
                                params.push(t);
                            }
                        }
                    }
                }
            }
        }
    }
    params.sort_by(|a, b| a.total_cmp(b));
    params.dedup_by(|a, b| (*a - *b).abs() <= tol);

    let mut kept: Vec<(f64, f64)> = Vec::new();
    for pair in params.windows(2) {
        let (t0, t1) = (pair[0], pair[1]);
        if t1 - t0 <= tol {
            continue;
        }
        let mid = line.point_at((t0 + t1) * 0.5);
        let inside = polygons
            .iter()
            .any(|poly| poly.point_position(&mid, tol) != PointPosition::Out);
        if !inside {
            continue;
        }
        match kept.last_mut() {
            Some(last) if (t0 - last.1).abs() <= tol => last.1 = t1,
            _ => kept.push((t0, t1)),
        }
    }

    kept.into_iter()
        .map(|(t0, t1)| line.with_range(t0, t1))
        .collect()
}

/// Merge consecutive collinear segments whose ends touch
pub fn merge_collinear(lines: &[Line2d], tol: f64) -> Vec<Line2d> {
    let mut merged: Vec<Line2d> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.length() <= tol {
            continue;
        }
        match merged.last_mut() {
            Some(last)
                if last.is_collinear_with(line, tol)
                    && last.direction().dot(&line.direction()) > 0.0
                    && (last.end - line.start).norm() <= tol =>
            {
                last.end = line.end;
            }
            _ => merged.push(*line),
        }
    }
    merged
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let area = compute_signed_area(contour).abs();
    area > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Check if contour A is completely inside contour B
pub fn contour_inside_contour(inner: &[Point2<f64>], outer: &[Point2<f64>]) -> bool {
    inner.iter().all(|p| point_in_contour(p, outer))
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = contour.first()?;
    let mut min = *first;
    let mut max = *first;

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Union all footprints into shapes (first contour outer, rest holes)
fn union_shapes(footprints: &[Vec<Point2<f64>>]) -> Vec<Vec<Vec<Point2<f64>>>> {
    let paths: Vec<Vec<[f64; 2]>> = footprints
        .iter()
        .filter(|c| is_valid_contour(c))
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    let Some((first, rest)) = paths.split_first() else {
        return Vec::new();
    };

    let subject = vec![first.clone()];
    // a lone footprint is unioned with itself
    let clip: Vec<Vec<[f64; 2]>> = if rest.is_empty() {
        subject.clone()
    } else {
        rest.to_vec()
    };

    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
    to_point_shapes(result)
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Outer boundary counter-clockwise, holes clockwise
fn polygon_to_paths(polygon: &Polygon) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::with_capacity(1 + polygon.holes.len());
    paths.push(contour_to_path(&ensure_ccw(&polygon.outer.to_contour())));
    for hole in &polygon.holes {
        paths.push(contour_to_path(&ensure_cw(&hole.to_contour())));
    }
    paths
}

/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn to_point_shapes(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<Vec<Vec<Point2<f64>>>> {
    shapes
        .into_iter()
        .map(|shape| {
            shape
                .into_iter()
                .map(|contour| {
                    contour
                        .into_iter()
                        .map(|p| Point2::new(p[0], p[1]))
                        .collect::<Vec<Point2<f64>>>()
                })
                .collect::<Vec<_>>()
        })
        .filter(|shape| !shape.is_empty())
        .collect()
}

fn shapes_to_polygons(shapes: &[Vec<Vec<Point2<f64>>>]) -> Vec<Polygon> {
    let mut polygons = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let Some(outer) = shape.first() else {
            continue;
        };
        if !is_valid_contour(outer) {
            continue;
        }
        let Ok(outer) = Loop::from_points(&ensure_ccw(outer)) else {
            continue;
        };
        let holes = shape
            .iter()
            .skip(1)
            .filter(|h| is_valid_contour(h))
            .filter_map(|h| Loop::from_points(&ensure_cw(h)).ok())
            .collect();
        polygons.push(Polygon::new(outer, holes));
    }
    polygons
}
