// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorsnap Geometry
//!
//! Planar curve kernel for floor-plan editing: lines, arcs and circles,
//! closed loops, positional relations, and polygon booleans backed by
//! i_overlay.

pub mod bool2d;
pub mod curve;
pub mod error;
pub mod loops;
pub mod position;
pub mod tolerance;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use bool2d::{clip_line, enclosed_regions, merge_collinear, subtract_contours};
pub use curve::{rotate_point, Arc2d, Circle2d, Curve2d, CurveKind, Line2d};
pub use error::{Error, Result};
pub use loops::{Loop, Polygon};
pub use position::{
    curve_to_curve, intersect_curves, loop_to_loop, point_to_loop, CurvePosition, LoopPosition,
    PointPosition,
};
