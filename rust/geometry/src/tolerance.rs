// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Absolute tolerances shared by the kernel and the snapping engine.

/// Distance below which two points are considered coincident
pub const DIST_EPS: f64 = 1e-6;

/// Angle (radians) below which two directions are considered equal
pub const ANGLE_EPS: f64 = 1e-6;

/// Offsets closer than this are treated as the same snap offset
pub const OFFSET_EPS: f64 = 1e-4;

/// A transform component within this of zero counts as unset
pub const ZERO_EPS: f64 = 1e-6;

/// Two snap offsets on the same axis disagree beyond this length
pub const EDGE_LENGTH_EPS: f64 = 1e-3;

/// Cross product bound for "near parallel" directions
pub const PARALLEL_CROSS_EPS: f64 = 1e-3;

/// Number of chords used per full turn when arcs are flattened
pub const ARC_SEGMENTS_PER_TURN: usize = 64;

/// Compare two floats with an absolute tolerance
#[inline]
pub fn near(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// True when `v` is within [`ZERO_EPS`] of zero
#[inline]
pub fn is_zero(v: f64) -> bool {
    v.abs() <= ZERO_EPS
}
