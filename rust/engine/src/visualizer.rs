// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auxiliary guide lines shown while a snap is active.
//!
//! Rendering lives outside the engine. A [`SubLineVisualizer`] only gets
//! told what to show and when to hide it.

use nalgebra::Point2;

use crate::candidate::{Candidate, SnapType, Transform};

pub trait SubLineVisualizer {
    /// Show guides for the constraints that produced `transform`
    fn show(&mut self, primary: &Candidate, secondary: Option<&Candidate>, transform: &Transform);
    fn hide(&mut self);
}

/// Visualizer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVisualizer;

impl SubLineVisualizer for NoopVisualizer {
    fn show(&mut self, _primary: &Candidate, _secondary: Option<&Candidate>, _transform: &Transform) {}

    fn hide(&mut self) {}
}

/// One guide from the snapped master anchor to its client
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideSegment {
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub snap_type: SnapType,
}

/// Records guide segments for a host UI to draw
#[derive(Debug, Clone, Default)]
pub struct GuideLines {
    pub segments: Vec<GuideSegment>,
    pub visible: bool,
}

impl GuideLines {
    pub fn new() -> Self {
        Self::default()
    }

    fn segment(candidate: &Candidate, transform: &Transform) -> GuideSegment {
        GuideSegment {
            from: candidate.master.geometry.key_point() + transform.offset(),
            to: candidate.client.geometry.key_point(),
            snap_type: candidate.snap_type,
        }
    }
}

impl SubLineVisualizer for GuideLines {
    fn show(&mut self, primary: &Candidate, secondary: Option<&Candidate>, transform: &Transform) {
        self.segments.clear();
        self.segments.push(Self::segment(primary, transform));
        if let Some(s) = secondary {
            self.segments.push(Self::segment(s, transform));
        }
        self.visible = true;
    }

    fn hide(&mut self) {
        self.segments.clear();
        self.visible = false;
    }
}
