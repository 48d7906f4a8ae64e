// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snap strategy: candidate constraints for every (master, target) pair.
//!
//! Predicates are looked up in a table keyed by `(master kind, target
//! kind)`. Pairs without an entry produce nothing. No candidate is dropped
//! for priority here; that is the resolver's job.

use floorsnap_geometry::curve::cross;
use floorsnap_geometry::tolerance::DIST_EPS;
use floorsnap_geometry::{Arc2d, Circle2d, Line2d, Loop};
use floorsnap_model::EntityKey;
use nalgebra::Vector2;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::anchor::{Anchor, AnchorGeometry, AnchorKind, AnchorRole, AnchorSet};
use crate::candidate::{Candidate, RotationDelta, SnapType};
use crate::config::SnapConfig;

/// Which tolerance a pair is evaluated with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakMode {
    /// Plain snap intensity
    Normal,
    /// Keeping the previous primary
    First,
    /// Keeping the previous secondary
    Second,
}

/// Everything a predicate may look at besides the pair itself
pub struct PredicateContext<'a> {
    pub intensity: f64,
    pub angle_eps: f64,
    pub strip_half_width: f64,
    pub masters: &'a AnchorSet,
    pub targets: &'a AnchorSet,
}

pub type Predicate = fn(&PredicateContext<'_>, &Anchor, &Anchor) -> Option<Candidate>;

/// Dispatch table. `None` marks a combination with no predicate.
pub fn predicate_for(master: AnchorKind, target: AnchorKind) -> Option<Predicate> {
    use AnchorKind::*;
    match (master, target) {
        (Point, Point) => Some(point_to_point),
        (Point, Line) => Some(point_to_line),
        (Point, Arc) | (Point, Circle) => None,
        (Line, Point) => None,
        (Line, Line) => Some(line_to_line),
        (Line, Arc) => Some(line_to_arc),
        (Line, Circle) => Some(line_to_circle),
        (Arc, _) => None,
        (Circle, Point) => None,
        (Circle, Line) => Some(circle_to_line),
        (Circle, Arc) => Some(circle_to_arc),
        (Circle, Circle) => Some(circle_to_circle),
    }
}

#[derive(Debug, Clone)]
pub struct SnapStrategy {
    intensity: f64,
    break_factor: f64,
    angle_eps: f64,
    strip_half_width: f64,
}

impl SnapStrategy {
    pub fn new(config: &SnapConfig) -> Self {
        Self {
            intensity: config.intensity(),
            break_factor: config.break_factor,
            angle_eps: config.angle_eps,
            strip_half_width: config.rotation_strip_half_width,
        }
    }

    /// Snap intensity in model units
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn intensity_for(&self, mode: BreakMode) -> f64 {
        match mode {
            BreakMode::Normal => self.intensity,
            BreakMode::First => self.break_factor * self.intensity,
            BreakMode::Second => self.break_factor * self.intensity / 4.0,
        }
    }

    fn context<'a>(&self, mode: BreakMode, masters: &'a AnchorSet, targets: &'a AnchorSet) -> PredicateContext<'a> {
        PredicateContext {
            intensity: self.intensity_for(mode),
            angle_eps: self.angle_eps,
            strip_half_width: self.strip_half_width,
            masters,
            targets,
        }
    }

    /// All candidates over every (master, target) pair
    pub fn execute(&self, masters: &AnchorSet, targets: &AnchorSet) -> Vec<Candidate> {
        let ctx = self.context(BreakMode::Normal, masters, targets);
        let mut candidates = Vec::new();
        for master in masters {
            for target in targets {
                if let Some(predicate) = predicate_for(master.kind(), target.kind()) {
                    candidates.extend(predicate(&ctx, master, target));
                }
            }
        }
        tracing::trace!(
            masters = masters.len(),
            targets = targets.len(),
            candidates = candidates.len(),
            "Evaluated snap pairs"
        );
        candidates
    }

    /// Re-evaluate a single pair, with the break intensity for `First` and
    /// `Second`
    pub fn execute_pair(
        &self,
        master: &Anchor,
        target: &Anchor,
        masters: &AnchorSet,
        targets: &AnchorSet,
        mode: BreakMode,
    ) -> Option<Candidate> {
        let predicate = predicate_for(master.kind(), target.kind())?;
        predicate(&self.context(mode, masters, targets), master, target)
    }
}

/// Beams never auto-rotate: drop rotation candidates when dragging one
pub fn exclude_for_element(element: EntityKey, candidates: &mut Vec<Candidate>) {
    if matches!(element, EntityKey::Beam(_)) {
        candidates.retain(|c| c.snap_type != SnapType::CollineRotation);
    }
}

/// Smallest signed angle (radians) turning line `from` parallel to `to`
pub fn align_angle(from: &Line2d, to: &Line2d) -> f64 {
    let a = from.direction();
    let b = to.direction();
    let mut angle = cross(&a, &b).atan2(a.dot(&b));
    if angle > FRAC_PI_2 {
        angle -= PI;
    } else if angle <= -FRAC_PI_2 {
        angle += PI;
    }
    angle
}

/// Thin counter-clockwise strip around `line`
fn strip_loop(line: &Line2d, half_width: f64) -> Option<Loop> {
    let d = line.direction();
    Loop::rectangle(line.mid_pt(), line.length(), 2.0 * half_width, d.y.atan2(d.x))
        .ok()
        .map(|l| l.to_anticlockwise())
}

fn as_circle(anchor: &Anchor) -> Option<Circle2d> {
    match &anchor.geometry {
        AnchorGeometry::Circle(c) => Some(*c),
        AnchorGeometry::Arc(a) => Some(a.circle()),
        _ => None,
    }
}

fn as_arc(anchor: &Anchor) -> Option<&Arc2d> {
    match &anchor.geometry {
        AnchorGeometry::Arc(a) => Some(a),
        _ => None,
    }
}

fn point_to_point(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    let p = master.as_point()?;
    let q = target.as_point()?;
    let offset = q - p;
    (offset.norm() < ctx.intensity)
        .then(|| Candidate::translation(SnapType::Overlap, *master, *target, offset))
}

/// Slide a corner onto a line and turn the element so one of the corner's
/// edges lies along it
fn point_to_line(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    if master.role() == AnchorRole::CenterPoint || target.role() == AnchorRole::CenterLine {
        return None;
    }
    let p = *master.as_point()?;
    let line = target.as_line()?;

    let t = line.param_at(&p);
    if !line.contains_param(t, DIST_EPS) {
        return None;
    }
    let offset = line.point_at(t) - p;
    if offset.norm() >= ctx.intensity {
        return None;
    }

    let angle = ctx
        .masters
        .iter()
        .filter(|a| a.owner() == master.owner() && a.role() != AnchorRole::CenterLine)
        .filter_map(|a| a.as_line())
        .filter(|l| (l.start - p).norm() <= DIST_EPS || (l.end - p).norm() <= DIST_EPS)
        .map(|l| align_angle(l, line))
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))?;
    if angle.abs() < ctx.angle_eps {
        return None;
    }

    let reference = match ctx.targets.outline(target.owner()) {
        Some(outline) => outline.clone(),
        None => strip_loop(line, ctx.strip_half_width)?,
    };
    let rotation = RotationDelta {
        angle_deg: angle.to_degrees(),
        center: p + offset,
    };
    Some(
        Candidate::translation(SnapType::CollineRotation, *master, *target, offset)
            .with_rotation(rotation, reference),
    )
}

fn line_to_line(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    let ml = master.as_line()?;
    let tl = target.as_line()?;
    if cross(&ml.direction(), &tl.direction()).abs() > ctx.angle_eps {
        return None;
    }
    let offset = tl.projected_pt(&ml.start) - ml.start;
    (offset.norm() < ctx.intensity)
        .then(|| Candidate::translation(SnapType::Colline, *master, *target, offset))
}

/// Move a line onto a circle it nearly touches. The foot of the center
/// must fall on the segment and, for arcs, the touch point on the arc.
fn line_tangent(
    ctx: &PredicateContext<'_>,
    master: &Anchor,
    target: &Anchor,
    circle: Circle2d,
    arc: Option<&Arc2d>,
) -> Option<Candidate> {
    let ml = master.as_line()?;
    let t = ml.param_at(&circle.center);
    if !ml.contains_param(t, DIST_EPS) {
        return None;
    }
    let to_center = circle.center - ml.point_at(t);
    let d = to_center.norm();
    if d <= DIST_EPS {
        return None;
    }
    let gap = d - circle.radius;
    if gap.abs() >= ctx.intensity {
        return None;
    }
    let u = to_center / d;
    if let Some(arc) = arc {
        let touch = circle.center - u * circle.radius;
        if !arc.contains_point(&touch, DIST_EPS) {
            return None;
        }
    }
    Some(Candidate::translation(SnapType::Tangent, *master, *target, u * gap))
}

fn line_to_arc(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    let arc = as_arc(target)?;
    line_tangent(ctx, master, target, arc.circle(), Some(arc))
}

fn line_to_circle(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    let circle = as_circle(target)?;
    line_tangent(ctx, master, target, circle, None)
}

fn circle_to_line(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    let circle = as_circle(master)?;
    let line = target.as_line()?;
    // carrier line, not the segment
    let to_line = line.projected_pt(&circle.center) - circle.center;
    let d = to_line.norm();
    if d <= DIST_EPS {
        return None;
    }
    let gap = d - circle.radius;
    (gap.abs() < ctx.intensity).then(|| {
        Candidate::translation(SnapType::Tangent, *master, *target, to_line / d * gap)
    })
}

fn circle_to_circle(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    let a = as_circle(master)?;
    let b = as_circle(target)?;
    let v = b.center - a.center;
    let d = v.norm();
    if d <= DIST_EPS {
        return None;
    }
    let gap = d - a.radius - b.radius;
    (gap.abs() < ctx.intensity)
        .then(|| Candidate::translation(SnapType::Tangent, *master, *target, v / d * gap))
}

/// Outer or inner tangency with an arc, whichever needs the smaller move
fn circle_to_arc(ctx: &PredicateContext<'_>, master: &Anchor, target: &Anchor) -> Option<Candidate> {
    let circle = as_circle(master)?;
    let arc = as_arc(target)?;
    let v = arc.center - circle.center;
    let d = v.norm();
    if d <= DIST_EPS {
        return None;
    }
    let u = v / d;

    let mut best: Option<Vector2<f64>> = None;
    let mut consider = |offset: Vector2<f64>| {
        if offset.norm() < ctx.intensity && best.map_or(true, |b| offset.norm() < b.norm()) {
            best = Some(offset);
        }
    };

    // both tangencies touch the arc on the ray toward the master center
    let touch = arc.center - u * arc.radius;
    if arc.contains_point(&touch, DIST_EPS) {
        consider(u * (d - circle.radius - arc.radius));
        if arc.radius > circle.radius {
            consider(-u * ((arc.radius - circle.radius) - d));
        }
    }

    best.map(|offset| Candidate::translation(SnapType::Tangent, *master, *target, offset))
}
