// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snap orchestration for one drag gesture.
//!
//! Every frame gathers the neighborhood, extracts anchors, runs the strategy
//! and resolver, then feeds the result through [`SnapState::advance`]. The
//! transition is pure so the rotation-continuity rules can be exercised
//! without a scene.
//!
//! ## Rotation continuity
//!
//! When a snap turns the element, the rotation it had before is remembered
//! together with the loop it was glued to. If a later frame produces no
//! snap while the element has left that loop but is still within snap
//! distance of it, the element is turned back about the vertex nearest to
//! the loop. Beyond snap distance the memory is dropped and the element
//! keeps its current orientation.

use floorsnap_geometry::tolerance::DIST_EPS;
use floorsnap_geometry::{curve_to_curve, loop_to_loop, Curve2d, CurvePosition, Line2d, Loop, LoopPosition};
use floorsnap_model::{EntityKey, Scene};
use nalgebra::Point2;
use smallvec::SmallVec;

use crate::anchor::AnchorSet;
use crate::candidate::{Candidate, RotationDelta, Transform};
use crate::config::SnapConfig;
use crate::error::Result;
use crate::extract::{extract, extract_entity, ExtractOptions};
use crate::neighborhood::PositionEntities;
use crate::resolver::ConstraintResolver;
use crate::strategy::{exclude_for_element, SnapStrategy};
use crate::visualizer::{NoopVisualizer, SubLineVisualizer};

/// Rotation remembered while a rotating snap is active
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRotation {
    /// Element rotation (degrees) before the snap turned it
    pub original_rotation: f64,
    pub reference_loop: Loop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapPhase {
    Idle,
    SnappedTranslation,
    SnappedRotation,
    RecoveringRotation,
}

/// Selection state carried from one frame to the next
#[derive(Debug, Clone, Default)]
pub struct SnapState {
    pub primary: Option<Candidate>,
    pub secondary: Option<Candidate>,
    pub pending_rotation: Option<PendingRotation>,
}

/// Everything one frame contributes to the transition
pub struct FrameInput<'a> {
    pub candidates: &'a [Candidate],
    pub masters: &'a AnchorSet,
    pub targets: &'a AnchorSet,
    /// Element rotation in degrees before this frame's transform
    pub current_rotation: f64,
    /// Element outline, if it has one
    pub outline: Option<&'a Loop>,
    pub strategy: &'a SnapStrategy,
    pub resolver: &'a ConstraintResolver,
}

enum Recovery {
    Hold,
    Rotate(Transform),
    Abandon,
}

/// Outline vertex and the reference segment it is nearest to
struct NearestLine {
    distance: f64,
    vertex: Point2<f64>,
    line: Line2d,
}

impl SnapState {
    pub fn phase(&self) -> SnapPhase {
        let rotating = [&self.primary, &self.secondary]
            .into_iter()
            .flatten()
            .any(Candidate::has_rotation);
        match (&self.primary, &self.pending_rotation) {
            _ if rotating => SnapPhase::SnappedRotation,
            (None, Some(_)) => SnapPhase::RecoveringRotation,
            (Some(_), _) => SnapPhase::SnappedTranslation,
            (None, None) => SnapPhase::Idle,
        }
    }

    /// Pure frame transition
    pub fn advance(self, input: &FrameInput<'_>) -> (SnapState, Option<Transform>) {
        let FrameInput {
            candidates,
            masters,
            targets,
            strategy,
            resolver,
            ..
        } = *input;

        let primary = resolver.pick_primary(self.primary.as_ref(), candidates, strategy, masters, targets);
        let secondary = resolver.pick_secondary(
            primary.as_ref(),
            self.secondary.as_ref(),
            candidates,
            strategy,
            masters,
            targets,
        );
        let transform = resolver.merge(primary.as_ref(), secondary.as_ref());
        let mut pending = self.pending_rotation;

        match transform {
            Some(t) if t.rotation.is_some() => {
                let reference = [&primary, &secondary]
                    .into_iter()
                    .flatten()
                    .find(|c| c.has_rotation())
                    .and_then(|c| c.reference_loop.clone());
                if let Some(reference_loop) = reference {
                    let original_rotation = pending
                        .as_ref()
                        .map_or(input.current_rotation, |p| p.original_rotation);
                    pending = Some(PendingRotation {
                        original_rotation,
                        reference_loop,
                    });
                }
            }
            Some(_) => {}
            None => {
                if let Some(p) = pending.take() {
                    match recover(&p, input) {
                        Recovery::Hold => pending = Some(p),
                        Recovery::Rotate(t) => {
                            let state = SnapState {
                                primary,
                                secondary,
                                pending_rotation: None,
                            };
                            return (state, Some(t));
                        }
                        Recovery::Abandon => {}
                    }
                }
            }
        }

        let state = SnapState {
            primary,
            secondary,
            pending_rotation: pending,
        };
        (state, transform)
    }
}

fn recover(pending: &PendingRotation, input: &FrameInput<'_>) -> Recovery {
    let Some(outline) = input.outline else {
        return Recovery::Abandon;
    };
    if loop_to_loop(outline, &pending.reference_loop, DIST_EPS) != LoopPosition::Out {
        return Recovery::Hold;
    }

    let lines: SmallVec<[&Line2d; 8]> = pending
        .reference_loop
        .curves()
        .iter()
        .filter_map(Curve2d::as_line)
        .collect();
    let mut nearest: Vec<NearestLine> = outline
        .points()
        .into_iter()
        .filter_map(|vertex| {
            lines
                .iter()
                .filter(|l| l.contains_param(l.param_at(&vertex), DIST_EPS))
                .map(|l| NearestLine {
                    distance: l.distance_to_line(&vertex),
                    vertex,
                    line: **l,
                })
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
        })
        .collect();
    nearest.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let intensity = input.strategy.intensity();
    let first = match nearest.first() {
        Some(n) if n.distance <= intensity => n,
        _ => {
            tracing::debug!(
                candidates = nearest.len(),
                "Rotation recovery abandoned: no reference line within snap distance"
            );
            return Recovery::Abandon;
        }
    };

    let delta = pending.original_rotation - input.current_rotation;
    let pivot = match nearest.get(1) {
        Some(second) => {
            let test = Line2d::new(first.vertex, second.vertex);
            if test.is_degenerate() {
                first.vertex
            } else {
                let turned = Curve2d::Line(test.rotated((-delta).to_radians(), &first.vertex));
                match curve_to_curve(&turned, &Curve2d::Line(first.line), DIST_EPS) {
                    CurvePosition::NotIntersect => first.vertex,
                    _ => second.vertex,
                }
            }
        }
        None => first.vertex,
    };

    tracing::debug!(
        delta,
        pivot_x = pivot.x,
        pivot_y = pivot.y,
        "Rotation recovered"
    );
    Recovery::Rotate(Transform::rotation_only(RotationDelta {
        angle_deg: delta,
        center: pivot,
    }))
}

/// Snap driver for one gesture on one element
pub struct SnapSession<V: SubLineVisualizer = NoopVisualizer> {
    element: EntityKey,
    strategy: SnapStrategy,
    resolver: ConstraintResolver,
    options: ExtractOptions,
    state: SnapState,
    visualizer: V,
}

impl SnapSession<NoopVisualizer> {
    pub fn new(element: EntityKey, config: &SnapConfig) -> Self {
        Self::with_visualizer(element, config, NoopVisualizer)
    }
}

impl<V: SubLineVisualizer> SnapSession<V> {
    pub fn with_visualizer(element: EntityKey, config: &SnapConfig, visualizer: V) -> Self {
        Self {
            element,
            strategy: SnapStrategy::new(config),
            resolver: ConstraintResolver::default(),
            options: ExtractOptions {
                include_room_curves: config.include_room_curves,
            },
            state: SnapState::default(),
            visualizer,
        }
    }

    pub fn element(&self) -> EntityKey {
        self.element
    }

    pub fn state(&self) -> &SnapState {
        &self.state
    }

    pub fn phase(&self) -> SnapPhase {
        self.state.phase()
    }

    pub fn strategy(&self) -> &SnapStrategy {
        &self.strategy
    }

    pub fn visualizer(&self) -> &V {
        &self.visualizer
    }

    pub fn into_visualizer(self) -> V {
        self.visualizer
    }

    /// Correction for the element's current pose, or `None` when nothing
    /// snaps. Scene lookups that fail count as "nothing snaps".
    pub fn do_snap(&mut self, scene: &Scene) -> Option<Transform> {
        match self.try_snap(scene) {
            Ok(transform) => transform,
            Err(e) => {
                tracing::debug!(element = ?self.element, error = %e, "Snap skipped");
                self.visualizer.hide();
                None
            }
        }
    }

    fn try_snap(&mut self, scene: &Scene) -> Result<Option<Transform>> {
        let entities = PositionEntities::collect(scene, self.element)?;
        let targets = extract(scene, &entities, self.options);
        let masters = extract_entity(scene, self.element)?;
        let current_rotation = scene.rotation(self.element)?;

        let mut candidates = self.strategy.execute(&masters, &targets);
        exclude_for_element(self.element, &mut candidates);

        let input = FrameInput {
            candidates: &candidates,
            masters: &masters,
            targets: &targets,
            current_rotation,
            outline: masters.outline(self.element),
            strategy: &self.strategy,
            resolver: &self.resolver,
        };
        let (state, transform) = std::mem::take(&mut self.state).advance(&input);
        self.state = state;

        match (&transform, &self.state.primary) {
            (Some(t), Some(primary)) => self.visualizer.show(primary, self.state.secondary.as_ref(), t),
            _ => self.visualizer.hide(),
        }
        Ok(transform)
    }

    pub fn hide_auxiliaries(&mut self) {
        self.visualizer.hide();
    }

    /// Back to `Idle` for a new gesture
    pub fn reset(&mut self) {
        self.state = SnapState::default();
        self.visualizer.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{Anchor, AnchorGeometry, AnchorId, AnchorRole};
    use crate::candidate::SnapType;
    use approx::assert_relative_eq;
    use floorsnap_model::{StructureKey, WallKey};
    use nalgebra::Vector2;

    fn square(cx: f64, cy: f64, size: f64) -> Loop {
        Loop::rectangle(Point2::new(cx, cy), size, size, 0.0).unwrap()
    }

    /// Wall footprint along y = 0, 0.2 thick, from x = -5 to 5
    fn wall_loop() -> Loop {
        Loop::rectangle(Point2::new(0.0, -0.1), 10.0, 0.2, 0.0).unwrap()
    }

    fn rotating_candidate(angle_deg: f64) -> Candidate {
        let m = Anchor::new(
            AnchorId::new(EntityKey::Structure(StructureKey::default()), AnchorRole::CornerPoint, 0),
            AnchorGeometry::Point(Point2::new(0.0, 0.01)),
        );
        let c = Anchor::new(
            AnchorId::new(EntityKey::Wall(WallKey::default()), AnchorRole::LineEdge, 0),
            AnchorGeometry::Line(Line2d::new(Point2::new(-5.0, 0.0), Point2::new(5.0, 0.0))),
        );
        Candidate::translation(SnapType::CollineRotation, m, c, Vector2::new(0.0, -0.01)).with_rotation(
            RotationDelta {
                angle_deg,
                center: Point2::origin(),
            },
            wall_loop(),
        )
    }

    struct Frame {
        strategy: SnapStrategy,
        resolver: ConstraintResolver,
        empty: AnchorSet,
    }

    impl Frame {
        fn new() -> Self {
            Self {
                strategy: SnapStrategy::new(&SnapConfig::default().with_intensity(0.05)),
                resolver: ConstraintResolver::default(),
                empty: AnchorSet::new(),
            }
        }

        fn input<'a>(&'a self, candidates: &'a [Candidate], rotation: f64, outline: &'a Loop) -> FrameInput<'a> {
            FrameInput {
                candidates,
                masters: &self.empty,
                targets: &self.empty,
                current_rotation: rotation,
                outline: Some(outline),
                strategy: &self.strategy,
                resolver: &self.resolver,
            }
        }
    }

    fn pending_state(original_rotation: f64) -> SnapState {
        SnapState {
            pending_rotation: Some(PendingRotation {
                original_rotation,
                reference_loop: wall_loop(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn idle_without_candidates() {
        let frame = Frame::new();
        let outline = square(0.0, 2.0, 1.0);
        let (state, t) = SnapState::default().advance(&frame.input(&[], 0.0, &outline));
        assert!(t.is_none());
        assert_eq!(state.phase(), SnapPhase::Idle);
    }

    #[test]
    fn rotation_snap_records_original_rotation() {
        let frame = Frame::new();
        let outline = square(0.0, 0.5, 1.0);
        let candidates = [rotating_candidate(-10.0)];

        let (state, t) = SnapState::default().advance(&frame.input(&candidates, 10.0, &outline));
        let t = t.unwrap();
        assert_relative_eq!(t.rotation.unwrap().angle_deg, -10.0);
        assert_eq!(state.phase(), SnapPhase::SnappedRotation);
        assert_relative_eq!(state.pending_rotation.as_ref().unwrap().original_rotation, 10.0);

        // a second rotating frame keeps the first original rotation
        let (state, _) = state.advance(&frame.input(&candidates, 0.0, &outline));
        assert_relative_eq!(state.pending_rotation.as_ref().unwrap().original_rotation, 10.0);
    }

    #[test]
    fn pending_held_while_touching_reference() {
        let frame = Frame::new();
        // sits on the wall face
        let outline = square(0.0, 0.5, 1.0);
        let (state, t) = pending_state(10.0).advance(&frame.input(&[], 0.0, &outline));
        assert!(t.is_none());
        assert!(state.pending_rotation.is_some());
        assert_eq!(state.phase(), SnapPhase::RecoveringRotation);
    }

    #[test]
    fn recovery_turns_back_about_nearest_vertex() {
        let frame = Frame::new();
        // 0.03 above the wall face, inside snap distance
        let outline = square(0.0, 0.53, 1.0);
        let (state, t) = pending_state(10.0).advance(&frame.input(&[], 0.0, &outline));
        let rotation = t.unwrap().rotation.unwrap();
        assert_relative_eq!(rotation.angle_deg, 10.0);
        assert_relative_eq!(rotation.center.y, 0.03, epsilon = 1e-12);
        assert!(state.pending_rotation.is_none());
        assert_eq!(state.phase(), SnapPhase::Idle);
    }

    #[test]
    fn recovery_abandoned_beyond_snap_distance() {
        let frame = Frame::new();
        let outline = square(0.0, 1.0, 1.0);
        let (state, t) = pending_state(10.0).advance(&frame.input(&[], 0.0, &outline));
        assert!(t.is_none());
        assert!(state.pending_rotation.is_none());
    }

    #[test]
    fn single_vertex_is_the_pivot() {
        let frame = Frame::new();
        // triangle with one vertex over the wall, the others past its ends
        let outline = Loop::from_points(&[
            Point2::new(4.5, 0.02),
            Point2::new(6.0, 1.0),
            Point2::new(7.0, 0.5),
        ])
        .unwrap();
        let (_, t) = pending_state(-5.0).advance(&frame.input(&[], 0.0, &outline));
        let rotation = t.unwrap().rotation.unwrap();
        assert_relative_eq!(rotation.angle_deg, -5.0);
        assert_relative_eq!(rotation.center, Point2::new(4.5, 0.02), epsilon = 1e-12);
    }
}
