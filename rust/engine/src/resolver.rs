// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constraint resolution: primary and secondary selection, merging.
//!
//! Candidates are ranked by [`SnapType`] alone. Selection is sticky: a
//! previous pick is re-evaluated against the wider break tolerance before
//! anything new is considered, so the element does not flicker between
//! targets while the pointer jitters.

use floorsnap_geometry::curve::cross;
use floorsnap_geometry::tolerance::{EDGE_LENGTH_EPS, OFFSET_EPS, PARALLEL_CROSS_EPS, ZERO_EPS};

use crate::anchor::AnchorSet;
use crate::candidate::{Candidate, SnapType, Transform};
use crate::strategy::{BreakMode, SnapStrategy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintResolver {
    /// Magnitude below which an offset component counts as unset
    pub offset_eps: f64,
    /// Primary components at or below this are filled from the secondary
    pub zero_eps: f64,
    /// Two set components further apart than this conflict
    pub conflict_eps: f64,
    /// Cross product of unit directions below this is parallel
    pub parallel_cross_eps: f64,
}

impl Default for ConstraintResolver {
    fn default() -> Self {
        Self {
            offset_eps: OFFSET_EPS,
            zero_eps: ZERO_EPS,
            conflict_eps: EDGE_LENGTH_EPS,
            parallel_cross_eps: PARALLEL_CROSS_EPS,
        }
    }
}

/// Stable sort by priority; equal types keep generation order
fn by_priority(candidates: impl IntoIterator<Item = Candidate>) -> Vec<Candidate> {
    let mut sorted: Vec<Candidate> = candidates.into_iter().collect();
    sorted.sort_by_key(|c| c.snap_type);
    sorted
}

/// Re-run the pair behind `previous` against current anchors. The client
/// falls back to the stored anchor when its owner left the neighborhood.
fn reevaluate(
    previous: &Candidate,
    strategy: &SnapStrategy,
    masters: &AnchorSet,
    targets: &AnchorSet,
    mode: BreakMode,
) -> Option<Candidate> {
    if previous.has_rotation() {
        return None;
    }
    let master = masters.find(&previous.id.master)?;
    let client = targets.find(&previous.id.client).unwrap_or(&previous.client);
    strategy.execute_pair(master, client, masters, targets, mode)
}

impl ConstraintResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose this frame's primary candidate
    pub fn pick_primary(
        &self,
        previous: Option<&Candidate>,
        candidates: &[Candidate],
        strategy: &SnapStrategy,
        masters: &AnchorSet,
        targets: &AnchorSet,
    ) -> Option<Candidate> {
        if let Some(prev) = previous {
            if let Some(kept) = reevaluate(prev, strategy, masters, targets, BreakMode::First) {
                tracing::debug!(id = %kept.id, snap_type = ?kept.snap_type, "Primary held");
                return Some(kept);
            }
        }

        let sorted = by_priority(candidates.iter().cloned());
        let best = sorted.first()?.snap_type;
        let same_as_previous = previous.and_then(|prev| {
            sorted
                .iter()
                .take_while(|c| c.snap_type == best)
                .find(|c| c.id == prev.id)
        });
        let primary = same_as_previous.or_else(|| sorted.first()).cloned();
        if let Some(p) = &primary {
            tracing::debug!(id = %p.id, snap_type = ?p.snap_type, "Primary picked");
        }
        primary
    }

    /// Choose a secondary compatible with `primary`
    pub fn pick_secondary(
        &self,
        primary: Option<&Candidate>,
        previous: Option<&Candidate>,
        candidates: &[Candidate],
        strategy: &SnapStrategy,
        masters: &AnchorSet,
        targets: &AnchorSet,
    ) -> Option<Candidate> {
        let primary = primary?;
        if candidates.is_empty() {
            return None;
        }

        if let Some(prev) = previous {
            if let Some(kept) = reevaluate(prev, strategy, masters, targets, BreakMode::Second) {
                let repeats_primary = primary.snap_type.is_contact()
                    && kept.snap_type.is_contact()
                    && primary.same_offset(&kept);
                if !repeats_primary && self.is_unique(primary, &kept) {
                    tracing::debug!(id = %kept.id, snap_type = ?kept.snap_type, "Secondary held");
                    return Some(kept);
                }
            }
        }

        let rest = by_priority(
            candidates
                .iter()
                .filter(|c| c.id != primary.id && !primary.same_offset(c))
                .cloned(),
        );
        let secondary = self.related(primary, &rest).cloned();
        if let Some(s) = &secondary {
            tracing::debug!(id = %s.id, snap_type = ?s.snap_type, "Secondary picked");
        }
        secondary
    }

    /// First compatible candidate. Under a collinear primary, candidates
    /// crossing its direction come first; a parallel collinear candidate is
    /// only the fallback.
    fn related<'a>(&self, primary: &Candidate, sorted: &'a [Candidate]) -> Option<&'a Candidate> {
        let primary_dir = match (primary.snap_type, primary.master.as_line()) {
            (SnapType::Colline, Some(line)) => line.direction(),
            _ => return sorted.iter().find(|c| self.is_unique(primary, c)),
        };
        let cross_with = |c: &Candidate| c.master.as_line().map(|l| cross(&primary_dir, &l.direction()).abs());

        sorted
            .iter()
            .filter(|c| self.is_unique(primary, c))
            .find(|c| cross_with(c).map_or(true, |x| x > self.parallel_cross_eps))
            .or_else(|| {
                sorted.iter().find(|c| {
                    c.snap_type == SnapType::Colline
                        && self.is_unique(primary, c)
                        && cross_with(c).is_some_and(|x| x < self.parallel_cross_eps)
                })
            })
    }

    /// False when both candidates set the same component to values further
    /// apart than `conflict_eps`
    pub fn is_unique(&self, a: &Candidate, b: &Candidate) -> bool {
        let conflicts = |x: f64, y: f64| {
            x.abs() > self.offset_eps && y.abs() > self.offset_eps && (x - y).abs() > self.conflict_eps
        };
        !(conflicts(a.dx, b.dx) || conflicts(a.dy, b.dy) || conflicts(a.drotation(), b.drotation()))
    }

    /// Fill the primary's unset components from the secondary. Nothing is
    /// emitted without a primary.
    pub fn merge(&self, primary: Option<&Candidate>, secondary: Option<&Candidate>) -> Option<Transform> {
        let mut transform = Transform::from(primary?);
        if let Some(s) = secondary {
            if transform.dx.abs() <= self.zero_eps {
                transform.dx = s.dx;
            }
            if transform.dy.abs() <= self.zero_eps {
                transform.dy = s.dy;
            }
            if transform.rotation.is_none() {
                transform.rotation = s.rotation;
            }
        }
        Some(transform)
    }
}
