// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry extraction: plan entities to typed anchors.
//!
//! Extraction is a pure function of the scene and the entity list. Anchor
//! ids are `(owner, role, index)` with indices assigned in a fixed order per
//! entity kind, so the same source curve keeps its id across frames.

use floorsnap_geometry::{Curve2d, Line2d, Loop};
use floorsnap_model::{Beam, EntityKey, Hole, Room, Scene, Structure, Wall};
use nalgebra::Point2;

use crate::anchor::{Anchor, AnchorGeometry, AnchorId, AnchorRole, AnchorSet};
use crate::error::Result;
use crate::neighborhood::PositionEntities;

/// Index offset for room split curves, keeping them apart from boundary curves
const SPLIT_CURVE_BASE: u32 = 1 << 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub include_room_curves: bool,
}

/// Anchors of every entity in the neighborhood. Entities missing from the
/// scene are skipped.
pub fn extract(scene: &Scene, entities: &PositionEntities, options: ExtractOptions) -> AnchorSet {
    let mut set = AnchorSet::new();

    for &key in &entities.walls {
        if let Ok(wall) = scene.wall(key) {
            wall_anchors(&mut set, key.into(), wall);
        }
    }
    for &key in &entities.structures {
        if let Ok(structure) = scene.structure(key) {
            structure_anchors(&mut set, key.into(), structure);
        }
    }
    for &key in &entities.beams {
        if let Ok(beam) = scene.beam(key) {
            beam_anchors(&mut set, key.into(), beam);
        }
    }
    for &key in &entities.holes {
        if let Ok(hole) = scene.hole(key) {
            hole_anchors(&mut set, key.into(), hole);
        }
    }
    if let Some(key) = entities.room {
        if let Ok(room) = scene.room(key) {
            room_anchors(&mut set, key.into(), room, options);
        }
    }

    tracing::trace!(anchors = set.len(), "Extracted neighborhood anchors");
    set
}

/// Anchors of a single entity, typically the dragged element
pub fn extract_entity(scene: &Scene, key: EntityKey) -> Result<AnchorSet> {
    let mut set = AnchorSet::new();
    match key {
        EntityKey::Wall(k) => wall_anchors(&mut set, key, scene.wall(k)?),
        EntityKey::Structure(k) => structure_anchors(&mut set, key, scene.structure(k)?),
        EntityKey::Beam(k) => beam_anchors(&mut set, key, scene.beam(k)?),
        EntityKey::Hole(k) => hole_anchors(&mut set, key, scene.hole(k)?),
        EntityKey::Room(k) => room_anchors(
            &mut set,
            key,
            scene.room(k)?,
            ExtractOptions {
                include_room_curves: true,
            },
        ),
    }
    Ok(set)
}

fn push_point(set: &mut AnchorSet, owner: EntityKey, role: AnchorRole, index: u32, p: Point2<f64>) {
    set.push(Anchor::new(
        AnchorId::new(owner, role, index),
        AnchorGeometry::Point(p),
    ));
}

fn push_curve(set: &mut AnchorSet, owner: EntityKey, role: AnchorRole, index: u32, curve: Curve2d) {
    if curve.is_degenerate() {
        return;
    }
    set.push(Anchor::new(AnchorId::new(owner, role, index), curve.into()));
}

fn push_line(set: &mut AnchorSet, owner: EntityKey, role: AnchorRole, index: u32, line: Line2d) {
    push_curve(set, owner, role, index, Curve2d::Line(line));
}

/// Corners, center and edges of a closed outline; the outline is recorded
fn outline_anchors(set: &mut AnchorSet, owner: EntityKey, outline: Loop, center: Point2<f64>) {
    push_point(set, owner, AnchorRole::CenterPoint, 0, center);
    let has_corners = outline
        .curves()
        .iter()
        .all(|c| !matches!(c, Curve2d::Circle(_)));
    if has_corners {
        for (i, p) in outline.points().into_iter().enumerate() {
            push_point(set, owner, AnchorRole::CornerPoint, i as u32, p);
        }
    }
    for (i, curve) in outline.curves().iter().enumerate() {
        push_curve(set, owner, AnchorRole::edge_for(curve), i as u32, *curve);
    }
    set.set_outline(owner, outline);
}

fn wall_anchors(set: &mut AnchorSet, owner: EntityKey, wall: &Wall) {
    for (i, p) in wall.corners().into_iter().enumerate() {
        push_point(set, owner, AnchorRole::CornerPoint, i as u32, p);
    }
    push_point(set, owner, AnchorRole::CenterPoint, 0, wall.mid_pt());
    for (i, face) in wall.side_faces().into_iter().enumerate() {
        push_curve(set, owner, AnchorRole::edge_for(&face), i as u32, face);
    }
    push_curve(set, owner, AnchorRole::CenterLine, 0, wall.curve);
    push_line(set, owner, AnchorRole::CenterLine, 1, wall.cross_line());
    if let Ok(footprint) = wall.footprint() {
        set.set_outline(owner, footprint);
    }
}

fn structure_anchors(set: &mut AnchorSet, owner: EntityKey, structure: &Structure) {
    if let Ok(profile) = structure.profile() {
        outline_anchors(set, owner, profile, structure.position);
    }
    push_line(set, owner, AnchorRole::CenterLine, 0, structure.position_curve());
    push_line(set, owner, AnchorRole::CenterLine, 1, structure.cross_line());
}

fn beam_anchors(set: &mut AnchorSet, owner: EntityKey, beam: &Beam) {
    if let Ok(profile) = beam.profile() {
        outline_anchors(set, owner, profile, beam.position);
    }
    push_line(set, owner, AnchorRole::CenterLine, 0, beam.centerline());
    push_line(set, owner, AnchorRole::CenterLine, 1, beam.cross_line());
}

fn hole_anchors(set: &mut AnchorSet, owner: EntityKey, hole: &Hole) {
    if let Ok(profile) = hole.front_profile() {
        let centroid = profile.centroid();
        outline_anchors(set, owner, profile, centroid);
    }
}

fn room_anchors(set: &mut AnchorSet, owner: EntityKey, room: &Room, options: ExtractOptions) {
    if options.include_room_curves {
        for (i, curve) in room.boundary.curves().iter().enumerate() {
            push_curve(set, owner, AnchorRole::edge_for(curve), i as u32, *curve);
        }
    }
    for (i, curve) in room.split_curves.iter().enumerate() {
        push_curve(
            set,
            owner,
            AnchorRole::edge_for(curve),
            SPLIT_CURVE_BASE + i as u32,
            *curve,
        );
    }
}
