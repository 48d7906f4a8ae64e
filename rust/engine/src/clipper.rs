// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beam clipping against room regions.
//!
//! A beam is stretched along its centerline until it meets the walls of
//! the room it is dragged in, stopping short of other beams in that room.
//! Room regions (the areas enclosed by full-height walls and wall-embedded
//! structures) are cached per room; call [`BeamClipper::clear_cache`] after
//! walls, embedded structures or other beams change.

use floorsnap_geometry::{
    clip_line, enclosed_regions, loop_to_loop, merge_collinear, subtract_contours, Error as GeometryError,
    Line2d, LoopPosition, Polygon,
};
use floorsnap_model::{BeamKey, RoomKey, Scene, BOUNDARY_TOL};
use nalgebra::{Point2, Vector2};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::hash_map::Entry;

use crate::config::ClipConfig;
use crate::error::Result;

/// Side of the centerline a rail runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailSide {
    Left,
    Right,
}

/// Rail sub-segment, oriented with the centerline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailPiece {
    pub side: RailSide,
    pub line: Line2d,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeamClipResult {
    pub room: RoomKey,
    /// Centerline parameter of the clipped start
    pub start_param: f64,
    pub end_param: f64,
    /// New beam midpoint
    pub position: Point2<f64>,
    pub length: f64,
    /// `length` over the beam's unscaled length
    pub length_scale: f64,
}

#[derive(Debug, Clone, Default)]
pub struct BeamClipper {
    config: ClipConfig,
    cache: FxHashMap<RoomKey, Vec<Polygon>>,
}

impl BeamClipper {
    pub fn new(config: ClipConfig) -> Self {
        Self {
            config,
            cache: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &ClipConfig {
        &self.config
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of rooms with cached regions
    pub fn cached_rooms(&self) -> usize {
        self.cache.len()
    }

    /// Clip `beam` at `drag_param` and apply the result to the scene.
    /// Returns `None` and leaves the beam untouched when no room yields a
    /// valid span.
    pub fn clip_beam(&mut self, scene: &mut Scene, beam: BeamKey, drag_param: f64) -> Option<BeamClipResult> {
        let applied = self.compute(scene, beam, drag_param).and_then(|result| {
            if let Some(r) = &result {
                scene.set_position(beam.into(), r.position)?;
                scene.set_length_scale(beam, r.length_scale)?;
            }
            Ok(result)
        });
        match applied {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(beam = ?beam, error = %e, "Beam clip skipped");
                None
            }
        }
    }

    /// Clip without touching the scene. The shortest span over all rooms
    /// the beam passes through wins.
    pub fn compute(&mut self, scene: &Scene, beam: BeamKey, drag_param: f64) -> Result<Option<BeamClipResult>> {
        let data = scene.beam(beam)?;
        let centerline = data.centerline();
        let (width, base_length) = (data.width, data.length);

        let mut best: Option<BeamClipResult> = None;
        for room in scene.rooms_spanned_by(beam)? {
            let polygons = self.room_polygons(scene, room)?;
            let cutters: Vec<Vec<Point2<f64>>> = scene
                .beams_in_room(room)?
                .into_iter()
                .filter(|k| *k != beam)
                .filter_map(|k| scene.beam(k).ok()?.profile().ok())
                .map(|profile| profile.to_contour())
                .collect();
            let region = subtract_contours(&polygons, &cutters);

            let Some((start, end)) = self.clip_span(&centerline, width, &region, drag_param) else {
                tracing::trace!(room = ?room, "No beam span in room");
                continue;
            };
            let length = end - start;
            if best.as_ref().map_or(true, |b| length < b.length) {
                best = Some(BeamClipResult {
                    room,
                    start_param: start,
                    end_param: end,
                    position: centerline.point_at((start + end) * 0.5),
                    length,
                    length_scale: length / base_length,
                });
            }
        }

        if let Some(r) = &best {
            tracing::debug!(room = ?r.room, length = r.length, "Beam clipped");
        }
        Ok(best)
    }

    fn room_polygons(&mut self, scene: &Scene, room: RoomKey) -> Result<Vec<Polygon>> {
        match self.cache.entry(room) {
            Entry::Occupied(e) => Ok(e.get().clone()),
            Entry::Vacant(e) => {
                let polygons = build_room_polygons(scene, room)?;
                tracing::trace!(room = ?room, regions = polygons.len(), "Cached room regions");
                Ok(e.insert(polygons).clone())
            }
        }
    }

    /// `[start, end]` on the centerline for the rails through `region`.
    ///
    /// A side whose rails touch no straight boundary edge keeps the beam's
    /// current end there: 0 for the start, the centerline length for the
    /// end. The span must still contain `drag_param`, otherwise there is no
    /// result.
    fn clip_span(&self, centerline: &Line2d, width: f64, region: &[Polygon], drag_param: f64) -> Option<(f64, f64)> {
        let tol = self.config.boolean_tolerance;
        let dir = centerline.direction();
        let half = width * 0.5;

        let pick = |side: RailSide, rail: Line2d| -> Option<RailPiece> {
            let extended = rail.extended_double(self.config.rail_extension);
            merge_collinear(&clip_line(&extended, region, tol), tol)
                .into_iter()
                .map(|line| RailPiece {
                    side,
                    line: oriented(line, &dir),
                })
                .find(|piece| {
                    let t0 = centerline.param_at(&piece.line.start);
                    let t1 = centerline.param_at(&piece.line.end);
                    t0 - tol <= drag_param && drag_param <= t1 + tol
                })
        };
        let left = pick(RailSide::Left, centerline.offset(half));
        let right = pick(RailSide::Right, centerline.offset(-half));
        if left.is_none() && right.is_none() {
            return None;
        }

        let edges: Vec<Line2d> = region
            .iter()
            .flat_map(|p| p.all_curves())
            .filter_map(|c| c.as_line().copied())
            .collect();
        let touching = |p: Point2<f64>| -> SmallVec<[usize; 4]> {
            edges
                .iter()
                .enumerate()
                .filter(|(_, e)| e.contains_point(&p, BOUNDARY_TOL))
                .map(|(i, _)| i)
                .collect()
        };
        let related = |a: &[usize], b: &[usize]| {
            a.iter().any(|i| b.contains(i))
                || a.iter()
                    .any(|&i| b.iter().any(|&j| edges[i].is_collinear_with(&edges[j], BOUNDARY_TOL)))
        };

        let ends = |take_end: bool| {
            let contact = |piece: Option<RailPiece>| {
                piece.map(|p| {
                    let pt = if take_end { p.line.end } else { p.line.start };
                    (centerline.param_at(&pt), touching(pt))
                })
            };
            (contact(left), contact(right))
        };

        let start = match ends(false) {
            (Some((tl, el)), Some((tr, er))) if !el.is_empty() && !er.is_empty() => {
                if related(el.as_slice(), er.as_slice()) {
                    tl.min(tr)
                } else {
                    tl.max(tr)
                }
            }
            (Some((t, e)), _) | (_, Some((t, e))) if !e.is_empty() => t,
            _ => 0.0,
        };
        let end = match ends(true) {
            (Some((tl, el)), Some((tr, er))) if !el.is_empty() && !er.is_empty() => {
                if related(el.as_slice(), er.as_slice()) {
                    tl.max(tr)
                } else {
                    tl.min(tr)
                }
            }
            (Some((t, e)), _) | (_, Some((t, e))) if !e.is_empty() => t,
            _ => centerline.length(),
        };

        let holds_drag = start - tol <= drag_param && drag_param <= end + tol;
        (end - start > tol && holds_drag).then_some((start, end))
    }
}

fn oriented(line: Line2d, dir: &Vector2<f64>) -> Line2d {
    if line.direction().dot(dir) < 0.0 {
        line.reversed()
    } else {
        line
    }
}

/// Enclosed regions of full-height wall and embedded structure footprints
/// that lie in `room`
fn build_room_polygons(scene: &Scene, room: RoomKey) -> Result<Vec<Polygon>> {
    let boundary = &scene.room(room)?.boundary;

    let mut footprints: Vec<Vec<Point2<f64>>> = scene
        .walls()
        .filter(|(_, w)| !w.height_editable)
        .filter_map(|(_, w)| w.footprint().ok())
        .map(|l| l.to_contour())
        .collect();
    footprints.extend(
        scene
            .structures()
            .filter(|(_, s)| s.wall_part)
            .filter_map(|(_, s)| s.profile().ok())
            .map(|l| l.to_contour()),
    );

    let regions = match enclosed_regions(&footprints) {
        Ok(regions) => regions,
        Err(GeometryError::EmptyBoolean(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    Ok(regions
        .into_iter()
        .filter(|r| {
            matches!(
                loop_to_loop(&r.outer, boundary, BOUNDARY_TOL),
                LoopPosition::In | LoopPosition::Contains | LoopPosition::Intersect
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorsnap_geometry::Loop;
    use floorsnap_model::{Beam, Room, Wall};

    /// Walls whose inner faces bound [0, w] x [0, h], plus the room there
    fn walled_room(scene: &mut Scene, w: f64, h: f64) -> RoomKey {
        let pts = [
            Point2::new(-0.1, -0.1),
            Point2::new(w + 0.1, -0.1),
            Point2::new(w + 0.1, h + 0.1),
            Point2::new(-0.1, h + 0.1),
        ];
        for i in 0..4 {
            scene.add_wall(Wall::line(pts[i], pts[(i + 1) % 4], 0.2)).unwrap();
        }
        let boundary = Loop::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
        ])
        .unwrap();
        scene.add_room(Room::new(boundary))
    }

    #[test]
    fn beam_stretches_to_walls() {
        let mut scene = Scene::new();
        let room = walled_room(&mut scene, 4.0, 4.0);
        let beam = scene
            .add_beam(Beam::from_centerline(Point2::new(1.0, 2.0), Point2::new(3.0, 2.0), 0.2))
            .unwrap();

        let mut clipper = BeamClipper::default();
        let r = clipper.clip_beam(&mut scene, beam, 1.0).unwrap();
        assert_eq!(r.room, room);
        assert_relative_eq!(r.start_param, -1.0, epsilon = 1e-6);
        assert_relative_eq!(r.end_param, 3.0, epsilon = 1e-6);
        assert_relative_eq!(r.length, 4.0, epsilon = 1e-6);
        assert_relative_eq!(r.length_scale, 2.0, epsilon = 1e-6);
        assert_relative_eq!(r.position, Point2::new(2.0, 2.0), epsilon = 1e-6);

        let b = scene.beam(beam).unwrap();
        assert_relative_eq!(b.effective_length(), 4.0, epsilon = 1e-6);
        assert_eq!(clipper.cached_rooms(), 1);
    }

    #[test]
    fn other_beams_cut_the_span() {
        let mut scene = Scene::new();
        walled_room(&mut scene, 4.0, 4.0);
        scene
            .add_beam(Beam::from_centerline(Point2::new(3.0, 0.0), Point2::new(3.0, 4.0), 0.2))
            .unwrap();
        let beam = scene
            .add_beam(Beam::from_centerline(Point2::new(1.0, 2.0), Point2::new(2.0, 2.0), 0.2))
            .unwrap();

        let mut clipper = BeamClipper::default();
        let r = clipper.compute(&scene, beam, 0.5).unwrap().unwrap();
        assert_relative_eq!(r.start_param, -1.0, epsilon = 1e-6);
        assert_relative_eq!(r.end_param, 1.9, epsilon = 1e-6);
        assert_relative_eq!(r.length, 2.9, epsilon = 1e-6);
    }

    #[test]
    fn beam_outside_rooms_is_untouched() {
        let mut scene = Scene::new();
        walled_room(&mut scene, 4.0, 4.0);
        let beam = scene
            .add_beam(Beam::from_centerline(Point2::new(10.0, 2.0), Point2::new(12.0, 2.0), 0.2))
            .unwrap();
        let before = scene.beam(beam).unwrap().clone();

        let mut clipper = BeamClipper::default();
        assert!(clipper.clip_beam(&mut scene, beam, 1.0).is_none());
        assert_eq!(scene.beam(beam).unwrap(), &before);
    }

    #[test]
    fn drag_outside_every_piece() {
        let mut scene = Scene::new();
        walled_room(&mut scene, 4.0, 4.0);
        let beam = scene
            .add_beam(Beam::from_centerline(Point2::new(1.0, 2.0), Point2::new(3.0, 2.0), 0.2))
            .unwrap();

        let mut clipper = BeamClipper::default();
        // 10 units past the start lies beyond the right wall
        assert!(clipper.compute(&scene, beam, 10.0).unwrap().is_none());
    }

    #[test]
    fn curved_boundary_keeps_current_ends() {
        use floorsnap_geometry::Circle2d;

        // a round region has no straight edge for the rails to stop on
        let disk = Loop::new(vec![Circle2d::new(Point2::origin(), 2.0).into()]).unwrap();
        let region = [Polygon::from_loop(disk)];
        let centerline = Line2d::new(Point2::new(-0.5, 0.0), Point2::new(0.5, 0.0));
        let clipper = BeamClipper::default();

        assert_eq!(clipper.clip_span(&centerline, 0.2, &region, 0.5), Some((0.0, 1.0)));
        // pointer inside the region but beyond the kept end
        assert!(clipper.clip_span(&centerline, 0.2, &region, 1.8).is_none());
    }
}
