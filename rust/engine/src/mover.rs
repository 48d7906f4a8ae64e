// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-gesture move driver.
//!
//! ```no_run
//! use floorsnap_engine::{BeamClipper, ElementMove, NoopVisualizer, SnapConfig};
//! use floorsnap_model::{Beam, Scene};
//! use nalgebra::{Point2, Vector2};
//!
//! let mut scene = Scene::new();
//! let beam = scene
//!     .add_beam(Beam::from_centerline(Point2::new(1.0, 2.0), Point2::new(3.0, 2.0), 0.2))
//!     .unwrap();
//! let mut clipper = BeamClipper::default();
//!
//! let mut gesture = ElementMove::begin(
//!     &scene,
//!     beam.into(),
//!     Point2::new(2.0, 2.0),
//!     &SnapConfig::default(),
//!     Some(&mut clipper),
//!     NoopVisualizer,
//! )
//! .unwrap();
//! let frame = gesture.update(&mut scene, Vector2::new(0.0, 0.5)).unwrap();
//! println!("snapped: {:?}, clipped: {:?}", frame.transform, frame.clip);
//! gesture.finish();
//! ```

use floorsnap_model::{EntityKey, Scene};
use nalgebra::{Point2, Vector2};

use crate::candidate::Transform;
use crate::clipper::{BeamClipResult, BeamClipper};
use crate::config::SnapConfig;
use crate::error::Result;
use crate::session::SnapSession;
use crate::visualizer::{NoopVisualizer, SubLineVisualizer};

/// What one pointer move did to the element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveFrame {
    pub transform: Option<Transform>,
    pub clip: Option<BeamClipResult>,
}

pub struct ElementMove<'c, V: SubLineVisualizer = NoopVisualizer> {
    element: EntityKey,
    session: SnapSession<V>,
    clipper: Option<&'c mut BeamClipper>,
    pointer: Point2<f64>,
}

impl<'c, V: SubLineVisualizer> ElementMove<'c, V> {
    /// Start dragging `element` with the pointer at `pointer`. Fails for
    /// missing entities and for walls and rooms, which are not dragged here.
    pub fn begin(
        scene: &Scene,
        element: EntityKey,
        pointer: Point2<f64>,
        config: &SnapConfig,
        clipper: Option<&'c mut BeamClipper>,
        visualizer: V,
    ) -> Result<Self> {
        scene.rotation(element)?;
        tracing::debug!(element = ?element, "Move started");
        Ok(Self {
            element,
            session: SnapSession::with_visualizer(element, config, visualizer),
            clipper,
            pointer,
        })
    }

    pub fn element(&self) -> EntityKey {
        self.element
    }

    pub fn session(&self) -> &SnapSession<V> {
        &self.session
    }

    /// Apply a raw pointer delta, then the snap correction, then (for
    /// beams) the clip at the pointer's centerline parameter
    pub fn update(&mut self, scene: &mut Scene, delta: Vector2<f64>) -> Result<MoveFrame> {
        scene.translate(self.element, &delta)?;
        self.pointer += delta;

        let transform = self.session.do_snap(scene);
        if let Some(t) = &transform {
            scene.translate(self.element, &t.offset())?;
            if let Some(r) = t.rotation {
                scene.rotate_about(self.element, r.angle_deg, &r.center)?;
            }
        }

        let clip = match (self.element, self.clipper.as_deref_mut()) {
            (EntityKey::Beam(beam), Some(clipper)) => {
                let drag_param = scene.beam(beam)?.centerline().param_at(&self.pointer);
                clipper.clip_beam(scene, beam, drag_param)
            }
            _ => None,
        };

        Ok(MoveFrame { transform, clip })
    }

    /// End the gesture and hand back the visualizer
    pub fn finish(mut self) -> V {
        self.session.hide_auxiliaries();
        tracing::debug!(element = ?self.element, "Move finished");
        self.session.into_visualizer()
    }
}
