// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorsnap Engine
//!
//! Interactive snapping for elements dragged in a floor plan, and beam
//! clipping against room regions.
//!
//! Each frame of a drag runs the same pipeline:
//!
//! 1. [`PositionEntities::collect`] finds the element's neighborhood.
//! 2. [`extract`] turns it into typed [`Anchor`]s.
//! 3. [`SnapStrategy::execute`] proposes [`Candidate`] constraints.
//! 4. [`ConstraintResolver`] picks a primary and a secondary and merges them
//!    into a [`Transform`].
//! 5. [`SnapState::advance`] keeps rotations continuous across frames.
//!
//! [`SnapSession`] wraps the pipeline for one gesture and [`ElementMove`]
//! applies its output to a [`floorsnap_model::Scene`], clipping beams with a
//! shared [`BeamClipper`].

pub mod anchor;
pub mod candidate;
pub mod clipper;
pub mod config;
pub mod error;
pub mod extract;
pub mod mover;
pub mod neighborhood;
pub mod resolver;
pub mod session;
pub mod strategy;
pub mod visualizer;

pub use anchor::{Anchor, AnchorGeometry, AnchorId, AnchorKind, AnchorRole, AnchorSet};
pub use candidate::{Candidate, CandidateId, RotationDelta, SnapType, Transform};
pub use clipper::{BeamClipResult, BeamClipper, RailPiece, RailSide};
pub use config::{ClipConfig, SnapConfig};
pub use error::{Error, Result};
pub use extract::{extract, extract_entity, ExtractOptions};
pub use mover::{ElementMove, MoveFrame};
pub use neighborhood::PositionEntities;
pub use resolver::ConstraintResolver;
pub use session::{FrameInput, PendingRotation, SnapPhase, SnapSession, SnapState};
pub use strategy::{exclude_for_element, predicate_for, BreakMode, SnapStrategy};
pub use visualizer::{GuideLines, GuideSegment, NoopVisualizer, SubLineVisualizer};
