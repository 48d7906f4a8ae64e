// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene operations.

use crate::keys::EntityKey;

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during scene operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced entity was not found in the scene.
    #[error("scene entity not found: {0:?}")]
    NotFound(EntityKey),

    /// A size, width or scale is zero, negative or not finite.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Walls and rooms cannot be repositioned by the move setters.
    #[error("entity cannot be moved: {0:?}")]
    NotMovable(EntityKey),

    /// Outline construction failed in the geometry kernel.
    #[error(transparent)]
    Geometry(#[from] floorsnap_geometry::Error),
}
