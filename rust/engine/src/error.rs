// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by configuration and the move driver. Snapping and
/// clipping report "nothing to do" with `None` instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Geometry error: {0}")]
    Geometry(#[from] floorsnap_geometry::Error),

    #[error("Scene error: {0}")]
    Model(#[from] floorsnap_model::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
