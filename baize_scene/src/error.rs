// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by all scene operations.

use alloc::string::String;

use baize_contour::BoundaryNotFound;
use thiserror::Error;

use crate::types::{ElementId, LayerKey};

/// Errors raised by [`Scene`](crate::Scene) operations.
///
/// All of these are local precondition violations reported synchronously to
/// the immediate caller; the scene never retries and a failed operation
/// leaves prior state intact.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SceneError {
    /// A layer with this key is already registered.
    #[error("layer {0} already exists")]
    LayerAlreadyExists(LayerKey),
    /// No layer with this key is registered.
    #[error("layer {0} does not exist")]
    LayerNotFound(LayerKey),
    /// Layer keys must be zero or positive.
    #[error("layer key {0} is negative")]
    InvalidLayerKey(LayerKey),
    /// The handle is stale or was never issued by this scene.
    #[error("element {0:?} is not tracked by the scene")]
    ElementNotFound(ElementId),
    /// The attachment list already carries a graphic with this tag.
    #[error("a graphic tagged {tag:?} is already attached")]
    GraphicAlreadyAttached {
        /// The duplicated tag.
        tag: String,
    },
    /// No graphic in the attachment list carries this tag.
    #[error("no graphic tagged {tag:?} is attached")]
    GraphicNotFound {
        /// The missing tag.
        tag: String,
    },
    /// A token-only operation was applied to another element kind.
    #[error("element {0:?} is not a token")]
    NotAToken(ElementId),
    /// A drawing-only operation was applied to another element kind.
    #[error("element {0:?} is not a drawing")]
    NotADrawing(ElementId),
    /// Boundary extraction failed for a token's image mask.
    #[error(transparent)]
    Boundary(#[from] BoundaryNotFound),
}
