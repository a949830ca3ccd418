// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ephemeral decorations: render-only graphics attached to an element or
//! laid over the whole scene.

use alloc::string::String;
use alloc::sync::Arc;

use baize_imaging::{StrokeStyle, SurfaceOp};
use kurbo::Rect;

/// How a [`Graphic`] paints.
///
/// Strategies are plain data rather than callbacks so recorded frames stay
/// reproducible and two graphics can be compared with `==`.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphicStrategy {
    /// Strokes the parent element's boundary path in the given style.
    ///
    /// Only meaningful for graphics attached to an element; a scene overlay
    /// with this strategy has nothing to outline and is skipped.
    BoundaryOutline(StrokeStyle),
    /// Strokes a fixed view-space rectangle.
    ViewRect {
        /// The rectangle, in view coordinates.
        rect: Rect,
        /// Stroke style for the outline.
        style: StrokeStyle,
    },
    /// Replays a recorded sequence of surface calls.
    ///
    /// Image draws carry no pixel data in recorded form and are skipped on
    /// replay.
    Recorded(Arc<[SurfaceOp]>),
}

/// A render-only decoration.
///
/// Graphics never participate in hit testing. Within one attachment list
/// (an element's graphics, or the scene overlays) the tag is the graphic's
/// identity: attach and remove address graphics by tag, and no two graphics
/// in one list share a tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Graphic {
    /// Identity of this graphic within its attachment list.
    pub tag: String,
    /// Draw behavior.
    pub strategy: GraphicStrategy,
}

impl Graphic {
    /// Creates a graphic with the given tag and strategy.
    #[must_use]
    pub fn new(tag: impl Into<String>, strategy: GraphicStrategy) -> Self {
        Self {
            tag: tag.into(),
            strategy,
        }
    }
}
