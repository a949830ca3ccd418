// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Baize Imaging Reference Surface.
//!
//! [`RecordingSurface`] implements [`Surface`] by recording every call as a
//! [`SurfaceOp`] value instead of producing pixels.
//!
//! It is intentionally *not* a reference renderer:
//! - It does **not** rasterize anything.
//! - It does **not** establish golden rendering behavior for real backends.
//! - It exists so tests can assert on exact draw-call sequences: render
//!   order, idempotence of repeated renders, and the stroke state active
//!   around each draw.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::mem;

use baize_imaging::{RasterImage, StrokeStyle, Surface, SurfaceOp};
use kurbo::{BezPath, Rect};

/// A [`Surface`] that records calls as [`SurfaceOp`] values.
///
/// The current stroke style is tracked the way a real surface would so the
/// op stream stays an accurate replay script.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    stroke: StrokeStyle,
}

impl RecordingSurface {
    /// Creates an empty recording surface with the default stroke style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded ops, in call order.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Takes the recorded ops, leaving the log empty.
    ///
    /// The tracked stroke style is kept, matching a real surface whose
    /// state persists across frames.
    #[must_use]
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        mem::take(&mut self.ops)
    }

    /// Drops all recorded ops.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of [`SurfaceOp::Clear`] ops recorded so far.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Clear))
            .count()
    }

    /// The stroke style the next stroke call would use.
    #[must_use]
    pub fn current_stroke(&self) -> StrokeStyle {
        self.stroke
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn set_stroke(&mut self, style: StrokeStyle) {
        self.stroke = style;
        self.ops.push(SurfaceOp::SetStroke(style));
    }

    fn stroke_path(&mut self, path: &BezPath) {
        self.ops.push(SurfaceOp::StrokePath(path.elements().into()));
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.ops.push(SurfaceOp::FillPath(path.elements().into()));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ops.push(SurfaceOp::StrokeRect(rect));
    }

    fn draw_image(&mut self, image: &dyn RasterImage, dst: Rect) {
        self.ops.push(SurfaceOp::DrawImage {
            width: image.width(),
            height: image.height(),
            dst,
        });
    }
}
