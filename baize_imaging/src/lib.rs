// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Baize Imaging: the drawing and image capabilities the board core calls
//! into.
//!
//! The board never talks to a window, a canvas, or a GPU. It renders through
//! the [`Surface`] trait, a small immediate-mode 2D raster abstraction:
//! clear, stroke/fill a path, stroke a rectangle, draw an image, set the
//! stroke style, and hit-test a path against a point. Embedders supply the
//! concrete binding; tests use the recording surface from
//! `baize_imaging_ref` to capture and compare exact draw-call sequences.
//!
//! Token artwork enters the core through [`RasterImage`], a read-only
//! capability exposing pixel dimensions and per-pixel alpha. That is all the
//! core consumes: boundary extraction samples alpha, and rendering forwards
//! the image to the surface untouched. Asset decoding and file I/O stay
//! outside. Backends that need full pixel data can upcast a [`RasterImage`]
//! to `dyn Any` and downcast to their own concrete image type.
//!
//! [`SurfaceOp`] is the value form of one surface call. It exists so
//! reference surfaces can record, replay, and compare render output; real
//! backends never see it.
//!
//! ## Example
//!
//! ```rust
//! use baize_imaging::{RasterImage, path_contains};
//! use kurbo::{BezPath, Point};
//!
//! let mut path = BezPath::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((10.0, 0.0));
//! path.line_to((10.0, 10.0));
//! path.line_to((0.0, 10.0));
//! path.close_path();
//!
//! assert!(path_contains(&path, Point::new(5.0, 5.0)));
//! assert!(!path_contains(&path, Point::new(15.0, 5.0)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use kurbo::{BezPath, PathEl, Point, Rect, Shape};

pub use peniko::Color;

/// Stroke state of a [`Surface`]: solid color plus line width.
///
/// The board only ever strokes with solid colors, so this carries a
/// [`Color`] directly rather than a full brush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Solid stroke color.
    pub color: Color,
    /// Line width in view pixels.
    pub width: f64,
}

impl StrokeStyle {
    /// Creates a stroke style.
    #[must_use]
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

impl Default for StrokeStyle {
    /// Black, one pixel wide: the base style every render pass starts from.
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0)
    }
}

/// A decoded raster image the core can sample alpha from.
///
/// Coordinates are pixel indices; out-of-bounds samples are fully
/// transparent. Implementations are supplied by the embedder's asset layer
/// and shared between elements behind an `Arc`.
pub trait RasterImage: Any {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Alpha sample at pixel `(x, y)`, or 0 outside the image.
    fn alpha_at(&self, x: u32, y: u32) -> u8;
}

/// An owned alpha-only raster image.
///
/// The simplest [`RasterImage`]: one byte per pixel in row-major order.
/// Decoders that only need hit-testing fidelity can drop color data and
/// keep this; it is also the image type used throughout the test suites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaImage {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaImage {
    /// Creates an image from row-major alpha bytes.
    ///
    /// `alpha.len()` must equal `width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> Self {
        debug_assert_eq!(
            alpha.len(),
            width as usize * height as usize,
            "alpha buffer does not match image dimensions"
        );
        Self { width, height, alpha }
    }

    /// Creates a fully opaque image.
    #[must_use]
    pub fn solid(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            alpha: alloc::vec![u8::MAX; len],
        }
    }

    /// Creates an image by sampling a function over every pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut alpha = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Self { width, height, alpha }
    }
}

impl RasterImage for AlphaImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.alpha[idx]
    }
}

/// Whether a point lies inside a path under the nonzero winding rule.
///
/// This is the reference semantics of [`Surface::hit_test_path`]; backends
/// with native path hit-testing must agree with it.
#[must_use]
pub fn path_contains(path: &BezPath, pt: Point) -> bool {
    path.winding(pt) != 0
}

/// The value form of one [`Surface`] call.
///
/// Paths are captured as their element lists so recorded sequences compare
/// with `==`. Images are captured by their dimensions; the reference
/// surfaces never need pixel data.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// The surface was cleared.
    Clear,
    /// The stroke style changed.
    SetStroke(StrokeStyle),
    /// A path outline was stroked.
    StrokePath(Box<[PathEl]>),
    /// A path interior was filled.
    FillPath(Box<[PathEl]>),
    /// A rectangle outline was stroked.
    StrokeRect(Rect),
    /// An image was drawn into a destination rectangle.
    DrawImage {
        /// Source image width in pixels.
        width: u32,
        /// Source image height in pixels.
        height: u32,
        /// Destination rectangle in view space.
        dst: Rect,
    },
}

/// An immediate-mode 2D raster surface.
///
/// All coordinates are in view space; the board applies its own world/view
/// transform before calling in. The only state a surface carries between
/// calls is the current stroke style.
pub trait Surface {
    /// Clears the whole surface.
    fn clear(&mut self);

    /// Replaces the current stroke style.
    fn set_stroke(&mut self, style: StrokeStyle);

    /// Strokes the outline of a path with the current stroke style.
    fn stroke_path(&mut self, path: &BezPath);

    /// Fills the interior of a path.
    fn fill_path(&mut self, path: &BezPath);

    /// Strokes the outline of a rectangle with the current stroke style.
    fn stroke_rect(&mut self, rect: Rect);

    /// Draws an image scaled into `dst`.
    fn draw_image(&mut self, image: &dyn RasterImage, dst: Rect);

    /// Whether `pt` lies inside `path`.
    ///
    /// The default applies [`path_contains`]; backends with a native path
    /// hit test may override, but must keep nonzero-winding semantics.
    fn hit_test_path(&self, path: &BezPath, pt: Point) -> bool {
        path_contains(path, pt)
    }
}
