// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element payloads: token raster state and freehand drawing state.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::fmt;

use baize_contour::{BoundaryNotFound, GridPoint, trace_boundary};
use baize_imaging::RasterImage;
use kurbo::{Size, Vec2};

use crate::types::ElementKind;

/// Alpha values strictly above this sample as opaque when tracing a token
/// outline.
const OPAQUE_ALPHA: u8 = 20;

/// State behind a token element: the backing image and the lazily traced
/// boundary.
pub(crate) struct TokenState {
    pub(crate) image: Arc<dyn RasterImage>,
    boundary: OnceCell<Vec<GridPoint>>,
}

impl TokenState {
    pub(crate) fn new(image: Arc<dyn RasterImage>) -> Self {
        Self {
            image,
            boundary: OnceCell::new(),
        }
    }

    /// Boundary corners in element-local pixel coordinates.
    ///
    /// Traced on first use for the given logical size and cached until the
    /// image or that size changes.
    pub(crate) fn boundary(&self, size: Size) -> Result<&[GridPoint], BoundaryNotFound> {
        if self.boundary.get().is_none() {
            let traced = resample_boundary(&*self.image, size)?;
            let _ = self.boundary.set(traced);
        }
        Ok(self.boundary.get().map(Vec::as_slice).unwrap_or(&[]))
    }

    pub(crate) fn invalidate(&mut self) {
        self.boundary.take();
    }

    pub(crate) fn set_image(&mut self, image: Arc<dyn RasterImage>) {
        self.image = image;
        self.boundary.take();
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("image_width", &self.image.width())
            .field("image_height", &self.image.height())
            .field("boundary_cached", &self.boundary.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Traces the opaque region of `image` resampled onto the element's logical
/// pixel grid.
///
/// The image alpha channel is sampled nearest-neighbor at the logical
/// resolution, so a token displayed at a size other than its image's pixel
/// dimensions gets a boundary in its own coordinate space.
fn resample_boundary(
    image: &dyn RasterImage,
    size: Size,
) -> Result<Vec<GridPoint>, BoundaryNotFound> {
    let rounded = size.round();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rounded, clamped to non-negative, and float casts saturate"
    )]
    let (mask_w, mask_h) = (
        rounded.width.max(0.0) as u32,
        rounded.height.max(0.0) as u32,
    );
    let (img_w, img_h) = (image.width(), image.height());
    if img_w == 0 || img_h == 0 {
        return Err(BoundaryNotFound {
            width: mask_w,
            height: mask_h,
        });
    }
    trace_boundary(mask_w, mask_h, |x, y| {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= mask_w || y >= mask_h {
            return false;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the quotients are below the image dimensions"
        )]
        let (sx, sy) = (
            (u64::from(x) * u64::from(img_w) / u64::from(mask_w)) as u32,
            (u64::from(y) * u64::from(img_h) / u64::from(mask_h)) as u32,
        );
        image.alpha_at(sx, sy) > OPAQUE_ALPHA
    })
}

/// State behind a drawing element: its accumulated polyline.
#[derive(Clone, Debug)]
pub(crate) struct DrawingState {
    /// Vertex offsets from the anchor, in append order. The first entry is
    /// the drawing's creation point; the anchor tracks the min corner of the
    /// set after every append, so entries are always non-negative per axis.
    pub(crate) points: Vec<Vec2>,
}

impl DrawingState {
    pub(crate) fn new() -> Self {
        Self {
            points: vec![Vec2::ZERO],
        }
    }

    /// The creation point's current offset from the anchor.
    pub(crate) fn first_point(&self) -> Vec2 {
        self.points.first().copied().unwrap_or(Vec2::ZERO)
    }

    /// Appends `offset` and recenters the anchor onto the min corner of the
    /// accumulated set.
    ///
    /// Returns the anchor shift and the new span, both recomputed from the
    /// full point set.
    pub(crate) fn append(&mut self, offset: Vec2) -> (Vec2, Size) {
        self.points.push(offset);
        let first = self.first_point();
        let (mut min, mut max) = (first, first);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        if min != Vec2::ZERO {
            for p in &mut self.points {
                *p -= min;
            }
        }
        (min, Size::new(max.x - min.x, max.y - min.y))
    }
}

/// The variant-specific half of an element.
#[derive(Debug)]
pub(crate) enum Payload {
    Token(TokenState),
    Drawing(DrawingState),
}

impl Payload {
    pub(crate) fn kind(&self) -> ElementKind {
        match self {
            Self::Token(_) => ElementKind::Token,
            Self::Drawing(_) => ElementKind::Drawing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_imaging::AlphaImage;
    use core::cell::Cell;

    #[test]
    fn drawing_starts_at_its_creation_point() {
        let drawing = DrawingState::new();
        assert_eq!(drawing.points, [Vec2::ZERO]);
        assert_eq!(drawing.first_point(), Vec2::ZERO);
    }

    #[test]
    fn append_grows_the_span_without_moving_the_anchor() {
        let mut drawing = DrawingState::new();
        let (shift, size) = drawing.append(Vec2::new(10.0, 0.0));
        assert_eq!(shift, Vec2::ZERO);
        assert_eq!(size, Size::new(10.0, 0.0));

        let (shift, size) = drawing.append(Vec2::new(10.0, 10.0));
        assert_eq!(shift, Vec2::ZERO);
        assert_eq!(size, Size::new(10.0, 10.0));
    }

    #[test]
    fn append_recenters_onto_the_min_corner() {
        let mut drawing = DrawingState::new();
        drawing.append(Vec2::new(10.0, 0.0));
        let (shift, size) = drawing.append(Vec2::new(-5.0, 5.0));

        assert_eq!(shift, Vec2::new(-5.0, 0.0));
        assert_eq!(size, Size::new(15.0, 5.0));
        assert_eq!(
            drawing.points,
            [Vec2::new(5.0, 0.0), Vec2::new(15.0, 0.0), Vec2::new(0.0, 5.0)]
        );
    }

    #[test]
    fn solid_image_traces_its_logical_rectangle() {
        let token = TokenState::new(Arc::new(AlphaImage::solid(4, 4)));
        let boundary = token.boundary(Size::new(4.0, 4.0)).unwrap();
        assert_eq!(
            boundary,
            [
                GridPoint::new(0, 0),
                GridPoint::new(0, 4),
                GridPoint::new(4, 4),
                GridPoint::new(4, 0),
            ]
        );
    }

    #[test]
    fn boundary_follows_the_logical_size_not_the_image_size() {
        // A 2x2 image shown at 6x6: nearest-neighbor sampling keeps the whole
        // logical rectangle opaque.
        let token = TokenState::new(Arc::new(AlphaImage::solid(2, 2)));
        let boundary = token.boundary(Size::new(6.0, 6.0)).unwrap();
        assert_eq!(
            boundary,
            [
                GridPoint::new(0, 0),
                GridPoint::new(0, 6),
                GridPoint::new(6, 6),
                GridPoint::new(6, 0),
            ]
        );
    }

    #[test]
    fn alpha_at_the_threshold_is_transparent() {
        let at_threshold = TokenState::new(Arc::new(AlphaImage::from_fn(2, 2, |_, _| 20)));
        assert!(at_threshold.boundary(Size::new(2.0, 2.0)).is_err());

        let above_threshold = TokenState::new(Arc::new(AlphaImage::from_fn(2, 2, |_, _| 21)));
        assert!(above_threshold.boundary(Size::new(2.0, 2.0)).is_ok());
    }

    #[test]
    fn degenerate_masks_fail() {
        let token = TokenState::new(Arc::new(AlphaImage::solid(4, 4)));
        assert_eq!(
            token.boundary(Size::ZERO),
            Err(BoundaryNotFound {
                width: 0,
                height: 0
            })
        );

        let empty_image = TokenState::new(Arc::new(AlphaImage::new(0, 0, Vec::new())));
        assert!(empty_image.boundary(Size::new(4.0, 4.0)).is_err());
    }

    struct CountingImage {
        samples: Cell<u32>,
    }

    impl RasterImage for CountingImage {
        fn width(&self) -> u32 {
            1
        }
        fn height(&self) -> u32 {
            1
        }
        fn alpha_at(&self, _x: u32, _y: u32) -> u8 {
            self.samples.set(self.samples.get() + 1);
            255
        }
    }

    #[test]
    fn boundary_is_cached_until_invalidated() {
        let image = Arc::new(CountingImage {
            samples: Cell::new(0),
        });
        let mut token = TokenState::new(image.clone());
        let size = Size::new(1.0, 1.0);

        token.boundary(size).unwrap();
        let sampled = image.samples.get();
        assert!(sampled > 0, "first access must sample the image");

        token.boundary(size).unwrap();
        assert_eq!(
            image.samples.get(),
            sampled,
            "second access must hit the cache"
        );

        token.invalidate();
        token.boundary(size).unwrap();
        assert!(
            image.samples.get() > sampled,
            "invalidation must force a retrace"
        );
    }

    #[test]
    fn replacing_the_image_drops_the_cache() {
        let mut token = TokenState::new(Arc::new(AlphaImage::solid(2, 2)));
        token.boundary(Size::new(2.0, 2.0)).unwrap();

        token.set_image(Arc::new(AlphaImage::new(2, 2, vec![0; 4])));
        assert!(token.boundary(Size::new(2.0, 2.0)).is_err());
    }
}
