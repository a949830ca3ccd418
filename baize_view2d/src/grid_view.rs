// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pan/zoom/grid state of a board view.

use kurbo::{Point, Rect, Vec2};
use thiserror::Error;

/// Grid cell size a fresh [`GridView`] starts with, in world units.
pub const DEFAULT_CELL_SIZE: f64 = 64.0;

/// Rejected scale value: the view scale must be strictly positive.
///
/// The offending value is carried for diagnostics. The view is left
/// unchanged when this is returned.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("view scale must be strictly positive and finite, got {0}")]
pub struct InvalidScale(pub f64);

/// World/view transform plus grid spacing for one board.
///
/// The transform is a pan offset in world units followed by a uniform
/// scale: `view = (world + pan) * scale`. The scale is always strictly
/// positive and finite; the cell size is always at least zero. A cell size
/// of zero disables the grid (no lines, no snapping).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridView {
    pan: Vec2,
    scale: f64,
    cell_size: f64,
}

impl Default for GridView {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl GridView {
    /// Creates a view with no pan, unit scale, and the default cell size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pan offset in world units.
    #[inline]
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Replaces the pan offset.
    #[inline]
    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Shifts the pan offset by a world-space delta.
    #[inline]
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Current uniform scale (view pixels per world unit).
    #[inline]
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Replaces the scale.
    ///
    /// Fails with [`InvalidScale`] for zero, negative, or non-finite values,
    /// leaving the view unchanged.
    pub fn set_scale(&mut self, scale: f64) -> Result<(), InvalidScale> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(InvalidScale(scale));
        }
        self.scale = scale;
        Ok(())
    }

    /// Current grid cell size in world units.
    #[inline]
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Replaces the grid cell size, clamping negative (and non-finite)
    /// input to zero.
    pub fn set_cell_size(&mut self, cell_size: f64) {
        self.cell_size = if cell_size.is_finite() {
            cell_size.max(0.0)
        } else {
            0.0
        };
    }

    /// Maps a world-space point into view space.
    #[inline]
    #[must_use]
    pub fn world_to_view_point(&self, p: Point) -> Point {
        Point::new((p.x + self.pan.x) * self.scale, (p.y + self.pan.y) * self.scale)
    }

    /// Maps a view-space point back into world space.
    #[inline]
    #[must_use]
    pub fn view_to_world_point(&self, p: Point) -> Point {
        Point::new(p.x / self.scale - self.pan.x, p.y / self.scale - self.pan.y)
    }

    /// Maps a world-space vector (a delta, unaffected by pan) into view
    /// space.
    #[inline]
    #[must_use]
    pub fn world_to_view_vec(&self, v: Vec2) -> Vec2 {
        v * self.scale
    }

    /// Maps a view-space vector (for example a pointer drag delta) into
    /// world space.
    #[inline]
    #[must_use]
    pub fn view_to_world_vec(&self, v: Vec2) -> Vec2 {
        v / self.scale
    }

    /// Maps a world-space rectangle into view space.
    ///
    /// The scale is strictly positive, so corner ordering is preserved.
    #[must_use]
    pub fn world_to_view_rect(&self, r: Rect) -> Rect {
        let origin = self.world_to_view_point(r.origin());
        Rect::new(
            origin.x,
            origin.y,
            origin.x + r.width() * self.scale,
            origin.y + r.height() * self.scale,
        )
    }

    /// Maps a view-space rectangle back into world space.
    #[must_use]
    pub fn view_to_world_rect(&self, r: Rect) -> Rect {
        let origin = self.view_to_world_point(r.origin());
        Rect::new(
            origin.x,
            origin.y,
            origin.x + r.width() / self.scale,
            origin.y + r.height() / self.scale,
        )
    }

    /// View-space spacing between adjacent grid lines.
    ///
    /// Zero when the grid is disabled (`cell_size == 0`).
    #[inline]
    #[must_use]
    pub fn cell_step(&self) -> f64 {
        self.cell_size * self.scale
    }

    /// View-space position of the first grid line at or before the view
    /// origin, per axis.
    ///
    /// Only meaningful when the grid is enabled (`cell_step() > 0`).
    #[must_use]
    pub fn grid_offset(&self) -> Vec2 {
        Vec2::new(
            (self.pan.x % self.cell_size) * self.scale,
            (self.pan.y % self.cell_size) * self.scale,
        )
    }

    /// Rounds a world-space point to the nearest grid intersection.
    ///
    /// Identity when the grid is disabled.
    #[must_use]
    pub fn snap_to_grid(&self, p: Point) -> Point {
        if self.cell_size == 0.0 {
            return p;
        }
        let cells = Point::new(p.x / self.cell_size, p.y / self.cell_size).round();
        Point::new(cells.x * self.cell_size, cells.y * self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn default_view_is_identity_with_default_grid() {
        let view = GridView::new();
        assert_eq!(view.pan(), Vec2::ZERO);
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.cell_size(), DEFAULT_CELL_SIZE);
        let p = Point::new(12.5, -3.0);
        assert_eq!(view.world_to_view_point(p), p);
        assert_eq!(view.view_to_world_point(p), p);
    }

    #[test]
    fn pan_is_applied_before_scale() {
        let mut view = GridView::new();
        view.set_pan(Vec2::new(10.0, 20.0));
        view.set_scale(2.0).unwrap();
        assert_eq!(
            view.world_to_view_point(Point::new(1.0, 2.0)),
            Point::new(22.0, 44.0)
        );
    }

    #[test]
    fn world_view_roundtrip() {
        let mut view = GridView::new();
        view.set_pan(Vec2::new(-37.25, 104.5));
        view.set_scale(1.75).unwrap();
        for p in [
            Point::ZERO,
            Point::new(64.0, 64.0),
            Point::new(-512.3, 7.9),
            Point::new(1e6, -1e6),
        ] {
            assert_near(view.view_to_world_point(view.world_to_view_point(p)), p);
            assert_near(view.world_to_view_point(view.view_to_world_point(p)), p);
        }
    }

    #[test]
    fn set_scale_rejects_non_positive_values() {
        let mut view = GridView::new();
        view.set_scale(2.5).unwrap();
        assert_eq!(view.set_scale(0.0), Err(InvalidScale(0.0)));
        assert_eq!(view.set_scale(-1.0), Err(InvalidScale(-1.0)));
        assert!(view.set_scale(f64::NAN).is_err());
        assert!(view.set_scale(f64::INFINITY).is_err());
        assert_eq!(view.scale(), 2.5);
    }

    #[test]
    fn set_cell_size_clamps_negative_to_zero() {
        let mut view = GridView::new();
        view.set_cell_size(-5.0);
        assert_eq!(view.cell_size(), 0.0);
        view.set_cell_size(32.0);
        assert_eq!(view.cell_size(), 32.0);
        view.set_cell_size(f64::NAN);
        assert_eq!(view.cell_size(), 0.0);
    }

    #[test]
    fn pan_by_accumulates() {
        let mut view = GridView::new();
        view.pan_by(Vec2::new(3.0, 4.0));
        view.pan_by(Vec2::new(-1.0, 1.0));
        assert_eq!(view.pan(), Vec2::new(2.0, 5.0));
    }

    #[test]
    fn vectors_ignore_pan() {
        let mut view = GridView::new();
        view.set_pan(Vec2::new(100.0, 100.0));
        view.set_scale(2.0).unwrap();
        assert_eq!(view.view_to_world_vec(Vec2::new(10.0, 0.0)), Vec2::new(5.0, 0.0));
        assert_eq!(view.world_to_view_vec(Vec2::new(5.0, 0.0)), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn rects_keep_corner_order() {
        let mut view = GridView::new();
        view.set_pan(Vec2::new(5.0, -5.0));
        view.set_scale(3.0).unwrap();
        let world = Rect::new(0.0, 0.0, 10.0, 20.0);
        let seen = view.world_to_view_rect(world);
        assert_eq!(seen, Rect::new(15.0, -15.0, 45.0, 45.0));
        let back = view.view_to_world_rect(seen);
        assert_near(back.origin(), world.origin());
        assert!((back.width() - world.width()).abs() < 1e-9);
        assert!((back.height() - world.height()).abs() < 1e-9);
    }

    #[test]
    fn grid_helpers_follow_pan_and_scale() {
        let mut view = GridView::new();
        view.set_pan(Vec2::new(70.0, -10.0));
        view.set_scale(2.0).unwrap();
        assert_eq!(view.cell_step(), 128.0);
        // Remainder keeps the dividend's sign, matching how the grid is
        // anchored when panned into negative space.
        assert_eq!(view.grid_offset(), Vec2::new(12.0, -20.0));
    }

    #[test]
    fn snap_rounds_to_nearest_cell() {
        let view = GridView::new();
        assert_eq!(
            view.snap_to_grid(Point::new(100.0, 95.0)),
            Point::new(128.0, 64.0)
        );
        assert_eq!(view.snap_to_grid(Point::new(31.0, 33.0)), Point::new(0.0, 64.0));
    }

    #[test]
    fn snap_is_identity_without_grid() {
        let mut view = GridView::new();
        view.set_cell_size(0.0);
        let p = Point::new(17.3, -4.2);
        assert_eq!(view.snap_to_grid(p), p);
    }
}
