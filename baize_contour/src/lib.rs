// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Baize Contour: marching-squares boundary tracing over binary pixel masks.
//!
//! This crate extracts the outer boundary of an opaque pixel region as an
//! ordered closed polyline of integer grid corners. The caller supplies the
//! mask as a predicate over pixel coordinates; nothing here knows about image
//! formats, alpha thresholds, or coordinate transforms. Higher layers decide
//! what "opaque" means (for example, sampling an image's alpha channel) and
//! how to place the resulting corners in world space.
//!
//! The walk is a classic marching-squares contour follow:
//!
//! - A start corner is found by scanning outward in diagonal rings from
//!   `(0, 0)` until the predicate first reports an opaque pixel.
//! - At each corner a 4-bit cell code is built from the opacity of the four
//!   surrounding pixels, and a direction table maps the code to the next step.
//! - The two saddle codes (6 and 9) are ambiguous and are resolved using the
//!   direction of the previous step.
//! - Corners are appended to the output only when the walk changes direction,
//!   so straight runs compress to their endpoints.
//! - The walk ends when it returns to the start corner.
//!
//! Both phases are bounded: a mask with no opaque pixel inside the given
//! dimensions fails with [`BoundaryNotFound`] once the scan leaves the mask,
//! and a walk that cannot close (the opaque region was not 4-connected, so
//! the follow has no consistent boundary) fails the same way instead of
//! looping. Callers that uphold the contract of a bounded, 4-connected
//! region always get a closed boundary back.
//!
//! ## Example
//!
//! ```rust
//! use baize_contour::{GridPoint, trace_boundary};
//!
//! // A solid 4x4 block: the boundary compresses to its four corners.
//! let boundary = trace_boundary(4, 4, |x, y| (0..4).contains(&x) && (0..4).contains(&y))?;
//! assert_eq!(
//!     boundary,
//!     [
//!         GridPoint::new(0, 0),
//!         GridPoint::new(0, 4),
//!         GridPoint::new(4, 4),
//!         GridPoint::new(4, 0),
//!     ]
//! );
//! # Ok::<_, baize_contour::BoundaryNotFound>(())
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use thiserror::Error;

/// A corner of the pixel grid.
///
/// Pixel `(x, y)` occupies the cell whose corners are `(x, y)`, `(x + 1, y)`,
/// `(x, y + 1)` and `(x + 1, y + 1)`, so boundaries of a mask with pixels in
/// `0..width` and `0..height` stay within `0..=width` and `0..=height`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridPoint {
    /// Horizontal corner coordinate.
    pub x: i32,
    /// Vertical corner coordinate.
    pub y: i32,
}

impl GridPoint {
    /// Creates a new grid point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// No boundary could be traced within the mask bounds.
///
/// Returned both when the start scan exhausts the mask without finding an
/// opaque pixel and when the boundary walk cannot close, which only happens
/// when the opaque region violates the 4-connectivity contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no boundary found within a {width}x{height} mask")]
pub struct BoundaryNotFound {
    /// Width of the mask the search was bounded by.
    pub width: u32,
    /// Height of the mask the search was bounded by.
    pub height: u32,
}

/// Step direction per cell code.
///
/// Codes 6 and 9 are the saddle cases and carry no fixed direction; they are
/// resolved against the previous step in [`step_direction`]. Code 0 (no
/// surrounding pixel opaque) and code 15 (all opaque) mean the walk has left
/// the boundary entirely, which cannot happen for a 4-connected region, so
/// both terminate the trace.
const CELL_DIRECTIONS: [Option<(i32, i32)>; 16] = [
    None,           // 0: walk escaped the region
    Some((0, -1)),  // 1
    Some((1, 0)),   // 2
    Some((1, 0)),   // 3
    Some((-1, 0)),  // 4
    Some((0, -1)),  // 5
    None,           // 6: saddle
    Some((1, 0)),   // 7
    Some((0, 1)),   // 8
    None,           // 9: saddle
    Some((0, 1)),   // 10
    Some((0, 1)),   // 11
    Some((-1, 0)),  // 12
    Some((0, -1)),  // 13
    Some((-1, 0)),  // 14
    None,           // 15: walk sank into the interior
];

/// Resolves the step direction for a cell code given the previous direction.
fn step_direction(code: u8, prev: (i32, i32)) -> Option<(i32, i32)> {
    match code {
        9 => Some((if prev.1 == -1 { -1 } else { 1 }, 0)),
        6 => Some((0, if prev.0 == 1 { -1 } else { 1 })),
        _ => CELL_DIRECTIONS[usize::from(code)],
    }
}

/// Traces the outer boundary of the opaque region of a `width` x `height`
/// pixel mask.
///
/// `opaque` is queried with pixel coordinates that may lie outside the mask
/// (including negative ones) and must return `false` there. The result is an
/// ordered closed polyline of grid corners in walk order; the closing edge
/// from the last corner back to the first is implicit.
///
/// The opaque region must be bounded by the mask dimensions and 4-connected.
/// If no opaque pixel exists, or the walk cannot close because the region is
/// only corner-connected, the trace fails with [`BoundaryNotFound`].
pub fn trace_boundary<F>(
    width: u32,
    height: u32,
    opaque: F,
) -> Result<Vec<GridPoint>, BoundaryNotFound>
where
    F: Fn(i32, i32) -> bool,
{
    let not_found = BoundaryNotFound { width, height };
    let ring_limit = i64::from(width) + i64::from(height);

    // Scan outward in diagonal rings from the origin. Every opaque pixel has
    // x + y at most `ring_limit`, so leaving that ring means the mask is
    // fully transparent.
    let (mut x, mut y) = (0_i32, 0_i32);
    while !opaque(x, y) {
        if x == 0 {
            x = y + 1;
            y = 0;
        } else {
            x -= 1;
            y += 1;
        }
        if i64::from(x) > ring_limit {
            return Err(not_found);
        }
    }
    let start = GridPoint::new(x, y);

    // A closing walk visits each corner of the padded grid at most four
    // times. Exceeding that means the walk is oscillating at a pinch.
    let max_steps = 4 * (u64::from(width) + 2) * (u64::from(height) + 2);
    let mut steps = 0_u64;

    let mut path = Vec::new();
    let mut prev = (0_i32, 0_i32);
    loop {
        let mut code = 0_u8;
        if opaque(x, y) {
            code += 8;
        }
        if opaque(x - 1, y) {
            code += 4;
        }
        if opaque(x, y - 1) {
            code += 2;
        }
        if opaque(x - 1, y - 1) {
            code += 1;
        }

        let dir = step_direction(code, prev).ok_or(not_found)?;
        if dir != prev {
            path.push(GridPoint::new(x, y));
            prev = dir;
        }
        x += dir.0;
        y += dir.1;

        if x == start.x && y == start.y {
            break;
        }
        steps += 1;
        if steps >= max_steps {
            return Err(not_found);
        }
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn rect_mask(x0: i32, y0: i32, x1: i32, y1: i32) -> impl Fn(i32, i32) -> bool {
        move |x, y| (x0..x1).contains(&x) && (y0..y1).contains(&y)
    }

    #[test]
    fn single_pixel_traces_unit_square() {
        let path = trace_boundary(1, 1, rect_mask(0, 0, 1, 1)).unwrap();
        assert_eq!(
            path,
            vec![
                GridPoint::new(0, 0),
                GridPoint::new(0, 1),
                GridPoint::new(1, 1),
                GridPoint::new(1, 0),
            ]
        );
    }

    #[test]
    fn solid_square_compresses_to_four_corners() {
        let path = trace_boundary(4, 4, rect_mask(0, 0, 4, 4)).unwrap();
        assert_eq!(
            path,
            vec![
                GridPoint::new(0, 0),
                GridPoint::new(0, 4),
                GridPoint::new(4, 4),
                GridPoint::new(4, 0),
            ]
        );
    }

    #[test]
    fn tall_rectangle_compresses_to_four_corners() {
        let path = trace_boundary(2, 5, rect_mask(0, 0, 2, 5)).unwrap();
        assert_eq!(
            path,
            vec![
                GridPoint::new(0, 0),
                GridPoint::new(0, 5),
                GridPoint::new(2, 5),
                GridPoint::new(2, 0),
            ]
        );
    }

    #[test]
    fn offset_region_starts_from_diagonal_scan() {
        // The block does not touch the origin; the diagonal scan has to walk
        // a few rings before it hits the first opaque pixel at (2, 1).
        let path = trace_boundary(8, 8, rect_mask(2, 1, 5, 4)).unwrap();
        assert_eq!(
            path,
            vec![
                GridPoint::new(2, 1),
                GridPoint::new(2, 4),
                GridPoint::new(5, 4),
                GridPoint::new(5, 1),
            ]
        );
    }

    #[test]
    fn l_shape_traces_six_corners() {
        let opaque = |x: i32, y: i32| {
            let left_leg = (0..2).contains(&x) && (0..4).contains(&y);
            let top_bar = (0..4).contains(&x) && (0..2).contains(&y);
            left_leg || top_bar
        };
        let path = trace_boundary(4, 4, opaque).unwrap();
        assert_eq!(
            path,
            vec![
                GridPoint::new(0, 0),
                GridPoint::new(0, 4),
                GridPoint::new(2, 4),
                GridPoint::new(2, 2),
                GridPoint::new(4, 2),
                GridPoint::new(4, 0),
            ]
        );
    }

    #[test]
    fn empty_mask_fails_with_bounded_scan() {
        let err = trace_boundary(8, 8, |_, _| false).unwrap_err();
        assert_eq!(err, BoundaryNotFound { width: 8, height: 8 });
    }

    #[test]
    fn zero_sized_mask_fails() {
        assert!(trace_boundary(0, 0, |_, _| false).is_err());
    }

    #[test]
    fn corner_connected_pixels_fail_instead_of_looping() {
        // Two pixels touching only at a corner violate the 4-connectivity
        // contract; the walk oscillates at the pinch and must be cut off.
        let opaque = |x: i32, y: i32| (x, y) == (0, 0) || (x, y) == (1, 1);
        let err = trace_boundary(2, 2, opaque).unwrap_err();
        assert_eq!(err, BoundaryNotFound { width: 2, height: 2 });
    }

    #[test]
    fn saddle_nine_resolves_against_previous_direction() {
        // Rightward walks pass straight through; upward walks turn left.
        assert_eq!(step_direction(9, (1, 0)), Some((1, 0)));
        assert_eq!(step_direction(9, (0, -1)), Some((-1, 0)));
        assert_eq!(step_direction(9, (0, 1)), Some((1, 0)));
    }

    #[test]
    fn saddle_six_resolves_against_previous_direction() {
        // Rightward walks turn up; downward and leftward walks continue down.
        assert_eq!(step_direction(6, (1, 0)), Some((0, -1)));
        assert_eq!(step_direction(6, (0, 1)), Some((0, 1)));
        assert_eq!(step_direction(6, (-1, 0)), Some((0, 1)));
    }

    #[test]
    fn interior_and_escaped_codes_have_no_direction() {
        assert_eq!(step_direction(0, (1, 0)), None);
        assert_eq!(step_direction(15, (1, 0)), None);
    }

    #[test]
    fn error_formats_mask_dimensions() {
        use alloc::string::ToString;

        let err = BoundaryNotFound { width: 3, height: 7 };
        assert_eq!(err.to_string(), "no boundary found within a 3x7 mask");
    }
}
