// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Baize View 2D: the world/view coordinate model of the board.
//!
//! Board elements live in **world space**; input events and the raster
//! surface speak **view space** (device pixels). [`GridView`] is the single
//! mapping between the two: a pan offset applied in world units followed by
//! a uniform scale,
//!
//! ```text
//! view  = (world + pan) * scale
//! world = view / scale - pan
//! ```
//!
//! which are exact inverses for any one snapshot of `(pan, scale)`. Every
//! hit test and every render pass reads one snapshot so spatial queries and
//! drawing can never disagree mid-operation.
//!
//! [`GridView`] also owns the grid cell size used for background grid lines
//! and position snapping. It does not own a scene or issue any drawing;
//! callers combine it with their element store and surface.
//!
//! ## Example
//!
//! ```rust
//! use baize_view2d::GridView;
//! use kurbo::{Point, Vec2};
//!
//! let mut view = GridView::new();
//! view.set_pan(Vec2::new(10.0, 20.0));
//! view.set_scale(2.0)?;
//!
//! let world = Point::new(1.0, 2.0);
//! let seen = view.world_to_view_point(world);
//! assert_eq!(seen, Point::new(22.0, 44.0));
//! assert_eq!(view.view_to_world_point(seen), world);
//! # Ok::<_, baize_view2d::InvalidScale>(())
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod grid_view;

pub use grid_view::{DEFAULT_CELL_SIZE, GridView, InvalidScale};
