// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Baize Scene: the layered board model behind the editor.
//!
//! A [`Scene`] stores **tokens** (image-backed pieces hit-tested against
//! their traced alpha boundary) and **drawings** (freehand polylines) on
//! integer-keyed layers. Within a layer elements keep insertion order and
//! newly added ones go on top; layers render in ascending key order, so the
//! highest key paints last.
//!
//! The scene answers the two spatial questions an editor needs, point
//! ([`Scene::elements_at`]) and region ([`Scene::elements_in_rect`]), in
//! view-space coordinates against the same [`GridView`] transform that
//! rendering uses. [`Scene::render`] replays the whole board onto any
//! [`Surface`] implementation: grid, layers bottom to top, then overlay
//! graphics such as a selection marquee.
//!
//! Property changes (position, size, title, image, path) accumulate as
//! [`ModifiedEvent`]s for callers to drain with [`Scene::take_events`],
//! e.g. to forward over a wire to other participants.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use baize_imaging::AlphaImage;
//! use baize_scene::{LayerKey, Scene};
//! use kurbo::{Point, Size};
//!
//! let mut scene = Scene::new(Size::new(800.0, 600.0));
//! let knight = scene.create_token(
//!     LayerKey(2),
//!     Arc::new(AlphaImage::solid(32, 32)),
//!     Point::ZERO,
//! )?;
//!
//! let hit = scene.top_element_at(Point::new(16.0, 16.0), None)?;
//! assert_eq!(hit, Some(knight));
//! assert_eq!(scene.top_element_at(Point::new(99.0, 99.0), None)?, None);
//! # Ok::<_, baize_scene::SceneError>(())
//! ```
//!
//! This crate is `no_std`.
//!
//! [`GridView`]: baize_view2d::GridView
//! [`Surface`]: baize_imaging::Surface

#![no_std]

extern crate alloc;

mod element;
mod error;
mod graphic;
mod scene;
mod types;

pub use error::SceneError;
pub use graphic::{Graphic, GraphicStrategy};
pub use scene::Scene;
pub use types::{ElementChange, ElementId, ElementKind, LayerKey, ModifiedEvent};
