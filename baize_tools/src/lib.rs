// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Baize Tools: the interaction layer over a [`Scene`].
//!
//! A [`Session`] turns raw pointer, wheel, and key events (view
//! coordinates, as a host window would report them) into board edits. It
//! owns the scene, the [`Selection`], and one active tool:
//!
//! - [`ToolKind::Move`]: click to select, drag to move, shift-click to
//!   extend; dragged elements snap to the grid on release.
//! - [`ToolKind::RectSelect`]: drag a marquee rectangle and select every
//!   element it overlaps; doubles as a move tool once a selection exists.
//! - [`ToolKind::Draw`]: press and move to grow a freehand polyline,
//!   shift-click to place single points, `c` to close it.
//!
//! Independent of the tool, the middle button pans the view and the wheel
//! zooms it. Selected elements carry a red outline graphic; the marquee
//! shows up as a scene overlay while it is being dragged.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use baize_imaging::AlphaImage;
//! use baize_scene::LayerKey;
//! use baize_tools::{PointerButton, PointerEvent, Session};
//! use kurbo::{Point, Size};
//!
//! let mut session = Session::new(Size::new(800.0, 600.0));
//! let pawn = session.scene_mut().create_token(
//!     LayerKey(2),
//!     Arc::new(AlphaImage::solid(64, 64)),
//!     Point::ZERO,
//! )?;
//!
//! // Click the token with the default move tool.
//! let press = PointerEvent::new(Point::new(32.0, 32.0), PointerButton::Primary);
//! session.on_pointer_down(press);
//! session.on_pointer_up(press);
//! assert_eq!(session.selection().items(), [pawn]);
//! # Ok::<_, baize_scene::SceneError>(())
//! ```
//!
//! This crate is `no_std`.
//!
//! [`Scene`]: baize_scene::Scene

#![no_std]

extern crate alloc;

mod events;
mod selection;
mod session;
mod tools;

pub use events::{KeyEvent, PointerButton, PointerEvent, WheelEvent};
pub use selection::{SELECTED_OUTLINE_TAG, Selection};
pub use session::{DRAW_LAYER, Session};
pub use tools::{MARQUEE_TAG, ToolKind};
