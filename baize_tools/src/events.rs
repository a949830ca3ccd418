// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input event types fed into a [`Session`].
//!
//! All positions are view-space coordinates of the render target; the
//! session and tools convert to world space where needed.
//!
//! [`Session`]: crate::Session

use kurbo::Point;

/// Pointer button identity, mirroring the usual device numbering.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PointerButton {
    /// Button 0, usually the left button. Tools act on this one.
    Primary,
    /// Button 1, usually the wheel button. Held down it pans the view.
    Middle,
    /// Button 2, usually the right button. Currently ignored.
    Secondary,
}

/// One pointer transition or movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in view space.
    pub pos: Point,
    /// Button that changed, or the most relevant held button for moves.
    pub button: PointerButton,
    /// Whether a shift modifier was held.
    pub shift: bool,
}

impl PointerEvent {
    /// Creates a pointer event without modifiers.
    #[must_use]
    pub const fn new(pos: Point, button: PointerButton) -> Self {
        Self {
            pos,
            button,
            shift: false,
        }
    }

    /// Same event with the shift modifier held.
    #[must_use]
    pub const fn shifted(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// One wheel step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    /// Scroll amount; negative values zoom in, matching wheel-up.
    pub delta_y: f64,
}

/// One key release.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct KeyEvent {
    /// The released key as a character.
    pub key: char,
}
