// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public identifier and notification types for the scene.

use core::fmt;

/// Identifier for an element in a [`Scene`](crate::Scene).
///
/// This is a small, copyable handle that stays stable across updates but
/// becomes invalid when the underlying slot is reused. It consists of a slot
/// index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On removal, the slot is freed; any existing `ElementId` that pointed to
///   that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `ElementId`.
///
/// Stale `ElementId`s never alias a different live element because the
/// generation must match; every scene operation taking a stale handle fails
/// with [`SceneError::ElementNotFound`](crate::SceneError::ElementNotFound).
/// The generation never decreases; `u32` is ample for practical lifetimes and
/// behavior on generation overflow is unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Sort key of a layer.
///
/// Layers render in ascending key order, so a higher key paints over a lower
/// one. Keys accepted by the scene are zero or positive; the key is the
/// layer's identity and is immutable after creation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LayerKey(pub i32);

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which variant an element is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementKind {
    /// An image-backed token.
    Token,
    /// An incrementally built freehand polyline.
    Drawing,
}

/// Which property of an element changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementChange {
    /// The world-space position moved.
    Position,
    /// The logical width or height changed.
    Size,
    /// The display title changed.
    Title,
    /// A token's backing image was replaced.
    Image,
    /// A drawing gained a path point.
    Path,
}

/// One property-change notification.
///
/// The scene records a `ModifiedEvent` for every mutating property set, in
/// mutation order, until the embedder drains them with
/// [`Scene::take_events`](crate::Scene::take_events).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ModifiedEvent {
    /// Key of the layer owning the element at the time of the change.
    pub layer: LayerKey,
    /// The element that changed.
    pub element: ElementId,
    /// Which property changed.
    pub change: ElementChange,
}
