// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection bookkeeping for one editing session.

use alloc::vec::Vec;

use baize_imaging::{Color, StrokeStyle};
use baize_scene::{ElementId, Graphic, GraphicStrategy, Scene, SceneError};

/// Tag of the outline graphic attached to every selected element.
pub const SELECTED_OUTLINE_TAG: &str = "selected_outline";

fn outline() -> Graphic {
    Graphic::new(
        SELECTED_OUTLINE_TAG,
        GraphicStrategy::BoundaryOutline(StrokeStyle::new(
            Color::from_rgba8(255, 0, 0, 255),
            2.0,
        )),
    )
}

/// The ordered set of selected elements.
///
/// Keys are kept in selection order with uniqueness enforced by equality, so
/// the last item is the most recently selected one. A monotonically
/// increasing revision counter bumps on every change, giving observers a
/// cheap "did anything change?" marker without comparing contents.
///
/// Mutations go through the scene: entering the selection asks the element
/// via [`Scene::on_selected`] and attaches the red selection outline;
/// leaving it notifies [`Scene::on_deselected`] and removes the outline.
/// Scene refusals are logged and leave the selection consistent, so a stale
/// handle can always be dropped even after its element is gone.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    items: Vec<ElementId>,
    revision: u64,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            revision: 0,
        }
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of selected elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The selected elements in selection order.
    #[must_use]
    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    /// Iterates over the selected elements in selection order.
    pub fn iter(&self) -> core::slice::Iter<'_, ElementId> {
        self.items.iter()
    }

    /// Whether the element is currently selected.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.items.contains(&id)
    }

    /// The most recently selected element, if any.
    #[must_use]
    pub fn last(&self) -> Option<ElementId> {
        self.items.last().copied()
    }

    /// The current revision counter.
    ///
    /// Bumped once per element entering or leaving the selection.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Adds an element to the selection if the scene accepts.
    ///
    /// No-op when already selected. On acceptance the element gets the
    /// selection outline attached and may reorder itself within its layer
    /// (tokens move to the top).
    pub fn select(&mut self, scene: &mut Scene, id: ElementId) {
        if self.items.contains(&id) {
            return;
        }
        match scene.on_selected(id) {
            Ok(true) => {
                if let Err(err) = scene.attach_graphic(id, outline()) {
                    log::warn!("selection outline not attached: {err}");
                }
                self.items.push(id);
                self.revision += 1;
            }
            Ok(false) => {}
            Err(err) => log::warn!("element cannot be selected: {err}"),
        }
    }

    /// Drops an element from the selection, detaching its outline.
    ///
    /// No-op when not selected. The element is dropped from the list even
    /// if the scene no longer knows it.
    pub fn deselect(&mut self, scene: &mut Scene, id: ElementId) {
        let Some(at) = self.items.iter().position(|&item| item == id) else {
            return;
        };
        match scene.on_deselected(id) {
            Ok(_) => {
                if let Err(err) = scene.remove_graphic(id, SELECTED_OUTLINE_TAG) {
                    log::warn!("selection outline not removed: {err}");
                }
            }
            // The element is gone from the scene; its outline went with it.
            Err(SceneError::ElementNotFound(_)) => {}
            Err(err) => log::warn!("deselect notification failed: {err}"),
        }
        self.items.remove(at);
        self.revision += 1;
    }

    /// Deselects everything, element by element in selection order.
    pub fn clear(&mut self, scene: &mut Scene) {
        for id in self.items.clone() {
            self.deselect(scene, id);
        }
    }
}
