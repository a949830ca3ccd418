// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One editing session: a scene, a selection, and the active tool.

use baize_scene::{ElementId, LayerKey, Scene};
use kurbo::{Point, Size};

use crate::events::{KeyEvent, PointerButton, PointerEvent, WheelEvent};
use crate::selection::Selection;
use crate::tools::{Tool, ToolKind};

/// Layer hosting drawings in progress. Created with the session; its key is
/// above any layer the embedder would reasonably use, so drawings land on
/// top of the board.
pub const DRAW_LAYER: LayerKey = LayerKey(99);

/// Scale change applied per wheel step.
const ZOOM_SPEED: f64 = 0.1;
/// Zoom stops stepping up once it would pass this scale.
const ZOOM_MAX: f64 = 3.5;
/// Zoom stops stepping down once it would pass this scale.
const ZOOM_MIN: f64 = 0.5;

/// An interactive editing session over one [`Scene`].
///
/// The session is the input side of the board: the embedder feeds it
/// pointer, wheel, and key events in view coordinates, and it drives the
/// scene through the active tool. It owns what the tools share, the
/// selection set and the snap-to-grid setting, and handles the two gestures
/// that belong to no tool: middle-button panning and wheel zoom.
///
/// Store errors raised by tool gestures are absorbed here and logged; a
/// rejected mutation leaves scene and selection in their prior state. The
/// embedder renders by calling [`Scene::render`] between events, and
/// observes model changes through [`Scene::take_events`] and the selection
/// [`revision`](Selection::revision).
#[derive(Debug)]
pub struct Session {
    scene: Scene,
    selection: Selection,
    tool: Tool,
    snap_to_grid: bool,
    scroll_drag: bool,
    last_pointer: Point,
}

impl Session {
    /// Creates a session over an empty scene with the given viewport.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self::with_scene(Scene::new(viewport))
    }

    /// Creates a session over an existing scene.
    ///
    /// The draw layer is registered if the scene does not have it yet. The
    /// move tool starts active and snap-to-grid starts enabled.
    #[must_use]
    pub fn with_scene(mut scene: Scene) -> Self {
        if !scene.has_layer(DRAW_LAYER)
            && let Err(err) = scene.create_layer(DRAW_LAYER)
        {
            log::warn!("draw layer not created: {err}");
        }
        Self {
            scene,
            selection: Selection::new(),
            tool: Tool::from_kind(ToolKind::Move),
            snap_to_grid: true,
            scroll_drag: false,
            last_pointer: Point::ZERO,
        }
    }

    /// The scene this session edits.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene, for model edits outside any gesture.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Which tool is active.
    #[must_use]
    pub fn tool_kind(&self) -> ToolKind {
        self.tool.kind()
    }

    /// Switches the active tool, resetting any gesture in progress.
    ///
    /// Selecting the already-active tool keeps its state. The selection
    /// survives tool switches.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() == kind {
            return;
        }
        self.tool.abort(&mut self.scene);
        self.tool = Tool::from_kind(kind);
    }

    /// Whether dragged elements snap to the grid on release.
    #[must_use]
    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    /// Enables or disables snap-to-grid for subsequent drags.
    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.snap_to_grid = snap;
    }

    /// Selects an element, as if clicked.
    pub fn select(&mut self, id: ElementId) {
        self.selection.select(&mut self.scene, id);
    }

    /// Deselects an element.
    pub fn deselect(&mut self, id: ElementId) {
        self.selection.deselect(&mut self.scene, id);
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.scene);
    }

    // --- Event entry points ---

    /// Feeds a pointer press.
    ///
    /// A middle-button press starts a view pan; every press is also handed
    /// to the active tool together with the topmost element under the
    /// pointer.
    pub fn on_pointer_down(&mut self, event: PointerEvent) {
        let hit = self.hit_at(event.pos);
        if event.button == PointerButton::Middle {
            self.scroll_drag = true;
        }
        self.tool
            .on_pointer_down(&mut self.scene, &mut self.selection, event, hit);
    }

    /// Feeds a pointer movement.
    ///
    /// While a middle-button pan is active the movement shifts the view and
    /// the tool sees nothing; otherwise the tool receives the event plus
    /// the previous pointer position.
    pub fn on_pointer_move(&mut self, event: PointerEvent) {
        if self.scroll_drag {
            let delta = event.pos - self.last_pointer;
            let world = self.scene.view().view_to_world_vec(delta);
            self.scene.view_mut().pan_by(world);
        } else {
            self.tool.on_pointer_move(
                &mut self.scene,
                &mut self.selection,
                event,
                self.last_pointer,
            );
        }
        self.last_pointer = event.pos;
    }

    /// Feeds a pointer release, ending a pan or completing a tool gesture.
    pub fn on_pointer_up(&mut self, event: PointerEvent) {
        if event.button == PointerButton::Middle && self.scroll_drag {
            self.scroll_drag = false;
        }
        self.tool.on_pointer_up(
            &mut self.scene,
            &mut self.selection,
            self.snap_to_grid,
            event,
        );
    }

    /// Feeds a wheel step, zooming the view about its origin.
    ///
    /// Wheel-up zooms in. The step is skipped entirely when it would carry
    /// the scale past the zoom bounds, so repeated scrolling settles just
    /// inside them and the scale stays valid.
    pub fn on_wheel(&mut self, event: WheelEvent) {
        let dir = if event.delta_y == 0.0 {
            0.0
        } else {
            -event.delta_y.signum()
        };
        let scale = self.scene.view().scale();
        let mut speed = ZOOM_SPEED;
        if (scale + speed >= ZOOM_MAX && dir > 0.0) || (scale - speed <= ZOOM_MIN && dir < 0.0) {
            speed = 0.0;
        }
        if let Err(err) = self.scene.view_mut().set_scale(scale + speed * dir) {
            log::warn!("wheel zoom rejected: {err}");
        }
    }

    /// Feeds a key release to the active tool.
    pub fn on_key_up(&mut self, event: KeyEvent) {
        self.tool.on_key_up(&mut self.scene, event);
    }

    // --- Widget-facing helpers ---

    /// Widens the most recently selected element by a view-space delta.
    ///
    /// Backs an external resize handle: the delta is divided by the scale
    /// so the edge tracks the pointer on screen. Height is untouched.
    pub fn resize_selected_by(&mut self, view_dx: f64) {
        let Some(id) = self.selection.last() else {
            return;
        };
        match self.scene.size(id) {
            Ok(size) => {
                let width = size.width + view_dx / self.scene.view().scale();
                if let Err(err) = self.scene.set_size(id, Size::new(width, size.height)) {
                    log::warn!("resize failed: {err}");
                }
            }
            Err(err) => log::warn!("resize skipped: {err}"),
        }
    }

    /// Snaps the most recently selected element's width to a whole number
    /// of grid cells, ending a resize gesture.
    ///
    /// No-op when the grid is disabled.
    pub fn finish_resize(&mut self) {
        let Some(id) = self.selection.last() else {
            return;
        };
        match self.scene.size(id) {
            Ok(size) => {
                let snapped = self.scene.view().snap_to_grid(Point::new(size.width, 0.0)).x;
                if let Err(err) = self.scene.set_size(id, Size::new(snapped, size.height)) {
                    log::warn!("resize snap failed: {err}");
                }
            }
            Err(err) => log::warn!("resize snap skipped: {err}"),
        }
    }

    /// Retitles the most recently selected element, backing an external
    /// title editor.
    pub fn retitle_selected(&mut self, title: &str) {
        let Some(id) = self.selection.last() else {
            return;
        };
        if let Err(err) = self.scene.set_title(id, title) {
            log::warn!("retitle failed: {err}");
        }
    }

    fn hit_at(&self, pos: Point) -> Option<ElementId> {
        match self.scene.top_element_at(pos, None) {
            Ok(hit) => hit,
            Err(err) => {
                log::warn!("hit test failed: {err}");
                None
            }
        }
    }
}
