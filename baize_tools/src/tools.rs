// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interaction tools and their per-gesture state.

use baize_imaging::StrokeStyle;
use baize_scene::{ElementId, Graphic, GraphicStrategy, Scene};
use kurbo::{Point, Rect};

use crate::events::{KeyEvent, PointerButton, PointerEvent};
use crate::selection::Selection;
use crate::session::DRAW_LAYER;

/// Tag of the marquee overlay while a rectangle selection is in progress.
pub const MARQUEE_TAG: &str = "selection_marquee";

/// Which interaction tool is active in a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ToolKind {
    /// Click to select, drag to move elements.
    Move,
    /// Drag a marquee over empty board to select a region.
    RectSelect,
    /// Freehand drawing onto the dedicated draw layer.
    Draw,
}

/// The active tool with its gesture state.
#[derive(Debug)]
pub(crate) enum Tool {
    Move(MoveTool),
    RectSelect(RectSelectTool),
    Draw(DrawTool),
}

impl Tool {
    pub(crate) fn from_kind(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Move => Self::Move(MoveTool::default()),
            ToolKind::RectSelect => Self::RectSelect(RectSelectTool::default()),
            ToolKind::Draw => Self::Draw(DrawTool::default()),
        }
    }

    pub(crate) fn kind(&self) -> ToolKind {
        match self {
            Self::Move(_) => ToolKind::Move,
            Self::RectSelect(_) => ToolKind::RectSelect,
            Self::Draw(_) => ToolKind::Draw,
        }
    }

    pub(crate) fn on_pointer_down(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        event: PointerEvent,
        hit: Option<ElementId>,
    ) {
        match self {
            Self::Move(tool) => tool.on_pointer_down(scene, selection, event, hit),
            Self::RectSelect(tool) => tool.on_pointer_down(scene, selection, event, hit),
            Self::Draw(tool) => tool.on_pointer_down(scene, event),
        }
    }

    pub(crate) fn on_pointer_move(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        event: PointerEvent,
        last_pos: Point,
    ) {
        match self {
            Self::Move(tool) => tool.on_pointer_move(scene, selection, event, last_pos),
            Self::RectSelect(tool) => tool.on_pointer_move(scene, selection, event, last_pos),
            Self::Draw(tool) => tool.on_pointer_move(scene, selection, event, last_pos),
        }
    }

    pub(crate) fn on_pointer_up(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        snap_to_grid: bool,
        event: PointerEvent,
    ) {
        match self {
            Self::Move(tool) => tool.on_pointer_up(scene, selection, snap_to_grid, event),
            Self::RectSelect(tool) => tool.on_pointer_up(scene, selection, snap_to_grid, event),
            Self::Draw(tool) => tool.on_pointer_up(event),
        }
    }

    pub(crate) fn on_key_up(&mut self, scene: &mut Scene, event: KeyEvent) {
        if let Self::Draw(tool) = self {
            tool.on_key_up(scene, event);
        }
    }

    /// Drops in-progress gesture artifacts before the tool is replaced.
    ///
    /// An unfinished drawing stays on the board; only transient overlays go.
    pub(crate) fn abort(&mut self, scene: &mut Scene) {
        if let Self::RectSelect(tool) = self
            && tool.marquee.take().is_some()
            && let Err(err) = scene.remove_overlay(MARQUEE_TAG)
        {
            log::warn!("marquee overlay not removed: {err}");
        }
    }
}

/// Snaps an element's position to the grid, in place.
fn snap_element(scene: &mut Scene, id: ElementId) {
    match scene.position(id) {
        Ok(position) => {
            let snapped = scene.view().snap_to_grid(position);
            if let Err(err) = scene.set_position(id, snapped) {
                log::warn!("grid snap failed: {err}");
            }
        }
        Err(err) => log::warn!("grid snap skipped: {err}"),
    }
}

/// Click-to-select and drag-to-move.
///
/// A press records the hit element; any movement while pressed turns the
/// gesture into a drag of that element (and of the whole selection when the
/// press started on a selected element or with shift held). A release
/// without movement is a plain click that selects only the pressed element.
#[derive(Debug, Default)]
pub(crate) struct MoveTool {
    pressed: Option<ElementId>,
    drag_selection: bool,
    dragging: bool,
}

impl MoveTool {
    fn on_pointer_down(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        event: PointerEvent,
        hit: Option<ElementId>,
    ) {
        if event.button != PointerButton::Primary {
            return;
        }
        match hit {
            None => selection.clear(scene),
            Some(id) => {
                if !selection.contains(id) && !event.shift {
                    selection.clear(scene);
                }
                self.pressed = Some(id);
                // Note: checked after the clear, so an unselected plain
                // press drags only the pressed element.
                if event.shift || selection.contains(id) {
                    self.drag_selection = true;
                }
            }
        }
    }

    fn on_pointer_move(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        event: PointerEvent,
        last_pos: Point,
    ) {
        let Some(pressed) = self.pressed else {
            return;
        };
        self.dragging = true;
        if self.drag_selection {
            for &id in selection.items() {
                if id == pressed {
                    continue;
                }
                if let Err(err) = scene.drag(id, last_pos, event.pos) {
                    log::warn!("drag skipped: {err}");
                }
            }
        }
        if let Err(err) = scene.drag(pressed, last_pos, event.pos) {
            log::warn!("drag skipped: {err}");
        }
    }

    fn on_pointer_up(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        snap_to_grid: bool,
        event: PointerEvent,
    ) {
        if event.button != PointerButton::Primary {
            return;
        }
        let Some(pressed) = self.pressed else {
            return;
        };

        if !self.dragging {
            if !event.shift {
                selection.clear(scene);
            }
            selection.select(scene, pressed);
        }

        if self.dragging && snap_to_grid {
            if self.drag_selection {
                for &id in selection.items() {
                    snap_element(scene, id);
                }
            }
            snap_element(scene, pressed);
        }

        self.pressed = None;
        self.dragging = false;
        self.drag_selection = false;
    }
}

/// Marquee selection over empty board, move-tool behavior on elements.
///
/// Composes [`MoveTool`]: once a marquee selection exists, a press on an
/// element is delegated wholesale, so the freshly selected group can be
/// dragged without switching tools.
#[derive(Debug, Default)]
pub(crate) struct RectSelectTool {
    move_tool: MoveTool,
    /// Anchor corner of the marquee in view space, while one is open.
    marquee: Option<Point>,
    selection_made: bool,
}

impl RectSelectTool {
    fn on_pointer_down(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        event: PointerEvent,
        hit: Option<ElementId>,
    ) {
        if event.button != PointerButton::Primary {
            return;
        }
        if self.selection_made && hit.is_some() {
            self.marquee = None;
            self.move_tool.on_pointer_down(scene, selection, event, hit);
            return;
        }

        selection.clear(scene);
        self.selection_made = false;
        self.marquee = Some(event.pos);
        let rect = Rect::from_points(event.pos, event.pos);
        if let Err(err) = scene.add_overlay(Graphic::new(
            MARQUEE_TAG,
            GraphicStrategy::ViewRect {
                rect,
                style: StrokeStyle::default(),
            },
        )) {
            log::warn!("marquee overlay not added: {err}");
        }
    }

    fn on_pointer_move(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        event: PointerEvent,
        last_pos: Point,
    ) {
        self.move_tool
            .on_pointer_move(scene, selection, event, last_pos);
        if !selection.is_empty() {
            return;
        }
        if let Some(start) = self.marquee
            && let Some(overlay) = scene.overlay_mut(MARQUEE_TAG)
        {
            overlay.strategy = GraphicStrategy::ViewRect {
                // Corner order does not matter; the rect normalizes.
                rect: Rect::from_points(start, event.pos),
                style: StrokeStyle::default(),
            };
        }
    }

    fn on_pointer_up(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        snap_to_grid: bool,
        event: PointerEvent,
    ) {
        self.move_tool
            .on_pointer_up(scene, selection, snap_to_grid, event);
        if event.button != PointerButton::Primary {
            return;
        }
        let Some(start) = self.marquee.take() else {
            return;
        };

        if let Err(err) = scene.remove_overlay(MARQUEE_TAG) {
            log::warn!("marquee overlay not removed: {err}");
        }
        for id in scene.elements_in_rect(Rect::from_points(start, event.pos)) {
            selection.select(scene, id);
        }
        self.selection_made = true;
    }
}

/// Freehand drawing onto the draw layer.
///
/// A press arms the gesture; the next movement creates the drawing at the
/// pointer and selects it. While drawing, every movement appends the
/// trailing pointer position, shift-clicks append single points, and the
/// first movement after a release (without shift) ends the gesture. A
/// `c` key release closes the path onto its anchor and ends it.
#[derive(Debug)]
pub(crate) struct DrawTool {
    pending_begin: bool,
    drawing: Option<ElementId>,
    pointer_released: bool,
}

impl Default for DrawTool {
    fn default() -> Self {
        Self {
            pending_begin: false,
            drawing: None,
            pointer_released: true,
        }
    }
}

impl DrawTool {
    fn on_key_up(&mut self, scene: &mut Scene, event: KeyEvent) {
        if !matches!(event.key, 'c' | 'C') {
            return;
        }
        let Some(id) = self.drawing.take() else {
            return;
        };
        if let Err(err) = scene.close_drawing(id) {
            log::warn!("drawing not closed: {err}");
        }
    }

    fn on_pointer_down(&mut self, scene: &mut Scene, event: PointerEvent) {
        if event.button != PointerButton::Primary {
            return;
        }
        if let Some(id) = self.drawing {
            if event.shift {
                let point = scene.view().view_to_world_point(event.pos);
                if let Err(err) = scene.add_drawing_point(id, point) {
                    log::warn!("drawing point skipped: {err}");
                }
            }
        } else {
            self.pending_begin = true;
        }
        self.pointer_released = false;
    }

    fn on_pointer_move(
        &mut self,
        scene: &mut Scene,
        selection: &mut Selection,
        event: PointerEvent,
        last_pos: Point,
    ) {
        if self.drawing.is_some() && !event.shift && self.pointer_released {
            self.drawing = None;
        }
        if let Some(id) = self.drawing {
            if !event.shift {
                let point = scene.view().view_to_world_point(last_pos);
                if let Err(err) = scene.add_drawing_point(id, point) {
                    log::warn!("drawing point skipped: {err}");
                }
            }
        } else if self.pending_begin {
            self.pending_begin = false;
            let start = scene.view().view_to_world_point(event.pos);
            match scene.create_drawing(DRAW_LAYER, start) {
                Ok(id) => {
                    self.drawing = Some(id);
                    selection.clear(scene);
                    selection.select(scene, id);
                }
                Err(err) => log::warn!("drawing not started: {err}"),
            }
        }
    }

    fn on_pointer_up(&mut self, event: PointerEvent) {
        if event.button != PointerButton::Primary {
            return;
        }
        if self.drawing.is_some() {
            self.pointer_released = true;
        }
    }
}
