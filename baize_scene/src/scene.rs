// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The board itself: layers, the element arena, spatial queries, and
//! rendering.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use baize_imaging::{RasterImage, StrokeStyle, Surface, SurfaceOp, path_contains};
use baize_view2d::GridView;
use kurbo::{BezPath, Point, Rect, Size};
use smallvec::SmallVec;

use crate::element::{DrawingState, Payload, TokenState};
use crate::error::SceneError;
use crate::graphic::{Graphic, GraphicStrategy};
use crate::types::{ElementChange, ElementId, ElementKind, LayerKey, ModifiedEvent};

/// One element plus its place in the owning layer's render chain.
///
/// `prev`/`next` are slot indices forming a doubly linked list per layer, so
/// removal and move-to-top relink in constant time without disturbing the
/// relative order of other elements.
struct ElementData {
    layer: LayerKey,
    prev: Option<u32>,
    next: Option<u32>,
    position: Point,
    size: Size,
    title: String,
    graphics: SmallVec<[Graphic; 2]>,
    payload: Payload,
}

/// Arena slot. The generation survives frees so stale handles miss.
struct Slot {
    generation: u32,
    data: Option<ElementData>,
}

/// A layer's endpoints into the slot arena.
///
/// The chain runs head to tail in render order; the tail element paints last
/// and is therefore visually on top.
struct LayerState {
    key: LayerKey,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl LayerState {
    const fn new(key: LayerKey) -> Self {
        Self {
            key,
            head: None,
            tail: None,
            len: 0,
        }
    }
}

/// A layered board of tokens and drawings with one shared view transform.
///
/// The scene owns its elements. Factory operations hand out [`ElementId`]
/// handles and every other operation takes one; a handle whose element was
/// removed fails with [`SceneError::ElementNotFound`] rather than aliasing
/// anything else.
///
/// Rendering and the spatial queries read the same [`GridView`] snapshot, so
/// what a query reports under a transform is what a render pass under that
/// transform paints.
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Sorted by key at all times.
    layers: Vec<LayerState>,
    view: GridView,
    viewport: Size,
    overlays: Vec<Graphic>,
    events: Vec<ModifiedEvent>,
}

impl Scene {
    /// Creates an empty scene rendering into a viewport of the given
    /// view-space size.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            layers: Vec::new(),
            view: GridView::new(),
            viewport,
            overlays: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The active view transform.
    #[must_use]
    pub fn view(&self) -> &GridView {
        &self.view
    }

    /// Mutable access to the view transform for panning and zooming.
    pub fn view_mut(&mut self) -> &mut GridView {
        &mut self.view
    }

    /// The view-space size of the render target.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Replaces the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    // --- Layer registry ---

    /// Registers an empty layer under `key`.
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidLayerKey`] if `key` is negative, and
    /// [`SceneError::LayerAlreadyExists`] if the key is taken.
    pub fn create_layer(&mut self, key: LayerKey) -> Result<(), SceneError> {
        if key.0 < 0 {
            return Err(SceneError::InvalidLayerKey(key));
        }
        match self.layers.binary_search_by_key(&key, |layer| layer.key) {
            Ok(_) => Err(SceneError::LayerAlreadyExists(key)),
            Err(at) => {
                self.layers.insert(at, LayerState::new(key));
                Ok(())
            }
        }
    }

    /// Whether a layer with this key exists.
    #[must_use]
    pub fn has_layer(&self, key: LayerKey) -> bool {
        self.layer_index(key).is_some()
    }

    /// All layer keys in ascending order.
    pub fn layer_keys(&self) -> impl Iterator<Item = LayerKey> + '_ {
        self.layers.iter().map(|layer| layer.key)
    }

    /// Number of elements in a layer, or `None` if the layer does not exist.
    #[must_use]
    pub fn layer_len(&self, key: LayerKey) -> Option<usize> {
        self.layer_index(key).map(|at| self.layers[at].len)
    }

    /// The elements of a layer in render order (topmost last).
    ///
    /// # Errors
    ///
    /// [`SceneError::LayerNotFound`] if no layer has this key.
    pub fn layer_elements(
        &self,
        key: LayerKey,
    ) -> Result<impl Iterator<Item = ElementId> + '_, SceneError> {
        let at = self.layer_index(key).ok_or(SceneError::LayerNotFound(key))?;
        let mut cursor = self.layers[at].head;
        Ok(core::iter::from_fn(move || {
            let slot = cursor?;
            let data = self.slots[slot as usize].data.as_ref()?;
            cursor = data.next;
            Some(ElementId::new(slot, self.slots[slot as usize].generation))
        }))
    }

    // --- Factories ---

    /// Creates a token sized to its image's pixel dimensions.
    ///
    /// The target layer is created on first use. Returns the new element's
    /// handle; the token appends at the top of the layer.
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidLayerKey`] if `layer` is negative.
    ///
    /// # Panics
    ///
    /// Panics if the scene has exhausted its element slots.
    pub fn create_token(
        &mut self,
        layer: LayerKey,
        image: Arc<dyn RasterImage>,
        position: Point,
    ) -> Result<ElementId, SceneError> {
        let size = Size::new(f64::from(image.width()), f64::from(image.height()));
        self.create_token_with_size(layer, image, position, size)
    }

    /// Creates a token with an explicit logical size.
    ///
    /// The boundary used for hit testing is traced at this logical size, not
    /// at the image's pixel dimensions.
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidLayerKey`] if `layer` is negative.
    ///
    /// # Panics
    ///
    /// Panics if the scene has exhausted its element slots.
    pub fn create_token_with_size(
        &mut self,
        layer: LayerKey,
        image: Arc<dyn RasterImage>,
        position: Point,
        size: Size,
    ) -> Result<ElementId, SceneError> {
        let at = self.ensure_layer(layer)?;
        let id = self.alloc(ElementData {
            layer,
            prev: None,
            next: None,
            position,
            size,
            title: String::new(),
            graphics: SmallVec::new(),
            payload: Payload::Token(TokenState::new(image)),
        });
        self.link_at_tail(at, id.0);
        Ok(id)
    }

    /// Creates a drawing anchored at its first point.
    ///
    /// The target layer is created on first use. Further points accumulate
    /// through [`Scene::add_drawing_point`].
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidLayerKey`] if `layer` is negative.
    ///
    /// # Panics
    ///
    /// Panics if the scene has exhausted its element slots.
    pub fn create_drawing(
        &mut self,
        layer: LayerKey,
        first_point: Point,
    ) -> Result<ElementId, SceneError> {
        let at = self.ensure_layer(layer)?;
        let id = self.alloc(ElementData {
            layer,
            prev: None,
            next: None,
            position: first_point,
            size: Size::ZERO,
            title: String::new(),
            graphics: SmallVec::new(),
            payload: Payload::Drawing(DrawingState::new()),
        });
        self.link_at_tail(at, id.0);
        Ok(id)
    }

    // --- Element accessors ---

    /// Whether `id` refers to a live element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.data(id).is_ok()
    }

    /// Which variant the element is.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn element_kind(&self, id: ElementId) -> Result<ElementKind, SceneError> {
        Ok(self.data(id)?.payload.kind())
    }

    /// Key of the layer owning the element.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn layer_of(&self, id: ElementId) -> Result<LayerKey, SceneError> {
        Ok(self.data(id)?.layer)
    }

    /// World-space position (the element's anchor).
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn position(&self, id: ElementId) -> Result<Point, SceneError> {
        Ok(self.data(id)?.position)
    }

    /// Logical width and height in world units.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn size(&self, id: ElementId) -> Result<Size, SceneError> {
        Ok(self.data(id)?.size)
    }

    /// World-space bounding rectangle from position and size.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn world_bounds(&self, id: ElementId) -> Result<Rect, SceneError> {
        let data = self.data(id)?;
        Ok(Rect::from_origin_size(data.position, data.size))
    }

    /// The element's display title.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn title(&self, id: ElementId) -> Result<&str, SceneError> {
        Ok(&self.data(id)?.title)
    }

    /// The element's boundary as world-space points.
    ///
    /// Tokens trace their image alpha on first access and cache the result;
    /// drawings return their accumulated polyline. Both are translated by
    /// the element's current position.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale, or
    /// [`SceneError::Boundary`] if a token's mask has no opaque pixel.
    pub fn boundary_path(&self, id: ElementId) -> Result<Vec<Point>, SceneError> {
        let data = self.data(id)?;
        self.boundary_points(data)
    }

    // --- Element mutators ---

    /// Moves the element's anchor, notifying observers.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn set_position(&mut self, id: ElementId, position: Point) -> Result<(), SceneError> {
        let data = self.data_mut(id)?;
        data.position = position;
        let layer = data.layer;
        self.notify(layer, id, ElementChange::Position);
        Ok(())
    }

    /// Resizes the element, notifying observers.
    ///
    /// A token's cached boundary is traced for its logical size, so resizing
    /// drops the cache.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn set_size(&mut self, id: ElementId, size: Size) -> Result<(), SceneError> {
        let data = self.data_mut(id)?;
        data.size = size;
        if let Payload::Token(token) = &mut data.payload {
            token.invalidate();
        }
        let layer = data.layer;
        self.notify(layer, id, ElementChange::Size);
        Ok(())
    }

    /// Replaces the element's display title, notifying observers.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn set_title(&mut self, id: ElementId, title: &str) -> Result<(), SceneError> {
        let data = self.data_mut(id)?;
        data.title.clear();
        data.title.push_str(title);
        let layer = data.layer;
        self.notify(layer, id, ElementChange::Title);
        Ok(())
    }

    /// Replaces a token's backing image, notifying observers.
    ///
    /// The logical size is kept; the cached boundary is dropped.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale, or
    /// [`SceneError::NotAToken`] for a drawing.
    pub fn set_token_image(
        &mut self,
        id: ElementId,
        image: Arc<dyn RasterImage>,
    ) -> Result<(), SceneError> {
        let data = self.data_mut(id)?;
        let Payload::Token(token) = &mut data.payload else {
            return Err(SceneError::NotAToken(id));
        };
        token.set_image(image);
        let layer = data.layer;
        self.notify(layer, id, ElementChange::Image);
        Ok(())
    }

    /// Appends a world-space point to a drawing, notifying observers.
    ///
    /// The drawing's anchor recenters onto the min corner of the accumulated
    /// points and its size becomes their span, both recomputed from the full
    /// set. The points themselves keep their world positions.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale, or
    /// [`SceneError::NotADrawing`] for a token.
    pub fn add_drawing_point(&mut self, id: ElementId, point: Point) -> Result<(), SceneError> {
        let data = self.data_mut(id)?;
        let Payload::Drawing(drawing) = &mut data.payload else {
            return Err(SceneError::NotADrawing(id));
        };
        let offset = point - data.position;
        let (shift, size) = drawing.append(offset);
        data.position += shift;
        data.size = size;
        let layer = data.layer;
        self.notify(layer, id, ElementChange::Path);
        Ok(())
    }

    /// Closes a drawing's polyline by appending its anchor point.
    ///
    /// The anchor is the min corner of the accumulated points, so closing
    /// never moves it.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale, or
    /// [`SceneError::NotADrawing`] for a token.
    pub fn close_drawing(&mut self, id: ElementId) -> Result<(), SceneError> {
        let data = self.data(id)?;
        if !matches!(data.payload, Payload::Drawing(_)) {
            return Err(SceneError::NotADrawing(id));
        }
        let anchor = data.position;
        self.add_drawing_point(id, anchor)
    }

    /// Translates the element by a pointer delta given in view space.
    ///
    /// The delta is divided by the current scale, so drag distance in world
    /// units matches what the pointer covered on screen.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn drag(&mut self, id: ElementId, last: Point, current: Point) -> Result<(), SceneError> {
        let delta = (current - last) / self.view.scale();
        let data = self.data_mut(id)?;
        data.position += delta;
        let layer = data.layer;
        self.notify(layer, id, ElementChange::Position);
        Ok(())
    }

    /// Tells the element it was selected. Returns whether it accepts.
    ///
    /// Tokens and drawings always accept; a token additionally moves to the
    /// top of its layer.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn on_selected(&mut self, id: ElementId) -> Result<bool, SceneError> {
        if self.data(id)?.payload.kind() == ElementKind::Token {
            self.move_to_top(id)?;
        }
        Ok(true)
    }

    /// Tells the element it was deselected. Returns whether it accepts.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn on_deselected(&mut self, id: ElementId) -> Result<bool, SceneError> {
        self.data(id)?;
        Ok(true)
    }

    /// Relocates the element to the render-last position of its layer.
    ///
    /// No-op if it is already on top; the relative order of all other
    /// elements is preserved.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale. A failed call
    /// leaves the layer's sequence unchanged.
    pub fn move_to_top(&mut self, id: ElementId) -> Result<(), SceneError> {
        let key = self.data(id)?.layer;
        let at = self.layer_index(key).ok_or(SceneError::LayerNotFound(key))?;
        if self.layers[at].tail == Some(id.0) {
            return Ok(());
        }
        self.unlink(at, id.0);
        self.link_at_tail(at, id.0);
        Ok(())
    }

    /// Removes the element from the scene, freeing its handle.
    ///
    /// Attached graphics are dropped with it. The slot is recycled for later
    /// elements under a new generation, so the removed handle stays dead.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn remove_element(&mut self, id: ElementId) -> Result<(), SceneError> {
        let key = self.data(id)?.layer;
        let at = self.layer_index(key).ok_or(SceneError::LayerNotFound(key))?;
        self.unlink(at, id.0);
        self.slots[id.idx()].data = None;
        self.free.push(id.0);
        Ok(())
    }

    // --- Attached graphics ---

    /// Attaches a graphic to the element. It renders right after the element
    /// every frame and is removed with it.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale, or
    /// [`SceneError::GraphicAlreadyAttached`] if the element already carries
    /// a graphic with the same tag.
    pub fn attach_graphic(&mut self, id: ElementId, graphic: Graphic) -> Result<(), SceneError> {
        let data = self.data_mut(id)?;
        if data.graphics.iter().any(|g| g.tag == graphic.tag) {
            return Err(SceneError::GraphicAlreadyAttached { tag: graphic.tag });
        }
        data.graphics.push(graphic);
        Ok(())
    }

    /// Detaches and returns the element's graphic with this tag.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale, or
    /// [`SceneError::GraphicNotFound`] if no attached graphic has the tag.
    pub fn remove_graphic(&mut self, id: ElementId, tag: &str) -> Result<Graphic, SceneError> {
        let data = self.data_mut(id)?;
        match data.graphics.iter().position(|g| g.tag == tag) {
            Some(at) => Ok(data.graphics.remove(at)),
            None => Err(SceneError::GraphicNotFound { tag: tag.into() }),
        }
    }

    /// The element's attached graphics in render order.
    ///
    /// # Errors
    ///
    /// [`SceneError::ElementNotFound`] if the handle is stale.
    pub fn element_graphics(&self, id: ElementId) -> Result<&[Graphic], SceneError> {
        Ok(&self.data(id)?.graphics)
    }

    // --- Scene overlays ---

    /// Adds a graphic rendered over every layer, such as a marquee.
    ///
    /// # Errors
    ///
    /// [`SceneError::GraphicAlreadyAttached`] if an overlay with the same
    /// tag is present.
    pub fn add_overlay(&mut self, graphic: Graphic) -> Result<(), SceneError> {
        if self.overlays.iter().any(|g| g.tag == graphic.tag) {
            return Err(SceneError::GraphicAlreadyAttached { tag: graphic.tag });
        }
        self.overlays.push(graphic);
        Ok(())
    }

    /// Removes and returns the overlay with this tag.
    ///
    /// # Errors
    ///
    /// [`SceneError::GraphicNotFound`] if no overlay has the tag.
    pub fn remove_overlay(&mut self, tag: &str) -> Result<Graphic, SceneError> {
        match self.overlays.iter().position(|g| g.tag == tag) {
            Some(at) => Ok(self.overlays.remove(at)),
            None => Err(SceneError::GraphicNotFound { tag: tag.into() }),
        }
    }

    /// Mutable access to the overlay with this tag, if present.
    pub fn overlay_mut(&mut self, tag: &str) -> Option<&mut Graphic> {
        self.overlays.iter_mut().find(|g| g.tag == tag)
    }

    /// The current overlays in render order.
    #[must_use]
    pub fn overlays(&self) -> &[Graphic] {
        &self.overlays
    }

    // --- Spatial queries ---

    /// All elements whose boundary contains the view-space point, in render
    /// order (topmost last).
    ///
    /// With a layer key the query is restricted to that layer; otherwise it
    /// runs across all layers in key order.
    ///
    /// # Errors
    ///
    /// [`SceneError::LayerNotFound`] if a named layer does not exist, or
    /// [`SceneError::Boundary`] if a token's boundary cannot be traced.
    pub fn elements_at(
        &self,
        view_point: Point,
        layer: Option<LayerKey>,
    ) -> Result<Vec<ElementId>, SceneError> {
        let mut hits = Vec::new();
        match layer {
            Some(key) => {
                let at = self.layer_index(key).ok_or(SceneError::LayerNotFound(key))?;
                self.collect_hits(&self.layers[at], view_point, &mut hits)?;
            }
            None => {
                for layer in &self.layers {
                    self.collect_hits(layer, view_point, &mut hits)?;
                }
            }
        }
        Ok(hits)
    }

    /// The visually topmost element at the view-space point, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Scene::elements_at`].
    pub fn top_element_at(
        &self,
        view_point: Point,
        layer: Option<LayerKey>,
    ) -> Result<Option<ElementId>, SceneError> {
        Ok(self.elements_at(view_point, layer)?.last().copied())
    }

    /// All elements whose view-space bounding rectangle overlaps `view_rect`.
    ///
    /// A broad-phase test against position and size only; boundaries are not
    /// consulted, so this never fails. Overlap is strict, matching the
    /// marquee semantics: touching edges do not count.
    #[must_use]
    pub fn elements_in_rect(&self, view_rect: Rect) -> Vec<ElementId> {
        let mut out = Vec::new();
        for layer in &self.layers {
            let mut cursor = layer.head;
            while let Some(slot) = cursor {
                let Some(data) = self.slots[slot as usize].data.as_ref() else {
                    break;
                };
                let bounds = self
                    .view
                    .world_to_view_rect(Rect::from_origin_size(data.position, data.size));
                if bounds.x1 > view_rect.x0
                    && bounds.x0 < view_rect.x1
                    && bounds.y1 > view_rect.y0
                    && bounds.y0 < view_rect.y1
                {
                    out.push(ElementId::new(slot, self.slots[slot as usize].generation));
                }
                cursor = data.next;
            }
        }
        out
    }

    // --- Rendering ---

    /// Paints the scene: clear, grid, then each layer in key order with each
    /// element followed by its attached graphics, then the overlays.
    ///
    /// Rendering is a pure function of scene state; two renders with no
    /// mutation in between produce identical surface calls.
    ///
    /// # Errors
    ///
    /// [`SceneError::Boundary`] if a boundary outline's token mask cannot be
    /// traced. The surface is left partially painted in that case.
    pub fn render(&self, surface: &mut dyn Surface) -> Result<(), SceneError> {
        surface.clear();
        surface.set_stroke(StrokeStyle::default());
        self.draw_grid(surface);
        for layer in &self.layers {
            let mut cursor = layer.head;
            while let Some(slot) = cursor {
                let Some(data) = self.slots[slot as usize].data.as_ref() else {
                    break;
                };
                self.render_element(surface, data)?;
                cursor = data.next;
            }
        }
        for graphic in &self.overlays {
            self.render_graphic(surface, graphic, None)?;
        }
        Ok(())
    }

    // --- Change notifications ---

    /// Drains the accumulated property-change notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<ModifiedEvent> {
        core::mem::take(&mut self.events)
    }

    /// The notifications accumulated since the last drain.
    #[must_use]
    pub fn pending_events(&self) -> &[ModifiedEvent] {
        &self.events
    }

    // --- Internals ---

    fn notify(&mut self, layer: LayerKey, element: ElementId, change: ElementChange) {
        self.events.push(ModifiedEvent {
            layer,
            element,
            change,
        });
    }

    fn data(&self, id: ElementId) -> Result<&ElementData, SceneError> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(SceneError::ElementNotFound(id))
    }

    fn data_mut(&mut self, id: ElementId) -> Result<&mut ElementData, SceneError> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(SceneError::ElementNotFound(id))
    }

    fn layer_index(&self, key: LayerKey) -> Option<usize> {
        self.layers
            .binary_search_by_key(&key, |layer| layer.key)
            .ok()
    }

    /// Resolves a layer index, creating the layer if the key is new.
    fn ensure_layer(&mut self, key: LayerKey) -> Result<usize, SceneError> {
        if key.0 < 0 {
            return Err(SceneError::InvalidLayerKey(key));
        }
        match self.layers.binary_search_by_key(&key, |layer| layer.key) {
            Ok(at) => Ok(at),
            Err(at) => {
                self.layers.insert(at, LayerState::new(key));
                Ok(at)
            }
        }
    }

    fn alloc(&mut self, data: ElementData) -> ElementId {
        if let Some(slot) = self.free.pop() {
            let s = &mut self.slots[slot as usize];
            s.generation += 1;
            s.data = Some(data);
            ElementId::new(slot, s.generation)
        } else {
            assert!(
                self.slots.len() < u32::MAX as usize,
                "scene is out of element slots"
            );
            #[expect(clippy::cast_possible_truncation, reason = "checked above")]
            let slot = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                data: Some(data),
            });
            ElementId::new(slot, 1)
        }
    }

    fn link_at_tail(&mut self, at: usize, slot: u32) {
        let old_tail = self.layers[at].tail;
        if let Some(data) = self.slots[slot as usize].data.as_mut() {
            data.prev = old_tail;
            data.next = None;
        }
        match old_tail {
            Some(tail) => {
                if let Some(tail_data) = self.slots[tail as usize].data.as_mut() {
                    tail_data.next = Some(slot);
                }
            }
            None => self.layers[at].head = Some(slot),
        }
        let layer = &mut self.layers[at];
        layer.tail = Some(slot);
        layer.len += 1;
    }

    fn unlink(&mut self, at: usize, slot: u32) {
        let (prev, next) = match self.slots[slot as usize].data.as_ref() {
            Some(data) => (data.prev, data.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(prev_data) = self.slots[p as usize].data.as_mut() {
                    prev_data.next = next;
                }
            }
            None => self.layers[at].head = next,
        }
        match next {
            Some(n) => {
                if let Some(next_data) = self.slots[n as usize].data.as_mut() {
                    next_data.prev = prev;
                }
            }
            None => self.layers[at].tail = prev,
        }
        if let Some(data) = self.slots[slot as usize].data.as_mut() {
            data.prev = None;
            data.next = None;
        }
        self.layers[at].len -= 1;
    }

    fn collect_hits(
        &self,
        layer: &LayerState,
        view_point: Point,
        hits: &mut Vec<ElementId>,
    ) -> Result<(), SceneError> {
        let mut cursor = layer.head;
        while let Some(slot) = cursor {
            let Some(data) = self.slots[slot as usize].data.as_ref() else {
                break;
            };
            let path = view_polyline(&self.view, &self.boundary_points(data)?, true);
            if path_contains(&path, view_point) {
                hits.push(ElementId::new(slot, self.slots[slot as usize].generation));
            }
            cursor = data.next;
        }
        Ok(())
    }

    /// The element's boundary in world space.
    fn boundary_points(&self, data: &ElementData) -> Result<Vec<Point>, SceneError> {
        match &data.payload {
            Payload::Token(token) => {
                let locals = token.boundary(data.size)?;
                Ok(locals
                    .iter()
                    .map(|corner| {
                        Point::new(
                            data.position.x + f64::from(corner.x),
                            data.position.y + f64::from(corner.y),
                        )
                    })
                    .collect())
            }
            Payload::Drawing(drawing) => Ok(drawing
                .points
                .iter()
                .map(|offset| data.position + *offset)
                .collect()),
        }
    }

    fn render_element(
        &self,
        surface: &mut dyn Surface,
        data: &ElementData,
    ) -> Result<(), SceneError> {
        match &data.payload {
            Payload::Token(token) => {
                let dst = self
                    .view
                    .world_to_view_rect(Rect::from_origin_size(data.position, data.size));
                surface.draw_image(&*token.image, dst);
            }
            Payload::Drawing(_) => {
                let path = view_polyline(&self.view, &self.boundary_points(data)?, false);
                surface.stroke_path(&path);
            }
        }
        for graphic in &data.graphics {
            self.render_graphic(surface, graphic, Some(data))?;
        }
        Ok(())
    }

    fn render_graphic(
        &self,
        surface: &mut dyn Surface,
        graphic: &Graphic,
        parent: Option<&ElementData>,
    ) -> Result<(), SceneError> {
        match &graphic.strategy {
            GraphicStrategy::BoundaryOutline(style) => {
                let Some(data) = parent else {
                    log::warn!(
                        "skipping boundary outline overlay {:?}: no parent element",
                        graphic.tag
                    );
                    return Ok(());
                };
                let path = view_polyline(&self.view, &self.boundary_points(data)?, false);
                surface.set_stroke(*style);
                surface.stroke_path(&path);
                surface.set_stroke(StrokeStyle::default());
            }
            GraphicStrategy::ViewRect { rect, style } => {
                surface.set_stroke(*style);
                surface.stroke_rect(*rect);
                surface.set_stroke(StrokeStyle::default());
            }
            GraphicStrategy::Recorded(ops) => {
                for op in ops.iter() {
                    replay(surface, op);
                }
            }
        }
        Ok(())
    }

    /// Strokes the background grid as one path: vertical then horizontal
    /// lines at cell spacing, phase-aligned to the pan offset. Spacing
    /// under one view pixel draws nothing, the same as a zero cell size.
    fn draw_grid(&self, surface: &mut dyn Surface) {
        let step = self.view.cell_step();
        // A subpixel step cannot advance the walk below once the running
        // coordinate outgrows its precision.
        if step < 1.0 {
            return;
        }
        let offset = self.view.grid_offset();
        let (w, h) = (self.viewport.width, self.viewport.height);
        let mut path = BezPath::new();
        let mut x = offset.x;
        while x <= w {
            path.move_to((x, 0.0));
            path.line_to((x, h));
            x += step;
        }
        let mut y = offset.y;
        while y <= h {
            path.move_to((0.0, y));
            path.line_to((w, y));
            y += step;
        }
        surface.stroke_path(&path);
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alive = self.slots.iter().filter(|slot| slot.data.is_some()).count();
        f.debug_struct("Scene")
            .field("layers", &self.layers.len())
            .field("alive_elements", &alive)
            .field("overlays", &self.overlays.len())
            .field("view", &self.view)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

/// Builds a view-space path through `points`.
///
/// Closed paths are for winding-based containment; open ones are for
/// stroking polylines the way they were drawn.
fn view_polyline(view: &GridView, points: &[Point], close: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(view.world_to_view_point(*first));
        for point in iter {
            path.line_to(view.world_to_view_point(*point));
        }
        if close {
            path.close_path();
        }
    }
    path
}

/// Re-issues one recorded surface call.
fn replay(surface: &mut dyn Surface, op: &SurfaceOp) {
    match op {
        SurfaceOp::Clear => surface.clear(),
        SurfaceOp::SetStroke(style) => surface.set_stroke(*style),
        SurfaceOp::StrokePath(elements) => {
            surface.stroke_path(&BezPath::from_vec(elements.to_vec()));
        }
        SurfaceOp::FillPath(elements) => {
            surface.fill_path(&BezPath::from_vec(elements.to_vec()));
        }
        SurfaceOp::StrokeRect(rect) => surface.stroke_rect(*rect),
        SurfaceOp::DrawImage { .. } => {
            log::warn!("skipping recorded image draw: recordings carry no pixel data");
        }
    }
}
