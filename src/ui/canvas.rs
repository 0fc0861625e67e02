//! Page surface interaction and input routing.
//!
//! This module lays out the current page's surface, classifies incoming
//! egui input (mouse, touch, wheel), and routes it into the page's
//! [`Container`](crate::annotation::Container). The engine owns all
//! geometry; this layer only translates device events.

use super::state::{AppMode, BlockHighlight, BlockSelectorApp};
use crate::annotation::{PointerInput, SurfaceRect};
use crate::constants::TAP_HIGHLIGHT_SECS;
use crate::viewer::SwipeNav;
use eframe::egui;

impl BlockSelectorApp {
    /// Lays out the current page surface, routes input to the annotation
    /// engine or the viewer, and renders the result.
    pub fn draw_page_surface(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        if self.containers.is_empty() {
            self.draw_empty_hint(&painter, response.rect);
            return;
        }

        let surface = self.surface_rect(&response);
        match self.mode {
            AppMode::Annotating => self.handle_annotation_input(ui, &response, surface),
            AppMode::Reading => self.handle_reading_input(ui, &response, surface),
        }

        // Input may have rescaled the page this frame; recompute before drawing.
        let surface = self.surface_rect(&response);
        self.render_page(&painter, surface);
    }

    /// Screen rect of the current page's scaled surface.
    ///
    /// The unscaled page is centered in the allocated area. The zoom
    /// transform maps a local point `p` to `base_min + origin*(1-s) + s*p`,
    /// so the scaled surface's top-left sits at `base_min + origin*(1-s)`.
    pub fn surface_rect(&self, response: &egui::Response) -> egui::Rect {
        let container = &self.containers[self.viewer.current()];
        let size = egui::vec2(container.width, container.height);
        let base = egui::Rect::from_center_size(response.rect.center(), size);
        let scale = container.scale();
        let (origin_x, origin_y) = container.transform_origin();
        let min = base.min + egui::vec2(origin_x * (1.0 - scale), origin_y * (1.0 - scale));
        egui::Rect::from_min_size(min, size * scale)
    }

    /// Routes annotation-mode input: touch gestures, the mouse drawing
    /// path, and wheel zoom.
    fn handle_annotation_input(
        &mut self,
        ui: &mut egui::Ui,
        response: &egui::Response,
        surface: egui::Rect,
    ) {
        let idx = self.viewer.current();
        let origin = SurfaceRect::new(surface.min.x, surface.min.y);

        // Touch events drive the engine one at a time; the map tracks the
        // active point set so each event sees the state a touch list would
        // report at that moment.
        let events = ui.input(|i| i.events.clone());
        for event in &events {
            let egui::Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            match phase {
                egui::TouchPhase::Start => {
                    self.input.active_touches.insert(*id, *pos);
                    let points = self.touch_points();
                    self.containers[idx].begin_gesture(origin, &PointerInput::Touches(points));
                }
                egui::TouchPhase::Move => {
                    self.input.active_touches.insert(*id, *pos);
                    let points = self.touch_points();
                    self.containers[idx].update_gesture(origin, &PointerInput::Touches(points));
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    self.input.active_touches.remove(id);
                    if self.containers[idx].end_gesture().is_some() {
                        self.file.has_unsaved_changes = true;
                    }
                }
            }
        }

        // Mouse drawing path. Skipped while touches are active: egui
        // synthesizes pointer presses from touch input, which would route
        // the same gesture twice.
        if self.input.active_touches.is_empty() {
            if ui.input(|i| i.pointer.primary_down()) {
                if let Some(pos) = response.interact_pointer_pos() {
                    let input = PointerInput::Mouse(pos.x, pos.y);
                    if self.input.mouse_gesture_active {
                        self.containers[idx].update_gesture(origin, &input);
                    } else {
                        self.input.mouse_gesture_active = true;
                        self.containers[idx].begin_gesture(origin, &input);
                    }
                }
            } else if self.input.mouse_gesture_active {
                self.input.mouse_gesture_active = false;
                if self.containers[idx].end_gesture().is_some() {
                    self.file.has_unsaved_changes = true;
                }
            }
        }

        // Wheel zoom, anchored on the cursor. Only acts while the cursor is
        // over the page surface itself. egui's scroll delta is positive when
        // scrolling up; DOM wheel deltaY has the opposite sign.
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(hover) = ui.input(|i| i.pointer.hover_pos()) {
                if surface.contains(hover) {
                    self.containers[idx].wheel_zoom(origin, hover.x, hover.y, -scroll);
                }
            }
        }
    }

    /// Routes reading-mode input: swipe navigation, tap highlighting, and
    /// click-to-advance.
    fn handle_reading_input(
        &mut self,
        ui: &mut egui::Ui,
        response: &egui::Response,
        surface: egui::Rect,
    ) {
        let idx = self.viewer.current();
        let now = ui.input(|i| i.time);

        let events = ui.input(|i| i.events.clone());
        for event in &events {
            let egui::Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            match phase {
                egui::TouchPhase::Start => {
                    self.input.active_touches.insert(*id, *pos);
                    if self.input.active_touches.len() == 1 {
                        self.input.swipe.begin(pos.x);
                    }
                }
                egui::TouchPhase::Move => {
                    self.input.active_touches.insert(*id, *pos);
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    self.input.active_touches.remove(id);
                    if self.input.active_touches.is_empty() {
                        match self.input.swipe.finish(pos.x) {
                            Some(SwipeNav::Prev) => self.viewer.prev(),
                            Some(SwipeNav::Next) => self.viewer.next(),
                            // A tap rather than a swipe: flash the block
                            // under the finger, if any.
                            None => self.flash_block_at(idx, surface, *pos, now),
                        }
                    }
                }
            }
        }

        // A plain click (mouse, or the click egui synthesizes from a touch
        // tap) advances to the next page.
        if response.clicked() {
            self.viewer.next();
        }
    }

    /// Starts the tap-highlight flash for the block under the given client
    /// position, if there is one.
    fn flash_block_at(&mut self, page_index: usize, surface: egui::Rect, pos: egui::Pos2, now: f64) {
        let container = &self.containers[page_index];
        let origin = SurfaceRect::new(surface.min.x, surface.min.y);
        let touch = PointerInput::Touches(vec![(pos.x, pos.y)]);
        if let Some((x, y)) = container.local_coords(origin, &touch) {
            if let Some(block) = container.block_at(x, y) {
                self.input.highlight = Some(BlockHighlight {
                    page_index,
                    block_id: block.id,
                    until: now + TAP_HIGHLIGHT_SECS,
                });
            }
        }
    }

    /// Current touch points in client coordinates.
    fn touch_points(&self) -> Vec<(f32, f32)> {
        self.input
            .active_touches
            .values()
            .map(|pos| (pos.x, pos.y))
            .collect()
    }
}
