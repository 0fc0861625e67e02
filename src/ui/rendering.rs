//! Page rendering: the painter layer over the engine's numeric state.
//!
//! Draws the page image (or a placeholder for sample pages), the finalized
//! blocks, the in-progress temp block, and the bottom navigation controls.
//! All geometry comes from the page's container; nothing is read back from
//! what was painted.

use super::state::{AppMode, BlockSelectorApp};
use crate::types::PageId;
use eframe::egui;
use eframe::epaint::StrokeKind;
use std::path::Path;

impl BlockSelectorApp {
    /// Renders the current page surface: image, blocks, and temp block.
    pub fn render_page(&mut self, painter: &egui::Painter, surface: egui::Rect) {
        let idx = self.viewer.current();
        let now = painter.ctx().input(|i| i.time);

        self.draw_page_image(painter, idx, surface);
        self.draw_blocks(painter, idx, surface, now);
        if self.mode == AppMode::Annotating {
            self.draw_temp_block(painter, idx, surface);
        }

        // Keep repainting while a tap flash is live so it expires on time.
        if self.input.highlight.is_some_and(|h| now < h.until) {
            painter
                .ctx()
                .request_repaint_after(std::time::Duration::from_millis(50));
        }
    }

    /// Draws the page image, or a labeled placeholder when the page has no
    /// backing file (sample issues) or its image failed to load.
    fn draw_page_image(&mut self, painter: &egui::Painter, idx: usize, surface: egui::Rect) {
        let page_no = self.issue.pages[idx].page_no;
        if let Some(texture_id) = self.ensure_texture(painter.ctx(), idx) {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture_id, surface, uv, egui::Color32::WHITE);
            return;
        }

        // Placeholder page: paper-colored sheet with the page number.
        let paper_fill = if self.dark_mode {
            egui::Color32::from_gray(225)
        } else {
            egui::Color32::WHITE
        };
        painter.rect_filled(surface, 2.0, paper_fill);
        painter.rect_stroke(
            surface,
            2.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(120)),
            StrokeKind::Inside,
        );
        painter.text(
            surface.center(),
            egui::Align2::CENTER_CENTER,
            format!("Page {page_no}"),
            egui::FontId::proportional(24.0),
            egui::Color32::from_gray(120),
        );
    }

    /// Returns the texture for the page at `idx`, loading it on first use.
    ///
    /// Failed loads are cached as `None` so they are reported once instead
    /// of retried every frame.
    fn ensure_texture(&mut self, ctx: &egui::Context, idx: usize) -> Option<egui::TextureId> {
        let page = &self.issue.pages[idx];
        let path = page.image.clone()?;
        let page_id = page.id;

        if !self.textures.contains_key(&page_id) {
            let loaded = load_page_texture(ctx, &path, page_id);
            self.textures.insert(page_id, loaded);
        }
        self.textures
            .get(&page_id)
            .and_then(|t| t.as_ref())
            .map(egui::TextureHandle::id)
    }

    /// Draws the finalized blocks of the page at `idx`.
    fn draw_blocks(&self, painter: &egui::Painter, idx: usize, surface: egui::Rect, now: f64) {
        let container = &self.containers[idx];
        let scale = container.scale();
        let reading = self.mode == AppMode::Reading;

        for block in container.blocks() {
            let rect = egui::Rect::from_min_size(
                surface.min + egui::vec2(block.left * scale, block.top * scale),
                egui::vec2(block.width * scale, block.height * scale),
            );

            let flashed = reading
                && self.input.highlight.is_some_and(|h| {
                    h.page_index == idx && h.block_id == block.id && now < h.until
                });

            if flashed {
                // Tap feedback: dark border over a gray wash.
                painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(50, 50, 50, 64));
                painter.rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 230)),
                    StrokeKind::Inside,
                );
            } else if reading {
                painter.rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 128)),
                    StrokeKind::Inside,
                );
            } else {
                painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(100, 150, 255, 40));
                painter.rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(1.5, egui::Color32::from_rgb(100, 150, 255)),
                    StrokeKind::Inside,
                );
            }
        }
    }

    /// Draws the in-progress rectangle of the page at `idx`, if any.
    fn draw_temp_block(&self, painter: &egui::Painter, idx: usize, surface: egui::Rect) {
        let container = &self.containers[idx];
        let Some(temp) = container.temp_block() else {
            return;
        };
        let scale = container.scale();
        let rect = egui::Rect::from_min_size(
            surface.min + egui::vec2(temp.left * scale, temp.top * scale),
            egui::vec2(temp.width * scale, temp.height * scale),
        );
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(255, 180, 60, 40));
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(1.5, egui::Color32::from_rgb(255, 180, 60)),
            StrokeKind::Inside,
        );
    }

    /// Draws the hint shown when the loaded issue has no pages.
    pub fn draw_empty_hint(&self, painter: &egui::Painter, rect: egui::Rect) {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No pages in this issue",
            egui::FontId::proportional(18.0),
            egui::Color32::from_gray(120),
        );
    }

    /// Draws the bottom navigation row: prev/next buttons, one dot per
    /// page, and the page label.
    pub fn draw_nav_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("<").clicked() {
                self.viewer.prev();
            }

            for dot in 0..self.viewer.page_count() {
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::click());
                let active = self.viewer.is_active_dot(dot);
                let (radius, color) = if active {
                    (5.0, ui.visuals().selection.bg_fill)
                } else {
                    (3.5, ui.visuals().weak_text_color())
                };
                ui.painter().circle_filled(rect.center(), radius, color);
                if response.clicked() {
                    self.viewer.go_to(dot);
                }
            }

            if ui.button(">").clicked() {
                self.viewer.next();
            }

            ui.label(self.viewer.page_label());
        });
    }
}

/// Decodes a page image from disk into an egui texture.
fn load_page_texture(ctx: &egui::Context, path: &Path, page_id: PageId) -> Option<egui::TextureHandle> {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            Some(ctx.load_texture(
                format!("page-{page_id}"),
                color_image,
                egui::TextureOptions::LINEAR,
            ))
        }
        Err(err) => {
            eprintln!("Failed to load page image {}: {}", path.display(), err);
            None
        }
    }
}
