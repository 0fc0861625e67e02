//! User interface components and rendering logic for the block selector.
//!
//! This module contains all the UI-related code including the main
//! application struct, the page surface, navigation controls, and file
//! operations.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main BlockSelectorApp
//! - `canvas` - Page surface layout and input routing into the engine
//! - `rendering` - Drawing pages, blocks, and navigation controls
//! - `file_ops` - Payload export and issue-folder loading

mod canvas;
mod file_ops;
mod rendering;
mod state;


pub use state::BlockSelectorApp;

use self::state::{AppMode, PendingConfirmAction};
use crate::samples::{all_samples, build_sample, SampleKind};
use eframe::egui;

impl eframe::App for BlockSelectorApp {
    /// Persist entire app state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                eprintln!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// Lays out the toolbar, the bottom navigation row, and the central
    /// page surface, and processes async file operation results.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme visuals
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        // Handle pending file operations
        self.handle_pending_operations(ctx);

        // Handle keyboard shortcuts
        self.handle_shortcuts(ctx);

        // Intercept native window close requests (titlebar X)
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.file.has_unsaved_changes && !self.file.allow_close_on_next_request {
                // Abort close and show confirmation dialog
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                if !self.file.show_unsaved_dialog {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Quit);
                }
            } else {
                // Either nothing to lose or the user confirmed; reset the one-shot flag
                self.file.allow_close_on_next_request = false;
            }
        }

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("page_nav").show(ctx, |ui| {
            self.draw_nav_controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_page_surface(ui);
        });

        if self.file.show_unsaved_dialog {
            self.draw_unsaved_dialog(ctx);
        }
    }
}

impl BlockSelectorApp {
    /// Handles keyboard shortcuts: arrow-key paging and payload export.
    pub fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.viewer.prev();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.viewer.next();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.export_blocks();
        }
    }

    /// Draws the top toolbar: mode switch, issue loading, and export.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.mode, AppMode::Reading, "Reading");
            ui.selectable_value(&mut self.mode, AppMode::Annotating, "Annotating");
            ui.separator();

            if ui.button("Open Issue…").clicked() {
                self.request_open_issue();
            }
            ui.menu_button("Samples", |ui| {
                for sample in all_samples() {
                    if ui.button(sample.name).clicked() {
                        self.request_load_sample(sample.kind);
                    }
                }
            });
            if ui.button("Export Blocks…").clicked() {
                self.export_blocks_as();
            }
            ui.separator();

            if !self.issue.paper.is_empty() {
                ui.label(format!("{} {}", self.issue.paper, self.issue.date));
            }
            if self.mode == AppMode::Annotating {
                if let Some(container) = self.current_container() {
                    ui.label(format!(
                        "{} blocks, zoom {:.2}x",
                        container.blocks().len(),
                        container.scale()
                    ));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.checkbox(&mut self.dark_mode, "Dark mode");
                if self.file.has_unsaved_changes {
                    ui.label("Unexported blocks");
                }
            });
        });
    }

    /// Requests opening another issue folder, asking for confirmation first
    /// when unexported blocks would be lost.
    fn request_open_issue(&mut self) {
        if self.file.has_unsaved_changes {
            self.file.show_unsaved_dialog = true;
            self.file.pending_confirm_action = Some(PendingConfirmAction::OpenIssue);
        } else {
            self.open_issue_dialog();
        }
    }

    /// Requests loading a built-in sample, asking for confirmation first
    /// when unexported blocks would be lost.
    fn request_load_sample(&mut self, kind: SampleKind) {
        if self.file.has_unsaved_changes {
            self.file.show_unsaved_dialog = true;
            self.file.pending_confirm_action = Some(PendingConfirmAction::LoadSample(kind));
        } else {
            self.set_issue(build_sample(kind));
        }
    }

    /// Draws the confirmation dialog shown when an action would discard
    /// unexported blocks.
    fn draw_unsaved_dialog(&mut self, ctx: &egui::Context) {
        let title = match self.file.pending_confirm_action {
            Some(PendingConfirmAction::Quit) => "Quit without exporting?",
            Some(PendingConfirmAction::OpenIssue) => "Open another issue?",
            Some(PendingConfirmAction::LoadSample(_)) => "Load sample issue?",
            None => "Unexported blocks",
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("You have blocks that haven't been exported. Are you sure you want to continue?");
                ui.horizontal(|ui| {
                    let confirm_label = match self.file.pending_confirm_action {
                        Some(PendingConfirmAction::Quit) => "Discard and Quit",
                        Some(PendingConfirmAction::OpenIssue) => "Discard and Open",
                        Some(PendingConfirmAction::LoadSample(_)) => "Discard and Load",
                        None => "Discard",
                    };
                    if ui.button(confirm_label).clicked() {
                        match self.file.pending_confirm_action {
                            Some(PendingConfirmAction::OpenIssue) => {
                                self.open_issue_dialog();
                            }
                            Some(PendingConfirmAction::LoadSample(kind)) => {
                                self.set_issue(build_sample(kind));
                            }
                            Some(PendingConfirmAction::Quit) => {
                                // Allow one close request to pass without interception
                                self.file.allow_close_on_next_request = true;
                                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                            }
                            None => {}
                        }
                        self.file.show_unsaved_dialog = false;
                        self.file.pending_confirm_action = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.file.show_unsaved_dialog = false;
                        self.file.pending_confirm_action = None;
                    }
                });
            });
    }
}
