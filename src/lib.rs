//! # Block Selector
//!
//! A paged e-paper viewer with an administrator annotation tool for marking
//! rectangular "blocks" over page images. Readers page through an issue
//! with a carousel (click, swipe, dot indicators); an administrator draws,
//! pans, and zooms blocks over each page and exports their normalized
//! positions as a JSON payload for submission.
//!
//! ## Features
//! - Carousel navigation with wrap-around paging and swipe gestures
//! - Pointer-driven rectangle drawing with per-page state
//! - Cursor-anchored wheel zoom and two-finger pinch zoom
//! - Resolution-independent (percentage) block serialization
//! - Built-in sample issues and issue-folder loading

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod annotation;
mod constants;
mod samples;
mod types;
mod ui;
mod viewer;

// Re-export public types and functions
pub use annotation::*;
pub use samples::*;
pub use types::*;
pub use viewer::*;
use ui::BlockSelectorApp;

/// Runs the block selector application with default settings.
///
/// This function initializes the egui application window and starts the
/// main event loop, restoring persisted state from the previous session
/// when available.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use block_selector::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    // Async file dialogs are spawned onto tokio; keep a runtime entered for
    // the lifetime of the UI so spawn() from update() has an executor.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start tokio runtime");
    let _guard = runtime.enter();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Block Selector",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| BlockSelectorApp::from_json(&json).ok())
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )
}
