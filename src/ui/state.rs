//! Application state management structures.
//!
//! This module contains the state structures that track the application's
//! current UI state (the loaded issue and its page containers, viewer
//! navigation, transient input tracking, and file operations) plus the
//! main [`BlockSelectorApp`] struct.

use crate::annotation::Container;
use crate::constants::PAGE_DISPLAY_HEIGHT;
use crate::samples::{build_sample, SampleKind};
use crate::types::{Issue, PageId};
use crate::viewer::{PageViewer, SwipeTracker};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Which of the two interaction modes the app is in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppMode {
    /// Carousel navigation: click/swipe to page, tap a block to flash it.
    Reading,
    /// The admin annotation tool: draw blocks, wheel/pinch zoom.
    Annotating,
}

/// A tapped block being flashed in reading mode.
///
/// Cosmetic and fire-and-forget: rendering simply stops drawing the flash
/// once the deadline passes; nothing waits on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHighlight {
    /// Index of the page the block lives on.
    pub page_index: usize,
    /// Identifier of the flashed block within its container.
    pub block_id: u32,
    /// Absolute egui time after which the flash disappears.
    pub until: f64,
}

/// Transient per-frame input tracking.
///
/// Holds the raw device state the gesture layer needs between frames: which
/// touch points are down, whether a mouse gesture is in flight, and the
/// swipe tracker for reading-mode navigation.
#[derive(Default)]
pub struct InputState {
    /// Active touch points by device-assigned id, in client coordinates.
    pub active_touches: BTreeMap<egui::TouchId, egui::Pos2>,
    /// Whether a mouse-driven gesture is currently in flight.
    pub mouse_gesture_active: bool,
    /// Reading-mode swipe tracking.
    pub swipe: SwipeTracker,
    /// Block currently being flashed, if any.
    pub highlight: Option<BlockHighlight>,
}

/// State related to file operations.
///
/// Manages the exported-payload path, unsaved-changes tracking, and async
/// dialog operations.
pub struct FileState {
    /// Path the payload was last exported to.
    pub current_path: Option<String>,
    /// Whether blocks have been drawn since the last export.
    pub has_unsaved_changes: bool,
    /// Pending payload export, picked up next frame.
    pub pending_export: Option<PendingExportOperation>,
    /// Pending issue-folder open, picked up next frame.
    pub pending_open: Option<PendingOpenOperation>,
    /// Channel for receiving file operation results from async contexts.
    pub file_operation_sender: Option<Sender<FileOperationResult>>,
    pub file_operation_receiver: Option<Receiver<FileOperationResult>>,
    /// Whether to show an unsaved-changes confirmation dialog.
    pub show_unsaved_dialog: bool,
    /// The action the user attempted that requires confirmation.
    pub pending_confirm_action: Option<PendingConfirmAction>,
    /// One-shot flag to allow the next close request to proceed after user
    /// confirmation.
    pub allow_close_on_next_request: bool,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            current_path: None,
            has_unsaved_changes: false,
            pending_export: None,
            pending_open: None,
            file_operation_sender: Some(sender),
            file_operation_receiver: Some(receiver),
            show_unsaved_dialog: false,
            pending_confirm_action: None,
            allow_close_on_next_request: false,
        }
    }
}

/// Represents a pending payload export type.
#[derive(Debug)]
pub enum PendingExportOperation {
    /// Export with a new file path (show file picker).
    ExportAs,
    /// Export to the existing file path.
    Export,
}

/// Represents a pending open operation type.
#[derive(Debug)]
pub enum PendingOpenOperation {
    /// Pick an issue folder of page images.
    IssueFolder,
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Payload export completed successfully with the given path.
    ExportCompleted(String),
    /// An issue folder was scanned successfully.
    IssueLoaded(Issue),
    /// Operation failed with an error message.
    OperationFailed(String),
}

/// Pending actions that may require user approval due to unsaved blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirmAction {
    /// User is attempting to open another issue folder.
    OpenIssue,
    /// User is attempting to load a built-in sample issue.
    LoadSample(SampleKind),
    /// User is attempting to quit the application.
    Quit,
}

/// Fits a page's native pixel dimensions to the reference display height,
/// preserving aspect ratio. This is the rendered size blocks are drawn in.
pub fn fitted_page_size(width: u32, height: u32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (PAGE_DISPLAY_HEIGHT, PAGE_DISPLAY_HEIGHT);
    }
    let aspect = width as f32 / height as f32;
    (PAGE_DISPLAY_HEIGHT * aspect, PAGE_DISPLAY_HEIGHT)
}

/// The main application structure containing UI state and the loaded issue.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSelectorApp {
    /// The issue whose pages are being viewed and annotated.
    pub issue: Issue,
    /// One interaction container per page, parallel to `issue.pages`.
    pub containers: Vec<Container>,
    /// Carousel cursor over the issue's pages.
    pub viewer: PageViewer,
    /// Current interaction mode.
    pub mode: AppMode,
    /// Whether dark mode visuals are enabled.
    pub dark_mode: bool,
    /// Transient input tracking.
    #[serde(skip)]
    pub input: InputState,
    /// File operations state.
    #[serde(skip)]
    pub file: FileState,
    /// Lazily loaded page textures by page id. `None` marks a page whose
    /// image failed to load, so it is not retried every frame.
    #[serde(skip)]
    pub textures: HashMap<PageId, Option<egui::TextureHandle>>,
}

impl Default for BlockSelectorApp {
    /// Starts with the built-in daily sample loaded, so the tool is usable
    /// before any issue folder is opened.
    fn default() -> Self {
        let mut app = Self {
            issue: Issue::default(),
            containers: Vec::new(),
            viewer: PageViewer::default(),
            mode: AppMode::Reading,
            dark_mode: true,
            input: InputState::default(),
            file: FileState::default(),
            textures: HashMap::new(),
        };
        app.set_issue(build_sample(SampleKind::Daily));
        app
    }
}

impl BlockSelectorApp {
    /// Replaces the loaded issue, creating one fresh container per page.
    ///
    /// Container dimensions are fixed here: pages are fitted to the
    /// reference display height, and all block geometry for this issue
    /// lives in that layout space from now on.
    pub fn set_issue(&mut self, issue: Issue) {
        self.containers = issue
            .pages
            .iter()
            .map(|page| {
                let (width, height) = fitted_page_size(page.width, page.height);
                Container::new(page.id, width, height)
            })
            .collect();
        self.viewer = PageViewer::new(issue.pages.len());
        self.issue = issue;
        self.textures.clear();
        self.input = InputState::default();
        self.file.has_unsaved_changes = false;
        self.file.current_path = None;
    }

    /// The container of the page currently shown, if any.
    pub fn current_container(&self) -> Option<&Container> {
        self.containers.get(self.viewer.current())
    }

    /// Serializes all finalized blocks into the submission payload.
    pub fn blocks_payload(&self) -> Result<String, serde_json::Error> {
        crate::annotation::blocks_payload(&self.containers)
    }

    /// Serializes the application state to JSON for persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes application state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
