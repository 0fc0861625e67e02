//! File operations for exporting block payloads and opening issue folders.
//!
//! Dialogs run asynchronously on the tokio runtime; results come back to
//! the UI thread over an mpsc channel that is drained once per frame.

use super::state::{
    BlockSelectorApp, FileOperationResult, PendingExportOperation, PendingOpenOperation,
};
use crate::types::{Issue, PageInfo};
use eframe::egui;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

impl BlockSelectorApp {
    /// Handles pending file operations.
    ///
    /// Processes completed async operations from the channel, then kicks
    /// off any newly requested export or open operation.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        // First, process any completed file operations from the channel
        if let Some(receiver) = &self.file.file_operation_receiver {
            let mut completed = Vec::new();
            while let Ok(result) = receiver.try_recv() {
                completed.push(result);
            }
            for result in completed {
                match result {
                    FileOperationResult::ExportCompleted(path) => {
                        self.file.current_path = Some(path);
                        self.file.has_unsaved_changes = false;
                        println!("Blocks exported successfully");
                    }
                    FileOperationResult::IssueLoaded(issue) => {
                        self.set_issue(issue);
                        println!("Issue loaded successfully");
                    }
                    FileOperationResult::OperationFailed(error) => {
                        eprintln!("File operation failed: {error}");
                    }
                }
            }
        }

        // Handle a pending payload export
        if let Some(export_op) = self.file.pending_export.take() {
            let ctx = ctx.clone();
            let payload = self.blocks_payload().unwrap_or_default();
            let sender = self.file.file_operation_sender.clone();

            match export_op {
                PendingExportOperation::ExportAs => {
                    tokio::spawn(async move {
                        if let Some(handle) = rfd::AsyncFileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("blocks.json")
                            .save_file()
                            .await
                        {
                            let path = handle.path();
                            let result = match std::fs::write(path, payload) {
                                Ok(()) => FileOperationResult::ExportCompleted(
                                    path.display().to_string(),
                                ),
                                Err(err) => FileOperationResult::OperationFailed(format!(
                                    "Failed to write payload: {err}"
                                )),
                            };
                            if let Some(tx) = sender {
                                let _ = tx.send(result);
                            }
                        }
                        ctx.request_repaint();
                    });
                }
                PendingExportOperation::Export => {
                    if let Some(path) = self.file.current_path.clone() {
                        tokio::spawn(async move {
                            let result = match std::fs::write(&path, payload) {
                                Ok(()) => FileOperationResult::ExportCompleted(path),
                                Err(err) => FileOperationResult::OperationFailed(format!(
                                    "Failed to write payload: {err}"
                                )),
                            };
                            if let Some(tx) = sender {
                                let _ = tx.send(result);
                            }
                            ctx.request_repaint();
                        });
                    } else {
                        self.file.pending_export = Some(PendingExportOperation::ExportAs);
                    }
                }
            }
        }

        // Handle a pending issue-folder open
        if let Some(_open_op) = self.file.pending_open.take() {
            let ctx = ctx.clone();
            let sender = self.file.file_operation_sender.clone();

            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .set_title("Choose an issue folder")
                    .pick_folder()
                    .await
                {
                    let result = match scan_issue_folder(handle.path()) {
                        Ok(issue) => FileOperationResult::IssueLoaded(issue),
                        Err(err) => FileOperationResult::OperationFailed(err),
                    };
                    if let Some(tx) = sender {
                        let _ = tx.send(result);
                    }
                }
                ctx.request_repaint();
            });
        }
    }

    /// Opens a file dialog to export the payload with a new name.
    pub fn export_blocks_as(&mut self) {
        self.file.pending_export = Some(PendingExportOperation::ExportAs);
    }

    /// Exports the payload to the current path, or triggers "Export As" if
    /// no path is set yet.
    pub fn export_blocks(&mut self) {
        if self.file.current_path.is_some() {
            self.file.pending_export = Some(PendingExportOperation::Export);
        } else {
            self.export_blocks_as();
        }
    }

    /// Opens a folder picker to load an issue's page images.
    pub fn open_issue_dialog(&mut self) {
        self.file.pending_open = Some(PendingOpenOperation::IssueFolder);
    }
}

/// Builds an [`Issue`] from a folder of page images.
///
/// Pages are ordered by the trailing number in their file stem
/// (`page_1.png`, `page_2.png`, …) and renumbered sequentially from 1, the
/// same way the publishing side numbers converted PDF pages. The folder
/// name is taken as the issue date and its parent as the paper name,
/// matching the `uploads/<paper>/<date>/` layout.
fn scan_issue_folder(folder: &Path) -> Result<Issue, String> {
    let entries =
        std::fs::read_dir(folder).map_err(|err| format!("Failed to read folder: {err}"))?;

    let mut found: Vec<(Option<u32>, String, PathBuf)> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                ext == "png" || ext == "jpg" || ext == "jpeg"
            })
            .unwrap_or(false);
        if !is_image {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_owned();
        found.push((page_number(&stem), stem, path));
    }

    if found.is_empty() {
        return Err(format!("No page images in {}", folder.display()));
    }

    found.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(&b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.1.cmp(&b.1),
    });

    let date = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let paper = folder
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "paper".to_owned());

    let mut issue = Issue::new(paper, date);
    for (index, (_, _, path)) in found.iter().enumerate() {
        let (width, height) = image::image_dimensions(path)
            .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
        let page_no = index as u32 + 1;
        issue.pages.push(PageInfo {
            id: i64::from(page_no),
            page_no,
            image: Some(path.clone()),
            width,
            height,
        });
    }
    Ok(issue)
}

/// Extracts the trailing page number from a file stem like `page_12`.
fn page_number(stem: &str) -> Option<u32> {
    let digits: String = stem
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_extraction() {
        assert_eq!(page_number("page_1"), Some(1));
        assert_eq!(page_number("page_12"), Some(12));
        assert_eq!(page_number("scan003"), Some(3));
        assert_eq!(page_number("cover"), None);
        assert_eq!(page_number(""), None);
    }

    #[test]
    fn test_numbered_stems_sort_numerically() {
        let mut stems = vec![
            (page_number("page_10"), "page_10".to_owned()),
            (page_number("page_2"), "page_2".to_owned()),
            (page_number("cover"), "cover".to_owned()),
            (page_number("page_1"), "page_1".to_owned()),
        ];
        stems.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(&b.1)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.1.cmp(&b.1),
        });

        let order: Vec<&str> = stems.iter().map(|s| s.1.as_str()).collect();
        assert_eq!(order, vec!["page_1", "page_2", "page_10", "cover"]);
    }
}
