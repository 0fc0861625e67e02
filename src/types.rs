//! Core data types and structures for the block selector.
//!
//! This module defines the fundamental data structures used throughout the
//! application: finalized annotation blocks, their normalized wire form, and
//! the issue/page model the viewer operates on.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stable integer identifier of a page, as it appears in the exported payload.
pub type PageId = i64;

/// A finalized rectangular annotation on a page container.
///
/// Geometry is stored in container-local pixel units measured at scale 1,
/// i.e. unaffected by the container's current zoom. Blocks are immutable
/// once created; there is no move or resize after finalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Identifier unique within the owning container, assigned 1, 2, 3, …
    /// in creation order and never reused.
    pub id: u32,
    /// Distance from the container's left edge.
    pub left: f32,
    /// Distance from the container's top edge.
    pub top: f32,
    /// Horizontal extent; zero-size blocks are allowed.
    pub width: f32,
    /// Vertical extent; zero-size blocks are allowed.
    pub height: f32,
}

impl Block {
    /// Returns whether the given container-local point lies inside this block.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}

/// One block in its normalized submission form.
///
/// All four geometry fields are percentages of the owning container's
/// rendered width/height, which makes stored geometry resolution independent.
/// Values are expected in the 0–100 range but are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Identifier of the owning page.
    pub page_id: PageId,
    /// Left edge as a percentage of the container width.
    pub x: f32,
    /// Top edge as a percentage of the container height.
    pub y: f32,
    /// Width as a percentage of the container width.
    pub width: f32,
    /// Height as a percentage of the container height.
    pub height: f32,
}

/// Metadata for a single page of an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Stable page identifier used in exported block records.
    pub id: PageId,
    /// 1-based position of the page within its issue.
    pub page_no: u32,
    /// Source image file, if the page is backed by one. Sample issues use
    /// placeholder pages with no image.
    pub image: Option<PathBuf>,
    /// Native pixel width of the source image (or placeholder).
    pub width: u32,
    /// Native pixel height of the source image (or placeholder).
    pub height: u32,
}

/// An issue: one named paper on one date, owning an ordered set of pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Name of the paper this issue belongs to.
    pub paper: String,
    /// Publication date label (YYYY-MM-DD for real issues).
    pub date: String,
    /// Pages in reading order.
    pub pages: Vec<PageInfo>,
}

impl Default for Issue {
    /// Creates an empty issue with no pages.
    fn default() -> Self {
        Self {
            paper: String::new(),
            date: String::new(),
            pages: Vec::new(),
        }
    }
}

impl Issue {
    /// Creates a new issue for the given paper and date with no pages yet.
    pub fn new(paper: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            paper: paper.into(),
            date: date.into(),
            pages: Vec::new(),
        }
    }

    /// Number of pages in the issue.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the issue to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize an issue from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
