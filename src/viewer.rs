//! Page viewer navigation: the carousel the annotation layer sits on.
//!
//! Pure bounded-counter logic: wrap-around paging, the page label, dot
//! indicator state, and swipe classification. The UI layer owns the actual
//! page surfaces and feeds input here.

use crate::constants::SWIPE_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Wrap-around page cursor over an issue's pages.
///
/// Every operation is a no-op on an empty viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViewer {
    current: usize,
    page_count: usize,
}

impl PageViewer {
    /// Creates a viewer over the given number of pages, showing the first.
    pub fn new(page_count: usize) -> Self {
        Self {
            current: 0,
            page_count,
        }
    }

    /// Index of the page currently shown.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of pages under the viewer.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Shows the page at `idx`, wrapping modulo the page count so negative
    /// and overflowing indices land on a valid page.
    pub fn show(&mut self, idx: isize) {
        if self.page_count == 0 {
            return;
        }
        let count = self.page_count as isize;
        self.current = ((idx % count + count) % count) as usize;
    }

    /// Steps to the previous page, wrapping to the last from the first.
    pub fn prev(&mut self) {
        self.show(self.current as isize - 1);
    }

    /// Steps to the next page, wrapping to the first from the last.
    pub fn next(&mut self) {
        self.show(self.current as isize + 1);
    }

    /// Jumps to the given page index (dot click).
    pub fn go_to(&mut self, idx: usize) {
        self.show(idx as isize);
    }

    /// Human-readable position label, e.g. "Page 2 / 8".
    pub fn page_label(&self) -> String {
        if self.page_count == 0 {
            return "No pages".to_owned();
        }
        format!("Page {} / {}", self.current + 1, self.page_count)
    }

    /// Whether the dot at `idx` is the active one.
    pub fn is_active_dot(&self, idx: usize) -> bool {
        self.page_count > 0 && idx == self.current
    }
}

/// Which way a completed swipe navigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeNav {
    /// Rightward travel: back to the previous page.
    Prev,
    /// Leftward travel: on to the next page.
    Next,
}

/// Classifies horizontal touch travel into page navigation.
///
/// A swipe counts only when the travel between touch start and touch end
/// exceeds [`SWIPE_THRESHOLD`]; anything shorter is a tap and yields no
/// navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    /// Records where a touch sequence started.
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Completes the touch sequence and reports the resulting navigation,
    /// if the travel cleared the threshold. A finish without a matching
    /// begin reports nothing.
    pub fn finish(&mut self, x: f32) -> Option<SwipeNav> {
        let start = self.start_x.take()?;
        let diff = x - start;
        if diff.abs() > SWIPE_THRESHOLD {
            Some(if diff > 0.0 { SwipeNav::Prev } else { SwipeNav::Next })
        } else {
            None
        }
    }

    /// Whether a touch sequence is currently being tracked.
    pub fn tracking(&self) -> bool {
        self.start_x.is_some()
    }
}
