//! Built-in sample issues that can be loaded from the UI.
//!
//! Samples use placeholder pages with no backing image, so the tool can be
//! tried (and tested) without an issue folder on disk.

use crate::types::{Issue, PageInfo};

/// Kinds of built-in sample issues available from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// A small four-page daily edition.
    Daily,
    /// A longer eight-page weekend edition.
    Weekend,
}

/// Metadata for a single sample issue.
pub struct SampleInfo {
    /// Stable identifier for the sample.
    pub kind: SampleKind,
    /// Human-friendly display name.
    pub name: &'static str,
}

/// Returns all samples with their display names.
pub const fn all_samples() -> &'static [SampleInfo] {
    const SAMPLES: &[SampleInfo] = &[
        SampleInfo {
            kind: SampleKind::Daily,
            name: "Daily edition (4 pages)",
        },
        SampleInfo {
            kind: SampleKind::Weekend,
            name: "Weekend edition (8 pages)",
        },
    ];
    SAMPLES
}

/// Builds the sample issue for the given kind.
pub fn build_sample(kind: SampleKind) -> Issue {
    match kind {
        SampleKind::Daily => placeholder_issue("todays_paper", "sample-daily", 4),
        SampleKind::Weekend => placeholder_issue("weekend_paper", "sample-weekend", 8),
    }
}

/// Builds an issue of `pages` placeholder pages sized like a scanned
/// broadsheet page (A4 at 150 dpi).
fn placeholder_issue(paper: &str, date: &str, pages: u32) -> Issue {
    let mut issue = Issue::new(paper, date);
    for page_no in 1..=pages {
        issue.pages.push(PageInfo {
            id: i64::from(page_no),
            page_no,
            image: None,
            width: 1240,
            height: 1754,
        });
    }
    issue
}
