use crate::{BatchState, RowIndex};

/// Text shown in the status column of a downloaded chapter.
pub const DOWNLOADED_MARKER: &str = "Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowProgress {
    pub page: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub batch: BatchState,
    pub rows: Vec<ChapterRowView>,
    pub selected_count: usize,
    /// Summary of the last finished batch, shown until dismissed.
    pub report: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRowView {
    pub row: RowIndex,
    pub label: String,
    pub selected: bool,
    pub downloaded: bool,
    pub progress: Option<RowProgress>,
}

impl ChapterRowView {
    pub fn status_marker(&self) -> &'static str {
        if self.downloaded {
            DOWNLOADED_MARKER
        } else {
            ""
        }
    }
}
