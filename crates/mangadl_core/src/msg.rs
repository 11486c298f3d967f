use crate::{ChapterRowSnapshot, RowIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Chapter table (re)populated; replaces all rows and clears the selection.
    ChaptersLoaded(Vec<ChapterRowSnapshot>),
    /// User toggled the selection marker on one row.
    RowToggled { row: RowIndex },
    /// User toggled selection of every row that is not yet downloaded.
    SelectAllToggled,
    /// User asked to download the current selection.
    DownloadClicked,
    /// User asked to stop the running batch.
    CancelClicked,
    /// Engine progress for a row.
    PageProgress {
        row: RowIndex,
        page: usize,
        total: usize,
    },
    /// Engine finished a row successfully.
    RowDownloaded { row: RowIndex },
    /// Engine finished the batch.
    BatchFinished { report: String },
    /// User closed the report modal.
    ReportDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
}
