use std::collections::{BTreeMap, BTreeSet};

use crate::view_model::{AppViewModel, ChapterRowView, RowProgress};

pub type RowIndex = usize;

/// What the table shows for one chapter before any download activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRowSnapshot {
    pub row: RowIndex,
    pub label: String,
    /// A previous run already left this chapter on disk.
    pub downloaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Running,
    Cancelling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RowEntry {
    label: String,
    downloaded: bool,
    progress: Option<RowProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    rows: BTreeMap<RowIndex, RowEntry>,
    selected: BTreeSet<RowIndex>,
    batch: BatchState,
    report: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self) -> BatchState {
        self.batch
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            batch: self.batch,
            rows: self
                .rows
                .iter()
                .map(|(row, entry)| ChapterRowView {
                    row: *row,
                    label: entry.label.clone(),
                    selected: self.selected.contains(row),
                    downloaded: entry.downloaded,
                    progress: entry.progress,
                })
                .collect(),
            selected_count: self.selected.len(),
            report: self.report.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn load_rows(&mut self, rows: Vec<ChapterRowSnapshot>) {
        self.rows = rows
            .into_iter()
            .map(|snapshot| {
                (
                    snapshot.row,
                    RowEntry {
                        label: snapshot.label,
                        downloaded: snapshot.downloaded,
                        progress: None,
                    },
                )
            })
            .collect();
        self.selected.clear();
        self.mark_dirty();
    }

    pub(crate) fn toggle_row(&mut self, row: RowIndex) {
        if !self.rows.contains_key(&row) {
            return;
        }
        if !self.selected.remove(&row) {
            self.selected.insert(row);
        }
        self.mark_dirty();
    }

    pub(crate) fn toggle_all(&mut self) {
        let pending: BTreeSet<RowIndex> = self
            .rows
            .iter()
            .filter(|(_, entry)| !entry.downloaded)
            .map(|(row, _)| *row)
            .collect();
        if !pending.is_empty() && pending.is_subset(&self.selected) {
            self.selected.clear();
        } else {
            self.selected.extend(pending);
        }
        self.mark_dirty();
    }

    /// Empties the selection in one step and returns the rows in ascending order.
    pub(crate) fn drain_selection(&mut self) -> Vec<RowIndex> {
        let rows: Vec<RowIndex> = std::mem::take(&mut self.selected).into_iter().collect();
        if !rows.is_empty() {
            self.mark_dirty();
        }
        rows
    }

    pub(crate) fn start_batch(&mut self, rows: &[RowIndex]) {
        self.batch = BatchState::Running;
        self.report = None;
        for row in rows {
            if let Some(entry) = self.rows.get_mut(row) {
                entry.progress = Some(RowProgress { page: 0, total: 0 });
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn request_cancel(&mut self) -> bool {
        if self.batch != BatchState::Running {
            return false;
        }
        self.batch = BatchState::Cancelling;
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_progress(&mut self, row: RowIndex, page: usize, total: usize) {
        if let Some(entry) = self.rows.get_mut(&row) {
            entry.progress = Some(RowProgress { page, total });
            self.dirty = true;
        }
    }

    pub(crate) fn mark_downloaded(&mut self, row: RowIndex) {
        if let Some(entry) = self.rows.get_mut(&row) {
            entry.downloaded = true;
            entry.progress = None;
            self.dirty = true;
        }
    }

    pub(crate) fn finish_batch(&mut self, report: String) {
        self.batch = BatchState::Idle;
        for entry in self.rows.values_mut() {
            entry.progress = None;
        }
        self.report = Some(report);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_report(&mut self) {
        if self.report.take().is_some() {
            self.mark_dirty();
        }
    }
}
