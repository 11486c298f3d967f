use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Row of the chapter table a descriptor was selected from.
pub type RowIndex = usize;

/// Page resolution tier offered by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    #[serde(rename = "data", alias = "normal")]
    Normal,
    #[serde(rename = "data-saver", alias = "data_saver")]
    DataSaver,
}

impl Quality {
    /// Label used both in delivery URLs and in chapter folder names.
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Normal => "data",
            Quality::DataSaver => "data-saver",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDescriptor {
    pub id: String,
    pub title: String,
    /// Chapter number as published; may be non-numeric, e.g. "Oneshot".
    pub chapter: String,
    pub translated_language: String,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub data_saver: Vec<String>,
}

impl ChapterDescriptor {
    /// Ordered page references for the requested quality tier.
    pub fn pages(&self, quality: Quality) -> &[String] {
        match quality {
            Quality::Normal => &self.data,
            Quality::DataSaver => &self.data_saver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub download_dir: PathBuf,
    pub quality: Quality,
    pub as_archive: bool,
    pub archive_extension: String,
    pub force_port_443: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            quality: Quality::Normal,
            as_archive: false,
            archive_extension: "cbz".to_string(),
            force_port_443: false,
        }
    }
}

/// Chapters selected for one download operation, keyed by table row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionBatch {
    pub manga_title: String,
    pub chapters: BTreeMap<RowIndex, ChapterDescriptor>,
}

impl SelectionBatch {
    pub fn new(manga_title: impl Into<String>) -> Self {
        Self {
            manga_title: manga_title.into(),
            chapters: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, row: RowIndex, chapter: ChapterDescriptor) {
        self.chapters.insert(row, chapter);
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterOutcome {
    pub row: RowIndex,
    pub result: Result<PathBuf, String>,
}

impl ChapterOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

pub const REPORT_PREAMBLE: &str = "Last Download Queue finished.";
pub const REPORT_OK_TRAILER: &str = "No errors :>";
pub const REPORT_ERROR_TRAILER: &str = "We encountered some errors! Check the log for more details.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub attempted: usize,
    pub had_errors: bool,
    pub summary: String,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: &[ChapterOutcome]) -> Self {
        let had_errors = outcomes.iter().any(|outcome| !outcome.succeeded());
        let trailer = if had_errors {
            REPORT_ERROR_TRAILER
        } else {
            REPORT_OK_TRAILER
        };
        Self {
            attempted: outcomes.len(),
            had_errors,
            summary: format!("{REPORT_PREAMBLE}\n{trailer}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ChapterStarted {
        row: RowIndex,
    },
    PageSaved {
        row: RowIndex,
        page: usize,
        total: usize,
    },
    ChapterDownloaded {
        row: RowIndex,
        path: PathBuf,
    },
    ChapterFailed {
        row: RowIndex,
        message: String,
    },
    BatchFinished(BatchReport),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
