//! mangadl engine: chapter download, persistence and archival pipeline.
mod archive;
mod engine;
mod fetch;
mod filename;
mod persist;
mod saver;
mod types;

pub use archive::{archive_directory, archive_path, ArchiveError};
pub use engine::{run_batch, ChannelEventSink, EngineHandle, EventSink};
pub use fetch::{AtHomeClient, FetchSettings, FetcherFactory, PageFetcher};
pub use filename::{
    chapter_destination, chapter_folder_name, sanitize_component, DestinationRequest,
    RESTRICTED_CHARS,
};
pub use persist::{ensure_output_dir, page_filename, write_page, PersistError};
pub use saver::{ChapterSaver, PageProgress, SaveError};
pub use types::{
    BatchReport, ChapterDescriptor, ChapterOutcome, DownloadConfig, EngineEvent, FailureKind,
    FetchError, Quality, RowIndex, SelectionBatch, REPORT_ERROR_TRAILER, REPORT_OK_TRAILER,
    REPORT_PREAMBLE,
};
