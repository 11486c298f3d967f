use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::archive::{archive_directory, ArchiveError};
use crate::fetch::FetcherFactory;
use crate::filename::{chapter_destination, DestinationRequest};
use crate::persist::{ensure_output_dir, page_filename, write_page, PersistError};
use crate::{ChapterDescriptor, DownloadConfig, FetchError};

/// Why a single chapter could not be saved. Every variant is terminal for that chapter only.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot reach a page server: {0}")]
    Construction(#[source] FetchError),
    #[error("cannot prepare directory: {0}")]
    Directory(#[source] PersistError),
    #[error("page {page} of {total}: {source}")]
    Fetch {
        page: usize,
        total: usize,
        source: FetchError,
    },
    #[error("cannot write {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
    #[error("archive failed: {0}")]
    Archive(#[source] ArchiveError),
    #[error("cannot remove {path:?} after archiving: {source}")]
    Cleanup { path: PathBuf, source: io::Error },
    #[error("download cancelled")]
    Cancelled,
}

/// Progress callback invoked after each page lands on disk: `(page, total)`, 1-based.
pub type PageProgress<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

pub struct ChapterSaver {
    factory: Arc<dyn FetcherFactory>,
    config: DownloadConfig,
}

impl ChapterSaver {
    pub fn new(factory: Arc<dyn FetcherFactory>, config: DownloadConfig) -> Self {
        Self { factory, config }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Raw page directory for `chapter`.
    pub fn page_dir(&self, manga_title: &str, chapter: &ChapterDescriptor) -> PathBuf {
        chapter_destination(&DestinationRequest::for_chapter(
            manga_title,
            chapter,
            &self.config,
        ))
    }

    /// The chapter's final artifact, if a previous run already produced it.
    pub fn existing_artifact(&self, manga_title: &str, chapter: &ChapterDescriptor) -> Option<PathBuf> {
        let path = chapter_destination(
            &DestinationRequest::for_chapter(manga_title, chapter, &self.config)
                .archived(&self.config),
        );
        path.exists().then_some(path)
    }

    /// Downloads every page of `chapter` in reading order and optionally archives it.
    ///
    /// Returns the final artifact: the page directory, or the archive file.
    pub async fn save_chapter(
        &self,
        manga_title: &str,
        chapter: &ChapterDescriptor,
        cancel: &CancellationToken,
        on_page: PageProgress<'_>,
    ) -> Result<PathBuf, SaveError> {
        if cancel.is_cancelled() {
            return Err(SaveError::Cancelled);
        }
        let fetcher = self
            .factory
            .page_fetcher(chapter, self.config.quality, self.config.force_port_443)
            .await
            .map_err(SaveError::Construction)?;

        let dir = self.page_dir(manga_title, chapter);
        ensure_output_dir(&dir).map_err(SaveError::Directory)?;

        let pages = chapter.pages(self.config.quality);
        let total = pages.len();
        for (index, page_ref) in pages.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(SaveError::Cancelled);
            }
            let bytes = fetcher
                .fetch_page(page_ref)
                .await
                .map_err(|source| SaveError::Fetch {
                    page: index + 1,
                    total,
                    source,
                })?;
            let filename = page_filename(index, page_ref);
            write_page(&dir, &filename, &bytes).map_err(|source| SaveError::Write {
                path: dir.join(&filename),
                source,
            })?;
            engine_debug!("wrote {:?} ({} bytes)", dir.join(&filename), bytes.len());
            on_page(index + 1, total);
        }

        if !self.config.as_archive {
            return Ok(dir);
        }
        let archive = archive_directory(&dir, &self.config.archive_extension)
            .map_err(SaveError::Archive)?;
        fs::remove_dir_all(&dir).map_err(|source| SaveError::Cleanup {
            path: dir.clone(),
            source,
        })?;
        engine_info!("archived {} pages into {:?}", total, archive);
        Ok(archive)
    }
}
