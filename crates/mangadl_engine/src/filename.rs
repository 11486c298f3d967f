use std::path::{Path, PathBuf};

use crate::{ChapterDescriptor, DownloadConfig, Quality};

/// Characters removed from manga titles and chapter folder names.
pub const RESTRICTED_CHARS: &[char] = &['<', '>', ':', '/', '|', '?', '*', '"', '\\', '.'];

/// Everything that determines where a chapter lands on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationRequest<'a> {
    pub manga_title: &'a str,
    pub chapter_number: &'a str,
    pub language: &'a str,
    pub quality: Quality,
    pub chapter_title: &'a str,
    pub chapter_id: &'a str,
    /// Archive extension to append, or `None` for the plain page directory.
    pub archive_extension: Option<&'a str>,
    pub root: &'a Path,
}

impl<'a> DestinationRequest<'a> {
    /// Request for the raw page directory of `chapter`.
    pub fn for_chapter(
        manga_title: &'a str,
        chapter: &'a ChapterDescriptor,
        config: &'a DownloadConfig,
    ) -> Self {
        Self {
            manga_title,
            chapter_number: &chapter.chapter,
            language: &chapter.translated_language,
            quality: config.quality,
            chapter_title: &chapter.title,
            chapter_id: &chapter.id,
            archive_extension: None,
            root: &config.download_dir,
        }
    }

    /// Same request with the configured archive suffix applied, if archiving is on.
    pub fn archived(mut self, config: &'a DownloadConfig) -> Self {
        self.archive_extension = config
            .as_archive
            .then_some(config.archive_extension.as_str());
        self
    }
}

/// `root/{manga}/{chapter folder}` with an optional `.{ext}` suffix.
pub fn chapter_destination(request: &DestinationRequest<'_>) -> PathBuf {
    let manga = sanitize_component(request.manga_title);
    let chapter = sanitize_component(&chapter_folder_name(request));
    let mut path = request.root.join(manga).join(chapter);
    if let Some(ext) = request.archive_extension {
        let mut name = path.into_os_string();
        name.push(".");
        name.push(ext);
        path = PathBuf::from(name);
    }
    path
}

/// Unsanitized folder name: `Chapter{num} [{LANG}-{quality}] {title}_{id prefix}`.
pub fn chapter_folder_name(request: &DestinationRequest<'_>) -> String {
    format!(
        "Chapter{} [{}-{}] {}_{}",
        request.chapter_number,
        request.language.to_uppercase(),
        request.quality,
        request.chapter_title,
        short_id(request.chapter_id)
    )
}

pub fn sanitize_component(input: &str) -> String {
    input
        .chars()
        .filter(|c| !RESTRICTED_CHARS.contains(c))
        .collect()
}

// Chapter ids are UUIDs; the first hyphen-delimited group disambiguates folders.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}
