use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use engine_logging::engine_info;
use mangadl_engine::{ChapterDescriptor, DownloadConfig, FetchSettings};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub download: DownloadConfig,
    pub api_base: String,
    pub log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            download: DownloadConfig::default(),
            api_base: FetchSettings::default().api_base,
            log: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            api_base: self.api_base.clone(),
            ..FetchSettings::default()
        }
    }
}

/// One manga's chapter table; the position in `chapters` is the row index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ChapterList {
    pub manga_title: String,
    pub chapters: Vec<ChapterDescriptor>,
}

/// `None` when the file does not exist; an unreadable or malformed file is an error.
///
/// Runs before the logger is configured, so it reports nothing itself.
pub(crate) fn read_config(path: &Path) -> anyhow::Result<Option<AppConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    let config: AppConfig =
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(Some(config))
}

pub(crate) fn load_chapter_list(path: &Path) -> anyhow::Result<ChapterList> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading chapter list {}", path.display()))?;
    let list: ChapterList = ron::from_str(&content)
        .with_context(|| format!("parsing chapter list {}", path.display()))?;
    engine_info!(
        "Loaded {} chapters of {:?} from {:?}",
        list.chapters.len(),
        list.manga_title,
        path
    );
    Ok(list)
}
