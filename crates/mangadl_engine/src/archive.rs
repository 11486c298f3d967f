use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, Timelike};
use engine_logging::engine_debug;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("cannot create archive {path:?}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("cannot walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("cannot open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot add entry {name}: {source}")]
    Entry {
        name: String,
        source: zip::result::ZipError,
    },
    #[error("cannot copy {path:?} into archive: {source}")]
    Copy { path: PathBuf, source: io::Error },
    #[error("cannot finish archive {path:?}: {source}")]
    Finish {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

/// `{dir}.{extension}`, the sibling file an archived directory is written to.
pub fn archive_path(dir: &Path, extension: &str) -> PathBuf {
    let mut name = dir.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Packs every file under `source_dir` into `{source_dir}.{extension}`.
///
/// Entries are flat: only the base filename is stored, directories are
/// skipped. Every entry is deflated and stamped with the current local time.
/// The first error aborts the walk; the archive is closed but may be
/// incomplete.
pub fn archive_directory(source_dir: &Path, extension: &str) -> Result<PathBuf, ArchiveError> {
    let path = archive_path(source_dir, extension);
    let file = File::create(&path).map_err(|source| ArchiveError::Create {
        path: path.clone(),
        source,
    })?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(archive_timestamp());

    let walked = add_entries(&mut writer, source_dir, options);
    // Finish even after a failed walk so the file handle is released.
    let finished = writer.finish();
    walked?;
    finished.map_err(|source| ArchiveError::Finish {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn add_entries(
    writer: &mut ZipWriter<File>,
    source_dir: &Path,
    options: FileOptions,
) -> Result<(), ArchiveError> {
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: source_dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let mut original = File::open(entry.path()).map_err(|source| ArchiveError::Open {
            path: entry.path().to_path_buf(),
            source,
        })?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|source| ArchiveError::Entry {
                name: name.clone(),
                source,
            })?;
        io::copy(&mut original, writer).map_err(|source| ArchiveError::Copy {
            path: entry.path().to_path_buf(),
            source,
        })?;
        engine_debug!("archived {}", name);
    }
    Ok(())
}

// Entries carry creation time rather than source mtimes; readers disagree on legacy mtime encodings.
fn archive_timestamp() -> zip::DateTime {
    let now = Local::now();
    zip::DateTime::from_date_and_time(
        u16::try_from(now.year()).unwrap_or(1980),
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    )
    .unwrap_or_default()
}
