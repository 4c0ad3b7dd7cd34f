//! Zip extraction with a path-traversal guard

use std::fs::File;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::application::errors::ExtractError;
use crate::infrastructure::config::join_within;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// What an extraction wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
}

struct PlannedEntry {
    index: usize,
    target: PathBuf,
    is_dir: bool,
    mode: Option<u32>,
}

/// Unpack every entry of the zip at `archive_path` under `dest_dir`.
///
/// All entry names are checked before anything is written: a single entry
/// resolving outside `dest_dir` fails the whole archive with
/// `ExtractError::PathEscape` and leaves the destination untouched.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<ExtractSummary, ExtractError> {
    let file = File::open(archive_path).map_err(|e| ExtractError::ArchiveOpen {
        path: archive_path.to_path_buf(),
        source: e.into(),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| ExtractError::ArchiveOpen {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let plan = plan_entries(&mut archive, dest_dir)?;
    let mut summary = ExtractSummary::default();

    for entry in plan {
        if entry.is_dir {
            create_dir_all(&entry.target)?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = entry.target.parent() {
            create_dir_all(parent)?;
        }

        let mut source = archive.by_index(entry.index).map_err(ExtractError::Archive)?;
        let mut out = File::create(&entry.target).map_err(|e| fs_error(&entry.target, e))?;
        std::io::copy(&mut source, &mut out).map_err(|e| fs_error(&entry.target, e))?;
        drop(out);

        apply_mode(&entry.target, entry.mode)?;
        tracing::debug!("Extracted {}", entry.target.display());
        summary.files += 1;
    }

    Ok(summary)
}

fn plan_entries(archive: &mut ZipArchive<File>, dest_dir: &Path) -> Result<Vec<PlannedEntry>, ExtractError> {
    let mut plan = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(ExtractError::Archive)?;
        let name = entry.name().to_string();

        let target = join_within(dest_dir, &name)
            .ok_or_else(|| ExtractError::PathEscape { entry: name.clone() })?;

        let mode = entry.unix_mode();
        if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            tracing::warn!("Skipping symlink entry {}", name);
            continue;
        }

        plan.push(PlannedEntry {
            index,
            target,
            is_dir: entry.is_dir(),
            mode,
        });
    }

    Ok(plan)
}

fn create_dir_all(path: &Path) -> Result<(), ExtractError> {
    std::fs::create_dir_all(path).map_err(|e| fs_error(path, e))
}

fn fs_error(path: &Path, source: std::io::Error) -> ExtractError {
    ExtractError::Filesystem { path: path.to_path_buf(), source }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<(), ExtractError> {
    use std::os::unix::fs::PermissionsExt;

    let Some(mode) = mode else {
        return Ok(());
    };
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o7777))
        .map_err(|e| fs_error(path, e))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<(), ExtractError> {
    Ok(())
}
