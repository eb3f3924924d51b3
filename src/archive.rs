// Archive flattening: unpack an uploaded ZIP into a target directory,
// dropping the single wrapper folder that "download as ZIP" tools add.
//
// Entry names are validated before anything is written, so a hostile
// archive cannot leave a half-extracted tree behind.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

/// Errors arising from archive extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The archive is not a readable ZIP file.
    #[error("invalid or corrupt ZIP: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while writing the extracted tree.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// An entry tries to escape the target directory.
    #[error("path traversal detected: {path}")]
    PathTraversal { path: String },

    /// Two entries map to the same location on disk.
    #[error("path collision while extracting: {}", path.display())]
    Collision { path: PathBuf },
}

/// What a flatten run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenSummary {
    pub files: usize,
    pub directories: usize,
    /// The wrapper folder that was removed, if the archive had one.
    pub stripped_root: Option<String>,
}

/// One archive entry with its name split into normalized segments.
#[derive(Debug)]
struct Entry {
    index: usize,
    segments: Vec<String>,
    is_dir: bool,
}

/// Extract `reader` into `target`, removing a lone top-level folder.
///
/// When every entry sits under one folder, that folder's contents land
/// directly in `target`. Otherwise (several top-level names, a lone plain
/// file, or no entries at all) the archive is extracted as-is.
pub fn flatten<R: Read + Seek>(reader: R, target: &Path) -> Result<FlattenSummary, ExtractionError> {
    let mut archive = ZipArchive::new(reader)?;
    let entries = read_entries(&mut archive)?;
    let root = single_root(&entries);

    fs::create_dir_all(target)?;
    let mut summary = FlattenSummary {
        stripped_root: root.map(str::to_string),
        ..FlattenSummary::default()
    };

    let skip = usize::from(root.is_some());
    for entry in &entries {
        let relative = match entry.segments.get(skip..) {
            Some(rest) if !rest.is_empty() => rest,
            _ => continue,
        };
        let dest = relative.iter().fold(target.to_path_buf(), |path, seg| path.join(seg));

        if entry.is_dir {
            create_dir(&dest)?;
            summary.directories += 1;
        } else {
            let mut file = archive.by_index(entry.index)?;
            let mode = file.unix_mode();
            write_file(&mut file, &dest, mode)?;
            summary.files += 1;
        }
    }

    log::debug!(
        "extracted {} files and {} directories into {}",
        summary.files,
        summary.directories,
        target.display()
    );
    Ok(summary)
}

fn read_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<Entry>, ExtractionError> {
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        let segments = normalize(file.name())?;
        if segments.is_empty() {
            continue;
        }
        entries.push(Entry {
            index,
            segments,
            is_dir: file.is_dir(),
        });
    }
    Ok(entries)
}

/// Split an entry name into path segments, rejecting anything that could
/// resolve outside the target directory.
///
/// Archives written on Windows may use `\` as the separator, so both
/// separators split segments. Drive prefixes such as `C:` are refused.
fn normalize(name: &str) -> Result<Vec<String>, ExtractionError> {
    let traversal = || ExtractionError::PathTraversal {
        path: name.to_string(),
    };
    if name.starts_with(['/', '\\']) {
        return Err(traversal());
    }
    let mut segments = Vec::new();
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return Err(traversal()),
            _ if segment.contains(':') => return Err(traversal()),
            _ => segments.push(segment.to_string()),
        }
    }
    Ok(segments)
}

/// The wrapper folder, if every entry lives beneath the same one.
///
/// A single top-level *file* is not a wrapper: stripping it would leave
/// nothing to extract.
fn single_root(entries: &[Entry]) -> Option<&str> {
    let roots: BTreeSet<&str> = entries
        .iter()
        .filter_map(|entry| entry.segments.first().map(String::as_str))
        .collect();
    if roots.len() != 1 {
        return None;
    }
    let is_folder = entries
        .iter()
        .all(|entry| entry.is_dir || entry.segments.len() > 1);
    if is_folder {
        roots.into_iter().next()
    } else {
        None
    }
}

fn create_dir(dest: &Path) -> Result<(), ExtractionError> {
    if dest.exists() && !dest.is_dir() {
        return Err(ExtractionError::Collision {
            path: dest.to_path_buf(),
        });
    }
    fs::create_dir_all(dest)?;
    Ok(())
}

fn write_file(source: &mut impl Read, dest: &Path, mode: Option<u32>) -> Result<(), ExtractionError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ExtractionError::Collision {
                path: dest.to_path_buf(),
            },
            _ => ExtractionError::Io(e),
        })?;
    io::copy(source, &mut out)?;
    apply_mode(dest, mode)?;
    Ok(())
}

#[cfg(unix)]
fn apply_mode(dest: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    match mode {
        Some(mode) => fs::set_permissions(dest, fs::Permissions::from_mode(mode & 0o777)),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn apply_mode(_dest: &Path, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}
