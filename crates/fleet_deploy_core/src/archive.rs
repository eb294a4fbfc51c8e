use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

struct ArchiveEntry {
    relative: String,
    source: Option<PathBuf>,
}

/// Packages the contents of `root` into an in-memory zip archive.
///
/// Entries are sorted by relative path and carry the zip default timestamp,
/// so packaging the same tree twice yields identical bytes. Archive paths
/// are relative to `root` with no leading directory prefix. Directory
/// entries are emitted so empty directories survive the round trip.
pub fn package_directory(root: &Path) -> Result<Vec<u8>, String> {
    let mut entries = Vec::new();
    collect_entries(root, root, &mut entries)?;
    entries.sort_by(|a, b| a.relative.cmp(&b.relative));

    let directory_options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    let file_options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .unix_permissions(0o644);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        match entry.source {
            None => {
                writer
                    .add_directory(entry.relative.as_str(), directory_options)
                    .map_err(|error| {
                        format!(
                            "failed to add directory entry '{}': {error}",
                            entry.relative
                        )
                    })?;
            }
            Some(path) => {
                let contents = fs::read(&path)
                    .map_err(|error| format!("failed to read '{}': {error}", path.display()))?;
                writer
                    .start_file(entry.relative.as_str(), file_options)
                    .map_err(|error| {
                        format!("failed to start archive entry '{}': {error}", entry.relative)
                    })?;
                writer.write_all(&contents).map_err(|error| {
                    format!("failed to write archive entry '{}': {error}", entry.relative)
                })?;
            }
        }
    }

    let cursor = writer
        .finish()
        .map_err(|error| format!("failed to finish archive: {error}"))?;
    Ok(cursor.into_inner())
}

fn collect_entries(
    root: &Path,
    directory: &Path,
    entries: &mut Vec<ArchiveEntry>,
) -> Result<(), String> {
    let listing = fs::read_dir(directory)
        .map_err(|error| format!("failed to read directory '{}': {error}", directory.display()))?;

    for entry in listing {
        let entry = entry.map_err(|error| {
            format!(
                "failed to read directory entry under '{}': {error}",
                directory.display()
            )
        })?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|error| format!("failed to inspect '{}': {error}", path.display()))?;

        if file_type.is_dir() {
            entries.push(ArchiveEntry {
                relative: relative_archive_path(root, &path)?,
                source: None,
            });
            collect_entries(root, &path, entries)?;
        } else if file_type.is_file() {
            entries.push(ArchiveEntry {
                relative: relative_archive_path(root, &path)?,
                source: Some(path),
            });
        }
        // symlinks and other special entries are not packaged
    }

    Ok(())
}

fn relative_archive_path(root: &Path, path: &Path) -> Result<String, String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|error| format!("'{}' is outside the packaged root: {error}", path.display()))?;

    let mut segments = Vec::new();
    for component in relative.components() {
        let segment = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| format!("non-UTF-8 path under '{}'", root.display()))?;
        segments.push(segment);
    }

    Ok(segments.join("/"))
}
