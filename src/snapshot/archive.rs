//! Directory archiving
//!
//! Packs a directory tree into a deflate-compressed zip. Entry names are
//! relative to the parent of the source, so the first entry is the source
//! directory itself (`saves/`) and everything else sits beneath it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Component, Path};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{SaveError, SaveResult};

/// Archive `source` into a new package at `destination`
///
/// The destination is created exclusively: an existing file is never
/// overwritten. If reading the source fails midway, the partial package is
/// left where it is.
pub fn archive(source: &Path, destination: &Path) -> SaveResult<()> {
    info!("~ {} -> {}", source.display(), destination.display());

    if !source.exists() {
        return Err(SaveError::path_not_found(source.display().to_string()));
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                SaveError::Conflict(format!("{} already exists", destination.display()))
            } else {
                SaveError::Io(format!(
                    "Failed to create {}: {}",
                    destination.display(),
                    e
                ))
            }
        })?;

    let mut writer = ZipWriter::new(BufWriter::new(file));
    write_tree(&mut writer, source)?;
    writer.finish()?.flush()?;

    Ok(())
}

fn write_tree<W: Write + io::Seek>(writer: &mut ZipWriter<W>, source: &Path) -> SaveResult<()> {
    let root = source.parent().unwrap_or_else(|| Path::new(""));

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| SaveError::Io(format!("Failed to walk source: {}", e)))?;
        let path = entry.path();
        debug!("> {}", path.display());

        let relative = path.strip_prefix(root).map_err(|_| {
            SaveError::Validation(format!("{} is outside {}", path.display(), root.display()))
        })?;
        let metadata = entry
            .metadata()
            .map_err(|e| SaveError::Io(format!("Failed to stat {}: {}", path.display(), e)))?;
        let is_dir = metadata.is_dir();
        let name = entry_name(relative, is_dir)?;

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(permission_bits(&metadata, is_dir));

        if is_dir {
            writer.add_directory(name, options)?;
            continue;
        }

        let file = File::open(path)
            .map_err(|e| SaveError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
        writer.start_file(name, options)?;
        io::copy(&mut BufReader::new(file), writer)
            .map_err(|e| SaveError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    }

    Ok(())
}

/// Build the package entry name for a path relative to the archive root
///
/// Components are joined with `/` whatever the host separator is, and
/// directory entries end with `/`.
pub fn entry_name(relative: &Path, is_dir: bool) -> SaveResult<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    SaveError::Validation(format!(
                        "path is not valid UTF-8: {}",
                        relative.display()
                    ))
                })?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(SaveError::Validation(format!(
                    "unsupported path component in {}",
                    relative.display()
                )))
            }
        }
    }

    let mut name = parts.join("/");
    if is_dir && !name.ends_with('/') {
        name.push('/');
    }
    Ok(name)
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata, _is_dir: bool) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata, is_dir: bool) -> u32 {
    match (is_dir, metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}
