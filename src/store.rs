//! Atomic JSON persistence.
//!
//! Reads never fail: a missing or malformed file degrades to the caller's default.
//! Writes go to a temporary sibling first and are renamed over the target, so a crash
//! mid-write never leaves a truncated file behind.

use crate::{ContentValue, statics};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("creating directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing temporary file for {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("backing up {path:?}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("replacing {path:?}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Keep the previous version as `<file>.bak` before replacing it.
    pub backup: bool,
}

/// Read `path` as JSON, falling back to `default` when absent or unparsable.
pub fn read(path: &Path, default: ContentValue) -> ContentValue {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return default,
        Err(e) => {
            log::warn!("reading {path:?} failed, using default: {e}");
            return default;
        }
    };

    match ContentValue::parse(&text) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{path:?} is not valid JSON, using default: {e:#}");
            default
        }
    }
}

pub fn write(path: &Path, value: &ContentValue) -> Result<(), StoreError> {
    write_with(path, value, WriteOptions::default())
}

pub fn write_with(
    path: &Path,
    value: &ContentValue,
    options: WriteOptions,
) -> Result<(), StoreError> {
    stage(path, value, options)?.commit()
}

/// Write the serialized value to a temp sibling of `path` without touching `path` itself.
/// Nothing observable changes until [`StagedWrite::commit`]; dropping the stage discards it.
pub fn stage(
    path: &Path,
    value: &ContentValue,
    options: WriteOptions,
) -> Result<StagedWrite, StoreError> {
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let text = value.to_pretty_json();
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.as_file()
        .set_permissions(target_permissions(path, tmp.as_file())?)
        .map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    Ok(StagedWrite {
        tmp,
        target: path.to_path_buf(),
        options,
    })
}

/// A fully written temp file waiting to replace its target.
#[derive(Debug)]
pub struct StagedWrite {
    tmp: NamedTempFile,
    target: PathBuf,
    options: WriteOptions,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        self.tmp.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn commit(self) -> Result<(), StoreError> {
        if self.options.backup && self.target.exists() {
            let bak = backup_path(&self.target);
            fs::copy(&self.target, &bak).map_err(|source| StoreError::Backup {
                path: bak.clone(),
                source,
            })?;
        }

        self.tmp
            .persist(&self.target)
            .map_err(|e| StoreError::Persist {
                path: self.target.clone(),
                source: e.error,
            })?;
        log::debug!("wrote {:?}", self.target);
        Ok(())
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(statics::FILE_EXT_BACKUP);
    path.with_file_name(name)
}

/// Permissions the replaced file should keep: the target's own, or a world-readable
/// default for new files. Temp files start out owner-only.
fn target_permissions(path: &Path, tmp: &fs::File) -> Result<fs::Permissions, StoreError> {
    if let Ok(meta) = fs::metadata(path) {
        return Ok(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = tmp;
        Ok(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        tmp.metadata()
            .map(|meta| meta.permissions())
            .map_err(|source| StoreError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::backup_path;
    use std::path::Path;

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/x/info.json")),
            Path::new("/x/info.json.bak")
        );
    }
}
