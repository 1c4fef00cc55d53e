//! Crash-safe writes for exported logs and schedules.
//!
//! Bytes land in a temp file beside the destination and are renamed into place,
//! so a reader never observes a half-written export. Rename-over-existing fails
//! on Windows; there the old file is parked as `.bak` until the new one lands.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// What to do when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    #[default]
    Replace,
    /// Fail with [`io::ErrorKind::AlreadyExists`].
    Refuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicWriteOptions {
    /// `sync_all` the temp file before it is renamed.
    pub sync: bool,
    pub overwrite: Overwrite,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self {
        Self {
            sync: true,
            overwrite: Overwrite::Replace,
        }
    }
}

impl AtomicWriteOptions {
    #[must_use]
    pub fn refuse_existing(self) -> Self {
        Self {
            overwrite: Overwrite::Refuse,
            ..self
        }
    }
}

pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: AtomicWriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if options.sync {
        tmp.as_file().sync_all()?;
    }

    match options.overwrite {
        Overwrite::Refuse => {
            tmp.persist_noclobber(path).map_err(|err| err.error)?;
        }
        Overwrite::Replace => persist_replacing(tmp, path)?,
    }

    if options.sync {
        sync_dir(parent);
    }
    debug!(path = %path.display(), bytes = bytes.len(), "Atomic write complete");
    Ok(())
}

fn persist_replacing(tmp: NamedTempFile, path: &Path) -> io::Result<()> {
    let Err(err) = tmp.persist(path) else {
        return Ok(());
    };
    if !path.exists() {
        return Err(err.error);
    }

    let backup = path.with_extension("bak");
    let _ = fs::remove_file(&backup);
    fs::rename(path, &backup)?;
    if let Err(retry) = err.file.persist(path) {
        let _ = fs::rename(&backup, path);
        return Err(retry.error);
    }
    if let Err(e) = fs::remove_file(&backup) {
        warn!(path = %backup.display(), "Failed to remove backup after atomic write: {e}");
    }
    Ok(())
}

/// Best effort: a failed directory sync leaves the file written but not yet durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!(path = %dir.display(), "Directory sync failed: {e}");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
