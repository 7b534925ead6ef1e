//! Adventure channel pointer: a one-line file naming the announcement channel.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::db::StoreError;

/// File name used when no path is configured.
pub const DEFAULT_CHANNEL_FILE: &str = "current_channel.txt";

/// Stores the active adventure channel identifier in a plain text file.
#[derive(Debug, Clone)]
pub struct ChannelPointer {
    path: PathBuf,
}

impl ChannelPointer {
    /// Creates a pointer backed by the file at `path`.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the stored channel with `channel_id`.
    ///
    /// Leading and trailing whitespace is stripped before writing, so the file
    /// holds only the bare identifier.
    ///
    /// The identifier is written to a temporary file beside the target, then
    /// renamed over it, so readers see either the old or the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `InvalidArgument` for a blank
    /// identifier, or `Storage` if the file cannot be written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn set_adventure_channel(&self, channel_id: &str) -> Result<(), StoreError> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Err(StoreError::invalid_argument("Channel identifier is empty"));
        }

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(channel_id.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::from(e.error))?;

        info!(channel_id, "Adventure channel set");
        Ok(())
    }

    /// Reads the stored channel. Returns `None` if none has been set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn adventure_channel(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                debug!(channel_id = %content, "Adventure channel read");
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No adventure channel set");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreErrorKind;

    #[test]
    fn unset_channel_reads_none() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let pointer = ChannelPointer::new(dir.path().join(DEFAULT_CHANNEL_FILE));
        assert_eq!(pointer.adventure_channel().expect("Read failed"), None);
    }

    #[test]
    fn shorter_value_leaves_no_leftover() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(DEFAULT_CHANNEL_FILE);
        let pointer = ChannelPointer::new(&path);

        pointer
            .set_adventure_channel("987654321098765432")
            .expect("First write failed");
        pointer.set_adventure_channel("12345").expect("Second write failed");

        let raw = std::fs::read_to_string(&path).expect("Read failed");
        assert_eq!(raw, "12345");
        assert_eq!(
            pointer.adventure_channel().expect("Read failed").as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(DEFAULT_CHANNEL_FILE);
        let pointer = ChannelPointer::new(&path);

        pointer.set_adventure_channel(" 12345\n").expect("Write failed");
        assert_eq!(std::fs::read_to_string(&path).expect("Read failed"), "12345");
    }

    #[test]
    fn blank_channel_is_rejected() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let pointer = ChannelPointer::new(dir.path().join(DEFAULT_CHANNEL_FILE));
        let err = pointer.set_adventure_channel("   ").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::InvalidArgument);
        assert!(pointer.adventure_channel().expect("Read failed").is_none());
    }

    #[test]
    fn write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let pointer = ChannelPointer::new(dir.path().join(DEFAULT_CHANNEL_FILE));
        pointer.set_adventure_channel("42").expect("Write failed");

        let entries = std::fs::read_dir(dir.path()).expect("List failed").count();
        assert_eq!(entries, 1);
    }
}
