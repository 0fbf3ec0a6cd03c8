//! Append-only file sink with size-based rotation

use chrono::Local;
use htmltrace_core::{Error, Result};
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::format::rotation_stamp;

/// Device and inode of an open file
type FileId = (u64, u64);

/// Owns the handle of one active file and rotates it past `max_size`.
///
/// `current_size` counts entry bytes only: the preamble is never counted.
/// A freshly created file starts at 0. When the sink attaches to a file that
/// already exists, the counter starts at that file's length minus the
/// preamble length.
#[derive(Debug)]
pub struct RotatingSink {
    path: PathBuf,
    max_size: u64,
    current_size: u64,
    file: Option<File>,
    file_id: Option<FileId>,
    preamble: String,
}

impl RotatingSink {
    /// Create a sink for `path`. No file is touched until the first write.
    pub fn new(path: PathBuf, max_size: u64) -> Self {
        Self {
            path,
            max_size,
            current_size: 0,
            file: None,
            file_id: None,
            preamble: String::new(),
        }
    }

    /// Text written at the top of every file this sink creates
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Open the active file for append, creating it (with the preamble) if
    /// it is absent.
    ///
    /// A handle whose file disappeared or was renamed away since the last
    /// call is dropped first, so writes never land in an unlinked or rotated
    /// file.
    pub fn ensure_open(&mut self) -> Result<()> {
        if let Ok(metadata) = fs::metadata(&self.path) {
            if metadata.is_file() {
                if self.file.is_some() && self.file_id != file_id(&metadata) {
                    debug!("Log file replaced on disk: {}", self.path.display());
                    self.close();
                }
                if self.file.is_none() {
                    let file = OpenOptions::new().append(true).open(&self.path)?;
                    let metadata = file.metadata()?;
                    self.current_size = metadata
                        .len()
                        .saturating_sub(self.preamble.len() as u64);
                    self.file_id = file_id(&metadata);
                    debug!("Opened log file: {}", self.path.display());
                    self.file = Some(file);
                }
                return Ok(());
            }
        }

        self.close();
        self.create()
    }

    /// Append `data`, rotating first when it would push the file past
    /// `max_size`. The sink never retries a failed write.
    ///
    /// A file holding no entries is never rotated, so an entry larger than
    /// `max_size` is written alone to the fresh file.
    pub fn append(&mut self, data: &str) -> Result<()> {
        self.ensure_open()?;

        let len = data.len() as u64;
        if self.current_size > 0 && self.current_size + len > self.max_size {
            self.rotate()?;
        }

        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return Err(closed_handle(&self.path)),
        };
        file.write_all(data.as_bytes())?;
        file.flush()?;
        self.current_size += len;

        Ok(())
    }

    /// Rename the active file aside with a timestamp prefix and start a
    /// fresh one. Returns the path the old file was moved to.
    pub fn rotate(&mut self) -> Result<PathBuf> {
        debug!("Rotating log file: {}", self.path.display());

        self.close();

        let target = rotated_path(&self.path, &rotation_stamp(&Local::now()));
        fs::rename(&self.path, &target).map_err(|source| Error::RotationFailed {
            from: self.path.clone(),
            to: target.clone(),
            source,
        })?;

        self.current_size = 0;
        self.create()?;

        Ok(target)
    }

    /// Release the handle if one is open
    pub fn close(&mut self) {
        self.file_id = None;
        if let Some(file) = self.file.take() {
            let _ = file.sync_all();
        }
    }

    fn create(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(self.preamble.as_bytes())?;
        file.flush()?;
        debug!("Created log file: {}", self.path.display());

        self.file_id = file_id(&file.metadata()?);
        self.file = Some(file);
        self.current_size = 0;
        Ok(())
    }

    /// Get the active file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes counted against `max_size`
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Change the rotation threshold; applies from the next append
    pub fn set_max_size(&mut self, max_size: u64) {
        self.max_size = max_size;
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

impl Drop for RotatingSink {
    fn drop(&mut self) {
        self.close();
    }
}

/// Path for `base` rotated with `stamp`.
///
/// Two rotations inside the same second would collide, so an existing
/// target gets a counter: `<stamp>_trace.html`, `<stamp>-1_trace.html`, ...
pub fn rotated_path(base: &Path, stamp: &str) -> PathBuf {
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut candidate = base.with_file_name(format!("{}_{}", stamp, name));
    let mut counter = 1u32;
    while candidate.exists() {
        candidate = base.with_file_name(format!("{}-{}_{}", stamp, counter, name));
        counter += 1;
    }
    candidate
}

#[cfg(unix)]
fn file_id(metadata: &Metadata) -> Option<FileId> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn file_id(_metadata: &Metadata) -> Option<FileId> {
    None
}

fn closed_handle(path: &Path) -> Error {
    Error::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("log file handle is closed: {}", path.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "<!-- header -->";

    fn rotated_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.file_name().unwrap() != "trace.html")
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_sink_creation_is_lazy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let sink = RotatingSink::new(path.clone(), 100);
        assert!(!sink.is_open());
        assert!(!path.exists());
    }

    #[test]
    fn test_ensure_open_creates_with_preamble() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 100).with_preamble(HEADER);
        sink.ensure_open().unwrap();

        assert!(sink.is_open());
        assert_eq!(fs::read_to_string(&path).unwrap(), HEADER);
        assert_eq!(sink.current_size(), 0);
    }

    #[test]
    fn test_append_counts_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 1_000).with_preamble(HEADER);
        sink.append("hello").unwrap();
        sink.append(" world").unwrap();

        assert_eq!(sink.current_size(), 11);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}hello world", HEADER)
        );
    }

    #[test]
    fn test_existing_file_seeds_counter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");
        fs::write(&path, "0123456789").unwrap();

        let mut sink = RotatingSink::new(path.clone(), 1_000);
        sink.ensure_open().unwrap();
        assert_eq!(sink.current_size(), 10);

        sink.append("ab").unwrap();
        assert_eq!(sink.current_size(), 12);
        assert_eq!(fs::read_to_string(&path).unwrap(), "0123456789ab");
    }

    #[test]
    fn test_reopened_file_does_not_count_preamble() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 1_000).with_preamble(HEADER);
        sink.append("0123456789").unwrap();
        assert_eq!(sink.current_size(), 10);

        sink.close();
        sink.ensure_open().unwrap();
        assert_eq!(sink.current_size(), 10);

        let mut other = RotatingSink::new(path, 1_000).with_preamble(HEADER);
        other.ensure_open().unwrap();
        assert_eq!(other.current_size(), 10);
    }

    #[test]
    fn test_rotation_threshold_same_after_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 25).with_preamble(HEADER);
        sink.append("0123456789").unwrap();
        sink.close();

        // 10 + 10 fits whether or not the handle was reopened
        sink.append("0123456789").unwrap();
        assert!(rotated_files(dir.path()).is_empty());
        assert_eq!(sink.current_size(), 20);
    }

    #[cfg(unix)]
    #[test]
    fn test_handle_follows_rotation_by_another_sink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut a = RotatingSink::new(path.clone(), 1_000).with_preamble(HEADER);
        let mut b = RotatingSink::new(path.clone(), 1_000).with_preamble(HEADER);
        a.append("a-first").unwrap();
        b.append("b-first").unwrap();

        let rotated = a.rotate().unwrap();
        b.append("b-after-rotation").unwrap();

        let old = fs::read_to_string(&rotated).unwrap();
        assert!(old.contains("b-first"));
        assert!(!old.contains("b-after-rotation"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}b-after-rotation", HEADER)
        );
    }

    #[test]
    fn test_rotation_once_per_crossing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 25).with_preamble(HEADER);
        sink.append("0123456789").unwrap();
        sink.append("0123456789").unwrap();
        assert!(rotated_files(dir.path()).is_empty());

        // 20 + 10 > 25
        sink.append("abcdefghij").unwrap();

        let rotated = rotated_files(dir.path());
        assert_eq!(rotated.len(), 1);
        assert_eq!(sink.current_size(), 10);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}abcdefghij", HEADER)
        );
        assert_eq!(
            fs::read_to_string(&rotated[0]).unwrap(),
            format!("{}01234567890123456789", HEADER)
        );
    }

    #[test]
    fn test_oversized_entry_on_fresh_file_does_not_rotate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 4);
        sink.append("far more than four bytes").unwrap();

        assert!(rotated_files(dir.path()).is_empty());
        assert_eq!(sink.current_size(), 24);
    }

    #[test]
    fn test_rotated_name_has_timestamp_prefix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 1_000).with_preamble(HEADER);
        sink.append("data").unwrap();
        let rotated = sink.rotate().unwrap();

        let name = rotated.file_name().unwrap().to_string_lossy().into_owned();
        // YYYY-MM-DD_HH_MM_SS_trace.html
        assert_eq!(name.len(), "2024-01-01_00_00_00_trace.html".len());
        assert!(name.ends_with("_trace.html"));
        assert_eq!(&name[4..5], "-");
        assert_eq!(&name[10..11], "_");
        assert_eq!(sink.current_size(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), HEADER);
    }

    #[test]
    fn test_rotations_within_one_second_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let first = rotated_path(&path, "2024-01-01_00_00_00");
        fs::write(&first, "taken").unwrap();

        let second = rotated_path(&path, "2024-01-01_00_00_00");
        assert_ne!(first, second);
        assert!(second.ends_with("2024-01-01_00_00_00-1_trace.html"));

        let mut sink = RotatingSink::new(path.clone(), 1_000);
        sink.ensure_open().unwrap();
        let a = sink.rotate().unwrap();
        let b = sink.rotate().unwrap();
        assert_ne!(a, b);
        assert!(path.exists());
    }

    #[test]
    fn test_deleted_file_is_recreated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path.clone(), 1_000).with_preamble(HEADER);
        sink.append("before").unwrap();
        fs::remove_file(&path).unwrap();

        sink.append("after").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}after", HEADER)
        );
        assert_eq!(sink.current_size(), 5);
    }

    #[test]
    fn test_rotate_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.html");

        let mut sink = RotatingSink::new(path, 1_000);
        let result = sink.rotate();
        assert!(matches!(result, Err(Error::RotationFailed { .. })));
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut sink = RotatingSink::new(dir.path().join("trace.html"), 100);

        sink.close();
        sink.close();
        assert!(!sink.is_open());

        sink.ensure_open().unwrap();
        sink.close();
        sink.close();
        assert!(!sink.is_open());
    }

    #[test]
    fn test_rotated_path() {
        let base = PathBuf::from("/var/log/Trace App/trace.html");
        assert_eq!(
            rotated_path(&base, "2024-01-01_10_00_00"),
            PathBuf::from("/var/log/Trace App/2024-01-01_10_00_00_trace.html")
        );
    }
}
