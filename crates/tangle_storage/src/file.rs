//! File-based storage backend.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// Two modes exist:
///
/// - [`FileBackend::open`] opens or creates the file for reading and appending.
///   Fixtures and tools that build stores use this mode.
/// - [`FileBackend::open_read_only`] opens an existing file without write
///   access and, optionally, under a shared advisory lock. The exporter only
///   ever uses this mode, so it cannot modify a store.
///
/// # Example
///
/// ```no_run
/// use tangle_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open_read_only(Path::new("metadata.dat"), true).unwrap();
/// println!("{} bytes", backend.size().unwrap());
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: RwLock<File>,
    size: RwLock<u64>,
    read_only: bool,
}

impl FileBackend {
    /// Opens or creates a file backend at the given path.
    ///
    /// Existing content is preserved; appends go to the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Self::from_file(path, file, false)
    }

    /// Opens or creates a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or file cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Opens an existing file for reading only.
    ///
    /// The file is never created. With `lock` set, a shared advisory lock is
    /// taken and held until the backend is dropped; a writer holding an
    /// exclusive lock makes this fail with [`StorageError::Locked`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be opened, or is
    /// exclusively locked.
    pub fn open_read_only(path: &Path, lock: bool) -> StorageResult<Self> {
        let file = OpenOptions::new().read(true).open(path)?;

        if lock {
            if let Err(e) = FileExt::try_lock_shared(&file) {
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
                {
                    return Err(StorageError::Locked {
                        path: path.to_path_buf(),
                    });
                }
                return Err(e.into());
            }
        }

        Self::from_file(path, file, true)
    }

    fn from_file(path: &Path, file: File, read_only: bool) -> StorageResult<Self> {
        let size = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            size: RwLock::new(size),
            read_only,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the backend rejects writes.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = *self.size.read();
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }

        if data.is_empty() {
            return Ok(*self.size.read());
        }

        let mut file = self.file.write();
        let mut size = self.size.write();

        let offset = *size;
        file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        *size += data.len() as u64;

        Ok(offset)
    }

    fn flush(&mut self) -> StorageResult<()> {
        if self.read_only {
            return Ok(());
        }
        let mut file = self.file.write();
        file.flush()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_create_new() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.dat");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
        assert!(!backend.is_read_only());
    }

    #[test]
    fn file_append_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.dat");

        let mut backend = FileBackend::open(&path).unwrap();

        assert_eq!(backend.append(b"trunk").unwrap(), 0);
        assert_eq!(backend.append(b"branch").unwrap(), 5);
        assert_eq!(backend.size().unwrap(), 11);

        let data = backend.read_at(5, 6).unwrap();
        assert_eq!(&data, b"branch");
    }

    #[test]
    fn file_read_past_end_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.dat");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"hello").unwrap();

        let result = backend.read_at(3, 5);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn reopen_preserves_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.dat");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.append(b"persistent data").unwrap();
            backend.flush().unwrap();
        }

        let mut backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 15);
        assert_eq!(backend.append(b"!").unwrap(), 15);
    }

    #[test]
    fn read_only_missing_file_fails_without_creating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.dat");

        let result = FileBackend::open_read_only(&path, false);
        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn read_only_rejects_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.dat");
        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.append(b"record").unwrap();
        }

        let mut backend = FileBackend::open_read_only(&path, true).unwrap();
        assert!(backend.is_read_only());
        assert!(matches!(backend.append(b"x"), Err(StorageError::ReadOnly)));
        assert!(backend.flush().is_ok());
        assert_eq!(backend.read_at(0, 6).unwrap(), b"record");
        assert_eq!(backend.size().unwrap(), 6);
    }

    #[test]
    fn shared_locks_coexist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.dat");
        FileBackend::open(&path).unwrap();

        let first = FileBackend::open_read_only(&path, true).unwrap();
        let second = FileBackend::open_read_only(&path, true).unwrap();
        assert_eq!(first.size().unwrap(), second.size().unwrap());
    }

    #[test]
    fn exclusive_lock_blocks_read_only_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.dat");
        let writer = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .unwrap();
        FileExt::try_lock_exclusive(&writer).unwrap();

        let result = FileBackend::open_read_only(&path, true);
        assert!(matches!(result, Err(StorageError::Locked { .. })));

        let unlocked = FileBackend::open_read_only(&path, false);
        assert!(unlocked.is_ok());
    }

    #[test]
    fn file_create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db").join("tangle").join("metadata.dat");

        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert_eq!(backend.path(), path);
    }
}
