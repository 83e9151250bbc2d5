//! Filesystem seam for the list pipeline.
//!
//! The pipeline only needs to read a list and write its replacement. Going
//! through a trait lets tests drive read failures and assert that nothing is
//! written, using the mockall-generated `MockFileSystem`.

use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

#[cfg(test)]
use mockall::automock;

/// Mode given to a list file that did not exist before the write.
pub const DEFAULT_LIST_MODE: u32 = 0o644;

/// Filesystem operations the pipeline and commands rely on.
///
/// Lists are read as raw bytes so a badly encoded line can be decoded on its
/// own instead of failing the whole file.
///
/// # Example (production)
/// ```no_run
/// use edlman::fs_abstraction::{real_fs, FileSystem};
/// use std::path::Path;
///
/// let bytes = real_fs().read(Path::new("/srv/edl/edl-block.txt"))?;
/// real_fs().write(Path::new("/srv/edl/edl-block.txt-X.txt"), &bytes)?;
/// # Ok::<(), std::io::Error>(())
/// ```
///
/// # Example (testing)
/// ```ignore
/// use edlman::fs_abstraction::MockFileSystem;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_read()
///     .returning(|_| Ok(b"10.0.0.1 # host # 2024-01-01\n".to_vec()));
/// mock_fs.expect_write().times(0);
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem {
    /// Read file contents as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file at `path` with `contents`, creating it if needed.
    /// An existing file keeps its permission bits.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Get file metadata.
    fn metadata(&self, path: &Path) -> io::Result<std::fs::Metadata>;

    /// Set Unix file permissions mode (e.g., 0o644).
    fn set_permissions_mode(&self, path: &Path, mode: u32) -> io::Result<()>;
}

/// Real filesystem. Writes go through a temporary file in the target
/// directory followed by a rename, so readers never see a half-written list.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Mode the replacement file should carry: the current file's, or
    /// [`DEFAULT_LIST_MODE`] for a new one.
    fn target_mode(&self, path: &Path) -> io::Result<u32> {
        match self.metadata(path) {
            Ok(meta) => Ok(meta.permissions().mode() & 0o7777),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DEFAULT_LIST_MODE),
            Err(e) => Err(e),
        }
    }
}

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mode = self.target_mode(path)?;
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(contents)?;
        // NamedTempFile is created 0600
        self.set_permissions_mode(temp_file.path(), mode)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn metadata(&self, path: &Path) -> io::Result<std::fs::Metadata> {
        std::fs::metadata(path)
    }

    fn set_permissions_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Shared production filesystem instance.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}
