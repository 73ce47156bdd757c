mod os_fs;

use std::fmt::Debug;
use std::io;
use std::path::Path;
use std::time::SystemTime;

pub use os_fs::OsFileSystem;

/// The metadata a staleness check compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    /// `None` on platforms that do not record a modification time.
    pub modified: Option<SystemTime>,
    pub size: u64,
    pub is_file: bool,
}

impl Stat {
    pub fn new(modified: Option<SystemTime>, size: u64, is_file: bool) -> Self {
        Self {
            modified,
            size,
            is_file,
        }
    }
}

impl From<&std::fs::Metadata> for Stat {
    fn from(meta: &std::fs::Metadata) -> Self {
        // This field might not be available on all platforms,
        // and will return an Err on platforms where it is not available.
        Self::new(meta.modified().ok(), meta.len(), meta.is_file())
    }
}

/// Backing store for [`crate::FileCache`]. Every capability comes in a
/// blocking and a non-blocking form.
#[async_trait::async_trait]
pub trait FileSystem: Sync + Send + Debug {
    fn stat(&self, path: &Path) -> io::Result<Stat>;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    async fn stat_async(&self, path: &Path) -> io::Result<Stat>;
    async fn read_to_string_async(&self, path: &Path) -> io::Result<String>;
}

#[async_trait::async_trait]
impl<T: FileSystem + ?Sized> FileSystem for std::sync::Arc<T> {
    fn stat(&self, path: &Path) -> io::Result<Stat> {
        (**self).stat(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    async fn stat_async(&self, path: &Path) -> io::Result<Stat> {
        (**self).stat_async(path).await
    }

    async fn read_to_string_async(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string_async(path).await
    }
}
