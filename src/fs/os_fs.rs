use std::{io, path::Path};

use super::{FileSystem, Stat};

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

#[async_trait::async_trait]
impl FileSystem for OsFileSystem {
    fn stat(&self, path: &Path) -> io::Result<Stat> {
        std::fs::metadata(path).map(|meta| Stat::from(&meta))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    async fn stat_async(&self, path: &Path) -> io::Result<Stat> {
        tokio::fs::metadata(path).await.map(|meta| Stat::from(&meta))
    }

    async fn read_to_string_async(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}
