use std::{
    future::Future,
    hash::BuildHasherDefault,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
    time::Instant,
};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use rustc_hash::FxHasher;

use crate::{
    fs::{FileSystem, OsFileSystem, Stat},
    log, Error, FileEntry, RResult, ReadOptions,
};

type Entries = DashMap<PathBuf, Arc<FileEntry>, BuildHasherDefault<FxHasher>>;

/// Eventual result of [`FileCache::read_async`].
pub type ReadFuture = Pin<Box<dyn Future<Output = RResult<Arc<str>>> + Send + 'static>>;

/// Completion handler for callback mode. Invoked exactly once.
pub type Completion = Box<dyn FnOnce(RResult<Arc<str>>) + Send + 'static>;

static GLOBAL: Lazy<FileCache> = Lazy::new(FileCache::new);

/// How the caller of [`FileCache::read`] receives its result.
pub enum ReadOutcome {
    /// Blocking mode, the read already happened.
    Ready(RResult<Arc<str>>),
    /// Future mode.
    Pending(ReadFuture),
    /// Callback mode, the handler owns the result.
    Dispatched,
}

impl ReadOutcome {
    /// Waits for the result, `None` when it went to a completion handler.
    pub async fn resolve(self) -> Option<RResult<Arc<str>>> {
        match self {
            ReadOutcome::Ready(result) => Some(result),
            ReadOutcome::Pending(future) => Some(future.await),
            ReadOutcome::Dispatched => None,
        }
    }
}

/// In-memory copies of file contents, keyed by path and re-validated
/// against file metadata on read. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct FileCache {
    fs: Arc<dyn FileSystem>,
    entries: Arc<Entries>,
}

enum Lookup {
    /// Served from the cache without touching the filesystem.
    Fresh(Arc<str>),
    /// Filesystem has to be consulted, with the entry to compare against.
    Check(Option<Arc<FileEntry>>),
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FileCache {
    pub fn new() -> Self {
        Self::with_fs(OsFileSystem)
    }

    pub fn with_fs<FS: FileSystem + 'static>(fs: FS) -> Self {
        log::enable_by_env();
        Self {
            fs: Arc::new(fs),
            entries: Default::default(),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static FileCache {
        &GLOBAL
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.entries.contains_key(key)
    }

    /// Snapshot of the entry stored under `key`.
    pub fn entry(&self, key: &Path) -> Option<Arc<FileEntry>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Mode is picked from the arguments: a completion handler means
    /// callback mode, otherwise `options.sync` means blocking mode,
    /// otherwise future mode.
    pub fn read(
        &self,
        path: &str,
        options: &ReadOptions,
        on_complete: Option<Completion>,
    ) -> ReadOutcome {
        match on_complete {
            Some(on_complete) => {
                self.read_with_callback(path, options, on_complete);
                ReadOutcome::Dispatched
            }
            None if options.sync => ReadOutcome::Ready(self.read_blocking(path, options)),
            None => ReadOutcome::Pending(self.read_async(path, options)),
        }
    }

    #[tracing::instrument(skip(self, options))]
    pub fn read_blocking(&self, path: &str, options: &ReadOptions) -> RResult<Arc<str>> {
        let key = Self::lookup_key(path, options)?;
        let cached = match self.lookup(&key, options) {
            Lookup::Fresh(content) => return Ok(content),
            Lookup::Check(cached) => cached,
        };

        let stat = Self::checked_stat(&key, self.fs.stat(&key))?;
        if let Some(content) = self.revalidate(&key, cached.as_deref(), &stat) {
            return Ok(content);
        }

        let content = self
            .fs
            .read_to_string(&key)
            .map_err(|err| Error::from_read(&key, err))?;
        Ok(self.store(&key, stat, content))
    }

    /// The returned future owns everything it needs and resolves once.
    /// It has to be polled on a tokio runtime: the default [`OsFileSystem`]
    /// uses `tokio::fs`, which panics without one on a cache miss.
    pub fn read_async(&self, path: &str, options: &ReadOptions) -> ReadFuture {
        let cache = self.clone();
        let path = path.to_owned();
        let options = options.clone();
        Box::pin(async move { cache.load_async(&path, &options).await })
    }

    /// Returns immediately. The read runs on the current tokio runtime,
    /// or on its own thread when called outside of one.
    pub fn read_with_callback<F>(&self, path: &str, options: &ReadOptions, on_complete: F)
    where
        F: FnOnce(RResult<Arc<str>>) + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let future = self.read_async(path, options);
                handle.spawn(async move { on_complete(future.await) });
            }
            Err(_) => {
                let cache = self.clone();
                let path = path.to_owned();
                let options = options.clone();
                std::thread::spawn(move || on_complete(cache.read_blocking(&path, &options)));
            }
        }
    }

    #[tracing::instrument(skip(self, options))]
    async fn load_async(&self, path: &str, options: &ReadOptions) -> RResult<Arc<str>> {
        let key = Self::lookup_key(path, options)?;
        let cached = match self.lookup(&key, options) {
            Lookup::Fresh(content) => return Ok(content),
            Lookup::Check(cached) => cached,
        };

        let stat = Self::checked_stat(&key, self.fs.stat_async(&key).await)?;
        if let Some(content) = self.revalidate(&key, cached.as_deref(), &stat) {
            return Ok(content);
        }

        let content = self
            .fs
            .read_to_string_async(&key)
            .await
            .map_err(|err| Error::from_read(&key, err))?;
        Ok(self.store(&key, stat, content))
    }

    fn lookup(&self, key: &Path, options: &ReadOptions) -> Lookup {
        match self.entries.get(key) {
            Some(cached) if !cached.check_due(options, Instant::now()) => {
                tracing::trace!("cache hit without check: {}", key.display());
                Lookup::Fresh(Arc::clone(cached.content()))
            }
            cached => Lookup::Check(cached.map(|entry| Arc::clone(entry.value()))),
        }
    }

    fn checked_stat(key: &Path, stat: std::io::Result<Stat>) -> RResult<Stat> {
        match stat {
            Ok(stat) if stat.is_file => Ok(stat),
            Ok(_) => Err(Error::NotFound(key.into())),
            Err(err) => Err(Error::from_stat(key, err)),
        }
    }

    /// Returns the cached content if `stat` shows the file unchanged, and
    /// moves the entry's check timestamp forward.
    fn revalidate(&self, key: &Path, cached: Option<&FileEntry>, stat: &Stat) -> Option<Arc<str>> {
        let cached = cached.filter(|cached| cached.is_unchanged(stat))?;
        tracing::debug!("unchanged since last read: {}", key.display());
        if let Some(mut current) = self.entries.get_mut(key) {
            // a concurrent read may have stored newer content meanwhile
            if current.is_unchanged(stat) {
                let refreshed = Arc::new(current.checked_at(Instant::now()));
                *current = refreshed;
            }
        }
        Some(Arc::clone(cached.content()))
    }

    fn store(&self, key: &Path, stat: Stat, content: String) -> Arc<str> {
        tracing::debug!("caching {} ({} bytes)", key.display(), stat.size);
        let content: Arc<str> = Arc::from(content);
        let entry = FileEntry::new(key, Arc::clone(&content), stat, Instant::now());
        // last write wins between overlapping reads of one path
        self.entries.insert(key.to_path_buf(), Arc::new(entry));
        content
    }
}
