//! # fresh_file_cache
//!
//! Keeps the contents of files in memory and hands them out again as long
//! as the file's modification time and size say it has not changed. Meant
//! for configuration and templates that a long-running process re-reads.
//!
//! ## How to use?
//!
//! ```rust
//! use fresh_file_cache::{FileCache, ReadOptions};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("app.conf");
//! std::fs::write(&path, "ok").unwrap();
//! let path = path.to_str().unwrap();
//!
//! let cache = FileCache::new();
//! let options = ReadOptions::default();
//! assert_eq!(&*cache.read_blocking(path, &options).unwrap(), "ok");
//!
//! std::fs::write(path, "foo").unwrap();
//! // re-read because the size changed
//! assert_eq!(&*cache.read_blocking(path, &options).unwrap(), "foo");
//!
//! std::fs::write(path, "bar!").unwrap();
//! // pinned to the cached copy
//! let pinned = ReadOptions::default().never_update(true);
//! assert_eq!(&*cache.read_blocking(path, &pinned).unwrap(), "foo");
//! ```
//!
//! The same lookup is available as a future ([`FileCache::read_async`]) and
//! with a completion handler ([`FileCache::read_with_callback`]).

mod cache;
mod entry;
mod error;
pub mod fs;
mod log;
mod normalize;
mod options;

pub use cache::{Completion, FileCache, ReadFuture, ReadOutcome};
pub use entry::FileEntry;
pub use error::*;
pub use log::enable_by_env;
pub use options::{RawReadOptions, ReadOptions};

pub type RResult<T> = Result<T, Error>;

#[doc(hidden)]
pub use normalize::source_dir;

/// Directory of the source file this macro is expanded in, the base for
/// `./` paths:
///
/// ```rust
/// use fresh_file_cache::{caller_dir, ReadOptions};
///
/// let options = ReadOptions::default().relative_to(caller_dir!());
/// assert!(options.base_dir.unwrap().is_absolute());
/// ```
#[macro_export]
macro_rules! caller_dir {
    () => {
        $crate::source_dir(env!("CARGO_MANIFEST_DIR"), file!())
    };
}
