use std::{
    path::Path,
    sync::Arc,
    time::Instant,
};

use crate::{fs::Stat, ReadOptions};

/// Last known state of one file. Never mutated in place: a refresh builds a
/// new entry, so `content` always belongs to `stat`.
#[derive(Debug, Clone)]
pub struct FileEntry {
    path: Box<Path>,
    content: Arc<str>,
    stat: Stat,
    last_checked_at: Instant,
}

impl FileEntry {
    pub(crate) fn new(path: &Path, content: Arc<str>, stat: Stat, last_checked_at: Instant) -> Self {
        Self {
            path: path.into(),
            content,
            stat,
            last_checked_at,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &Arc<str> {
        &self.content
    }

    pub fn stat(&self) -> &Stat {
        &self.stat
    }

    pub fn last_checked_at(&self) -> Instant {
        self.last_checked_at
    }

    /// Both the modification time and the size must match. Coarse mtime
    /// resolution can hide a rewrite, the size catches most of those.
    pub fn is_unchanged(&self, stat: &Stat) -> bool {
        self.stat.modified == stat.modified && self.stat.size == stat.size
    }

    /// Whether a read at `now` has to consult the filesystem.
    pub fn check_due(&self, options: &ReadOptions, now: Instant) -> bool {
        !options.never_update
            && (options.check_delay.is_zero()
                || now.saturating_duration_since(self.last_checked_at) >= options.check_delay)
    }

    pub(crate) fn checked_at(&self, last_checked_at: Instant) -> Self {
        Self {
            last_checked_at,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn entry(size: u64, modified: Option<SystemTime>) -> FileEntry {
        FileEntry::new(
            Path::new("/tmp/a"),
            Arc::from("ok"),
            Stat::new(modified, size, true),
            Instant::now(),
        )
    }

    #[test]
    fn unchanged_needs_mtime_and_size() {
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let cached = entry(2, Some(mtime));
        assert!(cached.is_unchanged(&Stat::new(Some(mtime), 2, true)));
        // same second, different size
        assert!(!cached.is_unchanged(&Stat::new(Some(mtime), 3, true)));
        assert!(!cached.is_unchanged(&Stat::new(Some(mtime + Duration::from_millis(1)), 2, true)));
        assert!(!cached.is_unchanged(&Stat::new(None, 2, true)));
    }

    #[test]
    fn check_due_honors_delay() {
        let cached = entry(2, None);
        let now = cached.last_checked_at();
        let options = ReadOptions::default();
        assert!(cached.check_due(&options, now));

        let options = options.check_delay(Duration::from_millis(100));
        assert!(!cached.check_due(&options, now));
        assert!(!cached.check_due(&options, now + Duration::from_millis(99)));
        assert!(cached.check_due(&options, now + Duration::from_millis(100)));

        let options = options.never_update(true);
        assert!(!cached.check_due(&options, now + Duration::from_secs(60)));
    }
}
