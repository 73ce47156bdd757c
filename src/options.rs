use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{Error, RResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Read on the calling thread when no completion handler is given
    /// to [`crate::FileCache::read`].
    /// Default is `false`.
    pub sync: bool,
    /// Once a path is cached, keep serving that content and never look
    /// at the file again.
    /// Default is `false`.
    pub never_update: bool,
    /// Minimum time between two staleness checks of the same entry.
    /// Reads inside the window return the cached content without touching
    /// the filesystem. `Duration::ZERO` checks on every read.
    /// Default is `Duration::ZERO`.
    pub check_delay: Duration,
    /// Directory that paths starting with `.` are joined onto, normally the
    /// directory of the calling source file from [`crate::caller_dir!`].
    /// Reading such a path without it fails with `InvalidOptions`.
    /// Default is `None`.
    pub base_dir: Option<PathBuf>,
}

impl ReadOptions {
    pub fn sync(self, sync: bool) -> Self {
        Self { sync, ..self }
    }

    pub fn never_update(self, never_update: bool) -> Self {
        Self {
            never_update,
            ..self
        }
    }

    pub fn check_delay(self, check_delay: Duration) -> Self {
        Self {
            check_delay,
            ..self
        }
    }

    pub fn relative_to<P: AsRef<Path>>(self, base_dir: P) -> Self {
        Self {
            base_dir: Some(base_dir.as_ref().to_path_buf()),
            ..self
        }
    }

    /// Parses options from a JSON object such as
    /// `{ "neverUpdate": true, "checkDelay": 0.5 }`.
    pub fn from_json(raw: &str) -> RResult<Self> {
        let raw: RawReadOptions =
            serde_json::from_str(raw).map_err(|err| Error::InvalidOptions(err.to_string()))?;
        raw.normalized()
    }
}

/// Loosely typed options as they appear in configuration files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReadOptions {
    pub sync: Option<bool>,
    pub never_update: Option<bool>,
    /// Seconds, fractions allowed.
    pub check_delay: Option<f64>,
    pub base_dir: Option<PathBuf>,
}

impl RawReadOptions {
    pub fn normalized(&self) -> RResult<ReadOptions> {
        let default = ReadOptions::default();
        let check_delay = match self.check_delay {
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|_| {
                Error::InvalidOptions(format!(
                    "checkDelay must be a non-negative number of seconds, got {secs}"
                ))
            })?,
            None => default.check_delay,
        };
        Ok(ReadOptions {
            sync: self.sync.unwrap_or(default.sync),
            never_update: self.never_update.unwrap_or(default.never_update),
            check_delay,
            base_dir: self.base_dir.to_owned().or(default.base_dir),
        })
    }
}
