use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use crate::{Error, FileCache, RResult, ReadOptions};

impl FileCache {
    /// A leading `.` (`./x`, `../x`, `.env`) marks a path relative to the
    /// caller, everything else is handed to the filesystem untouched.
    pub(crate) fn is_relative_request(path: &str) -> bool {
        path.starts_with('.')
    }

    /// Maps a requested path to its cache key. Relative requests need a
    /// `base_dir`, see [`crate::caller_dir!`].
    pub fn lookup_key(path: &str, options: &ReadOptions) -> RResult<PathBuf> {
        if !Self::is_relative_request(path) {
            return Ok(PathBuf::from(path));
        }
        let base_dir = options.base_dir.as_deref().ok_or_else(|| {
            Error::InvalidOptions(format!(
                "relative path '{path}' needs a base directory, use `relative_to(caller_dir!())`"
            ))
        })?;
        let request = Path::new(path);
        request
            .absolutize_from(base_dir)
            .map(|key| key.into_owned())
            .map_err(|err| Error::from_read(request, err))
    }
}

/// Directory of the source file `file` (as given by `file!()`) of the crate
/// at `manifest_dir`. In a workspace `file!()` is relative to the workspace
/// root, so the manifest's ancestors are tried until the file is found.
#[doc(hidden)]
pub fn source_dir(manifest_dir: &str, file: &str) -> PathBuf {
    let manifest_dir = Path::new(manifest_dir);
    let file = Path::new(file);
    let source = if file.is_absolute() {
        file.to_path_buf()
    } else {
        manifest_dir
            .ancestors()
            .map(|root| root.join(file))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| manifest_dir.join(file))
    };
    source
        .parent()
        .map_or_else(|| manifest_dir.to_path_buf(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_marker() {
        assert!(FileCache::is_relative_request("."));
        assert!(FileCache::is_relative_request(".."));
        assert!(FileCache::is_relative_request("./a.txt"));
        assert!(FileCache::is_relative_request("../conf/a.toml"));
        assert!(FileCache::is_relative_request(".hidden"));
        assert!(FileCache::is_relative_request(".env"));
        assert!(!FileCache::is_relative_request("a.txt"));
        assert!(!FileCache::is_relative_request("/etc/hosts"));
        assert!(!FileCache::is_relative_request("a/.env"));
    }

    #[cfg(unix)]
    #[test]
    fn relative_joins_base_dir() {
        let options = ReadOptions::default().relative_to("/srv/app/src");
        assert_eq!(
            FileCache::lookup_key("./templates/../index.html", &options).unwrap(),
            PathBuf::from("/srv/app/src/index.html")
        );
        assert_eq!(
            FileCache::lookup_key("../config.json", &options).unwrap(),
            PathBuf::from("/srv/app/config.json")
        );
        assert_eq!(
            FileCache::lookup_key(".env", &options).unwrap(),
            PathBuf::from("/srv/app/src/.env")
        );
    }

    #[test]
    fn other_paths_are_verbatim() {
        let options = ReadOptions::default().relative_to("/srv/app");
        assert_eq!(
            FileCache::lookup_key("/etc/../etc/hosts", &options).unwrap(),
            PathBuf::from("/etc/../etc/hosts")
        );
        assert_eq!(
            FileCache::lookup_key("data/a.txt", &options).unwrap(),
            PathBuf::from("data/a.txt")
        );
    }

    #[test]
    fn relative_without_base_is_rejected() {
        let err = FileCache::lookup_key("./conf.toml", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
        assert!(err.path().is_none());
        // absolute paths need no caller context
        assert!(FileCache::lookup_key("/etc/hosts", &ReadOptions::default()).is_ok());
    }

    #[test]
    fn source_dir_of_this_file() {
        let dir = source_dir(env!("CARGO_MANIFEST_DIR"), file!());
        assert!(dir.join("normalize.rs").is_file());
        assert!(dir.ends_with("src"));
    }

    #[test]
    fn source_dir_of_unknown_file_stays_under_manifest() {
        let manifest = env!("CARGO_MANIFEST_DIR");
        assert_eq!(
            source_dir(manifest, "gone/away.rs"),
            Path::new(manifest).join("gone")
        );
    }
}
