use std::{io, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: '{}'", .0.display())]
    NotFound(Box<Path>),
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: Box<Path>,
        #[source]
        source: io::Error,
    },
    #[error("invalid read options: {0}")]
    InvalidOptions(String),
}

impl Error {
    /// Classifies a failed metadata query. A missing path is `NotFound`,
    /// anything else is surfaced as `Io`.
    pub(crate) fn from_stat(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.into())
        } else {
            Self::from_read(path, source)
        }
    }

    pub(crate) fn from_read(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// The lookup key the failing read was made against.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::NotFound(path) | Error::Io { path, .. } => Some(path),
            Error::InvalidOptions(_) => None,
        }
    }
}
