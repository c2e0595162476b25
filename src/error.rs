use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Cannot access directory {path:?}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite existing file {0:?}")]
    Conflict(PathBuf),
}

impl OptimizeError {
    /// Errors that abort the whole run instead of a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OptimizeError::Configuration(_)
                | OptimizeError::Access { .. }
                | OptimizeError::NotADirectory(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(OptimizeError::Configuration("both".into()).is_fatal());
        assert!(OptimizeError::NotADirectory(PathBuf::from("x")).is_fatal());
        assert!(OptimizeError::Access {
            path: PathBuf::from("missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .is_fatal());

        assert!(!OptimizeError::Encode("boom".into()).is_fatal());
        assert!(!OptimizeError::Conflict(PathBuf::from("a.webp")).is_fatal());
        assert!(!OptimizeError::Io(std::io::Error::other("disk")).is_fatal());
    }

    #[test]
    fn test_write_message_names_path() {
        let err = OptimizeError::Write {
            path: PathBuf::from("photos/a.webp"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("photos/a.webp"));
    }
}
