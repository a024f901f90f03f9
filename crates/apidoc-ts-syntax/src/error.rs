use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring a source file into a [`crate::Project`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
