use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("unknown asset type: {file_name}")]
    UnknownAssetType { file_name: String },

    #[error("{file_name} can't be served verbatim in a URL path")]
    UnroutableFileName { file_name: String },

    #[error("route {path} is defined more than once")]
    DuplicateRoute { path: String },

    #[error("route {path} must start with '/'")]
    InvalidRoutePath { path: String },

    #[error("{file_name} is not valid UTF-8 text")]
    InvalidText { file_name: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ManifestError {
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| ManifestError::Io { path, source }
    }
}
