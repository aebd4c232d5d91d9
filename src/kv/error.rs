use std::path::PathBuf;
use thiserror::Error;

/// 持久化字典相关错误
#[derive(Error, Debug)]
pub enum KvError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Loading {0} would overwrite unsaved in-memory updates")]
    UnsavedChanges(PathBuf),
    #[error("Logger setup failed: {0}")]
    Logger(String),
}

impl KvError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KvError::Io {
            path: path.into(),
            source,
        }
    }
}
