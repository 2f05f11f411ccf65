use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("artwork scheme '{0}' is not supported")]
    UnsupportedScheme(String),

    #[error("artwork file {path} could not be read: {source}")]
    Fs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artwork at {0} is empty")]
    Empty(String),

    #[error("artwork address {0} is outside the artwork root")]
    OutsideRoot(String),

    #[error("artwork fetching is disabled, not fetching {0}")]
    Disabled(String),
}
