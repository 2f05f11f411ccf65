//! Resolving artwork addresses to image bytes.

use std::path::{Path, PathBuf};

use log::debug;

use crate::domain::artwork::Artwork;

pub mod error;

use error::ArtworkError;

const FILE_SCHEME: &str = "file://";

pub trait ArtworkFetcher {
    fn fetch(&self, address: &str) -> Result<Artwork, ArtworkError>;
}

/// Reads artwork from the local filesystem.
///
/// Accepts `file://` URLs and plain paths. With a `root` set, only relative
/// paths that stay inside the root after resolving `..` and symlinks are read.
#[derive(Debug, Clone, Default)]
pub struct FsArtworkFetcher {
    root: Option<PathBuf>,
}

impl FsArtworkFetcher {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn resolve(&self, address: &str) -> Result<PathBuf, ArtworkError> {
        let path = if let Some(path) = address.strip_prefix(FILE_SCHEME) {
            Path::new(path).to_path_buf()
        } else if let Some((scheme, _)) = address.split_once("://") {
            return Err(ArtworkError::UnsupportedScheme(scheme.to_string()));
        } else {
            Path::new(address).to_path_buf()
        };

        let Some(root) = &self.root else {
            return Ok(path);
        };
        if !path.is_relative() {
            return Err(ArtworkError::OutsideRoot(address.to_string()));
        }

        let root = canonicalize(root)?;
        let resolved = canonicalize(&root.join(path))?;
        if !resolved.starts_with(&root) {
            return Err(ArtworkError::OutsideRoot(address.to_string()));
        }
        Ok(resolved)
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, ArtworkError> {
    path.canonicalize().map_err(|source| ArtworkError::Fs {
        path: path.to_path_buf(),
        source,
    })
}

impl ArtworkFetcher for FsArtworkFetcher {
    fn fetch(&self, address: &str) -> Result<Artwork, ArtworkError> {
        let path = self.resolve(address)?;
        let data = std::fs::read(&path).map_err(|source| ArtworkError::Fs {
            path: path.clone(),
            source,
        })?;
        let artwork = Artwork::new(data, Some(address.to_string()));
        if artwork.is_empty() {
            return Err(ArtworkError::Empty(address.to_string()));
        }
        debug!("Fetched {} bytes of artwork from {}", artwork.len(), path.to_string_lossy());
        Ok(artwork)
    }
}

/// Fetcher that never finds anything, for when artwork is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArtwork;

impl ArtworkFetcher for NoArtwork {
    fn fetch(&self, address: &str) -> Result<Artwork, ArtworkError> {
        Err(ArtworkError::Disabled(address.to_string()))
    }
}
