use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IconError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error at {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl IconError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// I/O failures surfaced through the image codecs stay `Io`; only
    /// decode/encode failures become `Image`.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        match source {
            image::ImageError::IoError(io) => Self::io(path, io),
            other => Self::Image {
                path: path.into(),
                source: other,
            },
        }
    }
}
