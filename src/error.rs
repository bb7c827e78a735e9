use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    /// The bytes are not an image format we can decode.
    #[error("unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("unable to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("unable to resize image: {0}")]
    Resize(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no image loaded")]
    NoImage,
}
