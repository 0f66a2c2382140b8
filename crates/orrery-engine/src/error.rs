use std::io;
use std::path::PathBuf;

use crate::device::ShaderStage;

/// Errors surfaced by the engine core.
///
/// None of these are retried. They are produced once, while the render actor
/// sets up its GPU objects, and carry the diagnostic text they were raised with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The driver rejected a shader source.
    #[error("failed compiling {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    /// The driver rejected a program link.
    #[error("failed linking program: {log}")]
    Link { log: String },

    /// An asset file could not be opened or read.
    #[error("failed to acquire {}: {source}", path.display())]
    ResourceAcquisition {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An image file was read but could not be decoded.
    #[error("failed decoding image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Cube-map faces are not six equally-shaped square RGBA images.
    #[error("invalid cube map faces: {0}")]
    CubeMapFaces(String),

    /// A program does not expose a uniform the renderer relies on.
    #[error("program has no uniform named `{name}`")]
    MissingUniform { name: String },

    /// Window, surface or context creation failed.
    #[error("windowing failure: {0}")]
    Windowing(String),
}

impl Error {
    /// OS error code of a failed asset acquisition, if any.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Error::ResourceAcquisition { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
