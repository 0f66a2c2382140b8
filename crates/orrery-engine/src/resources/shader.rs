use std::fmt;

use crate::device::{GraphicsDevice, RawHandle, ShaderStage};
use crate::{Error, Result};

/// A compiled shader stage.
pub struct Shader<'d, D: GraphicsDevice + ?Sized> {
    device: &'d D,
    stage: ShaderStage,
    handle: Option<RawHandle>,
}

impl<'d, D: GraphicsDevice + ?Sized> Shader<'d, D> {
    /// Compiles `source` for `stage`.
    ///
    /// Fails with [`Error::Compile`] carrying the device's diagnostics.
    pub fn compile(device: &'d D, stage: ShaderStage, source: &str) -> Result<Self> {
        match device.create_shader(stage, source) {
            Ok(handle) => Ok(Self {
                device,
                stage,
                handle: Some(handle),
            }),
            Err(log) => {
                log::error!("{stage} shader failed to compile:\n{log}");
                Err(Error::Compile { stage, log })
            }
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Device name of the shader; `None` once moved out.
    pub fn id(&self) -> Option<RawHandle> {
        self.handle
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Moves the shader into a new owner, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            device: self.device,
            stage: self.stage,
            handle: self.handle.take(),
        }
    }
}

impl<D: GraphicsDevice + ?Sized> Drop for Shader<'_, D> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.delete_shader(handle);
        }
    }
}

impl<D: GraphicsDevice + ?Sized> fmt::Debug for Shader<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("stage", &self.stage)
            .field("handle", &self.handle)
            .finish()
    }
}
