use std::fmt;

use glam::Mat4;

use crate::device::{GraphicsDevice, RawHandle, ShaderStage, UniformLocation};
use crate::{Error, Result};

use super::Shader;

/// A linked shader program.
///
/// The program does not own the shaders it was linked from; they may be
/// dropped as soon as [`Program::link`] returns.
pub struct Program<'d, D: GraphicsDevice + ?Sized> {
    device: &'d D,
    handle: Option<RawHandle>,
}

impl<'d, D: GraphicsDevice + ?Sized> Program<'d, D> {
    /// Links `shaders` into a program.
    ///
    /// Fails with [`Error::Link`] carrying the device's diagnostics, or when one
    /// of the shaders is empty.
    pub fn link(device: &'d D, shaders: &[&Shader<'_, D>]) -> Result<Self> {
        let mut attached: Vec<(ShaderStage, RawHandle)> = Vec::with_capacity(shaders.len());
        for shader in shaders {
            let Some(handle) = shader.id() else {
                return Err(Error::Link {
                    log: format!("{} shader was moved out before linking", shader.stage()),
                });
            };
            attached.push((shader.stage(), handle));
        }

        match device.link_program(&attached) {
            Ok(handle) => Ok(Self {
                device,
                handle: Some(handle),
            }),
            Err(log) => {
                log::error!("program failed to link:\n{log}");
                Err(Error::Link { log })
            }
        }
    }

    /// Makes this the active program.
    ///
    /// Changes device-wide state: every following uniform upload and draw uses
    /// this program until another one is bound.
    pub fn bind(&self) {
        if let Some(handle) = self.handle {
            self.device.use_program(handle);
        }
    }

    /// Looks up a uniform by name.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation> {
        self.handle
            .and_then(|handle| self.device.uniform_location(handle, name))
            .ok_or_else(|| Error::MissingUniform {
                name: name.to_string(),
            })
    }

    /// Uploads a matrix uniform. The program must be bound.
    pub fn set_mat4(&self, location: UniformLocation, value: &Mat4) {
        self.device.set_uniform_mat4(location, value);
    }

    pub fn id(&self) -> Option<RawHandle> {
        self.handle
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Moves the program into a new owner, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            device: self.device,
            handle: self.handle.take(),
        }
    }
}

impl<D: GraphicsDevice + ?Sized> Drop for Program<'_, D> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.delete_program(handle);
        }
    }
}

impl<D: GraphicsDevice + ?Sized> fmt::Debug for Program<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program").field("handle", &self.handle).finish()
    }
}
