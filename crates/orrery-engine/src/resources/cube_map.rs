use std::fmt;

use crate::device::{FaceImage, GraphicsDevice, RawHandle};
use crate::{Error, Result};

/// Face file stems in upload order: `+X, -X, +Y, -Y, +Z, -Z`.
pub const CUBE_FACES: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

/// A cube-map texture.
pub struct CubeMap<'d, D: GraphicsDevice + ?Sized> {
    device: &'d D,
    handle: Option<RawHandle>,
}

impl<'d, D: GraphicsDevice + ?Sized> CubeMap<'d, D> {
    /// Uploads six faces in [`CUBE_FACES`] order.
    ///
    /// Every face must be a square RGBA8 image of the same size.
    pub fn new(device: &'d D, faces: &[FaceImage<'_>; 6]) -> Result<Self> {
        check_faces(faces)?;
        let handle = device.create_cube_map(faces);
        Ok(Self {
            device,
            handle: Some(handle),
        })
    }

    /// Binds the texture for following draws.
    pub fn bind(&self) {
        if let Some(handle) = self.handle {
            self.device.bind_cube_map(handle);
        }
    }

    pub fn id(&self) -> Option<RawHandle> {
        self.handle
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Moves the texture into a new owner, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            device: self.device,
            handle: self.handle.take(),
        }
    }
}

fn check_faces(faces: &[FaceImage<'_>; 6]) -> Result<()> {
    let first = &faces[0];
    if first.width == 0 || first.width != first.height {
        return Err(Error::CubeMapFaces(format!(
            "face {} is {}x{}; faces must be square and non-empty",
            CUBE_FACES[0],
            first.width,
            first.height
        )));
    }

    for (face, name) in faces.iter().zip(CUBE_FACES) {
        if face.width != first.width || face.height != first.height {
            return Err(Error::CubeMapFaces(format!(
                "face {name} is {}x{}, expected {}x{}",
                face.width, face.height, first.width, first.height
            )));
        }
        let expected = face.width as usize * face.height as usize * 4;
        if face.pixels.len() != expected {
            return Err(Error::CubeMapFaces(format!(
                "face {name} has {} bytes of RGBA data, expected {expected}",
                face.pixels.len()
            )));
        }
    }
    Ok(())
}

impl<D: GraphicsDevice + ?Sized> Drop for CubeMap<'_, D> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.delete_texture(handle);
        }
    }
}

impl<D: GraphicsDevice + ?Sized> fmt::Debug for CubeMap<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeMap").field("handle", &self.handle).finish()
    }
}
