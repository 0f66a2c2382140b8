use std::fs;
use std::path::{Path, PathBuf};

use crate::device::{FaceImage, GraphicsDevice, ShaderStage};
use crate::resources::{CubeMap, Program, Shader, CUBE_FACES};
use crate::{Error, Result};

pub const VERTEX_SOURCE: &str = "main.vert.wgsl";
pub const FRAGMENT_SOURCE: &str = "main.frag.wgsl";

/// Face image extensions, in lookup order.
pub const FACE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Root directory of a set of assets.
#[derive(Debug, Clone)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn program_dir(&self, name: &str) -> PathBuf {
        self.root.join("programs").join(name)
    }

    pub fn cube_map_dir(&self, name: &str) -> PathBuf {
        self.root.join("cubemaps").join(name)
    }

    /// Loads `programs/<name>`.
    pub fn program<'d, D: GraphicsDevice + ?Sized>(
        &self,
        device: &'d D,
        name: &str,
    ) -> Result<Program<'d, D>> {
        load_program(device, &self.program_dir(name))
    }

    /// Loads `cubemaps/<name>`.
    pub fn cube_map<'d, D: GraphicsDevice + ?Sized>(
        &self,
        device: &'d D,
        name: &str,
    ) -> Result<CubeMap<'d, D>> {
        load_cube_map(device, &self.cube_map_dir(name))
    }
}

/// Compiles and links the vertex/fragment pair found in `dir`.
///
/// The intermediate shaders are released once the program is linked.
pub fn load_program<'d, D: GraphicsDevice + ?Sized>(
    device: &'d D,
    dir: &Path,
) -> Result<Program<'d, D>> {
    let vertex_src = read_text(&dir.join(VERTEX_SOURCE))?;
    let fragment_src = read_text(&dir.join(FRAGMENT_SOURCE))?;

    let vertex = Shader::compile(device, ShaderStage::Vertex, &vertex_src)?;
    let fragment = Shader::compile(device, ShaderStage::Fragment, &fragment_src)?;
    let program = Program::link(device, &[&vertex, &fragment])?;

    log::info!("loaded program {}", dir.display());
    Ok(program)
}

/// Decodes the six faces found in `dir` and uploads them as one cube map.
pub fn load_cube_map<'d, D: GraphicsDevice + ?Sized>(
    device: &'d D,
    dir: &Path,
) -> Result<CubeMap<'d, D>> {
    let mut images = Vec::with_capacity(CUBE_FACES.len());
    for name in CUBE_FACES {
        images.push(read_face(&face_path(dir, name))?);
    }

    let faces: [FaceImage<'_>; 6] = std::array::from_fn(|i| FaceImage {
        width: images[i].width(),
        height: images[i].height(),
        pixels: images[i].as_raw(),
    });
    let cube_map = CubeMap::new(device, &faces)?;

    log::info!(
        "loaded cube map {} ({}x{} faces)",
        dir.display(),
        faces[0].width,
        faces[0].height
    );
    Ok(cube_map)
}

/// First existing `<dir>/<name>.<ext>`; the `.png` path when none exists so the
/// read error names a sensible file.
fn face_path(dir: &Path, name: &str) -> PathBuf {
    FACE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(format!("{name}.{}", FACE_EXTENSIONS[0])))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::ResourceAcquisition {
        path: path.to_path_buf(),
        source,
    })
}

fn read_face(path: &Path) -> Result<image::RgbaImage> {
    let bytes = fs::read(path).map_err(|source| Error::ResourceAcquisition {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| Error::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}
