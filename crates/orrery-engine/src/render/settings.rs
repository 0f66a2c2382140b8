use std::path::PathBuf;

use glam::Vec3;

use crate::geometry::MAX_SPHERE_DEPTH;

/// A textured sphere in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub position: Vec3,
    /// Sphere radius.
    pub scale: f32,
    /// Name of the cube map under `cubemaps/`.
    pub cube_map: String,
}

impl SceneObject {
    pub fn new(position: Vec3, scale: f32, cube_map: impl Into<String>) -> Self {
        Self {
            position,
            scale,
            cube_map: cube_map.into(),
        }
    }
}

/// What the render actor loads and draws.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Asset root; see [`crate::assets`].
    pub assets_dir: PathBuf,

    /// Subdivision depth of the sphere mesh shared by all objects. Clamped to
    /// [`MAX_SPHERE_DEPTH`].
    pub sphere_depth: u32,

    pub clear_color: [f32; 4],

    /// Program drawing the skybox cube.
    pub skybox_program: String,

    /// Cube map shown on the skybox.
    pub skybox: String,

    /// Program drawing the spheres.
    pub object_program: String,

    pub objects: Vec<SceneObject>,
}

impl RenderSettings {
    /// Depth actually used for the sphere mesh.
    pub fn effective_sphere_depth(&self) -> u32 {
        self.sphere_depth.min(MAX_SPHERE_DEPTH)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            sphere_depth: 4,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            skybox_program: "skybox".to_string(),
            skybox: "stars".to_string(),
            object_program: "planet".to_string(),
            objects: vec![
                SceneObject::new(Vec3::ZERO, 1.0, "planet"),
                SceneObject::new(Vec3::new(3.0, 0.5, 0.0), 0.27, "moon"),
            ],
        }
    }
}
