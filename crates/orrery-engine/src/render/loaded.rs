use std::collections::HashMap;

use glam::Mat4;

use crate::assets::AssetRoot;
use crate::device::{GraphicsDevice, UniformLocation};
use crate::geometry::{cube_triangles, flatten, generate_sphere};
use crate::math::{scale, translate, Vec3};
use crate::resources::{CubeMap, Mesh, Program};
use crate::Result;

use super::RenderSettings;

/// Name of the model-view-projection uniform every program must expose.
pub const MVP_UNIFORM: &str = "mvp";

/// A sphere placed in the world.
#[derive(Debug, Copy, Clone)]
pub struct Placement {
    pub model: Mat4,
    /// Index into [`LoadedScene::textures`].
    pub texture: usize,
}

/// GPU objects the render loop draws with, created once during setup.
///
/// Everything is released in the reverse of the order it was loaded in: fields
/// drop top to bottom, and the object cube maps are popped last to first.
pub struct LoadedScene<'d, D: GraphicsDevice + ?Sized> {
    pub sphere: Mesh<'d, D>,
    pub skybox_mesh: Mesh<'d, D>,
    pub textures: Vec<CubeMap<'d, D>>,
    pub skybox_texture: CubeMap<'d, D>,
    pub object_mvp: UniformLocation,
    pub object_program: Program<'d, D>,
    pub skybox_mvp: UniformLocation,
    pub skybox_program: Program<'d, D>,
    pub placements: Vec<Placement>,
}

impl<'d, D: GraphicsDevice + ?Sized> LoadedScene<'d, D> {
    /// Loads programs and textures and uploads the meshes.
    pub fn load(device: &'d D, settings: &RenderSettings) -> Result<Self> {
        let assets = AssetRoot::new(&settings.assets_dir);

        let skybox_program = assets.program(device, &settings.skybox_program)?;
        let skybox_mvp = skybox_program.uniform_location(MVP_UNIFORM)?;
        let object_program = assets.program(device, &settings.object_program)?;
        let object_mvp = object_program.uniform_location(MVP_UNIFORM)?;

        let skybox_texture = assets.cube_map(device, &settings.skybox)?;

        // Objects sharing a cube map share the texture.
        let mut textures = Vec::new();
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        let mut placements = Vec::with_capacity(settings.objects.len());
        for object in &settings.objects {
            let texture = match by_name.get(object.cube_map.as_str()) {
                Some(&index) => index,
                None => {
                    textures.push(assets.cube_map(device, &object.cube_map)?);
                    by_name.insert(&object.cube_map, textures.len() - 1);
                    textures.len() - 1
                }
            };
            placements.push(Placement {
                model: translate(object.position) * scale(Vec3::splat(object.scale)),
                texture,
            });
        }

        let skybox_mesh = Mesh::new(device, &flatten(&cube_triangles()));

        let depth = settings.effective_sphere_depth();
        let sphere = Mesh::new(device, &flatten(&generate_sphere(depth)));
        log::info!(
            "scene loaded: {} objects, {} textures, sphere depth {depth} ({} vertices)",
            placements.len(),
            textures.len() + 1,
            sphere.vertex_count()
        );

        Ok(Self {
            sphere,
            skybox_mesh,
            textures,
            skybox_texture,
            object_mvp,
            object_program,
            skybox_mvp,
            skybox_program,
            placements,
        })
    }
}

impl<D: GraphicsDevice + ?Sized> Drop for LoadedScene<'_, D> {
    fn drop(&mut self) {
        // Runs before the fields drop. The meshes were loaded after the
        // textures, and a `Vec` would drop its textures front to back.
        drop(self.sphere.take());
        drop(self.skybox_mesh.take());
        while let Some(texture) = self.textures.pop() {
            drop(texture);
        }
    }
}
