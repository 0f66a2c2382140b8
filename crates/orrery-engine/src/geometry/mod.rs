//! Procedural geometry.
//!
//! Produces flat triangle lists (three vertices per triangle, no indices).
//! Nothing here touches the GPU; upload goes through [`crate::resources::Mesh`].

mod sphere;

pub use sphere::{
    cube_triangles, flatten, generate_sphere, normalize_onto_sphere, quad_vertices, subdivide,
    CUBE_TRIANGLES, MAX_SPHERE_DEPTH,
};
