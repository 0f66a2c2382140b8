//! Asset loading: shader programs and cube maps read from disk.
//!
//! Layout under an asset root:
//! - `programs/<name>/main.vert.wgsl`, `programs/<name>/main.frag.wgsl`
//! - `cubemaps/<name>/{posx,negx,posy,negy,posz,negz}.png` (`.jpg`/`.bmp` also accepted)

mod loader;

pub use loader::{
    load_cube_map, load_program, AssetRoot, FACE_EXTENSIONS, FRAGMENT_SOURCE, VERTEX_SOURCE,
};
