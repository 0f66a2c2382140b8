use std::fmt;

use crate::device::{GraphicsDevice, RawHandle};

/// Components per vertex position.
const COMPONENTS: u32 = 3;

#[derive(Debug, Copy, Clone)]
struct MeshHandles {
    buffer: RawHandle,
    vertex_array: RawHandle,
}

/// Vertex positions uploaded to the GPU, drawn as a triangle list.
pub struct Mesh<'d, D: GraphicsDevice + ?Sized> {
    device: &'d D,
    handles: Option<MeshHandles>,
    vertex_count: u32,
}

impl<'d, D: GraphicsDevice + ?Sized> Mesh<'d, D> {
    /// Uploads tightly packed `x, y, z` positions.
    ///
    /// A trailing partial vertex is ignored.
    pub fn new(device: &'d D, positions: &[f32]) -> Self {
        let vertex_count = (positions.len() / COMPONENTS as usize) as u32;
        let buffer = device.create_vertex_buffer(positions);
        let vertex_array = device.create_vertex_array(buffer, COMPONENTS);

        Self {
            device,
            handles: Some(MeshHandles {
                buffer,
                vertex_array,
            }),
            vertex_count,
        }
    }

    /// Issues one draw of the whole mesh with the bound program.
    pub fn draw(&self) {
        if let Some(handles) = self.handles {
            self.device
                .draw_triangles(handles.vertex_array, self.vertex_count);
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Name of the vertex array; `None` once moved out.
    pub fn id(&self) -> Option<RawHandle> {
        self.handles.map(|h| h.vertex_array)
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_none()
    }

    /// Moves the mesh into a new owner, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            device: self.device,
            handles: self.handles.take(),
            vertex_count: std::mem::take(&mut self.vertex_count),
        }
    }
}

impl<D: GraphicsDevice + ?Sized> Drop for Mesh<'_, D> {
    fn drop(&mut self) {
        if let Some(handles) = self.handles.take() {
            self.device.delete_vertex_array(handles.vertex_array);
            self.device.delete_buffer(handles.buffer);
        }
    }
}

impl<D: GraphicsDevice + ?Sized> fmt::Debug for Mesh<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("handles", &self.handles)
            .field("vertex_count", &self.vertex_count)
            .finish()
    }
}
