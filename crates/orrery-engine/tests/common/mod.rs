#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use orrery_engine::device::{
    FaceImage, GraphicsDevice, Present, RawHandle, ShaderStage, UniformLocation, ViewRect,
};
use orrery_engine::math::Mat4;
use orrery_engine::resources::CUBE_FACES;
use orrery_engine::scene::SharedScene;
use orrery_engine::{Error, Result};

/// Kind of device object, for create/delete bookkeeping.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
    Shader,
    Program,
    Buffer,
    VertexArray,
    Texture,
}

/// State and draw calls observed by a [`RecordingDevice`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(u32),
    BindCubeMap(u32),
    SetMat4(u32, Mat4),
    Draw { vertex_array: u32, count: u32 },
    Viewport(ViewRect),
    Scissor(ViewRect),
    DepthWrite(bool),
    Clear([f32; 4]),
    Resize(u32, u32),
    Present,
    Finish,
}

/// Object creation or release, in the order the device saw it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Lifecycle {
    Created(Kind, u32),
    Deleted(Kind, u32),
}

/// Graphics device double that hands out names, counts creates and deletes per
/// kind, and records every state and draw call.
pub struct RecordingDevice {
    next: Cell<u32>,
    live: RefCell<HashMap<u32, Kind>>,
    created: RefCell<HashMap<Kind, usize>>,
    deleted: RefCell<HashMap<Kind, usize>>,
    bad_deletes: Cell<usize>,
    calls: RefCell<Vec<Call>>,
    lifecycle: RefCell<Vec<Lifecycle>>,
    vertex_counts: RefCell<HashMap<u32, usize>>,
    face_sizes: RefCell<Vec<(u32, u32)>>,

    /// Sources containing this marker fail to compile.
    pub compile_error_marker: RefCell<Option<String>>,
    /// When set, every link fails.
    pub fail_link: Cell<bool>,
    /// When set, every present fails.
    pub fail_present: Cell<bool>,
    /// Uniform names every program exposes, located by index.
    pub uniforms: RefCell<Vec<String>>,

    presents: Cell<usize>,
    stop_after: RefCell<Option<(Arc<SharedScene>, usize)>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            next: Cell::new(1),
            live: RefCell::default(),
            created: RefCell::default(),
            deleted: RefCell::default(),
            bad_deletes: Cell::new(0),
            calls: RefCell::default(),
            lifecycle: RefCell::default(),
            vertex_counts: RefCell::default(),
            face_sizes: RefCell::default(),
            compile_error_marker: RefCell::new(None),
            fail_link: Cell::new(false),
            fail_present: Cell::new(false),
            uniforms: RefCell::new(vec!["mvp".to_string()]),
            presents: Cell::new(0),
            stop_after: RefCell::new(None),
        }
    }

    /// Requests stop on `scene` once `frames` frames were presented.
    pub fn stopping_after(scene: Arc<SharedScene>, frames: usize) -> Self {
        let device = Self::new();
        *device.stop_after.borrow_mut() = Some((scene, frames));
        device
    }

    pub fn created(&self, kind: Kind) -> usize {
        self.created.borrow().get(&kind).copied().unwrap_or(0)
    }

    pub fn deleted(&self, kind: Kind) -> usize {
        self.deleted.borrow().get(&kind).copied().unwrap_or(0)
    }

    pub fn live(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn live_of(&self, kind: Kind) -> usize {
        self.live.borrow().values().filter(|k| **k == kind).count()
    }

    /// Deletes of names that were never issued or already deleted.
    pub fn bad_deletes(&self) -> usize {
        self.bad_deletes.get()
    }

    pub fn assert_balanced(&self) {
        for kind in [
            Kind::Shader,
            Kind::Program,
            Kind::Buffer,
            Kind::VertexArray,
            Kind::Texture,
        ] {
            assert_eq!(
                self.created(kind),
                self.deleted(kind),
                "{kind:?}: created/deleted mismatch"
            );
        }
        assert_eq!(self.live(), 0, "live objects left");
        assert_eq!(self.bad_deletes(), 0, "double or unknown deletes");
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn lifecycle(&self) -> Vec<Lifecycle> {
        self.lifecycle.borrow().clone()
    }

    pub fn presents(&self) -> usize {
        self.presents.get()
    }

    /// Vertices uploaded in the buffer behind `vertex_array`'s buffer name.
    pub fn buffer_vertices(&self, buffer: u32) -> Option<usize> {
        self.vertex_counts.borrow().get(&buffer).copied()
    }

    pub fn face_sizes(&self) -> Vec<(u32, u32)> {
        self.face_sizes.borrow().clone()
    }

    fn issue(&self, kind: Kind) -> RawHandle {
        let id = self.next.get();
        self.next.set(id + 1);
        self.live.borrow_mut().insert(id, kind);
        *self.created.borrow_mut().entry(kind).or_default() += 1;
        self.lifecycle.borrow_mut().push(Lifecycle::Created(kind, id));
        RawHandle::from_raw(id).expect("ids start at 1")
    }

    fn release(&self, handle: RawHandle, kind: Kind) {
        match self.live.borrow_mut().remove(&handle.get()) {
            Some(k) if k == kind => {
                *self.deleted.borrow_mut().entry(kind).or_default() += 1;
                self.lifecycle
                    .borrow_mut()
                    .push(Lifecycle::Deleted(kind, handle.get()));
            }
            _ => self.bad_deletes.set(self.bad_deletes.get() + 1),
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_shader(&self, stage: ShaderStage, source: &str) -> std::result::Result<RawHandle, String> {
        if let Some(marker) = self.compile_error_marker.borrow().as_deref() {
            if source.contains(marker) {
                return Err(format!("{stage}: syntax error near `{marker}`"));
            }
        }
        Ok(self.issue(Kind::Shader))
    }

    fn delete_shader(&self, shader: RawHandle) {
        self.release(shader, Kind::Shader);
    }

    fn link_program(
        &self,
        shaders: &[(ShaderStage, RawHandle)],
    ) -> std::result::Result<RawHandle, String> {
        if self.fail_link.get() {
            return Err("link: varying mismatch".to_string());
        }
        for (_, shader) in shaders {
            if self.live.borrow().get(&shader.get()) != Some(&Kind::Shader) {
                return Err(format!("shader {} is not live", shader.get()));
            }
        }
        Ok(self.issue(Kind::Program))
    }

    fn delete_program(&self, program: RawHandle) {
        self.release(program, Kind::Program);
    }

    fn use_program(&self, program: RawHandle) {
        self.record(Call::UseProgram(program.get()));
    }

    fn uniform_location(&self, _program: RawHandle, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .borrow()
            .iter()
            .position(|n| n == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn set_uniform_mat4(&self, location: UniformLocation, value: &Mat4) {
        self.record(Call::SetMat4(location.0, *value));
    }

    fn create_vertex_buffer(&self, data: &[f32]) -> RawHandle {
        let handle = self.issue(Kind::Buffer);
        self.vertex_counts
            .borrow_mut()
            .insert(handle.get(), data.len() / 3);
        handle
    }

    fn delete_buffer(&self, buffer: RawHandle) {
        self.release(buffer, Kind::Buffer);
    }

    fn create_vertex_array(&self, _buffer: RawHandle, _components: u32) -> RawHandle {
        self.issue(Kind::VertexArray)
    }

    fn delete_vertex_array(&self, vertex_array: RawHandle) {
        self.release(vertex_array, Kind::VertexArray);
    }

    fn create_cube_map(&self, faces: &[FaceImage<'_>; 6]) -> RawHandle {
        self.face_sizes
            .borrow_mut()
            .extend(faces.iter().map(|f| (f.width, f.height)));
        self.issue(Kind::Texture)
    }

    fn delete_texture(&self, texture: RawHandle) {
        self.release(texture, Kind::Texture);
    }

    fn bind_cube_map(&self, texture: RawHandle) {
        self.record(Call::BindCubeMap(texture.get()));
    }

    fn draw_triangles(&self, vertex_array: RawHandle, vertex_count: u32) {
        self.record(Call::Draw {
            vertex_array: vertex_array.get(),
            count: vertex_count,
        });
    }

    fn set_viewport(&self, rect: ViewRect) {
        self.record(Call::Viewport(rect));
    }

    fn set_scissor(&self, rect: ViewRect) {
        self.record(Call::Scissor(rect));
    }

    fn set_depth_write(&self, enabled: bool) {
        self.record(Call::DepthWrite(enabled));
    }

    fn clear(&self, color: [f32; 4]) {
        self.record(Call::Clear(color));
    }

    fn finish(&self) {
        self.record(Call::Finish);
    }
}

impl Present for RecordingDevice {
    fn resize(&self, width: u32, height: u32) {
        self.record(Call::Resize(width, height));
    }

    fn present(&self) -> Result<()> {
        if self.fail_present.get() {
            return Err(Error::Windowing("surface lost".to_string()));
        }
        self.record(Call::Present);
        self.presents.set(self.presents.get() + 1);

        if let Some((scene, frames)) = self.stop_after.borrow().as_ref() {
            if self.presents.get() >= *frames {
                scene.request_stop();
            }
        }
        Ok(())
    }
}

/// Writes a program directory with placeholder sources.
pub fn write_program(root: &Path, name: &str) {
    let dir = root.join("programs").join(name);
    std::fs::create_dir_all(&dir).expect("create program dir");
    std::fs::write(dir.join("main.vert.wgsl"), format!("// {name} vertex\n")).expect("write vert");
    std::fs::write(dir.join("main.frag.wgsl"), format!("// {name} fragment\n")).expect("write frag");
}

/// Writes six solid-colored `edge` x `edge` PNG faces.
pub fn write_cube_map(root: &Path, name: &str, edge: u32) {
    let dir = root.join("cubemaps").join(name);
    std::fs::create_dir_all(&dir).expect("create cube map dir");
    for (i, face) in CUBE_FACES.iter().enumerate() {
        let shade = (i as u8) * 40;
        let image = image::RgbaImage::from_pixel(edge, edge, image::Rgba([shade, 255 - shade, 128, 255]));
        image
            .save(dir.join(format!("{face}.png")))
            .expect("write face");
    }
}

/// Asset root with `skybox` and `planet` programs and `stars`, `planet`,
/// `moon` cube maps.
pub fn write_default_assets(root: &Path) {
    write_program(root, "skybox");
    write_program(root, "planet");
    write_cube_map(root, "stars", 4);
    write_cube_map(root, "planet", 2);
    write_cube_map(root, "moon", 2);
}
