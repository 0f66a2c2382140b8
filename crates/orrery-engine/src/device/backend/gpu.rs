use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::num::{NonZeroU32, NonZeroU64};
use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::device::{
    FaceImage, GraphicsDevice, Present, RawHandle, ShaderStage, SubsystemHandle,
    UniformLocation, ViewRect,
};
use crate::{Error, Result};

use super::frame::{clamp_rect, uniform_offset, DrawCall, FrameRecorder};
use super::init::GpuInit;
use super::shader::{self, CompiledModule};
use super::surface::{
    apply_resize, choose_alpha_mode, choose_surface_format, create_depth_view,
    handle_surface_error, SurfaceErrorAction,
};
use super::{DEPTH_FORMAT, GPU_INSTANCE, MAX_DRAWS_PER_FRAME, UNIFORM_SLOT_SIZE};

const CUBE_FACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

const POSITION_COMPONENTS: u32 = 3;

struct ShaderObject {
    reflection: CompiledModule,
    module: wgpu::ShaderModule,
}

struct ProgramObject {
    depth_write: wgpu::RenderPipeline,
    depth_read_only: wgpu::RenderPipeline,
    uniforms: HashMap<String, u32>,
    uniform_data: [u8; UNIFORM_SLOT_SIZE],
}

struct VertexArray {
    buffer: RawHandle,
    components: u32,
}

struct CubeTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Objects issued to callers, by name.
#[derive(Default)]
struct Objects {
    shaders: HashMap<RawHandle, ShaderObject>,
    programs: HashMap<RawHandle, ProgramObject>,
    buffers: HashMap<RawHandle, wgpu::Buffer>,
    vertex_arrays: HashMap<RawHandle, VertexArray>,
    textures: HashMap<RawHandle, CubeTexture>,
}

/// Bound objects and fixed-function state applied to the next draw.
struct DrawState {
    program: Option<RawHandle>,
    texture: Option<RawHandle>,
    depth_write: bool,
    viewport: ViewRect,
    scissor: Option<ViewRect>,
}

/// Graphics device backed by wgpu, bound to one window surface.
///
/// Must be created and used on a single thread (the render thread). GPU objects
/// are addressed by [`RawHandle`]; draw and state calls are recorded and
/// replayed into a single render pass when the frame is presented.
pub struct WgpuDevice {
    _instance: SubsystemHandle<wgpu::Instance>,
    window: Arc<Window>,

    /// Surface bound to the window; holds its own reference to it.
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: RefCell<wgpu::SurfaceConfiguration>,
    depth_view: RefCell<wgpu::TextureView>,

    pipeline_layout: wgpu::PipelineLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform_ring: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    /// Bound when a draw happens with no cube map bound.
    fallback_texture: CubeTexture,

    next_id: Cell<u32>,
    objects: RefCell<Objects>,
    state: RefCell<DrawState>,
    frame: RefCell<FrameRecorder>,
}

impl WgpuDevice {
    /// Creates a device and a surface for `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; this blocks on it.
    pub fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let instance = GPU_INSTANCE.acquire();
        let size = window.inner_size();

        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| Error::Windowing(format!("failed to create wgpu surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| Error::Windowing(format!("failed to find a suitable GPU adapter: {e}")))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("orrery device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| Error::Windowing(format!("failed to create wgpu device/queue: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or_else(|| Error::Windowing("no supported surface formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), surface {:?} {}x{}",
            info.name,
            info.backend,
            format,
            config.width,
            config.height
        );

        let depth_view = create_depth_view(&device, config.width, config.height);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery cube map bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("orrery cube map sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let uniform_ring = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orrery uniform ring"),
            size: (UNIFORM_SLOT_SIZE * MAX_DRAWS_PER_FRAME) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_ring,
                    offset: 0,
                    size: NonZeroU64::new(UNIFORM_SLOT_SIZE as u64),
                }),
            }],
        });

        let black = [0u8, 0, 0, 255];
        let fallback_face = FaceImage {
            width: 1,
            height: 1,
            pixels: &black,
        };
        let fallback_texture = upload_cube_map(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            &[fallback_face; 6],
        );

        let viewport = ViewRect::full(config.width, config.height);

        Ok(Self {
            _instance: instance,
            window,
            surface,
            device,
            queue,
            config: RefCell::new(config),
            depth_view: RefCell::new(depth_view),
            pipeline_layout,
            texture_layout,
            sampler,
            uniform_ring,
            uniform_bind_group,
            fallback_texture,
            next_id: Cell::new(1),
            objects: RefCell::new(Objects::default()),
            state: RefCell::new(DrawState {
                program: None,
                texture: None,
                depth_write: true,
                viewport,
                scissor: None,
            }),
            frame: RefCell::new(FrameRecorder::default()),
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.borrow().format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> (u32, u32) {
        let config = self.config.borrow();
        (config.width, config.height)
    }

    fn issue_handle(&self) -> RawHandle {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1).max(1));
        // Names start at 1 and skip 0 on wrap-around.
        RawHandle::new(NonZeroU32::new(id).unwrap_or(NonZeroU32::MIN))
    }

    fn build_pipeline(
        &self,
        vertex: &ShaderObject,
        fragment: &ShaderObject,
        depth_write: bool,
    ) -> wgpu::RenderPipeline {
        let label = if depth_write {
            "orrery pipeline (depth write)"
        } else {
            "orrery pipeline (depth read-only)"
        };

        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex.module,
                entry_point: Some(vertex.reflection.entry_point.as_str()),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: (POSITION_COMPONENTS as usize * std::mem::size_of::<f32>())
                        as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &POSITION_ATTRS,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment.module,
                entry_point: Some(fragment.reflection.entry_point.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Skybox faces are seen from inside and sphere winding is not
            // normalized, so nothing is culled.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

fn upload_cube_map(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    faces: &[FaceImage<'_>; 6],
) -> CubeTexture {
    let edge = faces[0].width.max(1);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("orrery cube map"),
        size: wgpu::Extent3d {
            width: edge,
            height: edge,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: CUBE_FACE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, face) in faces.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            face.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * face.width),
                rows_per_image: Some(face.height),
            },
            wgpu::Extent3d {
                width: face.width,
                height: face.height,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("orrery cube map view"),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        array_layer_count: Some(6),
        ..Default::default()
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("orrery cube map bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    CubeTexture {
        _texture: texture,
        bind_group,
    }
}

impl GraphicsDevice for WgpuDevice {
    fn create_shader(&self, stage: ShaderStage, source: &str) -> std::result::Result<RawHandle, String> {
        let reflection = shader::compile(stage, source)?;
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(match stage {
                ShaderStage::Vertex => "orrery vertex shader",
                ShaderStage::Fragment => "orrery fragment shader",
            }),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let handle = self.issue_handle();
        self.objects
            .borrow_mut()
            .shaders
            .insert(handle, ShaderObject { reflection, module });
        Ok(handle)
    }

    fn delete_shader(&self, shader: RawHandle) {
        if self.objects.borrow_mut().shaders.remove(&shader).is_none() {
            log::debug!("delete_shader: unknown shader {}", shader.get());
        }
    }

    fn link_program(
        &self,
        shaders: &[(ShaderStage, RawHandle)],
    ) -> std::result::Result<RawHandle, String> {
        let objects = self.objects.borrow();

        let find = |wanted: ShaderStage| -> std::result::Result<&ShaderObject, String> {
            let mut found = shaders.iter().filter(|(stage, _)| *stage == wanted);
            let (_, handle) = found
                .next()
                .ok_or_else(|| format!("no {wanted} shader attached"))?;
            if found.next().is_some() {
                return Err(format!("more than one {wanted} shader attached"));
            }
            let object = objects
                .shaders
                .get(handle)
                .ok_or_else(|| format!("{wanted} shader {} does not exist", handle.get()))?;
            if object.reflection.stage != wanted {
                return Err(format!(
                    "shader {} is a {} shader, attached as {wanted}",
                    handle.get(),
                    object.reflection.stage
                ));
            }
            Ok(object)
        };

        let vertex = find(ShaderStage::Vertex)?;
        let fragment = find(ShaderStage::Fragment)?;
        shader::check_interface(&vertex.reflection, &fragment.reflection)?;

        let mut uniforms = vertex.reflection.uniforms.clone();
        for (name, offset) in &fragment.reflection.uniforms {
            match uniforms.get(name) {
                Some(existing) if existing != offset => {
                    return Err(format!(
                        "uniform `{name}` is at offset {existing} in the vertex stage \
                         and {offset} in the fragment stage"
                    ));
                }
                _ => {
                    uniforms.insert(name.clone(), *offset);
                }
            }
        }

        let program = ProgramObject {
            depth_write: self.build_pipeline(vertex, fragment, true),
            depth_read_only: self.build_pipeline(vertex, fragment, false),
            uniforms,
            uniform_data: [0; UNIFORM_SLOT_SIZE],
        };
        drop(objects);

        let handle = self.issue_handle();
        self.objects.borrow_mut().programs.insert(handle, program);
        Ok(handle)
    }

    fn delete_program(&self, program: RawHandle) {
        if self.objects.borrow_mut().programs.remove(&program).is_none() {
            log::debug!("delete_program: unknown program {}", program.get());
        }
        let mut state = self.state.borrow_mut();
        if state.program == Some(program) {
            state.program = None;
        }
    }

    fn use_program(&self, program: RawHandle) {
        self.state.borrow_mut().program = Some(program);
    }

    fn uniform_location(&self, program: RawHandle, name: &str) -> Option<UniformLocation> {
        self.objects
            .borrow()
            .programs
            .get(&program)?
            .uniforms
            .get(name)
            .map(|&offset| UniformLocation(offset))
    }

    fn set_uniform_mat4(&self, location: UniformLocation, value: &Mat4) {
        let Some(program) = self.state.borrow().program else {
            log::warn!("set_uniform_mat4 with no active program");
            return;
        };
        let mut objects = self.objects.borrow_mut();
        let Some(program) = objects.programs.get_mut(&program) else {
            return;
        };

        let cols = value.to_cols_array();
        let bytes: &[u8] = bytemuck::cast_slice(&cols);
        let start = location.0 as usize;
        let Some(dst) = program.uniform_data.get_mut(start..start + bytes.len()) else {
            log::warn!("uniform at offset {start} does not fit the uniform block");
            return;
        };
        dst.copy_from_slice(bytes);
    }

    fn create_vertex_buffer(&self, data: &[f32]) -> RawHandle {
        let buffer = if data.is_empty() {
            // Zero-sized vertex buffers cannot be bound.
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("orrery vertex buffer"),
                size: wgpu::COPY_BUFFER_ALIGNMENT,
                usage: wgpu::BufferUsages::VERTEX,
                mapped_at_creation: false,
            })
        } else {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("orrery vertex buffer"),
                    contents: bytemuck::cast_slice(data),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        };

        let handle = self.issue_handle();
        self.objects.borrow_mut().buffers.insert(handle, buffer);
        handle
    }

    fn delete_buffer(&self, buffer: RawHandle) {
        if self.objects.borrow_mut().buffers.remove(&buffer).is_none() {
            log::debug!("delete_buffer: unknown buffer {}", buffer.get());
        }
    }

    fn create_vertex_array(&self, buffer: RawHandle, components: u32) -> RawHandle {
        if components != POSITION_COMPONENTS {
            log::warn!(
                "vertex array with {components} components; pipelines consume {POSITION_COMPONENTS}"
            );
        }
        let handle = self.issue_handle();
        self.objects
            .borrow_mut()
            .vertex_arrays
            .insert(handle, VertexArray { buffer, components });
        handle
    }

    fn delete_vertex_array(&self, vertex_array: RawHandle) {
        if self
            .objects
            .borrow_mut()
            .vertex_arrays
            .remove(&vertex_array)
            .is_none()
        {
            log::debug!("delete_vertex_array: unknown vertex array {}", vertex_array.get());
        }
    }

    fn create_cube_map(&self, faces: &[FaceImage<'_>; 6]) -> RawHandle {
        let texture = upload_cube_map(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            faces,
        );
        let handle = self.issue_handle();
        self.objects.borrow_mut().textures.insert(handle, texture);
        handle
    }

    fn delete_texture(&self, texture: RawHandle) {
        if self.objects.borrow_mut().textures.remove(&texture).is_none() {
            log::debug!("delete_texture: unknown texture {}", texture.get());
        }
        let mut state = self.state.borrow_mut();
        if state.texture == Some(texture) {
            state.texture = None;
        }
    }

    fn bind_cube_map(&self, texture: RawHandle) {
        self.state.borrow_mut().texture = Some(texture);
    }

    fn draw_triangles(&self, vertex_array: RawHandle, vertex_count: u32) {
        if vertex_count == 0 {
            return;
        }

        let state = self.state.borrow();
        let objects = self.objects.borrow();

        let Some(program) = state.program.and_then(|p| objects.programs.get(&p)) else {
            log::warn!("draw_triangles with no usable program bound");
            return;
        };
        let Some(layout) = objects.vertex_arrays.get(&vertex_array) else {
            log::warn!("draw_triangles: unknown vertex array {}", vertex_array.get());
            return;
        };
        if layout.components != POSITION_COMPONENTS {
            return;
        }
        let Some(buffer) = objects.buffers.get(&layout.buffer) else {
            log::warn!("draw_triangles: vertex array {} lost its buffer", vertex_array.get());
            return;
        };

        let texture = state
            .texture
            .and_then(|t| objects.textures.get(&t))
            .unwrap_or(&self.fallback_texture);

        let pipeline = if state.depth_write {
            &program.depth_write
        } else {
            &program.depth_read_only
        };

        self.frame.borrow_mut().push(DrawCall {
            pipeline: pipeline.clone(),
            vertex_buffer: buffer.clone(),
            vertex_count,
            texture: texture.bind_group.clone(),
            uniforms: program.uniform_data,
            viewport: state.viewport,
            scissor: state.scissor,
        });
    }

    fn set_viewport(&self, rect: ViewRect) {
        self.state.borrow_mut().viewport = rect;
    }

    fn set_scissor(&self, rect: ViewRect) {
        self.state.borrow_mut().scissor = Some(rect);
    }

    fn set_depth_write(&self, enabled: bool) {
        self.state.borrow_mut().depth_write = enabled;
    }

    fn clear(&self, color: [f32; 4]) {
        self.frame.borrow_mut().clear(color);
    }

    fn finish(&self) {
        let wait = self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });
        if let Err(err) = wait {
            log::warn!("waiting for the GPU failed: {err}");
        }
    }
}

impl Present for WgpuDevice {
    fn resize(&self, width: u32, height: u32) {
        let mut config = self.config.borrow_mut();
        if apply_resize(&self.surface, &self.device, &mut config, width, height) {
            *self.depth_view.borrow_mut() = create_depth_view(&self.device, width, height);
            log::debug!("surface resized to {width}x{height}");
        }
    }

    fn present(&self) -> Result<()> {
        let recording = self.frame.borrow_mut().take();
        if recording.dropped > 0 {
            log::warn!(
                "dropped {} draw calls past the per-frame limit of {MAX_DRAWS_PER_FRAME}",
                recording.dropped
            );
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                let message = err.to_string();
                let config = self.config.borrow();
                return match handle_surface_error(&self.surface, &self.device, &config, &err) {
                    SurfaceErrorAction::Fatal => {
                        Err(Error::Windowing(format!("surface failure: {message}")))
                    }
                    action => {
                        log::warn!("surface error ({message}); {action:?}");
                        Ok(())
                    }
                };
            }
        };

        let (width, height) = self.size();
        let color_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = self.depth_view.borrow();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("orrery frame encoder"),
            });

        let mut uniform_bytes = Vec::with_capacity(recording.draws.len() * UNIFORM_SLOT_SIZE);
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orrery frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(recording.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for (slot, draw) in recording.draws.iter().enumerate() {
                uniform_bytes.extend_from_slice(&draw.uniforms);

                let Some(viewport) = clamp_rect(draw.viewport, width, height) else {
                    continue;
                };
                let scissor = draw.scissor.unwrap_or(ViewRect::full(width, height));
                let Some(scissor) = clamp_rect(scissor, width, height) else {
                    continue;
                };

                rpass.set_pipeline(&draw.pipeline);
                rpass.set_bind_group(0, &self.uniform_bind_group, &[uniform_offset(slot)]);
                rpass.set_bind_group(1, &draw.texture, &[]);
                rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                rpass.set_viewport(
                    viewport.x as f32,
                    viewport.y as f32,
                    viewport.width as f32,
                    viewport.height as f32,
                    0.0,
                    1.0,
                );
                rpass.set_scissor_rect(scissor.x, scissor.y, scissor.width, scissor.height);
                rpass.draw(0..draw.vertex_count, 0..1);
            }
        }

        if !uniform_bytes.is_empty() {
            self.queue.write_buffer(&self.uniform_ring, 0, &uniform_bytes);
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        self.window.pre_present_notify();
        surface_texture.present();
        Ok(())
    }
}
