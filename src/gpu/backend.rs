//! wgpu implementation of [`RenderBackend`].
//!
//! One command encoder per frame. `begin_frame` uploads the camera and
//! actor uniforms and records the clear; every later pass is recorded into
//! the same encoder and `end_frame` submits and presents. Each light slot
//! owns its distance cubemap, its face uniforms and its Phong uniform, so
//! nothing written for one light is overwritten by the next before the
//! single submit.

use wgpu::util::DeviceExt;

use super::dynamic_buffer::DynamicUniformBuffer;
use super::pipeline_helpers::{
    self, create_mesh_pipeline, MeshPipelineState, ADDITIVE_BLEND,
};
use super::render_context::RenderContext;
use super::shader_composer::ShaderComposer;
use super::shadow_map::{face_view_projections, ShadowCube, SHADOW_FORMAT};
use super::texture::DepthTarget;
use super::uniforms::{
    ActorUniform, CameraUniform, PhongParams, PointLightUniform,
    ShadowFaceUniform,
};
use crate::assets::{keys, Resources};
use crate::error::{PenumbraError, RenderError};
use crate::lighting::LightState;
use crate::options::{AssetOptions, LightingOptions};
use crate::renderer::{RenderBackend, SceneInfo, ShadowMode};
use crate::scene::{Actor, Mesh, Scene};

/// Cleared value of the distance cubemaps: farther than anything.
const CLEAR_DISTANCE: f64 = 1.0e9;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Option<Self> {
        if mesh.is_empty() {
            return None;
        }
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        })
    }
}

/// GPU resources private to one light.
struct LightSlot {
    shadow: Option<ShadowCube>,
    faces: DynamicUniformBuffer<ShadowFaceUniform>,
    face_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    shadowed_bind_group: Option<wgpu::BindGroup>,
    unshadowed_bind_group: wgpu::BindGroup,
}

struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

struct Layouts {
    camera: wgpu::BindGroupLayout,
    actor: wgpu::BindGroupLayout,
    face: wgpu::BindGroupLayout,
    light: wgpu::BindGroupLayout,
}

impl Layouts {
    fn new(device: &wgpu::Device) -> Self {
        let layout = |label: &str, entries: &[wgpu::BindGroupLayoutEntry]| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries,
            })
        };
        let both = wgpu::ShaderStages::VERTEX_FRAGMENT;
        Self {
            camera: layout(
                "Camera Layout",
                &[pipeline_helpers::uniform_buffer(0, both, None)],
            ),
            actor: layout(
                "Actor Layout",
                &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    DynamicUniformBuffer::<ActorUniform>::item_size(),
                )],
            ),
            face: layout(
                "Shadow Face Layout",
                &[pipeline_helpers::uniform_buffer(
                    0,
                    both,
                    DynamicUniformBuffer::<ShadowFaceUniform>::item_size(),
                )],
            ),
            light: layout(
                "Point Light Layout",
                &[
                    pipeline_helpers::uniform_buffer(
                        0,
                        wgpu::ShaderStages::FRAGMENT,
                        None,
                    ),
                    pipeline_helpers::texture_cube_unfilterable(1),
                    pipeline_helpers::non_filtering_sampler(2),
                ],
            ),
        }
    }
}

/// Renders the scene with wgpu into the window surface.
pub struct GpuBackend {
    context: RenderContext,
    layouts: Layouts,
    depth: DepthTarget,
    shadow_depth: Option<DepthTarget>,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    actor_uniforms: DynamicUniformBuffer<ActorUniform>,
    actor_bind_group: wgpu::BindGroup,
    meshes: Vec<Option<GpuMesh>>,
    sampler: wgpu::Sampler,
    dummy_cube: ShadowCube,
    slots: Vec<LightSlot>,
    ambient_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    phong_pipeline: wgpu::RenderPipeline,
    phong_params: PhongParams,
    shadow_size: u32,
    shadow_far: f32,
    frame: Option<Frame>,
}

impl GpuBackend {
    /// Compile the pass shaders, build pipelines and upload the scene's
    /// meshes. One light slot is prepared per declared light.
    ///
    /// # Errors
    ///
    /// Missing shader sources or shader composition failures.
    pub fn new(
        context: RenderContext,
        lighting: &LightingOptions,
        assets: &AssetOptions,
        resources: &Resources,
        scene: &Scene,
    ) -> Result<Self, PenumbraError> {
        let device = &context.device;

        let mut composer = ShaderComposer::new(
            resources.require_text(keys::COMMON_SHADER)?,
            &assets.common_shader,
        )?;
        let mut compose = |label: &str,
                           key: &str,
                           path: &str|
         -> Result<wgpu::ShaderModule, PenumbraError> {
            let source = resources.require_text(key)?;
            composer.compose(device, label, source, path)
        };
        let shadow_shader = compose(
            "Shadowmap Shader",
            keys::SHADOWMAP_SHADER,
            &assets.shadowmap_shader,
        )?;
        let ambient_shader =
            compose("Ambient Shader", keys::AMBIENT_SHADER, &assets.ambient_shader)?;
        let phong_shader =
            compose("Phong Shader", keys::PHONG_SHADER, &assets.phong_shader)?;

        let layouts = Layouts::new(device);

        let ambient_pipeline = create_mesh_pipeline(
            device,
            "Ambient",
            &ambient_shader,
            &[&layouts.camera, &layouts.actor],
            &MeshPipelineState {
                format: context.format(),
                blend: None,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
                cull_mode: None,
            },
        );
        let phong_pipeline = create_mesh_pipeline(
            device,
            "Phong",
            &phong_shader,
            &[&layouts.camera, &layouts.actor, &layouts.light],
            &MeshPipelineState {
                format: context.format(),
                blend: Some(ADDITIVE_BLEND),
                depth_write: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                cull_mode: None,
            },
        );
        let shadow_pipeline = create_mesh_pipeline(
            device,
            "Shadowmap",
            &shadow_shader,
            &[&layouts.face, &layouts.actor],
            &MeshPipelineState {
                format: SHADOW_FORMAT,
                blend: None,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
                cull_mode: None,
            },
        );

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform"),
            size: size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &layouts.camera,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let actor_uniforms =
            DynamicUniformBuffer::new(device, "Actor Uniforms", scene.actors().len());
        let actor_bind_group =
            create_actor_bind_group(device, &layouts.actor, &actor_uniforms);

        let meshes = scene
            .meshes()
            .iter()
            .enumerate()
            .map(|(i, mesh)| GpuMesh::upload(device, &format!("Mesh {i}"), mesh))
            .collect();

        let shadow_size = lighting.shadow_map_size;
        let shadow_depth = (shadow_size > 0).then(|| {
            DepthTarget::new(device, "Shadow Depth", shadow_size, shadow_size)
        });
        let (width, height) = context.size();
        let depth = DepthTarget::new(device, "Main Depth", width, height);
        let sampler = pipeline_helpers::nearest_sampler(device, "Shadow Sampler");
        let dummy_cube = ShadowCube::new(device, "Unshadowed Cube", 1);

        let mut backend = Self {
            sampler,
            dummy_cube,
            context,
            layouts,
            depth,
            shadow_depth,
            camera_buffer,
            camera_bind_group,
            actor_uniforms,
            actor_bind_group,
            meshes,
            slots: Vec::new(),
            ambient_pipeline,
            shadow_pipeline,
            phong_pipeline,
            phong_params: PhongParams {
                shininess: lighting.shininess,
                specular_strength: lighting.specular_strength,
                shadow_bias: lighting.shadow_bias,
            },
            shadow_size,
            shadow_far: lighting.shadow_far,
            frame: None,
        };
        for slot in 0..lighting.lights.len() {
            backend.push_slot(slot, shadow_size > 0);
        }
        log::info!(
            "GPU backend ready: {} meshes, {} light slots, {}px shadow cubes",
            backend.meshes.len(),
            backend.slots.len(),
            shadow_size
        );
        Ok(backend)
    }

    /// The GPU context, e.g. to query the surface size.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Resize the surface and the main depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.depth =
            DepthTarget::new(&self.context.device, "Main Depth", width, height);
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    fn push_slot(&mut self, slot: usize, with_shadow: bool) {
        let device = &self.context.device;
        let label = format!("Light {slot}");

        let shadow = with_shadow
            .then(|| ShadowCube::new(device, &label, self.shadow_size));
        let faces = DynamicUniformBuffer::new(device, &label, 6);
        let face_bind_group =
            create_face_bind_group(device, &self.layouts.face, &faces);
        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&label),
            size: size_of::<PointLightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let light_bind_group = |cube: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&label),
                layout: &self.layouts.light,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: light_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(cube),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            })
        };
        let shadowed_bind_group =
            shadow.as_ref().map(|cube| light_bind_group(&cube.cube_view));
        let unshadowed_bind_group = light_bind_group(&self.dummy_cube.cube_view);

        self.slots.push(LightSlot {
            shadow,
            faces,
            face_bind_group,
            light_buffer,
            shadowed_bind_group,
            unshadowed_bind_group,
        });
    }
}

fn create_actor_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: &DynamicUniformBuffer<ActorUniform>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Actor Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.binding(),
        }],
    })
}

fn create_face_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: &DynamicUniformBuffer<ShadowFaceUniform>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Shadow Face Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.binding(),
        }],
    })
}

/// Draw every actor whose mesh has geometry, binding its uniform slot at
/// `actor_group`.
fn draw_actors(
    pass: &mut wgpu::RenderPass<'_>,
    actors: &[Actor],
    meshes: &[Option<GpuMesh>],
    actor_bind_group: &wgpu::BindGroup,
    actor_uniforms: &DynamicUniformBuffer<ActorUniform>,
    actor_group: u32,
) {
    for (i, actor) in actors.iter().enumerate() {
        let Some(Some(mesh)) = meshes.get(actor.mesh().0) else {
            continue;
        };
        pass.set_bind_group(actor_group, actor_bind_group, &[actor_uniforms.offset(i)]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

impl RenderBackend for GpuBackend {
    fn begin_frame(
        &mut self,
        info: &SceneInfo<'_>,
        background: [f32; 4],
    ) -> Result<(), RenderError> {
        if self.frame.take().is_some() {
            log::warn!("previous frame was never ended; dropping it");
        }

        let queue = &self.context.queue;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_scene_info(info)),
        );
        let actors: Vec<ActorUniform> = info
            .actors
            .iter()
            .map(|actor| ActorUniform::new(actor.model_matrix()))
            .collect();
        if self
            .actor_uniforms
            .write(&self.context.device, queue, &actors)
        {
            self.actor_bind_group = create_actor_bind_group(
                &self.context.device,
                &self.layouts.actor,
                &self.actor_uniforms,
            );
        }

        let surface_texture = self.context.next_frame()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder("Frame Encoder");

        let [r, g, b, a] = background.map(f64::from);
        drop(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        }));

        self.frame = Some(Frame {
            surface_texture,
            view,
            encoder,
        });
        Ok(())
    }

    fn draw_ambient(&mut self, info: &SceneInfo<'_>) -> Result<(), RenderError> {
        let frame = self.frame.as_mut().ok_or(RenderError::NoFrameInProgress)?;
        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Ambient Pass"),
            color_attachments: &[Some(load_attachment(&frame.view))],
            depth_stencil_attachment: Some(depth_attachment(&self.depth.view)),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.ambient_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        draw_actors(
            &mut pass,
            info.actors,
            &self.meshes,
            &self.actor_bind_group,
            &self.actor_uniforms,
            1,
        );
        Ok(())
    }

    fn render_shadowmap(
        &mut self,
        slot: usize,
        light: &LightState,
        info: &SceneInfo<'_>,
    ) -> Result<(), RenderError> {
        let frame = self.frame.as_mut().ok_or(RenderError::NoFrameInProgress)?;
        let unavailable = RenderError::ShadowTargetUnavailable { slot };
        let light_slot = self.slots.get_mut(slot).ok_or(unavailable)?;
        let (Some(cube), Some(shadow_depth)) =
            (light_slot.shadow.as_ref(), self.shadow_depth.as_ref())
        else {
            return Err(RenderError::ShadowTargetUnavailable { slot });
        };

        let faces = face_view_projections(light.position, self.shadow_far)
            .map(|vp| ShadowFaceUniform::new(vp, light.position));
        if light_slot
            .faces
            .write(&self.context.device, &self.context.queue, &faces)
        {
            light_slot.face_bind_group = create_face_bind_group(
                &self.context.device,
                &self.layouts.face,
                &light_slot.faces,
            );
        }

        for (face, face_view) in cube.face_views.iter().enumerate() {
            let mut pass =
                frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Shadowmap Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: face_view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: CLEAR_DISTANCE,
                                g: 0.0,
                                b: 0.0,
                                a: 0.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &shadow_depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Discard,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(
                0,
                &light_slot.face_bind_group,
                &[light_slot.faces.offset(face)],
            );
            draw_actors(
                &mut pass,
                info.actors,
                &self.meshes,
                &self.actor_bind_group,
                &self.actor_uniforms,
                1,
            );
        }
        Ok(())
    }

    fn draw_phong(
        &mut self,
        slot: usize,
        light: &LightState,
        info: &SceneInfo<'_>,
        shadow: ShadowMode,
    ) -> Result<(), RenderError> {
        if self.frame.is_none() {
            return Err(RenderError::NoFrameInProgress);
        }
        while self.slots.len() <= slot {
            self.push_slot(self.slots.len(), false);
        }
        let light_slot = &self.slots[slot];
        let shadow_bind_group = match shadow {
            ShadowMode::Shadowed => light_slot.shadowed_bind_group.as_ref(),
            ShadowMode::Unshadowed => None,
        };
        let uniform = PointLightUniform::new(
            light,
            self.phong_params,
            shadow_bind_group.is_some(),
        );
        self.context.queue.write_buffer(
            &light_slot.light_buffer,
            0,
            bytemuck::bytes_of(&uniform),
        );
        let light_bind_group =
            shadow_bind_group.unwrap_or(&light_slot.unshadowed_bind_group);

        let frame = self.frame.as_mut().ok_or(RenderError::NoFrameInProgress)?;
        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Phong Pass"),
            color_attachments: &[Some(load_attachment(&frame.view))],
            depth_stencil_attachment: Some(depth_attachment(&self.depth.view)),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.phong_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(2, light_bind_group, &[]);
        draw_actors(
            &mut pass,
            info.actors,
            &self.meshes,
            &self.actor_bind_group,
            &self.actor_uniforms,
            1,
        );
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let frame = self.frame.take().ok_or(RenderError::NoFrameInProgress)?;
        self.context.submit(frame.encoder);
        frame.surface_texture.present();
        Ok(())
    }
}

fn load_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassColorAttachment<'_> {
    wgpu::RenderPassColorAttachment {
        view,
        depth_slice: None,
        resolve_target: None,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Load,
            store: wgpu::StoreOp::Store,
        },
    }
}

fn depth_attachment(
    view: &wgpu::TextureView,
) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Load,
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}
