//! GPU Mesh Sink
//!
//! Uploads submissions into wgpu buffers keyed by label. A buffer is
//! rewritten in place when the new data fits and recreated otherwise, so a
//! terrain rebuilt with the same grid reuses its allocation. Pipelines and
//! draw dispatch belong to the renderer that owns the device.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::submission::{MeshSink, MeshSubmission};
use super::vertex::{DrawUniforms, bone_matrix_block, interleave, interleave_skinned};
use crate::error::{Result, SceneError};

/// GPU-resident copy of one labelled mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    /// Present for skinned submissions.
    pub bone_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
    pub skinned: bool,
    /// Texture keys in unit order.
    pub textures: Vec<String>,
}

pub struct GpuMeshSink {
    device: wgpu::Device,
    queue: wgpu::Queue,
    meshes: HashMap<String, GpuMesh>,
}

impl GpuMeshSink {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            meshes: HashMap::new(),
        }
    }

    /// Acquire a device without a surface.
    pub fn headless() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| SceneError::Gpu(format!("no adapter: {e}")))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Lake Forest Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            ..Default::default()
        }))
        .map_err(|e| SceneError::Gpu(format!("device request failed: {e}")))?;

        log::info!("headless GPU sink on {}", adapter.get_info().name);
        Ok(Self::new(device, queue))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn mesh(&self, label: &str) -> Option<&GpuMesh> {
        self.meshes.get(label)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Write `contents` into `slot`, recreating the buffer when it is
    /// missing or too small.
    fn write_or_create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: Option<&wgpu::Buffer>,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Option<wgpu::Buffer> {
        match slot {
            Some(buffer) if buffer.size() >= contents.len() as u64 => {
                queue.write_buffer(buffer, 0, contents);
                None
            }
            _ => Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })),
        }
    }
}

impl MeshSink for GpuMeshSink {
    fn submit(&mut self, submission: &MeshSubmission<'_>) -> Result<()> {
        submission.validate()?;

        let attributes = &submission.attributes;
        let skinned = attributes.is_skinned();
        let vertex_bytes: Vec<u8> = if skinned {
            bytemuck::cast_slice(&interleave_skinned(attributes)).to_vec()
        } else {
            bytemuck::cast_slice(&interleave(attributes)).to_vec()
        };
        let index_bytes: &[u8] = bytemuck::cast_slice(submission.indices);
        let uniforms = DrawUniforms::from_submission(submission);
        let bone_block = (!submission.uniforms.bone_matrices().is_empty())
            .then(|| bone_matrix_block(submission.uniforms.bone_matrices()));

        let label = submission.label;
        let existing = self.meshes.get(label);
        let vertex_label = format!("{label} Vertex Buffer");
        let index_label = format!("{label} Index Buffer");
        let uniform_label = format!("{label} Uniform Buffer");
        let bone_label = format!("{label} Bone Buffer");

        let new_vertex = Self::write_or_create(
            &self.device,
            &self.queue,
            existing.map(|m| &m.vertex_buffer),
            &vertex_label,
            &vertex_bytes,
            wgpu::BufferUsages::VERTEX,
        );
        let new_index = Self::write_or_create(
            &self.device,
            &self.queue,
            existing.map(|m| &m.index_buffer),
            &index_label,
            index_bytes,
            wgpu::BufferUsages::INDEX,
        );
        let new_uniform = Self::write_or_create(
            &self.device,
            &self.queue,
            existing.map(|m| &m.uniform_buffer),
            &uniform_label,
            bytemuck::bytes_of(&uniforms),
            wgpu::BufferUsages::UNIFORM,
        );
        let new_bones = bone_block.as_ref().and_then(|block| {
            Self::write_or_create(
                &self.device,
                &self.queue,
                existing.and_then(|m| m.bone_buffer.as_ref()),
                &bone_label,
                bytemuck::cast_slice(block),
                wgpu::BufferUsages::UNIFORM,
            )
        });

        let textures = submission
            .textures
            .iter()
            .map(|binding| binding.texture.0.clone())
            .collect();
        let index_count = submission.indices.len() as u32;
        let vertex_count = attributes.vertex_count() as u32;

        match self.meshes.get_mut(label) {
            Some(mesh) => {
                if let Some(buffer) = new_vertex {
                    mesh.vertex_buffer = buffer;
                }
                if let Some(buffer) = new_index {
                    mesh.index_buffer = buffer;
                }
                if let Some(buffer) = new_uniform {
                    mesh.uniform_buffer = buffer;
                }
                mesh.bone_buffer =
                    next_bone_buffer(mesh.bone_buffer.take(), new_bones, bone_block.is_some());
                mesh.index_count = index_count;
                mesh.vertex_count = vertex_count;
                mesh.skinned = skinned;
                mesh.textures = textures;
            }
            None => {
                // A fresh label always gets freshly created buffers.
                let (Some(vertex_buffer), Some(index_buffer), Some(uniform_buffer)) =
                    (new_vertex, new_index, new_uniform)
                else {
                    return Err(SceneError::Gpu(format!("buffers for `{label}` were not created")));
                };
                log::trace!("uploaded `{label}`: {vertex_count} vertices, {index_count} indices");
                self.meshes.insert(
                    label.to_string(),
                    GpuMesh {
                        vertex_buffer,
                        index_buffer,
                        uniform_buffer,
                        bone_buffer: new_bones,
                        index_count,
                        vertex_count,
                        skinned,
                        textures,
                    },
                );
            }
        }
        Ok(())
    }
}

/// Bone buffer a label keeps after a submission. A rewritten buffer keeps
/// its handle; an unskinned submission drops it.
fn next_bone_buffer<B>(current: Option<B>, written: Option<B>, has_bones: bool) -> Option<B> {
    if has_bones { written.or(current) } else { None }
}
