//! Render Module
//!
//! The mesh-submission seam between scene evaluation and a renderer:
//! typed submissions, a recording sink for headless runs and tests, and a
//! wgpu sink that uploads vertex, index, uniform and bone buffers.

pub mod gpu;
pub mod recording;
pub mod submission;
pub mod vertex;

// Re-export commonly used types for convenience
pub use gpu::{GpuMesh, GpuMeshSink};
pub use recording::{RecordedMesh, RecordingSink};
pub use submission::{
    LightUniforms, MeshSink, MeshSubmission, ShaderFamily, ShaderUniforms, TextureBinding,
    TextureHandle, VertexAttributes,
};
pub use vertex::{DrawUniforms, MeshVertex, SkinnedMeshVertex, interleave, interleave_skinned};
