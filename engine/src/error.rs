//! Error Types
//!
//! Construction-time failures of tracks, meshes, skins, grids and scene nodes.
//! Evaluation of an already-validated track or skin never returns an error.

use std::io;
use thiserror::Error;

/// Errors raised while building scene data.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Fewer than two keyframes, a non-finite sample time, or component
    /// tracks whose time ranges do not overlap.
    #[error("invalid keyframe track: {0}")]
    InvalidTrack(String),

    /// Two adjacent keyframes share the same time.
    #[error("degenerate keyframe interval: two samples at time {time}")]
    DegenerateInterval { time: f32 },

    /// Index buffer length is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// A triangle references a vertex that does not exist.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// A vertex attribute array does not match the position count.
    #[error("attribute `{name}` has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A weighted bone slot references a bone the skin does not bind.
    #[error("bone index {index} out of range for {bone_count} bones")]
    BoneIndexOutOfRange { index: u32, bone_count: usize },

    /// Bone world transforms and bind offsets differ in count, or the skin
    /// binds no bones / too many bones.
    #[error("invalid bone binding: {0}")]
    InvalidSkin(String),

    /// Grid dimensions or elevation field are unusable.
    #[error("invalid terrain grid {rows}x{cols}: {reason}")]
    InvalidGrid {
        rows: usize,
        cols: usize,
        reason: String,
    },

    /// Requested lake center is not strictly inside the grid.
    #[error("lake center ({row}, {col}) is not strictly inside a {rows}x{cols} grid")]
    LakeCenterOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A node id that does not belong to the scene graph.
    #[error("unknown scene node {0}")]
    UnknownNode(usize),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Adapter or device could not be acquired.
    #[error("GPU error: {0}")]
    Gpu(String),
}

/// Result type using SceneError
pub type Result<T> = std::result::Result<T, SceneError>;
