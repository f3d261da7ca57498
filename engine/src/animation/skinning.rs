//! Linear Blend Skinning
//!
//! Each vertex is moved by up to four bones. The deformed position is the
//! weighted sum of the bind-pose position transformed by every influencing
//! bone's skinning matrix (`bone_world * bind_offset`). Weights are used as
//! given and are not renormalized.

use glam::{Mat4, Vec3};

use crate::error::{Result, SceneError};
use crate::scene::NodeId;

/// Upper bound on bones per skin (size of the bone matrix uniform array).
pub const MAX_BONES: usize = 128;

/// Bone slots per vertex.
pub const MAX_INFLUENCES: usize = 4;

/// A bone node and the offset from mesh space into that bone's bind space.
#[derive(Clone, Copy, Debug)]
pub struct BoneBinding {
    pub node: NodeId,
    pub offset: Mat4,
}

/// Bone ids and weights for one vertex. Slots with weight 0 are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexInfluence {
    pub bone_ids: [u32; MAX_INFLUENCES],
    pub weights: [f32; MAX_INFLUENCES],
}

impl VertexInfluence {
    /// Vertex fully bound to one bone.
    pub fn single(bone: u32) -> Self {
        Self {
            bone_ids: [bone, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Vertex split between two bones.
    pub fn pair(a: u32, weight_a: f32, b: u32, weight_b: f32) -> Self {
        Self {
            bone_ids: [a, b, 0, 0],
            weights: [weight_a, weight_b, 0.0, 0.0],
        }
    }

    fn slots(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.bone_ids
            .iter()
            .zip(self.weights.iter())
            .filter(|(_, w)| **w != 0.0)
            .map(|(id, w)| (*id as usize, *w))
    }
}

/// Validated bone bindings plus per-vertex influences.
#[derive(Clone, Debug)]
pub struct Skin {
    bones: Vec<BoneBinding>,
    influences: Vec<VertexInfluence>,
}

impl Skin {
    /// Validate the skin against the mesh it deforms.
    pub fn new(
        bones: Vec<BoneBinding>,
        influences: Vec<VertexInfluence>,
        vertex_count: usize,
    ) -> Result<Self> {
        if bones.is_empty() {
            return Err(SceneError::InvalidSkin("skin binds no bones".into()));
        }
        if bones.len() > MAX_BONES {
            return Err(SceneError::InvalidSkin(format!(
                "{} bones exceeds the limit of {MAX_BONES}",
                bones.len()
            )));
        }
        if influences.len() != vertex_count {
            return Err(SceneError::AttributeLengthMismatch {
                name: "bone_weights",
                expected: vertex_count,
                actual: influences.len(),
            });
        }
        for influence in &influences {
            if let Some((index, _)) = influence.slots().find(|(id, _)| *id >= bones.len()) {
                return Err(SceneError::BoneIndexOutOfRange {
                    index: index as u32,
                    bone_count: bones.len(),
                });
            }
        }
        Ok(Self { bones, influences })
    }

    pub fn bones(&self) -> &[BoneBinding] {
        &self.bones
    }

    pub fn influences(&self) -> &[VertexInfluence] {
        &self.influences
    }

    pub fn bone_ids(&self) -> Vec<[u32; 4]> {
        self.influences.iter().map(|i| i.bone_ids).collect()
    }

    pub fn bone_weights(&self) -> Vec<[f32; 4]> {
        self.influences.iter().map(|i| i.weights).collect()
    }

    /// Skinning matrices from the current world transform of every node.
    ///
    /// `world_transforms` is indexed by node id. A bone bound to a node with
    /// no world transform is `UnknownNode`.
    pub fn bone_matrices(&self, world_transforms: &[Mat4]) -> Result<Vec<Mat4>> {
        self.bones
            .iter()
            .map(|bone| {
                world_transforms
                    .get(bone.node.index())
                    .map(|world| *world * bone.offset)
                    .ok_or(SceneError::UnknownNode(bone.node.index()))
            })
            .collect()
    }

    /// Deform bind-pose positions and normals with precomputed matrices.
    pub fn deform(
        &self,
        positions: &[Vec3],
        normals: &[Vec3],
        matrices: &[Mat4],
    ) -> (Vec<Vec3>, Vec<Vec3>) {
        debug_assert_eq!(matrices.len(), self.bones.len());
        let deformed_positions = skin_positions(positions, &self.influences, matrices);
        let deformed_normals = skin_normals(normals, &self.influences, matrices);
        (deformed_positions, deformed_normals)
    }
}

/// Pair bone world transforms with their bind offsets.
pub fn skinning_matrices(bone_worlds: &[Mat4], offsets: &[Mat4]) -> Result<Vec<Mat4>> {
    if bone_worlds.len() != offsets.len() {
        return Err(SceneError::InvalidSkin(format!(
            "{} bone transforms but {} bind offsets",
            bone_worlds.len(),
            offsets.len()
        )));
    }
    Ok(bone_worlds
        .iter()
        .zip(offsets)
        .map(|(world, offset)| *world * *offset)
        .collect())
}

/// `p' = sum_i w_i * (M_i * p)` for every vertex.
///
/// Influences must already be validated against `matrices`.
pub fn skin_positions(
    positions: &[Vec3],
    influences: &[VertexInfluence],
    matrices: &[Mat4],
) -> Vec<Vec3> {
    positions
        .iter()
        .zip(influences)
        .map(|(p, influence)| {
            influence
                .slots()
                .fold(Vec3::ZERO, |acc, (bone, w)| acc + matrices[bone].transform_point3(*p) * w)
        })
        .collect()
}

/// Normals follow the same blend as vectors, then get renormalized.
pub fn skin_normals(
    normals: &[Vec3],
    influences: &[VertexInfluence],
    matrices: &[Mat4],
) -> Vec<Vec3> {
    normals
        .iter()
        .zip(influences)
        .map(|(n, influence)| {
            let blended = influence
                .slots()
                .fold(Vec3::ZERO, |acc, (bone, w)| acc + matrices[bone].transform_vector3(*n) * w);
            blended.try_normalize().unwrap_or(*n)
        })
        .collect()
}
