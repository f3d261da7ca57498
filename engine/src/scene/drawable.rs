//! Drawable Payloads
//!
//! What a scene node draws. Meshes are shared behind `Arc` so many nodes can
//! reference one generated mesh (every leaf quad, every water plane size).

use std::sync::Arc;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::Skin;
use crate::error::{Result, SceneError};
use crate::mesh::Mesh;
use crate::render::{
    LightUniforms, MeshSink, MeshSubmission, ShaderUniforms, TextureBinding, TextureHandle,
    VertexAttributes,
};

/// Where linear blend skinning runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinningMode {
    /// Deform on the CPU and submit world-space positions.
    #[default]
    Cpu,
    /// Submit bind-pose vertices, bone attributes and bone matrices.
    Gpu,
}

/// A mesh deformed by a skin.
#[derive(Clone, Debug)]
pub struct SkinnedDrawable {
    pub mesh: Arc<Mesh>,
    pub skin: Skin,
    pub light: LightUniforms,
    pub textures: Vec<TextureBinding>,
    pub mode: SkinningMode,
    bone_ids: Vec<[u32; 4]>,
    bone_weights: Vec<[f32; 4]>,
}

impl SkinnedDrawable {
    pub fn new(
        mesh: Arc<Mesh>,
        skin: Skin,
        light: LightUniforms,
        textures: Vec<TextureBinding>,
        mode: SkinningMode,
    ) -> Self {
        let bone_ids = skin.bone_ids();
        let bone_weights = skin.bone_weights();
        Self {
            mesh,
            skin,
            light,
            textures,
            mode,
            bone_ids,
            bone_weights,
        }
    }

    /// Deformed positions and normals for the current bone poses.
    pub fn deformed(&self, world_transforms: &[Mat4]) -> Result<(Vec<Vec3>, Vec<Vec3>)> {
        let matrices = self.skin.bone_matrices(world_transforms)?;
        Ok(self
            .skin
            .deform(&self.mesh.positions, &self.mesh.normals, &matrices))
    }

    /// Every bone must name a node already in a graph of `node_count` nodes.
    pub(crate) fn check_bones(&self, node_count: usize) -> Result<()> {
        match self.skin.bones().iter().find(|b| b.node.index() >= node_count) {
            Some(bone) => Err(SceneError::UnknownNode(bone.node.index())),
            None => Ok(()),
        }
    }

    fn submit(&self, label: &str, world_transforms: &[Mat4], sink: &mut dyn MeshSink) -> Result<()> {
        let tex_coords = (!self.mesh.tex_coords.is_empty()).then_some(self.mesh.tex_coords.as_slice());

        match self.mode {
            SkinningMode::Cpu => {
                let (positions, normals) = self.deformed(world_transforms)?;
                let uniforms = ShaderUniforms::Textured(self.light);
                sink.submit(&MeshSubmission {
                    label,
                    model: Mat4::IDENTITY,
                    attributes: VertexAttributes {
                        positions: &positions,
                        normals: (!normals.is_empty()).then_some(normals.as_slice()),
                        tex_coords,
                        bone_ids: None,
                        bone_weights: None,
                    },
                    indices: &self.mesh.indices,
                    uniforms: &uniforms,
                    textures: &self.textures,
                })
            }
            SkinningMode::Gpu => {
                let uniforms = ShaderUniforms::Skinned {
                    light: self.light,
                    bone_matrices: self.skin.bone_matrices(world_transforms)?,
                };
                let mut attributes = self.mesh.attributes();
                attributes.bone_ids = Some(&self.bone_ids);
                attributes.bone_weights = Some(&self.bone_weights);
                sink.submit(&MeshSubmission {
                    label,
                    model: Mat4::IDENTITY,
                    attributes,
                    indices: &self.mesh.indices,
                    uniforms: &uniforms,
                    textures: &self.textures,
                })
            }
        }
    }
}

/// Node payload.
#[derive(Clone, Debug)]
pub enum Drawable {
    /// Lit mesh with no texture.
    Static { mesh: Arc<Mesh>, light: LightUniforms },
    /// Lit mesh with textures in unit order.
    Textured {
        mesh: Arc<Mesh>,
        light: LightUniforms,
        textures: Vec<TextureBinding>,
    },
    Skinned(SkinnedDrawable),
    /// Cube-mapped background.
    Skybox { mesh: Arc<Mesh>, cube_map: TextureBinding },
}

impl Drawable {
    pub fn textured(mesh: Arc<Mesh>, light: LightUniforms, texture: TextureHandle) -> Self {
        Drawable::Textured {
            mesh,
            light,
            textures: vec![TextureBinding::diffuse(texture)],
        }
    }

    pub fn skybox(mesh: Arc<Mesh>, cube_map: TextureHandle) -> Self {
        Drawable::Skybox {
            mesh,
            cube_map: TextureBinding::cube_map(cube_map),
        }
    }

    /// Bind-pose mesh.
    pub fn mesh(&self) -> &Mesh {
        match self {
            Drawable::Static { mesh, .. }
            | Drawable::Textured { mesh, .. }
            | Drawable::Skybox { mesh, .. } => mesh,
            Drawable::Skinned(skinned) => &skinned.mesh,
        }
    }

    /// Submit with the node's world transform. Skinned payloads read their
    /// bones from `world_transforms` instead.
    pub fn submit(
        &self,
        label: &str,
        model: Mat4,
        world_transforms: &[Mat4],
        sink: &mut dyn MeshSink,
    ) -> Result<()> {
        match self {
            Drawable::Static { mesh, light } => {
                let uniforms = ShaderUniforms::Lit(*light);
                sink.submit(&MeshSubmission {
                    label,
                    model,
                    attributes: mesh.attributes(),
                    indices: &mesh.indices,
                    uniforms: &uniforms,
                    textures: &[],
                })
            }
            Drawable::Textured {
                mesh,
                light,
                textures,
            } => {
                let uniforms = ShaderUniforms::Textured(*light);
                sink.submit(&MeshSubmission {
                    label,
                    model,
                    attributes: mesh.attributes(),
                    indices: &mesh.indices,
                    uniforms: &uniforms,
                    textures,
                })
            }
            Drawable::Skinned(skinned) => skinned.submit(label, world_transforms, sink),
            Drawable::Skybox { mesh, cube_map } => sink.submit(&MeshSubmission {
                label,
                model,
                attributes: mesh.attributes(),
                indices: &mesh.indices,
                uniforms: &ShaderUniforms::Skybox,
                textures: std::slice::from_ref(cube_map),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{BoneBinding, VertexInfluence};
    use crate::render::RecordingSink;
    use crate::scene::NodeId;

    fn lifted_bone(mode: SkinningMode) -> SkinnedDrawable {
        let mesh = Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            normals: vec![Vec3::Y; 3],
            tex_coords: vec![],
            indices: vec![0, 1, 2],
        };
        let bones = vec![BoneBinding {
            node: NodeId::from_index(1),
            offset: Mat4::IDENTITY,
        }];
        let influences = vec![VertexInfluence::single(0); 3];
        let skin = Skin::new(bones, influences, 3).unwrap();
        SkinnedDrawable::new(Arc::new(mesh), skin, LightUniforms::default(), vec![], mode)
    }

    #[test]
    fn test_deformed_follows_bone_world() {
        let skinned = lifted_bone(SkinningMode::Cpu);
        let worlds = [Mat4::IDENTITY, Mat4::from_translation(Vec3::Y)];
        let (positions, normals) = skinned.deformed(&worlds).unwrap();
        assert_eq!(positions, vec![Vec3::Y, Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0)]);
        assert_eq!(normals, vec![Vec3::Y; 3]);
    }

    #[test]
    fn test_cpu_submission_matches_deformed() {
        let skinned = lifted_bone(SkinningMode::Cpu);
        let worlds = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0))];
        let mut sink = RecordingSink::new();
        skinned.submit("bent", &worlds, &mut sink).unwrap();
        let recorded = sink.find("bent").unwrap();
        assert_eq!(recorded.positions, skinned.deformed(&worlds).unwrap().0);
    }

    #[test]
    fn test_deformed_with_missing_bone_node() {
        let skinned = lifted_bone(SkinningMode::Gpu);
        let err = skinned.deformed(&[Mat4::IDENTITY]).unwrap_err();
        assert!(matches!(err, SceneError::UnknownNode(1)));
        assert!(skinned.check_bones(1).is_err());
        assert!(skinned.check_bones(2).is_ok());
    }
}
