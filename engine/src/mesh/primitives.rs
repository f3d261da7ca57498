//! Procedural Primitives
//!
//! Sphere, capped cylinder, plane, leaf quad and skybox cube. Shapes with
//! lighting get their normals from [`compute_vertex_normals`], so shared
//! rim vertices are smoothed across faces.
//!
//! [`compute_vertex_normals`]: super::compute_vertex_normals

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};

use super::Mesh;
use crate::error::Result;

/// UV sphere resolution and placement.
#[derive(Clone, Copy, Debug)]
pub struct SphereParams {
    pub center: Vec3,
    pub radius: f32,
    pub stacks: u32,
    pub sectors: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
            stacks: 10,
            sectors: 10,
        }
    }
}

/// Capped cylinder standing on the Y axis, centered on `center`.
#[derive(Clone, Copy, Debug)]
pub struct CylinderParams {
    pub center: Vec3,
    pub height: f32,
    pub radius: f32,
    pub divisions: u32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            height: 1.0,
            radius: 0.5,
            divisions: 50,
        }
    }
}

/// UV sphere. Texture coordinates run `(stack / stacks, sector / sectors)`.
pub fn textured_sphere(params: &SphereParams) -> Result<Mesh> {
    let stacks = params.stacks.max(2);
    let sectors = params.sectors.max(3);
    let sector_step = TAU / sectors as f32;
    let stack_step = PI / stacks as f32;

    let mut positions = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    let mut tex_coords = Vec::with_capacity(positions.capacity());

    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let ring = params.radius * stack_angle.cos();
        let up = params.radius * stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let x = ring * sector_angle.cos();
            let z = ring * sector_angle.sin();
            positions.push(Vec3::new(x, up, z) + params.center);
            tex_coords.push(Vec2::new(i as f32 / stacks as f32, j as f32 / sectors as f32));
        }
    }

    let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);
    for i in 0..stacks {
        let mut k1 = i * (sectors + 1);
        let mut k2 = k1 + sectors + 1;
        for _ in 0..sectors {
            // The pole rows only get one triangle per sector.
            if i != 0 {
                indices.extend_from_slice(&[k1, k1 + 1, k2]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[k1 + 1, k2 + 1, k2]);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    Mesh::with_computed_normals(positions, tex_coords, indices)
}

/// Cylinder with top and bottom caps.
///
/// Vertex 0 is the top center, followed by the top ring; then the bottom
/// center and the bottom ring.
pub fn textured_cylinder(params: &CylinderParams) -> Result<Mesh> {
    let d = params.divisions.max(3);
    let half = params.height / 2.0;

    let mut positions = Vec::with_capacity((2 * d + 2) as usize);
    let mut tex_coords = Vec::with_capacity((2 * d + 2) as usize);

    for (y, v) in [(half, 0.0), (-half, 1.0)] {
        positions.push(Vec3::new(0.0, y, 0.0));
        tex_coords.push(if v == 0.0 { Vec2::ZERO } else { Vec2::ONE });
        for k in 0..d {
            let angle = k as f32 * TAU / d as f32;
            positions.push(Vec3::new(
                params.radius * angle.cos(),
                y,
                params.radius * angle.sin(),
            ));
            tex_coords.push(Vec2::new(k as f32 / d as f32, v));
        }
    }
    for p in &mut positions {
        *p += params.center;
    }

    let mut indices = Vec::with_capacity((d * 12) as usize);
    // Top cap
    for x in 1..d {
        indices.extend_from_slice(&[0, x + 1, x]);
    }
    indices.extend_from_slice(&[0, 1, d]);
    // Bottom cap
    for x in 1..d {
        indices.extend_from_slice(&[d + 1, d + x + 1, d + x + 2]);
    }
    indices.extend_from_slice(&[d + 1, 2 * d + 1, d + 2]);
    // Side
    for x in 1..d {
        indices.extend_from_slice(&[x, x + 1, d + x + 1, x + 1, d + x + 2, d + x + 1]);
    }
    indices.extend_from_slice(&[d, 1, 2 * d + 1, 1, d + 2, 2 * d + 1]);

    Mesh::with_computed_normals(positions, tex_coords, indices)
}

/// Flat `length x width` plane in XZ, facing +Y, centered on `center`.
pub fn textured_plane(center: Vec3, length: f32, width: f32) -> Result<Mesh> {
    let (hl, hw) = (length / 2.0, width / 2.0);
    let positions = vec![
        Vec3::new(-hl, 0.0, -hw) + center,
        Vec3::new(hl, 0.0, -hw) + center,
        Vec3::new(hl, 0.0, hw) + center,
        Vec3::new(-hl, 0.0, hw) + center,
    ];
    let tex_coords = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    Mesh::with_computed_normals(positions, tex_coords, vec![0, 2, 1, 0, 3, 2])
}

/// Unit quad in XY facing +Z, scaled by `scale`.
pub fn leaf_quad(scale: f32) -> Mesh {
    let positions = [
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
        Vec3::new(0.5, 0.5, 0.0),
    ]
    .into_iter()
    .map(|p| p * scale)
    .collect();

    Mesh {
        positions,
        normals: vec![Vec3::Z; 4],
        tex_coords: vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
        ],
        indices: vec![0, 1, 3, 0, 3, 2],
    }
}

/// Skybox cube: 36 unshared vertices, positions only.
pub fn skybox_cube() -> Mesh {
    const FACES: [[f32; 3]; 36] = [
        [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0],
        [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0],
    ];

    Mesh {
        positions: FACES.iter().map(|p| Vec3::from_array(*p)).collect(),
        normals: Vec::new(),
        tex_coords: Vec::new(),
        indices: (0..FACES.len() as u32).collect(),
    }
}
