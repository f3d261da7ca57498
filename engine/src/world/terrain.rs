//! Heightfield Terrain
//!
//! A regular grid of elevations turned into a triangle mesh. Vertex `(i, j)`
//! sits at `(i - rows/2, elevation * height_scale, j - cols/2) + position`
//! with checkerboard texture coordinates `(i mod 2, j mod 2)`.

use std::ops::Range;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::mesh::Mesh;

/// Triangle orientation of the generated grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winding {
    /// Counter-clockwise seen from above: synthesized normals point +Y.
    #[default]
    UpFacing,
    /// Mirrored winding: normals point -Y.
    DownFacing,
}

/// Terrain generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub rows: usize,
    pub cols: usize,
    /// Offset added to every vertex.
    pub position: Vec3,
    /// Multiplier from elevation to vertex height.
    pub height_scale: f32,
    /// Random elevations are drawn uniformly from this range.
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub winding: Winding,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            cols: 100,
            position: Vec3::ZERO,
            height_scale: 0.8,
            min_elevation: 0.0,
            max_elevation: 1.0,
            winding: Winding::UpFacing,
        }
    }
}

impl TerrainConfig {
    pub fn elevation_range(&self) -> Range<f32> {
        self.min_elevation..self.max_elevation
    }
}

/// Grid coordinate, `row` along X and `col` along Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The 4-connected neighbors that have non-negative coordinates, in
    /// the order `+row, -row, +col, -col`.
    pub fn neighbors(self) -> impl Iterator<Item = GridCell> {
        [
            Some(GridCell::new(self.row + 1, self.col)),
            self.row.checked_sub(1).map(|r| GridCell::new(r, self.col)),
            Some(GridCell::new(self.row, self.col + 1)),
            self.col.checked_sub(1).map(|c| GridCell::new(self.row, c)),
        ]
        .into_iter()
        .flatten()
    }

    pub fn in_bounds(self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// Not on the outermost ring of the grid.
    pub fn is_interior(self, rows: usize, cols: usize) -> bool {
        self.row >= 1 && self.col >= 1 && self.row + 1 < rows && self.col + 1 < cols
    }
}

/// Row-major grid of elevation samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    rows: usize,
    cols: usize,
    elevations: Vec<f32>,
}

impl Heightfield {
    /// Wrap a pre-supplied elevation field.
    pub fn new(rows: usize, cols: usize, elevations: Vec<f32>) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(SceneError::InvalidGrid {
                rows,
                cols,
                reason: "need at least 2 rows and 2 columns".into(),
            });
        }
        if elevations.len() != rows * cols {
            return Err(SceneError::InvalidGrid {
                rows,
                cols,
                reason: format!("{} elevations supplied", elevations.len()),
            });
        }
        Ok(Self {
            rows,
            cols,
            elevations,
        })
    }

    pub fn flat(rows: usize, cols: usize, elevation: f32) -> Result<Self> {
        Self::new(rows, cols, vec![elevation; rows * cols])
    }

    /// Uniform random elevations in `range`. An empty range yields a flat
    /// field at its start.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        range: Range<f32>,
        rng: &mut R,
    ) -> Result<Self> {
        let elevations = if range.is_empty() {
            vec![range.start; rows * cols]
        } else {
            (0..rows * cols)
                .map(|_| rng.random_range(range.clone()))
                .collect()
        };
        Self::new(rows, cols, elevations)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn elevations(&self) -> &[f32] {
        &self.elevations
    }

    pub fn index(&self, cell: GridCell) -> usize {
        cell.row * self.cols + cell.col
    }

    pub fn cell_of(&self, index: usize) -> GridCell {
        GridCell::new(index / self.cols, index % self.cols)
    }

    pub fn get(&self, cell: GridCell) -> Option<f32> {
        cell.in_bounds(self.rows, self.cols)
            .then(|| self.elevations[self.index(cell)])
    }

    /// Lower a cell by `depth`. Cells outside the grid are ignored.
    pub fn lower(&mut self, cell: GridCell, depth: f32) {
        if cell.in_bounds(self.rows, self.cols) {
            let idx = self.index(cell);
            self.elevations[idx] -= depth;
        }
    }
}

/// Immutable terrain mesh snapshot plus the grid shape it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    pub mesh: Mesh,
    pub rows: usize,
    pub cols: usize,
}

impl TerrainMesh {
    pub fn cell_of_vertex(&self, index: usize) -> GridCell {
        GridCell::new(index / self.cols, index % self.cols)
    }

    pub fn vertex_of_cell(&self, cell: GridCell) -> usize {
        cell.row * self.cols + cell.col
    }
}

/// Vertex positions, row-major.
pub fn terrain_positions(heightfield: &Heightfield, config: &TerrainConfig) -> Vec<Vec3> {
    let half_rows = heightfield.rows() as f32 / 2.0;
    let half_cols = heightfield.cols() as f32 / 2.0;
    heightfield
        .elevations()
        .iter()
        .enumerate()
        .map(|(k, h)| {
            let cell = heightfield.cell_of(k);
            Vec3::new(
                cell.row as f32 - half_rows,
                h * config.height_scale,
                cell.col as f32 - half_cols,
            ) + config.position
        })
        .collect()
}

/// Checkerboard texture coordinates.
pub fn terrain_tex_coords(rows: usize, cols: usize) -> Vec<Vec2> {
    (0..rows)
        .flat_map(|i| (0..cols).map(move |j| Vec2::new((i % 2) as f32, (j % 2) as f32)))
        .collect()
}

/// Two triangles per quad between row `i - 1` and row `i`.
///
/// For flattened index `k` the quad is `k, k + 1, k + 1 - cols, k - cols`;
/// the last column of every row is skipped so no triangle wraps across rows.
pub fn terrain_indices(rows: usize, cols: usize, winding: Winding) -> Vec<u32> {
    let mut indices = Vec::with_capacity(6 * rows.saturating_sub(1) * cols.saturating_sub(1));
    let n = rows * cols;
    if rows < 2 || cols < 2 {
        return indices;
    }

    for k in cols..n - 1 {
        if (k + 1) % cols == 0 {
            continue;
        }
        let (k, up, right, diag) = (k as u32, (k - cols) as u32, (k + 1) as u32, (k + 1 - cols) as u32);
        match winding {
            Winding::UpFacing => indices.extend_from_slice(&[k, diag, right, k, up, diag]),
            Winding::DownFacing => indices.extend_from_slice(&[k, right, diag, k, diag, up]),
        }
    }
    indices
}

/// Full mesh rebuild: positions, checkerboard UVs, indices and normals.
pub fn build_terrain_mesh(heightfield: &Heightfield, config: &TerrainConfig) -> Result<TerrainMesh> {
    let positions = terrain_positions(heightfield, config);
    let tex_coords = terrain_tex_coords(heightfield.rows(), heightfield.cols());
    let indices = terrain_indices(heightfield.rows(), heightfield.cols(), config.winding);
    let mesh = Mesh::with_computed_normals(positions, tex_coords, indices)?;
    log::debug!(
        "terrain mesh {}x{}: {} vertices, {} triangles",
        heightfield.rows(),
        heightfield.cols(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(TerrainMesh {
        mesh,
        rows: heightfield.rows(),
        cols: heightfield.cols(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_vertex_placement() {
        let hf = Heightfield::new(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let config = TerrainConfig {
            position: Vec3::new(10.0, 1.0, 0.0),
            height_scale: 0.5,
            ..Default::default()
        };
        let positions = terrain_positions(&hf, &config);
        // (1, 2) -> (1 - 1, 5 * 0.5, 2 - 1.5) + offset
        assert_eq!(positions[5], Vec3::new(10.0, 3.5, 0.5));
    }

    #[test]
    fn test_checkerboard_uvs() {
        let uvs = terrain_tex_coords(2, 2);
        assert_eq!(uvs, vec![Vec2::ZERO, Vec2::Y, Vec2::X, Vec2::ONE]);
    }

    #[test]
    fn test_index_count_and_range() {
        let indices = terrain_indices(4, 5, Winding::UpFacing);
        assert_eq!(indices.len(), 6 * 3 * 4);
        assert!(indices.iter().all(|&i| i < 20));
    }

    #[test]
    fn test_flat_terrain_normals_follow_winding() {
        let hf = Heightfield::flat(5, 5, 0.0).unwrap();
        let up = build_terrain_mesh(&hf, &TerrainConfig::default()).unwrap();
        assert!(up.mesh.normals.iter().all(|n| n.abs_diff_eq(Vec3::Y, 1e-6)));

        let config = TerrainConfig {
            winding: Winding::DownFacing,
            ..Default::default()
        };
        let down = build_terrain_mesh(&hf, &config).unwrap();
        assert!(down.mesh.normals.iter().all(|n| n.abs_diff_eq(-Vec3::Y, 1e-6)));
    }

    #[test]
    fn test_random_elevations_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let hf = Heightfield::random(8, 8, 0.0..1.0, &mut rng).unwrap();
        assert!(hf.elevations().iter().all(|h| (0.0..1.0).contains(h)));
    }

    #[test]
    fn test_rejects_wrong_elevation_count() {
        let err = Heightfield::new(3, 3, vec![0.0; 8]).unwrap_err();
        assert!(matches!(err, SceneError::InvalidGrid { .. }));
    }

    #[test]
    fn test_interior_cells() {
        assert!(GridCell::new(1, 1).is_interior(3, 3));
        assert!(!GridCell::new(0, 1).is_interior(3, 3));
        assert!(!GridCell::new(1, 2).is_interior(3, 3));
    }

    #[test]
    fn test_neighbors_skip_negative() {
        let n: Vec<_> = GridCell::new(0, 0).neighbors().collect();
        assert_eq!(n, vec![GridCell::new(1, 0), GridCell::new(0, 1)]);
    }
}
