//! Lake Carving
//!
//! Randomized region growth on the terrain grid. A FIFO flood fill seeded at
//! the lake center admits each interior neighbor with a fixed percentage
//! chance; every admission also claims that neighbor's own neighbors when
//! they already touch the lake, which rounds off single-cell notches.
//! Claimed cells are lowered and the shore extents size the water plane.

use std::collections::{HashSet, VecDeque};

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::terrain::{GridCell, Heightfield, TerrainConfig, TerrainMesh, build_terrain_mesh};
use crate::error::{Result, SceneError};

/// Lake carving parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LakeConfig {
    /// Lakes carved per terrain.
    pub count: usize,
    /// Elevation removed from every claimed cell.
    pub depth: f32,
    /// Percent chance (0..=100) that a candidate neighbor joins the lake.
    pub expand_chance: u32,
    /// Added to both water plane dimensions.
    pub water_margin: f32,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            count: 2,
            depth: 4.0,
            expand_chance: 50,
            water_margin: 0.4,
        }
    }
}

/// Inclusive bounding box in grid space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LakeExtents {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl LakeExtents {
    fn around(cell: GridCell) -> Self {
        Self {
            min_row: cell.row,
            max_row: cell.row,
            min_col: cell.col,
            max_col: cell.col,
        }
    }

    fn include(&mut self, cell: GridCell) {
        self.min_row = self.min_row.min(cell.row);
        self.max_row = self.max_row.max(cell.row);
        self.min_col = self.min_col.min(cell.col);
        self.max_col = self.max_col.max(cell.col);
    }

    /// Extents shifted into terrain vertex space: `(min_x, max_x, min_z, max_z)`.
    pub fn centered(&self, rows: usize, cols: usize) -> (f32, f32, f32, f32) {
        let half_rows = rows as f32 / 2.0;
        let half_cols = cols as f32 / 2.0;
        (
            self.min_row as f32 - half_rows,
            self.max_row as f32 - half_rows,
            self.min_col as f32 - half_cols,
            self.max_col as f32 - half_cols,
        )
    }
}

/// Flat rectangle covering a lake, in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterPlane {
    pub center: Vec3,
    /// Size along X.
    pub length: f32,
    /// Size along Z.
    pub width: f32,
}

impl WaterPlane {
    pub fn is_empty(&self) -> bool {
        self.length <= 0.0 || self.width <= 0.0
    }
}

/// One carved lake.
#[derive(Clone, Debug)]
pub struct LakeRegion {
    center: GridCell,
    rows: usize,
    cols: usize,
    /// Claimed cells in claim order.
    claimed: Vec<GridCell>,
    claimed_set: HashSet<GridCell>,
    shore: Vec<GridCell>,
    extents: LakeExtents,
}

impl LakeRegion {
    /// Grow a lake on a `rows x cols` grid.
    ///
    /// `center` must be strictly interior; `None` picks a random interior
    /// cell. Grids smaller than 3x3 have no interior and are rejected.
    pub fn grow<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        center: Option<GridCell>,
        expand_chance: u32,
        rng: &mut R,
    ) -> Result<Self> {
        if rows < 3 || cols < 3 {
            return Err(SceneError::InvalidGrid {
                rows,
                cols,
                reason: "a lake needs at least one interior cell".into(),
            });
        }
        let center = match center {
            Some(cell) if cell.is_interior(rows, cols) => cell,
            Some(cell) => {
                return Err(SceneError::LakeCenterOutOfBounds {
                    row: cell.row,
                    col: cell.col,
                    rows,
                    cols,
                });
            }
            None => GridCell::new(rng.random_range(1..rows - 1), rng.random_range(1..cols - 1)),
        };

        let mut claimed = Vec::new();
        let mut claimed_set = HashSet::new();
        let mut queue = VecDeque::from([center]);
        let mut queued = HashSet::from([center]);

        while let Some(cell) = queue.pop_front() {
            queued.remove(&cell);

            for candidate in cell.neighbors() {
                if claimed_set.contains(&candidate)
                    || queued.contains(&candidate)
                    || !candidate.is_interior(rows, cols)
                {
                    continue;
                }
                if rng.random_range(0..100) >= expand_chance {
                    continue;
                }
                queue.push_back(candidate);
                queued.insert(candidate);

                // Smoothing: fill cells that already touch the lake.
                for extra in candidate.neighbors() {
                    if !extra.is_interior(rows, cols) || claimed_set.contains(&extra) {
                        continue;
                    }
                    if extra.neighbors().any(|n| claimed_set.contains(&n)) {
                        claimed_set.insert(extra);
                        claimed.push(extra);
                    }
                }
            }

            if claimed_set.insert(cell) {
                claimed.push(cell);
            }
        }

        let mut shore = Vec::with_capacity(claimed.len() * 2);
        let mut shore_set = HashSet::new();
        for cell in &claimed {
            for shore_cell in std::iter::once(*cell).chain(cell.neighbors()) {
                if shore_set.insert(shore_cell) {
                    shore.push(shore_cell);
                }
            }
        }

        let mut extents = LakeExtents::around(center);
        for cell in &shore {
            extents.include(*cell);
        }

        log::debug!(
            "lake at ({}, {}): {} cells claimed, {} shore cells",
            center.row,
            center.col,
            claimed.len(),
            shore.len()
        );

        Ok(Self {
            center,
            rows,
            cols,
            claimed,
            claimed_set,
            shore,
            extents,
        })
    }

    pub fn center(&self) -> GridCell {
        self.center
    }

    pub fn claimed(&self) -> &[GridCell] {
        &self.claimed
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.claimed_set.contains(&cell)
    }

    /// Claimed cells plus their 4-neighbors, deduplicated.
    pub fn shore(&self) -> &[GridCell] {
        &self.shore
    }

    pub fn extents(&self) -> LakeExtents {
        self.extents
    }

    /// At most one claimed cell: no meaningful water surface.
    pub fn is_degenerate(&self) -> bool {
        self.claimed.len() <= 1
    }

    /// Water surface over the shore extents, at the terrain's base height.
    /// Degenerate lakes get a zero-area plane at their center.
    pub fn water_plane(&self, position: Vec3, margin: f32) -> WaterPlane {
        let (min_x, max_x, min_z, max_z) = self.extents.centered(self.rows, self.cols);
        let center = Vec3::new(
            min_x + (max_x - min_x) / 2.0,
            0.0,
            min_z + (max_z - min_z) / 2.0,
        ) + position;

        if self.is_degenerate() {
            log::warn!(
                "lake at ({}, {}) claimed {} cell(s); water plane left empty",
                self.center.row,
                self.center.col,
                self.claimed.len()
            );
            return WaterPlane {
                center,
                length: 0.0,
                width: 0.0,
            };
        }

        WaterPlane {
            center,
            length: (max_x - min_x) + margin,
            width: (max_z - min_z) + margin,
        }
    }
}

/// A heightfield together with the lakes carved into it.
#[derive(Clone, Debug)]
pub struct LakeTerrain {
    heightfield: Heightfield,
    config: TerrainConfig,
    lakes: Vec<LakeRegion>,
}

impl LakeTerrain {
    pub fn new(heightfield: Heightfield, config: TerrainConfig) -> Self {
        Self {
            heightfield,
            config,
            lakes: Vec::new(),
        }
    }

    /// Random heightfield from `config` with `lakes.count` random lakes.
    pub fn generate<R: Rng + ?Sized>(
        config: &TerrainConfig,
        lakes: &LakeConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let heightfield = Heightfield::random(config.rows, config.cols, config.elevation_range(), rng)?;
        let mut terrain = Self::new(heightfield, config.clone());
        for _ in 0..lakes.count {
            terrain.carve_lake(None, lakes, rng)?;
        }
        log::info!(
            "terrain {}x{} with {} lake(s)",
            config.rows,
            config.cols,
            terrain.lakes.len()
        );
        Ok(terrain)
    }

    /// Grow a lake and lower its claimed cells by `lakes.depth`.
    pub fn carve_lake<R: Rng + ?Sized>(
        &mut self,
        center: Option<GridCell>,
        lakes: &LakeConfig,
        rng: &mut R,
    ) -> Result<&LakeRegion> {
        let region = LakeRegion::grow(
            self.heightfield.rows(),
            self.heightfield.cols(),
            center,
            lakes.expand_chance,
            rng,
        )?;
        for cell in region.claimed() {
            self.heightfield.lower(*cell, lakes.depth);
        }
        self.lakes.push(region);
        let idx = self.lakes.len() - 1;
        Ok(&self.lakes[idx])
    }

    /// Fresh mesh snapshot of the current elevations.
    pub fn rebuild(&self) -> Result<TerrainMesh> {
        build_terrain_mesh(&self.heightfield, &self.config)
    }

    pub fn is_on_lake(&self, cell: GridCell) -> bool {
        self.lakes.iter().any(|lake| lake.contains(cell))
    }

    pub fn lakes(&self) -> &[LakeRegion] {
        &self.lakes
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn water_planes(&self, margin: f32) -> Vec<WaterPlane> {
        self.lakes
            .iter()
            .map(|lake| lake.water_plane(self.config.position, margin))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_chance_claims_only_center() {
        let mut rng = StdRng::seed_from_u64(1);
        let lake = LakeRegion::grow(10, 10, Some(GridCell::new(4, 6)), 0, &mut rng).unwrap();
        assert_eq!(lake.claimed(), &[GridCell::new(4, 6)]);
        assert!(lake.is_degenerate());
        assert_eq!(lake.shore().len(), 5);

        let plane = lake.water_plane(Vec3::ZERO, 0.4);
        assert!(plane.is_empty());
        assert_eq!(plane.center, Vec3::new(-1.0, 0.0, 1.0));
    }

    #[test]
    fn test_full_chance_fills_interior() {
        let mut rng = StdRng::seed_from_u64(2);
        let lake = LakeRegion::grow(6, 7, Some(GridCell::new(2, 3)), 100, &mut rng).unwrap();
        assert_eq!(lake.claimed().len(), 4 * 5);
        let extents = lake.extents();
        assert_eq!((extents.min_row, extents.max_row), (0, 5));
        assert_eq!((extents.min_col, extents.max_col), (0, 6));
    }

    #[test]
    fn test_center_on_boundary_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = LakeRegion::grow(10, 10, Some(GridCell::new(0, 5)), 50, &mut rng).unwrap_err();
        assert!(matches!(err, SceneError::LakeCenterOutOfBounds { row: 0, col: 5, .. }));
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = LakeRegion::grow(2, 10, None, 50, &mut rng).unwrap_err();
        assert!(matches!(err, SceneError::InvalidGrid { .. }));
    }

    #[test]
    fn test_carve_lowers_claimed_cells() {
        let mut rng = StdRng::seed_from_u64(5);
        let hf = Heightfield::flat(8, 8, 1.0).unwrap();
        let mut terrain = LakeTerrain::new(hf, TerrainConfig::default());
        let config = LakeConfig {
            depth: 3.0,
            ..Default::default()
        };
        let claimed = terrain
            .carve_lake(Some(GridCell::new(4, 4)), &config, &mut rng)
            .unwrap()
            .claimed()
            .to_vec();

        for row in 0..8 {
            for col in 0..8 {
                let cell = GridCell::new(row, col);
                let expected = if claimed.contains(&cell) { -2.0 } else { 1.0 };
                assert_eq!(terrain.heightfield().get(cell), Some(expected));
                assert_eq!(terrain.is_on_lake(cell), claimed.contains(&cell));
            }
        }
    }

    #[test]
    fn test_water_plane_size() {
        let mut rng = StdRng::seed_from_u64(6);
        let lake = LakeRegion::grow(6, 6, Some(GridCell::new(2, 2)), 100, &mut rng).unwrap();
        let plane = lake.water_plane(Vec3::new(0.0, 2.0, 0.0), 0.4);
        // Shore spans the full 6x6 grid: x and z in [-3, 2].
        assert!((plane.length - 5.4).abs() < 1e-5);
        assert!((plane.width - 5.4).abs() < 1e-5);
        assert_eq!(plane.center, Vec3::new(-0.5, 2.0, -0.5));
    }
}
