//! Terrain Tests - Heightfield, Lakes, Normals and Scatter
//!
//! Lake invariants over many seeds, the connected full-chance lake, normal
//! synthesis laws and scatter rejection.

use std::collections::{HashSet, VecDeque};

use glam::{Vec2, Vec3};
use lake_forest_engine::mesh::{Mesh, compute_vertex_normals};
use lake_forest_engine::world::{
    GridCell, Heightfield, LakeConfig, LakeRegion, LakeTerrain, TerrainConfig, Winding,
    build_terrain_mesh, scatter_on_grass, terrain_indices,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn is_connected(cells: &[GridCell]) -> bool {
    let set: HashSet<GridCell> = cells.iter().copied().collect();
    let Some(&start) = cells.first() else {
        return true;
    };
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for n in cell.neighbors() {
            if set.contains(&n) && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen.len() == set.len()
}

// ============================================================================
// Lake Carving
// ============================================================================

#[test]
fn test_full_chance_lake_on_10x10() {
    let mut rng = StdRng::seed_from_u64(42);
    let lake = LakeRegion::grow(10, 10, Some(GridCell::new(5, 5)), 100, &mut rng).unwrap();

    assert!(lake.contains(GridCell::new(5, 5)));
    assert!(is_connected(lake.claimed()));
    for cell in lake.claimed() {
        assert!((1..=8).contains(&cell.row), "{cell:?}");
        assert!((1..=8).contains(&cell.col), "{cell:?}");
    }
    // Every interior cell is reachable at 100%.
    assert_eq!(lake.claimed().len(), 64);
}

#[test]
fn test_claimed_cells_are_unique() {
    let mut rng = StdRng::seed_from_u64(3);
    let lake = LakeRegion::grow(40, 40, None, 60, &mut rng).unwrap();
    let unique: HashSet<_> = lake.claimed().iter().collect();
    assert_eq!(unique.len(), lake.claimed().len());
}

#[test]
fn test_shore_is_claimed_plus_neighbors() {
    let mut rng = StdRng::seed_from_u64(4);
    let lake = LakeRegion::grow(20, 20, Some(GridCell::new(10, 10)), 50, &mut rng).unwrap();
    let shore: HashSet<_> = lake.shore().iter().copied().collect();
    let mut expected = HashSet::new();
    for cell in lake.claimed() {
        expected.insert(*cell);
        expected.extend(cell.neighbors());
    }
    assert_eq!(shore, expected);
    assert_eq!(shore.len(), lake.shore().len());
}

#[test]
fn test_lakes_lower_terrain_mesh() {
    let mut rng = StdRng::seed_from_u64(5);
    let config = TerrainConfig {
        rows: 20,
        cols: 20,
        ..Default::default()
    };
    let mut terrain = LakeTerrain::new(Heightfield::flat(20, 20, 0.5).unwrap(), config);
    let lakes = LakeConfig::default();
    let claimed = terrain
        .carve_lake(Some(GridCell::new(10, 10)), &lakes, &mut rng)
        .unwrap()
        .claimed()
        .to_vec();

    let mesh = terrain.rebuild().unwrap();
    for cell in claimed {
        let y = mesh.mesh.positions[mesh.vertex_of_cell(cell)].y;
        assert!((y - (0.5 - 4.0) * 0.8).abs() < 1e-5);
    }
    assert_eq!(mesh.mesh.positions[0].y, 0.4);
}

#[test]
fn test_generate_carves_configured_lake_count() {
    let mut rng = StdRng::seed_from_u64(6);
    let config = TerrainConfig {
        rows: 25,
        cols: 25,
        ..Default::default()
    };
    let lakes = LakeConfig {
        count: 3,
        ..Default::default()
    };
    let terrain = LakeTerrain::generate(&config, &lakes, &mut rng).unwrap();
    assert_eq!(terrain.lakes().len(), 3);
    assert_eq!(terrain.water_planes(0.4).len(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_lake_invariants(
        seed in any::<u64>(),
        rows in 3usize..30,
        cols in 3usize..30,
        chance in 0u32..=100,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let lake = LakeRegion::grow(rows, cols, None, chance, &mut rng).unwrap();

        prop_assert!(!lake.claimed().is_empty());
        for cell in lake.claimed() {
            prop_assert!(cell.is_interior(rows, cols));
        }
        prop_assert!(is_connected(lake.claimed()));

        let extents = lake.extents();
        prop_assert!(extents.min_row <= extents.max_row);
        prop_assert!(extents.min_col <= extents.max_col);
        prop_assert!(extents.max_row < rows && extents.max_col < cols);

        let plane = lake.water_plane(Vec3::ZERO, 0.4);
        prop_assert!(plane.length >= 0.0 && plane.width >= 0.0);
    }

    #[test]
    fn test_scatter_never_lands_on_lakes(seed in any::<u64>(), chance in 0u32..=100) {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = TerrainConfig { rows: 15, cols: 15, ..Default::default() };
        let lakes = LakeConfig { count: 2, expand_chance: chance, ..Default::default() };
        let terrain = LakeTerrain::generate(&config, &lakes, &mut rng).unwrap();
        let mesh = terrain.rebuild().unwrap();

        for point in scatter_on_grass(&mesh, terrain.lakes(), 20, &mut rng) {
            prop_assert!(!terrain.is_on_lake(point.cell));
            prop_assert_eq!(point.position, mesh.mesh.positions[point.vertex]);
        }
    }
}

// ============================================================================
// Normals
// ============================================================================

#[test]
fn test_single_triangle_normal() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    let normals = compute_vertex_normals(&positions, &[0, 1, 2]).unwrap();
    assert_eq!(normals, vec![Vec3::Z; 3]);
}

#[test]
fn test_normals_idempotent_on_terrain() {
    let mut rng = StdRng::seed_from_u64(8);
    let hf = Heightfield::random(12, 9, 0.0..1.0, &mut rng).unwrap();
    let mesh = build_terrain_mesh(&hf, &TerrainConfig::default()).unwrap().mesh;
    let again = compute_vertex_normals(&mesh.positions, &mesh.indices).unwrap();
    assert_eq!(mesh.normals, again);
    assert!(again.iter().all(|n| n.is_finite() && (n.length() - 1.0).abs() < 1e-5));
}

#[test]
fn test_isolated_vertex_gets_finite_normal() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(5.0, 5.0, 5.0)];
    let normals = compute_vertex_normals(&positions, &[0, 1, 2]).unwrap();
    assert!(normals[3].is_finite());
    assert!((normals[3].length() - 1.0).abs() < 1e-5);
}

#[test]
fn test_bad_indices_rejected() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    assert!(compute_vertex_normals(&positions, &[0, 1]).is_err());
    assert!(compute_vertex_normals(&positions, &[0, 1, 3]).is_err());
}

#[test]
fn test_rolling_terrain_faces_up() {
    let mut rng = StdRng::seed_from_u64(9);
    let hf = Heightfield::random(10, 10, 0.0..1.0, &mut rng).unwrap();
    let mesh = build_terrain_mesh(&hf, &TerrainConfig::default()).unwrap().mesh;
    assert!(mesh.normals.iter().all(|n| n.y > 0.0));
}

// ============================================================================
// Triangulation
// ============================================================================

#[test]
fn test_triangulation_never_wraps_rows() {
    let cols = 7;
    let indices = terrain_indices(5, cols, Winding::UpFacing);
    for tri in indices.chunks(3) {
        let cols_hit: Vec<usize> = tri.iter().map(|&i| i as usize % cols).collect();
        let spread = cols_hit.iter().max().unwrap() - cols_hit.iter().min().unwrap();
        assert!(spread <= 1, "{tri:?}");
    }
}

#[test]
fn test_mesh_with_computed_normals_matches_free_function() {
    let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0)];
    let indices = vec![0, 2, 1, 1, 2, 3];
    let mesh = Mesh::with_computed_normals(positions.clone(), vec![Vec2::ZERO; 4], indices.clone())
        .unwrap();
    assert_eq!(mesh.normals, compute_vertex_normals(&positions, &indices).unwrap());
    assert!(mesh.normals.iter().all(|n| n.abs_diff_eq(Vec3::Y, 1e-6)));
}
