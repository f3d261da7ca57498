//! Lake Forest Scene
//!
//! Terrain with carved lakes, one drifting water plane per lake and trees
//! on grass points, plus the skybox, landmark, circling prop and reed.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SceneAssets;
use super::props::{add_circling_prop, add_landmark, add_swaying_reed};
use super::skybox::add_skybox;
use super::trees::add_tree;
use super::water::add_water_plane;
use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::scene::{Drawable, NodeId, SceneGraph, SceneNode};
use crate::world::{GridCell, LakeTerrain, TerrainMesh, scatter_on_grass};

/// The assembled scene and the terrain state behind it.
#[derive(Debug)]
pub struct LakeForest {
    pub graph: SceneGraph,
    pub terrain: LakeTerrain,
    /// Snapshot currently attached to the terrain node.
    pub terrain_mesh: Arc<TerrainMesh>,
    pub assets: SceneAssets,
    pub forest_node: NodeId,
    pub terrain_node: NodeId,
    pub water_nodes: Vec<NodeId>,
    pub tree_nodes: Vec<NodeId>,
    water_margin: f32,
}

impl LakeForest {
    /// Carve another lake, swap in a rebuilt terrain snapshot and add its
    /// water plane.
    pub fn add_lake<R: Rng + ?Sized>(
        &mut self,
        center: Option<GridCell>,
        config: &SceneConfig,
        rng: &mut R,
    ) -> Result<NodeId> {
        let plane = self
            .terrain
            .carve_lake(center, &config.lakes, rng)?
            .water_plane(config.terrain.position, self.water_margin);

        let snapshot = Arc::new(self.terrain.rebuild()?);
        let node = self
            .graph
            .node_mut(self.terrain_node)
            .ok_or(SceneError::UnknownNode(self.terrain_node.index()))?;
        node.drawable = Some(Drawable::textured(
            Arc::new(snapshot.mesh.clone()),
            self.assets.light,
            self.assets.grass.clone(),
        ));
        self.terrain_mesh = snapshot;

        let name = format!("water{}", self.water_nodes.len());
        let water = add_water_plane(&mut self.graph, self.forest_node, &name, &plane, &self.assets)?;
        self.water_nodes.push(water);
        Ok(water)
    }
}

/// Build the scene from `config.seed`.
pub fn build_lake_forest(config: &SceneConfig) -> Result<LakeForest> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    build_lake_forest_with_rng(config, &mut rng)
}

pub fn build_lake_forest_with_rng<R: Rng + ?Sized>(
    config: &SceneConfig,
    rng: &mut R,
) -> Result<LakeForest> {
    let assets = SceneAssets::new(&config.textures, config.lighting.light);
    let mut graph = SceneGraph::new();

    add_skybox(&mut graph, &assets);
    add_landmark(&mut graph, &config.props, &assets)?;
    add_circling_prop(&mut graph, &config.props, &assets)?;
    add_swaying_reed(&mut graph, config.reed_position, config.skinning, &assets)?;

    let forest_node = graph.add_root(SceneNode::new("lake_forest"));
    let terrain = LakeTerrain::generate(&config.terrain, &config.lakes, rng)?;
    let terrain_mesh = Arc::new(terrain.rebuild()?);
    let terrain_node = graph.add_child(
        forest_node,
        SceneNode::new("terrain").with_drawable(Drawable::textured(
            Arc::new(terrain_mesh.mesh.clone()),
            assets.light,
            assets.grass.clone(),
        )),
    )?;

    let mut water_nodes = Vec::new();
    for (i, plane) in terrain
        .water_planes(config.lakes.water_margin)
        .iter()
        .enumerate()
    {
        water_nodes.push(add_water_plane(
            &mut graph,
            forest_node,
            &format!("water{i}"),
            plane,
            &assets,
        )?);
    }

    let (rows, cols) = (config.terrain.rows, config.terrain.cols);
    let tree_budget = rng.random_range(0..=(rows / 10) * (cols / 10));
    let tree_count = config.forest.max_trees.min(tree_budget);
    let spots = scatter_on_grass(&terrain_mesh, terrain.lakes(), tree_count, rng);

    let mut tree_nodes = Vec::with_capacity(spots.len());
    for (i, spot) in spots.iter().enumerate() {
        let tree = add_tree(
            &mut graph,
            forest_node,
            &format!("tree{i}"),
            spot.position,
            &config.forest,
            &assets,
            rng,
        )?;
        tree_nodes.push(tree.node);
    }

    log::info!(
        "lake forest: {} nodes, {} lake(s), {} tree(s)",
        graph.len(),
        terrain.lakes().len(),
        tree_nodes.len()
    );

    Ok(LakeForest {
        graph,
        terrain,
        terrain_mesh,
        assets,
        forest_node,
        terrain_node,
        water_nodes,
        tree_nodes,
        water_margin: config.lakes.water_margin,
    })
}
