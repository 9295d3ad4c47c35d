//! A drawable model with its own motion scheduler.

use std::path::Path;

use nalgebra::Matrix4;

use crate::assets::{self, AssetResult};
use crate::geometry::Mesh;
use crate::motion::TransformScheduler;

/// Sub-meshes loaded once at construction, plus the scheduler that moves
/// them.
#[derive(Debug, Clone)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub scheduler: TransformScheduler,
}

impl Model {
    /// Wrap already-built meshes.
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            scheduler: TransformScheduler::new(),
        }
    }

    /// Load a model file. On failure no model is created.
    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        let meshes = assets::load_meshes(path.as_ref())?;
        Ok(Self::new(meshes))
    }

    /// Model matrix for the frame at `now` seconds.
    pub fn transform(&mut self, now: f32) -> Matrix4<f32> {
        self.scheduler.evaluate(now)
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles.len()).sum()
    }
}
