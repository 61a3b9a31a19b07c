//! Walkable surface: интерфейс mesh query + детерминированная grid реализация.
//!
//! Реальный host подставляет свой navmesh (engine side) через `NavMeshQuery`.
//! Ядро видит только два примитива: snap-to-surface и compute-route.

use bevy::prelude::*;
use std::sync::Arc;

use crate::error::MeshQueryError;

pub mod grid;


pub use grid::GridNavMesh;

/// Статус ответа compute-route (как у engine navmesh).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Complete,
    /// Путь обрывается у ближайшей достижимой точки
    Partial,
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshPath {
    pub status: PathStatus,
    pub corners: Vec<Vec3>,
}

impl MeshPath {
    pub fn invalid() -> Self {
        Self {
            status: PathStatus::Invalid,
            corners: Vec::new(),
        }
    }

    /// Сумма расстояний между соседними corners (< 2 corners → 0).
    pub fn length(&self) -> f32 {
        path_length(&self.corners)
    }
}

pub fn path_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

pub trait NavMeshQuery: Send + Sync {
    /// Ближайшая точка walkable surface в радиусе `max_distance`.
    fn sample_position(&self, position: Vec3, max_distance: f32) -> Result<Option<Vec3>, MeshQueryError>;

    fn calculate_path(&self, from: Vec3, to: Vec3) -> Result<MeshPath, MeshQueryError>;
}

/// Shared handle на mesh (клонируется в background route tasks).
#[derive(Resource, Clone)]
pub struct SharedNavMesh(pub Arc<dyn NavMeshQuery>);

impl SharedNavMesh {
    pub fn new(mesh: impl NavMeshQuery + 'static) -> Self {
        Self(Arc::new(mesh))
    }
}
