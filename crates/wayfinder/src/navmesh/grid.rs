//! GridNavMesh — walkable surface из клеток фиксированного размера.
//!
//! Используется headless runner'ом и тестами вместо engine navmesh.
//! A* по 8 соседям, диагональ только если обе ортогональные клетки проходимы.

use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use super::{MeshPath, NavMeshQuery, PathStatus};
use crate::error::MeshQueryError;

/// Максимальный перепад высот между соседними клетками
const MAX_STEP_HEIGHT: f32 = 0.5;

/// Точка считается "на mesh" если она не дальше этого от пола по вертикали
const ON_MESH_TOLERANCE: f32 = 0.5;

type Cell = (usize, usize);

#[derive(Debug, Clone)]
pub struct GridNavMesh {
    origin: Vec3,
    cell_size: f32,
    width: usize,
    depth: usize,
    /// Высота пола клетки; None = непроходимо
    floors: Vec<Option<f32>>,
}

#[derive(Copy, Clone)]
struct OpenNode {
    cell: usize,
    f_cost: f32,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap — max-heap, разворачиваем для min f_cost
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for OpenNode {}

impl GridNavMesh {
    /// Плоская проходимая сетка `width × depth`, угол (0,0) в `origin`.
    pub fn new(origin: Vec3, width: usize, depth: usize, cell_size: f32) -> Self {
        Self {
            origin,
            cell_size: cell_size.max(0.01),
            width,
            depth,
            floors: vec![Some(origin.y); width * depth],
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Блокирует прямоугольник клеток включительно.
    pub fn block_rect(&mut self, min: Cell, max: Cell) -> &mut Self {
        for z in min.1..=max.1.min(self.depth.saturating_sub(1)) {
            for x in min.0..=max.0.min(self.width.saturating_sub(1)) {
                self.floors[z * self.width + x] = None;
            }
        }
        self
    }

    pub fn set_floor_height(&mut self, cell: Cell, height: f32) -> &mut Self {
        if cell.0 < self.width && cell.1 < self.depth {
            self.floors[cell.1 * self.width + cell.0] = Some(height);
        }
        self
    }

    pub fn cell_of(&self, position: Vec3) -> Option<Cell> {
        let local = (position - self.origin) / self.cell_size;
        if local.x < 0.0 || local.z < 0.0 {
            return None;
        }
        let cell = (local.x.floor() as usize, local.z.floor() as usize);
        (cell.0 < self.width && cell.1 < self.depth).then_some(cell)
    }

    fn index(&self, cell: Cell) -> usize {
        cell.1 * self.width + cell.0
    }

    fn cell_at(&self, index: usize) -> Cell {
        (index % self.width, index / self.width)
    }

    fn floor(&self, cell: Cell) -> Option<f32> {
        self.floors[self.index(cell)]
    }

    pub fn cell_center(&self, cell: Cell) -> Option<Vec3> {
        let floor = self.floor(cell)?;
        Some(Vec3::new(
            self.origin.x + (cell.0 as f32 + 0.5) * self.cell_size,
            floor,
            self.origin.z + (cell.1 as f32 + 0.5) * self.cell_size,
        ))
    }

    pub fn is_on_mesh(&self, position: Vec3) -> bool {
        self.cell_of(position)
            .and_then(|cell| self.floor(cell))
            .is_some_and(|floor| (position.y - floor).abs() <= ON_MESH_TOLERANCE)
    }

    fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Cell, f32)> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        let from_floor = self.floor(cell);
        OFFSETS.iter().filter_map(move |&(dx, dz)| {
            let from_floor = from_floor?;
            let nx = cell.0 as i32 + dx;
            let nz = cell.1 as i32 + dz;
            if nx < 0 || nz < 0 || nx as usize >= self.width || nz as usize >= self.depth {
                return None;
            }
            let next = (nx as usize, nz as usize);
            let floor = self.floor(next)?;
            if (floor - from_floor).abs() > MAX_STEP_HEIGHT {
                return None;
            }
            if dx != 0 && dz != 0 {
                // Не срезаем углы стен
                let side_a = (nx as usize, cell.1);
                let side_b = (cell.0, nz as usize);
                self.floor(side_a)?;
                self.floor(side_b)?;
            }
            let step = if dx != 0 && dz != 0 { std::f32::consts::SQRT_2 } else { 1.0 };
            Some((next, step * self.cell_size))
        })
    }

    /// A* от start до goal. Если goal недостижим — путь до ближайшей
    /// исследованной клетки (Partial, как engine navmesh).
    fn search(&self, start: Cell, goal: Cell) -> (Vec<Cell>, bool) {
        let start_idx = self.index(start);
        let goal_idx = self.index(goal);
        let goal_center = self.cell_center(goal).unwrap_or(self.origin);
        let heuristic = |index: usize| -> f32 {
            self.cell_center(self.cell_at(index))
                .map(|c| c.distance(goal_center))
                .unwrap_or(f32::MAX)
        };

        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<usize, usize> = HashMap::new();
        let mut g_score: HashMap<usize, f32> = HashMap::new();
        let mut closest = (start_idx, heuristic(start_idx));

        g_score.insert(start_idx, 0.0);
        open.push(OpenNode {
            cell: start_idx,
            f_cost: closest.1,
        });

        let mut found = false;
        while let Some(current) = open.pop() {
            if current.cell == goal_idx {
                found = true;
                break;
            }
            let current_g = g_score.get(&current.cell).copied().unwrap_or(f32::MAX);
            if current.f_cost > current_g + heuristic(current.cell) + 1e-4 {
                continue; // устаревшая запись в heap
            }

            for (next, step) in self.neighbors(self.cell_at(current.cell)) {
                let next_idx = self.index(next);
                let tentative = current_g + step;
                if tentative < g_score.get(&next_idx).copied().unwrap_or(f32::MAX) {
                    came_from.insert(next_idx, current.cell);
                    g_score.insert(next_idx, tentative);
                    let h = heuristic(next_idx);
                    if h < closest.1 {
                        closest = (next_idx, h);
                    }
                    open.push(OpenNode {
                        cell: next_idx,
                        f_cost: tentative + h,
                    });
                }
            }
        }

        let end = if found { goal_idx } else { closest.0 };
        let mut cells = vec![self.cell_at(end)];
        let mut cursor = end;
        while let Some(&prev) = came_from.get(&cursor) {
            cells.push(self.cell_at(prev));
            cursor = prev;
        }
        cells.reverse();
        (cells, found)
    }

    /// Оставляем только клетки, где меняется направление.
    fn turn_points(&self, cells: &[Cell]) -> Vec<Vec3> {
        let mut points = Vec::new();
        for i in 1..cells.len().saturating_sub(1) {
            let before = (
                cells[i].0 as i64 - cells[i - 1].0 as i64,
                cells[i].1 as i64 - cells[i - 1].1 as i64,
            );
            let after = (
                cells[i + 1].0 as i64 - cells[i].0 as i64,
                cells[i + 1].1 as i64 - cells[i].1 as i64,
            );
            if before != after {
                if let Some(center) = self.cell_center(cells[i]) {
                    points.push(center);
                }
            }
        }
        points
    }
}

fn ensure_finite(position: Vec3) -> Result<(), MeshQueryError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(MeshQueryError::NonFinitePosition(position.to_array()))
    }
}

impl NavMeshQuery for GridNavMesh {
    fn sample_position(&self, position: Vec3, max_distance: f32) -> Result<Option<Vec3>, MeshQueryError> {
        ensure_finite(position)?;
        if self.width == 0 || self.depth == 0 {
            return Err(MeshQueryError::NotLoaded);
        }

        // Точка над проходимой клеткой → проекция на пол
        if let Some(floor) = self.cell_of(position).and_then(|cell| self.floor(cell)) {
            if (position.y - floor).abs() <= max_distance {
                return Ok(Some(Vec3::new(position.x, floor, position.z)));
            }
        }

        let reach = (max_distance / self.cell_size).ceil() as i64;
        let local = (position - self.origin) / self.cell_size;
        let (cx, cz) = (local.x.floor() as i64, local.z.floor() as i64);

        let mut best: Option<(f32, Vec3)> = None;
        for z in (cz - reach).max(0)..=(cz + reach).min(self.depth as i64 - 1) {
            for x in (cx - reach).max(0)..=(cx + reach).min(self.width as i64 - 1) {
                let Some(center) = self.cell_center((x as usize, z as usize)) else {
                    continue;
                };
                let distance = center.distance(position);
                if distance <= max_distance && best.is_none_or(|(d, _)| distance < d) {
                    best = Some((distance, center));
                }
            }
        }
        Ok(best.map(|(_, point)| point))
    }

    fn calculate_path(&self, from: Vec3, to: Vec3) -> Result<MeshPath, MeshQueryError> {
        ensure_finite(from)?;
        ensure_finite(to)?;
        if self.width == 0 || self.depth == 0 {
            return Err(MeshQueryError::NotLoaded);
        }
        if !self.is_on_mesh(from) || !self.is_on_mesh(to) {
            return Ok(MeshPath::invalid());
        }
        let (Some(start), Some(goal)) = (self.cell_of(from), self.cell_of(to)) else {
            return Ok(MeshPath::invalid());
        };

        let (cells, found) = self.search(start, goal);
        let mut corners = vec![from];
        corners.extend(self.turn_points(&cells));
        if found {
            corners.push(to);
            Ok(MeshPath {
                status: PathStatus::Complete,
                corners,
            })
        } else {
            if let Some(last) = cells.last().and_then(|&cell| self.cell_center(cell)) {
                if cells.len() > 1 {
                    corners.push(last);
                }
            }
            Ok(MeshPath {
                status: PathStatus::Partial,
                corners,
            })
        }
    }
}
