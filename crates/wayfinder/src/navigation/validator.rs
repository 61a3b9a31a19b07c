//! PathValidator — можно ли дойти от A до B по walkable surface и как далеко.
//!
//! Две политики:
//! - `Standard` — для произвольных объектов сцены (строго: complete route + длина)
//! - `Relaxed` — для registered точек интереса. Многие designer-placed точки сидят
//!   чуть внутри геометрии или на стене, поэтому провал snap'а здесь НЕ означает
//!   недостижимость (degraded = true).
//!
//! Ошибки mesh query никогда не выходят наружу: ловятся здесь и превращаются
//! в `reachable = false`.

use bevy::prelude::*;
use std::sync::Arc;

use crate::error::MeshQueryError;
use crate::navmesh::{path_length, MeshPath, NavMeshQuery, PathStatus};

/// Max length для candidate set проверки (нелейбленые объекты рядом)
pub const CANDIDATE_MAX_LENGTH: f32 = 100.0;

/// Радиус snap'а для `estimate_distance`
pub const ESTIMATE_SNAP_RADIUS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationPolicy {
    Standard,
    Relaxed,
}

impl ValidationPolicy {
    pub fn for_target(registered: bool) -> Self {
        if registered {
            Self::Relaxed
        } else {
            Self::Standard
        }
    }

    pub fn vertical_ceiling(&self) -> f32 {
        match self {
            Self::Standard => 20.0,
            // Многоэтажные / настенные точки
            Self::Relaxed => 45.0,
        }
    }

    pub fn snap_radius(&self) -> f32 {
        match self {
            Self::Standard => 10.0,
            Self::Relaxed => 5.0,
        }
    }

    pub fn length_multiplier(&self) -> f32 {
        match self {
            Self::Standard => 2.0,
            Self::Relaxed => 2.5,
        }
    }
}

/// Почему route отклонён (для логов и тестов).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    VerticalGate,
    SnapFailed,
    NoRoute,
    PartialRoute,
    TooLong,
    QueryFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub reachable: bool,
    pub path: Vec<Vec3>,
    pub length: f32,
    /// Получено fallback эвристикой, а не чистым mesh query
    pub degraded: bool,
    pub rejection: Option<Rejection>,
}

impl PathQuery {
    pub fn unreachable(reason: Rejection) -> Self {
        Self {
            reachable: false,
            path: Vec::new(),
            length: 0.0,
            degraded: false,
            rejection: Some(reason),
        }
    }

    pub fn reachable(path: Vec<Vec3>, degraded: bool) -> Self {
        let length = path_length(&path);
        Self {
            reachable: true,
            path,
            length,
            degraded,
            rejection: None,
        }
    }

    /// "Скорее всего достижимо": прямая линия как путь.
    fn straight_line(start: Vec3, target: Vec3) -> Self {
        Self::reachable(vec![start, target], true)
    }
}

/// Результат одной попытки route query (до проверки длины).
enum RouteAttempt {
    Complete(Vec<Vec3>),
    Partial(Vec<Vec3>),
    Failed,
}

impl From<MeshPath> for RouteAttempt {
    fn from(path: MeshPath) -> Self {
        match path.status {
            PathStatus::Complete if path.corners.len() >= 2 => Self::Complete(path.corners),
            PathStatus::Partial if path.corners.len() >= 2 => Self::Partial(path.corners),
            _ => Self::Failed,
        }
    }
}

#[derive(Clone)]
pub struct PathValidator {
    mesh: Arc<dyn NavMeshQuery>,
}

impl PathValidator {
    pub fn new(mesh: Arc<dyn NavMeshQuery>) -> Self {
        Self { mesh }
    }

    pub fn validate(&self, start: Vec3, target: Vec3, max_length: f32, policy: ValidationPolicy) -> PathQuery {
        match self.try_validate(start, target, max_length, policy) {
            Ok(query) => query,
            Err(err) => {
                crate::logger::log_warning(&format!(
                    "PathValidator: mesh query failed {:?} → {:?}: {}",
                    start, target, err
                ));
                PathQuery::unreachable(Rejection::QueryFailed)
            }
        }
    }

    fn try_validate(
        &self,
        start: Vec3,
        target: Vec3,
        max_length: f32,
        policy: ValidationPolicy,
    ) -> Result<PathQuery, MeshQueryError> {
        // 1. Vertical gate (до любых mesh query)
        if (target.y - start.y).abs() > policy.vertical_ceiling() {
            return Ok(PathQuery::unreachable(Rejection::VerticalGate));
        }

        // 2. Прямой route на сырых позициях
        let mut attempt = RouteAttempt::from(self.mesh.calculate_path(start, target)?);

        // 3. Snap обоих концов и повтор
        if !matches!(attempt, RouteAttempt::Complete(_)) {
            let radius = policy.snap_radius();
            let snapped_start = self.mesh.sample_position(start, radius)?;
            let snapped_target = self.mesh.sample_position(target, radius)?;

            match (snapped_start, snapped_target) {
                (Some(from), Some(to)) => {
                    let retry = RouteAttempt::from(self.mesh.calculate_path(from, to)?);
                    attempt = match (retry, attempt) {
                        (RouteAttempt::Failed, previous) => previous,
                        (retry, _) => retry,
                    };
                }
                // 4. Snap провалился
                _ => {
                    return Ok(match policy {
                        ValidationPolicy::Relaxed => PathQuery::straight_line(start, target),
                        ValidationPolicy::Standard => PathQuery::unreachable(Rejection::SnapFailed),
                    });
                }
            }
        }

        let (path, degraded) = match (attempt, policy) {
            (RouteAttempt::Complete(path), _) => (path, false),
            // 5. Partial route
            (RouteAttempt::Partial(path), ValidationPolicy::Relaxed) => (path, true),
            (RouteAttempt::Partial(_), ValidationPolicy::Standard) => {
                return Ok(PathQuery::unreachable(Rejection::PartialRoute));
            }
            // Snap ок, но mesh так и не дал route: для registered точек всё равно пускаем
            (RouteAttempt::Failed, ValidationPolicy::Relaxed) => {
                return Ok(PathQuery::straight_line(start, target));
            }
            (RouteAttempt::Failed, ValidationPolicy::Standard) => {
                return Ok(PathQuery::unreachable(Rejection::NoRoute));
            }
        };

        // 6. Длина пути
        let query = PathQuery::reachable(path, degraded);
        if query.length > max_length * policy.length_multiplier() {
            return Ok(PathQuery::unreachable(Rejection::TooLong));
        }
        Ok(query)
    }

    /// Best-effort дистанция: прямой route → snapped route → евклидово. Никогда не падает.
    pub fn estimate_distance(&self, start: Vec3, target: Vec3) -> f32 {
        if let Some(length) = self.direct_length(start, target) {
            return length;
        }
        if let Some(length) = self.snapped_length(start, target) {
            return length;
        }
        start.distance(target)
    }

    fn direct_length(&self, start: Vec3, target: Vec3) -> Option<f32> {
        let path = self.mesh.calculate_path(start, target).ok()?;
        let length = path.length();
        (path.status != PathStatus::Invalid && length > 0.0).then_some(length)
    }

    fn snapped_length(&self, start: Vec3, target: Vec3) -> Option<f32> {
        let from = self.mesh.sample_position(start, ESTIMATE_SNAP_RADIUS).ok()??;
        let to = self.mesh.sample_position(target, ESTIMATE_SNAP_RADIUS).ok()??;
        self.direct_length(from, to)
    }

    /// Попадает ли объект в список "рядом": registered/whitelisted — всегда,
    /// остальные — только если Standard route короче `CANDIDATE_MAX_LENGTH`.
    pub fn should_include_in_candidate_set(
        &self,
        candidate_registered: bool,
        candidate: Vec3,
        origin: Vec3,
    ) -> bool {
        if candidate_registered {
            return true;
        }
        self.validate(origin, candidate, CANDIDATE_MAX_LENGTH, ValidationPolicy::Standard)
            .reachable
    }
}
