//! Pathfinder — locomotion state machine аватара.
//!
//! ```text
//! Idle ──navigate_to──▶ Routing ──route ok──▶ Following ──arrived──▶ Idle
//!                          │                    ▲   │
//!                          └──not reachable──▶ Idle │ navigate_to (тот же target)
//!                                               │   ▼
//!                                               Paused
//! ```
//!
//! Чистая логика без ECS: системы в `systems::routing` / `systems::locomotion`
//! кормят её позицией аватара и результатами route queries.
//!
//! Route queries идут через epoch: каждый запрос несёт epoch на момент выдачи,
//! stop()/supersede/timeout увеличивают epoch, результат со старым epoch
//! отбрасывается (`RouteOutcome::Stale`).

use bevy::prelude::*;

use super::proximity::{stopping_radius_for, REGISTERED_MIN_RADIUS};
use super::registry::ResolvedTarget;
use super::validator::{PathQuery, ValidationPolicy};
use crate::error::NavError;

/// Потолок длины маршрута для навигации (validator ещё умножает на policy multiplier)
pub const MAX_ROUTE_LENGTH: f32 = 500.0;

/// Статичная цель пере-планируется в N раз реже живой
const STATIC_REPLAN_FACTOR: f32 = 5.0;

const STUCK_CHECK_INTERVAL: f32 = 3.0;
const STUCK_MIN_PROGRESS: f32 = 0.5;
const MAX_STUCK_RECOVERIES: u32 = 3;
const STUCK_RECOVERY_COOLDOWN: f32 = 5.0;

const BASE_SPEED: f32 = 1.75;
const SPEED_MULTIPLIER: f32 = 3.5;
/// Вес, при котором скорость падает до минимума
const HEAVY_CARRY_WEIGHT: f32 = 1.4;
const MIN_SPEED_FACTOR: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathfinderState {
    #[default]
    Idle,
    Routing,
    Following,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathfinderSettings {
    pub stopping_radius: f32,
    pub registered_min_radius: f32,
    pub replan_interval: f32,
    pub query_timeout: f32,
}

impl Default for PathfinderSettings {
    fn default() -> Self {
        Self {
            stopping_radius: 2.2,
            registered_min_radius: REGISTERED_MIN_RADIUS,
            replan_interval: 1.0,
            query_timeout: 5.0,
        }
    }
}

/// Запрос маршрута, который нужно посчитать (inline или в background task).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub epoch: u64,
    pub start: Vec3,
    pub target: Vec3,
    pub max_length: f32,
    pub policy: ValidationPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct InFlight {
    epoch: u64,
    issued_at: f32,
    replan: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StuckWatch {
    checked_at: f32,
    position: Vec3,
    recoveries: u32,
    last_recovery_at: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathfindingSession {
    pub target: ResolvedTarget,
    pub state: PathfinderState,
    pub waypoints: Vec<Vec3>,
    pub waypoint_index: usize,
    pub stopping_radius: f32,
    pub last_replan_at: f32,
    pub degraded: bool,
    in_flight: Option<InFlight>,
    stuck: Option<StuckWatch>,
}

impl PathfindingSession {
    fn new(target: ResolvedTarget, stopping_radius: f32) -> Self {
        Self {
            target,
            state: PathfinderState::Routing,
            waypoints: Vec::new(),
            waypoint_index: 0,
            stopping_radius,
            last_replan_at: 0.0,
            degraded: false,
            in_flight: None,
            stuck: None,
        }
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.waypoint_index).copied()
    }

    pub fn is_query_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    Started { epoch: u64 },
    Paused,
    Resumed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Stale,
    Ready { degraded: bool, replanned: bool },
    NotReachable { target: ResolvedTarget },
    LostPath { target: ResolvedTarget },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Idle,
    /// Routing / Paused — аватар стоит
    Hold,
    Steer { waypoint: Vec3, direction: Vec3 },
    Arrived { target: ResolvedTarget },
}

#[derive(Component, Debug, Clone, Default)]
pub struct Pathfinder {
    pub settings: PathfinderSettings,
    session: Option<PathfindingSession>,
    epoch: u64,
}

impl Pathfinder {
    pub fn new(settings: PathfinderSettings) -> Self {
        Self {
            settings,
            session: None,
            epoch: 0,
        }
    }

    pub fn state(&self) -> PathfinderState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(PathfinderState::Idle)
    }

    pub fn session(&self) -> Option<&PathfindingSession> {
        self.session.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_targeting(&self, target: &ResolvedTarget) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.target.same_target(target))
    }

    /// Stopping radius активной сессии.
    pub fn stopping_radius(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.stopping_radius)
    }

    /// Радиус для конкретной цели: registered точки расширяются до минимума.
    pub fn radius_for(&self, target: &ResolvedTarget) -> f32 {
        stopping_radius_for(
            Some(self.settings.stopping_radius),
            target.registered,
            self.settings.registered_min_radius,
        )
    }

    pub fn navigate_to(&mut self, target: ResolvedTarget, now: f32) -> NavigateOutcome {
        if let Some(session) = self.session.as_mut() {
            if session.target.same_target(&target) {
                match session.state {
                    PathfinderState::Routing | PathfinderState::Following => {
                        session.state = PathfinderState::Paused;
                        return NavigateOutcome::Paused;
                    }
                    PathfinderState::Paused => {
                        session.state = if session.waypoints.is_empty() {
                            PathfinderState::Routing
                        } else {
                            PathfinderState::Following
                        };
                        // После паузы путь мог устареть
                        session.last_replan_at = f32::NEG_INFINITY;
                        session.stuck = None;
                        return NavigateOutcome::Resumed;
                    }
                    PathfinderState::Idle => {}
                }
            }
        }

        // Новая сессия вытесняет старую; поздние результаты старой станут stale
        self.epoch += 1;
        let radius = self.radius_for(&target);
        let mut session = PathfindingSession::new(target, radius);
        session.last_replan_at = now;
        self.session = Some(session);
        NavigateOutcome::Started { epoch: self.epoch }
    }

    /// Всегда → Idle. Безопасно при незавершённом route query.
    pub fn stop(&mut self) -> bool {
        let was_active = self.session.take().is_some();
        if was_active {
            self.epoch += 1;
        }
        was_active
    }

    /// Живая цель сдвинулась: пиннутая позиция обновляется, маршрут — на re-plan.
    pub fn update_target_position(&mut self, position: Vec3) {
        if let Some(session) = self.session.as_mut() {
            session.target.position = position;
        }
    }

    fn replan_due(&self, session: &PathfindingSession, now: f32) -> bool {
        let interval = if session.target.is_live() {
            self.settings.replan_interval
        } else {
            self.settings.replan_interval * STATIC_REPLAN_FACTOR
        };
        now - session.last_replan_at >= interval
    }

    /// Следующий route query, если он нужен и ни один не в полёте.
    pub fn next_route_request(&mut self, avatar: Vec3, now: f32) -> Option<RouteRequest> {
        let session = self.session.as_ref()?;
        if session.in_flight.is_some() {
            return None;
        }
        let replan = match session.state {
            PathfinderState::Routing => false,
            PathfinderState::Following if self.replan_due(session, now) => true,
            _ => return None,
        };

        let epoch = self.epoch;
        let session = self.session.as_mut()?;
        session.in_flight = Some(InFlight {
            epoch,
            issued_at: now,
            replan,
        });
        Some(RouteRequest {
            epoch,
            start: avatar,
            target: session.target.position,
            max_length: MAX_ROUTE_LENGTH,
            policy: ValidationPolicy::for_target(session.target.registered),
        })
    }

    pub fn apply_route(&mut self, epoch: u64, query: PathQuery, now: f32) -> RouteOutcome {
        let Some(session) = self.session.as_mut() else {
            return RouteOutcome::Stale;
        };
        let in_flight = match session.in_flight {
            Some(in_flight) if in_flight.epoch == epoch && epoch == self.epoch => in_flight,
            _ => {
                let stale = NavError::StaleResult {
                    result_epoch: epoch,
                    session_epoch: self.epoch,
                };
                crate::logger::log(&format!("Pathfinder: {}", stale));
                return RouteOutcome::Stale;
            }
        };
        session.in_flight = None;

        if !query.reachable {
            let target = session.target.clone();
            self.session = None;
            return if in_flight.replan {
                RouteOutcome::LostPath { target }
            } else {
                RouteOutcome::NotReachable { target }
            };
        }

        session.waypoints = query.path;
        // path[0] — стартовая позиция аватара
        session.waypoint_index = usize::from(session.waypoints.len() > 1);
        session.degraded = query.degraded;
        session.last_replan_at = now;
        if session.state == PathfinderState::Routing {
            session.state = PathfinderState::Following;
        }
        RouteOutcome::Ready {
            degraded: query.degraded,
            replanned: in_flight.replan,
        }
    }

    /// Route query висит дольше таймаута. Первичный → сессия закрывается
    /// (возвращается цель для озвучки), re-plan → просто забываем запрос.
    pub fn check_timeout(&mut self, now: f32) -> Option<ResolvedTarget> {
        let session = self.session.as_mut()?;
        let in_flight = session.in_flight?;
        if now - in_flight.issued_at <= self.settings.query_timeout {
            return None;
        }
        self.epoch += 1;
        if in_flight.replan {
            session.in_flight = None;
            session.last_replan_at = now;
            return None;
        }
        let target = session.target.clone();
        self.session = None;
        Some(target)
    }

    pub fn tick(&mut self, avatar: Vec3, now: f32) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Idle;
        };
        if session.state != PathfinderState::Following {
            return TickOutcome::Hold;
        }

        let radius = session.stopping_radius;
        if avatar.distance(session.target.position) <= radius {
            return self.finish_arrival();
        }

        let last = session.waypoints.len().saturating_sub(1);
        while let Some(waypoint) = session.current_waypoint() {
            if avatar.distance(waypoint) > radius {
                break;
            }
            if session.waypoint_index >= last {
                return self.finish_arrival();
            }
            session.waypoint_index += 1;
        }

        Self::watch_stuck(session, avatar, now);

        let Some(waypoint) = session.current_waypoint() else {
            // Пустой путь (не должно случаться для reachable) — идём прямо к цели
            let waypoint = session.target.position;
            return TickOutcome::Steer {
                waypoint,
                direction: steering_direction(avatar, waypoint),
            };
        };
        TickOutcome::Steer {
            waypoint,
            direction: steering_direction(avatar, waypoint),
        }
    }

    fn finish_arrival(&mut self) -> TickOutcome {
        match self.session.take() {
            Some(session) => TickOutcome::Arrived {
                target: session.target,
            },
            None => TickOutcome::Idle,
        }
    }

    /// Каждые 3с: если аватар почти не сдвинулся — перескакиваем на следующий waypoint.
    fn watch_stuck(session: &mut PathfindingSession, avatar: Vec3, now: f32) {
        let Some(mut watch) = session.stuck else {
            session.stuck = Some(StuckWatch {
                checked_at: now,
                position: avatar,
                recoveries: 0,
                last_recovery_at: None,
            });
            return;
        };
        if now - watch.checked_at < STUCK_CHECK_INTERVAL {
            return;
        }

        let moved = avatar.distance(watch.position);
        let cooled_down = watch
            .last_recovery_at
            .is_none_or(|at| now - at >= STUCK_RECOVERY_COOLDOWN);
        let has_next = session.waypoint_index + 1 < session.waypoints.len();
        if moved < STUCK_MIN_PROGRESS && watch.recoveries < MAX_STUCK_RECOVERIES && cooled_down && has_next {
            session.waypoint_index += 1;
            watch.recoveries += 1;
            watch.last_recovery_at = Some(now);
            crate::logger::log_warning(&format!(
                "Pathfinder: stuck near {:?}, skipping to waypoint {} ({}/{})",
                avatar, session.waypoint_index, watch.recoveries, MAX_STUCK_RECOVERIES
            ));
        }
        watch.checked_at = now;
        watch.position = avatar;
        session.stuck = Some(watch);
    }
}

fn steering_direction(avatar: Vec3, waypoint: Vec3) -> Vec3 {
    let diff = waypoint - avatar;
    let flat = Vec3::new(diff.x, 0.0, diff.z);
    if flat.length() < 0.01 {
        Vec3::ZERO
    } else {
        flat.normalize()
    }
}

/// Скорость ходьбы с учётом веса в руках.
pub fn locomotion_speed(carry_weight: f32) -> f32 {
    let t = (carry_weight.max(0.0) / HEAVY_CARRY_WEIGHT).min(1.0);
    let factor = 1.0 + (MIN_SPEED_FACTOR - 1.0) * t;
    BASE_SPEED * SPEED_MULTIPLIER * factor
}
