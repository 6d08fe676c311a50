// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Simulation engine
//!
//! [`Engine`] owns the physics world, every robot record and the registry
//! that produced the robots. One [`tick`](Engine::tick) runs five phases in a
//! fixed order:
//!
//! 1. **Decide**: every robot's [`Robot::update`] runs, in registration order
//! 2. **Control**: pending steering is applied and each body receives a
//!    force-limited proportional push toward its commanded velocity
//! 3. **Integrate**: the world advances by one fixed step
//! 4. **Respond**: contacts from that step are processed. Robots hitting the
//!    boundary turn to travel along their rebound velocity; spin from any
//!    contact is removed
//! 5. **Publish**: poses and time are copied into each robot's context, for
//!    the robot to read on the next tick
//!
//! Nothing here runs concurrently and nothing interrupts a robot: an
//! `update` that never returns stalls the match.

use crate::context::{RobotContext, SharedContext};
use crate::engine::arena::{build_boundary, spawn_robot, ARENA_WIDTH, SPAWN_POINTS};
use crate::engine::control::corrective_force;
use crate::engine::events::ContactEvent;
use crate::engine::params::EngineParams;
use crate::engine::world::PhysicsWorld;
use crate::error::InitError;
use crate::plugins::{DynamicLibraryLoader, ModuleLoader, Robot, RobotRegistry};
use crate::units::{Meters, Radians, Seconds};
use log::{debug, error, info, trace, warn};
use rapier2d::prelude::{ColliderHandle, Real, RigidBodyHandle, Rotation, Vector};
use std::rc::Rc;

/// Engine-side record of one robot
pub struct RobotRecord {
    name: String,
    decision: Box<dyn Robot>,
    context: SharedContext,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    last_force: Vector<Real>,
}

impl RobotRecord {
    /// Name the robot was loaded under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Context shared with the robot's decision logic
    pub fn context(&self) -> &RobotContext {
        &self.context
    }

    /// Physics body driving this robot
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// Collider attached to the body
    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    /// Corrective force applied in the most recent control phase
    pub fn last_force(&self) -> Vector<Real> {
        self.last_force
    }
}

/// Projectile in flight
///
/// No robot API fires projectiles yet, so the engine never creates one; the
/// record exists so renderers can already iterate them.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    body: RigidBodyHandle,
}

impl Projectile {
    /// Physics body of the projectile
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }
}

/// What the collision response phase of one tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Index of the tick, starting at 1
    pub tick: u64,
    /// Robots (by registration index) re-oriented by a boundary contact
    pub boundary_hits: Vec<usize>,
    /// Robot pairs that began or kept pushing against each other
    pub robot_contacts: Vec<(usize, usize)>,
    /// Contact ends whose bodies were still valid and had spin removed
    pub contacts_ended: usize,
}

/// Arena simulation
pub struct Engine<L: ModuleLoader = DynamicLibraryLoader> {
    // Field order is drop order: robots must go before the registry that
    // unloads their code.
    robots: Vec<RobotRecord>,
    projectiles: Vec<Projectile>,
    world: PhysicsWorld,
    boundary_body: RigidBodyHandle,
    boundary_collider: ColliderHandle,
    registry: RobotRegistry<L>,
    timestep: Real,
    tick_count: u64,
    debug: bool,
    destroyed: bool,
}

impl Engine<DynamicLibraryLoader> {
    /// Initialize with robot modules from disk
    ///
    /// Modules are looked up next to the running executable, or in
    /// `CROBOTS_ROBOT_DIR` when set.
    pub fn from_env(params: &EngineParams) -> Result<Self, InitError> {
        Engine::init(params, RobotRegistry::from_env())
    }
}

impl<L: ModuleLoader> Engine<L> {
    /// Build a match from `params`, loading robots through `registry`
    ///
    /// # Errors
    ///
    /// - [`InitError::Config`] if the robot count is outside 2..=8 or the
    ///   timestep is not positive
    /// - [`InitError::Robot`] for the first robot that fails to load; no
    ///   other robot is kept and every module loaded so far is unloaded
    pub fn init(params: &EngineParams, mut registry: RobotRegistry<L>) -> Result<Self, InitError> {
        if let Err(e) = params.validate() {
            error!("{}", e);
            return Err(e.into());
        }

        let mut loaded: Vec<(String, SharedContext, Box<dyn Robot>)> =
            Vec::with_capacity(params.robots.len());
        for name in &params.robots {
            let context: SharedContext = Rc::new(RobotContext::new());
            match registry.load(name, &context) {
                Ok(decision) => loaded.push((name.clone(), context, decision)),
                Err(source) => {
                    error!("Failed to load robot: {}", name);
                    drop(loaded);
                    registry.destroy();
                    return Err(InitError::Robot {
                        name: name.clone(),
                        source,
                    });
                }
            }
        }

        let mut world = PhysicsWorld::new(params.timestep);

        let mut robots = Vec::with_capacity(loaded.len());
        for ((name, context, decision), [x, y]) in loaded.into_iter().zip(SPAWN_POINTS) {
            let (body, collider) = spawn_robot(&mut world, Vector::new(x, y));
            context.publish_pose(Meters::new(x), Meters::new(y), Radians::new(0.0));
            debug!("Spawned robot '{}' at ({}, {})", name, x, y);
            robots.push(RobotRecord {
                name,
                decision,
                context,
                body,
                collider,
                last_force: Vector::zeros(),
            });
        }

        let (boundary_body, boundary_collider) = build_boundary(&mut world, ARENA_WIDTH);

        info!(
            "Engine initialized with {} robots, timestep {}s",
            robots.len(),
            params.timestep
        );

        Ok(Engine {
            robots,
            projectiles: Vec::new(),
            world,
            boundary_body,
            boundary_collider,
            registry,
            timestep: params.timestep,
            tick_count: 0,
            debug: true,
            destroyed: false,
        })
    }

    /// Run one simulation tick
    ///
    /// Does nothing after [`destroy`](Self::destroy).
    pub fn tick(&mut self) -> TickReport {
        if self.destroyed {
            warn!("Tick requested on a destroyed engine");
            return TickReport::default();
        }

        for robot in &mut self.robots {
            robot.decision.update();
        }

        self.apply_drive_forces();
        self.world.step();
        self.tick_count += 1;

        let events = self.world.drain_events();
        let report = self.respond_to_contacts(&events);

        self.publish_state();
        report
    }

    fn apply_drive_forces(&mut self) {
        for robot in &mut self.robots {
            let Some(body) = self.world.body_mut(robot.body) else {
                warn!("Robot '{}' has no body, skipping drive", robot.name);
                continue;
            };

            if let Some(heading) = robot.context.take_steer() {
                body.set_rotation(Rotation::new(heading.value()), true);
            }

            let force = corrective_force(
                body.rotation(),
                robot.context.speed().value(),
                body.linvel(),
                body.mass(),
                robot.context.max_acceleration(),
            );
            body.reset_forces(false);
            body.add_force(force, force.norm_squared() > 0.0);
            robot.last_force = force;
        }
    }

    fn respond_to_contacts(&mut self, events: &[ContactEvent]) -> TickReport {
        let mut report = TickReport {
            tick: self.tick_count,
            ..TickReport::default()
        };

        for event in events {
            match *event {
                ContactEvent::Began(a, b) | ContactEvent::Hit { a, b, .. } => {
                    self.respond_to_hit(a, b, &mut report);
                }
                ContactEvent::Ended { a, b, removed } => {
                    if removed
                        || !self.world.is_collider_valid(a)
                        || !self.world.is_collider_valid(b)
                    {
                        trace!("Skipping contact end with a removed collider");
                        continue;
                    }
                    if let (Some(body_a), Some(body_b)) =
                        (self.world.collider_body(a), self.world.collider_body(b))
                    {
                        self.stop_spin(body_a);
                        self.stop_spin(body_b);
                        report.contacts_ended += 1;
                    }
                }
            }
        }

        report
    }

    fn respond_to_hit(&mut self, a: ColliderHandle, b: ColliderHandle, report: &mut TickReport) {
        let (Some(body_a), Some(body_b)) =
            (self.world.collider_body(a), self.world.collider_body(b))
        else {
            trace!("Skipping contact with a removed collider");
            return;
        };

        let robot_body = if a == self.boundary_collider {
            Some(body_b)
        } else if b == self.boundary_collider {
            Some(body_a)
        } else {
            None
        };

        match robot_body {
            Some(body) => {
                self.align_with_velocity(body);
                if let Some(index) = self.robot_index(body) {
                    if !report.boundary_hits.contains(&index) {
                        report.boundary_hits.push(index);
                    }
                }
            }
            None => {
                if let (Some(ia), Some(ib)) = (self.robot_index(body_a), self.robot_index(body_b)) {
                    let pair = (ia.min(ib), ia.max(ib));
                    if !report.robot_contacts.contains(&pair) {
                        report.robot_contacts.push(pair);
                    }
                }
            }
        }

        self.stop_spin(body_a);
        self.stop_spin(body_b);
    }

    /// Turn a body to face along its linear velocity
    fn align_with_velocity(&mut self, handle: RigidBodyHandle) {
        let Some(body) = self.world.body_mut(handle) else {
            return;
        };
        let velocity = *body.linvel();
        if velocity.norm() < Real::EPSILON {
            return;
        }
        let direction = velocity.normalize();
        body.set_rotation(Rotation::new(direction.y.atan2(direction.x)), true);
    }

    fn stop_spin(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.world.body_mut(handle) {
            if body.is_dynamic() {
                body.set_angvel(0.0, false);
            }
        }
    }

    fn robot_index(&self, body: RigidBodyHandle) -> Option<usize> {
        self.robots.iter().position(|robot| robot.body == body)
    }

    fn publish_state(&self) {
        let elapsed = self.elapsed();
        for robot in &self.robots {
            match self.world.body_pose(robot.body) {
                Some(pose) => robot.context.publish_pose(
                    Meters::new(pose.translation.x),
                    Meters::new(pose.translation.y),
                    Radians::new(pose.angle),
                ),
                None => warn!("Robot '{}' has no body, pose not published", robot.name),
            }
            robot.context.publish_time(elapsed);
        }
    }

    /// Tear the match down
    ///
    /// Destroys the physics world, drops every robot and projectile, then
    /// unloads the registry's modules. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.world = PhysicsWorld::new(self.timestep);
        self.robots.clear();
        self.projectiles.clear();
        self.registry.destroy();
        self.destroyed = true;
        info!("Engine destroyed after {} ticks", self.tick_count);
    }

    /// Whether [`destroy`](Self::destroy) has run
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Robots in registration order
    pub fn robots(&self) -> &[RobotRecord] {
        &self.robots
    }

    /// Robot at registration index `index`
    pub fn robot(&self, index: usize) -> Option<&RobotRecord> {
        self.robots.get(index)
    }

    /// Projectiles in flight
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Side length of the arena in meters
    pub fn width(&self) -> Real {
        ARENA_WIDTH
    }

    /// Physics world, for debug drawing and pose queries
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Static boundary body
    pub fn boundary_body(&self) -> RigidBodyHandle {
        self.boundary_body
    }

    /// Collider of the static boundary
    pub fn boundary_collider(&self) -> ColliderHandle {
        self.boundary_collider
    }

    /// Registry the robots were loaded from
    pub fn registry(&self) -> &RobotRegistry<L> {
        &self.registry
    }

    /// Whether the renderer should draw physics debug geometry
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Toggle physics debug drawing
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Fixed step in seconds
    pub fn timestep(&self) -> Real {
        self.timestep
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated time elapsed
    pub fn elapsed(&self) -> Seconds {
        Seconds::new((self.tick_count as f64 * self.timestep as f64) as f32)
    }
}

impl<L: ModuleLoader> Drop for Engine<L> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::StaticLoader;
    use crate::units::MetersPerSecond;

    struct Idle;

    impl Robot for Idle {
        fn update(&mut self) {}
    }

    fn new_idle(_context: SharedContext) -> Option<Box<dyn Robot>> {
        Some(Box::new(Idle))
    }

    struct Spinner {
        context: SharedContext,
    }

    impl Robot for Spinner {
        fn update(&mut self) {
            self.context.set_rotation(Radians::new(1.0));
            self.context.set_speed(MetersPerSecond::new(1.0));
        }
    }

    fn new_spinner(context: SharedContext) -> Option<Box<dyn Robot>> {
        Some(Box::new(Spinner { context }))
    }

    /// Drives at full speed along `heading`, set on the first update
    struct Charger {
        context: SharedContext,
        heading: Option<f32>,
    }

    impl Robot for Charger {
        fn update(&mut self) {
            if let Some(heading) = self.heading.take() {
                self.context.set_rotation(Radians::new(heading));
            }
            self.context.set_speed(MetersPerSecond::new(10.0));
        }
    }

    fn new_east(context: SharedContext) -> Option<Box<dyn Robot>> {
        Some(Box::new(Charger {
            context,
            heading: Some(0.0),
        }))
    }

    fn new_west(context: SharedContext) -> Option<Box<dyn Robot>> {
        Some(Box::new(Charger {
            context,
            heading: Some(std::f32::consts::PI),
        }))
    }

    fn loader() -> StaticLoader {
        StaticLoader::new()
            .with("idle", new_idle)
            .with("spinner", new_spinner)
            .with("east", new_east)
            .with("west", new_west)
    }

    #[test]
    fn test_init_publishes_spawn_pose() {
        let params = EngineParams::new(["idle", "idle"]);
        let engine = Engine::init(&params, RobotRegistry::new(loader())).unwrap();

        assert_eq!(engine.robots().len(), 2);
        assert_eq!(engine.registry().loader().open_count("idle"), 1);
        let context = engine.robot(1).unwrap().context();
        assert_eq!(context.x().value(), SPAWN_POINTS[1][0]);
        assert_eq!(context.y().value(), SPAWN_POINTS[1][1]);
        assert!(engine.projectiles().is_empty());
        assert!(engine.debug());
    }

    #[test]
    fn test_steering_is_applied_and_published() {
        let params = EngineParams::new(["spinner", "idle"]);
        let mut engine = Engine::init(&params, RobotRegistry::new(loader())).unwrap();

        engine.tick();
        let robot = engine.robot(0).unwrap();
        assert!((robot.context().rotation().value() - 1.0).abs() < 1e-4);
        assert!(robot.context().pending_rotation().is_none());
    }

    #[test]
    fn test_time_advances_per_tick() {
        let params = EngineParams::new(["idle", "idle"]).with_timestep(0.01);
        let mut engine = Engine::init(&params, RobotRegistry::new(loader())).unwrap();

        for expected in 1..=10u64 {
            let report = engine.tick();
            assert_eq!(report.tick, expected);
        }
        assert_eq!(engine.tick_count(), 10);
        let context = engine.robot(0).unwrap().context();
        assert!((context.time().value() - 0.1).abs() < 1e-6);
        assert_eq!(context.heat(), 0.0);
        assert_eq!(context.damage(), 0.0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let params = EngineParams::new(["idle", "idle"]);
        let mut engine = Engine::init(&params, RobotRegistry::new(loader())).unwrap();
        let body = engine.robot(0).unwrap().body();

        engine.destroy();
        engine.destroy();
        assert!(engine.is_destroyed());
        assert!(engine.robots().is_empty());
        assert!(engine.world().body(body).is_none());
        assert_eq!(engine.registry().entry_count(), 0);
        assert_eq!(engine.tick(), TickReport::default());
    }

    #[test]
    fn test_events_with_stale_colliders_are_skipped() {
        let params = EngineParams::new(["idle", "idle"]);
        let mut engine = Engine::init(&params, RobotRegistry::new(loader())).unwrap();
        let live_body = engine.robot(0).unwrap().body();
        let live = engine.robot(0).unwrap().collider();
        let stale_body = engine.robot(1).unwrap().body();
        let stale = engine.robot(1).unwrap().collider();
        let boundary = engine.boundary_collider();

        assert!(engine.world.remove_body(stale_body));
        engine.world.body_mut(live_body).unwrap().set_angvel(1.0, true);

        let report = engine.respond_to_contacts(&[
            ContactEvent::Began(stale, live),
            ContactEvent::Hit {
                a: boundary,
                b: stale,
                force: 5.0,
            },
            ContactEvent::Ended {
                a: stale,
                b: live,
                removed: false,
            },
            ContactEvent::Ended {
                a: live,
                b: boundary,
                removed: true,
            },
        ]);

        assert!(report.boundary_hits.is_empty());
        assert!(report.robot_contacts.is_empty());
        assert_eq!(report.contacts_ended, 0);
        assert_eq!(engine.world().body(live_body).unwrap().angvel(), 1.0);

        let report = engine.respond_to_contacts(&[ContactEvent::Ended {
            a: live,
            b: boundary,
            removed: false,
        }]);
        assert_eq!(report.contacts_ended, 1);
        assert_eq!(engine.world().body(live_body).unwrap().angvel(), 0.0);
    }

    #[test]
    fn test_body_removed_mid_contact_is_left_alone() {
        let params = EngineParams::new(["east", "west"]);
        let mut engine = Engine::init(&params, RobotRegistry::new(loader())).unwrap();

        let mut touching = false;
        for _ in 0..300 {
            if engine.tick().robot_contacts.contains(&(0, 1)) {
                touching = true;
                break;
            }
        }
        assert!(touching, "robots never met");

        let removed = engine.robot(1).unwrap().body();
        let force_before = engine.robot(1).unwrap().last_force();
        let pose_before = engine.robot(1).unwrap().context().position();
        assert!(engine.world.remove_body(removed));

        for _ in 0..5 {
            let report = engine.tick();
            assert_eq!(report.contacts_ended, 0);
            assert!(report.robot_contacts.is_empty());
        }

        let robot = engine.robot(1).unwrap();
        assert!(engine.world().body(removed).is_none());
        assert_eq!(robot.last_force(), force_before);
        assert_eq!(robot.context().position(), pose_before);
        assert_eq!(robot.context().time(), engine.elapsed());
        assert!(engine.world().body(engine.robot(0).unwrap().body()).is_some());
    }

    #[test]
    fn test_debug_toggle() {
        let params = EngineParams::new(["idle", "idle"]);
        let mut engine = Engine::init(&params, RobotRegistry::new(loader())).unwrap();
        engine.set_debug(false);
        assert!(!engine.debug());
        assert_eq!(engine.width(), ARENA_WIDTH);
    }
}
