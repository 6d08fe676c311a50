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
//! Motion and collision response over many ticks
//!
//! Robots here are built in-process through a static loader, so these runs
//! exercise the whole tick without touching shared libraries.

use approx::assert_relative_eq;
use crobots::context::SharedContext;
use crobots::engine::{Engine, EngineParams, ARENA_WIDTH, ROBOT_HALF_EXTENT};
use crobots::plugins::{Robot, RobotRegistry, StaticLoader};
use crobots::units::{MetersPerSecond, Radians};
use std::f32::consts::PI;

const CRUISE: f32 = 10.0;

struct Idle;

impl Robot for Idle {
    fn update(&mut self) {}
}

/// Drives forward along its spawn facing
struct Cruiser {
    context: SharedContext,
}

impl Robot for Cruiser {
    fn update(&mut self) {
        self.context.set_speed(MetersPerSecond::new(CRUISE));
    }
}

/// Turns around once, then drives forward
struct Reverser {
    context: SharedContext,
    turned: bool,
}

impl Robot for Reverser {
    fn update(&mut self) {
        if !self.turned {
            self.context.set_rotation(Radians::new(PI));
            self.turned = true;
        }
        self.context.set_speed(MetersPerSecond::new(CRUISE));
    }
}

fn new_idle(_context: SharedContext) -> Option<Box<dyn Robot>> {
    Some(Box::new(Idle))
}

fn new_cruiser(context: SharedContext) -> Option<Box<dyn Robot>> {
    Some(Box::new(Cruiser { context }))
}

fn new_reverser(context: SharedContext) -> Option<Box<dyn Robot>> {
    Some(Box::new(Reverser {
        context,
        turned: false,
    }))
}

fn engine(robots: &[&str]) -> Engine<StaticLoader> {
    let loader = StaticLoader::new()
        .with("idle", new_idle)
        .with("cruiser", new_cruiser)
        .with("reverser", new_reverser);
    let params = EngineParams::new(robots.iter().copied());
    Engine::init(&params, RobotRegistry::new(loader)).unwrap()
}

/// Assert `angle` points the same way as `heading`
fn assert_same_heading(angle: f32, heading: f32) {
    let diff = angle - heading;
    assert!(
        diff.sin().abs() < 1e-4 && diff.cos() > 0.0,
        "angle {} does not match heading {}",
        angle,
        heading
    );
}

#[test]
fn test_boundary_hit_aligns_heading_with_velocity() {
    let mut engine = engine(&["reverser", "idle"]);

    let mut hit = false;
    for _ in 0..300 {
        if engine.tick().boundary_hits.contains(&0) {
            hit = true;
            break;
        }
    }
    assert!(hit, "robot never reached the wall");

    let body = engine.world().body(engine.robot(0).unwrap().body()).unwrap();
    let velocity = *body.linvel();
    assert!(velocity.norm() > 0.1);
    assert_same_heading(body.rotation().angle(), velocity.y.atan2(velocity.x));
    assert_eq!(body.angvel(), 0.0);
}

#[test]
fn test_robot_rebounds_into_arena() {
    let mut engine = engine(&["reverser", "idle"]);

    let mut hit_at = None;
    for _ in 0..300 {
        if engine.tick().boundary_hits.contains(&0) {
            hit_at = Some(engine.tick_count());
            break;
        }
    }
    assert!(hit_at.is_some(), "robot never reached the wall");

    for _ in 0..40 {
        engine.tick();
    }

    let robot = engine.robot(0).unwrap();
    let body = engine.world().body(robot.body()).unwrap();
    assert!(body.linvel().x > 0.0, "robot still heading into the wall");
    let x = robot.context().x().value();
    assert!(x > ROBOT_HALF_EXTENT && x < ARENA_WIDTH - ROBOT_HALF_EXTENT);
}

#[test]
fn test_cruiser_reaches_commanded_speed() {
    let mut engine = engine(&["cruiser", "idle"]);

    let mut last_x = engine.robot(0).unwrap().context().x().value();
    for _ in 0..80 {
        engine.tick();
        let x = engine.robot(0).unwrap().context().x().value();
        assert!(x > last_x, "x went from {} to {}", last_x, x);
        last_x = x;
    }

    let robot = engine.robot(0).unwrap();
    let body = engine.world().body(robot.body()).unwrap();
    assert!((body.linvel().norm() - CRUISE).abs() < 0.5);
    assert_relative_eq!(robot.context().y().value(), 10.0, epsilon = 1e-3);
    assert_same_heading(robot.context().rotation().value(), 0.0);
}

#[test]
fn test_context_lags_body_by_publication_only() {
    let mut engine = engine(&["cruiser", "idle"]);
    for _ in 0..10 {
        engine.tick();
        let robot = engine.robot(0).unwrap();
        let pose = engine.world().body_pose(robot.body()).unwrap();
        assert_eq!(robot.context().x().value(), pose.translation.x);
        assert_eq!(robot.context().y().value(), pose.translation.y);
    }
}

#[test]
fn test_stationary_robots_do_not_drift() {
    let mut engine = engine(&["idle", "idle"]);
    let start: Vec<_> = engine
        .robots()
        .iter()
        .map(|r| engine.world().body_pose(r.body()).unwrap())
        .collect();

    for _ in 0..120 {
        engine.tick();
    }

    for (robot, before) in engine.robots().iter().zip(&start) {
        let after = engine.world().body_pose(robot.body()).unwrap();
        assert_relative_eq!(after.translation.x, before.translation.x, epsilon = 1e-6);
        assert_relative_eq!(after.translation.y, before.translation.y, epsilon = 1e-6);
        assert_eq!(robot.last_force().norm(), 0.0);
    }
}

#[test]
fn test_drive_force_never_exceeds_limit() {
    let mut engine = engine(&["cruiser", "reverser", "idle"]);

    for tick in 1..=200u64 {
        engine.tick();
        for robot in engine.robots() {
            let mass = engine.world().body(robot.body()).unwrap().mass();
            let limit = mass * robot.context().max_acceleration();
            let force = robot.last_force().norm();
            assert!(
                force <= limit * (1.0 + 1e-5),
                "tick {}: {} pushed with {} over limit {}",
                tick,
                robot.name(),
                force,
                limit
            );
        }
    }
}

#[test]
fn test_first_push_is_saturated() {
    let mut engine = engine(&["cruiser", "idle"]);
    engine.tick();

    let robot = engine.robot(0).unwrap();
    let mass = engine.world().body(robot.body()).unwrap().mass();
    assert_relative_eq!(mass, 1.0, epsilon = 1e-5);
    assert_relative_eq!(robot.last_force().x, 10.0, epsilon = 1e-4);
    assert_relative_eq!(robot.last_force().y, 0.0, epsilon = 1e-4);
}

#[test]
fn test_head_on_robots_stop_spinning() {
    let mut engine = engine(&["cruiser", "reverser"]);

    let mut contact = false;
    for _ in 0..300 {
        if engine.tick().robot_contacts.contains(&(0, 1)) {
            contact = true;
            break;
        }
    }
    assert!(contact, "robots never met");

    for robot in engine.robots() {
        assert_eq!(engine.world().body(robot.body()).unwrap().angvel(), 0.0);
    }
}
