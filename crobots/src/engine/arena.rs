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
//! Arena layout
//!
//! The arena is a square `ARENA_WIDTH` on a side with its lower-left corner
//! at the origin. Its edge is one static closed polyline that is frictionless
//! and perfectly elastic, so robots bounce off it like bumper cars.

use crate::engine::world::PhysicsWorld;
use rapier2d::prelude::*;

/// Side length of the square arena in meters
pub const ARENA_WIDTH: Real = 20.0;

/// Half the side length of a robot's square body in meters
pub const ROBOT_HALF_EXTENT: Real = 0.5;

/// Contact force above which a touching pair counts as a hit
pub const HIT_FORCE_THRESHOLD: Real = 1.0e-3;

/// Spawn points, one per robot slot in registration order
///
/// Laid out on the quarter grid of the arena so that no two robot bodies
/// overlap at the start.
pub const SPAWN_POINTS: [[Real; 2]; 8] = [
    [ARENA_WIDTH / 4.0, ARENA_WIDTH / 2.0],
    [ARENA_WIDTH / 4.0 * 3.0, ARENA_WIDTH / 2.0],
    [ARENA_WIDTH / 2.0, ARENA_WIDTH / 4.0],
    [ARENA_WIDTH / 2.0, ARENA_WIDTH / 4.0 * 3.0],
    [ARENA_WIDTH / 4.0, ARENA_WIDTH / 4.0],
    [ARENA_WIDTH / 4.0 * 3.0, ARENA_WIDTH / 4.0],
    [ARENA_WIDTH / 4.0 * 3.0, ARENA_WIDTH / 4.0 * 3.0],
    [ARENA_WIDTH / 4.0, ARENA_WIDTH / 4.0 * 3.0],
];

/// Spawn point for robot slot `slot`, if the slot exists
pub fn spawn_point(slot: usize) -> Option<Vector<Real>> {
    SPAWN_POINTS.get(slot).map(|[x, y]| vector![*x, *y])
}

/// Add a robot body at `position`, facing +x
pub fn spawn_robot(
    world: &mut PhysicsWorld,
    position: Vector<Real>,
) -> (RigidBodyHandle, ColliderHandle) {
    let body = RigidBodyBuilder::dynamic()
        .translation(position)
        .rotation(0.0)
        .ccd_enabled(true)
        .build();
    let collider = ColliderBuilder::cuboid(ROBOT_HALF_EXTENT, ROBOT_HALF_EXTENT)
        .active_events(ActiveEvents::COLLISION_EVENTS | ActiveEvents::CONTACT_FORCE_EVENTS)
        .contact_force_event_threshold(HIT_FORCE_THRESHOLD)
        .build();
    world.insert_body(body, collider)
}

/// Add the closed boundary around a `width` x `width` arena
pub fn build_boundary(world: &mut PhysicsWorld, width: Real) -> (RigidBodyHandle, ColliderHandle) {
    let vertices = vec![
        point![0.0, 0.0],
        point![0.0, width],
        point![width, width],
        point![width, 0.0],
    ];
    let indices = vec![[0, 1], [1, 2], [2, 3], [3, 0]];

    let body = RigidBodyBuilder::fixed().translation(vector![0.0, 0.0]).build();
    let collider = ColliderBuilder::polyline(vertices, Some(indices))
        .friction(0.0)
        .friction_combine_rule(CoefficientCombineRule::Min)
        .restitution(1.0)
        .restitution_combine_rule(CoefficientCombineRule::Max)
        .active_events(ActiveEvents::COLLISION_EVENTS | ActiveEvents::CONTACT_FORCE_EVENTS)
        .contact_force_event_threshold(HIT_FORCE_THRESHOLD)
        .build();
    world.insert_body(body, collider)
}
