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
//! Drive controller
//!
//! Robots do not set their velocity. Each tick the engine compares the
//! velocity a robot asked for (its facing times its commanded speed) with
//! what the body is actually doing and pushes with a proportional force,
//! capped by what the robot's drive can deliver. Collisions stay entirely
//! in the hands of the physics solver.

use rapier2d::prelude::{Real, Rotation, Vector};

/// Newtons per (m/s) of velocity error
pub const PROPORTIONAL_GAIN: Real = 5.0;

/// Velocity a body facing `rotation` should have at `speed`
pub fn desired_velocity(rotation: &Rotation<Real>, speed: Real) -> Vector<Real> {
    Vector::new(rotation.cos_angle(), rotation.sin_angle()) * speed
}

/// Force steering `velocity` toward the desired velocity
///
/// The result is `PROPORTIONAL_GAIN * (desired - velocity)` scaled down, if
/// needed, so its magnitude never exceeds `mass * max_acceleration`. A
/// non-positive or non-finite limit yields no force at all.
pub fn corrective_force(
    rotation: &Rotation<Real>,
    speed: Real,
    velocity: &Vector<Real>,
    mass: Real,
    max_acceleration: Real,
) -> Vector<Real> {
    let error = desired_velocity(rotation, speed) - velocity;
    let force = error * PROPORTIONAL_GAIN;
    clamp_magnitude(force, mass * max_acceleration)
}

/// Scale `force` so its length is at most `max_force`
pub fn clamp_magnitude(force: Vector<Real>, max_force: Real) -> Vector<Real> {
    if !max_force.is_finite() || max_force <= 0.0 || !force.iter().all(|c| c.is_finite()) {
        return Vector::zeros();
    }
    let magnitude = force.norm();
    if magnitude > max_force {
        force * (max_force / magnitude)
    } else {
        force
    }
}
