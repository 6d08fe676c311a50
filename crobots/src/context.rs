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
//! Robot context shared between the engine and a robot module
//!
//! A [`RobotContext`] is the only state a robot's decision logic can see or
//! change. The engine creates it before asking a module for a robot, hands a
//! clone of the [`SharedContext`] to the module's factory, and keeps its own
//! clone in the robot record for the lifetime of the match.
//!
//! # Access discipline
//!
//! The cells are not locked. Writers are separated in time instead:
//!
//! - the robot writes speed and steering only inside [`Robot::update`]
//!   (tick phase 1)
//! - the engine writes pose and time only after the physics step (tick
//!   phase 5)
//!
//! Heat and damage are reserved for weapons. No engine phase writes them yet,
//! so they read as zero for the whole match.
//!
//! Both halves run on the engine's thread, one after the other, so no reader
//! ever observes a half-written record. Any scheduler that runs robots
//! concurrently has to keep that ordering.
//!
//! [`Robot::update`]: crate::plugins::Robot::update

use crate::units::{Meters, MetersPerSecond, Radians, Seconds};
use std::cell::Cell;
use std::rc::Rc;

/// Maximum acceleration given to every robot unless stated otherwise, in m/s²
pub const DEFAULT_MAX_ACCELERATION: f32 = 10.0;

/// Reference-counted handle to a robot context
///
/// Robot modules may hold this for as long as their robot lives.
pub type SharedContext = Rc<RobotContext>;

/// State record bridging the engine and one robot's decision logic
#[derive(Debug)]
pub struct RobotContext {
    x: Cell<Meters>,
    y: Cell<Meters>,
    rotation: Cell<Radians>,
    time: Cell<Seconds>,
    heat: Cell<f32>,
    damage: Cell<f32>,
    speed: Cell<MetersPerSecond>,
    steer: Cell<Option<Radians>>,
    max_acceleration: f32,
}

impl RobotContext {
    /// Create a context with the default maximum acceleration
    pub fn new() -> Self {
        Self::with_max_acceleration(DEFAULT_MAX_ACCELERATION)
    }

    /// Create a context whose robot can accelerate at most `max_acceleration` m/s²
    pub fn with_max_acceleration(max_acceleration: f32) -> Self {
        RobotContext {
            x: Cell::new(Meters::default()),
            y: Cell::new(Meters::default()),
            rotation: Cell::new(Radians::default()),
            time: Cell::new(Seconds::default()),
            heat: Cell::new(0.0),
            damage: Cell::new(0.0),
            speed: Cell::new(MetersPerSecond::default()),
            steer: Cell::new(None),
            max_acceleration,
        }
    }

    /// Create a shared handle to a fresh default context
    pub fn shared() -> SharedContext {
        Rc::new(Self::new())
    }

    /// X coordinate published at the end of the previous tick
    pub fn x(&self) -> Meters {
        self.x.get()
    }

    /// Y coordinate published at the end of the previous tick
    pub fn y(&self) -> Meters {
        self.y.get()
    }

    /// Both coordinates as a pair
    pub fn position(&self) -> (Meters, Meters) {
        (self.x.get(), self.y.get())
    }

    /// Facing of the robot's body published at the end of the previous tick
    pub fn rotation(&self) -> Radians {
        self.rotation.get()
    }

    /// Simulated time elapsed since the match started
    pub fn time(&self) -> Seconds {
        self.time.get()
    }

    /// Current heat level, zero until weapons exist
    pub fn heat(&self) -> f32 {
        self.heat.get()
    }

    /// Current accumulated damage, zero until weapons exist
    pub fn damage(&self) -> f32 {
        self.damage.get()
    }

    /// Speed the robot last commanded
    pub fn speed(&self) -> MetersPerSecond {
        self.speed.get()
    }

    /// Largest acceleration the robot's drive can produce
    pub fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }

    /// Command a new forward speed
    ///
    /// The engine drives toward it with a force-limited controller, so the
    /// body reaches it over several ticks rather than immediately.
    pub fn set_speed(&self, speed: MetersPerSecond) {
        self.speed.set(speed);
    }

    /// Request the body to turn to `rotation` before the next integration step
    ///
    /// The published [`rotation`](Self::rotation) only reflects the turn once
    /// the engine has applied it and published the pose again.
    pub fn set_rotation(&self, rotation: Radians) {
        self.steer.set(Some(rotation));
    }

    /// Steering request pending for the current tick, if any
    pub fn pending_rotation(&self) -> Option<Radians> {
        self.steer.get()
    }

    pub(crate) fn take_steer(&self) -> Option<Radians> {
        self.steer.take()
    }

    pub(crate) fn publish_pose(&self, x: Meters, y: Meters, rotation: Radians) {
        self.x.set(x);
        self.y.set(y);
        self.rotation.set(rotation);
    }

    pub(crate) fn publish_time(&self, time: Seconds) {
        self.time.set(time);
    }
}

impl Default for RobotContext {
    fn default() -> Self {
        Self::new()
    }
}
