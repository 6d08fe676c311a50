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
//! Arena simulation
//!
//! The [`Engine`] drives a square, walled arena of box-shaped robots through
//! a zero-gravity rigid-body world ([`PhysicsWorld`], backed by rapier2d).
//!
//! # Example
//!
//! Cargo builds the `bumper-car` module as `libbumper_car.so` (`.dylib` on
//! macOS, `bumper_car.dll` on Windows). Robot names map to file names without
//! a prefix, so copy it to `bumper_car.so` in the robot directory first.
//!
//! ```rust,no_run
//! use crobots::engine::{Engine, EngineParams};
//!
//! let params = EngineParams::new(["bumper_car", "bumper_car"]);
//! let mut engine = Engine::from_env(&params)?;
//! for _ in 0..600 {
//!     engine.tick();
//! }
//! # Ok::<(), crobots::error::InitError>(())
//! ```

pub mod arena;
pub mod control;
#[cfg(feature = "debug-render")]
pub mod debug;
pub mod events;
pub mod params;
pub mod simulation;
pub mod world;

pub use arena::{ARENA_WIDTH, ROBOT_HALF_EXTENT, SPAWN_POINTS};
pub use control::{corrective_force, PROPORTIONAL_GAIN};
#[cfg(feature = "debug-render")]
pub use debug::DebugLine;
pub use events::ContactEvent;
pub use params::{EngineParams, DEFAULT_TIMESTEP, MAX_ROBOTS, MIN_ROBOTS};
pub use simulation::{Engine, Projectile, RobotRecord, TickReport};
pub use world::{BodyPose, PhysicsWorld, SOLVER_ITERATIONS};
