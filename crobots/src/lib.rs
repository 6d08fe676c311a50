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
//! # CRobots
//!
//! A robot-battle arena. Pluggable decision logic, loaded from shared
//! libraries, steers box-shaped robots around a walled square while a
//! rigid-body simulation moves them.
//!
//! ## Features
//!
//! - **Plugin robots**: robot modules export one factory, loaded once per
//!   name and cached ([`plugins`])
//! - **Shared context**: robots read their pose and write a desired speed and
//!   heading through a [`RobotContext`] ([`context`])
//! - **Deterministic ticks**: decide, control, integrate, respond, publish
//!   ([`engine`])
//! - **Typed units**: meters, feet, radians and degrees never mix
//!   silently ([`units`])
//!
//! ## Example
//!
//! ```rust
//! use crobots::context::SharedContext;
//! use crobots::engine::{Engine, EngineParams};
//! use crobots::plugins::{Robot, RobotRegistry, StaticLoader};
//! use crobots::units::MetersPerSecond;
//!
//! struct Cruiser(SharedContext);
//!
//! impl Robot for Cruiser {
//!     fn update(&mut self) {
//!         self.0.set_speed(MetersPerSecond::new(4.0));
//!     }
//! }
//!
//! fn new_cruiser(context: SharedContext) -> Option<Box<dyn Robot>> {
//!     Some(Box::new(Cruiser(context)))
//! }
//!
//! let loader = StaticLoader::new().with("cruiser", new_cruiser);
//! let params = EngineParams::new(["cruiser", "cruiser"]);
//! let mut engine = Engine::init(&params, RobotRegistry::new(loader)).unwrap();
//! engine.tick();
//! assert_eq!(engine.tick_count(), 1);
//! ```

#![warn(missing_docs)]

/// Robot state shared between the engine and robot logic
pub mod context;

/// Simulation engine and physics world
pub mod engine;

/// Error types
pub mod error;

/// Robot plugin system
pub mod plugins;

/// Typed physical units
pub mod units;

pub use context::{RobotContext, SharedContext};
pub use engine::{Engine, EngineParams, TickReport};
pub use error::{ConfigError, InitError, LoadError};
pub use plugins::{Robot, RobotRegistry};
