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
//! Robot plugin system
//!
//! Robot decision logic is third-party code delivered as shared libraries.
//! This module defines the boundary between that code and the engine.
//!
//! # Pieces
//!
//! - [`Robot`]: the single capability a robot provides, advancing one tick
//! - [`NewRobotFn`] and [`export_robot!`](crate::export_robot): the factory
//!   a module exports and the macro that writes it
//! - [`ModuleLoader`] / [`RobotModule`]: where modules come from, either
//!   shared libraries ([`DynamicLibraryLoader`]) or in-process factories
//!   ([`StaticLoader`])
//! - [`RobotRegistry`]: loads each module once and hands out robots
//!
//! # Writing a robot module
//!
//! ```rust,ignore
//! use crobots::context::SharedContext;
//! use crobots::plugins::Robot;
//! use crobots::units::MetersPerSecond;
//!
//! pub struct Rammer {
//!     context: SharedContext,
//! }
//!
//! impl Rammer {
//!     pub fn new(context: SharedContext) -> Self {
//!         Rammer { context }
//!     }
//! }
//!
//! impl Robot for Rammer {
//!     fn update(&mut self) {
//!         self.context.set_speed(MetersPerSecond::new(8.0));
//!     }
//! }
//!
//! crobots::export_robot!(Rammer::new);
//! ```
//!
//! Build it as a `cdylib` and place `<name>.so` (`.dll`, `.dylib`) next to
//! the host executable or in `CROBOTS_ROBOT_DIR`.
//!
//! # Version Compatibility
//!
//! Modules built with `export_robot!` declare [`ROBOT_API_VERSION`]. The
//! registry rejects modules whose declared version is incompatible under
//! semantic versioning, and accepts undeclared ones with a warning.

pub mod api;
pub mod builtin;
pub mod loader;
pub mod registry;

pub use api::{
    NewRobotFn, Robot, API_VERSION_SYMBOL, NEW_ROBOT_SYMBOL, ROBOT_API_VERSION,
};
pub use builtin::{StaticLoader, StaticModule};
pub use loader::{module_path, DynamicLibraryLoader, DynamicModule, ModuleLoader, RobotModule};
pub use registry::RobotRegistry;
