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
//! Robot decision interface and module entry points
//!
//! A robot module is a shared library built against this crate. It exports
//! one factory under [`NEW_ROBOT_SYMBOL`] with the [`NewRobotFn`] signature
//! and, when built with [`export_robot!`](crate::export_robot), the API
//! version it targets under [`API_VERSION_SYMBOL`].
//!
//! # Safety Contracts
//!
//! The boundary uses the Rust ABI, so a module must be compiled with the
//! same toolchain and the same `crobots` version as the host. Robots must:
//! - Return from [`Robot::update`] promptly. A call that never returns stalls
//!   the whole match; nothing interrupts it.
//! - Not panic across the boundary.
//! - Only touch the [`RobotContext`](crate::context::RobotContext) they were
//!   constructed with.
//!
//! Every robot instance must be dropped before the module that produced it is
//! unloaded, because its code and vtable live in that module. The engine and
//! registry guarantee this ordering.

use crate::context::SharedContext;

/// Version of the robot API
///
/// Format: MAJOR.MINOR.PATCH following semantic versioning.
pub const ROBOT_API_VERSION: &str = "0.3.0";

/// Exported factory symbol every robot module must provide
pub const NEW_ROBOT_SYMBOL: &str = "NewRobot";

/// Exported API version symbol, optional
pub const API_VERSION_SYMBOL: &str = "CROBOTS_API_VERSION";

/// Decision logic for one robot
///
/// The engine calls [`update`](Robot::update) once per tick, in registration
/// order, before any force is applied that tick. All input and output goes
/// through the shared context the robot received at construction.
pub trait Robot {
    /// Advance the robot's decision logic by one simulated tick
    fn update(&mut self);
}

/// Factory signature exported by robot modules
///
/// Receives the robot's context (the robot may keep the handle) and returns
/// the new robot, or `None` if it could not be built.
pub type NewRobotFn = fn(SharedContext) -> Option<Box<dyn Robot>>;

/// Export a robot type from a module
///
/// Takes a constructor `fn(SharedContext) -> T` where `T: Robot` and emits
/// the `NewRobot` factory and the `CROBOTS_API_VERSION` marker.
///
/// # Example
///
/// ```rust,ignore
/// use crobots::context::SharedContext;
/// use crobots::plugins::Robot;
/// use crobots::units::MetersPerSecond;
///
/// struct Cruiser {
///     context: SharedContext,
/// }
///
/// impl Cruiser {
///     fn new(context: SharedContext) -> Self {
///         Cruiser { context }
///     }
/// }
///
/// impl Robot for Cruiser {
///     fn update(&mut self) {
///         self.context.set_speed(MetersPerSecond::new(5.0));
///     }
/// }
///
/// crobots::export_robot!(Cruiser::new);
/// ```
#[macro_export]
macro_rules! export_robot {
    ($constructor:path) => {
        #[allow(non_snake_case)]
        #[no_mangle]
        pub fn NewRobot(
            context: $crate::context::SharedContext,
        ) -> ::core::option::Option<::std::boxed::Box<dyn $crate::plugins::Robot>> {
            ::core::option::Option::Some(::std::boxed::Box::new($constructor(context)))
        }

        #[no_mangle]
        pub static CROBOTS_API_VERSION: &str = $crate::plugins::ROBOT_API_VERSION;
    };
}
