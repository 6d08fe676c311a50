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
//! Error types
//!
//! Failures are grouped by who can act on them: configuration mistakes are
//! caught before anything is built, module load failures name the robot that
//! could not be produced, and the engine's init error wraps either.

use std::path::PathBuf;
use thiserror::Error;

/// Why a named robot could not be produced by the registry
///
/// Each failure concerns one robot name only. The registry stays usable
/// and nothing is cached for the failed name except where noted.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The module file could not be opened
    #[error("failed to load robot module '{name}' from {}: {reason}", path.display())]
    ModuleNotFound {
        /// Requested robot name
        name: String,
        /// Path that was tried
        path: PathBuf,
        /// Platform loader message
        reason: String,
    },

    /// The module opened but does not export the required symbol
    #[error("failed to resolve '{symbol}' in robot module '{name}': {reason}")]
    SymbolNotFound {
        /// Requested robot name
        name: String,
        /// Symbol that was looked up
        symbol: &'static str,
        /// Platform loader message
        reason: String,
    },

    /// The module's factory produced no robot
    #[error("robot module '{name}' returned no robot from its factory")]
    FactoryReturnedNull {
        /// Requested robot name
        name: String,
    },

    /// The module was built against an incompatible robot API
    #[error("robot module '{name}' targets API {found}, engine provides {expected}")]
    IncompatibleApi {
        /// Requested robot name
        name: String,
        /// Version the module declares
        found: String,
        /// Version of this crate's robot API
        expected: &'static str,
    },
}

impl LoadError {
    /// Robot name the failure refers to
    pub fn name(&self) -> &str {
        match self {
            LoadError::ModuleNotFound { name, .. }
            | LoadError::SymbolNotFound { name, .. }
            | LoadError::FactoryReturnedNull { name }
            | LoadError::IncompatibleApi { name, .. } => name,
        }
    }
}

/// Invalid engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Robot count outside the supported range
    #[error("must have between {min} and {max} (inclusive) robots: {count}")]
    RobotCount {
        /// Number of robots requested
        count: usize,
        /// Smallest accepted count
        min: usize,
        /// Largest accepted count
        max: usize,
    },

    /// Timestep not a usable positive number
    #[error("timestep must be greater than zero and finite: {0}")]
    Timestep(f32),

    /// Configuration file could not be read
    #[error("failed to read engine configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON for [`EngineParams`](crate::engine::EngineParams)
    #[error("failed to parse engine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine initialization failure
///
/// No engine state survives a failed init.
#[derive(Debug, Error)]
pub enum InitError {
    /// Parameters were rejected before anything was loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One of the requested robots could not be loaded
    #[error("failed to load robot '{name}'")]
    Robot {
        /// Robot name from the parameters
        name: String,
        /// Underlying registry failure
        #[source]
        source: LoadError,
    },
}
