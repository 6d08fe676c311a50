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
//! Engine configuration
//!
//! Parameters come from the host (a CLI, a config file, a test) and are
//! checked once, before the engine loads or builds anything.
//!
//! ```
//! use crobots::engine::EngineParams;
//!
//! let params = EngineParams::from_json_str(r#"{ "robots": ["tank", "rammer"] }"#).unwrap();
//! assert_eq!(params.timestep, 0.016);
//! assert!(params.validate().is_ok());
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fewest robots a match accepts
pub const MIN_ROBOTS: usize = 2;

/// Most robots a match accepts, one per spawn point
pub const MAX_ROBOTS: usize = 8;

/// Timestep used when none is given, in seconds
pub const DEFAULT_TIMESTEP: f32 = 0.016;

/// Configuration consumed by [`Engine::init`](crate::engine::Engine::init)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Robot names in registration order
    pub robots: Vec<String>,
    /// Fixed simulation step in seconds
    pub timestep: f32,
}

impl Default for EngineParams {
    fn default() -> Self {
        EngineParams {
            robots: Vec::new(),
            timestep: DEFAULT_TIMESTEP,
        }
    }
}

impl EngineParams {
    /// Parameters for `robots` with the default timestep
    pub fn new<I, S>(robots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EngineParams {
            robots: robots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Replace the timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Parse parameters from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON parameter file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check robot count and timestep
    ///
    /// # Errors
    ///
    /// - [`ConfigError::RobotCount`] unless 2 to 8 robots are named
    /// - [`ConfigError::Timestep`] unless the timestep is finite and larger
    ///   than `f32::EPSILON`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.robots.len();
        if !(MIN_ROBOTS..=MAX_ROBOTS).contains(&count) {
            return Err(ConfigError::RobotCount {
                count,
                min: MIN_ROBOTS,
                max: MAX_ROBOTS,
            });
        }
        if !self.timestep.is_finite() || self.timestep < f32::EPSILON {
            return Err(ConfigError::Timestep(self.timestep));
        }
        Ok(())
    }
}
