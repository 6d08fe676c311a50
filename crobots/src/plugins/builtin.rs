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
//! In-process robot modules
//!
//! [`StaticLoader`] serves factories that are compiled into the host instead
//! of living in shared libraries. It follows the same contract as the dynamic
//! loader (unknown names fail with [`LoadError::ModuleNotFound`]) and counts
//! how many times a module was opened, which makes registry caching visible.

use crate::error::LoadError;
use crate::plugins::api::NewRobotFn;
use crate::plugins::loader::{ModuleLoader, RobotModule};
use std::collections::HashMap;
use std::path::PathBuf;

/// Loader for robots registered in-process by name
#[derive(Debug, Default, Clone)]
pub struct StaticLoader {
    factories: HashMap<String, NewRobotFn>,
    opened: HashMap<String, usize>,
}

impl StaticLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`
    ///
    /// # Returns
    ///
    /// Err if a factory with the same name is already registered.
    pub fn register(&mut self, name: &str, factory: NewRobotFn) -> Result<(), String> {
        if self.factories.contains_key(name) {
            return Err(format!("Robot '{}' is already registered", name));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Builder form of [`register`](Self::register) that replaces duplicates
    pub fn with(mut self, name: &str, factory: NewRobotFn) -> Self {
        self.factories.insert(name.to_string(), factory);
        self
    }

    /// Number of successful opens of `name`
    pub fn open_count(&self, name: &str) -> usize {
        self.opened.get(name).copied().unwrap_or(0)
    }

    /// Number of successful opens across all names
    pub fn total_opens(&self) -> usize {
        self.opened.values().sum()
    }

    /// Number of registered factories
    pub fn robot_count(&self) -> usize {
        self.factories.len()
    }
}

impl ModuleLoader for StaticLoader {
    type Module = StaticModule;

    fn open(&mut self, name: &str) -> Result<StaticModule, LoadError> {
        let factory = *self
            .factories
            .get(name)
            .ok_or_else(|| LoadError::ModuleNotFound {
                name: name.to_string(),
                path: PathBuf::from(name),
                reason: "no built-in robot with this name".to_string(),
            })?;
        *self.opened.entry(name.to_string()).or_insert(0) += 1;
        Ok(StaticModule { factory })
    }
}

/// Module handed out by [`StaticLoader`]
#[derive(Debug, Clone, Copy)]
pub struct StaticModule {
    factory: NewRobotFn,
}

impl RobotModule for StaticModule {
    fn factory(&self) -> Result<NewRobotFn, LoadError> {
        Ok(self.factory)
    }

    fn api_version(&self) -> Option<String> {
        Some(crate::plugins::ROBOT_API_VERSION.to_string())
    }
}
