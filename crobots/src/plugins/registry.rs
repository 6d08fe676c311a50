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
//! Robot registry
//!
//! This module maps robot names to loaded modules, including:
//! - Loading each module at most once per registry
//! - Caching the resolved factory alongside the module that owns it
//! - API version checking against [`ROBOT_API_VERSION`]
//! - Unloading every module on [`destroy`](RobotRegistry::destroy)
//!
//! # Lifetime
//!
//! Robots created by the registry run code that lives inside the module.
//! Drop every robot obtained from [`load`](RobotRegistry::load) before
//! calling `destroy` or dropping the registry.

use crate::context::SharedContext;
use crate::error::LoadError;
use crate::plugins::api::{NewRobotFn, Robot, ROBOT_API_VERSION};
use crate::plugins::loader::{DynamicLibraryLoader, ModuleLoader, RobotModule};
use log::{debug, error, info, warn};
use semver::Version;
use std::collections::HashMap;
use std::rc::Rc;

/// Cached module and its resolved factory
struct RegistryEntry<M> {
    name: String,
    module: M,
    factory: NewRobotFn,
}

/// Registry of loaded robot modules
///
/// Owned by the engine. Entries are keyed by robot name; several robots with
/// the same name share one entry.
pub struct RobotRegistry<L: ModuleLoader = DynamicLibraryLoader> {
    loader: L,
    entries: HashMap<String, RegistryEntry<L::Module>>,
}

impl RobotRegistry<DynamicLibraryLoader> {
    /// Registry loading shared libraries next to the running executable,
    /// or from `CROBOTS_ROBOT_DIR` when set
    pub fn from_env() -> Self {
        RobotRegistry::new(DynamicLibraryLoader::from_env())
    }
}

impl<L: ModuleLoader> RobotRegistry<L> {
    /// Create an empty registry drawing modules from `loader`
    pub fn new(loader: L) -> Self {
        RobotRegistry {
            loader,
            entries: HashMap::new(),
        }
    }

    /// Produce a robot for `name` bound to `context`
    ///
    /// Opens the module on first use and caches it; later calls with the same
    /// name reuse the cached factory without reopening anything.
    ///
    /// # Errors
    ///
    /// - [`LoadError::ModuleNotFound`] if the module cannot be opened
    /// - [`LoadError::SymbolNotFound`] if it has no `NewRobot` export
    /// - [`LoadError::IncompatibleApi`] if it targets another robot API
    /// - [`LoadError::FactoryReturnedNull`] if the factory builds nothing
    ///
    /// On any error during a first load the module is unloaded again and
    /// nothing is cached.
    pub fn load(
        &mut self,
        name: &str,
        context: &SharedContext,
    ) -> Result<Box<dyn Robot>, LoadError> {
        if let Some(entry) = self.entries.get(name) {
            debug!("Reusing cached robot module '{}'", entry.name);
            return (entry.factory)(Rc::clone(context)).ok_or_else(|| {
                let err = LoadError::FactoryReturnedNull {
                    name: name.to_string(),
                };
                error!("{}", err);
                err
            });
        }

        let module = self.loader.open(name).map_err(|e| {
            error!("{}", e);
            e
        })?;

        // Any early return below drops `module`, which unloads it
        let factory = module.factory().map_err(|e| {
            error!("{}", e);
            e
        })?;

        match module.api_version() {
            Some(found) if !is_version_compatible(&found, ROBOT_API_VERSION) => {
                let err = LoadError::IncompatibleApi {
                    name: name.to_string(),
                    found,
                    expected: ROBOT_API_VERSION,
                };
                error!("{}", err);
                return Err(err);
            }
            Some(_) => {}
            None => warn!(
                "Robot module '{}' does not declare an API version, assuming {}",
                name, ROBOT_API_VERSION
            ),
        }

        let robot = factory(Rc::clone(context)).ok_or_else(|| {
            let err = LoadError::FactoryReturnedNull {
                name: name.to_string(),
            };
            error!("{}", err);
            err
        })?;

        info!("Loaded robot module '{}'", name);
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                name: name.to_string(),
                module,
                factory,
            },
        );
        Ok(robot)
    }

    /// Unload every cached module
    ///
    /// Every robot from this registry must already be dropped.
    pub fn destroy(&mut self) {
        for (name, entry) in self.entries.drain() {
            debug!("Unloading robot module '{}'", name);
            drop(entry.module);
        }
    }

    /// Check whether a module for `name` is cached
    pub fn is_loaded(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of cached modules
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Names of cached modules, in no particular order
    pub fn loaded_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Loader backing this registry
    pub fn loader(&self) -> &L {
        &self.loader
    }
}

/// Check if a module API version is compatible with the engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match (breaking changes)
/// - For major version >= 1, minor version can be less than or equal
/// - Patch version is ignored
fn is_version_compatible(module_version: &str, engine_version: &str) -> bool {
    let module_ver = match Version::parse(module_version) {
        Ok(v) => v,
        Err(_) => return false,
    };
    let engine_ver = match Version::parse(engine_version) {
        Ok(v) => v,
        Err(_) => return false,
    };

    if module_ver.major != engine_ver.major {
        return false;
    }

    if module_ver.major != 0 {
        module_ver.minor <= engine_ver.minor
    } else {
        module_ver.minor == engine_ver.minor
    }
}
