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
//! Module loaders
//!
//! A [`ModuleLoader`] turns a robot name into an opened [`RobotModule`].
//! The registry only talks to these traits, which keeps the unsafe
//! dynamic-library work in [`DynamicLibraryLoader`] and lets in-process
//! robots ([`StaticLoader`](crate::plugins::StaticLoader)) and test doubles
//! go through exactly the same caching and failure paths.
//!
//! # Environment Configuration
//!
//! Set `CROBOTS_ROBOT_DIR` to look for robot modules somewhere other than the
//! directory of the running executable:
//! ```bash
//! export CROBOTS_ROBOT_DIR=/path/to/robots
//! ```

use crate::error::LoadError;
use crate::plugins::api::{NewRobotFn, API_VERSION_SYMBOL, NEW_ROBOT_SYMBOL};
use libloading::Library;
use log::{debug, warn};
use std::env::consts::DLL_SUFFIX;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the robot module directory
pub const ROBOT_DIR_ENV: &str = "CROBOTS_ROBOT_DIR";

/// An opened robot module
///
/// Dropping the module unloads it.
pub trait RobotModule {
    /// Resolve the module's `NewRobot` factory
    fn factory(&self) -> Result<NewRobotFn, LoadError>;

    /// API version the module declares, if it declares one
    fn api_version(&self) -> Option<String> {
        None
    }
}

/// Source of robot modules
pub trait ModuleLoader {
    /// Module type produced by this loader
    type Module: RobotModule;

    /// Open the module backing `name`
    fn open(&mut self, name: &str) -> Result<Self::Module, LoadError>;
}

/// Build the path of the module for `name` under `base_dir`
///
/// The platform library suffix (`.so`, `.dll` or `.dylib`) is appended to the
/// name as given; no `lib` prefix is added.
pub fn module_path(base_dir: &Path, name: &str) -> PathBuf {
    let mut file_name = OsString::from(name);
    file_name.push(DLL_SUFFIX);
    base_dir.join(file_name)
}

/// Loads robot modules from shared libraries on disk
#[derive(Debug, Clone)]
pub struct DynamicLibraryLoader {
    base_dir: PathBuf,
}

impl DynamicLibraryLoader {
    /// Loader rooted at the running executable's directory
    ///
    /// Falls back to the working directory if the executable path cannot be
    /// determined.
    pub fn new() -> Self {
        let base_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        DynamicLibraryLoader { base_dir }
    }

    /// Loader rooted at `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        DynamicLibraryLoader {
            base_dir: base_dir.into(),
        }
    }

    /// Loader rooted at `CROBOTS_ROBOT_DIR` if set, otherwise as [`new`](Self::new)
    pub fn from_env() -> Self {
        match std::env::var_os(ROBOT_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::with_base_dir(dir),
            _ => Self::new(),
        }
    }

    /// Directory modules are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for DynamicLibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader for DynamicLibraryLoader {
    type Module = DynamicModule;

    fn open(&mut self, name: &str) -> Result<DynamicModule, LoadError> {
        let path = module_path(&self.base_dir, name);
        debug!("Opening robot module {}", path.display());

        // SAFETY: loading runs the module's initializers. Robot modules are
        // trusted to be built against this crate with the same toolchain.
        let library = unsafe { Library::new(&path) }.map_err(|e| LoadError::ModuleNotFound {
            name: name.to_string(),
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(DynamicModule {
            name: name.to_string(),
            library,
        })
    }
}

/// Shared library opened by [`DynamicLibraryLoader`]
#[derive(Debug)]
pub struct DynamicModule {
    name: String,
    library: Library,
}

impl DynamicModule {
    /// Unload the library now, reporting the platform error if any
    pub fn close(self) -> Result<(), libloading::Error> {
        self.library.close()
    }
}

impl RobotModule for DynamicModule {
    fn factory(&self) -> Result<NewRobotFn, LoadError> {
        // SAFETY: the symbol is declared with the `NewRobotFn` signature by
        // `export_robot!`. The returned pointer is only called while the
        // registry keeps this library loaded.
        let symbol = unsafe { self.library.get::<NewRobotFn>(NEW_ROBOT_SYMBOL.as_bytes()) };
        match symbol {
            Ok(symbol) => Ok(*symbol),
            Err(e) => Err(LoadError::SymbolNotFound {
                name: self.name.clone(),
                symbol: NEW_ROBOT_SYMBOL,
                reason: e.to_string(),
            }),
        }
    }

    fn api_version(&self) -> Option<String> {
        // SAFETY: `export_robot!` declares this symbol as `static &str`.
        let symbol = unsafe {
            self.library
                .get::<*const &'static str>(API_VERSION_SYMBOL.as_bytes())
        };
        match symbol {
            Ok(symbol) => {
                let version: *const &'static str = *symbol;
                if version.is_null() {
                    warn!("Robot module '{}' exports a null API version", self.name);
                    return None;
                }
                // SAFETY: non-null and pointing into the still loaded library
                Some(unsafe { (*version).to_string() })
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_appends_platform_suffix() {
        let path = module_path(Path::new("/opt/arena"), "tank");
        let expected = format!("tank{}", DLL_SUFFIX);
        assert_eq!(path, Path::new("/opt/arena").join(expected));
    }

    #[test]
    fn test_module_path_keeps_dotted_names() {
        let path = module_path(Path::new("robots"), "tank.v2");
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("tank.v2{}", DLL_SUFFIX)
        );
    }

    #[test]
    fn test_missing_module_is_reported() {
        let dir = std::env::temp_dir().join("crobots-no-such-dir");
        let mut loader = DynamicLibraryLoader::with_base_dir(&dir);
        assert_eq!(loader.base_dir(), dir.as_path());

        match loader.open("definitely_not_a_robot") {
            Err(LoadError::ModuleNotFound { name, path, reason }) => {
                assert_eq!(name, "definitely_not_a_robot");
                assert_eq!(path, module_path(&dir, "definitely_not_a_robot"));
                assert!(!reason.is_empty());
            }
            other => panic!("expected ModuleNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_default_base_dir_is_absolute_or_dot() {
        let loader = DynamicLibraryLoader::new();
        let base = loader.base_dir();
        assert!(base.is_absolute() || base == Path::new("."));
    }
}
