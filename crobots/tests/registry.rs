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
//! Registry behavior through the public loader API

use crobots::context::{RobotContext, SharedContext};
use crobots::error::LoadError;
use crobots::plugins::{DynamicLibraryLoader, Robot, RobotRegistry, StaticLoader};
use crobots::units::MetersPerSecond;
use std::rc::Rc;

struct Cruiser {
    context: SharedContext,
}

impl Robot for Cruiser {
    fn update(&mut self) {
        self.context.set_speed(MetersPerSecond::new(2.0));
    }
}

fn new_cruiser(context: SharedContext) -> Option<Box<dyn Robot>> {
    Some(Box::new(Cruiser { context }))
}

fn new_nothing(_context: SharedContext) -> Option<Box<dyn Robot>> {
    None
}

fn registry() -> RobotRegistry<StaticLoader> {
    RobotRegistry::new(
        StaticLoader::new()
            .with("cruiser", new_cruiser)
            .with("broken", new_nothing),
    )
}

#[test]
fn test_same_name_loads_module_once() {
    let mut registry = registry();
    let first_context = RobotContext::shared();
    let second_context = RobotContext::shared();

    let mut first = registry.load("cruiser", &first_context).unwrap();
    let mut second = registry.load("cruiser", &second_context).unwrap();

    assert_eq!(registry.loader().open_count("cruiser"), 1);
    assert_eq!(registry.entry_count(), 1);

    // Each instance drives its own context
    first.update();
    assert_eq!(first_context.speed().value(), 2.0);
    assert_eq!(second_context.speed().value(), 0.0);
    second.update();
    assert_eq!(second_context.speed().value(), 2.0);

    assert_eq!(Rc::strong_count(&first_context), 2);
    assert_eq!(Rc::strong_count(&second_context), 2);
}

#[test]
fn test_unknown_name_is_module_not_found() {
    let mut registry = registry();
    let err = registry
        .load("nobody", &RobotContext::shared())
        .err()
        .unwrap();

    assert!(matches!(err, LoadError::ModuleNotFound { .. }));
    assert_eq!(err.name(), "nobody");
    assert!(!registry.is_loaded("nobody"));
}

#[test]
fn test_factory_returning_nothing_is_not_cached() {
    let mut registry = registry();
    let err = registry
        .load("broken", &RobotContext::shared())
        .err()
        .unwrap();

    assert!(matches!(err, LoadError::FactoryReturnedNull { .. }));
    assert_eq!(registry.entry_count(), 0);

    // A later load tries the module again
    let _ = registry.load("broken", &RobotContext::shared());
    assert_eq!(registry.loader().open_count("broken"), 2);
}

#[test]
fn test_failure_leaves_registry_usable() {
    let mut registry = registry();
    assert!(registry.load("nobody", &RobotContext::shared()).is_err());
    assert!(registry.load("cruiser", &RobotContext::shared()).is_ok());
    assert!(registry.is_loaded("cruiser"));
}

#[test]
fn test_destroy_unloads_everything() {
    let mut registry = registry();
    drop(registry.load("cruiser", &RobotContext::shared()).unwrap());
    registry.destroy();
    registry.destroy();
    assert_eq!(registry.entry_count(), 0);

    drop(registry.load("cruiser", &RobotContext::shared()).unwrap());
    assert_eq!(registry.loader().open_count("cruiser"), 2);
}

#[test]
fn test_missing_shared_library_reports_path() {
    let dir = std::env::temp_dir().join("crobots-no-such-robots");
    let mut registry = RobotRegistry::new(DynamicLibraryLoader::with_base_dir(&dir));
    let err = registry
        .load("ghost", &RobotContext::shared())
        .err()
        .unwrap();

    match err {
        LoadError::ModuleNotFound { name, path, .. } => {
            assert_eq!(name, "ghost");
            assert!(path.starts_with(&dir));
        }
        other => panic!("unexpected error: {}", other),
    }
}
