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
//! Contact event collection
//!
//! The physics pipeline reports contacts through an [`EventHandler`] during
//! the step. The collector buffers them so the engine can respond after the
//! step, when every body has its post-solve velocity.

use rapier2d::prelude::{
    ColliderHandle, ColliderSet, CollisionEvent, ContactPair, EventHandler, Real, RigidBodySet,
};
use std::sync::{Mutex, PoisonError};

/// Contact occurrence between two colliders in one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// The colliders started touching
    Began(ColliderHandle, ColliderHandle),
    /// The solver pushed the colliders apart with a nonzero force
    Hit {
        /// First collider
        a: ColliderHandle,
        /// Second collider
        b: ColliderHandle,
        /// Total contact force magnitude over the step
        force: Real,
    },
    /// The colliders stopped touching
    Ended {
        /// First collider
        a: ColliderHandle,
        /// Second collider
        b: ColliderHandle,
        /// One of the colliders was removed from the world
        removed: bool,
    },
}

impl ContactEvent {
    /// Both colliders involved
    pub fn colliders(&self) -> (ColliderHandle, ColliderHandle) {
        match *self {
            ContactEvent::Began(a, b) => (a, b),
            ContactEvent::Hit { a, b, .. } => (a, b),
            ContactEvent::Ended { a, b, .. } => (a, b),
        }
    }
}

/// Event handler buffering contacts until the engine drains them
#[derive(Debug, Default)]
pub struct ContactEventCollector {
    events: Mutex<Vec<ContactEvent>>,
}

impl ContactEventCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every event recorded since the last drain, in emission order
    pub fn drain(&mut self) -> Vec<ContactEvent> {
        let events = self
            .events
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(events)
    }

    fn push(&self, event: ContactEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl EventHandler for ContactEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            CollisionEvent::Started(h1, h2, _) => self.push(ContactEvent::Began(h1, h2)),
            CollisionEvent::Stopped(h1, h2, flags) => self.push(ContactEvent::Ended {
                a: h1,
                b: h2,
                removed: flags.contains(rapier2d::prelude::CollisionEventFlags::REMOVED),
            }),
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        contact_pair: &ContactPair,
        total_force_magnitude: Real,
    ) {
        self.push(ContactEvent::Hit {
            a: contact_pair.collider1,
            b: contact_pair.collider2,
            force: total_force_magnitude,
        });
    }
}
