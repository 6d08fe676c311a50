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
//! Physics world
//!
//! Thin owner of the rapier pipeline and sets. The engine is the only caller
//! that mutates it; renderers get read access through
//! [`Engine::world`](crate::engine::Engine::world).
//!
//! Body and collider handles are weak: a handle may refer to something that
//! has been removed, so every accessor returns an `Option`.

use crate::engine::events::{ContactEvent, ContactEventCollector};
use rapier2d::prelude::*;
use std::num::NonZeroUsize;

/// Solver iterations per step
pub const SOLVER_ITERATIONS: usize = 4;

/// Position and facing of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// Center of mass in world coordinates
    pub translation: Vector<Real>,
    /// Facing angle in radians, 0 along +x
    pub angle: Real,
}

/// Rigid-body world with zero gravity and a fixed step
pub struct PhysicsWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    events: ContactEventCollector,
}

impl PhysicsWorld {
    /// Create an empty world stepping by `timestep` seconds
    pub fn new(timestep: Real) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = timestep;
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(SOLVER_ITERATIONS).unwrap_or(NonZeroUsize::MIN);

        PhysicsWorld {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: Vector::zeros(),
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: ContactEventCollector::new(),
        }
    }

    /// Advance the simulation by exactly one fixed step
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.events,
        );
    }

    /// Contact events reported since the last call
    pub fn drain_events(&mut self) -> Vec<ContactEvent> {
        self.events.drain()
    }

    /// Insert a body and attach `collider` to it
    ///
    /// Mass properties are recomputed right away so the body's mass is valid
    /// before the first step.
    pub fn insert_body(
        &mut self,
        body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body_handle = self.bodies.insert(body);
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);
        if let Some(body) = self.bodies.get_mut(body_handle) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }
        (body_handle, collider_handle)
    }

    /// Remove a body together with its colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Step length in seconds
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    /// Global gravity, always zero for the arena
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Every rigid body
    pub fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    /// Every collider
    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    /// Body by handle
    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub(crate) fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Body a collider is attached to, if both still exist
    pub fn collider_body(&self, handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders
            .get(handle)
            .and_then(Collider::parent)
            .filter(|body| self.bodies.contains(*body))
    }

    /// Check that a collider handle still refers to a live collider
    pub fn is_collider_valid(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains(handle)
    }

    /// Current pose of a body
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<BodyPose> {
        self.bodies.get(handle).map(|body| BodyPose {
            translation: *body.translation(),
            angle: body.rotation().angle(),
        })
    }

    #[cfg(feature = "debug-render")]
    pub(crate) fn debug_parts(
        &self,
    ) -> (
        &RigidBodySet,
        &ColliderSet,
        &ImpulseJointSet,
        &MultibodyJointSet,
        &NarrowPhase,
    ) {
        (
            &self.bodies,
            &self.colliders,
            &self.impulse_joints,
            &self.multibody_joints,
            &self.narrow_phase,
        )
    }
}
