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
//! Debug line output for renderers
//!
//! Available with the `debug-render` feature. Renders every collider and
//! contact of a [`PhysicsWorld`] into a flat line list that a renderer can
//! upload as-is.

use crate::engine::world::PhysicsWorld;
use rapier2d::prelude::*;

/// Line segment with an RGBA color (HSLA as produced by rapier)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    /// Segment start
    pub start: Point<Real>,
    /// Segment end
    pub end: Point<Real>,
    /// Color reported by the debug pipeline
    pub color: [f32; 4],
}

#[derive(Default)]
struct LineCollector {
    lines: Vec<DebugLine>,
}

impl DebugRenderBackend for LineCollector {
    fn draw_line(&mut self, _: DebugRenderObject, a: Point<Real>, b: Point<Real>, color: [f32; 4]) {
        self.lines.push(DebugLine {
            start: a,
            end: b,
            color,
        });
    }
}

impl PhysicsWorld {
    /// Debug geometry of the whole world
    pub fn debug_lines(&self) -> Vec<DebugLine> {
        let mut pipeline = DebugRenderPipeline::default();
        let mut backend = LineCollector::default();
        let (bodies, colliders, impulse_joints, multibody_joints, narrow_phase) =
            self.debug_parts();
        pipeline.render(
            &mut backend,
            bodies,
            colliders,
            impulse_joints,
            multibody_joints,
            narrow_phase,
        );
        backend.lines
    }
}
