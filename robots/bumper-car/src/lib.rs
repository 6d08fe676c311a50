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
//! Bumper car robot
//!
//! Drives straight ahead at full speed. The engine turns it along its rebound
//! velocity whenever it hits the arena wall, so it ricochets around forever.

use crobots::context::SharedContext;
use crobots::plugins::Robot;
use crobots::units::MetersPerSecond;

/// Cruising speed
const SPEED: MetersPerSecond = MetersPerSecond::new(10.0);

/// Robot that only ever asks for full speed
pub struct BumperCar {
    context: SharedContext,
}

impl BumperCar {
    /// Build a bumper car driving through `context`
    pub fn new(context: SharedContext) -> Self {
        BumperCar { context }
    }
}

impl Robot for BumperCar {
    fn update(&mut self) {
        self.context.set_speed(SPEED);
    }
}

crobots::export_robot!(BumperCar::new);
