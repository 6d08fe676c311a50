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
//! Unit-safe scalar types
//!
//! Every quantity that crosses the robot boundary carries its unit in its
//! type. Each distance and angle has exactly two representations, and moving
//! between them is an explicit `From` conversion with a fixed constant.
//! There is no construction from a bare `f32` other than `new`, and no
//! arithmetic: robot code converts, reads the magnitude, and works with that.
//!
//! ```
//! use crobots::units::{Degrees, Feet, Meters, Radians};
//!
//! let width = Meters::new(20.0);
//! let in_feet = Feet::from(width);
//! assert!((in_feet.value() - 65.6168).abs() < 1e-3);
//!
//! let quarter = Radians::from(Degrees::new(90.0));
//! assert!((quarter.value() - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
//! ```

/// Meters per foot
pub const METERS_PER_FOOT: f32 = 0.3048;

/// Feet per meter
pub const FEET_PER_METER: f32 = 3.28084;

/// Degrees per radian
pub const DEGREES_PER_RADIAN: f32 = 57.2958;

/// Radians per degree
pub const RADIANS_PER_DEGREE: f32 = 0.0174533;

macro_rules! scalar_unit {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
        pub struct $name(f32);

        impl $name {
            /// Wrap a raw magnitude already expressed in this unit
            pub const fn new(value: f32) -> Self {
                $name(value)
            }

            /// Raw magnitude in this unit
            pub const fn value(self) -> f32 {
                self.0
            }
        }
    };
}

scalar_unit!(
    /// Distance in meters, the world unit of the arena
    Meters
);

scalar_unit!(
    /// Distance in feet
    Feet
);

scalar_unit!(
    /// Angle in radians, the unit used by the physics world
    Radians
);

scalar_unit!(
    /// Angle in degrees
    Degrees
);

scalar_unit!(
    /// Speed in the world unit per second
    MetersPerSecond
);

scalar_unit!(
    /// Simulated time
    Seconds
);

impl From<Feet> for Meters {
    fn from(feet: Feet) -> Self {
        Meters(feet.0 * METERS_PER_FOOT)
    }
}

impl From<Meters> for Feet {
    fn from(meters: Meters) -> Self {
        Feet(meters.0 * FEET_PER_METER)
    }
}

impl From<Degrees> for Radians {
    fn from(degrees: Degrees) -> Self {
        Radians(degrees.0 * RADIANS_PER_DEGREE)
    }
}

impl From<Radians> for Degrees {
    fn from(radians: Radians) -> Self {
        Degrees(radians.0 * DEGREES_PER_RADIAN)
    }
}
