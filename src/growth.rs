//! The radius growth law shared by [`Seed`](crate::seed::Seed) and
//! [`Bloom`](crate::bloom::Bloom)

use crate::Float;

/// Added to the growth velocity on every call to [`Swell::grow`]
const ACCELERATION: Float = 0.05;

/// A radius that grows with constant acceleration until it reaches its target
///
/// Growth is measured in calls, not in elapsed time: every call to [`grow`](Self::grow) is one
/// step. Once the target is reached the radius is clamped to it and never changes again.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Swell {
    r: Float,
    vr: Float,
    target: Float,
    active: bool,
}

impl Swell {
    pub fn new(target: Float) -> Self {
        Swell {
            r: 0.0,
            vr: 0.0,
            target,
            active: true,
        }
    }

    pub fn radius(&self) -> Float {
        self.r
    }

    pub fn target(&self) -> Float {
        self.target
    }

    /// Returns whether the radius is still growing
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advances the growth by one step
    pub fn grow(&mut self) {
        if !self.active {
            return;
        }

        self.vr += ACCELERATION;
        self.r += self.vr;
        if self.r > self.target {
            self.r = self.target;
            self.active = false;
        }
    }

    /// Multiplies the current radius by `s`, without affecting the target or the velocity
    pub fn scale(&mut self, s: Float) {
        self.r *= s;
    }
}
