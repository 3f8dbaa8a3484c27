// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Given a point `c` on the complex plane,
//! repeatedly square `z` and add `c`, counting how many steps it takes
//! for `z` to leave the circle of radius 2.  A point that is still
//! inside after the full budget is presumed to belong to the set.

use num::Complex;

/// Magnitude beyond which an orbit is considered to have escaped.
pub const BAILOUT_RADIUS: f64 = 2.0;

const BAILOUT_SQR: f64 = BAILOUT_RADIUS * BAILOUT_RADIUS;

/// The result of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// Number of iterations performed before the loop stopped.
    pub count: u64,
    /// The last value of `z`.  Some color schemes use it to smooth
    /// out the banding of the raw count.
    pub z: Complex<f64>,
}

impl Escape {
    /// True if the orbit never escaped within `max_iterations`.
    #[inline]
    pub fn is_member(&self, max_iterations: u64) -> bool {
        self.count == max_iterations
    }
}

/// A family of escape-time fractals.  The generator only depends on
/// this, so a new family is a new implementation, not a new generator.
pub trait EscapeTime: Sync {
    /// Iterate `c` at most `max_iterations` times.
    fn compute(&self, c: Complex<f64>, max_iterations: u64) -> Escape;
}

/// The Mandelbrot set: `z <- z*z + c`, starting at zero.
#[derive(Copy, Clone, Debug, Default)]
pub struct Mandelbrot;

impl EscapeTime for Mandelbrot {
    #[inline]
    fn compute(&self, c: Complex<f64>, max_iterations: u64) -> Escape {
        iterate(c, max_iterations)
    }
}

/// This is our classic iterator function.  Stops when the budget is
/// spent or `|z| >= 2`.  Orbits that blow up to infinity or NaN stop
/// on their own: infinity fails the `< 4` test on the next pass, and
/// so does NaN.
#[inline]
pub fn iterate(c: Complex<f64>, max_iterations: u64) -> Escape {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut count = 0;
    while count < max_iterations && z.norm_sqr() < BAILOUT_SQR {
        z = z * z + c;
        count += 1;
    }
    Escape { count, z }
}
