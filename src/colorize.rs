// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smooth (continuous) iteration-count coloring.
//!
//! The discrete iteration count bands badly.  Refining it with how far
//! past the escape bound the final iterate landed,
//!
//! ```text
//! smoothed = log2(log2(|z|))
//! index    = floor(sqrt(iterations + 1 - smoothed) * 256) mod 512
//! ```
//!
//! gives a continuous value to look up in the palette.  The formula is
//! undefined for `|z| <= 1`, which the sum-proxy escape test and every
//! bounded point can produce.  In that case the smoothing term is
//! dropped and the plain count is used; a radicand that goes negative
//! is clamped to zero, and anything still not finite lands on entry 0.

use std::f64::consts::LN_2;

use arithmetic::Arithmetic;
use escape::ManVal;
use palette::{Color, Palette, PALETTE_SIZE};

/// Maps raw samples to colors.  Pure: the same input always produces
/// the same color, so workers share one colorizer without locking.
#[derive(Copy, Clone, Debug)]
pub struct SmoothColorizer<'a> {
    palette: &'a Palette,
}

impl<'a> SmoothColorizer<'a> {
    /// A colorizer drawing from `palette`.
    pub fn new(palette: &'a Palette) -> Self {
        SmoothColorizer { palette }
    }

    /// The fractional refinement of the iteration count, zero where
    /// the nested logarithm is undefined.
    pub fn smoothing(size: f64) -> f64 {
        if !(size > 1.0) || !size.is_finite() {
            return 0.0;
        }
        let one_over_ln2 = 1.0 / LN_2;
        (size.ln() * one_over_ln2).ln() * one_over_ln2
    }

    /// The palette entry for an iteration count and the magnitude of
    /// the final iterate.
    pub fn palette_index(iterations: u32, size: f64) -> usize {
        let radicand = f64::from(iterations) + 1.0 - SmoothColorizer::smoothing(size);
        let scaled = radicand.max(0.0).sqrt() * 256.0;
        if !scaled.is_finite() {
            return 0;
        }
        (scaled.floor() as u64 % PALETTE_SIZE as u64) as usize
    }

    /// The color for an iteration count and a final iterate given in
    /// doubles.
    pub fn colorize(&self, iterations: u32, real: f64, imag: f64) -> Color {
        let size = (real * real + imag * imag).sqrt();
        self.palette.get(SmoothColorizer::palette_index(iterations, size))
    }

    /// The color for a sample, with the magnitude taken in the
    /// sample's own arithmetic.
    pub fn colorize_sample<B: Arithmetic>(&self, backend: &B, sample: &ManVal<B::Real>) -> Color {
        let size = backend.magnitude(&sample.real, &sample.imag);
        self.palette
            .get(SmoothColorizer::palette_index(sample.iterations, size))
    }
}
