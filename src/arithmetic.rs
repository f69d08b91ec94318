// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arithmetic backends.
//!
//! The escape-time loop is written once, against the `Arithmetic`
//! trait, and instantiated for each backend at compile time.  The
//! fixed backend is plain `f64`; it is fast, but once the zoom drops
//! to around 1e-15 of the center's magnitude neighbouring pixels
//! collapse onto the same double and the boundary turns to mush.  The
//! arbitrary backend carries a configurable number of mantissa bits
//! through the same loop and pushes that floor out as far as you are
//! willing to pay for.

use dashu_base::Abs;
use dashu_float::ops::SquareRoot;
use dashu_float::FBig;
use std::convert::TryFrom;
use std::fmt::Debug;

use error::RenderError;

/// Mantissa width used by the arbitrary backend when none is given.
pub const DEFAULT_PRECISION_BITS: usize = 128;

/// The operation set the evaluator and colorizer need.  Operations
/// take references so that heap-backed reals are not cloned on every
/// step; every value returned is a fresh, owned register.
pub trait Arithmetic: Clone + Send + Sync + Debug {
    /// The real number representation.
    type Real: Clone + PartialOrd + Send + Sync + Debug;

    /// Short name for logs and the command line.
    fn name(&self) -> &'static str;

    /// Bits of mantissa carried by every value.
    fn precision_bits(&self) -> usize;

    /// Lifts a double into the backend.
    fn from_f64(&self, value: f64) -> Self::Real;

    /// Lowers a value to a double, for display and coloring.
    fn to_f64(&self, value: &Self::Real) -> f64;

    /// `a + b`
    fn add(&self, a: &Self::Real, b: &Self::Real) -> Self::Real;

    /// `a - b`
    fn sub(&self, a: &Self::Real, b: &Self::Real) -> Self::Real;

    /// `a * b`
    fn mul(&self, a: &Self::Real, b: &Self::Real) -> Self::Real;

    /// `a / b`
    fn div(&self, a: &Self::Real, b: &Self::Real) -> Self::Real;

    /// `|a|`
    fn abs(&self, a: &Self::Real) -> Self::Real;

    /// `sqrt(re² + im²)`, computed in the backend and lowered to a
    /// double.
    fn magnitude(&self, re: &Self::Real, im: &Self::Real) -> f64;
}

/// Native double precision.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FixedPrecision;

impl Arithmetic for FixedPrecision {
    type Real = f64;

    fn name(&self) -> &'static str {
        "fixed"
    }

    fn precision_bits(&self) -> usize {
        53
    }

    #[inline]
    fn from_f64(&self, value: f64) -> f64 {
        value
    }

    #[inline]
    fn to_f64(&self, value: &f64) -> f64 {
        *value
    }

    #[inline]
    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    #[inline]
    fn sub(&self, a: &f64, b: &f64) -> f64 {
        a - b
    }

    #[inline]
    fn mul(&self, a: &f64, b: &f64) -> f64 {
        a * b
    }

    #[inline]
    fn div(&self, a: &f64, b: &f64) -> f64 {
        a / b
    }

    #[inline]
    fn abs(&self, a: &f64) -> f64 {
        a.abs()
    }

    #[inline]
    fn magnitude(&self, re: &f64, im: &f64) -> f64 {
        (re * re + im * im).sqrt()
    }
}

/// Binary floating point with a configurable mantissa, backed by
/// `dashu_float::FBig`.  Results are rounded toward zero to the
/// precision of their operands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArbitraryPrecision {
    precision_bits: usize,
}

impl ArbitraryPrecision {
    /// A backend carrying `precision_bits` bits of mantissa.
    pub fn new(precision_bits: usize) -> Result<Self, RenderError> {
        if precision_bits == 0 {
            return Err(RenderError::NonPositive {
                name: "precision bits",
                value: precision_bits.to_string(),
            });
        }
        Ok(ArbitraryPrecision { precision_bits })
    }
}

impl Default for ArbitraryPrecision {
    fn default() -> Self {
        ArbitraryPrecision {
            precision_bits: DEFAULT_PRECISION_BITS,
        }
    }
}

impl Arithmetic for ArbitraryPrecision {
    type Real = FBig;

    fn name(&self) -> &'static str {
        "arbitrary"
    }

    fn precision_bits(&self) -> usize {
        self.precision_bits
    }

    fn from_f64(&self, value: f64) -> FBig {
        // Zero and non-finite input both come out as a zero that still
        // carries the working precision.
        FBig::try_from(value)
            .unwrap_or(FBig::ZERO)
            .with_precision(self.precision_bits)
            .value()
    }

    fn to_f64(&self, value: &FBig) -> f64 {
        value.to_f64().value()
    }

    fn add(&self, a: &FBig, b: &FBig) -> FBig {
        a + b
    }

    fn sub(&self, a: &FBig, b: &FBig) -> FBig {
        a - b
    }

    fn mul(&self, a: &FBig, b: &FBig) -> FBig {
        a * b
    }

    fn div(&self, a: &FBig, b: &FBig) -> FBig {
        a / b
    }

    fn abs(&self, a: &FBig) -> FBig {
        a.clone().abs()
    }

    fn magnitude(&self, re: &FBig, im: &FBig) -> f64 {
        let norm = re * re + im * im;
        norm.sqrt().to_f64().value()
    }
}
