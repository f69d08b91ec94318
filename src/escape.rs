// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator: iterate `z ← z² + c` from `z = c` until
//! the value runs away or the iteration budget is spent.

use std::str::FromStr;

use arithmetic::Arithmetic;

/// The state a pixel's evaluation stopped in: the last iterate, and
/// the iteration at which it stopped.
#[derive(Clone, Debug, PartialEq)]
pub struct ManVal<R> {
    /// Real part of the final iterate.
    pub real: R,
    /// Imaginary part of the final iterate.
    pub imag: R,
    /// Zero-based iteration at which escape was seen, or the budget if
    /// the point never escaped.
    pub iterations: u32,
}

impl<R> ManVal<R> {
    /// Bundles a final iterate with its iteration count.
    pub fn new(real: R, imag: R, iterations: u32) -> Self {
        ManVal {
            real,
            imag,
            iterations,
        }
    }
}

/// How the evaluator decides that a point has run away.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EscapeTest {
    /// `|re + im| > 2`.  Cheap, and not the true modulus bound; it
    /// gives the rendered set its characteristic shape, so it is the
    /// default.
    SumProxy,
    /// `re² + im² > 4`, the textbook bound.
    Modulus,
}

impl Default for EscapeTest {
    fn default() -> Self {
        EscapeTest::SumProxy
    }
}

impl FromStr for EscapeTest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(EscapeTest::SumProxy),
            "modulus" => Ok(EscapeTest::Modulus),
            _ => Err(format!("Unknown escape test '{}', expected sum or modulus", s)),
        }
    }
}

/// Runs the quadratic recurrence for the point `(c_re, c_im)` for at
/// most `max_iterations` steps.  Always terminates; the returned
/// iteration count never exceeds `max_iterations`.
pub fn evaluate<B: Arithmetic>(
    backend: &B,
    c_re: B::Real,
    c_im: B::Real,
    max_iterations: u32,
    escape: EscapeTest,
) -> ManVal<B::Real> {
    let two = backend.from_f64(2.0);
    let bound = match escape {
        EscapeTest::SumProxy => backend.from_f64(2.0),
        EscapeTest::Modulus => backend.from_f64(4.0),
    };

    let mut re = c_re.clone();
    let mut im = c_im.clone();

    for n in 0..max_iterations {
        let next_re = backend.sub(&backend.mul(&re, &re), &backend.mul(&im, &im));
        let next_im = backend.mul(&backend.mul(&two, &re), &im);
        re = backend.add(&c_re, &next_re);
        im = backend.add(&c_im, &next_im);

        let escaped = match escape {
            EscapeTest::SumProxy => backend.abs(&backend.add(&re, &im)) > bound,
            EscapeTest::Modulus => {
                backend.add(&backend.mul(&re, &re), &backend.mul(&im, &im)) > bound
            }
        };
        if escaped {
            return ManVal::new(re, im, n);
        }
    }

    ManVal::new(re, im, max_iterations)
}
