// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error type shared by every stage of the renderer.  Nothing
//! here is retried: a render either has everything it needs or it
//! stops with one of these.

use image::ImageError;
use std::io;

/// Everything that can go wrong between reading the parameters and
/// writing the last byte of the image.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A dimension, iteration budget, tile count or similar value was
    /// zero or negative.
    #[fail(display = "{} must be positive, got {}", name, value)]
    NonPositive {
        /// The parameter that was rejected.
        name: &'static str,
        /// What was supplied, formatted for the message.
        value: String,
    },

    /// A floating point parameter was NaN or infinite.
    #[fail(display = "{} must be a finite number, got {}", name, value)]
    NotFinite {
        /// The parameter that was rejected.
        name: &'static str,
        /// What was supplied, formatted for the message.
        value: f64,
    },

    /// The image is too large to index with a single `usize`.
    #[fail(display = "an image of {}x{} pixels is too large to address", width, height)]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The allocator refused one of the pixel buffers.
    #[fail(display = "could not allocate the {} buffer ({} elements)", buffer, len)]
    Allocation {
        /// Which buffer, "raw" or "rgb".
        buffer: &'static str,
        /// Number of elements requested.
        len: usize,
    },

    /// A buffer was read before the pass that fills it had run.
    #[fail(display = "the {} pass has not been run", pass)]
    PassMissing {
        /// The pass that must run first.
        pass: &'static str,
    },

    /// One of the workers of a pass panicked; the buffer is unusable.
    #[fail(display = "a worker panicked during the {} pass", pass)]
    WorkerPanicked {
        /// The pass that was running.
        pass: &'static str,
    },

    /// An RGB buffer handed to an exporter does not match its dimensions.
    #[fail(display = "expected {} bytes of RGB data, got {}", expected, actual)]
    BufferSize {
        /// `width * height * 3`.
        expected: usize,
        /// The length actually supplied.
        actual: usize,
    },

    /// A gradient could not be decoded.
    #[fail(display = "invalid palette: {}", _0)]
    Palette(String),

    /// Reading a palette or writing an image failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),

    /// The image encoder rejected the buffer.
    #[fail(display = "image encoding failed: {}", _0)]
    Image(#[cause] ImageError),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<ImageError> for RenderError {
    fn from(err: ImageError) -> Self {
        RenderError::Image(err)
    }
}

/// Rejects zero for any of the unsigned sizing parameters.
pub fn positive(name: &'static str, value: usize) -> Result<usize, RenderError> {
    if value == 0 {
        return Err(RenderError::NonPositive {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Rejects NaN and the infinities.
pub fn finite(name: &'static str, value: f64) -> Result<f64, RenderError> {
    if !value.is_finite() {
        return Err(RenderError::NotFinite { name, value });
    }
    Ok(value)
}
