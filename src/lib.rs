#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! Every pixel of the image is mapped to a point `c` on the complex
//! plane, and `z ← z² + c` is iterated from `z = c` until `z` runs
//! away or the iteration budget is spent.  The iteration at which it
//! ran away, refined by how far it had run, picks a color out of a
//! 512-entry gradient.
//!
//! Rendering happens in two passes over a tiled image.  The generation
//! pass fills a raw buffer with one escape-time sample per pixel; the
//! color pass turns that buffer into interleaved RGB bytes.  Each pass
//! splits the image into rectangles, hands them to scoped worker
//! threads that own their rectangle's cells outright, and joins every
//! worker before returning.
//!
//! The arithmetic is pluggable at compile time.  Doubles are fast but
//! run out of resolution around a zoom of 1e-15; the arbitrary
//! precision backend runs the very same loop on `dashu` floats with as
//! many mantissa bits as you ask for.
//!
//! ```no_run
//! use mandelplus::{FixedPrecision, MandelbrotRenderer, RenderOptions, RenderParams};
//!
//! let params = RenderParams { width: 800, height: 800, ..RenderParams::default() };
//! let mut renderer = MandelbrotRenderer::new(params, FixedPrecision, RenderOptions::default())?;
//! renderer.render()?;
//! renderer.export_ppm("export.ppm")?;
//! # Ok::<(), mandelplus::RenderError>(())
//! ```

extern crate crossbeam;
extern crate dashu_base;
extern crate dashu_float;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod arithmetic;
pub mod colorize;
pub mod error;
pub mod escape;
pub mod palette;
pub mod planes;
pub mod ppm;
pub mod renderer;
pub mod store;
pub mod tiles;
pub mod zoom;

pub use arithmetic::{ArbitraryPrecision, Arithmetic, FixedPrecision};
pub use colorize::SmoothColorizer;
pub use error::RenderError;
pub use escape::{evaluate, EscapeTest, ManVal};
pub use palette::{Color, Palette};
pub use planes::{map_coordinate, Pixel, PlaneMapper};
pub use renderer::{MandelbrotRenderer, RenderOptions, RenderParams};
pub use store::PixelStore;
pub use tiles::{Tile, TileGrid};
pub use zoom::ZoomSequence;
