// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The renderer: one fixed set of parameters, one arithmetic backend,
//! and the two tiled passes that turn them into an image.

use num::Complex;
use num_cpus;
use std::path::Path;

use arithmetic::Arithmetic;
use colorize::SmoothColorizer;
use error::{finite, positive, RenderError};
use escape::{evaluate, EscapeTest, ManVal};
use palette::Palette;
use planes::PlaneMapper;
use ppm;
use store::{allocate, PixelStore};
use tiles::{fill_tiles, TileGrid};

/// What to render.  Immutable for the life of a renderer; a new view
/// means a new renderer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration budget per pixel.
    pub max_iterations: u32,
    /// Half-width of the sampled window on the complex plane.
    pub zoom: f64,
    /// Center of the window.
    pub center: Complex<f64>,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            width: 100,
            height: 100,
            max_iterations: 100,
            zoom: 2.0,
            center: Complex::new(0.0, 0.0),
        }
    }
}

impl RenderParams {
    /// Checks the preconditions the tiling and mapping arithmetic
    /// depend on.
    pub fn validate(&self) -> Result<(), RenderError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("iterations", self.max_iterations as usize)?;
        finite("zoom", self.zoom)?;
        if !(self.zoom > 0.0) {
            return Err(RenderError::NonPositive {
                name: "zoom",
                value: self.zoom.to_string(),
            });
        }
        finite("center real part", self.center.re)?;
        finite("center imaginary part", self.center.im)?;
        Ok(())
    }
}

/// How to render: tiling, threading and the escape rule.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Tiles per axis for the generation pass.
    pub generate_tiles: usize,
    /// Tiles per axis for the color pass.
    pub colorize_tiles: usize,
    /// Upper bound on worker threads per pass.
    pub workers: usize,
    /// The escape rule.
    pub escape: EscapeTest,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            generate_tiles: 2,
            colorize_tiles: 4,
            workers: num_cpus::get(),
            escape: EscapeTest::default(),
        }
    }
}

impl RenderOptions {
    /// Rejects zero tile or worker counts.
    pub fn validate(&self) -> Result<(), RenderError> {
        positive("generation tile count", self.generate_tiles)?;
        positive("color tile count", self.colorize_tiles)?;
        positive("worker count", self.workers)?;
        Ok(())
    }
}

/// Renders one view of the Mandelbrot set with backend `B`.
#[derive(Debug)]
pub struct MandelbrotRenderer<'p, B: Arithmetic> {
    params: RenderParams,
    options: RenderOptions,
    backend: B,
    plane: PlaneMapper,
    palette: &'p Palette,
    store: PixelStore<B::Real>,
}

impl<B: Arithmetic> MandelbrotRenderer<'static, B> {
    /// Validates everything up front; a renderer that exists can
    /// always run its passes.  Colors come from the built-in gradient.
    pub fn new(params: RenderParams, backend: B, options: RenderOptions) -> Result<Self, RenderError> {
        params.validate()?;
        options.validate()?;
        Ok(MandelbrotRenderer {
            plane: PlaneMapper::from_params(&params)?,
            store: PixelStore::new(params.width, params.height)?,
            params,
            options,
            backend,
            palette: Palette::gradient(),
        })
    }
}

impl<'p, B: Arithmetic> MandelbrotRenderer<'p, B> {
    /// The same renderer drawing from another palette.
    pub fn with_palette<'q>(self, palette: &'q Palette) -> MandelbrotRenderer<'q, B> {
        MandelbrotRenderer {
            params: self.params,
            options: self.options,
            backend: self.backend,
            plane: self.plane,
            palette,
            store: self.store,
        }
    }

    /// The parameters this renderer was built with.
    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// The tiling and threading options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The arithmetic backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fills a fresh raw buffer with one escape-time sample per pixel.
    pub fn generate(&mut self) -> Result<(), RenderError> {
        info!(
            "Rendering {}x{} with {} iterations, {} arithmetic ({} bits)",
            self.params.width,
            self.params.height,
            self.params.max_iterations,
            self.backend.name(),
            self.backend.precision_bits()
        );
        info!(
            "Zoom: {} Center: {},{}",
            self.params.zoom, self.params.center.re, self.params.center.im
        );

        let grid = TileGrid::new(
            self.params.width,
            self.params.height,
            self.options.generate_tiles,
        )?;
        let zero = self.backend.from_f64(0.0);
        let mut raw = allocate("raw", self.plane.len(), ManVal::new(zero.clone(), zero, 0))?;

        let backend = &self.backend;
        let plane = &self.plane;
        let max_iterations = self.params.max_iterations;
        let escape = self.options.escape;
        fill_tiles(
            &mut raw,
            &grid,
            1,
            self.options.workers,
            "generate",
            |pixel, cell| {
                let (re, im) = plane.pixel_to_point_in(backend, &pixel);
                cell[0] = evaluate(backend, re, im, max_iterations, escape);
            },
        )?;

        self.store.set_raw(raw)
    }

    /// Fills a fresh RGB buffer from the raw buffer.  `generate` must
    /// have run.
    pub fn color(&mut self) -> Result<(), RenderError> {
        let grid = TileGrid::new(
            self.params.width,
            self.params.height,
            self.options.colorize_tiles,
        )?;
        let mut rgb = allocate("rgb", self.plane.len() * 3, 0u8)?;
        {
            let raw = self.store.raw()?;
            let backend = &self.backend;
            let colorizer = SmoothColorizer::new(self.palette);
            let width = self.params.width;
            fill_tiles(
                &mut rgb,
                &grid,
                3,
                self.options.workers,
                "color",
                |pixel, cells| {
                    let sample = &raw[pixel.0 + pixel.1 * width];
                    cells.copy_from_slice(&colorizer.colorize_sample(backend, sample).to_bytes());
                },
            )?;
        }
        self.store.set_rgb(rgb)
    }

    /// Both passes, in order.
    pub fn render(&mut self) -> Result<(), RenderError> {
        self.generate()?;
        self.color()
    }

    /// The buffers.
    pub fn store(&self) -> &PixelStore<B::Real> {
        &self.store
    }

    /// A copy of every raw sample.
    pub fn clone_data(&self) -> Result<Vec<ManVal<B::Real>>, RenderError> {
        self.store.clone_data()
    }

    /// A copy of every iteration count.
    pub fn clone_iteration_data(&self) -> Result<Vec<u32>, RenderError> {
        self.store.clone_iteration_data()
    }

    /// A copy of every final real part.
    pub fn clone_real_data(&self) -> Result<Vec<B::Real>, RenderError> {
        self.store.clone_real_data()
    }

    /// A copy of every final imaginary part.
    pub fn clone_imaginary_data(&self) -> Result<Vec<B::Real>, RenderError> {
        self.store.clone_imaginary_data()
    }

    /// A copy of the RGB image.
    pub fn clone_rgb(&self) -> Result<Vec<u8>, RenderError> {
        self.store.clone_rgb()
    }

    /// Writes the RGB image as a binary PPM.
    pub fn export_ppm<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        ppm::export_ppm(path, self.params.width, self.params.height, self.store.rgb()?)
    }

    /// Writes the RGB image, as PNG if the file name ends in `.png` and
    /// as PPM otherwise.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let is_png = path
            .as_ref()
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            ppm::save_png(path, self.params.width, self.params.height, self.store.rgb()?)
        } else {
            self.export_ppm(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arithmetic::FixedPrecision;

    fn small() -> RenderParams {
        RenderParams {
            width: 4,
            height: 4,
            max_iterations: 10,
            zoom: 2.0,
            center: Complex::new(0.0, 0.0),
        }
    }

    #[test]
    fn bad_params_are_fatal() {
        let options = RenderOptions::default();
        for params in &[
            RenderParams { width: 0, ..small() },
            RenderParams { height: 0, ..small() },
            RenderParams { max_iterations: 0, ..small() },
            RenderParams { zoom: 0.0, ..small() },
            RenderParams { zoom: -1.0, ..small() },
            RenderParams { zoom: std::f64::NAN, ..small() },
            RenderParams {
                center: Complex::new(std::f64::INFINITY, 0.0),
                ..small()
            },
        ] {
            assert!(MandelbrotRenderer::new(*params, FixedPrecision, options).is_err());
        }
    }

    #[test]
    fn bad_options_are_fatal() {
        for options in &[
            RenderOptions { generate_tiles: 0, ..RenderOptions::default() },
            RenderOptions { colorize_tiles: 0, ..RenderOptions::default() },
            RenderOptions { workers: 0, ..RenderOptions::default() },
        ] {
            assert!(MandelbrotRenderer::new(small(), FixedPrecision, *options).is_err());
        }
    }

    #[test]
    fn color_requires_generate() {
        let mut r = MandelbrotRenderer::new(small(), FixedPrecision, RenderOptions::default()).unwrap();
        match r.color() {
            Err(RenderError::PassMissing { pass }) => assert_eq!(pass, "generate"),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(r.clone_rgb().is_err());
    }

    #[test]
    fn the_corner_escapes_and_the_center_does_not() {
        let mut r = MandelbrotRenderer::new(small(), FixedPrecision, RenderOptions::default()).unwrap();
        r.render().unwrap();
        let data = r.clone_data().unwrap();
        assert_eq!(data[0].iterations, 0);
        assert_eq!(data[2 + 2 * 4], ManVal::new(0.0, 0.0, 10));
        assert_eq!(r.clone_rgb().unwrap().len(), 4 * 4 * 3);
    }

    #[test]
    fn regenerating_invalidates_the_image() {
        let mut r = MandelbrotRenderer::new(small(), FixedPrecision, RenderOptions::default()).unwrap();
        r.render().unwrap();
        r.generate().unwrap();
        assert!(r.clone_rgb().is_err());
        r.color().unwrap();
        assert!(r.clone_rgb().is_ok());
    }

    #[test]
    fn custom_palettes_are_used() {
        let text = vec!["FF0000"; 512].join(" ");
        let palette = Palette::from_hex(&text).unwrap();
        let mut r = MandelbrotRenderer::new(small(), FixedPrecision, RenderOptions::default())
            .unwrap()
            .with_palette(&palette);
        r.render().unwrap();
        let rgb = r.clone_rgb().unwrap();
        for pixel in rgb.chunks(3) {
            assert_eq!(pixel, &[0xFF, 0, 0][..]);
        }
    }
}
