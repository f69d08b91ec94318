// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a square window on the complex plane, `zoom` wide on either
//! side of a center point.
use num::Complex;

use arithmetic::Arithmetic;
use error::RenderError;
use renderer::RenderParams;

/// Rescales `pixel`, which lies between `pixel_min` and `pixel_max`,
/// onto the range `plane_min` to `plane_max`.  `pixel_max` must differ
/// from `pixel_min`.
#[inline]
pub fn map_coordinate(
    pixel: f64,
    pixel_min: f64,
    pixel_max: f64,
    plane_min: f64,
    plane_max: f64,
) -> f64 {
    plane_min + (plane_max - plane_min) * (pixel - pixel_min) / (pixel_max - pixel_min)
}

/// The same rescale as `map_coordinate`, carried out in the backend's
/// own arithmetic.  Operation order matches, so the fixed backend
/// produces the same doubles.
fn map_coordinate_in<B: Arithmetic>(
    backend: &B,
    pixel: f64,
    pixel_max: f64,
    plane_min: f64,
    plane_max: f64,
) -> B::Real {
    let pixel_min = backend.from_f64(0.0);
    let plane_min = backend.from_f64(plane_min);
    let span = backend.sub(&backend.from_f64(plane_max), &plane_min);
    let offset = backend.sub(&backend.from_f64(pixel), &pixel_min);
    let extent = backend.sub(&backend.from_f64(pixel_max), &pixel_min);
    backend.add(
        &plane_min,
        &backend.div(&backend.mul(&span, &offset), &extent),
    )
}

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels on the integral plane to points on the complex plane.
/// The window is `2 * zoom` wide in both directions, so non-square
/// images are stretched rather than cropped.
#[derive(Clone, Debug)]
pub struct PlaneMapper {
    /// The right-lower hand corner of the integral cartesian plane.
    /// The left-upper is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// Half the width of the window on the complex plane.
    pub zoom: f64,
    /// The point the window is centered on.
    pub center: Complex<f64>,
}

impl PlaneMapper {
    /// Takes the pixel dimensions, the half-width of the complex window
    /// and its center.
    pub fn new(
        width: usize,
        height: usize,
        zoom: f64,
        center: Complex<f64>,
    ) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::NonPositive {
                name: "image size",
                value: format!("{}x{}", width, height),
            });
        }
        if !(zoom > 0.0) || !zoom.is_finite() {
            return Err(RenderError::NonPositive {
                name: "zoom",
                value: zoom.to_string(),
            });
        }
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            zoom,
            center,
        })
    }

    /// Builds the mapper for a set of render parameters.
    pub fn from_params(params: &RenderParams) -> Result<PlaneMapper, RenderError> {
        PlaneMapper::new(params.width, params.height, params.zoom, params.center)
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// The linear offset of a pixel from the root of a row-major buffer.
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.0 + pixel.1 * self.integral_plane.0
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// complex cartesian plane in double precision.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            map_coordinate(
                pixel.0 as f64,
                0.0,
                self.integral_plane.0 as f64,
                -self.zoom,
                self.zoom,
            ) + self.center.re,
            map_coordinate(
                pixel.1 as f64,
                0.0,
                self.integral_plane.1 as f64,
                -self.zoom,
                self.zoom,
            ) + self.center.im,
        )
    }

    /// Given a pixel, map it to the complex plane in the backend's
    /// arithmetic.  The offset from the center is computed at full
    /// backend precision before the center is added, which is what
    /// keeps neighbouring pixels apart at deep zoom.
    pub fn pixel_to_point_in<B: Arithmetic>(&self, backend: &B, pixel: &Pixel) -> (B::Real, B::Real) {
        let re = map_coordinate_in(
            backend,
            pixel.0 as f64,
            self.integral_plane.0 as f64,
            -self.zoom,
            self.zoom,
        );
        let im = map_coordinate_in(
            backend,
            pixel.1 as f64,
            self.integral_plane.1 as f64,
            -self.zoom,
            self.zoom,
        );
        (
            backend.add(&re, &backend.from_f64(self.center.re)),
            backend.add(&im, &backend.from_f64(self.center.im)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arithmetic::{ArbitraryPrecision, FixedPrecision};

    #[test]
    fn map_coordinate_is_an_affine_rescale() {
        assert_eq!(map_coordinate(0.0, 0.0, 4.0, -2.0, 2.0), -2.0);
        assert_eq!(map_coordinate(2.0, 0.0, 4.0, -2.0, 2.0), 0.0);
        assert_eq!(map_coordinate(4.0, 0.0, 4.0, -2.0, 2.0), 2.0);
        assert_eq!(map_coordinate(5.0, 0.0, 10.0, 0.0, 1.0), 0.5);
    }

    #[test]
    fn planemapper_fails_on_empty_plane() {
        assert!(PlaneMapper::new(0, 4, 2.0, Complex::new(0.0, 0.0)).is_err());
        assert!(PlaneMapper::new(4, 0, 2.0, Complex::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn planemapper_fails_on_bad_zoom() {
        assert!(PlaneMapper::new(4, 4, 0.0, Complex::new(0.0, 0.0)).is_err());
        assert!(PlaneMapper::new(4, 4, -1.0, Complex::new(0.0, 0.0)).is_err());
        assert!(PlaneMapper::new(4, 4, std::f64::NAN, Complex::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn pixel_to_point_on_centered_planes() {
        let pm = PlaneMapper::new(4, 4, 2.0, Complex::new(0.0, 0.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn pixel_to_point_on_offset_planes() {
        let pm = PlaneMapper::new(640, 480, 1.5, Complex::new(-0.5, 0.25)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(320, 240)), Complex::new(-0.5, 0.25));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -1.25));
    }

    #[test]
    fn offsets_are_row_major() {
        let pm = PlaneMapper::new(5, 3, 2.0, Complex::new(0.0, 0.0)).unwrap();
        assert_eq!(pm.offset(&Pixel(0, 0)), 0);
        assert_eq!(pm.offset(&Pixel(4, 0)), 4);
        assert_eq!(pm.offset(&Pixel(0, 1)), 5);
        assert_eq!(pm.offset(&Pixel(4, 2)), 14);
        assert_eq!(pm.len(), 15);
        assert!(!pm.is_empty());
    }

    #[test]
    fn fixed_backend_mapping_matches_double_mapping() {
        let pm = PlaneMapper::new(37, 23, 0.731, Complex::new(-0.743, 0.1127)).unwrap();
        for y in 0..23 {
            for x in 0..37 {
                let p = Pixel(x, y);
                let (re, im) = pm.pixel_to_point_in(&FixedPrecision, &p);
                assert_eq!(Complex::new(re, im), pm.pixel_to_point(&p));
            }
        }
    }

    #[test]
    fn arbitrary_backend_separates_pixels_at_deep_zoom() {
        let pm = PlaneMapper::new(8, 8, 1e-17, Complex::new(-0.75, 0.1)).unwrap();
        let fixed_left = pm.pixel_to_point(&Pixel(3, 0)).re;
        let fixed_right = pm.pixel_to_point(&Pixel(4, 0)).re;
        assert_eq!(fixed_left, fixed_right);

        let backend = ArbitraryPrecision::default();
        let (left, _) = pm.pixel_to_point_in(&backend, &Pixel(3, 0));
        let (right, _) = pm.pixel_to_point_in(&backend, &Pixel(4, 0));
        assert!(left < right);
    }
}
