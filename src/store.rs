// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel store: the raw escape-time samples and the RGB image
//! derived from them, both flat and row-major (`x + y * width`).

use error::RenderError;
use escape::ManVal;

/// Allocates a buffer of `len` copies of `fill`, surfacing allocator
/// refusal instead of aborting.
pub fn allocate<T: Clone>(buffer: &'static str, len: usize, fill: T) -> Result<Vec<T>, RenderError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| RenderError::Allocation { buffer, len })?;
    v.resize(len, fill);
    Ok(v)
}

/// Owns one render's buffers.  The RGB buffer only ever describes the
/// raw buffer currently held: storing new raw samples discards it.
#[derive(Clone, Debug)]
pub struct PixelStore<R> {
    width: usize,
    height: usize,
    raw: Option<Vec<ManVal<R>>>,
    rgb: Option<Vec<u8>>,
}

impl<R: Clone> PixelStore<R> {
    /// An empty store for a `width × height` image.  Fails if the RGB
    /// buffer's length would not fit in a `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(RenderError::TooLarge { width, height })?;
        Ok(PixelStore {
            width,
            height,
            raw: None,
            rgb: None,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True before the first generation pass.
    pub fn is_empty(&self) -> bool {
        self.raw.is_none()
    }

    /// Replaces the raw samples.  The old raw buffer and any RGB image
    /// made from it are dropped.
    pub fn set_raw(&mut self, raw: Vec<ManVal<R>>) -> Result<(), RenderError> {
        if raw.len() != self.len() {
            return Err(RenderError::BufferSize {
                expected: self.len(),
                actual: raw.len(),
            });
        }
        self.rgb = None;
        self.raw = Some(raw);
        Ok(())
    }

    /// Replaces the RGB image.  Requires raw samples to color from.
    pub fn set_rgb(&mut self, rgb: Vec<u8>) -> Result<(), RenderError> {
        self.raw()?;
        if rgb.len() != self.len() * 3 {
            return Err(RenderError::BufferSize {
                expected: self.len() * 3,
                actual: rgb.len(),
            });
        }
        self.rgb = Some(rgb);
        Ok(())
    }

    /// The raw samples, borrowed.
    pub fn raw(&self) -> Result<&[ManVal<R>], RenderError> {
        self.raw
            .as_ref()
            .map(|v| v.as_slice())
            .ok_or(RenderError::PassMissing { pass: "generate" })
    }

    /// The RGB image, borrowed, for display and export.
    pub fn rgb(&self) -> Result<&[u8], RenderError> {
        self.rgb
            .as_ref()
            .map(|v| v.as_slice())
            .ok_or(RenderError::PassMissing { pass: "color" })
    }

    /// An independent copy of the raw samples.
    pub fn clone_data(&self) -> Result<Vec<ManVal<R>>, RenderError> {
        Ok(self.raw()?.to_vec())
    }

    /// Iteration counts only.
    pub fn clone_iteration_data(&self) -> Result<Vec<u32>, RenderError> {
        Ok(self.raw()?.iter().map(|v| v.iterations).collect())
    }

    /// Real parts of the final iterates only.
    pub fn clone_real_data(&self) -> Result<Vec<R>, RenderError> {
        Ok(self.raw()?.iter().map(|v| v.real.clone()).collect())
    }

    /// Imaginary parts of the final iterates only.
    pub fn clone_imaginary_data(&self) -> Result<Vec<R>, RenderError> {
        Ok(self.raw()?.iter().map(|v| v.imag.clone()).collect())
    }

    /// An independent copy of the RGB image.
    pub fn clone_rgb(&self) -> Result<Vec<u8>, RenderError> {
        Ok(self.rgb()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<ManVal<f64>> {
        vec![
            ManVal::new(0.5, -0.5, 3),
            ManVal::new(1.5, 2.5, 0),
            ManVal::new(-2.0, 6.0, 10),
            ManVal::new(0.0, 0.0, 10),
        ]
    }

    #[test]
    fn accessors_fail_before_their_pass() {
        let store: PixelStore<f64> = PixelStore::new(2, 2).unwrap();
        assert!(store.is_empty());
        assert!(store.clone_data().is_err());
        assert!(store.clone_rgb().is_err());
    }

    #[test]
    fn component_accessors_split_the_samples() {
        let mut store = PixelStore::new(2, 2).unwrap();
        store.set_raw(samples()).unwrap();
        assert_eq!(store.clone_iteration_data().unwrap(), vec![3, 0, 10, 10]);
        assert_eq!(store.clone_real_data().unwrap(), vec![0.5, 1.5, -2.0, 0.0]);
        assert_eq!(store.clone_imaginary_data().unwrap(), vec![-0.5, 2.5, 6.0, 0.0]);
        assert_eq!(store.clone_data().unwrap(), samples());
    }

    #[test]
    fn clones_are_independent() {
        let mut store = PixelStore::new(2, 2).unwrap();
        store.set_raw(samples()).unwrap();
        store.set_rgb(vec![7; 12]).unwrap();
        let mut rgb = store.clone_rgb().unwrap();
        rgb[0] = 0;
        assert_eq!(store.rgb().unwrap()[0], 7);
    }

    #[test]
    fn new_samples_invalidate_the_image() {
        let mut store = PixelStore::new(2, 2).unwrap();
        store.set_raw(samples()).unwrap();
        store.set_rgb(vec![7; 12]).unwrap();
        store.set_raw(samples()).unwrap();
        assert!(store.rgb().is_err());
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        let mut store = PixelStore::new(2, 2).unwrap();
        assert!(store.set_rgb(vec![0; 12]).is_err());
        assert!(store.set_raw(vec![ManVal::new(0.0, 0.0, 1)]).is_err());
        store.set_raw(samples()).unwrap();
        assert!(store.set_rgb(vec![0; 11]).is_err());
    }

    #[test]
    fn oversized_images_are_rejected() {
        let store = PixelStore::<f64>::new(std::usize::MAX, 2);
        match store {
            Err(RenderError::TooLarge { height, .. }) => assert_eq!(height, 2),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn allocate_fills_the_buffer() {
        assert_eq!(allocate("rgb", 4, 9u8).unwrap(), vec![9, 9, 9, 9]);
    }

    #[test]
    fn impossible_allocations_are_errors() {
        match allocate("rgb", std::usize::MAX, 0u8) {
            Err(RenderError::Allocation { buffer, .. }) => assert_eq!(buffer, "rgb"),
            other => panic!("unexpected result {:?}", other.map(|v| v.len())),
        }
    }
}
