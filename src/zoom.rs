// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Zooming in, frame by frame.  Instead of one renderer whose zoom is
//! nudged between passes, each frame gets its own parameter snapshot
//! and its own renderer, so nothing a pass reads can change under it.

use error::{finite, RenderError};
use renderer::RenderParams;

/// Yields `frames` parameter sets, the `k`th with
/// `zoom = start.zoom * factor^k` and everything else unchanged.
#[derive(Clone, Debug)]
pub struct ZoomSequence {
    start: RenderParams,
    factor: f64,
    frames: usize,
    next: usize,
}

impl ZoomSequence {
    /// A sequence starting from `start`.  A factor below 1 zooms in.
    pub fn new(start: RenderParams, factor: f64, frames: usize) -> Result<Self, RenderError> {
        start.validate()?;
        finite("zoom factor", factor)?;
        if !(factor > 0.0) {
            return Err(RenderError::NonPositive {
                name: "zoom factor",
                value: factor.to_string(),
            });
        }
        Ok(ZoomSequence {
            start,
            factor,
            frames,
            next: 0,
        })
    }
}

impl Iterator for ZoomSequence {
    type Item = RenderParams;

    fn next(&mut self) -> Option<RenderParams> {
        if self.next >= self.frames {
            return None;
        }
        let zoom = self.start.zoom * self.factor.powi(self.next as i32);
        self.next += 1;
        Some(RenderParams { zoom, ..self.start })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.frames - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ZoomSequence {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_shrink_geometrically() {
        let start = RenderParams::default();
        let zooms: Vec<f64> = ZoomSequence::new(start, 0.5, 4)
            .unwrap()
            .map(|p| p.zoom)
            .collect();
        assert_eq!(zooms, vec![2.0, 1.0, 0.5, 0.25]);
    }

    #[test]
    fn only_the_zoom_changes() {
        let start = RenderParams::default();
        for frame in ZoomSequence::new(start, 0.9, 3).unwrap() {
            assert_eq!(RenderParams { zoom: start.zoom, ..frame }, start);
        }
    }

    #[test]
    fn bad_factors_are_rejected() {
        let start = RenderParams::default();
        assert!(ZoomSequence::new(start, 0.0, 3).is_err());
        assert!(ZoomSequence::new(start, -0.5, 3).is_err());
        assert!(ZoomSequence::new(start, std::f64::NAN, 3).is_err());
    }

    #[test]
    fn sequence_length_is_known() {
        let seq = ZoomSequence::new(RenderParams::default(), 0.5, 5).unwrap();
        assert_eq!(seq.len(), 5);
    }
}
