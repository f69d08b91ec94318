// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing finished images.  PPM is written by hand so the header is
//! byte-for-byte `P6\n<width> <height>\n255\n`; PNG goes through the
//! `image` encoder.

use image::{self, ColorType};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use error::RenderError;

fn check_len(width: usize, height: usize, rgb: &[u8]) -> Result<(), RenderError> {
    let expected = width * height * 3;
    if rgb.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: rgb.len(),
        });
    }
    Ok(())
}

/// The binary PPM header for an image.
pub fn ppm_header(width: usize, height: usize) -> String {
    format!("P6\n{} {}\n255\n", width, height)
}

/// Writes `rgb`, row-major and RGB-interleaved, as a binary PPM.
pub fn write_ppm<W: Write>(
    mut writer: W,
    width: usize,
    height: usize,
    rgb: &[u8],
) -> Result<(), RenderError> {
    check_len(width, height, rgb)?;
    writer.write_all(ppm_header(width, height).as_bytes())?;
    writer.write_all(rgb)?;
    writer.flush()?;
    Ok(())
}

/// Writes a binary PPM file.
pub fn export_ppm<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
    rgb: &[u8],
) -> Result<(), RenderError> {
    check_len(width, height, rgb)?;
    let output = BufWriter::new(File::create(path.as_ref())?);
    info!(
        "Writing {} bytes to {}",
        rgb.len(),
        path.as_ref().display()
    );
    write_ppm(output, width, height, rgb)
}

/// Writes a PNG file.
pub fn save_png<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
    rgb: &[u8],
) -> Result<(), RenderError> {
    check_len(width, height, rgb)?;
    info!("Encoding PNG to {}", path.as_ref().display());
    image::save_buffer(
        path.as_ref(),
        rgb,
        width as u32,
        height as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}
