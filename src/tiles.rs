// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiled, multi-threaded passes over a row-major pixel buffer.
//!
//! The image is cut into a `count × count` grid of rectangles.  Before
//! any thread starts, the buffer itself is cut along the same lines
//! into per-tile row segments, so every worker owns exactly the cells
//! of its tile and nothing else; no cell is reachable from two tiles,
//! and the buffer needs no lock.  A bounded number of scoped threads
//! pull tiles off a shared queue, and the pass does not return until
//! every one of them has been joined.

use std::mem;
use std::ops::Range;
use std::sync::Mutex;
use std::time::Instant;

use crossbeam;
use itertools::iproduct;

use error::RenderError;
use planes::Pixel;

/// One rectangle of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Position in the grid's tile list.  Tile 0 reports progress.
    pub index: usize,
    /// Columns covered, in pixels.
    pub x: Range<usize>,
    /// Rows covered, in pixels.
    pub y: Range<usize>,
}

impl Tile {
    /// Number of pixels in the tile.
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    /// True for the zero-width or zero-height tiles a grid finer than
    /// the image produces.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The `count × count` partition of a `width × height` image.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    count: usize,
    tiles: Vec<Tile>,
}

/// The `i`th of `count` equal slices of `0..len`; the last one absorbs
/// the remainder of the integer division.
fn span(len: usize, count: usize, i: usize) -> Range<usize> {
    let step = len / count;
    let end = if i + 1 == count { len } else { (i + 1) * step };
    i * step..end
}

impl TileGrid {
    /// Partitions the image.  `count` is the number of tiles along
    /// each axis.
    pub fn new(width: usize, height: usize, count: usize) -> Result<TileGrid, RenderError> {
        if count == 0 {
            return Err(RenderError::NonPositive {
                name: "tile count",
                value: count.to_string(),
            });
        }
        let tiles = iproduct!(0..count, 0..count)
            .enumerate()
            .map(|(index, (column, row))| Tile {
                index,
                x: span(width, count, column),
                y: span(height, count, row),
            })
            .collect();
        Ok(TileGrid {
            width,
            height,
            count,
            tiles,
        })
    }

    /// Tiles along each axis.
    pub fn count(&self) -> usize {
        self.count
    }

    /// All tiles, column by column.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The grid row holding pixel row `y`.
    fn row_of(&self, y: usize) -> usize {
        let step = self.height / self.count;
        if step == 0 {
            self.count - 1
        } else {
            (y / step).min(self.count - 1)
        }
    }

    /// Cuts `buffer`, `channels` elements per pixel, into the row
    /// segments each tile owns, in tile order, each tile's rows from
    /// top to bottom.
    pub fn split<'a, T>(&self, buffer: &'a mut [T], channels: usize) -> Vec<Vec<&'a mut [T]>> {
        let mut segments: Vec<Vec<&'a mut [T]>> = self
            .tiles
            .iter()
            .map(|tile| Vec::with_capacity(tile.y.len()))
            .collect();
        let stride = self.width * channels;
        if stride == 0 {
            return segments;
        }
        for (y, line) in buffer.chunks_mut(stride).take(self.height).enumerate() {
            let row = self.row_of(y);
            let mut rest = line;
            for column in 0..self.count {
                let cells = span(self.width, self.count, column).len() * channels;
                let (head, tail) = mem::take(&mut rest).split_at_mut(cells);
                segments[column * self.count + row].push(head);
                rest = tail;
            }
        }
        segments
    }
}

/// Runs `paint` for every pixel of the image, tile by tile, on at most
/// `workers` threads.  `paint` receives the pixel and its `channels`
/// cells of `buffer`.  Returns once every tile is done; `pass` names
/// the pass in logs and errors.
pub fn fill_tiles<T, F>(
    buffer: &mut [T],
    grid: &TileGrid,
    channels: usize,
    workers: usize,
    pass: &'static str,
    paint: F,
) -> Result<(), RenderError>
where
    T: Send,
    F: Fn(Pixel, &mut [T]) + Sync,
{
    let expected = grid.width * grid.height * channels;
    if buffer.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: buffer.len(),
        });
    }

    let work: Vec<(Tile, Vec<&mut [T]>)> = grid
        .tiles
        .iter()
        .cloned()
        .zip(grid.split(buffer, channels))
        .collect();
    let threads = workers.max(1).min(work.len());
    let queue = Mutex::new(work.into_iter());
    let paint = &paint;
    let queue = &queue;

    let begin = Instant::now();
    info!(
        "{} pass: {} tiles on {} threads",
        pass,
        grid.tiles.len(),
        threads
    );

    crossbeam::scope(|spawner| {
        for _ in 0..threads {
            spawner.spawn(move |_| loop {
                let next = match queue.lock() {
                    Ok(mut tiles) => tiles.next(),
                    Err(_) => None,
                };
                match next {
                    Some((tile, rows)) => paint_tile(&tile, rows, channels, pass, paint),
                    None => {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| RenderError::WorkerPanicked { pass })?;

    info!("{} pass done in {:?}", pass, begin.elapsed());
    Ok(())
}

fn paint_tile<T, F>(tile: &Tile, rows: Vec<&mut [T]>, channels: usize, pass: &str, paint: &F)
where
    F: Fn(Pixel, &mut [T]),
{
    trace!("{} pass: tile {} {:?}x{:?}", pass, tile.index, tile.x, tile.y);
    let height = rows.len();
    for (dy, row) in rows.into_iter().enumerate() {
        let y = tile.y.start + dy;
        for (dx, cells) in row.chunks_mut(channels).enumerate() {
            paint(Pixel(tile.x.start + dx, y), cells);
        }
        if tile.index == 0 {
            debug!(
                "{} pass: {:.0}% complete",
                pass,
                ((dy + 1) as f64 / height as f64) * 100.0
            );
        }
    }
}
