// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate mandelplus;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use num::Complex;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use mandelplus::{
    ArbitraryPrecision, Arithmetic, EscapeTest, FixedPrecision, MandelbrotRenderer, Palette,
    RenderError, RenderOptions, RenderParams, ZoomSequence,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const ZOOM: &str = "zoom";
const CENTER: &str = "center";
const THREADS: &str = "threads";
const TILES: &str = "tiles";
const COLOR_TILES: &str = "color-tiles";
const PRECISION: &str = "precision";
const BITS: &str = "bits";
const ESCAPE: &str = "escape";
const PALETTE: &str = "palette";
const FRAMES: &str = "frames";
const ZOOM_FACTOR: &str = "zoom-factor";

fn args<'a>() -> ArgMatches<'a> {
    let default_threads = num_cpus::get().to_string();

    App::new("mandelplus")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("export.ppm")
                .help("Output file; .png is written as PNG, anything else as binary PPM"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x800")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        10_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000000",
                    )
                })
                .help("Iteration budget per pixel"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse zoom",
                        "Zoom must be a positive number",
                    )
                })
                .help("Half-width of the window on the complex plane"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the window, as real,imaginary"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(Box::leak(default_threads.into_boxed_str()))
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        1024,
                        "Could not parse thread count",
                        "Thread count must be between 1 and 1024",
                    )
                })
                .help("Number of worker threads per pass"),
        )
        .arg(
            Arg::with_name(TILES)
                .long(TILES)
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        256,
                        "Could not parse tile count",
                        "Tile count must be between 1 and 256",
                    )
                })
                .help("Tiles per axis for the generation pass"),
        )
        .arg(
            Arg::with_name(COLOR_TILES)
                .long(COLOR_TILES)
                .takes_value(true)
                .default_value("4")
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        256,
                        "Could not parse tile count",
                        "Tile count must be between 1 and 256",
                    )
                })
                .help("Tiles per axis for the color pass"),
        )
        .arg(
            Arg::with_name(PRECISION)
                .long(PRECISION)
                .short("p")
                .takes_value(true)
                .possible_values(&["fixed", "arbitrary"])
                .default_value("fixed")
                .help("Arithmetic: fixed (f64) or arbitrary precision"),
        )
        .arg(
            Arg::with_name(BITS)
                .long(BITS)
                .short("b")
                .takes_value(true)
                .default_value("128")
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        1 << 20,
                        "Could not parse bit count",
                        "Bit count must be between 1 and 1048576",
                    )
                })
                .help("Mantissa bits for arbitrary precision"),
        )
        .arg(
            Arg::with_name(ESCAPE)
                .long(ESCAPE)
                .short("e")
                .takes_value(true)
                .possible_values(&["sum", "modulus"])
                .default_value("sum")
                .help("Escape test: |re + im| > 2 (sum) or |z| > 2 (modulus)"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .takes_value(true)
                .help("File of 512 hex colors to use instead of the built-in gradient"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        100_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 100000",
                    )
                })
                .help("Number of frames to render, zooming between each"),
        )
        .arg(
            Arg::with_name(ZOOM_FACTOR)
                .long(ZOOM_FACTOR)
                .takes_value(true)
                .default_value("0.5")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse zoom factor",
                        "Zoom factor must be a positive number",
                    )
                })
                .help("Zoom multiplier applied from one frame to the next"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))?;
    T::from_str(raw).map_err(|_| format_err!("Could not parse --{} '{}'", name, raw))
}

/// `export.ppm` becomes `export_0003.ppm` for frame 3.
fn frame_path(output: &Path, frame: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{}_{:04}.{}", stem, frame, ext.to_string_lossy()),
        None => format!("{}_{:04}", stem, frame),
    };
    output.with_file_name(name)
}

fn render_frames<B: Arithmetic>(
    backend: B,
    start: RenderParams,
    options: RenderOptions,
    palette: &Palette,
    output: &Path,
    frames: usize,
    factor: f64,
) -> Result<(), RenderError> {
    for (frame, params) in ZoomSequence::new(start, factor, frames)?.enumerate() {
        let mut renderer =
            MandelbrotRenderer::new(params, backend.clone(), options)?.with_palette(palette);
        renderer.render()?;
        let path = if frames == 1 {
            output.to_path_buf()
        } else {
            frame_path(output, frame)
        };
        renderer.save(&path)?;
        info!("Exported image: {}", path.display());
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap_or(""), 'x')
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let center = parse_complex(matches.value_of(CENTER).unwrap_or(""))
        .ok_or_else(|| format_err!("Error parsing center point"))?;

    let params = RenderParams {
        width,
        height,
        max_iterations: value(matches, ITERATIONS)?,
        zoom: value(matches, ZOOM)?,
        center,
    };
    let options = RenderOptions {
        generate_tiles: value(matches, TILES)?,
        colorize_tiles: value(matches, COLOR_TILES)?,
        workers: value(matches, THREADS)?,
        escape: value::<String>(matches, ESCAPE)?
            .parse::<EscapeTest>()
            .map_err(|e| format_err!("{}", e))?,
    };
    let palette = match matches.value_of(PALETTE) {
        Some(path) => Palette::load(path)?,
        None => Palette::gradient().clone(),
    };
    let output = PathBuf::from(value::<String>(matches, OUTPUT)?);
    let frames: usize = value(matches, FRAMES)?;
    let factor: f64 = value(matches, ZOOM_FACTOR)?;

    match matches.value_of(PRECISION) {
        Some("arbitrary") => {
            let backend = ArbitraryPrecision::new(value(matches, BITS)?)?;
            render_frames(backend, params, options, &palette, &output, frames, factor)?
        }
        _ => render_frames(FixedPrecision, params, options, &palette, &output, frames, factor)?,
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
