// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate mandelplus;
extern crate num;
extern crate rand;

use mandelplus::{
    ArbitraryPrecision, EscapeTest, FixedPrecision, MandelbrotRenderer, Pixel, PlaneMapper,
    RenderOptions, RenderParams,
};
use num::Complex;
use rand::Rng;

fn options(generate_tiles: usize, colorize_tiles: usize, workers: usize) -> RenderOptions {
    RenderOptions {
        generate_tiles,
        colorize_tiles,
        workers,
        escape: EscapeTest::SumProxy,
    }
}

fn render_fixed(params: RenderParams, opts: RenderOptions) -> (Vec<u32>, Vec<u64>, Vec<u8>) {
    let mut r = MandelbrotRenderer::new(params, FixedPrecision, opts).unwrap();
    r.render().unwrap();
    (
        r.clone_iteration_data().unwrap(),
        r.clone_real_data()
            .unwrap()
            .iter()
            .map(|re| re.to_bits())
            .collect(),
        r.clone_rgb().unwrap(),
    )
}

#[test]
fn tiling_does_not_change_the_image() {
    let params = RenderParams {
        width: 37,
        height: 23,
        max_iterations: 64,
        zoom: 1.5,
        center: Complex::new(-0.5, 0.1),
    };
    let reference = render_fixed(params, options(1, 1, 1));
    for &tiles in &[2, 4, 8] {
        for &workers in &[1, 3, 8] {
            let tiled = render_fixed(params, options(tiles, tiles, workers));
            assert_eq!(tiled.0, reference.0, "iterations, {} tiles", tiles);
            assert_eq!(tiled.1, reference.1, "real parts, {} tiles", tiles);
            assert_eq!(tiled.2, reference.2, "rgb, {} tiles", tiles);
        }
    }
}

#[test]
fn tiling_does_not_change_random_views() {
    let mut rng = rand::thread_rng();
    for _ in 0..8 {
        let params = RenderParams {
            width: rng.gen_range(1, 40),
            height: rng.gen_range(1, 40),
            max_iterations: rng.gen_range(1, 80),
            zoom: rng.gen_range(0.01, 3.0),
            center: Complex::new(rng.gen_range(-1.5, 0.5), rng.gen_range(-1.0, 1.0)),
        };
        let reference = render_fixed(params, options(1, 1, 1));
        let tiles = rng.gen_range(1, 10);
        let tiled = render_fixed(params, options(tiles, rng.gen_range(1, 10), 4));
        assert_eq!(tiled, reference, "{:?} with {} tiles", params, tiles);
    }
}

#[test]
fn more_tiles_than_pixels() {
    let params = RenderParams {
        width: 3,
        height: 2,
        max_iterations: 10,
        ..RenderParams::default()
    };
    let reference = render_fixed(params, options(1, 1, 1));
    assert_eq!(render_fixed(params, options(8, 8, 4)), reference);
}

#[test]
fn four_by_four_scenario() {
    let params = RenderParams {
        width: 4,
        height: 4,
        max_iterations: 10,
        zoom: 2.0,
        center: Complex::new(0.0, 0.0),
    };
    let plane = PlaneMapper::from_params(&params).unwrap();
    assert_eq!(plane.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
    assert_eq!(plane.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));

    let (iterations, _, rgb) = render_fixed(params, RenderOptions::default());
    assert!(iterations[0] < 3);
    assert_eq!(iterations[2 + 2 * 4], 10);
    assert_eq!(rgb.len(), 4 * 4 * 3);
}

#[test]
fn the_image_center_is_the_plane_center() {
    let params = RenderParams {
        width: 10,
        height: 6,
        center: Complex::new(-0.75, 0.25),
        ..RenderParams::default()
    };
    let plane = PlaneMapper::from_params(&params).unwrap();
    assert_eq!(plane.pixel_to_point(&Pixel(5, 3)), Complex::new(-0.75, 0.25));
}

#[test]
fn backends_agree_away_from_deep_zoom() {
    let params = RenderParams {
        width: 24,
        height: 24,
        max_iterations: 30,
        zoom: 2.0,
        center: Complex::new(-0.5, 0.0),
    };
    let (fixed, _, _) = render_fixed(params, options(2, 2, 4));

    let mut r = MandelbrotRenderer::new(params, ArbitraryPrecision::default(), options(2, 2, 4))
        .unwrap();
    r.render().unwrap();
    let arbitrary = r.clone_iteration_data().unwrap();

    assert_eq!(fixed.len(), arbitrary.len());
    let mismatched = fixed
        .iter()
        .zip(arbitrary.iter())
        .filter(|(a, b)| a != b)
        .count();
    assert!(
        mismatched * 20 < fixed.len(),
        "{} of {} pixels differ",
        mismatched,
        fixed.len()
    );
}

#[test]
fn modulus_escape_keeps_the_origin_in_the_set() {
    let params = RenderParams {
        width: 16,
        height: 16,
        max_iterations: 40,
        ..RenderParams::default()
    };
    let modulus = RenderOptions {
        escape: EscapeTest::Modulus,
        ..options(2, 2, 2)
    };
    let mut r = MandelbrotRenderer::new(params, FixedPrecision, modulus).unwrap();
    r.render().unwrap();
    let iterations = r.clone_iteration_data().unwrap();
    assert!(iterations.iter().all(|&n| n <= 40));
    // The origin is in the set under either rule.
    assert_eq!(iterations[8 + 8 * 16], 40);
}
