// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate mandelzoom;

use mandelzoom::colors::select_color;
use mandelzoom::kernel::iterate;
use mandelzoom::{
    ColorScheme, GenerationConfig, Generator, Outcome, Pixel, RasterBuffer, RecordingDisplay,
    Rgba, Viewport, ZoomHistory,
};

fn config(segments: usize, scheme: ColorScheme, max_iterations: u64) -> GenerationConfig {
    GenerationConfig {
        max_iterations,
        segments,
        color_scheme: scheme,
        draw_interval_ms: 0,
    }
}

fn render(width: usize, height: usize, viewport: Viewport, config: &GenerationConfig) -> Vec<u8> {
    let raster = RasterBuffer::with_viewport(width, height, viewport).unwrap();
    assert_eq!(
        Generator::new().generate(&raster, config).unwrap(),
        Outcome::Completed
    );
    raster.snapshot()
}

#[test]
fn four_by_four_black_scheme() {
    // Columns sample re = -2, -1.275, -0.55, 0.175; rows sample
    // im = 1.4, 0.7, 0, -0.7.  With ten iterations only the three
    // points right of the left edge on the real axis stay bounded.
    const M: [u8; 4] = [0, 0, 0, 255];
    const E: [u8; 4] = [255, 255, 255, 255];
    let expected: [[[u8; 4]; 4]; 4] = [
        [E, E, E, E],
        [E, E, E, E],
        [E, M, M, M],
        [E, E, E, E],
    ];

    let viewport = Viewport::new(-2.0, 0.9, 1.4, -1.4).unwrap();
    let raster = RasterBuffer::with_viewport(4, 4, viewport).unwrap();
    let cfg = config(1, ColorScheme::Black, 10);
    assert_eq!(
        Generator::new().generate(&raster, &cfg).unwrap(),
        Outcome::Completed
    );

    let bytes = raster.snapshot();
    for row in 0..4 {
        for col in 0..4 {
            let at = (row * 4 + col) * 4;
            assert_eq!(&bytes[at..at + 4], &expected[row][col], "({}, {})", row, col);
        }
    }
    assert_eq!(raster.pixel(Pixel { row: 2, col: 2 }), Some(Rgba::opaque(0, 0, 0)));
    assert_eq!(raster.pixel(Pixel { row: 0, col: 0 }), Some(Rgba::opaque(255, 255, 255)));
}

#[test]
fn partitioning_does_not_change_the_image() {
    let viewport = Viewport::new(-0.8, -0.6, 0.3, 0.1).unwrap();
    for scheme in ColorScheme::ALL.iter() {
        let one = render(61, 47, viewport, &config(1, *scheme, 300));
        let eight = render(61, 47, viewport, &config(8, *scheme, 300));
        let seven = render(61, 47, viewport, &config(7, *scheme, 300));
        assert!(one == eight, "1 vs 8 segments differ for {}", scheme);
        assert!(one == seven, "1 vs 7 segments differ for {}", scheme);
    }
}

#[test]
fn automatic_segments_match_a_single_segment() {
    let viewport = Viewport::default();
    let one = render(40, 40, viewport, &config(1, ColorScheme::Continuous, 100));
    let auto = render(40, 40, viewport, &config(0, ColorScheme::Continuous, 100));
    assert!(one == auto);
}

#[test]
fn every_pixel_matches_its_own_color() {
    let viewport = Viewport::default();
    let cfg = config(3, ColorScheme::Gold, 80);
    let raster = RasterBuffer::with_viewport(23, 17, viewport).unwrap();
    Generator::new().generate(&raster, &cfg).unwrap();
    let mapper = raster.mapper().unwrap();
    for row in 0..17 {
        for col in 0..23 {
            let pixel = Pixel { row, col };
            let c = mapper.pixel_to_point(mapper.pixel_to_offset(pixel));
            let expected = select_color(&iterate(c, 80), 80, ColorScheme::Gold);
            assert_eq!(raster.pixel(pixel), Some(expected));
        }
    }
}

#[test]
fn preview_ends_on_the_complete_frame() {
    let raster = RasterBuffer::allocate(50, 50).unwrap();
    let mut display = RecordingDisplay::default();
    let cfg = GenerationConfig {
        draw_interval_ms: 1,
        ..config(2, ColorScheme::SmoothRed, 500)
    };
    Generator::new()
        .generate_with_display(&raster, &cfg, &mut display)
        .unwrap();
    let last = display.last.unwrap();
    assert_eq!((last.width, last.height, last.stride), (50, 50, 200));
    assert_eq!(last.pixels, raster.snapshot());
}

#[test]
fn history_keeps_what_was_rendered() {
    let cfg = config(2, ColorScheme::WaveyBlue, 60);
    let mut history = ZoomHistory::new();
    let mut rendered = Vec::new();
    let mut viewport = Viewport::default();
    for _ in 0..4 {
        let raster = RasterBuffer::with_viewport(12, 12, viewport).unwrap();
        Generator::new().generate(&raster, &cfg).unwrap();
        history.push_current(&raster);
        rendered.push(raster.snapshot());
        viewport = raster
            .mapper()
            .unwrap()
            .zoom(&mandelzoom::Selection::new(3.0, 3.0, 6.0, 6.0).unwrap())
            .unwrap();
    }

    let target = history.pop_to(2).unwrap();
    assert_eq!(target.snapshot(), rendered[1]);
    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].zoom_index(), 1);
    assert_eq!(history.entries()[0].snapshot(), rendered[0]);
}
