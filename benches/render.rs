// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;
extern crate mandelzoom;

use criterion::{BenchmarkId, Criterion};
use mandelzoom::{ColorScheme, GenerationConfig, Generator, RasterBuffer};

fn segments(c: &mut Criterion) {
    let generator = Generator::new();
    let raster = RasterBuffer::allocate(256, 256).unwrap();
    let mut group = c.benchmark_group("home view 256x256");
    for &count in &[1usize, 2, 4, 8] {
        let config = GenerationConfig {
            max_iterations: 500,
            segments: count,
            color_scheme: ColorScheme::Continuous,
            draw_interval_ms: 0,
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &config, |b, config| {
            b.iter(|| generator.generate(&raster, config).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, segments);
criterion_main!(benches);
