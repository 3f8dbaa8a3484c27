// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelzoom;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use mandelzoom::{
    ColorScheme, Display, Explorer, Frame, GenerationConfig, Outcome, RasterBuffer, Selection,
    Viewport,
};
use num::Complex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// `AxB`, split on `separator`.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let (first, second) = s.split_once(separator)?;
    Some((first.parse().ok()?, second.parse().ok()?))
}

/// `RE,IM`.
fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex::new(re, im))
}

/// `LEFT,TOP,WIDTHxHEIGHT`, in device pixels.
fn parse_selection(s: &str) -> Option<(f64, f64, f64, f64)> {
    let (corner, size) = s.rsplit_once(',')?;
    let (left, top) = parse_pair(corner, ',')?;
    let (width, height) = parse_pair(size, 'x')?;
    Some((left, top, width, height))
}

/// Turns one of the parsers above into a clap validator.
fn parses<T>(parsed: Option<T>, what: &str) -> Result<(), String> {
    parsed
        .map(|_| ())
        .ok_or_else(|| format!("Could not parse {}", what))
}

fn in_range<T>(s: &str, low: T, high: T, what: &str) -> Result<(), String>
where
    T: FromStr + PartialOrd + fmt::Display,
{
    match s.parse::<T>() {
        Ok(value) if value >= low && value <= high => Ok(()),
        Ok(_) => Err(format!("{} must be between {} and {}", what, low, high)),
        Err(_) => Err(format!("Could not parse {}", what)),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const UPPERLEFT: &str = "upperleft";
const LOWERRIGHT: &str = "lowerright";
const SEGMENTS: &str = "segments";
const ITERATIONS: &str = "iterations";
const SCHEME: &str = "scheme";
const INTERVAL: &str = "interval";
const ZOOM: &str = "zoom";

fn args<'a>() -> ArgMatches<'a> {
    let max_segments = num_cpus::get() * 16;

    App::new("mandelzoom")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PNG)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x800")
                .validator(|s| parses(parse_pair::<u16>(&s, 'x'), "output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(UPPERLEFT)
                .required(false)
                .long(UPPERLEFT)
                .short("u")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,1.4")
                .validator(|s| parses(parse_complex(&s), "upper left corner"))
                .help("Upper left corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(LOWERRIGHT)
                .required(false)
                .long(LOWERRIGHT)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0.9,-1.4")
                .validator(|s| parses(parse_complex(&s), "lower right corner"))
                .help("Lower right corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(SEGMENTS)
                .required(false)
                .long(SEGMENTS)
                .short("t")
                .takes_value(true)
                .default_value("0")
                .validator(move |s| in_range(&s, 0, max_segments, "Segment count"))
                .help("Number of worker threads; 0 uses all but one core"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| in_range(&s, 1u64, 10_000_000, "Iteration count"))
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(SCHEME)
                .required(false)
                .long(SCHEME)
                .short("c")
                .takes_value(true)
                .default_value("Continuous")
                .validator(|s| {
                    ColorScheme::from_str(&s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .help("Color scheme: Continuous, Gold, Black, Smooth Red or Wavey Blue"),
        )
        .arg(
            Arg::with_name(INTERVAL)
                .required(false)
                .long(INTERVAL)
                .short("d")
                .takes_value(true)
                .default_value("100")
                .validator(|s| in_range(&s, 0u64, 60_000, "Draw interval (ms)"))
                .help("Milliseconds between progress reports; 0 uses the default"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| parses(parse_selection(&s), "zoom; expected LEFT,TOP,WIDTHxHEIGHT"))
                .help("Zoom into a rectangle of the previous image; may be repeated"),
        )
        .get_matches()
}

/// Logs how much of the image is done each time the preview fires.
#[derive(Default)]
struct Progress {
    frames: usize,
}

impl Display for Progress {
    fn flush(&mut self, frame: &Frame) {
        self.frames += 1;
        let total = frame.width * frame.height;
        let written = frame.pixels.chunks(4).filter(|px| px[3] != 0).count();
        info!(
            "frame {}: {}/{} pixels ({}%)",
            self.frames,
            written,
            total,
            written * 100 / total
        );
    }
}

fn write_image(outfile: &str, raster: &RasterBuffer) -> Result<(), failure::Error> {
    let path = Path::new(outfile);
    image::save_buffer(
        &path,
        &raster.to_rgba(),
        raster.width() as u32,
        raster.height() as u32,
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let image_size: (usize, usize) = parse_pair(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?;
    let upperleft = parse_complex(matches.value_of(UPPERLEFT).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing upper left point"))?;
    let lowerright = parse_complex(matches.value_of(LOWERRIGHT).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing lower right point"))?;
    let viewport = Viewport::from_corners(upperleft, lowerright)?;

    let config = GenerationConfig {
        max_iterations: u64::from_str(matches.value_of(ITERATIONS).unwrap_or_default())?,
        segments: usize::from_str(matches.value_of(SEGMENTS).unwrap_or_default())?,
        color_scheme: ColorScheme::from_str(matches.value_of(SCHEME).unwrap_or_default())?,
        draw_interval_ms: u64::from_str(matches.value_of(INTERVAL).unwrap_or_default())?,
    };
    info!(
        "{}x{} over {:?}, {} iterations, {} colors, {} segments",
        image_size.0,
        image_size.1,
        viewport,
        config.max_iterations,
        config.color_scheme,
        config.resolved_segments()
    );

    let explorer = Explorer::new(image_size.0, image_size.1, config)?;
    let mut progress = Progress::default();
    report(explorer.render(viewport, &mut progress)?);

    if let Some(zooms) = matches.values_of(ZOOM) {
        for zoom in zooms {
            let (left, top, width, height) = parse_selection(zoom)
                .ok_or_else(|| failure::err_msg("Error parsing zoom rectangle"))?;
            let selection = Selection::new(top, left, width, height)?;
            report(explorer.zoom_in(&selection, &mut progress)?);
            info!("zoomed to {:?}", explorer.current().viewport());
        }
    }

    write_image(
        matches.value_of(OUTPUT).unwrap_or_default(),
        &explorer.current(),
    )
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Completed => debug!("generation complete"),
        other => warn!("generation ended early: {:?}", other),
    }
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
