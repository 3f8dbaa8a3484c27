#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot explorer engine
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  In practice we give every point
//! an iteration budget and stop as soon as `|z|` reaches 2, after
//! which escape is certain.  How quickly a point escapes is its
//! "velocity," and that is what gets colored.
//!
//! The engine takes a rectangle of the complex plane and a raster,
//! cuts the raster into contiguous runs of pixels, and iterates each
//! run on its own thread.  A preview thread copies the half-finished
//! raster to a display while the workers run, a single flag lets the
//! user stop a generation part way, and a zoom history keeps copies
//! of earlier images so that zooming out is free.
//!
//! Drawing the window, picking rectangles with the mouse and encoding
//! image files belong to whoever calls the engine.

extern crate crossbeam;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

#[cfg(test)]
#[macro_use]
extern crate itertools;
#[cfg(test)]
extern crate rand;

pub mod colors;
pub mod config;
pub mod errors;
pub mod explorer;
pub mod generator;
pub mod history;
pub mod kernel;
pub mod planes;
pub mod progressive;
pub mod raster;

pub use colors::{ColorScheme, Rgba};
pub use config::GenerationConfig;
pub use errors::{Error, Result};
pub use explorer::Explorer;
pub use generator::{Canceller, Generator, Outcome};
pub use history::ZoomHistory;
pub use kernel::{Escape, EscapeTime, Mandelbrot};
pub use planes::{Pixel, PlaneMapper, Selection, Viewport};
pub use progressive::{Display, Frame, NullDisplay, RecordingDisplay};
pub use raster::RasterBuffer;
