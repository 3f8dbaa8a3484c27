// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong before or during a generation.
//! Cancellation is not in here: a cancelled generation is a normal
//! outcome, and the partial image it leaves behind is valid.

use std::result;

/// Errors reported by the engine.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum Error {
    /// A pixel write fell outside the raster.  This is always a defect
    /// in whoever computed the offset.
    #[fail(
        display = "pixel write at byte {} does not fit a buffer of {} bytes",
        index, len
    )]
    OutOfRange {
        /// The first byte of the attempted write.
        index: usize,
        /// Length of the pixel store.
        len: usize,
    },

    /// The rectangle is inverted, empty, or not finite.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// A raster of zero width or height, or one too large to address.
    #[fail(display = "invalid raster dimensions {}x{}", _0, _1)]
    InvalidDimensions(usize, usize),

    /// The generation configuration cannot be run.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// A zoom rectangle that looks like a click rather than a drag.
    #[fail(
        display = "selection of {}x{} pixels is too small to zoom into",
        _0, _1
    )]
    SelectionTooSmall(f64, f64),

    /// A zoom rectangle with a coordinate that is not a finite number.
    #[fail(display = "invalid selection: {}", _0)]
    InvalidSelection(String),

    /// The named color scheme does not exist.
    #[fail(display = "unknown color scheme: {}", _0)]
    UnknownScheme(String),

    /// A zoom-out target that is not in the history.
    #[fail(display = "no zoom level {} in history", _0)]
    NoSuchZoom(usize),

    /// A worker thread died.  The buffer contents are whatever the
    /// surviving workers managed to write.
    #[fail(display = "a generation worker panicked")]
    WorkerPanicked,
}

/// Shorthand used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
