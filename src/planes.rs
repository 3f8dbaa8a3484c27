// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps between two planes: the integral plane of the raster, with
//! its origin in the upper-left corner and rows growing downwards,
//! and a rectangle of the complex plane, the `Viewport`, with the
//! imaginary axis growing upwards.  Row zero of the raster is the
//! top edge of the viewport.

use errors::{Error, Result};
use num::Complex;

/// The smallest drag, in device pixels, that counts as a zoom
/// selection rather than a click.
pub const MIN_SELECTION: f64 = 2.0;

/// A rectangle on the complex plane.  Once attached to a raster it is
/// never mutated; zooming builds a new one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Viewport {
    /// Builds a viewport, insisting that `right > left` and
    /// `top > bottom` and that every edge is finite.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Result<Viewport> {
        if !(left.is_finite() && right.is_finite() && top.is_finite() && bottom.is_finite()) {
            return Err(Error::InvalidViewport(
                "every edge must be a finite number".to_string(),
            ));
        }
        if right <= left {
            return Err(Error::InvalidViewport(format!(
                "right edge {} is not to the right of left edge {}",
                right, left
            )));
        }
        if top <= bottom {
            return Err(Error::InvalidViewport(format!(
                "top edge {} is not above bottom edge {}",
                top, bottom
            )));
        }
        Ok(Viewport {
            left,
            right,
            top,
            bottom,
        })
    }

    /// Builds a viewport from its upper-left and lower-right corners.
    pub fn from_corners(upper_left: Complex<f64>, lower_right: Complex<f64>) -> Result<Viewport> {
        Viewport::new(upper_left.re, lower_right.re, upper_left.im, lower_right.im)
    }

    /// Real coordinate of the left edge.
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Real coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Imaginary coordinate of the top edge.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Imaginary coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// The upper-left corner as a complex number.
    pub fn upper_left(&self) -> Complex<f64> {
        Complex::new(self.left, self.top)
    }
}

/// The home view: the whole of the Mandelbrot set with a little
/// margin.
impl Default for Viewport {
    fn default() -> Viewport {
        Viewport {
            left: -2.0,
            right: 0.9,
            top: 1.4,
            bottom: -1.4,
        }
    }
}

/// A row and column on the raster.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel {
    /// Distance from the top edge.
    pub row: usize,
    /// Distance from the left edge.
    pub col: usize,
}

/// A rectangle dragged out on the raster, in device pixels, that the
/// user wants to zoom into.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Selection {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
}

impl Selection {
    /// A selection must be more than `MIN_SELECTION` pixels along
    /// both axes; anything smaller was a click.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Result<Selection> {
        if !(top.is_finite() && left.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(Error::InvalidSelection(format!(
                "{}x{} at ({}, {}) is not a finite rectangle",
                width, height, left, top
            )));
        }
        if !(width > MIN_SELECTION && height > MIN_SELECTION) {
            return Err(Error::SelectionTooSmall(width, height));
        }
        Ok(Selection {
            top,
            left,
            width,
            height,
        })
    }

    /// Distance of the top edge from the top of the raster.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Distance of the left edge from the left of the raster.
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Width in device pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in device pixels.
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// How much of the complex plane a single pixel covers, along each
/// axis.
#[inline]
pub fn scale_factors(viewport: &Viewport, width: usize, height: usize) -> (f64, f64) {
    (
        viewport.width() / (width as f64),
        viewport.height() / (height as f64),
    )
}

/// Given the byte offset of a pixel in a raster laid out with `stride`
/// bytes per row, return the point on the complex plane it samples.
/// Both `stride` and `bytes_per_pixel` must be non-zero; `PlaneMapper`
/// guarantees this.
#[inline]
pub fn pixel_to_complex(
    pixel_index: usize,
    viewport: &Viewport,
    stride: usize,
    bytes_per_pixel: usize,
    x_scale: f64,
    y_scale: f64,
) -> Complex<f64> {
    debug_assert!(stride > 0 && bytes_per_pixel > 0, "empty raster geometry");
    let row = pixel_index / stride;
    let col = (pixel_index % stride) / bytes_per_pixel;
    Complex::new(
        viewport.left + (col as f64) * x_scale,
        viewport.top - (row as f64) * y_scale,
    )
}

/// The viewport covered by a rectangle on the raster.  The caller is
/// responsible for rejecting rectangles too small to be a drag; see
/// `Selection`.  Fails with `InvalidViewport` if the result is not a
/// proper rectangle, which happens once a zoom runs out of `f64`
/// precision.
pub fn zoom_in_region(
    viewport: &Viewport,
    x_scale: f64,
    y_scale: f64,
    rect_top: f64,
    rect_left: f64,
    rect_width: f64,
    rect_height: f64,
) -> Result<Viewport> {
    let left = viewport.left + rect_left * x_scale;
    let top = viewport.top - rect_top * y_scale;
    Viewport::new(
        left,
        left + rect_width * x_scale,
        top,
        top - rect_height * y_scale,
    )
}

/// Holds the relationship between a viewport and a raster of a given
/// shape, so that the scale factors are worked out once per
/// generation rather than once per pixel.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    viewport: Viewport,
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    stride: usize,
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  A raster with no area cannot be mapped.
    pub fn new(
        viewport: Viewport,
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
    ) -> Result<PlaneMapper> {
        if width == 0 || height == 0 || bytes_per_pixel == 0 {
            return Err(Error::InvalidDimensions(width, height));
        }
        Ok(PlaneMapper {
            viewport,
            width,
            height,
            bytes_per_pixel,
            stride: width * bytes_per_pixel,
            grid_factors: scale_factors(&viewport, width, height),
        })
    }

    /// The viewport being mapped.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Complex units per pixel, real then imaginary.
    pub fn grid_factors(&self) -> (f64, f64) {
        self.grid_factors
    }

    /// Bytes per raster row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Given the byte offset of a pixel, return the point it samples.
    #[inline]
    pub fn pixel_to_point(&self, pixel_index: usize) -> Complex<f64> {
        pixel_to_complex(
            pixel_index,
            &self.viewport,
            self.stride,
            self.bytes_per_pixel,
            self.grid_factors.0,
            self.grid_factors.1,
        )
    }

    /// Given a row and column, return the byte offset of that pixel.
    #[inline]
    pub fn pixel_to_offset(&self, pixel: Pixel) -> usize {
        pixel.row * self.stride + pixel.col * self.bytes_per_pixel
    }

    /// Given a point on the complex plane, return the nearest pixel,
    /// or `None` if the point falls outside the raster.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let col = ((point.re - self.viewport.left) / self.grid_factors.0).round();
        let row = ((self.viewport.top - point.im) / self.grid_factors.1).round();
        if col < 0.0 || row < 0.0 || col >= (self.width as f64) || row >= (self.height as f64) {
            return None;
        }
        Some(Pixel {
            row: row as usize,
            col: col as usize,
        })
    }

    /// The viewport covered by a selection on this raster.
    pub fn zoom(&self, selection: &Selection) -> Result<Viewport> {
        zoom_in_region(
            &self.viewport,
            self.grid_factors.0,
            self.grid_factors.1,
            selection.top,
            selection.left,
            selection.width,
            selection.height,
        )
    }
}
