// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel store.  Pixels are four bytes, B, G, R, A, packed row
//! after row with no padding, so the stride is always `width * 4`.
//!
//! Bytes are held in relaxed atomics.  Generation workers write
//! disjoint byte ranges through a shared reference while the preview
//! reads the same bytes; a preview may see a half-finished frame, or
//! even a half-written pixel, but never undefined behavior.  Relaxed
//! loads and stores compile to plain moves on every platform we care
//! about.

use colors::Rgba;
use errors::{Error, Result};
use planes::{Pixel, PlaneMapper, Viewport};
use progressive::{Display, Frame};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Bytes per pixel: B, G, R, A.
pub const BYTES_PER_PIXEL: usize = 4;

/// An image being, or having been, generated, together with the
/// viewport it depicts and its place in the zoom history.
pub struct RasterBuffer {
    width: usize,
    height: usize,
    stride: usize,
    pixels: Box<[AtomicU8]>,
    viewport: Viewport,
    zoom_index: usize,
}

fn zeroed(len: usize) -> Box<[AtomicU8]> {
    (0..len)
        .map(|_| AtomicU8::new(0))
        .collect::<Vec<_>>()
        .into_boxed_slice()
}

impl RasterBuffer {
    /// A zero-filled raster of the given size showing the home view.
    pub fn allocate(width: usize, height: usize) -> Result<RasterBuffer> {
        RasterBuffer::with_viewport(width, height, Viewport::default())
    }

    /// A zero-filled raster of the given size showing `viewport`.
    pub fn with_viewport(width: usize, height: usize, viewport: Viewport) -> Result<RasterBuffer> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(width, height));
        }
        let stride = width
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or(Error::InvalidDimensions(width, height))?;
        let len = stride
            .checked_mul(height)
            .ok_or(Error::InvalidDimensions(width, height))?;
        Ok(RasterBuffer {
            width,
            height,
            stride,
            pixels: zeroed(len),
            viewport,
            zoom_index: 0,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Size of the pixel store in bytes.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Never true; a raster always has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// The region of the complex plane this raster depicts.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Point the raster at a new region.  Existing pixels are kept
    /// until the next generation overwrites them.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Position in the zoom history, counting from 1.  Zero for a
    /// raster that has never been pushed.
    pub fn zoom_index(&self) -> usize {
        self.zoom_index
    }

    /// Used by the zoom history when renumbering.
    pub fn set_zoom_index(&mut self, zoom_index: usize) {
        self.zoom_index = zoom_index;
    }

    /// A mapper from this raster's pixels to its viewport.
    pub fn mapper(&self) -> Result<PlaneMapper> {
        PlaneMapper::new(self.viewport, self.width, self.height, BYTES_PER_PIXEL)
    }

    /// Write one pixel, B, G, R, A, starting at `byte_index`.
    #[inline]
    pub fn write_pixel(&self, byte_index: usize, color: Rgba) -> Result<()> {
        let len = self.pixels.len();
        let end = byte_index
            .checked_add(BYTES_PER_PIXEL)
            .ok_or(Error::OutOfRange {
                index: byte_index,
                len,
            })?;
        if end > len {
            return Err(Error::OutOfRange {
                index: byte_index,
                len,
            });
        }
        for (cell, byte) in self.pixels[byte_index..end].iter().zip(&color.to_bgra()) {
            cell.store(*byte, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Read the pixel at a row and column.
    pub fn pixel(&self, pixel: Pixel) -> Option<Rgba> {
        if pixel.row >= self.height || pixel.col >= self.width {
            return None;
        }
        let at = pixel.row * self.stride + pixel.col * BYTES_PER_PIXEL;
        let px = &self.pixels[at..at + BYTES_PER_PIXEL];
        Some(Rgba {
            b: px[0].load(Ordering::Relaxed),
            g: px[1].load(Ordering::Relaxed),
            r: px[2].load(Ordering::Relaxed),
            a: px[3].load(Ordering::Relaxed),
        })
    }

    /// The raw B, G, R, A bytes as they stand right now.
    pub fn snapshot(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect()
    }

    /// The pixels reordered as R, G, B, A, for encoders that expect it.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = self.snapshot();
        for px in bytes.chunks_mut(BYTES_PER_PIXEL) {
            px.swap(0, 2);
        }
        bytes
    }

    /// Hand the current pixels to a display surface.  Safe to call
    /// while a generation is writing.
    pub fn flush_to_display<D: Display + ?Sized>(&self, display: &mut D) {
        display.flush(&Frame {
            width: self.width,
            height: self.height,
            stride: self.stride,
            pixels: self.snapshot(),
        });
    }

    /// A by-value copy: dimensions, pixels, viewport and zoom index.
    /// Later writes to either raster never show up in the other.
    pub fn copy(&self) -> RasterBuffer {
        RasterBuffer {
            width: self.width,
            height: self.height,
            stride: self.stride,
            pixels: self
                .pixels
                .iter()
                .map(|cell| AtomicU8::new(cell.load(Ordering::Relaxed)))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
            viewport: self.viewport,
            zoom_index: self.zoom_index,
        }
    }
}

impl Clone for RasterBuffer {
    fn clone(&self) -> RasterBuffer {
        self.copy()
    }
}

impl fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("viewport", &self.viewport)
            .field("zoom_index", &self.zoom_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_zeroed_and_sized() {
        let raster = RasterBuffer::allocate(5, 3).unwrap();
        assert_eq!(raster.stride(), 20);
        assert_eq!(raster.len(), 60);
        assert_eq!(raster.pixel_count(), 15);
        assert!(raster.snapshot().iter().all(|b| *b == 0));
        assert_eq!(raster.viewport(), &Viewport::default());
        assert_eq!(raster.zoom_index(), 0);
    }

    #[test]
    fn empty_rasters_are_refused() {
        assert_eq!(
            RasterBuffer::allocate(0, 3).unwrap_err(),
            Error::InvalidDimensions(0, 3)
        );
        assert!(RasterBuffer::allocate(usize::max_value(), 2).is_err());
    }

    #[test]
    fn pixels_are_written_bgra() {
        let raster = RasterBuffer::allocate(2, 2).unwrap();
        raster.write_pixel(4, Rgba { r: 1, g: 2, b: 3, a: 4 }).unwrap();
        assert_eq!(&raster.snapshot()[4..8], &[3, 2, 1, 4]);
        assert_eq!(
            raster.pixel(Pixel { row: 0, col: 1 }),
            Some(Rgba { r: 1, g: 2, b: 3, a: 4 })
        );
        assert_eq!(&raster.to_rgba()[4..8], &[1, 2, 3, 4]);
    }

    #[test]
    fn out_of_range_writes_fail_loudly() {
        let raster = RasterBuffer::allocate(2, 2).unwrap();
        let white = Rgba::opaque(255, 255, 255);
        assert!(raster.write_pixel(12, white).is_ok());
        assert_eq!(
            raster.write_pixel(13, white),
            Err(Error::OutOfRange { index: 13, len: 16 })
        );
        assert_eq!(
            raster.write_pixel(16, white),
            Err(Error::OutOfRange { index: 16, len: 16 })
        );
        assert!(raster.write_pixel(usize::max_value(), white).is_err());
        // Nothing was written by the failed attempts.
        assert_eq!(&raster.snapshot()[..12], &[0; 12]);
    }

    #[test]
    fn copies_are_independent() {
        let mut raster = RasterBuffer::allocate(2, 1).unwrap();
        raster.set_zoom_index(3);
        let copy = raster.copy();
        raster.write_pixel(0, Rgba::opaque(9, 9, 9)).unwrap();
        raster.set_viewport(Viewport::new(0.0, 1.0, 1.0, 0.0).unwrap());
        assert_eq!(copy.snapshot(), vec![0; 8]);
        assert_eq!(copy.viewport(), &Viewport::default());
        assert_eq!(copy.zoom_index(), 3);
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let raster = RasterBuffer::allocate(2, 2).unwrap();
        assert_eq!(raster.pixel(Pixel { row: 2, col: 0 }), None);
        assert_eq!(raster.pixel(Pixel { row: 0, col: 2 }), None);
    }
}
