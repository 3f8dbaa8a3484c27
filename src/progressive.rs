// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Progressive preview.  While the workers fill the raster, a
//! separate thread wakes up every draw interval and copies whatever
//! is there to a display surface.  Those copies may be torn; the
//! generator always follows up with one last flush after every worker
//! has finished, so the final frame is complete.

use crossbeam::channel::{Receiver, RecvTimeoutError};
use raster::RasterBuffer;
use std::time::Duration;

/// A copy of the raster at some instant, B, G, R, A.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Bytes per row.
    pub stride: usize,
    /// The pixel bytes.
    pub pixels: Vec<u8>,
}

/// Anything that can show a frame: a window, a texture, a test
/// harness.
pub trait Display {
    /// Show `frame`.  Called from the preview thread while generation
    /// is running, and from the generating thread once it is done.
    fn flush(&mut self, frame: &Frame);
}

/// Throws every frame away.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn flush(&mut self, _frame: &Frame) {}
}

/// Counts frames and keeps the most recent one.
#[derive(Clone, Debug, Default)]
pub struct RecordingDisplay {
    /// How many times `flush` has been called.
    pub flushes: usize,
    /// The last frame flushed.
    pub last: Option<Frame>,
}

impl Display for RecordingDisplay {
    fn flush(&mut self, frame: &Frame) {
        self.flushes += 1;
        self.last = Some(frame.clone());
    }
}

/// Flush `raster` to `display` every `interval` until something
/// arrives on `done` or its sender hangs up.  Returns the number of
/// frames flushed.
pub fn preview<D: Display + ?Sized>(
    raster: &RasterBuffer,
    display: &mut D,
    interval: Duration,
    done: &Receiver<()>,
) -> usize {
    let mut frames = 0;
    loop {
        match done.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                raster.flush_to_display(display);
                frames += 1;
                trace!("preview frame {}", frames);
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use colors::Rgba;
    use crossbeam::channel;
    use std::thread;

    #[test]
    fn preview_stops_when_sender_hangs_up() {
        let raster = RasterBuffer::allocate(2, 2).unwrap();
        let (tx, rx) = channel::bounded::<()>(1);
        drop(tx);
        let mut display = RecordingDisplay::default();
        assert_eq!(preview(&raster, &mut display, Duration::from_secs(60), &rx), 0);
        assert_eq!(display.flushes, 0);
    }

    #[test]
    fn preview_flushes_until_told_to_stop() {
        let raster = RasterBuffer::allocate(2, 2).unwrap();
        raster.write_pixel(0, Rgba::opaque(1, 2, 3)).unwrap();
        let (tx, rx) = channel::bounded::<()>(1);
        let mut display = RecordingDisplay::default();
        let frames = crossbeam::scope(|s| {
            let handle = s.spawn(|_| preview(&raster, &mut display, Duration::from_millis(1), &rx));
            thread::sleep(Duration::from_millis(50));
            tx.send(()).unwrap();
            handle.join().unwrap()
        })
        .unwrap();
        assert!(frames > 0);
        assert_eq!(display.flushes, frames);
        let last = display.last.unwrap();
        assert_eq!((last.width, last.height, last.stride), (2, 2, 8));
        assert_eq!(&last.pixels[..4], &[3, 2, 1, 255]);
    }
}
