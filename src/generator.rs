// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The generator splits a raster into contiguous, disjoint runs of
//! pixels, one per worker, and runs every worker on its own scoped
//! thread.  No two workers ever touch the same bytes, so the only
//! state they share is the cancellation flag.
//!
//! A preview thread runs alongside the workers and flushes the raster
//! to a display every draw interval.  Once every worker has been
//! joined the generator flushes one last time from the calling
//! thread, so the final frame is always the finished one.
//!
//! Only one generation may be in flight per generator.  A second
//! request while one is running is turned away, not queued.

use colors::select_color;
use config::GenerationConfig;
use crossbeam::channel;
use crossbeam::thread::ScopedJoinHandle;
use errors::{Error, Result};
use kernel::{EscapeTime, Mandelbrot};
use planes::PlaneMapper;
use progressive::{self, Display, NullDisplay};
use raster::{RasterBuffer, BYTES_PER_PIXEL};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// How a generation ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every pixel was written.
    Completed,
    /// `cancel` was called; pixels written before that are intact.
    Cancelled,
    /// Another generation was already running; nothing was done.
    Rejected,
}

/// Split `pixel_count` pixels into `segments` contiguous runs.  Each
/// run gets `pixel_count / segments` pixels and the last one also
/// takes the remainder, so every pixel belongs to exactly one run.
/// Never returns more runs than there are pixels.
pub fn segment_ranges(pixel_count: usize, segments: usize) -> Vec<Range<usize>> {
    let segments = segments.max(1).min(pixel_count.max(1));
    let per_segment = pixel_count / segments;
    (0..segments)
        .map(|i| {
            let start = i * per_segment;
            let end = if i + 1 == segments {
                pixel_count
            } else {
                start + per_segment
            };
            start..end
        })
        .collect()
}

/// Holds a busy flag for as long as it lives and releases it however
/// the holder returns.
pub(crate) struct Admission<'a>(&'a AtomicBool);

impl<'a> Admission<'a> {
    pub(crate) fn try_acquire(flag: &'a AtomicBool) -> Option<Admission<'a>> {
        match flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => Some(Admission(flag)),
            Err(_) => None,
        }
    }
}

impl<'a> Drop for Admission<'a> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A handle on a generator's cancellation flag that can be passed to
/// whoever needs a stop button.
#[derive(Clone, Debug)]
pub struct Canceller(Arc<AtomicBool>);

impl Canceller {
    /// Ask the running generation to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Runs escape-time generations against raster buffers.
pub struct Generator<K = Mandelbrot> {
    kernel: K,
    cancelled: Arc<AtomicBool>,
    busy: AtomicBool,
}

impl Generator<Mandelbrot> {
    /// A generator for the Mandelbrot set.
    pub fn new() -> Generator<Mandelbrot> {
        Generator::with_kernel(Mandelbrot)
    }
}

impl Default for Generator<Mandelbrot> {
    fn default() -> Generator<Mandelbrot> {
        Generator::new()
    }
}

impl<K: EscapeTime> Generator<K> {
    /// A generator for any escape-time family.
    pub fn with_kernel(kernel: K) -> Generator<K> {
        Generator {
            kernel,
            cancelled: Arc::new(AtomicBool::new(false)),
            busy: AtomicBool::new(false),
        }
    }

    /// The kernel in use.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// True while a generation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Ask the running generation to stop.  Returns immediately;
    /// workers notice before their next pixel.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// A detached handle on the cancellation flag.
    pub fn canceller(&self) -> Canceller {
        Canceller(self.cancelled.clone())
    }

    /// Fill `raster` with no preview.  Blocks until done or cancelled.
    pub fn generate(&self, raster: &RasterBuffer, config: &GenerationConfig) -> Result<Outcome> {
        self.generate_with_display(raster, config, &mut NullDisplay)
    }

    /// Fill `raster`, flushing it to `display` every draw interval
    /// while the workers run and once more at the end.  Blocks until
    /// done or cancelled.
    pub fn generate_with_display<D: Display + Send + ?Sized>(
        &self,
        raster: &RasterBuffer,
        config: &GenerationConfig,
        display: &mut D,
    ) -> Result<Outcome> {
        config.validate()?;
        let mapper = raster.mapper()?;

        let _admission = match Admission::try_acquire(&self.busy) {
            Some(admission) => admission,
            None => {
                warn!("generation already in progress; request ignored");
                return Ok(Outcome::Rejected);
            }
        };
        self.cancelled.store(false, Ordering::Relaxed);

        let segments = segment_ranges(raster.pixel_count(), config.resolved_segments());
        debug!(
            "generating {}x{} over {:?}: {} segments of {} pixels, {} iterations, {}",
            raster.width(),
            raster.height(),
            raster.viewport(),
            segments.len(),
            raster.pixel_count() / segments.len(),
            config.max_iterations,
            config.color_scheme
        );

        let started = Instant::now();
        let interval = config.draw_interval();
        let (done_tx, done_rx) = channel::bounded::<()>(1);

        let joined = crossbeam::scope(|spawner| {
            let preview = spawner.spawn(|_| progressive::preview(raster, display, interval, &done_rx));

            let handles: Vec<ScopedJoinHandle<Result<bool>>> = segments
                .into_iter()
                .enumerate()
                .map(|(i, pixels)| {
                    spawner.spawn(move |_| {
                        trace!("segment {} starting on pixels {:?}", i, pixels);
                        let finished = self.render_segment(raster, &mapper, pixels, config);
                        trace!("segment {} done: {:?}", i, finished);
                        finished
                    })
                })
                .collect();

            let results: Vec<Result<bool>> = handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(Err(Error::WorkerPanicked)))
                .collect();

            drop(done_tx);
            let frames = preview.join().unwrap_or(0);
            (results, frames)
        })
        .map_err(|_| Error::WorkerPanicked)?;

        let (results, frames) = joined;
        raster.flush_to_display(display);

        let mut outcome = Outcome::Completed;
        for result in results {
            if !result? {
                outcome = Outcome::Cancelled;
            }
        }

        info!(
            "generation {:?} after {:?} ({} preview frames)",
            outcome,
            started.elapsed(),
            frames
        );
        Ok(outcome)
    }

    /// Iterate, color and store every pixel in `pixels`.  Returns
    /// `false` if the cancellation flag cut the run short.
    fn render_segment(
        &self,
        raster: &RasterBuffer,
        mapper: &PlaneMapper,
        pixels: Range<usize>,
        config: &GenerationConfig,
    ) -> Result<bool> {
        for pixel in pixels {
            if self.cancelled.load(Ordering::Relaxed) {
                return Ok(false);
            }
            let offset = pixel * BYTES_PER_PIXEL;
            let escape = self
                .kernel
                .compute(mapper.pixel_to_point(offset), config.max_iterations);
            raster.write_pixel(
                offset,
                select_color(&escape, config.max_iterations, config.color_scheme),
            )?;
        }
        Ok(true)
    }
}
