// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An exploration session: the live image, the zoom history, and the
//! settings the next generation will use.  This is everything a front
//! end needs short of drawing the window.
//!
//! Every method takes `&self`, so a session can be shared between the
//! thread that renders and the one that handles input.  Each command
//! that changes the image holds the session's busy flag from start to
//! finish, and touches the history, size and current image only after
//! its generation has run.  While a command is in flight every other
//! one is turned away with `Outcome::Rejected` and changes nothing;
//! only `cancel` gets through.

use config::GenerationConfig;
use errors::{Error, Result};
use generator::{Admission, Canceller, Generator, Outcome};
use history::ZoomHistory;
use kernel::{EscapeTime, Mandelbrot};
use planes::{Selection, Viewport};
use progressive::Display;
use raster::RasterBuffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

struct Session {
    current: Arc<RasterBuffer>,
    history: ZoomHistory,
    config: GenerationConfig,
    width: usize,
    height: usize,
}

/// A zoomable view of an escape-time fractal.
pub struct Explorer<K = Mandelbrot> {
    generator: Generator<K>,
    busy: AtomicBool,
    session: Mutex<Session>,
}

impl Explorer<Mandelbrot> {
    /// A session on the Mandelbrot set.  The first image is blank
    /// until `render` or `restore` is called.
    pub fn new(width: usize, height: usize, config: GenerationConfig) -> Result<Explorer<Mandelbrot>> {
        Explorer::with_generator(Generator::new(), width, height, config)
    }
}

impl<K: EscapeTime> Explorer<K> {
    /// A session using a particular generator.
    pub fn with_generator(
        generator: Generator<K>,
        width: usize,
        height: usize,
        config: GenerationConfig,
    ) -> Result<Explorer<K>> {
        config.validate()?;
        let current = Arc::new(RasterBuffer::allocate(width, height)?);
        Ok(Explorer {
            generator,
            busy: AtomicBool::new(false),
            session: Mutex::new(Session {
                current,
                history: ZoomHistory::new(),
                config,
                width,
                height,
            }),
        })
    }

    // A panic elsewhere cannot leave the session half-updated: every
    // change is a single assignment, so a poisoned lock is still safe
    // to use.
    fn session<'a>(&'a self) -> MutexGuard<'a, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn admit<'a>(&'a self, command: &str) -> Option<Admission<'a>> {
        let admission = Admission::try_acquire(&self.busy);
        if admission.is_none() {
            warn!("{} ignored: generation in progress", command);
        }
        admission
    }

    // The session lock is not held while the workers run, so `current`
    // keeps answering with the previous image.
    fn generate<D: Display + Send + ?Sized>(
        &self,
        width: usize,
        height: usize,
        viewport: Viewport,
        display: &mut D,
    ) -> Result<(Outcome, RasterBuffer)> {
        let config = self.session().config;
        let raster = RasterBuffer::with_viewport(width, height, viewport)?;
        let outcome = self.generator.generate_with_display(&raster, &config, display)?;
        Ok((outcome, raster))
    }

    fn size(&self) -> (usize, usize) {
        let session = self.session();
        (session.width, session.height)
    }

    /// True if no generation is running.
    pub fn is_free(&self) -> bool {
        !self.busy.load(Ordering::Acquire) && !self.generator.is_busy()
    }

    /// Stop the running generation, if there is one.
    pub fn cancel(&self) {
        self.generator.cancel();
    }

    /// A stop button that can be handed to another thread.
    pub fn canceller(&self) -> Canceller {
        self.generator.canceller()
    }

    /// The image on show.  While a generation is running this is the
    /// previous image; the new one is installed when it finishes or
    /// is cancelled.
    pub fn current(&self) -> Arc<RasterBuffer> {
        self.session().current.clone()
    }

    /// The settings the next generation will use.
    pub fn config(&self) -> GenerationConfig {
        self.session().config
    }

    /// Change the settings.  Takes effect on the next generation.
    pub fn set_config(&self, config: GenerationConfig) -> Result<()> {
        config.validate()?;
        self.session().config = config;
        Ok(())
    }

    /// Zoom indices and viewports of the history, oldest first.
    pub fn zoom_levels(&self) -> Vec<(usize, Viewport)> {
        self.session()
            .history
            .entries()
            .iter()
            .map(|e| (e.zoom_index(), *e.viewport()))
            .collect()
    }

    /// Generate `viewport` at the session's size and make it current.
    pub fn render<D: Display + Send + ?Sized>(
        &self,
        viewport: Viewport,
        display: &mut D,
    ) -> Result<Outcome> {
        let _admission = match self.admit("render") {
            Some(admission) => admission,
            None => return Ok(Outcome::Rejected),
        };
        let (width, height) = self.size();
        let (outcome, raster) = self.generate(width, height, viewport, display)?;
        if outcome != Outcome::Rejected {
            self.session().current = Arc::new(raster);
        }
        Ok(outcome)
    }

    /// Generate the current viewport again, after a change of
    /// settings.
    pub fn refresh<D: Display + Send + ?Sized>(&self, display: &mut D) -> Result<Outcome> {
        let _admission = match self.admit("refresh") {
            Some(admission) => admission,
            None => return Ok(Outcome::Rejected),
        };
        let (width, height) = self.size();
        let viewport = *self.current().viewport();
        let (outcome, raster) = self.generate(width, height, viewport, display)?;
        if outcome != Outcome::Rejected {
            self.session().current = Arc::new(raster);
        }
        Ok(outcome)
    }

    /// Generate the region under `selection`, then remember the image
    /// it replaces.
    pub fn zoom_in<D: Display + Send + ?Sized>(
        &self,
        selection: &Selection,
        display: &mut D,
    ) -> Result<Outcome> {
        let _admission = match self.admit("zoom") {
            Some(admission) => admission,
            None => return Ok(Outcome::Rejected),
        };
        let (width, height) = self.size();
        let viewport = self.current().mapper()?.zoom(selection)?;
        debug!("zooming into {:?}", viewport);
        let (outcome, raster) = self.generate(width, height, viewport, display)?;
        if outcome != Outcome::Rejected {
            let mut session = self.session();
            let previous = session.current.clone();
            let zoom_index = session.history.push_current(&previous);
            debug!("zoom {} saved", zoom_index);
            session.current = Arc::new(raster);
        }
        Ok(outcome)
    }

    /// Go back to the image with `zoom_index`.  Later history is
    /// dropped.  Nothing is generated; the saved pixels are reused.
    pub fn zoom_out(&self, zoom_index: usize) -> Result<Outcome> {
        let _admission = match self.admit("zoom out") {
            Some(admission) => admission,
            None => return Ok(Outcome::Rejected),
        };
        let mut session = self.session();
        let target = session.history.pop_to(zoom_index)?;
        debug!(
            "zoomed out to {}; {} levels remain",
            zoom_index,
            session.history.len()
        );
        session.current = Arc::new(target);
        Ok(Outcome::Completed)
    }

    /// Forget the history and generate the home view.
    pub fn restore<D: Display + Send + ?Sized>(&self, display: &mut D) -> Result<Outcome> {
        let _admission = match self.admit("restore") {
            Some(admission) => admission,
            None => return Ok(Outcome::Rejected),
        };
        let (width, height) = self.size();
        let (outcome, raster) = self.generate(width, height, Viewport::default(), display)?;
        if outcome != Outcome::Rejected {
            let mut session = self.session();
            session.history.clear();
            session.current = Arc::new(raster);
        }
        Ok(outcome)
    }

    /// Change the raster size and generate the home view at it.
    pub fn resize<D: Display + Send + ?Sized>(
        &self,
        width: usize,
        height: usize,
        display: &mut D,
    ) -> Result<Outcome> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(width, height));
        }
        let _admission = match self.admit("resize") {
            Some(admission) => admission,
            None => return Ok(Outcome::Rejected),
        };
        let (outcome, raster) = self.generate(width, height, Viewport::default(), display)?;
        if outcome != Outcome::Rejected {
            let mut session = self.session();
            session.width = width;
            session.height = height;
            session.current = Arc::new(raster);
        }
        Ok(outcome)
    }
}
