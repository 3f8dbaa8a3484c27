// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Zoom history: every image the user zoomed in from, oldest first.
//! Entries are copies, so later generations into the live raster
//! never change them.  Zoom indices always run 1, 2, ... n.

use errors::{Error, Result};
use raster::RasterBuffer;

/// Ordered stack of earlier rasters.
#[derive(Debug, Default)]
pub struct ZoomHistory {
    entries: Vec<RasterBuffer>,
}

impl ZoomHistory {
    /// An empty history.
    pub fn new() -> ZoomHistory {
        ZoomHistory::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there is nothing to zoom out to.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries, oldest first.
    pub fn entries(&self) -> &[RasterBuffer] {
        &self.entries
    }

    /// The entry with the given zoom index.
    pub fn get(&self, zoom_index: usize) -> Option<&RasterBuffer> {
        self.entries.iter().find(|e| e.zoom_index() == zoom_index)
    }

    /// Copy `raster` onto the end of the history and return its zoom
    /// index.
    pub fn push_current(&mut self, raster: &RasterBuffer) -> usize {
        let mut entry = raster.copy();
        let zoom_index = self.entries.len() + 1;
        entry.set_zoom_index(zoom_index);
        self.entries.push(entry);
        zoom_index
    }

    /// Zoom out to the entry with `zoom_index`.  Everything recorded at
    /// or after that point is dropped, the survivors are renumbered
    /// from 1, and the target is handed back to become the live
    /// raster.
    pub fn pop_to(&mut self, zoom_index: usize) -> Result<RasterBuffer> {
        let position = self
            .entries
            .iter()
            .position(|e| e.zoom_index() == zoom_index)
            .ok_or(Error::NoSuchZoom(zoom_index))?;
        let target = self.entries.remove(position);
        self.entries.retain(|e| e.zoom_index() < target.zoom_index());
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.set_zoom_index(i + 1);
        }
        Ok(target)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colors::Rgba;
    use planes::Viewport;

    fn raster(tag: u8) -> RasterBuffer {
        let r = RasterBuffer::with_viewport(
            1,
            1,
            Viewport::new(0.0, f64::from(tag) + 1.0, 1.0, 0.0).unwrap(),
        )
        .unwrap();
        r.write_pixel(0, Rgba::opaque(tag, tag, tag)).unwrap();
        r
    }

    fn filled(n: u8) -> ZoomHistory {
        let mut history = ZoomHistory::new();
        for tag in 1..=n {
            assert_eq!(history.push_current(&raster(tag)), usize::from(tag));
        }
        history
    }

    #[test]
    fn push_numbers_from_one() {
        let history = filled(3);
        let indices: Vec<usize> = history.entries().iter().map(|e| e.zoom_index()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn pushed_entries_are_copies() {
        let live = raster(7);
        let mut history = ZoomHistory::new();
        history.push_current(&live);
        live.write_pixel(0, Rgba::opaque(0, 0, 0)).unwrap();
        assert_eq!(history.get(1).unwrap().snapshot(), vec![7, 7, 7, 255]);
        assert_eq!(live.zoom_index(), 0);
    }

    #[test]
    fn zooming_out_to_two_keeps_only_one() {
        let mut history = filled(4);
        let target = history.pop_to(2).unwrap();
        assert_eq!(target.snapshot(), vec![2, 2, 2, 255]);
        assert_eq!(history.len(), 1);
        let survivor = &history.entries()[0];
        assert_eq!(survivor.zoom_index(), 1);
        assert_eq!(survivor.snapshot(), vec![1, 1, 1, 255]);
    }

    #[test]
    fn zooming_out_to_one_empties_the_history() {
        let mut history = filled(3);
        let target = history.pop_to(1).unwrap();
        assert_eq!(target.viewport().right(), 2.0);
        assert!(history.is_empty());
    }

    #[test]
    fn survivors_are_renumbered_and_new_pushes_follow_them() {
        let mut history = filled(5);
        history.pop_to(4).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.push_current(&raster(9)), 4);
        let tags: Vec<u8> = history.entries().iter().map(|e| e.snapshot()[0]).collect();
        assert_eq!(tags, vec![1, 2, 3, 9]);
    }

    #[test]
    fn unknown_targets_are_reported() {
        let mut history = filled(2);
        assert_eq!(history.pop_to(5).unwrap_err(), Error::NoSuchZoom(5));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut history = filled(3);
        history.clear();
        assert!(history.is_empty());
        assert!(history.get(1).is_none());
    }
}
