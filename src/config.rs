// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-generation settings.  A configuration is checked before a
//! generation starts and never changes while one is running.

use colors::ColorScheme;
use errors::{Error, Result};
use std::time::Duration;

/// Iteration budget used when nobody asks for another.
pub const DEFAULT_MAX_ITERATIONS: u64 = 1000;

/// Preview interval used when the configured one is zero.
pub const DEFAULT_DRAW_INTERVAL_MS: u64 = 100;

/// Settings for one generation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    /// Iterations per point before it is presumed to be in the set.
    pub max_iterations: u64,
    /// Number of workers; 0 means one fewer than the logical cores.
    pub segments: usize,
    /// How escaping points are colored.
    pub color_scheme: ColorScheme,
    /// Milliseconds between preview frames; 0 means the default.
    pub draw_interval_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> GenerationConfig {
        GenerationConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            segments: 0,
            color_scheme: ColorScheme::default(),
            draw_interval_ms: DEFAULT_DRAW_INTERVAL_MS,
        }
    }
}

impl GenerationConfig {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "the iteration budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The number of workers to actually start.
    pub fn resolved_segments(&self) -> usize {
        match self.segments {
            0 => auto_segments(num_cpus::get()),
            n => n,
        }
    }

    /// Time between preview frames.
    pub fn draw_interval(&self) -> Duration {
        match self.draw_interval_ms {
            0 => Duration::from_millis(DEFAULT_DRAW_INTERVAL_MS),
            ms => Duration::from_millis(ms),
        }
    }
}

/// Leave one core for whoever is watching.
fn auto_segments(cores: usize) -> usize {
    if cores > 1 {
        cores - 1
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.segments, 0);
        assert_eq!(config.color_scheme, ColorScheme::Continuous);
        assert_eq!(config.draw_interval(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_iterations_is_refused() {
        let config = GenerationConfig {
            max_iterations: 0,
            ..GenerationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_segments_means_automatic() {
        assert_eq!(auto_segments(8), 7);
        assert_eq!(auto_segments(1), 1);
        assert_eq!(auto_segments(0), 1);
        let config = GenerationConfig::default();
        assert!(config.resolved_segments() >= 1);
        let config = GenerationConfig {
            segments: 3,
            ..config
        };
        assert_eq!(config.resolved_segments(), 3);
    }

    #[test]
    fn zero_draw_interval_means_default() {
        let config = GenerationConfig {
            draw_interval_ms: 0,
            ..GenerationConfig::default()
        };
        assert_eq!(config.draw_interval(), Duration::from_millis(100));
        let config = GenerationConfig {
            draw_interval_ms: 16,
            ..config
        };
        assert_eq!(config.draw_interval(), Duration::from_millis(16));
    }
}
