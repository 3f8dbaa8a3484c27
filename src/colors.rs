// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color schemes.  Every function here is pure: the same escape data
//! always produces the same bytes, and nothing is shared between
//! workers.
//!
//! Channel arithmetic is deliberately 8-bit: intermediate values are
//! truncated to an integer and then to their low byte, so values past
//! 255 wrap around rather than clamp.  `NaN` and the infinities
//! truncate to zero.

use errors::Error;
use kernel::Escape;
use num::Complex;
use std::fmt;
use std::str::FromStr;

/// A single color, stored in the usual reading order.  The raster
/// stores it as B, G, R, A.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba {
    /// An opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Rgba {
        Rgba { r, g, b, a: 255 }
    }

    /// The byte order used by the raster.
    #[inline]
    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

/// Points presumed to be inside the set.
pub const MEMBER: Rgba = Rgba::opaque(0, 0, 0);

/// The fixed output of the `Black` scheme.  The scheme is named for
/// the set, which it leaves black against this.
pub const BLACK_SCHEME: Rgba = Rgba::opaque(255, 255, 255);

/// The `Gold` scheme's palette, indexed by iteration count mod 16.
pub const GOLD: [Rgba; 16] = [
    Rgba::opaque(40, 30, 25),
    Rgba::opaque(26, 30, 25),
    Rgba::opaque(43, 30, 25),
    Rgba::opaque(100, 7, 26),
    Rgba::opaque(4, 1, 83),
    Rgba::opaque(50, 4, 63),
    Rgba::opaque(10, 7, 120),
    Rgba::opaque(50, 82, 177),
    Rgba::opaque(43, 181, 29),
    Rgba::opaque(99, 236, 248),
    Rgba::opaque(33, 33, 191),
    Rgba::opaque(25, 221, 95),
    Rgba::opaque(255, 43, 0),
    Rgba::opaque(102, 63, 0),
    Rgba::opaque(92, 61, 0),
    Rgba::opaque(73, 92, 3),
];

/// The available color schemes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Bernstein polynomial gradient over the normalized count.
    Continuous,
    /// Sixteen-color repeating palette.
    Gold,
    /// White outside, black inside.
    Black,
    /// Smoothed count, red base.
    SmoothRed,
    /// Smoothed count, blue base.
    WaveyBlue,
}

impl ColorScheme {
    /// Every scheme, in menu order.
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Continuous,
        ColorScheme::Gold,
        ColorScheme::Black,
        ColorScheme::SmoothRed,
        ColorScheme::WaveyBlue,
    ];

    /// The human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Continuous => "Continuous",
            ColorScheme::Gold => "Gold",
            ColorScheme::Black => "Black",
            ColorScheme::SmoothRed => "Smooth Red",
            ColorScheme::WaveyBlue => "Wavey Blue",
        }
    }
}

impl Default for ColorScheme {
    fn default() -> ColorScheme {
        ColorScheme::Continuous
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = Error;

    /// Case and spacing are ignored, so `smooth-red`, `SmoothRed` and
    /// `Smooth Red` all work.  `Continious` is accepted for old
    /// settings.
    fn from_str(s: &str) -> Result<ColorScheme, Error> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        match key.as_str() {
            "continuous" | "continious" => Ok(ColorScheme::Continuous),
            "gold" => Ok(ColorScheme::Gold),
            "black" => Ok(ColorScheme::Black),
            "smoothred" => Ok(ColorScheme::SmoothRed),
            "waveyblue" => Ok(ColorScheme::WaveyBlue),
            _ => Err(Error::UnknownScheme(s.to_string())),
        }
    }
}

/// Truncate a float to an integer, then keep the low byte.
#[inline]
fn wrap_channel(v: f64) -> u8 {
    (v as i64) as u8
}

/// Color for a single iterated point.  Members of the set are always
/// black, whatever the scheme.
pub fn select_color(escape: &Escape, max_iterations: u64, scheme: ColorScheme) -> Rgba {
    if escape.count == max_iterations {
        return MEMBER;
    }
    match scheme {
        ColorScheme::Black => BLACK_SCHEME,
        ColorScheme::Gold => gold(escape.count),
        ColorScheme::Continuous => continuous(escape.count, max_iterations),
        ColorScheme::SmoothRed => smooth_red(escape.count, escape.z),
        ColorScheme::WaveyBlue => wavey_blue(escape.count, escape.z),
    }
}

/// Discrete palette lookup.
#[inline]
pub fn gold(count: u64) -> Rgba {
    GOLD[(count % 16) as usize]
}

/// Bernstein-basis gradient.  The red term peaks above 255 after the
/// 1.1 gain and wraps.
pub fn continuous(count: u64, max_iterations: u64) -> Rgba {
    let x = (count as f64) / (max_iterations as f64);

    let r = (9.0 * (1.0 - x) * x * x * x * 255.0).floor() as i64;
    let g = (14.0 * (1.0 - x) * (1.0 - x) * x * x * 255.0).floor() as i64;
    let b = (8.0 * (1.0 - x) * (1.0 - x) * (1.0 - x) * x * 255.0).floor() as i64;

    Rgba::opaque(
        wrap_channel(r as f64 * 1.1),
        wrap_channel(g as f64 * 1.1),
        wrap_channel(b as f64 * 1.1),
    )
}

#[inline]
fn brightness(count: u64, magnitude: f64) -> u8 {
    wrap_channel(256.0 * (1.0 + (count as f64) - magnitude).log2())
}

/// Smoothed count with `Z = sqrt(|z|)`.  When `Z > count` the
/// logarithm is of a non-positive number and the channel is 0.
pub fn smooth_red(count: u64, z: Complex<f64>) -> Rgba {
    let b = brightness(count, z.norm().sqrt());
    Rgba::opaque(255, b, b)
}

/// Smoothed count with `Z = sqrt(re^2 + im^2)`, that is `|z|` itself,
/// unlike `smooth_red`.  Same domain caveat.
pub fn wavey_blue(count: u64, z: Complex<f64>) -> Rgba {
    let b = brightness(count, (z.im * z.im + z.re * z.re).sqrt());
    Rgba::opaque(b, b, 200)
}
