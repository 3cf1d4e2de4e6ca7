#![allow(dead_code)]
//! Replay configuration: opacity thresholds and frame-rate conversion.

use serde::{Deserialize, Serialize};

/// First random-sprite slot in a unit's cut table.
pub const RANDOM_SLOT_BASE: usize = 3;
/// Number of consecutive cuts that form the random-sprite pool.
pub const RANDOM_SLOT_COUNT: usize = 4;

/// Tunable replay parameters shared by every puppet.
///
/// Thresholds are expressed in percent to match the knobs exposed to users;
/// the comparisons happen on the evaluated opacity product in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Opacity (percent) below which a part is treated as invisible.
    pub dead_opacity: f32,
    /// Opacity (percent) below which a part is drawn translucent.
    pub full_opacity: f32,
    /// Frames per second used for frame <-> milliseconds conversion.
    pub frame_rate: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dead_opacity: 10.0,
            full_opacity: 90.0,
            frame_rate: 30.0,
        }
    }
}

impl Config {
    /// True when `opacity` (in `[0, 1]`) is below the dead threshold and the
    /// part should be skipped entirely.
    #[inline]
    pub fn opacity_dead(&self, opacity: f32) -> bool {
        opacity < self.dead_opacity * 0.01 + 1e-5
    }

    /// True when `opacity` (in `[0, 1]`) is below the full threshold and the
    /// part should be composited translucently.
    #[inline]
    pub fn opacity_translucent(&self, opacity: f32) -> bool {
        opacity < self.full_opacity * 0.01 - 1e-5
    }

    /// Convert a frame count to milliseconds at the configured rate.
    #[inline]
    pub fn frame_to_ms(&self, frames: f32) -> f32 {
        frames * 1000.0 / self.frame_rate
    }

    /// Convert milliseconds to a (fractional) frame count.
    #[inline]
    pub fn ms_to_frame(&self, ms: f32) -> f32 {
        ms * self.frame_rate / 1000.0
    }
}
