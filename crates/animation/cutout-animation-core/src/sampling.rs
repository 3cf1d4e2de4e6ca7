#![allow(dead_code)]
//! Frame evaluation: walking tracks and blending between keyframes.
//!
//! Frames are `f32` so hosts can step at any rate; keyframe hits compare
//! exactly, everything between them blends through the keyframe's curve
//! and lands back on an integer value before it is applied.

use crate::data::{Animation, Ease, Modification, Track};
use crate::ease;
use crate::glitch::RandSeries;
use crate::part::PartState;

impl Track {
    /// Index of the part this track drives, or `None` when the table
    /// points outside the skeleton.
    pub fn target(&self, count: usize) -> Option<usize> {
        (self.part >= 0 && (self.part as usize) < count).then_some(self.part as usize)
    }

    /// Re-apply the final keyframe's value; tracks hold it once played out.
    pub fn hold_last(&self, parts: &mut [PartState], series: &mut RandSeries) {
        let Some(target) = self.target(parts.len()) else {
            return;
        };
        if let Some(last) = self.frames.last() {
            parts[target].apply(self.modification, last.value, series);
        }
    }

    /// Apply this track at local `frame`.
    ///
    /// Every keyframe sitting exactly on `frame` applies (duplicates stack,
    /// which tables use to force-order writes). Between two keyframes an
    /// interpolating attribute blends once and stops scanning; parent
    /// reassignment re-applies its left keyframe instead, and id changes
    /// only ever fire exactly on their keyframes. Past the last keyframe
    /// the track holds its final value.
    pub fn evaluate(&self, frame: f32, parts: &mut [PartState], series: &mut RandSeries) {
        let Some(target) = self.target(parts.len()) else {
            return;
        };
        let n = self.frames.len();
        for (i, key) in self.frames.iter().enumerate() {
            if frame == key.frame as f32 {
                parts[target].apply(self.modification, key.value, series);
            } else if i + 1 < n
                && frame > key.frame as f32
                && frame < self.frames[i + 1].frame as f32
            {
                if self.modification.interpolates() {
                    let value = self.blend(i, frame);
                    parts[target].apply(self.modification, value, series);
                    break;
                } else if self.modification == Modification::Parent {
                    parts[target].apply(self.modification, key.value, series);
                }
            }
        }
        if n > 0 && frame > self.frames[n - 1].frame as f32 {
            self.hold_last(parts, series);
        }
    }

    /// Blend between keyframes `i` and `i + 1` at `frame`.
    ///
    /// Adjacent keyframes snap per whole frame instead of sub-frame
    /// blending. Instant curves and flip attributes hold the left value.
    /// Sprite indices round toward the left keyframe so a decreasing
    /// sequence does not skip ahead; everything else floors.
    fn blend(&self, i: usize, frame: f32) -> i32 {
        let k0 = &self.frames[i];
        let k1 = &self.frames[i + 1];
        let gap = k1.frame - k0.frame;
        let frame = if gap == 1 { frame.trunc() } else { frame };
        let snap = k0.ease == Ease::Instant || self.modification.is_flip();
        if !snap && k0.ease == Ease::Polynomial {
            return ease::polynomial_run(&self.frames, i, frame);
        }
        let t = if snap {
            0.0
        } else {
            let raw = (frame - k0.frame as f32) / gap as f32;
            ease::warp(k0.ease, k0.ease_power, raw)
        };
        let lerped = (k1.value as f32 - k0.value as f32) * t + k0.value as f32;
        let v = if self.modification == Modification::Sprite && k1.value < k0.value {
            lerped.ceil()
        } else {
            lerped
        };
        ease::to_int(v)
    }
}

impl Animation {
    /// Evaluate every track at global frame `f`, mutating `parts` in place.
    ///
    /// With `wrap` the frame folds into `[0, len]`. Passing through frame 0
    /// (including every wrap back to it) resets all parts to their model
    /// rows before tracks apply, so replay is a pure function of the frame
    /// for everything except the random sprite series.
    pub fn evaluate(&self, f: f32, parts: &mut [PartState], series: &mut RandSeries, wrap: bool) {
        let mut f = f;
        if wrap {
            f %= (self.len + 1) as f32;
        }
        if f == 0.0 {
            for p in parts.iter_mut() {
                p.reset();
            }
        }
        for track in &self.tracks {
            let fir = track.first;
            let lmax = track.span();

            let fold = wrap || track.loop_count == -1;
            let mut frame = if fold {
                let mf = if track.loop_count == -1 {
                    track.last
                } else {
                    self.len + 1
                };
                if mf == 0 {
                    0.0
                } else {
                    (f + track.offset as f32) % mf as f32
                }
            } else {
                f + track.offset as f32
            };

            if track.loop_count > 0 && lmax != 0 {
                let span = fir as f32 + track.loop_count as f32 * lmax as f32;
                if frame > span {
                    track.hold_last(parts, series);
                    continue;
                }
                if frame > fir as f32 {
                    frame = if frame < span {
                        fir as f32 + (frame - fir as f32) % lmax as f32
                    } else {
                        track.last as f32
                    };
                }
            }

            track.evaluate(frame, parts, series);
        }
    }
}
