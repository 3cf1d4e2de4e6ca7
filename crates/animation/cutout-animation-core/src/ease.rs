#![allow(dead_code)]
//! Interpolation curves between keyframes.

use crate::data::{Ease, Keyframe};

/// Floor to an integer the way table values expect; NaN reads as 0.
#[inline]
pub(crate) fn to_int(v: f32) -> i32 {
    v.floor() as i32
}

/// Warp linear progress `t` through a keyframe's curve. The polynomial
/// curve is not point-wise (it needs the surrounding keyframe run, see
/// [`polynomial_run`]) and passes through unchanged here.
pub fn warp(ease: Ease, power: i32, t: f32) -> f32 {
    match ease {
        Ease::Linear | Ease::Polynomial => t,
        Ease::Instant => 0.0,
        Ease::Exponential => exponential(power, t),
        Ease::Sinusoidal => sinusoidal(power, t),
    }
}

/// Circular-arc warp. Non-negative powers hug the start of the segment,
/// negative powers hug the end.
#[inline]
pub fn exponential(power: i32, t: f32) -> f32 {
    if power >= 0 {
        1.0 - (1.0 - t.powi(power)).sqrt()
    } else {
        (1.0 - (1.0 - t).powi(-power)).sqrt()
    }
}

/// Sinusoidal warp: ease-in for positive powers, ease-out for negative,
/// ease-in-out at zero.
#[inline]
pub fn sinusoidal(power: i32, t: f32) -> f32 {
    use std::f32::consts::{FRAC_PI_2, PI};
    if power > 0 {
        1.0 - (t * FRAC_PI_2).cos()
    } else if power < 0 {
        (t * FRAC_PI_2).sin()
    } else {
        (1.0 - (t * PI).cos()) / 2.0
    }
}

/// Evaluate the Lagrange fit through the run of polynomial keyframes
/// around `i` at `frame`. The run extends backward over consecutive
/// polynomial keyframes and forward up to and including the first
/// non-polynomial one, so the curve lands exactly on its terminator.
///
/// Values are scaled by 4096 and accumulated in f64; duplicate frames in a
/// run divide by zero and read as 0, as corrupt tables always have.
pub fn polynomial_run(frames: &[Keyframe], i: usize, frame: f32) -> i32 {
    let mut low = i;
    while low > 0 && frames[low - 1].ease == Ease::Polynomial {
        low -= 1;
    }
    let mut high = i;
    for j in i + 1..frames.len() {
        high = j;
        if frames[j].ease != Ease::Polynomial {
            break;
        }
    }
    let frame = frame as f64;
    let mut sum = 0.0f64;
    for j in low..=high {
        let mut val = frames[j].value as f64 * 4096.0;
        for k in low..=high {
            if j != k {
                val *= (frame - frames[k].frame as f64)
                    / (frames[j].frame as f64 - frames[k].frame as f64);
            }
        }
        sum += val;
    }
    (sum / 4096.0).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(frame: i32, value: i32, ease: Ease) -> Keyframe {
        Keyframe {
            frame,
            value,
            ease,
            ease_power: 0,
        }
    }

    #[test]
    fn warp_endpoints() {
        for ease in [Ease::Linear, Ease::Exponential, Ease::Sinusoidal] {
            assert!((warp(ease, 2, 0.0)).abs() < 1e-6, "{ease:?} at 0");
            assert!((warp(ease, 2, 1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
        }
        assert_eq!(warp(Ease::Instant, 0, 0.7), 0.0);
    }

    #[test]
    fn exponential_direction() {
        // positive powers start slow
        assert!((exponential(2, 0.6) - 0.2).abs() < 1e-6);
        // negative powers end slow, mirrored through the segment
        assert!((exponential(-2, 0.4) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn sinusoidal_halfway() {
        let c = std::f32::consts::FRAC_PI_4.cos();
        assert!((sinusoidal(1, 0.5) - (1.0 - c)).abs() < 1e-6);
        assert!((sinusoidal(-1, 0.5) - c).abs() < 1e-6);
        assert!((sinusoidal(0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn polynomial_fits_the_run() {
        // y = x^2 sampled at 0, 5, 10; the Lagrange fit reproduces it
        let frames = [
            key(0, 0, Ease::Polynomial),
            key(5, 25, Ease::Polynomial),
            key(10, 100, Ease::Linear),
        ];
        assert_eq!(polynomial_run(&frames, 0, 3.0), 9);
        assert_eq!(polynomial_run(&frames, 1, 7.0), 49);
        // run discovery from the second segment sees the same three points
        assert_eq!(polynomial_run(&frames, 1, 3.0), 9);
    }

    #[test]
    fn polynomial_run_stops_at_non_polynomial_keys() {
        // the linear key at 5 terminates the run; the key at 10 is outside
        let frames = [
            key(0, 0, Ease::Polynomial),
            key(5, 10, Ease::Linear),
            key(10, 1000, Ease::Linear),
        ];
        // two-point fit is the straight line through (0,0) and (5,10)
        assert_eq!(polynomial_run(&frames, 0, 2.0), 4);
    }
}
