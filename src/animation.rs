//! Timing curves for animated window moves.

use crate::Rect;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingCurve {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl TimingCurve {
    /// Control points of the equivalent CSS `cubic-bezier`.
    pub fn control_points(&self) -> (f64, f64, f64, f64) {
        match self {
            Self::Linear => (0.0, 0.0, 1.0, 1.0),
            Self::Ease => (0.25, 0.10, 0.25, 1.00),
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
        }
    }

    /// Eased progress for normalized time `u` in `[0, 1]`.
    pub fn progress(&self, u: f64) -> f64 {
        if *self == Self::Linear {
            return u.clamp(0.0, 1.0);
        }
        let (x1, y1, x2, y2) = self.control_points();
        cubic_bezier(u, x1, y1, x2, y2)
    }
}

/// Solves a cubic Bézier with endpoints (0,0) and (1,1) for `x = u` and
/// returns `y`.
fn cubic_bezier(u: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f64, b: f64, c: f64, t: f64| ((a * t + b) * t + c) * t;

    // Newton-Raphson, falling back to bisection when the slope flattens
    let mut t = u;
    let mut solved = false;
    for _ in 0..8 {
        let x = sample(ax, bx, cx, t) - u;
        if x.abs() < 1e-7 {
            solved = true;
            break;
        }
        let dx = (3.0 * ax * t + 2.0 * bx) * t + cx;
        if dx.abs() < 1e-6 {
            break;
        }
        t -= x / dx;
        if !(0.0..=1.0).contains(&t) {
            break;
        }
    }

    if !solved {
        let (mut lo, mut hi) = (0.0, 1.0);
        t = u;
        for _ in 0..32 {
            let x = sample(ax, bx, cx, t);
            if (x - u).abs() < 1e-9 {
                break;
            }
            if x < u {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
    }

    sample(ay, by, cy, t)
}

/// Intermediate frames for an animated move from `from` to `to`.
///
/// The last frame is `to` itself, never an interpolated approximation.
pub fn keyframes(from: Rect, to: Rect, duration: Duration, curve: TimingCurve) -> Vec<Rect> {
    let count = (duration.as_millis() / FRAME_INTERVAL.as_millis()).max(1) as usize;
    let mut frames: Vec<Rect> = (1..count)
        .map(|i| from.lerp(&to, curve.progress(i as f64 / count as f64)))
        .collect();
    frames.push(to);
    frames
}

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
