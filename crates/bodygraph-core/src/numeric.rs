//! Angle arithmetic and the lift-then-bisect root finder.
//!
//! Longitudes are periodic, so a raw `sample - target` difference jumps by
//! 360° whenever the sampled body crosses 0°. Every sample is first lifted
//! onto the branch of the circle nearest the target; within half a turn of
//! the target the lifted function is continuous and, for a body moving
//! prograde, monotonic, which is all bisection needs.

use crate::{BodygraphError, Result};
use std::future::Future;
use tracing::debug;

pub const FULL_CIRCLE: f64 = 360.0;

/// Map any finite angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(FULL_CIRCLE);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if r >= FULL_CIRCLE {
        0.0
    } else {
        r
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn signed_separation(from: f64, to: f64) -> f64 {
    let d = normalize_degrees(to - from);
    if d > 180.0 {
        d - FULL_CIRCLE
    } else {
        d
    }
}

/// Return `value + 360k` for the integer `k` that puts it within half a turn
/// of `reference`.
pub fn lift_angle(value: f64, reference: f64) -> f64 {
    reference + signed_separation(reference, value)
}

/// Interpolate between two angles along the shorter arc; `fraction` in `[0, 1]`.
pub fn interpolate_angle(from: f64, to: f64, fraction: f64) -> f64 {
    normalize_degrees(from + signed_separation(from, to) * fraction)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Parameter where the lifted residual is negative.
    pub below: f64,
    /// Parameter where the lifted residual is zero or positive.
    pub above: f64,
}

impl Bracket {
    pub fn width(&self) -> f64 {
        (self.above - self.below).abs()
    }
}

async fn residual<F, Fut>(sample: &mut F, t: f64, target: f64) -> Result<f64>
where
    F: FnMut(f64) -> Fut,
    Fut: Future<Output = Result<f64>>,
{
    let value = sample(t).await?;
    if !value.is_finite() {
        return Err(BodygraphError::EphemerisUnavailable(format!(
            "non-finite sample at parameter {}",
            t
        )));
    }
    Ok(lift_angle(value, target) - target)
}

/// Walk from `start` in steps of `step` until the lifted residual
/// `lift(sample(t)) - target` changes sign, assuming prograde motion.
///
/// Gives up after `max_steps` samples with [`BodygraphError::SolverConvergence`].
pub async fn bracket_angle<F, Fut>(
    mut sample: F,
    target: f64,
    start: f64,
    step: f64,
    max_steps: usize,
) -> Result<Bracket>
where
    F: FnMut(f64) -> Fut,
    Fut: Future<Output = Result<f64>>,
{
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return Err(BodygraphError::SolverConvergence(
            "scan step must be positive".into(),
        ));
    }

    let first = residual(&mut sample, start, target).await?;
    // A non-negative residual means the crossing already happened: walk back.
    let direction = if first >= 0.0 { -1.0 } else { 1.0 };
    let mut prev_t = start;

    for i in 1..=max_steps {
        let t = start + direction * step * i as f64;
        let r = residual(&mut sample, t, target).await?;
        debug!(parameter = t, residual = r, "scan sample");

        let crossed = if direction < 0.0 { r < 0.0 } else { r >= 0.0 };
        if crossed {
            let bracket = if direction < 0.0 {
                Bracket { below: t, above: prev_t }
            } else {
                Bracket { below: prev_t, above: t }
            };
            return Ok(bracket);
        }
        prev_t = t;
    }

    Err(BodygraphError::SolverConvergence(format!(
        "no crossing of {:.6}° within {} steps of {} from parameter {}",
        target, max_steps, step, start
    )))
}

/// Bisect a [`Bracket`] until it is narrower than `tolerance` and return its
/// midpoint.
pub async fn bisect_angle<F, Fut>(
    mut sample: F,
    target: f64,
    bracket: Bracket,
    tolerance: f64,
    max_iterations: usize,
) -> Result<f64>
where
    F: FnMut(f64) -> Fut,
    Fut: Future<Output = Result<f64>>,
{
    let Bracket {
        mut below,
        mut above,
    } = bracket;

    for iteration in 0..max_iterations {
        if (above - below).abs() < tolerance {
            debug!(iteration, below, above, "bisection converged");
            return Ok(below + (above - below) / 2.0);
        }
        let mid = below + (above - below) / 2.0;
        if residual(&mut sample, mid, target).await? < 0.0 {
            below = mid;
        } else {
            above = mid;
        }
    }

    if (above - below).abs() < tolerance {
        return Ok(below + (above - below) / 2.0);
    }
    Err(BodygraphError::SolverConvergence(format!(
        "bracket still {} wide after {} iterations",
        (above - below).abs(),
        max_iterations
    )))
}
