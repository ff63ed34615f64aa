//! Design-instant search.
//!
//! The design moment is the UTC instant before birth at which the Sun stood
//! `design_arc_degrees` behind its natal longitude. The search is done in
//! seconds relative to a mean-motion estimate: scan outward in fixed steps
//! until the lifted residual changes sign, then bisect the bracket. Every
//! sample is one ephemeris call and the cancellation token is checked before
//! each of them.

use bodygraph_core::{
    bisect_angle, bracket_angle, normalize_degrees, BodygraphError, Ephemeris, GeoPoint, Result,
    SolverConfig,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignSolution {
    pub instant: DateTime<Utc>,
    /// Natal Sun minus the design arc, in [0, 360)
    pub target_longitude: f64,
}

pub struct DesignInstantSolver<'a> {
    ephemeris: &'a dyn Ephemeris,
    config: &'a SolverConfig,
    location: Option<GeoPoint>,
}

impl<'a> DesignInstantSolver<'a> {
    pub fn new(ephemeris: &'a dyn Ephemeris, config: &'a SolverConfig) -> Self {
        Self {
            ephemeris,
            config,
            location: None,
        }
    }

    /// Observer location passed to every Sun sample.
    pub fn with_location(mut self, location: Option<GeoPoint>) -> Self {
        self.location = location;
        self
    }

    pub fn target_longitude(&self, natal_sun: f64) -> f64 {
        normalize_degrees(natal_sun - self.config.design_arc_degrees)
    }

    /// Initial guess from mean solar motion, e.g. about 89.3 days for 88°.
    pub fn estimate(&self, birth: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let days = self.config.design_arc_degrees / self.config.mean_solar_motion;
        shift(birth, -days * SECONDS_PER_DAY)
    }

    pub async fn solve(
        &self,
        birth: DateTime<Utc>,
        natal_sun: f64,
        cancel: &CancellationToken,
    ) -> Result<DesignSolution> {
        if !natal_sun.is_finite() {
            return Err(BodygraphError::EphemerisUnavailable(format!(
                "non-finite natal Sun longitude: {}",
                natal_sun
            )));
        }

        let target = self.target_longitude(natal_sun);
        let estimate = self.estimate(birth)?;
        let ephemeris = self.ephemeris;
        let location = self.location;
        debug!(%birth, natal_sun, target, %estimate, "solving design instant");

        let sample = move |seconds: f64| async move {
            if cancel.is_cancelled() {
                return Err(BodygraphError::Cancelled);
            }
            let instant = shift(estimate, seconds)?;
            let sun = ephemeris.sun_longitude(instant, location).await?;
            debug!(%instant, sun, "solver sample");
            Ok(sun)
        };

        let step = self.config.scan_step_hours * SECONDS_PER_HOUR;
        let bracket =
            bracket_angle(sample, target, 0.0, step, self.config.max_scan_steps()).await?;
        debug!(below = bracket.below, above = bracket.above, "design instant bracketed");

        let seconds = bisect_angle(
            sample,
            target,
            bracket,
            self.config.tolerance_seconds,
            self.config.max_iterations,
        )
        .await?;
        let instant = shift(estimate, seconds)?;

        if instant >= birth {
            return Err(BodygraphError::SolverConvergence(format!(
                "design instant {} is not before birth {}",
                instant, birth
            )));
        }

        info!(%birth, design = %instant, target, "design instant solved");
        Ok(DesignSolution {
            instant,
            target_longitude: target,
        })
    }
}

fn shift(instant: DateTime<Utc>, seconds: f64) -> Result<DateTime<Utc>> {
    let micros = (seconds * 1e6).round();
    if !micros.is_finite() || micros.abs() > i64::MAX as f64 {
        return Err(BodygraphError::SolverConvergence(format!(
            "offset of {} seconds is out of range",
            seconds
        )));
    }
    instant
        .checked_add_signed(TimeDelta::microseconds(micros as i64))
        .ok_or_else(|| {
            BodygraphError::SolverConvergence(format!(
                "offset of {} seconds from {} is out of range",
                seconds, instant
            ))
        })
}
