//! File-backed ephemeris: a time-ordered list of longitude samples,
//! interpolated along the shortest arc between neighbours.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bodygraph_core::{interpolate_angle, BodyLongitudes, BodygraphError, Ephemeris, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub instant: DateTime<Utc>,
    pub longitudes: BodyLongitudes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SampleFile {
    samples: Vec<Sample>,
}

#[derive(Debug, Clone)]
pub struct SampledEphemeris {
    samples: Vec<Sample>,
}

impl SampledEphemeris {
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        anyhow::ensure!(samples.len() >= 2, "need at least two samples");
        anyhow::ensure!(
            samples.windows(2).all(|w| w[0].instant < w[1].instant),
            "samples must be strictly increasing in time"
        );
        Ok(Self { samples })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading ephemeris file {:?}", path))?;
        let file: SampleFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing ephemeris file {:?}", path))?;
        let ephemeris = Self::from_samples(file.samples)?;
        info!(
            samples = ephemeris.samples.len(),
            from = %ephemeris.samples[0].instant,
            to = %ephemeris.samples[ephemeris.samples.len() - 1].instant,
            "sampled ephemeris loaded"
        );
        Ok(ephemeris)
    }

    pub fn range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.samples[0].instant,
            self.samples[self.samples.len() - 1].instant,
        )
    }

    fn at(&self, instant: DateTime<Utc>) -> bodygraph_core::Result<BodyLongitudes> {
        let (first, last) = self.range();
        if instant < first || instant > last {
            return Err(BodygraphError::EphemerisUnavailable(format!(
                "{} is outside the sampled range {} .. {}",
                instant, first, last
            )));
        }

        let idx = self.samples.partition_point(|s| s.instant <= instant);
        let before = &self.samples[idx - 1];
        if before.instant == instant || idx == self.samples.len() {
            return Ok(before.longitudes.clone());
        }
        let after = &self.samples[idx];

        let span = (after.instant - before.instant).num_milliseconds() as f64;
        let fraction = (instant - before.instant).num_milliseconds() as f64 / span;
        let a = &before.longitudes;
        let b = &after.longitudes;
        let lerp = |x: f64, y: f64| interpolate_angle(x, y, fraction);

        Ok(BodyLongitudes {
            sun: lerp(a.sun, b.sun),
            moon: lerp(a.moon, b.moon),
            mercury: lerp(a.mercury, b.mercury),
            venus: lerp(a.venus, b.venus),
            mars: lerp(a.mars, b.mars),
            jupiter: lerp(a.jupiter, b.jupiter),
            saturn: lerp(a.saturn, b.saturn),
            uranus: lerp(a.uranus, b.uranus),
            neptune: lerp(a.neptune, b.neptune),
            pluto: lerp(a.pluto, b.pluto),
            north_node: lerp(a.north_node, b.north_node),
            south_node: lerp(a.south_node, b.south_node),
            chiron: a.chiron.zip(b.chiron).map(|(x, y)| lerp(x, y)),
        })
    }
}

#[async_trait]
impl Ephemeris for SampledEphemeris {
    async fn longitudes(
        &self,
        instant: DateTime<Utc>,
        _location: Option<GeoPoint>,
    ) -> bodygraph_core::Result<BodyLongitudes> {
        self.at(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeDelta, TimeZone};
    use std::io::Write;

    fn body(sun: f64) -> BodyLongitudes {
        BodyLongitudes {
            sun,
            moon: sun * 2.0 % 360.0,
            mercury: 10.0,
            venus: 20.0,
            mars: 30.0,
            jupiter: 40.0,
            saturn: 50.0,
            uranus: 60.0,
            neptune: 70.0,
            pluto: 80.0,
            north_node: 90.0,
            south_node: 270.0,
            chiron: None,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn interpolates_between_samples() {
        let eph = SampledEphemeris::from_samples(vec![
            Sample {
                instant: start(),
                longitudes: body(100.0),
            },
            Sample {
                instant: start() + TimeDelta::days(1),
                longitudes: body(101.0),
            },
        ])
        .unwrap();

        let mid = eph
            .longitudes(start() + TimeDelta::hours(6), None)
            .await
            .unwrap();
        assert_abs_diff_eq!(mid.sun, 100.25, epsilon = 1e-9);
        assert_abs_diff_eq!(mid.mercury, 10.0);
    }

    #[tokio::test]
    async fn interpolation_takes_short_way_over_seam() {
        let eph = SampledEphemeris::from_samples(vec![
            Sample {
                instant: start(),
                longitudes: body(359.5),
            },
            Sample {
                instant: start() + TimeDelta::days(1),
                longitudes: body(0.5),
            },
        ])
        .unwrap();

        let mid = eph
            .longitudes(start() + TimeDelta::hours(12), None)
            .await
            .unwrap();
        assert_abs_diff_eq!(mid.sun, 0.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn outside_range_is_unavailable() {
        let eph = SampledEphemeris::from_samples(vec![
            Sample {
                instant: start(),
                longitudes: body(1.0),
            },
            Sample {
                instant: start() + TimeDelta::days(1),
                longitudes: body(2.0),
            },
        ])
        .unwrap();

        let err = eph
            .longitudes(start() - TimeDelta::seconds(1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BodygraphError::EphemerisUnavailable(_)));

        let last = eph
            .longitudes(start() + TimeDelta::days(1), None)
            .await
            .unwrap();
        assert_eq!(last.sun, 2.0);
    }

    #[test]
    fn rejects_unordered_samples() {
        let samples = vec![
            Sample {
                instant: start() + TimeDelta::days(1),
                longitudes: body(1.0),
            },
            Sample {
                instant: start(),
                longitudes: body(2.0),
            },
        ];
        assert!(SampledEphemeris::from_samples(samples).is_err());
    }

    #[test]
    fn loads_json_file() {
        let file = SampleFile {
            samples: (0..3)
                .map(|d| Sample {
                    instant: start() + TimeDelta::days(d),
                    longitudes: body(100.0 + d as f64),
                })
                .collect(),
        };
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{}", serde_json::to_string(&file).unwrap()).unwrap();

        let eph = SampledEphemeris::from_path(tmp.path()).unwrap();
        assert_eq!(eph.range(), (start(), start() + TimeDelta::days(2)));
    }
}
