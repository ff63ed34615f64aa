use approx::assert_abs_diff_eq;
use async_trait::async_trait;
use bodygraph_chart::{ChartEngine, CHART_SCHEMA_VERSION};
use bodygraph_core::{
    normalize_degrees, BirthData, BodyLongitudes, BodygraphError, DegreeTable, EngineConfig,
    Ephemeris, GeoPoint, InputError, Result,
};
use bodygraph_graph::{Authority, Center, ChartType, DefinitionType, GateSide};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Uniform Sun plus fixed bodies: `natal` from birth onwards, `prenatal` before.
/// Queries without a location see the Sun shifted by `geocentric_shift`.
struct FixtureEphemeris {
    birth: DateTime<Utc>,
    sun_at_birth: f64,
    degrees_per_day: f64,
    geocentric_shift: f64,
    natal: BodyLongitudes,
    prenatal: BodyLongitudes,
    calls: AtomicUsize,
}

#[async_trait]
impl Ephemeris for FixtureEphemeris {
    async fn longitudes(
        &self,
        instant: DateTime<Utc>,
        location: Option<GeoPoint>,
    ) -> Result<BodyLongitudes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let days = (instant - self.birth).num_milliseconds() as f64 / 86_400_000.0;
        let mut bodies = if instant >= self.birth {
            self.natal.clone()
        } else {
            self.prenatal.clone()
        };
        let shift = if location.is_some() { 0.0 } else { self.geocentric_shift };
        bodies.sun = normalize_degrees(self.sun_at_birth + self.degrees_per_day * days + shift);
        Ok(bodies)
    }
}

struct Offline;

#[async_trait]
impl Ephemeris for Offline {
    async fn longitudes(
        &self,
        _instant: DateTime<Utc>,
        _location: Option<GeoPoint>,
    ) -> Result<BodyLongitudes> {
        Err(BodygraphError::EphemerisUnavailable("service down".into()))
    }
}

fn birth_data() -> BirthData {
    BirthData {
        year: 1985,
        month: 2,
        day: 23,
        hour: 14,
        minute: 30,
        latitude: 52.52,
        longitude: 13.40,
        utc: Utc.with_ymd_and_hms(1985, 2, 23, 13, 30, 0).unwrap(),
    }
}

fn at(gate: u8) -> f64 {
    DegreeTable::standard()
        .unwrap()
        .longitude_for(gate, 3)
        .unwrap()
}

fn bodies(filler: f64, moon: f64, mercury: f64, venus: f64) -> BodyLongitudes {
    BodyLongitudes {
        sun: filler,
        moon,
        mercury,
        venus,
        mars: filler,
        jupiter: filler,
        saturn: filler,
        uranus: filler,
        neptune: filler,
        pluto: filler,
        north_node: filler,
        south_node: filler,
        chiron: None,
    }
}

/// Personality Sun 41.3 / Earth 31.3, design Sun 28.5 / Earth 27.5, with
/// auxiliary bodies on gates 7, 32, 54 (personality) and 50, 38 (design).
fn fixture() -> FixtureEphemeris {
    FixtureEphemeris {
        birth: birth_data().utc,
        sun_at_birth: 304.0,
        degrees_per_day: 1.0,
        geocentric_shift: 0.0,
        natal: bodies(304.0, at(7), at(32), at(54)),
        prenatal: bodies(216.0, at(50), at(38), 216.0),
        calls: AtomicUsize::new(0),
    }
}

fn engine(ephemeris: impl Ephemeris + 'static) -> ChartEngine {
    ChartEngine::new(Arc::new(ephemeris), EngineConfig::default()).unwrap()
}

#[tokio::test]
async fn regression_fixture() {
    let engine = engine(fixture());
    let chart = engine
        .compute(&birth_data(), &CancellationToken::new())
        .await
        .unwrap();

    let p_sun = chart.personality().sun();
    assert_eq!((p_sun.gate, p_sun.line), (41, 3));
    let d_sun = chart.design().sun();
    assert_eq!((d_sun.gate, d_sun.line), (28, 5));
    let d_earth = chart.design().get(bodygraph_core::Celestial::Earth);
    assert_eq!((d_earth.gate, d_earth.line), (27, 5));

    assert_eq!(chart.profile().to_string(), "3/5");
    for name in ["7-31", "27-50", "32-54", "28-38"] {
        assert!(chart.has_channel(name), "missing channel {}", name);
    }
    assert!(!chart.has_channel("26-44"));
    assert_eq!(chart.chart_type(), ChartType::Generator);
    assert_eq!(chart.strategy(), "Wait to respond");
    assert_eq!(chart.authority(), Authority::Sacral);
    assert_eq!(chart.definition_type(), DefinitionType::Split);
    assert_eq!(chart.schema_version(), CHART_SCHEMA_VERSION);

    let expected_design = birth_data().utc - TimeDelta::days(88);
    assert!((chart.design_instant() - expected_design).num_seconds().abs() <= 30);
    assert!(chart.design_instant() < birth_data().utc);
}

#[tokio::test]
async fn cross_side_channel_and_open_centers() {
    let chart = engine(fixture())
        .compute(&birth_data(), &CancellationToken::new())
        .await
        .unwrap();

    // 7-31: gate 7 from the personality Moon, 31 from the personality Earth
    assert_eq!(chart.gate_side(31), Some(GateSide::Personality));
    // 27-50: both gates arrive only through the design set
    assert_eq!(chart.gate_side(27), Some(GateSide::Design));
    assert_eq!(chart.gate_side(50), Some(GateSide::Design));

    assert_eq!(
        chart.undefined_centers(),
        &[Center::Head, Center::Ajna, Center::Heart, Center::SolarPlexus]
    );
    assert_eq!(chart.defined_centers().len(), 5);
}

#[tokio::test]
async fn chart_serializes_with_schema_tag() {
    let chart = engine(fixture())
        .compute(&birth_data(), &CancellationToken::new())
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&chart.to_json().unwrap()).unwrap();

    assert_eq!(json["schema_version"], "bodygraph-chart/1");
    assert_eq!(json["type"], "generator");
    assert_eq!(json["authority"], "sacral");
    assert_eq!(json["profile"], "3/5");
    assert_eq!(json["definition_type"], "split");
}

#[tokio::test]
async fn invalid_birth_data_makes_no_calls() {
    let ephemeris = Arc::new(fixture());
    let engine = ChartEngine::new(ephemeris.clone(), EngineConfig::default()).unwrap();
    let mut birth = birth_data();
    birth.day = 30;

    let err = engine
        .compute(&birth, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BodygraphError::Input(InputError::InvalidDate { .. })
    ));
    assert_eq!(ephemeris.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn collaborator_failure_aborts_the_chart() {
    let err = engine(Offline)
        .compute(&birth_data(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BodygraphError::EphemerisUnavailable(_)));
}

#[tokio::test]
async fn cancelled_request_returns_cancelled() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = engine(fixture())
        .compute(&birth_data(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, BodygraphError::Cancelled));
}

#[tokio::test]
async fn design_target_uses_the_birth_location() {
    let mut ephemeris = fixture();
    ephemeris.geocentric_shift = 3.0;
    let chart = engine(ephemeris)
        .compute(&birth_data(), &CancellationToken::new())
        .await
        .unwrap();

    let p_sun = chart.personality().sun();
    let d_sun = chart.design().sun();
    assert_abs_diff_eq!(p_sun.raw_degree, 304.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        d_sun.raw_degree,
        normalize_degrees(p_sun.raw_degree - 88.0),
        epsilon = 1e-3
    );
    assert_eq!((d_sun.gate, d_sun.line), (28, 5));
}

#[tokio::test]
async fn stalled_sun_fails_the_solve() {
    let mut ephemeris = fixture();
    ephemeris.degrees_per_day = 0.0;
    let err = engine(ephemeris)
        .compute(&birth_data(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BodygraphError::SolverConvergence(_)));
}

#[test]
fn invalid_config_refuses_construction() {
    let mut config = EngineConfig::default();
    config.solver.tolerance_seconds = 0.0;
    let result = ChartEngine::new(Arc::new(Offline), config);
    assert!(matches!(result, Err(BodygraphError::Config(_))));
}
