use crate::{BodyLongitudes, GeoPoint, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// External provider of ecliptic longitudes.
///
/// Implementations report failures as
/// [`BodygraphError::EphemerisUnavailable`](crate::BodygraphError::EphemerisUnavailable);
/// the engine never substitutes an approximation.
#[async_trait]
pub trait Ephemeris: Send + Sync {
    async fn longitudes(
        &self,
        instant: DateTime<Utc>,
        location: Option<GeoPoint>,
    ) -> Result<BodyLongitudes>;

    /// Sun longitude alone, for the same `location` as [`Ephemeris::longitudes`].
    /// Providers with a cheaper single-body query should override.
    async fn sun_longitude(
        &self,
        instant: DateTime<Utc>,
        location: Option<GeoPoint>,
    ) -> Result<f64> {
        Ok(self.longitudes(instant, location).await?.sun)
    }
}
