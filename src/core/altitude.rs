use crate::domain::model::Coordinate;
use crate::domain::ports::{AltitudeProvider, ElevationSource, Geocoder};
use crate::utils::error::{AppError, LookupError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub const MIN_PLAUSIBLE_ELEVATION: i32 = -500;
pub const MAX_PLAUSIBLE_ELEVATION: i32 = 20000;

/// Altitude assumed whenever no elevation can be obtained.
pub const SEA_LEVEL: i32 = 0;

/// Address to altitude: geocode, then look up the elevation.
///
/// Lookups are best effort. Missing addresses, empty results and outbound
/// failures all degrade to [`SEA_LEVEL`]. Only an implausible elevation is
/// reported to the caller.
pub struct AltitudeResolver {
    geocoder: Arc<dyn Geocoder>,
    elevation: Arc<dyn ElevationSource>,
}

impl AltitudeResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, elevation: Arc<dyn ElevationSource>) -> Self {
        Self {
            geocoder,
            elevation,
        }
    }

    async fn lookup_coordinate(&self, address: &str) -> Option<Coordinate> {
        match self.geocoder.resolve(address).await {
            Ok(coordinate) => Some(coordinate),
            Err(LookupError::NotFound) => {
                tracing::warn!("No geocoding results for address '{}'", address);
                None
            }
            Err(e) => {
                tracing::warn!("Geocoding failed for address '{}': {}", address, e);
                None
            }
        }
    }

    async fn lookup_elevation(&self, coordinate: Coordinate) -> Option<f64> {
        match self.elevation.elevation(coordinate).await {
            Ok(raw) if raw.is_finite() => Some(raw),
            Ok(raw) => {
                tracing::warn!(
                    "Elevation service returned {} for {},{}",
                    raw,
                    coordinate.lat,
                    coordinate.lon
                );
                None
            }
            Err(LookupError::NotFound) => {
                tracing::warn!("No elevation result for {},{}", coordinate.lat, coordinate.lon);
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Elevation lookup failed for {},{}: {}",
                    coordinate.lat,
                    coordinate.lon,
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl AltitudeProvider for AltitudeResolver {
    async fn altitude_meters(&self, address: Option<&str>) -> Result<i32> {
        let address = match address.map(str::trim) {
            Some(address) if !address.is_empty() => address,
            _ => return Ok(SEA_LEVEL),
        };

        let Some(coordinate) = self.lookup_coordinate(address).await else {
            return Ok(SEA_LEVEL);
        };

        let Some(raw) = self.lookup_elevation(coordinate).await else {
            return Ok(SEA_LEVEL);
        };

        let altitude = plausible_elevation(raw)?;
        tracing::debug!("Resolved '{}' to {} m", address, altitude);
        Ok(altitude)
    }
}

/// Rounds half up, so 100.5 becomes 101 and -0.5 becomes 0.
pub fn round_half_up(raw: f64) -> f64 {
    (raw + 0.5).floor()
}

/// Rounds `raw` to whole meters and checks it against the plausibility band.
///
/// # Errors
///
/// `InvalidElevation` when the rounded value lies outside
/// [`MIN_PLAUSIBLE_ELEVATION`, `MAX_PLAUSIBLE_ELEVATION`].
pub fn plausible_elevation(raw: f64) -> Result<i32> {
    let rounded = round_half_up(raw);

    if rounded < f64::from(MIN_PLAUSIBLE_ELEVATION) || rounded > f64::from(MAX_PLAUSIBLE_ELEVATION) {
        tracing::warn!("Rejecting implausible elevation {} m", rounded);
        return Err(AppError::InvalidElevation {
            meters: rounded as i64,
        });
    }

    Ok(rounded as i32)
}
