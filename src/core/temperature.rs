use crate::core::offset::offset_for_altitude;
use crate::domain::model::{ReferenceSnapshot, TemperatureReading};
use crate::domain::ports::{AltitudeProvider, PostalTemperatureTable, ReferenceTables};
use crate::utils::error::{AppError, Result};
use std::sync::Arc;

/// Postal code + address to altitude-adjusted standard minimum temperature.
pub struct TemperatureResolver {
    tables: Arc<dyn ReferenceTables>,
    altitude: Arc<dyn AltitudeProvider>,
}

impl TemperatureResolver {
    pub fn new(tables: Arc<dyn ReferenceTables>, altitude: Arc<dyn AltitudeProvider>) -> Self {
        Self { tables, altitude }
    }

    /// Resolves the altitude for `address` once and returns it together with
    /// the adjusted temperature.
    ///
    /// The postal prefix is checked before any outbound lookup is made. Both
    /// tables come from the snapshot taken at the start of the call.
    pub async fn resolve(
        &self,
        postal_code: Option<&str>,
        address: Option<&str>,
    ) -> Result<TemperatureReading> {
        let tables = self.tables.snapshot();
        let prefix = normalize_postal_prefix(postal_code);
        let base_temperature = base_temperature_or_err(&tables, &prefix)?;

        let altitude = self.altitude.altitude_meters(address).await?;
        let offset = offset_for_altitude(altitude, tables.ranges())?;

        let standard_min_temperature = base_temperature + offset;

        tracing::debug!(
            "Temperature calculation for postal code {}: base={}, altitude={}, offset={}, result={}",
            prefix,
            base_temperature,
            altitude,
            offset,
            standard_min_temperature
        );

        Ok(TemperatureReading {
            altitude,
            standard_min_temperature,
        })
    }

    pub async fn standard_min_temperature(
        &self,
        postal_code: Option<&str>,
        address: Option<&str>,
    ) -> Result<f64> {
        Ok(self
            .resolve(postal_code, address)
            .await?
            .standard_min_temperature)
    }
}

fn base_temperature_or_err(tables: &ReferenceSnapshot, prefix: &str) -> Result<f64> {
    tables.base_temperature(prefix).ok_or_else(|| {
        tracing::warn!("Postal code prefix '{}' not found", prefix);
        AppError::PostalCodeNotFound {
            prefix: prefix.to_string(),
        }
    })
}

/// Trims and keeps the first two characters. Shorter codes are kept as is.
pub fn normalize_postal_prefix(postal_code: Option<&str>) -> String {
    let trimmed = postal_code.unwrap_or("").trim();
    trimmed.chars().take(2).collect()
}
