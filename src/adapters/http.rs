//! Outbound HTTP lookups: Nominatim geocoding and Open-Elevation.
//!
//! One attempt per call, bounded by the client timeout. No caching.

use crate::domain::model::Coordinate;
use crate::domain::ports::{ConfigProvider, ElevationSource, Geocoder};
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Nominatim returns coordinates as strings, other geocoders as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    fn to_degrees(&self, field: &str) -> std::result::Result<f64, LookupError> {
        let value = match self {
            CoordinateValue::Number(n) => *n,
            CoordinateValue::Text(s) => s.trim().parse::<f64>().map_err(|e| {
                LookupError::InvalidResponse(format!("{} '{}' is not a number: {}", field, s, e))
            })?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(LookupError::InvalidResponse(format!("{} is not finite", field)))
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: CoordinateValue,
    lon: CoordinateValue,
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    #[serde(default)]
    results: Option<Vec<ElevationResult>>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self::new(client, config.nominatim_url())
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> std::result::Result<Coordinate, LookupError> {
        tracing::debug!("Geocoding '{}' via {}", address, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "0"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let results: Vec<NominatimResult> = response.json().await?;
        let first = results.into_iter().next().ok_or(LookupError::NotFound)?;

        Ok(Coordinate {
            lat: first.lat.to_degrees("lat")?,
            lon: first.lon.to_degrees("lon")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OpenElevationClient {
    client: Client,
    endpoint: String,
}

impl OpenElevationClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self::new(client, config.elevation_url())
    }
}

#[async_trait]
impl ElevationSource for OpenElevationClient {
    async fn elevation(&self, coordinate: Coordinate) -> std::result::Result<f64, LookupError> {
        let locations = format!("{},{}", coordinate.lat, coordinate.lon);
        tracing::debug!("Looking up elevation for {} via {}", locations, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("locations", locations.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: ElevationResponse = response.json().await?;

        body.results
            .and_then(|results| results.into_iter().next())
            .map(|result| result.elevation)
            .ok_or(LookupError::NotFound)
    }
}
