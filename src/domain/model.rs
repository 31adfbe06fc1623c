use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Closed altitude interval `[from_meters, to_meters]` mapped to a temperature delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltitudeOffsetRange {
    pub from_meters: i32,
    pub to_meters: i32,
    pub offset: f64,
}

impl AltitudeOffsetRange {
    pub fn new(from_meters: i32, to_meters: i32, offset: f64) -> Self {
        Self {
            from_meters,
            to_meters,
            offset,
        }
    }

    pub fn contains(&self, altitude: i32) -> bool {
        altitude >= self.from_meters && altitude <= self.to_meters
    }
}

/// Base minimum temperature for a two-character postal prefix (French département).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalTemperature {
    pub postal_code: String,
    pub temperature: f64,
}

impl PostalTemperature {
    pub fn new(postal_code: impl Into<String>, temperature: f64) -> Self {
        Self {
            postal_code: postal_code.into(),
            temperature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Both reference tables as loaded together. Postal keys are trimmed and
/// ranges are stably sorted by `from_meters`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSnapshot {
    temperatures: HashMap<String, f64>,
    ranges: Vec<AltitudeOffsetRange>,
}

impl ReferenceSnapshot {
    /// Later records win when a postal code appears twice.
    pub fn new(temperatures: Vec<PostalTemperature>, mut ranges: Vec<AltitudeOffsetRange>) -> Self {
        let temperatures = temperatures
            .into_iter()
            .map(|record| (record.postal_code.trim().to_string(), record.temperature))
            .collect();
        ranges.sort_by_key(|range| range.from_meters);

        Self {
            temperatures,
            ranges,
        }
    }

    pub fn temperature(&self, postal_prefix: &str) -> Option<f64> {
        self.temperatures.get(postal_prefix).copied()
    }

    pub fn ranges(&self) -> &[AltitudeOffsetRange] {
        &self.ranges
    }

    pub fn postal_code_count(&self) -> usize {
        self.temperatures.len()
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressRequest {
    #[serde(deserialize_with = "text_or_number")]
    pub address: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub postal_code: Option<String>,
}

/// Clients send postal codes as `75001` as often as `"75001"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}

/// Altitude used for the lookup and the resulting adjusted temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    pub altitude: i32,
    pub standard_min_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
