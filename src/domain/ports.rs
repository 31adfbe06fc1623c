use crate::domain::model::{AltitudeOffsetRange, Coordinate, ReferenceSnapshot};
use crate::utils::error::{LookupError, Result};
use crate::utils::messages::MessageCatalog;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn nominatim_url(&self) -> &str;
    fn elevation_url(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    /// Directory the dataset paths are resolved against.
    fn dataset_root(&self) -> &str;
    fn temperatures_dataset(&self) -> &str;
    fn offsets_dataset(&self) -> &str;
    fn messages(&self) -> &MessageCatalog;
}

/// Free-text address to coordinates. Only the first candidate is used.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> std::result::Result<Coordinate, LookupError>;
}

/// Coordinates to raw elevation in meters.
#[async_trait]
pub trait ElevationSource: Send + Sync {
    async fn elevation(&self, coordinate: Coordinate) -> std::result::Result<f64, LookupError>;
}

#[async_trait]
pub trait AltitudeProvider: Send + Sync {
    async fn altitude_meters(&self, address: Option<&str>) -> Result<i32>;
}

pub trait PostalTemperatureTable: Send + Sync {
    fn base_temperature(&self, postal_prefix: &str) -> Option<f64>;
}

pub trait AltitudeOffsetTable: Send + Sync {
    /// All ranges, ascending by `from_meters`.
    fn all_ranges_ordered_by_start(&self) -> Vec<AltitudeOffsetRange>;
}

/// Consistent view over both tables. One snapshot serves a whole request, so a
/// concurrent reload never mixes old and new data.
pub trait ReferenceTables: Send + Sync {
    fn snapshot(&self) -> Arc<ReferenceSnapshot>;
}

impl PostalTemperatureTable for ReferenceSnapshot {
    fn base_temperature(&self, postal_prefix: &str) -> Option<f64> {
        self.temperature(postal_prefix)
    }
}

impl AltitudeOffsetTable for ReferenceSnapshot {
    fn all_ranges_ordered_by_start(&self) -> Vec<AltitudeOffsetRange> {
        self.ranges().to_vec()
    }
}
