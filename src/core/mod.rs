pub mod altitude;
pub mod offset;
pub mod temperature;

pub use crate::domain::model::{
    AltitudeOffsetRange, Coordinate, PostalTemperature, ReferenceSnapshot, TemperatureReading,
};
pub use crate::domain::ports::{
    AltitudeOffsetTable, AltitudeProvider, ConfigProvider, ElevationSource, Geocoder,
    PostalTemperatureTable, ReferenceTables, Storage,
};
pub use crate::utils::error::Result;
