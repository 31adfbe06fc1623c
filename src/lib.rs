pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{LocalStorage, NominatimGeocoder, OpenElevationClient, ReferenceStore};
pub use app::{create_router, run_server, AppState, DatasetLoader, LoadSummary};
pub use core::{altitude::AltitudeResolver, temperature::TemperatureResolver};
pub use utils::error::{AppError, Result};
