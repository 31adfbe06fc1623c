// Adapters layer: concrete implementations of the domain ports (HTTP lookups, reference store, file storage).

pub mod http;
pub mod storage;
pub mod store;

pub use http::{build_http_client, NominatimGeocoder, OpenElevationClient};
pub use storage::LocalStorage;
pub use store::ReferenceStore;
