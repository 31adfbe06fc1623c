// Application layer: dataset loading and the HTTP API built on the core resolvers.

pub mod loader;
pub mod server;

pub use loader::{DatasetLoader, LoadSummary};
pub use server::{create_router, run_server, AppState};
