// Domain layer: reference-data models and the ports (interfaces) the resolvers depend on.

pub mod model;
pub mod ports;
