// Domain layer: value objects and ports (interfaces). No external dependencies beyond serde.

pub mod model;
pub mod ports;
pub mod services;
