// Domain layer: content models and the port page code depends on.

pub mod model;
pub mod ports;
