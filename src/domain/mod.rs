// Domain layer: binding records and ports. No XML or IO dependencies here.

pub mod model;
pub mod ports;
