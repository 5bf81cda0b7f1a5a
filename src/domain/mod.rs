// Domain layer: models and ports. Nothing here touches the network or disk.

pub mod model;
pub mod ports;
