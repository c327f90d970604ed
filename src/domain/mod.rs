// Domain layer: data model and ports. The inference client and the map renderer live in core.

pub mod model;
pub mod ports;
