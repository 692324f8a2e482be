// Domain layer: component model, placeholders and ports (interfaces).

pub mod model;
pub mod placeholder;
pub mod ports;
