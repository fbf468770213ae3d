// Domain layer: models, notifications and ports (interfaces).

pub mod model;
pub mod notification;
pub mod ports;
