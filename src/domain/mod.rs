// Domain layer: the behavior contract, the host collaborators it talks to,
// and the data handed through the hooks.

pub mod model;
pub mod ports;
