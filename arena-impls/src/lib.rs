mod storages;
mod transports;

pub use storages::*;
pub use transports::*;
