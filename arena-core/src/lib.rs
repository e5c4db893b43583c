mod client;
mod config;
mod error;
mod events;
mod models;
mod session;
mod storage;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use models::*;
pub use session::*;
pub use storage::*;
pub use transport::*;
