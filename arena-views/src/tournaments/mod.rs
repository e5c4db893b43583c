mod detail;
mod display;
mod form;
mod list;
mod membership;

pub use detail::*;
pub use display::*;
pub use form::*;
pub use list::*;
pub use membership::*;
