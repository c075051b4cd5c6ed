//! Type definitions for daygrid

mod error;
mod item;
mod month;
mod payload;

pub use error::*;
pub use item::*;
pub use month::Month;
pub use payload::*;
