mod error;
mod point;
mod swap;

pub use error::*;
pub use point::*;
pub use swap::*;
