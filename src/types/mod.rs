mod pool;
mod swap;

pub use pool::*;
pub use swap::*;
