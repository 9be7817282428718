mod boundary;
mod fee;
mod swap_x2y;
mod swap_y2x;

pub use boundary::*;
pub use swap_x2y::*;
pub use swap_y2x::*;
