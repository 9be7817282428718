mod amount;
mod sqrt_price;
mod wide;
mod x2y;
mod x2y_desire;
mod y2x;
mod y2x_desire;

#[cfg(feature = "floats")]
mod price;

pub use amount::*;
pub use sqrt_price::*;
pub use wide::*;
pub use x2y::*;
pub use x2y_desire::*;
pub use y2x::*;
pub use y2x_desire::*;

#[cfg(feature = "floats")]
pub use price::*;
