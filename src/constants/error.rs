pub type CoreError = &'static str;

pub const INVALID_SWAP_AMOUNT: CoreError = "Swap amount must be positive";

pub const POINT_OUT_OF_BOUNDS: CoreError = "Point out of bounds";

pub const SQRT_PRICE_OUT_OF_BOUNDS: CoreError = "Sqrt price out of bounds";

pub const PRICE_OUT_OF_BOUNDS: CoreError = "Price out of bounds";

pub const ARITHMETIC_OVERFLOW: CoreError = "Arithmetic over- or underflow";
