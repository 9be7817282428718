use ethnum::U256;

/// Lowest point a pool can reach. `1.0001^MIN_POINT` is the smallest
/// representable price.
pub const MIN_POINT: i32 = -887272;

/// Highest point a pool can reach.
pub const MAX_POINT: i32 = 887272;

/// Sqrt price at `MIN_POINT`, Q64.96.
pub const MIN_SQRT_PRICE: U256 = U256::new(4295128739);

/// Sqrt price at `MAX_POINT`, Q64.96.
pub const MAX_SQRT_PRICE: U256 = U256::from_words(4294805859, 318775800626314356294205765087544249638);

/// Fixed point scale of sqrt prices (2^96).
pub const Q96: U256 = U256::new(1u128 << 96);
