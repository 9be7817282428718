use crate::{CoreError, MAX_POINT, MIN_POINT, PRICE_OUT_OF_BOUNDS, Q96};
use ethnum::U256;
use libm::{floor, log, pow};

const POINT_BASE: f64 = 1.0001;

/// Decimal price of Y per X at `point`. Diagnostic only, not part of
/// the fixed point pipeline.
pub fn point_to_price(point: i32) -> f64 {
    pow(POINT_BASE, point as f64)
}

/// Largest point whose price does not exceed `price`.
pub fn price_to_point(price: f64) -> Result<i32, CoreError> {
    if price <= 0.0 {
        return Err(PRICE_OUT_OF_BOUNDS);
    }
    let point = floor(log(price) / log(POINT_BASE));
    if point < MIN_POINT as f64 || point > MAX_POINT as f64 {
        return Err(PRICE_OUT_OF_BOUNDS);
    }
    Ok(point as i32)
}

/// Decimal price corresponding to a Q64.96 sqrt price.
pub fn sqrt_price_to_price(sqrt_price: U256) -> f64 {
    let ratio = sqrt_price.as_f64() / Q96.as_f64();
    ratio * ratio
}
