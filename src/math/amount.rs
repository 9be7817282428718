use crate::{point_to_sqrt_price, try_mul_div, CoreError, Q96};
use ethnum::U256;

/// Amount of Y held by `liquidity` spread over the points in
/// `[lower, upper)`, summed through the geometric series of per-point
/// prices.
pub fn try_get_amount_y(
    liquidity: U256,
    sqrt_price_lower: U256,
    sqrt_price_upper: U256,
    sqrt_rate: U256,
    round_up: bool,
) -> Result<U256, CoreError> {
    try_mul_div(liquidity, sqrt_price_upper - sqrt_price_lower, sqrt_rate - Q96, round_up)
}

/// Amount of X held by `liquidity` spread over the points in
/// `[left_point, right_point)`, where `sqrt_price_upper` is the price at
/// `right_point`.
pub fn try_get_amount_x(
    liquidity: U256,
    left_point: i32,
    right_point: i32,
    sqrt_price_upper: U256,
    sqrt_rate: U256,
    round_up: bool,
) -> Result<U256, CoreError> {
    let sqrt_price_span = point_to_sqrt_price(right_point - left_point)?;
    let sqrt_price_upper_m1 = try_mul_div(sqrt_price_upper, Q96, sqrt_rate, false)?;
    try_mul_div(liquidity, sqrt_price_span - Q96, sqrt_price_upper - sqrt_price_upper_m1, round_up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_amount_y() {
        let sqrt_rate = point_to_sqrt_price(1).unwrap();
        let lower = point_to_sqrt_price(-1200).unwrap();
        let upper = point_to_sqrt_price(-800).unwrap();
        assert_eq!(
            try_get_amount_y(U256::new(700000), lower, upper, sqrt_rate, false),
            Ok(U256::new(266342684))
        );
        assert_eq!(
            try_get_amount_y(U256::new(700000), lower, upper, sqrt_rate, true),
            Ok(U256::new(266342685))
        );
    }

    #[test]
    fn test_get_amount_x() {
        let sqrt_rate = point_to_sqrt_price(1).unwrap();
        let upper = point_to_sqrt_price(-800).unwrap();
        assert_eq!(
            try_get_amount_x(U256::new(700000), -1200, -800, upper, sqrt_rate, false),
            Ok(U256::new(294367435))
        );
        assert_eq!(
            try_get_amount_x(U256::new(700000), -1200, -800, upper, sqrt_rate, true),
            Ok(U256::new(294367436))
        );
    }

    #[test]
    fn test_empty_range() {
        let sqrt_rate = point_to_sqrt_price(1).unwrap();
        let price = point_to_sqrt_price(100).unwrap();
        assert_eq!(try_get_amount_y(U256::new(700000), price, price, sqrt_rate, true), Ok(U256::ZERO));
    }
}
