use crate::{
    point_to_sqrt_price, sqrt_price_to_point_floor, try_get_amount_y, try_mul_div, CoreError, WalkState, Q96,
};
use ethnum::U256;

/// Outcome of pushing an X->Y swap through one segment of the walk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct X2YRangeResult {
    /// The paid amount did not cover the whole segment.
    pub finished: bool,
    pub cost_x: U256,
    pub acquire_y: U256,
    pub final_point: i32,
    pub sqrt_final_price: U256,
    pub liquidity_x: U256,
}

struct X2YRangeCompleteResult {
    cost_x: U256,
    acquire_y: U256,
    complete: bool,
    loc_point: i32,
    sqrt_loc_price: U256,
}

/// Trade X against fixed-price Y inventory at a single point.
pub fn x2y_at_price(amount_x: U256, sqrt_price: U256, curr_y: U256) -> Result<(U256, U256), CoreError> {
    let l = try_mul_div(amount_x, sqrt_price, Q96, false)?;
    let mut acquire_y = try_mul_div(l, sqrt_price, Q96, false)?;
    if acquire_y > curr_y {
        acquire_y = curr_y;
    }
    // Charge for what is actually acquired, rounding against the trader
    let l = try_mul_div(acquire_y, Q96, sqrt_price, true)?;
    let cost_x = try_mul_div(l, Q96, sqrt_price, true)?;
    Ok((cost_x, acquire_y))
}

/// Convert part of the current point's liquidity from its Y expression
/// to X, capped by the Y still present. Returns cost, acquired Y and
/// the new liquidity-X.
pub fn x2y_at_price_liquidity(
    amount_x: U256,
    sqrt_price: U256,
    liquidity: U256,
    liquidity_x: U256,
) -> Result<(U256, U256, U256), CoreError> {
    let liquidity_y = liquidity - liquidity_x;
    let max_transform = try_mul_div(amount_x, sqrt_price, Q96, false)?;
    let transform = max_transform.min(liquidity_y);
    let cost_x = try_mul_div(transform, Q96, sqrt_price, true)?;
    let acquire_y = try_mul_div(transform, sqrt_price, Q96, false)?;
    Ok((cost_x, acquire_y, liquidity_x + transform))
}

fn x2y_range_complete(
    liquidity: U256,
    sqrt_price_left: U256,
    left_point: i32,
    sqrt_price_right: U256,
    right_point: i32,
    sqrt_rate: U256,
    amount_x: U256,
) -> Result<X2YRangeCompleteResult, CoreError> {
    let sqrt_price_right_m1 = try_mul_div(sqrt_price_right, Q96, sqrt_rate, true)?;
    let sqrt_price_span = point_to_sqrt_price(right_point - left_point)?;
    let max_x = try_mul_div(liquidity, sqrt_price_span - Q96, sqrt_price_right - sqrt_price_right_m1, true)?;

    if max_x <= amount_x {
        let acquire_y = try_get_amount_y(liquidity, sqrt_price_left, sqrt_price_right, sqrt_rate, false)?;
        return Ok(X2YRangeCompleteResult {
            cost_x: max_x,
            acquire_y,
            complete: true,
            loc_point: 0,
            sqrt_loc_price: U256::ZERO,
        });
    }

    // Invert the cost formula to find how deep into the range the
    // amount reaches, then recompute exact amounts up to that point.
    let sqrt_value =
        try_mul_div(amount_x, sqrt_price_right - sqrt_price_right_m1, liquidity, false)? + Q96;
    let log_value = sqrt_price_to_point_floor(sqrt_value)?;

    let mut loc_point = right_point - log_value;
    loc_point = loc_point.min(right_point).max(left_point + 1);

    if loc_point == right_point {
        loc_point -= 1;
        let sqrt_loc_price = point_to_sqrt_price(loc_point)?;
        return Ok(X2YRangeCompleteResult {
            cost_x: U256::ZERO,
            acquire_y: U256::ZERO,
            complete: false,
            loc_point,
            sqrt_loc_price,
        });
    }

    let sqrt_price_loc_span = point_to_sqrt_price(right_point - loc_point)?;
    let cost_x = try_mul_div(liquidity, sqrt_price_loc_span - Q96, sqrt_price_right - sqrt_price_right_m1, true)?
        .min(amount_x);

    loc_point -= 1;
    let sqrt_loc_price = point_to_sqrt_price(loc_point)?;
    let sqrt_loc_price_a1 = sqrt_loc_price + try_mul_div(sqrt_loc_price, sqrt_rate - Q96, Q96, false)?;
    let acquire_y = try_get_amount_y(liquidity, sqrt_loc_price_a1, sqrt_price_right, sqrt_rate, false)?;

    Ok(X2YRangeCompleteResult {
        cost_x,
        acquire_y,
        complete: false,
        loc_point,
        sqrt_loc_price,
    })
}

/// Push an exact-in X->Y swap from the walk state down to `left_point`,
/// or as far as `amount_x` reaches.
pub fn x2y_range(
    mut state: WalkState,
    left_point: i32,
    sqrt_rate: U256,
    mut amount_x: U256,
) -> Result<X2YRangeResult, CoreError> {
    let mut result = X2YRangeResult::default();

    let current_has_y = state.liquidity_x < state.liquidity;
    if current_has_y && (state.liquidity_x > U256::ZERO || left_point == state.current_point) {
        let (cost_x, acquire_y, new_liquidity_x) =
            x2y_at_price_liquidity(amount_x, state.sqrt_price, state.liquidity, state.liquidity_x)?;
        result.cost_x = cost_x;
        result.acquire_y = acquire_y;
        result.liquidity_x = new_liquidity_x;
        if new_liquidity_x < state.liquidity || cost_x >= amount_x {
            // Y at the current point not exhausted, or amount spent
            result.finished = true;
            result.final_point = state.current_point;
            result.sqrt_final_price = state.sqrt_price;
        } else {
            amount_x -= cost_x;
        }
    } else if current_has_y {
        state.current_point += 1;
        state.sqrt_price = state.sqrt_price + try_mul_div(state.sqrt_price, sqrt_rate - Q96, Q96, false)?;
    } else {
        result.liquidity_x = state.liquidity_x;
    }

    if result.finished {
        return Ok(result);
    }

    if left_point < state.current_point {
        let sqrt_price_left = point_to_sqrt_price(left_point)?;
        let range = x2y_range_complete(
            state.liquidity,
            sqrt_price_left,
            left_point,
            state.sqrt_price,
            state.current_point,
            sqrt_rate,
            amount_x,
        )?;
        result.cost_x += range.cost_x;
        amount_x -= range.cost_x;
        result.acquire_y += range.acquire_y;
        if range.complete {
            result.finished = amount_x == U256::ZERO;
            result.final_point = left_point;
            result.sqrt_final_price = sqrt_price_left;
            result.liquidity_x = state.liquidity;
        } else {
            let (loc_cost_x, loc_acquire_y, new_liquidity_x) =
                x2y_at_price_liquidity(amount_x, range.sqrt_loc_price, state.liquidity, U256::ZERO)?;
            result.liquidity_x = new_liquidity_x;
            result.cost_x += loc_cost_x;
            result.acquire_y += loc_acquire_y;
            result.finished = true;
            result.sqrt_final_price = range.sqrt_loc_price;
            result.final_point = range.loc_point;
        }
    } else {
        result.final_point = state.current_point;
        result.sqrt_final_price = state.sqrt_price;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_price() {
        let sqrt_price = point_to_sqrt_price(0).unwrap();
        let (cost_x, acquire_y) =
            x2y_at_price(U256::new(1_000_000_000_000), sqrt_price, U256::new(500_000_000_000)).unwrap();
        assert_eq!(cost_x, U256::new(500_000_000_000));
        assert_eq!(acquire_y, U256::new(500_000_000_000));
    }

    #[test]
    fn test_at_price_liquidity() {
        let sqrt_price = point_to_sqrt_price(1887).unwrap();
        let (cost_x, acquire_y, liquidity_x) =
            x2y_at_price_liquidity(U256::new(1_000_000_000), sqrt_price, U256::new(700000), U256::new(246660))
                .unwrap();
        assert_eq!(cost_x, U256::new(412526));
        assert_eq!(acquire_y, U256::new(498193));
        assert_eq!(liquidity_x, U256::new(700000));
    }

    #[test]
    fn test_range_crosses_to_left_point() {
        let sqrt_rate = point_to_sqrt_price(1).unwrap();
        let state = WalkState {
            liquidity: U256::new(700000),
            liquidity_x: U256::new(246660),
            current_point: 1887,
            sqrt_price: point_to_sqrt_price(1887).unwrap(),
        };
        let result = x2y_range(state, 1000, sqrt_rate, U256::new(10_000_000_000)).unwrap();
        assert!(!result.finished);
        assert_eq!(result.cost_x, U256::new(578141925));
        assert_eq!(result.acquire_y, U256::new(667904072));
        assert_eq!(result.final_point, 1000);
        assert_eq!(result.sqrt_final_price, U256::new(83290069058676223003182343270));
        assert_eq!(result.liquidity_x, U256::new(700000));
    }

    #[test]
    fn test_range_stops_inside() {
        let sqrt_rate = point_to_sqrt_price(1).unwrap();
        let state = WalkState {
            liquidity: U256::new(700000),
            liquidity_x: U256::new(246660),
            current_point: 1887,
            sqrt_price: point_to_sqrt_price(1887).unwrap(),
        };
        let result = x2y_range(state, 1000, sqrt_rate, U256::new(1_000_000)).unwrap();
        assert!(result.finished);
        assert_eq!(result.cost_x, U256::new(1000000));
        assert_eq!(result.acquire_y, U256::new(1207594));
        assert_eq!(result.final_point, 1886);
        assert_eq!(result.sqrt_final_price, U256::new(87062574585587794313329163329));
        assert_eq!(result.liquidity_x, U256::new(645565));
    }
}
