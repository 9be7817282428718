use crate::{
    point_to_sqrt_price, sqrt_price_to_point_floor, try_get_amount_x, try_get_amount_y, try_mul_div, CoreError,
    WalkState, Q96,
};
use ethnum::U256;

/// Outcome of pushing a Y->X swap through one segment of the walk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Y2XRangeResult {
    /// The paid amount did not cover the whole segment.
    pub finished: bool,
    pub cost_y: U256,
    pub acquire_x: U256,
    pub final_point: i32,
    pub sqrt_final_price: U256,
    pub liquidity_x: U256,
}

struct Y2XRangeCompleteResult {
    cost_y: U256,
    acquire_x: U256,
    complete: bool,
    loc_point: i32,
    sqrt_loc_price: U256,
}

/// Trade Y against fixed-price X inventory at a single point.
pub fn y2x_at_price(amount_y: U256, sqrt_price: U256, curr_x: U256) -> Result<(U256, U256), CoreError> {
    let l = try_mul_div(amount_y, Q96, sqrt_price, false)?;
    let acquire_x = try_mul_div(l, Q96, sqrt_price, false)?.min(curr_x);
    // Charge for what is actually acquired, rounding against the trader
    let l = try_mul_div(acquire_x, sqrt_price, Q96, true)?;
    let cost_y = try_mul_div(l, sqrt_price, Q96, true)?;
    Ok((cost_y, acquire_x))
}

/// Convert part of the current point's liquidity from its X expression
/// to Y, capped by the X still present. Returns cost, acquired X and
/// the new liquidity-X.
pub fn y2x_at_price_liquidity(
    amount_y: U256,
    sqrt_price: U256,
    liquidity_x: U256,
) -> Result<(U256, U256, U256), CoreError> {
    let max_transform = try_mul_div(amount_y, Q96, sqrt_price, false)?;
    let transform = max_transform.min(liquidity_x);
    let cost_y = try_mul_div(transform, sqrt_price, Q96, true)?;
    let acquire_x = try_mul_div(transform, Q96, sqrt_price, false)?;
    Ok((cost_y, acquire_x, liquidity_x - transform))
}

fn y2x_range_complete(
    liquidity: U256,
    sqrt_price_left: U256,
    left_point: i32,
    sqrt_price_right: U256,
    right_point: i32,
    sqrt_rate: U256,
    amount_y: U256,
) -> Result<Y2XRangeCompleteResult, CoreError> {
    let max_y = try_get_amount_y(liquidity, sqrt_price_left, sqrt_price_right, sqrt_rate, true)?;

    if max_y <= amount_y {
        let acquire_x = try_get_amount_x(liquidity, left_point, right_point, sqrt_price_right, sqrt_rate, false)?;
        return Ok(Y2XRangeCompleteResult {
            cost_y: max_y,
            acquire_x,
            complete: true,
            loc_point: 0,
            sqrt_loc_price: U256::ZERO,
        });
    }

    // Invert the cost formula to find how deep into the range the
    // amount reaches, then recompute exact amounts up to that point.
    let sqrt_loc = try_mul_div(amount_y, sqrt_rate - Q96, liquidity, false)? + sqrt_price_left;
    let mut loc_point = sqrt_price_to_point_floor(sqrt_loc)?;
    loc_point = loc_point.max(left_point).min(right_point - 1);
    let sqrt_loc_price = point_to_sqrt_price(loc_point)?;

    if loc_point == left_point {
        return Ok(Y2XRangeCompleteResult {
            cost_y: U256::ZERO,
            acquire_x: U256::ZERO,
            complete: false,
            loc_point,
            sqrt_loc_price,
        });
    }

    let cost_y = try_get_amount_y(liquidity, sqrt_price_left, sqrt_loc_price, sqrt_rate, true)?.min(amount_y);
    let acquire_x = try_get_amount_x(liquidity, left_point, loc_point, sqrt_loc_price, sqrt_rate, false)?;

    Ok(Y2XRangeCompleteResult {
        cost_y,
        acquire_x,
        complete: false,
        loc_point,
        sqrt_loc_price,
    })
}

/// Push an exact-in Y->X swap from the walk state up to `right_point`,
/// or as far as `amount_y` reaches.
pub fn y2x_range(
    mut state: WalkState,
    right_point: i32,
    sqrt_rate: U256,
    mut amount_y: U256,
) -> Result<Y2XRangeResult, CoreError> {
    let mut result = Y2XRangeResult::default();

    // A point holding any Y cannot be stepped over directly; finish
    // converting its remaining X first.
    let start_has_y = state.liquidity_x < state.liquidity;
    if start_has_y {
        let (cost_y, acquire_x, new_liquidity_x) =
            y2x_at_price_liquidity(amount_y, state.sqrt_price, state.liquidity_x)?;
        result.liquidity_x = new_liquidity_x;
        result.cost_y = cost_y;
        result.acquire_x = acquire_x;
        if new_liquidity_x > U256::ZERO || cost_y >= amount_y {
            // X at the current point not exhausted, or amount spent
            result.finished = true;
            result.final_point = state.current_point;
            result.sqrt_final_price = state.sqrt_price;
            return Ok(result);
        }
        amount_y -= cost_y;
        state.current_point += 1;
        if state.current_point == right_point {
            result.final_point = state.current_point;
            result.sqrt_final_price = point_to_sqrt_price(right_point)?;
            return Ok(result);
        }
        state.sqrt_price = state.sqrt_price + try_mul_div(state.sqrt_price, sqrt_rate - Q96, Q96, false)?;
    }

    let sqrt_price_right = point_to_sqrt_price(right_point)?;
    let range = y2x_range_complete(
        state.liquidity,
        state.sqrt_price,
        state.current_point,
        sqrt_price_right,
        right_point,
        sqrt_rate,
        amount_y,
    )?;
    result.cost_y += range.cost_y;
    amount_y -= range.cost_y;
    result.acquire_x += range.acquire_x;
    if range.complete {
        result.finished = amount_y == U256::ZERO;
        result.final_point = right_point;
        result.sqrt_final_price = sqrt_price_right;
    } else {
        let (loc_cost_y, loc_acquire_x, new_liquidity_x) =
            y2x_at_price_liquidity(amount_y, range.sqrt_loc_price, state.liquidity)?;
        result.liquidity_x = new_liquidity_x;
        result.cost_y += loc_cost_y;
        result.acquire_x += loc_acquire_x;
        result.finished = true;
        result.final_point = range.loc_point;
        result.sqrt_final_price = range.sqrt_loc_price;
    }

    Ok(result)
}
