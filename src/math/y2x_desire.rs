use crate::{
    point_to_sqrt_price, sqrt_price_to_point_floor, try_get_amount_x, try_get_amount_y, try_mul_div, CoreError,
    WalkState, Y2XRangeResult, Q96,
};
use ethnum::U256;

struct Y2XDesireRangeCompleteResult {
    cost_y: U256,
    acquire_x: U256,
    complete: bool,
    loc_point: i32,
    sqrt_loc_price: U256,
}

/// Exact-out counterpart of `y2x_at_price`: acquire up to `desire_x`
/// from fixed-price X inventory.
pub fn y2x_at_price_desire(desire_x: U256, sqrt_price: U256, curr_x: U256) -> Result<(U256, U256), CoreError> {
    let acquire_x = desire_x.min(curr_x);
    let l = try_mul_div(acquire_x, sqrt_price, Q96, true)?;
    let cost_y = try_mul_div(l, sqrt_price, Q96, true)?;
    Ok((cost_y, acquire_x))
}

/// Exact-out counterpart of `y2x_at_price_liquidity`.
pub fn y2x_at_price_liquidity_desire(
    desire_x: U256,
    sqrt_price: U256,
    liquidity_x: U256,
) -> Result<(U256, U256, U256), CoreError> {
    let max_transform = try_mul_div(desire_x, sqrt_price, Q96, true)?;
    let transform = max_transform.min(liquidity_x);
    let cost_y = try_mul_div(transform, sqrt_price, Q96, true)?;
    let acquire_x = try_mul_div(transform, Q96, sqrt_price, false)?;
    Ok((cost_y, acquire_x, liquidity_x - transform))
}

fn y2x_range_complete_desire(
    liquidity: U256,
    sqrt_price_left: U256,
    left_point: i32,
    sqrt_price_right: U256,
    right_point: i32,
    sqrt_rate: U256,
    desire_x: U256,
) -> Result<Y2XDesireRangeCompleteResult, CoreError> {
    let max_x = try_get_amount_x(liquidity, left_point, right_point, sqrt_price_right, sqrt_rate, false)?;

    if max_x <= desire_x {
        let cost_y = try_get_amount_y(liquidity, sqrt_price_left, sqrt_price_right, sqrt_rate, true)?;
        return Ok(Y2XDesireRangeCompleteResult {
            cost_y,
            acquire_x: max_x,
            complete: true,
            loc_point: 0,
            sqrt_loc_price: U256::ZERO,
        });
    }

    // Invert the acquired-X formula to find the stopping point, then
    // recompute exact amounts up to it.
    let sqrt_price_span = point_to_sqrt_price(right_point - left_point)?;
    let sqrt_price_right_m1 = try_mul_div(sqrt_price_right, Q96, sqrt_rate, false)?;
    let divisor =
        sqrt_price_span - try_mul_div(desire_x, sqrt_price_right - sqrt_price_right_m1, liquidity, false)?;
    let sqrt_cut = try_mul_div(sqrt_price_right, Q96, divisor, false)?;

    let mut loc_point = sqrt_price_to_point_floor(sqrt_cut)?;
    loc_point = loc_point.max(left_point).min(right_point - 1);
    let sqrt_loc_price = point_to_sqrt_price(loc_point)?;

    if loc_point == left_point {
        return Ok(Y2XDesireRangeCompleteResult {
            cost_y: U256::ZERO,
            acquire_x: U256::ZERO,
            complete: false,
            loc_point,
            sqrt_loc_price,
        });
    }

    let acquire_x =
        try_get_amount_x(liquidity, left_point, loc_point, sqrt_loc_price, sqrt_rate, false)?.min(desire_x);
    let cost_y = try_get_amount_y(liquidity, sqrt_price_left, sqrt_loc_price, sqrt_rate, true)?;

    Ok(Y2XDesireRangeCompleteResult {
        cost_y,
        acquire_x,
        complete: false,
        loc_point,
        sqrt_loc_price,
    })
}

/// Push an exact-out Y->X swap from the walk state up to `right_point`,
/// or until `desire_x` is met.
pub fn y2x_range_desire(
    mut state: WalkState,
    right_point: i32,
    sqrt_rate: U256,
    mut desire_x: U256,
) -> Result<Y2XRangeResult, CoreError> {
    let mut result = Y2XRangeResult::default();

    // A point holding any Y cannot be stepped over directly; finish
    // converting its remaining X first.
    let start_has_y = state.liquidity_x < state.liquidity;
    if start_has_y {
        let (cost_y, acquire_x, new_liquidity_x) =
            y2x_at_price_liquidity_desire(desire_x, state.sqrt_price, state.liquidity_x)?;
        result.liquidity_x = new_liquidity_x;
        result.cost_y = cost_y;
        result.acquire_x = acquire_x;
        if new_liquidity_x > U256::ZERO || acquire_x >= desire_x {
            result.finished = true;
            result.final_point = state.current_point;
            result.sqrt_final_price = state.sqrt_price;
            return Ok(result);
        }
        desire_x -= acquire_x;
        state.current_point += 1;
        if state.current_point == right_point {
            result.final_point = state.current_point;
            result.sqrt_final_price = point_to_sqrt_price(right_point)?;
            return Ok(result);
        }
        state.sqrt_price = state.sqrt_price + try_mul_div(state.sqrt_price, sqrt_rate - Q96, Q96, false)?;
    }

    let sqrt_price_right = point_to_sqrt_price(right_point)?;
    let range = y2x_range_complete_desire(
        state.liquidity,
        state.sqrt_price,
        state.current_point,
        sqrt_price_right,
        right_point,
        sqrt_rate,
        desire_x,
    )?;
    result.cost_y += range.cost_y;
    desire_x -= range.acquire_x;
    result.acquire_x += range.acquire_x;
    if range.complete {
        result.finished = desire_x == U256::ZERO;
        result.final_point = right_point;
        result.sqrt_final_price = sqrt_price_right;
    } else {
        let (loc_cost_y, loc_acquire_x, new_liquidity_x) =
            y2x_at_price_liquidity_desire(desire_x, range.sqrt_loc_price, state.liquidity)?;
        result.liquidity_x = new_liquidity_x;
        result.cost_y += loc_cost_y;
        result.acquire_x += loc_acquire_x;
        result.finished = true;
        result.final_point = range.loc_point;
        result.sqrt_final_price = range.sqrt_loc_price;
    }

    Ok(result)
}
