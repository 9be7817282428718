use crate::{
    point_to_sqrt_price, sqrt_price_to_point_floor, try_get_amount_x, try_get_amount_y, try_mul_div, CoreError,
    WalkState, X2YRangeResult, Q96,
};
use ethnum::U256;

struct X2YDesireRangeCompleteResult {
    cost_x: U256,
    acquire_y: U256,
    complete: bool,
    loc_point: i32,
    sqrt_loc_price: U256,
}

/// Exact-out counterpart of `x2y_at_price`: acquire up to `desire_y`
/// from fixed-price Y inventory.
pub fn x2y_at_price_desire(desire_y: U256, sqrt_price: U256, curr_y: U256) -> Result<(U256, U256), CoreError> {
    let acquire_y = desire_y.min(curr_y);
    let l = try_mul_div(acquire_y, Q96, sqrt_price, true)?;
    let cost_x = try_mul_div(l, Q96, sqrt_price, true)?;
    Ok((cost_x, acquire_y))
}

/// Exact-out counterpart of `x2y_at_price_liquidity`.
pub fn x2y_at_price_liquidity_desire(
    desire_y: U256,
    sqrt_price: U256,
    liquidity: U256,
    liquidity_x: U256,
) -> Result<(U256, U256, U256), CoreError> {
    let liquidity_y = liquidity - liquidity_x;
    let max_transform = try_mul_div(desire_y, Q96, sqrt_price, true)?;
    let transform = max_transform.min(liquidity_y);
    let cost_x = try_mul_div(transform, Q96, sqrt_price, true)?;
    let acquire_y = try_mul_div(transform, sqrt_price, Q96, false)?;
    Ok((cost_x, acquire_y, liquidity_x + transform))
}

fn x2y_range_complete_desire(
    liquidity: U256,
    sqrt_price_left: U256,
    left_point: i32,
    sqrt_price_right: U256,
    right_point: i32,
    sqrt_rate: U256,
    desire_y: U256,
) -> Result<X2YDesireRangeCompleteResult, CoreError> {
    let max_y = try_get_amount_y(liquidity, sqrt_price_left, sqrt_price_right, sqrt_rate, false)?;

    if max_y <= desire_y {
        let cost_x = try_get_amount_x(liquidity, left_point, right_point, sqrt_price_right, sqrt_rate, true)?;
        return Ok(X2YDesireRangeCompleteResult {
            cost_x,
            acquire_y: max_y,
            complete: true,
            loc_point: 0,
            sqrt_loc_price: U256::ZERO,
        });
    }

    // Invert the acquired-Y formula to find the stopping point, then
    // recompute exact amounts up to it.
    let sqrt_cut = sqrt_price_right - try_mul_div(desire_y, sqrt_rate - Q96, liquidity, false)?;
    let mut loc_point = sqrt_price_to_point_floor(sqrt_cut)? + 1;
    loc_point = loc_point.min(right_point).max(left_point + 1);

    if loc_point == right_point {
        loc_point -= 1;
        let sqrt_loc_price = point_to_sqrt_price(loc_point)?;
        return Ok(X2YDesireRangeCompleteResult {
            cost_x: U256::ZERO,
            acquire_y: U256::ZERO,
            complete: false,
            loc_point,
            sqrt_loc_price,
        });
    }

    let sqrt_price_loc_span = point_to_sqrt_price(right_point - loc_point)?;
    let sqrt_price_right_m1 = try_mul_div(sqrt_price_right, Q96, sqrt_rate, true)?;
    let cost_x = try_mul_div(liquidity, sqrt_price_loc_span - Q96, sqrt_price_right - sqrt_price_right_m1, true)?;

    loc_point -= 1;
    let sqrt_loc_price = point_to_sqrt_price(loc_point)?;
    let sqrt_loc_price_a1 = sqrt_loc_price + try_mul_div(sqrt_loc_price, sqrt_rate - Q96, Q96, false)?;
    let acquire_y =
        try_get_amount_y(liquidity, sqrt_loc_price_a1, sqrt_price_right, sqrt_rate, false)?.min(desire_y);

    Ok(X2YDesireRangeCompleteResult {
        cost_x,
        acquire_y,
        complete: false,
        loc_point,
        sqrt_loc_price,
    })
}

/// Push an exact-out X->Y swap from the walk state down to
/// `left_point`, or until `desire_y` is met.
pub fn x2y_range_desire(
    mut state: WalkState,
    left_point: i32,
    sqrt_rate: U256,
    mut desire_y: U256,
) -> Result<X2YRangeResult, CoreError> {
    let mut result = X2YRangeResult::default();

    let current_has_y = state.liquidity_x < state.liquidity;
    if current_has_y && (state.liquidity_x > U256::ZERO || left_point == state.current_point) {
        let (cost_x, acquire_y, new_liquidity_x) =
            x2y_at_price_liquidity_desire(desire_y, state.sqrt_price, state.liquidity, state.liquidity_x)?;
        result.cost_x = cost_x;
        result.acquire_y = acquire_y;
        result.liquidity_x = new_liquidity_x;
        if new_liquidity_x < state.liquidity || acquire_y >= desire_y {
            result.finished = true;
            result.final_point = state.current_point;
            result.sqrt_final_price = state.sqrt_price;
        } else {
            desire_y -= acquire_y;
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
        let range = x2y_range_complete_desire(
            state.liquidity,
            sqrt_price_left,
            left_point,
            state.sqrt_price,
            state.current_point,
            sqrt_rate,
            desire_y,
        )?;
        result.cost_x += range.cost_x;
        desire_y -= range.acquire_y;
        result.acquire_y += range.acquire_y;
        if range.complete {
            result.finished = desire_y == U256::ZERO;
            result.final_point = left_point;
            result.sqrt_final_price = sqrt_price_left;
            result.liquidity_x = state.liquidity;
        } else {
            let (loc_cost_x, loc_acquire_y, new_liquidity_x) =
                x2y_at_price_liquidity_desire(desire_y, range.sqrt_loc_price, state.liquidity, U256::ZERO)?;
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
