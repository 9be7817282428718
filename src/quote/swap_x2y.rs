use crate::{
    point_to_sqrt_price, x2y_at_price, x2y_at_price_desire, x2y_range, x2y_range_desire, CoreError, PoolFacade,
    SwapResult, WalkState, INVALID_SWAP_AMOUNT,
};
use ethnum::U256;

use super::boundary::{apply_liquidity_delta, BoundaryCursor};
use super::fee::{amount_less_fee, fee_of_cost};

/// Quote an exact-in X->Y swap against a pool snapshot.
///
/// Walks the price down toward `low_point`, consuming Y limit order
/// inventory and range liquidity in price order, until `amount` is
/// spent or `low_point` is reached. The snapshot is not modified.
pub fn swap_x2y(amount: u128, low_point: i32, pool: &PoolFacade) -> Result<SwapResult, CoreError> {
    if amount == 0 {
        return Err(INVALID_SWAP_AMOUNT);
    }
    let low_point = low_point.max(pool.left_most_point);

    let sqrt_rate = point_to_sqrt_price(1)?;
    let fee_rate = U256::new(pool.fee_rate as u128);
    let mut amount = U256::new(amount);
    let mut amount_x = U256::ZERO;
    let mut amount_y = U256::ZERO;
    let mut current_point = pool.current_point;
    let mut sqrt_price = point_to_sqrt_price(current_point)?;
    let mut liquidity = U256::new(pool.liquidity);
    let mut liquidity_x = U256::new(pool.liquidity_x);
    let mut finished = false;
    let mut cursor = BoundaryCursor::init_x2y(&pool.liquidity_points, &pool.limit_orders, current_point);

    while low_point <= current_point && !finished {
        // Limit order inventory at the current point trades first
        if cursor.is_limit_order(current_point) {
            let amount_no_fee = amount_less_fee(amount, fee_rate);
            if amount_no_fee > U256::ZERO {
                let curr_y = U256::new(cursor.limit_selling_y());
                let (cost_x, acquire_y) = x2y_at_price(amount_no_fee, sqrt_price, curr_y)?;
                if acquire_y < curr_y || cost_x >= amount_no_fee {
                    finished = true;
                }
                let fee_amount = if cost_x >= amount_no_fee {
                    amount - cost_x
                } else {
                    fee_of_cost(cost_x, fee_rate)?
                };
                amount -= cost_x + fee_amount;
                amount_x += cost_x + fee_amount;
                amount_y += acquire_y;
                cursor.consume_limit_order(false);
            } else {
                finished = true;
            }
        }
        if finished {
            break;
        }

        let search_start = current_point - 1;

        // Resolve the current point's remaining liquidity before
        // crossing its boundary
        if cursor.is_liquidity_boundary(current_point) {
            let amount_no_fee = amount_less_fee(amount, fee_rate);
            if amount_no_fee > U256::ZERO {
                if liquidity > U256::ZERO {
                    let state = WalkState {
                        liquidity,
                        liquidity_x,
                        current_point,
                        sqrt_price,
                    };
                    let range = x2y_range(state, current_point, sqrt_rate, amount_no_fee)?;
                    finished = range.finished;
                    let fee_amount = if range.cost_x >= amount_no_fee {
                        amount - range.cost_x
                    } else {
                        fee_of_cost(range.cost_x, fee_rate)?
                    };
                    amount_x += range.cost_x + fee_amount;
                    amount_y += range.acquire_y;
                    amount -= range.cost_x + fee_amount;
                    current_point = range.final_point;
                    sqrt_price = range.sqrt_final_price;
                    liquidity_x = range.liquidity_x;
                }
                if !finished {
                    liquidity = apply_liquidity_delta(liquidity, cursor.liquidity_delta(), false);
                    current_point -= 1;
                    sqrt_price = point_to_sqrt_price(current_point)?;
                    liquidity_x = U256::ZERO;
                }
            } else {
                finished = true;
            }
        }
        if finished || current_point < low_point {
            break;
        }

        let next_point = cursor.move_x2y(search_start, pool.point_delta).max(low_point);
        if liquidity == U256::ZERO {
            // Empty stretch, jump to the next boundary
            current_point = next_point;
            sqrt_price = point_to_sqrt_price(current_point)?;
        } else {
            let amount_no_fee = amount_less_fee(amount, fee_rate);
            if amount_no_fee > U256::ZERO {
                let state = WalkState {
                    liquidity,
                    liquidity_x,
                    current_point,
                    sqrt_price,
                };
                let range = x2y_range(state, next_point, sqrt_rate, amount_no_fee)?;
                finished = range.finished;
                let fee_amount = if range.cost_x >= amount_no_fee {
                    amount - range.cost_x
                } else {
                    fee_of_cost(range.cost_x, fee_rate)?
                };
                amount_y += range.acquire_y;
                amount_x += range.cost_x + fee_amount;
                amount -= range.cost_x + fee_amount;
                current_point = range.final_point;
                sqrt_price = range.sqrt_final_price;
                liquidity_x = range.liquidity_x;
            } else {
                finished = true;
            }
        }
        if current_point <= low_point {
            break;
        }
    }

    Ok(SwapResult {
        amount_x,
        amount_y,
        current_point,
        liquidity: liquidity.as_u128(),
        liquidity_x: liquidity_x.as_u128(),
    })
}

/// Quote an exact-out X->Y swap: how much X it costs to acquire
/// `desire_y` of Y, walking down toward `low_point`.
pub fn swap_x2y_desire_y(desire_y: u128, low_point: i32, pool: &PoolFacade) -> Result<SwapResult, CoreError> {
    if desire_y == 0 {
        return Err(INVALID_SWAP_AMOUNT);
    }
    let low_point = low_point.max(pool.left_most_point);

    let sqrt_rate = point_to_sqrt_price(1)?;
    let fee_rate = U256::new(pool.fee_rate as u128);
    let mut desire_y = U256::new(desire_y);
    let mut amount_x = U256::ZERO;
    let mut amount_y = U256::ZERO;
    let mut current_point = pool.current_point;
    let mut sqrt_price = point_to_sqrt_price(current_point)?;
    let mut liquidity = U256::new(pool.liquidity);
    let mut liquidity_x = U256::new(pool.liquidity_x);
    let mut finished = false;
    let mut cursor = BoundaryCursor::init_x2y(&pool.liquidity_points, &pool.limit_orders, current_point);

    while low_point <= current_point && !finished {
        if cursor.is_limit_order(current_point) {
            let curr_y = U256::new(cursor.limit_selling_y());
            let (cost_x, acquire_y) = x2y_at_price_desire(desire_y, sqrt_price, curr_y)?;
            if acquire_y >= desire_y {
                finished = true;
            }
            let fee_amount = fee_of_cost(cost_x, fee_rate)?;
            desire_y = desire_y.saturating_sub(acquire_y);
            amount_x += cost_x + fee_amount;
            amount_y += acquire_y;
            cursor.consume_limit_order(false);
        }
        if finished {
            break;
        }

        let search_start = current_point - 1;

        if cursor.is_liquidity_boundary(current_point) {
            if liquidity > U256::ZERO {
                let state = WalkState {
                    liquidity,
                    liquidity_x,
                    current_point,
                    sqrt_price,
                };
                let range = x2y_range_desire(state, current_point, sqrt_rate, desire_y)?;
                finished = range.finished;
                let fee_amount = fee_of_cost(range.cost_x, fee_rate)?;
                amount_x += range.cost_x + fee_amount;
                amount_y += range.acquire_y;
                desire_y = desire_y.saturating_sub(range.acquire_y);
                current_point = range.final_point;
                sqrt_price = range.sqrt_final_price;
                liquidity_x = range.liquidity_x;
            }
            if !finished {
                liquidity = apply_liquidity_delta(liquidity, cursor.liquidity_delta(), false);
                current_point -= 1;
                sqrt_price = point_to_sqrt_price(current_point)?;
                liquidity_x = U256::ZERO;
            }
        }
        if finished || current_point < low_point {
            break;
        }

        let next_point = cursor.move_x2y(search_start, pool.point_delta).max(low_point);
        if liquidity == U256::ZERO {
            current_point = next_point;
            sqrt_price = point_to_sqrt_price(current_point)?;
        } else {
            let state = WalkState {
                liquidity,
                liquidity_x,
                current_point,
                sqrt_price,
            };
            let range = x2y_range_desire(state, next_point, sqrt_rate, desire_y)?;
            finished = range.finished;
            let fee_amount = fee_of_cost(range.cost_x, fee_rate)?;
            amount_y += range.acquire_y;
            amount_x += range.cost_x + fee_amount;
            desire_y = desire_y.saturating_sub(range.acquire_y);
            current_point = range.final_point;
            sqrt_price = range.sqrt_final_price;
            liquidity_x = range.liquidity_x;
        }
        if current_point <= low_point {
            break;
        }
    }

    Ok(SwapResult {
        amount_x,
        amount_y,
        current_point,
        liquidity: liquidity.as_u128(),
        liquidity_x: liquidity_x.as_u128(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LimitOrderPoint, LiquidityPoint};

    fn pool_x2y() -> PoolFacade {
        PoolFacade {
            current_point: 1887,
            point_delta: 40,
            left_most_point: -800000,
            right_most_point: 800000,
            fee_rate: 2000,
            liquidity: 700000,
            liquidity_x: 246660,
            liquidity_points: [
                (-9000, 200000),
                (-8000, 300000),
                (-5000, -300000),
                (-4000, -200000),
                (-2000, 100000),
                (-1200, 500000),
                (-800, -500000),
                (800, -100000),
                (1000, 700000),
                (2000, -700000),
            ]
            .iter()
            .map(|&(point, liquidity_delta)| LiquidityPoint { point, liquidity_delta })
            .collect(),
            limit_orders: [(-3000, 100000000000u128), (-1000, 150000000000), (1200, 120000000000)]
                .iter()
                .map(|&(point, selling_y)| LimitOrderPoint {
                    point,
                    selling_x: 0,
                    selling_y,
                })
                .collect(),
        }
    }

    fn pool_x2y_detail() -> PoolFacade {
        PoolFacade {
            current_point: 1729,
            point_delta: 40,
            left_most_point: -800000,
            right_most_point: 800000,
            fee_rate: 2000,
            liquidity: 500000,
            liquidity_x: 134333,
            liquidity_points: [
                (-7000, 200000),
                (-5000, 300000),
                (-2000, -300000),
                (-240, -200000),
                (-200, 600000),
                (40, -600000),
                (80, 500000),
                (2000, -500000),
            ]
            .iter()
            .map(|&(point, liquidity_delta)| LiquidityPoint { point, liquidity_delta })
            .collect(),
            limit_orders: vec![
                LimitOrderPoint {
                    point: -6200,
                    selling_x: 0,
                    selling_y: 100000000000,
                },
                LimitOrderPoint {
                    point: -1000,
                    selling_x: 0,
                    selling_y: 150000000000,
                },
                LimitOrderPoint {
                    point: 1200,
                    selling_x: 0,
                    selling_y: 120000000000,
                },
                LimitOrderPoint {
                    point: 1800,
                    selling_x: 120000000000,
                    selling_y: 0,
                },
            ],
        }
    }

    #[test]
    fn test_exact_in() {
        let pool = pool_x2y();
        for (amount, expected_x, expected_y) in [
            (100000000000000000000000u128, 410079196782u128, 371715048235u128),
            (410079196782, 410079196782, 371715048235),
            (399624951498, 399624951497, 364135750158),
            (368662456348, 368662456348, 341243701400),
            (245774970898, 245774970898, 245800546380),
            (122887485449, 122887485449, 134829182908),
        ] {
            let result = swap_x2y(amount, -6123, &pool).unwrap();
            assert_eq!(result.amount_x, U256::new(expected_x), "amount {}", amount);
            assert_eq!(result.amount_y, U256::new(expected_y), "amount {}", amount);
        }
    }

    #[test]
    fn test_exact_out() {
        let pool = pool_x2y();
        let result = swap_x2y_desire_y(100000000000000000000000, -6123, &pool).unwrap();
        assert_eq!(result.amount_x, U256::new(410079196782));
        assert_eq!(result.amount_y, U256::new(371715048235));

        let result = swap_x2y_desire_y(364135750158, -6123, &pool).unwrap();
        assert_eq!(result.amount_x, U256::new(399624951497));
        assert_eq!(result.amount_y, U256::new(364135750158));
    }

    #[test]
    fn test_exact_in_out_duality() {
        let pool = pool_x2y();
        let exact_in = swap_x2y(368662456348, -6123, &pool).unwrap();
        let exact_out = swap_x2y_desire_y(exact_in.amount_y.as_u128(), -6123, &pool).unwrap();
        assert_eq!(exact_out.amount_x, exact_in.amount_x);
        assert_eq!(exact_out.amount_y, exact_in.amount_y);
    }

    #[test]
    fn test_final_state() {
        let pool = pool_x2y_detail();
        let result = swap_x2y(462592000000, -6789, &pool).unwrap();
        assert_eq!(result.amount_x, U256::new(462592000000));
        assert_eq!(result.amount_y, U256::new(372866052521));
        assert_eq!(result.current_point, -6786);
        assert_eq!(result.liquidity, 200000);
        assert_eq!(result.liquidity_x, 151638);
    }

    #[test]
    fn test_amount_consumed_by_fee_floor() {
        // An amount too small to survive the fee deduction trades nothing
        let pool = pool_x2y();
        let result = swap_x2y(1, -6123, &pool).unwrap();
        assert_eq!(result.amount_x, U256::ZERO);
        assert_eq!(result.amount_y, U256::ZERO);
        assert_eq!(result.current_point, 1887);
        assert_eq!(result.liquidity, 700000);
        assert_eq!(result.liquidity_x, 246660);
    }

    #[test]
    fn test_zero_amount() {
        let pool = pool_x2y();
        assert_eq!(swap_x2y(0, -6123, &pool), Err(INVALID_SWAP_AMOUNT));
        assert_eq!(swap_x2y_desire_y(0, -6123, &pool), Err(INVALID_SWAP_AMOUNT));
    }
}
