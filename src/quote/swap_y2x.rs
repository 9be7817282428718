use crate::{
    point_to_sqrt_price, y2x_at_price, y2x_at_price_desire, y2x_range, y2x_range_desire, CoreError, PoolFacade,
    SwapResult, WalkState, INVALID_SWAP_AMOUNT,
};
use ethnum::U256;

use super::boundary::{apply_liquidity_delta, BoundaryCursor};
use super::fee::{amount_less_fee, fee_of_cost};

/// Quote an exact-in Y->X swap against a pool snapshot.
///
/// Walks the price up toward `high_point`, consuming X limit order
/// inventory and range liquidity in price order, until `amount` is
/// spent or `high_point` is reached. The snapshot is not modified.
pub fn swap_y2x(amount: u128, high_point: i32, pool: &PoolFacade) -> Result<SwapResult, CoreError> {
    if amount == 0 {
        return Err(INVALID_SWAP_AMOUNT);
    }
    let high_point = high_point.min(pool.right_most_point);

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
    let mut cursor = BoundaryCursor::init_y2x(&pool.liquidity_points, &pool.limit_orders, current_point);

    while current_point < high_point && !finished {
        // Limit order inventory at the current point trades first
        if cursor.is_limit_order(current_point) {
            let amount_no_fee = amount_less_fee(amount, fee_rate);
            if amount_no_fee > U256::ZERO {
                let curr_x = U256::new(cursor.limit_selling_x());
                let (cost_y, acquire_x) = y2x_at_price(amount_no_fee, sqrt_price, curr_x)?;
                if acquire_x < curr_x || cost_y >= amount_no_fee {
                    finished = true;
                }
                let fee_amount = if cost_y >= amount_no_fee {
                    amount - cost_y
                } else {
                    fee_of_cost(cost_y, fee_rate)?
                };
                amount -= cost_y + fee_amount;
                amount_y += cost_y + fee_amount;
                amount_x += acquire_x;
                cursor.consume_limit_order(true);
            } else {
                finished = true;
            }
        }
        if finished {
            break;
        }

        let next_point = cursor.move_y2x(current_point, pool.point_delta).min(high_point);
        if liquidity == U256::ZERO {
            // Empty stretch, jump to the next boundary
            current_point = next_point;
            sqrt_price = point_to_sqrt_price(current_point)?;
            if cursor.is_liquidity_boundary(current_point) {
                liquidity = apply_liquidity_delta(liquidity, cursor.liquidity_delta(), true);
                liquidity_x = liquidity;
            }
        } else {
            let amount_no_fee = amount_less_fee(amount, fee_rate);
            if amount_no_fee > U256::ZERO {
                let state = WalkState {
                    liquidity,
                    liquidity_x,
                    current_point,
                    sqrt_price,
                };
                let range = y2x_range(state, next_point, sqrt_rate, amount_no_fee)?;
                finished = range.finished;
                let fee_amount = if range.cost_y >= amount_no_fee {
                    amount - range.cost_y
                } else {
                    fee_of_cost(range.cost_y, fee_rate)?
                };
                amount_x += range.acquire_x;
                amount_y += range.cost_y + fee_amount;
                amount -= range.cost_y + fee_amount;
                current_point = range.final_point;
                sqrt_price = range.sqrt_final_price;
                liquidity_x = range.liquidity_x;
            } else {
                finished = true;
            }
            if current_point == next_point {
                if cursor.is_liquidity_boundary(next_point) {
                    liquidity = apply_liquidity_delta(liquidity, cursor.liquidity_delta(), true);
                }
                // The price has fully crossed the point, all of its
                // liquidity is X again
                liquidity_x = liquidity;
            }
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

/// Quote an exact-out Y->X swap: how much Y it costs to acquire
/// `desire_x` of X, walking up toward `high_point`.
pub fn swap_y2x_desire_x(desire_x: u128, high_point: i32, pool: &PoolFacade) -> Result<SwapResult, CoreError> {
    if desire_x == 0 {
        return Err(INVALID_SWAP_AMOUNT);
    }
    let high_point = high_point.min(pool.right_most_point);

    let sqrt_rate = point_to_sqrt_price(1)?;
    let fee_rate = U256::new(pool.fee_rate as u128);
    let mut desire_x = U256::new(desire_x);
    let mut amount_x = U256::ZERO;
    let mut amount_y = U256::ZERO;
    let mut current_point = pool.current_point;
    let mut sqrt_price = point_to_sqrt_price(current_point)?;
    let mut liquidity = U256::new(pool.liquidity);
    let mut liquidity_x = U256::new(pool.liquidity_x);
    let mut finished = false;
    let mut cursor = BoundaryCursor::init_y2x(&pool.liquidity_points, &pool.limit_orders, current_point);

    while current_point < high_point && !finished {
        if cursor.is_limit_order(current_point) {
            let curr_x = U256::new(cursor.limit_selling_x());
            let (cost_y, acquire_x) = y2x_at_price_desire(desire_x, sqrt_price, curr_x)?;
            if acquire_x >= desire_x {
                finished = true;
            }
            let fee_amount = fee_of_cost(cost_y, fee_rate)?;
            desire_x = desire_x.saturating_sub(acquire_x);
            amount_y += cost_y + fee_amount;
            amount_x += acquire_x;
            cursor.consume_limit_order(true);
        }
        if finished {
            break;
        }

        let next_point = cursor.move_y2x(current_point, pool.point_delta).min(high_point);
        if liquidity == U256::ZERO {
            current_point = next_point;
            sqrt_price = point_to_sqrt_price(current_point)?;
            if cursor.is_liquidity_boundary(current_point) {
                liquidity = apply_liquidity_delta(liquidity, cursor.liquidity_delta(), true);
                liquidity_x = liquidity;
            }
        } else {
            if desire_x > U256::ZERO {
                let state = WalkState {
                    liquidity,
                    liquidity_x,
                    current_point,
                    sqrt_price,
                };
                let range = y2x_range_desire(state, next_point, sqrt_rate, desire_x)?;
                finished = range.finished;
                let fee_amount = fee_of_cost(range.cost_y, fee_rate)?;
                amount_x += range.acquire_x;
                amount_y += range.cost_y + fee_amount;
                desire_x = desire_x.saturating_sub(range.acquire_x);
                current_point = range.final_point;
                sqrt_price = range.sqrt_final_price;
                liquidity_x = range.liquidity_x;
            } else {
                finished = true;
            }
            if current_point == next_point {
                if cursor.is_liquidity_boundary(next_point) {
                    liquidity = apply_liquidity_delta(liquidity, cursor.liquidity_delta(), true);
                }
                liquidity_x = liquidity;
            }
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

    fn pool_y2x() -> PoolFacade {
        PoolFacade {
            current_point: -6182,
            point_delta: 40,
            left_most_point: -800000,
            right_most_point: 800000,
            fee_rate: 2000,
            liquidity: 500000,
            liquidity_x: 202614,
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
                .map(|&(point, selling_x)| LimitOrderPoint {
                    point,
                    selling_x,
                    selling_y: 0,
                })
                .collect(),
        }
    }

    fn pool_y2x_detail() -> PoolFacade {
        PoolFacade {
            current_point: -6215,
            point_delta: 40,
            left_most_point: -800000,
            right_most_point: 800000,
            fee_rate: 2000,
            liquidity: 200000,
            liquidity_x: 31891,
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
                    point: -6400,
                    selling_x: 0,
                    selling_y: 80000000000,
                },
                LimitOrderPoint {
                    point: -6200,
                    selling_x: 100000000000,
                    selling_y: 0,
                },
                LimitOrderPoint {
                    point: -1000,
                    selling_x: 150000000000,
                    selling_y: 0,
                },
                LimitOrderPoint {
                    point: 1200,
                    selling_x: 120000000000,
                    selling_y: 0,
                },
            ],
        }
    }

    #[test]
    fn test_exact_in() {
        let pool = pool_y2x();
        for (amount, expected_y, expected_x) in [
            (100000000000000000000000u128, 211374358247u128, 251597283132u128),
            (211374358247, 211374358247, 251597283132),
            (190236922422, 190236922422, 228316826682),
            (126824614948, 126824614948, 158375901172),
            (63412307474, 63412307474, 85638433523),
        ] {
            let result = swap_y2x(amount, 1100, &pool).unwrap();
            assert_eq!(result.amount_y, U256::new(expected_y), "amount {}", amount);
            assert_eq!(result.amount_x, U256::new(expected_x), "amount {}", amount);
        }
    }

    #[test]
    fn test_exact_out() {
        let pool = pool_y2x();
        for (desire, expected_y, expected_x) in [
            (100000000000000000000000u128, 211374358247u128, 251597283132u128),
            (251597283132, 211374358247, 251597283132),
            (228316826682, 190236922422, 228316826682),
            (158375901172, 126824614948, 158375901172),
            (85638433523, 63412307474, 85638433523),
        ] {
            let result = swap_y2x_desire_x(desire, 1100, &pool).unwrap();
            assert_eq!(result.amount_y, U256::new(expected_y), "desire {}", desire);
            assert_eq!(result.amount_x, U256::new(expected_x), "desire {}", desire);
        }
    }

    #[test]
    fn test_final_state_partial() {
        // Ends mid-point with part of the liquidity still selling X
        let pool = pool_y2x_detail();
        let result = swap_y2x(328168800000, 1560, &pool).unwrap();
        assert_eq!(result.amount_y, U256::new(328168800000));
        assert_eq!(result.amount_x, U256::new(373337423211));
        assert_eq!(result.current_point, 1559);
        assert_eq!(result.liquidity, 500000);
        assert_eq!(result.liquidity_x, 59052);
    }

    #[test]
    fn test_final_state_reaches_high_point() {
        let pool = pool_y2x_detail();
        let result = swap_y2x(1000000000000000000, 1560, &pool).unwrap();
        assert_eq!(result.amount_y, U256::new(328168863966));
        assert_eq!(result.amount_x, U256::new(373337477835));
        assert_eq!(result.current_point, 1560);
        assert_eq!(result.liquidity, 500000);
        assert_eq!(result.liquidity_x, 500000);
    }

    #[test]
    fn test_final_state_through_limit_order() {
        // Starts on a point with live X limit order inventory
        let mut pool = pool_y2x_detail();
        pool.current_point = -6200;
        pool.liquidity = 200000;
        pool.liquidity_x = 198640;
        let result = swap_y2x(327974071999, 1201, &pool).unwrap();
        assert_eq!(result.amount_y, U256::new(327974071999));
        assert_eq!(result.amount_x, U256::new(373166078203));
        assert_eq!(result.current_point, 1200);
        assert_eq!(result.liquidity, 500000);
        assert_eq!(result.liquidity_x, 358);
    }

    #[test]
    fn test_amount_consumed_by_fee_floor() {
        let pool = pool_y2x();
        let result = swap_y2x(1, 1100, &pool).unwrap();
        assert_eq!(result.amount_x, U256::ZERO);
        assert_eq!(result.amount_y, U256::ZERO);
        assert_eq!(result.current_point, -6182);
        assert_eq!(result.liquidity, 500000);
        assert_eq!(result.liquidity_x, 202614);
    }

    #[test]
    fn test_zero_amount() {
        let pool = pool_y2x();
        assert_eq!(swap_y2x(0, 1100, &pool), Err(INVALID_SWAP_AMOUNT));
        assert_eq!(swap_y2x_desire_x(0, 1100, &pool), Err(INVALID_SWAP_AMOUNT));
    }
}
