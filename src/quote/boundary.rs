use crate::{LimitOrderPoint, LiquidityPoint};
use ethnum::U256;

/// Number of point-delta slots grouped into one word of the boundary
/// bitmap; a walk never jumps past a word edge in a single step.
const WORD_SIZE: i32 = 256;

/// Tracks the next liquidity boundary and limit order on each side of
/// the walk. Indices are signed so the x2y direction can run off the
/// low end of either list.
pub struct BoundaryCursor<'a> {
    liquidity_points: &'a [LiquidityPoint],
    limit_orders: &'a [LimitOrderPoint],
    liquidity_idx: isize,
    limit_order_idx: isize,
}

impl<'a> BoundaryCursor<'a> {
    /// Position the cursor for a walk toward higher points. Liquidity
    /// entries at the current point are already active; a limit order
    /// at the current point is still live.
    pub fn init_y2x(
        liquidity_points: &'a [LiquidityPoint],
        limit_orders: &'a [LimitOrderPoint],
        current_point: i32,
    ) -> Self {
        let liquidity_idx = liquidity_points
            .iter()
            .position(|boundary| boundary.point > current_point)
            .unwrap_or(liquidity_points.len()) as isize;
        let limit_order_idx = limit_orders
            .iter()
            .position(|order| order.point >= current_point)
            .unwrap_or(limit_orders.len()) as isize;
        BoundaryCursor {
            liquidity_points,
            limit_orders,
            liquidity_idx,
            limit_order_idx,
        }
    }

    /// Position the cursor for a walk toward lower points. Liquidity
    /// entries at the current point have not been crossed yet.
    pub fn init_x2y(
        liquidity_points: &'a [LiquidityPoint],
        limit_orders: &'a [LimitOrderPoint],
        current_point: i32,
    ) -> Self {
        let liquidity_idx = match liquidity_points.iter().rposition(|boundary| boundary.point <= current_point) {
            Some(idx) => idx as isize,
            None => -1,
        };
        let limit_order_idx = match limit_orders.iter().rposition(|order| order.point <= current_point) {
            Some(idx) => idx as isize,
            None => -1,
        };
        BoundaryCursor {
            liquidity_points,
            limit_orders,
            liquidity_idx,
            limit_order_idx,
        }
    }

    fn liquidity_in_range(&self) -> bool {
        self.liquidity_idx >= 0 && (self.liquidity_idx as usize) < self.liquidity_points.len()
    }

    fn limit_order_in_range(&self) -> bool {
        self.limit_order_idx >= 0 && (self.limit_order_idx as usize) < self.limit_orders.len()
    }

    pub fn is_liquidity_boundary(&self, point: i32) -> bool {
        self.liquidity_in_range() && self.liquidity_points[self.liquidity_idx as usize].point == point
    }

    pub fn is_limit_order(&self, point: i32) -> bool {
        self.limit_order_in_range() && self.limit_orders[self.limit_order_idx as usize].point == point
    }

    /// Liquidity delta at the boundary the cursor points at. Only valid
    /// after `is_liquidity_boundary` returned true.
    pub fn liquidity_delta(&self) -> i128 {
        self.liquidity_points[self.liquidity_idx as usize].liquidity_delta
    }

    pub fn limit_selling_x(&self) -> u128 {
        self.limit_orders[self.limit_order_idx as usize].selling_x
    }

    pub fn limit_selling_y(&self) -> u128 {
        self.limit_orders[self.limit_order_idx as usize].selling_y
    }

    /// Step past the limit order the cursor points at.
    pub fn consume_limit_order(&mut self, is_y2x: bool) {
        if is_y2x {
            if (self.limit_order_idx as usize) < self.limit_orders.len() {
                self.limit_order_idx += 1;
            }
        } else if self.limit_order_idx >= 0 {
            self.limit_order_idx -= 1;
        }
    }

    /// Advance past `point` and return the next stopping point to the
    /// right: the nearest of the next liquidity boundary, the next
    /// limit order, and the edge of the current bitmap word.
    pub fn move_y2x(&mut self, point: i32, point_delta: i32) -> i32 {
        let word = point.div_euclid(point_delta) + 1;
        let bit_idx = word.rem_euclid(WORD_SIZE);
        let word_boundary = (word + WORD_SIZE - 1 - bit_idx) * point_delta;

        while self.liquidity_in_range() && self.liquidity_points[self.liquidity_idx as usize].point <= point {
            self.liquidity_idx += 1;
        }
        while self.limit_order_in_range() && self.limit_orders[self.limit_order_idx as usize].point < point {
            self.limit_order_idx += 1;
        }

        let mut right_point = word_boundary;
        if self.liquidity_in_range() {
            right_point = right_point.min(self.liquidity_points[self.liquidity_idx as usize].point);
        }
        if self.limit_order_in_range() {
            right_point = right_point.min(self.limit_orders[self.limit_order_idx as usize].point);
        }
        right_point
    }

    /// Advance past `point` and return the next stopping point to the
    /// left.
    pub fn move_x2y(&mut self, point: i32, point_delta: i32) -> i32 {
        let word = point.div_euclid(point_delta);
        let bit_idx = word.rem_euclid(WORD_SIZE);
        let word_boundary = (word - bit_idx) * point_delta;

        while self.liquidity_idx >= 0 && self.liquidity_points[self.liquidity_idx as usize].point > point {
            self.liquidity_idx -= 1;
        }
        while self.limit_order_idx >= 0 && self.limit_orders[self.limit_order_idx as usize].point > point {
            self.limit_order_idx -= 1;
        }

        let mut left_point = word_boundary;
        if self.liquidity_idx >= 0 {
            left_point = left_point.max(self.liquidity_points[self.liquidity_idx as usize].point);
        }
        if self.limit_order_idx >= 0 {
            left_point = left_point.max(self.limit_orders[self.limit_order_idx as usize].point);
        }
        left_point
    }
}

/// Apply a signed boundary delta to the active liquidity. `add` is true
/// when the boundary is crossed left to right.
pub(crate) fn apply_liquidity_delta(liquidity: U256, delta: i128, add: bool) -> U256 {
    if (delta > 0) == add {
        liquidity + U256::new(delta.unsigned_abs())
    } else {
        liquidity - U256::new(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liquidity_points() -> Vec<LiquidityPoint> {
        [
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
        .collect()
    }

    fn limit_orders_y() -> Vec<LimitOrderPoint> {
        [(-3000, 100000000000u128), (-1000, 150000000000), (1200, 120000000000)]
            .iter()
            .map(|&(point, selling_y)| LimitOrderPoint {
                point,
                selling_x: 0,
                selling_y,
            })
            .collect()
    }

    fn limit_orders_x() -> Vec<LimitOrderPoint> {
        [(-3000, 100000000000u128), (-1000, 150000000000), (1200, 120000000000)]
            .iter()
            .map(|&(point, selling_x)| LimitOrderPoint {
                point,
                selling_x,
                selling_y: 0,
            })
            .collect()
    }

    #[test]
    fn test_init_x2y() {
        let liquidities = liquidity_points();
        let orders = limit_orders_y();
        let cursor = BoundaryCursor::init_x2y(&liquidities, &orders, 1887);
        assert!(!cursor.is_liquidity_boundary(1887));
        assert!(!cursor.is_limit_order(1887));
        assert!(cursor.is_liquidity_boundary(1000));
        assert!(cursor.is_limit_order(1200));
    }

    #[test]
    fn test_init_at_limit_order_point() {
        let liquidities = liquidity_points();
        let orders_x = limit_orders_x();
        let cursor = BoundaryCursor::init_y2x(&liquidities, &orders_x, -3000);
        assert!(cursor.is_limit_order(-3000));
        let orders_y = limit_orders_y();
        let cursor = BoundaryCursor::init_x2y(&liquidities, &orders_y, -3000);
        assert!(cursor.is_limit_order(-3000));
    }

    #[test]
    fn test_move_x2y() {
        let liquidities = liquidity_points();
        let orders = limit_orders_y();
        let mut cursor = BoundaryCursor::init_x2y(&liquidities, &orders, 1887);
        // Next stop below 1886 is the limit order at 1200
        assert_eq!(cursor.move_x2y(1886, 40), 1200);
        assert!(cursor.is_limit_order(1200));
    }

    #[test]
    fn test_move_y2x() {
        let liquidities = liquidity_points();
        let orders = limit_orders_x();
        let mut cursor = BoundaryCursor::init_y2x(&liquidities, &orders, -6182);
        // Next stop above -6182 is the liquidity boundary at -5000
        assert_eq!(cursor.move_y2x(-6182, 40), -5000);
        assert!(cursor.is_liquidity_boundary(-5000));
    }

    #[test]
    fn test_move_stops_at_word_edge() {
        let liquidities: Vec<LiquidityPoint> = vec![];
        let orders: Vec<LimitOrderPoint> = vec![];
        let mut cursor = BoundaryCursor::init_y2x(&liquidities, &orders, 0);
        // With no boundaries the jump is capped by the bitmap word edge
        assert_eq!(cursor.move_y2x(0, 40), 255 * 40);
        let mut cursor = BoundaryCursor::init_x2y(&liquidities, &orders, 0);
        assert_eq!(cursor.move_x2y(0, 40), 0);
        assert_eq!(cursor.move_x2y(-1, 40), -256 * 40);
    }

    #[test]
    fn test_consume_limit_order() {
        let liquidities = liquidity_points();
        let orders = limit_orders_x();
        let mut cursor = BoundaryCursor::init_y2x(&liquidities, &orders, -3000);
        assert!(cursor.is_limit_order(-3000));
        cursor.consume_limit_order(true);
        assert!(!cursor.is_limit_order(-3000));
        assert!(cursor.is_limit_order(-1000));
    }

    #[test]
    fn test_apply_liquidity_delta() {
        use ethnum::U256;
        assert_eq!(apply_liquidity_delta(U256::new(1000), 500, true), U256::new(1500));
        assert_eq!(apply_liquidity_delta(U256::new(1000), -500, true), U256::new(500));
        assert_eq!(apply_liquidity_delta(U256::new(1000), 500, false), U256::new(500));
        assert_eq!(apply_liquidity_delta(U256::new(1000), -500, false), U256::new(1500));
    }
}
