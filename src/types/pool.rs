/// Signed liquidity change at a boundary point. Positive deltas activate
/// liquidity when the price enters the range to the right of the point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LiquidityPoint {
    pub point: i32,
    pub liquidity_delta: i128,
}

/// Resting limit order inventory at a point. X inventory is consumed by
/// Y->X swaps, Y inventory by X->Y swaps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LimitOrderPoint {
    pub point: i32,
    pub selling_x: u128,
    pub selling_y: u128,
}

/// Read-only snapshot of the pool state a quote is computed against.
///
/// `liquidity_points` and `limit_orders` must be sorted by point in
/// ascending order. `liquidity_x` is the portion of `liquidity` at the
/// current point still expressed as asset X; the remainder has already
/// been converted to Y.
#[derive(Clone, Debug, Default)]
pub struct PoolFacade {
    pub current_point: i32,
    pub point_delta: i32,
    pub left_most_point: i32,
    pub right_most_point: i32,
    /// Swap fee in parts per million.
    pub fee_rate: u32,
    pub liquidity: u128,
    pub liquidity_x: u128,
    pub liquidity_points: Vec<LiquidityPoint>,
    pub limit_orders: Vec<LimitOrderPoint>,
}
