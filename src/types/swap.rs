use ethnum::U256;

/// Totals and final pool state of a swap quote.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapResult {
    /// Total X paid in (X->Y) or received (Y->X), fee included on the
    /// paying side.
    pub amount_x: U256,
    /// Total Y received (X->Y) or paid in (Y->X).
    pub amount_y: U256,
    pub current_point: i32,
    pub liquidity: u128,
    pub liquidity_x: u128,
}

/// Working state handed to the per-range swap math for one segment of
/// the walk.
#[derive(Copy, Clone, Debug)]
pub struct WalkState {
    pub liquidity: U256,
    pub liquidity_x: U256,
    pub current_point: i32,
    pub sqrt_price: U256,
}
