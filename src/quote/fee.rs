use crate::{try_mul_div, CoreError, FEE_RATE_MUL_VALUE};
use ethnum::U256;

/// Portion of `amount` left to trade with after the fee is taken,
/// rounded down.
pub(crate) fn amount_less_fee(amount: U256, fee_rate: U256) -> U256 {
    let denominator = U256::new(FEE_RATE_MUL_VALUE as u128);
    amount * (denominator - fee_rate) / denominator
}

/// Fee charged on a realized cost, rounded up so the pool never
/// under-collects.
pub(crate) fn fee_of_cost(cost: U256, fee_rate: U256) -> Result<U256, CoreError> {
    try_mul_div(cost, fee_rate, U256::new(FEE_RATE_MUL_VALUE as u128) - fee_rate, true)
}
