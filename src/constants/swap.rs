/// Fee rates are expressed in parts per million of the paid amount.
pub const FEE_RATE_MUL_VALUE: u32 = 1_000_000;
