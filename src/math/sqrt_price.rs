use crate::{
    CoreError, MAX_POINT, MAX_SQRT_PRICE, MIN_POINT, MIN_SQRT_PRICE, POINT_OUT_OF_BOUNDS, SQRT_PRICE_OUT_OF_BOUNDS,
};
use ethnum::{I256, U256};

// 1.0001^(2^(i+1)) / 2 in Q128.128, one entry per bit of the point's
// absolute value above bit zero.
const POINT_BIT_MULTIPLIERS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x09aa508b5b7a84e1c677de54f3e99bc9,
    0x005d6af8dedb81196699c329225ee604,
    0x00002216e584f5fa1ea926041bedfe98,
    0x0000000048a170391f7dc42444e8fa2,
];

// log2(1.0001) reciprocal scaled to Q128, plus the floor/upper offsets
// that bracket the rounding error of the 14-bit fractional log.
const LOG_SQRT10001_MUL: i128 = 255738958999603826347141;
const LOG_FLOOR_OFFSET: i128 = 3402992956809132418596140100660247210;
const LOG_UPPER_OFFSET: u128 = 291339464771989622907027621153398088495;

/// Sqrt price of `1.0001^point` in Q64.96.
pub fn point_to_sqrt_price(point: i32) -> Result<U256, CoreError> {
    if !(MIN_POINT..=MAX_POINT).contains(&point) {
        return Err(POINT_OUT_OF_BOUNDS);
    }

    let abs_point = point.unsigned_abs();
    let mut value: U256 = if abs_point & 1 != 0 {
        U256::new(0xfffcb933bd6fad37aa2d162d1a594001)
    } else {
        U256::from_words(1, 0)
    };

    for (i, multiplier) in POINT_BIT_MULTIPLIERS.iter().enumerate() {
        if abs_point & (1 << (i + 1)) != 0 {
            value = (value * U256::new(*multiplier)) >> 128;
        }
    }

    if point > 0 {
        value = U256::MAX / value;
    }

    // Q128.128 -> Q64.96, rounding up
    let mut result = value >> 32;
    if value & U256::new(0xffffffff) != U256::ZERO {
        result += U256::ONE;
    }

    Ok(result)
}

/// Largest point whose sqrt price does not exceed `sqrt_price`.
///
/// The fractional binary log is refined to 14 bits, which brackets the
/// result between two candidates at most one point apart; the exact one
/// is selected by recomputing the upper candidate's price.
pub fn sqrt_price_to_point_floor(sqrt_price: U256) -> Result<i32, CoreError> {
    if sqrt_price <= MIN_SQRT_PRICE || sqrt_price >= MAX_SQRT_PRICE {
        return Err(SQRT_PRICE_OUT_OF_BOUNDS);
    }

    let sqrt_price_x128 = sqrt_price << 32;

    let mut x = sqrt_price_x128;
    let mut msb = 0u32;
    for (size, threshold) in [
        (128u32, U256::from_words(0, u128::MAX)),
        (64, U256::new(u64::MAX as u128)),
        (32, U256::new(u32::MAX as u128)),
        (16, U256::new(0xffff)),
        (8, U256::new(0xff)),
        (4, U256::new(0xf)),
        (2, U256::new(0x3)),
        (1, U256::new(0x1)),
    ] {
        if x > threshold {
            msb |= size;
            if size > 1 {
                x >>= size;
            }
        }
    }

    // Normalize the mantissa to [2^127, 2^128)
    let mut x = if msb >= 128 {
        sqrt_price_x128 >> (msb - 127)
    } else {
        sqrt_price_x128 << (127 - msb)
    };

    let mut log_2 = I256::new(msb as i128 - 128) << 64u32;
    for i in (50u32..=63).rev() {
        x = (x * x) >> 127;
        let bit: U256 = x >> 128;
        log_2 |= bit.as_i256() << i;
        if i > 50 {
            x >>= bit.as_u32();
        }
    }

    let log_sqrt10001 = log_2 * I256::new(LOG_SQRT10001_MUL);
    let log_floor = ((log_sqrt10001 - I256::new(LOG_FLOOR_OFFSET)) >> 128u32).as_i32();
    let log_upper = ((log_sqrt10001 + U256::new(LOG_UPPER_OFFSET).as_i256()) >> 128u32).as_i32();

    let mut result = log_floor;
    if point_to_sqrt_price(log_upper)? <= sqrt_price {
        result = log_upper;
    }

    Ok(result)
}
