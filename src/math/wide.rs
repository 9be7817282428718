use crate::{CoreError, ARITHMETIC_OVERFLOW};
use ethnum::U256;

const NUM_WORDS: usize = 8;

/// 512-bit unsigned integer used as the intermediate of `a * b / c`
/// over 256-bit operands.
#[derive(Copy, Clone, Debug)]
pub struct U512Muldiv {
    items: [u64; NUM_WORDS],
}

impl U512Muldiv {
    pub fn new(value: U256) -> Self {
        let (hi, lo) = value.into_words();
        U512Muldiv {
            items: [lo.lo(), lo.hi(), hi.lo(), hi.hi(), 0, 0, 0, 0],
        }
    }

    pub fn zero() -> Self {
        U512Muldiv { items: [0; NUM_WORDS] }
    }

    fn copy(&self) -> Self {
        let mut items: [u64; NUM_WORDS] = [0; NUM_WORDS];
        items.copy_from_slice(&self.items);
        U512Muldiv { items }
    }

    fn update_word(&mut self, index: usize, value: u64) {
        self.items[index] = value;
    }

    fn num_words(&self) -> usize {
        for i in (0..self.items.len()).rev() {
            if self.items[i] != 0 {
                return i + 1;
            }
        }
        0
    }

    pub fn get_word(&self, index: usize) -> u64 {
        self.items[index]
    }

    pub fn get_word_u128(&self, index: usize) -> u128 {
        self.items[index] as u128
    }

    // Logical-left shift, does not trigger overflow
    pub fn shift_word_left(&self) -> Self {
        let mut result = U512Muldiv::zero();

        for i in (0..NUM_WORDS - 1).rev() {
            result.items[i + 1] = self.items[i];
        }

        result
    }

    // Logical-left shift, does not trigger overflow
    pub fn shift_left(&self, mut shift_amount: u32) -> Self {
        // Return 0 if shift is greater than number of bits
        if shift_amount >= U64_RESOLUTION * (NUM_WORDS as u32) {
            return U512Muldiv::zero();
        }

        let mut result = self.copy();

        while shift_amount >= U64_RESOLUTION {
            result = result.shift_word_left();
            shift_amount -= U64_RESOLUTION;
        }

        if shift_amount == 0 {
            return result;
        }

        for i in (1..NUM_WORDS).rev() {
            result.items[i] = result.items[i] << shift_amount | result.items[i - 1] >> (U64_RESOLUTION - shift_amount);
        }

        result.items[0] <<= shift_amount;

        result
    }

    // Logical-right shift, does not trigger overflow
    pub fn shift_word_right(&self) -> Self {
        let mut result = U512Muldiv::zero();

        for i in 0..NUM_WORDS - 1 {
            result.items[i] = self.items[i + 1]
        }

        result
    }

    // Logical-right shift, does not trigger overflow
    pub fn shift_right(&self, mut shift_amount: u32) -> Self {
        // Return 0 if shift is greater than number of bits
        if shift_amount >= U64_RESOLUTION * (NUM_WORDS as u32) {
            return U512Muldiv::zero();
        }

        let mut result = self.copy();

        while shift_amount >= U64_RESOLUTION {
            result = result.shift_word_right();
            shift_amount -= U64_RESOLUTION;
        }

        if shift_amount == 0 {
            return result;
        }

        for i in 0..NUM_WORDS - 1 {
            result.items[i] = result.items[i] >> shift_amount | result.items[i + 1] << (U64_RESOLUTION - shift_amount);
        }

        result.items[NUM_WORDS - 1] >>= shift_amount;

        result
    }

    fn try_into_u128(&self) -> Result<u128, CoreError> {
        if self.num_words() > 2 {
            return Err(ARITHMETIC_OVERFLOW);
        }

        Ok((self.items[1] as u128) << U64_RESOLUTION | (self.items[0] as u128))
    }

    pub fn try_into_u256(&self) -> Result<U256, CoreError> {
        if self.num_words() > 4 {
            return Err(ARITHMETIC_OVERFLOW);
        }

        let hi = hi_lo(self.items[3], self.items[2]);
        let lo = hi_lo(self.items[1], self.items[0]);
        Ok(U256::from_words(hi, lo))
    }

    pub fn is_zero(self) -> bool {
        for i in 0..NUM_WORDS {
            if self.items[i] != 0 {
                return false;
            }
        }

        true
    }

    // Result overflows if greater than 2^512-1
    pub fn mul(&self, other: U512Muldiv) -> Self {
        let mut result = U512Muldiv::zero();

        let m = self.num_words();
        let n = other.num_words();

        for j in 0..n {
            let mut k = 0;
            for i in 0..m {
                let x = self.get_word_u128(i);
                let y = other.get_word_u128(j);
                if i + j < NUM_WORDS {
                    let z = result.get_word_u128(i + j);
                    let t = x.wrapping_mul(y).wrapping_add(z).wrapping_add(k);
                    result.update_word(i + j, t.lo());
                    k = t.hi_u128();
                }
            }

            // Don't update the carry word
            if j + m < NUM_WORDS {
                result.update_word(j + m, k as u64);
            }
        }

        result
    }

    // Panics on a zero divisor
    pub fn div(&self, mut divisor: U512Muldiv, return_remainder: bool) -> (Self, Self) {
        let mut dividend = self.copy();
        let mut quotient = U512Muldiv::zero();

        let num_dividend_words = dividend.num_words();
        let num_divisor_words = divisor.num_words();

        if num_divisor_words == 0 {
            panic!("divide by zero");
        }

        // Case 0. Dividend is 0, return 0
        if num_dividend_words == 0 {
            return (U512Muldiv::zero(), U512Muldiv::zero());
        }

        // Case 1. Dividend is smaller than divisor, quotient = 0, remainder = dividend
        if num_dividend_words < num_divisor_words {
            if return_remainder {
                return (U512Muldiv::zero(), dividend);
            } else {
                return (U512Muldiv::zero(), U512Muldiv::zero());
            }
        }

        // Case 2. Dividend fits in u128, divisor <= dividend, perform math in u128 space
        if num_dividend_words < 3 {
            let dividend = dividend.try_into_u128().unwrap();
            let divisor = divisor.try_into_u128().unwrap();
            let quotient = dividend / divisor;
            if return_remainder {
                let remainder = dividend % divisor;
                return (U512Muldiv::new(U256::new(quotient)), U512Muldiv::new(U256::new(remainder)));
            } else {
                return (U512Muldiv::new(U256::new(quotient)), U512Muldiv::zero());
            }
        }

        // Case 3. Divisor is single-word, we must isolate this case for correctness
        if num_divisor_words == 1 {
            let mut k = 0;
            for j in (0..num_dividend_words).rev() {
                let d1 = hi_lo(k.lo(), dividend.get_word(j));
                let d2 = divisor.get_word_u128(0);
                let q = d1 / d2;
                k = d1 - d2 * q;
                quotient.update_word(j, q.lo());
            }

            if return_remainder {
                return (quotient, U512Muldiv::new(U256::new(k)));
            } else {
                return (quotient, U512Muldiv::zero());
            }
        }

        // Normalize the division by shifting left
        let s = divisor.get_word(num_divisor_words - 1).leading_zeros();
        let b = dividend.get_word(num_dividend_words - 1).leading_zeros();

        // Conditional carry space for normalized division
        let mut dividend_carry_space: u64 = 0;
        if num_dividend_words == NUM_WORDS && b < s {
            dividend_carry_space = dividend.items[num_dividend_words - 1] >> (U64_RESOLUTION - s);
        }
        dividend = dividend.shift_left(s);
        divisor = divisor.shift_left(s);

        for j in (0..num_dividend_words - num_divisor_words + 1).rev() {
            let result = div_loop(j, num_divisor_words, dividend, &mut dividend_carry_space, divisor, quotient);
            quotient = result.0;
            dividend = result.1;
        }

        if return_remainder {
            dividend = dividend.shift_right(s);
            (quotient, dividend)
        } else {
            (quotient, U512Muldiv::zero())
        }
    }
}

const U64_MAX: u128 = u64::MAX as u128;
const U64_RESOLUTION: u32 = 64;

pub trait LoHi {
    fn lo(self) -> u64;
    fn hi(self) -> u64;
    fn lo_u128(self) -> u128;
    fn hi_u128(self) -> u128;
}

impl LoHi for u128 {
    fn lo(self) -> u64 {
        (self & U64_MAX) as u64
    }
    fn lo_u128(self) -> u128 {
        self & U64_MAX
    }
    fn hi(self) -> u64 {
        (self >> U64_RESOLUTION) as u64
    }
    fn hi_u128(self) -> u128 {
        self >> U64_RESOLUTION
    }
}

pub fn hi_lo(hi: u64, lo: u64) -> u128 {
    (hi as u128) << U64_RESOLUTION | (lo as u128)
}

fn div_loop(
    index: usize,
    num_divisor_words: usize,
    mut dividend: U512Muldiv,
    dividend_carry_space: &mut u64,
    divisor: U512Muldiv,
    mut quotient: U512Muldiv,
) -> (U512Muldiv, U512Muldiv) {
    let use_carry = (index + num_divisor_words) == NUM_WORDS;
    let div_hi = if use_carry {
        *dividend_carry_space
    } else {
        dividend.get_word(index + num_divisor_words)
    };
    let d0 = hi_lo(div_hi, dividend.get_word(index + num_divisor_words - 1));
    let d1 = divisor.get_word_u128(num_divisor_words - 1);

    let mut qhat = d0 / d1;
    let mut rhat = d0 - d1 * qhat;

    let d0_2 = dividend.get_word(index + num_divisor_words - 2);
    let d1_2 = divisor.get_word_u128(num_divisor_words - 2);

    let mut cmp1 = hi_lo(rhat.lo(), d0_2);
    let mut cmp2 = qhat.wrapping_mul(d1_2);

    while qhat.hi() != 0 || cmp2 > cmp1 {
        qhat -= 1;
        rhat += d1;
        if rhat.hi() != 0 {
            break;
        }

        cmp1 = hi_lo(rhat.lo(), cmp1.lo());
        cmp2 -= d1_2;
    }

    let mut k = 0;
    let mut t;
    for i in 0..num_divisor_words {
        let p = qhat * (divisor.get_word_u128(i));
        t = (dividend.get_word_u128(index + i)).wrapping_sub(k).wrapping_sub(p.lo_u128());
        dividend.update_word(index + i, t.lo());
        k = ((p >> U64_RESOLUTION) as u64).wrapping_sub((t >> U64_RESOLUTION) as u64) as u128;
    }

    let d_head = if use_carry {
        *dividend_carry_space as u128
    } else {
        dividend.get_word_u128(index + num_divisor_words)
    };

    t = d_head.wrapping_sub(k);
    if use_carry {
        *dividend_carry_space = t.lo();
    } else {
        dividend.update_word(index + num_divisor_words, t.lo());
    }

    if k > d_head {
        qhat -= 1;
        k = 0;
        for i in 0..num_divisor_words {
            t = dividend.get_word_u128(index + i).wrapping_add(divisor.get_word_u128(i)).wrapping_add(k);
            dividend.update_word(index + i, t.lo());
            k = t >> U64_RESOLUTION;
        }

        let new_carry = dividend.get_word_u128(index + num_divisor_words).wrapping_add(k).lo();
        if use_carry {
            *dividend_carry_space = new_carry;
        } else {
            dividend.update_word(index + num_divisor_words, new_carry);
        }
    }

    quotient.update_word(index, qhat.lo());

    (quotient, dividend)
}

/// `a * b / denominator` with a 512-bit intermediate product.
///
/// Rounds toward zero, or up when `round_up` is set. Errs if the
/// quotient does not fit in 256 bits. Panics on a zero denominator.
pub fn try_mul_div(a: U256, b: U256, denominator: U256, round_up: bool) -> Result<U256, CoreError> {
    if a == U256::ZERO || b == U256::ZERO {
        return Ok(U256::ZERO);
    }

    let product = U512Muldiv::new(a).mul(U512Muldiv::new(b));
    let (quotient, remainder) = product.div(U512Muldiv::new(denominator), round_up);

    let mut result = quotient.try_into_u256()?;
    if round_up && !remainder.is_zero() {
        result = result.checked_add(U256::ONE).ok_or(ARITHMETIC_OVERFLOW)?;
    }

    Ok(result)
}
