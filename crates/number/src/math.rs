use alloy::primitives::{U256, U512};

/// Direction in which an inexact division result is rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// Computes `x * y / denominator` with a 512-bit intermediate product.
///
/// Returns `None` if `denominator` is `0` or if the result does not fit into
/// 256 bits.
pub fn mul_div(x: U256, y: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }

    let (quotient, remainder) = (U512::from(x) * U512::from(y)).div_rem(U512::from(denominator));
    let quotient = narrow(quotient)?;
    match rounding {
        Rounding::Up if !remainder.is_zero() => quotient.checked_add(U256::from(1)),
        _ => Some(quotient),
    }
}

/// Compares `a * b` with `c * d` without overflowing.
pub fn cmp_products(a: U256, b: U256, c: U256, d: U256) -> std::cmp::Ordering {
    (U512::from(a) * U512::from(b)).cmp(&(U512::from(c) * U512::from(d)))
}

fn narrow(value: U512) -> Option<U256> {
    let limbs = value.into_limbs();
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256::from_limbs_slice(&limbs[..4]))
}
