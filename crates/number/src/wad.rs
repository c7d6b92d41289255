use {
    crate::math::{self, Rounding},
    alloy::primitives::{
        U256,
        utils::{ParseUnits, format_units, parse_units},
    },
    derive_more::{From, Into},
    std::{fmt, str::FromStr},
    thiserror::Error,
};

/// A non-negative fixed-point quantity with 18 decimals, stored as the raw
/// `uint256` the auction contracts use for bids, lots and `beg`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
pub struct Wad(U256);

impl Wad {
    pub const DECIMALS: u8 = 18;
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]));

    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Returns `value` whole units, i.e. `value * 10^18` raw.
    pub fn from_integer(value: u64) -> Self {
        Self(U256::from(value) * Self::ONE.0)
    }

    pub const fn raw(self) -> U256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Fixed-point multiplication `self * factor`.
    pub fn checked_mul(self, factor: Self, rounding: Rounding) -> Option<Self> {
        math::mul_div(self.0, factor.0, Self::ONE.0, rounding).map(Self)
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = format_units(self.0, Self::DECIMALS).map_err(|_| fmt::Error)?;
        // `format_units` always prints all 18 decimals
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        f.write_str(trimmed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0:?} is not a decimal number with at most 18 decimals")]
    Malformed(String),
    #[error("{0:?} is negative")]
    Negative(String),
}

impl FromStr for Wad {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // `parse_units` silently drops excess decimals
        let decimals = s.split_once('.').map_or(0, |(_, fraction)| fraction.len());
        if decimals > usize::from(Self::DECIMALS) {
            return Err(ParseError::Malformed(s.to_string()));
        }
        match parse_units(s, Self::DECIMALS) {
            Ok(ParseUnits::U256(value)) => Ok(Self(value)),
            Ok(ParseUnits::I256(_)) => Err(ParseError::Negative(s.to_string())),
            Err(_) => Err(ParseError::Malformed(s.to_string())),
        }
    }
}
