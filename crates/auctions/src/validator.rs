//! Checks a proposed transition against the rules the auction house
//! enforces, so doomed transactions are never submitted.
//!
//! All functions are pure. They must be given a freshly read record and
//! ledger time since the house decides based on its state at execution.

use {
    crate::{
        error::ValidationError,
        record::{AuctionRecord, MechanismParameters, Phase, Timestamp},
    },
    alloy::primitives::U256,
    number::{
        Wad,
        math::{self, Rounding},
    },
    std::cmp::Ordering,
};

/// Which bid transitions an auction house allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rules {
    /// Raise the bid until it covers `tab`, then lower the lot.
    Collateral { tab: Wad },
    /// Raise the bid for a fixed lot.
    Surplus,
    /// Lower the lot for a fixed bid.
    Debt,
}

impl Rules {
    fn raise_phase(self, record: &AuctionRecord) -> Result<(), ValidationError> {
        match self {
            Self::Surplus => Ok(()),
            Self::Debt => Err(ValidationError::WrongPhase(Phase::LowerLot)),
            Self::Collateral { tab } => match Phase::of(record, tab) {
                Phase::RaiseBid => Ok(()),
                phase => Err(ValidationError::WrongPhase(phase)),
            },
        }
    }

    fn lower_phase(self, record: &AuctionRecord) -> Result<(), ValidationError> {
        match self {
            Self::Debt => Ok(()),
            Self::Surplus => Err(ValidationError::WrongPhase(Phase::RaiseBid)),
            Self::Collateral { tab } => match Phase::of(record, tab) {
                Phase::LowerLot => Ok(()),
                phase => Err(ValidationError::WrongPhase(phase)),
            },
        }
    }
}

/// Smallest bid the house accepts as a raise over the current bid.
///
/// Returns `None` if the minimum does not fit into 256 bits.
pub fn min_next_bid(
    rules: Rules,
    record: &AuctionRecord,
    parameters: &MechanismParameters,
) -> Option<Wad> {
    let factor = Wad::ONE.checked_add(parameters.beg)?;
    let minimum = record.bid.checked_mul(factor, Rounding::Up)?;
    match rules {
        Rules::Collateral { tab } => Some(minimum.min(tab)),
        _ => Some(minimum),
    }
}

/// Largest lot the house accepts as a decrease of the current lot.
pub fn max_next_lot(record: &AuctionRecord, parameters: &MechanismParameters) -> Wad {
    let factor = Wad::ONE.saturating_sub(parameters.beg);
    // `factor <= ONE` so the product can not overflow
    record
        .lot
        .checked_mul(factor, Rounding::Down)
        .unwrap_or(Wad::ZERO)
}

/// Validates a `tend`: the same lot for a bid at least `beg` higher.
pub fn validate_raise_bid(
    rules: Rules,
    record: &AuctionRecord,
    parameters: &MechanismParameters,
    lot: Wad,
    bid: Wad,
    now: Timestamp,
) -> Result<(), ValidationError> {
    if !record.is_active(now) {
        return Err(ValidationError::AuctionNotActive);
    }
    rules.raise_phase(record)?;
    if lot != record.lot {
        return Err(ValidationError::LotMismatch {
            expected: record.lot,
            actual: lot,
        });
    }

    if let Rules::Collateral { tab } = rules {
        if bid > tab {
            return Err(ValidationError::BidAboveTarget { bid, tab });
        }
        // covering the target ends the raise phase even if the increase is
        // below `beg`
        if bid == tab && bid > record.bid {
            return Ok(());
        }
    }

    // bid * ONE >= current * (ONE + beg)
    let sufficient = Wad::ONE
        .raw()
        .checked_add(parameters.beg.raw())
        .is_some_and(|factor| {
            math::cmp_products(bid.raw(), Wad::ONE.raw(), record.bid.raw(), factor)
                != Ordering::Less
        });
    if !sufficient {
        return Err(ValidationError::BidTooLow {
            bid,
            minimum: min_next_bid(rules, record, parameters).unwrap_or(Wad::from_raw(U256::MAX)),
        });
    }
    Ok(())
}

/// Validates a `dent`: the same bid for a lot at least `beg` smaller.
pub fn validate_lower_lot(
    rules: Rules,
    record: &AuctionRecord,
    parameters: &MechanismParameters,
    lot: Wad,
    bid: Wad,
    now: Timestamp,
) -> Result<(), ValidationError> {
    if !record.is_active(now) {
        return Err(ValidationError::AuctionNotActive);
    }
    rules.lower_phase(record)?;
    if bid != record.bid {
        return Err(ValidationError::BidMismatch {
            expected: record.bid,
            actual: bid,
        });
    }

    // lot * ONE <= current * (ONE - beg)
    let factor = Wad::ONE.saturating_sub(parameters.beg);
    if math::cmp_products(lot.raw(), Wad::ONE.raw(), record.lot.raw(), factor.raw())
        == Ordering::Greater
    {
        return Err(ValidationError::LotNotLower {
            lot,
            maximum: max_next_lot(record, parameters),
        });
    }
    Ok(())
}

/// Validates a `deal`.
pub fn validate_settle(record: &AuctionRecord, now: Timestamp) -> Result<(), ValidationError> {
    if record.is_settled() {
        return Err(ValidationError::AlreadySettled);
    }
    if record.is_active(now) {
        return Err(ValidationError::AuctionStillActive);
    }
    Ok(())
}

/// Validates the initial quantities of a `kick`.
pub fn validate_kick(rules: Rules, lot: Wad, bid: Wad) -> Result<(), ValidationError> {
    if lot.is_zero() {
        return Err(ValidationError::InvalidParameters("lot must not be zero"));
    }
    if bid.is_zero() {
        return Err(ValidationError::InvalidParameters("bid must not be zero"));
    }
    if let Rules::Collateral { tab } = rules {
        if tab.is_zero() {
            return Err(ValidationError::InvalidParameters("tab must not be zero"));
        }
        if bid > tab {
            return Err(ValidationError::InvalidParameters("bid must not exceed tab"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::record::AuctionId,
        alloy::primitives::Address,
    };

    fn wad(s: &str) -> Wad {
        s.parse().unwrap()
    }

    fn parameters() -> MechanismParameters {
        MechanismParameters {
            beg: wad("0.05"),
            ttl: 300,
            tau: 3600,
        }
    }

    fn record(lot: &str, bid: &str) -> AuctionRecord {
        AuctionRecord::kicked(
            AuctionId::from(1),
            wad(lot),
            wad(bid),
            Address::ZERO,
            1000,
            &parameters(),
        )
    }

    #[test]
    fn raise_requires_minimum_increase() {
        let record = record("10", "100");
        let raise = |bid| {
            validate_raise_bid(Rules::Surplus, &record, &parameters(), wad("10"), wad(bid), 1100)
        };

        assert_eq!(
            raise("104"),
            Err(ValidationError::BidTooLow {
                bid: wad("104"),
                minimum: wad("105"),
            })
        );
        assert_eq!(
            raise("104.999999999999999999"),
            Err(ValidationError::BidTooLow {
                bid: wad("104.999999999999999999"),
                minimum: wad("105"),
            })
        );
        // the exact multiple is accepted
        assert_eq!(raise("105"), Ok(()));
        assert_eq!(raise("200"), Ok(()));
    }

    #[test]
    fn raise_keeps_the_lot() {
        let record = record("10", "100");
        assert_eq!(
            validate_raise_bid(Rules::Surplus, &record, &parameters(), wad("9"), wad("110"), 1100),
            Err(ValidationError::LotMismatch {
                expected: wad("10"),
                actual: wad("9"),
            })
        );
    }

    #[test]
    fn no_bids_after_expiry() {
        let record = record("10", "100");
        let err =
            validate_raise_bid(Rules::Surplus, &record, &parameters(), wad("10"), wad("110"), 4600)
                .unwrap_err();
        assert_eq!(err, ValidationError::AuctionNotActive);
        assert!(err.is_inactive());

        let bidded = record.with_bid(Address::ZERO, wad("10"), wad("105"), 1100, &parameters());
        assert_eq!(
            validate_lower_lot(Rules::Debt, &bidded, &parameters(), wad("9"), wad("105"), 1400),
            Err(ValidationError::AuctionNotActive)
        );
    }

    #[test]
    fn lower_requires_minimum_decrease() {
        let record = record("100", "10");
        let lower = |lot| {
            validate_lower_lot(Rules::Debt, &record, &parameters(), wad(lot), wad("10"), 1100)
        };

        assert_eq!(
            lower("95.000000000000000001"),
            Err(ValidationError::LotNotLower {
                lot: wad("95.000000000000000001"),
                maximum: wad("95"),
            })
        );
        assert_eq!(lower("95"), Ok(()));
        assert_eq!(lower("1"), Ok(()));
        assert_eq!(
            validate_lower_lot(Rules::Debt, &record, &parameters(), wad("90"), wad("11"), 1100),
            Err(ValidationError::BidMismatch {
                expected: wad("10"),
                actual: wad("11"),
            })
        );
    }

    #[test]
    fn directions_are_restricted_per_house() {
        let record = record("100", "10");
        let err =
            validate_lower_lot(Rules::Surplus, &record, &parameters(), wad("90"), wad("10"), 1100)
                .unwrap_err();
        assert!(matches!(err, ValidationError::WrongPhase(Phase::RaiseBid)));

        let err =
            validate_raise_bid(Rules::Debt, &record, &parameters(), wad("100"), wad("20"), 1100)
                .unwrap_err();
        assert!(matches!(err, ValidationError::WrongPhase(Phase::LowerLot)));
        assert!(err.is_inactive());
    }

    #[test]
    fn collateral_switches_phase_at_tab() {
        let rules = Rules::Collateral { tab: wad("150") };
        let record = record("10", "145");

        // reaching the target is allowed even though it is less than 5% more
        assert_eq!(
            validate_raise_bid(rules, &record, &parameters(), wad("10"), wad("150"), 1100),
            Ok(())
        );
        assert_eq!(
            validate_raise_bid(rules, &record, &parameters(), wad("10"), wad("151"), 1100),
            Err(ValidationError::BidAboveTarget {
                bid: wad("151"),
                tab: wad("150"),
            })
        );
        assert!(matches!(
            validate_lower_lot(rules, &record, &parameters(), wad("9"), wad("145"), 1100),
            Err(ValidationError::WrongPhase(Phase::RaiseBid))
        ));

        let covered = record.with_bid(Address::ZERO, wad("10"), wad("150"), 1100, &parameters());
        let err = validate_raise_bid(rules, &covered, &parameters(), wad("10"), wad("150"), 1200)
            .unwrap_err();
        assert_eq!(err, ValidationError::WrongPhase(Phase::LowerLot));
        assert!(err.is_inactive());
        assert_eq!(
            validate_lower_lot(rules, &covered, &parameters(), wad("9.5"), wad("150"), 1200),
            Ok(())
        );
    }

    #[test]
    fn bounds_helpers_return_valid_proposals() {
        let record = record("10", "100");
        assert_eq!(min_next_bid(Rules::Surplus, &record, &parameters()), Some(wad("105")));
        assert_eq!(
            min_next_bid(Rules::Collateral { tab: wad("103") }, &record, &parameters()),
            Some(wad("103"))
        );
        assert_eq!(max_next_lot(&record, &parameters()), wad("9.5"));

        let odd = AuctionRecord {
            bid: Wad::from_raw(U256::from(7)),
            lot: Wad::from_raw(U256::from(7)),
            ..record
        };
        // rounding goes in the direction the house requires
        let bid = min_next_bid(Rules::Surplus, &odd, &parameters()).unwrap();
        assert_eq!(bid, Wad::from_raw(U256::from(8)));
        assert_eq!(
            validate_raise_bid(Rules::Surplus, &odd, &parameters(), odd.lot, bid, 1100),
            Ok(())
        );
        let lot = max_next_lot(&odd, &parameters());
        assert_eq!(lot, Wad::from_raw(U256::from(6)));
        assert_eq!(
            validate_lower_lot(Rules::Debt, &odd, &parameters(), lot, odd.bid, 1100),
            Ok(())
        );
    }

    #[test]
    fn settle_only_after_expiry() {
        let record = record("10", "100");
        assert_eq!(validate_settle(&record, 4599), Err(ValidationError::AuctionStillActive));
        assert_eq!(validate_settle(&record, 4600), Ok(()));

        let bidded = record.with_bid(Address::ZERO, wad("10"), wad("105"), 1100, &parameters());
        assert_eq!(validate_settle(&bidded, 1399), Err(ValidationError::AuctionStillActive));
        assert_eq!(validate_settle(&bidded, 1400), Ok(()));

        let deleted = AuctionRecord {
            bid: Wad::ZERO,
            lot: Wad::ZERO,
            high_bidder: Address::ZERO,
            bid_deadline: 0,
            hard_deadline: 0,
            ..record
        };
        assert_eq!(validate_settle(&deleted, 5000), Err(ValidationError::AlreadySettled));
    }

    #[test]
    fn kick_rejects_empty_auctions() {
        assert_eq!(validate_kick(Rules::Surplus, wad("10"), wad("1")), Ok(()));
        assert!(matches!(
            validate_kick(Rules::Surplus, Wad::ZERO, wad("1")),
            Err(ValidationError::InvalidParameters(_))
        ));
        assert!(matches!(
            validate_kick(Rules::Debt, wad("10"), Wad::ZERO),
            Err(ValidationError::InvalidParameters(_))
        ));
        assert!(matches!(
            validate_kick(Rules::Collateral { tab: Wad::ZERO }, wad("10"), wad("1")),
            Err(ValidationError::InvalidParameters(_))
        ));
        assert!(matches!(
            validate_kick(Rules::Collateral { tab: wad("5") }, wad("10"), wad("6")),
            Err(ValidationError::InvalidParameters(_))
        ));
    }
}
