use {
    crate::record::{AuctionId, Phase},
    alloy::primitives::U256,
    number::Wad,
    thiserror::Error,
};

/// Failure to read auction state from the ledger.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("auction {0} does not exist")]
    NotFound(AuctionId),
    /// The node could not be reached, answered with an error or did not
    /// answer in time. Retrying later may succeed.
    #[error("ledger unavailable")]
    Unavailable(#[source] anyhow::Error),
    /// The contract answered with something that is not the expected shape.
    /// Retrying will not help.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{call} returned {actual} bytes but {expected} were expected")]
    Length {
        call: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{call} reverted, the target is probably not an auction house")]
    Reverted { call: &'static str },
    #[error("{call} returned malformed data")]
    Malformed {
        call: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: U256 },
}

/// A proposed transition that the auction house would reject.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("auction is not accepting bids")]
    AuctionNotActive,
    #[error("auction can not be settled before it expires")]
    AuctionStillActive,
    #[error("auction was already settled")]
    AlreadySettled,
    #[error("transition is not allowed while the auction is in the {0:?} phase")]
    WrongPhase(Phase),
    #[error("bid {bid} is below the minimum of {minimum}")]
    BidTooLow { bid: Wad, minimum: Wad },
    #[error("bid {bid} exceeds the auction target {tab}")]
    BidAboveTarget { bid: Wad, tab: Wad },
    #[error("lot {lot} is above the maximum of {maximum}")]
    LotNotLower { lot: Wad, maximum: Wad },
    #[error("lot {actual} differs from the auctioned lot {expected}")]
    LotMismatch { expected: Wad, actual: Wad },
    #[error("bid {actual} differs from the fixed bid {expected}")]
    BidMismatch { expected: Wad, actual: Wad },
    #[error("invalid auction parameters: {0}")]
    InvalidParameters(&'static str),
}

impl ValidationError {
    /// Errors that mean the auction does not accept this kind of bid at all,
    /// no matter the amounts.
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::AuctionNotActive | Self::WrongPhase(_))
    }
}

/// Error of an auction client operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("token approval failed")]
    Approval(#[source] anyhow::Error),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::Read(err.into())
    }
}
