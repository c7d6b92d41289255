//! Auction state as stored by the auction houses.

use {
    alloy::primitives::{Address, U256},
    derive_more::{Display, From, Into},
    number::Wad,
    serde::{Serialize, Serializer},
    std::str::FromStr,
};

/// Ledger time in seconds, as returned by `era()`.
pub type Timestamp = u64;

/// Key of an auction, issued by the house on `kick`. The first auction has
/// id 1 and the latest one has id `kicks()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct AuctionId(pub U256);

impl From<u64> for AuctionId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl FromStr for AuctionId {
    type Err = alloy::primitives::ruint::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_str(s).map(Self)
    }
}

impl Serialize for AuctionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Parameters of an auction house. They are set by governance and change
/// rarely enough to be treated as constant for the duration of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanismParameters {
    /// Minimum relative improvement of a bid (`beg`), e.g. `0.05` for 5%.
    pub beg: Wad,
    /// Seconds a bid stays unbeaten before the auction can be settled (`ttl`).
    pub ttl: u64,
    /// Maximum auction duration in seconds, counted from the kick (`tau`).
    pub tau: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRecord {
    pub id: AuctionId,
    pub bid: Wad,
    pub lot: Wad,
    /// `guy` on the contract. The participant entitled to the lot once the
    /// auction gets settled.
    pub high_bidder: Address,
    /// `tic` on the contract. Zero until the first bid is accepted.
    pub bid_deadline: Timestamp,
    /// `end` on the contract. Fixed when the auction gets kicked.
    pub hard_deadline: Timestamp,
}

/// Where an auction stands relative to the ledger time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum Lifecycle {
    /// Accepting bids. `bidded` is false while no bid has been placed since
    /// the kick.
    Active { bidded: bool },
    /// A deadline passed; the auction waits for `deal`.
    Expired,
    /// `deal` was executed and the house deleted the record.
    Settled,
}

/// The two phases of a collateral auction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Bidders compete on the amount paid for the full lot until the bid
    /// covers `tab`.
    RaiseBid,
    /// The bid is fixed at `tab`; bidders compete on accepting less lot.
    LowerLot,
}

impl Phase {
    pub fn of(record: &AuctionRecord, tab: Wad) -> Self {
        if record.bid < tab {
            Self::RaiseBid
        } else {
            Self::LowerLot
        }
    }
}

impl AuctionRecord {
    /// The record the house creates for an accepted `kick` at `now`.
    pub fn kicked(
        id: AuctionId,
        lot: Wad,
        bid: Wad,
        high_bidder: Address,
        now: Timestamp,
        parameters: &MechanismParameters,
    ) -> Self {
        Self {
            id,
            bid,
            lot,
            high_bidder,
            bid_deadline: 0,
            hard_deadline: now.saturating_add(parameters.tau),
        }
    }

    /// The record after the house accepted a bid of `bidder` at `now`.
    pub fn with_bid(
        &self,
        bidder: Address,
        lot: Wad,
        bid: Wad,
        now: Timestamp,
        parameters: &MechanismParameters,
    ) -> Self {
        Self {
            bid,
            lot,
            high_bidder: bidder,
            bid_deadline: now.saturating_add(parameters.ttl).min(self.hard_deadline),
            ..*self
        }
    }

    /// Settled auctions are deleted, so every field reads back as zero. A live
    /// auction always has a hard deadline.
    pub fn is_settled(&self) -> bool {
        self.hard_deadline == 0
    }

    pub fn has_bid(&self) -> bool {
        self.bid_deadline != 0
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        now < self.hard_deadline && (self.bid_deadline == 0 || now < self.bid_deadline)
    }

    /// Whether `deal` would be accepted at `now`.
    pub fn is_settleable(&self, now: Timestamp) -> bool {
        !self.is_settled() && !self.is_active(now)
    }

    pub fn lifecycle(&self, now: Timestamp) -> Lifecycle {
        if self.is_settled() {
            Lifecycle::Settled
        } else if self.is_active(now) {
            Lifecycle::Active {
                bidded: self.has_bid(),
            }
        } else {
            Lifecycle::Expired
        }
    }
}
