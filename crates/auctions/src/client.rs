//! Clients for the three auction houses.
//!
//! Every mutating operation re-reads the auction, the house parameters and
//! the ledger time at a single height, validates the proposal against them
//! and returns the call as a [`PendingTransaction`]. Nothing is submitted.

use {
    crate::{
        approval::TokenApproval,
        error::{DecodeError, Error, ReadError},
        reader::{AuctionReading, OnchainReader, Token},
        record::{AuctionId, AuctionRecord, MechanismParameters, Phase, Timestamp},
        transaction::{AuctionCall, PendingTransaction},
        validator::{self, Rules},
    },
    alloy::primitives::Address,
    futures::{StreamExt, TryStreamExt, future, stream},
    number::Wad,
    std::ops::Deref,
};

/// Upper bound of concurrent `bids` reads when scanning all auctions.
const MAX_CONCURRENT_READS: usize = 10;

/// Functionality shared by all auction houses.
#[derive(Debug)]
pub struct AuctionClient<R> {
    reader: R,
}

impl<R: AuctionReading> AuctionClient<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn address(&self) -> Address {
        self.reader.address()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub async fn parameters(&self) -> Result<MechanismParameters, ReadError> {
        self.reader.parameters().await
    }

    pub async fn auction_count(&self) -> Result<AuctionId, ReadError> {
        self.reader.auction_count().await
    }

    pub async fn record(&self, id: AuctionId) -> Result<AuctionRecord, ReadError> {
        self.reader.record(id).await
    }

    pub async fn current_time(&self) -> Result<Timestamp, ReadError> {
        self.reader.current_time().await
    }

    /// All auctions that still accept bids, ordered by id.
    #[tracing::instrument(skip(self), fields(house = %self.address()))]
    pub async fn active_auctions(&self) -> Result<Vec<AuctionRecord>, ReadError> {
        let (count, now) =
            futures::try_join!(self.reader.auction_count(), self.reader.current_time())?;
        let count = u64::try_from(count.0).map_err(|_| DecodeError::OutOfRange {
            field: "kicks",
            value: count.0,
        })?;

        let mut active: Vec<AuctionRecord> = stream::iter(1..=count)
            .map(|id| self.reader.record(AuctionId::from(id)))
            .buffer_unordered(MAX_CONCURRENT_READS)
            .try_filter(|record| future::ready(record.is_active(now)))
            .try_collect()
            .await?;
        active.sort_by_key(|record| record.id);
        tracing::debug!(total = count, active = active.len(), "scanned auctions");
        Ok(active)
    }

    /// Prepares `deal` for an auction whose deadline passed.
    #[tracing::instrument(skip(self), fields(house = %self.address()))]
    pub async fn settle(&self, id: AuctionId) -> Result<PendingTransaction, Error> {
        let snapshot = self.reader.snapshot(id).await?;
        validator::validate_settle(&snapshot.record, snapshot.now)?;
        Ok(self.pending(AuctionCall::Deal { id }))
    }

    async fn raise_bid(
        &self,
        rules: Rules,
        id: AuctionId,
        lot: Wad,
        bid: Wad,
    ) -> Result<PendingTransaction, Error> {
        let snapshot = self.reader.snapshot(id).await?;
        validator::validate_raise_bid(
            rules,
            &snapshot.record,
            &snapshot.parameters,
            lot,
            bid,
            snapshot.now,
        )
        .inspect_err(|err| {
            tracing::debug!(?err, current = %snapshot.record.bid, "rejected bid");
        })?;
        Ok(self.pending(AuctionCall::Tend { id, lot, bid }))
    }

    async fn lower_lot(
        &self,
        rules: Rules,
        id: AuctionId,
        lot: Wad,
        bid: Wad,
    ) -> Result<PendingTransaction, Error> {
        let snapshot = self.reader.snapshot(id).await?;
        validator::validate_lower_lot(
            rules,
            &snapshot.record,
            &snapshot.parameters,
            lot,
            bid,
            snapshot.now,
        )
        .inspect_err(|err| {
            tracing::debug!(?err, current = %snapshot.record.lot, "rejected lot");
        })?;
        Ok(self.pending(AuctionCall::Dent { id, lot, bid }))
    }

    async fn approve(&self, token: Token, approval: &dyn TokenApproval) -> Result<(), Error> {
        let token = self.reader.token(token).await?;
        approval
            .approve(token, self.address())
            .await
            .map_err(Error::Approval)
    }

    fn pending(&self, call: AuctionCall) -> PendingTransaction {
        let transaction = PendingTransaction {
            to: self.address(),
            call,
        };
        tracing::debug!(?transaction, "prepared transaction");
        transaction
    }
}

/// Client for the collateral auction house (`Flipper`).
///
/// The house does not expose `tab`, so it has to be passed to every bid.
#[derive(Debug)]
pub struct CollateralAuctionClient<R = OnchainReader>(AuctionClient<R>);

impl<R: AuctionReading> CollateralAuctionClient<R> {
    pub fn new(reader: R) -> Self {
        Self(AuctionClient::new(reader))
    }

    /// Prepares a `kick` auctioning `lot` until bids cover `tab`. Whatever
    /// lot is left when the auction settles goes back to `forced_bidder`.
    pub fn kick(
        &self,
        forced_bidder: Address,
        beneficiary: Address,
        tab: Wad,
        lot: Wad,
        bid: Wad,
    ) -> Result<PendingTransaction, Error> {
        validator::validate_kick(Rules::Collateral { tab }, lot, bid)?;
        Ok(self.pending(AuctionCall::KickCollateral {
            forced_bidder,
            beneficiary,
            tab,
            lot,
            bid,
        }))
    }

    /// Prepares a `tend`. Only legal while the bid is below `tab`.
    pub async fn raise_bid(
        &self,
        id: AuctionId,
        lot: Wad,
        bid: Wad,
        tab: Wad,
    ) -> Result<PendingTransaction, Error> {
        self.0.raise_bid(Rules::Collateral { tab }, id, lot, bid).await
    }

    /// Prepares a `dent`. Only legal once the bid reached `tab`.
    pub async fn lower_lot(
        &self,
        id: AuctionId,
        lot: Wad,
        bid: Wad,
        tab: Wad,
    ) -> Result<PendingTransaction, Error> {
        self.0.lower_lot(Rules::Collateral { tab }, id, lot, bid).await
    }

    pub async fn phase(&self, id: AuctionId, tab: Wad) -> Result<Phase, ReadError> {
        let record = self.record(id).await?;
        Ok(Phase::of(&record, tab))
    }
}

impl<R> Deref for CollateralAuctionClient<R> {
    type Target = AuctionClient<R>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Client for the surplus auction house (`Flapper`): a fixed lot of `pie`
/// sold for increasing bids of `gem`.
#[derive(Debug)]
pub struct SurplusAuctionClient<R = OnchainReader>(AuctionClient<R>);

impl<R: AuctionReading> SurplusAuctionClient<R> {
    pub fn new(reader: R) -> Self {
        Self(AuctionClient::new(reader))
    }

    pub fn kick(
        &self,
        beneficiary: Address,
        lot: Wad,
        bid: Wad,
    ) -> Result<PendingTransaction, Error> {
        validator::validate_kick(Rules::Surplus, lot, bid)?;
        Ok(self.pending(AuctionCall::KickSurplus {
            beneficiary,
            lot,
            bid,
        }))
    }

    pub async fn raise_bid(
        &self,
        id: AuctionId,
        lot: Wad,
        bid: Wad,
    ) -> Result<PendingTransaction, Error> {
        self.0.raise_bid(Rules::Surplus, id, lot, bid).await
    }

    /// Approves `gem`, the token bids are paid in, for this house.
    pub async fn approve(&self, approval: &dyn TokenApproval) -> Result<(), Error> {
        self.0.approve(Token::Gem, approval).await
    }
}

impl<R> Deref for SurplusAuctionClient<R> {
    type Target = AuctionClient<R>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Client for the debt auction house (`Flopper`): decreasing lots of `gem`
/// sold for a fixed bid of `pie`.
#[derive(Debug)]
pub struct DebtAuctionClient<R = OnchainReader>(AuctionClient<R>);

impl<R: AuctionReading> DebtAuctionClient<R> {
    pub fn new(reader: R) -> Self {
        Self(AuctionClient::new(reader))
    }

    /// Prepares a `kick` minting at most `initial_lot` for `fixed_bid`. The
    /// arguments follow the contract order: lot first, then bid.
    pub fn kick(
        &self,
        beneficiary: Address,
        initial_lot: Wad,
        fixed_bid: Wad,
    ) -> Result<PendingTransaction, Error> {
        validator::validate_kick(Rules::Debt, initial_lot, fixed_bid)?;
        Ok(self.pending(AuctionCall::KickDebt {
            beneficiary,
            lot: initial_lot,
            bid: fixed_bid,
        }))
    }

    pub async fn lower_lot(
        &self,
        id: AuctionId,
        lot: Wad,
        bid: Wad,
    ) -> Result<PendingTransaction, Error> {
        self.0.lower_lot(Rules::Debt, id, lot, bid).await
    }

    /// Approves `pie`, the token bids are paid in, for this house.
    pub async fn approve(&self, approval: &dyn TokenApproval) -> Result<(), Error> {
        self.0.approve(Token::Pie, approval).await
    }
}

impl<R> Deref for DebtAuctionClient<R> {
    type Target = AuctionClient<R>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            approval::MockTokenApproval,
            error::ValidationError,
            reader::{MockAuctionReading, Snapshot},
        },
        mockall::predicate::eq,
    };

    const HOUSE: Address = Address::repeat_byte(0xaa);
    const BIDDER: Address = Address::repeat_byte(0x11);

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

    fn record(id: u64, lot: &str, bid: &str) -> AuctionRecord {
        AuctionRecord::kicked(
            AuctionId::from(id),
            wad(lot),
            wad(bid),
            Address::ZERO,
            1000,
            &parameters(),
        )
    }

    /// Reader serving `record` at ledger time `now`.
    fn reader(record: AuctionRecord, now: Timestamp) -> MockAuctionReading {
        let mut reader = MockAuctionReading::new();
        reader.expect_address().return_const(HOUSE);
        reader
            .expect_record()
            .with(eq(record.id))
            .returning(move |_| Ok(record));
        reader
            .expect_snapshot()
            .with(eq(record.id))
            .returning(move |_| {
                Ok(Snapshot {
                    record,
                    parameters: parameters(),
                    now,
                })
            });
        reader
    }

    #[tokio::test]
    async fn raise_bid_validates_the_latest_state() {
        let client = SurplusAuctionClient::new(reader(record(1, "10", "100"), 1100));

        let err = client
            .raise_bid(AuctionId::from(1), wad("10"), wad("104"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::BidTooLow { .. })
        ));

        let transaction = client
            .raise_bid(AuctionId::from(1), wad("10"), wad("105"))
            .await
            .unwrap();
        assert_eq!(
            transaction,
            PendingTransaction {
                to: HOUSE,
                call: AuctionCall::Tend {
                    id: AuctionId::from(1),
                    lot: wad("10"),
                    bid: wad("105"),
                },
            }
        );
    }

    #[tokio::test]
    async fn read_errors_abort_the_operation() {
        let mut reader = MockAuctionReading::new();
        reader.expect_address().return_const(HOUSE);
        reader
            .expect_snapshot()
            .returning(|_| Err(ReadError::Unavailable(anyhow::anyhow!("timeout"))));
        let client = DebtAuctionClient::new(reader);

        let err = client
            .lower_lot(AuctionId::from(9), wad("1"), wad("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Read(_)));
    }

    #[tokio::test]
    async fn collateral_bids_follow_the_phase() {
        let tab = wad("150");
        let covered =
            record(2, "10", "100").with_bid(BIDDER, wad("10"), tab, 1100, &parameters());
        let client = CollateralAuctionClient::new(reader(covered, 1200));

        assert_eq!(client.phase(AuctionId::from(2), tab).await.unwrap(), Phase::LowerLot);
        let err = client
            .raise_bid(AuctionId::from(2), wad("10"), tab, tab)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ref err) if err.is_inactive()
        ));

        let transaction = client
            .lower_lot(AuctionId::from(2), wad("9.5"), tab, tab)
            .await
            .unwrap();
        assert_eq!(transaction.function_name(), "dent");
    }

    #[tokio::test]
    async fn settle_waits_for_expiry() {
        let client = SurplusAuctionClient::new(reader(record(3, "10", "100"), 4599));
        assert!(matches!(
            client.settle(AuctionId::from(3)).await,
            Err(Error::Validation(ValidationError::AuctionStillActive))
        ));

        let client = SurplusAuctionClient::new(reader(record(3, "10", "100"), 4600));
        let transaction = client.settle(AuctionId::from(3)).await.unwrap();
        assert_eq!(
            transaction.call,
            AuctionCall::Deal {
                id: AuctionId::from(3)
            }
        );
    }

    #[tokio::test]
    async fn kick_needs_no_reads() {
        let mut reader = MockAuctionReading::new();
        reader.expect_address().return_const(HOUSE);
        let client = DebtAuctionClient::new(reader);

        let transaction = client.kick(BIDDER, wad("1000"), wad("50")).unwrap();
        assert_eq!(
            transaction.call,
            AuctionCall::KickDebt {
                beneficiary: BIDDER,
                lot: wad("1000"),
                bid: wad("50"),
            }
        );
        assert!(matches!(
            client.kick(BIDDER, Wad::ZERO, wad("50")),
            Err(Error::Validation(ValidationError::InvalidParameters(_)))
        ));
    }

    #[tokio::test]
    async fn active_auctions_skips_expired_and_settled() {
        let bidded =
            record(2, "10", "100").with_bid(BIDDER, wad("10"), wad("105"), 1100, &parameters());
        let settled = AuctionRecord {
            id: AuctionId::from(3),
            bid: Wad::ZERO,
            lot: Wad::ZERO,
            high_bidder: Address::ZERO,
            bid_deadline: 0,
            hard_deadline: 0,
        };
        let records = [record(1, "10", "100"), bidded, settled, record(4, "5", "50")];

        let mut reader = MockAuctionReading::new();
        reader.expect_address().return_const(HOUSE);
        reader
            .expect_auction_count()
            .returning(|| Ok(AuctionId::from(4)));
        reader.expect_current_time().returning(|| Ok(1500));
        reader.expect_record().times(4).returning(move |id| {
            records
                .iter()
                .find(|record| record.id == id)
                .copied()
                .ok_or(ReadError::NotFound(id))
        });
        let client = SurplusAuctionClient::new(reader);

        let active = client.active_auctions().await.unwrap();
        let ids: Vec<_> = active.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![AuctionId::from(1), AuctionId::from(4)]);
    }

    #[tokio::test]
    async fn approves_the_bid_token_for_the_house() {
        let gem = Address::repeat_byte(0x22);
        let pie = Address::repeat_byte(0x33);
        let mut reader = MockAuctionReading::new();
        reader.expect_address().return_const(HOUSE);
        reader
            .expect_token()
            .returning(move |token| Ok(match token {
                Token::Gem => gem,
                Token::Pie => pie,
            }));
        let mut approval = MockTokenApproval::new();
        approval
            .expect_approve()
            .with(eq(gem), eq(HOUSE))
            .times(1)
            .returning(|_, _| Ok(()));
        approval
            .expect_approve()
            .with(eq(pie), eq(HOUSE))
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("insufficient funds")));

        let surplus = SurplusAuctionClient::new(reader);
        surplus.approve(&approval).await.unwrap();

        let debt = DebtAuctionClient::new(surplus.0.reader);
        assert!(matches!(
            debt.approve(&approval).await,
            Err(Error::Approval(_))
        ));
    }
}
