//! Read access to an auction house.

use {
    crate::{
        error::{DecodeError, ReadError},
        record::{AuctionId, AuctionRecord, MechanismParameters, Timestamp},
    },
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, aliases::U48},
        providers::Provider,
        rpc::types::TransactionRequest,
        sol_types::{SolCall, SolType},
        transports::TransportError,
    },
    contracts::alloy::{AuctionHouse, Flapper},
    ethrpc::{AlloyProvider, alloy::errors::TransportErrorExt},
    number::Wad,
    std::time::Duration,
};

/// The two tokens a surplus or debt auction house trades.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// The token the surplus house sells and the debt house is paid in.
    Pie,
    /// The token the surplus house is paid in and the debt house sells.
    Gem,
}

/// An auction together with the house parameters and the ledger time it
/// has to be validated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub record: AuctionRecord,
    pub parameters: MechanismParameters,
    pub now: Timestamp,
}

/// Queries the state of a single auction house. Nothing is cached, every
/// call reflects the latest ledger state.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuctionReading: Send + Sync {
    /// Address of the auction house.
    fn address(&self) -> Address;

    async fn parameters(&self) -> Result<MechanismParameters, ReadError>;

    /// Id of the most recently kicked auction, which is also the number of
    /// auctions kicked so far.
    async fn auction_count(&self) -> Result<AuctionId, ReadError>;

    /// Fails with [`ReadError::NotFound`] for ids the house never issued.
    async fn record(&self, id: AuctionId) -> Result<AuctionRecord, ReadError>;

    /// The ledger's notion of now, which all deadlines are compared against.
    async fn current_time(&self) -> Result<Timestamp, ReadError>;

    /// Address of one of the tokens traded by a surplus or debt house.
    async fn token(&self, token: Token) -> Result<Address, ReadError>;

    /// Reads the auction, the parameters and the time at the same height.
    async fn snapshot(&self, id: AuctionId) -> Result<Snapshot, ReadError> {
        let (record, parameters, now) =
            futures::try_join!(self.record(id), self.parameters(), self.current_time())?;
        Ok(Snapshot {
            record,
            parameters,
            now,
        })
    }
}

/// [`AuctionReading`] backed by `eth_call`s against a node.
#[derive(Clone, Debug)]
pub struct OnchainReader {
    provider: AlloyProvider,
    address: Address,
    timeout: Duration,
}

impl OnchainReader {
    pub fn new(provider: AlloyProvider, address: Address, timeout: Duration) -> Self {
        Self {
            provider,
            address,
            timeout,
        }
    }

    /// Awaits a request to the node for at most the configured timeout.
    async fn timed<F: IntoFuture>(
        &self,
        request: &'static str,
        future: F,
    ) -> Result<F::Output, ReadError> {
        let timeout = self.timeout;
        tokio::time::timeout(timeout, future).await.map_err(|_| {
            ReadError::Unavailable(anyhow::anyhow!("{request} timed out after {timeout:?}"))
        })
    }

    async fn block_number(&self) -> Result<u64, ReadError> {
        self.timed("eth_blockNumber", self.provider.get_block_number())
            .await?
            .map_err(|err| {
                ReadError::Unavailable(anyhow::Error::new(err).context("eth_blockNumber"))
            })
    }

    /// Executes a view call at `block`, or the latest block if `None`, and
    /// decodes its fixed size result. Reverts are decoding errors since a
    /// view function that exists never reverts.
    async fn call<C: SolCall + 'static>(
        &self,
        call: C,
        block: Option<u64>,
    ) -> Result<C::Return, ReadError> {
        let request = TransactionRequest::default()
            .with_to(self.address)
            .with_input(call.abi_encode());
        let mut eth_call = self.provider.call(request);
        if let Some(block) = block {
            eth_call = eth_call.block(block.into());
        }
        let data = self
            .timed(C::SIGNATURE, eth_call)
            .await?
            .map_err(|err| classify(C::SIGNATURE, err))?;

        if let Some(expected) = <C::ReturnTuple<'static> as SolType>::ENCODED_SIZE
            && data.len() != expected
        {
            return Err(DecodeError::Length {
                call: C::SIGNATURE,
                expected,
                actual: data.len(),
            }
            .into());
        }
        C::abi_decode_returns_validate(&data).map_err(|source| {
            DecodeError::Malformed {
                call: C::SIGNATURE,
                source,
            }
            .into()
        })
    }
}

fn classify(call: &'static str, err: TransportError) -> ReadError {
    if err.is_node_error() {
        ReadError::Unavailable(anyhow::Error::new(err).context(call))
    } else {
        DecodeError::Reverted { call }.into()
    }
}

/// Validated decoding guarantees `uint48` values fit in 48 bits.
fn seconds(value: U48) -> Timestamp {
    value.to()
}

impl OnchainReader {
    async fn parameters_at(&self, block: Option<u64>) -> Result<MechanismParameters, ReadError> {
        let (beg, ttl, tau) = futures::try_join!(
            self.call(AuctionHouse::begCall {}, block),
            self.call(AuctionHouse::ttlCall {}, block),
            self.call(AuctionHouse::tauCall {}, block),
        )?;
        Ok(MechanismParameters {
            beg: Wad::from_raw(beg),
            ttl: seconds(ttl),
            tau: seconds(tau),
        })
    }

    async fn record_at(
        &self,
        id: AuctionId,
        block: Option<u64>,
    ) -> Result<AuctionRecord, ReadError> {
        if id.0.is_zero() || id.0 > self.call(AuctionHouse::kicksCall {}, block).await? {
            return Err(ReadError::NotFound(id));
        }
        let bids = self.call(AuctionHouse::bidsCall { id: id.0 }, block).await?;
        Ok(AuctionRecord {
            id,
            bid: Wad::from_raw(bids.bid),
            lot: Wad::from_raw(bids.lot),
            high_bidder: bids.guy,
            bid_deadline: seconds(bids.tic),
            hard_deadline: seconds(bids.end),
        })
    }

    async fn current_time_at(&self, block: Option<u64>) -> Result<Timestamp, ReadError> {
        self.call(AuctionHouse::eraCall {}, block).await.map(seconds)
    }
}

#[async_trait::async_trait]
impl AuctionReading for OnchainReader {
    fn address(&self) -> Address {
        self.address
    }

    #[tracing::instrument(skip(self), fields(house = %self.address))]
    async fn parameters(&self) -> Result<MechanismParameters, ReadError> {
        self.parameters_at(None).await
    }

    async fn auction_count(&self) -> Result<AuctionId, ReadError> {
        self.call(AuctionHouse::kicksCall {}, None).await.map(AuctionId)
    }

    #[tracing::instrument(skip(self), fields(house = %self.address))]
    async fn record(&self, id: AuctionId) -> Result<AuctionRecord, ReadError> {
        self.record_at(id, None).await
    }

    async fn current_time(&self) -> Result<Timestamp, ReadError> {
        self.current_time_at(None).await
    }

    async fn token(&self, token: Token) -> Result<Address, ReadError> {
        // `Flopper` exposes the same getters as `Flapper`
        match token {
            Token::Pie => self.call(Flapper::pieCall {}, None).await,
            Token::Gem => self.call(Flapper::gemCall {}, None).await,
        }
    }

    /// Pins every read to the block that is latest when the snapshot starts.
    #[tracing::instrument(skip(self), fields(house = %self.address))]
    async fn snapshot(&self, id: AuctionId) -> Result<Snapshot, ReadError> {
        let block = Some(self.block_number().await?);
        let record = self.record_at(id, block).await?;
        let (parameters, now) =
            futures::try_join!(self.parameters_at(block), self.current_time_at(block))?;
        tracing::trace!(?block, "read snapshot");
        Ok(Snapshot {
            record,
            parameters,
            now,
        })
    }
}
