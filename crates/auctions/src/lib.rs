//! Client for the collateral (`Flipper`), surplus (`Flapper`) and debt
//! (`Flopper`) auction houses.
//!
//! Auction state is read from the ledger through an [`AuctionReading`]
//! implementation. The clients validate bids against the latest state and
//! return [`PendingTransaction`]s for an external submitter to sign and send.

pub mod approval;
pub mod arguments;
pub mod client;
pub mod config;
pub mod error;
pub mod reader;
pub mod record;
pub mod transaction;
pub mod validator;

pub use {
    approval::TokenApproval,
    client::{AuctionClient, CollateralAuctionClient, DebtAuctionClient, SurplusAuctionClient},
    error::{DecodeError, Error, ReadError, ValidationError},
    reader::{AuctionReading, OnchainReader, Snapshot, Token},
    record::{AuctionId, AuctionRecord, Lifecycle, MechanismParameters, Phase, Timestamp},
    transaction::{AuctionCall, PendingTransaction},
};
use {
    anyhow::{Context, Result},
    arguments::{Arguments, Command},
    config::Kind,
    serde_json::{Value, json},
};

pub async fn main(args: Arguments) -> Result<()> {
    let config = config::load(&args.config).await?;
    let house = config.find(&args.auction)?;
    let provider = ethrpc::alloy::provider(&args.node_url, &house.name);
    let reader = OnchainReader::new(provider, house.address, args.rpc_timeout);

    tracing::debug!(
        name = %house.name,
        kind = ?house.kind,
        address = %house.address,
        "using auction house"
    );
    let output = execute(house.kind, reader, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute<R: AuctionReading>(kind: Kind, reader: R, command: Command) -> Result<Value> {
    let output = match command {
        Command::Parameters => {
            serde_json::to_value(AuctionClient::new(reader).parameters().await?)?
        }
        Command::Show { id, tab } => {
            let Snapshot { record, now, .. } = reader.snapshot(id).await?;
            json!({
                "record": record,
                "now": now,
                "lifecycle": record.lifecycle(now),
                "phase": tab.map(|tab| Phase::of(&record, tab)),
            })
        }
        Command::Active => {
            serde_json::to_value(AuctionClient::new(reader).active_auctions().await?)?
        }
        Command::Kick {
            beneficiary,
            lot,
            bid,
            tab,
            forced_bidder,
        } => {
            let transaction = match kind {
                Kind::Collateral => CollateralAuctionClient::new(reader).kick(
                    forced_bidder.context("--forced-bidder is required for collateral auctions")?,
                    beneficiary,
                    tab.context("--tab is required for collateral auctions")?,
                    lot,
                    bid,
                )?,
                Kind::Surplus => SurplusAuctionClient::new(reader).kick(beneficiary, lot, bid)?,
                Kind::Debt => DebtAuctionClient::new(reader).kick(beneficiary, lot, bid)?,
            };
            serde_json::to_value(transaction)?
        }
        Command::RaiseBid { id, lot, bid, tab } => {
            let transaction = match kind {
                Kind::Collateral => {
                    let tab = tab.context("--tab is required for collateral auctions")?;
                    CollateralAuctionClient::new(reader)
                        .raise_bid(id, lot, bid, tab)
                        .await?
                }
                Kind::Surplus => SurplusAuctionClient::new(reader).raise_bid(id, lot, bid).await?,
                Kind::Debt => anyhow::bail!("debt auctions only accept lower lot bids"),
            };
            serde_json::to_value(transaction)?
        }
        Command::LowerLot { id, lot, bid, tab } => {
            let transaction = match kind {
                Kind::Collateral => {
                    let tab = tab.context("--tab is required for collateral auctions")?;
                    CollateralAuctionClient::new(reader)
                        .lower_lot(id, lot, bid, tab)
                        .await?
                }
                Kind::Debt => DebtAuctionClient::new(reader).lower_lot(id, lot, bid).await?,
                Kind::Surplus => anyhow::bail!("surplus auctions only accept raised bids"),
            };
            serde_json::to_value(transaction)?
        }
        Command::Settle { id } => {
            serde_json::to_value(AuctionClient::new(reader).settle(id).await?)?
        }
    };
    Ok(output)
}
