use {
    crate::record::AuctionId,
    alloy::primitives::Address,
    number::Wad,
    std::{path::PathBuf, time::Duration},
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(long, env, default_value = "warn,auctions=debug,ethrpc=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Emit logs as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Timeout for every read from the node.
    #[clap(long, env, default_value = "10s", value_parser = humantime::parse_duration)]
    pub rpc_timeout: Duration,

    /// Path to the TOML file listing the auction houses.
    #[clap(long, env, default_value = "auctions.toml")]
    pub config: PathBuf,

    /// Name of the configured auction house to operate on.
    #[clap(long, env)]
    pub auction: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print `beg`, `ttl` and `tau` of the auction house.
    Parameters,
    /// Print an auction and where it stands in its lifecycle.
    Show {
        #[clap(long)]
        id: AuctionId,
        /// Debt target of a collateral auction, used to report its phase.
        #[clap(long)]
        tab: Option<Wad>,
    },
    /// Print all auctions still accepting bids.
    Active,
    /// Prepare the creation of a new auction.
    Kick {
        /// Receiver of the proceeds.
        #[clap(long)]
        beneficiary: Address,
        #[clap(long)]
        lot: Wad,
        #[clap(long)]
        bid: Wad,
        /// Collateral auctions only: amount of bids to raise.
        #[clap(long)]
        tab: Option<Wad>,
        /// Collateral auctions only: receiver of the lot not needed to cover
        /// `tab`.
        #[clap(long)]
        forced_bidder: Option<Address>,
    },
    /// Prepare a `tend`: same lot for a higher bid.
    RaiseBid {
        #[clap(long)]
        id: AuctionId,
        #[clap(long)]
        lot: Wad,
        #[clap(long)]
        bid: Wad,
        /// Collateral auctions only.
        #[clap(long)]
        tab: Option<Wad>,
    },
    /// Prepare a `dent`: same bid for a lower lot.
    LowerLot {
        #[clap(long)]
        id: AuctionId,
        #[clap(long)]
        lot: Wad,
        #[clap(long)]
        bid: Wad,
        /// Collateral auctions only.
        #[clap(long)]
        tab: Option<Wad>,
    },
    /// Prepare a `deal` for an expired auction.
    Settle {
        #[clap(long)]
        id: AuctionId,
    },
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "log_filter: {}", self.log_filter)?;
        writeln!(f, "log_stderr_threshold: {}", self.log_stderr_threshold)?;
        writeln!(f, "use_json_logs: {}", self.use_json_logs)?;
        writeln!(f, "node_url: {}", self.node_url)?;
        writeln!(f, "rpc_timeout: {:?}", self.rpc_timeout)?;
        writeln!(f, "config: {}", self.config.display())?;
        writeln!(f, "auction: {}", self.auction)?;
        writeln!(f, "command: {:?}", self.command)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[test]
    fn parses_bid_command() {
        let args = Arguments::try_parse_from([
            "auctions",
            "--auction",
            "eth-a",
            "--rpc-timeout",
            "2s 500ms",
            "raise-bid",
            "--id",
            "7",
            "--lot",
            "10",
            "--bid",
            "105.5",
            "--tab",
            "150",
        ])
        .unwrap();

        assert_eq!(args.rpc_timeout, Duration::from_millis(2500));
        assert_eq!(args.auction, "eth-a");
        match args.command {
            Command::RaiseBid { id, lot, bid, tab } => {
                assert_eq!(id, AuctionId::from(7));
                assert_eq!(lot, Wad::from_integer(10));
                assert_eq!(bid, "105.5".parse().unwrap());
                assert_eq!(tab, Some(Wad::from_integer(150)));
            }
            command => panic!("unexpected command {command:?}"),
        }
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!(
            Arguments::try_parse_from([
                "auctions", "--auction", "eth-a", "settle", "--id", "one",
            ])
            .is_err()
        );
        assert!(
            Arguments::try_parse_from([
                "auctions", "--auction", "eth-a", "kick", "--beneficiary",
                "0x1111111111111111111111111111111111111111", "--lot", "-1", "--bid", "1",
            ])
            .is_err()
        );
        assert!(
            Arguments::try_parse_from([
                "auctions", "--auction", "eth-a", "raise-bid", "--id", "1", "--lot", "10",
                "--bid", "104.9999999999999999999",
            ])
            .is_err()
        );
    }
}
