//! TOML file naming the auction houses the binary can talk to.
//!
//! ```toml
//! [[auction]]
//! name = "eth-a"
//! kind = "collateral"
//! address = "0x..."
//! ```

use {
    alloy::primitives::Address,
    anyhow::{Context, Result},
    serde::Deserialize,
    std::path::Path,
    tokio::fs,
};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(rename = "auction", default)]
    pub auctions: Vec<AuctionHouse>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AuctionHouse {
    /// Name used to select the house on the command line.
    pub name: String,
    pub kind: Kind,
    pub address: Address,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    /// `Flipper`
    Collateral,
    /// `Flapper`
    Surplus,
    /// `Flopper`
    Debt,
}

impl Config {
    pub fn find(&self, name: &str) -> Result<&AuctionHouse> {
        self.auctions
            .iter()
            .find(|house| house.name == name)
            .with_context(|| format!("no auction house named {name:?} configured"))
    }
}

impl std::str::FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("invalid auction house config")?;
        for (i, house) in config.auctions.iter().enumerate() {
            anyhow::ensure!(
                config.auctions[..i]
                    .iter()
                    .all(|other| other.name != house.name),
                "auction house {:?} is configured twice",
                house.name
            );
        }
        Ok(config)
    }
}

/// Loads the auction house configuration from a TOML file.
pub async fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    data.parse()
        .with_context(|| format!("failed to load config from {path:?}"))
}
