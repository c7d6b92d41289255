use {
    crate::record::AuctionId,
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, Bytes},
        rpc::types::TransactionRequest,
        sol_types::SolCall,
    },
    contracts::alloy::{AuctionHouse, Flapper, Flipper, Flopper},
    number::Wad,
    serde::{Serialize, Serializer},
};

/// A validated auction house call that has not been submitted. Signing and
/// broadcasting it is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransaction {
    /// The auction house.
    pub to: Address,
    pub call: AuctionCall,
}

/// Contract call with its arguments in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "method")]
pub enum AuctionCall {
    #[serde(rename_all = "camelCase")]
    KickCollateral {
        forced_bidder: Address,
        beneficiary: Address,
        tab: Wad,
        lot: Wad,
        bid: Wad,
    },
    KickSurplus {
        beneficiary: Address,
        lot: Wad,
        bid: Wad,
    },
    KickDebt {
        beneficiary: Address,
        lot: Wad,
        bid: Wad,
    },
    Tend {
        id: AuctionId,
        lot: Wad,
        bid: Wad,
    },
    Dent {
        id: AuctionId,
        lot: Wad,
        bid: Wad,
    },
    Deal {
        id: AuctionId,
    },
}

impl AuctionCall {
    /// Name of the contract function.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::KickCollateral { .. } | Self::KickSurplus { .. } | Self::KickDebt { .. } => {
                "kick"
            }
            Self::Tend { .. } => "tend",
            Self::Dent { .. } => "dent",
            Self::Deal { .. } => "deal",
        }
    }

    /// ABI encoded call including the selector.
    pub fn calldata(&self) -> Bytes {
        match *self {
            Self::KickCollateral {
                forced_bidder,
                beneficiary,
                tab,
                lot,
                bid,
            } => Flipper::kickCall {
                lad: forced_bidder,
                gal: beneficiary,
                tab: tab.raw(),
                lot: lot.raw(),
                bid: bid.raw(),
            }
            .abi_encode(),
            Self::KickSurplus {
                beneficiary,
                lot,
                bid,
            } => Flapper::kickCall {
                gal: beneficiary,
                lot: lot.raw(),
                bid: bid.raw(),
            }
            .abi_encode(),
            Self::KickDebt {
                beneficiary,
                lot,
                bid,
            } => Flopper::kickCall {
                gal: beneficiary,
                lot: lot.raw(),
                bid: bid.raw(),
            }
            .abi_encode(),
            Self::Tend { id, lot, bid } => AuctionHouse::tendCall {
                id: id.0,
                lot: lot.raw(),
                bid: bid.raw(),
            }
            .abi_encode(),
            Self::Dent { id, lot, bid } => AuctionHouse::dentCall {
                id: id.0,
                lot: lot.raw(),
                bid: bid.raw(),
            }
            .abi_encode(),
            Self::Deal { id } => AuctionHouse::dealCall { id: id.0 }.abi_encode(),
        }
        .into()
    }
}

impl PendingTransaction {
    pub fn function_name(&self) -> &'static str {
        self.call.function_name()
    }

    pub fn calldata(&self) -> Bytes {
        self.call.calldata()
    }

    /// Request ready to be filled (nonce, gas, signer) and sent.
    pub fn into_request(self) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.to)
            .with_input(self.call.calldata())
    }
}

impl Serialize for PendingTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Json<'a> {
            to: Address,
            function: &'static str,
            call: &'a AuctionCall,
            calldata: Bytes,
        }

        Json {
            to: self.to,
            function: self.function_name(),
            call: &self.call,
            calldata: self.calldata(),
        }
        .serialize(serializer)
    }
}
