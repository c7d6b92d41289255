use alloy::primitives::Address;

/// Grants an auction house the allowance to pull a bidder's tokens. Bidders
/// have to do this once before their first bid on a surplus or debt house.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenApproval: Send + Sync {
    /// Allows `spender` to transfer the bidder's `token`.
    async fn approve(&self, token: Address, spender: Address) -> anyhow::Result<()>;
}
