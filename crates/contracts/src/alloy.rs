//! Bindings for the auction house contracts.
//!
//! All three houses (`Flipper`, `Flapper`, `Flopper`) expose the same
//! read and bidding surface, which lives in [`AuctionHouse`]. Only the
//! `kick` signature and the token getters differ between them.

alloy::sol! {
    #[allow(missing_docs)]
    interface AuctionHouse {
        function era() external view returns (uint48);
        function beg() external view returns (uint256);
        function ttl() external view returns (uint48);
        function tau() external view returns (uint48);
        function kicks() external view returns (uint256);
        function bids(uint256 id)
            external
            view
            returns (uint256 bid, uint256 lot, address guy, uint48 tic, uint48 end);

        function tend(uint256 id, uint256 lot, uint256 bid) external;
        function dent(uint256 id, uint256 lot, uint256 bid) external;
        function deal(uint256 id) external;
    }

    /// Collateral auction: bid rises up to `tab`, then the lot falls.
    #[allow(missing_docs)]
    interface Flipper {
        function kick(address lad, address gal, uint256 tab, uint256 lot, uint256 bid)
            external
            returns (uint256 id);
    }

    /// Surplus auction: `pie` is sold for rising amounts of `gem`.
    #[allow(missing_docs)]
    interface Flapper {
        function pie() external view returns (address);
        function gem() external view returns (address);
        function kick(address gal, uint256 lot, uint256 bid) external returns (uint256 id);
    }

    /// Debt auction: falling amounts of `gem` are sold for a fixed `pie` bid.
    #[allow(missing_docs)]
    interface Flopper {
        function pie() external view returns (address);
        function gem() external view returns (address);
        function kick(address gal, uint256 lot, uint256 bid) external returns (uint256 id);
    }
}
