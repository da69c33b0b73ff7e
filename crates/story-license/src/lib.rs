//! Cross-chain commercial license purchases: pay on Base, receive a Story
//! license token.
//!
//! A purchase is a single deBridge DLN order. The user's ETH on Base is
//! bridged to IP on Story, and a post-fill hook calls the Story multicall to
//! mint a license token for the chosen receiver.
//!
//! # Flow
//!
//! 1. [`order::build_order_url`] - order request with the mint hook embedded
//! 2. [`DlnClient::create_order`] - ready-to-sign Base transaction
//! 3. [`executor::execute_payment`] - submitted from the user's [`SourceWallet`]
//! 4. [`resolver::resolve_destination_tx`] - the Story transaction that filled the order
//! 5. [`extractor::license_token_id`] - token id from `LicenseTokenMinted`
//!
//! [`LicensePurchase`] runs these steps and tracks the [`PurchaseStatus`].
//!
//! # Quick example
//!
//! ```no_run
//! use alloy::network::EthereumWallet;
//! use alloy::providers::{ProviderBuilder, RootProvider};
//! use alloy::signers::local::PrivateKeySigner;
//! use story_license::{
//!     DlnClient, LicenseConfig, LicensePurchase, ProviderWallet, RpcDestinationChain,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), story_license::LicenseError> {
//! let config = LicenseConfig::default();
//! let signer: PrivateKeySigner = "0xYOUR_KEY".parse().unwrap();
//! let account = signer.address();
//!
//! let base = ProviderBuilder::new()
//!     .wallet(EthereumWallet::from(signer))
//!     .connect_http(config.base_rpc_url.parse().unwrap());
//! let story: RootProvider = RootProvider::new_http(config.story_rpc_url.parse().unwrap());
//!
//! let mut purchase = LicensePurchase::new(
//!     DlnClient::new(config.clone())?,
//!     ProviderWallet::new(base, account, config.source_chain_id),
//!     RpcDestinationChain::new(story),
//! );
//! let status = purchase.purchase("0x2222222222222222222222222222222222222222").await?;
//! println!("{status:?}");
//! # Ok(())
//! # }
//! ```

pub mod amount;
pub mod constants;
pub mod error;
pub mod payment;
pub mod response;

pub mod hook;
pub mod order;

pub mod dln_client;
pub mod provider;
pub mod wallet;

pub mod estimate;
pub mod executor;
pub mod explorer;
pub mod extractor;
pub mod purchase;
pub mod resolver;

use alloy::sol;

// Entry point on the deBridge Story multicall that wraps IP, approves the
// licensing module and mints license tokens for `receiver`.
sol! {
    interface IStoryLicenseMinter {
        function mintLicenseTokensCrossChain(
            address licensorIpId,
            uint256 licenseTermsId,
            uint256 tokenAmount,
            address receiver
        ) external;
    }
}

// Emitted by Story's licensing module for every license token minted.
sol! {
    #[derive(Debug, PartialEq, Eq)]
    event LicenseTokenMinted(
        address indexed minter,
        address indexed receiver,
        uint256 indexed tokenId
    );
}

// Re-exports
pub use constants::*;
pub use error::LicenseError;
pub use payment::{parse_receiver, PaymentIntent};
pub use response::*;

pub use dln_client::DlnClient;
pub use order::OrderPurpose;
pub use provider::{ProviderWallet, ReceiptConfig, RpcDestinationChain};
pub use wallet::{DestinationChain, SourceWallet};

pub use estimate::CostEstimate;
pub use purchase::{LicensePurchase, PurchaseStatus, TransactionRecord};
pub use resolver::ResolverConfig;
