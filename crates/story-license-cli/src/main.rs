use std::process::ExitCode;

use alloy::network::EthereumWallet;
use alloy::primitives::TxHash;
use alloy::providers::{ProviderBuilder, RootProvider};
use alloy::signers::local::PrivateKeySigner;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use story_license::explorer::{base_tx_url, license_token_url, short_hash, story_tx_url};
use story_license::extractor::license_token_id;
use story_license::resolver::resolve_destination_tx;
use story_license::{
    DlnClient, LicenseConfig, LicenseError, LicensePurchase, ProviderWallet, PurchaseStatus,
    ResolverConfig, RpcDestinationChain,
};

/// Buy Story commercial licenses with ETH on Base.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quote the current license price in ETH and check the wallet balance.
    Estimate,

    /// Pay on Base and mint a license token to a Story address.
    Purchase {
        /// Story address that receives the license token.
        #[arg(long, env = "STORY_RECEIVER")]
        receiver: String,
    },

    /// Find the Story transaction that filled the order created by a Base transaction.
    Resolve { source_tx: TxHash },

    /// Read the license token id minted by a Story transaction.
    TokenId { story_tx: TxHash },
}

fn signer_from_env() -> PrivateKeySigner {
    let key =
        std::env::var("EVM_PRIVATE_KEY").expect("EVM_PRIVATE_KEY environment variable is required");
    key.parse().expect("invalid EVM_PRIVATE_KEY")
}

fn parse_rpc_url(name: &str, raw: &str) -> Result<url::Url, LicenseError> {
    raw.parse()
        .map_err(|e| LicenseError::ConfigError(format!("invalid {name} '{raw}': {e}")))
}

fn story_provider(config: &LicenseConfig) -> Result<RootProvider, LicenseError> {
    Ok(RootProvider::new_http(parse_rpc_url(
        "STORY_RPC_URL",
        &config.story_rpc_url,
    )?))
}

fn print_status(config: &LicenseConfig, status: &PurchaseStatus) {
    match status {
        PurchaseStatus::Idle => {}
        PurchaseStatus::Minting => println!("Minting license..."),
        PurchaseStatus::Error { reason } => println!("{reason}"),
        PurchaseStatus::Success { record } => {
            let source = record.source_tx_hash;
            println!(
                "Base transaction {}: {}",
                short_hash(source),
                base_tx_url(config, source)
            );
            if let Some(destination) = record.destination_tx_hash {
                println!(
                    "Story transaction {}: {}",
                    short_hash(destination),
                    story_tx_url(config, destination)
                );
                match record.license_token_id {
                    Some(id) => println!(
                        "License token #{id}: {}",
                        license_token_url(config, destination)
                    ),
                    None => println!("Waiting for the license token..."),
                }
            }
        }
    }
}

/// The printer task can miss the last update, since a watch channel only keeps
/// the latest value.
fn needs_final_print(last_printed: Option<&PurchaseStatus>, status: &PurchaseStatus) -> bool {
    last_printed != Some(status)
}

fn purchase_succeeded(status: &PurchaseStatus) -> bool {
    matches!(status, PurchaseStatus::Success { .. })
}

async fn run(cli: Cli, config: LicenseConfig) -> Result<ExitCode, LicenseError> {
    match cli.command {
        Command::Estimate => {
            let signer = signer_from_env();
            let account = signer.address();
            let base = ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(parse_rpc_url("BASE_RPC_URL", &config.base_rpc_url)?);

            let purchase = LicensePurchase::new(
                DlnClient::new(config.clone())?,
                ProviderWallet::new(base, account, config.source_chain_id),
                RpcDestinationChain::new(story_provider(&config)?),
            );
            let (quote, affordable) = purchase.estimate_cost().await?;

            println!("License price: {} IP", config.license_price);
            println!("Estimated cost: {} ETH", quote.eth);
            if !affordable {
                println!("Insufficient ETH balance on Base for {account}");
            }
        }
        Command::Purchase { receiver } => {
            let signer = signer_from_env();
            let account = signer.address();
            let base = ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(parse_rpc_url("BASE_RPC_URL", &config.base_rpc_url)?);

            let mut purchase = LicensePurchase::new(
                DlnClient::new(config.clone())?,
                ProviderWallet::new(base, account, config.source_chain_id),
                RpcDestinationChain::new(story_provider(&config)?),
            );

            let mut updates = purchase.subscribe();
            let printer_config = config.clone();
            let printer = tokio::spawn(async move {
                let mut last = None;
                while updates.changed().await.is_ok() {
                    let status = updates.borrow_and_update().clone();
                    print_status(&printer_config, &status);
                    last = Some(status);
                }
                last
            });

            println!("Paying from {account} on Base");
            let status = purchase.purchase(&receiver).await;
            drop(purchase);
            let last_printed = match printer.await {
                Ok(last) => last,
                Err(e) => {
                    tracing::error!(error = %e, "status printer task failed");
                    None
                }
            };
            let status = status?;
            if needs_final_print(last_printed.as_ref(), &status) {
                print_status(&config, &status);
            }

            if !purchase_succeeded(&status) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Resolve { source_tx } => {
            let client = DlnClient::new(config.clone())?;
            let destination =
                resolve_destination_tx(&client, source_tx, &ResolverConfig::default()).await?;
            println!("{}", story_tx_url(&config, destination));
        }
        Command::TokenId { story_tx } => {
            let chain = RpcDestinationChain::new(story_provider(&config)?);
            match license_token_id(&chain, story_tx).await? {
                Some(id) => println!("{id}"),
                None => println!("No license token minted in {}", short_hash(story_tx)),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match LicenseConfig::from_env() {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
