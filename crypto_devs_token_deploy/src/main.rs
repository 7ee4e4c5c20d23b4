mod config;
mod ethers_client;
mod logging;

use std::process;

use anyhow::Context;
use clap::Parser;
use crypto_devs_token::{
    artifacts::{ensure_compiler_version, ArtifactStore},
    config::HardhatConfig,
    contracts::crypto_dev_token::{CryptoDevTokenFactory, Deployment, CONTRACT_NAME},
    utils::{display_address, parse_address},
};

use crate::{config::Arguments, ethers_client::get_writer_ethers_client};

#[tokio::main]
async fn main() {
    // so the argument env fallbacks see `.env` as well
    dotenv::dotenv().ok();

    let args = Arguments::parse();
    logging::initialize(&args.logging.log_filter, args.logging.log_stderr_threshold);
    tracing::info!("running deployer with arguments:\n{}", args);

    match run(args, HardhatConfig::from_env()).await {
        Ok(deployment) => {
            println!("{}", deployed_message(&deployment));
            process::exit(0)
        }
        Err(err) => {
            println!("{err:?}");
            process::exit(1)
        }
    }
}

async fn run(args: Arguments, config: HardhatConfig) -> anyhow::Result<Deployment> {
    let network = config.network(&args.network)?;

    let nft_contract = parse_address(&args.crypto_devs_nft_contract_address)
        .context("invalid Crypto Devs NFT contract address")?;

    let store = ArtifactStore::new(&args.artifacts);
    let artifact = store.read_artifact(CONTRACT_NAME)?;
    let solc_version = store.solc_version(&artifact)?;
    ensure_compiler_version(&config.solidity, solc_version.as_deref())?;
    tracing::debug!(artifact = %artifact.path.display(), ?solc_version, "loaded artifact");

    let factory = CryptoDevTokenFactory::from_artifact(artifact)?;

    let signer = get_writer_ethers_client(network).await?;
    factory
        .deploy(signer, nft_contract, args.confirmations)
        .await
        .with_context(|| format!("failed to deploy {CONTRACT_NAME} to `{}`", network.name))
}

fn deployed_message(deployment: &Deployment) -> String {
    format!(
        "Crypto Devs Token Contract Address: {}",
        display_address(&deployment.address)
    )
}
