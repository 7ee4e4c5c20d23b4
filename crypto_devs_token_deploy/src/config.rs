use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use crypto_devs_token::{
    artifacts::DEFAULT_ARTIFACTS_DIR, config::RINKEBY_NETWORK,
    constants::CRYPTO_DEVS_NFT_CONTRACT_ADDRESS,
};
use tracing::level_filters::LevelFilter;

const DEFAULT_LOG_FILTER: &str = "warn,crypto_devs_token=info,crypto_devs_token_deploy=info";

#[derive(clap::Parser)]
#[clap(about = "Deploy the Crypto Devs token contract")]
pub struct Arguments {
    /// Network from the hardhat config to deploy to.
    #[clap(long, env = "HARDHAT_NETWORK", default_value = RINKEBY_NETWORK)]
    pub network: String,

    /// Directory `hardhat compile` wrote the contract artifacts to.
    #[clap(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Crypto Devs NFT contract the token is bound to.
    #[clap(long, env, default_value = CRYPTO_DEVS_NFT_CONTRACT_ADDRESS)]
    pub crypto_devs_nft_contract_address: String,

    /// Confirmations to wait for, 1 returns as soon as the deployment is mined.
    #[clap(long, env, default_value_t = 1)]
    pub confirmations: usize,

    #[clap(flatten)]
    pub logging: LoggingArguments,
}

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Events at or above this level go to stderr, the rest to stdout.
    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            network,
            artifacts,
            crypto_devs_nft_contract_address,
            confirmations,
            logging,
        } = self;

        writeln!(f, "network: {}", network)?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        writeln!(
            f,
            "crypto_devs_nft_contract_address: {}",
            crypto_devs_nft_contract_address
        )?;
        writeln!(f, "confirmations: {}", confirmations)?;
        writeln!(f, "log_filter: {}", logging.log_filter)?;
        writeln!(f, "log_stderr_threshold: {}", logging.log_stderr_threshold)?;
        Ok(())
    }
}
