use std::sync::Arc;

use anyhow::{anyhow, ensure, Context};
use crypto_devs_token::config::NetworkConfig;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::U256,
};

pub type EtherSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// wallet for the first account of `network`, bound to its chain id
pub fn wallet_for_network(network: &NetworkConfig) -> anyhow::Result<LocalWallet> {
    let wallet = network
        .signing_key()
        .parse::<LocalWallet>()
        .with_context(|| {
            format!(
                "invalid account for network `{}`, is PRIVATE_KEY set?",
                network.name
            )
        })?;

    Ok(wallet.with_chain_id(network.chain_id))
}

/// Refuse to sign for a node that serves a different chain than configured.
pub async fn ensure_chain_id<M: Middleware>(
    provider: &M,
    network: &NetworkConfig,
) -> anyhow::Result<()> {
    let remote = provider
        .get_chainid()
        .await
        .map_err(|e| anyhow!(e.to_string()))
        .with_context(|| format!("failed to query chain id of network `{}`", network.name))?;

    ensure!(
        remote == U256::from(network.chain_id),
        "network `{}` is configured with chain id {}, but the node reports {}",
        network.name,
        network.chain_id,
        remote
    );
    Ok(())
}

pub async fn get_writer_ethers_client(network: &NetworkConfig) -> anyhow::Result<Arc<EtherSigner>> {
    let wallet = wallet_for_network(network)?;
    let rpc_url = network.rpc_url()?;

    let provider = Provider::<Http>::try_from(rpc_url.as_str())?;
    ensure_chain_id(&provider, network).await?;

    tracing::info!(
        network = %network.name,
        chain_id = network.chain_id,
        deployer = ?wallet.address(),
        "connected"
    );

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

#[cfg(test)]
mod tests {
    use crypto_devs_token::config::{HardhatConfig, LOCALHOST_NETWORK, RINKEBY_NETWORK};

    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_private_key() {
        let config = HardhatConfig::from_vars(None, Some(KEY.to_owned()));
        let wallet = wallet_for_network(config.network(RINKEBY_NETWORK).unwrap()).unwrap();

        assert_eq!(
            format!("{:?}", wallet.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(wallet.chain_id(), 4);
    }

    #[test]
    fn test_placeholder_account_cannot_sign() {
        let config = HardhatConfig::from_vars(None, None);
        for network in [RINKEBY_NETWORK, LOCALHOST_NETWORK] {
            let err = wallet_for_network(config.network(network).unwrap()).unwrap_err();

            assert_eq!(
                err.to_string(),
                format!("invalid account for network `{network}`, is PRIVATE_KEY set?")
            );
        }
    }

    #[tokio::test]
    async fn test_chain_id_check() {
        let config = HardhatConfig::from_vars(None, Some(KEY.to_owned()));
        let network = config.network(RINKEBY_NETWORK).unwrap();
        let (provider, mock) = Provider::mocked();

        mock.push(U256::from(4)).unwrap();
        ensure_chain_id(&provider, network).await.unwrap();

        mock.push(U256::from(31337)).unwrap();
        let err = ensure_chain_id(&provider, network).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "network `rinkeby` is configured with chain id 4, but the node reports 31337"
        );
    }

    #[tokio::test]
    async fn test_missing_rpc_url() {
        let config = HardhatConfig::from_vars(None, Some(KEY.to_owned()));
        let err = get_writer_ethers_client(config.network(RINKEBY_NETWORK).unwrap())
            .await
            .err()
            .unwrap();

        assert_eq!(err.to_string(), "no RPC url configured for network `rinkeby`");
    }
}
