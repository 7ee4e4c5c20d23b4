use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use ethers::{
    abi::{Abi, Token},
    contract::ContractFactory,
    providers::Middleware,
    types::{Address, Bytes, H256, U256, U64},
};

use crate::artifacts::HardhatArtifact;

pub const CONTRACT_NAME: &str = "CryptoDevToken";

/// Result of a confirmed contract creation transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    pub address: Address,
    pub transaction_hash: H256,
    pub block_number: Option<U64>,
    pub gas_used: Option<U256>,
}

/// Builds and sends `CryptoDevToken` creation transactions from its compiled artifact.
pub struct CryptoDevTokenFactory {
    abi: Abi,
    bytecode: Bytes,
}

impl CryptoDevTokenFactory {
    pub fn from_artifact(artifact: HardhatArtifact) -> anyhow::Result<Self> {
        let name = artifact.fully_qualified_name();

        if artifact.contract_name != CONTRACT_NAME {
            bail!("artifact {name} is not a {CONTRACT_NAME} artifact");
        }
        if artifact.bytecode.is_empty() {
            bail!("{name} has no bytecode, it is abstract or an interface and can't be deployed");
        }
        if !artifact.link_references.is_empty() {
            let libraries = artifact
                .link_references
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            bail!("{name} needs to be linked against libraries from: {libraries}");
        }

        Ok(Self {
            abi: artifact.abi,
            bytecode: artifact.bytecode,
        })
    }

    /// init code of the creation transaction: bytecode followed by the encoded constructor arguments
    pub fn deployment_data(&self, nft_contract: Address) -> anyhow::Result<Bytes> {
        let constructor = self
            .abi
            .constructor()
            .ok_or_else(|| anyhow!("{CONTRACT_NAME} abi has no constructor"))?;

        let data = constructor
            .encode_input(self.bytecode.to_vec(), &constructor_args(nft_contract))
            .context("constructor arguments don't match the abi")?;

        Ok(data.into())
    }

    fn factory<M: Middleware>(&self, client: Arc<M>) -> ContractFactory<M> {
        ContractFactory::new(self.abi.clone(), self.bytecode.clone(), client)
    }

    pub async fn deploy<M: Middleware + 'static>(
        &self,
        client: Arc<M>,
        nft_contract: Address,
        confirmations: usize,
    ) -> anyhow::Result<Deployment> {
        // fail before talking to the node if the abi doesn't take the nft address
        let init_code = self.deployment_data(nft_contract)?;
        tracing::debug!(init_code_len = init_code.len(), "encoded creation transaction");

        let deployer = self
            .factory(client)
            .deploy_tokens(constructor_args(nft_contract))
            .map_err(|e| anyhow!(e.to_string()))?
            .confirmations(confirmations);

        tracing::info!(nft_contract = ?nft_contract, confirmations, "deploying {CONTRACT_NAME}");

        let (contract, receipt) = deployer
            .send_with_receipt()
            .await
            .map_err(|e| anyhow!(e.to_string()))?;

        let deployment = Deployment {
            address: contract.address(),
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        };

        tracing::info!(
            address = ?deployment.address,
            tx = ?deployment.transaction_hash,
            block = ?deployment.block_number,
            gas_used = ?deployment.gas_used,
            "{CONTRACT_NAME} deployed"
        );

        Ok(deployment)
    }
}

fn constructor_args(nft_contract: Address) -> Vec<Token> {
    vec![Token::Address(nft_contract)]
}
