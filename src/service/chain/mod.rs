mod error;
mod model;

pub use error::ChainError;
pub use model::{DeploymentOutcome, NetworkInfo, WalletStatus, TEN_CHAIN_ID};

use std::sync::Arc;

use ethers::{
    abi::{parse_abi, Abi},
    contract::{Contract, ContractFactory},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest},
    utils::{format_ether, to_checksum},
};

use crate::{config::ChainConfig, service::compiler::CompilerService};

type DeployerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Compiles and deploys contracts with the configured deployer wallet.
/// The provider is lazy, so construction never touches the network.
#[derive(Clone)]
pub struct ChainService {
    client: Arc<DeployerClient>,
    compiler: CompilerService,
}

impl ChainService {
    pub fn new(config: &ChainConfig, compiler: CompilerService) -> Result<Self, ChainError> {
        info!("Initializing chain service for chain id {}", config.chain_id);

        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ChainError::Provider(e.to_string()))?;
        let wallet = config
            .deployer_key
            .parse::<LocalWallet>()
            .map_err(|e| ChainError::Wallet(e.to_string()))?
            .with_chain_id(config.chain_id);

        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            compiler,
        })
    }

    pub fn validate_address(address: &str) -> bool {
        address.parse::<Address>().is_ok()
    }

    /// Compiles the source and deploys it, waiting for one confirmation.
    pub async fn deploy(&self, source: &str) -> Result<DeploymentOutcome, ChainError> {
        let compiled = self.compiler.compile(source).await?;

        let abi: Abi = serde_json::from_value(compiled.abi.clone())?;
        let bytecode: Bytes = compiled
            .bytecode
            .parse()
            .map_err(|_| ChainError::InvalidBytecode)?;

        info!("Deploying contract ({} bytes of bytecode)", bytecode.len());
        let factory = ContractFactory::new(abi, bytecode, Arc::clone(&self.client));
        let deployer = factory
            .deploy(())
            .map_err(|e| ChainError::Deployment(e.to_string()))?;
        let (contract, receipt) = deployer
            .send_with_receipt()
            .await
            .map_err(|e| ChainError::Deployment(e.to_string()))?;

        let address = to_checksum(&contract.address(), None);
        info!("Contract deployed at {}", address);

        Ok(DeploymentOutcome {
            address,
            tx_hash: format!("{:?}", receipt.transaction_hash),
            block_number: receipt.block_number.map(|n| n.as_u64()).unwrap_or_default(),
            abi: compiled.abi,
        })
    }

    /// Hands ownership of a deployed contract to `new_owner`. The deployer
    /// wallet must still be the current owner.
    pub async fn transfer_ownership(
        &self,
        contract_address: &str,
        new_owner: &str,
    ) -> Result<(), ChainError> {
        let contract_address: Address = contract_address
            .parse()
            .map_err(|_| ChainError::InvalidAddress)?;
        let new_owner: Address = new_owner.parse().map_err(|_| ChainError::InvalidAddress)?;

        let abi = parse_abi(&[
            "function transferOwnership(address newOwner) public",
            "function owner() public view returns (address)",
        ])
        .map_err(|e| ChainError::Transfer(e.to_string()))?;

        let contract = Contract::new(contract_address, abi, Arc::clone(&self.client));

        let current_owner: Address = contract
            .method::<_, Address>("owner", ())
            .map_err(|e| ChainError::Transfer(e.to_string()))?
            .call()
            .await
            .map_err(|e| ChainError::Transfer(e.to_string()))?;

        if current_owner != self.client.signer().address() {
            return Err(ChainError::NotOwner);
        }

        info!("Transferring ownership of {:?} to {:?}", contract_address, new_owner);
        let call = contract
            .method::<_, ()>("transferOwnership", new_owner)
            .map_err(|e| ChainError::Transfer(e.to_string()))?;
        let pending = call
            .send()
            .await
            .map_err(|e| ChainError::Transfer(e.to_string()))?;
        pending
            .await
            .map_err(|e| ChainError::Transfer(e.to_string()))?;

        info!("Ownership transferred");
        Ok(())
    }

    /// Deployer balance in ether.
    pub async fn check_balance(&self) -> Result<String, ChainError> {
        let address = self.client.signer().address();
        let balance = self
            .client
            .get_balance(address, None)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(format_ether(balance))
    }

    pub async fn network_info(&self) -> Result<NetworkInfo, ChainError> {
        let chain_id = self
            .client
            .get_chainid()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(NetworkInfo {
            chain_id: chain_id.as_u64(),
        })
    }

    /// Funded-and-on-the-right-network check for the deployer wallet.
    pub async fn wallet_status(&self) -> Result<WalletStatus, ChainError> {
        let network = self.network_info().await?;
        let balance = self.check_balance().await?;

        let funded = balance.parse::<f64>().map(|b| b > 0.0).unwrap_or(false);
        let ready = funded && network.chain_id == TEN_CHAIN_ID;

        Ok(WalletStatus {
            chain_id: network.chain_id,
            balance,
            ready,
        })
    }

    pub async fn is_wallet_ready(&self) -> bool {
        self.wallet_status().await.map(|status| status.ready).unwrap_or(false)
    }

    /// Estimated deployment cost in ether for the compiled source.
    pub async fn estimate_deploy_cost(&self, source: &str) -> Result<String, ChainError> {
        let compiled = self.compiler.compile(source).await?;
        let bytecode: Bytes = compiled
            .bytecode
            .parse()
            .map_err(|_| ChainError::InvalidBytecode)?;

        let tx: TypedTransaction = TransactionRequest::new()
            .from(self.client.signer().address())
            .data(bytecode)
            .into();

        let gas = self
            .client
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        let gas_price = self
            .client
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(format_ether(gas * gas_price))
    }
}
