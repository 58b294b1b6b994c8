use serde::Serialize;
use serde_json::Value;

/// Chain id the readiness check expects the RPC endpoint to report.
pub const TEN_CHAIN_ID: u64 = 443;

#[derive(Debug, Clone)]
pub struct DeploymentOutcome {
    /// Checksummed contract address.
    pub address: String,
    pub tx_hash: String,
    pub block_number: u64,
    pub abi: Value,
}

#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub chain_id: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStatus {
    pub chain_id: u64,
    /// Deployer balance in ether, as a decimal string.
    pub balance: String,
    pub ready: bool,
}
