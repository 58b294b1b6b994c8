use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Source name used for the single-file standard JSON input.
pub const SOURCE_FILE: &str = "contract.sol";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledContract {
    pub abi: Value,
    pub bytecode: String,
}

/// Builds the solc standard JSON input for one source file, optimizer on
/// at 200 runs.
pub fn build_input(source: &str) -> Value {
    json!({
        "language": "Solidity",
        "sources": {
            SOURCE_FILE: {
                "content": source
            }
        },
        "settings": {
            "outputSelection": {
                "*": {
                    "*": ["*"]
                }
            },
            "optimizer": {
                "enabled": true,
                "runs": 200
            }
        }
    })
}
