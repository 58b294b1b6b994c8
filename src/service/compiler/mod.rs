mod error;
mod model;

pub use error::CompilerError;
pub use model::CompiledContract;

use reqwest::Client;
use serde_json::Value;

use crate::{config::CompilerConfig, utils::http::create_api_client};

use model::{build_input, SOURCE_FILE};

/// Client for the hosted solc endpoint, which speaks standard JSON
/// input/output.
#[derive(Clone)]
pub struct CompilerService {
    client: Client,
    config: CompilerConfig,
}

impl CompilerService {
    pub fn new(config: CompilerConfig) -> Self {
        info!("Initializing compiler service");
        Self {
            client: create_api_client(),
            config,
        }
    }

    /// Compiles a single contract source. Empty sources are rejected
    /// before any network call.
    pub async fn compile(&self, source: &str) -> Result<CompiledContract, CompilerError> {
        if source.trim().is_empty() {
            return Err(CompilerError::EmptySource);
        }

        debug!("Sending compilation request to {}", self.config.url);
        let response = self
            .client
            .post(&self.config.url)
            .json(&build_input(source))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| value.get("error")?.as_str().map(String::from))
                .unwrap_or(body);
            if message.is_empty() {
                return Err(CompilerError::Compilation(format!(
                    "Compilation failed: {}",
                    status
                )));
            }
            return Err(CompilerError::Compilation(message));
        }

        let output: Value = response
            .json()
            .await
            .map_err(|e| CompilerError::Request(e.to_string()))?;

        parse_output(&output)
    }
}

/// Extracts the first contract from a standard JSON output, or the first
/// error-severity diagnostic. Warnings do not fail the compile.
fn parse_output(output: &Value) -> Result<CompiledContract, CompilerError> {
    if let Some(errors) = output.get("errors").and_then(Value::as_array) {
        if let Some(diagnostic) = errors
            .iter()
            .find(|entry| entry.get("severity").and_then(Value::as_str) == Some("error"))
        {
            let message = diagnostic
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Compilation failed")
                .to_string();
            return Err(CompilerError::Compilation(message));
        }
    }

    let contract = output
        .get("contracts")
        .and_then(|contracts| contracts.get(SOURCE_FILE))
        .and_then(Value::as_object)
        .and_then(|contracts| contracts.values().next())
        .ok_or(CompilerError::MissingContract)?;

    let abi = contract
        .get("abi")
        .cloned()
        .ok_or(CompilerError::MissingContract)?;
    let object = contract
        .pointer("/evm/bytecode/object")
        .and_then(Value::as_str)
        .ok_or(CompilerError::MissingContract)?;

    Ok(CompiledContract {
        abi,
        bytecode: format!("0x{}", object),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_output_success() {
        let output = json!({
            "errors": [
                { "severity": "warning", "message": "SPDX license identifier not provided" }
            ],
            "contracts": {
                "contract.sol": {
                    "PrivateCounter": {
                        "abi": [{ "type": "function", "name": "owner" }],
                        "evm": { "bytecode": { "object": "6080604052" } }
                    }
                }
            }
        });

        let compiled = parse_output(&output).unwrap();

        assert_eq!(compiled.bytecode, "0x6080604052");
        assert_eq!(compiled.abi[0]["name"], "owner");
    }

    #[test]
    fn test_parse_output_surfaces_first_error() {
        let output = json!({
            "errors": [
                { "severity": "warning", "message": "unused variable" },
                { "severity": "error", "message": "Expected ';' but got '}'" },
                { "severity": "error", "message": "second error" }
            ]
        });

        match parse_output(&output) {
            Err(CompilerError::Compilation(message)) => {
                assert_eq!(message, "Expected ';' but got '}'");
            }
            other => panic!("expected compilation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_output_without_contracts() {
        let output = json!({ "contracts": { "contract.sol": {} } });

        assert!(matches!(
            parse_output(&output),
            Err(CompilerError::MissingContract)
        ));
    }

    #[tokio::test]
    async fn test_compile_rejects_empty_source() {
        let service = CompilerService::new(crate::config::CompilerConfig {
            url: "http://127.0.0.1:1/compile".to_string(),
        });

        assert!(matches!(
            service.compile("   ").await,
            Err(CompilerError::EmptySource)
        ));
    }
}
