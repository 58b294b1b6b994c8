use once_cell::sync::Lazy;
use regex::Regex;

use super::model::AiOutcome;

static XML_CONTRACT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<CONTRACT>(.*?)</CONTRACT>").unwrap());

static XML_EXPLANATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<EXPLANATION>(.*?)</EXPLANATION>").unwrap());

static MARKDOWN_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```solidity\n(.*?)```").unwrap());

static DOCUMENTATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\*\*Documentation:\*\*(.*)").unwrap());

/// Substrings every deployable contract must carry: a license pragma, the
/// contract keyword, an owner field and the ownership transfer function.
const REQUIRED_MARKERS: [&str; 4] = [
    "SPDX-License-Identifier",
    "contract",
    "owner",
    "transferOwnership",
];

pub const REJECTION_MESSAGE: &str =
    "The generated code is missing required contract elements. Please try rephrasing your request.";

/// Pulls a (code, explanation) pair out of a completion. Tries the tagged
/// format first, then the markdown fallback the prompt asks for.
fn extract(content: &str) -> Option<(String, String)> {
    if let (Some(code), Some(explanation)) = (
        XML_CONTRACT_REGEX.captures(content),
        XML_EXPLANATION_REGEX.captures(content),
    ) {
        return Some((code[1].trim().to_string(), explanation[1].trim().to_string()));
    }

    match (
        MARKDOWN_CODE_REGEX.captures(content),
        DOCUMENTATION_REGEX.captures(content),
    ) {
        (Some(code), Some(explanation)) => {
            Some((code[1].trim().to_string(), explanation[1].trim().to_string()))
        }
        _ => None,
    }
}

pub fn validate_contract(code: &str) -> bool {
    REQUIRED_MARKERS.iter().all(|marker| code.contains(marker))
}

/// Classifies a completion. Extracted code that fails validation is
/// downgraded to a plain message, so malformed code can never reach the
/// compile and deploy path.
pub fn parse_completion(content: &str, tokens_used: u32) -> AiOutcome {
    match extract(content) {
        Some((code, explanation)) if validate_contract(&code) => AiOutcome::Contract {
            code,
            explanation,
            tokens_used,
        },
        Some(_) => AiOutcome::Message {
            content: REJECTION_MESSAGE.to_string(),
            tokens_used,
        },
        None => AiOutcome::Message {
            content: content.trim().to_string(),
            tokens_used,
        },
    }
}
