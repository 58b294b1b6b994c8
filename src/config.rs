use std::env;
use std::net::SocketAddr;

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Invalid {0}")]
    Invalid(&'static str),
}

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MODEL: &str = "anthropic/claude-3-sonnet";
const DEFAULT_OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_CACHE_CAPACITY: usize = 1_000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub ai: AiConfig,
    pub chain: ChainConfig,
    pub compiler: CompilerConfig,
    pub store: StoreConfig,
    pub session: SessionConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

#[derive(Clone, Debug)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub deployer_key: String,
}

#[derive(Clone, Debug)]
pub struct CompilerConfig {
    pub url: String,
}

/// Remote config-store coordinates. The remote backend needs all three
/// values; anything less falls back to the in-memory store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub connection_url: Option<String>,
    pub config_id: Option<String>,
    pub write_token: Option<String>,
    pub memory_capacity: usize,
}

impl StoreConfig {
    pub fn edge(&self) -> Option<(String, String, String)> {
        match (&self.connection_url, &self.config_id, &self.write_token) {
            (Some(url), Some(id), Some(token)) => Some((url.clone(), id.clone(), token.clone())),
            _ => None,
        }
    }

    /// True when only some of the remote coordinates are set.
    pub fn is_partial(&self) -> bool {
        self.edge().is_none()
            && (self.connection_url.is_some()
                || self.config_id.is_some()
                || self.write_token.is_some())
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub cache_capacity: usize,
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn require_url(key: &'static str) -> Result<String, ConfigError> {
    let value = require(key)?;
    Url::parse(&value).map_err(|_| ConfigError::Invalid(key))?;
    Ok(value)
}

fn parse_capacity(key: &'static str) -> Result<usize, ConfigError> {
    match optional(key) {
        Some(value) => value.parse::<usize>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(DEFAULT_CACHE_CAPACITY),
    }
}

pub fn build_config() -> Result<AppConfig, ConfigError> {
    info!("Building AppConfig...");

    let addr = optional("SERVER_ADDR")
        .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string())
        .parse::<SocketAddr>()
        .map_err(|_| ConfigError::Invalid("SERVER_ADDR"))?;

    let config = AppConfig {
        server: ServerConfig { addr },
        discord: DiscordConfig {
            client_id: require("DISCORD_CLIENT_ID")?,
            client_secret: require("DISCORD_CLIENT_SECRET")?,
            redirect_uri: require("DISCORD_REDIRECT_URI")?,
        },
        ai: AiConfig {
            api_key: require("OPENROUTER_API_KEY")?,
            model: optional("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: optional("OPENROUTER_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_ENDPOINT.to_string()),
        },
        chain: ChainConfig {
            rpc_url: require_url("TEN_RPC_URL")?,
            chain_id: require("TEN_NETWORK_ID")?
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("TEN_NETWORK_ID"))?,
            deployer_key: require("DEPLOYER_PRIVATE_KEY")?,
        },
        compiler: CompilerConfig {
            url: require_url("COMPILER_URL")?,
        },
        store: StoreConfig {
            connection_url: optional("EDGE_CONFIG"),
            config_id: optional("EDGE_CONFIG_ID"),
            write_token: optional("VERCEL_API_TOKEN"),
            memory_capacity: parse_capacity("USER_CACHE_CAPACITY")?,
        },
        session: SessionConfig {
            cache_capacity: parse_capacity("SESSION_CACHE_CAPACITY")?,
        },
    };

    info!("AppConfig built");

    Ok(config)
}

#[cfg(test)]
impl AppConfig {
    /// Config wired to the in-memory store. Endpoints point at a closed
    /// local port so an unexpected network call fails fast instead of
    /// hanging the test.
    pub fn new_test_config() -> Self {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:8000".parse().unwrap(),
            },
            discord: DiscordConfig {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                redirect_uri: "http://localhost:3000/auth/callback".to_string(),
            },
            ai: AiConfig {
                api_key: "test-key".to_string(),
                model: DEFAULT_MODEL.to_string(),
                endpoint: "http://127.0.0.1:1/chat/completions".to_string(),
            },
            chain: ChainConfig {
                rpc_url: "http://127.0.0.1:1".to_string(),
                chain_id: 443,
                deployer_key: "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                    .to_string(),
            },
            compiler: CompilerConfig {
                url: "http://127.0.0.1:1/compile".to_string(),
            },
            store: StoreConfig {
                connection_url: None,
                config_id: None,
                write_token: None,
                memory_capacity: 100,
            },
            session: SessionConfig { cache_capacity: 100 },
        }
    }
}
