pub mod ai;
pub mod auth;
pub mod chain;
pub mod compiler;
mod error;
pub mod quota;
pub mod session;

pub use error::ServiceError;

use crate::{config::AppConfig, storage::StoreManager};

use ai::AiService;
use auth::AuthService;
use chain::ChainService;
use compiler::CompilerService;
use quota::QuotaService;
use session::SessionService;

/// All services, wired once in `main` and handed to the handlers through
/// the app state.
#[derive(Clone)]
pub struct ServiceRegistry {
    pub auth: AuthService,
    pub quota: QuotaService,
    pub compiler: CompilerService,
    pub chain: ChainService,
    pub session: SessionService,
}

impl ServiceRegistry {
    pub fn new(config: &AppConfig, store: StoreManager) -> Result<Self, ServiceError> {
        info!("Initializing service registry");

        let quota = QuotaService::new(store.clone());
        let ai = AiService::new(config.ai.clone());
        let compiler = CompilerService::new(config.compiler.clone());
        let chain = ChainService::new(&config.chain, compiler.clone())?;
        let auth = AuthService::new(config.discord.clone(), store);
        let session = SessionService::new(
            config.session.cache_capacity,
            quota.clone(),
            ai,
            chain.clone(),
        );

        info!("Service registry initialized");

        Ok(Self {
            auth,
            quota,
            compiler,
            chain,
            session,
        })
    }
}
