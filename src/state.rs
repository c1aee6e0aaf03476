use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::ObjectStorageClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::TokenService;

/// Shared collaborators, one per process
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub tokens: TokenService,

    pub storage: Arc<ObjectStorageClient>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = TokenService::new(
            &config.auth.jwt_secret,
            config.auth.access_token_ttl_minutes,
        );

        let storage = Arc::new(ObjectStorageClient::new(config.storage.clone())?);

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            tokens,
            storage,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
