use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::users::{
    Argon2Hasher, CredentialHasher, MemoryUserStore, PgUserStore, UserService, UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserService,
}

impl AppState {
    /// Loads `.env`, connects to Postgres, applies migrations.
    pub async fn init() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let store = Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>;
        let hasher =
            Arc::new(Argon2Hasher::from_config(&config.hash)?) as Arc<dyn CredentialHasher>;

        tracing::info!(hash_cost = config.hash.cost, "user store ready");
        Ok(Self::from_parts(config, store, hasher))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            config,
            users: UserService::new(store, hasher),
        }
    }

    /// State backed by [`MemoryUserStore`]; no database is contacted.
    pub fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        let hasher =
            Arc::new(Argon2Hasher::from_config(&config.hash)?) as Arc<dyn CredentialHasher>;
        let store = Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>;
        Ok(Self::from_parts(Arc::new(config), store, hasher))
    }
}
