use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_HASH_COST: u32 = 10;
pub const MIN_HASH_COST: u32 = DEFAULT_HASH_COST;
pub const MAX_HASH_COST: u32 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    /// Work factor for the password hasher; never below [`DEFAULT_HASH_COST`].
    pub cost: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_HASH_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub hash: HashConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let cost = match lookup("PASSWORD_HASH_COST") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("PASSWORD_HASH_COST is not a number: {v}"))?,
            None => DEFAULT_HASH_COST,
        };
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
            anyhow::bail!(
                "PASSWORD_HASH_COST must be within {MIN_HASH_COST}..={MAX_HASH_COST}, got {cost}"
            );
        }

        Ok(Self {
            database_url,
            max_connections,
            hash: HashConfig { cost },
        })
    }
}
