use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::{HashConfig, DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST};

/// One-way hashing primitive the write path delegates to.
pub trait CredentialHasher: Send + Sync {
    fn hash_password(&self, plain: &str) -> anyhow::Result<String>;
}

/// Argon2id at the library's default memory and parallelism. Cost 10 is the stock
/// parameter set; every step above it adds one pass over memory.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(cost: u32) -> anyhow::Result<Self> {
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
            anyhow::bail!("hash cost {cost} outside {MIN_HASH_COST}..={MAX_HASH_COST}");
        }
        let t_cost = Params::DEFAULT_T_COST + (cost - DEFAULT_HASH_COST);
        let params = Params::new(
            Params::DEFAULT_M_COST,
            t_cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| {
            error!(error = %e, cost, "argon2 params error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(Self { params })
    }

    pub fn from_config(config: &HashConfig) -> anyhow::Result<Self> {
        Self::new(config.cost)
    }

    pub fn generate_salt(&self) -> SaltString {
        SaltString::generate(&mut OsRng)
    }

    pub fn hash(&self, plain: &str, salt: &SaltString) -> anyhow::Result<String> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let hash = argon2
            .hash_password(plain.as_bytes(), salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash_password(&self, plain: &str) -> anyhow::Result<String> {
        let salt = self.generate_salt();
        self.hash(plain, &salt)
    }
}

/// Checks a candidate plaintext against a stored hash. Parameters come from the hash string.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
