//! Wallet and environment configuration

use kernel::error::app_error::{AppError, AppResult};
use kernel::id::CollectionId;
use mint::{GatewayConfig, MintIdentity};
use platform::http::HttpClientConfig;
use platform::secret::SecretString;
use serde::Deserialize;
use signer::SigningKey;
use std::env;
use std::path::Path;

/// Wallet file contents
#[derive(Debug, Deserialize)]
pub struct Wallet {
    pub payment_address: String,
    pub payment_pubkey: String,
    pub receiving_address: String,
    pub private_key_wif: SecretString,
}

impl Wallet {
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read wallet file {}", path.display()))
                .with_source(e)
                .with_action("Pass --wallet <path> or create wallet.json")
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| {
            AppError::config(format!("invalid wallet file: {e}")).with_action(
                "Expected payment_address, payment_pubkey, receiving_address and private_key_wif",
            )
        })
    }

    pub fn identity(&self) -> MintIdentity {
        MintIdentity::new(&self.payment_address, &self.payment_pubkey, &self.receiving_address)
    }

    pub fn signing_key(&self) -> AppResult<SigningKey> {
        SigningKey::from_wif(&self.private_key_wif).map_err(AppError::from)
    }
}

/// Gateway settings from `MINT_API_BASE`, `MINT_COLLECTION_ID` and `MINT_USER_AGENT`
pub fn gateway_from_env() -> AppResult<GatewayConfig> {
    let mut config = GatewayConfig::default();
    if let Ok(base) = env::var("MINT_API_BASE") {
        config.api_base = base;
    }
    if let Ok(id) = env::var("MINT_COLLECTION_ID") {
        config.collection_id = CollectionId::parse_uuid(&id).map_err(|e| {
            AppError::config(format!("MINT_COLLECTION_ID is not a UUID: {e}"))
        })?;
    }
    if let Ok(user_agent) = env::var("MINT_USER_AGENT") {
        config.http = HttpClientConfig {
            user_agent,
            ..config.http
        };
    }
    Ok(config)
}

/// Solver threads: flag, then `SOLVER_THREADS`, then all cores
pub fn solver_threads(flag: Option<usize>) -> AppResult<Option<usize>> {
    if flag.is_some() {
        return Ok(flag);
    }
    match env::var("SOLVER_THREADS") {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::config(format!("SOLVER_THREADS is not a number: {raw}"))),
        Err(_) => Ok(None),
    }
}
