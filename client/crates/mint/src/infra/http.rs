//! HTTP Gateway Implementation

use crate::domain::entities::{BroadcastReceipt, MintReply, SignedAuthorization};
use crate::domain::repository::MintGateway;
use crate::domain::value_objects::SubmissionRequest;
use crate::error::{MintError, MintResult};
use crate::presentation::dto::{BroadcastRequestDto, BroadcastResponseDto, MintRequestDto, MintResponseDto};
use kernel::id::CollectionId;
use platform::http::{HttpClientConfig, build_client};
use reqwest::Client;
use serde::Serialize;

pub const DEFAULT_API_BASE: &str = "https://ordmaker.fun/api";
pub const DEFAULT_COLLECTION_ID: &str = "812eed4e-c7bb-436a-b4d3-a43342c6ef37";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_base: String,
    pub collection_id: CollectionId,
    pub http: HttpClientConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            collection_id: CollectionId::new(DEFAULT_COLLECTION_ID),
            http: HttpClientConfig::default(),
        }
    }
}

impl GatewayConfig {
    fn collection_url(&self, action: &str) -> String {
        format!(
            "{}/agent/collections/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.collection_id,
            action
        )
    }

    pub fn mint_url(&self) -> String {
        self.collection_url("mint")
    }

    pub fn broadcast_url(&self) -> String {
        self.collection_url("broadcast")
    }
}

/// `reqwest`-backed allocation service client
#[derive(Clone)]
pub struct HttpMintGateway {
    client: Client,
    api_base: String,
    mint_url: String,
    broadcast_url: String,
}

impl HttpMintGateway {
    pub fn new(config: &GatewayConfig) -> MintResult<Self> {
        let client = build_client(&config.http).map_err(|e| MintError::Config(e.to_string()))?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            mint_url: config.mint_url(),
            broadcast_url: config.broadcast_url(),
        })
    }

    /// Open the connection before time-critical requests
    pub async fn warm_up(&self) {
        platform::http::warm_up(&self.client, &self.api_base).await;
    }

    async fn post<B: Serialize + Sync>(&self, url: &str, body: &B) -> MintResult<(u16, Vec<u8>)> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(network_error)?;
        Ok((status, body.to_vec()))
    }
}

impl MintGateway for HttpMintGateway {
    async fn request_mint(&self, request: &SubmissionRequest) -> MintResult<MintReply> {
        let body = MintRequestDto::from(request);
        let (status, bytes) = self.post(&self.mint_url, &body).await?;
        classify(status, &bytes)
    }

    async fn broadcast(&self, authorization: &SignedAuthorization) -> MintResult<BroadcastReceipt> {
        let body = BroadcastRequestDto {
            session_id: authorization.session_id.to_string(),
            signed_psbt_base64: authorization.signed_blob.clone(),
        };
        let (status, bytes) = self.post(&self.broadcast_url, &body).await?;
        classify_broadcast(status, &bytes)
    }
}

fn network_error(e: reqwest::Error) -> MintError {
    MintError::Network {
        timed_out: e.is_timeout(),
        detail: e.to_string(),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Server messages that mean the request was already processed
pub fn is_duplicate(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("already") || message.contains("duplicate")
}

fn refusal(status: u16, error: Option<String>) -> MintError {
    let message = error.unwrap_or_else(|| format!("HTTP {status}"));
    if is_duplicate(&message) {
        MintError::BenignDuplicate(message)
    } else {
        MintError::Rejected { status, message }
    }
}

/// Interpret a mint response
///
/// A non-2xx status is an error unless the body carries
/// `challenge_required` or `success`.
pub fn classify(status: u16, body: &[u8]) -> MintResult<MintReply> {
    let dto: MintResponseDto = match serde_json::from_slice(body) {
        Ok(dto) => dto,
        Err(_) if !is_success(status) => return Err(refusal(status, None)),
        Err(e) => return Err(MintError::InvalidResponse(format!("unparseable body: {e}"))),
    };
    if !is_success(status) && !dto.is_normal_reply() {
        return Err(refusal(status, dto.error));
    }
    dto.into_reply()
}

/// Interpret a broadcast response
pub fn classify_broadcast(status: u16, body: &[u8]) -> MintResult<BroadcastReceipt> {
    let dto: BroadcastResponseDto = match serde_json::from_slice(body) {
        Ok(dto) => dto,
        Err(_) if !is_success(status) => return Err(refusal(status, None)),
        Err(e) => return Err(MintError::InvalidResponse(format!("unparseable body: {e}"))),
    };
    if !is_success(status) && dto.success != Some(true) {
        return Err(refusal(status, dto.error));
    }
    dto.into_receipt()
}
