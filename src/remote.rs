//! Remote Authority Client - the canonical backend for listings and votes
//!
//! The sync controller depends on the [`RemoteAuthority`] trait, not on a
//! concrete transport, so tests can script outcomes. [`HttpAuthority`] is the
//! production implementation over the board's HTTP API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::BoardConfig;
use crate::types::{Listing, ListingInput, VoteDirection};

/// Remote authority failure
///
/// The two modes drive opposite branches in the sync controller: a logical
/// rejection is terminal and surfaced verbatim, a transport failure triggers
/// the local-fallback commit.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The server was reached and explicitly refused
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The server could not be reached (unreachable, timeout)
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Capabilities the sync engine needs from the backend
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// Fetch the authoritative listing collection
    async fn fetch_listings(&self) -> Result<Vec<Listing>, RemoteError>;

    /// Create a listing; returns the remote-assigned id
    async fn create_listing(&self, input: &ListingInput) -> Result<u64, RemoteError>;

    /// Cast or change a vote on a listing
    async fn cast_vote(&self, listing: u64, direction: VoteDirection)
        -> Result<(), RemoteError>;
}

// ==================== Wire types ====================

fn wire_now() -> DateTime<Utc> {
    Utc::now()
}

/// One entry of the `GET /ads` response: id plus ad fields
#[derive(Debug, Clone, Deserialize)]
struct AdEntry {
    id: u64,
    ad: AdFields,
}

#[derive(Debug, Clone, Deserialize)]
struct AdFields {
    title: String,
    description: String,
    contact: String,
    technologies: String,
    development_time_months: u32,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    votes_up: u64,
    #[serde(default)]
    votes_down: u64,
    #[serde(default = "wire_now")]
    created_at: DateTime<Utc>,
}

impl AdEntry {
    fn into_listing(self) -> Listing {
        Listing {
            id: self.id,
            title: self.ad.title,
            description: self.ad.description,
            contact: self.ad.contact,
            technologies: self.ad.technologies,
            development_time_months: self.ad.development_time_months,
            link: self.ad.link.filter(|l| !l.is_empty()),
            owner: self.ad.owner,
            votes_up: self.ad.votes_up,
            votes_down: self.ad.votes_down,
            created_at: self.ad.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateAdResponse {
    success: bool,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct VoteRequest {
    direction: VoteDirection,
}

#[derive(Debug, Deserialize)]
struct VoteResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

// ==================== HTTP implementation ====================

/// HTTP client for the board backend
///
/// Anonymous when built without an identity; identity-bound handles carry the
/// user identifier as a bearer token. The builder-level timeout is the
/// explicit boundary after which a call counts as a transport failure.
pub struct HttpAuthority {
    base_url: String,
    client: Client,
}

impl HttpAuthority {
    /// Anonymous handle
    pub fn new(config: &BoardConfig) -> Self {
        Self::build(config, None)
    }

    /// Identity-bound handle for a signed-in user
    pub fn with_identity(config: &BoardConfig, user_id: &str) -> Self {
        Self::build(config, Some(user_id))
    }

    fn build(config: &BoardConfig, identity: Option<&str>) -> Self {
        let mut headers = header::HeaderMap::new();
        if let Some(user_id) = identity {
            if let Ok(value) = header::HeaderValue::from_str(&format!("Bearer {}", user_id)) {
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: config.base_url.clone(),
            client,
        }
    }

    async fn read_rejection(response: reqwest::Response) -> RemoteError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        RemoteError::Rejected(format!("server error {}: {}", status, body))
    }
}

fn transport(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport(e.to_string())
}

#[async_trait]
impl RemoteAuthority for HttpAuthority {
    async fn fetch_listings(&self) -> Result<Vec<Listing>, RemoteError> {
        let url = format!("{}/ads", self.base_url);
        let response = self.client.get(&url).send().await.map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::read_rejection(response).await);
        }

        let entries: Vec<AdEntry> = response.json().await.map_err(transport)?;
        Ok(entries.into_iter().map(AdEntry::into_listing).collect())
    }

    async fn create_listing(&self, input: &ListingInput) -> Result<u64, RemoteError> {
        let url = format!("{}/ads", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::read_rejection(response).await);
        }

        let body: CreateAdResponse = response.json().await.map_err(transport)?;
        if !body.success {
            return Err(RemoteError::Rejected(
                body.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        body.id
            .ok_or_else(|| RemoteError::Rejected("response missing listing id".to_string()))
    }

    async fn cast_vote(
        &self,
        listing: u64,
        direction: VoteDirection,
    ) -> Result<(), RemoteError> {
        let url = format!("{}/ads/{}/vote", self.base_url, listing);
        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&VoteRequest { direction })
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::Rejected(format!(
                "listing {} not found",
                listing
            )));
        }
        if !response.status().is_success() {
            return Err(Self::read_rejection(response).await);
        }

        let body: VoteResponse = response.json().await.map_err(transport)?;
        if !body.success {
            return Err(RemoteError::Rejected(
                body.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(())
    }
}
