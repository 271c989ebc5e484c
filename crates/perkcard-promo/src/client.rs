//! HTTP client for the promo endpoints behind the API gateway.
//!
//! Wraps `reqwest` with authorizer-key management, typed response
//! deserialization, and envelope checking. Every endpoint inspects the
//! `"type"` tag in the JSON envelope and surfaces backend-reported failures
//! as [`PromoError::Api`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PromoError;
use crate::types::{ApiEnvelope, PromoMap};

/// Client for the promo API gateway.
///
/// Manages the HTTP client, authorizer key, and base URL. Use
/// [`PromoClient::new`] for production or [`PromoClient::with_base_url`]
/// (same signature) to point at a mock server in tests.
pub struct PromoClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PromoClient {
    /// Creates a new client pointed at the given API gateway.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PromoError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, PromoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("perkcard/0.1 (promo-client)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends the endpoint rather than replacing the last path
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PromoError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`PromoClient::new`].
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, PromoError> {
        Self::new(base_url, api_key, timeout_secs)
    }

    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`PromoClient::new`].
    pub fn from_config(config: &perkcard_core::AppConfig) -> Result<Self, PromoError> {
        Self::new(
            &config.api_gateway_url,
            &config.api_key,
            config.request_timeout_secs,
        )
    }

    /// Fetches the promos available to one customer card.
    ///
    /// Calls `get-customer-promo-info` with the card id and the session JWT
    /// in the `Authorization` header.
    ///
    /// # Errors
    ///
    /// - [`PromoError::Api`] if the backend tags the response as an error.
    /// - [`PromoError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PromoError::Deserialize`] if the response does not match the
    ///   expected envelope shape.
    pub async fn get_customer_promo(
        &self,
        card_id: &str,
        jwt_token: &str,
    ) -> Result<PromoMap, PromoError> {
        let url = self.build_url("get-customer-promo-info", &[("card_id", card_id)])?;
        let body = self.request_json(&url, Some(jwt_token)).await?;
        Self::decode_promos(body, &format!("get-customer-promo-info(card_id={card_id})"))
    }

    /// Fetches the promo catalog, up to `limit` records per category.
    ///
    /// Calls `get-all-promo-info` with the session JWT in the
    /// `Authorization` header.
    ///
    /// # Errors
    ///
    /// - [`PromoError::Api`] if the backend tags the response as an error.
    /// - [`PromoError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PromoError::Deserialize`] if the response does not match the
    ///   expected envelope shape.
    pub async fn get_all_promo(&self, limit: u32, jwt_token: &str) -> Result<PromoMap, PromoError> {
        let url = self.build_url("get-all-promo-info", &[("limit", &limit.to_string())])?;
        let body = self.request_json(&url, Some(jwt_token)).await?;
        Self::decode_promos(body, &format!("get-all-promo-info(limit={limit})"))
    }

    /// Fetches the promos shown when a card is scanned at a business.
    ///
    /// Calls `get-customer-promo-info-on-scan` with the card id, card
    /// verification code, and business id. This endpoint sends no
    /// `Authorization` header: the card credentials are the proof of
    /// presence.
    ///
    /// # Errors
    ///
    /// - [`PromoError::Api`] if the backend tags the response as an error.
    /// - [`PromoError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PromoError::Deserialize`] if the response does not match the
    ///   expected envelope shape.
    pub async fn get_customer_promo_on_scan(
        &self,
        card_id: &str,
        card_cvc: &str,
        bus_id: &str,
    ) -> Result<PromoMap, PromoError> {
        let url = self.build_url(
            "get-customer-promo-info-on-scan",
            &[
                ("card_id", card_id),
                ("card_cvc", card_cvc),
                ("bus_id", bus_id),
            ],
        )?;
        let body = self.request_json(&url, None).await?;
        Self::decode_promos(
            body,
            &format!("get-customer-promo-info-on-scan(card_id={card_id}, bus_id={bus_id})"),
        )
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters.
    ///
    /// Joins `endpoint` onto the stored base URL and appends the
    /// `authorizer` key plus any additional parameters via
    /// [`Url::query_pairs_mut`], ensuring all values are safely encoded.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, PromoError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PromoError::Api(format!("invalid endpoint '{endpoint}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("authorizer", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON. When `auth` is set, its value is sent as the
    /// `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::Http`] on network failure or a non-2xx status.
    /// Returns [`PromoError::Deserialize`] if the body is not valid JSON.
    async fn request_json(
        &self,
        url: &Url,
        auth: Option<&str>,
    ) -> Result<serde_json::Value, PromoError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = auth {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }
        let response = request.send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PromoError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Checks the envelope `"type"` tag and extracts the promo mapping.
    ///
    /// A `"error"` tag becomes [`PromoError::Api`] with the backend's
    /// message (or a generic one). Anything other than a well-formed
    /// `"success"` envelope is rejected rather than passed downstream.
    fn decode_promos(body: serde_json::Value, context: &str) -> Result<PromoMap, PromoError> {
        match body.get("type").and_then(serde_json::Value::as_str) {
            Some("error") => {
                let msg = body
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("backend reported error")
                    .to_string();
                Err(PromoError::Api(msg))
            }
            Some("success") => {
                let envelope: ApiEnvelope =
                    serde_json::from_value(body).map_err(|e| PromoError::Deserialize {
                        context: context.to_string(),
                        source: e,
                    })?;
                Ok(envelope.data.promo)
            }
            _ => Err(PromoError::Api(format!(
                "unexpected response envelope for {context}"
            ))),
        }
    }
}
