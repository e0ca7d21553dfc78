use crate::circuit_breaker::ProviderCircuitBreaker;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Candidate, PlaceDetails, NO_PLACE_ID};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

// ============ Place provider wire types ============

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceSummary>,
}

#[derive(Debug, Deserialize)]
struct PlaceSummary {
    place_id: Option<String>,
    name: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    error_message: Option<String>,
    result: Option<PlaceDetailResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailResult {
    name: Option<String>,
    formatted_address: Option<String>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    rating: Option<f64>,
    #[serde(default)]
    types: Vec<String>,
    url: Option<String>,
}

/// Client for the maps/places provider (text search + place details).
pub struct PlacesService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PlacesService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.places_base_url.clone(),
            api_key: config.places_api_key.clone(),
        }
    }

    /// Free-text search for businesses matching an industry in a city.
    ///
    /// "ZERO_RESULTS" is not an error; it yields an empty candidate list.
    pub async fn search_businesses(
        &self,
        city: &str,
        industry: &str,
    ) -> Result<Vec<Candidate>, AppError> {
        let query = format!("{} in {}", industry, city);

        // Build URL with proper parameter encoding
        let url = reqwest::Url::parse_with_params(
            &format!("{}/maps/api/place/textsearch/json", self.base_url),
            &[("query", query.as_str()), ("key", self.api_key.as_str())],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Searching places: '{}'", query);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Place search request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Place search returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Place search returned status {}: {}",
                status, error_text
            )));
        }

        let body: TextSearchResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse place search response: {}", e))
        })?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            other => {
                return Err(AppError::ExternalApiError(format!(
                    "Place search status {}: {}",
                    other,
                    body.error_message.unwrap_or_default()
                )));
            }
        }

        let candidates: Vec<Candidate> = body
            .results
            .into_iter()
            .map(|summary| Candidate {
                id: summary.place_id.unwrap_or_else(|| NO_PLACE_ID.to_string()),
                name: summary.name.unwrap_or_else(|| "Unknown Business".to_string()),
                address: summary.formatted_address.unwrap_or_default(),
                phone: None,
                rating: summary.rating,
                types: summary.types,
                website: None,
            })
            .collect();

        tracing::info!("Place search returned {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    /// Fetch richer fields for one place.
    ///
    /// A provider-side lookup failure (non-OK status) is not an error at this
    /// layer: it yields a record carrying only `enrichment_error`, which the
    /// pipeline records as a skip reason.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/maps/api/place/details/json", self.base_url),
            &[
                ("place_id", place_id),
                (
                    "fields",
                    "name,formatted_address,formatted_phone_number,website,rating,types,url",
                ),
                ("key", self.api_key.as_str()),
            ],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::debug!("Fetching place details for {}", place_id);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Place details request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApiError(format!(
                "Place details returned status {}",
                status
            )));
        }

        let body: DetailsResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse place details response: {}", e))
        })?;

        if body.status != "OK" {
            tracing::warn!(
                "Place details status {} for {}: {}",
                body.status,
                place_id,
                body.error_message.as_deref().unwrap_or("")
            );
            return Ok(PlaceDetails {
                enrichment_error: Some(format!(
                    "Place details status {}: {}",
                    body.status,
                    body.error_message.unwrap_or_default()
                )),
                ..Default::default()
            });
        }

        let result = body.result.unwrap_or(PlaceDetailResult {
            name: None,
            formatted_address: None,
            formatted_phone_number: None,
            website: None,
            rating: None,
            types: Vec::new(),
            url: None,
        });

        Ok(PlaceDetails {
            name: result.name,
            address: result.formatted_address,
            phone: result.formatted_phone_number,
            rating: result.rating,
            types: result.types,
            website: result.website,
            maps_url: result.url,
            enrichment_error: None,
        })
    }
}

/// Client for the contact-enrichment provider's organization search.
///
/// Calls run through a shared circuit breaker so a flapping provider fails
/// fast instead of stalling every candidate in a batch.
pub struct ApolloService {
    client: Client,
    base_url: String,
    api_key: String,
    breaker: ProviderCircuitBreaker,
}

impl ApolloService {
    pub fn new(config: &Config, breaker: ProviderCircuitBreaker) -> Self {
        Self {
            client: Client::new(),
            base_url: config.apollo_base_url.clone(),
            api_key: config.apollo_api_key.clone(),
            breaker,
        }
    }

    /// Search organizations by domain, returning the provider's raw JSON
    /// document (the relay endpoint preserves the exact shape).
    pub async fn search_organizations(&self, domain: &str) -> Result<Value, AppError> {
        use failsafe::futures::CircuitBreaker;

        match self.breaker.call(self.request_organizations(domain)).await {
            Ok(value) => Ok(value),
            Err(failsafe::Error::Inner(e)) => Err(e),
            Err(failsafe::Error::Rejected) => Err(AppError::ExternalApiError(
                "Enrichment provider circuit is open, failing fast".to_string(),
            )),
        }
    }

    async fn request_organizations(&self, domain: &str) -> Result<Value, AppError> {
        let url = format!("{}/v1/organizations/search", self.base_url);

        let body = json!({
            "q_organization_domain": domain,
            "page": 1,
            "per_page": 1,
        });

        tracing::info!("Fetching organization data for domain: {}", domain);
        // Redact the key from logs to prevent credential exposure
        tracing::debug!("Organization search URL: {} (X-Api-Key: [REDACTED])", url);

        let response = self
            .client
            .post(&url)
            .header("Cache-Control", "no-cache")
            .header("X-Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Organization search request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Organization search returned {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Organization search returned status {}: {}",
                status, error_text
            )));
        }

        let result: Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse organization response: {}", e))
        })?;

        tracing::info!("Successfully fetched organization data for {}", domain);
        Ok(result)
    }
}
