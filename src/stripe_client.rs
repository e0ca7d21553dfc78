use crate::errors::AppError;
use reqwest;
use std::time::Duration;
use tracing;

/// Client for the payment processor's REST API.
///
/// Only the checkout-session endpoint is used; subscription state flows back
/// through the webhook receiver, never through polling.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    /// Creates a new `StripeClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the payment API.
    /// * `secret_key` - The secret API key for authentication.
    pub fn new(base_url: String, secret_key: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create payment client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            secret_key,
        })
    }

    /// Creates a subscription-mode checkout session and returns its URL.
    ///
    /// The payment API takes form-encoded bodies with bracketed array/map
    /// keys (`line_items[0][price]`, `metadata[plan]`).
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        customer_email: &str,
        success_url: &str,
        cancel_url: &str,
        plan: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/v1/checkout/sessions", self.base_url);
        tracing::info!("Creating checkout session for plan '{}'", plan);

        let params = [
            ("mode", "subscription"),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
            ("customer_email", customer_email),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("metadata[userEmail]", customer_email),
            ("metadata[plan]", plan),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Checkout session request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Checkout session creation failed {}: {}",
                status, error_text
            )));
        }

        let data: serde_json::Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse checkout response: {}", e))
        })?;

        let session_url = data
            .get("url")
            .and_then(|u| u.as_str())
            .ok_or_else(|| {
                tracing::warn!("Unexpected checkout response format: {:?}", data);
                AppError::ExternalApiError(
                    "Checkout session response missing 'url' field".to_string(),
                )
            })?
            .to_string();

        tracing::info!("Checkout session created successfully");
        Ok(session_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = StripeClient::new(
            "https://api.stripe.com".to_string(),
            "sk_test_123".to_string(),
        );
        assert!(client.is_ok());
    }
}
