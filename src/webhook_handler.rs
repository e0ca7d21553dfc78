use crate::broker_store::BrokerStore;
use crate::enrichment::is_valid_email;
use crate::errors::{AppError, ResultExt};
use crate::handlers::AppState;
use crate::webhook_models::{CheckoutSession, StripeEvent, WebhookAck};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a webhook signature timestamp. Matches the
/// processor's own retry cadence; anything older is a replay.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Payment webhook handler.
///
/// Receives events from the payment processor. The signature is verified
/// against the shared endpoint secret before the body is parsed; a failure is
/// fatal to this request only (400) and the processor's retry policy applies.
/// On `checkout.session.completed` the matching broker record is activated.
/// Unknown event types are acknowledged and ignored.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookAck>), AppError> {
    tracing::info!("Received payment webhook");

    let signature = headers
        .get("Stripe-Signature")
        .or_else(|| headers.get("stripe-signature"))
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".to_string()))?;

    verify_signature(
        &state.config.stripe_webhook_secret,
        signature,
        &body,
        Utc::now().timestamp(),
    )?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {}", e)))?;

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            process_checkout_completed(&state, event.data.object).await?;
        }
        other => {
            tracing::info!("Unhandled webhook event type: {}", other);
        }
    }

    Ok((StatusCode::OK, Json(WebhookAck { received: true })))
}

/// Verify the `Stripe-Signature` header against the endpoint secret.
///
/// Header format: `t=<unix>,v1=<hex>,...`; the signed payload is
/// `"<t>.<raw body>"` and the scheme is HMAC-SHA256. Multiple `v1` entries
/// may be present (secret rotation); any match passes. The timestamp must be
/// within [`SIGNATURE_TOLERANCE_SECS`] of now.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: i64,
) -> Result<(), AppError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in header.split(',') {
        if let Some((key, value)) = part.trim().split_once('=') {
            match key {
                "t" => timestamp = value.parse().ok(),
                "v1" => candidates.push(value),
                _ => {}
            }
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| AppError::BadRequest("Malformed Stripe-Signature header".to_string()))?;

    if candidates.is_empty() {
        return Err(AppError::BadRequest(
            "Stripe-Signature header has no v1 signature".to_string(),
        ));
    }

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        tracing::warn!("Webhook signature timestamp outside tolerance: {}", timestamp);
        return Err(AppError::BadRequest(
            "Webhook signature timestamp outside tolerance".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::InternalError(format!("Invalid webhook secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());

    if candidates
        .iter()
        .any(|candidate| constant_time_compare(candidate, &expected))
    {
        Ok(())
    } else {
        tracing::warn!("Webhook signature verification failed");
        Err(AppError::BadRequest(
            "Webhook signature verification failed".to_string(),
        ))
    }
}

/// Constant-time string comparison (basic implementation)
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Activate the broker record named by a completed checkout session.
///
/// A session without a resolvable email or payment identifiers is logged and
/// acknowledged; only database failures bubble up (the processor will retry).
async fn process_checkout_completed(
    state: &Arc<AppState>,
    object: serde_json::Value,
) -> Result<(), AppError> {
    let session: CheckoutSession = serde_json::from_value(object)
        .map_err(|e| AppError::BadRequest(format!("Invalid checkout session object: {}", e)))?;

    let Some(email) = session.email() else {
        tracing::warn!("Checkout session completed without an email; ignoring");
        return Ok(());
    };

    if !is_valid_email(email) {
        tracing::warn!("Checkout session carried invalid email '{}'; ignoring", email);
        return Ok(());
    }

    let (Some(customer_id), Some(subscription_id)) =
        (session.customer.as_deref(), session.subscription.as_deref())
    else {
        tracing::warn!(
            "Checkout session for {} missing customer/subscription ids; ignoring",
            email
        );
        return Ok(());
    };

    let store = BrokerStore::new(state.db.clone());
    store
        .apply_checkout_completed(email, customer_id, subscription_id)
        .await
        .context("Failed to activate subscription from checkout session")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_passes() {
        let secret = "whsec_test";
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = format!("t={},v1={}", now, sign(secret, now, payload));

        assert!(verify_signature(secret, &header, payload, now).is_ok());
    }

    #[test]
    fn any_matching_v1_passes() {
        let secret = "whsec_test";
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!(
            "t={},v1={},v1={}",
            now,
            "0".repeat(64),
            sign(secret, now, payload)
        );

        assert!(verify_signature(secret, &header, payload, now).is_ok());
    }

    #[test]
    fn tampered_payload_fails() {
        let secret = "whsec_test";
        let now = 1_700_000_000;
        let header = format!("t={},v1={}", now, sign(secret, now, b"original"));

        assert!(verify_signature(secret, &header, b"tampered", now).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={},v1={}", now, sign("whsec_other", now, payload));

        assert!(verify_signature("whsec_test", &header, payload, now).is_err());
    }

    #[test]
    fn stale_timestamp_fails() {
        let secret = "whsec_test";
        let payload = b"{}";
        let signed_at = 1_700_000_000;
        let header = format!("t={},v1={}", signed_at, sign(secret, signed_at, payload));

        let now = signed_at + SIGNATURE_TOLERANCE_SECS + 1;
        assert!(verify_signature(secret, &header, payload, now).is_err());
    }

    #[test]
    fn malformed_header_fails() {
        assert!(verify_signature("whsec_test", "not-a-header", b"{}", 0).is_err());
        assert!(verify_signature("whsec_test", "t=123", b"{}", 123).is_err());
    }

    #[test]
    fn constant_time_compare_basics() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
