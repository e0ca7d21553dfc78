use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Envelope of a payment-processor webhook event.
///
/// Only the fields the receiver acts on are modeled; `data.object` stays a
/// raw value until the event type is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// The checkout session object carried by `checkout.session.completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Payment-processor customer id.
    pub customer: Option<String>,
    /// Payment-processor subscription id.
    pub subscription: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
}

impl CheckoutSession {
    /// The email used to look up the broker record: the customer-entered
    /// checkout email first, then the metadata carried from session creation.
    pub fn email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .or_else(|| self.metadata.get("email").map(String::as_str))
            .or_else(|| self.metadata.get("userEmail").map(String::as_str))
    }
}

/// Acknowledgement body returned to the payment processor.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_prefers_customer_details() {
        let session: CheckoutSession = serde_json::from_value(json!({
            "customer": "cus_123",
            "subscription": "sub_456",
            "customer_details": {"email": "paid@example.com"},
            "metadata": {"userEmail": "meta@example.com"}
        }))
        .unwrap();
        assert_eq!(session.email(), Some("paid@example.com"));
    }

    #[test]
    fn email_falls_back_to_metadata() {
        let session: CheckoutSession = serde_json::from_value(json!({
            "metadata": {"userEmail": "meta@example.com"}
        }))
        .unwrap();
        assert_eq!(session.email(), Some("meta@example.com"));
    }

    #[test]
    fn event_type_is_read_from_type_field() {
        let event: StripeEvent = serde_json::from_value(json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {}}
        }))
        .unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
    }
}
