use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ============ Place models ============

/// Sentinel used when the place provider returns a result without an id.
/// Such candidates are displayable but cannot be detail-fetched.
pub const NO_PLACE_ID: &str = "NO_PLACE_ID";

/// A business returned by the place text search, pre-enrichment.
///
/// Immutable once fetched; optional fields are filled in later by the
/// detail fetch (which never erases a present value with an empty one).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Place identifier, or [`NO_PLACE_ID`] when the provider omitted one.
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub rating: Option<f64>,
    /// Category tags as returned by the place provider (e.g. "restaurant").
    #[serde(default)]
    pub types: Vec<String>,
    pub website: Option<String>,
}

/// Richer per-place record from the detail fetch.
///
/// `enrichment_error` carries a provider-side failure without failing the
/// request: a details response may consist of nothing but that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
    pub website: Option<String>,
    /// Canonical maps URL for the place.
    pub maps_url: Option<String>,
    pub enrichment_error: Option<String>,
}

// ============ Organization provider models ============
//
// Field names below follow the enrichment provider's JSON document; the UI
// depends on the exact `organizations[0]` shape relayed by the service.

/// Primary phone block inside an organization document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationPhone {
    pub number: Option<String>,
    pub sanitized_number: Option<String>,
}

/// A person attached to an organization document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationPerson {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// One organization as returned by the contact-enrichment provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organization {
    pub name: Option<String>,
    pub primary_domain: Option<String>,
    pub website_url: Option<String>,
    pub estimated_num_employees: Option<u32>,
    pub industry: Option<String>,
    pub founded_year: Option<i32>,
    pub keywords: Option<Vec<String>>,
    pub market_cap: Option<String>,
    pub annual_revenue: Option<f64>,
    pub annual_revenue_formatted: Option<String>,
    pub revenue_range: Option<String>,
    pub employees_range: Option<String>,
    pub headcount_range: Option<String>,
    pub primary_phone: Option<OrganizationPhone>,
    #[serde(default)]
    pub people: Vec<OrganizationPerson>,
}

/// Wire shape of the provider's organization search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationSearchResponse {
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

// ============ Enriched prospect ============

/// A displayable contact attached to an enriched prospect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub title: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The result entity shown to the user: place fields, accepted organization
/// fields, one resolved industry, and a bounded deal-fit score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProspect {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
    /// Resolved industry label; never empty, defaults to "General Business".
    pub industry: String,
    pub employee_count: Option<u32>,
    pub employee_range: Option<String>,
    /// Printed revenue band (e.g. "$1M - $5M"), when the provider supplied one.
    pub revenue: Option<String>,
    pub estimated_annual_revenue: Option<f64>,
    pub market_cap: Option<String>,
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Personnel for display, truncated to the first two entries.
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Deal-fit score in [0, 10]; always 0 when enrichment was skipped or rejected.
    pub micro_ticket_score: u8,
    pub enrichment_error: Option<String>,
    pub enrichment_skipped_reason: Option<String>,
}

// ============ Broker (user) models ============

/// Subscription state as stored on the broker record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Inactive,
}

impl SubscriptionStatus {
    /// Parses the stored text form; anything unrecognized is treated as inactive.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "trial" => SubscriptionStatus::Trial,
            "active" => SubscriptionStatus::Active,
            _ => SubscriptionStatus::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
        }
    }
}

/// A broker's persisted account record (the only persistent entity in the
/// system; prospect data is request-scoped).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BrokerProfile {
    pub id: Uuid,
    pub email: String,
    pub broker_name: String,
    pub company: String,
    pub phone: Option<String>,
    /// "trial" | "active" | "inactive"; parse with [`SubscriptionStatus::parse`].
    pub subscription_status: String,
    pub subscription_plan: Option<String>,
    pub trial_expires_at: Option<DateTime<Utc>>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub monthly_searches_used: i32,
    pub monthly_search_limit: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ============ Request / response types ============

/// Body for `POST /api/v1/prospects/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub city: String,
    pub industry: String,
    /// When present, the access gate is enforced server-side for this broker.
    pub broker_email: Option<String>,
}

/// Response for `POST /api/v1/prospects/search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub city: String,
    pub industry: String,
    pub count: usize,
    pub prospects: Vec<EnrichedProspect>,
}

/// Body for the organization relay endpoint (`{ "domain": "..." }`).
#[derive(Debug, Deserialize)]
pub struct DomainLookupRequest {
    pub domain: String,
}

/// Query for `GET /api/v1/equipment/suggestions`.
#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub industry: String,
}

/// Response for the equipment suggestions endpoint.
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    /// The catalog bucket the query resolved to.
    pub industry: String,
    /// Top entries formatted as "<equipment> (Est: <budget range>)".
    pub suggestions: Vec<String>,
}

/// Body for `POST /api/v1/prospects/export`.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub city: String,
    pub industry: String,
    pub prospects: Vec<EnrichedProspect>,
}

/// Body for `POST /api/v1/billing/checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// "starter" or "pro".
    pub plan: String,
    pub email: String,
}

/// Response for `POST /api/v1/billing/checkout`.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Body for `POST /api/v1/brokers/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub broker_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub plan: Option<String>,
}

/// Body for `POST /api/v1/access/check`.
#[derive(Debug, Deserialize)]
pub struct AccessCheckRequest {
    pub email: String,
}

/// Response for `POST /api/v1/access/check`.
#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    pub blocked: bool,
    pub subscription_status: String,
    pub trial_expires_at: Option<DateTime<Utc>>,
}
