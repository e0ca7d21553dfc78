use crate::access;
use crate::broker_store::BrokerStore;
use crate::catalog;
use crate::circuit_breaker::ProviderCircuitBreaker;
use crate::config::Config;
use crate::enrichment;
use crate::errors::{AppError, ResultExt};
use crate::export;
use crate::models::*;
use crate::services::PlacesService;
use crate::stripe_client::StripeClient;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use moka::future::Cache;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (broker subscription records only).
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
    /// Place-detail response cache (1 hour TTL).
    /// Key: place id, Value: serialized `ValidatedCacheEntry`.
    pub detail_cache: Cache<String, String>,
    /// Organization response cache (24 hour TTL).
    /// Key: queried hostname, Value: serialized `ValidatedCacheEntry`.
    pub org_cache: Cache<String, String>,
    /// Circuit breaker shared by all enrichment-provider calls.
    pub enrichment_breaker: ProviderCircuitBreaker,
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "microticket-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/prospects/search
///
/// The search trigger: (city, industry) -> ordered list of enriched
/// prospects. A failure of the place search itself fails the whole request;
/// per-candidate enrichment failures surface as degraded rows instead.
///
/// When the request carries `broker_email`, the access gate is enforced here
/// as well as in the UI: blocked brokers get 401 and the pipeline is never
/// invoked.
pub async fn search_prospects(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let city = request.city.trim();
    let industry = request.industry.trim();
    tracing::info!("POST /prospects/search - city: '{}', industry: '{}'", city, industry);

    if city.is_empty() || industry.is_empty() {
        return Err(AppError::BadRequest(
            "Both city and industry are required".to_string(),
        ));
    }

    let broker = match request.broker_email.as_deref() {
        Some(email) => {
            let store = BrokerStore::new(state.db.clone());
            let profile = store.find_by_email(email).await?.ok_or_else(|| {
                AppError::Unauthorized("No broker profile for this email".to_string())
            })?;
            if access::is_blocked(&profile, Utc::now()) {
                return Err(AppError::Unauthorized(
                    "Subscription inactive or trial expired".to_string(),
                ));
            }
            Some(profile)
        }
        None => None,
    };

    let places = PlacesService::new(&state.config);
    let candidates = places
        .search_businesses(city, industry)
        .await
        .context("Place search failed")?;
    let prospects = enrichment::enrich_prospects(&state, candidates).await;

    if let Some(profile) = &broker {
        // Usage tracking must not fail a search that already completed.
        if let Err(e) = BrokerStore::new(state.db.clone())
            .record_search(profile.id)
            .await
        {
            tracing::warn!("Failed to record search usage for {}: {}", profile.email, e);
        }
    }

    Ok(Json(SearchResponse {
        city: city.to_string(),
        industry: industry.to_string(),
        count: prospects.len(),
        prospects,
    }))
}

/// GET /api/v1/places/:place_id
///
/// Detail relay. A provider-side lookup failure yields a record with only
/// `enrichmentError` set rather than an error status; callers overlay
/// whatever fields are present.
pub async fn get_place_details(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetails>, AppError> {
    if place_id.trim().is_empty() {
        return Err(AppError::BadRequest("Place id required".to_string()));
    }

    let details = enrichment::fetch_place_details_cached(&state, &place_id).await?;
    Ok(Json(details))
}

/// POST /api/v1/enrichment/organization
///
/// Same-origin relay that keeps the provider secret server-side. The 200
/// response is the provider's `{"organizations": [...]}` document verbatim,
/// since the UI depends on the exact `organizations[0]` shape. Failures
/// produce an `{"error": ...}` JSON body with a non-2xx status.
pub async fn organization_relay(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DomainLookupRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let domain = request.domain.trim();
    if domain.is_empty() {
        return Err(AppError::BadRequest("Domain required".to_string()));
    }

    tracing::info!("POST /enrichment/organization - domain: {}", domain);
    let document = enrichment::fetch_organizations_cached(&state, domain).await?;
    Ok(Json(document))
}

/// GET /api/v1/equipment/suggestions?industry=...
pub async fn equipment_suggestions(
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let industry = query.industry.trim();
    if industry.is_empty() {
        return Err(AppError::BadRequest("Industry required".to_string()));
    }

    Ok(Json(SuggestionsResponse {
        industry: catalog::resolve_bucket_label(industry).to_string(),
        suggestions: catalog::suggestions(industry),
    }))
}

/// POST /api/v1/prospects/export
///
/// Renders the posted prospects as CSV with a
/// `<city>_<industry>_enriched_businesses_<date>.csv` attachment filename.
pub async fn export_prospects(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    if request.prospects.is_empty() {
        return Err(AppError::BadRequest("Nothing to export".to_string()));
    }

    let csv = export::prospects_to_csv(&request.prospects);
    let filename =
        export::export_filename(&request.city, &request.industry, Utc::now().date_naive());

    tracing::info!(
        "Exporting {} prospect(s) as {}",
        request.prospects.len(),
        filename
    );

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((StatusCode::OK, headers, csv).into_response())
}

/// POST /api/v1/brokers/signup
///
/// Creates (or refreshes) a broker profile with a fresh trial window.
pub async fn broker_signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<BrokerProfile>), AppError> {
    let email = request.email.trim().to_lowercase();
    if !enrichment::is_valid_email(&email) {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }

    let store = BrokerStore::new(state.db.clone());
    let profile = store
        .upsert_trial(
            &email,
            request.broker_name.as_deref(),
            request.company.as_deref(),
            request.phone.as_deref(),
            request.plan.as_deref(),
            state.config.trial_days,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/v1/access/check
///
/// Exposes the access-gate rule to the UI: blocked unless the subscription is
/// active or the trial is still live.
pub async fn access_check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AccessCheckRequest>,
) -> Result<Json<AccessCheckResponse>, AppError> {
    let store = BrokerStore::new(state.db.clone());
    let profile = store
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No broker profile for {}", request.email)))?;

    Ok(Json(AccessCheckResponse {
        blocked: access::is_blocked(&profile, Utc::now()),
        subscription_status: SubscriptionStatus::parse(&profile.subscription_status)
            .as_str()
            .to_string(),
        trial_expires_at: profile.trial_expires_at,
    }))
}

/// POST /api/v1/billing/checkout
///
/// Creates a subscription checkout session for the named plan and returns
/// its URL for the UI to redirect to.
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let email = request.email.trim();
    if !enrichment::is_valid_email(email) {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }

    let price_id = match request.plan.as_str() {
        "starter" => &state.config.stripe_price_starter,
        "pro" => &state.config.stripe_price_pro,
        other => {
            return Err(AppError::BadRequest(format!("Unknown plan '{}'", other)));
        }
    };

    let success_url = format!("{}/app?payment=success", state.config.app_base_url);
    let cancel_url = format!("{}/app", state.config.app_base_url);

    let stripe = StripeClient::new(
        state.config.stripe_base_url.clone(),
        state.config.stripe_secret_key.clone(),
    )?;
    let url = stripe
        .create_checkout_session(price_id, email, &success_url, &cancel_url, &request.plan)
        .await?;

    Ok(Json(CheckoutResponse { url }))
}
