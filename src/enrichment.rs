/// Prospect enrichment pipeline shared by the search endpoint and the relay
/// handlers.
///
/// Per candidate the pipeline:
/// 1. Fetches place details once (when a usable place id exists) and overlays
///    them onto the candidate, never erasing a present field with an empty one
/// 2. Computes two fallback industry guesses (category tags, name keywords)
/// 3. Derives a hostname from the website and queries the contact-enrichment
///    provider for an organization record
/// 4. Discards organization records unrelated to the queried business
/// 5. Resolves one industry label and computes the deal-fit score
///
/// A failure in any single candidate degrades that row only; the batch always
/// completes in input order.
use crate::cache_validator::ValidatedCacheEntry;
use crate::catalog::{self, GENERAL_BUSINESS, HIGH_FIT_INDUSTRIES};
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{
    Candidate, Contact, EnrichedProspect, Organization, OrganizationSearchResponse, PlaceDetails,
    NO_PLACE_ID,
};
use crate::services::{ApolloService, PlacesService};
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;
use regex::Regex;
use std::sync::Arc;
use url::Url;

/// Validate email address
///
/// Checks basic shape first, then a simplified RFC 5322 regex. Used by the
/// payment webhook before looking up a broker record.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    // RFC 5322 simplified email regex
    // Matches: local@domain.tld
    let email_regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    if !email_regex.is_match(email) {
        tracing::warn!("Invalid email format: {}", email);
        return false;
    }

    true
}

/// Normalize a US phone number to E.164 (+13055550123).
///
/// Returns `None` when the input does not parse as a valid US number; callers
/// keep the raw provider value in that case.
pub fn normalize_us_phone(raw: &str) -> Option<String> {
    if raw.trim().is_empty() || raw.len() < 7 {
        return None;
    }

    match phonenumber::parse(Some(CountryId::US), raw) {
        Ok(number) if phonenumber::is_valid(&number) => {
            Some(number.format().mode(Mode::E164).to_string())
        }
        Ok(_) => {
            tracing::debug!("Invalid US phone number: {}", raw);
            None
        }
        Err(e) => {
            tracing::debug!("Failed to parse US phone '{}': {:?}", raw, e);
            None
        }
    }
}

/// Derive a lowercase hostname from a website value, tolerating bare domains
/// without a scheme. Leading "www." is stripped so host comparisons line up
/// with the enrichment provider's primary_domain values.
pub fn derive_hostname(website: &str) -> Option<String> {
    let trimmed = website.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&with_scheme).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Resolves the single displayed industry from up to three guesses, in
/// precedence order: provider-returned, keyword-matched, tag-mapped.
/// "General Business" is a fallback, never a winner.
pub fn resolve_industry(
    provider: Option<&str>,
    keyword_guess: Option<&str>,
    tag_guess: Option<&str>,
) -> String {
    [provider, keyword_guess, tag_guess]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty() && *s != GENERAL_BUSINESS)
        .unwrap_or(GENERAL_BUSINESS)
        .to_string()
}

/// Guard against the enrichment provider returning an unrelated "closest
/// guess" organization.
///
/// Rejects when the provider returned its generic "Google" fallback for a
/// non-Google domain, or when neither the provider's primary domain nor its
/// website host matches the queried host and the names differ too.
///
/// Returns the skip reason when the record must be discarded.
pub fn relevance_rejection(
    queried_host: &str,
    queried_name: &str,
    org: &Organization,
) -> Option<String> {
    let org_name = org.name.as_deref().unwrap_or("").to_lowercase();
    let primary_domain = org.primary_domain.as_deref().unwrap_or("").to_lowercase();
    let website_host = org
        .website_url
        .as_deref()
        .and_then(derive_hostname)
        .unwrap_or_default();

    if org_name == "google" && !queried_host.contains("google") {
        return Some(format!(
            "Provider returned generic 'Google' data for non-Google domain {}",
            queried_host
        ));
    }

    let domain_matches = (!primary_domain.is_empty() && queried_host.contains(&primary_domain))
        || (!website_host.is_empty() && queried_host.contains(&website_host));

    if !domain_matches && queried_name.to_lowercase() != org_name {
        let provider_domain = if primary_domain.is_empty() {
            website_host
        } else {
            primary_domain
        };
        return Some(format!(
            "Provider returned data for '{}' (domain: {}) which seems unrelated to queried domain '{}'",
            org.name.as_deref().unwrap_or("unknown"),
            provider_domain,
            queried_host
        ));
    }

    None
}

/// Deal-fit score for an accepted organization record.
///
/// Bounded sub-scores: employee tiers, market-cap/revenue tiers, contact
/// completeness, high-fit industry membership. Capped at 10. Callers force 0
/// when enrichment was skipped or rejected.
pub fn micro_ticket_score(
    employee_count: Option<u32>,
    market_cap: Option<&str>,
    estimated_annual_revenue: Option<f64>,
    contacts: &[Contact],
    industry: &str,
) -> u8 {
    let mut score: u8 = 0;

    let employees = employee_count.unwrap_or(0);
    if employees >= 20 {
        score += 3;
    } else if employees >= 10 {
        score += 2;
    } else if employees >= 5 {
        score += 1;
    }

    // Market-cap text wins over the revenue tiers when present at all.
    match market_cap.map(str::trim).filter(|c| !c.is_empty()) {
        Some(cap) => {
            if cap.contains('B') {
                score += 3;
            } else if cap.contains('M') {
                score += 2;
            }
        }
        None => {
            if let Some(revenue) = estimated_annual_revenue {
                if revenue >= 2_000_000.0 {
                    score += 3;
                } else if revenue >= 750_000.0 {
                    score += 2;
                } else if revenue >= 250_000.0 {
                    score += 1;
                }
            }
        }
    }

    if let Some(first) = contacts.first() {
        score += 2;
        if first.email.is_some() {
            score += 1;
        }
        if first.phone.is_some() {
            score += 1;
        }
    }

    if HIGH_FIT_INDUSTRIES.contains(&industry) {
        score += 1;
    }

    score.min(10)
}

/// Overlays non-empty detail fields onto a candidate (detail wins over
/// summary, but never overwrites a present field with an empty one).
/// Returns the merged candidate and the canonical maps URL when present.
pub fn overlay_details(candidate: &Candidate, details: &PlaceDetails) -> (Candidate, Option<String>) {
    fn pick(detail: &Option<String>, base: &Option<String>) -> Option<String> {
        match detail.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => detail.clone(),
            _ => base.clone(),
        }
    }

    let merged = Candidate {
        id: candidate.id.clone(),
        name: details
            .name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| candidate.name.clone()),
        address: details
            .address
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| candidate.address.clone()),
        phone: pick(&details.phone, &candidate.phone),
        rating: details.rating.or(candidate.rating),
        types: if details.types.is_empty() {
            candidate.types.clone()
        } else {
            details.types.clone()
        },
        website: pick(&details.website, &candidate.website),
    };

    (merged, details.maps_url.clone())
}

/// Outcome of the contact-enrichment lookup for one candidate.
enum OrgOutcome {
    /// Record passed the relevance check and may be mapped onto the prospect.
    Accepted(Box<Organization>),
    /// No lookup was possible or the record was discarded; carries the reason.
    Skipped(String),
    /// The provider call itself failed; carries the error message.
    Failed(String),
}

/// Fetch the provider's organization document for a domain, with a validated
/// cache in front (24 h TTL). Returns the raw JSON value so the relay endpoint
/// can preserve the exact wire shape.
pub async fn fetch_organizations_cached(
    state: &Arc<AppState>,
    domain: &str,
) -> Result<serde_json::Value, AppError> {
    if let Some(cached) = state.org_cache.get(domain).await {
        if let Some(valid) = ValidatedCacheEntry::deserialize_and_validate(&cached) {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&valid) {
                tracing::debug!("Organization cache HIT for domain {}", domain);
                return Ok(value);
            }
        }
        tracing::warn!("Discarding invalid organization cache entry for {}", domain);
    }

    let apollo = ApolloService::new(&state.config, state.enrichment_breaker.clone());
    let value = apollo.search_organizations(domain).await?;

    let entry = ValidatedCacheEntry::new(value.to_string());
    state
        .org_cache
        .insert(domain.to_string(), entry.serialize())
        .await;

    Ok(value)
}

/// Fetch place details for a place id, with a validated cache in front (1 h
/// TTL). Degraded responses (details carrying only an error) are not cached.
pub async fn fetch_place_details_cached(
    state: &Arc<AppState>,
    place_id: &str,
) -> Result<PlaceDetails, AppError> {
    if let Some(cached) = state.detail_cache.get(place_id).await {
        if let Some(valid) = ValidatedCacheEntry::deserialize_and_validate(&cached) {
            if let Ok(details) = serde_json::from_str::<PlaceDetails>(&valid) {
                tracing::debug!("Place details cache HIT for {}", place_id);
                return Ok(details);
            }
        }
        tracing::warn!("Discarding invalid place details cache entry for {}", place_id);
    }

    let places = PlacesService::new(&state.config);
    let details = places.place_details(place_id).await?;

    if details.enrichment_error.is_none() {
        let serialized = serde_json::to_string(&details)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize details: {}", e)))?;
        let entry = ValidatedCacheEntry::new(serialized);
        state
            .detail_cache
            .insert(place_id.to_string(), entry.serialize())
            .await;
    }

    Ok(details)
}

/// Enrich a batch of candidates, strictly sequentially and in input order.
///
/// A failed candidate is emitted with score 0, the best available industry
/// guess, and an error message; it never aborts the batch.
pub async fn enrich_prospects(
    state: &Arc<AppState>,
    candidates: Vec<Candidate>,
) -> Vec<EnrichedProspect> {
    tracing::info!("Enriching {} candidate(s)", candidates.len());

    let mut enriched = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let prospect = match enrich_one(state, &candidate).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Enrichment failed for '{}': {}", candidate.name, e);
                degraded_prospect(&candidate, e.to_string())
            }
        };
        enriched.push(prospect);
    }

    tracing::info!("Finished enriching prospects: {}", enriched.len());
    enriched
}

/// Run the full per-candidate algorithm.
async fn enrich_one(
    state: &Arc<AppState>,
    candidate: &Candidate,
) -> Result<EnrichedProspect, AppError> {
    // Step 1: place details (at most once per candidate)
    let mut detail_error: Option<String> = None;
    let (merged, maps_url) = if usable_place_id(&candidate.id) {
        match fetch_place_details_cached(state, &candidate.id).await {
            Ok(details) => {
                if let Some(err) = &details.enrichment_error {
                    tracing::warn!("Place details for '{}' degraded: {}", candidate.name, err);
                    detail_error = Some(err.clone());
                }
                overlay_details(candidate, &details)
            }
            Err(e) => {
                tracing::warn!("Place details fetch failed for '{}': {}", candidate.name, e);
                detail_error = Some(e.to_string());
                (candidate.clone(), None)
            }
        }
    } else {
        tracing::warn!("Skipping place details for '{}': no usable place id", candidate.name);
        detail_error = Some("Missing place id for details".to_string());
        (candidate.clone(), None)
    };

    // Step 2: fallback industry guesses
    let tag_guess = catalog::tag_industry(&merged.types);
    let keyword_guess = catalog::keyword_industry(&merged.name, &merged.types);

    // Step 3: organization lookup (requires a website and a clean detail step)
    let outcome = if detail_error.is_some() {
        OrgOutcome::Skipped(format!(
            "Skipped due to place details error: {}",
            detail_error.as_deref().unwrap_or("unknown")
        ))
    } else {
        match merged.website.as_deref() {
            Some(website) => match derive_hostname(website) {
                Some(host) => lookup_organization(state, &host, &merged.name).await,
                None => OrgOutcome::Skipped(format!(
                    "Could not derive a hostname from '{}'",
                    website
                )),
            },
            None => {
                OrgOutcome::Skipped("Missing website for organization enrichment".to_string())
            }
        }
    };

    // Steps 4-7: map, resolve industry, score
    let prospect = match outcome {
        OrgOutcome::Accepted(org) => {
            let industry =
                resolve_industry(org.industry.as_deref(), keyword_guess, tag_guess);
            let contacts = map_contacts(&org);
            let score = micro_ticket_score(
                org.estimated_num_employees,
                org.market_cap.as_deref(),
                org.annual_revenue,
                &contacts,
                &industry,
            );

            EnrichedProspect {
                id: merged.id.clone(),
                name: merged.name.clone(),
                address: merged.address.clone(),
                phone: merged.phone.clone(),
                rating: merged.rating,
                types: merged.types.clone(),
                website: org.website_url.clone().or_else(|| merged.website.clone()),
                maps_url,
                industry,
                employee_count: org.estimated_num_employees,
                employee_range: org
                    .employees_range
                    .clone()
                    .or_else(|| org.headcount_range.clone()),
                revenue: org
                    .annual_revenue_formatted
                    .clone()
                    .or_else(|| org.revenue_range.clone()),
                estimated_annual_revenue: org.annual_revenue,
                market_cap: org.market_cap.clone(),
                founded_year: org.founded_year,
                keywords: org.keywords.clone().unwrap_or_default(),
                contacts,
                micro_ticket_score: score,
                enrichment_error: None,
                enrichment_skipped_reason: None,
            }
        }
        OrgOutcome::Skipped(reason) => {
            tracing::info!("Enrichment skipped for '{}': {}", merged.name, reason);
            let industry = resolve_industry(None, keyword_guess, tag_guess);
            let mut prospect = shell_prospect(&merged, maps_url, industry);
            prospect.enrichment_skipped_reason = Some(reason);
            prospect.enrichment_error = detail_error;
            prospect
        }
        OrgOutcome::Failed(message) => {
            tracing::warn!("Enrichment failed for '{}': {}", merged.name, message);
            let industry = resolve_industry(None, keyword_guess, tag_guess);
            let mut prospect = shell_prospect(&merged, maps_url, industry);
            prospect.enrichment_error = Some(message);
            prospect
        }
    };

    Ok(prospect)
}

fn usable_place_id(id: &str) -> bool {
    !id.trim().is_empty() && id != NO_PLACE_ID
}

/// Query the enrichment provider and apply the relevance check.
async fn lookup_organization(state: &Arc<AppState>, host: &str, queried_name: &str) -> OrgOutcome {
    let value = match fetch_organizations_cached(state, host).await {
        Ok(v) => v,
        Err(e) => return OrgOutcome::Failed(format!("Organization lookup failed: {}", e)),
    };

    let response: OrganizationSearchResponse = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return OrgOutcome::Failed(format!("Failed to parse organization response: {}", e))
        }
    };

    let Some(org) = response.organizations.into_iter().next() else {
        return OrgOutcome::Skipped(format!("No organization found for domain {}", host));
    };

    if let Some(reason) = relevance_rejection(host, queried_name, &org) {
        tracing::warn!("Discarding organization record: {}", reason);
        return OrgOutcome::Skipped(reason);
    }

    OrgOutcome::Accepted(Box::new(org))
}

/// Map provider personnel to display contacts, truncated to the first two.
/// Falls back to a single general contact built from the organization's
/// primary phone when no personnel are listed.
fn map_contacts(org: &Organization) -> Vec<Contact> {
    let people: Vec<Contact> = org
        .people
        .iter()
        .take(2)
        .map(|p| Contact {
            name: p
                .name
                .clone()
                .unwrap_or_else(|| "Main Contact".to_string()),
            title: p
                .title
                .clone()
                .unwrap_or_else(|| "General Contact".to_string()),
            email: p.email.clone(),
            phone: p
                .phone
                .clone()
                .map(|raw| normalize_us_phone(&raw).unwrap_or(raw)),
        })
        .collect();

    if !people.is_empty() {
        return people;
    }

    let Some(phone) = &org.primary_phone else {
        return Vec::new();
    };

    let number = phone
        .sanitized_number
        .clone()
        .or_else(|| phone.number.clone())
        .map(|raw| normalize_us_phone(&raw).unwrap_or(raw));

    match number {
        Some(number) => vec![Contact {
            name: org.name.clone().unwrap_or_else(|| "Main Contact".to_string()),
            title: "General Contact".to_string(),
            email: None,
            phone: Some(number),
        }],
        None => Vec::new(),
    }
}

/// Prospect shell with no organization data and score 0.
fn shell_prospect(merged: &Candidate, maps_url: Option<String>, industry: String) -> EnrichedProspect {
    EnrichedProspect {
        id: merged.id.clone(),
        name: merged.name.clone(),
        address: merged.address.clone(),
        phone: merged.phone.clone(),
        rating: merged.rating,
        types: merged.types.clone(),
        website: merged.website.clone(),
        maps_url,
        industry,
        employee_count: None,
        employee_range: None,
        revenue: None,
        estimated_annual_revenue: None,
        market_cap: None,
        founded_year: None,
        keywords: Vec::new(),
        contacts: Vec::new(),
        micro_ticket_score: 0,
        enrichment_error: None,
        enrichment_skipped_reason: None,
    }
}

/// Emitted when the per-candidate workflow itself errored: score 0, best
/// available industry guess, and the error message.
fn degraded_prospect(candidate: &Candidate, error: String) -> EnrichedProspect {
    let tag_guess = catalog::tag_industry(&candidate.types);
    let keyword_guess = catalog::keyword_industry(&candidate.name, &candidate.types);
    let industry = resolve_industry(None, keyword_guess, tag_guess);

    let mut prospect = shell_prospect(candidate, None, industry);
    prospect.enrichment_error = Some(error);
    prospect
}
