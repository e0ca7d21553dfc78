//! Subscription access gate.
//!
//! One rule, applied both by the explicit check endpoint and by the search
//! endpoint when the caller identifies itself:
//!
//! `blocked = !(status == active || (status == trial && now < trial_expires_at))`
//!
//! Payment-processor identifiers are deliberately NOT required during an
//! active trial: they only exist after the first completed checkout, and a
//! trial account has not checked out yet.

use crate::models::{BrokerProfile, SubscriptionStatus};
use chrono::{DateTime, Utc};

/// Whether the broker may invoke the enrichment pipeline.
pub fn is_blocked(profile: &BrokerProfile, now: DateTime<Utc>) -> bool {
    match SubscriptionStatus::parse(&profile.subscription_status) {
        SubscriptionStatus::Active => false,
        SubscriptionStatus::Trial => match profile.trial_expires_at {
            Some(expiry) => now >= expiry,
            // A trial without an expiry timestamp cannot be verified as live.
            None => true,
        },
        SubscriptionStatus::Inactive => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn profile(status: &str, trial_expires_at: Option<DateTime<Utc>>) -> BrokerProfile {
        BrokerProfile {
            id: Uuid::new_v4(),
            email: "broker@example.com".to_string(),
            broker_name: "Test Broker".to_string(),
            company: "Test Co".to_string(),
            phone: None,
            subscription_status: status.to_string(),
            subscription_plan: Some("starter".to_string()),
            trial_expires_at,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            monthly_searches_used: 0,
            monthly_search_limit: 999,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn active_is_never_blocked() {
        let now = Utc::now();
        assert!(!is_blocked(&profile("active", None), now));
    }

    #[test]
    fn live_trial_is_not_blocked_without_payment_ids() {
        let now = Utc::now();
        let p = profile("trial", Some(now + Duration::days(2)));
        assert!(p.stripe_subscription_id.is_none());
        assert!(!is_blocked(&p, now));
    }

    #[test]
    fn expired_trial_is_blocked() {
        let now = Utc::now();
        let p = profile("trial", Some(now - Duration::hours(1)));
        assert!(is_blocked(&p, now));
    }

    #[test]
    fn trial_without_expiry_is_blocked() {
        assert!(is_blocked(&profile("trial", None), Utc::now()));
    }

    #[test]
    fn inactive_and_unknown_statuses_are_blocked() {
        let now = Utc::now();
        assert!(is_blocked(&profile("inactive", None), now));
        assert!(is_blocked(&profile("cancelled", None), now));
        assert!(is_blocked(&profile("", None), now));
    }
}
