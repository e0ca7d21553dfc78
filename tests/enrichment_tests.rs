/// Unit tests for the enrichment pipeline's pure logic:
/// scoring, industry resolution, the relevance check, detail overlay,
/// hostname derivation, and input validators.
use microticket_api::enrichment::{
    derive_hostname, is_valid_email, micro_ticket_score, normalize_us_phone, overlay_details,
    relevance_rejection, resolve_industry,
};
use microticket_api::models::{Candidate, Contact, Organization, PlaceDetails};

fn candidate(name: &str, types: &[&str]) -> Candidate {
    Candidate {
        id: "pl_test".to_string(),
        name: name.to_string(),
        address: "1 Test Way".to_string(),
        phone: None,
        rating: Some(4.2),
        types: types.iter().map(|s| s.to_string()).collect(),
        website: None,
    }
}

fn contact(email: Option<&str>, phone: Option<&str>) -> Contact {
    Contact {
        name: "Test Contact".to_string(),
        title: "Owner".to_string(),
        email: email.map(String::from),
        phone: phone.map(String::from),
    }
}

#[cfg(test)]
mod scoring_tests {
    use super::*;

    #[test]
    fn test_employee_tiers() {
        assert_eq!(micro_ticket_score(Some(25), None, None, &[], "Other"), 3);
        assert_eq!(micro_ticket_score(Some(20), None, None, &[], "Other"), 3);
        assert_eq!(micro_ticket_score(Some(12), None, None, &[], "Other"), 2);
        assert_eq!(micro_ticket_score(Some(5), None, None, &[], "Other"), 1);
        assert_eq!(micro_ticket_score(Some(4), None, None, &[], "Other"), 0);
        assert_eq!(micro_ticket_score(None, None, None, &[], "Other"), 0);
    }

    #[test]
    fn test_market_cap_beats_revenue_tiers() {
        // "B" in market cap text
        assert_eq!(
            micro_ticket_score(None, Some("3.4B"), Some(100_000.0), &[], "Other"),
            3
        );
        // "M" in market cap text
        assert_eq!(
            micro_ticket_score(None, Some("250M"), Some(5_000_000.0), &[], "Other"),
            2
        );
        // Market cap present but unparseable: revenue is NOT consulted
        assert_eq!(
            micro_ticket_score(None, Some("unknown"), Some(5_000_000.0), &[], "Other"),
            0
        );
    }

    #[test]
    fn test_revenue_tiers_without_market_cap() {
        assert_eq!(
            micro_ticket_score(None, None, Some(2_000_000.0), &[], "Other"),
            3
        );
        assert_eq!(
            micro_ticket_score(None, None, Some(750_000.0), &[], "Other"),
            2
        );
        assert_eq!(
            micro_ticket_score(None, None, Some(250_000.0), &[], "Other"),
            1
        );
        assert_eq!(
            micro_ticket_score(None, None, Some(249_999.0), &[], "Other"),
            0
        );
    }

    #[test]
    fn test_contact_points() {
        let bare = [contact(None, None)];
        assert_eq!(micro_ticket_score(None, None, None, &bare, "Other"), 2);

        let with_email = [contact(Some("a@b.com"), None)];
        assert_eq!(micro_ticket_score(None, None, None, &with_email, "Other"), 3);

        let full = [contact(Some("a@b.com"), Some("+13055550123"))];
        assert_eq!(micro_ticket_score(None, None, None, &full, "Other"), 4);
    }

    #[test]
    fn test_high_fit_industry_point() {
        assert_eq!(
            micro_ticket_score(None, None, None, &[], "Medical & Healthcare"),
            1
        );
        assert_eq!(
            micro_ticket_score(None, None, None, &[], "Restaurants & Food Service"),
            1
        );
        assert_eq!(micro_ticket_score(None, None, None, &[], "Education"), 0);
    }

    #[test]
    fn test_score_is_capped_at_ten() {
        let full = [contact(Some("a@b.com"), Some("+13055550123"))];
        // 3 (employees) + 3 (B cap) + 4 (contacts) + 1 (industry) = 11 -> 10
        assert_eq!(
            micro_ticket_score(Some(50), Some("1.2B"), None, &full, "Technology"),
            10
        );
    }
}

#[cfg(test)]
mod industry_resolution_tests {
    use super::*;

    #[test]
    fn test_provider_industry_wins() {
        assert_eq!(
            resolve_industry(Some("Technology"), Some("Retail & E-commerce"), Some("Education")),
            "Technology"
        );
    }

    #[test]
    fn test_keyword_guess_beats_tag_guess() {
        assert_eq!(
            resolve_industry(None, Some("Retail & E-commerce"), Some("Education")),
            "Retail & E-commerce"
        );
    }

    #[test]
    fn test_tag_guess_is_last_resort() {
        assert_eq!(resolve_industry(None, None, Some("Education")), "Education");
    }

    #[test]
    fn test_default_when_nothing_matches() {
        assert_eq!(resolve_industry(None, None, None), "General Business");
    }

    #[test]
    fn test_general_business_never_wins_over_a_real_guess() {
        assert_eq!(
            resolve_industry(Some("General Business"), Some("Technology"), None),
            "Technology"
        );
        assert_eq!(
            resolve_industry(Some(""), Some("  "), Some("Technology")),
            "Technology"
        );
    }
}

#[cfg(test)]
mod relevance_tests {
    use super::*;

    fn org(name: &str, primary_domain: Option<&str>, website_url: Option<&str>) -> Organization {
        Organization {
            name: Some(name.to_string()),
            primary_domain: primary_domain.map(String::from),
            website_url: website_url.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_generic_google_fallback_rejected() {
        let record = org("Google", Some("google.com"), Some("https://google.com"));
        let reason = relevance_rejection("acme.com", "Acme Corp", &record);
        assert!(reason.is_some());
        assert!(reason.unwrap().contains("Google"));
    }

    #[test]
    fn test_google_domain_may_return_google() {
        let record = org("Google", Some("google.com"), None);
        assert!(relevance_rejection("maps.google.com", "Google", &record).is_none());
    }

    #[test]
    fn test_matching_primary_domain_accepted() {
        let record = org("Joe's Pizza LLC", Some("joespizza.com"), None);
        assert!(relevance_rejection("joespizza.com", "Joe's Pizza", &record).is_none());
    }

    #[test]
    fn test_matching_website_host_accepted() {
        let record = org("Joe's Pizza LLC", None, Some("https://www.joespizza.com/home"));
        assert!(relevance_rejection("joespizza.com", "Joe's Pizza", &record).is_none());
    }

    #[test]
    fn test_unrelated_org_rejected() {
        let record = org("Totally Different Inc", Some("different.com"), None);
        let reason = relevance_rejection("joespizza.com", "Joe's Pizza", &record);
        assert!(reason.is_some());
        assert!(reason.unwrap().contains("unrelated"));
    }

    #[test]
    fn test_unrelated_domain_but_equal_name_accepted() {
        // Case-insensitive name equality saves the record.
        let record = org("JOE'S PIZZA", Some("franchise-network.com"), None);
        assert!(relevance_rejection("joespizza.com", "Joe's Pizza", &record).is_none());
    }
}

#[cfg(test)]
mod overlay_tests {
    use super::*;

    #[test]
    fn test_detail_fields_win_over_summary() {
        let base = candidate("Joe's Pizza", &["restaurant"]);
        let details = PlaceDetails {
            name: Some("Joe's Pizza & Pasta".to_string()),
            phone: Some("(305) 555-0123".to_string()),
            website: Some("https://joespizza.com".to_string()),
            maps_url: Some("https://maps.google.com/?cid=42".to_string()),
            ..Default::default()
        };

        let (merged, maps_url) = overlay_details(&base, &details);
        assert_eq!(merged.name, "Joe's Pizza & Pasta");
        assert_eq!(merged.phone.as_deref(), Some("(305) 555-0123"));
        assert_eq!(merged.website.as_deref(), Some("https://joespizza.com"));
        assert_eq!(maps_url.as_deref(), Some("https://maps.google.com/?cid=42"));
    }

    #[test]
    fn test_empty_detail_fields_never_erase() {
        let mut base = candidate("Joe's Pizza", &["restaurant"]);
        base.phone = Some("(305) 555-9999".to_string());
        base.website = Some("https://joespizza.com".to_string());

        let details = PlaceDetails {
            name: Some("  ".to_string()),
            phone: Some(String::new()),
            website: None,
            ..Default::default()
        };

        let (merged, _) = overlay_details(&base, &details);
        assert_eq!(merged.name, "Joe's Pizza");
        assert_eq!(merged.phone.as_deref(), Some("(305) 555-9999"));
        assert_eq!(merged.website.as_deref(), Some("https://joespizza.com"));
        assert_eq!(merged.rating, Some(4.2));
    }

    #[test]
    fn test_detail_types_replace_only_when_present() {
        let base = candidate("Joe's Pizza", &["restaurant"]);
        let with_types = PlaceDetails {
            types: vec!["restaurant".to_string(), "meal_takeaway".to_string()],
            ..Default::default()
        };
        let (merged, _) = overlay_details(&base, &with_types);
        assert_eq!(merged.types.len(), 2);

        let without_types = PlaceDetails::default();
        let (merged, _) = overlay_details(&base, &without_types);
        assert_eq!(merged.types, vec!["restaurant".to_string()]);
    }
}

#[cfg(test)]
mod hostname_tests {
    use super::*;

    #[test]
    fn test_full_urls() {
        assert_eq!(
            derive_hostname("https://www.joespizza.com/menu").as_deref(),
            Some("joespizza.com")
        );
        assert_eq!(
            derive_hostname("http://JoesPizza.com").as_deref(),
            Some("joespizza.com")
        );
    }

    #[test]
    fn test_bare_domains() {
        assert_eq!(derive_hostname("joespizza.com").as_deref(), Some("joespizza.com"));
        assert_eq!(
            derive_hostname("www.joespizza.com").as_deref(),
            Some("joespizza.com")
        );
    }

    #[test]
    fn test_unusable_values() {
        assert_eq!(derive_hostname(""), None);
        assert_eq!(derive_hostname("   "), None);
    }
}

#[cfg(test)]
mod validator_tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("broker@example.com"));
        assert!(is_valid_email("test.user+tag@example.co.uk"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("brokerexample.com"));
        assert!(!is_valid_email("broker@examplecom"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("broker@"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("bro ker@example.com"));
    }

    #[test]
    fn test_us_phone_normalization() {
        assert_eq!(
            normalize_us_phone("(305) 555-0123").as_deref(),
            Some("+13055550123")
        );
        assert_eq!(
            normalize_us_phone("305-555-0123").as_deref(),
            Some("+13055550123")
        );
        assert_eq!(
            normalize_us_phone("+1 305 555 0123").as_deref(),
            Some("+13055550123")
        );
    }

    #[test]
    fn test_invalid_us_phones() {
        assert_eq!(normalize_us_phone(""), None);
        assert_eq!(normalize_us_phone("   "), None);
        assert_eq!(normalize_us_phone("12345"), None);
    }
}

#[cfg(test)]
mod equipment_tests {
    use microticket_api::catalog::suggestions;

    #[test]
    fn test_medical_bucket_returns_three_formatted_entries() {
        let got = suggestions("Medical & Healthcare");
        assert_eq!(got.len(), 3);
        assert_eq!(got[0], "Digital X-Ray System (Est: $15K-$45K)");
        assert_eq!(got[1], "Patient Monitoring Equipment (Est: $8K-$25K)");
        assert_eq!(got[2], "Autoclave & Sterilization Suite (Est: $5K-$15K)");
    }

    #[test]
    fn test_unknown_industry_gets_general_bucket() {
        let got = suggestions("Interpretive Dance Criticism");
        assert_eq!(got.len(), 3);
        assert!(got[0].starts_with("Office Furniture"));
    }
}
