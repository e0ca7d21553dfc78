//! Static industry and equipment lookup tables.
//!
//! Two fixed tables drive the fallback industry guesses and the equipment
//! suggestions shown next to each prospect. Both lookups are pure functions
//! over the tables; nothing here touches the network or the database.

/// Fallback industry label when nothing matches.
pub const GENERAL_BUSINESS: &str = "General Business";

/// Industries with a strong fit for small-dollar equipment financing.
/// Membership adds one point to the deal-fit score.
pub const HIGH_FIT_INDUSTRIES: [&str; 5] = [
    "Medical & Healthcare",
    "Auto Repair & Service",
    "Construction & Contractors",
    "Technology",
    "Restaurants & Food Service",
];

/// Industry label -> lowercase keywords matched against business names and
/// category tags. Order matters: the first matching industry wins.
pub const INDUSTRY_KEYWORDS: [(&str, &[&str]); 10] = [
    (
        "Medical & Healthcare",
        &[
            "medical",
            "healthcare",
            "clinic",
            "hospital",
            "dental",
            "veterinary",
            "doctor",
            "health",
        ],
    ),
    (
        "Restaurants & Food Service",
        &[
            "restaurant",
            "cafe",
            "bakery",
            "diner",
            "kitchen",
            "food service",
            "food",
            "meal",
        ],
    ),
    (
        "Retail & E-commerce",
        &["store", "shop", "retail", "boutique", "market", "mall", "e-commerce"],
    ),
    (
        "Fitness & Wellness",
        &["gym", "fitness", "yoga", "pilates", "massage", "spa", "salon", "wellness"],
    ),
    (
        "Professional Services",
        &["consulting", "law", "accounting", "insurance", "real estate", "agency"],
    ),
    (
        "Technology",
        &[
            "software",
            "tech",
            "computer",
            "digital",
            "data",
            "saas",
            "information technology & services",
            "internet",
            "computer software",
        ],
    ),
    (
        "Education",
        &["school", "university", "college", "academy", "training", "education"],
    ),
    (
        "Construction & Contractors",
        &[
            "construction",
            "contractor",
            "builder",
            "plumbing",
            "electrical",
            "hvac",
            "roofing",
        ],
    ),
    (
        "Auto Repair & Service",
        &["auto repair", "mechanic", "automotive", "car service", "car repair", "body shop"],
    ),
    (
        "Marketing & Advertising",
        &["marketing & advertising", "digital marketing", "advertising", "marketing", "sem"],
    ),
];

/// One suggested equipment purchase for an industry bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquipmentSuggestion {
    pub equipment: &'static str,
    pub estimated_budget: &'static str,
    /// Nominal deal size in dollars, the midpoint of the budget range.
    pub potential_deal_size: u32,
    pub reasoning: &'static str,
}

/// Industry bucket -> ranked equipment suggestions.
pub const EQUIPMENT_BY_INDUSTRY: [(&str, &[EquipmentSuggestion]); 12] = [
    (
        "Medical & Healthcare",
        &[
            EquipmentSuggestion {
                equipment: "Digital X-Ray System",
                estimated_budget: "$15K-$45K",
                potential_deal_size: 30_000,
                reasoning: "Essential for modern medical diagnostics",
            },
            EquipmentSuggestion {
                equipment: "Patient Monitoring Equipment",
                estimated_budget: "$8K-$25K",
                potential_deal_size: 16_500,
                reasoning: "Required for patient care and compliance",
            },
            EquipmentSuggestion {
                equipment: "Autoclave & Sterilization Suite",
                estimated_budget: "$5K-$15K",
                potential_deal_size: 10_000,
                reasoning: "Mandatory sterilization for clinical practices",
            },
            EquipmentSuggestion {
                equipment: "Dental Chair & Delivery Unit",
                estimated_budget: "$10K-$30K",
                potential_deal_size: 20_000,
                reasoning: "Core operatory equipment for dental offices",
            },
        ],
    ),
    (
        "Restaurants & Food Service",
        &[
            EquipmentSuggestion {
                equipment: "POS System & Kitchen Display System (KDS)",
                estimated_budget: "$3K-$12K",
                potential_deal_size: 7_500,
                reasoning: "Essential for order management and payments",
            },
            EquipmentSuggestion {
                equipment: "Commercial Refrigeration Units",
                estimated_budget: "$4K-$15K",
                potential_deal_size: 9_500,
                reasoning: "Food safety and storage capacity",
            },
            EquipmentSuggestion {
                equipment: "Commercial Oven & Range Line",
                estimated_budget: "$6K-$20K",
                potential_deal_size: 13_000,
                reasoning: "Core cooking capacity for the kitchen line",
            },
        ],
    ),
    (
        "Retail & E-commerce",
        &[
            EquipmentSuggestion {
                equipment: "Modern POS & Payment System",
                estimated_budget: "$2K-$8K",
                potential_deal_size: 5_000,
                reasoning: "Essential for transaction processing and inventory",
            },
            EquipmentSuggestion {
                equipment: "Security & Surveillance System",
                estimated_budget: "$3K-$10K",
                potential_deal_size: 6_500,
                reasoning: "Loss prevention for storefront operations",
            },
            EquipmentSuggestion {
                equipment: "Digital Signage & Display Fixtures",
                estimated_budget: "$2K-$9K",
                potential_deal_size: 5_500,
                reasoning: "Drives in-store promotion and merchandising",
            },
        ],
    ),
    (
        "Fitness & Wellness",
        &[
            EquipmentSuggestion {
                equipment: "Commercial Treadmills & Ellipticals",
                estimated_budget: "$5K-$15K per unit",
                potential_deal_size: 10_000,
                reasoning: "Core cardio equipment for gyms",
            },
            EquipmentSuggestion {
                equipment: "Strength Training Machine Circuit",
                estimated_budget: "$8K-$30K",
                potential_deal_size: 19_000,
                reasoning: "Completes the floor for full-service memberships",
            },
            EquipmentSuggestion {
                equipment: "Hydro Massage & Recovery Stations",
                estimated_budget: "$6K-$18K",
                potential_deal_size: 12_000,
                reasoning: "Premium amenity that supports higher-tier pricing",
            },
        ],
    ),
    (
        "Auto Repair & Service",
        &[
            EquipmentSuggestion {
                equipment: "Advanced Diagnostic Scanner",
                estimated_budget: "$8K-$25K",
                potential_deal_size: 16_500,
                reasoning: "Critical for modern vehicle diagnostics and repair",
            },
            EquipmentSuggestion {
                equipment: "Two-Post Vehicle Lifts",
                estimated_budget: "$4K-$12K per bay",
                potential_deal_size: 8_000,
                reasoning: "Throughput is limited by lift capacity",
            },
            EquipmentSuggestion {
                equipment: "Tire Changer & Wheel Balancer Combo",
                estimated_budget: "$5K-$15K",
                potential_deal_size: 10_000,
                reasoning: "High-margin tire work for general repair shops",
            },
        ],
    ),
    (
        "Professional Services",
        &[
            EquipmentSuggestion {
                equipment: "Office Technology Suite (PCs, Monitors, Printers)",
                estimated_budget: "$3K-$12K",
                potential_deal_size: 7_500,
                reasoning: "Essential for modern office operations and productivity",
            },
            EquipmentSuggestion {
                equipment: "Conference Room AV System",
                estimated_budget: "$4K-$15K",
                potential_deal_size: 9_500,
                reasoning: "Client-facing meeting and presentation capability",
            },
            EquipmentSuggestion {
                equipment: "Document Management & Scanning Hardware",
                estimated_budget: "$2K-$8K",
                potential_deal_size: 5_000,
                reasoning: "Compliance-driven records handling",
            },
        ],
    ),
    (
        "Construction & Contractors",
        &[
            EquipmentSuggestion {
                equipment: "Skid Steer Loader or Mini Excavator",
                estimated_budget: "$20K-$45K",
                potential_deal_size: 32_500,
                reasoning: "Versatile equipment for various job sites",
            },
            EquipmentSuggestion {
                equipment: "Work Truck Upfit & Tool Storage",
                estimated_budget: "$8K-$25K",
                potential_deal_size: 16_500,
                reasoning: "Keeps crews mobile and tools secured",
            },
            EquipmentSuggestion {
                equipment: "Laser Level & Survey Instruments",
                estimated_budget: "$3K-$12K",
                potential_deal_size: 7_500,
                reasoning: "Accuracy requirements on commercial bids",
            },
        ],
    ),
    (
        "Salons & Spas",
        &[
            EquipmentSuggestion {
                equipment: "Hydraulic Styling Chairs & Backwash Units",
                estimated_budget: "$3K-$10K",
                potential_deal_size: 6_500,
                reasoning: "Core furniture for hair salon services",
            },
            EquipmentSuggestion {
                equipment: "Facial & Skin Treatment Systems",
                estimated_budget: "$5K-$18K",
                potential_deal_size: 11_500,
                reasoning: "Expands the service menu into higher-ticket treatments",
            },
            EquipmentSuggestion {
                equipment: "Pedicure Thrones with Plumbing",
                estimated_budget: "$4K-$14K",
                potential_deal_size: 9_000,
                reasoning: "Recurring-appointment revenue anchor",
            },
        ],
    ),
    (
        "Hotels & Hospitality",
        &[
            EquipmentSuggestion {
                equipment: "Property Management System (PMS) Hardware",
                estimated_budget: "$5K-$20K",
                potential_deal_size: 12_500,
                reasoning: "Core system for managing reservations, billing, and guest data",
            },
            EquipmentSuggestion {
                equipment: "Commercial Laundry Machines",
                estimated_budget: "$10K-$35K",
                potential_deal_size: 22_500,
                reasoning: "In-house linen turnaround cuts outsourcing cost",
            },
            EquipmentSuggestion {
                equipment: "Keyless Entry & Door Lock Retrofit",
                estimated_budget: "$6K-$20K",
                potential_deal_size: 13_000,
                reasoning: "Guest expectation at mid-market and above",
            },
        ],
    ),
    (
        "Technology",
        &[
            EquipmentSuggestion {
                equipment: "Cloud Computing Credits/Services",
                estimated_budget: "$5K-$20K",
                potential_deal_size: 12_500,
                reasoning: "Essential for scalable infrastructure",
            },
            EquipmentSuggestion {
                equipment: "Developer Workstations & Build Servers",
                estimated_budget: "$4K-$18K",
                potential_deal_size: 11_000,
                reasoning: "Headcount growth drives hardware refresh cycles",
            },
            EquipmentSuggestion {
                equipment: "Network & Security Appliances",
                estimated_budget: "$3K-$12K",
                potential_deal_size: 7_500,
                reasoning: "Compliance and uptime requirements",
            },
        ],
    ),
    (
        "Marketing & Advertising",
        &[
            EquipmentSuggestion {
                equipment: "CRM & Marketing Automation Software",
                estimated_budget: "$2K-$10K",
                potential_deal_size: 6_000,
                reasoning: "Manages leads and automates campaigns",
            },
            EquipmentSuggestion {
                equipment: "Video & Photo Production Studio Kit",
                estimated_budget: "$5K-$20K",
                potential_deal_size: 12_500,
                reasoning: "In-house content production for client work",
            },
            EquipmentSuggestion {
                equipment: "Large-Format Printer & Finishing Gear",
                estimated_budget: "$4K-$15K",
                potential_deal_size: 9_500,
                reasoning: "Signage and print collateral capability",
            },
        ],
    ),
    (
        "General Business",
        &[
            EquipmentSuggestion {
                equipment: "Office Furniture (Desks, Chairs, Filing Cabinets)",
                estimated_budget: "$2K-$10K",
                potential_deal_size: 6_000,
                reasoning: "Basic setup for any office environment",
            },
            EquipmentSuggestion {
                equipment: "Business Phone & Communication System",
                estimated_budget: "$2K-$8K",
                potential_deal_size: 5_000,
                reasoning: "Every operation needs reliable communications",
            },
            EquipmentSuggestion {
                equipment: "Computer & Software Package",
                estimated_budget: "$3K-$12K",
                potential_deal_size: 7_500,
                reasoning: "Baseline technology footprint for any business",
            },
        ],
    ),
];

/// Maps the place provider's category tags to an industry.
///
/// Tags are checked in order; underscores are treated as spaces (the provider
/// reports tags like `meal_takeaway`). The first tag containing a table
/// keyword decides. Returns `None` when nothing matches, so callers can fall
/// through to the next guess in the precedence chain.
pub fn tag_industry(types: &[String]) -> Option<&'static str> {
    for tag in types {
        let tag = tag.replace('_', " ").to_lowercase();
        for (industry, keywords) in INDUSTRY_KEYWORDS.iter() {
            if keywords.iter().any(|kw| tag.contains(kw)) {
                return Some(industry);
            }
        }
    }
    None
}

/// Matches the business name and category tags against the keyword table.
///
/// Broader than [`tag_industry`]: the keyword may appear anywhere in the name
/// or in the joined tag string. Returns `None` when nothing matches.
pub fn keyword_industry(business_name: &str, types: &[String]) -> Option<&'static str> {
    let name = business_name.to_lowercase();
    let tags = types.join(" ").replace('_', " ").to_lowercase();
    for (industry, keywords) in INDUSTRY_KEYWORDS.iter() {
        for kw in keywords.iter() {
            if name.contains(kw) || tags.contains(kw) {
                return Some(industry);
            }
        }
    }
    None
}

/// Resolves an industry query to a catalog bucket.
///
/// Exact (case-insensitive) label match wins; otherwise the first industry
/// with a keyword contained in the query; otherwise General Business.
fn resolve_bucket(industry: &str) -> &'static str {
    let query = industry.to_lowercase();
    let matched = INDUSTRY_KEYWORDS.iter().find_map(|(label, keywords)| {
        if label.to_lowercase() == query || keywords.iter().any(|kw| query.contains(kw)) {
            Some(*label)
        } else {
            None
        }
    });

    match matched {
        Some(label) if EQUIPMENT_BY_INDUSTRY.iter().any(|(k, _)| *k == label) => label,
        _ => {
            // Buckets without keyword entries (e.g. Hotels & Hospitality) are
            // still reachable by exact label.
            EQUIPMENT_BY_INDUSTRY
                .iter()
                .find(|(k, _)| k.to_lowercase() == query)
                .map(|(k, _)| *k)
                .unwrap_or(GENERAL_BUSINESS)
        }
    }
}

/// Returns the top 3 equipment suggestions for an industry, formatted as
/// `"<equipment> (Est: <budget range>)"`.
pub fn suggestions(industry: &str) -> Vec<String> {
    let bucket = resolve_bucket(industry);
    let entries = EQUIPMENT_BY_INDUSTRY
        .iter()
        .find(|(k, _)| *k == bucket)
        .map(|(_, v)| *v)
        .unwrap_or(&[]);

    entries
        .iter()
        .take(3)
        .map(|s| format!("{} (Est: {})", s.equipment, s.estimated_budget))
        .collect()
}

/// Full suggestion entries for a bucket; used by the suggestions endpoint to
/// report which bucket the query resolved to.
pub fn resolve_bucket_label(industry: &str) -> &'static str {
    resolve_bucket(industry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tag_industry_matches_first_tag() {
        assert_eq!(
            tag_industry(&tags(&["restaurant", "point_of_interest"])),
            Some("Restaurants & Food Service")
        );
        assert_eq!(
            tag_industry(&tags(&["meal_takeaway"])),
            Some("Restaurants & Food Service")
        );
        assert_eq!(tag_industry(&tags(&["car_repair"])), Some("Auto Repair & Service"));
        assert_eq!(tag_industry(&tags(&["point_of_interest"])), None);
        assert_eq!(tag_industry(&[]), None);
    }

    #[test]
    fn keyword_industry_checks_name_and_tags() {
        assert_eq!(
            keyword_industry("Sunrise Dental Group", &[]),
            Some("Medical & Healthcare")
        );
        assert_eq!(
            keyword_industry("Acme Holdings", &tags(&["roofing_contractor"])),
            Some("Construction & Contractors")
        );
        assert_eq!(keyword_industry("Acme Holdings", &[]), None);
    }

    #[test]
    fn keyword_table_order_decides_ties() {
        // "health" appears before "spa" in table order.
        assert_eq!(
            keyword_industry("Health Spa", &[]),
            Some("Medical & Healthcare")
        );
    }

    #[test]
    fn suggestions_exact_label() {
        let got = suggestions("Medical & Healthcare");
        assert_eq!(got.len(), 3);
        assert_eq!(got[0], "Digital X-Ray System (Est: $15K-$45K)");
        for s in &got {
            assert!(s.contains(" (Est: "), "bad format: {}", s);
        }
    }

    #[test]
    fn suggestions_keyword_fallback() {
        // Query containing a table keyword resolves to that bucket.
        let got = suggestions("dental practices");
        assert_eq!(got[0], "Digital X-Ray System (Est: $15K-$45K)");
    }

    #[test]
    fn suggestions_unknown_industry_falls_back_to_general() {
        let got = suggestions("Quantum Basket Weaving");
        assert_eq!(got.len(), 3);
        assert!(got[0].starts_with("Office Furniture"));
    }

    #[test]
    fn suggestions_exact_label_without_keywords() {
        let got = suggestions("Hotels & Hospitality");
        assert!(got[0].starts_with("Property Management System"));
    }

    #[test]
    fn every_bucket_has_at_least_three_entries() {
        for (industry, entries) in EQUIPMENT_BY_INDUSTRY.iter() {
            assert!(entries.len() >= 3, "{} has {} entries", industry, entries.len());
        }
    }
}
