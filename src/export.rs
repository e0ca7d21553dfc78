//! CSV export of enriched prospects.
//!
//! The export mirrors what the dashboard's spreadsheet consumers expect:
//! fixed column order, every field double-quote-wrapped, embedded quotes
//! doubled, and a `<city>_<industry>_enriched_businesses_<date>.csv`
//! filename.

use crate::models::EnrichedProspect;
use chrono::NaiveDate;

/// Column order of the export. The header row is exactly this list.
pub const CSV_HEADERS: [&str; 12] = [
    "Business Name",
    "Address",
    "Phone",
    "Website",
    "Rating",
    "Employee Count",
    "Industry",
    "Micro Ticket Score",
    "Contact Name",
    "Contact Title",
    "Contact Email",
    "Contact Phone",
];

/// Quote a single CSV field, doubling embedded quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Render prospects to CSV text: one header line plus one line per prospect.
pub fn prospects_to_csv(prospects: &[EnrichedProspect]) -> String {
    let header = CSV_HEADERS
        .iter()
        .map(|h| csv_field(h))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(prospects.len() + 1);
    lines.push(header);

    for prospect in prospects {
        let primary_contact = prospect.contacts.first();
        let rating = prospect
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let employee_count = prospect
            .employee_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        let fields = [
            prospect.name.clone(),
            or_na(Some(prospect.address.as_str())),
            or_na(prospect.phone.as_deref()),
            or_na(prospect.website.as_deref()),
            rating,
            employee_count,
            prospect.industry.clone(),
            prospect.micro_ticket_score.to_string(),
            or_na(primary_contact.map(|c| c.name.as_str())),
            or_na(primary_contact.map(|c| c.title.as_str())),
            or_na(primary_contact.and_then(|c| c.email.as_deref())),
            or_na(primary_contact.and_then(|c| c.phone.as_deref())),
        ];

        lines.push(
            fields
                .iter()
                .map(|f| csv_field(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

/// Filename pattern for the exported file.
pub fn export_filename(city: &str, industry: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_enriched_businesses_{}.csv",
        city,
        industry,
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;

    fn prospect(name: &str) -> EnrichedProspect {
        EnrichedProspect {
            id: "place-1".to_string(),
            name: name.to_string(),
            address: "123 Main St, Miami, FL".to_string(),
            phone: Some("(305) 555-0123".to_string()),
            rating: Some(4.5),
            types: vec!["restaurant".to_string()],
            website: Some("https://joespizza.com".to_string()),
            maps_url: None,
            industry: "Restaurants & Food Service".to_string(),
            employee_count: Some(12),
            employee_range: None,
            revenue: None,
            estimated_annual_revenue: None,
            market_cap: None,
            founded_year: None,
            keywords: Vec::new(),
            contacts: vec![Contact {
                name: "Joe Row".to_string(),
                title: "Owner".to_string(),
                email: Some("joe@joespizza.com".to_string()),
                phone: None,
            }],
            micro_ticket_score: 4,
            enrichment_error: None,
            enrichment_skipped_reason: None,
        }
    }

    #[test]
    fn header_plus_one_line_per_prospect() {
        let csv = prospects_to_csv(&[prospect("Joe's Pizza"), prospect("Maria's Cafe")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"Business Name\",\"Address\""));
        assert!(lines[1].contains("\"Joe's Pizza\""));
        assert!(lines[2].contains("\"Maria's Cafe\""));
    }

    #[test]
    fn every_field_is_quoted() {
        let csv = prospects_to_csv(&[prospect("Joe's Pizza")]);
        for line in csv.lines() {
            assert!(line.starts_with('"') && line.ends_with('"'));
            // 12 fields -> 11 separators of the form ","
            assert_eq!(line.matches("\",\"").count(), 11);
        }
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = prospects_to_csv(&[prospect(r#"Joe's "Famous" Pizza"#)]);
        assert!(csv.contains(r#""Joe's ""Famous"" Pizza""#));
    }

    #[test]
    fn missing_fields_render_as_na() {
        let mut p = prospect("Bare Business");
        p.phone = None;
        p.website = None;
        p.contacts.clear();
        let csv = prospects_to_csv(&[p]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"N/A\""));
    }

    #[test]
    fn filename_pattern() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            export_filename("Miami", "Restaurants", date),
            "Miami_Restaurants_enriched_businesses_2025-06-01.csv"
        );
    }
}
