//! Text rendering shared by the interactive flows.

use crate::model::project::ProjectListing;
use num_format::{Locale, ToFormattedString};

/// Formats a cost with thousands separators and two decimals, e.g.
/// `1234567.5` -> `$1,234,567.50`.
pub fn format_cost(cost: f64) -> String {
    let cents = (cost.abs() * 100.0).round() as u64;
    let sign = if cost < 0.0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

/// Multi-line detail view used by the update and delete flows.
pub fn detail_lines(listing: &ProjectListing) -> Vec<String> {
    let project = &listing.project;
    vec![
        format!("ID: {}", project.id),
        format!("Description: {}", project.description),
        format!("Cost: {}", format_cost(project.cost)),
        format!("Status: {}", project.status),
        format!(
            "Source type ID: {} ({})",
            project.source_type_id, listing.source_type_label
        ),
        format!("Region ID: {} ({})", project.region_id, listing.region_label),
    ]
}

/// Single-line summary used by the query flow.
pub fn summary_line(listing: &ProjectListing) -> String {
    let project = &listing.project;
    format!(
        "ID: {} | Description: {} | Cost: {} | Status: {} | Source type ID: {} ({}) | Region ID: {} ({})",
        project.id,
        project.description,
        format_cost(project.cost),
        project.status,
        project.source_type_id,
        listing.source_type_label,
        project.region_id,
        listing.region_label
    )
}
