//! Common formatting helpers shared across CLI commands.

use chrono::{DateTime, Utc};
use weftmark_core::FeatureCategory;

/// Format a UTC timestamp for terminal display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render a [0, 1] similarity as a percentage with two decimals.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Human-readable list of degraded analyzer categories.
pub fn degraded_list(categories: &[FeatureCategory]) -> String {
    categories
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
