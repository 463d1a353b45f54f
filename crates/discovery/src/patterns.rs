//! Static pattern tables used to classify resources

use regex::Regex;
use std::sync::OnceLock;

use crate::discoverer::EndpointCategory;

/// Terms that mark a resource as dashboard material
const DASHBOARD_PATTERN: &str = r"(?i)stats|statistic|analytic|trend|summar|overview|metric|report|activit|event|audit|health|dashboard";

/// Ordered priority bands for dashboard resources; first match wins
const PRIORITY_BANDS: &[(&str, EndpointCategory)] = &[
    (
        r"(?i)stats|statistic|dashboard|summary|overview",
        EndpointCategory::Stats,
    ),
    (r"(?i)trend", EndpointCategory::Trend),
    (r"(?i)activit|event|audit", EndpointCategory::Activity),
];

/// Ordered resource-to-icon table; first match wins
const ICONS: &[(&str, &str)] = &[
    (r"(?i)stats|statistic|analytic|metric|dashboard|summary|overview", "bar-chart"),
    (r"(?i)trend", "trending-up"),
    (r"(?i)activit|event|audit|log", "activity"),
    (r"(?i)user|account|member|customer|team", "users"),
    (r"(?i)order|payment|invoice|billing|subscription", "credit-card"),
    (r"(?i)product|item|inventory|catalog", "package"),
    (r"(?i)report", "file-text"),
    (r"(?i)setting|config|preference", "settings"),
    (r"(?i)health|status", "heart-pulse"),
];

const DEFAULT_ICON: &str = "table";

fn compile(pattern: &str) -> Regex {
    // Every pattern here is a literal in this file
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

fn dashboard_regex() -> &'static Regex {
    static DASHBOARD: OnceLock<Regex> = OnceLock::new();
    DASHBOARD.get_or_init(|| compile(DASHBOARD_PATTERN))
}

fn priority_bands() -> &'static [(Regex, EndpointCategory)] {
    static BANDS: OnceLock<Vec<(Regex, EndpointCategory)>> = OnceLock::new();
    BANDS.get_or_init(|| {
        PRIORITY_BANDS
            .iter()
            .map(|(pattern, category)| (compile(pattern), *category))
            .collect()
    })
}

fn icons() -> &'static [(Regex, &'static str)] {
    static TABLE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ICONS
            .iter()
            .map(|(pattern, icon)| (compile(pattern), *icon))
            .collect()
    })
}

/// Whether any of the given names marks a dashboard resource
pub fn is_dashboard_name(names: &[&str]) -> bool {
    names.iter().any(|name| dashboard_regex().is_match(name))
}

/// Dashboard band for a resource that is not an entity collection
pub fn dashboard_category(names: &[&str]) -> EndpointCategory {
    priority_bands()
        .iter()
        .find(|(regex, _)| names.iter().any(|name| regex.is_match(name)))
        .map(|(_, category)| *category)
        .unwrap_or(EndpointCategory::Dashboard)
}

/// Icon name for a resource key
pub fn icon_for(key: &str) -> &'static str {
    icons()
        .iter()
        .find(|(regex, _)| regex.is_match(key))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
