//! Hand-authored insight records used whenever the AI service is unavailable or
//! returns something unusable.
//!
//! There are two: the dashboard path tailors role names to the industry, the
//! weekly refresh writes a generic tiered record.

use crate::models::insight::{DemandLevel, InsightData, MarketOutlook, SalaryRange};

const DEFAULT_INDUSTRY_LABEL: &str = "Technology";

fn band(role: String, min: f64, max: f64, median: f64) -> SalaryRange {
    SalaryRange {
        role,
        min,
        max,
        median,
        location: "US".to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Label used in synthesized role names: the industry key up to its first `-`.
fn industry_label(industry: &str) -> &str {
    let head = industry.split('-').next().unwrap_or_default().trim();
    if head.is_empty() {
        DEFAULT_INDUSTRY_LABEL
    } else {
        head
    }
}

/// Fallback for the on-demand path (first insight request, onboarding).
pub fn dashboard_fallback(industry: &str) -> InsightData {
    let label = industry_label(industry);
    InsightData {
        salary_ranges: vec![
            band(format!("{label} Analyst"), 60_000.0, 120_000.0, 85_000.0),
            band(format!("{label} Engineer"), 75_000.0, 150_000.0, 100_000.0),
            band(format!("{label} Manager"), 90_000.0, 180_000.0, 130_000.0),
            band(format!("Senior {label} Specialist"), 100_000.0, 200_000.0, 150_000.0),
            band(format!("{label} Director"), 120_000.0, 250_000.0, 180_000.0),
        ],
        growth_rate: 12.5,
        demand_level: DemandLevel::High,
        top_skills: strings(&[
            "Problem Solving",
            "Communication",
            "Technical Expertise",
            "Project Management",
            "Data Analysis",
        ]),
        market_outlook: MarketOutlook::Positive,
        key_trends: strings(&[
            "Digital Transformation",
            "Remote Work Adoption",
            "Automation & AI Integration",
            "Sustainability Focus",
            "Skills-based Hiring",
        ]),
        recommended_skills: strings(&[
            "Leadership",
            "Adaptability",
            "Critical Thinking",
            "Technology Proficiency",
            "Cross-functional Collaboration",
        ]),
    }
}

/// Fallback for the scheduled refresh when a reply cannot be parsed.
pub fn refresh_fallback() -> InsightData {
    InsightData {
        salary_ranges: vec![
            band("Entry Level".to_string(), 40_000.0, 60_000.0, 50_000.0),
            band("Mid Level".to_string(), 60_000.0, 90_000.0, 75_000.0),
            band("Senior Level".to_string(), 90_000.0, 130_000.0, 110_000.0),
            band("Lead".to_string(), 120_000.0, 160_000.0, 140_000.0),
            band("Manager".to_string(), 130_000.0, 180_000.0, 155_000.0),
        ],
        growth_rate: 10.0,
        demand_level: DemandLevel::Medium,
        top_skills: strings(&[
            "Communication",
            "Problem Solving",
            "Leadership",
            "Technical Skills",
            "Analytics",
        ]),
        market_outlook: MarketOutlook::Neutral,
        key_trends: strings(&[
            "Digital Transformation",
            "Remote Work",
            "Automation",
            "Sustainability",
            "Data Analytics",
        ]),
        recommended_skills: strings(&[
            "Digital Literacy",
            "Adaptability",
            "Project Management",
            "Collaboration",
            "Continuous Learning",
        ]),
    }
}
