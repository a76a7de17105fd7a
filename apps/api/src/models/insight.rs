use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "demand_level", rename_all = "UPPERCASE")]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "market_outlook", rename_all = "UPPERCASE")]
pub enum MarketOutlook {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub role: String,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub location: String,
}

/// The seven AI-generated fields of an insight, in the exact shape the model is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightData {
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
}

/// One row per industry, shared by every user in that industry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IndustryInsight {
    pub id: Uuid,
    pub industry: String,
    pub salary_ranges: Json<Vec<SalaryRange>>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
}

impl IndustryInsight {
    pub fn from_data(
        industry: &str,
        data: InsightData,
        last_updated: DateTime<Utc>,
        next_update: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            industry: industry.to_string(),
            salary_ranges: Json(data.salary_ranges),
            growth_rate: data.growth_rate,
            demand_level: data.demand_level,
            top_skills: data.top_skills,
            market_outlook: data.market_outlook,
            key_trends: data.key_trends,
            recommended_skills: data.recommended_skills,
            last_updated,
            next_update,
        }
    }

    pub fn data(&self) -> InsightData {
        InsightData {
            salary_ranges: self.salary_ranges.0.clone(),
            growth_rate: self.growth_rate,
            demand_level: self.demand_level,
            top_skills: self.top_skills.clone(),
            market_outlook: self.market_outlook,
            key_trends: self.key_trends.clone(),
            recommended_skills: self.recommended_skills.clone(),
        }
    }
}
