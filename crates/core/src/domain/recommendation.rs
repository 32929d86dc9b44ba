use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Business profile submitted to the recommendation service.
///
/// Built by [`crate::domain::form::RecommendationForm`], which guarantees the
/// field constraints; values are never changed after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub industry: String,
    pub budget: f64,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    #[serde(flatten)]
    pub request: RecommendationRequest,
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

impl SearchHistoryItem {
    pub fn new(request: RecommendationRequest) -> Self {
        Self {
            request,
            id: super::new_opaque_id(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

/// Time series of market values; `dates` and `values` are parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
    pub trend_analysis: String,
}

impl TrendSeries {
    /// Date/value pairs. A ragged series is cut to the shorter side.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.dates
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn is_parallel(&self) -> bool {
        self.dates.len() == self.values.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub investment_required: f64,
    /// Percent.
    pub roi: f64,
    pub risk_level: RiskLevel,
    pub time_to_profit: String,
    pub market_trends: TrendSeries,
    #[serde(default)]
    pub key_benefits: Vec<String>,
    #[serde(default)]
    pub why_this_business: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub industry: String,
    pub trend: TrendSeries,
}
