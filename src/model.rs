// Core structs: PricePoint, PriceStatistics, AnalysisRequest and the error taxonomy
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_COMPANY: &str = "Reliance";
pub const DEFAULT_GOAL: &str = "Long-term growth";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Chronological (source-ordered) closing prices for one company.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalPriceSeries {
    pub points: Vec<PricePoint>,
}

impl HistoricalPriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStatistics {
    #[serde(rename = "Price Growth Rate (%)")]
    pub growth_rate_pct: f64,
    #[serde(rename = "Average Price")]
    pub avg_price: f64,
    #[serde(rename = "Minimum Price")]
    pub min_price: f64,
    #[serde(rename = "Maximum Price")]
    pub max_price: f64,
    #[serde(rename = "Price Volatility (Std Dev)")]
    pub volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    OneYear,
    FiveYears,
    TenYears,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::OneYear, Period::FiveYears, Period::TenYears];

    /// Value sent as the `period` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Period::OneYear => "1yr",
            Period::FiveYears => "5yr",
            Period::TenYears => "10yr",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1y" | "1yr" => Ok(Period::OneYear),
            "5" | "5y" | "5yr" => Ok(Period::FiveYears),
            "10" | "10y" | "10yr" => Ok(Period::TenYears),
            other => Err(format!("unknown period '{}', expected 1yr, 5yr or 10yr", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 3] = [RiskTolerance::Low, RiskTolerance::Medium, RiskTolerance::High];
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTolerance::Low => "Low",
            RiskTolerance::Medium => "Medium",
            RiskTolerance::High => "High",
        };
        f.write_str(label)
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskTolerance::Low),
            "medium" => Ok(RiskTolerance::Medium),
            "high" => Ok(RiskTolerance::High),
            other => Err(format!("unknown risk tolerance '{}', expected Low, Medium or High", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub company: String,
    pub period: Period,
    pub risk_tolerance: RiskTolerance,
    pub investment_goal: String,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            company: DEFAULT_COMPANY.to_string(),
            period: Period::default(),
            risk_tolerance: RiskTolerance::default(),
            investment_goal: DEFAULT_GOAL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub company: String,
    pub stats: PriceStatistics,
    pub prompt: String,
    pub narrative: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("API keys are not set: {0}. Set them in the config file or the environment")]
    MissingCredentials(String),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error occurred: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("data service responded [{status}]: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("could not decode historical data: {0}")]
    InvalidJson(String),
    #[error("entry {index}: expected a [date, price] pair, got {raw}")]
    MalformedEntry { index: usize, raw: String },
    #[error("entry {index}: invalid date '{value}'")]
    InvalidDate { index: usize, value: String },
    #[error("entry {index}: invalid price '{value}'")]
    InvalidPrice { index: usize, value: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("first price in the series is zero; growth rate is undefined")]
    ZeroBasePrice,
    #[error("{field} is not a finite number; prices are out of range")]
    NonFinite { field: &'static str },
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("request to language model failed: {0}")]
    ApiError(#[from] reqwest::Error),
    #[error("language model responded [{status}]: {body}")]
    Status { status: u16, body: String },
    #[error("language model returned no text")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to retrieve historical data: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to read historical data: {0}")]
    Series(#[from] SeriesError),
    #[error("Failed to calculate price statistics: {0}")]
    Stats(#[from] StatsError),
    #[error("Failed to calculate price statistics: no price data returned")]
    NoData,
    #[error("Failed to obtain analysis: {0}")]
    Advisor(#[from] AdvisorError),
    #[error("Failed to format statistics: {0}")]
    Format(#[from] serde_json::Error),
}
