// Historical-data JSON parsing
use crate::model::{HistoricalPriceSeries, PricePoint, SeriesError};
use crate::utils::parse_date;
use serde::Deserialize;
use serde_json::Value;

pub trait Parser {
    fn parse(&self, body: &str) -> Result<HistoricalPriceSeries, SeriesError>;
}

#[derive(Debug, Deserialize)]
struct HistoricalDataResponse {
    #[serde(default)]
    datasets: Vec<Dataset>,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    metric: Option<String>,
    #[serde(default)]
    values: Vec<Value>,
}

pub struct PriceSeriesParser;

impl PriceSeriesParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceSeriesParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PriceSeriesParser {
    /// Reads the first dataset only. A response without datasets yields an empty series;
    /// the first malformed entry aborts the whole parse.
    fn parse(&self, body: &str) -> Result<HistoricalPriceSeries, SeriesError> {
        let response: HistoricalDataResponse =
            serde_json::from_str(body).map_err(|e| SeriesError::InvalidJson(e.to_string()))?;

        let Some(dataset) = response.datasets.into_iter().next() else {
            return Ok(HistoricalPriceSeries::default());
        };
        tracing::debug!(
            "Parsing dataset '{}' with {} entries",
            dataset.metric.as_deref().unwrap_or("unknown"),
            dataset.values.len()
        );

        let points = dataset
            .values
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_entry(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HistoricalPriceSeries::new(points))
    }
}

fn parse_entry(index: usize, entry: &Value) -> Result<PricePoint, SeriesError> {
    let (date_value, price_value) = match entry.as_array().map(Vec::as_slice) {
        Some([date, price]) => (date, price),
        _ => {
            return Err(SeriesError::MalformedEntry {
                index,
                raw: entry.to_string(),
            });
        }
    };

    let date = date_value
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| SeriesError::InvalidDate {
            index,
            value: raw_text(date_value),
        })?;

    let price = match price_value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .filter(|p| p.is_finite() && *p >= 0.0)
    .ok_or_else(|| SeriesError::InvalidPrice {
        index,
        value: raw_text(price_value),
    })?;

    Ok(PricePoint { date, price })
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
