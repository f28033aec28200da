// Analyst prompt construction
use crate::model::{AnalysisRequest, PriceStatistics};
use serde::Serialize;

#[derive(Serialize)]
struct DataSummary<'a> {
    #[serde(rename = "Historical Price Statistics")]
    stats: &'a PriceStatistics,
}

/// Pretty-printed `{"Historical Price Statistics": {...}}` block, fields in declaration order.
pub fn data_summary(stats: &PriceStatistics) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DataSummary { stats })
}

pub fn build_prompt(req: &AnalysisRequest, stats: &PriceStatistics) -> Result<String, serde_json::Error> {
    let summary = data_summary(stats)?;
    Ok(format!(
        "As a financial analyst, analyze the stock performance of {company} based on the following data summary:\n\
         {summary}\n\
         The investor has a '{risk}' risk tolerance and is aiming for '{goal}'.\n\
         Please focus on answering these questions:\n\
         1. What does the historical price trend indicate about the stock's past performance?\n\
         2. Based on the data, what are the potential risks and rewards associated with investing in this stock?\n\
         3. Considering past trends and forecasts, what is the estimated time frame for potential returns?\n\
         4. How does the company's performance compare with its industry peers?\n\
         Provide your analysis based on the data, focusing on data-driven insights.\n\
         Conclusion: Should I invest - Yes or No? If Yes, then how much?",
        company = req.company.trim(),
        summary = summary,
        risk = req.risk_tolerance,
        goal = req.investment_goal.trim(),
    ))
}
