use crate::advisor::NarrativeAdvisor;
use crate::analyzer::{Analyzer, AnalyzerImpl};
use crate::fetcher::HistoricalDataSource;
use crate::model::{AnalysisError, AnalysisReport, AnalysisRequest, PriceStatistics};
use crate::parser::{Parser, PriceSeriesParser};
use crate::prompt::build_prompt;
use std::sync::Arc;
use tracing::{info, warn};

/// Request handler: fetch → parse → statistics → prompt → narrative.
pub struct AnalysisService {
    source: Arc<dyn HistoricalDataSource>,
    advisor: Arc<dyn NarrativeAdvisor>,
    parser: PriceSeriesParser,
    analyzer: AnalyzerImpl,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn HistoricalDataSource>, advisor: Arc<dyn NarrativeAdvisor>) -> Self {
        Self {
            source,
            advisor,
            parser: PriceSeriesParser::new(),
            analyzer: AnalyzerImpl::new(),
        }
    }

    #[cfg(test)]
    pub async fn handle(&self, req: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        self.handle_with(req, |_| {}).await
    }

    /// Same as `handle`, calling `on_stats` as soon as statistics exist so they can be
    /// shown even if the language-model call later fails.
    pub async fn handle_with<F>(&self, req: &AnalysisRequest, mut on_stats: F) -> Result<AnalysisReport, AnalysisError>
    where
        F: FnMut(&PriceStatistics),
    {
        info!("Processing company: {}", req.company);
        let stats = self.compute_statistics(req).await?;
        on_stats(&stats);

        let prompt = build_prompt(req, &stats)?;
        let narrative = self.advisor.advise(&prompt).await.inspect_err(|e| {
            warn!("Advisor error: {}", e);
        })?;

        info!("Finished processing company: {}", req.company);
        Ok(AnalysisReport {
            company: req.company.clone(),
            stats,
            prompt,
            narrative,
        })
    }

    pub async fn compute_statistics(&self, req: &AnalysisRequest) -> Result<PriceStatistics, AnalysisError> {
        let body = self.source.fetch(req).await.inspect_err(|e| {
            warn!("Fetch error: {}", e);
        })?;

        let series = self.parser.parse(&body).inspect_err(|e| {
            warn!("Parse error: {}", e);
        })?;
        if series.is_empty() {
            warn!("No price points returned for '{}'", req.company);
        } else {
            info!("Parsed {} price points", series.len());
        }

        let stats = self
            .analyzer
            .calculate_stats(&series)?
            .ok_or(AnalysisError::NoData)?;
        info!(
            "Base Stats: growth = {:.2}%, avg = {:.2}, std_dev = {:.2}",
            stats.growth_rate_pct, stats.avg_price, stats.volatility
        );
        Ok(stats)
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use crate::model::{AdvisorError, FetchError, StatsError};

    #[tokio::test]
    async fn full_cycle_produces_report() {
        let advisor = Arc::new(RecordingAdvisor::default());
        let svc = service(FakeSource::Body(TWO_POINTS), advisor.clone());
        let req = AnalysisRequest::default();

        let report = svc.handle(&req).await.unwrap();
        assert_eq!(report.company, "Reliance");
        assert_eq!(report.stats.growth_rate_pct, 50.0);
        assert_eq!(report.stats.volatility, 35.36);
        assert_eq!(report.narrative, "Steady climber. Invest: Yes, 10%.");

        let prompts = advisor.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], report.prompt);
        assert!(prompts[0].contains("\"Average Price\": 125.0"));
        assert!(prompts[0].contains("'Medium' risk tolerance"));
    }

    #[tokio::test]
    async fn fetch_failure_stops_before_advisor() {
        let advisor = Arc::new(RecordingAdvisor::default());
        let svc = service(FakeSource::Status(429), advisor.clone());
        let err = svc.handle(&AnalysisRequest::default()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Fetch(FetchError::Status { status: 429, .. })));
        assert!(advisor.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_dataset_is_no_data() {
        let advisor = Arc::new(RecordingAdvisor::default());
        let svc = service(FakeSource::Body(r#"{"datasets": []}"#), advisor.clone());
        let err = svc.handle(&AnalysisRequest::default()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::NoData));
        assert!(advisor.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_entry_is_series_error() {
        let body = r#"{"datasets": [{"values": [["yesterday", "100"]]}]}"#;
        let svc = service(FakeSource::Body(body), Arc::new(RecordingAdvisor::default()));
        let err = svc.handle(&AnalysisRequest::default()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Series(_)));
    }

    #[tokio::test]
    async fn zero_base_price_is_stats_error() {
        let body = r#"{"datasets": [{"values": [["2023-01-01", "0"], ["2023-01-02", "4"]]}]}"#;
        let svc = service(FakeSource::Body(body), Arc::new(RecordingAdvisor::default()));
        let err = svc.handle(&AnalysisRequest::default()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Stats(StatsError::ZeroBasePrice)));
    }

    #[tokio::test]
    async fn overflowing_prices_are_stats_error() {
        let body = r#"{"datasets": [{"values": [["2023-01-01", "1e308"], ["2023-01-02", "1.5e308"]]}]}"#;
        let advisor = Arc::new(RecordingAdvisor::default());
        let svc = service(FakeSource::Body(body), advisor.clone());
        let err = svc.handle(&AnalysisRequest::default()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Stats(StatsError::NonFinite { .. })));
        assert!(advisor.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn advisor_failure_still_reports_statistics() {
        let advisor = Arc::new(RecordingAdvisor {
            fail: true,
            ..RecordingAdvisor::default()
        });
        let svc = service(FakeSource::Body(TWO_POINTS), advisor);
        let mut seen = None;
        let err = svc
            .handle_with(&AnalysisRequest::default(), |stats| seen = Some(*stats))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Advisor(AdvisorError::Status { status: 503, .. })));
        assert_eq!(seen.map(|s| s.avg_price), Some(125.0));
    }
}
