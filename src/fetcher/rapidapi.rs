use crate::config::AppConfig;
use crate::fetcher::traits::HistoricalDataSource;
use crate::model::{AnalysisRequest, FetchError};

use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Historical price client for the RapidAPI Indian stock exchange service.
pub struct RapidApiFetcher {
    client: Client,
    base_url: String,
    host: String,
    api_key: String,
}

impl RapidApiFetcher {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("stock-sage/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.rapidapi_base_url.trim_end_matches('/').to_string(),
            host: config.rapidapi_host.clone(),
            api_key: config.rapidapi_key.clone(),
        })
    }

    fn build_url(&self) -> String {
        format!("{}/historical_data", self.base_url)
    }

    fn query_params(req: &AnalysisRequest) -> [(&'static str, String); 3] {
        [
            ("stock_name", req.company.trim().to_string()),
            ("period", req.period.as_query().to_string()),
            ("filter", "price".to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl HistoricalDataSource for RapidApiFetcher {
    async fn fetch(&self, req: &AnalysisRequest) -> Result<String, FetchError> {
        let url = self.build_url();
        info!("📡 Fetching {} history for '{}'", req.period, req.company);

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", self.api_key.as_str())
            .header("X-RapidAPI-Host", self.host.as_str())
            .query(&Self::query_params(req))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("❌ Data service responded [{}]: {}", status, body);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("✅ Historical data received ({} bytes)", body.len());
        Ok(body)
    }
}
