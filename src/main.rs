mod advisor;
mod analyzer;
mod config;
mod fetcher;
mod model;
mod parser;
mod pipeline;
mod prompt;
mod ui;
mod utils;

use advisor::GeminiAdvisor;
use clap::Parser;
use config::{AppConfig, load_config};
use fetcher::RapidApiFetcher;
use model::{AnalysisRequest, Period, RiskTolerance};
use pipeline::AnalysisService;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use ui::{ConsoleForm, display};

#[derive(Parser, Debug)]
#[command(name = "stock-sage")]
#[command(about = "Historical price statistics with language-model investment commentary")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Override log level (otherwise RUST_LOG, then "info")
    #[arg(long)]
    log_level: Option<String>,

    /// Run a single analysis from the flags below and exit
    #[arg(long)]
    once: bool,

    #[arg(long)]
    company: Option<String>,

    /// 1yr, 5yr or 10yr
    #[arg(long)]
    period: Option<Period>,

    /// Low, Medium or High
    #[arg(long)]
    risk: Option<RiskTolerance>,

    #[arg(long)]
    goal: Option<String>,
}

impl Cli {
    fn initial_request(&self) -> AnalysisRequest {
        let defaults = AnalysisRequest::default();
        AnalysisRequest {
            company: self.company.clone().unwrap_or(defaults.company),
            period: self.period.unwrap_or(defaults.period),
            risk_tolerance: self.risk.unwrap_or(defaults.risk_tolerance),
            investment_goal: self.goal.clone().unwrap_or(defaults.investment_goal),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            eprintln!("❌ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("Configuration loaded (model: {})", config.gemini_model);

    let service = build_service(&config)?;
    let initial = cli.initial_request();

    if cli.once {
        return Ok(run_once(&service, &initial, &config.gemini_model, &mut io::stdout()).await?);
    }

    run_interactive(&service, initial, &config.gemini_model).await?;
    info!("Bye.");
    Ok(ExitCode::SUCCESS)
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_service(config: &AppConfig) -> anyhow::Result<AnalysisService> {
    let source = RapidApiFetcher::new(config)?;
    let advisor = GeminiAdvisor::new(config)?;
    Ok(AnalysisService::new(Arc::new(source), Arc::new(advisor)))
}

async fn run_interactive(service: &AnalysisService, initial: AnalysisRequest, model: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    display::show_banner(&mut stdout)?;

    let stdin = io::stdin();
    let mut form = ConsoleForm::new(stdin.lock(), io::stdout());
    let mut previous = initial;
    while let Some(req) = form.read_request(&previous)? {
        run_cycle(service, &req, model, &mut stdout).await?;
        previous = req;
    }
    Ok(())
}

/// `--once` mode: a failed request maps to a failure exit status.
async fn run_once<W: Write>(
    service: &AnalysisService,
    req: &AnalysisRequest,
    model: &str,
    out: &mut W,
) -> io::Result<ExitCode> {
    let ok = run_cycle(service, req, model, out).await?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// One trigger: fetch, compute, narrate, display. Failures end only this cycle.
async fn run_cycle<W: Write>(
    service: &AnalysisService,
    req: &AnalysisRequest,
    model: &str,
    out: &mut W,
) -> io::Result<bool> {
    display::show_fetching(out)?;
    out.flush()?;

    let result = service
        .handle_with(req, |stats| {
            if let Err(e) = display::show_statistics(&mut *out, stats) {
                warn!("Failed to display statistics: {}", e);
            }
        })
        .await;

    match result {
        Ok(report) => {
            debug!("Prompt sent:\n{}", report.prompt);
            info!(
                "Analysis complete for '{}' (growth {:.2}%)",
                report.company, report.stats.growth_rate_pct
            );
            display::show_analysis(out, &report.company, model, &report.narrative)?;
            Ok(true)
        }
        Err(e) => {
            error!("Analysis failed for '{}': {}", req.company, e);
            display::show_error(out, &e)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fakes::{FakeSource, RecordingAdvisor, TWO_POINTS, service};

    async fn cycle(svc: &AnalysisService) -> (ExitCode, String) {
        let mut out = Vec::new();
        let code = run_once(svc, &AnalysisRequest::default(), "gemini-1.5-flash", &mut out)
            .await
            .unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn successful_cycle_shows_sections_in_order() {
        let svc = service(FakeSource::Body(TWO_POINTS), Arc::new(RecordingAdvisor::default()));
        let (code, out) = cycle(&svc).await;
        assert_eq!(code, ExitCode::SUCCESS);

        let fetching = out.find("Fetching data...").unwrap();
        let stats = out.find("== Price Statistics ==").unwrap();
        let analysis = out.find("== Analysis of Reliance (gemini-1.5-flash) ==").unwrap();
        assert!(fetching < stats && stats < analysis);
        assert!(out.contains("Steady climber. Invest: Yes, 10%."));
        assert!(!out.contains("❌"));
    }

    #[tokio::test]
    async fn advisor_failure_shows_statistics_then_error() {
        let advisor = Arc::new(RecordingAdvisor {
            fail: true,
            ..RecordingAdvisor::default()
        });
        let svc = service(FakeSource::Body(TWO_POINTS), advisor);
        let (code, out) = cycle(&svc).await;
        assert_eq!(code, ExitCode::FAILURE);

        let stats = out.find("== Price Statistics ==").unwrap();
        let error = out.find("❌ Failed to obtain analysis").unwrap();
        assert!(stats < error);
        assert!(!out.contains("== Analysis"));
    }

    #[tokio::test]
    async fn fetch_failure_skips_statistics() {
        let svc = service(FakeSource::Status(500), Arc::new(RecordingAdvisor::default()));
        let (code, out) = cycle(&svc).await;
        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.starts_with("Fetching data...\n"));
        assert!(out.contains("❌ Failed to retrieve historical data"));
        assert!(!out.contains("== Price Statistics =="));
    }
}
