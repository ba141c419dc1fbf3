//! exam-lockdown - Replays a lockdown scenario and reports what the host saw.
//!
//! ```text
//! exam-lockdown scenarios/three_strikes.yaml --output json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use exam_lockdown::adapters::{Scenario, ScenarioError, ScenarioReport, ScenarioRunner, TracingHost};
use exam_lockdown::config::{ConfigError, MonitorSettings, TelemetrySection};

#[derive(Parser)]
#[command(name = "exam-lockdown")]
#[command(about = "Replay an exam lockdown scenario against the monitor", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (YAML)
    scenario: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Force JSON log lines
    #[arg(long, env = "EXAM_LOCKDOWN_JSON_LOGS")]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

fn init_tracing(telemetry: &TelemetrySection, force_json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&telemetry.log_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if telemetry.json_logs || force_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn render_text(report: &ScenarioReport) -> String {
    let mut out = format!("Scenario: {}\n", report.name);
    for step in &report.steps {
        out.push_str(&format!("  {:>6}ms  {:<28} {}\n", step.at_ms, step.step, step.result));
    }
    out.push_str(&format!(
        "Final: {} with {} of {} violations",
        report.session.status, report.session.violations, report.session.max_violations
    ));
    if report.finished() {
        out.push_str(" (submitted)");
    }
    out
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = MonitorSettings::load()?;
    settings.validate().map_err(ConfigError::from)?;
    init_tracing(&settings.telemetry, cli.json_logs);

    let scenario = Scenario::load(&cli.scenario)?;
    let report = ScenarioRunner::new(settings.into_monitor_config())
        .with_observer(Arc::new(TracingHost::new()))
        .run(&scenario)
        .await?;

    match cli.output {
        OutputFormat::Text => println!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("exam-lockdown: {}", e);
            ExitCode::FAILURE
        }
    }
}
