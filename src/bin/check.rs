use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use landingpage_settings_check::{
    client::SettingsClient,
    config::{parse_timeout, Config},
    verifier::Verifier,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "landingpage-settings-check",
    about = "Check the landing page settings API: known brand, new brand defaults, save/retrieve"
)]
struct Cli {
    /// Base URL for the settings API (defaults to SETTINGS_API_URL or http://127.0.0.1:3000/legacy)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout (e.g. 500ms, 10s)
    #[arg(long)]
    timeout: Option<String>,

    /// Brand expected to already have saved settings
    #[arg(long)]
    known_brand: Option<String>,

    /// Brand that has never been saved
    #[arg(long)]
    new_brand: Option<String>,

    /// Prefix of the generated brand used by the save/retrieve cycle
    #[arg(long)]
    brand_prefix: Option<String>,

    /// Write the results as JSON to this path
    #[arg(long)]
    report_json: Option<PathBuf>,
}

impl Cli {
    fn apply(self, cfg: &mut Config) -> Result<()> {
        if let Some(v) = self.base_url {
            cfg.base_url = v;
        }
        if let Some(v) = self.timeout {
            cfg.timeout = parse_timeout("--timeout", &v)?;
        }
        if let Some(v) = self.known_brand {
            cfg.known_brand = v;
        }
        if let Some(v) = self.new_brand {
            cfg.new_brand = v;
        }
        if let Some(v) = self.brand_prefix {
            cfg.brand_prefix = v;
        }
        if self.report_json.is_some() {
            cfg.report_json = self.report_json;
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::from_env()?;
    cli.apply(&mut cfg)?;
    cfg.validate()?;
    info!(
        "API: {} timeout={:?} known_brand={} new_brand={}",
        cfg.base_url, cfg.timeout, cfg.known_brand, cfg.new_brand
    );

    let client = SettingsClient::new(&cfg.base_url, cfg.timeout).context("build HTTP client")?;
    let mut verifier = Verifier::new(client, &cfg);
    let report = verifier.run_all().await;

    if let Some(path) = &cfg.report_json {
        report.write_json(path)?;
        info!("Report written to {}", path.display());
    }
    Ok(report.success())
}
