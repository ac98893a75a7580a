use chrono::{Local, Utc};
use tracing::{info, warn};

use crate::client::SettingsClient;
use crate::config::Config;
use crate::error::CheckError;
use crate::models::{BrandSettings, SaveResponse, TestResult};
use crate::report::{result_line, summary_lines, RunReport, Summary};

/// Runs the settings contract checks in a fixed order and keeps the outcome of each.
pub struct Verifier {
    client: SettingsClient,
    known_brand: String,
    new_brand: String,
    brand_prefix: String,
    results: Vec<TestResult>,
}

impl Verifier {
    pub fn new(client: SettingsClient, cfg: &Config) -> Self {
        Self {
            client,
            known_brand: cfg.known_brand.clone(),
            new_brand: cfg.new_brand.clone(),
            brand_prefix: cfg.brand_prefix.clone(),
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Reads one brand's settings. `None` once the failure has been recorded.
    pub async fn fetch_settings(&mut self, brand_slug: &str) -> Option<BrandSettings> {
        let name = format!("GET settings for {}", brand_slug);
        match self.client.fetch(brand_slug).await {
            Ok(fetched) => {
                let details = format!("Status: 200, Fields: {} present", fetched.field_count);
                self.record(&name, Ok(details));
                Some(fetched.settings)
            }
            Err(e) => {
                self.record(&name, Err(e));
                None
            }
        }
    }

    pub async fn save_settings(&mut self, payload: &BrandSettings) -> Option<SaveResponse> {
        match self.client.save(payload).await {
            Ok(res) => {
                self.record("POST save settings", Ok("Status: 200".to_string()));
                Some(res)
            }
            Err(e) => {
                self.record("POST save settings", Err(e));
                None
            }
        }
    }

    /// An unseen slug must come back as synthesized defaults that carry that slug and a name.
    pub async fn verify_new_brand_defaults(&mut self, brand_slug: &str) -> bool {
        info!("Testing new brand defaults for {}", brand_slug);
        let name = format!("New brand {} defaults", brand_slug);
        let outcome = self.client.fetch(brand_slug).await.and_then(|fetched| {
            check_defaults(brand_slug, &fetched.settings)
                .map(|_| format!("Got default settings with brand_slug: {}", brand_slug))
        });
        self.record(&name, outcome)
    }

    /// Saves a full payload under a fresh slug and reads it back.
    pub async fn verify_save_retrieve_cycle(&mut self) -> bool {
        let brand_slug = self.fresh_brand_slug();
        self.verify_save_retrieve_cycle_for(&brand_slug).await
    }

    pub async fn verify_save_retrieve_cycle_for(&mut self, brand_slug: &str) -> bool {
        info!("Testing save and retrieve cycle for {}", brand_slug);
        let sent = BrandSettings::sample(brand_slug);

        if self.save_settings(&sent).await.is_none() {
            return false;
        }
        let Some(got) = self.fetch_settings(brand_slug).await else {
            return false;
        };

        let outcome = match sent.first_mismatch(&got) {
            Some(m) => Err(CheckError::FieldMismatch {
                field: m.field,
                saved: m.saved,
                got: m.got,
            }),
            None => Ok(format!("All key fields match for {}", brand_slug)),
        };
        self.record("Save/Retrieve data consistency", outcome)
    }

    /// Known brand, new brand defaults, save/retrieve cycle; then the summary.
    pub async fn run_all(&mut self) -> RunReport {
        let started_at = Utc::now();
        println!("🚀 Starting Landing Page API Tests");
        println!("📍 Base URL: {}", self.client.base_url());

        let known_brand = self.known_brand.clone();
        self.fetch_settings(&known_brand).await;
        let new_brand = self.new_brand.clone();
        self.verify_new_brand_defaults(&new_brand).await;
        self.verify_save_retrieve_cycle().await;

        let summary = Summary::from_results(&self.results);
        println!();
        for line in summary_lines(&summary) {
            println!("{}", line);
        }
        info!("Done. Run: {}, Passed: {}", summary.tests_run, summary.tests_passed);

        RunReport {
            base_url: self.client.base_url().to_string(),
            started_at,
            finished_at: Utc::now(),
            summary,
            results: self.results.clone(),
        }
    }

    fn fresh_brand_slug(&self) -> String {
        format!("{}_{}", self.brand_prefix, Local::now().format("%H%M%S"))
    }

    fn record(&mut self, name: &str, outcome: Result<String, CheckError>) -> bool {
        let result = match outcome {
            Ok(details) => TestResult {
                name: name.to_string(),
                success: true,
                details,
            },
            Err(e) => {
                warn!("{} failed ({:?}): {}", name, e.kind(), e);
                TestResult {
                    name: name.to_string(),
                    success: false,
                    details: e.to_string(),
                }
            }
        };
        println!("{}", result_line(&result));
        let success = result.success;
        self.results.push(result);
        success
    }
}

fn check_defaults(brand_slug: &str, settings: &BrandSettings) -> Result<(), CheckError> {
    if settings.brand_slug != brand_slug {
        return Err(CheckError::WrongSlug {
            expected: brand_slug.to_string(),
            got: settings.brand_slug.clone(),
        });
    }
    if settings.brand_name.is_empty() {
        return Err(CheckError::EmptyBrandName);
    }
    Ok(())
}
