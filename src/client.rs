use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{truncate, CheckError};
use crate::models::{missing_required_fields, BrandSettings, SaveResponse, SettingsEnvelope};

const SUCCESS: &str = "SUCCESS";

/// Settings read back from the API.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub settings: BrandSettings,
    /// Keys in the `settings` object as the server sent it.
    pub field_count: usize,
}

/// HTTP access to the landing page settings API. One request at a time, no retries.
#[derive(Clone, Debug)]
pub struct SettingsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SettingsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CheckError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("landingpage-settings-check/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn settings_url(&self, brand_slug: &str) -> String {
        format!(
            "{}/landingpage/settings/{}",
            self.base_url,
            urlencoding::encode(brand_slug)
        )
    }

    /// `GET /landingpage/settings/{slug}`. Only a 200 `SUCCESS` answer carrying every
    /// required key comes back as `Ok`.
    pub async fn fetch(&self, brand_slug: &str) -> Result<Fetched, CheckError> {
        let url = self.settings_url(brand_slug);
        info!("GET {}", url);

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let body = res.text().await?;
        debug!("GET {} -> {} {}", url, status, truncate(&body));
        if status != StatusCode::OK {
            return Err(CheckError::Status { status, body: truncate(&body) });
        }

        let value = parse_object(&body)?;
        expect_success(&value, &body)?;
        let settings = match value.get("settings") {
            Some(Value::Object(map)) => map,
            _ => return Err(CheckError::MissingSettings(truncate(&body))),
        };
        let missing = missing_required_fields(settings);
        if !missing.is_empty() {
            return Err(CheckError::MissingFields(missing));
        }
        let field_count = settings.len();
        let settings = serde_json::from_value(Value::Object(settings.clone()))
            .map_err(CheckError::InvalidSettings)?;
        Ok(Fetched {
            settings,
            field_count,
        })
    }

    /// `POST /landingpage/settings` with the settings wrapped in their envelope.
    pub async fn save(&self, settings: &BrandSettings) -> Result<SaveResponse, CheckError> {
        let url = format!("{}/landingpage/settings", self.base_url);
        info!("POST {} (brand_slug={})", url, settings.brand_slug);

        let res = self
            .http
            .post(&url)
            .json(&SettingsEnvelope { settings })
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        debug!("POST {} -> {} {}", url, status, truncate(&body));
        if status != StatusCode::OK {
            return Err(CheckError::Status { status, body: truncate(&body) });
        }

        let value = parse_object(&body)?;
        expect_success(&value, &body)?;
        let echoed = match value.get("settings") {
            Some(raw) => match serde_json::from_value::<BrandSettings>(raw.clone()) {
                Ok(s) => Some(s),
                Err(e) => {
                    debug!("ignoring unparseable echoed settings: {}", e);
                    None
                }
            },
            None => None,
        };
        Ok(SaveResponse {
            status: SUCCESS.to_string(),
            settings: echoed,
        })
    }
}

fn parse_object(body: &str) -> Result<Map<String, Value>, CheckError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CheckError::InvalidBody(format!(
            "expected a JSON object, got {}",
            truncate(body)
        ))),
        Err(e) => Err(CheckError::InvalidBody(format!("{}: {}", e, truncate(body)))),
    }
}

fn expect_success(value: &Map<String, Value>, body: &str) -> Result<(), CheckError> {
    match value.get("status").and_then(Value::as_str) {
        Some(SUCCESS) => Ok(()),
        other => Err(CheckError::NotSuccess {
            marker: other.unwrap_or("no status").to_string(),
            body: truncate(body),
        }),
    }
}
