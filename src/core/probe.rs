use crate::config::{normalize_origin, GhostConfig};
use crate::utils::error::Result;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// API 路徑候選，依序嘗試
pub const CANDIDATE_API_PATHS: [&str; 6] = [
    "/ghost/api/content",
    "/ghost/api/v5/content",
    "/ghost/api/v4/content",
    "/ghost/api/v3/content",
    "/ghost/api",
    "/api",
];

pub const PROBE_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ProbeAttempt {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub working_api_url: Option<String>,
    pub attempts: Vec<ProbeAttempt>,
}

impl ProbeReport {
    pub fn success(&self) -> bool {
        self.working_api_url.is_some()
    }
}

/// Finds which API prefix the configured Ghost origin answers on by listing
/// a few tags from each candidate. Stops at the first 2xx.
pub async fn probe_api(config: &GhostConfig) -> Result<ProbeReport> {
    let client = Client::builder()
        .timeout(Duration::from_secs(PROBE_TIMEOUT_SECONDS))
        .build()?;
    let origin = normalize_origin(&config.api_url);
    let mut attempts = Vec::new();

    for path in CANDIDATE_API_PATHS {
        let api_url = format!("{}{}", origin, path);
        let tags_url = format!("{}/tags/", api_url);
        tracing::info!("🔎 Testing Ghost API at {}", api_url);

        let result = client
            .get(&tags_url)
            .header(ACCEPT, "application/json")
            .query(&[("key", config.content_api_key.as_str()), ("limit", "5")])
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                attempts.push(ProbeAttempt {
                    url: api_url.clone(),
                    status: Some(status.as_u16()),
                    error: None,
                    ok: status.is_success(),
                });
                if status.is_success() {
                    tracing::info!("✅ Ghost API responded at {}", api_url);
                    return Ok(ProbeReport {
                        working_api_url: Some(api_url),
                        attempts,
                    });
                }
            }
            Err(e) => {
                tracing::debug!("Failed testing {}: {}", api_url, e);
                attempts.push(ProbeAttempt {
                    url: api_url,
                    status: None,
                    error: Some(e.to_string()),
                    ok: false,
                });
            }
        }
    }

    tracing::warn!("Could not connect to the Ghost API with any of the attempted URL patterns");
    Ok(ProbeReport {
        working_api_url: None,
        attempts,
    })
}
