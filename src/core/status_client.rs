// src/core/status_client.rs
//! HTTP client for the per-company application status endpoints

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config_manager::{CompanyConfig, CompanySecrets};
use crate::types::{parse_status_body, ApplicationRecord};

const ACCEPT_VALUE: &str = "*/*";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";
const CSRF_HEADER: &str = "x-calypso-csrf-token";

/// Anything that can produce a company's current application list
#[async_trait]
pub trait ApplicationSource {
    async fn fetch_applications(
        &self,
        company: &CompanyConfig,
        secrets: &CompanySecrets,
    ) -> Result<Vec<ApplicationRecord>>;
}

/// `<base_url>?type=<type>&limit=<limit>`, without any validation or escaping
pub fn build_url(company: &CompanyConfig) -> String {
    format!(
        "{}?type={}&limit={}",
        company.base_url, company.request_type, company.limit
    )
}

fn build_headers(secrets: &CompanySecrets) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(
        HeaderName::from_static(CSRF_HEADER),
        HeaderValue::from_str(&secrets.csrf_token)
            .context("CSRF token is not a valid header value")?,
    );
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&secrets.cookie).context("Cookie is not a valid header value")?,
    );
    Ok(headers)
}

pub struct StatusClient {
    client: reqwest::Client,
}

impl StatusClient {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ApplicationSource for StatusClient {
    async fn fetch_applications(
        &self,
        company: &CompanyConfig,
        secrets: &CompanySecrets,
    ) -> Result<Vec<ApplicationRecord>> {
        let url = build_url(company);
        let headers = build_headers(secrets)?;

        info!("Fetching applications for {}", company.name);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("HTTP {} error: {}", status, error_text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        let records = parse_status_body(&body)?;
        debug!("{} returned {} applications", company.name, records.len());
        Ok(records)
    }
}
