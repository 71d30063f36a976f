// src/tracker.rs
//! Sequential batch over all configured companies

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::core::config_manager::{CompanyConfig, CompanySecrets, SecretStore};
use crate::core::status_client::ApplicationSource;
use crate::core::FsOps;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyOutcome {
    Saved { path: PathBuf, records: usize },
    Skipped { missing: Vec<String> },
    Failed { error: String },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(String, CompanyOutcome)>,
}

impl BatchReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, CompanyOutcome::Saved { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CompanyOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CompanyOutcome::Failed { .. }))
    }

    pub fn outcome(&self, company: &str) -> Option<&CompanyOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == company)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&CompanyOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

pub struct Tracker<S, E> {
    source: S,
    secrets: E,
    output_dir: PathBuf,
}

impl<S, E> Tracker<S, E>
where
    S: ApplicationSource,
    E: SecretStore,
{
    pub fn new(source: S, secrets: E, output_dir: PathBuf) -> Self {
        Self {
            source,
            secrets,
            output_dir,
        }
    }

    /// Process every company in order. Failures are recorded per company and
    /// never stop the batch.
    pub async fn run(&self, companies: &[CompanyConfig]) -> BatchReport {
        let mut report = BatchReport::default();

        for company in companies {
            let outcome = self.process_company(company).await;
            report.outcomes.push((company.name.clone(), outcome));
        }

        info!(
            "Batch complete: {} saved, {} skipped, {} failed",
            report.saved(),
            report.skipped(),
            report.failed()
        );
        report
    }

    async fn process_company(&self, company: &CompanyConfig) -> CompanyOutcome {
        let secrets = match company.resolve_secrets(&self.secrets) {
            Ok(secrets) => secrets,
            Err(missing) => {
                warn!(
                    "Missing secrets for {} ({}), skipping",
                    company.name,
                    missing.join(", ")
                );
                return CompanyOutcome::Skipped { missing };
            }
        };

        match self.fetch_and_append(company, &secrets).await {
            Ok((path, records)) => {
                info!("Saved {} applications to {}", records, path.display());
                CompanyOutcome::Saved { path, records }
            }
            Err(e) => {
                error!("Failed for {}: {:#}", company.name, e);
                CompanyOutcome::Failed {
                    error: format!("{:#}", e),
                }
            }
        }
    }

    async fn fetch_and_append(
        &self,
        company: &CompanyConfig,
        secrets: &CompanySecrets,
    ) -> Result<(PathBuf, usize)> {
        let records = self.source.fetch_applications(company, secrets).await?;
        let path = FsOps::append_applications(&self.output_dir, &company.name, &records).await?;
        Ok((path, records.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_manager::{DEFAULT_LIMIT, DEFAULT_REQUEST_TYPE};
    use crate::core::status_client::test_server::{serve, CannedResponse};
    use crate::core::StatusClient;
    use crate::types::ApplicationRecord;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Shared buffer that a fmt subscriber writes formatted events into
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("apptrack-run-{}", uuid::Uuid::new_v4()))
    }

    fn company(name: &str, base_url: &str) -> CompanyConfig {
        CompanyConfig {
            name: name.to_string(),
            base_url: base_url.to_string(),
            request_type: DEFAULT_REQUEST_TYPE.to_string(),
            limit: DEFAULT_LIMIT,
            cookie_secret: format!("{}_COOKIE", name.to_uppercase()),
            csrf_secret: format!("{}_CSRF", name.to_uppercase()),
        }
    }

    fn secrets_for(names: &[&str]) -> HashMap<String, String> {
        names
            .iter()
            .flat_map(|name| {
                let upper = name.to_uppercase();
                [
                    (format!("{}_COOKIE", upper), "cookie".to_string()),
                    (format!("{}_CSRF", upper), "token".to_string()),
                ]
            })
            .collect()
    }

    /// Serves canned results per company name and records call order
    struct FakeSource {
        results: HashMap<String, std::result::Result<Vec<ApplicationRecord>, String>>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ApplicationSource for FakeSource {
        async fn fetch_applications(
            &self,
            company: &CompanyConfig,
            _secrets: &CompanySecrets,
        ) -> Result<Vec<ApplicationRecord>> {
            self.calls.lock().unwrap().push(company.name.clone());
            match self.results.get(&company.name) {
                Some(Ok(records)) => Ok(records.clone()),
                Some(Err(message)) => anyhow::bail!("{}", message),
                None => anyhow::bail!("no canned result"),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_secrets_skips_company() {
        let dir = scratch_dir();
        let record: ApplicationRecord =
            serde_json::from_value(json!({"postingTitle": "Analyst"})).unwrap();
        let source = FakeSource {
            results: HashMap::from([
                ("acme".to_string(), Ok(vec![record])),
                ("globex".to_string(), Ok(vec![])),
            ]),
            calls: Mutex::new(Vec::new()),
        };

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let tracker = Tracker::new(source, secrets_for(&["acme"]), dir.clone());
        let report = tracker
            .run(&[company("acme", "http://unused"), company("globex", "http://unused")])
            .await;

        let logged = logs.text();
        assert!(logged.contains("WARN"), "{}", logged);
        assert!(
            logged.contains("Missing secrets for globex (GLOBEX_COOKIE, GLOBEX_CSRF), skipping"),
            "{}",
            logged
        );
        assert!(!logged.contains("acme"), "{}", logged);

        assert_eq!(
            report.outcome("acme"),
            Some(&CompanyOutcome::Saved {
                path: dir.join("acme.txt"),
                records: 1
            })
        );
        assert_eq!(
            report.outcome("globex"),
            Some(&CompanyOutcome::Skipped {
                missing: vec!["GLOBEX_COOKIE".to_string(), "GLOBEX_CSRF".to_string()]
            })
        );
        assert_eq!(*tracker.source.calls.lock().unwrap(), vec!["acme".to_string()]);
        assert!(dir.join("acme.txt").exists());
        assert!(!dir.join("globex.txt").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let dir = scratch_dir();
        let source = FakeSource {
            results: HashMap::from([
                ("acme".to_string(), Err("connection refused".to_string())),
                ("globex".to_string(), Ok(vec![])),
            ]),
            calls: Mutex::new(Vec::new()),
        };

        let tracker = Tracker::new(source, secrets_for(&["acme", "globex"]), dir.clone());
        let report = tracker
            .run(&[company("acme", "http://unused"), company("globex", "http://unused")])
            .await;

        assert_eq!(report.failed(), 1);
        assert_eq!(report.saved(), 1);
        match report.outcome("acme") {
            Some(CompanyOutcome::Failed { error }) => assert!(error.contains("connection refused")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!dir.join("acme.txt").exists());
        assert!(dir.join("globex.txt").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_http_error_then_success_over_the_wire() {
        let dir = scratch_dir();
        let (base, _requests) = serve(vec![
            CannedResponse::new(500, "upstream down"),
            CannedResponse::new(200, r#"{"data": [{"status": "Offer"}]}"#),
        ])
        .await;

        let tracker = Tracker::new(
            StatusClient::new(5).unwrap(),
            secrets_for(&["acme", "globex"]),
            dir.clone(),
        );
        let report = tracker
            .run(&[company("acme", &base), company("globex", &base)])
            .await;

        assert!(matches!(report.outcome("acme"), Some(CompanyOutcome::Failed { .. })));
        assert!(matches!(
            report.outcome("globex"),
            Some(CompanyOutcome::Saved { records: 1, .. })
        ));

        let content = std::fs::read_to_string(dir.join("globex.txt")).unwrap();
        assert!(content.contains("Job Title: Unknown Title\n"));
        assert!(content.contains("Status: Offer\n"));
        assert!(!dir.join("acme.txt").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
