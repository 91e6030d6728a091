//! Airtable-compatible REST backend

use crate::config::RemoteConfig;
use crate::error::SubmitError;
use crate::record::SubmissionRecord;
use crate::{RecordReceipt, RemoteStore};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct CreateRecord<'a> {
    fields: &'a SubmissionRecord,
}

#[derive(Deserialize)]
struct CreatedRecord {
    #[serde(default)]
    id: Option<String>,
}

/// Appends records with `POST {endpoint}/{base}/{table}`
#[derive(Debug, Clone)]
pub struct AirtableStore {
    client: Client,
    url: Url,
    api_key: String,
}

impl AirtableStore {
    /// Build a client for `config`
    ///
    /// # Errors
    /// `SubmitError::InvalidConfig` for an unparseable endpoint or missing
    /// credentials; `SubmitError::Transport` if the HTTP client cannot be
    /// built.
    pub fn new(config: &RemoteConfig) -> Result<Self, SubmitError> {
        if !config.is_configured() {
            return Err(SubmitError::InvalidConfig(
                "api key, base id and table name are required".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: table_url(config)?,
            api_key: config.api_key.trim().to_string(),
        })
    }

    /// Target URL for appends
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn table_url(config: &RemoteConfig) -> Result<Url, SubmitError> {
    let mut url = Url::parse(config.endpoint.trim())
        .map_err(|e| SubmitError::InvalidConfig(format!("endpoint: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| SubmitError::InvalidConfig("endpoint cannot be a base URL".to_string()))?
        .pop_if_empty()
        .push(config.base_id.trim())
        .push(config.table_name.trim());
    Ok(url)
}

/// Human-readable failure text from an error response body
fn rejection_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_body = parsed.as_ref().and_then(|v| {
        let error = v.get("error")?;
        error
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| error.as_str())
            .map(str::to_string)
    });
    from_body.unwrap_or_else(|| {
        format!(
            "Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status")
        )
    })
}

#[async_trait]
impl RemoteStore for AirtableStore {
    async fn append(&self, record: &SubmissionRecord) -> Result<RecordReceipt, SubmitError> {
        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .json(&CreateRecord { fields: record })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        let id = serde_json::from_str::<CreatedRecord>(&body)
            .ok()
            .and_then(|created| created.id);
        Ok(RecordReceipt { id })
    }
}
