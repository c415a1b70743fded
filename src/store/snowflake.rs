//! Snowflake SQL API client.
//!
//! Executes statements through the SQL REST API
//! (`POST /api/v2/statements`). Statements that outlive the synchronous
//! window come back as `202 Accepted` and are polled by handle; results
//! split into several partitions are fetched partition by partition and
//! stitched back together.
//!
//! See: <https://docs.snowflake.com/en/developer-guide/sql-api/index>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::statement::Statement;
use super::traits::DataSource;
use crate::types::Table;
use crate::{Result, SanskritiError};

/// Default HTTP timeout per request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between polls of a running statement.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default number of polls before giving up on a running statement.
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

/// Default bearer token type.
pub const DEFAULT_TOKEN_TYPE: &str = "PROGRAMMATIC_ACCESS_TOKEN";

/// Client for the Snowflake SQL API.
#[derive(Clone)]
pub struct SnowflakeClient {
    http: Client,
    base_url: String,
    token: String,
    token_type: String,
    timeout: Duration,
    database: Option<String>,
    warehouse: Option<String>,
    role: Option<String>,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl SnowflakeClient {
    /// Create a client for an account URL
    /// (e.g. `https://xy12345.eu-west-1.snowflakecomputing.com`).
    pub fn new(account_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(account_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(
        account_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sanskriti/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SanskritiError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: account_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            timeout,
            database: None,
            warehouse: None,
            role: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        })
    }

    /// Set the `X-Snowflake-Authorization-Token-Type` header value
    /// (`OAUTH`, `KEYPAIR_JWT`, `PROGRAMMATIC_ACCESS_TOKEN`).
    pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Default database for statements.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Warehouse to run statements on.
    pub fn warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    /// Role to run statements as.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Polling cadence for statements still running after submission.
    pub fn polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("X-Snowflake-Authorization-Token-Type", &self.token_type)
            .header("Accept", "application/json")
    }

    fn statements_url(&self) -> String {
        format!("{}/api/v2/statements", self.base_url)
    }

    async fn submit(&self, sql: &str) -> Result<Progress> {
        let body = StatementRequest {
            statement: sql,
            timeout: self.timeout.as_secs(),
            database: self.database.as_deref(),
            warehouse: self.warehouse.as_deref(),
            role: self.role.as_deref(),
        };

        let response = self
            .authorize(self.http.post(self.statements_url()))
            .json(&body)
            .send()
            .await?;

        read_progress(response).await
    }

    async fn poll(&self, handle: &str) -> Result<StatementResponse> {
        let url = format!("{}/{}", self.statements_url(), handle);
        for attempt in 1..=self.max_poll_attempts {
            tokio::time::sleep(self.poll_interval).await;
            debug!(handle, attempt, "polling running statement");

            let response = self.authorize(self.http.get(&url)).send().await?;
            if let Progress::Complete(body) = read_progress(response).await? {
                return Ok(body);
            }
        }
        Err(SanskritiError::StatementTimeout {
            handle: handle.to_string(),
            attempts: self.max_poll_attempts,
        })
    }

    async fn fetch_partition(
        &self,
        handle: &str,
        partition: usize,
    ) -> Result<Vec<Vec<Option<String>>>> {
        let url = format!("{}/{}", self.statements_url(), handle);
        let response = self
            .authorize(self.http.get(&url))
            .query(&[("partition", partition)])
            .send()
            .await?;

        match read_progress(response).await? {
            Progress::Complete(body) => Ok(normalize_rows(body.data)),
            Progress::Running(_) => Err(SanskritiError::DataError(format!(
                "partition {partition} of {handle} not ready"
            ))),
        }
    }
}

#[async_trait]
impl DataSource for SnowflakeClient {
    fn name(&self) -> &str {
        "snowflake"
    }

    #[instrument(skip(self, statement), fields(statement = statement.kind()))]
    async fn query(&self, statement: &Statement) -> Result<Table> {
        let sql = statement.sql();
        let body = match self.submit(&sql).await? {
            Progress::Complete(body) => body,
            Progress::Running(handle) => self.poll(&handle).await?,
        };

        let meta = body.result_set_meta_data.unwrap_or_default();
        let columns = meta.row_type.into_iter().map(|c| c.name).collect();
        let mut table = Table::new(columns, normalize_rows(body.data));

        if meta.partition_info.len() > 1 {
            let handle = body.statement_handle.ok_or_else(|| {
                SanskritiError::DataError("partitioned result without statement handle".into())
            })?;
            for partition in 1..meta.partition_info.len() {
                let rows = self.fetch_partition(&handle, partition).await?;
                table.extend_rows(rows);
            }
        }

        debug!(rows = table.len(), "statement complete");
        Ok(table)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SanskritiError::Api {
                status: status.as_u16(),
                code: String::new(),
                message: format!("download failed for {url}"),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Outcome of a submit or poll call.
enum Progress {
    Complete(StatementResponse),
    Running(String),
}

async fn read_progress(response: Response) -> Result<Progress> {
    let status = response.status();
    match status {
        StatusCode::OK => Ok(Progress::Complete(response.json().await?)),
        StatusCode::ACCEPTED => {
            let body: StatementResponse = response.json().await?;
            let handle = body.statement_handle.ok_or_else(|| {
                SanskritiError::DataError("202 response without statement handle".into())
            })?;
            Ok(Progress::Running(handle))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(SanskritiError::AuthenticationFailed)
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<StatementResponse>(&text) {
                Ok(body) => (
                    body.code.unwrap_or_default(),
                    body.message.unwrap_or(text),
                ),
                Err(_) => (String::new(), text),
            };
            Err(SanskritiError::Api {
                status: status.as_u16(),
                code,
                message,
            })
        }
    }
}

/// Cells arrive as JSON strings or null; anything else is kept as its JSON text.
fn normalize_rows(data: Vec<Vec<serde_json::Value>>) -> Vec<Vec<Option<String>>> {
    data.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    serde_json::Value::Null => None,
                    serde_json::Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect()
        })
        .collect()
}

// ============================================================================
// API request/response types
// ============================================================================

#[derive(Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warehouse: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    statement_handle: Option<String>,
    #[serde(default)]
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<ColumnType>,
    #[serde(default)]
    partition_info: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}
