//! Config and secrets files on disk, and config flowing into the dashboard.

use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use sanskriti::store::Statement;
use sanskriti::{Config, Dashboard, DataSource, ImageMode, Result, SanskritiError, Secrets, Table};

const CONFIG: &str = r#"
[store]
account_url = "https://xy12345.snowflakecomputing.com"
warehouse = "COMPUTE_WH"
database = "HERITAGE_DB"
poll_interval_ms = 250

[assets]
schema = "MEDIA"
image_mode = "bytes"
presigned_url_expiry_secs = 600

[tables]
dance = "CULTURAL_DATA.DANCE_FORMS_V2"
unesco = "ARCHIVE.WORLD.UNESCO"
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Records every statement it is asked to run.
#[derive(Default)]
struct RecordingSource {
    statements: Mutex<Vec<Statement>>,
}

#[async_trait]
impl DataSource for RecordingSource {
    fn name(&self) -> &str {
        "recording"
    }

    async fn query(&self, statement: &Statement) -> Result<Table> {
        self.statements.lock().unwrap().push(statement.clone());
        Ok(Table::empty())
    }
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn load_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.toml", CONFIG);

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(
        config.store.account_url.as_deref(),
        Some("https://xy12345.snowflakecomputing.com")
    );
    assert_eq!(config.store.database, "HERITAGE_DB");
    assert_eq!(config.store.poll_interval_ms, 250);
    assert_eq!(config.store.max_poll_attempts, 60);
    assert_eq!(config.assets.schema, "MEDIA");
    assert_eq!(config.assets.image_mode, ImageMode::Bytes);
    assert_eq!(config.assets.presigned_url_expiry_secs, Some(600));
    assert_eq!(config.tables.len(), 2);
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.toml", "[store\naccount_url = 1");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, SanskritiError::Configuration(_)));
}

#[test]
fn client_built_from_config() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&write(&dir, "config.toml", CONFIG)).unwrap();
    let client = config.snowflake_client("token").unwrap();
    assert_eq!(client.name(), "snowflake");
}

// ============================================================================
// Secrets
// ============================================================================

#[cfg(unix)]
#[test]
fn secrets_with_owner_only_permissions_load() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = write(&dir, "secrets.toml", "[snowflake]\ntoken = \"pat-123\"\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let secrets = Secrets::load_from(&path).unwrap();
    assert_eq!(secrets.snowflake.unwrap().token, "pat-123");
}

#[cfg(unix)]
#[test]
fn world_readable_secrets_are_rejected() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = write(&dir, "secrets.toml", "[snowflake]\ntoken = \"pat-123\"\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let err = Secrets::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("insecure permissions"));
}

#[test]
fn secret_token_is_redacted_in_debug() {
    let secrets: Secrets = toml::from_str("[snowflake]\ntoken = \"pat-123\"\n").unwrap();
    assert!(!format!("{secrets:?}").contains("pat-123"));
}

// ============================================================================
// Config into the dashboard
// ============================================================================

#[tokio::test]
async fn table_overrides_reach_the_store() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&write(&dir, "config.toml", CONFIG)).unwrap();
    let source = Arc::new(RecordingSource::default());

    let dashboard = Dashboard::builder()
        .source(source.clone())
        .config(&config)
        .build()
        .unwrap();
    assert_eq!(dashboard.image_mode(), ImageMode::Bytes);

    dashboard.load("dance").await;
    dashboard.load("unesco_sites").await;
    dashboard.load("festivals").await;

    let sql: Vec<String> = source
        .statements
        .lock()
        .unwrap()
        .iter()
        .map(Statement::sql)
        .collect();
    assert_eq!(
        sql,
        [
            "SELECT * FROM HERITAGE_DB.CULTURAL_DATA.DANCE_FORMS_V2",
            "SELECT * FROM ARCHIVE.WORLD.UNESCO",
            "SELECT * FROM HERITAGE_DB.CULTURAL_DATA.FESTIVALS",
        ]
    );
}

#[test]
fn bad_override_fails_the_build() {
    let result = Dashboard::builder()
        .source(Arc::new(RecordingSource::default()))
        .table_override("bollywood", "CULTURAL_DATA.FILMS")
        .build();
    assert!(matches!(result, Err(SanskritiError::UnknownDataset(name)) if name == "bollywood"));

    let result = Dashboard::builder()
        .source(Arc::new(RecordingSource::default()))
        .table_override("dance", "DANCE_FORMS")
        .build();
    assert!(matches!(result, Err(SanskritiError::Configuration(_))));
}

#[test]
fn builder_requires_a_source() {
    let result = Dashboard::builder().build();
    assert!(matches!(result, Err(SanskritiError::Configuration(_))));
}
