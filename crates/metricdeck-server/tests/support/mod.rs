//! Shared fixtures: a temp directory holding the database and seed files.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use metricdeck_server::app_state::{AppState, Overrides};
use metricdeck_server::config::{self, AppConfig};
use metricdeck_server::db::Database;
use metricdeck_server::persistence;
use metricdeck_server::uow::{PersistenceRegistry, UnitOfWorkFactory};

pub const METRICS_JSON: &str = "metrics.json";
pub const RECORDS_JSON: &str = "metric_records.json";
pub const QUERIES_CSV: &str = "queries.csv";
pub const KEYS_YAML: &str = "keys.yaml";

pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn config(&self) -> AppConfig {
        self.config_with(false)
    }

    pub fn config_with(&self, auth: bool) -> AppConfig {
        self.config_custom(auth, 2000)
    }

    pub fn config_custom(&self, auth: bool, busy_timeout_ms: u64) -> AppConfig {
        let auth_section = if auth {
            format!(
                "auth:\n  enabled: true\n  keys_file: \"{}\"\n",
                self.path(KEYS_YAML).display()
            )
        } else {
            String::new()
        };
        let yaml = format!(
            r#"
version: 1
database:
  path: "{db}"
  busy_timeout_ms: {busy_timeout_ms}
seed:
  on_startup: false
  metrics_json: "{metrics}"
  metric_records_json: "{records}"
  queries_csv: "{queries}"
{auth_section}"#,
            db = self.path("metricdeck.db").display(),
            metrics = self.path(METRICS_JSON).display(),
            records = self.path(RECORDS_JSON).display(),
            queries = self.path(QUERIES_CSV).display(),
        );
        config::load_from_str(&yaml).unwrap()
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.config()).unwrap()
    }

    pub fn state_with_busy_timeout(&self, busy_timeout_ms: u64) -> AppState {
        AppState::new(self.config_custom(false, busy_timeout_ms)).unwrap()
    }

    pub fn state_with_registry(&self, registry: PersistenceRegistry) -> AppState {
        AppState::with_overrides(
            self.config(),
            Overrides {
                registry: Some(registry),
                ..Overrides::default()
            },
        )
        .unwrap()
    }

    pub fn uow_factory(&self) -> UnitOfWorkFactory {
        let db = Database::open(&self.config().database).unwrap();
        UnitOfWorkFactory::new(db, Arc::new(persistence::sqlite_registry()))
    }
}

/// Row count of `table`, read in its own unit of work.
pub fn count_rows(uow: &UnitOfWorkFactory, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    uow.run(|scope| {
        Ok(scope
            .session()
            .conn()
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .unwrap())
    })
    .unwrap()
}

pub const METRICS_DOC: &str = r#"{
  "items": [
    {"id": "11111111-1111-4111-8111-111111111111", "queryId": "q-obsolescence", "isEditable": true},
    {"id": "22222222-2222-4222-8222-222222222222", "query_id": "q-parts", "isEditable": false}
  ],
  "layouts": {
    "lg": [
      {"i": "11111111-1111-4111-8111-111111111111", "x": 0, "y": 0, "w": 6, "h": 4},
      {"i": "22222222-2222-4222-8222-222222222222", "x": 6, "y": 0, "w": 6, "h": 4, "static": true}
    ],
    "sm": [
      {"i": "11111111-1111-4111-8111-111111111111", "x": 0, "y": 0, "w": 12, "h": 4}
    ]
  }
}"#;

pub const RECORDS_DOC: &str = r#"[
  {"id": "q-obsolescence", "date": "2025-06-03T00:00:00", "obsolescence_val": 12.5, "obsolescence": 0.4, "parts_flagged": 3, "alert_type": "warning", "alert_category": "supply"},
  {"id": "q-obsolescence", "date": "2025-06-10", "obsolescence_val": 14.0, "obsolescence": 0.5, "parts_flagged": 5},
  {"id": "q-parts", "date": "2025-07-01T08:00:00Z", "parts_flagged": 9}
]"#;

pub const QUERIES_DOC: &str = "id,query
q-obsolescence,\"SELECT date, obsolescence_val, parts_flagged
FROM metrics
WHERE id = :query_id AND date >= :start_date AND date < date(:end_date, '+1 day')
ORDER BY date\"
q-parts,\"SELECT date, parts_flagged FROM metrics WHERE id = :query_id ORDER BY date\"
";

/// Writes all three seed documents.
pub fn write_seed_files(env: &TestEnv) {
    env.write(METRICS_JSON, METRICS_DOC);
    env.write(RECORDS_JSON, RECORDS_DOC);
    env.write(QUERIES_CSV, QUERIES_DOC);
}
