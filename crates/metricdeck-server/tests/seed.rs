#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod support;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use metricdeck_core::model::{RecordType, SeedBatch};
use metricdeck_core::MetricDeckError;
use metricdeck_server::loaders::{
    CsvQueryLoader, JsonLayoutItemLoader, JsonMetricConfigurationLoader, JsonMetricRecordLoader,
    SeedLoader,
};
use metricdeck_server::persistence::{DataSeeder, MetricConfigurationReader, SeedOutcome};

use support::{count_rows, write_seed_files, TestEnv, METRICS_JSON, QUERIES_CSV, RECORDS_JSON};

#[tokio::test]
async fn seeding_an_empty_store_inserts_every_batch() {
    let env = TestEnv::new();
    write_seed_files(&env);
    let state = env.state();

    let report = state.seed().seed().await.unwrap();

    assert_eq!(
        report.outcome(RecordType::MetricConfiguration),
        Some(SeedOutcome::Inserted(2))
    );
    assert_eq!(report.outcome(RecordType::LayoutItem), Some(SeedOutcome::Inserted(3)));
    assert_eq!(report.outcome(RecordType::Query), Some(SeedOutcome::Inserted(2)));
    assert_eq!(report.outcome(RecordType::MetricRecord), Some(SeedOutcome::Inserted(3)));
    assert_eq!(report.inserted(), 10);

    let uow = state.uow();
    assert_eq!(count_rows(uow, "metric_configurations"), 2);
    assert_eq!(count_rows(uow, "layout_items"), 3);
    assert_eq!(count_rows(uow, "queries"), 2);
    assert_eq!(count_rows(uow, "metrics"), 3);
}

#[tokio::test]
async fn seeding_twice_inserts_nothing_the_second_time() {
    let env = TestEnv::new();
    write_seed_files(&env);
    let state = env.state();

    state.seed().seed().await.unwrap();
    let second = state.seed().seed().await.unwrap();

    assert_eq!(second.inserted(), 0);
    assert_eq!(
        second.outcome(RecordType::LayoutItem),
        Some(SeedOutcome::Skipped { existing: 3 })
    );
    assert_eq!(count_rows(state.uow(), "layout_items"), 3);
    assert_eq!(count_rows(state.uow(), "metrics"), 3);
}

#[tokio::test]
async fn non_empty_table_is_left_untouched() {
    let env = TestEnv::new();
    let state = env.state();
    let batch = SeedBatch::Queries(vec![metricdeck_core::model::Query {
        id: "q-1".into(),
        query: "SELECT 1".into(),
    }]);

    let first = batch.clone();
    let outcome = state
        .uow()
        .scope(move |uow| {
            let seeder = uow.persistence_factory::<dyn DataSeeder>()?;
            let outcome = seeder.seed(&first)?;
            uow.commit()?;
            Ok(outcome)
        })
        .await
        .unwrap();
    assert_eq!(outcome, SeedOutcome::Inserted(1));

    let outcome = state
        .uow()
        .scope(move |uow| {
            uow.persistence_factory::<dyn DataSeeder>()?.seed(&batch)
        })
        .await
        .unwrap();
    assert_eq!(outcome, SeedOutcome::Skipped { existing: 1 });
    assert_eq!(count_rows(state.uow(), "queries"), 1);
}

#[tokio::test]
async fn missing_seed_files_yield_empty_batches() {
    let env = TestEnv::new();
    let state = env.state();

    let report = state.seed().seed().await.unwrap();

    assert_eq!(report.inserted(), 0);
    assert_eq!(report.seeded.len(), 4);
    assert_eq!(count_rows(state.uow(), "metric_configurations"), 0);
}

#[derive(Clone)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn missing_seed_file_logs_a_warning() {
    let env = TestEnv::new();
    let loader = JsonMetricRecordLoader::new(env.path(RECORDS_JSON));

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = CapturedLogs(Arc::clone(&buffer));
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let batch = tracing::subscriber::with_default(subscriber, || {
        runtime.block_on(loader.load())
    })
    .unwrap();

    assert!(batch.is_empty());
    assert_eq!(batch.record_type(), RecordType::MetricRecord);

    let logs = String::from_utf8_lossy(&buffer.lock().unwrap()).into_owned();
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("seed file not found"), "logs: {logs}");
}

#[tokio::test]
async fn loaders_read_each_source() {
    let env = TestEnv::new();
    write_seed_files(&env);

    let configurations = JsonMetricConfigurationLoader::new(env.path(METRICS_JSON))
        .load()
        .await
        .unwrap();
    let SeedBatch::MetricConfigurations(configurations) = configurations else {
        panic!("wrong batch type");
    };
    assert_eq!(configurations[0].query_id.as_deref(), Some("q-obsolescence"));
    assert_eq!(configurations[1].query_id.as_deref(), Some("q-parts"));
    assert!(!configurations[1].is_editable);

    let layouts = JsonLayoutItemLoader::new(env.path(METRICS_JSON)).load().await.unwrap();
    let SeedBatch::LayoutItems(layouts) = layouts else {
        panic!("wrong batch type");
    };
    assert_eq!(layouts.len(), 3);
    assert!(layouts.iter().all(|l| !l.id.is_empty() && l.id != l.item_id));
    assert_eq!(layouts.iter().filter(|l| l.breakpoint == "lg").count(), 2);
    assert!(layouts.iter().any(|l| l.is_static == Some(true)));

    let queries = CsvQueryLoader::new(env.path(QUERIES_CSV)).load().await.unwrap();
    let SeedBatch::Queries(queries) = queries else {
        panic!("wrong batch type");
    };
    assert_eq!(queries.len(), 2);
    assert!(queries[0].query.contains('\n'));

    let records = JsonMetricRecordLoader::new(env.path(RECORDS_JSON)).load().await.unwrap();
    let SeedBatch::MetricRecords(records) = records else {
        panic!("wrong batch type");
    };
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].date.unwrap().to_string(), "2025-07-01 08:00:00");
}

#[tokio::test]
async fn known_duplicate_configuration_id_is_remapped() {
    let env = TestEnv::new();
    env.write(
        METRICS_JSON,
        r#"{"items": [
            {"id": "53aaf9d4-04d3-43d3-9f40-6ce4a9282a5c", "queryId": "a", "isEditable": true},
            {"id": "53aaf9d4-04d3-43d3-9f40-6ce4a9282a5c", "queryId": "b", "isEditable": false}
        ], "layouts": {}}"#,
    );
    let state = env.state();

    state.seed().seed().await.unwrap();

    let (first, second) = state
        .uow()
        .scope(|uow| {
            let reader = uow.persistence_factory::<dyn MetricConfigurationReader>()?;
            Ok((
                reader.get_configuration("53aaf9d4-04d3-43d3-9f40-6ce4a9282a5c")?,
                reader.get_configuration("1379a764-2543-45fd-a78b-8c5a65827417")?,
            ))
        })
        .await
        .unwrap();

    assert_eq!(first.unwrap().query_id.as_deref(), Some("a"));
    assert_eq!(second.unwrap().query_id.as_deref(), Some("b"));
}

#[tokio::test]
async fn failing_batch_rolls_back_every_type_seeded_in_the_call() {
    let env = TestEnv::new();
    write_seed_files(&env);
    // Duplicate primary key in the third batch.
    env.write(QUERIES_CSV, "id,query\nq-1,SELECT 1\nq-1,SELECT 2\n");
    let state = env.state();

    let err = state.seed().seed().await.unwrap_err();

    assert!(matches!(err, MetricDeckError::Storage(_)));
    assert_eq!(count_rows(state.uow(), "metric_configurations"), 0);
    assert_eq!(count_rows(state.uow(), "layout_items"), 0);
    assert_eq!(count_rows(state.uow(), "queries"), 0);
}

#[tokio::test]
async fn malformed_seed_file_is_a_parse_error() {
    let env = TestEnv::new();
    env.write(METRICS_JSON, "{ not json");
    let state = env.state();

    let err = state.seed().seed().await.unwrap_err();
    assert!(matches!(err, MetricDeckError::Parse(_)));
}
