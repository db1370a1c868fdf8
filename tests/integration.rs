use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use txn_backfill::{
    parser::{parse, reader},
    report::{OutcomeLog, ERROR_LOG, SUCCESS_LOG},
    store::TransactionStore,
    updater::{exit_status, RunSummary, Updater, EXIT_OK, EXIT_ROWS_FAILED},
};

/// In-memory stand-in for `new_score_transactions`.
struct Table {
    ids: HashSet<String>,
    statements: Vec<(String, NaiveDateTime)>,
}

impl Table {
    fn with(ids: &[&str]) -> Self {
        Table {
            ids: ids.iter().map(|id| id.to_string()).collect(),
            statements: Vec::new(),
        }
    }
}

#[async_trait]
impl TransactionStore for Table {
    async fn update_datetime(
        &mut self,
        id: &str,
        datetime: NaiveDateTime,
    ) -> Result<u64, sqlx::Error> {
        self.statements.push((id.to_string(), datetime));
        Ok(self.ids.contains(id) as u64)
    }
}

struct Run {
    summary: RunSummary,
    statements: Vec<String>,
    success: String,
    error: String,
}

async fn process_and_dump(input: &str, existing: &[&str]) -> Run {
    let rows = parse(reader(input.as_bytes())).unwrap();
    let mut updater = Updater::new(
        Table::with(existing),
        OutcomeLog::new(Vec::new(), Vec::new()),
    );
    let summary = updater.run(rows).await.unwrap();

    let (table, log) = updater.into_parts();
    let (success, error) = log.into_inner();
    Run {
        summary,
        statements: table
            .statements
            .iter()
            .map(|(id, dt)| format!("{} {}", id, dt))
            .collect(),
        success: String::from_utf8(success).unwrap(),
        error: String::from_utf8(error).unwrap(),
    }
}

#[tokio::test]
async fn empty() {
    let run = process_and_dump("transaction_id,transaction_datetime", &[]).await;
    assert_eq!(run.summary, RunSummary::default());
    assert_eq!(run.success, "");
    assert_eq!(run.error, "");
    assert_eq!(exit_status(&Ok(run.summary)), EXIT_OK);
}

#[tokio::test]
async fn mixed_rows() {
    let run = process_and_dump(
        &[
            "transaction_id,transaction_datetime",
            r#""T1","2024-01-02 10:00:00""#,
            r#""","2024-01-02 10:00:00""#,
            r#""T3","not-a-date""#,
        ]
        .join("\n"),
        &["T1", "T3"],
    )
    .await;

    assert_eq!(run.statements, vec!["T1 2024-01-02 10:00:00"]);
    assert_eq!(
        run.success,
        "Row 1: Updated transaction_id T1 for transaction_datetime 2024-01-02 10:00:00\n"
    );
    assert_eq!(
        run.error,
        [
            "Row 2: Empty transaction_id",
            "Row 3: Invalid datetime for ID T3: 'not-a-date'",
            "",
        ]
        .join("\n")
    );
    assert_eq!(run.summary.failures(), 2);
    assert_eq!(exit_status(&Ok(run.summary)), EXIT_ROWS_FAILED);
}

#[tokio::test]
async fn missing_record() {
    let run = process_and_dump(
        r#"transaction_id,transaction_datetime
        T9, 2024-01-02 10:00:00"#,
        &["T1"],
    )
    .await;

    assert_eq!(run.statements, vec!["T9 2024-01-02 10:00:00"]);
    assert_eq!(run.success, "");
    assert_eq!(
        run.error,
        "Row 1: DB update failed for transaction_id T9 for transaction_datetime 2024-01-02 10:00:00: No record found for ID T9\n"
    );
    assert_eq!(run.summary.not_found, 1);
}

#[tokio::test]
async fn malformed_line_is_reported_and_skipped() {
    let run = process_and_dump(
        r#"transaction_id,transaction_datetime,source
        T1,2024-01-02 10:00:00,batch-a
        T2
        T3,2024-01-03 23:59:59,batch-b"#,
        &["T1", "T2", "T3"],
    )
    .await;

    assert_eq!(
        run.statements,
        vec!["T1 2024-01-02 10:00:00", "T3 2024-01-03 23:59:59"]
    );
    assert_eq!(
        run.success,
        [
            "Row 1: Updated transaction_id T1 for transaction_datetime 2024-01-02 10:00:00",
            "Row 3: Updated transaction_id T3 for transaction_datetime 2024-01-03 23:59:59",
            "",
        ]
        .join("\n")
    );
    assert!(run.error.starts_with("Row 2: Malformed CSV record: "));
    assert_eq!(run.error.lines().count(), 1);
    assert_eq!(run.summary.malformed, 1);
}

#[tokio::test]
async fn every_valid_row_issues_one_statement() {
    let run = process_and_dump(
        r#"transaction_id,transaction_datetime
        A,2024-02-29 00:00:00
        A,2024-03-01 12:34:56
        B,2024-13-01 00:00:00
        B,2024-3-1 1:2:3
        C,2023-12-31 23:59:59"#,
        &["A"],
    )
    .await;

    assert_eq!(
        run.statements,
        vec![
            "A 2024-02-29 00:00:00",
            "A 2024-03-01 12:34:56",
            "C 2023-12-31 23:59:59"
        ]
    );
    assert_eq!(
        run.summary,
        RunSummary {
            rows: 5,
            updated: 2,
            invalid_datetime: 2,
            not_found: 1,
            ..RunSummary::default()
        }
    );
}

#[tokio::test]
async fn writes_log_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = "transaction_id,transaction_datetime\nT1,2024-01-02 10:00:00\n,2024-01-02 10:00:00\n";

    let mut updater = Updater::new(Table::with(&["T1"]), OutcomeLog::create(dir.path()).unwrap());
    updater
        .run(parse(reader(input.as_bytes())).unwrap())
        .await
        .unwrap();
    drop(updater);

    assert_eq!(
        std::fs::read_to_string(dir.path().join(SUCCESS_LOG)).unwrap(),
        "Row 1: Updated transaction_id T1 for transaction_datetime 2024-01-02 10:00:00\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join(ERROR_LOG)).unwrap(),
        "Row 2: Empty transaction_id\n"
    );
}
