use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use txn_backfill::{
    config::ConnectionConfig,
    parser::{parse, reader},
    report::OutcomeLog,
    storage::{fetch_object, make_s3_client},
    store::PgStore,
    updater::{exit_status, RunSummary, Updater},
    Error,
};

/// Backfill `transaction_datetime` values from a CSV export in S3.
///
/// All connection settings come from the environment (or a `.env` file).
#[derive(Parser)]
struct Cli {
    /// Directory where success_logs.txt and error_logs.txt are created
    #[clap(long, default_value = ".")]
    log_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();
    let result = run(&cli).await;
    match &result {
        Ok(summary) if summary.failures() > 0 => {
            info!(failed = summary.failures(), "some rows were not updated");
        }
        Ok(_) => {}
        Err(e) => error!(error = %e, "batch update aborted"),
    }
    ExitCode::from(exit_status(&result))
}

async fn run(cli: &Cli) -> Result<RunSummary, Error> {
    let config = ConnectionConfig::from_env()?;
    info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        bucket = %config.object.bucket,
        key = %config.object.key,
        "starting batch update"
    );

    let store = PgStore::connect_lazy(&config.database);
    let client = make_s3_client(&config.object).await;
    let bytes = fetch_object(&client, &config.object).await?;

    let log = OutcomeLog::create(&cli.log_dir)?;
    let rows = parse(reader(bytes.as_slice()))?;

    let mut updater = Updater::new(store, log);
    let result = updater.run(rows).await;
    let (store, _) = updater.into_parts();
    store.close().await;

    result
}
