use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

use crate::config::DatabaseConfig;

/// How long a row waits for the connection before it is logged as a write failure.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub const UPDATE_DATETIME: &str =
    "UPDATE new_score_transactions SET transaction_datetime = $1 WHERE transaction_id = $2";

/// Where transaction datetimes get written.
#[async_trait]
pub trait TransactionStore {
    /// Set `transaction_datetime` for `id`, returning the number of rows touched.
    async fn update_datetime(&mut self, id: &str, datetime: NaiveDateTime)
        -> Result<u64, sqlx::Error>;
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build the pool without connecting; the first update opens the connection.
    /// An unreachable database turns each row into a write failure after
    /// [`ACQUIRE_TIMEOUT`].
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(PgSslMode::Disable);
        let pool = pool_options().connect_lazy_with(options);
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn update_datetime(
        &mut self,
        id: &str,
        datetime: NaiveDateTime,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(UPDATE_DATETIME)
            .bind(datetime.and_utc())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
