use postgres::types::ToSql;
use postgres::{Client, Row};
use std::time::{Duration, Instant};

pub const DEFAULT_LOG_TARGET: &str = "pgfixture::db";

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    /// Log every statement at debug level.
    pub log_statements: bool,
    /// Statements running longer than this are logged at warn level.
    pub slow_statement_threshold: Duration,
    /// Timeout used by [`Database::ping`].
    pub ping_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            log_statements: true,
            slow_statement_threshold: Duration::from_secs(1),
            ping_timeout: Duration::from_secs(5),
        }
    }
}

/// A connection bound to a logical database name, logging the statements it
/// runs under its own log target.
pub struct Database {
    client: Client,
    name: String,
    options: DatabaseOptions,
    log_target: String,
}

impl Database {
    pub fn wrap(
        client: Client,
        options: Option<DatabaseOptions>,
        name: impl Into<String>,
        log_target: impl Into<String>,
    ) -> Self {
        Database {
            client,
            name: name.into(),
            options: options.unwrap_or_default(),
            log_target: log_target.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn log_target(&self) -> &str {
        &self.log_target
    }

    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    pub fn ping(&mut self) -> Result<(), postgres::Error> {
        self.client.is_valid(self.options.ping_timeout)
    }

    pub fn execute(
        &mut self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, postgres::Error> {
        let started = Instant::now();
        let result = self.client.execute(statement, params);
        self.trace(statement, started);
        result
    }

    pub fn query(
        &mut self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, postgres::Error> {
        let started = Instant::now();
        let result = self.client.query(statement, params);
        self.trace(statement, started);
        result
    }

    pub fn query_one(
        &mut self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Row, postgres::Error> {
        let started = Instant::now();
        let result = self.client.query_one(statement, params);
        self.trace(statement, started);
        result
    }

    pub fn batch_execute(&mut self, statements: &str) -> Result<(), postgres::Error> {
        let started = Instant::now();
        let result = self.client.batch_execute(statements);
        self.trace(statements, started);
        result
    }

    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    pub fn into_inner(self) -> Client {
        self.client
    }

    fn trace(&self, statement: &str, started: Instant) {
        let elapsed = started.elapsed();
        if elapsed >= self.options.slow_statement_threshold {
            log::warn!(
                target: self.log_target.as_str(),
                "[{}] slow statement ({:.3}s): {}",
                self.name,
                elapsed.as_secs_f64(),
                statement
            );
        } else if self.options.log_statements {
            log::debug!(
                target: self.log_target.as_str(),
                "[{}] {:.3}ms: {}",
                self.name,
                elapsed.as_secs_f64() * 1000.0,
                statement
            );
        }
    }
}
