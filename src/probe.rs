use crate::error::ProvisionError;
use backon::{BlockingRetryable, ExponentialBuilder};
use postgres::{Client, Config, NoTls};
use std::time::{Duration, Instant};

const MIN_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(5);
const BACKOFF_FACTOR: f32 = 1.5;

/// Exponential backoff without an attempt limit. The loop is bounded by its
/// wall-clock deadline instead.
fn retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(MIN_DELAY)
        .with_max_delay(MAX_DELAY)
        .with_factor(BACKOFF_FACTOR)
        .with_max_times(usize::MAX)
}

/// Open a fresh connection to `dsn` and ping it until one attempt succeeds
/// or `max_wait` has elapsed.
///
/// The server inside a freshly started container accepts and drops
/// connections while initdb runs, so early failures are expected. Once the
/// deadline passes no further attempt is made and the last driver error is
/// returned inside [`ProvisionError::Timeout`].
pub(crate) fn wait_until_ready(
    dsn: &str,
    max_wait: Duration,
    connect_timeout: Duration,
) -> Result<Client, ProvisionError> {
    let mut config: Config = dsn.parse().map_err(|source| ProvisionError::Dsn {
        dsn: dsn.to_owned(),
        source,
    })?;
    config.connect_timeout(connect_timeout);

    let started = Instant::now();
    let deadline = deadline_after(started, max_wait);

    (|| connect_and_ping(&config, connect_timeout))
        .retry(retry_policy())
        .sleep(std::thread::sleep)
        .when(|_| deadline.map_or(true, |deadline| Instant::now() < deadline))
        .notify(|err, dur| {
            log::debug!(
                "Database not ready after {:.1}s ({}), retrying in {:.1}s",
                started.elapsed().as_secs_f32(),
                err,
                dur.as_secs_f32()
            );
        })
        .call()
        .map_err(|source| ProvisionError::Timeout {
            dsn: dsn.to_owned(),
            waited: started.elapsed(),
            source,
        })
}

/// `None` when the budget reaches past what `Instant` can represent; the
/// loop then runs until the database answers.
fn deadline_after(started: Instant, max_wait: Duration) -> Option<Instant> {
    started.checked_add(max_wait)
}

fn connect_and_ping(config: &Config, timeout: Duration) -> Result<Client, postgres::Error> {
    let mut client = config.connect(NoTls)?;
    client.is_valid(timeout)?;
    Ok(client)
}
