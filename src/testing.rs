//! Panicking variants of the provisioning entry points for test setup.
//!
//! ```no_run
//! let (mut client, cleanup) = pgfixture::testing::database();
//! client.batch_execute("create table account (id int primary key)").unwrap();
//! cleanup.release();
//! ```

use crate::cleanup::Cleanup;
use crate::config::DEFAULT_DATABASE;
use crate::db::{Database, DEFAULT_LOG_TARGET};
use crate::error::report;
use postgres::Client;

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// [`crate::provision_database`], panicking on failure.
#[track_caller]
pub fn database() -> (Client, Cleanup) {
    init_logging();
    match crate::provision_database() {
        Ok(provisioned) => provisioned,
        Err(e) => fail(&e),
    }
}

/// [`crate::provision_connection_string`], panicking on failure.
#[track_caller]
pub fn connection_string() -> (String, Cleanup) {
    init_logging();
    match crate::provision_connection_string() {
        Ok(provisioned) => provisioned,
        Err(e) => fail(&e),
    }
}

/// [`database`] wrapped in a [`Database`] named `test`, logging under
/// `log_target` (or [`DEFAULT_LOG_TARGET`]).
#[track_caller]
pub fn wrapped_database(log_target: Option<&str>) -> (Database, Cleanup) {
    let (client, cleanup) = database();
    let db = Database::wrap(
        client,
        None,
        DEFAULT_DATABASE,
        log_target.unwrap_or(DEFAULT_LOG_TARGET),
    );
    (db, cleanup)
}

#[track_caller]
fn fail(err: &crate::ProvisionError) -> ! {
    panic!("Could not create postgres db: {}", report(err))
}
