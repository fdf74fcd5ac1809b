use pgfixture::testing;
use pgfixture::{Database, DatabaseOptions, DEFAULT_LOG_TARGET};
use serial_test::serial;
use std::time::Duration;
use uuid::Uuid;

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn wrapped_database_runs_statements() {
    let (mut db, cleanup) = testing::wrapped_database(Some("integration::db"));

    assert_eq!(db.name(), "test");
    assert_eq!(db.log_target(), "integration::db");
    db.ping().expect("Should ping database");

    db.batch_execute("CREATE TABLE account (id uuid PRIMARY KEY, name text NOT NULL)")
        .expect("Should create table");
    let id = Uuid::new_v4().to_string();
    let inserted = db
        .execute(
            "INSERT INTO account (id, name) VALUES ($1::text::uuid, $2)",
            &[&id, &"Zak"],
        )
        .expect("Should insert row");
    assert_eq!(inserted, 1);

    let rows = db
        .query("SELECT name FROM account WHERE id = $1::text::uuid", &[&id])
        .expect("Should select row");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<_, String>("name"), "Zak");

    cleanup.release();
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn wrapped_database_defaults_its_log_target() {
    let (db, cleanup) = testing::wrapped_database(None);

    assert_eq!(db.log_target(), DEFAULT_LOG_TARGET);

    cleanup.release();
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn database_wraps_a_provisioned_client() {
    let (client, cleanup) = testing::database();
    let options = DatabaseOptions {
        log_statements: false,
        slow_statement_threshold: Duration::from_millis(10),
        ..Default::default()
    };
    let mut db = Database::wrap(client, Some(options), "reports", "integration::reports");

    let row = db
        .query_one("SELECT 42::int4 FROM pg_sleep(0.05)", &[])
        .expect("Should run slow statement");
    assert_eq!(row.get::<_, i32>(0), 42);
    assert!(!db.options().log_statements);

    let mut client = db.into_inner();
    client.batch_execute("SELECT 1").expect("Client survives unwrapping");

    cleanup.release();
}
