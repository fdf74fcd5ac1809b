use super::*;
use pgfixture::*;
use postgres::{Client, NoTls};
use serial_test::serial;

#[test]
#[serial]
fn unreachable_daemon_is_a_connectivity_error() {
    let previous = std::env::var_os("DOCKER_HOST");
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("Failed to reserve a port")
        .port();
    std::env::set_var("DOCKER_HOST", format!("tcp://127.0.0.1:{port}"));

    let result = provision_connection_string();

    match previous {
        Some(value) => std::env::set_var("DOCKER_HOST", value),
        None => std::env::remove_var("DOCKER_HOST"),
    }
    assert!(matches!(result, Err(ProvisionError::Connectivity(_))));
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn provisioned_connection_answers_queries() {
    let (mut client, cleanup) = provision_database().expect("Should provision database");

    assert!(client.is_valid(std::time::Duration::from_secs(5)).is_ok());
    let row = client
        .query_one("SELECT current_database(), current_user", &[])
        .expect("Should query database");
    assert_eq!(row.get::<_, String>(0), "test");
    assert_eq!(row.get::<_, String>(1), "postgres");

    cleanup.release();
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn release_makes_database_unreachable() {
    let (dsn, cleanup) = provision_connection_string().expect("Should provision database");
    Client::connect(&dsn, NoTls).expect("Should connect before release");

    cleanup.release();

    assert!(Client::connect(&dsn, NoTls).is_err());
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn release_tolerates_externally_removed_container() {
    let (_dsn, cleanup) = provision_connection_string().expect("Should provision database");
    let id = cleanup.resource_id().expect("Should expose container id").to_owned();

    remove_container(&id);

    cleanup.release();
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn sequential_provisions_are_independent() {
    let (first_dsn, first_cleanup) = provision_connection_string().expect("Should provision first");
    let (second_dsn, second_cleanup) =
        provision_connection_string().expect("Should provision second");

    assert_ne!(split_dsn(&first_dsn).1, split_dsn(&second_dsn).1);
    assert_ne!(first_cleanup.resource_id(), second_cleanup.resource_id());

    first_cleanup.release();

    let mut client = Client::connect(&second_dsn, NoTls).expect("Second database survives");
    client.batch_execute("SELECT 1").expect("Second database answers");
    second_cleanup.release();
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn both_variants_build_the_same_dsn_shape() {
    let provisioner = Provisioner::docker().expect("Should reach Docker");

    let (dsn, cleanup) = provisioner.connection_string().expect("Should provision database");
    let (_client, other_cleanup) = provisioner.connection().expect("Should provision database");
    let host_port = {
        let (_, host_port, _) = split_dsn(&dsn);
        host_port.to_owned()
    };

    assert_eq!(dsn, provisioner.request().dsn(&host_port));
    let (prefix, _, suffix) = split_dsn(&dsn);
    assert_eq!(prefix, "postgres://postgres:secret");
    assert_eq!(suffix, "test?sslmode=disable");

    cleanup.release();
    other_cleanup.release();
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn custom_request_is_honoured() {
    let request = ProvisionRequest::builder()
        .tag("16-alpine")
        .user("app")
        .password("app-secret")
        .database("orders")
        .build();
    let provisioner = Provisioner::docker()
        .expect("Should reach Docker")
        .with_request(request);

    let (mut client, cleanup) = provisioner.connection().expect("Should provision database");

    let row = client
        .query_one("SELECT current_database(), current_user, current_setting('listen_addresses')", &[])
        .expect("Should query database");
    assert_eq!(row.get::<_, String>(0), "orders");
    assert_eq!(row.get::<_, String>(1), "app");
    assert_eq!(row.get::<_, String>(2), "*");

    cleanup.release();
}

#[test]
#[serial]
#[ignore] // Ignore by default since it requires Docker
fn dropped_cleanup_removes_the_container() {
    let dsn = {
        let (dsn, _cleanup) = pgfixture::testing::connection_string();
        dsn
    };

    assert!(Client::connect(&dsn, NoTls).is_err());
}
