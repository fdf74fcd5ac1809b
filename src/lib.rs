//! Disposable Postgres databases for integration tests.
//!
//! Each call starts its own `postgres:16` container, waits until the server
//! answers, and returns a connection (or connection string) together with a
//! [`Cleanup`] handle that removes the container again.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (mut client, cleanup) = pgfixture::provision_database()?;
//! client.batch_execute("create table account (id int primary key)")?;
//! cleanup.release();
//! # Ok(())
//! # }
//! ```
//!
//! Tests that would rather fail than handle errors use [`testing`].

use postgres::Client;

mod backend;
mod cleanup;
mod config;
mod db;
mod docker;
mod error;
mod pg_image;
mod probe;
mod provisioner;
pub mod testing;

pub use backend::{ContainerBackend, ProvisionedResource};
pub use cleanup::Cleanup;
pub use config::{
    ProvisionRequest, DEFAULT_DATABASE, DEFAULT_IMAGE, DEFAULT_MAX_WAIT, DEFAULT_PASSWORD,
    DEFAULT_TAG, DEFAULT_USER, POSTGRES_PORT,
};
pub use db::{Database, DatabaseOptions, DEFAULT_LOG_TARGET};
pub use docker::{DockerBackend, DockerResource};
pub use error::{BoxError, ProvisionError, PurgeError};
pub use pg_image::PostgresImage;
pub use provisioner::Provisioner;

/// Start a database on the local Docker daemon and return an open, pinged
/// connection to it.
pub fn provision_database() -> Result<(Client, Cleanup), ProvisionError> {
    Provisioner::docker()?.connection()
}

/// Start a database on the local Docker daemon and return its connection
/// string.
pub fn provision_connection_string() -> Result<(String, Cleanup), ProvisionError> {
    Provisioner::docker()?.connection_string()
}
