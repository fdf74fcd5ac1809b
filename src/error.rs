use std::path::PathBuf;
use std::time::Duration;

/// Boxed cause used wherever the failing collaborator is backend specific.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("could not connect to docker")]
    Connectivity(#[source] BoxError),

    #[error("could not start resource {image}")]
    Provision {
        image: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid connection string {dsn}")]
    Dsn {
        dsn: String,
        #[source]
        source: postgres::Error,
    },

    #[error("database on {dsn} not reachable after {:.1}s", .waited.as_secs_f64())]
    Timeout {
        dsn: String,
        waited: Duration,
        #[source]
        source: postgres::Error,
    },

    #[error("failed to read config file {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ProvisionError {
    pub(crate) fn provision(image: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ProvisionError::Provision {
            image: image.into(),
            source: source.into(),
        }
    }
}

/// `err` followed by its chain of causes, separated by `: `.
pub(crate) fn report(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Teardown failure. Only ever logged by [`crate::Cleanup`].
#[derive(Debug, thiserror::Error)]
#[error("could not purge resource {id}")]
pub struct PurgeError {
    pub id: String,
    #[source]
    pub source: BoxError,
}
