use crate::backend::{ContainerBackend, ProvisionedResource};
use crate::config::ProvisionRequest;
use crate::error::{ProvisionError, PurgeError};
use crate::pg_image::PostgresImage;
use bollard::Docker;
use testcontainers_modules::testcontainers::core::ContainerPort;
use testcontainers_modules::testcontainers::runners::SyncRunner;
use testcontainers_modules::testcontainers::Container;
use tokio::runtime::{Builder, Runtime};

/// Local Docker daemon.
///
/// Liveness is checked through a `bollard` client; containers are run with
/// the blocking testcontainers runner, which resolves the daemon the same way
/// (`DOCKER_HOST`, then the platform default socket).
pub struct DockerBackend {
    docker: Docker,
    runtime: Runtime,
}

impl DockerBackend {
    /// Build a client for the local daemon. Does not talk to it yet.
    pub fn connect() -> Result<Self, ProvisionError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProvisionError::Connectivity(e.into()))?;
        let docker = runtime
            .block_on(async { Docker::connect_with_local_defaults() })
            .map_err(|e| ProvisionError::Connectivity(e.into()))?;

        Ok(DockerBackend { docker, runtime })
    }
}

impl ContainerBackend for DockerBackend {
    type Resource = DockerResource;

    fn ping(&self) -> Result<(), ProvisionError> {
        self.runtime
            .block_on(self.docker.ping())
            .map(|_| ())
            .map_err(|e| ProvisionError::Connectivity(e.into()))
    }

    fn run(&self, request: &ProvisionRequest) -> Result<DockerResource, ProvisionError> {
        let container = PostgresImage::from(request)
            .start()
            .map_err(|e| ProvisionError::provision(request.image_ref(), e))?;

        log::debug!("Started container {} from {}", container.id(), request.image_ref());

        Ok(DockerResource {
            container,
            image_ref: request.image_ref(),
        })
    }
}

/// A Postgres container started by [`DockerBackend`].
pub struct DockerResource {
    container: Container<PostgresImage>,
    image_ref: String,
}

impl ProvisionedResource for DockerResource {
    fn id(&self) -> &str {
        self.container.id()
    }

    fn host_port(&self, container_port: u16) -> Result<String, ProvisionError> {
        let host = self
            .container
            .get_host()
            .map_err(|e| ProvisionError::provision(self.image_ref.as_str(), e))?;
        let port = self
            .container
            .get_host_port_ipv4(ContainerPort::Tcp(container_port))
            .map_err(|e| ProvisionError::provision(self.image_ref.as_str(), e))?;

        Ok(format!("{host}:{port}"))
    }

    fn purge(self: Box<Self>) -> Result<(), PurgeError> {
        let id = self.container.id().to_owned();
        self.container
            .rm()
            .map_err(|e| PurgeError { id, source: e.into() })
    }
}
