use crate::backend::{ContainerBackend, ProvisionedResource};
use crate::cleanup::Cleanup;
use crate::config::ProvisionRequest;
use crate::docker::DockerBackend;
use crate::error::{report, ProvisionError};
use crate::probe::wait_until_ready;
use postgres::Client;

/// Starts disposable Postgres containers on a [`ContainerBackend`].
///
/// Every successful call hands back a [`Cleanup`] owning the container it
/// started. Failures are logged where they happen and returned; nothing is
/// retried except the readiness probe.
pub struct Provisioner<B> {
    backend: B,
    request: ProvisionRequest,
}

impl Provisioner<DockerBackend> {
    /// Provisioner for the local Docker daemon with the default request.
    pub fn docker() -> Result<Self, ProvisionError> {
        let backend = DockerBackend::connect()
            .inspect_err(|e| log::error!("Could not construct pool: {}", report(e)))?;
        Ok(Provisioner::new(backend))
    }
}

impl<B: ContainerBackend> Provisioner<B> {
    pub fn new(backend: B) -> Self {
        Provisioner {
            backend,
            request: ProvisionRequest::default(),
        }
    }

    pub fn with_request(mut self, request: ProvisionRequest) -> Self {
        self.request = request;
        self
    }

    pub fn request(&self) -> &ProvisionRequest {
        &self.request
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a database and return an open, pinged connection to it.
    pub fn connection(&self) -> Result<(Client, Cleanup), ProvisionError> {
        let ready = self.provision()?;
        Ok((ready.client, ready.cleanup))
    }

    /// Start a database and return only its connection string. The probe
    /// connection is closed before returning.
    pub fn connection_string(&self) -> Result<(String, Cleanup), ProvisionError> {
        let ready = self.provision()?;
        Ok((ready.dsn, ready.cleanup))
    }

    fn provision(&self) -> Result<Ready, ProvisionError> {
        let request = &self.request;
        let Started { dsn, cleanup } = self.start()?;

        log::info!("Connecting to database on url: {dsn}");

        let client = wait_until_ready(&dsn, request.max_wait, request.probe_connect_timeout)
            .inspect_err(|e| log::error!("Could not connect to database: {}", report(e)))?;

        Ok(Ready {
            client,
            dsn,
            cleanup,
        })
    }

    /// Everything up to the readiness wait: ping, run, resolve the port.
    fn start(&self) -> Result<Started, ProvisionError> {
        let request = &self.request;

        self.backend
            .ping()
            .inspect_err(|e| log::error!("Could not connect to Docker: {}", report(e)))?;

        let resource = self
            .backend
            .run(request)
            .inspect_err(|e| log::error!("Could not start resource: {}", report(e)))?;
        let resource: Box<dyn ProvisionedResource> = Box::new(resource);
        let host_port = resource.host_port(request.container_port);

        // From here on every early return drops the guard and removes the
        // container again.
        let cleanup = Cleanup::new(resource);

        let host_port = host_port.inspect_err(|e| {
            log::error!(
                "Could not resolve {}/tcp of resource: {}",
                request.container_port,
                report(e)
            )
        })?;

        Ok(Started {
            dsn: request.dsn(&host_port),
            cleanup,
        })
    }
}

struct Started {
    dsn: String,
    cleanup: Cleanup,
}

struct Ready {
    client: Client,
    dsn: String,
    cleanup: Cleanup,
}
