use crate::config::ProvisionRequest;
use crate::error::{ProvisionError, PurgeError};

/// A container runtime able to start the database described by a
/// [`ProvisionRequest`].
pub trait ContainerBackend {
    type Resource: ProvisionedResource + 'static;

    /// Liveness check of the runtime itself.
    fn ping(&self) -> Result<(), ProvisionError>;

    /// Pull (if needed), create and start a container.
    fn run(&self, request: &ProvisionRequest) -> Result<Self::Resource, ProvisionError>;
}

/// A running container owned by exactly one caller.
pub trait ProvisionedResource {
    fn id(&self) -> &str;

    /// Externally reachable `host:port` for `container_port`.
    fn host_port(&self, container_port: u16) -> Result<String, ProvisionError>;

    /// Force-stop and remove the container.
    fn purge(self: Box<Self>) -> Result<(), PurgeError>;
}
