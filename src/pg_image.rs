use crate::config::ProvisionRequest;
use std::borrow::Cow;
use std::collections::BTreeMap;
use testcontainers_modules::testcontainers::core::{ContainerPort, WaitFor};
use testcontainers_modules::testcontainers::Image;

/// Postgres image described by a [`ProvisionRequest`].
///
/// Unlike the image modules shipped with testcontainers this one declares no
/// ready conditions: the container counts as started as soon as Docker
/// reports it running, and readiness is established by the probe loop.
///
/// The server is started as `postgres -c listen_addresses=<addr>`; the
/// official entrypoint prepends `postgres` to arguments starting with `-`.
#[derive(Debug, Clone)]
pub struct PostgresImage {
    name: String,
    tag: String,
    env_vars: BTreeMap<String, String>,
    cmd: Vec<String>,
    exposed_ports: Vec<ContainerPort>,
}

impl From<&ProvisionRequest> for PostgresImage {
    fn from(request: &ProvisionRequest) -> Self {
        let env_vars = request
            .env_vars()
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();

        Self {
            name: request.image.clone(),
            tag: request.tag.clone(),
            env_vars,
            cmd: vec![
                "-c".to_owned(),
                format!("listen_addresses={}", request.listen_addresses),
            ],
            exposed_ports: vec![ContainerPort::Tcp(request.container_port)],
        }
    }
}

impl Image for PostgresImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn ready_conditions(&self) -> Vec<WaitFor> {
        Vec::new()
    }

    fn env_vars(
        &self,
    ) -> impl IntoIterator<Item = (impl Into<Cow<'_, str>>, impl Into<Cow<'_, str>>)> {
        &self.env_vars
    }

    fn cmd(&self) -> impl IntoIterator<Item = impl Into<Cow<'_, str>>> {
        &self.cmd
    }

    fn expose_ports(&self) -> &[ContainerPort] {
        &self.exposed_ports
    }
}
