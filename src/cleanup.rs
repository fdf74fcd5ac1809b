use crate::backend::ProvisionedResource;
use crate::error::report;
use std::fmt;

/// Teardown capability for one provisioned container.
///
/// [`Cleanup::release`] purges the container. A handle that is dropped
/// without being released purges on drop, so a panicking test still removes
/// its container. Purge failures are logged and never surface to the caller:
/// a leaked container must not fail the test that owned it.
#[must_use = "dropping the cleanup handle removes the container immediately"]
pub struct Cleanup {
    resource: Option<Box<dyn ProvisionedResource>>,
}

impl Cleanup {
    pub(crate) fn new(resource: Box<dyn ProvisionedResource>) -> Self {
        Cleanup {
            resource: Some(resource),
        }
    }

    /// Id of the container this handle tears down.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource.as_ref().map(|r| r.id())
    }

    /// Force-stop and remove the container.
    pub fn release(mut self) {
        self.purge();
    }

    fn purge(&mut self) {
        let Some(resource) = self.resource.take() else {
            return;
        };
        let id = resource.id().to_owned();

        match resource.purge() {
            Ok(()) => log::info!("Purged resource {id}"),
            Err(e) => log::error!("Could not purge resource: {}", report(&e)),
        }
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        self.purge();
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanup")
            .field("resource", &self.resource_id())
            .finish()
    }
}
