//! Interfaces to the cluster.
//!
//! Commands never talk to Kubernetes directly. Instead, they're handed a
//! `Factory`, which supplies the default namespace plus clients for the few
//! cluster operations we need. `kubernetes::Kubectl` implements all of these
//! using the `kubectl` binary, and tests substitute in-memory fakes.

use crate::prelude::*;

/// Looks up existing objects on the cluster.
pub trait ResourceResolver {
    /// Resolve `reference` (for example, `"cronjob/a-cronjob"`) in
    /// `namespace`, returning the latest version of each matching object.
    /// Lists are flattened into their individual items. A reference which
    /// matches nothing returns an empty `Vec`.
    fn resolve(&self, namespace: &str, reference: &str) -> Result<Vec<Value>>;
}

/// Creates objects in the `batch` API group.
pub trait BatchClient {
    /// Create `job` in `namespace` and return the job as stored by the
    /// cluster. If `validate` is set, ask for schema validation first.
    fn create_job(&self, namespace: &str, job: &Job, validate: bool) -> Result<Job>;
}

/// Supplies everything a command needs to talk to the cluster.
pub trait Factory {
    /// The namespace to use when the user doesn't specify one.
    fn default_namespace(&self) -> Result<String>;

    /// A client for creating jobs.
    fn batch_client(&self) -> Result<Box<dyn BatchClient>>;

    /// A resolver for looking up existing objects.
    fn resource_resolver(&self) -> Result<Box<dyn ResourceResolver>>;
}
