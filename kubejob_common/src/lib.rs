//! Code shared between the `kubejob` CLI and anything else which needs to
//! instantiate Kubernetes jobs.

#![warn(missing_docs)]

pub use anyhow;
pub use serde_json;

pub mod client;
pub mod errors;
pub mod kubernetes;
pub mod models;
pub mod tracing_support;

/// Common imports used by many modules.
pub mod prelude {
    pub use anyhow::{format_err, Context as _};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
    pub use std::{collections::BTreeMap, fmt, io::Write};
    pub use tracing::{debug, trace, warn};

    pub use super::models::*;
    pub use super::{Error, Result};
}

/// Error type for this crate's functions.
pub type Error = anyhow::Error;

/// Result type for this crate's functions.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;
