//! Kubernetes object models.
//!
//! We only model the fields we actually look at. Everything else is carried
//! along as raw JSON, so that objects survive a round trip through our types
//! without losing anything the cluster cares about.

mod cron_job;
mod job;
mod meta;

pub use self::cron_job::*;
pub use self::job::*;
pub use self::meta::*;
