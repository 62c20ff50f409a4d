//! The `create` subcommand.

use kubejob_common::{client::Factory, prelude::*};
use std::io::stdout;
use structopt::StructOpt;

mod job;

/// The `create` subcommand.
#[derive(Debug, StructOpt)]
pub enum Opt {
    /// Create a job with the specified name.
    #[structopt(name = "job")]
    Job(job::Opt),
}

/// Run the `create` subcommand.
pub fn run(opt: &Opt, factory: &dyn Factory) -> Result<()> {
    let stdout = stdout();
    let mut out = stdout.lock();
    match opt {
        Opt::Job(opt) => job::run(opt, factory, &mut out),
    }
}
