//! `kubejob`: create one-off Kubernetes jobs from existing cron jobs.

use kubejob_common::{
    kubernetes::Kubectl, prelude::*, quick_main,
    tracing_support::initialize_tracing,
};
use std::path::PathBuf;
use structopt::StructOpt;

mod cmd;
mod output;

/// Command-line options, parsed using `structopt`.
#[derive(Debug, StructOpt)]
#[structopt(about = "A tool for running one-off jobs on Kubernetes.")]
struct Opt {
    #[structopt(flatten)]
    cluster: ClusterOpt,

    #[structopt(subcommand)]
    cmd: Cmd,
}

/// Options which control how we reach the cluster.
#[derive(Debug, StructOpt)]
struct ClusterOpt {
    /// The namespace to use, instead of the current context's namespace.
    #[structopt(long = "namespace", short = "n", global = true)]
    namespace: Option<String>,

    /// The kubeconfig context to use.
    #[structopt(long = "context", global = true)]
    context: Option<String>,

    /// The kubeconfig file to use.
    #[structopt(long = "kubeconfig", global = true, parse(from_os_str))]
    kubeconfig: Option<PathBuf>,
}

impl ClusterOpt {
    /// Build a `kubectl` wrapper which honors these options.
    fn kubectl(&self) -> Kubectl {
        let mut kubectl = Kubectl::new();
        if let Some(namespace) = &self.namespace {
            kubectl = kubectl.with_namespace(namespace);
        }
        if let Some(context) = &self.context {
            kubectl = kubectl.with_context(context);
        }
        if let Some(kubeconfig) = &self.kubeconfig {
            kubectl = kubectl.with_kubeconfig(kubeconfig);
        }
        kubectl
    }
}

#[derive(Debug, StructOpt)]
enum Cmd {
    /// Create a resource on the cluster.
    #[structopt(name = "create")]
    Create {
        #[structopt(subcommand)]
        cmd: cmd::create::Opt,
    },
}

fn run() -> Result<()> {
    initialize_tracing();
    let opt = Opt::from_args();
    debug!("Args: {:?}", opt);

    let kubectl = opt.cluster.kubectl();
    match &opt.cmd {
        Cmd::Create { cmd } => cmd::create::run(cmd, &kubectl),
    }
}

quick_main!(run);
