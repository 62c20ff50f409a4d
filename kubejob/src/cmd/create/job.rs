//! The `create job` subcommand.

use kubejob_common::{
    client::{BatchClient, Factory, ResourceResolver},
    errors::UsageError,
    prelude::*,
};
use structopt::StructOpt;

use crate::output::{print_object, print_success, OutputFormat};

/// The full name of this command, for error messages.
const COMMAND: &str = "kubejob create job";

/// Command-line options for `create job`.
#[derive(Debug, StructOpt)]
#[structopt(after_help = "EXAMPLES:
    # Create a job from a CronJob named \"a-cronjob\"
    kubejob create job test-job --from=cronjob/a-cronjob")]
pub struct Opt {
    /// The name of the job to create.
    #[structopt(name = "NAME")]
    name: Option<String>,

    /// The name of the resource to create a Job from (only cronjob is
    /// supported).
    #[structopt(long = "from")]
    from: Option<String>,

    /// Output format. One of: json|yaml|name|template=TEMPLATE.
    #[structopt(long = "output", short = "o")]
    output: Option<String>,

    /// Only print the object that would be sent, without sending it.
    #[structopt(long = "dry-run")]
    dry_run: bool,

    /// Ask the server to validate the job against its schema before creating
    /// it.
    #[structopt(long = "validate", default_value = "true", parse(try_from_str))]
    validate: bool,

    /// Save the job's configuration in its annotations, so that `kubectl
    /// apply` can be used on it later.
    #[structopt(long = "save-config")]
    save_config: bool,
}

/// Run the `create job` subcommand.
pub fn run(opt: &Opt, factory: &dyn Factory, out: &mut dyn Write) -> Result<()> {
    CreateJobOptions::complete(opt, factory)?.run(out)
}

/// Everything we need to create a job, with all defaults filled in.
pub struct CreateJobOptions {
    name: String,
    from: String,
    namespace: String,
    output_format: OutputFormat,
    dry_run: bool,
    validate: bool,
    save_config: bool,
    client: Box<dyn BatchClient>,
    resolver: Box<dyn ResourceResolver>,
}

impl CreateJobOptions {
    /// Fill in our options using the command line and `factory`.
    pub fn complete(opt: &Opt, factory: &dyn Factory) -> Result<CreateJobOptions> {
        let name = opt
            .name
            .clone()
            .ok_or_else(|| UsageError::new(COMMAND, "NAME is required"))?;
        let output_format = opt
            .output
            .as_deref()
            .unwrap_or_default()
            .parse::<OutputFormat>()
            .map_err(|err| UsageError::new(COMMAND, err.to_string()))?;

        Ok(CreateJobOptions {
            name,
            from: opt.from.clone().unwrap_or_default(),
            namespace: factory.default_namespace()?,
            output_format,
            dry_run: opt.dry_run,
            validate: opt.validate,
            save_config: opt.save_config,
            client: factory.batch_client()?,
            resolver: factory.resource_resolver()?,
        })
    }

    /// Look up the cron job named by `--from`, and create a job from it.
    #[tracing::instrument(
        skip(self, out),
        fields(job = %self.name, from = %self.from, namespace = %self.namespace),
        level = "debug"
    )]
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let mut objects = self.resolver.resolve(&self.namespace, &self.from)?;
        if objects.len() != 1 {
            debug!("found {} objects, expected 1", objects.len());
            return Err(format_err!("from must be an existing cronjob"));
        }
        let cron_job = CronJobVersion::from_object(objects.remove(0))?;
        debug!("instantiating {}", cron_job.gvk());
        self.create_job(cron_job.job_template(), out)
    }

    /// Create and print a job based on `template`.
    fn create_job(&self, template: &JobTemplateSpec, out: &mut dyn Write) -> Result<()> {
        let mut job = Job::from_template(&self.name, &self.namespace, template);
        if self.save_config {
            job.set_last_applied_configuration()?;
        }
        trace!("job: {:?}", job);

        if !self.dry_run {
            job = self
                .client
                .create_job(&self.namespace, &job, self.validate)
                .map_err(|err| format_err!("failed to create job: {:#}", err))?;
        }

        if self.output_format.is_short() {
            print_success(
                &self.output_format,
                out,
                Job::KIND,
                job.name(),
                self.dry_run,
                "created",
            )
        } else {
            print_object(&self.output_format, out, &job)
        }
    }
}
