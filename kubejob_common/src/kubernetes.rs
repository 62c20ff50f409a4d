//! Tools for talking to Kubernetes using `kubectl`.

use serde::de::DeserializeOwned;
use std::{
    env,
    ffi::OsString,
    path::Path,
    process::{Command, Stdio},
};

use crate::client::{BatchClient, Factory, ResourceResolver};
use crate::prelude::*;

/// Environment variable which can be used to run a different `kubectl`.
pub const KUBECTL_ENV_VAR: &str = "KUBEJOB_KUBECTL";

/// The namespace to use if neither the user nor the current context picks
/// one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A handle for running `kubectl` against a particular cluster.
#[derive(Clone, Debug)]
pub struct Kubectl {
    /// The `kubectl` binary to run.
    program: OsString,
    /// Arguments to pass to every invocation, like `--context`.
    global_args: Vec<OsString>,
    /// A namespace chosen explicitly by the user, if any.
    namespace: Option<String>,
}

impl Default for Kubectl {
    fn default() -> Self {
        Kubectl::new()
    }
}

impl Kubectl {
    /// Run `kubectl` (or `$KUBEJOB_KUBECTL`) with the current kubeconfig
    /// context.
    pub fn new() -> Kubectl {
        Kubectl {
            program: env::var_os(KUBECTL_ENV_VAR)
                .unwrap_or_else(|| OsString::from("kubectl")),
            global_args: vec![],
            namespace: None,
        }
    }

    /// Use `namespace` instead of the current context's namespace.
    pub fn with_namespace(mut self, namespace: &str) -> Kubectl {
        self.namespace = Some(namespace.to_owned());
        self
    }

    /// Use the named kubeconfig context.
    pub fn with_context(mut self, context: &str) -> Kubectl {
        self.global_args.push(OsString::from("--context"));
        self.global_args.push(OsString::from(context));
        self
    }

    /// Use the specified kubeconfig file.
    pub fn with_kubeconfig(mut self, kubeconfig: &Path) -> Kubectl {
        self.global_args.push(OsString::from("--kubeconfig"));
        self.global_args.push(kubeconfig.as_os_str().to_owned());
        self
    }

    /// Build a `kubectl` command with our global arguments plus `args`.
    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.global_args).args(args);
        command
    }

    /// Run `kubectl`, optionally feeding it `input`, and capture its output.
    /// If `kubectl` fails, whatever it wrote to `stderr` becomes the cause of
    /// our error.
    fn output(&self, args: &[&str], input: Option<&str>) -> Result<Vec<u8>> {
        trace!("running kubectl {:?}", args);
        let mut child = self
            .command(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("error starting kubectl with {:?}", args))?;
        if let Some(input) = input {
            // Dropping `stdin` closes it, so `kubectl` sees end of file.
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| format_err!("kubectl stdin is missing"))?;
            stdin
                .write_all(input.as_bytes())
                .with_context(|| format!("error writing input to kubectl {:?}", args))?;
        }
        let output = child
            .wait_with_output()
            .with_context(|| format!("error running kubectl with {:?}", args))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                return Err(format_err!(
                    "error running kubectl with {:?} ({})",
                    args,
                    output.status,
                ));
            }
            return Err(format_err!("{}", stderr)
                .context(format!("error running kubectl with {:?}", args)));
        }
        Ok(output.stdout)
    }

    /// Run `kubectl`, capture output as JSON, and parse it using the
    /// specified type.
    fn parse_json<T: DeserializeOwned>(
        &self,
        args: &[&str],
        input: Option<&str>,
    ) -> Result<T> {
        let stdout = self.output(args, input)?;
        serde_json::from_slice(&stdout)
            .with_context(|| format!("error parsing output of kubectl {:?}", args))
    }

    /// Look up the namespace of the current kubeconfig context, if it has one.
    fn context_namespace(&self) -> Result<Option<String>> {
        let config: KubeConfigView =
            self.parse_json(&["config", "view", "--minify", "-o", "json"], None)?;
        Ok(config.namespace())
    }
}

impl Factory for Kubectl {
    #[tracing::instrument(skip(self), level = "debug")]
    fn default_namespace(&self) -> Result<String> {
        if let Some(namespace) = &self.namespace {
            return Ok(namespace.to_owned());
        }
        // No current context (or in-cluster credentials) is normal, and
        // `kubectl` itself falls back to `default` in that case.
        let namespace = match self.context_namespace() {
            Ok(namespace) => namespace,
            Err(err) => {
                debug!("no namespace in kubeconfig: {:#}", err);
                None
            }
        }
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());
        debug!("using namespace {:?}", namespace);
        Ok(namespace)
    }

    fn batch_client(&self) -> Result<Box<dyn BatchClient>> {
        Ok(Box::new(self.clone()))
    }

    fn resource_resolver(&self) -> Result<Box<dyn ResourceResolver>> {
        Ok(Box::new(self.clone()))
    }
}

impl ResourceResolver for Kubectl {
    #[tracing::instrument(skip(self), level = "debug")]
    fn resolve(&self, namespace: &str, reference: &str) -> Result<Vec<Value>> {
        if reference.is_empty() {
            return Err(format_err!(
                "you must provide one or more resources by argument or filename"
            ));
        }
        let stdout = self.output(&resolve_args(namespace, reference), None)?;
        parse_resolved(&stdout)
            .with_context(|| format!("error parsing kubectl output for {:?}", reference))
    }
}

impl BatchClient for Kubectl {
    #[tracing::instrument(skip(self, job), fields(job = %job.name()), level = "debug")]
    fn create_job(&self, namespace: &str, job: &Job, validate: bool) -> Result<Job> {
        let manifest =
            serde_json::to_string(job).context("could not serialize job")?;
        let validate = format!("--validate={}", validate);
        self.parse_json(&create_args(namespace, &validate), Some(&manifest))
    }
}

/// Arguments for `kubectl get`. `--ignore-not-found` turns a missing object
/// into empty output instead of an error, so "not found" and "found the wrong
/// number" get reported the same way.
fn resolve_args<'a>(namespace: &'a str, reference: &'a str) -> Vec<&'a str> {
    vec![
        "get",
        reference,
        "--namespace",
        namespace,
        "--ignore-not-found",
        "-o",
        "json",
    ]
}

/// Arguments for `kubectl create`, reading the object from stdin.
fn create_args<'a>(namespace: &'a str, validate: &'a str) -> Vec<&'a str> {
    vec![
        "create",
        "--namespace",
        namespace,
        validate,
        "-f",
        "-",
        "-o",
        "json",
    ]
}

/// Parse the output of `kubectl get -o json` into individual objects.
fn parse_resolved(stdout: &[u8]) -> Result<Vec<Value>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(vec![]);
    }
    let value: Value = serde_json::from_slice(stdout)?;
    Ok(flatten_objects(value))
}

/// Expand `List` objects (including nested lists) into their items.
pub fn flatten_objects(object: Value) -> Vec<Value> {
    let is_list = TypeMeta::of(&object).kind.ends_with("List");
    match object {
        Value::Object(mut fields) if is_list && fields.contains_key("items") => {
            match fields.remove("items") {
                Some(Value::Array(items)) => {
                    items.into_iter().flat_map(flatten_objects).collect()
                }
                _ => vec![],
            }
        }
        object => vec![object],
    }
}

/// Just enough of `kubectl config view --minify -o json` to find the current
/// namespace. `--minify` leaves only the current context.
#[derive(Debug, Default, Deserialize)]
struct KubeConfigView {
    #[serde(default)]
    contexts: Vec<NamedContext>,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    #[serde(default)]
    context: ContextInfo,
}

#[derive(Debug, Default, Deserialize)]
struct ContextInfo {
    #[serde(default)]
    namespace: Option<String>,
}

impl KubeConfigView {
    fn namespace(self) -> Option<String> {
        self.contexts
            .into_iter()
            .next()
            .and_then(|named| named.context.namespace)
            .filter(|namespace| !namespace.is_empty())
    }
}
