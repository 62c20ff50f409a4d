//! One-shot Kubernetes jobs.

use crate::prelude::*;

/// The annotation we use to mark jobs which were instantiated by hand from a
/// cron job, instead of by the cron job controller.
pub const INSTANTIATE_ANNOTATION: &str = "cronjob.kubernetes.io/instantiate";

/// The value of `INSTANTIATE_ANNOTATION` for manually-created jobs.
pub const INSTANTIATE_MANUAL: &str = "manual";

/// The annotation used by `kubectl apply` to remember what it last applied.
pub const LAST_APPLIED_CONFIG_ANNOTATION: &str =
    "kubectl.kubernetes.io/last-applied-configuration";

/// A Kubernetes `batch/v1` job.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Job {
    /// Always `batch/v1`, `Job` for jobs we create.
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Name, namespace, labels and annotations.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// What the job should run. We never look inside this.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spec: Value,
    /// Only present on jobs returned by the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

impl Job {
    /// The API version of the jobs we create.
    pub const API_VERSION: &'static str = "batch/v1";

    /// The kind of object we create.
    pub const KIND: &'static str = "Job";

    /// Build a new job named `name` in `namespace` from a cron job's job
    /// template.
    ///
    /// Labels and spec are copied unchanged. Annotations are copied too, but
    /// `INSTANTIATE_ANNOTATION` is always set to `INSTANTIATE_MANUAL`, even if
    /// the template tries to set it to something else.
    pub fn from_template(
        name: &str,
        namespace: &str,
        template: &JobTemplateSpec,
    ) -> Job {
        let mut annotations = template.metadata.annotations.clone();
        if let Some(overridden) = annotations.insert(
            INSTANTIATE_ANNOTATION.to_owned(),
            INSTANTIATE_MANUAL.to_owned(),
        ) {
            if overridden != INSTANTIATE_MANUAL {
                warn!(
                    "ignoring {}={:?} from job template",
                    INSTANTIATE_ANNOTATION, overridden,
                );
            }
        }

        Job {
            type_meta: TypeMeta::new(Job::API_VERSION, Job::KIND),
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                namespace: Some(namespace.to_owned()),
                labels: template.metadata.labels.clone(),
                annotations,
                ..ObjectMeta::default()
            },
            spec: template.spec.clone(),
            status: None,
        }
    }

    /// The name of this job, or `""` if it somehow doesn't have one.
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Store a JSON copy of this job in `LAST_APPLIED_CONFIG_ANNOTATION`, the
    /// same way `kubectl create --save-config` does. Any previous value of the
    /// annotation is left out of the copy.
    pub fn set_last_applied_configuration(&mut self) -> Result<()> {
        self.metadata
            .annotations
            .remove(LAST_APPLIED_CONFIG_ANNOTATION);
        let config = serde_json::to_string(self)
            .context("could not serialize job configuration")?;
        self.metadata
            .annotations
            .insert(LAST_APPLIED_CONFIG_ANNOTATION.to_owned(), config);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn template(annotations: Value) -> JobTemplateSpec {
        serde_json::from_value(json!({
            "metadata": {
                "labels": { "app": "x" },
                "annotations": annotations,
            },
            "spec": {
                "parallelism": 1,
                "template": { "spec": { "restartPolicy": "Never" } },
            },
        }))
        .expect("parse error")
    }

    #[test]
    fn copies_template_and_marks_job_as_manual() {
        let template = template(json!({ "team": "data" }));
        let job = Job::from_template("test-job", "default", &template);

        assert_eq!(job.type_meta, TypeMeta::new("batch/v1", "Job"));
        assert_eq!(job.name(), "test-job");
        assert_eq!(job.metadata.namespace.as_deref(), Some("default"));
        assert_eq!(job.metadata.labels, template.metadata.labels);
        assert_eq!(job.metadata.annotations["team"], "data");
        assert_eq!(job.metadata.annotations[INSTANTIATE_ANNOTATION], "manual");
        assert_eq!(job.spec, template.spec);
    }

    #[test]
    fn manual_marker_beats_template_annotation() {
        let template = template(json!({ INSTANTIATE_ANNOTATION: "scheduled" }));
        let job = Job::from_template("test-job", "default", &template);
        assert_eq!(job.metadata.annotations.len(), 1);
        assert_eq!(job.metadata.annotations[INSTANTIATE_ANNOTATION], "manual");
    }

    #[test]
    fn serializes_like_a_kubernetes_job() {
        let template = template(json!({}));
        let job = Job::from_template("test-job", "jobs", &template);
        assert_eq!(
            serde_json::to_value(&job).expect("serialize error"),
            json!({
                "apiVersion": "batch/v1",
                "kind": "Job",
                "metadata": {
                    "name": "test-job",
                    "namespace": "jobs",
                    "labels": { "app": "x" },
                    "annotations": { INSTANTIATE_ANNOTATION: "manual" },
                },
                "spec": {
                    "parallelism": 1,
                    "template": { "spec": { "restartPolicy": "Never" } },
                },
            }),
        );
    }

    #[test]
    fn last_applied_configuration_describes_job_without_itself() {
        let mut job = Job::from_template("test-job", "default", &template(json!({})));
        job.set_last_applied_configuration().expect("could not save config");
        // Doing it twice should not nest the annotation inside itself.
        job.set_last_applied_configuration().expect("could not save config");

        let saved: Job = serde_json::from_str(
            &job.metadata.annotations[LAST_APPLIED_CONFIG_ANNOTATION],
        )
        .expect("annotation is not a job");
        assert!(!saved
            .metadata
            .annotations
            .contains_key(LAST_APPLIED_CONFIG_ANNOTATION));
        assert_eq!(saved.spec, job.spec);
        assert_eq!(saved.metadata.labels, job.metadata.labels);
    }
}
