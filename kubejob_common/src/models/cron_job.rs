//! Scheduled jobs, which we can use as templates for one-shot jobs.

use crate::prelude::*;

/// A Kubernetes cron job. The `batch/v1beta1` and `batch/v2alpha1` versions
/// have the same shape as far as we're concerned.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CronJob {
    /// API version and kind.
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Standard object metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Schedule and job template.
    pub spec: CronJobSpec,
    /// Only present on cron jobs returned by the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

/// The interesting part of a cron job.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobSpec {
    /// The job to create each time the schedule fires.
    pub job_template: JobTemplateSpec,
    /// `schedule`, `suspend`, `concurrencyPolicy` and friends.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A template for a job.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct JobTemplateSpec {
    /// Labels and annotations to copy onto each job.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// The job spec to copy onto each job.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spec: Value,
}

/// A cron job, tagged with the schema version the cluster returned it as.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CronJobVersion {
    /// `batch/v1beta1, Kind=CronJob`.
    V1beta1(CronJob),
    /// `batch/v2alpha1, Kind=CronJob`.
    V2alpha1(CronJob),
}

impl CronJobVersion {
    /// The API group containing cron jobs.
    pub const GROUP: &'static str = "batch";

    /// The kind of a cron job.
    pub const KIND: &'static str = "CronJob";

    /// The type of a `CronJobVersion::V1beta1` cron job.
    pub fn v1beta1_gvk() -> GroupVersionKind {
        GroupVersionKind::new(Self::GROUP, "v1beta1", Self::KIND)
    }

    /// The type of a `CronJobVersion::V2alpha1` cron job.
    pub fn v2alpha1_gvk() -> GroupVersionKind {
        GroupVersionKind::new(Self::GROUP, "v2alpha1", Self::KIND)
    }

    /// Interpret an arbitrary Kubernetes object as a cron job, failing if it's
    /// any other kind of object or an unsupported version of `CronJob`.
    pub fn from_object(object: Value) -> Result<CronJobVersion> {
        let gvk = TypeMeta::of(&object).gvk();
        let wrap: fn(CronJob) -> CronJobVersion = if gvk == Self::v1beta1_gvk() {
            CronJobVersion::V1beta1
        } else if gvk == Self::v2alpha1_gvk() {
            CronJobVersion::V2alpha1
        } else {
            return Err(format_err!(
                "from must be \"{}\" or \"{}\", but got \"{}\"",
                Self::v1beta1_gvk(),
                Self::v2alpha1_gvk(),
                gvk,
            ));
        };
        let cron_job = serde_json::from_value(object)
            .with_context(|| format!("could not parse {}", gvk))?;
        Ok(wrap(cron_job))
    }

    /// The type of this cron job.
    pub fn gvk(&self) -> GroupVersionKind {
        match self {
            CronJobVersion::V1beta1(_) => Self::v1beta1_gvk(),
            CronJobVersion::V2alpha1(_) => Self::v2alpha1_gvk(),
        }
    }

    /// The underlying cron job.
    pub fn cron_job(&self) -> &CronJob {
        match self {
            CronJobVersion::V1beta1(cron_job) | CronJobVersion::V2alpha1(cron_job) => {
                cron_job
            }
        }
    }

    /// The job template we should instantiate.
    pub fn job_template(&self) -> &JobTemplateSpec {
        &self.cron_job().spec.job_template
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn cron_job(api_version: &str) -> Value {
        json!({
            "apiVersion": api_version,
            "kind": "CronJob",
            "metadata": { "name": "a-cronjob", "namespace": "default" },
            "spec": {
                "schedule": "*/5 * * * *",
                "concurrencyPolicy": "Forbid",
                "jobTemplate": {
                    "metadata": { "labels": { "app": "x" } },
                    "spec": {
                        "parallelism": 1,
                        "someFutureField": { "keep": true },
                    },
                },
            },
        })
    }

    #[test]
    fn accepts_both_cron_job_versions() {
        let v1beta1 = CronJobVersion::from_object(cron_job("batch/v1beta1"))
            .expect("v1beta1 rejected");
        assert!(matches!(v1beta1, CronJobVersion::V1beta1(_)));
        assert_eq!(v1beta1.gvk().to_string(), "batch/v1beta1, Kind=CronJob");

        let v2alpha1 = CronJobVersion::from_object(cron_job("batch/v2alpha1"))
            .expect("v2alpha1 rejected");
        assert!(matches!(v2alpha1, CronJobVersion::V2alpha1(_)));
        assert_eq!(v2alpha1.job_template(), v1beta1.job_template());
    }

    #[test]
    fn job_template_is_copied_exactly() {
        let cron_job = CronJobVersion::from_object(cron_job("batch/v1beta1"))
            .expect("v1beta1 rejected");
        let template = cron_job.job_template();
        assert_eq!(template.metadata.labels["app"], "x");
        assert_eq!(
            template.spec,
            json!({ "parallelism": 1, "someFutureField": { "keep": true } }),
        );
        assert_eq!(cron_job.cron_job().spec.extra["schedule"], "*/5 * * * *");
    }

    #[test]
    fn rejects_other_kinds_and_versions() {
        let deployment = json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "web" },
            "spec": {},
        });
        let err = CronJobVersion::from_object(deployment).unwrap_err();
        assert_eq!(
            err.to_string(),
            "from must be \"batch/v1beta1, Kind=CronJob\" or \
             \"batch/v2alpha1, Kind=CronJob\", but got \"apps/v1, Kind=Deployment\"",
        );

        let err = CronJobVersion::from_object(cron_job("batch/v1")).unwrap_err();
        assert!(err.to_string().contains("but got \"batch/v1, Kind=CronJob\""));
    }

    #[test]
    fn reports_malformed_cron_jobs() {
        let broken = json!({
            "apiVersion": "batch/v1beta1",
            "kind": "CronJob",
            "metadata": { "name": "broken" },
            "spec": { "schedule": "@daily" },
        });
        let err = CronJobVersion::from_object(broken).unwrap_err();
        assert_eq!(err.to_string(), "could not parse batch/v1beta1, Kind=CronJob");
    }
}
