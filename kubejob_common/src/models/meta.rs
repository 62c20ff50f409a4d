//! Metadata shared by all Kubernetes objects.

use crate::prelude::*;

/// The `apiVersion` and `kind` fields found at the top of every object.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// The group and version, such as `"batch/v1"`, or just `"v1"` for the
    /// core group.
    #[serde(default)]
    pub api_version: String,
    /// The kind of object, such as `"Job"`.
    #[serde(default)]
    pub kind: String,
}

impl TypeMeta {
    /// Construct a new `TypeMeta` for the specified API version and kind.
    pub fn new(api_version: &str, kind: &str) -> TypeMeta {
        TypeMeta {
            api_version: api_version.to_owned(),
            kind: kind.to_owned(),
        }
    }

    /// Read the type information from an arbitrary object. Missing fields are
    /// treated as empty.
    pub fn of(object: &Value) -> TypeMeta {
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        TypeMeta {
            api_version: field("apiVersion"),
            kind: field("kind"),
        }
    }

    /// Split our type information into group, version and kind.
    pub fn gvk(&self) -> GroupVersionKind {
        let (group, version) = match self.api_version.rfind('/') {
            Some(idx) => (&self.api_version[..idx], &self.api_version[idx + 1..]),
            None => ("", &self.api_version[..]),
        };
        GroupVersionKind::new(group, version, &self.kind)
    }
}

/// A fully-qualified object type.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GroupVersionKind {
    /// The API group. Empty for the core group.
    pub group: String,
    /// The API version within the group.
    pub version: String,
    /// The kind of object.
    pub kind: String,
}

impl GroupVersionKind {
    /// Construct a new `GroupVersionKind`.
    pub fn new(group: &str, version: &str, kind: &str) -> GroupVersionKind {
        GroupVersionKind {
            group: group.to_owned(),
            version: version.to_owned(),
            kind: kind.to_owned(),
        }
    }
}

/// Formats as `batch/v1beta1, Kind=CronJob`, the same way `kubectl` names
/// types in its error messages.
impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

/// Standard object metadata.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ObjectMeta {
    /// The name of this object, unique within its namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The namespace containing this object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Labels used to select this object.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Non-identifying annotations.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Any other metadata fields, such as `uid` or `creationTimestamp`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[test]
fn gvk_is_split_from_api_version() {
    let gvk = TypeMeta::new("batch/v1beta1", "CronJob").gvk();
    assert_eq!(gvk, GroupVersionKind::new("batch", "v1beta1", "CronJob"));
    assert_eq!(gvk.to_string(), "batch/v1beta1, Kind=CronJob");

    let core = TypeMeta::new("v1", "Pod").gvk();
    assert_eq!(core, GroupVersionKind::new("", "v1", "Pod"));
    assert_eq!(core.to_string(), "/v1, Kind=Pod");
}

#[test]
fn type_meta_tolerates_missing_fields() {
    let object = serde_json::json!({ "metadata": { "name": "x" } });
    let type_meta = TypeMeta::of(&object);
    assert_eq!(type_meta, TypeMeta::default());
    assert_eq!(type_meta.gvk().to_string(), "/, Kind=");
}

#[test]
fn object_meta_keeps_unknown_fields() {
    let json = serde_json::json!({
        "name": "a-cronjob",
        "namespace": "default",
        "uid": "5e7f0c5a-0000-0000-0000-000000000000",
        "labels": { "app": "x" },
    });
    let meta: ObjectMeta = serde_json::from_value(json.clone()).expect("parse error");
    assert_eq!(meta.name.as_deref(), Some("a-cronjob"));
    assert_eq!(meta.labels["app"], "x");
    assert!(meta.annotations.is_empty());
    assert_eq!(serde_json::to_value(&meta).expect("serialize error"), json);
}
