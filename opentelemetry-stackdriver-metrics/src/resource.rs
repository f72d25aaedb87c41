use std::collections::HashMap;

use crate::data::{Descriptor, Resource};
use crate::proto;

const GLOBAL: &str = "global";

/// A description of a `MonitoredResource`.
///
/// Possible values are listed in the [API documentation](https://cloud.google.com/monitoring/api/resources).
/// Resource types not listed here can be described with [`MonitoredResource::Custom`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonitoredResource {
    Global {
        project_id: Option<String>,
    },
    GceInstance {
        project_id: String,
        instance_id: String,
        zone: String,
    },
    K8sContainer {
        project_id: String,
        location: String,
        cluster_name: String,
        namespace_name: String,
        pod_name: String,
        container_name: String,
    },
    GenericNode {
        project_id: String,
        location: Option<String>,
        namespace: Option<String>,
        node_id: Option<String>,
    },
    GenericTask {
        project_id: String,
        location: Option<String>,
        namespace: Option<String>,
        job: Option<String>,
        task_id: Option<String>,
    },
    CloudRunRevision {
        project_id: String,
        service_name: Option<String>,
        revision_name: Option<String>,
        location: Option<String>,
        configuration_name: Option<String>,
    },
    Custom {
        resource_type: String,
        labels: HashMap<String, String>,
    },
}

impl From<MonitoredResource> for proto::api::MonitoredResource {
    fn from(resource: MonitoredResource) -> Self {
        let mut labels = HashMap::new();
        let mut insert = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                labels.insert(key.to_owned(), value);
            }
        };

        let resource_type = match resource {
            MonitoredResource::Global { project_id } => {
                insert("project_id", project_id);
                GLOBAL.to_owned()
            }
            MonitoredResource::GceInstance {
                project_id,
                instance_id,
                zone,
            } => {
                insert("project_id", Some(project_id));
                insert("instance_id", Some(instance_id));
                insert("zone", Some(zone));
                "gce_instance".to_owned()
            }
            MonitoredResource::K8sContainer {
                project_id,
                location,
                cluster_name,
                namespace_name,
                pod_name,
                container_name,
            } => {
                insert("project_id", Some(project_id));
                insert("location", Some(location));
                insert("cluster_name", Some(cluster_name));
                insert("namespace_name", Some(namespace_name));
                insert("pod_name", Some(pod_name));
                insert("container_name", Some(container_name));
                "k8s_container".to_owned()
            }
            MonitoredResource::GenericNode {
                project_id,
                location,
                namespace,
                node_id,
            } => {
                insert("project_id", Some(project_id));
                insert("location", location);
                insert("namespace", namespace);
                insert("node_id", node_id);
                "generic_node".to_owned()
            }
            MonitoredResource::GenericTask {
                project_id,
                location,
                namespace,
                job,
                task_id,
            } => {
                insert("project_id", Some(project_id));
                insert("location", location);
                insert("namespace", namespace);
                insert("job", job);
                insert("task_id", task_id);
                "generic_task".to_owned()
            }
            MonitoredResource::CloudRunRevision {
                project_id,
                service_name,
                revision_name,
                location,
                configuration_name,
            } => {
                insert("project_id", Some(project_id));
                insert("service_name", service_name);
                insert("revision_name", revision_name);
                insert("location", location);
                insert("configuration_name", configuration_name);
                "cloud_run_revision".to_owned()
            }
            MonitoredResource::Custom {
                resource_type,
                labels: custom,
            } => {
                for (key, value) in custom {
                    insert(&key, Some(value));
                }
                resource_type
            }
        };

        // A resource without a type cannot be written; report it as global.
        if resource_type.is_empty() {
            return global();
        }

        proto::api::MonitoredResource {
            r#type: resource_type,
            labels,
        }
    }
}

pub(crate) fn global() -> proto::api::MonitoredResource {
    proto::api::MonitoredResource {
        r#type: GLOBAL.to_owned(),
        labels: HashMap::new(),
    }
}

/// Chooses the monitored resource and metric labels for the series of a metric.
///
/// The mapper receives the labels computed for a series and returns the labels
/// to export together with the resource the series is attributed to.
pub trait ResourceMapper: Send + Sync + 'static {
    fn map(
        &self,
        descriptor: &Descriptor,
        labels: HashMap<String, String>,
    ) -> (HashMap<String, String>, MonitoredResource);
}

impl<F> ResourceMapper for F
where
    F: Fn(&Descriptor, HashMap<String, String>) -> (HashMap<String, String>, MonitoredResource)
        + Send
        + Sync
        + 'static,
{
    fn map(
        &self,
        descriptor: &Descriptor,
        labels: HashMap<String, String>,
    ) -> (HashMap<String, String>, MonitoredResource) {
        self(descriptor, labels)
    }
}

/// Resolves the resource of a metric when no [`ResourceMapper`] is configured.
pub(crate) fn metric_resource(
    resource: Option<&Resource>,
    configured: Option<&proto::api::MonitoredResource>,
) -> proto::api::MonitoredResource {
    match resource {
        Some(resource) => proto::api::MonitoredResource {
            r#type: if resource.resource_type.is_empty() {
                GLOBAL.to_owned()
            } else {
                resource.resource_type.clone()
            },
            labels: resource.labels.clone(),
        },
        None => configured.cloned().unwrap_or_else(global),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_task_labels() {
        let resource: proto::api::MonitoredResource = MonitoredResource::GenericTask {
            project_id: "my-project".into(),
            location: Some("us-east1".into()),
            namespace: None,
            job: Some("worker".into()),
            task_id: Some("1".into()),
        }
        .into();

        assert_eq!(resource.r#type, "generic_task");
        assert_eq!(resource.labels.len(), 4);
        assert_eq!(resource.labels["project_id"], "my-project");
        assert_eq!(resource.labels["job"], "worker");
        assert!(!resource.labels.contains_key("namespace"));
    }

    #[test]
    fn custom_without_type_collapses_to_global() {
        let resource: proto::api::MonitoredResource = MonitoredResource::Custom {
            resource_type: String::new(),
            labels: HashMap::from([("zone".to_owned(), "a".to_owned())]),
        }
        .into();
        assert_eq!(resource, global());
    }

    #[test]
    fn metric_resource_fallbacks() {
        let configured = proto::api::MonitoredResource {
            r#type: "gce_instance".into(),
            labels: HashMap::from([("zone".to_owned(), "us-central1-a".to_owned())]),
        };

        assert_eq!(metric_resource(None, None), global());
        assert_eq!(metric_resource(None, Some(&configured)), configured);

        let untyped = Resource::default().with_label("k", "v");
        let converted = metric_resource(Some(&untyped), Some(&configured));
        assert_eq!(converted.r#type, "global");
        assert_eq!(converted.labels["k"], "v");

        let typed = Resource::new("k8s_pod").with_label("pod_name", "p-1");
        let converted = metric_resource(Some(&typed), Some(&configured));
        assert_eq!(converted.r#type, "k8s_pod");
        assert_eq!(converted.labels["pod_name"], "p-1");
    }
}
