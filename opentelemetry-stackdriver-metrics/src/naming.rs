use std::fmt;
use std::sync::Arc;

/// Metric types without a known domain are placed under this one.
pub(crate) const DEFAULT_DOMAIN: &str = "custom.googleapis.com/opentelemetry/";
const DEFAULT_DISPLAY_NAME_PREFIX: &str = "OpenTelemetry";
const LABEL_KEY_SIZE_LIMIT: usize = 100;

const KNOWN_DOMAINS: [&str; 4] = ["googleapis.com", "kubernetes.io", "istio.io", "knative.dev"];

/// Metric types under these prefixes are user defined; anything else is a
/// Cloud Monitoring built-in.
const USER_DEFINED_PREFIXES: [&str; 3] = [
    "custom.googleapis.com/",
    "external.googleapis.com/",
    "workload.googleapis.com/",
];

/// Metric types under these prefixes are written with
/// `CreateServiceTimeSeries`.
const SERVICE_PREFIXES: [&str; 1] = ["kubernetes.io/"];

/// Computes a per-metric prefix from the metric name.
pub type MetricPrefixFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Converts a label key into the character set accepted by Cloud Monitoring.
///
/// Keys are truncated to 100 characters, anything that is not a letter or a
/// digit becomes `_`, and keys starting with a digit or `_` are prefixed
/// with `key`.
pub fn sanitize(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }

    let mut sanitized: String = key
        .chars()
        .take(LABEL_KEY_SIZE_LIMIT)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();

    if sanitized.starts_with(char::is_numeric) {
        sanitized.insert_str(0, "key_");
    }
    if sanitized.starts_with('_') {
        sanitized.insert_str(0, "key");
    }
    sanitized
}

pub(crate) fn has_domain(name: &str) -> bool {
    KNOWN_DOMAINS.iter().any(|domain| name.contains(domain))
}

/// Returns true when `metric_type` is heuristically a built-in metric whose
/// descriptor already exists in Cloud Monitoring.
pub(crate) fn is_builtin(metric_type: &str) -> bool {
    !USER_DEFINED_PREFIXES
        .iter()
        .any(|prefix| metric_type.starts_with(prefix))
}

pub(crate) fn is_service_metric(metric_type: &str) -> bool {
    SERVICE_PREFIXES
        .iter()
        .any(|prefix| metric_type.starts_with(prefix))
}

/// Joins `prefix` and `name` with a single `/`, dropping empty and `.`
/// segments. A leading `/` on the first non-empty part is kept.
fn join_path(prefix: &str, name: &str) -> String {
    let segments: Vec<&str> = prefix
        .split('/')
        .chain(name.split('/'))
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    let joined = segments.join("/");
    let rooted = [prefix, name]
        .iter()
        .find(|part| !part.is_empty())
        .is_some_and(|part| part.starts_with('/'));
    if rooted {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Derives Cloud Monitoring metric types and display names from metric names.
#[derive(Clone, Default)]
pub(crate) struct MetricNamer {
    prefix: String,
    prefix_fn: Option<MetricPrefixFn>,
}

impl MetricNamer {
    pub(crate) fn new(prefix: String, prefix_fn: Option<MetricPrefixFn>) -> Self {
        MetricNamer { prefix, prefix_fn }
    }

    pub(crate) fn metric_type(&self, name: &str) -> String {
        let prefix = match &self.prefix_fn {
            Some(prefix_fn) => prefix_fn(name),
            None => self.prefix.clone(),
        };

        let name = if prefix.is_empty() {
            name.to_owned()
        } else {
            join_path(&prefix, name)
        };

        if has_domain(&name) {
            name
        } else {
            join_path(DEFAULT_DOMAIN, &name)
        }
    }

    pub(crate) fn display_name(&self, name: &str) -> String {
        if has_domain(name) {
            return name.to_owned();
        }
        join_path(DEFAULT_DISPLAY_NAME_PREFIX, name)
    }
}

impl fmt::Debug for MetricNamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricNamer")
            .field("prefix", &self.prefix)
            .field("prefix_fn", &self.prefix_fn.as_ref().map(|_| "(elided)"))
            .finish()
    }
}
