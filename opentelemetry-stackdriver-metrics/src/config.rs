use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::MetricClient;
#[cfg(feature = "tls")]
use crate::client::{Authorizer, GcmClient};
use crate::exporter::MetricsExporter;
use crate::naming::MetricPrefixFn;
use crate::resource::{MonitoredResource, ResourceMapper};
use crate::Error;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_BUNDLE_DELAY_THRESHOLD: Duration = Duration::from_secs(2);
pub(crate) const DEFAULT_BUNDLE_COUNT_THRESHOLD: usize = 100;
const OPENTELEMETRY_TASK: &str = "opentelemetry_task";
const OPENTELEMETRY_TASK_DESCRIPTION: &str = "OpenTelemetry task identifier";

/// Handles errors that happen while uploading metrics in the background.
pub type ErrorHandler = Arc<dyn Fn(Error) + Send + Sync>;

/// Labels attached to every exported time series, keyed by label key.
///
/// Entries are kept in key order, which is also the order in which they are
/// registered on metric descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels {
    entries: BTreeMap<String, LabelEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LabelEntry {
    pub(crate) value: String,
    pub(crate) description: String,
}

impl Labels {
    pub fn new() -> Self {
        Labels::default()
    }

    /// Sets a label, replacing any previous value for `key`.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.entries.insert(
            key.into(),
            LabelEntry {
                value: value.into(),
                description: description.into(),
            },
        );
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.set(key, value, description);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &LabelEntry)> {
        self.entries.iter()
    }

    /// The label identifying this process, `rust-<pid>@<hostname>`.
    pub(crate) fn task() -> Self {
        Labels::new().with(
            OPENTELEMETRY_TASK,
            task_value(),
            OPENTELEMETRY_TASK_DESCRIPTION,
        )
    }
}

fn task_value() -> String {
    format!("rust-{}@{}", std::process::id(), hostname())
}

fn hostname() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .or_else(|| std::env::var("HOSTNAME").ok())
        .map(|h| h.trim().to_owned())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_owned())
}

/// Settings shared by the exporter, its workers and the bundler.
#[derive(Clone)]
pub(crate) struct Config {
    pub(crate) project_id: String,
    pub(crate) default_labels: Labels,
    pub(crate) metric_prefix: String,
    pub(crate) metric_prefix_fn: Option<MetricPrefixFn>,
    pub(crate) resource: Option<MonitoredResource>,
    pub(crate) resource_mapper: Option<Arc<dyn ResourceMapper>>,
    pub(crate) skip_create_metric_descriptor: bool,
    pub(crate) timeout: Duration,
    pub(crate) number_of_workers: usize,
    pub(crate) bundle_delay_threshold: Duration,
    pub(crate) bundle_count_threshold: usize,
    pub(crate) user_agent: String,
    pub(crate) cancellation: CancellationToken,
    pub(crate) on_error: Option<ErrorHandler>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("project_id", &self.project_id)
            .field("default_labels", &self.default_labels)
            .field("metric_prefix", &self.metric_prefix)
            .field("resource", &self.resource)
            .field(
                "skip_create_metric_descriptor",
                &self.skip_create_metric_descriptor,
            )
            .field("timeout", &self.timeout)
            .field("number_of_workers", &self.number_of_workers)
            .field("bundle_delay_threshold", &self.bundle_delay_threshold)
            .field("bundle_count_threshold", &self.bundle_count_threshold)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("opentelemetry-stackdriver-metrics/{}", env!("CARGO_PKG_VERSION"))
}

/// Helper type to build a [`MetricsExporter`].
#[derive(Clone, Default)]
pub struct ExporterBuilder {
    project_id: Option<String>,
    default_labels: Option<Labels>,
    metric_prefix: Option<String>,
    metric_prefix_fn: Option<MetricPrefixFn>,
    resource: Option<MonitoredResource>,
    resource_mapper: Option<Arc<dyn ResourceMapper>>,
    skip_create_metric_descriptor: bool,
    timeout: Option<Duration>,
    number_of_workers: Option<usize>,
    bundle_delay_threshold: Option<Duration>,
    bundle_count_threshold: Option<usize>,
    user_agent: Option<String>,
    cancellation: Option<CancellationToken>,
    on_error: Option<ErrorHandler>,
}

impl ExporterBuilder {
    /// The Google Cloud project metrics are written to. Required.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Labels added to every time series.
    ///
    /// Defaults to a single `opentelemetry_task` label identifying this
    /// process. Pass an empty [`Labels`] to export no default labels.
    pub fn default_labels(mut self, labels: Labels) -> Self {
        self.default_labels = Some(labels);
        self
    }

    /// Prefix prepended to every metric name.
    pub fn metric_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.metric_prefix = Some(prefix.into());
        self
    }

    /// Computes the prefix per metric name. Takes precedence over
    /// [`metric_prefix`](Self::metric_prefix).
    pub fn metric_prefix_fn<F>(mut self, prefix_fn: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.metric_prefix_fn = Some(Arc::new(prefix_fn));
        self
    }

    /// The resource used for metrics that do not carry their own.
    pub fn resource(mut self, resource: MonitoredResource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Overrides the resource and labels of every time series.
    pub fn resource_mapper<M: ResourceMapper>(mut self, mapper: M) -> Self {
        self.resource_mapper = Some(Arc::new(mapper));
        self
    }

    /// Never create metric descriptors, for example when they are managed
    /// elsewhere or the credentials lack the permission to create them.
    pub fn skip_create_metric_descriptor(mut self, skip: bool) -> Self {
        self.skip_create_metric_descriptor = skip;
        self
    }

    /// Timeout applied to each call to Cloud Monitoring. Defaults to 5 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Number of concurrent `CreateTimeSeries` senders. Defaults to 1.
    pub fn number_of_workers(mut self, workers: usize) -> Self {
        self.number_of_workers = Some(workers);
        self
    }

    /// Maximum time metrics are buffered by the bundler before upload. A zero
    /// delay keeps the default of two seconds.
    pub fn bundle_delay_threshold(mut self, delay: Duration) -> Self {
        self.bundle_delay_threshold = Some(delay);
        self
    }

    /// Number of buffered metrics that triggers an upload from the bundler.
    pub fn bundle_count_threshold(mut self, count: usize) -> Self {
        self.bundle_count_threshold = Some(count);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Cancelling `token` aborts every in-flight call.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Receives errors of background uploads made by the bundler.
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(Error) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub(crate) fn into_config(self) -> Result<Config, Error> {
        let project_id = match self.project_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(Error::BlankProjectId),
        };

        Ok(Config {
            project_id,
            default_labels: self.default_labels.unwrap_or_else(Labels::task),
            metric_prefix: self.metric_prefix.unwrap_or_default(),
            metric_prefix_fn: self.metric_prefix_fn,
            resource: self.resource,
            resource_mapper: self.resource_mapper,
            skip_create_metric_descriptor: self.skip_create_metric_descriptor,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            number_of_workers: self.number_of_workers.unwrap_or(1).max(1),
            bundle_delay_threshold: self
                .bundle_delay_threshold
                .filter(|delay| !delay.is_zero())
                .unwrap_or(DEFAULT_BUNDLE_DELAY_THRESHOLD),
            bundle_count_threshold: self
                .bundle_count_threshold
                .unwrap_or(DEFAULT_BUNDLE_COUNT_THRESHOLD)
                .max(1),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            cancellation: self.cancellation.unwrap_or_default(),
            on_error: self.on_error,
        })
    }

    /// Builds the exporter on top of `client`.
    ///
    /// Fails with [`Error::BlankProjectId`] when no project id, or a blank one,
    /// was configured.
    pub fn build<C: MetricClient>(self, client: C) -> Result<MetricsExporter, Error> {
        let config = self.into_config()?;
        Ok(MetricsExporter::new(config, Arc::new(client)))
    }

    /// Connects to Cloud Monitoring with `authorizer` and builds the exporter.
    ///
    /// The authorizer's project is used when no project id was configured.
    #[cfg(feature = "tls")]
    pub async fn connect<A: Authorizer>(
        mut self,
        authorizer: A,
    ) -> Result<MetricsExporter, Error> {
        if self.project_id.is_none() {
            self.project_id = Some(authorizer.project_id().to_owned());
        }
        let config = self.into_config()?;
        let client = GcmClient::connect(authorizer, &config.user_agent).await?;
        Ok(MetricsExporter::new(config, Arc::new(client)))
    }
}

impl fmt::Debug for ExporterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterBuilder")
            .field("project_id", &self.project_id)
            .field("default_labels", &self.default_labels)
            .field("metric_prefix", &self.metric_prefix)
            .field("resource", &self.resource)
            .field("timeout", &self.timeout)
            .field("number_of_workers", &self.number_of_workers)
            .finish_non_exhaustive()
    }
}
