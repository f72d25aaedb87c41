use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use opentelemetry::{otel_debug, otel_warn};
use tokio::time::Instant;

use crate::batcher::{bounded, Dispatch, MetricsBatcher, Outcome};
use crate::builder::TimeSeriesBuilder;
use crate::bundler::MetricsBundler;
use crate::client::MetricClient;
use crate::config::{Config, ExporterBuilder};
use crate::data::{Descriptor, Metric, MetricType};
use crate::descriptor::DescriptorCache;
use crate::proto::monitoring::v3::CreateMetricDescriptorRequest;
use crate::summary::decompose_summaries;
use crate::Error;

/// Uploads metrics to Google Cloud Monitoring.
///
/// Cloning is cheap, clones share the descriptor cache and the dropped
/// series counter.
#[derive(Clone)]
pub struct MetricsExporter {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    builder: TimeSeriesBuilder,
    descriptors: DescriptorCache,
    dispatch: Dispatch,
    dropped_time_series: AtomicUsize,
}

impl MetricsExporter {
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::default()
    }

    pub(crate) fn new(config: Config, client: Arc<dyn MetricClient>) -> Self {
        otel_debug!(
            name: "MetricsExporter.Built",
            project_id = config.project_id.clone(),
            number_of_workers = config.number_of_workers,
        );
        MetricsExporter {
            inner: Arc::new(Inner {
                builder: TimeSeriesBuilder::new(&config),
                descriptors: DescriptorCache::new(config.skip_create_metric_descriptor),
                dispatch: Dispatch {
                    client,
                    timeout: config.timeout,
                    cancellation: config.cancellation.clone(),
                },
                dropped_time_series: AtomicUsize::new(0),
                config,
            }),
        }
    }

    /// Converts `metrics` into time series and writes them.
    ///
    /// Descriptors of metrics seen for the first time are created first. A
    /// metric whose descriptor cannot be created, and a series that cannot
    /// be converted, are skipped and counted as dropped while the rest is
    /// still written. Returns `Ok` only when nothing went wrong, the single
    /// error when one thing did and [`Error::Combined`] otherwise.
    pub async fn upload_metrics(&self, metrics: Vec<Metric>) -> Result<(), Error> {
        let metrics = decompose_summaries(metrics);
        otel_debug!(
            name: "MetricsExporter.UploadStarted",
            metrics = metrics.len(),
        );

        let mut outcome = Outcome::default();
        let mut batcher = MetricsBatcher::new(
            &self.inner.config.project_id,
            self.inner.config.number_of_workers,
            self.inner.dispatch.clone(),
        );

        for metric in &metrics {
            if let Err(err) = self.register(&metric.descriptor).await {
                otel_warn!(
                    name: "MetricsExporter.CreateMetricDescriptorFailed",
                    metric = metric.descriptor.name.clone(),
                    reason = format!("{err}"),
                );
                outcome.record(metric.time_series.len(), err);
                continue;
            }

            let built = self.inner.builder.time_series(metric);
            for err in built.errors {
                outcome.record(1, err);
            }
            for ts in built.time_series {
                batcher.add_time_series(ts).await;
            }
        }

        outcome.merge(batcher.close().await);
        if outcome.dropped_time_series > 0 {
            self.inner
                .dropped_time_series
                .fetch_add(outcome.dropped_time_series, Ordering::Relaxed);
            otel_warn!(
                name: "MetricsExporter.TimeSeriesDropped",
                dropped_time_series = outcome.dropped_time_series,
                errors = outcome.errors.len(),
            );
        }
        outcome.into_result()
    }

    async fn register(&self, descriptor: &Descriptor) -> Result<(), Error> {
        if descriptor.metric_type == MetricType::Summary {
            return Ok(());
        }

        let inner: &Inner = &self.inner;
        let metric_type = inner.builder.metric_type(&descriptor.name);
        let created_type = metric_type.as_str();
        inner
            .descriptors
            .ensure_registered(&descriptor.name, &metric_type, move || async move {
                let request = CreateMetricDescriptorRequest {
                    name: format!("projects/{}", inner.config.project_id),
                    metric_descriptor: Some(inner.builder.metric_descriptor(descriptor)),
                };
                let deadline = Instant::now() + inner.dispatch.timeout;
                let call = inner.dispatch.client.create_metric_descriptor(request);
                bounded(&inner.dispatch, deadline, call).await?;
                otel_debug!(
                    name: "MetricsExporter.MetricDescriptorCreated",
                    metric_type = created_type.to_owned(),
                );
                Ok(())
            })
            .await
    }

    /// Time series dropped by all uploads so far.
    pub fn dropped_time_series(&self) -> usize {
        self.inner.dropped_time_series.load(Ordering::Relaxed)
    }

    /// Starts a [`MetricsBundler`] uploading through this exporter.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bundler(&self) -> MetricsBundler {
        MetricsBundler::new(self.clone(), &self.inner.config)
    }
}

impl fmt::Debug for MetricsExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsExporter")
            .field("config", &self.inner.config)
            .field("client", &"(elided)")
            .field("dropped_time_series", &self.dropped_time_series())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::config::Labels;
    use crate::data::{LabelKey, LabelValue, Point, Snapshot, Summary, TimeSeries};
    use crate::proto::monitoring::v3::typed_value;
    use crate::testing::{rpc_error, RecordingClient};

    fn exporter(client: Arc<RecordingClient>) -> MetricsExporter {
        MetricsExporter::builder()
            .project_id("my-project")
            .default_labels(Labels::new())
            .into_config()
            .map(|config| MetricsExporter::new(config, client))
            .unwrap()
    }

    fn start() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_000)
    }

    fn counter(name: &str, routes: &[&str]) -> Metric {
        let series = routes
            .iter()
            .enumerate()
            .map(|(i, route)| {
                TimeSeries::new(
                    vec![LabelValue::new(*route)],
                    vec![Point::new(start() + Duration::from_secs(10), i as i64)],
                    start(),
                )
            })
            .collect();
        Metric::new(
            Descriptor::new(name, MetricType::CumulativeInt64)
                .with_label_keys(vec![LabelKey::new("route")]),
            series,
        )
    }

    #[tokio::test]
    async fn uploads_and_registers_descriptors_once() {
        let client = Arc::new(RecordingClient::default());
        let exporter = exporter(client.clone());

        exporter
            .upload_metrics(vec![counter("requests", &["/", "/health"])])
            .await
            .unwrap();
        exporter
            .upload_metrics(vec![counter("requests", &["/"])])
            .await
            .unwrap();

        let descriptors = client.descriptor_requests();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "projects/my-project");
        assert_eq!(
            descriptors[0].metric_descriptor.as_ref().unwrap().r#type,
            "custom.googleapis.com/opentelemetry/requests"
        );

        let requests = client.time_series_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].time_series.len(), 2);
        let labels = &requests[0].time_series[0].metric.as_ref().unwrap().labels;
        assert_eq!(labels.get("route").map(String::as_str), Some("/"));
        assert_eq!(exporter.dropped_time_series(), 0);
    }

    #[tokio::test]
    async fn failed_descriptor_skips_its_metric() {
        let client = Arc::new(RecordingClient::default().with_descriptor_failure("forbidden"));
        let exporter = exporter(client.clone());

        let err = exporter
            .upload_metrics(vec![
                counter("forbidden", &["/", "/a"]),
                counter("allowed", &["/"]),
            ])
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot create custom.googleapis.com/opentelemetry/forbidden"
        );

        let requests = client.time_series_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].time_series.len(), 1);
        assert_eq!(
            requests[0].time_series[0].metric.as_ref().unwrap().r#type,
            "custom.googleapis.com/opentelemetry/allowed"
        );
        assert_eq!(exporter.dropped_time_series(), 2);

        // not cached, the next upload tries again
        let _ = exporter
            .upload_metrics(vec![counter("forbidden", &["/"])])
            .await;
        assert_eq!(client.descriptor_requests().len(), 3);
    }

    #[tokio::test]
    async fn errors_are_combined_and_dropped_series_counted() {
        let client = Arc::new(RecordingClient::default().with_time_series_failure(|_| {
            Some(rpc_error(
                "One or more TimeSeries could not be written: \
                 Points must be written in order: timeSeries[0]",
            ))
        }));
        let exporter = exporter(client.clone());

        let mut bad = counter("mismatch", &["/"]);
        bad.time_series[0].label_values.push(LabelValue::new("extra"));

        let err = exporter
            .upload_metrics(vec![counter("requests", &["/", "/a", "/b"]), bad])
            .await
            .unwrap_err();
        let Error::Combined(messages) = err else {
            panic!("expected a combined error");
        };
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("length mismatch"));
        assert!(messages[1].ends_with("timeSeries[0]"));

        // one series not converted, one rejected by the backend
        assert_eq!(exporter.dropped_time_series(), 2);
    }

    #[tokio::test]
    async fn summaries_are_decomposed() {
        let client = Arc::new(RecordingClient::default());
        let exporter = exporter(client.clone());

        let summary = Summary {
            count: 4,
            sum: 10.0,
            has_count_and_sum: true,
            snapshot: Snapshot {
                percentiles: vec![(50.0, 2.0), (99.0, 4.0)],
            },
        };
        let metric = Metric::new(
            Descriptor::new("latency", MetricType::Summary),
            vec![TimeSeries::new(
                vec![],
                vec![Point::new(start() + Duration::from_secs(1), summary)],
                start(),
            )],
        );
        exporter.upload_metrics(vec![metric]).await.unwrap();

        let mut types: Vec<_> = client
            .descriptor_requests()
            .into_iter()
            .map(|r| r.metric_descriptor.unwrap().r#type)
            .collect();
        types.sort();
        assert_eq!(
            types,
            [
                "custom.googleapis.com/opentelemetry/latency_summary_count",
                "custom.googleapis.com/opentelemetry/latency_summary_percentile",
                "custom.googleapis.com/opentelemetry/latency_summary_sum",
            ]
        );

        let series = &client.time_series_requests()[0].time_series;
        assert_eq!(series.len(), 4);
        let count = series
            .iter()
            .find(|ts| ts.metric.as_ref().unwrap().r#type.ends_with("_count"))
            .unwrap();
        assert_eq!(
            count.points[0].value.as_ref().unwrap().value,
            Some(typed_value::Value::Int64Value(4))
        );
    }

    #[tokio::test]
    async fn skip_create_metric_descriptor() {
        let client = Arc::new(RecordingClient::default());
        let config = MetricsExporter::builder()
            .project_id("my-project")
            .skip_create_metric_descriptor(true)
            .into_config()
            .unwrap();
        let exporter = MetricsExporter::new(config, client.clone());

        exporter
            .upload_metrics(vec![counter("requests", &["/"])])
            .await
            .unwrap();
        assert!(client.descriptor_requests().is_empty());
        assert_eq!(client.time_series_requests().len(), 1);
    }

    #[tokio::test]
    async fn slow_descriptor_creation_times_out() {
        let client = Arc::new(RecordingClient::default().with_delay(Duration::from_millis(500)));
        let config = MetricsExporter::builder()
            .project_id("my-project")
            .timeout(Duration::from_millis(20))
            .into_config()
            .unwrap();
        let exporter = MetricsExporter::new(config, client.clone());

        let err = exporter
            .upload_metrics(vec![counter("requests", &["/"])])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert!(client.time_series_requests().is_empty());
        assert_eq!(exporter.dropped_time_series(), 1);
    }
}
