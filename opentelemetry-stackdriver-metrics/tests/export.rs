use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use opentelemetry::trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState};
use opentelemetry_stackdriver_metrics::data::{
    AttachmentValue, Bucket, BucketOptions, Descriptor, Distribution, Exemplar, LabelKey,
    LabelValue, Metric, MetricType, Point, Resource, TimeSeries,
};
use opentelemetry_stackdriver_metrics::proto::api::{self, distribution::bucket_options};
use opentelemetry_stackdriver_metrics::proto::monitoring::v3::{
    typed_value, CreateMetricDescriptorRequest, CreateTimeSeriesRequest,
};
use opentelemetry_stackdriver_metrics::{
    Error, Labels, MetricClient, MetricsExporter, MonitoredResource,
};

#[derive(Clone, Default)]
struct InMemoryClient {
    descriptors: Arc<Mutex<Vec<CreateMetricDescriptorRequest>>>,
    time_series: Arc<Mutex<Vec<CreateTimeSeriesRequest>>>,
    service_time_series: Arc<Mutex<Vec<CreateTimeSeriesRequest>>>,
    reject_index: Option<usize>,
}

#[async_trait]
impl MetricClient for InMemoryClient {
    async fn create_metric_descriptor(
        &self,
        request: CreateMetricDescriptorRequest,
    ) -> Result<api::MetricDescriptor, Error> {
        let descriptor = request.metric_descriptor.clone().unwrap_or_default();
        self.descriptors.lock().unwrap().push(request);
        Ok(descriptor)
    }

    async fn create_time_series(&self, request: CreateTimeSeriesRequest) -> Result<(), Error> {
        let rejected = self
            .reject_index
            .filter(|index| *index < request.time_series.len());
        self.time_series.lock().unwrap().push(request);
        match rejected {
            Some(index) => Err(Error::Rpc {
                code: tonic::Code::InvalidArgument,
                message: format!(
                    "One or more TimeSeries could not be written: \
                     Points must be written in order: timeSeries[{index}]"
                ),
            }),
            None => Ok(()),
        }
    }

    async fn create_service_time_series(
        &self,
        request: CreateTimeSeriesRequest,
    ) -> Result<(), Error> {
        self.service_time_series.lock().unwrap().push(request);
        Ok(())
    }
}

fn start() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

fn latency() -> Metric {
    let span_context = SpanContext::new(
        TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
        SpanId::from_hex("00f067aa0ba902b7").unwrap(),
        TraceFlags::SAMPLED,
        false,
        TraceState::default(),
    );
    let mut attachments = BTreeMap::new();
    attachments.insert(
        "SpanContext".to_owned(),
        AttachmentValue::SpanContext(span_context),
    );

    let distribution = Distribution {
        count: 3,
        sum: 36.0,
        sum_of_squared_deviation: 2.0,
        bucket_options: Some(BucketOptions {
            bounds: vec![10.0, 20.0],
        }),
        buckets: vec![
            Bucket::new(1),
            Bucket {
                count: 2,
                exemplar: Some(Exemplar {
                    value: 12.5,
                    timestamp: start() + Duration::from_secs(30),
                    attachments,
                }),
            },
            Bucket::new(0),
        ],
    };

    Metric::new(
        Descriptor::new("http/latency", MetricType::CumulativeDistribution)
            .with_description("Server latency")
            .with_unit("ms")
            .with_label_keys(vec![LabelKey::new("http.method")]),
        vec![TimeSeries::new(
            vec![LabelValue::new("GET")],
            vec![Point::new(start() + Duration::from_secs(60), distribution)],
            start(),
        )],
    )
}

#[tokio::test]
async fn exports_distribution_end_to_end() {
    let client = InMemoryClient::default();
    let exporter = MetricsExporter::builder()
        .project_id("my-project")
        .default_labels(Labels::new().with("service", "checkout", "the service"))
        .resource(MonitoredResource::GenericNode {
            project_id: "my-project".into(),
            location: Some("us-central1-a".into()),
            namespace: Some("shop".into()),
            node_id: Some("node-1".into()),
        })
        .build(client.clone())
        .unwrap();

    exporter.upload_metrics(vec![latency()]).await.unwrap();

    let descriptors = client.descriptors.lock().unwrap().clone();
    assert_eq!(descriptors.len(), 1);
    let descriptor = descriptors[0].metric_descriptor.as_ref().unwrap();
    assert_eq!(
        descriptor.r#type,
        "custom.googleapis.com/opentelemetry/http/latency"
    );
    assert_eq!(descriptor.display_name, "OpenTelemetry/http/latency");
    let label_keys: Vec<_> = descriptor.labels.iter().map(|l| l.key.as_str()).collect();
    assert_eq!(label_keys, ["service", "http_method"]);

    let requests = client.time_series.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, "projects/my-project");
    let series = &requests[0].time_series[0];

    let metric = series.metric.as_ref().unwrap();
    assert_eq!(metric.labels["service"], "checkout");
    assert_eq!(metric.labels["http_method"], "GET");
    assert_eq!(series.resource.as_ref().unwrap().r#type, "generic_node");

    let point = &series.points[0];
    assert_eq!(
        point.interval.as_ref().unwrap().start_time,
        Some(start().into())
    );
    let Some(typed_value::Value::DistributionValue(distribution)) =
        point.value.as_ref().and_then(|v| v.value.clone())
    else {
        panic!("expected a distribution");
    };
    assert_eq!(distribution.mean, 12.0);
    assert_eq!(distribution.bucket_counts, [0, 1, 2, 0]);
    let Some(bucket_options::Options::ExplicitBuckets(explicit)) = distribution
        .bucket_options
        .and_then(|options| options.options)
    else {
        panic!("expected explicit buckets");
    };
    assert_eq!(explicit.bounds, [0.0, 10.0, 20.0]);
    assert_eq!(distribution.exemplars.len(), 1);
}

#[tokio::test]
async fn partial_failures_are_counted() {
    let client = InMemoryClient {
        reject_index: Some(3),
        ..Default::default()
    };
    let exporter = MetricsExporter::builder()
        .project_id("my-project")
        .number_of_workers(3)
        .build(client.clone())
        .unwrap();

    let series = (0..450)
        .map(|i| {
            TimeSeries::new(
                vec![LabelValue::new(format!("instance-{i}"))],
                vec![Point::new(start() + Duration::from_secs(1), 1.5)],
                start(),
            )
        })
        .collect();
    let metric = Metric::new(
        Descriptor::new("queue/depth", MetricType::GaugeFloat64)
            .with_label_keys(vec![LabelKey::new("instance")]),
        series,
    )
    .with_resource(Resource::new("k8s_container").with_label("cluster_name", "prod"));

    let err = exporter.upload_metrics(vec![metric]).await.unwrap_err();

    // three requests, each rejecting one series
    assert!(matches!(&err, Error::Combined(messages) if messages.len() == 3));
    assert_eq!(exporter.dropped_time_series(), 3);
    let requests = client.time_series.lock().unwrap().clone();
    assert_eq!(
        requests.iter().map(|r| r.time_series.len()).sum::<usize>(),
        450
    );
    assert!(client.service_time_series.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_project_is_rejected() {
    let err = MetricsExporter::builder()
        .project_id("  ")
        .build(InMemoryClient::default())
        .unwrap_err();
    assert!(matches!(err, Error::BlankProjectId));
}

#[tokio::test]
async fn bundler_flushes_through_exporter() {
    let client = InMemoryClient::default();
    let exporter = MetricsExporter::builder()
        .project_id("my-project")
        .bundle_delay_threshold(Duration::from_secs(3600))
        .build(client.clone())
        .unwrap();

    let bundler = exporter.bundler();
    bundler.export(vec![latency()]).unwrap();
    bundler.flush().await.unwrap();
    assert_eq!(client.time_series.lock().unwrap().len(), 1);
    bundler.shutdown().await.unwrap();
}
