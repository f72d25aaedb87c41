//! The metric data handed to the exporter by an instrumentation library.
//!
//! These types are the inbound contract of the exporter. They carry no
//! backend specific knowledge; conversion into the Cloud Monitoring wire
//! schema happens in the `convert` and `builder` modules.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::SystemTime;

use opentelemetry::trace::SpanContext;

/// A metric together with every time series reported for it in one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub descriptor: Descriptor,
    /// The entity that produced the metric. `None` falls back to the
    /// exporter's configured resource.
    pub resource: Option<Resource>,
    pub time_series: Vec<TimeSeries>,
}

impl Metric {
    pub fn new(descriptor: Descriptor, time_series: Vec<TimeSeries>) -> Self {
        Metric {
            descriptor,
            resource: None,
            time_series,
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }
}

/// Describes a metric: its name, unit, type and the keys of its labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub metric_type: MetricType,
    pub label_keys: Vec<LabelKey>,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, metric_type: MetricType) -> Self {
        Descriptor {
            name: name.into(),
            description: String::new(),
            unit: String::new(),
            metric_type,
            label_keys: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_label_keys(mut self, label_keys: Vec<LabelKey>) -> Self {
        self.label_keys = label_keys;
        self
    }
}

/// The shape of the values a metric reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricType {
    GaugeInt64,
    GaugeFloat64,
    GaugeDistribution,
    CumulativeInt64,
    CumulativeFloat64,
    CumulativeDistribution,
    Summary,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelKey {
    pub key: String,
    pub description: String,
}

impl LabelKey {
    pub fn new(key: impl Into<String>) -> Self {
        LabelKey {
            key: key.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The value of a label for one time series.
///
/// A value that is not `present` is omitted from the exported labels rather
/// than reported as an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelValue {
    pub value: String,
    pub present: bool,
}

impl LabelValue {
    pub fn new(value: impl Into<String>) -> Self {
        LabelValue {
            value: value.into(),
            present: true,
        }
    }

    pub fn absent() -> Self {
        LabelValue::default()
    }
}

/// One labelled sequence of points of a metric.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    /// Matched positionally with the descriptor's label keys.
    pub label_values: Vec<LabelValue>,
    pub points: Vec<Point>,
    /// Start of the accumulation window for cumulative metrics.
    pub start_time: SystemTime,
}

impl TimeSeries {
    pub fn new(label_values: Vec<LabelValue>, points: Vec<Point>, start_time: SystemTime) -> Self {
        TimeSeries {
            label_values,
            points,
            start_time,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub time: SystemTime,
    pub value: Value,
}

impl Point {
    pub fn new(time: SystemTime, value: impl Into<Value>) -> Self {
        Point {
            time,
            value: value.into(),
        }
    }
}

/// The value carried by a [`Point`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int64(i64),
    Float64(f64),
    Distribution(Distribution),
    /// Summaries have no direct wire representation and must be decomposed
    /// before conversion.
    Summary(Summary),
}

impl Value {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::Distribution(_) => "distribution",
            Value::Summary(_) => "summary",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<Distribution> for Value {
    fn from(v: Distribution) -> Self {
        Value::Distribution(v)
    }
}

impl From<Summary> for Value {
    fn from(v: Summary) -> Self {
        Value::Summary(v)
    }
}

/// A histogram of observed values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Distribution {
    pub count: i64,
    pub sum: f64,
    pub sum_of_squared_deviation: f64,
    pub bucket_options: Option<BucketOptions>,
    pub buckets: Vec<Bucket>,
}

/// Explicit bucket boundaries, in increasing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BucketOptions {
    pub bounds: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bucket {
    pub count: i64,
    pub exemplar: Option<Exemplar>,
}

impl Bucket {
    pub fn new(count: i64) -> Self {
        Bucket {
            count,
            exemplar: None,
        }
    }
}

/// A sampled raw observation attached to a bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct Exemplar {
    pub value: f64,
    pub timestamp: SystemTime,
    pub attachments: BTreeMap<String, AttachmentValue>,
}

/// Contextual data carried by an [`Exemplar`].
#[derive(Clone, Debug, PartialEq)]
pub enum AttachmentValue {
    /// Links the exemplar to the span that was active when it was recorded.
    SpanContext(SpanContext),
    Value(opentelemetry::Value),
}

impl fmt::Display for AttachmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentValue::SpanContext(cx) => write!(
                f,
                "{}-{}-{:02x}",
                cx.trace_id(),
                cx.span_id(),
                cx.trace_flags().to_u8()
            ),
            AttachmentValue::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Pre-aggregated quantiles of a population.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub count: i64,
    pub sum: f64,
    /// Whether `count` and `sum` were recorded.
    pub has_count_and_sum: bool,
    pub snapshot: Snapshot,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// `(percentile, value)` pairs, percentiles in `(0.0, 100.0]`.
    pub percentiles: Vec<(f64, f64)>,
}

/// Identifies the entity that produced a metric.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
    pub resource_type: String,
    pub labels: HashMap<String, String>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Resource {
            resource_type: resource_type.into(),
            labels: HashMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}
