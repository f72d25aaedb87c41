//! Assembles converted points into Cloud Monitoring time series and
//! metric descriptors.

use std::collections::HashMap;
use std::sync::Arc;

use opentelemetry::otel_debug;
use prost_types::Timestamp;

use crate::config::{Config, Labels};
use crate::convert::convert_point;
use crate::data::{Descriptor, LabelKey, LabelValue, Metric, MetricType, TimeSeries};
use crate::naming::{sanitize, MetricNamer};
use crate::proto::api::metric_descriptor::{MetricKind, ValueType};
use crate::proto::api::{label_descriptor, LabelDescriptor, MetricDescriptor, MonitoredResource};
use crate::proto::{api, monitoring::v3};
use crate::resource::{self, ResourceMapper};
use crate::Error;

/// Maps a metric type onto the kind and value type of its descriptor.
///
/// Summaries have no representation and map to `Unspecified`.
pub(crate) fn metric_kind(metric_type: MetricType) -> (MetricKind, ValueType) {
    match metric_type {
        MetricType::CumulativeInt64 => (MetricKind::Cumulative, ValueType::Int64),
        MetricType::CumulativeFloat64 => (MetricKind::Cumulative, ValueType::Double),
        MetricType::CumulativeDistribution => (MetricKind::Cumulative, ValueType::Distribution),
        MetricType::GaugeInt64 => (MetricKind::Gauge, ValueType::Int64),
        MetricType::GaugeFloat64 => (MetricKind::Gauge, ValueType::Double),
        MetricType::GaugeDistribution => (MetricKind::Gauge, ValueType::Distribution),
        MetricType::Summary => (MetricKind::Unspecified, ValueType::Unspecified),
    }
}

/// The series built for one metric, and the errors of the series that were
/// skipped.
#[derive(Debug, Default)]
pub(crate) struct BuiltSeries {
    pub(crate) time_series: Vec<v3::TimeSeries>,
    pub(crate) errors: Vec<Error>,
}

pub(crate) struct TimeSeriesBuilder {
    project_id: String,
    namer: MetricNamer,
    default_labels: Labels,
    resource: Option<MonitoredResource>,
    resource_mapper: Option<Arc<dyn ResourceMapper>>,
}

impl TimeSeriesBuilder {
    pub(crate) fn new(config: &Config) -> Self {
        TimeSeriesBuilder {
            project_id: config.project_id.clone(),
            namer: MetricNamer::new(
                config.metric_prefix.clone(),
                config.metric_prefix_fn.clone(),
            ),
            default_labels: config.default_labels.clone(),
            resource: config.resource.clone().map(Into::into),
            resource_mapper: config.resource_mapper.clone(),
        }
    }

    pub(crate) fn metric_type(&self, name: &str) -> String {
        self.namer.metric_type(name)
    }

    /// The descriptor registered for `descriptor` in Cloud Monitoring.
    pub(crate) fn metric_descriptor(&self, descriptor: &Descriptor) -> MetricDescriptor {
        let metric_type = self.metric_type(&descriptor.name);
        let (kind, value_type) = metric_kind(descriptor.metric_type);

        MetricDescriptor {
            name: format!(
                "projects/{}/metricDescriptors/{}",
                self.project_id, metric_type
            ),
            r#type: metric_type,
            labels: self.label_descriptors(&descriptor.label_keys),
            metric_kind: kind as i32,
            value_type: value_type as i32,
            unit: descriptor.unit.clone(),
            description: descriptor.description.clone(),
            display_name: self.namer.display_name(&descriptor.name),
        }
    }

    fn label_descriptors(&self, keys: &[LabelKey]) -> Vec<LabelDescriptor> {
        let defaults = self
            .default_labels
            .iter()
            .map(|(key, entry)| (key.as_str(), entry.description.as_str()));
        let own = keys
            .iter()
            .map(|key| (key.key.as_str(), key.description.as_str()));

        defaults
            .chain(own)
            .map(|(key, description)| LabelDescriptor {
                key: sanitize(key),
                value_type: label_descriptor::ValueType::String as i32,
                description: description.to_owned(),
            })
            .collect()
    }

    /// Builds every time series of `metric`.
    ///
    /// Series that cannot be converted are skipped and their error reported
    /// in the result. Metrics of an unspecified kind produce nothing.
    pub(crate) fn time_series(&self, metric: &Metric) -> BuiltSeries {
        let (kind, _) = metric_kind(metric.descriptor.metric_type);
        if kind == MetricKind::Unspecified {
            otel_debug!(
                name: "TimeSeriesBuilder.UnspecifiedKindIgnored",
                metric = metric.descriptor.name.clone()
            );
            return BuiltSeries::default();
        }

        let metric_type = self.metric_type(&metric.descriptor.name);
        let default_resource =
            resource::metric_resource(metric.resource.as_ref(), self.resource.as_ref());

        let mut built = BuiltSeries {
            time_series: Vec::with_capacity(metric.time_series.len()),
            errors: Vec::new(),
        };
        for ts in &metric.time_series {
            match self.build_one(metric, ts, kind, &metric_type, &default_resource) {
                Ok(series) => built.time_series.push(series),
                Err(err) => {
                    otel_debug!(
                        name: "TimeSeriesBuilder.SeriesSkipped",
                        metric = metric.descriptor.name.clone(),
                        error = format!("{err}")
                    );
                    built.errors.push(err);
                }
            }
        }
        built
    }

    fn build_one(
        &self,
        metric: &Metric,
        ts: &TimeSeries,
        kind: MetricKind,
        metric_type: &str,
        default_resource: &MonitoredResource,
    ) -> Result<v3::TimeSeries, Error> {
        // Gauges report instantaneous values and carry no start time.
        let start_time: Option<Timestamp> = match kind {
            MetricKind::Gauge => None,
            _ => Some(ts.start_time.into()),
        };
        let points = ts
            .points
            .iter()
            .map(|p| convert_point(start_time.as_ref(), p, &self.project_id))
            .collect::<Result<Vec<_>, _>>()?;

        let labels = self.labels(&metric.descriptor.label_keys, &ts.label_values)?;

        let (labels, resource) = match &self.resource_mapper {
            Some(mapper) => {
                let (labels, mapped) = mapper.map(&metric.descriptor, labels);
                (labels, mapped.into())
            }
            None => (labels, default_resource.clone()),
        };

        Ok(v3::TimeSeries {
            metric: Some(api::Metric {
                r#type: metric_type.to_owned(),
                labels,
            }),
            resource: Some(resource),
            points,
            ..Default::default()
        })
    }

    /// Default labels first, then the series' own labels matched by position.
    fn labels(
        &self,
        keys: &[LabelKey],
        values: &[LabelValue],
    ) -> Result<HashMap<String, String>, Error> {
        if keys.len() != values.len() {
            return Err(Error::LabelArityMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut labels = HashMap::with_capacity(self.default_labels.len() + keys.len());
        for (key, entry) in self.default_labels.iter() {
            labels.insert(sanitize(key), entry.value.clone());
        }
        for (key, value) in keys.iter().zip(values) {
            if value.present {
                labels.insert(sanitize(&key.key), value.value.clone());
            }
        }
        Ok(labels)
    }
}
