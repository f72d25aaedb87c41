use crate::data::{Descriptor, LabelKey, LabelValue, Metric, MetricType, Point, TimeSeries, Value};

const PERCENTILE_LABEL_KEY: &str = "percentile";
const PERCENTILE_LABEL_DESCRIPTION: &str = "the value at a given percentile of a distribution";

/// Replaces every summary metric by its `_summary_sum`, `_summary_count`
/// and `_summary_percentile` components. Other metrics pass through.
pub(crate) fn decompose_summaries(metrics: Vec<Metric>) -> Vec<Metric> {
    let mut decomposed = Vec::with_capacity(metrics.len());
    for metric in metrics {
        if metric.descriptor.metric_type == MetricType::Summary {
            decomposed.extend(decompose(&metric));
        } else {
            decomposed.push(metric);
        }
    }
    decomposed
}

fn decompose(summary: &Metric) -> Vec<Metric> {
    let mut sum_series = Vec::new();
    let mut count_series = Vec::new();
    let mut percentile_series = Vec::new();

    for ts in &summary.time_series {
        let mut sums = Vec::new();
        let mut counts = Vec::new();

        for point in &ts.points {
            let Value::Summary(s) = &point.value else {
                continue;
            };
            if s.has_count_and_sum {
                sums.push(Point::new(point.time, s.sum));
                counts.push(Point::new(point.time, s.count));
            }
            for (percentile, value) in &s.snapshot.percentiles {
                let mut label_values = ts.label_values.clone();
                label_values.push(LabelValue::new(format!("{percentile:.6}")));
                percentile_series.push(TimeSeries::new(
                    label_values,
                    vec![Point::new(point.time, *value)],
                    ts.start_time,
                ));
            }
        }

        if !sums.is_empty() {
            sum_series.push(TimeSeries::new(ts.label_values.clone(), sums, ts.start_time));
            count_series.push(TimeSeries::new(
                ts.label_values.clone(),
                counts,
                ts.start_time,
            ));
        }
    }

    let descriptor = &summary.descriptor;
    let mut metrics = Vec::with_capacity(3);
    if !sum_series.is_empty() {
        metrics.push(component(
            summary,
            Descriptor {
                name: format!("{}_summary_sum", descriptor.name),
                metric_type: MetricType::CumulativeFloat64,
                ..descriptor.clone()
            },
            sum_series,
        ));
    }
    if !count_series.is_empty() {
        metrics.push(component(
            summary,
            Descriptor {
                name: format!("{}_summary_count", descriptor.name),
                unit: "1".to_owned(),
                metric_type: MetricType::CumulativeInt64,
                ..descriptor.clone()
            },
            count_series,
        ));
    }
    if !percentile_series.is_empty() {
        let mut label_keys = descriptor.label_keys.clone();
        label_keys.push(
            LabelKey::new(PERCENTILE_LABEL_KEY).with_description(PERCENTILE_LABEL_DESCRIPTION),
        );
        metrics.push(component(
            summary,
            Descriptor {
                name: format!("{}_summary_percentile", descriptor.name),
                metric_type: MetricType::GaugeFloat64,
                label_keys,
                ..descriptor.clone()
            },
            percentile_series,
        ));
    }
    metrics
}

fn component(summary: &Metric, descriptor: Descriptor, time_series: Vec<TimeSeries>) -> Metric {
    Metric {
        descriptor,
        resource: summary.resource.clone(),
        time_series,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::data::{Resource, Snapshot, Summary};

    fn summary_metric(has_count_and_sum: bool) -> Metric {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let summary = Summary {
            count: 10,
            sum: 119.0,
            has_count_and_sum,
            snapshot: Snapshot {
                percentiles: vec![(50.0, 6.0), (99.5, 13.0)],
            },
        };
        Metric::new(
            Descriptor::new("latency", MetricType::Summary)
                .with_description("request latency")
                .with_unit("ms")
                .with_label_keys(vec![LabelKey::new("route")]),
            vec![TimeSeries::new(
                vec![LabelValue::new("/")],
                vec![Point::new(start + Duration::from_secs(5), summary)],
                start,
            )],
        )
        .with_resource(Resource::new("k8s_container"))
    }

    #[test]
    fn decomposes_summary() {
        let metrics = decompose_summaries(vec![summary_metric(true)]);
        let names: Vec<_> = metrics.iter().map(|m| m.descriptor.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "latency_summary_sum",
                "latency_summary_count",
                "latency_summary_percentile"
            ]
        );
        assert!(metrics
            .iter()
            .all(|m| m.resource == Some(Resource::new("k8s_container"))));

        let sum = &metrics[0];
        assert_eq!(sum.descriptor.metric_type, MetricType::CumulativeFloat64);
        assert_eq!(sum.descriptor.unit, "ms");
        assert_eq!(sum.time_series[0].points[0].value, Value::Float64(119.0));

        let count = &metrics[1];
        assert_eq!(count.descriptor.metric_type, MetricType::CumulativeInt64);
        assert_eq!(count.descriptor.unit, "1");
        assert_eq!(count.time_series[0].points[0].value, Value::Int64(10));

        let percentile = &metrics[2];
        assert_eq!(percentile.descriptor.metric_type, MetricType::GaugeFloat64);
        assert_eq!(percentile.descriptor.label_keys.len(), 2);
        assert_eq!(percentile.descriptor.label_keys[1].key, "percentile");
        assert_eq!(percentile.time_series.len(), 2);
        assert_eq!(
            percentile.time_series[0].label_values,
            vec![LabelValue::new("/"), LabelValue::new("50.000000")]
        );
        assert_eq!(
            percentile.time_series[1].label_values[1],
            LabelValue::new("99.500000")
        );
        assert_eq!(
            percentile.time_series[1].points[0].value,
            Value::Float64(13.0)
        );
    }

    #[test]
    fn summary_without_count_and_sum() {
        let metrics = decompose_summaries(vec![summary_metric(false)]);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].descriptor.name, "latency_summary_percentile");
    }

    #[test]
    fn other_metrics_pass_through() {
        let gauge = Metric::new(Descriptor::new("queue", MetricType::GaugeInt64), vec![]);
        let metrics = decompose_summaries(vec![gauge.clone(), summary_metric(true)]);
        assert_eq!(metrics.len(), 4);
        assert_eq!(metrics[0], gauge);
    }
}
