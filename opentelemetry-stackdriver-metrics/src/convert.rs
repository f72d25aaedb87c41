//! Conversion of individual points into Cloud Monitoring typed values.

use prost::Message;
use prost_types::{Any, Timestamp};

use crate::data::{self, AttachmentValue, Bucket, Exemplar};
use crate::proto::api::distribution::{self, bucket_options};
use crate::proto::api::Distribution;
use crate::proto::monitoring::v3::{typed_value, Point, SpanContext, TimeInterval, TypedValue};
use crate::Error;

pub(crate) const EXEMPLAR_ATTACHMENT_TYPE_SPAN_CONTEXT: &str =
    "type.googleapis.com/google.monitoring.v3.SpanContext";
pub(crate) const EXEMPLAR_ATTACHMENT_TYPE_STRING: &str =
    "type.googleapis.com/google.protobuf.StringValue";

/// Converts a point, `start_time` is `None` for gauges.
pub(crate) fn convert_point(
    start_time: Option<&Timestamp>,
    point: &data::Point,
    project_id: &str,
) -> Result<Point, Error> {
    let value = convert_value(&point.value, project_id)?;
    Ok(Point {
        interval: Some(TimeInterval {
            start_time: start_time.cloned(),
            end_time: Some(point.time.into()),
        }),
        value: Some(value),
    })
}

pub(crate) fn convert_value(value: &data::Value, project_id: &str) -> Result<TypedValue, Error> {
    let value = match value {
        data::Value::Int64(v) => typed_value::Value::Int64Value(*v),
        data::Value::Float64(v) => typed_value::Value::DoubleValue(*v),
        data::Value::Distribution(d) => {
            typed_value::Value::DistributionValue(convert_distribution(d, project_id))
        }
        data::Value::Summary(_) => return Err(Error::UnsupportedValueType(value.kind_name())),
    };
    Ok(TypedValue { value: Some(value) })
}

fn convert_distribution(d: &data::Distribution, project_id: &str) -> Distribution {
    let mean = if d.count > 0 {
        d.sum / d.count as f64
    } else {
        0.0
    };

    // Cloud Monitoring's first bucket is (-inf, 0) while ours starts at 0,
    // so keep that underflow bucket empty.
    let insert_zero_bound = d
        .bucket_options
        .as_ref()
        .is_some_and(|opts| should_insert_zero_bound(&opts.bounds));

    let bucket_options = d.bucket_options.as_ref().map(|opts| {
        let mut bounds = Vec::with_capacity(opts.bounds.len() + 1);
        if insert_zero_bound {
            bounds.push(0.0);
        }
        bounds.extend_from_slice(&opts.bounds);
        distribution::BucketOptions {
            options: Some(bucket_options::Options::ExplicitBuckets(
                bucket_options::Explicit { bounds },
            )),
        }
    });

    let (bucket_counts, exemplars) = buckets_to_counts_and_exemplars(&d.buckets, project_id);
    let bucket_counts = if insert_zero_bound {
        std::iter::once(0).chain(bucket_counts).collect()
    } else {
        bucket_counts
    };

    Distribution {
        count: d.count,
        mean,
        sum_of_squared_deviation: d.sum_of_squared_deviation,
        range: None,
        bucket_options,
        bucket_counts,
        exemplars,
    }
}

fn should_insert_zero_bound(bounds: &[f64]) -> bool {
    bounds.first().is_some_and(|first| *first > 0.0)
}

fn buckets_to_counts_and_exemplars(
    buckets: &[Bucket],
    project_id: &str,
) -> (Vec<i64>, Vec<distribution::Exemplar>) {
    let counts = buckets.iter().map(|b| b.count).collect();
    let exemplars = buckets
        .iter()
        .filter_map(|b| b.exemplar.as_ref())
        .map(|e| exemplar_to_proto(e, project_id))
        .collect();
    (counts, exemplars)
}

fn exemplar_to_proto(exemplar: &Exemplar, project_id: &str) -> distribution::Exemplar {
    distribution::Exemplar {
        value: exemplar.value,
        timestamp: Some(exemplar.timestamp.into()),
        attachments: exemplar
            .attachments
            .values()
            .map(|v| attachment_to_proto(v, project_id))
            .collect(),
    }
}

fn attachment_to_proto(value: &AttachmentValue, project_id: &str) -> Any {
    match value {
        AttachmentValue::SpanContext(cx) => {
            let span_context = SpanContext {
                span_name: format!(
                    "projects/{}/traces/{}/spans/{}",
                    project_id,
                    cx.trace_id(),
                    cx.span_id()
                ),
            };
            Any {
                type_url: EXEMPLAR_ATTACHMENT_TYPE_SPAN_CONTEXT.to_owned(),
                value: span_context.encode_to_vec(),
            }
        }
        // Everything else is reported as a StringValue of its string form.
        AttachmentValue::Value(_) => Any {
            type_url: EXEMPLAR_ATTACHMENT_TYPE_STRING.to_owned(),
            value: value.to_string().encode_to_vec(),
        },
    }
}
