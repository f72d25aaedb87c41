//! Shapes time series into requests Cloud Monitoring accepts.

use std::collections::HashSet;

use crate::naming::is_service_metric;
use crate::proto::api;
use crate::proto::monitoring::v3::{CreateTimeSeriesRequest, TimeSeries};

/// Identity of a time series for deduplication: the metric type followed by
/// the sorted label values.
///
/// Label keys are not part of the signature, so two series whose label
/// values coincide after sorting are treated as duplicates even when their
/// keys differ.
pub(crate) fn signature(metric: Option<&api::Metric>) -> String {
    let Some(metric) = metric else {
        return String::new();
    };
    let mut values: Vec<&str> = metric.labels.values().map(String::as_str).collect();
    values.sort_unstable();
    format!("{}:{}", metric.r#type, values.join(","))
}

/// Packs `series` into requests that never contain two series with the same
/// signature.
///
/// The first request takes the first occurrence of every signature, the next
/// one the second occurrences, and so on, so the number of requests equals
/// the highest multiplicity of any signature. Input order is preserved within
/// each request.
pub(crate) fn combine(project_name: &str, series: Vec<TimeSeries>) -> Vec<CreateTimeSeriesRequest> {
    let mut requests = Vec::new();
    let mut remaining = series;
    while !remaining.is_empty() {
        let mut seen = HashSet::with_capacity(remaining.len());
        let (unique, duplicates): (Vec<_>, Vec<_>) = remaining
            .into_iter()
            .partition(|ts| seen.insert(signature(ts.metric.as_ref())));
        requests.push(CreateTimeSeriesRequest {
            name: project_name.to_owned(),
            time_series: unique,
        });
        remaining = duplicates;
    }
    requests
}

/// Splits a request into its service metric series and its other series,
/// in that order. Either side is `None` when it would be empty.
pub(crate) fn split_service(
    request: CreateTimeSeriesRequest,
) -> (
    Option<CreateTimeSeriesRequest>,
    Option<CreateTimeSeriesRequest>,
) {
    let CreateTimeSeriesRequest { name, time_series } = request;
    let (service, other): (Vec<_>, Vec<_>) = time_series.into_iter().partition(|ts| {
        ts.metric
            .as_ref()
            .is_some_and(|m| is_service_metric(&m.r#type))
    });

    let into_request = |time_series: Vec<TimeSeries>| {
        (!time_series.is_empty()).then(|| CreateTimeSeriesRequest {
            name: name.clone(),
            time_series,
        })
    };
    (into_request(service), into_request(other))
}
