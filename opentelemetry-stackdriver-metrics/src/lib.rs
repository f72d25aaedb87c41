//! Exports OpenTelemetry metrics to Google Cloud Monitoring (formerly
//! Stackdriver).
//!
//! Metrics are converted into Cloud Monitoring time series, their metric
//! descriptors are created the first time they are seen, and the series are
//! written with `CreateTimeSeries` calls of at most 200 series each, sent by a
//! configurable number of concurrent workers.
//!
//! ```no_run
//! use std::time::SystemTime;
//!
//! use opentelemetry_stackdriver_metrics::data::{
//!     Descriptor, LabelKey, LabelValue, Metric, MetricType, Point, TimeSeries,
//! };
//! use opentelemetry_stackdriver_metrics::{Error, MetricsExporter, StaticAuthorizer};
//!
//! # async fn run(token: String) -> Result<(), Error> {
//! let exporter = MetricsExporter::builder()
//!     .number_of_workers(4)
//!     .connect(StaticAuthorizer::new("my-project", Some(token)))
//!     .await?;
//!
//! let start = SystemTime::now();
//! let requests = Metric::new(
//!     Descriptor::new("http/requests", MetricType::CumulativeInt64)
//!         .with_label_keys(vec![LabelKey::new("route")]),
//!     vec![TimeSeries::new(
//!         vec![LabelValue::new("/")],
//!         vec![Point::new(SystemTime::now(), 42i64)],
//!         start,
//!     )],
//! );
//! exporter.upload_metrics(vec![requests]).await?;
//! # Ok(())
//! # }
//! ```
use std::time::Duration;

use thiserror::Error;

mod accounting;
mod batcher;
mod builder;
mod bundler;
mod client;
mod config;
mod convert;
pub mod data;
mod descriptor;
mod exporter;
mod naming;
#[allow(clippy::derive_partial_eq_without_eq)] // tonic doesn't derive Eq for generated types
pub mod proto;
mod resource;
mod split;
mod summary;
#[cfg(test)]
mod testing;

pub use batcher::Outcome;
pub use bundler::MetricsBundler;
#[cfg(feature = "gcp-authorizer")]
pub use client::GcpAuthorizer;
#[cfg(feature = "tls")]
pub use client::GcmClient;
pub use client::{Authorizer, MetricClient, StaticAuthorizer};
pub use config::{ErrorHandler, ExporterBuilder, Labels};
pub use exporter::MetricsExporter;
pub use naming::{sanitize, MetricPrefixFn};
pub use resource::{MonitoredResource, ResourceMapper};

#[derive(Debug, Error)]
pub enum Error {
    #[error("project id must not be blank")]
    BlankProjectId,
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(&'static str),
    #[error("length mismatch: {keys} label keys but {values} label values")]
    LabelArityMismatch { keys: usize, values: usize },
    /// A call rejected by Cloud Monitoring, `message` is the status message.
    #[error("{message}")]
    Rpc { code: tonic::Code, message: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("upload cancelled")]
    Cancelled,
    #[error("tonic error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("authorizer error: {0}")]
    Authorizer(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("bundler buffer is full")]
    BufferFull,
    #[error("already shut down")]
    Shutdown,
    /// Several failures, by message.
    #[error("[{}]", .0.join("; "))]
    Combined(Vec<String>),
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Error::Rpc {
            code: status.code(),
            message: status.message().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keeps_backend_message() {
        let status = tonic::Status::invalid_argument(
            "One or more TimeSeries could not be written: timeSeries[1]",
        );
        let err = Error::from(status);
        assert!(matches!(
            &err,
            Error::Rpc {
                code: tonic::Code::InvalidArgument,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "One or more TimeSeries could not be written: timeSeries[1]"
        );
    }

    #[test]
    fn combined_message() {
        let err = Error::Combined(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(err.to_string(), "[a; b; c]");
    }
}
