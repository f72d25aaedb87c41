//! In-memory [`MetricClient`] for unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::MetricClient;
use crate::proto::api::MetricDescriptor;
use crate::proto::monitoring::v3::{CreateMetricDescriptorRequest, CreateTimeSeriesRequest};
use crate::Error;

type TimeSeriesFailure = Arc<dyn Fn(&CreateTimeSeriesRequest) -> Option<Error> + Send + Sync>;

/// Records every request and fails the ones it is told to.
#[derive(Default)]
pub(crate) struct RecordingClient {
    descriptors: Mutex<Vec<CreateMetricDescriptorRequest>>,
    time_series: Mutex<Vec<CreateTimeSeriesRequest>>,
    service_time_series: Mutex<Vec<CreateTimeSeriesRequest>>,
    descriptor_failure: Option<String>,
    time_series_failure: Option<TimeSeriesFailure>,
    delay: Option<Duration>,
}

impl RecordingClient {
    /// Rejects descriptor creation for metric types containing `pattern`.
    pub(crate) fn with_descriptor_failure(mut self, pattern: &str) -> Self {
        self.descriptor_failure = Some(pattern.to_owned());
        self
    }

    pub(crate) fn with_time_series_failure<F>(mut self, failure: F) -> Self
    where
        F: Fn(&CreateTimeSeriesRequest) -> Option<Error> + Send + Sync + 'static,
    {
        self.time_series_failure = Some(Arc::new(failure));
        self
    }

    /// Makes every call take `delay` before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn descriptor_requests(&self) -> Vec<CreateMetricDescriptorRequest> {
        self.descriptors.lock().unwrap().clone()
    }

    pub(crate) fn time_series_requests(&self) -> Vec<CreateTimeSeriesRequest> {
        self.time_series.lock().unwrap().clone()
    }

    pub(crate) fn service_time_series_requests(&self) -> Vec<CreateTimeSeriesRequest> {
        self.service_time_series.lock().unwrap().clone()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn record(
        &self,
        requests: &Mutex<Vec<CreateTimeSeriesRequest>>,
        request: CreateTimeSeriesRequest,
    ) -> Result<(), Error> {
        let failure = self
            .time_series_failure
            .as_ref()
            .and_then(|failure| failure(&request));
        requests.lock().unwrap().push(request);
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetricClient for RecordingClient {
    async fn create_metric_descriptor(
        &self,
        request: CreateMetricDescriptorRequest,
    ) -> Result<MetricDescriptor, Error> {
        self.wait().await;
        let descriptor = request.metric_descriptor.clone().unwrap_or_default();
        self.descriptors.lock().unwrap().push(request);
        match &self.descriptor_failure {
            Some(pattern) if descriptor.r#type.contains(pattern.as_str()) => Err(Error::Rpc {
                code: tonic::Code::PermissionDenied,
                message: format!("cannot create {}", descriptor.r#type),
            }),
            _ => Ok(descriptor),
        }
    }

    async fn create_time_series(&self, request: CreateTimeSeriesRequest) -> Result<(), Error> {
        self.wait().await;
        self.record(&self.time_series, request)
    }

    async fn create_service_time_series(
        &self,
        request: CreateTimeSeriesRequest,
    ) -> Result<(), Error> {
        self.wait().await;
        self.record(&self.service_time_series, request)
    }
}

pub(crate) fn rpc_error(message: &str) -> Error {
    Error::Rpc {
        code: tonic::Code::InvalidArgument,
        message: message.to_owned(),
    }
}
