use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use opentelemetry::{otel_debug, otel_warn};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::accounting::dropped_time_series;
use crate::client::MetricClient;
use crate::proto::monitoring::v3::{CreateTimeSeriesRequest, TimeSeries};
use crate::split::{combine, split_service};
use crate::Error;

/// Cloud Monitoring accepts at most this many series per request.
pub(crate) const MAX_TIME_SERIES_PER_UPLOAD: usize = 200;
const MIN_NUMBER_OF_WORKERS: usize = 1;
const MIN_REQUESTS_CHANNEL_SIZE: usize = 5;

/// What an upload achieved: how many time series were dropped and the errors
/// met along the way.
#[derive(Debug, Default)]
pub struct Outcome {
    pub dropped_time_series: usize,
    pub errors: Vec<Error>,
}

impl Outcome {
    pub(crate) fn record(&mut self, dropped_time_series: usize, error: Error) {
        self.dropped_time_series += dropped_time_series;
        self.errors.push(error);
    }

    pub(crate) fn merge(&mut self, other: Outcome) {
        self.dropped_time_series += other.dropped_time_series;
        self.errors.extend(other.errors);
    }

    /// `Ok` without errors, the error itself when there is exactly one and
    /// [`Error::Combined`] otherwise.
    pub fn into_result(mut self) -> Result<(), Error> {
        if self.errors.len() > 1 {
            return Err(Error::Combined(
                self.errors.iter().map(ToString::to_string).collect(),
            ));
        }
        match self.errors.pop() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Per-upload settings shared by all workers.
#[derive(Clone)]
pub(crate) struct Dispatch {
    pub(crate) client: Arc<dyn MetricClient>,
    pub(crate) timeout: Duration,
    pub(crate) cancellation: CancellationToken,
}

/// Groups time series into requests and sends them with a fixed pool of
/// workers.
///
/// Full requests are queued as soon as [`MAX_TIME_SERIES_PER_UPLOAD`] series
/// are pending. The queue is bounded, so adding series waits when the
/// workers fall behind. [`MetricsBatcher::close`] sends the rest and collects
/// what every worker observed.
pub(crate) struct MetricsBatcher {
    project_name: String,
    pending: Vec<TimeSeries>,
    requests: mpsc::Sender<CreateTimeSeriesRequest>,
    responses: mpsc::Receiver<Outcome>,
    workers: Vec<JoinHandle<()>>,
    outcome: Outcome,
}

impl MetricsBatcher {
    /// Starts `number_of_workers` workers on the current tokio runtime.
    pub(crate) fn new(project_id: &str, number_of_workers: usize, dispatch: Dispatch) -> Self {
        let number_of_workers = number_of_workers.max(MIN_NUMBER_OF_WORKERS);
        let (requests, receiver) =
            mpsc::channel(number_of_workers.max(MIN_REQUESTS_CHANNEL_SIZE));
        let (responder, responses) = mpsc::channel(number_of_workers);

        let receiver = Arc::new(Mutex::new(receiver));
        let workers = (0..number_of_workers)
            .map(|_| {
                tokio::spawn(run_worker(
                    receiver.clone(),
                    responder.clone(),
                    dispatch.clone(),
                ))
            })
            .collect();

        MetricsBatcher {
            project_name: format!("projects/{project_id}"),
            pending: Vec::with_capacity(MAX_TIME_SERIES_PER_UPLOAD),
            requests,
            responses,
            workers,
            outcome: Outcome::default(),
        }
    }

    pub(crate) async fn add_time_series(&mut self, time_series: TimeSeries) {
        self.pending.push(time_series);
        if self.pending.len() == MAX_TIME_SERIES_PER_UPLOAD {
            self.enqueue_pending().await;
        }
    }

    async fn enqueue_pending(&mut self) {
        let pending = std::mem::replace(
            &mut self.pending,
            Vec::with_capacity(MAX_TIME_SERIES_PER_UPLOAD),
        );
        for request in combine(&self.project_name, pending) {
            if let Err(mpsc::error::SendError(request)) = self.requests.send(request).await {
                otel_warn!(
                    name: "MetricsBatcher.WorkersGone",
                    message = "No worker left to send the request.",
                    dropped_time_series = request.time_series.len(),
                );
                self.outcome
                    .record(request.time_series.len(), Error::Shutdown);
            }
        }
    }

    /// Sends the remaining series, waits for the workers to finish and
    /// returns what they observed.
    pub(crate) async fn close(mut self) -> Outcome {
        if !self.pending.is_empty() {
            self.enqueue_pending().await;
        }

        let MetricsBatcher {
            requests,
            mut responses,
            workers,
            mut outcome,
            ..
        } = self;
        drop(requests);

        for res in join_all(workers).await {
            if let Err(err) = res {
                otel_warn!(
                    name: "MetricsBatcher.WorkerFailed",
                    reason = format!("{err}"),
                );
            }
        }
        while let Some(response) = responses.recv().await {
            outcome.merge(response);
        }
        outcome
    }
}

async fn run_worker(
    requests: Arc<Mutex<mpsc::Receiver<CreateTimeSeriesRequest>>>,
    responder: mpsc::Sender<Outcome>,
    dispatch: Dispatch,
) {
    let mut outcome = Outcome::default();
    loop {
        // The lock is released as soon as a request is taken.
        let request = requests.lock().await.recv().await;
        let Some(request) = request else {
            break;
        };
        outcome.merge(send_request(&dispatch, request).await);
    }

    // The batcher keeps its receiver until every worker has finished.
    let _ = responder.send(outcome).await;
}

/// Sends the non service series of `request` first and its service series
/// second, under one deadline.
pub(crate) async fn send_request(dispatch: &Dispatch, request: CreateTimeSeriesRequest) -> Outcome {
    let deadline = Instant::now() + dispatch.timeout;
    let (service, non_service) = split_service(request);
    let mut outcome = Outcome::default();

    if let Some(request) = non_service {
        let len = request.time_series.len();
        let call = dispatch.client.create_time_series(request);
        if let Err(err) = bounded(dispatch, deadline, call).await {
            record_failure(&mut outcome, len, err);
        }
    }
    if let Some(request) = service {
        let len = request.time_series.len();
        let call = dispatch.client.create_service_time_series(request);
        if let Err(err) = bounded(dispatch, deadline, call).await {
            record_failure(&mut outcome, len, err);
        }
    }

    outcome
}

fn record_failure(outcome: &mut Outcome, len: usize, err: Error) {
    let dropped = dropped_time_series(len, &err);
    otel_warn!(
        name: "MetricsBatcher.RequestFailed",
        time_series = len,
        dropped_time_series = dropped,
        reason = format!("{err}"),
    );
    outcome.record(dropped, err);
}

/// Runs `call` until `deadline` unless the upload is cancelled first.
pub(crate) async fn bounded<T, F>(dispatch: &Dispatch, deadline: Instant, call: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    tokio::select! {
        biased;
        _ = dispatch.cancellation.cancelled() => {
            otel_debug!(name: "MetricsBatcher.CallCancelled");
            Err(Error::Cancelled)
        }
        res = tokio::time::timeout_at(deadline, call) => {
            res.unwrap_or(Err(Error::Timeout(dispatch.timeout)))
        }
    }
}
