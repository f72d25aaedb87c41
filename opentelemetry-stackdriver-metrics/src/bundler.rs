use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use opentelemetry::{otel_debug, otel_warn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::{Config, ErrorHandler};
use crate::data::Metric;
use crate::exporter::MetricsExporter;
use crate::Error;

const DEFAULT_MAX_QUEUE_SIZE: usize = 2_048;

#[derive(Debug)]
enum Message {
    Export(Vec<Metric>),
    Flush(oneshot::Sender<Result<(), Error>>),
    Shutdown(oneshot::Sender<Result<(), Error>>),
}

/// Buffers metrics and uploads them in the background.
///
/// Buffered metrics are uploaded once the configured count threshold is
/// reached or the delay threshold elapsed, whichever comes first. Errors of
/// these background uploads go to the configured error handler.
#[derive(Clone)]
pub struct MetricsBundler {
    message_sender: mpsc::Sender<Message>,
    is_shutdown: Arc<AtomicBool>,
}

impl MetricsBundler {
    pub(crate) fn new(exporter: MetricsExporter, config: &Config) -> Self {
        Self::with_queue_size(exporter, config, DEFAULT_MAX_QUEUE_SIZE)
    }

    pub(crate) fn with_queue_size(
        exporter: MetricsExporter,
        config: &Config,
        max_queue_size: usize,
    ) -> Self {
        let (message_sender, message_receiver) = mpsc::channel(max_queue_size);
        let worker = BundlerWorker {
            exporter,
            buffer: Vec::new(),
            count_threshold: config.bundle_count_threshold,
            on_error: config.on_error.clone().unwrap_or_else(default_error_handler),
        };
        tokio::spawn(worker.run(message_receiver, config.bundle_delay_threshold));

        MetricsBundler {
            message_sender,
            is_shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queues `metrics` for upload without waiting for it.
    ///
    /// Fails with [`Error::BufferFull`] when the queue is full.
    pub fn export(&self, metrics: Vec<Metric>) -> Result<(), Error> {
        if self.is_shutdown.load(Ordering::Relaxed) {
            return Err(Error::Shutdown);
        }
        self.message_sender
            .try_send(Message::Export(metrics))
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => {
                    otel_warn!(
                        name: "MetricsBundler.BufferFull",
                        message = "Bundler queue is full, metrics are dropped.",
                    );
                    Error::BufferFull
                }
                mpsc::error::TrySendError::Closed(_) => Error::Shutdown,
            })
    }

    /// Uploads everything queued so far and returns the result of that upload.
    pub async fn flush(&self) -> Result<(), Error> {
        if self.is_shutdown.load(Ordering::Relaxed) {
            return Err(Error::Shutdown);
        }
        self.request(Message::Flush).await
    }

    /// Uploads everything queued so far and stops the background task.
    pub async fn shutdown(&self) -> Result<(), Error> {
        if self.is_shutdown.swap(true, Ordering::Relaxed) {
            return Err(Error::Shutdown);
        }
        self.request(Message::Shutdown).await
    }

    async fn request(
        &self,
        message: impl FnOnce(oneshot::Sender<Result<(), Error>>) -> Message,
    ) -> Result<(), Error> {
        let (sender, receiver) = oneshot::channel();
        self.message_sender
            .send(message(sender))
            .await
            .map_err(|_| Error::Shutdown)?;
        receiver.await.map_err(|_| Error::Shutdown)?
    }
}

impl fmt::Debug for MetricsBundler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsBundler")
            .field("is_shutdown", &self.is_shutdown.load(Ordering::Relaxed))
            .finish()
    }
}

fn default_error_handler() -> ErrorHandler {
    Arc::new(|err: Error| {
        otel_warn!(
            name: "MetricsBundler.UploadFailed",
            reason = format!("{err}"),
        );
    })
}

struct BundlerWorker {
    exporter: MetricsExporter,
    buffer: Vec<Metric>,
    count_threshold: usize,
    on_error: ErrorHandler,
}

impl BundlerWorker {
    async fn upload(&mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let metrics = mem::take(&mut self.buffer);
        otel_debug!(
            name: "MetricsBundler.Upload",
            metrics = metrics.len(),
        );
        self.exporter.upload_metrics(metrics).await
    }

    async fn upload_in_background(&mut self) {
        if let Err(err) = self.upload().await {
            (self.on_error)(err);
        }
    }

    async fn run(mut self, mut messages: mpsc::Receiver<Message>, delay: Duration) {
        let mut ticker = time::interval_at(Instant::now() + delay, delay);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                message = messages.recv() => match message {
                    Some(Message::Export(metrics)) => {
                        self.buffer.extend(metrics);
                        if self.buffer.len() >= self.count_threshold {
                            self.upload_in_background().await;
                            ticker.reset();
                        }
                    }
                    Some(Message::Flush(ch)) => {
                        let res = self.upload().await;
                        if ch.send(res).is_err() {
                            otel_debug!(name: "MetricsBundler.Flush.SendResultError");
                        }
                    }
                    Some(Message::Shutdown(ch)) => {
                        let res = self.upload().await;
                        if ch.send(res).is_err() {
                            otel_debug!(name: "MetricsBundler.Shutdown.SendResultError");
                        }
                        break;
                    }
                    // every handle is gone
                    None => {
                        self.upload_in_background().await;
                        break;
                    }
                },
                _ = ticker.tick() => self.upload_in_background().await,
            }
        }
        otel_debug!(name: "MetricsBundler.Stopped");
    }
}
