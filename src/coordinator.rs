use crate::pipeline::domain::MeasurementResult;
use crate::pipeline::services::ResultReporter;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owner side of a spawned measurement. Dropping it abandons the invocation.
pub struct MeasurementHandle {
    task: JoinHandle<()>,
    cancel_token: CancellationToken,
    // Held while reporting and while cancelling, so a cancel that returns has
    // either waited for an in-flight report or suppressed it.
    report_lock: Arc<Mutex<()>>,
    outcome_rx: oneshot::Receiver<MeasurementResult>,
}

impl MeasurementHandle {
    pub(crate) fn spawn<F>(measurement: F, reporter: Arc<dyn ResultReporter>) -> Self
    where
        F: Future<Output = MeasurementResult> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let report_lock = Arc::new(Mutex::new(()));
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let task = Self::start_task(
            measurement,
            reporter,
            outcome_tx,
            cancel_token.clone(),
            report_lock.clone(),
        );

        Self {
            task,
            cancel_token,
            report_lock,
            outcome_rx,
        }
    }

    fn start_task<F>(
        measurement: F,
        reporter: Arc<dyn ResultReporter>,
        outcome_tx: oneshot::Sender<MeasurementResult>,
        cancel_token: CancellationToken,
        report_lock: Arc<Mutex<()>>,
    ) -> JoinHandle<()>
    where
        F: Future<Output = MeasurementResult> + Send + 'static,
    {
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!("Measurement abandoned before completion, discarding");
                }
                result = measurement => {
                    let reported = {
                        let _guard = report_lock.lock().unwrap_or_else(PoisonError::into_inner);
                        let live = !cancel_token.is_cancelled();
                        if live {
                            reporter.report(&result);
                        }
                        live
                    };
                    if !reported {
                        debug!("Measurement finished after being abandoned, discarding");
                        return;
                    }
                    if outcome_tx.send(result).is_err() {
                        debug!("Nobody is waiting for the measurement outcome");
                    }
                }
            }
        })
    }

    /// Abandons the invocation. A late outcome is dropped without reaching
    /// the reporter.
    pub fn cancel(&self) {
        let _guard = self
            .report_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the outcome. `None` when the invocation was cancelled.
    pub async fn outcome(mut self) -> Option<MeasurementResult> {
        (&mut self.outcome_rx).await.ok()
    }
}

impl Drop for MeasurementHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
