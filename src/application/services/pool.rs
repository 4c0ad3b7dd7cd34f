//! Bounded fan-out of per-plugin work

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::application::errors::{AppError, TaskError};

/// Result of one plugin's unit of work
#[derive(Debug)]
pub struct Outcome<R> {
    pub name: String,
    pub result: Result<R, TaskError>,
}

/// Every outcome of a run, in submission order
#[derive(Debug)]
pub struct RunReport<R> {
    pub outcomes: Vec<Outcome<R>>,
}

impl<R> RunReport<R> {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &R)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o.name.as_str(), r)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &TaskError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Log every failure plus a one-line tally, then fold into a single result
    pub fn summarize(self, verb: &str) -> Result<Self, AppError> {
        for (name, err) in self.failed() {
            tracing::error!("{} {} failed: {}", verb, name, err);
        }

        let failed = self.failure_count();
        let total = self.total();
        tracing::info!("{}: {} succeeded, {} failed", verb, total - failed, failed);

        if failed > 0 {
            Err(AppError::Failures { failed, total })
        } else {
            Ok(self)
        }
    }
}

/// Runs at most `concurrency` units at once and stops waiting on any unit
/// once the token is cancelled.
#[derive(Clone)]
pub struct WorkerPool {
    limit: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl WorkerPool {
    pub fn new(concurrency: usize, cancel: CancellationToken) -> Self {
        Self {
            limit: Arc::new(Semaphore::new(concurrency.max(1))),
            cancel,
        }
    }

    /// Spawn `work` for every `(name, input)` pair and wait for all of them.
    ///
    /// A failing or panicking unit only affects its own outcome.
    pub async fn run<T, R, F, Fut>(&self, units: Vec<(String, T)>, work: F) -> RunReport<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, TaskError>> + Send + 'static,
    {
        let mut tasks = Vec::with_capacity(units.len());

        for (name, input) in units {
            let limit = self.limit.clone();
            let cancel = self.cancel.clone();
            let fut = work(input);

            let handle = tokio::spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(TaskError::Cancelled),
                    permit = limit.acquire_owned() => {
                        permit.map_err(|_| TaskError::Cancelled)?
                    }
                };

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(TaskError::Cancelled),
                    result = fut => result,
                }
            });
            tasks.push((name, handle));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (name, handle) in tasks {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(TaskError::Worker(e.to_string())),
            };
            outcomes.push(Outcome { name, result });
        }

        RunReport { outcomes }
    }
}
