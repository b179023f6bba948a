//! Deferred work module
//!
//! A small task-queue standing in for an edge runtime's "after the
//! response" lifecycle hook. Handlers submit fire-and-forget jobs (access
//! log writes, hot-cache population); a runner task on the server's
//! `LocalSet` drains them in submission order. Nothing on the response
//! path ever waits for a job, and jobs carry no cancellation contract:
//! whatever is still queued when the process stops is dropped.

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

type Job = Pin<Box<dyn Future<Output = ()> + 'static>>;

/// Submission handle held by the application state
#[derive(Clone)]
pub struct DeferredQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl DeferredQueue {
    /// Create a queue and the runner that will drain it.
    pub fn new() -> (Self, JobRunner) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, JobRunner { rx })
    }

    /// Enqueue a job. Returns false when the runner is gone, in which
    /// case the job is silently dropped.
    pub fn submit(&self, job: impl Future<Output = ()> + 'static) -> bool {
        self.tx.send(Box::pin(job)).is_ok()
    }
}

/// Drains and awaits submitted jobs, one at a time, in order
pub struct JobRunner {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl JobRunner {
    /// Run until every submission handle has been dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            job.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_jobs_run_in_submission_order() {
        let (queue, runner) = DeferredQueue::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let seen = Rc::clone(&seen);
            assert!(queue.submit(async move { seen.borrow_mut().push(i) }));
        }

        drop(queue);
        runner.run().await;
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_submit_after_runner_gone_is_dropped() {
        let (queue, runner) = DeferredQueue::new();
        drop(runner);
        assert!(!queue.submit(async {}));
    }
}
