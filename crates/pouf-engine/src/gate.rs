//! At most one pipeline at a time.

use futures_util::future::LocalBoxFuture;

/// Owns the resources a pipeline needs. Starting a pipeline moves them into
/// its future and they come back when it finishes, so a second pipeline
/// cannot start while one is running.
pub struct ActivationGate<R> {
    idle: Option<R>,
    busy: Option<LocalBoxFuture<'static, R>>,
}

impl<R> ActivationGate<R> {
    pub fn new(resources: R) -> Self {
        Self {
            idle: Some(resources),
            busy: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Start a pipeline if none is running. Returns `false`, without calling
    /// `start`, while busy.
    pub fn try_start<F>(&mut self, start: F) -> bool
    where
        F: FnOnce(R) -> LocalBoxFuture<'static, R>,
    {
        if self.busy.is_some() {
            return false;
        }
        let Some(resources) = self.idle.take() else {
            return false;
        };
        self.busy = Some(start(resources));
        true
    }

    /// Drive the running pipeline to completion. Pending forever while idle.
    ///
    /// Cancel safe: dropping this future leaves the pipeline in place to be
    /// resumed by the next call.
    pub async fn finished(&mut self) {
        let Some(pipeline) = self.busy.as_mut() else {
            return std::future::pending().await;
        };
        let resources = pipeline.await;
        self.busy = None;
        self.idle = Some(resources);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use futures_util::FutureExt;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_second_start_is_dropped_while_busy() {
        let mut gate = ActivationGate::new(0u32);
        let runs = Rc::new(Cell::new(0));

        let counter = runs.clone();
        assert!(gate.try_start(move |n| {
            async move {
                counter.set(counter.get() + 1);
                tokio::time::sleep(Duration::from_millis(100)).await;
                n + 1
            }
            .boxed_local()
        }));
        assert!(gate.is_busy());

        assert!(!gate.try_start(|_| unreachable!("started while busy")));

        gate.finished().await;
        assert!(!gate.is_busy());
        assert_eq!(runs.get(), 1);

        let seen = Rc::new(Cell::new(0));
        let out = seen.clone();
        assert!(gate.try_start(move |n| {
            out.set(n);
            async move { n }.boxed_local()
        }));
        gate.finished().await;
        assert_eq!(seen.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_is_cancel_safe() {
        let mut gate = ActivationGate::new(());
        gate.try_start(|r| {
            async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                r
            }
            .boxed_local()
        });

        let timed_out =
            tokio::time::timeout(Duration::from_millis(10), gate.finished()).await;
        assert!(timed_out.is_err());
        assert!(gate.is_busy());

        gate.finished().await;
        assert!(!gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_pends_while_idle() {
        let mut gate = ActivationGate::new(());
        let result = tokio::time::timeout(Duration::from_secs(5), gate.finished()).await;
        assert!(result.is_err());
    }
}
