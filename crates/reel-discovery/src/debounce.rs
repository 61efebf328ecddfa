//! Trailing-edge debouncing of a value stream.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

/// Commits a value once it has stopped changing for `delay`.
///
/// Every new input re-arms the timer, so only the last value of a burst is
/// committed. A value equal to the last committed one is dropped.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    committed: Option<T>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            committed: None,
        }
    }

    /// Treat `value` as already committed, so it is not emitted again.
    pub fn with_committed(mut self, value: T) -> Self {
        self.committed = Some(value);
        self
    }

    /// Debounce `input` into `output` until `input` closes or `output` is
    /// dropped.
    ///
    /// A value still pending when `input` closes is committed after the rest
    /// of its quiet period.
    pub async fn run(mut self, mut input: mpsc::Receiver<T>, output: mpsc::Sender<T>) {
        let mut pending: Option<T> = None;
        let timer = sleep(self.delay);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => {
                        pending = Some(value);
                        timer.as_mut().reset(Instant::now() + self.delay);
                    }
                    None => {
                        if let Some(value) = pending.take() {
                            timer.as_mut().await;
                            self.commit(value, &output).await;
                        }
                        return;
                    }
                },
                _ = &mut timer, if pending.is_some() => {
                    if let Some(value) = pending.take() {
                        if !self.commit(value, &output).await {
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Run on a background task, returning the committed stream.
    pub fn spawn(self, input: mpsc::Receiver<T>) -> (mpsc::Receiver<T>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(self.run(input, tx));
        (rx, handle)
    }

    /// Returns false once the receiver is gone.
    async fn commit(&mut self, value: T, output: &mpsc::Sender<T>) -> bool {
        if self.committed.as_ref() == Some(&value) {
            return true;
        }
        self.committed = Some(value.clone());
        output.send(value).await.is_ok()
    }
}
