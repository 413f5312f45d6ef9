//! Resize debouncer: coalesces bursts of viewport changes into one relayout.
//!
//! `trigger` never blocks. The background task waits until no trigger has arrived for the
//! quiescence window, then fires with the most recent viewport, but only if it differs
//! (orientation flip or more than 1px in either dimension) from the last seen size.
//! Triggers that arrive while a fire is still running are coalesced into the next window.
//!
//! The last seen size is read from a `watch` channel the board publishes on every
//! viewport change, so sizes set by direct layout requests count too.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::viewport::Viewport;

pub struct ResizeDebouncer {
    tx: mpsc::UnboundedSender<Viewport>,
    task: JoinHandle<()>,
}

impl ResizeDebouncer {
    /// Spawns the debounce task on the current runtime.
    ///
    /// `last_seen` follows the viewport the board is laid out for.
    pub fn spawn<F, Fut>(
        window: Duration,
        last_seen: watch::Receiver<Viewport>,
        on_settled: F,
    ) -> Self
    where
        F: FnMut(Viewport) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, window, last_seen, on_settled));
        Self { tx, task }
    }

    pub fn trigger(&self, viewport: Viewport) {
        if self.tx.send(viewport).is_err() {
            debug!("Resize debouncer task has stopped; trigger dropped");
        }
    }
}

impl Drop for ResizeDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<F, Fut>(
    mut rx: mpsc::UnboundedReceiver<Viewport>,
    window: Duration,
    last_seen: watch::Receiver<Viewport>,
    mut on_settled: F,
) where
    F: FnMut(Viewport) -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(first) = rx.recv().await {
        let mut latest = first;
        let mut closed = false;

        // Each new trigger restarts the window.
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(viewport) => latest = viewport,
                    None => {
                        closed = true;
                        break;
                    }
                },
                _ = tokio::time::sleep(window) => break,
            }
        }

        let current = *last_seen.borrow();
        if latest.differs_from(&current) {
            debug!(
                width = latest.width,
                height = latest.height,
                "Viewport settled; relayout"
            );
            on_settled(latest).await;
        } else {
            debug!("Viewport settled within tolerance; skipping relayout");
        }

        if closed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Fired = Arc<Mutex<Vec<Viewport>>>;

    /// A debouncer whose callback records the viewport and publishes it, as the board does.
    fn recorder(initial: Viewport) -> (ResizeDebouncer, Fired, Arc<watch::Sender<Viewport>>) {
        let (tx, rx) = watch::channel(initial);
        let tx = Arc::new(tx);
        let fired: Fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let publish = tx.clone();
        let debouncer = ResizeDebouncer::spawn(Duration::from_millis(200), rx, move |vp| {
            let sink = sink.clone();
            let publish = publish.clone();
            async move {
                sink.lock().unwrap().push(vp);
                publish.send_replace(vp);
            }
        });
        (debouncer, fired, tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_latest() {
        let (debouncer, fired, _tx) = recorder(Viewport::new(1920, 1080));
        for width in [1800, 1700, 1600] {
            debouncer.trigger(Viewport::new(width, 900));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(fired.lock().unwrap().is_empty(), "window still open");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(*fired.lock().unwrap(), vec![Viewport::new(1600, 900)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_trigger_restarts_the_window() {
        let (debouncer, fired, _tx) = recorder(Viewport::new(1600, 900));
        for _ in 0..5 {
            debouncer.trigger(Viewport::new(1280, 720));
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        assert!(fired.lock().unwrap().is_empty());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_within_a_pixel_is_ignored() {
        let (debouncer, fired, _tx) = recorder(Viewport::new(1600, 900));
        debouncer.trigger(Viewport::new(1601, 900));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (debouncer, fired, _tx) = recorder(Viewport::new(1600, 900));
        debouncer.trigger(Viewport::new(900, 1600));
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.trigger(Viewport::new(1600, 900));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(
            *fired.lock().unwrap(),
            vec![Viewport::new(900, 1600), Viewport::new(1600, 900)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_last_seen_size_does_not_fire() {
        let (debouncer, fired, _tx) = recorder(Viewport::new(1600, 900));
        debouncer.trigger(Viewport::new(1200, 900));
        debouncer.trigger(Viewport::new(1600, 900));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_size_changed_elsewhere_moves_the_baseline() {
        let (debouncer, fired, tx) = recorder(Viewport::new(1600, 900));
        // A direct layout request moved the board without a trigger.
        tx.send_replace(Viewport::new(1280, 720));

        debouncer.trigger(Viewport::new(1600, 900));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(*fired.lock().unwrap(), vec![Viewport::new(1600, 900)]);
    }
}
