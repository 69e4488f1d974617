//! Background tick driver.
//!
//! The ticker never touches render state. It posts a tick message to the
//! render task and waits for the acknowledgement before scheduling the next
//! one, so two ticks never overlap.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Messages handled by the render-owning task
#[derive(Debug)]
pub enum RenderMessage {
    /// Advance animations by `elapsed`, then acknowledge on `done`
    Tick {
        elapsed: Duration,
        done: oneshot::Sender<()>,
    },
    /// Stop the render loop
    Shutdown,
}

/// Start the free-running tick loop. It stops when the render side drops
/// its receiver or stops acknowledging.
pub fn spawn_ticker(period: Duration, tx: mpsc::Sender<RenderMessage>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            interval.tick().await;
            let now = Instant::now();
            let elapsed = now - last;
            last = now;

            let (done, ack) = oneshot::channel();
            if tx.send(RenderMessage::Tick { elapsed, done }).await.is_err() {
                tracing::debug!("Render channel closed, ticker stopping");
                break;
            }
            if ack.await.is_err() {
                tracing::debug!("Tick dropped without acknowledgement, ticker stopping");
                break;
            }
        }
    })
}
