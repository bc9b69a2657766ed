use crossterm::event::{self, Event};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Forwards terminal events from a blocking reader thread.
///
/// Polling wakes every `tick` so the thread notices cancellation.
pub(crate) struct EventReader {
    token: CancellationToken,
}

impl EventReader {
    pub(crate) fn spawn(tick: Duration) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let token = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let reader_token = token.clone();
        tokio::task::spawn_blocking(move || {
            while !reader_token.is_cancelled() {
                match event::poll(tick) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(err) => {
                        warn!("Terminal poll failed: {err}");
                        break;
                    }
                }
                match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!("Terminal read failed: {err}");
                        break;
                    }
                }
            }
            debug!("Event reader stopped");
        });

        (Self { token }, rx)
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
