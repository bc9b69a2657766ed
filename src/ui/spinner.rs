use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

const TICKS: &str = "◐◓◑◒";

/// Spinner on stderr, cleared when dropped. Silent unless stderr is a TTY.
struct Spinner(Option<ProgressBar>);

impl Spinner {
    fn start(msg: impl Into<String>) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self(None);
        }

        let style = ProgressStyle::with_template("{spinner:.yellow.bold} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICKS);
        let pb = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(msg.into());
        pb.enable_steady_tick(Duration::from_millis(120));
        Self(Some(pb))
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = self.0.take() {
            pb.finish_and_clear();
        }
    }
}

/// Awaits `fut` with a spinner showing `msg`.
pub(crate) async fn spin_while<Fut: Future>(msg: impl Into<String>, fut: Fut) -> Fut::Output {
    let _spinner = Spinner::start(msg);
    fut.await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_the_output_through() {
        let out = spin_while("working", async { 42 }).await;
        assert_eq!(out, 42);
    }
}
