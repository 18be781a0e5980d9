//! Character-by-character reveal of a piece of text.
//!
//! A [`Typewriter`] owns at most one background task. Setting new text
//! cancels that task before a new one is spawned, and dropping the
//! typewriter cancels it as well. Consumers watch the revealed prefix through
//! a [`watch::Receiver`].

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Delay between two revealed characters when none is given
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

pub struct Typewriter {
    interval: Duration,
    source: Option<String>,
    generation: Arc<AtomicU64>,
    revealed: Arc<watch::Sender<String>>,
    task: Option<JoinHandle<()>>,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Typewriter {
    /// A zero interval is bumped to one millisecond.
    pub fn new(interval: Duration) -> Self {
        let (revealed, _) = watch::channel(String::new());
        Typewriter {
            interval: interval.max(Duration::from_millis(1)),
            source: None,
            generation: Arc::new(AtomicU64::new(0)),
            revealed: Arc::new(revealed),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The text currently being revealed
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Receiver that sees every published prefix
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.revealed.subscribe()
    }

    /// The prefix revealed so far
    pub fn revealed(&self) -> String {
        self.revealed.borrow().clone()
    }

    /// Whether a reveal is still scheduled
    pub fn is_typing(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start revealing `text` from the beginning.
    ///
    /// Setting the text that is already shown is a no-op. Must be called from
    /// within a tokio runtime.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.source.as_deref() == Some(text.as_str()) {
            return;
        }

        self.cancel();
        self.revealed.send_replace(String::new());
        self.source = Some(text.clone());
        if text.is_empty() {
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        self.task = Some(tokio::spawn(reveal(
            text,
            self.interval,
            generation,
            self.generation.clone(),
            self.revealed.clone(),
        )));
    }

    /// Stop the running reveal, keeping whatever prefix is already shown.
    /// Calling this when nothing is running is harmless.
    pub fn cancel(&mut self) {
        // A task already past its tick re-checks the generation under the
        // watch lock, so bumping it here is what stops such a task
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn reveal(
    text: String,
    interval: Duration,
    generation: u64,
    current: Arc<AtomicU64>,
    revealed: Arc<watch::Sender<String>>,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);

    for (index, ch) in text.char_indices() {
        ticker.tick().await;
        let published = revealed.send_if_modified(|shown| {
            // Checked while holding the lock that `set_text`'s reset also takes
            if current.load(Ordering::SeqCst) != generation {
                return false;
            }
            *shown = text[..index + ch.len_utf8()].to_string();
            true
        });
        if !published {
            return;
        }
    }

    debug!("Finished revealing {} characters", text.chars().count());
}
