//! Quiet-period gate for interactive search input.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::geo::resolver::is_searchable;
use crate::refresh::task::TaskSlot;

/// What happened to a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// A search will fire once input has been quiet for the delay.
    Scheduled,
    /// Input too short; any pending search was dropped and suggestions should clear.
    Cleared,
}

/// Fires the trimmed input on `fired` after `delay` without further input.
pub struct Debouncer {
    delay: Duration,
    slot: TaskSlot,
    fired: UnboundedSender<String>,
}

impl Debouncer {
    pub fn new(delay: Duration, fired: UnboundedSender<String>) -> Self {
        Self {
            delay,
            slot: TaskSlot::new(),
            fired,
        }
    }

    pub fn input(&mut self, text: &str) -> InputOutcome {
        let text = text.trim();
        if !is_searchable(text) {
            self.slot.cancel();
            return InputOutcome::Cleared;
        }

        let delay = self.delay;
        let fired = self.fired.clone();
        let text = text.to_string();
        self.slot.replace(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = fired.send(text);
        }));
        InputOutcome::Scheduled
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_active()
    }

    pub fn cancel(&mut self) {
        self.slot.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_quiet_period() {
        let (tx, mut rx) = unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        assert_eq!(debouncer.input("lo"), InputOutcome::Scheduled);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(debouncer.input("lon "), InputOutcome::Scheduled);
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().unwrap(), "lon");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_cancels_pending_search() {
        let (tx, mut rx) = unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.input("ca");
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.input(" c "), InputOutcome::Cleared);
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
