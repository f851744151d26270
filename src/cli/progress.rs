//! Terminal spinner for use-case progress.

use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ops::ProgressReporter;

/// One spinner per `start`; `stop` replaces it with the final message.
/// Disabled spinners swallow every event.
pub struct SpinnerProgress {
    enabled: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "•"])
    }
}

impl ProgressReporter for SpinnerProgress {
    fn start(&self, message: &str) {
        if !self.enabled {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut current) = self.current.lock()
            && let Some(previous) = current.replace(bar)
        {
            previous.finish_and_clear();
        }
    }

    fn stop(&self, message: &str) {
        if !self.enabled {
            return;
        }
        let bar = self.current.lock().ok().and_then(|mut current| current.take());
        match bar {
            Some(bar) => bar.finish_with_message(message.to_string()),
            None => eprintln!("{} {message}", style("•").cyan()),
        }
    }
}
