//! Download progress reporting.

use indicatif::{ProgressBar, ProgressStyle};

/// Receives byte counts while an asset streams to disk.
pub trait ProgressSink {
    /// Called once before the first chunk with the declared length, if any.
    fn begin(&mut self, _total: Option<u64>) {}

    /// Called after every chunk with the running total written so far.
    fn advance(&mut self, written: u64);

    /// Called once on success.
    fn finish(&mut self) {}
}

/// Whole-number percentage; `None` when the length is unknown or zero.
pub fn percent(written: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let pct = (u128::from(written) * 100 / u128::from(total)).min(100);
    Some(pct as u8)
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressSink for Silent {
    fn advance(&mut self, _written: u64) {}
}

/// indicatif bar showing a percentage, or a byte spinner when the server
/// sent no content length.
#[derive(Default)]
pub struct TerminalProgress {
    bar: Option<ProgressBar>,
    total: Option<u64>,
    shown: Option<u8>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last percentage written to the bar; `None` without a known length.
    pub fn shown_percent(&self) -> Option<u8> {
        self.shown
    }
}

impl ProgressSink for TerminalProgress {
    fn begin(&mut self, total: Option<u64>) {
        self.total = total.filter(|t| *t > 0);
        self.shown = None;
        let bar = match self.total {
            Some(total) => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::with_template("[{bar:40}] {msg:>4} {bytes}/{total_bytes} ({eta})")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner} {bytes} downloaded")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb
            }
        };
        self.bar = Some(bar);
    }

    fn advance(&mut self, written: u64) {
        let Some(bar) = &self.bar else { return };
        bar.set_position(written);
        match self.total.and_then(|total| percent(written, total)) {
            Some(pct) => {
                if self.shown != Some(pct) {
                    bar.set_message(format!("{pct}%"));
                    self.shown = Some(pct);
                }
            }
            None => bar.tick(),
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        // failed downloads never reach finish(); keep the bar where it stopped
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}
