//! Compile progress reporting.

use crate::passes::PassStats;

/// Trait for receiving compile progress updates.
pub trait CompileProgress {
    /// Called when a phase starts (e.g., "Materializing units").
    fn on_phase(&self, message: &str);

    /// Called after each pass finishes.
    fn on_pass(&self, stats: &PassStats);

    /// Called when the run is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl CompileProgress for SilentProgress {
    fn on_phase(&self, _message: &str) {}
    fn on_pass(&self, _stats: &PassStats) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl CompileProgress for LogProgress {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_pass(&self, stats: &PassStats) {
        stats.log_summary();
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
