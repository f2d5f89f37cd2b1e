//! Optional page timing log.

#[cfg(test)]
#[path = "perf_test.rs"]
mod perf_test;

use serde::Serialize;

/// Milliseconds since navigation start, from `performance.now()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadTiming {
    /// When the enhancer saw the DOM become ready.
    pub ready_ms: f64,
    /// When the shell saw the window `load`; construction time if the page
    /// had already loaded.
    pub load_ms: f64,
}

/// Log `timing` at `info` when enabled. Returns whether anything was logged.
pub fn log_timing(enabled: bool, timing: &LoadTiming) -> bool {
    if !enabled {
        return false;
    }
    match serde_json::to_string(timing) {
        Ok(payload) => {
            log::info!("page timing {payload}");
            true
        }
        Err(err) => {
            log::warn!("page timing not serializable: {err}");
            false
        }
    }
}

/// Collects the ready and load marks in either order and logs one record
/// once both are known.
#[derive(Debug, Default)]
pub struct TimingRecorder {
    enabled: bool,
    ready_ms: Option<f64>,
    load_ms: Option<f64>,
    logged: bool,
}

impl TimingRecorder {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled, ..Self::default() }
    }

    /// Record DOM readiness. The first mark wins. Returns whether this logged.
    pub fn mark_ready(&mut self, now_ms: f64) -> bool {
        self.ready_ms.get_or_insert(now_ms);
        self.flush()
    }

    /// Record window load. The first mark wins. Returns whether this logged.
    pub fn mark_loaded(&mut self, now_ms: f64) -> bool {
        self.load_ms.get_or_insert(now_ms);
        self.flush()
    }

    fn flush(&mut self) -> bool {
        if self.logged {
            return false;
        }
        let (Some(ready_ms), Some(load_ms)) = (self.ready_ms, self.load_ms) else {
            return false;
        };
        self.logged = log_timing(self.enabled, &LoadTiming { ready_ms, load_ms });
        self.logged
    }
}
