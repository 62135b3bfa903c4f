use crate::shell::module::ModuleId;
use crate::shell::widget::WidgetKey;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const SLOW_REFRESH_THRESHOLD: Duration = Duration::from_millis(75);

#[derive(Clone, Debug, PartialEq)]
pub struct WidgetRefreshSnapshot {
    pub key: WidgetKey,
    pub refreshes: u64,
    pub failures: u64,
    pub last_refresh_at: Option<Instant>,
    pub last_duration: Duration,
    pub last_error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefreshDiagnosticsSnapshot {
    pub widgets: Vec<WidgetRefreshSnapshot>,
    pub total_refreshes: u64,
    pub total_failures: u64,
}

#[derive(Default)]
struct WidgetRefreshState {
    refreshes: u64,
    failures: u64,
    last_refresh_at: Option<Instant>,
    last_duration: Duration,
    last_error: Option<String>,
}

/// Per-widget refresh statistics.
pub struct RefreshDiagnostics {
    widgets: HashMap<WidgetKey, WidgetRefreshState>,
    warning_threshold: Duration,
}

impl RefreshDiagnostics {
    pub fn new() -> Self {
        Self::with_threshold(SLOW_REFRESH_THRESHOLD)
    }

    pub fn with_threshold(warning_threshold: Duration) -> Self {
        Self {
            widgets: HashMap::new(),
            warning_threshold,
        }
    }

    pub fn warning_threshold(&self) -> Duration {
        self.warning_threshold
    }

    pub fn record_success(&mut self, key: &WidgetKey, duration: Duration, at: Instant) {
        if duration >= self.warning_threshold {
            tracing::warn!(
                widget = %key,
                elapsed_ms = duration.as_millis() as u64,
                "slow widget refresh"
            );
        }
        let state = self.widgets.entry(key.clone()).or_default();
        state.refreshes += 1;
        state.last_refresh_at = Some(at);
        state.last_duration = duration;
        state.last_error = None;
    }

    pub fn record_failure(&mut self, key: &WidgetKey, error: String, duration: Duration) {
        let state = self.widgets.entry(key.clone()).or_default();
        state.failures += 1;
        state.last_duration = duration;
        state.last_error = Some(error);
    }

    /// Forget statistics for every widget of `module`.
    pub fn forget_module(&mut self, module: &ModuleId) {
        self.widgets.retain(|key, _| &key.module != module);
    }

    pub fn failures(&self, key: &WidgetKey) -> u64 {
        self.widgets.get(key).map(|s| s.failures).unwrap_or(0)
    }

    pub fn snapshot(&self) -> RefreshDiagnosticsSnapshot {
        let mut widgets: Vec<WidgetRefreshSnapshot> = self
            .widgets
            .iter()
            .map(|(key, state)| WidgetRefreshSnapshot {
                key: key.clone(),
                refreshes: state.refreshes,
                failures: state.failures,
                last_refresh_at: state.last_refresh_at,
                last_duration: state.last_duration,
                last_error: state.last_error.clone(),
            })
            .collect();
        widgets.sort_by(|a, b| a.key.cmp(&b.key));
        RefreshDiagnosticsSnapshot {
            total_refreshes: widgets.iter().map(|w| w.refreshes).sum(),
            total_failures: widgets.iter().map(|w| w.failures).sum(),
            widgets,
        }
    }
}

impl Default for RefreshDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}
