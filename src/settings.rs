use crate::shell::navigation::{LayoutMode, DEFAULT_MODULES_PER_TAB};
use crate::shell::scheduler::{MAX_BASE_TICK, MIN_BASE_TICK};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write logs to this file instead of stdout.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Base scheduler tick in milliseconds, clamped to 50..=1000.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub layout: LayoutMode,
    #[serde(default = "default_modules_per_tab")]
    pub modules_per_tab: usize,
    /// Set of module ids which start enabled. If `None`, every module in the
    /// catalog starts enabled.
    #[serde(default)]
    pub enabled_modules: Option<HashSet<String>>,
    /// File followed by the log tail module. The module is only registered
    /// when this is set.
    #[serde(default)]
    pub log_tail_path: Option<String>,
    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: usize,
    /// Directory searched for git repositories. The git module is only
    /// registered when this is set.
    #[serde(default)]
    pub git_root: Option<String>,
    /// Overrides the user name shown by the session module.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Last known window size. If absent, a default size is used.
    #[serde(default = "default_window_size")]
    pub window_size: Option<(i32, i32)>,
}

fn default_tick_interval_ms() -> u64 {
    250
}

fn default_modules_per_tab() -> usize {
    DEFAULT_MODULES_PER_TAB
}

fn default_log_tail_lines() -> usize {
    200
}

fn default_window_size() -> Option<(i32, i32)> {
    Some((960, 600))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            tick_interval_ms: default_tick_interval_ms(),
            layout: LayoutMode::default(),
            modules_per_tab: default_modules_per_tab(),
            enabled_modules: None,
            log_tail_path: None,
            log_tail_lines: default_log_tail_lines(),
            git_root: None,
            user_name: None,
            window_size: default_window_size(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms).clamp(MIN_BASE_TICK, MAX_BASE_TICK)
    }

    /// Startup flag for `id`.
    pub fn is_module_enabled(&self, id: &str) -> bool {
        match &self.enabled_modules {
            Some(set) => set.contains(id),
            None => true,
        }
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.as_ref().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_interval_is_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.tick_interval(), Duration::from_millis(250));
        settings.tick_interval_ms = 1;
        assert_eq!(settings.tick_interval(), MIN_BASE_TICK);
        settings.tick_interval_ms = 60_000;
        assert_eq!(settings.tick_interval(), MAX_BASE_TICK);
    }

    #[test]
    fn missing_enabled_set_enables_everything() {
        let mut settings = Settings::default();
        assert!(settings.is_module_enabled("session"));
        settings.enabled_modules = Some(HashSet::from(["system_status".to_string()]));
        assert!(!settings.is_module_enabled("session"));
        assert!(settings.is_module_enabled("system_status"));
    }
}
