use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Build the level filter. With debug logging disabled the level is forced
/// to `info` even when `RUST_LOG` is set.
pub fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    }
}

/// Initialise the global subscriber. Output goes to `log_file` when given,
/// otherwise to stdout. Calling this more than once is a no-op.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let filter = build_filter(debug);
    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "dash_shell.log".into());
            let appender = tracing_appender::rolling::never(dir, name);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(appender)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_filter_ignores_rust_log() {
        assert_eq!(build_filter(false).to_string(), "info");
    }
}
