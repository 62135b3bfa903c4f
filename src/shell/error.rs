use crate::shell::module::ModuleId;
use crate::shell::widget::{WidgetId, WidgetKey};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

/// Errors reported by the module lifecycle engine.
///
/// None of these leave the registry or scheduler in a partial state: the
/// failing call is rejected before anything is mutated, and refresh failures
/// are recovered by keeping the widget's last good render state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("module '{0}' is already registered")]
    DuplicateModuleId(ModuleId),

    #[error("no module registered with id '{0}'")]
    UnknownModuleId(ModuleId),

    #[error("module '{0}' declares no widgets")]
    EmptyModule(ModuleId),

    #[error("module '{module}' declares widget '{widget}' more than once")]
    DuplicateWidgetId { module: ModuleId, widget: WidgetId },

    #[error("timed widget '{0}' needs a positive refresh interval")]
    InvalidRefreshInterval(WidgetId),

    #[error("widget '{key}' failed to refresh: {reason}")]
    WidgetRefreshFailure { key: WidgetKey, reason: String },

    #[error("the shell has been shut down")]
    ShutDown,
}

impl ShellError {
    pub(crate) fn refresh_failure(key: &WidgetKey, err: &anyhow::Error) -> Self {
        ShellError::WidgetRefreshFailure {
            key: key.clone(),
            reason: format!("{err:#}"),
        }
    }
}
