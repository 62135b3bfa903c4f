//! Built-in module catalog.

pub mod git_repos;
pub mod log_tail;
pub mod session;
pub mod system_status;

use crate::settings::Settings;
use crate::shell::{Clock, Module, Result};

/// Modules the application registers at startup, in registration order,
/// each paired with its initial enabled flag from `settings`.
pub fn default_modules(settings: &Settings, clock: &dyn Clock) -> Result<Vec<(Module, bool)>> {
    let system_user = session::system_user();
    let login = system_user
        .as_deref()
        .and_then(session::system_login_time)
        .unwrap_or_else(|| clock.wall());
    let user = settings
        .user_name
        .clone()
        .or(system_user)
        .unwrap_or_else(|| "unknown".into());
    let mut modules = vec![
        session::module(user, login)?,
        system_status::module()?,
    ];
    if let Some(path) = &settings.log_tail_path {
        modules.push(log_tail::module(path, settings.log_tail_lines)?);
    }
    if let Some(root) = &settings.git_root {
        modules.push(git_repos::module(root)?);
    }
    Ok(modules
        .into_iter()
        .map(|m| {
            let enabled = settings.is_module_enabled(m.id().as_str());
            (m, enabled)
        })
        .collect())
}
