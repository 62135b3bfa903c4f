use crate::shell::error::{Result, ShellError};
use crate::shell::module::{Module, ModuleId, ModuleState};
use hashlink::LinkedHashMap;

/// Direction of a state-changing toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Enabled,
    Disabled,
}

/// Catalog of known modules in registration order.
///
/// The registry only tracks state. Acquiring and releasing widget resources
/// on a transition is the caller's job (see [`crate::shell::Shell`]).
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: LinkedHashMap<ModuleId, Module>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module in the `Disabled` state.
    pub fn register(&mut self, mut module: Module) -> Result<()> {
        if self.modules.contains_key(module.id().as_str()) {
            return Err(ShellError::DuplicateModuleId(module.id().clone()));
        }
        module.set_state(ModuleState::Disabled);
        self.modules.insert(module.id().clone(), module);
        Ok(())
    }

    /// Move a module to the requested state.
    ///
    /// Returns `None` when the module is already there, so callers can skip
    /// every side effect of a redundant toggle.
    pub fn toggle(&mut self, id: &str, enabled: bool) -> Result<Option<Transition>> {
        let module = self
            .modules
            .get_mut(id)
            .ok_or_else(|| ShellError::UnknownModuleId(ModuleId::new(id)))?;
        match (module.state(), enabled) {
            (ModuleState::TornDown, _) => Err(ShellError::ShutDown),
            (ModuleState::Enabled, true) | (ModuleState::Disabled, false) => Ok(None),
            (ModuleState::Disabled, true) => {
                module.set_state(ModuleState::Enabled);
                Ok(Some(Transition::Enabled))
            }
            (ModuleState::Enabled, false) => {
                module.set_state(ModuleState::Disabled);
                Ok(Some(Transition::Disabled))
            }
        }
    }

    /// Mark a module as torn down. Returns whether it was enabled.
    pub(crate) fn tear_down(&mut self, id: &str) -> bool {
        match self.modules.get_mut(id) {
            Some(module) => {
                let was_enabled = module.is_enabled();
                module.set_state(ModuleState::TornDown);
                was_enabled
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Module> {
        self.modules.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn ids(&self) -> Vec<ModuleId> {
        self.modules.keys().cloned().collect()
    }

    /// Enabled modules in registration order.
    pub fn enabled_modules(&self) -> Vec<&Module> {
        self.modules.values().filter(|m| m.is_enabled()).collect()
    }

    pub fn enabled_ids(&self) -> Vec<ModuleId> {
        self.modules
            .values()
            .filter(|m| m.is_enabled())
            .map(|m| m.id().clone())
            .collect()
    }
}
