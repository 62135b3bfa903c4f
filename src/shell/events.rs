use crate::shell::module::ModuleId;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleChange {
    Enabled,
    Disabled,
    /// Released during shutdown.
    TornDown,
}

/// Emitted once per state-changing toggle, after resources and navigation
/// have been updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulesChanged {
    pub module: ModuleId,
    pub change: ModuleChange,
    /// Enabled modules after the change, in registration order.
    pub enabled: Vec<ModuleId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type ModulesChangedListener = Arc<dyn Fn(&ModulesChanged) + Send + Sync>;

/// Host callbacks, notified in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    callbacks: Vec<(ListenerId, ModulesChangedListener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: ModulesChangedListener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.callbacks.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        before != self.callbacks.len()
    }

    pub(crate) fn emit(&self, event: &ModulesChanged) {
        for (_, callback) in &self.callbacks {
            (callback)(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}
