pub mod clock;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod module;
pub mod navigation;
pub mod registry;
pub mod renderer;
pub mod scheduler;
#[allow(clippy::module_inception)]
mod shell;
pub mod widget;

pub use clock::{Clock, ManualClock, SystemClock};
pub use diagnostics::{RefreshDiagnostics, RefreshDiagnosticsSnapshot, WidgetRefreshSnapshot};
pub use error::{Result, ShellError};
pub use events::{ListenerId, ModuleChange, ModulesChanged};
pub use module::{Displayable, Module, ModuleBuilder, ModuleId, ModuleState, Refreshable, Region};
pub use navigation::{LayoutMode, NavigationBuilder, NavigationTree};
pub use registry::{ModuleRegistry, Transition};
pub use renderer::{NullRenderer, Renderer, WidgetFrame};
pub use scheduler::RefreshScheduler;
pub use shell::{Shell, ShellConfig, TickReport};
pub use widget::{
    content_fn, RefreshContext, RenderState, Widget, WidgetContent, WidgetId, WidgetKey,
    WidgetKind,
};
