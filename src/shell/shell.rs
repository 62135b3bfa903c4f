use crate::settings::Settings;
use crate::shell::clock::Clock;
use crate::shell::diagnostics::RefreshDiagnostics;
use crate::shell::error::{Result, ShellError};
use crate::shell::events::{ListenerId, Listeners, ModuleChange, ModulesChanged};
use crate::shell::module::{Displayable, Module, ModuleId, RenderOutcome, Refreshable};
use crate::shell::navigation::{
    LayoutMode, NavigationBuilder, NavigationTree, DEFAULT_MODULES_PER_TAB,
};
use crate::shell::registry::{ModuleRegistry, Transition};
use crate::shell::renderer::Renderer;
use crate::shell::scheduler::{RefreshScheduler, DEFAULT_BASE_TICK};
use crate::shell::widget::{RefreshContext, WidgetKey};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    pub tick_interval: Duration,
    pub layout: LayoutMode,
    pub modules_per_tab: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_BASE_TICK,
            layout: LayoutMode::default(),
            modules_per_tab: DEFAULT_MODULES_PER_TAB,
        }
    }
}

impl From<&Settings> for ShellConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            tick_interval: settings.tick_interval(),
            layout: settings.layout,
            modules_per_tab: settings.modules_per_tab,
        }
    }
}

/// Outcome of a single scheduler tick.
#[derive(Debug, Default, Clone)]
pub struct TickReport {
    pub refreshed: Vec<WidgetKey>,
    pub failures: Vec<ShellError>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.refreshed.is_empty() && self.failures.is_empty()
    }
}

/// Owning context for the module lifecycle.
///
/// Every mutation goes through `&mut self`, so registry, scheduler and
/// navigation are always observed in a consistent state. A `ModulesChanged`
/// is processed in a fixed order: widget resources and schedule entries
/// first, then the navigation rebuild, then host listeners.
pub struct Shell<R: Renderer> {
    registry: ModuleRegistry,
    scheduler: RefreshScheduler,
    navigation: NavigationBuilder,
    tree: NavigationTree,
    renderer: R,
    clock: Arc<dyn Clock>,
    listeners: Listeners,
    diagnostics: RefreshDiagnostics,
    rebuilds: u64,
    running: bool,
}

impl<R: Renderer> Shell<R> {
    pub fn init(mut renderer: R, clock: Arc<dyn Clock>, config: ShellConfig) -> Self {
        let navigation = NavigationBuilder::new(config.layout, config.modules_per_tab);
        let tree = NavigationTree::empty(config.layout);
        if let Err(e) = renderer.set_navigation(&tree) {
            tracing::warn!(error = %e, "renderer rejected initial navigation");
        }
        tracing::info!(
            tick_ms = config.tick_interval.as_millis() as u64,
            layout = ?config.layout,
            "shell initialised"
        );
        Self {
            registry: ModuleRegistry::new(),
            scheduler: RefreshScheduler::new(config.tick_interval),
            navigation,
            tree,
            renderer,
            clock,
            listeners: Listeners::default(),
            diagnostics: RefreshDiagnostics::new(),
            rebuilds: 0,
            running: true,
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.running {
            Ok(())
        } else {
            Err(ShellError::ShutDown)
        }
    }

    fn refresh_context(&self) -> RefreshContext {
        RefreshContext {
            now: self.clock.now(),
            wall: self.clock.wall(),
        }
    }

    pub fn register_module(&mut self, module: Module, initially_enabled: bool) -> Result<()> {
        self.ensure_running()?;
        let id = module.id().clone();
        self.registry.register(module)?;
        tracing::info!(module = %id, initially_enabled, "module registered");
        if initially_enabled {
            self.toggle_module(id.as_str(), true)?;
        }
        Ok(())
    }

    /// Enable or disable a module. Redundant toggles succeed without side
    /// effects. All resource changes are complete when this returns.
    pub fn toggle_module(&mut self, id: &str, enabled: bool) -> Result<()> {
        self.ensure_running()?;
        let Some(transition) = self.registry.toggle(id, enabled)? else {
            tracing::debug!(module = id, enabled, "toggle is a no-op");
            return Ok(());
        };
        let module = ModuleId::new(id);
        let change = match transition {
            Transition::Enabled => {
                self.acquire(&module);
                ModuleChange::Enabled
            }
            Transition::Disabled => {
                self.release(&module);
                ModuleChange::Disabled
            }
        };
        tracing::info!(module = %module, ?change, "module toggled");
        self.publish(module, change);
        Ok(())
    }

    pub fn on_modules_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&ModulesChanged) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn acquire(&mut self, id: &ModuleId) {
        let ctx = self.refresh_context();
        let Some(module) = self.registry.get_mut(id.as_str()) else {
            return;
        };
        let outcomes = module.render_all(&ctx, &mut self.renderer);
        let requests = module.schedule_requests();
        for outcome in outcomes {
            record_outcome(&mut self.diagnostics, &outcome, &ctx);
        }
        self.scheduler.subscribe_all(requests, ctx.now);
    }

    fn release(&mut self, id: &ModuleId) {
        let dropped = self.scheduler.unsubscribe_module(id);
        self.diagnostics.forget_module(id);
        let released = match self.registry.get_mut(id.as_str()) {
            Some(module) => module.release_all(&mut self.renderer),
            None => 0,
        };
        tracing::debug!(module = %id, dropped, released, "module resources released");
    }

    fn publish(&mut self, module: ModuleId, change: ModuleChange) {
        let tree = self.navigation.rebuild(self.registry.enabled_modules());
        self.rebuilds += 1;
        if let Err(e) = self.renderer.set_navigation(&tree) {
            tracing::warn!(error = %e, "renderer rejected navigation");
        }
        self.tree = tree;
        let event = ModulesChanged {
            module,
            change,
            enabled: self.registry.enabled_ids(),
        };
        self.listeners.emit(&event);
    }

    /// Refresh every timed widget whose deadline has passed.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if !self.running {
            return report;
        }
        let ctx = self.refresh_context();
        for key in self.scheduler.take_due(ctx.now) {
            let outcome = match self.registry.get_mut(key.module.as_str()) {
                Some(module) if module.is_enabled() => {
                    module.refresh_widget(key.widget.as_str(), &ctx, &mut self.renderer)
                }
                _ => None,
            };
            let Some(outcome) = outcome else {
                tracing::warn!(widget = %key, "dropping schedule entry without a live widget");
                self.scheduler.unsubscribe_module(&key.module);
                continue;
            };
            record_outcome(&mut self.diagnostics, &outcome, &ctx);
            match outcome.result {
                Ok(()) => report.refreshed.push(outcome.key),
                Err(e) => report.failures.push(e),
            }
        }
        report
    }

    /// Tear down every module. Idempotent; also runs when the shell is dropped.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        for id in self.registry.enabled_ids() {
            self.registry.tear_down(id.as_str());
            self.release(&id);
            self.publish(id, ModuleChange::TornDown);
        }
        for id in self.registry.ids() {
            self.registry.tear_down(id.as_str());
        }
        let orphaned = self.scheduler.clear();
        if orphaned > 0 {
            tracing::warn!(orphaned, "schedule entries left after teardown");
        }
        self.running = false;
        tracing::info!(modules = self.registry.len(), "shell shut down");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.registry.get(id)
    }

    pub fn enabled_modules(&self) -> Vec<&Module> {
        self.registry.enabled_modules()
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn navigation(&self) -> &NavigationTree {
        &self.tree
    }

    /// Number of navigation rebuilds since init.
    pub fn navigation_rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn diagnostics(&self) -> &RefreshDiagnostics {
        &self.diagnostics
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Delay a host event loop can wait before calling [`Shell::tick`] again.
    pub fn time_until_next_tick(&self) -> Duration {
        self.scheduler.time_until_next(self.clock.now())
    }
}

fn record_outcome(diagnostics: &mut RefreshDiagnostics, outcome: &RenderOutcome, ctx: &RefreshContext) {
    match &outcome.result {
        Ok(()) => {
            tracing::debug!(widget = %outcome.key, "widget refreshed");
            diagnostics.record_success(&outcome.key, outcome.elapsed, ctx.now);
        }
        Err(e) => {
            tracing::warn!(widget = %outcome.key, error = %e, "widget refresh failed");
            diagnostics.record_failure(&outcome.key, e.to_string(), outcome.elapsed);
        }
    }
}

impl<R: Renderer> Drop for Shell<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
