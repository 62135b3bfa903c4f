use crate::shell::error::{Result, ShellError};
use crate::shell::renderer::{Renderer, WidgetFrame};
use crate::shell::widget::{RefreshContext, Widget, WidgetKey};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Module identifier, unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Screen region a module occupies. The declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Left,
    Middle,
    Right,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Left, Region::Middle, Region::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Left => "left",
            Region::Middle => "middle",
            Region::Right => "right",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Disabled,
    Enabled,
    /// Terminal state reached on shutdown.
    TornDown,
}

/// Result of rendering a single widget.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub key: WidgetKey,
    pub elapsed: Duration,
    pub result: Result<()>,
}

/// Something that owns a screen region and can draw all of its widgets.
pub trait Displayable {
    fn region(&self) -> Region;

    fn display_name(&self) -> &str;

    fn render_all(
        &mut self,
        ctx: &RefreshContext,
        renderer: &mut dyn Renderer,
    ) -> Vec<RenderOutcome>;

    /// Remove every rendered widget and drop its render state.
    fn release_all(&mut self, renderer: &mut dyn Renderer) -> usize;
}

/// Something that owns timed widgets the scheduler has to drive.
pub trait Refreshable {
    fn schedule_requests(&self) -> Vec<(WidgetKey, Duration)>;
}

#[derive(Debug)]
pub struct Module {
    id: ModuleId,
    display_name: String,
    region: Region,
    widgets: Vec<Widget>,
    state: ModuleState,
}

impl Module {
    pub fn builder(
        id: impl Into<ModuleId>,
        display_name: impl Into<String>,
        region: Region,
    ) -> ModuleBuilder {
        ModuleBuilder {
            id: id.into(),
            display_name: display_name.into(),
            region,
            widgets: Vec::new(),
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == ModuleState::Enabled
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id().as_str() == id)
    }

    pub(crate) fn set_state(&mut self, state: ModuleState) {
        self.state = state;
    }

    fn key_for(&self, widget: &Widget) -> WidgetKey {
        WidgetKey {
            module: self.id.clone(),
            widget: widget.id().clone(),
        }
    }

    fn render_at(
        &mut self,
        index: usize,
        ctx: &RefreshContext,
        renderer: &mut dyn Renderer,
    ) -> RenderOutcome {
        let key = self.key_for(&self.widgets[index]);
        let region = self.region;
        let widget = &mut self.widgets[index];
        let started = Instant::now();
        let result = match widget.render(ctx) {
            Ok(()) => {
                if let Some(state) = widget.render_state() {
                    let frame = WidgetFrame {
                        key: &key,
                        title: widget.title(),
                        region,
                        kind: widget.kind(),
                        state,
                    };
                    if let Err(e) = renderer.render_widget(&frame) {
                        tracing::warn!(widget = %key, error = %e, "renderer rejected widget");
                    }
                }
                Ok(())
            }
            Err(e) => Err(ShellError::refresh_failure(&key, &e)),
        };
        RenderOutcome {
            key,
            elapsed: started.elapsed(),
            result,
        }
    }

    /// Re-render one widget. `None` when the module has no such widget.
    pub(crate) fn refresh_widget(
        &mut self,
        widget: &str,
        ctx: &RefreshContext,
        renderer: &mut dyn Renderer,
    ) -> Option<RenderOutcome> {
        let index = self.widgets.iter().position(|w| w.id().as_str() == widget)?;
        Some(self.render_at(index, ctx, renderer))
    }
}

impl Displayable for Module {
    fn region(&self) -> Region {
        self.region
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn render_all(
        &mut self,
        ctx: &RefreshContext,
        renderer: &mut dyn Renderer,
    ) -> Vec<RenderOutcome> {
        (0..self.widgets.len())
            .map(|index| self.render_at(index, ctx, renderer))
            .collect()
    }

    fn release_all(&mut self, renderer: &mut dyn Renderer) -> usize {
        let mut released = 0;
        for index in 0..self.widgets.len() {
            let key = self.key_for(&self.widgets[index]);
            if self.widgets[index].release() {
                released += 1;
                if let Err(e) = renderer.remove_widget(&key) {
                    tracing::warn!(widget = %key, error = %e, "renderer failed to remove widget");
                }
            }
        }
        released
    }
}

impl Refreshable for Module {
    fn schedule_requests(&self) -> Vec<(WidgetKey, Duration)> {
        self.widgets
            .iter()
            .filter_map(|w| w.kind().interval().map(|i| (self.key_for(w), i)))
            .collect()
    }
}

pub struct ModuleBuilder {
    id: ModuleId,
    display_name: String,
    region: Region,
    widgets: Vec<Widget>,
}

impl ModuleBuilder {
    pub fn widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn widgets(mut self, widgets: impl IntoIterator<Item = Widget>) -> Self {
        self.widgets.extend(widgets);
        self
    }

    pub fn build(self) -> Result<Module> {
        if self.widgets.is_empty() {
            return Err(ShellError::EmptyModule(self.id));
        }
        let mut seen = HashSet::new();
        for widget in &self.widgets {
            if !seen.insert(widget.id().as_str()) {
                return Err(ShellError::DuplicateWidgetId {
                    module: self.id.clone(),
                    widget: widget.id().clone(),
                });
            }
        }
        Ok(Module {
            id: self.id,
            display_name: self.display_name,
            region: self.region,
            widgets: self.widgets,
            state: ModuleState::Disabled,
        })
    }
}
