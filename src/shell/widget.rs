use crate::shell::error::{Result, ShellError};
use crate::shell::module::ModuleId;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::time::{Duration, Instant};

/// Widget identifier, unique within its module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for WidgetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Globally unique address of a widget: owning module plus widget id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WidgetKey {
    pub module: ModuleId,
    pub widget: WidgetId,
}

impl WidgetKey {
    pub fn new(module: impl Into<ModuleId>, widget: impl Into<WidgetId>) -> Self {
        Self {
            module: module.into(),
            widget: widget.into(),
        }
    }
}

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.widget)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    /// Rendered once when its module is enabled.
    Static,
    /// Re-rendered every `interval` while its module stays enabled.
    Timed { interval: Duration },
}

impl WidgetKind {
    pub fn interval(&self) -> Option<Duration> {
        match self {
            WidgetKind::Static => None,
            WidgetKind::Timed { interval } => Some(*interval),
        }
    }
}

/// What a widget currently displays.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderState {
    pub lines: Vec<String>,
    /// Fill fraction in `0.0..=1.0` for widgets drawn with a progress bar.
    pub gauge: Option<f32>,
}

impl RenderState {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            gauge: None,
        }
    }

    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            gauge: None,
        }
    }

    pub fn with_gauge(mut self, fraction: f32) -> Self {
        self.gauge = Some(if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        });
        self
    }
}

/// Time snapshot handed to widget content on every render.
#[derive(Clone, Copy, Debug)]
pub struct RefreshContext {
    pub now: Instant,
    pub wall: DateTime<Local>,
}

/// Produces a widget's render state.
///
/// Returning an error keeps the previously displayed state; the scheduler
/// keeps calling the widget on later ticks.
pub trait WidgetContent: Send {
    fn render(&mut self, ctx: &RefreshContext) -> anyhow::Result<RenderState>;

    /// Drop cached resources when the owning module is disabled.
    fn release(&mut self) {}
}

/// Widget content backed by a closure. See [`content_fn`].
pub struct ContentFn<F>(F);

pub fn content_fn<F>(f: F) -> ContentFn<F>
where
    F: FnMut(&RefreshContext) -> anyhow::Result<RenderState> + Send,
{
    ContentFn(f)
}

impl<F> WidgetContent for ContentFn<F>
where
    F: FnMut(&RefreshContext) -> anyhow::Result<RenderState> + Send,
{
    fn render(&mut self, ctx: &RefreshContext) -> anyhow::Result<RenderState> {
        (self.0)(ctx)
    }
}

pub struct Widget {
    id: WidgetId,
    title: String,
    kind: WidgetKind,
    content: Box<dyn WidgetContent>,
    render_state: Option<RenderState>,
    refreshes: u64,
}

impl Widget {
    pub fn new_static(
        id: impl Into<WidgetId>,
        title: impl Into<String>,
        content: impl WidgetContent + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: WidgetKind::Static,
            content: Box::new(content),
            render_state: None,
            refreshes: 0,
        }
    }

    /// Static widget that always shows the same lines.
    pub fn label<I, S>(id: impl Into<WidgetId>, title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = RenderState::lines(lines);
        Self::new_static(id, title, content_fn(move |_| Ok(state.clone())))
    }

    pub fn new_timed(
        id: impl Into<WidgetId>,
        title: impl Into<String>,
        interval: Duration,
        content: impl WidgetContent + 'static,
    ) -> Result<Self> {
        let id = id.into();
        if interval.is_zero() {
            return Err(ShellError::InvalidRefreshInterval(id));
        }
        Ok(Self {
            id,
            title: title.into(),
            kind: WidgetKind::Timed { interval },
            content: Box::new(content),
            render_state: None,
            refreshes: 0,
        })
    }

    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn is_timed(&self) -> bool {
        matches!(self.kind, WidgetKind::Timed { .. })
    }

    pub fn render_state(&self) -> Option<&RenderState> {
        self.render_state.as_ref()
    }

    /// Number of successful renders since the widget was created.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    pub(crate) fn render(&mut self, ctx: &RefreshContext) -> anyhow::Result<()> {
        let state = self.content.render(ctx)?;
        self.refreshes += 1;
        self.render_state = Some(state);
        Ok(())
    }

    /// Returns whether the widget held render state before the release.
    pub(crate) fn release(&mut self) -> bool {
        self.content.release();
        self.render_state.take().is_some()
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("render_state", &self.render_state)
            .field("refreshes", &self.refreshes)
            .finish_non_exhaustive()
    }
}
