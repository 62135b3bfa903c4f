use crate::shell::module::Region;
use crate::shell::navigation::NavigationTree;
use crate::shell::widget::{RenderState, WidgetKey, WidgetKind};

/// Everything a renderer needs to draw one widget.
#[derive(Debug, Clone, Copy)]
pub struct WidgetFrame<'a> {
    pub key: &'a WidgetKey,
    pub title: &'a str,
    pub region: Region,
    pub kind: WidgetKind,
    pub state: &'a RenderState,
}

/// Boundary to the UI toolkit.
///
/// The shell only cares whether a call succeeded; failures are logged and
/// never roll back lifecycle state.
pub trait Renderer {
    fn render_widget(&mut self, frame: &WidgetFrame<'_>) -> anyhow::Result<()>;

    fn remove_widget(&mut self, key: &WidgetKey) -> anyhow::Result<()>;

    fn set_navigation(&mut self, tree: &NavigationTree) -> anyhow::Result<()>;
}

/// Renderer that draws nothing. Useful for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_widget(&mut self, _frame: &WidgetFrame<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn remove_widget(&mut self, _key: &WidgetKey) -> anyhow::Result<()> {
        Ok(())
    }

    fn set_navigation(&mut self, _tree: &NavigationTree) -> anyhow::Result<()> {
        Ok(())
    }
}
