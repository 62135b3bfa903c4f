use crate::shell::{
    NavigationTree, Region, RenderState, Renderer, WidgetFrame, WidgetKey, WidgetKind,
};
use std::collections::HashMap;

/// Owned copy of the last frame pushed for a widget.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayedWidget {
    pub title: String,
    pub region: Region,
    pub kind: WidgetKind,
    pub state: RenderState,
}

/// [`Renderer`] that keeps everything egui needs to draw the next frame.
#[derive(Debug)]
pub struct EguiRenderer {
    widgets: HashMap<WidgetKey, DisplayedWidget>,
    navigation: NavigationTree,
}

impl EguiRenderer {
    pub fn new() -> Self {
        Self {
            widgets: HashMap::new(),
            navigation: NavigationTree::empty(Default::default()),
        }
    }

    pub fn widget(&self, key: &WidgetKey) -> Option<&DisplayedWidget> {
        self.widgets.get(key)
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn navigation(&self) -> &NavigationTree {
        &self.navigation
    }
}

impl Default for EguiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for EguiRenderer {
    fn render_widget(&mut self, frame: &WidgetFrame<'_>) -> anyhow::Result<()> {
        self.widgets.insert(
            frame.key.clone(),
            DisplayedWidget {
                title: frame.title.to_string(),
                region: frame.region,
                kind: frame.kind,
                state: frame.state.clone(),
            },
        );
        Ok(())
    }

    fn remove_widget(&mut self, key: &WidgetKey) -> anyhow::Result<()> {
        self.widgets.remove(key);
        Ok(())
    }

    fn set_navigation(&mut self, tree: &NavigationTree) -> anyhow::Result<()> {
        self.navigation = tree.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_forgets_the_frame() {
        let mut renderer = EguiRenderer::new();
        let key = WidgetKey::new("session", "user");
        let state = RenderState::text("ada");
        renderer
            .render_widget(&WidgetFrame {
                key: &key,
                title: "User",
                region: Region::Left,
                kind: WidgetKind::Static,
                state: &state,
            })
            .unwrap();
        assert_eq!(renderer.widget(&key).map(|w| w.state.clone()), Some(state));
        renderer.remove_widget(&key).unwrap();
        assert_eq!(renderer.widget_count(), 0);
    }
}
