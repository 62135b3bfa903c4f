use crate::shell::module::{Displayable, Module, ModuleId, Region};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODULES_PER_TAB: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// All modules on tabbed pages, a fixed number per page.
    #[default]
    Tabs,
    /// One sidebar button per module, one module shown at a time.
    Sidebar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub module: ModuleId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRegion {
    pub region: Region,
    pub entries: Vec<NavigationEntry>,
}

/// Immutable navigation snapshot derived from the enabled modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTree {
    pub layout: LayoutMode,
    /// Non-empty regions, left to right.
    pub regions: Vec<NavigationRegion>,
    /// Module pages for [`LayoutMode::Tabs`]; empty in sidebar mode.
    pub tabs: Vec<Vec<ModuleId>>,
    /// First enabled module in registration order.
    pub default_selection: Option<ModuleId>,
}

impl NavigationTree {
    pub fn empty(layout: LayoutMode) -> Self {
        Self {
            layout,
            regions: Vec::new(),
            tabs: Vec::new(),
            default_selection: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region(&self, region: Region) -> Option<&NavigationRegion> {
        self.regions.iter().find(|r| r.region == region)
    }

    pub fn entries(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.regions.iter().flat_map(|r| r.entries.iter())
    }

    pub fn contains(&self, module: &str) -> bool {
        self.entries().any(|e| e.module.as_str() == module)
    }

    pub fn len(&self) -> usize {
        self.regions.iter().map(|r| r.entries.len()).sum()
    }
}

/// Pure derivation of a [`NavigationTree`] from an ordered list of modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationBuilder {
    layout: LayoutMode,
    modules_per_tab: usize,
}

impl NavigationBuilder {
    pub fn new(layout: LayoutMode, modules_per_tab: usize) -> Self {
        Self {
            layout,
            modules_per_tab: modules_per_tab.max(1),
        }
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Build the tree for `enabled`, which must already be in registration
    /// order. The same input always yields an identical tree.
    pub fn rebuild<'a, I>(&self, enabled: I) -> NavigationTree
    where
        I: IntoIterator<Item = &'a Module>,
    {
        let modules: Vec<&Module> = enabled.into_iter().collect();

        let regions = Region::ALL
            .iter()
            .filter_map(|&region| {
                let entries: Vec<NavigationEntry> = modules
                    .iter()
                    .filter(|m| m.region() == region)
                    .map(|m| NavigationEntry {
                        module: m.id().clone(),
                        label: m.display_name().to_string(),
                    })
                    .collect();
                (!entries.is_empty()).then_some(NavigationRegion { region, entries })
            })
            .collect();

        let tabs = match self.layout {
            LayoutMode::Tabs => modules
                .chunks(self.modules_per_tab)
                .map(|page| page.iter().map(|m| m.id().clone()).collect())
                .collect(),
            LayoutMode::Sidebar => Vec::new(),
        };

        NavigationTree {
            layout: self.layout,
            regions,
            tabs,
            default_selection: modules.first().map(|m| m.id().clone()),
        }
    }
}

impl Default for NavigationBuilder {
    fn default() -> Self {
        Self::new(LayoutMode::default(), DEFAULT_MODULES_PER_TAB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::widget::Widget;

    fn module(id: &str, region: Region) -> Module {
        Module::builder(id, format!("Module {id}"), region)
            .widget(Widget::label("w", "W", ["x"]))
            .build()
            .unwrap()
    }

    #[test]
    fn empty_input_gives_empty_tree() {
        let tree = NavigationBuilder::default().rebuild(std::iter::empty());
        assert_eq!(tree, NavigationTree::empty(LayoutMode::Tabs));
    }

    #[test]
    fn groups_by_region_preserving_order() {
        let modules = [
            module("log", Region::Right),
            module("session", Region::Left),
            module("status", Region::Middle),
            module("notes", Region::Left),
        ];
        let tree = NavigationBuilder::new(LayoutMode::Sidebar, 6).rebuild(&modules);
        let layout: Vec<(Region, Vec<&str>)> = tree
            .regions
            .iter()
            .map(|r| {
                (
                    r.region,
                    r.entries.iter().map(|e| e.module.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            layout,
            vec![
                (Region::Left, vec!["session", "notes"]),
                (Region::Middle, vec!["status"]),
                (Region::Right, vec!["log"]),
            ]
        );
        assert_eq!(tree.default_selection, Some(ModuleId::new("log")));
        assert!(tree.tabs.is_empty());
    }

    #[test]
    fn tabs_chunk_modules_in_registration_order() {
        let modules: Vec<Module> = (0..7)
            .map(|i| module(&format!("m{i}"), Region::Left))
            .collect();
        let tree = NavigationBuilder::new(LayoutMode::Tabs, 3).rebuild(&modules);
        let sizes: Vec<usize> = tree.tabs.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(tree.tabs[2][0], ModuleId::new("m6"));
    }

    #[test]
    fn rebuild_is_deterministic() {
        let modules = [module("a", Region::Right), module("b", Region::Left)];
        let builder = NavigationBuilder::default();
        let first = serde_json::to_vec(&builder.rebuild(&modules)).unwrap();
        let second = serde_json::to_vec(&builder.rebuild(&modules)).unwrap();
        assert_eq!(first, second);
    }
}
