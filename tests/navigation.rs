use dash_shell::shell::{
    LayoutMode, ManualClock, Module, ModuleId, NullRenderer, Region, Shell, ShellConfig, Widget,
};
use std::sync::Arc;

fn module(id: &str, region: Region) -> Module {
    Module::builder(id, format!("Module {id}"), region)
        .widget(Widget::label("w", "W", ["x"]))
        .build()
        .unwrap()
}

fn shell(layout: LayoutMode, per_tab: usize) -> Shell<NullRenderer> {
    let config = ShellConfig {
        layout,
        modules_per_tab: per_tab,
        ..ShellConfig::default()
    };
    Shell::init(NullRenderer, Arc::new(ManualClock::new()), config)
}

#[test]
fn tree_never_references_disabled_modules() {
    let mut shell = shell(LayoutMode::Tabs, 2);
    for (id, region) in [
        ("a", Region::Left),
        ("b", Region::Middle),
        ("c", Region::Right),
        ("d", Region::Left),
    ] {
        shell.register_module(module(id, region), true).unwrap();
    }
    shell.toggle_module("b", false).unwrap();
    let tree = shell.navigation();
    assert!(!tree.contains("b"));
    assert!(tree.region(Region::Middle).is_none());
    assert_eq!(
        tree.tabs,
        vec![
            vec![ModuleId::new("a"), ModuleId::new("c")],
            vec![ModuleId::new("d")],
        ]
    );
}

#[test]
fn default_selection_follows_first_enabled_module() {
    let mut shell = shell(LayoutMode::Sidebar, 6);
    shell.register_module(module("a", Region::Right), false).unwrap();
    shell.register_module(module("b", Region::Left), true).unwrap();
    assert_eq!(shell.navigation().default_selection, Some(ModuleId::new("b")));
    shell.toggle_module("a", true).unwrap();
    assert_eq!(shell.navigation().default_selection, Some(ModuleId::new("a")));
    assert!(shell.navigation().tabs.is_empty());
}

#[test]
fn layout_mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&LayoutMode::Sidebar).unwrap(), "\"sidebar\"");
    let parsed: LayoutMode = serde_json::from_str("\"tabs\"").unwrap();
    assert_eq!(parsed, LayoutMode::Tabs);
}
