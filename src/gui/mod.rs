mod renderer;

pub use renderer::{DisplayedWidget, EguiRenderer};

use crate::shell::{
    Displayable, LayoutMode, ModuleId, NavigationTree, Region, Shell, WidgetKey,
};
use eframe::egui;

pub struct ShellApp {
    shell: Shell<EguiRenderer>,
    selected: Option<ModuleId>,
    tab: usize,
    error: Option<String>,
}

impl ShellApp {
    pub fn new(shell: Shell<EguiRenderer>) -> Self {
        Self {
            shell,
            selected: None,
            tab: 0,
            error: None,
        }
    }

    pub fn shell(&self) -> &Shell<EguiRenderer> {
        &self.shell
    }

    fn set_error(&mut self, msg: String) {
        tracing::warn!("{msg}");
        self.error = Some(msg);
    }

    fn toggle(&mut self, id: &ModuleId, enabled: bool) {
        if let Err(e) = self.shell.toggle_module(id.as_str(), enabled) {
            self.set_error(format!("Failed to toggle {id}: {e}"));
        }
    }

    fn modules_menu(&mut self, ui: &mut egui::Ui) {
        let modules: Vec<(ModuleId, String, bool)> = self
            .shell
            .registry()
            .iter()
            .map(|m| (m.id().clone(), m.display_name().to_string(), m.is_enabled()))
            .collect();
        for (id, name, mut enabled) in modules {
            if ui.checkbox(&mut enabled, name).changed() {
                self.toggle(&id, enabled);
            }
        }
    }

    fn selection(&self, tree: &NavigationTree) -> Option<ModuleId> {
        match &self.selected {
            Some(id) if tree.contains(id.as_str()) => Some(id.clone()),
            _ => tree.default_selection.clone(),
        }
    }

    fn draw_module(&self, ui: &mut egui::Ui, id: &ModuleId) {
        let Some(module) = self.shell.module(id.as_str()) else {
            return;
        };
        ui.group(|ui| {
            ui.heading(module.display_name());
            for widget in module.widgets() {
                let key = WidgetKey::new(id.clone(), widget.id().clone());
                let Some(shown) = self.shell.renderer().widget(&key) else {
                    continue;
                };
                ui.label(egui::RichText::new(&shown.title).strong());
                for line in &shown.state.lines {
                    ui.label(line);
                }
                if let Some(fraction) = shown.state.gauge {
                    ui.add(egui::ProgressBar::new(fraction).show_percentage());
                }
                ui.add_space(4.0);
            }
        });
    }

    fn draw_sidebar(&mut self, ctx: &egui::Context, tree: &NavigationTree) {
        let current = self.selection(tree);
        egui::SidePanel::left("navigation").show(ctx, |ui| {
            for region in &tree.regions {
                ui.label(egui::RichText::new(region.region.as_str()).weak());
                for entry in &region.entries {
                    let selected = current.as_ref() == Some(&entry.module);
                    if ui.selectable_label(selected, &entry.label).clicked() {
                        self.selected = Some(entry.module.clone());
                    }
                }
                ui.separator();
            }
        });
        egui::CentralPanel::default().show(ctx, |ui| match &current {
            Some(id) => self.draw_module(ui, id),
            None => {
                ui.label("No modules enabled. Use the Modules menu to enable one.");
            }
        });
    }

    fn draw_tabs(&mut self, ctx: &egui::Context, tree: &NavigationTree) {
        if self.tab >= tree.tabs.len() {
            self.tab = 0;
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            if tree.tabs.is_empty() {
                ui.label("No modules enabled. Use the Modules menu to enable one.");
                return;
            }
            if tree.tabs.len() > 1 {
                ui.horizontal(|ui| {
                    for index in 0..tree.tabs.len() {
                        let label = format!("Page {}", index + 1);
                        if ui.selectable_label(self.tab == index, label).clicked() {
                            self.tab = index;
                        }
                    }
                });
                ui.separator();
            }
            let page = &tree.tabs[self.tab];
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(Region::ALL.len(), |columns| {
                    for (column, region) in columns.iter_mut().zip(Region::ALL) {
                        let Some(nav) = tree.region(region) else {
                            continue;
                        };
                        for entry in nav.entries.iter().filter(|e| page.contains(&e.module)) {
                            self.draw_module(column, &entry.module);
                        }
                    }
                });
            });
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let snapshot = self.shell.diagnostics().snapshot();
        ui.horizontal(|ui| {
            ui.label(format!(
                "{} of {} modules enabled",
                self.shell.enabled_modules().len(),
                self.shell.registry().len()
            ));
            ui.separator();
            ui.label(format!(
                "{} refreshes, {} failures",
                snapshot.total_refreshes, snapshot.total_failures
            ));
            if let Some(err) = &self.error {
                ui.separator();
                ui.colored_label(egui::Color32::RED, err);
            }
        });
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        use egui::*;

        let report = self.shell.tick();
        if let Some(failure) = report.failures.last() {
            self.error = Some(failure.to_string());
        }

        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(ViewportCommand::Close);
                    }
                });
                ui.menu_button("Modules", |ui| self.modules_menu(ui));
            });
        });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.status_bar(ui));

        let tree = self.shell.renderer().navigation().clone();
        match tree.layout {
            LayoutMode::Sidebar => self.draw_sidebar(ctx, &tree),
            LayoutMode::Tabs => self.draw_tabs(ctx, &tree),
        }

        ctx.request_repaint_after(self.shell.time_until_next_tick());
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shell.shutdown();
    }
}
