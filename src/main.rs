use dash_shell::gui::{EguiRenderer, ShellApp};
use dash_shell::logging;
use dash_shell::modules::default_modules;
use dash_shell::settings::Settings;
use dash_shell::shell::{Clock, Shell, ShellConfig, SystemClock};

use eframe::egui;
use std::sync::Arc;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging, settings.log_file_path());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut shell = Shell::init(
        EguiRenderer::new(),
        Arc::clone(&clock),
        ShellConfig::from(&settings),
    );
    for (module, enabled) in default_modules(&settings, clock.as_ref())? {
        shell.register_module(module, enabled)?;
    }
    shell.on_modules_changed(|event| {
        tracing::debug!(
            module = %event.module,
            change = ?event.change,
            enabled = event.enabled.len(),
            "modules changed"
        );
    });

    let (width, height) = settings.window_size.unwrap_or((960, 600));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dash Shell",
        native_options,
        Box::new(move |_cc| Box::new(ShellApp::new(shell))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the GUI: {e}"))?;
    Ok(())
}
