pub mod gui;
pub mod logging;
pub mod modules;
pub mod settings;
pub mod shell;
