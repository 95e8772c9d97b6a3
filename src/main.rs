// Hides the console window on Windows in release builds.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use gpui::{App, Application};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod interval;
mod login_item;
mod notifications;
mod reminder;
mod state;
mod theme;
mod timer;
mod tray;
mod ui;

use config::{Config, ExecutionMode};
use login_item::{DetachedLoginItems, LoginItems, SystemLoginItems, HIDDEN_ARG};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mode = ExecutionMode::detect();

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(event = "reminder.config.load_failed", error = %e, "using defaults");
            Config::default()
        }
    };

    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            tracing::warn!(
                event = "reminder.config.invalid",
                error = %e,
                "check ~/.config/rest-reminder/config.toml; using defaults"
            );
            Config::default()
        }
    };

    tracing::info!(
        event = "reminder.boot",
        ?mode,
        launched_at_login = std::env::args().any(|arg| arg == HIDDEN_ARG)
    );

    let login: Box<dyn LoginItems> = match SystemLoginItems::new(config.open_as_hidden) {
        Ok(items) => Box::new(items),
        Err(e) => {
            tracing::warn!(event = "reminder.login_item.unavailable", error = %e);
            Box::new(DetachedLoginItems)
        }
    };

    // No main window: the app lives in the tray until quit from its menu.
    Application::new().run(move |cx: &mut App| {
        if let Err(e) = app::launch(config, mode, login, cx) {
            tracing::error!(event = "reminder.launch_failed", error = %e);
            cx.quit();
        }
    });
}
