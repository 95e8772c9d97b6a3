//! System tray icon and menu.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder, TrayIconEvent};

use crate::interval::RestInterval;
use crate::state::Event;

const TOOLTIP: &str = "休息提醒";
const ICON_FILE: &str = "assets/icon.png";

/// Items of the tray menu, identified by a stable string id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    RestNow,
    IntervalLabel,
    EditInterval,
    ToggleAutoLaunch,
    Quit,
}

impl MenuAction {
    pub fn id(&self) -> &'static str {
        match self {
            MenuAction::RestNow => "rest-now",
            MenuAction::IntervalLabel => "interval-label",
            MenuAction::EditInterval => "edit-interval",
            MenuAction::ToggleAutoLaunch => "auto-launch",
            MenuAction::Quit => "quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "rest-now" => Some(MenuAction::RestNow),
            "interval-label" => Some(MenuAction::IntervalLabel),
            "edit-interval" => Some(MenuAction::EditInterval),
            "auto-launch" => Some(MenuAction::ToggleAutoLaunch),
            "quit" => Some(MenuAction::Quit),
            _ => None,
        }
    }

    /// The event a click on this item produces. The interval label is
    /// disabled and produces nothing.
    pub fn event(&self) -> Option<Event> {
        match self {
            MenuAction::RestNow => Some(Event::ShowRestNow),
            MenuAction::IntervalLabel => None,
            MenuAction::EditInterval => Some(Event::EditInterval),
            MenuAction::ToggleAutoLaunch => Some(Event::ToggleAutoLaunch),
            MenuAction::Quit => Some(Event::Quit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        action: MenuAction,
        label: String,
        enabled: bool,
    },
    Check {
        action: MenuAction,
        label: String,
        checked: bool,
    },
    Separator,
}

/// Toolkit-independent description of the tray menu. Labels are computed
/// here, so the menu has to be rebuilt whenever its inputs change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuModel {
    interval_minutes: u64,
    auto_launch: bool,
}

impl MenuModel {
    pub fn new(interval: RestInterval, auto_launch: bool) -> Self {
        Self {
            interval_minutes: interval.display_minutes(),
            auto_launch,
        }
    }

    pub fn auto_launch(&self) -> bool {
        self.auto_launch
    }

    pub fn interval_label(&self) -> String {
        format!("当前间隔: {}分钟", self.interval_minutes)
    }

    pub fn entries(&self) -> Vec<MenuEntry> {
        vec![
            MenuEntry::Item {
                action: MenuAction::RestNow,
                label: "立即休息".to_string(),
                enabled: true,
            },
            MenuEntry::Separator,
            MenuEntry::Item {
                action: MenuAction::IntervalLabel,
                label: self.interval_label(),
                enabled: false,
            },
            MenuEntry::Item {
                action: MenuAction::EditInterval,
                label: "设置休息间隔".to_string(),
                enabled: true,
            },
            MenuEntry::Separator,
            MenuEntry::Check {
                action: MenuAction::ToggleAutoLaunch,
                label: "开机自启动".to_string(),
                checked: self.auto_launch,
            },
            MenuEntry::Separator,
            MenuEntry::Item {
                action: MenuAction::Quit,
                label: "退出".to_string(),
                enabled: true,
            },
        ]
    }
}

/// Live tray icon. Each `rebuild` replaces the whole native menu.
pub struct TrayMenu {
    icon: TrayIcon,
}

impl TrayMenu {
    pub fn new(model: &MenuModel) -> Result<Self> {
        // Icon clicks and hovers are not used; without a handler they pile up
        // in tray-icon's global channel for the life of the process.
        TrayIconEvent::set_event_handler(Some(|_: TrayIconEvent| {}));

        let mut builder = TrayIconBuilder::new()
            .with_tooltip(TOOLTIP)
            .with_menu(Box::new(build_native_menu(model)?));
        if let Some(icon) = icon_or_empty(load_icon_from(&icon_candidates())) {
            builder = builder.with_icon(icon);
        }

        let icon = builder.build().context("Failed to create tray icon")?;
        Ok(Self { icon })
    }

    pub fn rebuild(&self, model: &MenuModel) -> Result<()> {
        let menu = build_native_menu(model)?;
        self.icon.set_menu(Some(Box::new(menu)));
        tracing::debug!(
            event = "reminder.tray.rebuilt",
            interval = %model.interval_label(),
            auto_launch = model.auto_launch()
        );
        Ok(())
    }
}

/// Drains pending menu clicks and maps them to events.
pub fn poll_menu_events() -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(click) = MenuEvent::receiver().try_recv() {
        match MenuAction::from_id(&click.id.0) {
            Some(action) => events.extend(action.event()),
            None => tracing::warn!(event = "reminder.tray.unknown_item", id = %click.id.0),
        }
    }
    events
}

fn build_native_menu(model: &MenuModel) -> Result<Menu> {
    let menu = Menu::new();
    for entry in model.entries() {
        let appended = match entry {
            MenuEntry::Item {
                action,
                label,
                enabled,
            } => {
                let item = MenuItem::with_id(action.id(), label, enabled, None);
                menu.append(&item)
            }
            MenuEntry::Check {
                action,
                label,
                checked,
            } => {
                let item = CheckMenuItem::with_id(action.id(), label, true, checked, None);
                menu.append(&item)
            }
            MenuEntry::Separator => menu.append(&PredefinedMenuItem::separator()),
        };
        appended.context("Failed to build tray menu")?;
    }
    Ok(menu)
}

fn icon_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(ICON_FILE));
    }
    candidates.push(Path::new(env!("CARGO_MANIFEST_DIR")).join(ICON_FILE));
    candidates
}

/// Decodes the first existing candidate.
fn load_icon_from(candidates: &[PathBuf]) -> Result<Icon> {
    let path = candidates
        .iter()
        .find(|p| p.exists())
        .context("No tray icon found")?;

    tracing::debug!(event = "reminder.tray.icon_loading", path = %path.display());
    let image = image::open(path)
        .with_context(|| format!("Failed to open icon {}", path.display()))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height).context("Failed to decode tray icon")
}

/// A missing or broken icon is never fatal: the tray is built without one.
fn icon_or_empty(loaded: Result<Icon>) -> Option<Icon> {
    match loaded {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!(event = "reminder.tray.icon_failed", error = %e, "using empty tray icon");
            None
        }
    }
}
