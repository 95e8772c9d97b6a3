use std::time::Duration;

use crate::interval::RestInterval;
use crate::timer::{RestTimer, TimerTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Hidden,
    Shown,
}

impl OverlayState {
    pub fn is_shown(&self) -> bool {
        matches!(self, OverlayState::Shown)
    }
}

/// Everything that can happen to the reminder: tray clicks, timer wake-ups
/// and signals coming back from the overlay and dialog windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ShowRestNow,
    TimerFired(TimerTicket),
    /// The overlay content asked to be dismissed (any click).
    OverlayCloseRequested,
    /// The overlay window went away without going through a click.
    OverlayClosed,
    EditInterval,
    DialogConfirmed(String),
    DialogCancelled,
    /// The dialog window disappeared without reporting a cancel.
    DialogLost,
    /// The app was reactivated (dock click on macOS) with no window open.
    Reopened,
    ToggleAutoLaunch,
    Quit,
}

/// Work the runtime has to carry out after an `Event` was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleTimer { ticket: TimerTicket, after: Duration },
    OpenOverlay,
    CloseOverlay,
    OpenDialog { prefill_minutes: u64 },
    FocusDialog,
    CloseDialog,
    RebuildTray,
    Quit,
}

/// Process-lifetime state of the reminder. Nothing here is persisted.
#[derive(Debug)]
pub struct AppState {
    pub interval: RestInterval,
    /// Mirror of the OS login-item registration, refreshed on each tray rebuild.
    pub auto_launch: bool,
    pub overlay: OverlayState,
    pub dialog_open: bool,
    pub timer: RestTimer,
}

impl AppState {
    pub fn new(interval: RestInterval) -> Self {
        AppState {
            interval,
            auto_launch: false,
            overlay: OverlayState::Hidden,
            dialog_open: false,
            timer: RestTimer::new(),
        }
    }
}
