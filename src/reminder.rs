//! The reminder state machine.
//!
//! Every input arrives as an [`Event`]; `handle` updates [`AppState`] and
//! returns the [`Effect`]s the runtime must carry out. Nothing in here
//! touches a window, so the whole rest cycle can be driven with a
//! simulated clock.

use std::time::Instant;

use crate::config::Config;
use crate::interval::RestInterval;
use crate::login_item::{LoginItemAdapter, LoginItems};
use crate::state::{AppState, Effect, Event, OverlayState};
use crate::tray::MenuModel;

pub struct Reminder<L> {
    state: AppState,
    login: LoginItemAdapter<L>,
}

impl<L: LoginItems> Reminder<L> {
    pub fn new(interval: RestInterval, login: LoginItemAdapter<L>) -> Self {
        let mut state = AppState::new(interval);
        state.auto_launch = login.cached();
        Self { state, login }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Startup sequence: sync the login-item flag, optionally register the
    /// app, then build the tray and arm the first countdown.
    pub fn start(&mut self, config: &Config, now: Instant) -> Vec<Effect> {
        self.state.auto_launch = self.login.get();
        if config.launch_at_login && !self.login.mode().is_development() {
            self.login.set(true);
            self.state.auto_launch = self.login.get();
        }
        tracing::info!(
            event = "reminder.started",
            interval_ms = self.state.interval.millis(),
            auto_launch = self.state.auto_launch,
            mode = ?self.login.mode()
        );
        vec![Effect::RebuildTray, self.restart_timer(now)]
    }

    pub fn handle(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        tracing::debug!(event = "reminder.event", kind = ?event);
        match event {
            Event::TimerFired(ticket) => {
                let late_ms = self
                    .state
                    .timer
                    .due_at()
                    .map(|due| now.saturating_duration_since(due).as_millis() as u64)
                    .unwrap_or_default();
                if !self.state.timer.expire(ticket) {
                    tracing::debug!(event = "reminder.timer.stale", ?ticket);
                    return Vec::new();
                }
                tracing::info!(event = "reminder.timer.expired", late_ms);
                self.show_overlay()
            }
            Event::ShowRestNow => self.show_overlay(),
            Event::OverlayCloseRequested | Event::OverlayClosed => {
                if !self.state.overlay.is_shown() {
                    return Vec::new();
                }
                self.state.overlay = OverlayState::Hidden;
                tracing::info!(event = "reminder.overlay.hidden");
                vec![Effect::CloseOverlay, self.restart_timer(now)]
            }
            Event::EditInterval => {
                if self.state.dialog_open {
                    return vec![Effect::FocusDialog];
                }
                self.state.dialog_open = true;
                vec![Effect::OpenDialog {
                    prefill_minutes: self.state.interval.display_minutes(),
                }]
            }
            Event::DialogConfirmed(text) => {
                if !self.state.dialog_open {
                    return Vec::new();
                }
                match RestInterval::parse_minutes(&text) {
                    Ok(interval) => {
                        self.state.interval = interval;
                        self.state.dialog_open = false;
                        tracing::info!(
                            event = "reminder.interval.updated",
                            minutes = interval.display_minutes()
                        );
                        vec![
                            self.restart_timer(now),
                            Effect::RebuildTray,
                            Effect::CloseDialog,
                        ]
                    }
                    Err(e) => {
                        tracing::debug!(event = "reminder.interval.rejected", error = %e);
                        Vec::new()
                    }
                }
            }
            Event::DialogCancelled => {
                if !self.state.dialog_open {
                    return Vec::new();
                }
                self.state.dialog_open = false;
                vec![Effect::CloseDialog]
            }
            Event::DialogLost => {
                if !self.state.dialog_open {
                    return Vec::new();
                }
                tracing::warn!(event = "reminder.dialog.lost");
                vec![Effect::OpenDialog {
                    prefill_minutes: self.state.interval.display_minutes(),
                }]
            }
            Event::Reopened => {
                if self.state.dialog_open {
                    return vec![Effect::FocusDialog];
                }
                self.show_overlay()
            }
            Event::ToggleAutoLaunch => {
                self.login.set(!self.state.auto_launch);
                self.state.auto_launch = self.login.get();
                vec![Effect::RebuildTray]
            }
            Event::Quit => {
                tracing::info!(event = "reminder.quit");
                vec![Effect::Quit]
            }
        }
    }

    /// Describes the tray menu as it should look now. Re-reads the
    /// login-item flag so the checkbox follows the OS.
    pub fn menu_model(&mut self) -> MenuModel {
        self.state.auto_launch = self.login.get();
        MenuModel::new(self.state.interval, self.state.auto_launch)
    }

    fn show_overlay(&mut self) -> Vec<Effect> {
        if self.state.overlay.is_shown() {
            tracing::debug!(event = "reminder.overlay.already_shown");
            return Vec::new();
        }
        self.state.overlay = OverlayState::Shown;
        tracing::info!(event = "reminder.overlay.shown");
        vec![Effect::OpenOverlay]
    }

    fn restart_timer(&mut self, now: Instant) -> Effect {
        let (ticket, after) = self.state.timer.start(now, self.state.interval);
        let due = chrono::Duration::from_std(after)
            .ok()
            .and_then(|d| chrono::Local::now().checked_add_signed(d))
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        tracing::info!(
            event = "reminder.timer.scheduled",
            after_ms = after.as_millis() as u64,
            due = %due
        );
        Effect::ScheduleTimer { ticket, after }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::ExecutionMode;
    use crate::login_item::fake::FakeLoginItems;
    use crate::timer::TimerTicket;

    fn reminder_with(millis: u64, mode: ExecutionMode) -> Reminder<FakeLoginItems> {
        let login = LoginItemAdapter::new(FakeLoginItems::default(), mode);
        Reminder::new(RestInterval::from_millis(millis).unwrap(), login)
    }

    fn quiet_config() -> Config {
        Config {
            launch_at_login: false,
            ..Config::default()
        }
    }

    fn scheduled(effects: &[Effect]) -> Option<(TimerTicket, Duration)> {
        effects.iter().find_map(|e| match e {
            Effect::ScheduleTimer { ticket, after } => Some((*ticket, *after)),
            _ => None,
        })
    }

    #[test]
    fn full_rest_cycle_with_simulated_clock() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let t0 = Instant::now();

        let effects = reminder.start(&quiet_config(), t0);
        assert_eq!(effects[0], Effect::RebuildTray);
        let (ticket, after) = scheduled(&effects).unwrap();
        assert_eq!(after, Duration::from_millis(5_000));
        assert_eq!(
            reminder.state().timer.due_at(),
            Some(t0 + Duration::from_millis(5_000))
        );

        let t1 = t0 + after;
        assert_eq!(
            reminder.handle(Event::TimerFired(ticket), t1),
            vec![Effect::OpenOverlay]
        );
        assert!(reminder.state().overlay.is_shown());

        let t2 = t1 + Duration::from_secs(3);
        let effects = reminder.handle(Event::OverlayCloseRequested, t2);
        assert_eq!(effects[0], Effect::CloseOverlay);
        let (_, after) = scheduled(&effects).unwrap();
        assert_eq!(after, Duration::from_millis(5_000));
        assert_eq!(reminder.state().overlay, OverlayState::Hidden);
        assert_eq!(
            reminder.state().timer.due_at(),
            Some(t2 + Duration::from_millis(5_000))
        );
    }

    #[test]
    fn show_now_while_shown_is_a_no_op() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        let (ticket, _) = scheduled(&reminder.start(&quiet_config(), now)).unwrap();

        assert_eq!(reminder.handle(Event::TimerFired(ticket), now), vec![Effect::OpenOverlay]);
        assert!(reminder.handle(Event::ShowRestNow, now).is_empty());
    }

    #[test]
    fn timer_expiry_after_manual_rest_does_not_open_twice() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        let (ticket, _) = scheduled(&reminder.start(&quiet_config(), now)).unwrap();

        assert_eq!(reminder.handle(Event::ShowRestNow, now), vec![Effect::OpenOverlay]);
        assert!(reminder.handle(Event::TimerFired(ticket), now).is_empty());
    }

    #[test]
    fn overlay_close_signals_are_handled_once() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.start(&quiet_config(), now);
        reminder.handle(Event::ShowRestNow, now);

        assert_eq!(reminder.handle(Event::OverlayClosed, now).len(), 2);
        assert!(reminder.handle(Event::OverlayCloseRequested, now).is_empty());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        let (old, _) = scheduled(&reminder.start(&quiet_config(), now)).unwrap();

        reminder.handle(Event::EditInterval, now);
        reminder.handle(Event::DialogConfirmed("10".into()), now);

        assert!(reminder.handle(Event::TimerFired(old), now).is_empty());
        assert!(!reminder.state().overlay.is_shown());
    }

    #[test]
    fn confirming_a_valid_interval_applies_it() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.start(&quiet_config(), now);

        assert_eq!(
            reminder.handle(Event::EditInterval, now),
            vec![Effect::OpenDialog { prefill_minutes: 0 }]
        );

        let effects = reminder.handle(Event::DialogConfirmed("30".into()), now);
        let (_, after) = scheduled(&effects).unwrap();
        assert_eq!(after, Duration::from_secs(30 * 60));
        assert!(effects.contains(&Effect::RebuildTray));
        assert_eq!(effects.last(), Some(&Effect::CloseDialog));
        assert!(!reminder.state().dialog_open);
        assert_eq!(reminder.menu_model().interval_label(), "当前间隔: 30分钟");
    }

    #[test]
    fn out_of_range_confirm_keeps_dialog_open() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.start(&quiet_config(), now);
        reminder.handle(Event::EditInterval, now);
        let due = reminder.state().timer.due_at();

        for text in ["2000", "0", "-3", "abc", ""] {
            assert!(reminder.handle(Event::DialogConfirmed(text.into()), now).is_empty());
        }

        assert!(reminder.state().dialog_open);
        assert_eq!(reminder.state().interval.millis(), 5_000);
        assert_eq!(reminder.state().timer.due_at(), due);
    }

    #[test]
    fn cancel_closes_without_side_effects() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.start(&quiet_config(), now);
        reminder.handle(Event::EditInterval, now);

        assert_eq!(reminder.handle(Event::DialogCancelled, now), vec![Effect::CloseDialog]);
        assert!(!reminder.state().dialog_open);
        assert_eq!(reminder.state().interval.millis(), 5_000);
        assert!(reminder.handle(Event::DialogCancelled, now).is_empty());
    }

    #[test]
    fn second_edit_request_focuses_existing_dialog() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.handle(Event::EditInterval, now);

        assert_eq!(reminder.handle(Event::EditInterval, now), vec![Effect::FocusDialog]);
    }

    #[test]
    fn lost_dialog_is_reopened_instead_of_focused() {
        let mut reminder = reminder_with(90_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.handle(Event::EditInterval, now);

        assert_eq!(
            reminder.handle(Event::DialogLost, now),
            vec![Effect::OpenDialog { prefill_minutes: 2 }]
        );
        assert!(reminder.state().dialog_open);
        assert_eq!(reminder.handle(Event::EditInterval, now), vec![Effect::FocusDialog]);
    }

    #[test]
    fn dialog_lost_without_open_dialog_is_ignored() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);

        assert!(reminder.handle(Event::DialogLost, Instant::now()).is_empty());
        assert!(!reminder.state().dialog_open);
    }

    #[test]
    fn reopening_the_app_shows_the_overlay_once() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.start(&quiet_config(), now);

        assert_eq!(reminder.handle(Event::Reopened, now), vec![Effect::OpenOverlay]);
        assert!(reminder.handle(Event::Reopened, now).is_empty());
        assert!(reminder.state().overlay.is_shown());
    }

    #[test]
    fn reopening_with_dialog_open_focuses_it() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        let now = Instant::now();
        reminder.handle(Event::EditInterval, now);

        assert_eq!(reminder.handle(Event::Reopened, now), vec![Effect::FocusDialog]);
        assert!(!reminder.state().overlay.is_shown());
    }

    #[test]
    fn confirm_without_open_dialog_is_ignored() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);

        assert!(reminder
            .handle(Event::DialogConfirmed("30".into()), Instant::now())
            .is_empty());
        assert_eq!(reminder.state().interval.millis(), 5_000);
    }

    #[test]
    fn toggling_auto_launch_twice_restores_os_state() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        reminder.start(&quiet_config(), Instant::now());
        let original = reminder.menu_model().auto_launch();

        assert_eq!(
            reminder.handle(Event::ToggleAutoLaunch, Instant::now()),
            vec![Effect::RebuildTray]
        );
        assert_eq!(reminder.menu_model().auto_launch(), !original);
        reminder.handle(Event::ToggleAutoLaunch, Instant::now());

        assert_eq!(reminder.menu_model().auto_launch(), original);
    }

    #[test]
    fn production_start_registers_login_item_when_configured() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);

        reminder.start(&Config::default(), Instant::now());

        assert!(reminder.state().auto_launch);
    }

    #[test]
    fn development_start_leaves_login_item_alone() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Development);

        reminder.start(&Config::default(), Instant::now());

        assert!(!reminder.state().auto_launch);
    }

    #[test]
    fn quit_is_forwarded() {
        let mut reminder = reminder_with(5_000, ExecutionMode::Production);
        assert_eq!(reminder.handle(Event::Quit, Instant::now()), vec![Effect::Quit]);
    }
}
