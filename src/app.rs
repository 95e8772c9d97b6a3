//! gpui runtime around the reminder state machine.
//!
//! `ReminderApp` owns every live resource (tray icon, overlay and dialog
//! windows, the pending timer task) and turns the [`Effect`]s returned by
//! [`Reminder`] into toolkit calls. All of it runs on the gpui foreground
//! executor.

use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use gpui::*;

use crate::config::{Config, ExecutionMode};
use crate::interval::RestInterval;
use crate::login_item::{LoginItemAdapter, LoginItems};
use crate::notifications;
use crate::reminder::Reminder;
use crate::state::{Effect, Event};
use crate::timer::TimerTicket;
use crate::tray::{self, TrayMenu};
use crate::ui::{DialogEvent, IntervalDialog, OverlayEvent, RestOverlay};

const MENU_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An open window plus the subscription to its events. Dropping the
/// session releases the listener together with the handle.
struct WindowSession<V> {
    handle: WindowHandle<V>,
    _subscription: Subscription,
}

impl<V: 'static> WindowSession<V> {
    fn close(self, cx: &mut App) {
        if let Err(e) = self.handle.update(cx, |_, window, _| window.remove_window()) {
            tracing::debug!(event = "reminder.window.already_closed", error = %e);
        }
    }
}

pub struct ReminderApp {
    reminder: Reminder<Box<dyn LoginItems>>,
    config: Config,
    mode: ExecutionMode,
    tray: Option<TrayMenu>,
    overlay: Option<WindowSession<RestOverlay>>,
    dialog: Option<WindowSession<IntervalDialog>>,
    /// Dropping the task cancels the pending countdown.
    _timer_task: Option<Task<()>>,
    _menu_poll: Task<()>,
}

/// Keeps the app entity alive for the lifetime of the process; there is no
/// main window holding it.
struct ReminderRoot {
    _app: Entity<ReminderApp>,
}

impl Global for ReminderRoot {}

/// Builds the reminder, shows the tray and arms the first countdown.
pub fn launch(
    config: Config,
    mode: ExecutionMode,
    login: Box<dyn LoginItems>,
    cx: &mut App,
) -> Result<()> {
    let interval = config.interval()?;
    let app = cx.new(|cx| ReminderApp::new(interval, config, mode, login, cx));
    app.update(cx, |app, cx| app.start(cx));

    let weak = app.downgrade();
    cx.on_reopen(move |cx| {
        if let Some(app) = weak.upgrade() {
            app.update(cx, |app, cx| app.dispatch(Event::Reopened, cx));
        }
    });
    cx.set_global(ReminderRoot { _app: app });
    Ok(())
}

impl ReminderApp {
    fn new(
        interval: RestInterval,
        config: Config,
        mode: ExecutionMode,
        login: Box<dyn LoginItems>,
        cx: &mut Context<'_, Self>,
    ) -> Self {
        let login = LoginItemAdapter::new(login, mode);

        let menu_poll = cx.spawn(async move |this, cx| {
            loop {
                cx.background_executor().timer(MENU_POLL_INTERVAL).await;

                let events = tray::poll_menu_events();
                let alive = this.update(cx, |app, cx| {
                    for event in events {
                        app.dispatch(event, cx);
                    }
                });
                if alive.is_err() {
                    tracing::debug!(event = "reminder.tray.poll_stopped");
                    break;
                }
            }
        });

        Self {
            reminder: Reminder::new(interval, login),
            config,
            mode,
            tray: None,
            overlay: None,
            dialog: None,
            _timer_task: None,
            _menu_poll: menu_poll,
        }
    }

    fn start(&mut self, cx: &mut Context<'_, Self>) {
        let effects = self.reminder.start(&self.config, Instant::now());
        self.apply(effects, cx);
    }

    pub fn dispatch(&mut self, event: Event, cx: &mut Context<'_, Self>) {
        let effects = self.reminder.handle(event, Instant::now());
        self.apply(effects, cx);
    }

    fn apply(&mut self, effects: Vec<Effect>, cx: &mut Context<'_, Self>) {
        for effect in effects {
            match effect {
                Effect::ScheduleTimer { ticket, after } => self.schedule(ticket, after, cx),
                Effect::OpenOverlay => match self.open_overlay(cx) {
                    Ok(session) => {
                        self.overlay = Some(session);
                        if self.config.enable_notifications {
                            notifications::notify_rest_started();
                        }
                    }
                    Err(e) => {
                        tracing::error!(event = "reminder.overlay.open_failed", error = %e);
                        self.dispatch(Event::OverlayClosed, cx);
                    }
                },
                Effect::CloseOverlay => {
                    if let Some(session) = self.overlay.take() {
                        session.close(cx);
                    }
                }
                Effect::OpenDialog { prefill_minutes } => {
                    match self.open_dialog(prefill_minutes, cx) {
                        Ok(session) => self.dialog = Some(session),
                        Err(e) => {
                            tracing::error!(event = "reminder.dialog.open_failed", error = %e);
                            self.dispatch(Event::DialogCancelled, cx);
                        }
                    }
                }
                Effect::FocusDialog => {
                    let focused = self.dialog.as_ref().map(|session| {
                        session
                            .handle
                            .update(cx, |_, window, _| window.activate_window())
                    });
                    if let Some(Err(e)) = focused {
                        tracing::debug!(event = "reminder.dialog.focus_failed", error = %e);
                        self.dialog = None;
                        self.dispatch(Event::DialogLost, cx);
                    }
                }
                Effect::CloseDialog => {
                    if let Some(session) = self.dialog.take() {
                        session.close(cx);
                    }
                }
                Effect::RebuildTray => self.rebuild_tray(),
                Effect::Quit => cx.quit(),
            }
        }
    }

    fn schedule(&mut self, ticket: TimerTicket, after: Duration, cx: &mut Context<'_, Self>) {
        self._timer_task = Some(cx.spawn(async move |this, cx| {
            cx.background_executor().timer(after).await;
            let _ = this.update(cx, |app, cx| app.dispatch(Event::TimerFired(ticket), cx));
        }));
    }

    fn rebuild_tray(&mut self) {
        let model = self.reminder.menu_model();
        match &self.tray {
            Some(tray) => {
                if let Err(e) = tray.rebuild(&model) {
                    tracing::error!(event = "reminder.tray.rebuild_failed", error = %e);
                }
            }
            None => match TrayMenu::new(&model) {
                Ok(tray) => self.tray = Some(tray),
                Err(e) => tracing::error!(event = "reminder.tray.create_failed", error = %e),
            },
        }
    }

    fn open_overlay(&mut self, cx: &mut Context<'_, Self>) -> Result<WindowSession<RestOverlay>> {
        let screen_bounds = cx
            .displays()
            .first()
            .map(|d| d.bounds())
            .unwrap_or_else(|| Bounds {
                origin: point(px(0.0), px(0.0)),
                size: size(px(1920.0), px(1080.0)),
            });
        let reload_enabled = self.mode.is_development();

        let mut view = None;
        let handle = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Fullscreen(screen_bounds)),
                titlebar: None,
                window_decorations: None,
                window_background: WindowBackgroundAppearance::Transparent,
                kind: WindowKind::PopUp,
                is_movable: false,
                is_resizable: false,
                focus: true,
                show: true,
                app_id: Some("rest-reminder".to_string()),
                ..Default::default()
            },
            |window, cx| {
                let overlay = cx.new(|cx| RestOverlay::new(reload_enabled, window, cx));
                view = Some(overlay.clone());
                overlay
            },
        )?;
        let view = view.context("overlay window opened without a view")?;

        let subscription = cx.subscribe(&view, |app, _, event: &OverlayEvent, cx| match event {
            OverlayEvent::CloseRequested => app.dispatch(Event::OverlayCloseRequested, cx),
            OverlayEvent::Closed => app.dispatch(Event::OverlayClosed, cx),
        });
        view.update(cx, |overlay, cx| overlay.show_cue(cx));

        Ok(WindowSession {
            handle,
            _subscription: subscription,
        })
    }

    fn open_dialog(
        &mut self,
        prefill_minutes: u64,
        cx: &mut Context<'_, Self>,
    ) -> Result<WindowSession<IntervalDialog>> {
        let bounds = Bounds::centered(None, size(px(350.0), px(180.0)), cx);

        let mut view = None;
        let handle = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                titlebar: None,
                window_decorations: Some(WindowDecorations::Client),
                kind: WindowKind::PopUp,
                is_movable: true,
                is_resizable: false,
                focus: true,
                show: true,
                app_id: Some("rest-reminder".to_string()),
                ..Default::default()
            },
            |window, cx| {
                let dialog = cx.new(|cx| IntervalDialog::new(prefill_minutes, window, cx));
                view = Some(dialog.clone());
                dialog
            },
        )?;
        let view = view.context("dialog window opened without a view")?;

        let subscription = cx.subscribe(&view, |app, _, event: &DialogEvent, cx| match event {
            DialogEvent::Confirm(text) => app.dispatch(Event::DialogConfirmed(text.clone()), cx),
            DialogEvent::Cancel => app.dispatch(Event::DialogCancelled, cx),
        });

        Ok(WindowSession {
            handle,
            _subscription: subscription,
        })
    }
}
