use gpui::prelude::*;
use gpui::*;

use crate::theme::{OVERLAY_BACKDROP, OVERLAY_HINT, OVERLAY_TEXT};

/// Signals sent from the overlay content to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// The user clicked somewhere on the overlay.
    CloseRequested,
    /// The window is being closed by the OS or window manager.
    Closed,
}

/// Full-screen rest prompt. Any click dismisses it.
pub struct RestOverlay {
    focus_handle: FocusHandle,
    cue_visible: bool,
    reload_enabled: bool,
}

impl EventEmitter<OverlayEvent> for RestOverlay {}

impl RestOverlay {
    pub fn new(reload_enabled: bool, window: &mut Window, cx: &mut Context<'_, Self>) -> Self {
        let this = cx.weak_entity();
        window.on_window_should_close(cx, move |_window, cx| {
            let _ = this.update(cx, |_, cx| cx.emit(OverlayEvent::Closed));
            true
        });

        Self {
            focus_handle: cx.focus_handle(),
            cue_visible: false,
            reload_enabled,
        }
    }

    /// Reveals the rest cue once the window has loaded.
    pub fn show_cue(&mut self, cx: &mut Context<'_, Self>) {
        tracing::debug!(event = "reminder.overlay.cue_shown");
        self.cue_visible = true;
        cx.notify();
    }

    fn reload(&mut self, cx: &mut Context<'_, Self>) {
        tracing::debug!(event = "reminder.overlay.reloaded");
        self.cue_visible = false;
        self.show_cue(cx);
    }

    fn is_reload_key(keystroke: &Keystroke) -> bool {
        keystroke.key == "f5" || (keystroke.modifiers.control && keystroke.key == "r")
    }
}

impl Render for RestOverlay {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        self.focus_handle.focus(window);

        div()
            .id("rest-overlay")
            .size_full()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .gap_6()
            .bg(rgba(OVERLAY_BACKDROP))
            .cursor_pointer()
            .track_focus(&self.focus_handle)
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|_, _, _, cx| cx.emit(OverlayEvent::CloseRequested)),
            )
            .on_mouse_down(
                MouseButton::Right,
                cx.listener(|_, _, _, cx| cx.emit(OverlayEvent::CloseRequested)),
            )
            .on_mouse_down(
                MouseButton::Middle,
                cx.listener(|_, _, _, cx| cx.emit(OverlayEvent::CloseRequested)),
            )
            .when(self.reload_enabled, |this| {
                this.on_key_down(cx.listener(|overlay, event: &KeyDownEvent, _, cx| {
                    if Self::is_reload_key(&event.keystroke) {
                        overlay.reload(cx);
                    }
                }))
            })
            .when(self.cue_visible, |this| {
                this.child(div().text_size(px(96.0)).child("☕"))
                    .child(
                        div()
                            .text_size(px(40.0))
                            .font_weight(FontWeight::BOLD)
                            .text_color(rgb(OVERLAY_TEXT))
                            .child("休息一下吧"),
                    )
                    .child(
                        div()
                            .text_size(px(18.0))
                            .text_color(rgb(OVERLAY_HINT))
                            .child("离开屏幕，活动一下眼睛和肩颈"),
                    )
            })
            .child(
                div()
                    .absolute()
                    .bottom(px(48.0))
                    .text_sm()
                    .text_color(rgb(OVERLAY_HINT))
                    .child("点击任意位置继续"),
            )
    }
}
