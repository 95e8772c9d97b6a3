//! Small popup for editing the rest interval.
//!
//! The field is a plain digit buffer ([`NumericInput`]) rendered by the
//! view; validation of the value happens in the controller, so this view
//! only reports what the user asked for.

use gpui::prelude::*;
use gpui::*;

use crate::theme::DialogPalette;

/// Signals sent from the dialog content to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Apply the typed value. The dialog stays open if it is rejected.
    Confirm(String),
    Cancel,
}

/// Longest value the field accepts, enough for `MAX_MINUTES`.
const MAX_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Edited,
    Confirm,
    Cancel,
    Ignored,
}

/// Digit buffer behind the minutes field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericInput {
    text: String,
}

impl NumericInput {
    pub fn new(prefill: u64) -> Self {
        Self {
            text: prefill.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Applies one key press, named the way gpui names keystrokes.
    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        match key {
            "enter" => KeyOutcome::Confirm,
            "escape" => KeyOutcome::Cancel,
            "backspace" => {
                if self.text.pop().is_some() {
                    KeyOutcome::Edited
                } else {
                    KeyOutcome::Ignored
                }
            }
            digit if digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()) => {
                if self.text.len() >= MAX_DIGITS {
                    return KeyOutcome::Ignored;
                }
                self.text.push_str(digit);
                KeyOutcome::Edited
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

pub struct IntervalDialog {
    input: NumericInput,
    focus_handle: FocusHandle,
}

impl EventEmitter<DialogEvent> for IntervalDialog {}

impl IntervalDialog {
    pub fn new(prefill_minutes: u64, window: &mut Window, cx: &mut Context<'_, Self>) -> Self {
        // The window's own close button counts as cancel.
        let this = cx.weak_entity();
        window.on_window_should_close(cx, move |_window, cx| {
            let _ = this.update(cx, |_, cx| cx.emit(DialogEvent::Cancel));
            true
        });

        Self {
            input: NumericInput::new(prefill_minutes),
            focus_handle: cx.focus_handle(),
        }
    }

    fn confirm(&mut self, cx: &mut Context<'_, Self>) {
        cx.emit(DialogEvent::Confirm(self.input.text().to_string()));
    }

    fn cancel(&mut self, cx: &mut Context<'_, Self>) {
        cx.emit(DialogEvent::Cancel);
    }

    fn on_key(&mut self, event: &KeyDownEvent, cx: &mut Context<'_, Self>) {
        match self.input.handle_key(event.keystroke.key.as_str()) {
            KeyOutcome::Edited => cx.notify(),
            KeyOutcome::Confirm => self.confirm(cx),
            KeyOutcome::Cancel => self.cancel(cx),
            KeyOutcome::Ignored => {}
        }
    }

    fn render_header(&self, palette: &DialogPalette, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .items_center()
            .justify_between()
            .child(
                div()
                    .text_base()
                    .font_weight(FontWeight::BOLD)
                    .child("设置休息间隔"),
            )
            .child(
                div()
                    .id("interval-dialog-close")
                    .size(px(24.0))
                    .flex()
                    .items_center()
                    .justify_center()
                    .rounded_full()
                    .text_size(px(18.0))
                    .cursor_pointer()
                    .hover({
                        let hover = palette.close_hover;
                        move |style| style.bg(hover)
                    })
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(|dialog, _, _, cx| dialog.cancel(cx)),
                    )
                    .child("×"),
            )
    }

    fn render_field(&self, palette: &DialogPalette) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .items_center()
            .gap_2()
            .child(
                div()
                    .flex_1()
                    .px_2()
                    .py_2()
                    .rounded(px(4.0))
                    .border_1()
                    .border_color(palette.input_border)
                    .bg(palette.input_background)
                    .text_sm()
                    .child(format!("{}|", self.input.text())),
            )
            .child(div().text_sm().child("分钟"))
    }

    fn render_buttons(&self, palette: &DialogPalette, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .justify_end()
            .gap_2()
            .child(
                div()
                    .id("interval-dialog-cancel")
                    .px_4()
                    .py_2()
                    .rounded(px(4.0))
                    .bg(palette.cancel)
                    .text_color(palette.cancel_foreground)
                    .text_sm()
                    .cursor_pointer()
                    .hover(|style| style.opacity(0.8))
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(|dialog, _, _, cx| dialog.cancel(cx)),
                    )
                    .child("取消"),
            )
            .child(
                div()
                    .id("interval-dialog-confirm")
                    .px_4()
                    .py_2()
                    .rounded(px(4.0))
                    .bg(palette.confirm)
                    .text_color(palette.confirm_foreground)
                    .text_sm()
                    .cursor_pointer()
                    .hover(|style| style.opacity(0.8))
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(|dialog, _, _, cx| dialog.confirm(cx)),
                    )
                    .child("确定"),
            )
    }
}

impl Render for IntervalDialog {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        self.focus_handle.focus(window);
        let palette = DialogPalette::for_window(window);

        div()
            .size_full()
            .p(px(15.0))
            .flex()
            .flex_col()
            .gap(px(15.0))
            .rounded(px(5.0))
            .bg(palette.background)
            .text_color(palette.foreground)
            .track_focus(&self.focus_handle)
            .on_key_down(cx.listener(|dialog, event: &KeyDownEvent, _, cx| dialog.on_key(event, cx)))
            .child(self.render_header(&palette, cx))
            .child(self.render_field(&palette))
            .child(self.render_buttons(&palette, cx))
    }
}
