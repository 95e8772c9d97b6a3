use gpui::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_appearance(appearance: WindowAppearance) -> Self {
        match appearance {
            WindowAppearance::Dark | WindowAppearance::VibrantDark => ThemeMode::Dark,
            WindowAppearance::Light | WindowAppearance::VibrantLight => ThemeMode::Light,
        }
    }
}

/// Colors of the interval dialog.
pub struct DialogPalette {
    pub background: Hsla,
    pub foreground: Hsla,
    pub input_background: Hsla,
    pub input_border: Hsla,
    pub close_hover: Hsla,
    pub cancel: Hsla,
    pub cancel_foreground: Hsla,
    pub confirm: Hsla,
    pub confirm_foreground: Hsla,
}

impl DialogPalette {
    pub fn light() -> Self {
        Self {
            background: rgb(0xf5f5f5).into(),
            foreground: rgb(0x1f2937).into(),
            input_background: rgb(0xffffff).into(),
            input_border: rgb(0xdddddd).into(),
            close_hover: rgb(0xe0e0e0).into(),
            cancel: rgb(0xf1f1f1).into(),
            cancel_foreground: rgb(0x374151).into(),
            confirm: rgb(0x4caf50).into(),
            confirm_foreground: rgb(0xffffff).into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: rgb(0x1f2937).into(),
            foreground: rgb(0xf9fafb).into(),
            input_background: rgb(0x111827).into(),
            input_border: rgb(0x4b5563).into(),
            close_hover: rgb(0x374151).into(),
            cancel: rgb(0x374151).into(),
            cancel_foreground: rgb(0xe5e7eb).into(),
            confirm: rgb(0x43a047).into(),
            confirm_foreground: rgb(0xffffff).into(),
        }
    }

    pub fn for_window(window: &Window) -> Self {
        match ThemeMode::from_appearance(window.appearance()) {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}

/// Dimmed backdrop behind the rest prompt.
pub const OVERLAY_BACKDROP: u32 = 0x0f172ad9;
pub const OVERLAY_TEXT: u32 = 0xf8fafc;
pub const OVERLAY_HINT: u32 = 0x94a3b8;
