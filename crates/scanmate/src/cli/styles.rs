//! Styles for the scanmate CLI.
//!
//! Output code asks for semantic styles (a list index, a muted date, a warning)
//! and a [`Palette`] decides what they look like. There is one palette for
//! light terminals and one for dark ones.
//!
//! Which palette is used follows the stored theme preference: `light` and
//! `dark` pick theirs directly, `system` asks the terminal through
//! `dark-light`. When stdout is not a terminal no colors are emitted at all,
//! so the palette choice only matters interactively.

use console::Style;
use scanmateapp::commands::MessageLevel;
use scanmateapp::services::ColorScheme;

#[derive(Debug, Clone)]
pub struct Palette {
    pub regular: Style,
    pub muted: Style,
    pub error: Style,
    pub warning: Style,
    pub success: Style,
    pub info: Style,
    pub list_index: Style,
    pub list_title: Style,
    pub label: Style,
}

impl Palette {
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
        }
    }

    fn light() -> Self {
        Self {
            regular: Style::new().black(),
            muted: Style::new().color256(243),
            error: Style::new().red().bold(),
            warning: Style::new().color256(136).bold(),
            success: Style::new().green(),
            info: Style::new().color256(243),
            list_index: Style::new().color256(172).bold(),
            list_title: Style::new().black(),
            label: Style::new().black().bold(),
        }
    }

    fn dark() -> Self {
        Self {
            regular: Style::new().white(),
            muted: Style::new().color256(246),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            success: Style::new().green(),
            info: Style::new().color256(246),
            list_index: Style::new().color256(214).bold(),
            list_title: Style::new().white(),
            label: Style::new().white().bold(),
        }
    }

    /// No decoration at all.
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            regular: Style::new(),
            muted: Style::new(),
            error: Style::new(),
            warning: Style::new(),
            success: Style::new(),
            info: Style::new(),
            list_index: Style::new(),
            list_title: Style::new(),
            label: Style::new(),
        }
    }

    pub fn message(&self, level: MessageLevel) -> &Style {
        match level {
            MessageLevel::Info => &self.info,
            MessageLevel::Success => &self.success,
            MessageLevel::Warning => &self.warning,
            MessageLevel::Error => &self.error,
        }
    }
}

/// The terminal's own light/dark mode.
pub fn platform_scheme() -> ColorScheme {
    match dark_light::detect() {
        dark_light::Mode::Light => ColorScheme::Light,
        dark_light::Mode::Dark => ColorScheme::Dark,
    }
}
