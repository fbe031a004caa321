use ratatui::style::{Color, Modifier, Style};

/// Dialog theme configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Primary colors
    pub primary: Color,
    pub on_primary: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,

    /// Background colors
    pub background: Color,
    pub backdrop: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Special colors
    pub placeholder: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Look a theme up by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(59, 130, 246),       // Blue-500
            on_primary: Color::Rgb(255, 255, 255),   // White

            text: Color::Rgb(248, 250, 252),         // Slate-50
            text_dim: Color::Rgb(148, 163, 184),     // Slate-400

            background: Color::Rgb(15, 23, 42),      // Slate-900
            backdrop: Color::Rgb(51, 65, 85),        // Slate-700

            border: Color::Rgb(71, 85, 105),         // Slate-600
            border_focused: Color::Rgb(59, 130, 246), // Blue-500

            placeholder: Color::Rgb(100, 116, 139),  // Slate-500
            selection: Color::Rgb(30, 58, 138),      // Blue-900
        }
    }

    /// Create a light theme
    pub fn light() -> Self {
        Self {
            primary: Color::Rgb(37, 99, 235),        // Blue-600
            on_primary: Color::Rgb(255, 255, 255),   // White

            text: Color::Rgb(15, 23, 42),            // Slate-900
            text_dim: Color::Rgb(100, 116, 139),     // Slate-500

            background: Color::Rgb(255, 255, 255),   // White
            backdrop: Color::Rgb(204, 204, 204),     // #ccc

            border: Color::Rgb(204, 204, 204),       // #ccc
            border_focused: Color::Rgb(37, 99, 235), // Blue-600

            placeholder: Color::Rgb(148, 163, 184),  // Slate-400
            selection: Color::Rgb(191, 219, 254),    // Blue-200
        }
    }

    /// Base style for the dialog body
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for the dimmed underlay
    pub fn backdrop_style(&self) -> Style {
        Style::default()
            .bg(self.backdrop)
            .add_modifier(Modifier::DIM)
    }

    /// Style for borders
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style for a push button
    pub fn button_style(&self, primary: bool, focused: bool) -> Style {
        let style = if primary {
            Style::default().fg(self.on_primary).bg(self.primary)
        } else {
            Style::default().fg(self.text).bg(self.background)
        };

        if focused {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style
        }
    }

    /// Style for selected text
    pub fn selection_style(&self) -> Style {
        Style::default().bg(self.selection)
    }

    /// Style for help text
    pub fn help_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .add_modifier(Modifier::DIM)
    }

    /// Style for placeholder text
    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.placeholder)
            .add_modifier(Modifier::ITALIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        assert_eq!(Theme::from_name("dark"), Some(Theme::dark()));
        assert_eq!(Theme::from_name("light"), Some(Theme::light()));
        assert_eq!(Theme::from_name("neon"), None);
    }

    #[test]
    fn test_focused_button_is_emphasized() {
        let theme = Theme::dark();
        let focused = theme.button_style(true, true);

        assert!(focused.add_modifier.contains(Modifier::REVERSED));
        assert!(!theme.button_style(true, false).add_modifier.contains(Modifier::REVERSED));
    }
}
