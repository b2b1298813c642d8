//! TUI theme and styling

use ratatui::style::Color;

use crate::board::TaskStatus;

#[derive(Debug, Clone)]
pub struct Theme {
    // Background and borders
    pub background: Color,
    pub border: Color,
    pub focused_border: Color,
    pub selection: Color,

    // Text colors
    pub title: Color,
    pub text: Color,
    pub dimmed: Color,
    pub hint: Color,

    // Column colors
    pub todo: Color,
    pub in_progress: Color,
    pub done: Color,

    // UI elements
    pub error: Color,
    pub search: Color,
    pub grabbed: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::phosphor()
    }
}

impl Theme {
    /// Looks a theme up by its config name. Unknown names get the default.
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "classic" => Self::classic(),
            _ => Self::phosphor(),
        }
    }

    pub fn phosphor() -> Self {
        Self {
            background: Color::Rgb(16, 20, 18),
            border: Color::Rgb(45, 70, 55),
            focused_border: Color::Rgb(100, 220, 160),
            selection: Color::Rgb(30, 50, 40),

            title: Color::Rgb(57, 255, 20),
            text: Color::Rgb(180, 255, 180),
            dimmed: Color::Rgb(80, 120, 90),
            hint: Color::Rgb(100, 160, 120),

            todo: Color::Rgb(255, 180, 60),
            in_progress: Color::Rgb(130, 170, 255),
            done: Color::Rgb(0, 255, 180),

            error: Color::Rgb(255, 100, 80),
            search: Color::Rgb(180, 255, 200),
            grabbed: Color::Rgb(255, 220, 120),
            accent: Color::Rgb(57, 255, 20),
        }
    }

    /// Named ANSI colors, for terminals without truecolor.
    pub fn classic() -> Self {
        Self {
            background: Color::Reset,
            border: Color::DarkGray,
            focused_border: Color::Cyan,
            selection: Color::DarkGray,

            title: Color::Cyan,
            text: Color::White,
            dimmed: Color::DarkGray,
            hint: Color::Gray,

            todo: Color::Yellow,
            in_progress: Color::Blue,
            done: Color::Green,

            error: Color::Red,
            search: Color::White,
            grabbed: Color::Magenta,
            accent: Color::Cyan,
        }
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::by_name("nope").title, Theme::phosphor().title);
        assert_eq!(Theme::by_name("").title, Theme::phosphor().title);
    }

    #[test]
    fn test_theme_name_is_case_insensitive() {
        assert_eq!(Theme::by_name("Classic").title, Color::Cyan);
    }

    #[test]
    fn test_status_colors_are_distinct() {
        let theme = Theme::default();
        assert_ne!(theme.status_color(TaskStatus::Todo), theme.status_color(TaskStatus::Done));
        assert_ne!(
            theme.status_color(TaskStatus::InProgress),
            theme.status_color(TaskStatus::Done)
        );
    }
}
