//! New task dialog

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::DialogResult;
use crate::tui::components::render_text_field;
use crate::tui::styles::Theme;

pub struct NewTaskDialog {
    text: Input,
}

impl Default for NewTaskDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl NewTaskDialog {
    pub fn new() -> Self {
        Self {
            text: Input::default(),
        }
    }

    pub fn value(&self) -> &str {
        self.text.value()
    }

    /// Enter on blank text cancels rather than submitting.
    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<String> {
        match key.code {
            KeyCode::Esc => DialogResult::Cancel,
            KeyCode::Enter => {
                let text = self.text.value().trim();
                if text.is_empty() {
                    DialogResult::Cancel
                } else {
                    DialogResult::Submit(text.to_string())
                }
            }
            _ => {
                self.text.handle_event(&Event::Key(key));
                DialogResult::Continue
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = super::centered_rect(area, 60, 7);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" New Task ")
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(2), Constraint::Min(1)])
            .split(inner);

        render_text_field(
            frame,
            chunks[0],
            "Task:",
            &self.text,
            true,
            Some("What needs doing?"),
            theme,
        );

        let hint = Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.hint)),
            Span::raw(" add to Pending  "),
            Span::styled("Esc", Style::default().fg(theme.hint)),
            Span::raw(" cancel"),
        ]);
        frame.render_widget(Paragraph::new(hint), chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(dialog: &mut NewTaskDialog, text: &str) {
        for c in text.chars() {
            dialog.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut dialog = NewTaskDialog::new();
        type_text(&mut dialog, "Buy milk");
        assert_eq!(dialog.value(), "Buy milk");

        match dialog.handle_key(key(KeyCode::Enter)) {
            DialogResult::Submit(text) => assert_eq!(text, "Buy milk"),
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_submit_trims_text() {
        let mut dialog = NewTaskDialog::new();
        type_text(&mut dialog, "  padded  ");
        match dialog.handle_key(key(KeyCode::Enter)) {
            DialogResult::Submit(text) => assert_eq!(text, "padded"),
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_blank_enter_cancels() {
        let mut dialog = NewTaskDialog::new();
        type_text(&mut dialog, "   ");
        assert!(matches!(dialog.handle_key(key(KeyCode::Enter)), DialogResult::Cancel));
    }

    #[test]
    fn test_backspace_edits() {
        let mut dialog = NewTaskDialog::new();
        type_text(&mut dialog, "abc");
        dialog.handle_key(key(KeyCode::Backspace));
        assert_eq!(dialog.value(), "ab");
    }

    #[test]
    fn test_esc_cancels() {
        let mut dialog = NewTaskDialog::new();
        type_text(&mut dialog, "abc");
        assert!(matches!(dialog.handle_key(key(KeyCode::Esc)), DialogResult::Cancel));
    }
}
