//! Single-line text field rendering

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tui_input::Input;
use unicode_width::UnicodeWidthStr;

use crate::tui::styles::Theme;

/// Renders `label` followed by the input's value.
///
/// A focused field draws an inverse-video cursor and scrolls horizontally so
/// the cursor stays visible. An empty unfocused field shows `placeholder`.
pub fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    placeholder: Option<&str>,
    theme: &Theme,
) {
    let label_style = if focused {
        Style::default().fg(theme.accent).bold()
    } else {
        Style::default().fg(theme.text)
    };
    let value_style = Style::default().fg(if focused { theme.accent } else { theme.text });

    let mut spans = vec![Span::styled(label, label_style), Span::raw(" ")];
    let value = input.value();

    if !focused {
        match placeholder {
            Some(text) if value.is_empty() => {
                spans.push(Span::styled(text, Style::default().fg(theme.dimmed)))
            }
            _ => spans.push(Span::styled(value, value_style)),
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }

    // One column for the cursor cell past the end
    let field_width = (area.width as usize).saturating_sub(label.width() + 2);
    let scroll = input.visual_scroll(field_width);
    let cursor = input.visual_cursor().saturating_sub(scroll);

    let visible: Vec<char> = value.chars().skip(scroll).collect();
    let before: String = visible.iter().take(cursor).collect();
    let at: String = visible
        .get(cursor)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after: String = visible.iter().skip(cursor + 1).collect();

    spans.push(Span::styled(before, value_style));
    spans.push(Span::styled(
        at,
        Style::default().fg(theme.background).bg(theme.accent),
    ));
    spans.push(Span::styled(after, value_style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
