//! TUI dialog components

mod confirm;
mod new_task;

pub use confirm::{ConfirmAction, ConfirmDialog};
pub use new_task::NewTaskDialog;

use ratatui::layout::Rect;

pub enum DialogResult<T> {
    Continue,
    Cancel,
    Submit(T),
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(Rect::new(0, 0, 100, 40), 50, 8);
        assert_eq!(rect, Rect::new(25, 16, 50, 8));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let rect = centered_rect(Rect::new(2, 3, 20, 5), 50, 8);
        assert_eq!(rect, Rect::new(2, 3, 20, 5));
    }
}
