//! Layout helpers shared by the UI components.

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A rectangle of `width` x `height` centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    centered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_inside_the_parent() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 10, area), Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn shrinks_to_fit_small_parents() {
        let area = Rect::new(2, 3, 20, 5);
        let centered = centered_rect(50, 10, area);
        assert_eq!(centered, area);
    }
}
