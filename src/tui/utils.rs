use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthStr;

/// Layout utilities for the dialog surface
pub mod layout {
    use super::*;

    /// Create a centered rectangle with given width and height
    pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);

        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((area.height - height) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length((area.width - width) / 2),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(popup_layout[1])[1]
    }

    /// Rows needed to show `text` wrapped at `width` columns
    pub fn wrapped_height(text: &str, width: u16) -> u16 {
        let width = usize::from(width.max(1));
        text.split('\n')
            .map(|line| line.width().max(1).div_ceil(width))
            .sum::<usize>()
            .min(usize::from(u16::MAX)) as u16
    }

    /// Lay buttons out right-aligned on one row, in order. Rects are clipped
    /// to `area`; a button that does not fit at all gets an empty rect.
    pub fn button_row(labels: &[&str], area: Rect) -> Vec<Rect> {
        let widths: Vec<u16> = labels
            .iter()
            .map(|label| (label.width() as u16).saturating_add(4))
            .collect();
        let gap = 1;
        let total = widths
            .iter()
            .fold(0u16, |sum, width| sum.saturating_add(*width))
            .saturating_add(gap * widths.len().saturating_sub(1) as u16);

        let mut x = area.x + area.width.saturating_sub(total);
        widths
            .into_iter()
            .map(|width| {
                let rect = clip(Rect::new(x, area.y, width, area.height), area);
                x = x.saturating_add(width).saturating_add(gap);
                rect
            })
            .collect()
    }

    /// The part of `rect` inside `area`, empty when they do not overlap
    pub fn clip(rect: Rect, area: Rect) -> Rect {
        let x = rect.x.max(area.x);
        let y = rect.y.max(area.y);
        let right = rect.right().min(area.right());
        let bottom = rect.bottom().min(area.bottom());
        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }
}
