//! Layout and text helpers for the chat screen.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Span;

/// Helper function to create a centered rect using up certain percentage of the available rect `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Terminal columns `s` occupies; wide characters count as two.
pub fn display_width(s: &str) -> usize {
    Span::raw(s).width()
}

fn char_width(c: char) -> usize {
    let mut buf = [0; 4];
    display_width(c.encode_utf8(&mut buf))
}

/// Break `text` into lines no wider than `width` terminal columns.
///
/// Explicit newlines are kept, words are kept whole where they fit, and
/// words longer than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut used = 0;
        for word in raw.split(' ') {
            let word_width = display_width(word);
            let sep = usize::from(!line.is_empty());
            if used + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                used += sep + word_width;
                continue;
            }
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                used = 0;
            }
            for c in word.chars() {
                let w = char_width(c);
                if used + w > width && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    used = 0;
                }
                line.push(c);
                used += w;
            }
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn test_wrap_measures_wide_characters() {
        assert_eq!(display_width("漢字"), 4);
        assert_eq!(wrap_text("漢漢漢", 4), vec!["漢漢", "漢"]);
        assert_eq!(wrap_text("ab 漢漢", 4), vec!["ab", "漢漢"]);
        for line in wrap_text(&format!("{}END", "漢".repeat(45)), 57) {
            assert!(display_width(&line) <= 57);
        }
    }

    #[test]
    fn test_centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 50, outer);
        assert!(inner.width < outer.width && inner.height < outer.height);
        assert!(inner.x > 0 && inner.y > 0);
        assert!(inner.right() < outer.right() && inner.bottom() < outer.bottom());
    }
}
