use ratatui::text::Span;

const ELLIPSIS: char = '…';

/// Cuts `text` to at most `max_width` terminal columns, ending in an ellipsis
/// when anything was removed.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut truncated = String::new();
    for ch in text.chars() {
        let width = char_width(ch);
        if used + width > budget {
            break;
        }
        used += width;
        truncated.push(ch);
    }
    truncated.push(ELLIPSIS);
    truncated
}

/// Columns `text` occupies, measured the same way ratatui lays out spans.
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn char_width(ch: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(ch.encode_utf8(&mut buf))
}
