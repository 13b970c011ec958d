use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: reading pane beside the question panel
    Narrow, // <100 cols: reading pane above the question panel
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Main area of a two-pane screen: the text on one side, the work on the other.
pub struct SplitPanes {
    pub primary: Rect,
    pub secondary: Rect,
    pub tier: LayoutTier,
}

impl SplitPanes {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);
        let (direction, constraints) = match tier {
            LayoutTier::Wide => (
                Direction::Horizontal,
                [Constraint::Percentage(58), Constraint::Percentage(42)],
            ),
            LayoutTier::Narrow => (
                Direction::Vertical,
                [Constraint::Percentage(55), Constraint::Percentage(45)],
            ),
        };
        let panes = Layout::default()
            .direction(direction)
            .constraints(constraints)
            .split(area);
        Self {
            primary: panes[0],
            secondary: panes[1],
            tier,
        }
    }
}

pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let chars = text.chars().count().max(1);
    chars.div_ceil(width)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

/// Greedy word wrap over a char slice. Returns `[start, end)` char ranges,
/// one per line; a word longer than `width` is split hard.
pub fn wrap_ranges(chars: &[char], width: usize) -> Vec<(usize, usize)> {
    if width == 0 {
        return Vec::new();
    }
    if chars.is_empty() {
        return vec![(0, 0)];
    }
    let mut lines = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let limit = start + width;
        if limit >= chars.len() {
            lines.push((start, chars.len()));
            break;
        }
        let end = chars[start..=limit]
            .iter()
            .rposition(|c| c.is_whitespace())
            .map(|i| start + i + 1)
            .filter(|&end| end > start)
            .unwrap_or(limit);
        lines.push((start, end));
        start = end;
    }
    lines
}

/// Scroll offset that keeps `focus_line` inside a window of `height` lines.
pub fn scroll_to(focus_line: usize, height: usize) -> usize {
    if height == 0 {
        return focus_line;
    }
    focus_line.saturating_sub(height.saturating_sub(2))
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 10;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str, width: usize) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        wrap_ranges(&chars, width)
            .into_iter()
            .map(|(s, e)| chars[s..e].iter().collect())
            .collect()
    }

    #[test]
    fn wraps_at_spaces() {
        assert_eq!(lines("the quick brown fox", 10), vec!["the quick ", "brown fox"]);
    }

    #[test]
    fn splits_long_words() {
        assert_eq!(lines("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(wrap_ranges(&[], 5), vec![(0, 0)]);
    }

    #[test]
    fn hint_lines_pack_to_width() {
        let packed = pack_hint_lines(&["[q] Quit", "[Tab] Focus", "[1] Main idea"], 24);
        assert_eq!(packed, vec!["  [q] Quit  [Tab] Focus", "  [1] Main idea"]);
    }

    #[test]
    fn scroll_keeps_focus_visible() {
        assert_eq!(scroll_to(3, 10), 0);
        assert_eq!(scroll_to(20, 10), 12);
    }

    #[test]
    fn split_panes_by_width() {
        assert_eq!(SplitPanes::new(Rect::new(0, 0, 120, 40)).tier, LayoutTier::Wide);
        assert_eq!(SplitPanes::new(Rect::new(0, 0, 80, 40)).tier, LayoutTier::Narrow);
    }
}
