use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::annotate::mark::{self, find_marks, innermost_mark_at, unwrap_mark, unwrap_marks_in};
use crate::annotate::{AnnotationError, HighlightColor, TextPoint, TextRange};
use crate::markup::{Fragment, Node, parse_fragment, split_paragraphs};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphState {
    pub html: String,
    /// Set once a highlight lands in the paragraph; clearing does not reset it.
    #[serde(default)]
    pub has_highlight: bool,
}

impl ParagraphState {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            has_highlight: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { mark_id: u64, paragraphs: Vec<usize> },
    Ignored(AnnotationError),
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }

    /// The surface drops its selection after a successful highlight.
    pub fn clears_selection(&self) -> bool {
        self.is_applied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClearTarget {
    Cursor(TextPoint),
    Range(TextRange),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkInfo {
    pub paragraph: usize,
    pub mark_id: Option<u64>,
    pub color: Option<HighlightColor>,
    pub text: String,
}

/// A resolved caret: paragraph plus flat char offset into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FlatPoint {
    paragraph: usize,
    offset: usize,
}

/// The paragraphs of one passage and the highlights painted on them.
#[derive(Clone, Debug, Default)]
pub struct AnnotatedPassage {
    paragraphs: Vec<ParagraphState>,
    next_mark_id: u64,
}

impl AnnotatedPassage {
    pub fn new(content_html: &str) -> Self {
        let paragraphs = split_paragraphs(content_html)
            .into_iter()
            .map(ParagraphState::new)
            .collect();
        Self::from_paragraphs(paragraphs).unwrap_or_else(|| {
            tracing::warn!("passage markup carries an unusable highlight id, opening it empty");
            Self::default()
        })
    }

    /// `None` when an existing marker already holds the largest possible id,
    /// since the next highlight would have nothing left to take.
    pub fn from_paragraphs(paragraphs: Vec<ParagraphState>) -> Option<Self> {
        let mut passage = Self {
            paragraphs,
            next_mark_id: 1,
        };
        let highest = passage
            .marks()
            .into_iter()
            .filter_map(|m| m.mark_id)
            .max()
            .unwrap_or(0);
        passage.next_mark_id = highest.checked_add(1)?;
        Some(passage)
    }

    /// Rebuild from saved paragraph state, falling back to the pristine
    /// content when the saved copy no longer matches its text.
    pub fn restore(content_html: &str, saved: Option<Vec<ParagraphState>>) -> Self {
        let fresh = Self::new(content_html);
        let Some(saved) = saved else {
            return fresh;
        };
        let matches = saved.len() == fresh.paragraphs.len()
            && saved
                .iter()
                .zip(&fresh.paragraphs)
                .all(|(s, f)| same_text(&s.html, &f.html));
        if !matches {
            tracing::warn!("saved highlights do not match passage text, discarding");
            return fresh;
        }
        Self::from_paragraphs(saved).unwrap_or_else(|| {
            tracing::warn!("saved highlights carry an out-of-range mark id, discarding");
            fresh
        })
    }

    pub fn paragraphs(&self) -> &[ParagraphState] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn has_highlight(&self, index: usize) -> bool {
        self.paragraphs.get(index).is_some_and(|p| p.has_highlight)
    }

    pub fn to_html(&self) -> String {
        self.paragraphs.iter().map(|p| p.html.as_str()).collect()
    }

    pub fn fragment(&self, index: usize) -> Result<Fragment, AnnotationError> {
        let paragraph = self
            .paragraphs
            .get(index)
            .ok_or(AnnotationError::ParagraphOutOfRange {
                index,
                count: self.paragraphs.len(),
            })?;
        parse_fragment(&paragraph.html).map_err(|source| AnnotationError::Markup {
            paragraph: index,
            source,
        })
    }

    /// Caret at a flat char offset of a paragraph.
    pub fn point_at(&self, paragraph: usize, char_offset: usize) -> Option<TextPoint> {
        let fragment = self.fragment(paragraph).ok()?;
        let (path, offset) = fragment.locate(char_offset)?;
        Some(TextPoint::new(paragraph, path, offset))
    }

    fn resolve(&self, point: &TextPoint) -> Result<FlatPoint, AnnotationError> {
        let fragment = self.fragment(point.paragraph)?;
        let text = fragment
            .node(&point.path)
            .and_then(Node::as_text)
            .ok_or_else(|| AnnotationError::NotATextNode {
                paragraph: point.paragraph,
                path: point.path.clone(),
            })?;
        let len = text.chars().count();
        if point.offset > len {
            return Err(AnnotationError::OffsetOutOfBounds {
                offset: point.offset,
                len,
            });
        }
        let offset = fragment
            .flat_offset(&point.path, point.offset)
            .ok_or(AnnotationError::OffsetOutOfBounds {
                offset: point.offset,
                len,
            })?;
        Ok(FlatPoint {
            paragraph: point.paragraph,
            offset,
        })
    }

    fn resolve_range(&self, range: &TextRange) -> Result<(FlatPoint, FlatPoint), AnnotationError> {
        let a = self.resolve(&range.start)?;
        let b = self.resolve(&range.end)?;
        Ok(if a <= b { (a, b) } else { (b, a) })
    }

    /// Flat `[from, to)` span of paragraph `index` covered by `start..end`.
    fn span_in(&self, index: usize, fragment: &Fragment, start: FlatPoint, end: FlatPoint) -> (usize, usize) {
        let from = if index == start.paragraph { start.offset } else { 0 };
        let to = if index == end.paragraph {
            end.offset
        } else {
            fragment.text_len()
        };
        (from, to)
    }

    pub fn apply_highlight(&mut self, selection: Option<&TextRange>, color: HighlightColor) -> ApplyOutcome {
        let result = match selection {
            Some(range) => self.try_apply(range, color),
            None => Err(AnnotationError::NoSelection),
        };
        match result {
            Ok((mark_id, paragraphs)) => {
                tracing::debug!(mark_id, ?paragraphs, %color, "highlight applied");
                ApplyOutcome::Applied { mark_id, paragraphs }
            }
            Err(reason) => {
                tracing::debug!(%reason, "highlight request ignored");
                ApplyOutcome::Ignored(reason)
            }
        }
    }

    fn try_apply(&mut self, range: &TextRange, color: HighlightColor) -> Result<(u64, Vec<usize>), AnnotationError> {
        let (start, end) = self.resolve_range(range)?;
        if start == end {
            return Err(AnnotationError::CollapsedSelection);
        }

        let id = self.next_mark_id;
        let next_id = id.checked_add(1).ok_or(AnnotationError::MarkIdsExhausted)?;
        let mut updates = Vec::new();
        for index in start.paragraph..=end.paragraph {
            let fragment = self.fragment(index)?;
            let (from, to) = self.span_in(index, &fragment, start, end);
            if from >= to {
                continue;
            }
            match mark::apply_mark(&fragment, from, to, color, id) {
                Ok(marked) => updates.push((index, marked.to_html())),
                Err(AnnotationError::CollapsedSelection) => continue,
                Err(AnnotationError::NotATextNode { path, .. }) => {
                    return Err(AnnotationError::NotATextNode {
                        paragraph: index,
                        path,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        if updates.is_empty() {
            return Err(AnnotationError::CollapsedSelection);
        }

        let touched = updates.iter().map(|(i, _)| *i).collect();
        for (index, html) in updates {
            let paragraph = &mut self.paragraphs[index];
            paragraph.html = html;
            paragraph.has_highlight = true;
        }
        self.next_mark_id = next_id;
        Ok((id, touched))
    }

    /// Unwrap markers at a cursor or across a range. Returns the paragraphs
    /// whose markup changed; an unusable target changes nothing.
    pub fn clear_highlight(&mut self, target: &ClearTarget) -> BTreeSet<usize> {
        let result = match target {
            ClearTarget::Cursor(point) => self.clear_at_cursor(point),
            ClearTarget::Range(range) if range.start == range.end => self.clear_at_cursor(&range.start),
            ClearTarget::Range(range) => self.clear_in_range(range),
        };
        match result {
            Ok(updates) => self.commit(updates),
            Err(reason) => {
                tracing::debug!(%reason, "clear request ignored");
                BTreeSet::new()
            }
        }
    }

    fn clear_at_cursor(&self, point: &TextPoint) -> Result<Vec<(usize, String)>, AnnotationError> {
        self.resolve(point)?;
        let fragment = self.fragment(point.paragraph)?;
        Ok(match innermost_mark_at(&fragment, &point.path) {
            Some(mark_path) => vec![(point.paragraph, unwrap_mark(&fragment, &mark_path).to_html())],
            None => Vec::new(),
        })
    }

    fn clear_in_range(&self, range: &TextRange) -> Result<Vec<(usize, String)>, AnnotationError> {
        let (start, end) = self.resolve_range(range)?;
        let mut updates = Vec::new();
        for index in start.paragraph..=end.paragraph {
            let fragment = self.fragment(index)?;
            let (from, to) = self.span_in(index, &fragment, start, end);
            let (cleared, removed) = unwrap_marks_in(&fragment, from, to);
            if removed > 0 {
                updates.push((index, cleared.to_html()));
            }
        }
        Ok(updates)
    }

    /// Remove one highlight, wherever its pieces are.
    pub fn remove_mark(&mut self, mark_id: u64) -> BTreeSet<usize> {
        let updates = (0..self.paragraphs.len())
            .filter_map(|index| {
                let fragment = self.fragment(index).ok()?;
                let html = mark::remove_mark(&fragment, mark_id).to_html();
                (html != self.paragraphs[index].html).then_some((index, html))
            })
            .collect();
        self.commit(updates)
    }

    fn commit(&mut self, updates: Vec<(usize, String)>) -> BTreeSet<usize> {
        updates
            .into_iter()
            .map(|(index, html)| {
                self.paragraphs[index].html = html;
                index
            })
            .collect()
    }

    pub fn marks(&self) -> Vec<MarkInfo> {
        (0..self.paragraphs.len())
            .filter_map(|index| self.fragment(index).ok().map(|f| (index, f)))
            .flat_map(|(index, fragment)| {
                find_marks(&fragment).into_iter().map(move |m| MarkInfo {
                    paragraph: index,
                    mark_id: m.id,
                    color: m.color,
                    text: m.text,
                })
            })
            .collect()
    }
}

fn same_text(a: &str, b: &str) -> bool {
    match (parse_fragment(a), parse_fragment(b)) {
        (Ok(a), Ok(b)) => a.text_content() == b.text_content(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::NodePath;

    const CONTENT: &str = "<p>The first paragraph.</p>\n<p>A <strong>bold</strong> second one.</p>";

    fn text_point(passage: &AnnotatedPassage, paragraph: usize, offset: usize) -> TextPoint {
        passage.point_at(paragraph, offset).unwrap()
    }

    fn range(passage: &AnnotatedPassage, a: (usize, usize), b: (usize, usize)) -> TextRange {
        TextRange::new(text_point(passage, a.0, a.1), text_point(passage, b.0, b.1))
    }

    #[test]
    fn highlight_then_clear_restores_markup() {
        let mut passage = AnnotatedPassage::new(CONTENT);
        let before = passage.paragraphs()[0].html.clone();
        let sel = range(&passage, (0, 4), (0, 9));

        let outcome = passage.apply_highlight(Some(&sel), HighlightColor::Main);
        assert!(outcome.clears_selection());
        assert!(passage.paragraphs()[0].html.contains("data-highlight=\"main\""));
        assert!(passage.has_highlight(0));
        assert!(!passage.has_highlight(1));

        let cursor = text_point(&passage, 0, 6);
        let changed = passage.clear_highlight(&ClearTarget::Cursor(cursor));
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(passage.paragraphs()[0].html, before);
        assert!(passage.has_highlight(0));
    }

    #[test]
    fn ignored_requests_change_nothing() {
        let mut passage = AnnotatedPassage::new(CONTENT);
        let snapshot = passage.paragraphs().to_vec();

        let none = passage.apply_highlight(None, HighlightColor::Main);
        assert_eq!(none, ApplyOutcome::Ignored(AnnotationError::NoSelection));

        let p = text_point(&passage, 0, 3);
        let collapsed = TextRange::new(p.clone(), p);
        assert_eq!(
            passage.apply_highlight(Some(&collapsed), HighlightColor::Main),
            ApplyOutcome::Ignored(AnnotationError::CollapsedSelection)
        );

        let outside = TextRange::new(
            TextPoint::new(9, NodePath::new(vec![0, 0]), 0),
            text_point(&passage, 0, 2),
        );
        assert!(matches!(
            passage.apply_highlight(Some(&outside), HighlightColor::Main),
            ApplyOutcome::Ignored(AnnotationError::ParagraphOutOfRange { index: 9, .. })
        ));

        let element_path = TextRange::new(
            TextPoint::new(1, NodePath::new(vec![1, 1]), 0),
            text_point(&passage, 1, 2),
        );
        assert!(matches!(
            passage.apply_highlight(Some(&element_path), HighlightColor::Main),
            ApplyOutcome::Ignored(AnnotationError::NotATextNode { .. })
        ));

        let overrun = TextRange::new(
            TextPoint::new(0, NodePath::new(vec![0, 0]), 99),
            text_point(&passage, 0, 2),
        );
        assert!(matches!(
            passage.apply_highlight(Some(&overrun), HighlightColor::Main),
            ApplyOutcome::Ignored(AnnotationError::OffsetOutOfBounds { .. })
        ));

        assert_eq!(passage.paragraphs(), snapshot.as_slice());
    }

    #[test]
    fn reversed_selection_is_normalized() {
        let mut a = AnnotatedPassage::new(CONTENT);
        let mut b = AnnotatedPassage::new(CONTENT);
        let forward = range(&a, (1, 0), (1, 8));
        let backward = range(&b, (1, 8), (1, 0));
        a.apply_highlight(Some(&forward), HighlightColor::Evidence);
        b.apply_highlight(Some(&backward), HighlightColor::Evidence);
        assert_eq!(a.paragraphs(), b.paragraphs());
    }

    #[test]
    fn selection_across_paragraphs_marks_both() {
        let mut passage = AnnotatedPassage::new(CONTENT);
        let sel = range(&passage, (0, 10), (1, 5));
        let outcome = passage.apply_highlight(Some(&sel), HighlightColor::Confusion);
        let ApplyOutcome::Applied { mark_id, paragraphs } = outcome else {
            panic!("expected highlight to apply");
        };
        assert_eq!(paragraphs, vec![0, 1]);
        assert!(passage.has_highlight(0) && passage.has_highlight(1));

        let texts: Vec<String> = passage.marks().into_iter().map(|m| m.text).collect();
        assert_eq!(texts.concat(), "paragraph.\nA bo");

        let changed = passage.remove_mark(mark_id);
        assert_eq!(changed.len(), 2);
        assert_eq!(passage.to_html(), CONTENT);
    }

    #[test]
    fn clearing_a_range_unwraps_every_intersecting_mark() {
        let mut passage = AnnotatedPassage::new(CONTENT);
        let first = range(&passage, (0, 0), (0, 3));
        passage.apply_highlight(Some(&first), HighlightColor::Main);
        let second = range(&passage, (0, 10), (0, 19));
        passage.apply_highlight(Some(&second), HighlightColor::Evidence);
        assert_eq!(passage.marks().len(), 2);

        let sweep = range(&passage, (0, 1), (0, 12));
        let changed = passage.clear_highlight(&ClearTarget::Range(sweep));
        assert_eq!(changed.len(), 1);
        assert!(passage.marks().is_empty());
        assert_eq!(passage.to_html(), CONTENT);
    }

    #[test]
    fn cursor_outside_any_mark_changes_nothing() {
        let mut passage = AnnotatedPassage::new(CONTENT);
        let cursor = text_point(&passage, 1, 1);
        assert!(passage.clear_highlight(&ClearTarget::Cursor(cursor)).is_empty());
    }

    #[test]
    fn mark_ids_keep_increasing_after_restore() {
        let mut passage = AnnotatedPassage::new(CONTENT);
        let sel = range(&passage, (0, 0), (0, 3));
        passage.apply_highlight(Some(&sel), HighlightColor::Main);
        let saved = passage.paragraphs().to_vec();

        let mut restored = AnnotatedPassage::restore(CONTENT, Some(saved));
        assert!(restored.has_highlight(0));
        let sel = range(&restored, (1, 0), (1, 1));
        let ApplyOutcome::Applied { mark_id, .. } =
            restored.apply_highlight(Some(&sel), HighlightColor::Main)
        else {
            panic!("expected highlight to apply");
        };
        assert_eq!(mark_id, 2);
    }

    #[test]
    fn restore_discards_state_for_changed_content() {
        let saved = vec![ParagraphState::new("<p>Old text.</p>")];
        let restored = AnnotatedPassage::restore(CONTENT, Some(saved));
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.to_html(), CONTENT);
    }

    fn saved_with_mark_id(id: u64) -> Vec<ParagraphState> {
        vec![ParagraphState {
            html: format!(
                "<p><span class=\"hl hl-main\" data-highlight=\"main\" data-mark-id=\"{id}\">abc</span></p>"
            ),
            has_highlight: true,
        }]
    }

    #[test]
    fn restore_discards_saved_state_with_the_largest_mark_id() {
        let restored = AnnotatedPassage::restore("<p>abc</p>", Some(saved_with_mark_id(u64::MAX)));
        assert_eq!(restored.to_html(), "<p>abc</p>");
        assert!(!restored.has_highlight(0));
    }

    #[test]
    fn last_free_mark_id_is_used_once() {
        let mut passage = AnnotatedPassage::restore("<p>abc</p>", Some(saved_with_mark_id(u64::MAX - 1)));
        assert!(passage.has_highlight(0));

        // Select inside the existing marker's text node.
        let start = passage.point_at(0, 0).unwrap();
        let end = passage.point_at(0, 1).unwrap();
        let first = passage.apply_highlight(Some(&TextRange::new(start, end)), HighlightColor::Evidence);
        assert!(matches!(first, ApplyOutcome::Applied { mark_id: u64::MAX, .. }));

        let html = passage.to_html();
        let start = passage.point_at(0, 1).unwrap();
        let end = passage.point_at(0, 2).unwrap();
        let second = passage.apply_highlight(Some(&TextRange::new(start, end)), HighlightColor::Main);
        assert!(matches!(second, ApplyOutcome::Ignored(AnnotationError::MarkIdsExhausted)));
        assert_eq!(passage.to_html(), html);
    }

    #[test]
    fn malformed_paragraph_is_left_alone() {
        let mut passage = AnnotatedPassage::new("<p>fine</p><p>broken <em>here</p>");
        assert_eq!(passage.len(), 2);
        assert!(passage.point_at(1, 0).is_none());
        let sel = TextRange::new(
            TextPoint::new(1, NodePath::new(vec![0, 0]), 0),
            TextPoint::new(1, NodePath::new(vec![0, 0]), 3),
        );
        assert!(matches!(
            passage.apply_highlight(Some(&sel), HighlightColor::Main),
            ApplyOutcome::Ignored(AnnotationError::Markup { paragraph: 1, .. })
        ));
    }
}
