use std::rc::Rc;

use regex::Regex;
use tempfile::TempDir;

use readcoach::annotate::{AnnotatedPassage, ClearTarget, HighlightColor, HighlightStore, TextRange};
use readcoach::store::{JsonStore, SharedStore};

const NS: &str = "readcoach_test";
const PASSAGE: &str = "<p>The committee <em>rejected</em> the plan.</p>\
<p>Critics said the budget was unrealistic.</p>";

fn range(passage: &AnnotatedPassage, from: (usize, usize), to: (usize, usize)) -> TextRange {
    TextRange::new(
        passage.point_at(from.0, from.1).unwrap(),
        passage.point_at(to.0, to.1).unwrap(),
    )
}

fn plain_text(html: &str) -> String {
    Regex::new(r"<[^>]+>").unwrap().replace_all(html, "").into_owned()
}

fn marker_count(html: &str, color: HighlightColor) -> usize {
    let pattern = format!(r#"data-highlight="{}""#, color.as_str());
    Regex::new(&pattern).unwrap().find_iter(html).count()
}

#[test]
fn highlight_across_inline_markup_keeps_the_text() {
    let mut passage = AnnotatedPassage::new(PASSAGE);
    let before = plain_text(&passage.to_html());

    // "committee rejected" spans a text node and an <em>.
    let selection = range(&passage, (0, 4), (0, 22));
    assert!(passage.apply_highlight(Some(&selection), HighlightColor::Main).is_applied());

    let html = passage.to_html();
    assert_eq!(plain_text(&html), before);
    assert!(marker_count(&html, HighlightColor::Main) >= 2);
    assert!(passage.has_highlight(0));
    assert!(!passage.has_highlight(1));
}

#[test]
fn selection_over_two_paragraphs_marks_both() {
    let mut passage = AnnotatedPassage::new(PASSAGE);
    let selection = range(&passage, (0, 28), (1, 6));
    assert!(passage.apply_highlight(Some(&selection), HighlightColor::Evidence).is_applied());

    assert_eq!(marker_count(&passage.paragraphs()[0].html, HighlightColor::Evidence), 1);
    assert_eq!(marker_count(&passage.paragraphs()[1].html, HighlightColor::Evidence), 1);
}

#[test]
fn clearing_restores_the_untouched_markup() {
    let mut passage = AnnotatedPassage::new(PASSAGE);
    let selection = range(&passage, (1, 0), (1, 7));
    assert!(passage.apply_highlight(Some(&selection), HighlightColor::Confusion).is_applied());
    assert_ne!(passage.to_html(), PASSAGE);

    let caret = passage.point_at(1, 3).unwrap();
    let changed = passage.clear_highlight(&ClearTarget::Cursor(caret));
    assert!(changed.contains(&1));
    assert_eq!(passage.to_html(), PASSAGE);
}

#[test]
fn missing_or_empty_selection_changes_nothing() {
    let mut passage = AnnotatedPassage::new(PASSAGE);
    assert!(!passage.apply_highlight(None, HighlightColor::Main).is_applied());

    let caret = range(&passage, (0, 5), (0, 5));
    assert!(!passage.apply_highlight(Some(&caret), HighlightColor::Main).is_applied());
    assert_eq!(passage.to_html(), PASSAGE);
}

#[test]
fn saved_highlights_reload_from_disk() {
    let dir = TempDir::new().unwrap();
    let store: SharedStore = Rc::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
    let highlights = HighlightStore::new(Rc::clone(&store), NS);

    let mut passage = highlights.open("ada", 3, 0, PASSAGE);
    let selection = range(&passage, (1, 8), (1, 12));
    assert!(passage.apply_highlight(Some(&selection), HighlightColor::Main).is_applied());
    highlights.save("ada", 3, 0, &passage);

    let reopened = HighlightStore::new(store, NS).open("ada", 3, 0, PASSAGE);
    assert_eq!(reopened.to_html(), passage.to_html());
    assert!(reopened.has_highlight(1));

    // Edited passage text discards the stale markup.
    let edited = "<p>Something else entirely.</p>";
    let fresh = highlights.open("ada", 3, 0, edited);
    assert_eq!(fresh.to_html(), edited);
}
