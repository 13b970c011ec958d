use criterion::{Criterion, black_box, criterion_group, criterion_main};

use readcoach::annotate::{AnnotatedPassage, ClearTarget, HighlightColor, TextRange};
use readcoach::paraphrase::validate;

fn long_passage(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "<p>Paragraph {i} argues that <em>public transit</em> reduces congestion, \
                 while critics point to <strong>rising costs</strong> and slow delivery.</p>"
            )
        })
        .collect()
}

fn full_range(passage: &AnnotatedPassage, last: usize) -> TextRange {
    let start = passage.point_at(0, 2).unwrap();
    let end = passage.point_at(last, 40).unwrap();
    TextRange::new(start, end)
}

fn bench_apply(c: &mut Criterion) {
    let html = long_passage(40);
    let pristine = AnnotatedPassage::new(&html);
    let range = full_range(&pristine, 39);

    c.bench_function("apply_highlight (40 paragraphs)", |b| {
        b.iter(|| {
            let mut passage = pristine.clone();
            passage.apply_highlight(black_box(Some(&range)), HighlightColor::Main)
        })
    });
}

fn bench_clear(c: &mut Criterion) {
    let html = long_passage(40);
    let mut painted = AnnotatedPassage::new(&html);
    let range = full_range(&painted, 39);
    painted.apply_highlight(Some(&range), HighlightColor::Evidence);
    let target = ClearTarget::Range(range);

    c.bench_function("clear_highlight range (40 paragraphs)", |b| {
        b.iter(|| {
            let mut passage = painted.clone();
            passage.clear_highlight(black_box(&target))
        })
    });
}

fn bench_restore(c: &mut Criterion) {
    let html = long_passage(40);
    let mut painted = AnnotatedPassage::new(&html);
    let range = full_range(&painted, 39);
    painted.apply_highlight(Some(&range), HighlightColor::Confusion);
    let saved = painted.paragraphs().to_vec();

    c.bench_function("restore saved highlights (40 paragraphs)", |b| {
        b.iter(|| AnnotatedPassage::restore(black_box(&html), Some(saved.clone())))
    });
}

fn bench_validate(c: &mut Criterion) {
    let answer = "The author thinks transit helps traffic but admits the price keeps growing ".repeat(8);

    c.bench_function("validate paraphrase (~100 words)", |b| {
        b.iter(|| validate(black_box(&answer), 10))
    });
}

criterion_group!(benches, bench_apply, bench_clear, bench_restore, bench_validate);
criterion_main!(benches);
