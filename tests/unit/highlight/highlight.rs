use super::*;
use crate::content::normalize;
use crate::layout::{Align, ApproxMeasure, LayoutParams, layout_document};

fn rows(n: usize) -> Vec<WordBox> {
    // One word per row; rows are 30 high so centres sit at 15, 45, 75, ...
    let text = (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join("<br>");
    let params = LayoutParams {
        viewport_width: 400.0,
        font_size: 20.0,
        line_height: 1.5,
        padding_x: 0.0,
        align: Align::Start,
    };
    layout_document(&normalize(&text), &params, &ApproxMeasure)
        .words()
        .to_vec()
}

#[test]
fn word_at_midpoint_is_active() {
    let words = rows(5);
    // viewport 300 → mid 150; row 2 centre is 75, so position 75 puts it on the midpoint.
    assert_eq!(active_words(&words, 75.0, 300.0), vec![2]);
}

#[test]
fn band_edges_are_exclusive() {
    let words = rows(5);
    // centre 75 + 60 = 135 = mid - 15: outside.
    assert!(active_words(&words, 60.0, 300.0).is_empty());
    // centre 75 + 90 = 165 = mid + 15: outside.
    assert!(active_words(&words, 90.0, 300.0).is_empty());
    assert_eq!(active_words(&words, 61.0, 300.0), vec![2]);
}

#[test]
fn words_sharing_a_row_are_active_together() {
    let params = LayoutParams {
        viewport_width: 1000.0,
        font_size: 20.0,
        line_height: 1.5,
        padding_x: 0.0,
        align: Align::Center,
    };
    let layout = layout_document(&normalize("alpha beta gamma"), &params, &ApproxMeasure);
    assert_eq!(active_words(layout.words(), 85.0, 200.0), vec![0, 1, 2]);
}

#[test]
fn highlighter_reports_changes() {
    let words = rows(3);
    let mut h = WordHighlighter::default();
    // mid 100; row 1 centre 45.
    assert!(h.update(&words, 55.0, 200.0));
    assert_eq!(h.active(), &[1]);
    assert!(h.is_active(1));
    assert!(!h.update(&words, 56.0, 200.0));
    h.clear();
    assert!(h.active().is_empty());
}
