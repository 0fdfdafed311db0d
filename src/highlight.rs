//! Word highlighter: picks the words whose vertical centre is near the viewport midpoint.

use crate::layout::WordBox;

/// Half-width of the highlight band around the viewport midpoint.
pub const HIGHLIGHT_TOLERANCE: f64 = 15.0;

/// Indices of words whose centre lies strictly inside `mid ± HIGHLIGHT_TOLERANCE`.
///
/// `words` must be in document order, which keeps their rows sorted by `y`; the scan stops at
/// the first word below the band.
pub fn active_words(words: &[WordBox], position: f64, viewport_height: f64) -> Vec<usize> {
    let mid = viewport_height * 0.5;
    let lo = mid - HIGHLIGHT_TOLERANCE;
    let hi = mid + HIGHLIGHT_TOLERANCE;

    let start = words.partition_point(|w| position + w.mid_y() <= lo);
    words[start..]
        .iter()
        .take_while(|w| position + w.mid_y() < hi)
        .map(|w| w.index)
        .collect()
}

/// Keeps the current active set between ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordHighlighter {
    active: Vec<usize>,
}

impl WordHighlighter {
    /// Recompute the active set. Returns `true` when it changed.
    pub fn update(&mut self, words: &[WordBox], position: f64, viewport_height: f64) -> bool {
        let next = active_words(words, position, viewport_height);
        if next == self.active {
            return false;
        }
        tracing::trace!(active = ?next, "highlight changed");
        self.active = next;
        true
    }

    /// Active word indices, ascending.
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Whether word `index` is highlighted.
    pub fn is_active(&self, index: usize) -> bool {
        self.active.binary_search(&index).is_ok()
    }

    /// Drop the active set (content reload).
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
#[path = "../tests/unit/highlight/highlight.rs"]
mod tests;
